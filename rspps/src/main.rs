mod config;
mod entity;
mod handlers;
mod migration;
mod store;

use std::path;
use std::sync::Arc;

use anyhow::Result;
use axum::{routing::get, Extension, Router};
use sea_orm_migration::MigratorTrait;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::store::KvStore;

/// 应用状态，handlers 之间共享 KV 访问器
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<KvStore>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // 初始化 tracing 日志系统
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer())
        .init();

    // 读取配置 - 从可执行文件所在目录查找
    let exe_path = std::env::current_exe()?;
    let exe_dir = exe_path.parent().unwrap_or(&exe_path);

    let config_path = std::iter::once(exe_dir.join("rspps.toml"))
        .chain(std::iter::once(path::PathBuf::from("rspps.toml")))
        .chain(std::iter::once(path::PathBuf::from("../rspps.toml")))
        .find(|p| p.exists())
        .ok_or_else(|| anyhow::anyhow!("找不到配置文件 rspps.toml"))?;

    let cfg = config::Config::from_file(&config_path)?;

    info!("📋 加载配置文件: {}", config_path.display());
    info!("🌐 HTTP监听端口: {}", cfg.bind_port);

    // 初始化数据库并运行迁移
    let db = migration::init_sqlite().await;
    migration::Migrator::up(&db, None).await?;
    info!("✅ 数据库初始化完成");

    let store = Arc::new(KvStore::new(db));

    // 启动时报告一次存量，便于确认采集端是否在写
    match store.get_proxy_list().await {
        Ok(Some(read)) => info!("📦 当前代理存量: {} 条", read.document.proxies.len()),
        Ok(None) => info!("📦 KV 中暂无代理数据，等待采集端写入"),
        Err(e) => tracing::warn!("读取代理存量失败: {}", e),
    }

    let app_state = AppState { store };

    // 构建 Web 应用；/api/random 只注册 GET/OPTIONS，其余方法走框架默认
    let app = Router::new()
        .route(
            "/api/proxies",
            get(handlers::list_proxies)
                .options(handlers::proxies_preflight)
                .fallback(handlers::method_not_allowed),
        )
        .route(
            "/api/random",
            get(handlers::random_proxy).options(handlers::random_preflight),
        )
        .layer(Extension(app_state));

    let bind_addr = cfg.get_bind_addr();
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    info!("🌐 代理池 API: http://{}", bind_addr);

    axum::serve(listener, app).await?;

    Ok(())
}

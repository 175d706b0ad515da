mod api;
mod app;
mod config;
mod state;

use anyhow::Result;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    // 读取配置文件
    let cfg = config::Config::load_default()?;

    // 终端被 UI 占用，日志按天滚动写文件；没配目录就不初始化订阅器
    if let Some(dir) = &cfg.log_dir {
        let env_filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("info"));

        let file_appender = tracing_appender::rolling::daily(dir, "rsppc.log");
        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt::layer().with_writer(file_appender).with_ansi(false))
            .init();
    }

    info!("📋 加载配置文件: rsppc.toml");
    info!("📊 统计服务地址: {}", cfg.stats_url);
    info!("🌐 代理池地址: {}", cfg.pool_url);

    let mut app = app::App::new(cfg)?;
    app.run().await?;

    Ok(())
}

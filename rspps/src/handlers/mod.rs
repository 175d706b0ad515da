pub mod proxies;
pub mod random;

pub use proxies::*;
pub use random::*;

use axum::http::{header, HeaderValue};
use axum::response::Response;

/// 两个接口的所有响应都带的基础 CORS 头
pub(crate) fn with_cors(mut response: Response) -> Response {
    let headers = response.headers_mut();
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_ORIGIN,
        HeaderValue::from_static("*"),
    );
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_METHODS,
        HeaderValue::from_static("GET, OPTIONS"),
    );
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_HEADERS,
        HeaderValue::from_static("Content-Type"),
    );
    response
}

/// 列表接口的 CORS 头额外带 24 小时的预检缓存；随机接口不带（保持线上原状的不对称）
pub(crate) fn with_cors_max_age(response: Response) -> Response {
    let mut response = with_cors(response);
    response.headers_mut().insert(
        header::ACCESS_CONTROL_MAX_AGE,
        HeaderValue::from_static("86400"),
    );
    response
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::sync::Arc;

    use sea_orm::{ActiveModelTrait, Database, Set};
    use sea_orm_migration::MigratorTrait;

    use crate::entity::kv_entry;
    use crate::migration::Migrator;
    use crate::store::{KvStore, PROXY_LIST_KEY};
    use crate::AppState;

    /// 内存 sqlite 加可选的 current_proxies 内容
    pub async fn state_with(value: Option<&str>) -> AppState {
        let db = Database::connect("sqlite::memory:").await.unwrap();
        Migrator::up(&db, None).await.unwrap();

        if let Some(value) = value {
            let entry = kv_entry::ActiveModel {
                key: Set(PROXY_LIST_KEY.to_string()),
                value: Set(value.to_string()),
                updated_at: Set(chrono::Utc::now().naive_utc()),
            };
            entry.insert(&db).await.unwrap();
        }

        AppState {
            store: Arc::new(KvStore::new(db)),
        }
    }

    /// 不建表，任何查询都会报错，用来触发 500 路径
    pub async fn broken_state() -> AppState {
        let db = Database::connect("sqlite::memory:").await.unwrap();
        AppState {
            store: Arc::new(KvStore::new(db)),
        }
    }

    pub async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }
}

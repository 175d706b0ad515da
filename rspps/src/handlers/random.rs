//! /api/random - 随机代理接口

use axum::extract::Extension;
use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Json, Response};
use rand::Rng;
use serde::Serialize;
use tracing::error;

use rspp_common::{ProxyRecord, RandomProxyReply};

use crate::AppState;

use super::with_cors;

#[derive(Serialize)]
struct RandomErrorBody {
    error: &'static str,
    message: &'static str,
}

/// 均匀随机挑一条记录；不可播种，也不承诺审计意义上的公平
fn pick(proxies: &[ProxyRecord]) -> Option<&ProxyRecord> {
    if proxies.is_empty() {
        return None;
    }

    let mut rng = rand::rng();
    let index = rng.random_range(0..proxies.len());
    proxies.get(index)
}

/// GET /api/random - 从当前列表随机返回一个代理
pub async fn random_proxy(Extension(state): Extension<AppState>) -> Response {
    let read = match state.store.get_proxy_list().await {
        Ok(read) => read,
        Err(e) => {
            error!("获取随机代理失败: {}", e);
            return with_cors(
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(RandomErrorBody {
                        error: "Internal Server Error",
                        message: "获取随机代理失败",
                    }),
                )
                    .into_response(),
            );
        }
    };

    let document = read.map(|r| r.document);
    let reply = document.as_ref().and_then(|doc| {
        pick(&doc.proxies).map(|record| RandomProxyReply::new(record, &doc.metadata))
    });

    match reply {
        Some(reply) => with_cors(
            (
                StatusCode::OK,
                // 随机结果不缓存
                [(header::CACHE_CONTROL, HeaderValue::from_static("no-cache"))],
                Json(reply),
            )
                .into_response(),
        ),
        None => with_cors(
            (
                StatusCode::NOT_FOUND,
                Json(RandomErrorBody {
                    error: "No proxies available",
                    message: "当前没有可用的代理",
                }),
            )
                .into_response(),
        ),
    }
}

/// OPTIONS /api/random - CORS 预检，与列表接口不同这里不带 max-age
pub async fn random_preflight() -> Response {
    with_cors(StatusCode::NO_CONTENT.into_response())
}

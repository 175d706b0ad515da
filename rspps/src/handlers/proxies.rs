//! /api/proxies - 代理列表接口

use axum::extract::Extension;
use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Json, Response};
use serde::Serialize;
use tracing::error;

use rspp_common::ProxyListDocument;

use crate::AppState;

use super::with_cors_max_age;

/// 列表响应允许客户端缓存 5 分钟
const LIST_CACHE_CONTROL: &str = "public, max-age=300";

/// 读取失败时的响应体：错误信息加一份空文档
#[derive(Serialize)]
struct ListErrorBody {
    error: &'static str,
    message: &'static str,
    #[serde(flatten)]
    empty: ProxyListDocument,
}

/// GET /api/proxies - 原样返回 KV 中的代理列表文档
pub async fn list_proxies(Extension(state): Extension<AppState>) -> Response {
    match state.store.get_proxy_list().await {
        Ok(Some(read)) => {
            // 存储里的 JSON 原文直接作为响应体，保证逐字节一致
            let response = (
                StatusCode::OK,
                [
                    (
                        header::CONTENT_TYPE,
                        HeaderValue::from_static("application/json; charset=utf-8"),
                    ),
                    (
                        header::CACHE_CONTROL,
                        HeaderValue::from_static(LIST_CACHE_CONTROL),
                    ),
                ],
                read.raw,
            )
                .into_response();
            with_cors_max_age(response)
        }
        Ok(None) => {
            with_cors_max_age((StatusCode::OK, Json(ProxyListDocument::empty())).into_response())
        }
        Err(e) => {
            error!("读取代理数据失败: {}", e);
            with_cors_max_age(
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(ListErrorBody {
                        error: "Internal Server Error",
                        message: "读取代理数据失败",
                        empty: ProxyListDocument::empty(),
                    }),
                )
                    .into_response(),
            )
        }
    }
}

/// OPTIONS /api/proxies - CORS 预检
pub async fn proxies_preflight() -> Response {
    with_cors_max_age(StatusCode::NO_CONTENT.into_response())
}

/// GET/OPTIONS 之外的方法一律 405
pub async fn method_not_allowed() -> Response {
    with_cors_max_age((StatusCode::METHOD_NOT_ALLOWED, "Method Not Allowed").into_response())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handlers::test_support::{body_json, broken_state, state_with};

    const SAMPLE: &str = r#"{"metadata":{"total":2,"updated_at":"2026-08-01T08:30:00+00:00","description":"SOCKS5 代理列表"},"proxies":[{"ip":"1.2.3.4","port":1080,"protocol":"socks5","country":"United States","country_code":"US","latency":0.42,"score":88.5,"anonymity":"elite"},{"ip":"5.6.7.8","port":8080,"protocol":"http","country":"Germany","country_code":"DE","latency":1.2,"score":61.0,"anonymity":"anonymous"}]}"#;

    #[tokio::test]
    async fn test_empty_store_returns_empty_document() {
        let state = state_with(None).await;
        let response = list_proxies(Extension(state)).await;

        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().get(header::CACHE_CONTROL).is_none());

        let body = body_json(response).await;
        assert_eq!(
            body,
            serde_json::json!({
                "metadata": {
                    "total": 0,
                    "updated_at": null,
                    "description": "SOCKS5 代理列表"
                },
                "proxies": []
            })
        );
    }

    #[tokio::test]
    async fn test_stored_document_passed_through_verbatim() {
        let state = state_with(Some(SAMPLE)).await;
        let response = list_proxies(Extension(state)).await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get(header::CACHE_CONTROL).unwrap(),
            "public, max-age=300"
        );
        assert_eq!(
            response.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
            "*"
        );

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(bytes.as_ref(), SAMPLE.as_bytes());
    }

    #[tokio::test]
    async fn test_store_failure_maps_to_500_with_empty_document() {
        let state = broken_state().await;
        let response = list_proxies(Extension(state)).await;

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = body_json(response).await;
        assert_eq!(body["error"], "Internal Server Error");
        assert_eq!(body["message"], "读取代理数据失败");
        assert_eq!(body["metadata"]["total"], 0);
        assert_eq!(body["proxies"], serde_json::json!([]));
    }

    #[tokio::test]
    async fn test_undecodable_document_maps_to_500() {
        let state = state_with(Some("not json")).await;
        let response = list_proxies(Extension(state)).await;

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn test_preflight_returns_204_with_cors() {
        let response = proxies_preflight().await;

        assert_eq!(response.status(), StatusCode::NO_CONTENT);
        assert_eq!(
            response.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
            "*"
        );
        assert_eq!(
            response.headers().get(header::ACCESS_CONTROL_ALLOW_METHODS).unwrap(),
            "GET, OPTIONS"
        );
        assert_eq!(
            response.headers().get(header::ACCESS_CONTROL_ALLOW_HEADERS).unwrap(),
            "Content-Type"
        );
        assert_eq!(
            response.headers().get(header::ACCESS_CONTROL_MAX_AGE).unwrap(),
            "86400"
        );
    }

    #[tokio::test]
    async fn test_other_methods_get_405() {
        let response = method_not_allowed().await;

        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(
            response.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
            "*"
        );
    }
}

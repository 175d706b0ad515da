//! 代理列表数据模型
//!
//! KV 中 `current_proxies` 键下的文档由外部采集进程整体覆写，
//! 这里只定义读取端的形状。所有字段都带 serde 默认值，
//! 写入方缺字段时文档仍能解析。

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 代理列表的默认描述
pub const LIST_DESCRIPTION: &str = "SOCKS5 代理列表";

/// 单条代理记录
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProxyRecord {
    pub ip: String,
    pub port: u16,
    #[serde(default)]
    pub protocol: String,
    #[serde(default)]
    pub country: String,
    #[serde(default)]
    pub country_code: String,
    /// 最近一次验证的延迟（秒）
    #[serde(default)]
    pub latency: f64,
    /// 采集端给出的评分，0-100
    #[serde(default)]
    pub score: f64,
    #[serde(default)]
    pub anonymity: String,
}

impl ProxyRecord {
    /// `ip:port` 形式的地址
    pub fn address(&self) -> String {
        format!("{}:{}", self.ip, self.port)
    }
}

/// 列表元数据
///
/// `total` 由写入方维护，读取路径不校验它与 `proxies` 长度是否一致。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListMetadata {
    #[serde(default)]
    pub total: i64,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default = "default_description")]
    pub description: String,
}

fn default_description() -> String {
    LIST_DESCRIPTION.to_string()
}

impl Default for ListMetadata {
    fn default() -> Self {
        Self {
            total: 0,
            updated_at: None,
            description: default_description(),
        }
    }
}

/// `current_proxies` 键下的完整文档
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ProxyListDocument {
    #[serde(default)]
    pub metadata: ListMetadata,
    #[serde(default)]
    pub proxies: Vec<ProxyRecord>,
}

impl ProxyListDocument {
    /// 键不存在时列表接口返回的空文档
    pub fn empty() -> Self {
        Self::default()
    }
}

/// 随机代理响应里附带的元数据
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RandomMetadata {
    pub total_available: i64,
    pub last_updated: Option<DateTime<Utc>>,
}

/// `/api/random` 的扁平化响应
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RandomProxyReply {
    pub proxy: String,
    pub ip: String,
    pub port: u16,
    pub protocol: String,
    pub country: String,
    pub country_code: String,
    pub latency: f64,
    pub score: f64,
    pub anonymity: String,
    pub metadata: RandomMetadata,
}

impl RandomProxyReply {
    /// 从选中的记录和列表元数据拼装响应
    pub fn new(record: &ProxyRecord, metadata: &ListMetadata) -> Self {
        Self {
            proxy: record.address(),
            ip: record.ip.clone(),
            port: record.port,
            protocol: record.protocol.clone(),
            country: record.country.clone(),
            country_code: record.country_code.clone(),
            latency: record.latency,
            score: record.score,
            anonymity: record.anonymity.clone(),
            metadata: RandomMetadata {
                total_available: metadata.total,
                last_updated: metadata.updated_at,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_document_shape() {
        let value = serde_json::to_value(ProxyListDocument::empty()).unwrap();
        assert_eq!(
            value,
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

    #[test]
    fn test_parse_full_document() {
        let raw = r#"{
            "metadata": {
                "total": 1,
                "updated_at": "2026-08-01T08:30:00+00:00",
                "description": "SOCKS5 代理列表"
            },
            "proxies": [
                {
                    "ip": "1.2.3.4",
                    "port": 1080,
                    "protocol": "socks5",
                    "country": "United States",
                    "country_code": "US",
                    "latency": 0.42,
                    "score": 88.5,
                    "anonymity": "elite"
                }
            ]
        }"#;

        let document: ProxyListDocument = serde_json::from_str(raw).unwrap();
        assert_eq!(document.metadata.total, 1);
        assert!(document.metadata.updated_at.is_some());
        assert_eq!(document.proxies.len(), 1);
        assert_eq!(document.proxies[0].address(), "1.2.3.4:1080");
    }

    #[test]
    fn test_parse_tolerates_missing_fields() {
        // 采集端只写了 ip 和 port 的记录也要能读
        let raw = r#"{"proxies": [{"ip": "5.6.7.8", "port": 8080}]}"#;

        let document: ProxyListDocument = serde_json::from_str(raw).unwrap();
        assert_eq!(document.metadata.total, 0);
        assert_eq!(document.metadata.description, LIST_DESCRIPTION);
        assert_eq!(document.proxies[0].protocol, "");
        assert_eq!(document.proxies[0].score, 0.0);
    }

    #[test]
    fn test_random_reply_flattening() {
        let record = ProxyRecord {
            ip: "1.2.3.4".to_string(),
            port: 1080,
            protocol: "socks5".to_string(),
            country: "Germany".to_string(),
            country_code: "DE".to_string(),
            latency: 1.5,
            score: 73.0,
            anonymity: "anonymous".to_string(),
        };
        let metadata = ListMetadata {
            total: 42,
            updated_at: None,
            description: LIST_DESCRIPTION.to_string(),
        };

        let reply = RandomProxyReply::new(&record, &metadata);
        assert_eq!(reply.proxy, "1.2.3.4:1080");
        assert_eq!(reply.metadata.total_available, 42);
        assert_eq!(reply.metadata.last_updated, None);

        let value = serde_json::to_value(&reply).unwrap();
        assert_eq!(value["proxy"], "1.2.3.4:1080");
        assert_eq!(value["port"], 1080);
        assert_eq!(value["metadata"]["total_available"], 42);
    }
}

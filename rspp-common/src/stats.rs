//! 统计服务响应契约
//!
//! 仪表板轮询的 /api/stats、/api/proxies?limit=N、/api/sources
//! 由外部统计服务提供，这里只定义客户端解码用的形状。

use serde::{Deserialize, Serialize};

/// 统计服务统一的响应包装
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct ApiEnvelope<T> {
    pub success: bool,
    #[serde(default)]
    pub data: Option<T>,
    #[serde(default)]
    pub error: Option<String>,
}

impl<T> ApiEnvelope<T> {
    /// 解包；success 为 false 时带回服务端给的错误信息
    pub fn into_data(self) -> Result<T, String> {
        if self.success {
            self.data.ok_or_else(|| "响应缺少 data 字段".to_string())
        } else {
            Err(self.error.unwrap_or_else(|| "未知错误".to_string()))
        }
    }
}

/// 池级统计概览
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PoolStats {
    pub total_proxies: i64,
    pub active_proxies_24h: i64,
    /// 0-1 之间的比例
    pub success_rate_24h: f64,
    pub total_validations: i64,
    #[serde(default)]
    pub top_countries: Vec<CountryCount>,
}

/// 国家分布里的一项
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CountryCount {
    pub country: String,
    pub count: i64,
}

/// 采集源状态
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceStatus {
    pub source_url: String,
    #[serde(default)]
    pub is_active: bool,
    #[serde(default)]
    pub total_proxies_found: i64,
}

/// 仪表板表格的一行：单个代理的统计汇总
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProxyStatRow {
    pub proxy_address: String,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub avg_score: Option<f64>,
    #[serde(default)]
    pub success_rate: f64,
    /// 平均响应时间（秒）
    #[serde(default)]
    pub avg_response_time: Option<f64>,
    #[serde(default)]
    pub total_checks: i64,
}

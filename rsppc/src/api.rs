//! 统计服务与代理池的 HTTP 客户端

use std::time::Duration;

use anyhow::{anyhow, Context, Result};

use rspp_common::{ApiEnvelope, PoolStats, ProxyStatRow, RandomProxyReply, SourceStatus};

/// 仪表板一次最多拉取的行数
pub const PROXY_ROW_LIMIT: usize = 100;

pub struct ApiClient {
    http: reqwest::Client,
    stats_url: String,
    pool_url: String,
}

impl ApiClient {
    pub fn new(stats_url: &str, pool_url: &str) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .context("创建 HTTP 客户端失败")?;

        Ok(Self {
            http,
            stats_url: stats_url.trim_end_matches('/').to_string(),
            pool_url: pool_url.trim_end_matches('/').to_string(),
        })
    }

    /// GET /api/stats - 池级统计概览
    pub async fn fetch_stats(&self) -> Result<PoolStats> {
        let url = format!("{}/api/stats", self.stats_url);
        let envelope: ApiEnvelope<PoolStats> = self
            .http
            .get(&url)
            .send()
            .await
            .with_context(|| format!("请求失败: {}", url))?
            .json()
            .await
            .context("解析统计数据失败")?;

        envelope
            .into_data()
            .map_err(|e| anyhow!("统计服务返回错误: {}", e))
    }

    /// GET /api/proxies?limit=N - 每行是一个代理的统计汇总
    pub async fn fetch_proxy_rows(&self) -> Result<Vec<ProxyStatRow>> {
        let url = format!("{}/api/proxies?limit={}", self.stats_url, PROXY_ROW_LIMIT);
        let envelope: ApiEnvelope<Vec<ProxyStatRow>> = self
            .http
            .get(&url)
            .send()
            .await
            .with_context(|| format!("请求失败: {}", url))?
            .json()
            .await
            .context("解析代理列表失败")?;

        envelope
            .into_data()
            .map_err(|e| anyhow!("统计服务返回错误: {}", e))
    }

    /// GET /api/sources - 采集源状态
    pub async fn fetch_sources(&self) -> Result<Vec<SourceStatus>> {
        let url = format!("{}/api/sources", self.stats_url);
        let envelope: ApiEnvelope<Vec<SourceStatus>> = self
            .http
            .get(&url)
            .send()
            .await
            .with_context(|| format!("请求失败: {}", url))?
            .json()
            .await
            .context("解析代理源状态失败")?;

        envelope
            .into_data()
            .map_err(|e| anyhow!("统计服务返回错误: {}", e))
    }

    /// GET /api/random - 走代理池服务，响应是扁平对象不带 envelope
    pub async fn fetch_random(&self) -> Result<RandomProxyReply> {
        let url = format!("{}/api/random", self.pool_url);
        let response = self
            .http
            .get(&url)
            .send()
            .await
            .with_context(|| format!("请求失败: {}", url))?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(anyhow!("当前没有可用的代理"));
        }

        let reply = response
            .error_for_status()
            .context("代理池服务返回错误")?
            .json()
            .await
            .context("解析随机代理失败")?;

        Ok(reply)
    }
}

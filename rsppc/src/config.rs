//! 仪表板客户端配置模块

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

fn default_refresh_secs() -> u64 {
    30
}

/// 客户端配置
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Config {
    /// 统计服务基地址（/api/stats、/api/proxies、/api/sources）
    pub stats_url: String,
    /// 代理池服务基地址（/api/random）
    pub pool_url: String,
    /// 自动刷新间隔（秒）
    #[serde(default = "default_refresh_secs")]
    pub refresh_secs: u64,
    /// 日志目录；不配置则不落盘
    #[serde(default)]
    pub log_dir: Option<String>,
}

impl Config {
    /// 从文件加载配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path_ref = path.as_ref();
        let content = fs::read_to_string(&path)
            .with_context(|| format!("无法读取配置文件: {}", path_ref.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| "解析配置文件失败")?;

        Ok(config)
    }

    /// 加载默认配置文件
    pub fn load_default() -> Result<Self> {
        Self::from_file("rsppc.toml")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_minimal_config() {
        let raw = r#"
stats_url = "http://127.0.0.1:5000"
pool_url = "http://127.0.0.1:8787"
"#;
        let config: Config = toml::from_str(raw).unwrap();
        assert_eq!(config.refresh_secs, 30);
        assert_eq!(config.log_dir, None);
    }

    #[test]
    fn test_parse_full_config() {
        let raw = r#"
stats_url = "http://127.0.0.1:5000"
pool_url = "http://127.0.0.1:8787"
refresh_secs = 10
log_dir = "logs"
"#;
        let config: Config = toml::from_str(raw).unwrap();
        assert_eq!(config.refresh_secs, 10);
        assert_eq!(config.log_dir.as_deref(), Some("logs"));
    }
}

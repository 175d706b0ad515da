//! 服务端配置模块

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// 服务端配置
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Config {
    /// HTTP 绑定端口
    pub bind_port: u16,
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

    /// 获取绑定地址字符串
    pub fn get_bind_addr(&self) -> String {
        format!("0.0.0.0:{}", self.bind_port)
    }
}

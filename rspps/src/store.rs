//! KV 存储访问器
//!
//! 采集进程把代理列表整体写到 `current_proxies` 键下，这一侧只读。
//! sqlite 文件本身就是写入方的同步点，读失败直接向上冒泡，不重试。

use anyhow::{Context, Result};
use sea_orm::{DatabaseConnection, EntityTrait};

use rspp_common::ProxyListDocument;

use crate::entity::KvEntry;

/// 代理列表文档所在的固定键
pub const PROXY_LIST_KEY: &str = "current_proxies";

/// 一次读取的结果：原始 JSON 文本加解析后的文档
///
/// 列表接口把 `raw` 原样返回给客户端，随机接口用 `document`。
#[derive(Debug, Clone)]
pub struct ProxyListRead {
    pub raw: String,
    pub document: ProxyListDocument,
}

pub struct KvStore {
    db: DatabaseConnection,
}

impl KvStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// 按键读取原始文本，键不存在返回 None
    pub async fn get_raw(&self, key: &str) -> Result<Option<String>> {
        let entry = KvEntry::find_by_id(key)
            .one(&self.db)
            .await
            .with_context(|| format!("查询 KV 键失败: {}", key))?;

        Ok(entry.map(|e| e.value))
    }

    /// 读取并解析代理列表文档
    ///
    /// 键下存的不是合法 JSON 时视为读取错误（对应接口的 500），
    /// 与键不存在（空文档 / 404）区分开。
    pub async fn get_proxy_list(&self) -> Result<Option<ProxyListRead>> {
        let raw = match self.get_raw(PROXY_LIST_KEY).await? {
            Some(raw) => raw,
            None => return Ok(None),
        };

        let document: ProxyListDocument = serde_json::from_str(&raw)
            .with_context(|| format!("解析 {} 文档失败", PROXY_LIST_KEY))?;

        Ok(Some(ProxyListRead { raw, document }))
    }
}

//! RSPP 公共库
//!
//! 此库包含 rspps（代理池服务端）和 rsppc（仪表板客户端）共享的数据模型，
//! 包括代理列表文档、随机代理响应和统计服务的响应契约。

pub mod model;
pub mod stats;

pub use model::{
    ListMetadata,
    ProxyListDocument,
    ProxyRecord,
    RandomMetadata,
    RandomProxyReply,
    LIST_DESCRIPTION,
};

pub use stats::{ApiEnvelope, CountryCount, PoolStats, ProxyStatRow, SourceStatus};

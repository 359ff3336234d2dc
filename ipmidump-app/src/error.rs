//! 应用层错误定义

use ipmidump_core::TransportError;
use thiserror::Error;

/// 调用方可见的错误
///
/// 只有这里的错误会终止一次导出，字段级和段级的解码失败不会出现在这里
#[derive(Debug, Error)]
pub enum DumpError {
    /// 传输层初始化失败
    #[error(transparent)]
    TransportInit(#[from] TransportError),
    /// 配置无效
    #[error("Invalid configuration: {0}")]
    Config(String),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

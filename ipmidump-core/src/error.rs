//! 解码错误定义

use thiserror::Error;

/// 传输层错误
///
/// 由外部驱动产生，解码层只负责传递和记录
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    /// 设备打开/初始化失败
    #[error("Failed to open ipmi device: {0}")]
    Open(String),
    /// 单条请求失败（无响应、完成码非零等）
    #[error("Request {request} failed: {reason}")]
    Request { request: String, reason: String },
}

impl TransportError {
    pub fn request(request: impl Into<String>, reason: impl Into<String>) -> Self {
        TransportError::Request {
            request: request.into(),
            reason: reason.into(),
        }
    }
}

/// 字段解码错误
///
/// 全部为非致命错误：对应字段保持缺省（absent），解码继续进行
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// 传输失败
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),
    /// 响应长度与字段定义不符
    #[error("Length mismatch for {field}: expected {expected} bytes, got {actual}")]
    LengthMismatch {
        field: &'static str,
        expected: usize,
        actual: usize,
    },
    /// 字段专属标签表越界
    #[error("Index out of range for {field}: {index} >= {len}")]
    IndexOutOfRange {
        field: &'static str,
        index: usize,
        len: usize,
    },
    /// 定长文本缺少结束符
    #[error("Malformed text in {field}: no terminator")]
    MalformedText { field: &'static str },
    /// 代码表中没有对应的编码
    #[error("Unknown code for {field}: {code:#04x}")]
    UnknownCode { field: &'static str, code: u8 },
}

impl DecodeError {
    /// 出错字段名（传输错误没有字段名）
    pub fn field(&self) -> Option<&'static str> {
        match self {
            DecodeError::Transport(_) => None,
            DecodeError::LengthMismatch { field, .. }
            | DecodeError::IndexOutOfRange { field, .. }
            | DecodeError::MalformedText { field }
            | DecodeError::UnknownCode { field, .. } => Some(*field),
        }
    }
}

//! 记录解码模块
//!
//! 负责单条原始响应到单个字段值的转换，支持：
//! - bit级标志位测试与多位子字段提取
//! - 按字段定义校验响应长度
//! - 按解码规则分派（整数、地址、枚举、标志位、文本）

pub mod bit_extractor;
pub mod core;
pub mod field_validator;

pub use bit_extractor::{extract_range, test_bit};
pub use self::core::RecordDecoder;
pub use field_validator::FieldValidator;

//! 字段校验器
//!
//! 负责在解码前验证响应长度、标签下标等前置条件

use ipmidump_core::code_tables;
use ipmidump_core::{DecodeError, FieldDescriptor, RawResponse};

/// 字段校验器
pub struct FieldValidator;

impl FieldValidator {
    /// 验证响应长度与字段定义完全一致
    ///
    /// # 参数
    /// - `descriptor`: 字段定义
    /// - `response`: 原始响应（含头部）
    ///
    /// # 返回
    /// - `Ok(())`: 验证通过
    /// - `Err(DecodeError::LengthMismatch)`: 长度不符，不做部分解码
    pub fn validate_length(
        descriptor: &FieldDescriptor,
        response: &RawResponse,
    ) -> Result<(), DecodeError> {
        if response.len() != descriptor.length {
            return Err(DecodeError::LengthMismatch {
                field: descriptor.name,
                expected: descriptor.length,
                actual: response.len(),
            });
        }
        Ok(())
    }

    /// 验证固定布局的负载至少有 `min_len` 字节
    pub fn validate_min_length(
        field: &'static str,
        payload: &[u8],
        min_len: usize,
    ) -> Result<(), DecodeError> {
        if payload.len() < min_len {
            return Err(DecodeError::LengthMismatch {
                field,
                expected: min_len,
                actual: payload.len(),
            });
        }
        Ok(())
    }

    /// 验证字段专属标签表下标
    pub fn validate_index(
        field: &'static str,
        labels: &[&'static str],
        index: usize,
    ) -> Result<&'static str, DecodeError> {
        code_tables::label_at(labels, index).ok_or(DecodeError::IndexOutOfRange {
            field,
            index,
            len: labels.len(),
        })
    }
}

//! RecordDecoder核心实现
//!
//! 按字段定义把一条原始响应解码为一个字段值

use ipmidump_core::utils::{addr, byte_order};
use ipmidump_core::{DecodeError, DecodeRule, DecodedValue, FieldDescriptor, RawResponse, TextPolicy};

use super::bit_extractor::{read_array, test_bit};
use super::field_validator::FieldValidator;

/// 记录解码器
///
/// 无状态，同一实例可以被多个线程同时用于解码互不相关的字段
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RecordDecoder {
    /// 定长文本缺少结束符时的处理策略
    text_policy: TextPolicy,
}

impl RecordDecoder {
    /// 创建新的记录解码器
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_text_policy(text_policy: TextPolicy) -> Self {
        Self { text_policy }
    }

    pub fn text_policy(&self) -> TextPolicy {
        self.text_policy
    }

    /// 解码单个字段
    ///
    /// # 参数
    /// - `descriptor`: 字段定义
    /// - `response`: 原始响应（含2字节头部）
    ///
    /// # 返回
    /// - `Ok(DecodedValue)`: 解码结果
    /// - `Err(DecodeError)`: 长度不符、标签越界或文本无结束符
    pub fn decode(
        &self,
        descriptor: &FieldDescriptor,
        response: &RawResponse,
    ) -> Result<DecodedValue, DecodeError> {
        FieldValidator::validate_length(descriptor, response)?;

        let payload = response.payload();
        let field = descriptor.name;

        let value = match descriptor.rule {
            DecodeRule::Integer => {
                let [byte] = fixed::<1>(descriptor, payload)?;
                DecodedValue::Integer(byte as u64)
            }
            DecodeRule::Uint16Le => {
                let bytes = fixed::<2>(descriptor, payload)?;
                DecodedValue::Integer(byte_order::read_u16_le(bytes) as u64)
            }
            DecodeRule::Ipv4Addr => {
                let bytes = fixed::<4>(descriptor, payload)?;
                DecodedValue::Address(addr::format_ipv4(bytes))
            }
            DecodeRule::HardwareAddr => {
                let bytes = fixed::<6>(descriptor, payload)?;
                DecodedValue::Address(addr::format_hardware_addr(&bytes))
            }
            DecodeRule::Enumerated(labels) => {
                let [index] = fixed::<1>(descriptor, payload)?;
                let label = FieldValidator::validate_index(field, labels, index as usize)?;
                DecodedValue::Label(label.to_string())
            }
            DecodeRule::Flags(bits) => {
                let [byte] = fixed::<1>(descriptor, payload)?;
                DecodedValue::Flags(
                    bits.iter()
                        .map(|bit| (bit.name, test_bit(byte, bit.mask)))
                        .collect(),
                )
            }
            DecodeRule::Text => self.decode_text(field, payload)?,
        };

        Ok(value)
    }

    /// 提取以0结尾的定长文本，只保留第一个0之前的字节
    fn decode_text(&self, field: &'static str, payload: &[u8]) -> Result<DecodedValue, DecodeError> {
        let text = match payload.iter().position(|&b| b == 0) {
            Some(end) => &payload[..end],
            None => match self.text_policy {
                TextPolicy::WholeBuffer => payload,
                TextPolicy::Absent => return Err(DecodeError::MalformedText { field }),
            },
        };
        Ok(DecodedValue::Text(String::from_utf8_lossy(text).into_owned()))
    }
}

/// 按规则读取负载开头的定长字节
fn fixed<const N: usize>(
    descriptor: &FieldDescriptor,
    payload: &[u8],
) -> Result<[u8; N], DecodeError> {
    read_array::<N>(payload, 0).ok_or(DecodeError::LengthMismatch {
        field: descriptor.name,
        expected: N + ipmidump_core::RESPONSE_HEADER_LEN,
        actual: payload.len() + ipmidump_core::RESPONSE_HEADER_LEN,
    })
}

//! 字段元数据模块
//!
//! 定义字段描述符、解码规则以及解码结果的数据结构

use bytes::Bytes;
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// LAN配置响应的头部长度（完成码 + 参数版本）
pub const RESPONSE_HEADER_LEN: usize = 2;

/// 单个标志位定义
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlagBit {
    pub name: &'static str,
    pub mask: u8,
}

/// 解码规则
///
/// 字段专属的标签表直接挂在规则上，规则和标签不会脱节
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeRule {
    /// 单字节整数
    Integer,
    /// 小端16位整数
    Uint16Le,
    /// 4字节点分十进制地址
    Ipv4Addr,
    /// 6字节冒号分隔硬件地址
    HardwareAddr,
    /// 以负载首字节为下标查字段专属标签表
    Enumerated(&'static [&'static str]),
    /// 负载首字节中的若干独立标志位
    Flags(&'static [FlagBit]),
    /// 定长缓冲区中以0结尾的文本
    Text,
}

impl DecodeRule {
    /// 规则对应的负载字节数（不含头部）
    pub fn payload_len(&self) -> Option<usize> {
        match self {
            DecodeRule::Integer | DecodeRule::Enumerated(_) | DecodeRule::Flags(_) => Some(1),
            DecodeRule::Uint16Le => Some(2),
            DecodeRule::Ipv4Addr => Some(4),
            DecodeRule::HardwareAddr => Some(6),
            DecodeRule::Text => None,
        }
    }
}

/// 字段描述符
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldDescriptor {
    /// 参数选择字节（即请求中的参数号）
    pub selector: u8,
    /// 字段名，同时作为输出键名
    pub name: &'static str,
    /// 期望的响应总字节数（含2字节头部）
    pub length: usize,
    pub rule: DecodeRule,
}

impl FieldDescriptor {
    pub const fn new(selector: u8, name: &'static str, length: usize, rule: DecodeRule) -> Self {
        Self {
            selector,
            name,
            length,
            rule,
        }
    }

    /// 期望的负载字节数
    pub fn payload_len(&self) -> usize {
        self.length.saturating_sub(RESPONSE_HEADER_LEN)
    }
}

/// 原始响应
///
/// 前两个字节是头部，其余是负载
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    data: Bytes,
}

impl RawResponse {
    pub fn new(data: impl Into<Bytes>) -> Self {
        Self { data: data.into() }
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn payload(&self) -> &[u8] {
        self.data.get(RESPONSE_HEADER_LEN..).unwrap_or(&[])
    }
}

/// 解码结果
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum DecodedValue {
    /// 无法从响应中确定（区别于false/0/空串）
    #[default]
    Absent,
    Bool(bool),
    Integer(u64),
    /// 枚举标签
    Label(String),
    /// 格式化后的网络地址或硬件地址
    Address(String),
    /// 自由文本
    Text(String),
    /// 复合标志位，按定义顺序展开
    Flags(Vec<(&'static str, bool)>),
}

impl DecodedValue {
    pub fn is_absent(&self) -> bool {
        matches!(self, DecodedValue::Absent)
    }

    pub fn as_integer(&self) -> Option<u64> {
        match self {
            DecodedValue::Integer(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            DecodedValue::Label(s) | DecodedValue::Address(s) | DecodedValue::Text(s) => {
                Some(s.as_str())
            }
            _ => None,
        }
    }

    /// 查找复合标志位中的某一位
    pub fn flag(&self, name: &str) -> Option<bool> {
        match self {
            DecodedValue::Flags(flags) => flags
                .iter()
                .find(|(flag_name, _)| *flag_name == name)
                .map(|(_, value)| *value),
            _ => None,
        }
    }
}

impl Serialize for DecodedValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            DecodedValue::Absent => serializer.serialize_none(),
            DecodedValue::Bool(b) => serializer.serialize_bool(*b),
            DecodedValue::Integer(v) => serializer.serialize_u64(*v),
            DecodedValue::Label(s) | DecodedValue::Address(s) | DecodedValue::Text(s) => {
                serializer.serialize_str(s)
            }
            DecodedValue::Flags(flags) => {
                let mut map = serializer.serialize_map(Some(flags.len()))?;
                for (name, value) in flags {
                    map.serialize_entry(name, value)?;
                }
                map.end()
            }
        }
    }
}

/// 定长文本缺少结束符时的处理策略
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TextPolicy {
    /// 整个缓冲区都当作文本
    #[default]
    WholeBuffer,
    /// 字段保持缺省
    Absent,
}

impl fmt::Display for TextPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TextPolicy::WholeBuffer => write!(f, "whole-buffer"),
            TextPolicy::Absent => write!(f, "absent"),
        }
    }
}

impl FromStr for TextPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "whole-buffer" | "whole_buffer" | "whole" => Ok(TextPolicy::WholeBuffer),
            "absent" => Ok(TextPolicy::Absent),
            other => Err(format!(
                "invalid text policy: {other} (expected whole-buffer or absent)"
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_response_split() {
        let raw = RawResponse::new(vec![0x11, 0x00, 0xC0, 0xA8, 0x01, 0x01]);
        assert_eq!(raw.len(), 6);
        assert_eq!(raw.payload(), &[0xC0, 0xA8, 0x01, 0x01]);

        // 不足头部长度时负载为空
        let short = RawResponse::new(vec![0x11]);
        assert!(!short.is_empty());
        assert!(short.payload().is_empty());
        assert!(RawResponse::new(Vec::new()).is_empty());
    }

    #[test]
    fn test_descriptor_payload_len() {
        let desc = FieldDescriptor::new(3, "ip", 6, DecodeRule::Ipv4Addr);
        assert_eq!(desc.payload_len(), 4);
        assert_eq!(desc.rule.payload_len(), Some(4));
        assert_eq!(DecodeRule::Text.payload_len(), None);
    }

    #[test]
    fn test_decoded_value_serialize() {
        assert_eq!(
            serde_json::to_value(DecodedValue::Bool(false)).unwrap(),
            serde_json::json!(false)
        );
        assert_eq!(
            serde_json::to_value(DecodedValue::Integer(623)).unwrap(),
            serde_json::json!(623)
        );
        assert_eq!(
            serde_json::to_value(DecodedValue::Address("10.0.0.1".to_string())).unwrap(),
            serde_json::json!("10.0.0.1")
        );
        assert_eq!(
            serde_json::to_value(DecodedValue::Absent).unwrap(),
            serde_json::Value::Null
        );
    }

    #[test]
    fn test_absent_is_not_false() {
        // 缺省与false/0/空串是不同的状态
        assert_ne!(DecodedValue::Absent, DecodedValue::Bool(false));
        assert_ne!(DecodedValue::Absent, DecodedValue::Integer(0));
        assert_ne!(DecodedValue::Absent, DecodedValue::Text(String::new()));
        assert!(DecodedValue::default().is_absent());
        assert_eq!(DecodedValue::Absent.as_integer(), None);
    }

    #[test]
    fn test_flag_lookup() {
        let value = DecodedValue::Flags(vec![("gratuitous_arp", true), ("arp_responses", false)]);
        assert_eq!(value.flag("gratuitous_arp"), Some(true));
        assert_eq!(value.flag("arp_responses"), Some(false));
        assert_eq!(value.flag("dhcp_enable"), None);
    }

    #[test]
    fn test_text_policy_parse() {
        assert_eq!("absent".parse::<TextPolicy>(), Ok(TextPolicy::Absent));
        assert_eq!(
            "whole-buffer".parse::<TextPolicy>(),
            Ok(TextPolicy::WholeBuffer)
        );
        assert!("truncate".parse::<TextPolicy>().is_err());
        assert_eq!(TextPolicy::default(), TextPolicy::WholeBuffer);
    }
}

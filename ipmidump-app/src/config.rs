//! 导出配置
//!
//! 可选的JSON配置文件，命令行参数在其上覆盖

use std::fs;
use std::path::{Path, PathBuf};

use ipmidump_core::TextPolicy;
use ipmidump_decoder::section_assembler::DEFAULT_LAN_CHANNEL;
use serde::{Deserialize, Serialize};

use crate::error::DumpError;

/// IPMI通道号只有4位
pub const MAX_CHANNEL: u8 = 0x0F;

/// 原始响应的来源
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum TransportSource {
    #[default]
    None,
    /// 回放抓包文件
    Capture { path: PathBuf },
    /// 仿真BMC
    Simulate {
        seed: u64,
        #[serde(default)]
        loss_rate: f64,
    },
}

/// 导出配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DumpConfig {
    /// LAN配置所在通道
    pub channel: u8,
    /// 定长文本缺少结束符时的处理
    pub text_policy: TextPolicy,
    /// 单行输出
    pub compact: bool,
    pub source: TransportSource,
}

impl Default for DumpConfig {
    fn default() -> Self {
        Self {
            channel: DEFAULT_LAN_CHANNEL,
            text_policy: TextPolicy::default(),
            compact: false,
            source: TransportSource::None,
        }
    }
}

impl DumpConfig {
    /// 从JSON文件加载配置，缺少的项取默认值
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, DumpError> {
        let text = fs::read_to_string(path)?;
        let config: DumpConfig = serde_json::from_str(&text)?;
        config.validate()?;
        Ok(config)
    }

    /// 检查配置项取值范围
    pub fn validate(&self) -> Result<(), DumpError> {
        if self.channel > MAX_CHANNEL {
            return Err(DumpError::Config(format!(
                "channel {} out of range 0-{}",
                self.channel, MAX_CHANNEL
            )));
        }
        if let TransportSource::Simulate { loss_rate, .. } = self.source {
            if !(0.0..=1.0).contains(&loss_rate) {
                return Err(DumpError::Config(format!(
                    "loss rate {loss_rate} out of range 0.0-1.0"
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = DumpConfig::default();
        assert_eq!(config.channel, 1);
        assert_eq!(config.text_policy, TextPolicy::WholeBuffer);
        assert!(!config.compact);
        assert_eq!(config.source, TransportSource::None);
    }

    #[test]
    fn test_partial_json() {
        let config: DumpConfig = serde_json::from_str(
            r#"{ "text_policy": "absent", "source": { "type": "simulate", "seed": 9 } }"#,
        )
        .unwrap();
        assert_eq!(config.channel, 1);
        assert_eq!(config.text_policy, TextPolicy::Absent);
        assert_eq!(
            config.source,
            TransportSource::Simulate {
                seed: 9,
                loss_rate: 0.0
            }
        );
    }

    #[test]
    fn test_capture_source() {
        let config: DumpConfig = serde_json::from_str(
            r#"{ "channel": 2, "source": { "type": "capture", "path": "bmc.json" } }"#,
        )
        .unwrap();
        assert_eq!(config.channel, 2);
        assert_eq!(
            config.source,
            TransportSource::Capture {
                path: PathBuf::from("bmc.json")
            }
        );
    }

    #[test]
    fn test_unknown_key_rejected() {
        let result: Result<DumpConfig, _> = serde_json::from_str(r#"{ "chanel": 2 }"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_validate() {
        let mut config = DumpConfig {
            channel: 16,
            ..DumpConfig::default()
        };
        assert!(matches!(config.validate(), Err(DumpError::Config(_))));

        config.channel = 15;
        assert!(config.validate().is_ok());

        config.source = TransportSource::Simulate {
            seed: 0,
            loss_rate: 1.5,
        };
        assert!(matches!(config.validate(), Err(DumpError::Config(_))));
    }
}

//! 分段结果数据结构

use ipmidump_core::DecodedValue;
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

/// 当前电源状态
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CurrentPowerState {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub power_restore_policy: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub power_status: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub power_control_fault: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub power_fault: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub power_interlock: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub power_overload: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_power_event: Option<String>,
}

/// 机箱杂项状态
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ChassisState {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chassis_intrusion: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub front_panel_lockout: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub drive_fault: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fan_fault: Option<bool>,
}

/// 前面板按钮
///
/// 整组要么全部确定，要么整组缺省
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct FrontPanelButton {
    pub poweroff_button: bool,
    pub reset_button: bool,
    pub diagnostic_button: bool,
    pub standby_button: bool,
    pub poweroff_button_disable: bool,
    pub reset_button_disable: bool,
    pub diagnostic_button_disable: bool,
    pub standby_button_disable: bool,
}

/// 设备标识
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DeviceIdentity {
    pub device_id: u8,
    pub device_revision: u8,
    pub firmware_revision: String,
    pub ipmi_version: String,
    pub manufacturer_id: u32,
    pub product_id: u16,
    pub device_available: bool,
    pub provides_device_sdrs: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub additional_device_support: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aux_firmware_revision_info: Option<u32>,
}

/// 单个LAN字段
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LanEntry {
    pub name: &'static str,
    pub value: DecodedValue,
}

/// LAN配置
///
/// 按字段表顺序保存，序列化时跳过缺省字段并展开复合标志位
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LanConfig {
    entries: Vec<LanEntry>,
}

static ABSENT: DecodedValue = DecodedValue::Absent;

impl LanConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// 设置字段值，已存在时覆盖
    pub fn set(&mut self, name: &'static str, value: DecodedValue) {
        match self.entries.iter_mut().find(|entry| entry.name == name) {
            Some(entry) => entry.value = value,
            None => self.entries.push(LanEntry { name, value }),
        }
    }

    /// 获取字段值，未设置的字段返回缺省
    pub fn get(&self, name: &str) -> &DecodedValue {
        self.entries
            .iter()
            .find(|entry| entry.name == name)
            .map(|entry| &entry.value)
            .unwrap_or(&ABSENT)
    }

    /// 在所有复合标志位字段中查找指定标志
    pub fn flag(&self, flag_name: &str) -> Option<bool> {
        self.entries
            .iter()
            .find_map(|entry| entry.value.flag(flag_name))
    }

    pub fn entries(&self) -> &[LanEntry] {
        &self.entries
    }

    /// 已确定（非缺省）的字段数
    pub fn present_count(&self) -> usize {
        self.entries
            .iter()
            .filter(|entry| !entry.value.is_absent())
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.present_count() == 0
    }
}

impl Serialize for LanConfig {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        for entry in &self.entries {
            match &entry.value {
                DecodedValue::Absent => {}
                DecodedValue::Flags(flags) => {
                    for (name, value) in flags {
                        map.serialize_entry(name, value)?;
                    }
                }
                value => map.serialize_entry(entry.name, value)?,
            }
        }
        map.end()
    }
}

/// 完整的结构化记录
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StructuredRecord {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_power_state: Option<CurrentPowerState>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chassis_state: Option<ChassisState>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub device_id: Option<DeviceIdentity>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub front_panel_button: Option<FrontPanelButton>,
    pub lan: LanConfig,
}

impl StructuredRecord {
    pub fn new() -> Self {
        Self::default()
    }
}

/// 单段统计
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SectionStats {
    /// 成功解码
    pub decoded: u64,
    /// 收到响应但未解码（长度不符、越界等）
    pub skipped: u64,
    /// 传输失败
    pub failed: u64,
}

/// 组装统计信息
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AssembleStats {
    pub chassis: SectionStats,
    pub device: SectionStats,
    pub lan: SectionStats,
}

impl AssembleStats {
    pub fn total(&self) -> SectionStats {
        SectionStats {
            decoded: self.chassis.decoded + self.device.decoded + self.lan.decoded,
            skipped: self.chassis.skipped + self.device.skipped + self.lan.skipped,
            failed: self.chassis.failed + self.device.failed + self.lan.failed,
        }
    }
}

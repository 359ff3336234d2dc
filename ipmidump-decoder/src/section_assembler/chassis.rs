//! 机箱状态解码
//!
//! Get Chassis Status 负载布局：
//! - 字节0：当前电源状态
//! - 字节1：上次电源事件
//! - 字节2：机箱杂项状态
//! - 字节3：前面板按钮（可选）

use ipmidump_core::code_tables::{self, LAST_POWER_EVENT, RESTORE_POLICY};
use ipmidump_core::DecodeError;

use super::section_data::{ChassisState, CurrentPowerState, FrontPanelButton};
use crate::record_decoder::{extract_range, test_bit, FieldValidator};

pub const CHASSIS_STATUS_MIN_LEN: usize = 3;

// 电源状态字节
pub const RESTORE_POLICY_MASK: u8 = 0x60;
pub const RESTORE_POLICY_SHIFT: u32 = 5;
pub const POWER_CONTROL_FAULT: u8 = 0x10;
pub const POWER_FAULT: u8 = 0x08;
pub const POWER_INTERLOCK: u8 = 0x04;
pub const POWER_OVERLOAD: u8 = 0x02;
pub const POWER_STATUS: u8 = 0x01;

pub const LAST_POWER_EVENT_MASK: u8 = 0x1F;

// 机箱杂项状态字节
pub const FAN_FAULT: u8 = 0x08;
pub const DRIVE_FAULT: u8 = 0x04;
pub const FRONT_PANEL_LOCKOUT: u8 = 0x02;
pub const CHASSIS_INTRUSION: u8 = 0x01;

// 前面板按钮字节：低4位按下，高4位禁用
pub const POWEROFF_BUTTON: u8 = 0x01;
pub const RESET_BUTTON: u8 = 0x02;
pub const DIAGNOSTIC_BUTTON: u8 = 0x04;
pub const STANDBY_BUTTON: u8 = 0x08;
pub const POWEROFF_BUTTON_DISABLE: u8 = 0x10;
pub const RESET_BUTTON_DISABLE: u8 = 0x20;
pub const DIAGNOSTIC_BUTTON_DISABLE: u8 = 0x40;
pub const STANDBY_BUTTON_DISABLE: u8 = 0x80;

/// 机箱状态解码结果
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChassisStatus {
    pub power: CurrentPowerState,
    pub chassis: ChassisState,
    pub front_panel: Option<FrontPanelButton>,
}

/// 解码电源状态字节（不含上次电源事件）
pub fn decode_power_state(byte: u8) -> CurrentPowerState {
    let policy = extract_range(byte, RESTORE_POLICY_MASK, RESTORE_POLICY_SHIFT);
    CurrentPowerState {
        power_restore_policy: code_tables::lookup(RESTORE_POLICY, policy).map(str::to_string),
        power_status: Some(test_bit(byte, POWER_STATUS)),
        power_control_fault: Some(test_bit(byte, POWER_CONTROL_FAULT)),
        power_fault: Some(test_bit(byte, POWER_FAULT)),
        power_interlock: Some(test_bit(byte, POWER_INTERLOCK)),
        power_overload: Some(test_bit(byte, POWER_OVERLOAD)),
        last_power_event: None,
    }
}

/// 解码上次电源事件，不在事件表中的编码返回错误
pub fn decode_last_power_event(byte: u8) -> Result<&'static str, DecodeError> {
    let code = extract_range(byte, LAST_POWER_EVENT_MASK, 0);
    code_tables::lookup(LAST_POWER_EVENT, code).ok_or(DecodeError::UnknownCode {
        field: "last_power_event",
        code,
    })
}

/// 解码机箱杂项状态字节
pub fn decode_misc_chassis_state(byte: u8) -> ChassisState {
    ChassisState {
        chassis_intrusion: Some(test_bit(byte, CHASSIS_INTRUSION)),
        front_panel_lockout: Some(test_bit(byte, FRONT_PANEL_LOCKOUT)),
        drive_fault: Some(test_bit(byte, DRIVE_FAULT)),
        fan_fault: Some(test_bit(byte, FAN_FAULT)),
    }
}

/// 前面板按钮的条件解码
///
/// 字节缺失或整字节为0时整组缺省，而不是全部为false
pub fn decode_front_panel_button(byte: Option<u8>) -> Option<FrontPanelButton> {
    let byte = byte.filter(|&b| b != 0)?;
    Some(FrontPanelButton {
        poweroff_button: test_bit(byte, POWEROFF_BUTTON),
        reset_button: test_bit(byte, RESET_BUTTON),
        diagnostic_button: test_bit(byte, DIAGNOSTIC_BUTTON),
        standby_button: test_bit(byte, STANDBY_BUTTON),
        poweroff_button_disable: test_bit(byte, POWEROFF_BUTTON_DISABLE),
        reset_button_disable: test_bit(byte, RESET_BUTTON_DISABLE),
        diagnostic_button_disable: test_bit(byte, DIAGNOSTIC_BUTTON_DISABLE),
        standby_button_disable: test_bit(byte, STANDBY_BUTTON_DISABLE),
    })
}

/// 解码完整的 Get Chassis Status 负载
///
/// 上次电源事件编码未知时该字段缺省，其余字段照常解码
pub fn decode_chassis_status(payload: &[u8]) -> Result<ChassisStatus, DecodeError> {
    FieldValidator::validate_min_length("chassis_status", payload, CHASSIS_STATUS_MIN_LEN)?;

    let mut power = decode_power_state(payload[0]);
    power.last_power_event = match decode_last_power_event(payload[1]) {
        Ok(label) => Some(label.to_string()),
        Err(err) => {
            tracing::debug!(error = %err, "last power event left absent");
            None
        }
    };

    Ok(ChassisStatus {
        power,
        chassis: decode_misc_chassis_state(payload[2]),
        front_panel: decode_front_panel_button(payload.get(3).copied()),
    })
}

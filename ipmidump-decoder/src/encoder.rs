//! 响应编码器
//!
//! 解码的逆过程：由字段值生成BMC原始响应，供仿真BMC和测试使用

use ipmidump_core::code_tables::{self, ADDITIONAL_DEVICE_SUPPORT, LAST_POWER_EVENT, RESTORE_POLICY};
use ipmidump_core::utils::{addr, byte_order};
use ipmidump_core::{DecodeRule, DecodedValue, FieldDescriptor};

use crate::record_decoder::bit_extractor::{apply_flag, insert_range};
use crate::section_assembler::chassis::*;
use crate::section_assembler::device::{
    DEVICE_ID_FULL_LEN, DEVICE_UNAVAILABLE, FIRMWARE_MAJOR_MASK, PROVIDES_SDRS,
};
use crate::section_assembler::{ChassisState, CurrentPowerState, DeviceIdentity, FrontPanelButton};

/// LAN配置响应的固定头部：完成码0，参数版本0x11
pub const LAN_RESPONSE_HEADER: [u8; 2] = [0x00, 0x11];

/// 按字段定义编码一条LAN配置响应
///
/// # 参数
/// - `descriptor`: 字段定义
/// - `value`: 字段值，类型须与解码规则一致
///
/// # 返回
/// - `Some(Vec<u8>)`: 含头部的完整响应，长度等于 `descriptor.length`
/// - `None`: 缺省值、类型不符或超出字段表示范围
pub fn encode_field(descriptor: &FieldDescriptor, value: &DecodedValue) -> Option<Vec<u8>> {
    let payload_len = descriptor.payload_len();

    let payload = match (descriptor.rule, value) {
        (DecodeRule::Integer, DecodedValue::Integer(v)) => vec![u8::try_from(*v).ok()?],
        (DecodeRule::Uint16Le, DecodedValue::Integer(v)) => {
            byte_order::write_le(u64::from(u16::try_from(*v).ok()?), 2)
        }
        (DecodeRule::Ipv4Addr, DecodedValue::Address(text)) => addr::parse_ipv4(text)?.to_vec(),
        (DecodeRule::HardwareAddr, DecodedValue::Address(text)) => {
            addr::parse_hardware_addr(text)?.to_vec()
        }
        (DecodeRule::Enumerated(labels), DecodedValue::Label(label)) => {
            let index = labels.iter().position(|l| l == label)?;
            vec![u8::try_from(index).ok()?]
        }
        (DecodeRule::Flags(bits), DecodedValue::Flags(flags)) => {
            let byte = bits.iter().try_fold(0u8, |byte, bit| {
                let (_, set) = flags.iter().find(|(name, _)| *name == bit.name)?;
                Some(apply_flag(byte, bit.mask, *set))
            })?;
            vec![byte]
        }
        (DecodeRule::Text, DecodedValue::Text(text)) => {
            let bytes = text.as_bytes();
            if bytes.len() > payload_len || bytes.contains(&0) {
                return None;
            }
            let mut buf = bytes.to_vec();
            buf.resize(payload_len, 0);
            buf
        }
        _ => return None,
    };

    if payload.len() != payload_len {
        return None;
    }

    let mut response = LAN_RESPONSE_HEADER.to_vec();
    response.extend_from_slice(&payload);
    Some(response)
}

/// 编码 Get Chassis Status 负载
///
/// 未知的策略或事件标签按0编码；前面板按钮缺省时写0
pub fn encode_chassis_status(
    power: &CurrentPowerState,
    chassis: &ChassisState,
    front_panel: Option<&FrontPanelButton>,
) -> Vec<u8> {
    let policy = power
        .power_restore_policy
        .as_deref()
        .and_then(|label| code_tables::reverse_lookup(RESTORE_POLICY, label))
        .unwrap_or(0);

    let mut state = insert_range(0, policy, RESTORE_POLICY_MASK, RESTORE_POLICY_SHIFT);
    for (mask, flag) in [
        (POWER_STATUS, power.power_status),
        (POWER_CONTROL_FAULT, power.power_control_fault),
        (POWER_FAULT, power.power_fault),
        (POWER_INTERLOCK, power.power_interlock),
        (POWER_OVERLOAD, power.power_overload),
    ] {
        state = apply_flag(state, mask, flag.unwrap_or(false));
    }

    let event = power
        .last_power_event
        .as_deref()
        .and_then(|label| code_tables::reverse_lookup(LAST_POWER_EVENT, label))
        .unwrap_or(0);

    let mut misc = 0u8;
    for (mask, flag) in [
        (CHASSIS_INTRUSION, chassis.chassis_intrusion),
        (FRONT_PANEL_LOCKOUT, chassis.front_panel_lockout),
        (DRIVE_FAULT, chassis.drive_fault),
        (FAN_FAULT, chassis.fan_fault),
    ] {
        misc = apply_flag(misc, mask, flag.unwrap_or(false));
    }

    let buttons = front_panel.map_or(0, |panel| {
        [
            (POWEROFF_BUTTON, panel.poweroff_button),
            (RESET_BUTTON, panel.reset_button),
            (DIAGNOSTIC_BUTTON, panel.diagnostic_button),
            (STANDBY_BUTTON, panel.standby_button),
            (POWEROFF_BUTTON_DISABLE, panel.poweroff_button_disable),
            (RESET_BUTTON_DISABLE, panel.reset_button_disable),
            (DIAGNOSTIC_BUTTON_DISABLE, panel.diagnostic_button_disable),
            (STANDBY_BUTTON_DISABLE, panel.standby_button_disable),
        ]
        .into_iter()
        .fold(0u8, |byte, (mask, set)| apply_flag(byte, mask, set))
    });

    vec![state, event, misc, buttons]
}

/// 解析 "<主版本十进制>.<次版本十六进制>"
fn parse_firmware_revision(text: &str) -> Option<(u8, u8)> {
    let (major, minor) = text.split_once('.')?;
    let major: u8 = major.parse().ok()?;
    if major > FIRMWARE_MAJOR_MASK {
        return None;
    }
    Some((major, u8::from_str_radix(minor, 16).ok()?))
}

/// 解析 "<低4位>.<高4位>"
fn parse_ipmi_version(text: &str) -> Option<u8> {
    let (low, high) = text.split_once('.')?;
    let low = u8::from_str_radix(low, 16).ok()?;
    let high = u8::from_str_radix(high, 16).ok()?;
    if low > 0x0F || high > 0x0F {
        return None;
    }
    Some(insert_range(low, high, 0xF0, 4))
}

/// 编码 Get Device ID 负载（固定带辅助固件版本时为15字节）
pub fn encode_device_id(device: &DeviceIdentity) -> Option<Vec<u8>> {
    if device.device_revision > 0x0F || device.manufacturer_id > 0x00FF_FFFF {
        return None;
    }
    let (major, minor) = parse_firmware_revision(&device.firmware_revision)?;

    let support = device
        .additional_device_support
        .iter()
        .try_fold(0u8, |bitmap, label| {
            let bit = ADDITIONAL_DEVICE_SUPPORT.iter().position(|l| l == label)?;
            Some(bitmap | (1u8 << bit))
        })?;

    let mut payload = Vec::with_capacity(DEVICE_ID_FULL_LEN);
    payload.push(device.device_id);
    payload.push(apply_flag(
        device.device_revision,
        PROVIDES_SDRS,
        device.provides_device_sdrs,
    ));
    payload.push(apply_flag(major, DEVICE_UNAVAILABLE, !device.device_available));
    payload.push(minor);
    payload.push(parse_ipmi_version(&device.ipmi_version)?);
    payload.push(support);
    payload.extend(byte_order::write_le(u64::from(device.manufacturer_id), 3));
    payload.extend(byte_order::write_le(u64::from(device.product_id), 2));
    if let Some(aux) = device.aux_firmware_revision_info {
        payload.extend(byte_order::write_le(u64::from(aux), 4));
    }
    Some(payload)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field_schema::find_field;

    #[test]
    fn test_encode_ipv4_field() {
        let desc = find_field("ip").unwrap();
        let raw = encode_field(desc, &DecodedValue::Address("192.168.1.20".to_string())).unwrap();
        assert_eq!(raw, vec![0x00, 0x11, 192, 168, 1, 20]);
        assert_eq!(raw.len(), desc.length);
    }

    #[test]
    fn test_encode_rejects_wrong_kind() {
        let desc = find_field("rmcp_port").unwrap();
        assert_eq!(encode_field(desc, &DecodedValue::Absent), None);
        assert_eq!(encode_field(desc, &DecodedValue::Text("623".into())), None);
        // 超出16位
        assert_eq!(encode_field(desc, &DecodedValue::Integer(70000)), None);
    }

    #[test]
    fn test_encode_text_pads_with_zero() {
        let desc = find_field("snmp_community_string").unwrap();
        let raw = encode_field(desc, &DecodedValue::Text("public".into())).unwrap();
        assert_eq!(raw.len(), 20);
        assert_eq!(&raw[2..8], b"public");
        assert!(raw[8..].iter().all(|&b| b == 0));

        // 超长文本无法编码
        let long = "x".repeat(19);
        assert_eq!(encode_field(desc, &DecodedValue::Text(long)), None);
    }

    #[test]
    fn test_encode_flags() {
        let desc = find_field("arp_settings").unwrap();
        let raw = encode_field(
            desc,
            &DecodedValue::Flags(vec![("gratuitous_arp", true), ("arp_responses", true)]),
        )
        .unwrap();
        assert_eq!(raw, vec![0x00, 0x11, 0x03]);
    }

    #[test]
    fn test_encode_chassis_status() {
        let power = CurrentPowerState {
            power_restore_policy: Some("always-on".into()),
            power_status: Some(true),
            power_fault: Some(true),
            last_power_event: Some("power overload".into()),
            ..Default::default()
        };
        let chassis = ChassisState {
            drive_fault: Some(true),
            ..Default::default()
        };
        let panel = FrontPanelButton {
            standby_button_disable: true,
            ..Default::default()
        };

        let payload = encode_chassis_status(&power, &chassis, Some(&panel));
        assert_eq!(payload, vec![0x49, 0x02, 0x04, 0x80]);

        let payload = encode_chassis_status(&power, &chassis, None);
        assert_eq!(payload[3], 0x00);
    }

    #[test]
    fn test_encode_device_id() {
        let device = DeviceIdentity {
            device_id: 0x20,
            device_revision: 1,
            firmware_revision: "2.05".into(),
            ipmi_version: "1.5".into(),
            manufacturer_id: 0x030201,
            product_id: 0x1234,
            device_available: true,
            provides_device_sdrs: true,
            additional_device_support: vec!["Sensor Device".into(), "Chassis Device".into()],
            aux_firmware_revision_info: None,
        };
        let payload = encode_device_id(&device).unwrap();
        assert_eq!(
            payload,
            vec![0x20, 0x81, 0x02, 0x05, 0x51, 0x81, 0x01, 0x02, 0x03, 0x34, 0x12]
        );

        // 无法识别的设备类型
        let mut bad = device.clone();
        bad.additional_device_support.push("Toaster".into());
        assert_eq!(encode_device_id(&bad), None);
    }
}

//! 设备标识解码
//!
//! Get Device ID 负载布局：
//! - 字节0：设备ID
//! - 字节1：bit7 提供SDR，bit[3:0] 设备版本
//! - 字节2：bit7 设备不可用，bit[6:0] 固件主版本
//! - 字节3：固件次版本（BCD）
//! - 字节4：IPMI版本，低4位主版本，高4位次版本
//! - 字节5：附加设备支持位图
//! - 字节6-8：厂商ID（小端）
//! - 字节9-10：产品ID（小端）
//! - 字节11-14：辅助固件版本（可选）

use ipmidump_core::code_tables::ADDITIONAL_DEVICE_SUPPORT;
use ipmidump_core::utils::byte_order;
use ipmidump_core::DecodeError;

use super::section_data::DeviceIdentity;
use crate::record_decoder::bit_extractor::{read_array, set_bit_positions};
use crate::record_decoder::{extract_range, test_bit, FieldValidator};

pub const DEVICE_ID_MIN_LEN: usize = 11;
pub const DEVICE_ID_FULL_LEN: usize = 15;

pub const DEVICE_REVISION_MASK: u8 = 0x0F;
pub const PROVIDES_SDRS: u8 = 0x80;
pub const DEVICE_UNAVAILABLE: u8 = 0x80;
pub const FIRMWARE_MAJOR_MASK: u8 = 0x3F;

/// 固件版本："<主版本6位>.<次版本两位十六进制>"
pub fn format_firmware_revision(rev1: u8, rev2: u8) -> String {
    format!("{}.{:02x}", extract_range(rev1, FIRMWARE_MAJOR_MASK, 0), rev2)
}

/// IPMI版本："<低4位>.<高4位>"
pub fn format_ipmi_version(version: u8) -> String {
    format!(
        "{:x}.{:x}",
        extract_range(version, 0x0F, 0),
        extract_range(version, 0xF0, 4)
    )
}

/// 按bit 0到bit 7的顺序列出支持的设备类型
pub fn additional_device_support(bitmap: u8) -> Vec<String> {
    set_bit_positions(bitmap)
        .map(|bit| ADDITIONAL_DEVICE_SUPPORT[bit].to_string())
        .collect()
}

/// 解码完整的 Get Device ID 负载
pub fn decode_device_id(payload: &[u8]) -> Result<DeviceIdentity, DecodeError> {
    FieldValidator::validate_min_length("device_id", payload, DEVICE_ID_MIN_LEN)?;

    let manufacturer = read_array::<3>(payload, 6).unwrap_or_default();
    let product = read_array::<2>(payload, 9).unwrap_or_default();

    Ok(DeviceIdentity {
        device_id: payload[0],
        device_revision: extract_range(payload[1], DEVICE_REVISION_MASK, 0),
        firmware_revision: format_firmware_revision(payload[2], payload[3]),
        ipmi_version: format_ipmi_version(payload[4]),
        manufacturer_id: byte_order::read_u24_le(manufacturer),
        product_id: byte_order::read_u16_le(product),
        device_available: !test_bit(payload[2], DEVICE_UNAVAILABLE),
        provides_device_sdrs: test_bit(payload[1], PROVIDES_SDRS),
        additional_device_support: additional_device_support(payload[5]),
        aux_firmware_revision_info: read_array::<4>(payload, 11).map(byte_order::read_u32_le),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_payload() -> Vec<u8> {
        vec![
            0x20, // 设备ID
            0x81, // 提供SDR，版本1
            0x02, // 可用，固件主版本2
            0x05, // 固件次版本
            0x51, // IPMI 1.5
            0x8F, // 附加设备支持
            0x01, 0x02, 0x03, // 厂商ID
            0x34, 0x12, // 产品ID
            0x78, 0x56, 0x34, 0x12, // 辅助固件版本
        ]
    }

    #[test]
    fn test_decode_device_id() {
        let device = decode_device_id(&sample_payload()).unwrap();
        assert_eq!(device.device_id, 0x20);
        assert_eq!(device.device_revision, 1);
        assert_eq!(device.firmware_revision, "2.05");
        assert_eq!(device.ipmi_version, "1.5");
        assert_eq!(device.manufacturer_id, 0x030201);
        assert_eq!(device.product_id, 0x1234);
        assert!(device.device_available);
        assert!(device.provides_device_sdrs);
        assert_eq!(
            device.additional_device_support,
            vec![
                "Sensor Device",
                "SDR Repository Device",
                "SEL Device",
                "FRU Inventory Device",
                "Chassis Device"
            ]
        );
        assert_eq!(device.aux_firmware_revision_info, Some(0x12345678));
    }

    #[test]
    fn test_device_unavailable_bit() {
        let mut payload = sample_payload();
        payload[1] = 0x0F;
        payload[2] = 0x82;
        let device = decode_device_id(&payload).unwrap();
        assert!(!device.device_available);
        assert!(!device.provides_device_sdrs);
        assert_eq!(device.device_revision, 0x0F);
        // 不可用位不进入主版本号
        assert_eq!(device.firmware_revision, "2.05");
    }

    #[test]
    fn test_firmware_revision_format() {
        assert_eq!(format_firmware_revision(0x02, 0x05), "2.05");
        assert_eq!(format_firmware_revision(0x3F, 0xAB), "63.ab");
        assert_eq!(format_firmware_revision(0xC1, 0x10), "1.10");
    }

    #[test]
    fn test_ipmi_version_format() {
        assert_eq!(format_ipmi_version(0x02), "2.0");
        assert_eq!(format_ipmi_version(0x51), "1.5");
    }

    #[test]
    fn test_device_support_bit_order() {
        assert_eq!(additional_device_support(0x01), vec!["Sensor Device"]);
        assert_eq!(additional_device_support(0x80), vec!["Chassis Device"]);
        assert_eq!(
            additional_device_support(0x41),
            vec!["Sensor Device", "Bridge"]
        );
        assert!(additional_device_support(0x00).is_empty());
    }

    #[test]
    fn test_without_aux_revision() {
        let payload = sample_payload();
        let device = decode_device_id(&payload[..DEVICE_ID_MIN_LEN]).unwrap();
        assert_eq!(device.aux_firmware_revision_info, None);
        assert_eq!(device.product_id, 0x1234);
    }

    #[test]
    fn test_short_payload() {
        let payload = sample_payload();
        assert_eq!(
            decode_device_id(&payload[..10]),
            Err(DecodeError::LengthMismatch {
                field: "device_id",
                expected: DEVICE_ID_MIN_LEN,
                actual: 10
            })
        );
    }
}

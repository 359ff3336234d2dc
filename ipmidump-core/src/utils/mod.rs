//! 工具模块
//!
//! 提供字节序组装、地址格式化等常用工具函数

use std::net::Ipv4Addr;

/// 将字节数组转换为十六进制字符串
pub fn bytes_to_hex(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|b| format!("{:02X}", b))
        .collect::<Vec<_>>()
        .join(" ")
}

/// 小端字节序工具
pub mod byte_order {
    /// 按小端组装任意长度（最多8字节）的整数
    pub fn read_le(bytes: &[u8]) -> u64 {
        bytes
            .iter()
            .take(8)
            .enumerate()
            .fold(0u64, |acc, (i, &b)| acc | ((b as u64) << (8 * i)))
    }

    pub fn read_u16_le(bytes: [u8; 2]) -> u16 {
        u16::from_le_bytes(bytes)
    }

    /// 3字节厂商ID：byte0 | byte1<<8 | byte2<<16
    pub fn read_u24_le(bytes: [u8; 3]) -> u32 {
        read_le(&bytes) as u32
    }

    pub fn read_u32_le(bytes: [u8; 4]) -> u32 {
        u32::from_le_bytes(bytes)
    }

    /// 将整数写成指定长度的小端字节
    pub fn write_le(value: u64, size: usize) -> Vec<u8> {
        (0..size).map(|i| ((value >> (8 * i)) & 0xFF) as u8).collect()
    }
}

/// 地址格式化工具
pub mod addr {
    use super::Ipv4Addr;

    /// 4字节点分十进制
    pub fn format_ipv4(bytes: [u8; 4]) -> String {
        Ipv4Addr::from(bytes).to_string()
    }

    /// 6字节硬件地址，小写十六进制冒号分隔
    pub fn format_hardware_addr(bytes: &[u8]) -> String {
        bytes
            .iter()
            .map(|b| format!("{:02x}", b))
            .collect::<Vec<_>>()
            .join(":")
    }

    pub fn parse_ipv4(text: &str) -> Option<[u8; 4]> {
        text.parse::<Ipv4Addr>().ok().map(|ip| ip.octets())
    }

    pub fn parse_hardware_addr(text: &str) -> Option<[u8; 6]> {
        let mut out = [0u8; 6];
        let mut parts = text.split(':');
        for slot in out.iter_mut() {
            let part = parts.next()?;
            if part.len() != 2 {
                return None;
            }
            *slot = u8::from_str_radix(part, 16).ok()?;
        }
        if parts.next().is_some() {
            return None;
        }
        Some(out)
    }
}

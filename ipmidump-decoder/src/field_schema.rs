//! LAN配置字段表
//!
//! 32个参数槽位（参数选择字节0-31），顺序即请求顺序。
//! 空槽位不发请求也不产生输出。

use ipmidump_core::code_tables::{IP_ADDRESS_SOURCE, SET_IN_PROGRESS};
use ipmidump_core::{DecodeRule, FieldDescriptor, FlagBit};

/// ARP设置：bit0免费ARP，bit1 ARP应答
pub const ARP_SETTINGS_FLAGS: &[FlagBit] = &[
    FlagBit {
        name: "gratuitous_arp",
        mask: 0x01,
    },
    FlagBit {
        name: "arp_responses",
        mask: 0x02,
    },
];

/// DHCP使能：bit0
pub const DHCP_ENABLE_FLAGS: &[FlagBit] = &[FlagBit {
    name: "dhcp_enable",
    mask: 0x01,
}];

const fn field(selector: u8, name: &'static str, length: usize, rule: DecodeRule) -> Option<FieldDescriptor> {
    Some(FieldDescriptor::new(selector, name, length, rule))
}

/// LAN配置参数表
pub static LAN_SCHEMA: [Option<FieldDescriptor>; 32] = [
    field(0, "set_in_progress", 3, DecodeRule::Enumerated(SET_IN_PROGRESS)),
    None,
    None,
    field(3, "ip", 6, DecodeRule::Ipv4Addr),
    field(4, "ip_address_source", 3, DecodeRule::Enumerated(IP_ADDRESS_SOURCE)),
    field(5, "mac", 8, DecodeRule::HardwareAddr),
    field(6, "netmask", 6, DecodeRule::Ipv4Addr),
    None,
    field(8, "rmcp_port", 4, DecodeRule::Uint16Le),
    field(9, "rmcp_port_alt", 4, DecodeRule::Uint16Le),
    field(10, "arp_settings", 3, DecodeRule::Flags(ARP_SETTINGS_FLAGS)),
    field(11, "arp_interval", 3, DecodeRule::Integer),
    field(12, "default_gw_ip", 6, DecodeRule::Ipv4Addr),
    field(13, "default_gw_mac", 8, DecodeRule::HardwareAddr),
    field(14, "backup_default_gw_ip", 6, DecodeRule::Ipv4Addr),
    field(15, "backup_default_gw_mac", 8, DecodeRule::HardwareAddr),
    field(16, "snmp_community_string", 20, DecodeRule::Text),
    None,
    None,
    None,
    field(20, "vlan_id", 4, DecodeRule::Uint16Le),
    field(21, "vlan_priority", 3, DecodeRule::Integer),
    None,
    None,
    None,
    None,
    None,
    None,
    None,
    field(29, "dhcp_server_ip", 6, DecodeRule::Ipv4Addr),
    field(30, "dhcp_server_mac", 8, DecodeRule::HardwareAddr),
    field(31, "dhcp_enable", 3, DecodeRule::Flags(DHCP_ENABLE_FLAGS)),
];

/// 按请求顺序列出所有有效字段
pub fn lan_fields() -> impl Iterator<Item = &'static FieldDescriptor> {
    LAN_SCHEMA.iter().flatten()
}

/// 按字段名查找
pub fn find_field(name: &str) -> Option<&'static FieldDescriptor> {
    lan_fields().find(|field| field.name == name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_selector_matches_slot() {
        for (slot, entry) in LAN_SCHEMA.iter().enumerate() {
            if let Some(field) = entry {
                assert_eq!(field.selector as usize, slot, "{}", field.name);
            }
        }
    }

    #[test]
    fn test_named_slots() {
        assert_eq!(lan_fields().count(), 19);
        let blank: Vec<usize> = LAN_SCHEMA
            .iter()
            .enumerate()
            .filter(|(_, entry)| entry.is_none())
            .map(|(slot, _)| slot)
            .collect();
        assert_eq!(blank, vec![1, 2, 7, 17, 18, 19, 22, 23, 24, 25, 26, 27, 28]);
    }

    #[test]
    fn test_unique_names() {
        let names: HashSet<&str> = lan_fields().map(|field| field.name).collect();
        assert_eq!(names.len(), lan_fields().count());
    }

    #[test]
    fn test_length_matches_rule() {
        // 每个字段的长度都与规则的负载宽度一致
        for field in lan_fields() {
            assert!(matches!(field.length, 3 | 4 | 6 | 8 | 20), "{}", field.name);
            if let Some(payload_len) = field.rule.payload_len() {
                assert_eq!(field.payload_len(), payload_len, "{}", field.name);
            }
        }
    }

    #[test]
    fn test_find_field() {
        let field = find_field("snmp_community_string").unwrap();
        assert_eq!(field.selector, 16);
        assert_eq!(field.length, 20);
        assert!(find_field("reserved").is_none());
    }
}

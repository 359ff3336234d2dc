//! 代码表模块
//!
//! 编码到显示标签的静态映射

/// 电源恢复策略（2位编码）
pub const RESTORE_POLICY: &[(u8, &str)] = &[
    (0x0, "always-off"),
    (0x1, "previous"),
    (0x2, "always-on"),
    (0x3, "unknown"),
];

/// 上次电源事件（5位编码）
pub const LAST_POWER_EVENT: &[(u8, &str)] = &[
    (0x10, "IPMI command"),
    (0x08, "power fault"),
    (0x04, "power interlock"),
    (0x02, "power overload"),
    (0x01, "AC failed"),
    (0x00, "none"),
];

/// LAN参数 "Set In Progress" 的状态标签
pub const SET_IN_PROGRESS: &[&str] = &[
    "Set Complete",
    "Set In Progress",
    "Commit Write",
    "Reserved",
];

/// LAN参数 "IP Address Source" 的来源标签
pub const IP_ADDRESS_SOURCE: &[&str] = &[
    "Unspecified",
    "Static Address",
    "DHCP Address",
    "BIOS Assigned Address",
];

/// 附加设备支持，下标即bit位（bit 0 = Sensor Device）
pub const ADDITIONAL_DEVICE_SUPPORT: [&str; 8] = [
    "Sensor Device",
    "SDR Repository Device",
    "SEL Device",
    "FRU Inventory Device",
    "IPMB Event Receiver",
    "IPMB Event Generator",
    "Bridge",
    "Chassis Device",
];

/// 在扁平代码表中查找标签
pub fn lookup(table: &[(u8, &'static str)], code: u8) -> Option<&'static str> {
    table
        .iter()
        .find(|(entry_code, _)| *entry_code == code)
        .map(|(_, label)| *label)
}

/// 反查：标签到编码
pub fn reverse_lookup(table: &[(u8, &'static str)], label: &str) -> Option<u8> {
    table
        .iter()
        .find(|(_, entry_label)| *entry_label == label)
        .map(|(code, _)| *code)
}

/// 按下标取字段专属标签，越界返回None
pub fn label_at(labels: &[&'static str], index: usize) -> Option<&'static str> {
    labels.get(index).copied()
}

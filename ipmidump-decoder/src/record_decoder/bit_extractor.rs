//! Bit字段提取器
//!
//! 提供单bit测试、多bit子字段提取以及定长字节片读取。
//! 掩码和移位由调用方按协议规定给出，这里不做合法性检查。

/// 测试标志位
///
/// 当且仅当 `value & mask != 0` 时返回true
///
/// # 示例
/// ```
/// use ipmidump_decoder::record_decoder::test_bit;
///
/// // 电源状态字节bit0：系统上电
/// assert!(test_bit(0x21, 0x01));
/// assert!(!test_bit(0x21, 0x02));
/// ```
pub fn test_bit(value: u8, mask: u8) -> bool {
    value & mask != 0
}

/// 提取多bit子字段
///
/// 返回 `(value & mask) >> shift`
///
/// # 示例
/// ```
/// use ipmidump_decoder::record_decoder::extract_range;
///
/// // 电源恢复策略：bit[6:5]
/// assert_eq!(extract_range(0x41, 0x60, 5), 0x02);
/// ```
pub fn extract_range(value: u8, mask: u8, shift: u32) -> u8 {
    (value & mask).checked_shr(shift).unwrap_or(0)
}

/// 将子字段写回到字节中，`extract_range` 的逆操作
pub fn insert_range(value: u8, field: u8, mask: u8, shift: u32) -> u8 {
    let shifted = field.checked_shl(shift).unwrap_or(0);
    (value & !mask) | (shifted & mask)
}

/// 按标志设置或清除掩码位
pub fn apply_flag(value: u8, mask: u8, set: bool) -> u8 {
    if set {
        value | mask
    } else {
        value & !mask
    }
}

/// 按bit 0到bit 7的顺序列出已置位的bit序号
pub fn set_bit_positions(value: u8) -> impl Iterator<Item = usize> {
    (0..8).filter(move |&bit| test_bit(value, 1u8 << bit))
}

/// 从字节数组中读取定长片段
///
/// # 参数
/// - `data`: 原始负载
/// - `byte_offset`: 字节偏移量
///
/// # 返回
/// - `Some([u8; N])`: 读取的定长数组
/// - `None`: 超出边界
pub fn read_array<const N: usize>(data: &[u8], byte_offset: usize) -> Option<[u8; N]> {
    let end = byte_offset.checked_add(N)?;
    data.get(byte_offset..end)?.try_into().ok()
}

//! 分段组装引擎
//!
//! 按字段表顺序驱动传输层，逐段解码并组装为结构化记录

pub mod chassis;
pub mod core;
pub mod device;
pub mod section_data;

pub use self::core::{SectionAssembler, DEFAULT_LAN_CHANNEL};
pub use section_data::{
    AssembleStats, ChassisState, CurrentPowerState, DeviceIdentity, FrontPanelButton, LanConfig,
    LanEntry, SectionStats, StructuredRecord,
};

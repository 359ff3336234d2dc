//! IPMI Dump Decoder
//!
//! This crate turns raw BMC responses into a structured record: bit-level
//! field extraction, table-driven LAN parameter decoding and the section
//! assembler that drives a transport in schema order.

pub mod encoder;
pub mod field_schema;
pub mod record_decoder;
pub mod section_assembler;
pub mod simulator;

pub use field_schema::LAN_SCHEMA;
pub use record_decoder::{extract_range, test_bit, FieldValidator, RecordDecoder};
pub use section_assembler::{
    AssembleStats, ChassisState, CurrentPowerState, DeviceIdentity, FrontPanelButton, LanConfig,
    SectionAssembler, StructuredRecord,
};
pub use simulator::{SimulatedBmc, SimulatorConfig};

//! 分段组装引擎核心实现

use ipmidump_core::utils::bytes_to_hex;
use ipmidump_core::{BmcTransport, DecodedValue, FieldDescriptor, RawResponse};
use tracing::{debug, info, warn};

use super::chassis::decode_chassis_status;
use super::device::decode_device_id;
use super::section_data::{AssembleStats, DeviceIdentity, LanConfig, StructuredRecord};
use crate::field_schema::LAN_SCHEMA;
use crate::record_decoder::RecordDecoder;

/// 默认查询的LAN通道
pub const DEFAULT_LAN_CHANNEL: u8 = 1;

/// 分段组装引擎
///
/// 每一段（机箱状态、LAN配置、设备标识）独立请求、独立解码。
/// 单个字段或整段的失败都不会中断整体流程，对应部分保持缺省。
pub struct SectionAssembler<T: BmcTransport> {
    /// 传输层
    transport: T,
    /// 字段解码器
    decoder: RecordDecoder,
    /// LAN通道号
    channel: u8,
    /// LAN字段表（槽位顺序即请求顺序）
    schema: &'static [Option<FieldDescriptor>],
    stats: AssembleStats,
}

impl<T: BmcTransport> SectionAssembler<T> {
    /// 创建新的分段组装引擎
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            decoder: RecordDecoder::new(),
            channel: DEFAULT_LAN_CHANNEL,
            schema: &LAN_SCHEMA,
            stats: AssembleStats::default(),
        }
    }

    pub fn with_decoder(mut self, decoder: RecordDecoder) -> Self {
        self.decoder = decoder;
        self
    }

    pub fn with_channel(mut self, channel: u8) -> Self {
        self.channel = channel;
        self
    }

    pub fn with_schema(mut self, schema: &'static [Option<FieldDescriptor>]) -> Self {
        self.schema = schema;
        self
    }

    /// 完整的组装流程
    ///
    /// 顺序为机箱状态、LAN配置、设备标识
    ///
    /// # 示例
    /// ```
    /// use ipmidump_decoder::{SectionAssembler, SimulatedBmc, SimulatorConfig};
    ///
    /// let bmc = SimulatedBmc::new(SimulatorConfig::with_seed(7));
    /// let mut assembler = SectionAssembler::new(bmc);
    /// let record = assembler.assemble();
    /// assert!(record.device_id.is_some());
    /// ```
    pub fn assemble(&mut self) -> StructuredRecord {
        let mut record = StructuredRecord::new();

        self.assemble_chassis(&mut record);
        record.lan = self.assemble_lan();
        record.device_id = self.assemble_device();

        let total = self.stats.total();
        info!(
            decoded = total.decoded,
            skipped = total.skipped,
            failed = total.failed,
            "assembled bmc record"
        );
        record
    }

    /// 机箱状态段：电源状态、机箱状态、前面板按钮
    pub fn assemble_chassis(&mut self, record: &mut StructuredRecord) {
        let raw = match self.transport.get_chassis_status() {
            Ok(raw) => raw,
            Err(err) => {
                warn!(error = %err, "chassis status unavailable");
                self.stats.chassis.failed += 1;
                return;
            }
        };
        debug!(request = "get_chassis_status", raw = %bytes_to_hex(&raw));

        match decode_chassis_status(&raw) {
            Ok(status) => {
                record.current_power_state = Some(status.power);
                record.chassis_state = Some(status.chassis);
                record.front_panel_button = status.front_panel;
                self.stats.chassis.decoded += 1;
            }
            Err(err) => {
                warn!(error = %err, "chassis status not decoded");
                self.stats.chassis.skipped += 1;
            }
        }
    }

    /// LAN配置段：按字段表顺序逐个请求
    pub fn assemble_lan(&mut self) -> LanConfig {
        let mut lan = LanConfig::new();

        for descriptor in self.schema.iter().flatten() {
            let value = match self
                .transport
                .get_lan_config(self.channel, descriptor.selector)
            {
                Ok(raw) => {
                    debug!(
                        request = "get_lan_config",
                        parameter = descriptor.selector,
                        raw = %bytes_to_hex(&raw)
                    );
                    match self.decoder.decode(descriptor, &RawResponse::new(raw)) {
                        Ok(value) => {
                            self.stats.lan.decoded += 1;
                            value
                        }
                        Err(err) => {
                            debug!(field = descriptor.name, error = %err, "field left absent");
                            self.stats.lan.skipped += 1;
                            DecodedValue::Absent
                        }
                    }
                }
                Err(err) => {
                    debug!(field = descriptor.name, error = %err, "lan parameter unavailable");
                    self.stats.lan.failed += 1;
                    DecodedValue::Absent
                }
            };
            lan.set(descriptor.name, value);
        }

        lan
    }

    /// 设备标识段
    pub fn assemble_device(&mut self) -> Option<DeviceIdentity> {
        let raw = match self.transport.get_device_id() {
            Ok(raw) => raw,
            Err(err) => {
                warn!(error = %err, "device id unavailable");
                self.stats.device.failed += 1;
                return None;
            }
        };
        debug!(request = "get_device_id", raw = %bytes_to_hex(&raw));

        match decode_device_id(&raw) {
            Ok(device) => {
                self.stats.device.decoded += 1;
                Some(device)
            }
            Err(err) => {
                warn!(error = %err, "device id not decoded");
                self.stats.device.skipped += 1;
                None
            }
        }
    }

    pub fn stats(&self) -> &AssembleStats {
        &self.stats
    }

    pub fn reset_stats(&mut self) {
        self.stats = AssembleStats::default();
    }

    pub fn channel(&self) -> u8 {
        self.channel
    }

    pub fn into_transport(self) -> T {
        self.transport
    }
}

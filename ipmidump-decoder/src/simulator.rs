//! BMC仿真器模块
//!
//! 纯软件实现的BMC：按种子生成一份随机但合法的设备状态，
//! 编码成原始响应后通过 `BmcTransport` 提供给组装引擎

use std::collections::HashMap;

use bytes::Bytes;
use ipmidump_core::code_tables::{LAST_POWER_EVENT, RESTORE_POLICY};
use ipmidump_core::utils::addr;
use ipmidump_core::{BmcTransport, DecodeRule, DecodedValue, FieldDescriptor, TransportError};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::trace;

use crate::encoder::{encode_chassis_status, encode_device_id, encode_field};
use crate::field_schema::lan_fields;
use crate::record_decoder::test_bit;
use crate::section_assembler::chassis::{
    DIAGNOSTIC_BUTTON, DIAGNOSTIC_BUTTON_DISABLE, POWEROFF_BUTTON, POWEROFF_BUTTON_DISABLE,
    RESET_BUTTON, RESET_BUTTON_DISABLE, STANDBY_BUTTON, STANDBY_BUTTON_DISABLE,
};
use crate::section_assembler::device::additional_device_support;
use crate::section_assembler::{
    ChassisState, CurrentPowerState, DeviceIdentity, FrontPanelButton, StructuredRecord,
    DEFAULT_LAN_CHANNEL,
};

const TEXT_ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";

/// 仿真器配置
#[derive(Debug, Clone)]
pub struct SimulatorConfig {
    pub loss_rate: f64, // 请求丢失率
    pub seed: u64,      // 随机种子
    pub channel: u8,    // 应答的LAN通道
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self {
            loss_rate: 0.0,
            seed: 0,
            channel: DEFAULT_LAN_CHANNEL,
        }
    }
}

impl SimulatorConfig {
    pub fn with_seed(seed: u64) -> Self {
        Self {
            seed,
            ..Self::default()
        }
    }
}

/// 仿真统计信息
#[derive(Debug, Clone, Default)]
pub struct SimulationStats {
    pub requests: u64,
    pub responses: u64,
    pub lost: u64,
}

/// 仿真BMC
pub struct SimulatedBmc {
    config: SimulatorConfig,
    rng: StdRng,
    chassis: Vec<u8>,
    device: Option<Vec<u8>>,
    lan: HashMap<u8, Vec<u8>>,
    expected: StructuredRecord,
    stats: SimulationStats,
}

impl SimulatedBmc {
    pub fn new(config: SimulatorConfig) -> Self {
        let mut rng = StdRng::seed_from_u64(config.seed);
        let mut expected = StructuredRecord::new();

        let (power, chassis_state, front_panel) = random_chassis(&mut rng);
        let chassis = encode_chassis_status(&power, &chassis_state, front_panel.as_ref());
        expected.current_power_state = Some(power);
        expected.chassis_state = Some(chassis_state);
        expected.front_panel_button = front_panel;

        let identity = random_device(&mut rng);
        let device = encode_device_id(&identity);
        if device.is_some() {
            expected.device_id = Some(identity);
        }

        let mut lan = HashMap::new();
        for descriptor in lan_fields() {
            let value = random_value(&mut rng, descriptor);
            match encode_field(descriptor, &value) {
                Some(raw) => {
                    lan.insert(descriptor.selector, raw);
                    expected.lan.set(descriptor.name, value);
                }
                None => expected.lan.set(descriptor.name, DecodedValue::Absent),
            }
        }

        Self {
            config,
            rng,
            chassis,
            device,
            lan,
            expected,
            stats: SimulationStats::default(),
        }
    }

    /// 无丢失时组装引擎应得到的记录
    pub fn expected_record(&self) -> &StructuredRecord {
        &self.expected
    }

    /// 覆盖某个LAN参数的原始响应
    pub fn set_lan_response(&mut self, parameter: u8, raw: Vec<u8>) {
        self.lan.insert(parameter, raw);
    }

    pub fn set_chassis_response(&mut self, raw: Vec<u8>) {
        self.chassis = raw;
    }

    pub fn set_device_response(&mut self, raw: Option<Vec<u8>>) {
        self.device = raw;
    }

    pub fn get_stats(&self) -> &SimulationStats {
        &self.stats
    }

    pub fn reset_stats(&mut self) {
        self.stats = SimulationStats::default();
    }

    /// 模拟请求丢失
    fn lose_request(&mut self, request: &str) -> Result<(), TransportError> {
        self.stats.requests += 1;
        if self.config.loss_rate > 0.0 {
            let mut buf = [0u8; 8];
            self.rng.fill_bytes(&mut buf);
            let draw = u64::from_le_bytes(buf) as f64 / u64::MAX as f64;
            if draw < self.config.loss_rate {
                self.stats.lost += 1;
                trace!(request, "request lost in simulation");
                return Err(TransportError::request(request, "request lost in simulation"));
            }
        }
        self.stats.responses += 1;
        Ok(())
    }
}

impl BmcTransport for SimulatedBmc {
    fn get_chassis_status(&mut self) -> Result<Bytes, TransportError> {
        self.lose_request("get_chassis_status")?;
        Ok(Bytes::from(self.chassis.clone()))
    }

    fn get_device_id(&mut self) -> Result<Bytes, TransportError> {
        self.lose_request("get_device_id")?;
        self.device
            .clone()
            .map(Bytes::from)
            .ok_or_else(|| TransportError::request("get_device_id", "command not supported"))
    }

    fn get_lan_config(&mut self, channel: u8, parameter: u8) -> Result<Bytes, TransportError> {
        self.lose_request("get_lan_config")?;
        if channel != self.config.channel {
            return Err(TransportError::request(
                "get_lan_config",
                format!("invalid channel {channel}"),
            ));
        }
        self.lan
            .get(&parameter)
            .cloned()
            .map(Bytes::from)
            .ok_or_else(|| {
                TransportError::request(
                    "get_lan_config",
                    format!("parameter {parameter} not supported"),
                )
            })
    }
}

fn random_byte(rng: &mut StdRng) -> u8 {
    let mut buf = [0u8; 1];
    rng.fill_bytes(&mut buf);
    buf[0]
}

fn random_bool(rng: &mut StdRng) -> bool {
    random_byte(rng) & 0x01 != 0
}

fn random_array<const N: usize>(rng: &mut StdRng) -> [u8; N] {
    let mut buf = [0u8; N];
    rng.fill_bytes(&mut buf);
    buf
}

fn random_chassis(
    rng: &mut StdRng,
) -> (CurrentPowerState, ChassisState, Option<FrontPanelButton>) {
    let policy = RESTORE_POLICY[random_byte(rng) as usize % RESTORE_POLICY.len()].1;
    let event = LAST_POWER_EVENT[random_byte(rng) as usize % LAST_POWER_EVENT.len()].1;

    let power = CurrentPowerState {
        power_restore_policy: Some(policy.to_string()),
        power_status: Some(random_bool(rng)),
        power_control_fault: Some(random_bool(rng)),
        power_fault: Some(random_bool(rng)),
        power_interlock: Some(random_bool(rng)),
        power_overload: Some(random_bool(rng)),
        last_power_event: Some(event.to_string()),
    };
    let chassis = ChassisState {
        chassis_intrusion: Some(random_bool(rng)),
        front_panel_lockout: Some(random_bool(rng)),
        drive_fault: Some(random_bool(rng)),
        fan_fault: Some(random_bool(rng)),
    };

    let buttons = random_byte(rng);
    let front_panel = (buttons != 0).then(|| FrontPanelButton {
        poweroff_button: test_bit(buttons, POWEROFF_BUTTON),
        reset_button: test_bit(buttons, RESET_BUTTON),
        diagnostic_button: test_bit(buttons, DIAGNOSTIC_BUTTON),
        standby_button: test_bit(buttons, STANDBY_BUTTON),
        poweroff_button_disable: test_bit(buttons, POWEROFF_BUTTON_DISABLE),
        reset_button_disable: test_bit(buttons, RESET_BUTTON_DISABLE),
        diagnostic_button_disable: test_bit(buttons, DIAGNOSTIC_BUTTON_DISABLE),
        standby_button_disable: test_bit(buttons, STANDBY_BUTTON_DISABLE),
    });

    (power, chassis, front_panel)
}

fn random_device(rng: &mut StdRng) -> DeviceIdentity {
    let [device_id, revision, major, minor, ipmi, support] = random_array::<6>(rng);
    let manufacturer = random_array::<3>(rng);
    let with_aux = random_bool(rng);

    DeviceIdentity {
        device_id,
        device_revision: revision & 0x0F,
        firmware_revision: format!("{}.{:02x}", major & 0x3F, minor),
        ipmi_version: format!("{:x}.{:x}", ipmi & 0x0F, ipmi >> 4),
        manufacturer_id: u32::from_le_bytes([manufacturer[0], manufacturer[1], manufacturer[2], 0]),
        product_id: u16::from_le_bytes(random_array::<2>(rng)),
        device_available: random_bool(rng),
        provides_device_sdrs: random_bool(rng),
        additional_device_support: additional_device_support(support),
        aux_firmware_revision_info: with_aux.then(|| u32::from_le_bytes(random_array::<4>(rng))),
    }
}

fn random_value(rng: &mut StdRng, descriptor: &FieldDescriptor) -> DecodedValue {
    match descriptor.rule {
        DecodeRule::Integer => DecodedValue::Integer(u64::from(random_byte(rng))),
        DecodeRule::Uint16Le => {
            DecodedValue::Integer(u64::from(u16::from_le_bytes(random_array::<2>(rng))))
        }
        DecodeRule::Ipv4Addr => DecodedValue::Address(addr::format_ipv4(random_array::<4>(rng))),
        DecodeRule::HardwareAddr => {
            DecodedValue::Address(addr::format_hardware_addr(&random_array::<6>(rng)))
        }
        DecodeRule::Enumerated(labels) => {
            let index = random_byte(rng) as usize % labels.len().max(1);
            labels
                .get(index)
                .map_or(DecodedValue::Absent, |label| DecodedValue::Label(label.to_string()))
        }
        DecodeRule::Flags(bits) => DecodedValue::Flags(
            bits.iter()
                .map(|bit| (bit.name, random_bool(rng)))
                .collect(),
        ),
        DecodeRule::Text => {
            // 留出结束符，结果与文本策略无关
            let max_len = descriptor.payload_len().saturating_sub(1);
            let len = random_byte(rng) as usize % (max_len + 1);
            let text = (0..len)
                .map(|_| TEXT_ALPHABET[random_byte(rng) as usize % TEXT_ALPHABET.len()] as char)
                .collect();
            DecodedValue::Text(text)
        }
    }
}

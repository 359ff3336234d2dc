//! 抓包回放传输层
//!
//! 抓包文件格式：
//! ```json
//! {
//!   "channel": 1,
//!   "chassis_status": "41 10 08 00",
//!   "device_id": "20 81 02 05 51 8f 01 02 03 34 12",
//!   "lan": {
//!     "3": "00 11 c0 a8 01 01",
//!     "16": { "error": "parameter not supported" }
//!   }
//! }
//! ```
//! 每条响应是十六进制字符串（可含空白），或者一个错误描述。
//! 加载时一次性校验全部内容，回放过程中不再失败。

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use bytes::Bytes;
use ipmidump_core::{BmcTransport, TransportError};
use ipmidump_decoder::section_assembler::DEFAULT_LAN_CHANNEL;
use serde::Deserialize;
use tracing::debug;

/// 抓包中的一条记录
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum CaptureEntry {
    Hex(String),
    Error { error: String },
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct CaptureFile {
    #[serde(default = "default_channel")]
    channel: u8,
    chassis_status: Option<CaptureEntry>,
    device_id: Option<CaptureEntry>,
    #[serde(default)]
    lan: BTreeMap<u8, CaptureEntry>,
}

fn default_channel() -> u8 {
    DEFAULT_LAN_CHANNEL
}

/// 已解析的响应
type Reply = Result<Bytes, String>;

fn parse_entry(name: &str, entry: CaptureEntry) -> Result<Reply, TransportError> {
    match entry {
        CaptureEntry::Hex(text) => {
            let digits: String = text.chars().filter(|c| !c.is_whitespace()).collect();
            hex::decode(&digits)
                .map(|data| Ok(Bytes::from(data)))
                .map_err(|err| TransportError::Open(format!("invalid hex for {name}: {err}")))
        }
        CaptureEntry::Error { error } => Ok(Err(error)),
    }
}

/// 回放传输层
#[derive(Debug, Clone)]
pub struct ReplayTransport {
    channel: u8,
    chassis_status: Option<Reply>,
    device_id: Option<Reply>,
    lan: BTreeMap<u8, Reply>,
}

impl ReplayTransport {
    /// 加载抓包文件，文件不可读或格式错误即为设备打开失败
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, TransportError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)
            .map_err(|err| TransportError::Open(format!("{}: {err}", path.display())))?;
        Self::from_json(&text)
    }

    pub fn from_json(text: &str) -> Result<Self, TransportError> {
        let capture: CaptureFile = serde_json::from_str(text)
            .map_err(|err| TransportError::Open(format!("malformed capture: {err}")))?;

        let chassis_status = capture
            .chassis_status
            .map(|entry| parse_entry("chassis_status", entry))
            .transpose()?;
        let device_id = capture
            .device_id
            .map(|entry| parse_entry("device_id", entry))
            .transpose()?;
        let lan = capture
            .lan
            .into_iter()
            .map(|(parameter, entry)| {
                parse_entry(&format!("lan parameter {parameter}"), entry)
                    .map(|reply| (parameter, reply))
            })
            .collect::<Result<BTreeMap<_, _>, _>>()?;

        debug!(
            channel = capture.channel,
            lan_parameters = lan.len(),
            "loaded capture"
        );

        Ok(Self {
            channel: capture.channel,
            chassis_status,
            device_id,
            lan,
        })
    }

    /// 抓包对应的LAN通道
    pub fn channel(&self) -> u8 {
        self.channel
    }
}

fn replay(request: &str, reply: Option<&Reply>) -> Result<Bytes, TransportError> {
    match reply {
        Some(Ok(data)) => Ok(data.clone()),
        Some(Err(reason)) => Err(TransportError::request(request, reason.as_str())),
        None => Err(TransportError::request(request, "not captured")),
    }
}

impl BmcTransport for ReplayTransport {
    fn get_chassis_status(&mut self) -> Result<Bytes, TransportError> {
        replay("get_chassis_status", self.chassis_status.as_ref())
    }

    fn get_device_id(&mut self) -> Result<Bytes, TransportError> {
        replay("get_device_id", self.device_id.as_ref())
    }

    fn get_lan_config(&mut self, channel: u8, parameter: u8) -> Result<Bytes, TransportError> {
        if channel != self.channel {
            return Err(TransportError::request(
                "get_lan_config",
                format!("channel {channel} not captured"),
            ));
        }
        replay("get_lan_config", self.lan.get(&parameter))
    }
}

//! IPMI Dump Core Library
//!
//! This crate provides the core abstractions and data structures for
//! decoding BMC responses into typed, named fields.

pub mod code_tables;
pub mod error;
pub mod field_meta;
pub mod utils;

use bytes::Bytes;

// 导出错误类型
pub use error::{DecodeError, TransportError};

// 导出字段元数据类型，便于其他模块使用
pub use field_meta::*;

/// BMC传输接口 - 实现解码层与驱动的分离
///
/// 每个方法返回一条完整的原始响应，或者一个传输错误。
/// 超时、重试等行为属于实现方，解码层只消费已收到的字节。
pub trait BmcTransport {
    /// Get Chassis Status：返回去掉完成码后的负载
    /// （电源状态、上次电源事件、机箱杂项状态、可选的前面板按钮字节）
    fn get_chassis_status(&mut self) -> Result<Bytes, TransportError>;

    /// Get Device ID：返回去掉完成码后的负载（11字节，带辅助固件版本时为15字节）
    fn get_device_id(&mut self) -> Result<Bytes, TransportError>;

    /// Get LAN Configuration Parameters：返回含2字节头部的完整响应
    fn get_lan_config(&mut self, channel: u8, parameter: u8) -> Result<Bytes, TransportError>;
}

impl<T: BmcTransport + ?Sized> BmcTransport for &mut T {
    fn get_chassis_status(&mut self) -> Result<Bytes, TransportError> {
        (**self).get_chassis_status()
    }

    fn get_device_id(&mut self) -> Result<Bytes, TransportError> {
        (**self).get_device_id()
    }

    fn get_lan_config(&mut self, channel: u8, parameter: u8) -> Result<Bytes, TransportError> {
        (**self).get_lan_config(channel, parameter)
    }
}

impl<T: BmcTransport + ?Sized> BmcTransport for Box<T> {
    fn get_chassis_status(&mut self) -> Result<Bytes, TransportError> {
        (**self).get_chassis_status()
    }

    fn get_device_id(&mut self) -> Result<Bytes, TransportError> {
        (**self).get_device_id()
    }

    fn get_lan_config(&mut self, channel: u8, parameter: u8) -> Result<Bytes, TransportError> {
        (**self).get_lan_config(channel, parameter)
    }
}

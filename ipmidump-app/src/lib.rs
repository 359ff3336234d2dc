//! IPMI Dump Application Library
//!
//! 命令行程序的可测试部分：配置加载、回放传输层和一次完整的导出流程

pub mod config;
pub mod error;
pub mod replay;
pub mod run;

pub use config::{DumpConfig, TransportSource};
pub use error::DumpError;
pub use replay::ReplayTransport;
pub use run::{dump, open_transport, render, run};

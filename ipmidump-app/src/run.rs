//! 一次完整的导出流程：打开传输层、组装记录、渲染JSON

use ipmidump_core::BmcTransport;
use ipmidump_decoder::{
    RecordDecoder, SectionAssembler, SimulatedBmc, SimulatorConfig, StructuredRecord,
};
use tracing::{info, warn};

use crate::config::{DumpConfig, TransportSource};
use crate::error::DumpError;
use crate::replay::ReplayTransport;

/// 按配置打开传输层
///
/// 这是导出流程中唯一会中止运行的失败点
pub fn open_transport(config: &DumpConfig) -> Result<Box<dyn BmcTransport>, DumpError> {
    match &config.source {
        TransportSource::Capture { path } => {
            let transport = ReplayTransport::from_file(path)?;
            if transport.channel() != config.channel {
                warn!(
                    capture_channel = transport.channel(),
                    channel = config.channel,
                    "capture was taken on a different channel"
                );
            }
            info!(path = %path.display(), "replaying capture");
            Ok(Box::new(transport))
        }
        TransportSource::Simulate { seed, loss_rate } => {
            info!(seed, loss_rate, "using simulated bmc");
            Ok(Box::new(SimulatedBmc::new(SimulatorConfig {
                loss_rate: *loss_rate,
                seed: *seed,
                channel: config.channel,
            })))
        }
        TransportSource::None => Err(DumpError::Config(
            "no transport source, use --capture or --simulate".to_string(),
        )),
    }
}

/// 组装结构化记录
pub fn dump(config: &DumpConfig) -> Result<StructuredRecord, DumpError> {
    config.validate()?;
    let transport = open_transport(config)?;

    let mut assembler = SectionAssembler::new(transport)
        .with_decoder(RecordDecoder::with_text_policy(config.text_policy))
        .with_channel(config.channel);
    Ok(assembler.assemble())
}

/// 渲染为JSON，默认带缩进
pub fn render(record: &StructuredRecord, compact: bool) -> Result<String, DumpError> {
    let text = if compact {
        serde_json::to_string(record)?
    } else {
        serde_json::to_string_pretty(record)?
    };
    Ok(text)
}

pub fn run(config: &DumpConfig) -> Result<String, DumpError> {
    render(&dump(config)?, config.compact)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_source() {
        let result = run(&DumpConfig::default());
        assert!(matches!(result, Err(DumpError::Config(_))));
    }

    #[test]
    fn test_capture_open_failure_aborts() {
        let config = DumpConfig {
            source: TransportSource::Capture {
                path: "/nonexistent/capture.json".into(),
            },
            ..DumpConfig::default()
        };
        assert!(matches!(run(&config), Err(DumpError::TransportInit(_))));
    }

    #[test]
    fn test_render_modes() {
        let record = StructuredRecord::new();
        assert_eq!(render(&record, true).unwrap(), r#"{"lan":{}}"#);
        assert_eq!(render(&record, false).unwrap(), "{\n  \"lan\": {}\n}");
    }

    #[test]
    fn test_simulated_dump() {
        let config = DumpConfig {
            source: TransportSource::Simulate {
                seed: 3,
                loss_rate: 0.0,
            },
            ..DumpConfig::default()
        };
        let record = dump(&config).unwrap();
        assert!(record.device_id.is_some());
        assert_eq!(record.lan.entries().len(), 19);
    }
}

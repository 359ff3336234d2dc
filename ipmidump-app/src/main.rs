//! IPMI Dump Application
//!
//! Main entry point: decode a BMC's chassis, device and LAN state into JSON.

use std::io::IsTerminal;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use ipmidump_app::{run, DumpConfig, DumpError, TransportSource};
use ipmidump_core::TextPolicy;
use tracing::{error, Level};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Replay responses from a JSON capture file
    #[arg(long, conflicts_with = "simulate")]
    capture: Option<PathBuf>,

    /// Use a simulated BMC generated from this seed
    #[arg(long, value_name = "SEED")]
    simulate: Option<u64>,

    /// Request loss rate for the simulated BMC (0.0-1.0)
    #[arg(long, requires = "simulate")]
    loss_rate: Option<f64>,

    /// LAN channel to query
    #[arg(short, long)]
    channel: Option<u8>,

    /// Path to a JSON configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Handling of fixed-size text without a terminator (whole-buffer or absent)
    #[arg(long, value_name = "POLICY")]
    unterminated_text: Option<TextPolicy>,

    /// Print the record on a single line
    #[arg(long)]
    compact: bool,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

impl Args {
    /// 加载配置文件（如有），再叠加命令行参数
    fn into_config(self) -> Result<DumpConfig, DumpError> {
        let mut config = match &self.config {
            Some(path) => DumpConfig::from_file(path)?,
            None => DumpConfig::default(),
        };

        if let Some(path) = self.capture {
            config.source = TransportSource::Capture { path };
        }
        if let Some(seed) = self.simulate {
            config.source = TransportSource::Simulate {
                seed,
                loss_rate: self.loss_rate.unwrap_or(0.0),
            };
        }
        if let Some(channel) = self.channel {
            config.channel = channel;
        }
        if let Some(policy) = self.unterminated_text {
            config.text_policy = policy;
        }
        config.compact |= self.compact;

        config.validate()?;
        Ok(config)
    }
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };
    let _ = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .without_time()
        .with_ansi(std::io::stderr().is_terminal())
        .with_writer(std::io::stderr)
        .try_init();
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_tracing(args.verbose);

    let result = args.into_config().and_then(|config| run(&config));
    match result {
        Ok(text) => {
            println!("{text}");
            ExitCode::SUCCESS
        }
        Err(err) => {
            error!("{err}");
            ExitCode::FAILURE
        }
    }
}

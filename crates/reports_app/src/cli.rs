use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use log::LevelFilter;
use reports_engine::{ClientSettings, EngineConfig};

use crate::platform::logging::LogDestination;

/// Generate, preview and download per-tenant network reports.
#[derive(Debug, Clone, Parser)]
#[command(name = "tenant-reports", version, about)]
pub struct Cli {
    /// Base URL of the report service.
    #[arg(long, env = "REPORTS_BASE_URL", default_value = "http://localhost:5555")]
    pub base_url: String,

    /// Directory downloaded reports are saved into.
    #[arg(long, env = "REPORTS_OUTPUT_DIR", default_value = "./reports")]
    pub output_dir: PathBuf,

    /// Where log output goes.
    #[arg(long, value_enum, default_value_t = LogDestination::File)]
    pub log: LogDestination,

    /// Log file used by `--log file` and `--log both`.
    #[arg(long, default_value = "./tenant-reports.log")]
    pub log_file: PathBuf,

    /// Log at debug level.
    #[arg(short, long)]
    pub verbose: bool,

    /// Seconds allowed for establishing a connection.
    #[arg(long, default_value_t = 10)]
    pub connect_timeout_secs: u64,

    /// Overall per-request limit in seconds. Unlimited when omitted.
    #[arg(long)]
    pub request_timeout_secs: Option<u64>,

    /// Largest report download accepted, in bytes.
    #[arg(long, default_value_t = 50 * 1024 * 1024)]
    pub max_download_bytes: u64,

    /// Open previews in the system viewer as well as printing their URL.
    #[arg(long)]
    pub open_previews: bool,
}

impl Cli {
    pub fn log_level(&self) -> LevelFilter {
        if self.verbose {
            LevelFilter::Debug
        } else {
            LevelFilter::Info
        }
    }

    pub fn engine_config(&self) -> EngineConfig {
        EngineConfig {
            client: ClientSettings {
                base_url: self.base_url.clone(),
                connect_timeout: Duration::from_secs(self.connect_timeout_secs),
                request_timeout: self.request_timeout_secs.map(Duration::from_secs),
                max_download_bytes: self.max_download_bytes,
            },
            output_dir: self.output_dir.clone(),
        }
    }
}

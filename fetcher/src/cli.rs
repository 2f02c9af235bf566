use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, ValueEnum};

use crate::logging::LogConfig;
use crate::storage::DataFiles;

pub const DEFAULT_API_URL: &str = "https://tests.stockfishchess.org/api/active";

/// Fetch the active test list once and update `tests.json` / `history.json`.
#[derive(Debug, Clone, Parser)]
#[command(name = "testwatch-fetch", version, about)]
pub struct Cli {
    /// Endpoint returning the active tests as a JSON object keyed by test id
    #[arg(long, env = "TESTWATCH_API_URL", default_value = DEFAULT_API_URL)]
    pub api_url: String,

    /// Directory holding the snapshot and history files
    #[arg(long, env = "TESTWATCH_DATA_DIR", default_value = ".")]
    pub data_dir: PathBuf,

    /// Request timeout for the API call, in seconds
    #[arg(long, env = "TESTWATCH_TIMEOUT_SECS", default_value_t = 30)]
    pub timeout_secs: u64,

    /// Log filter (overridden by RUST_LOG)
    #[arg(long, env = "TESTWATCH_LOG_LEVEL", default_value = "info")]
    pub log_level: String,

    #[arg(long, env = "TESTWATCH_LOG_FORMAT", value_enum, default_value_t = LogFormat::Pretty)]
    pub log_format: LogFormat,

    /// Also append log lines to this file
    #[arg(long, env = "TESTWATCH_LOG_FILE")]
    pub log_file: Option<PathBuf>,

    /// Run the whole cycle but skip writing files
    #[arg(long)]
    pub dry_run: bool,
}

impl Cli {
    pub fn log_config(&self) -> LogConfig {
        LogConfig {
            level: self.log_level.clone(),
            format: self.log_format,
            file: self.log_file.clone(),
        }
    }

    pub fn data_files(&self) -> DataFiles {
        DataFiles::in_dir(&self.data_dir)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

impl fmt::Display for LogFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pretty => f.write_str("pretty"),
            Self::Json => f.write_str("json"),
        }
    }
}

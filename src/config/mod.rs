pub mod cli;
pub mod toml_config;

#[cfg(feature = "cli")]
use crate::core::Source;
#[cfg(feature = "cli")]
use crate::utils::error::Result;
#[cfg(feature = "cli")]
use crate::utils::validation::Validate;
#[cfg(feature = "cli")]
use clap::{Parser, ValueEnum};
#[cfg(feature = "cli")]
use serde::{Deserialize, Serialize};
#[cfg(feature = "cli")]
use std::path::PathBuf;

pub use toml_config::AuditConfig;

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
pub enum LogFormat {
    #[default]
    Compact,
    Json,
}

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Serialize, Deserialize, Parser)]
#[command(name = "logic-ledger")]
#[command(about = "Audit an article or text file for logical fallacies and write an HTML ledger")]
pub struct CliConfig {
    #[arg(long, conflicts_with = "file", help = "Audit the article at this URL")]
    pub url: Option<String>,

    #[arg(long, help = "Audit this local UTF-8 text file")]
    pub file: Option<PathBuf>,

    #[arg(long, help = "TOML configuration file")]
    pub config: Option<PathBuf>,

    #[arg(long, help = "Directory for the generated ledger")]
    pub output_path: Option<String>,

    #[arg(long, help = "Do not open the ledger in a viewer")]
    pub no_open: bool,

    #[arg(long, value_enum, default_value_t = LogFormat::Compact)]
    pub log_format: LogFormat,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,
}

#[cfg(feature = "cli")]
impl CliConfig {
    /// `None` means the user is asked interactively.
    pub fn source(&self) -> Option<Source> {
        match (&self.url, &self.file) {
            (Some(url), _) => Some(Source::Url(url.trim().to_string())),
            (None, Some(path)) => Some(Source::File(path.clone())),
            (None, None) => None,
        }
    }

    /// TOML file (or defaults) with command line overrides applied.
    pub fn resolve(&self) -> Result<AuditConfig> {
        let mut config = match &self.config {
            Some(path) => AuditConfig::from_file(path)?,
            None => AuditConfig::default(),
        };

        if let Some(output_path) = &self.output_path {
            config.output.output_path = output_path.clone();
        }
        if self.no_open {
            config.output.open_viewer = false;
        }

        Ok(config)
    }
}

#[cfg(feature = "cli")]
impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        if let Some(source) = self.source() {
            cli::validate_source(&source)?;
        }
        if let Some(output_path) = &self.output_path {
            crate::utils::validation::validate_path("output_path", output_path)?;
        }
        Ok(())
    }
}

use crate::error::{CliError, Result};
use qcrecords::engine::config::FailurePolicy;
use serde::Deserialize;
use std::path::Path;
use tracing::debug;

use super::models::OutputFormat;

#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum FileFailurePolicy {
    Abort,
    Skip,
}

impl From<FileFailurePolicy> for FailurePolicy {
    fn from(p: FileFailurePolicy) -> Self {
        match p {
            FileFailurePolicy::Abort => FailurePolicy::Abort,
            FileFailurePolicy::Skip => FailurePolicy::Skip,
        }
    }
}

#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
pub struct FilePipelineConfig {
    pub conformer_index: Option<usize>,
    pub allow_undefined_stereo: Option<bool>,
    pub report_undefined_stereo: Option<bool>,
    pub on_error: Option<FileFailurePolicy>,
}

#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
pub struct FileOutputConfig {
    pub format: Option<OutputFormat>,
}

/// The TOML configuration file. Every key is optional.
#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
pub struct FileConfig {
    pub pipeline: Option<FilePipelineConfig>,
    pub output: Option<FileOutputConfig>,
}

impl FileConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        debug!("Reading configuration file {:?}", path);
        let content = std::fs::read_to_string(path).map_err(|e| {
            CliError::Config(format!("Failed to read config file {}: {}", path.display(), e))
        })?;
        Self::from_toml(&content).map_err(|e| {
            CliError::Config(format!("Failed to parse config file {}: {}", path.display(), e))
        })
    }

    pub fn from_toml(content: &str) -> std::result::Result<Self, toml::de::Error> {
        toml::from_str(content)
    }
}

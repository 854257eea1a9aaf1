use qcrecords::engine::config::PipelineConfig;
use serde::Deserialize;
use std::fmt;
use std::path::{Path, PathBuf};

/// Molecule file formats the `convert` command can write.
#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Sdf,
    Xyz,
}

impl OutputFormat {
    /// Infers the format from a path's extension, case-insensitively.
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "sdf" | "sd" | "mol" => Some(Self::Sdf),
            "xyz" => Some(Self::Xyz),
            _ => None,
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.to_ascii_lowercase().as_str() {
            "sdf" => Some(Self::Sdf),
            "xyz" => Some(Self::Xyz),
            _ => None,
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Sdf => "sdf",
            Self::Xyz => "xyz",
        })
    }
}

pub struct AppConfig {
    pub input_path: PathBuf,
    pub core_config: PipelineConfig,
    /// Format from the config file; an output path's extension takes precedence.
    pub output_format: Option<OutputFormat>,
}

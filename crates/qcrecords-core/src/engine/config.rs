use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum ConfigError {
    #[error("Invalid value for '{key}': {message}")]
    InvalidValue { key: &'static str, message: String },
}

/// What a run does when a single triple fails to reconstruct.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FailurePolicy {
    /// The first failure, by input index, aborts the run.
    #[default]
    Abort,
    /// Failures are collected with their index and the run continues.
    Skip,
}

impl FromStr for FailurePolicy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "abort" => Ok(Self::Abort),
            "skip" => Ok(Self::Skip),
            other => Err(ConfigError::InvalidValue {
                key: "on-error",
                message: format!("expected 'abort' or 'skip', got '{other}'"),
            }),
        }
    }
}

impl fmt::Display for FailurePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Abort => "abort",
            Self::Skip => "skip",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineConfig {
    /// Which conformer buffer of each triple becomes the molecule's conformer.
    pub conformer_index: usize,
    /// Accept molecules whose perceived stereocenters carry no descriptor.
    pub allow_undefined_stereo: bool,
    /// Emit a warning for every molecule accepted with undefined stereocenters.
    pub report_undefined_stereo: bool,
    pub on_error: FailurePolicy,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            conformer_index: 0,
            allow_undefined_stereo: true,
            report_undefined_stereo: false,
            on_error: FailurePolicy::Abort,
        }
    }
}

impl PipelineConfig {
    pub fn builder() -> PipelineConfigBuilder {
        PipelineConfigBuilder::new()
    }
}

#[derive(Default)]
pub struct PipelineConfigBuilder {
    conformer_index: Option<usize>,
    allow_undefined_stereo: Option<bool>,
    report_undefined_stereo: Option<bool>,
    on_error: Option<FailurePolicy>,
}

impl PipelineConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn conformer_index(mut self, index: usize) -> Self {
        self.conformer_index = Some(index);
        self
    }
    pub fn allow_undefined_stereo(mut self, allow: bool) -> Self {
        self.allow_undefined_stereo = Some(allow);
        self
    }
    pub fn report_undefined_stereo(mut self, report: bool) -> Self {
        self.report_undefined_stereo = Some(report);
        self
    }
    pub fn on_error(mut self, policy: FailurePolicy) -> Self {
        self.on_error = Some(policy);
        self
    }

    pub fn build(self) -> Result<PipelineConfig, ConfigError> {
        let defaults = PipelineConfig::default();
        let allow_undefined_stereo = self
            .allow_undefined_stereo
            .unwrap_or(defaults.allow_undefined_stereo);
        let report_undefined_stereo = self
            .report_undefined_stereo
            .unwrap_or(defaults.report_undefined_stereo);

        if report_undefined_stereo && !allow_undefined_stereo {
            return Err(ConfigError::InvalidValue {
                key: "report-undefined-stereo",
                message: "nothing to report when undefined stereochemistry is rejected".into(),
            });
        }

        Ok(PipelineConfig {
            conformer_index: self.conformer_index.unwrap_or(defaults.conformer_index),
            allow_undefined_stereo,
            report_undefined_stereo,
            on_error: self.on_error.unwrap_or(defaults.on_error),
        })
    }
}

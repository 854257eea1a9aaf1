use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unknown record status '{0}'")]
pub struct ParseStatusError(pub String);

/// Lifecycle state of an archived procedure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum RecordStatus {
    Complete,
    Incomplete,
    Running,
    Error,
}

impl RecordStatus {
    #[must_use]
    pub fn is_complete(&self) -> bool {
        matches!(self, Self::Complete)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Complete => "COMPLETE",
            Self::Incomplete => "INCOMPLETE",
            Self::Running => "RUNNING",
            Self::Error => "ERROR",
        }
    }
}

impl fmt::Display for RecordStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RecordStatus {
    type Err = ParseStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "COMPLETE" => Ok(Self::Complete),
            "INCOMPLETE" => Ok(Self::Incomplete),
            "RUNNING" => Ok(Self::Running),
            "ERROR" => Ok(Self::Error),
            _ => Err(ParseStatusError(s.to_string())),
        }
    }
}

impl TryFrom<String> for RecordStatus {
    type Error = ParseStatusError;

    fn try_from(value: String) -> Result<Self, ParseStatusError> {
        value.parse()
    }
}

impl From<RecordStatus> for String {
    fn from(status: RecordStatus) -> Self {
        status.as_str().to_string()
    }
}

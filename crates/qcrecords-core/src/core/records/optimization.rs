use super::status::RecordStatus;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Quantum-chemistry level of theory a procedure ran its gradients at.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QcSpec {
    pub driver: String,
    pub method: String,
    #[serde(default)]
    pub basis: Option<String>,
    #[serde(default)]
    pub keywords: Option<String>,
    pub program: String,
    #[serde(flatten)]
    pub extras: Map<String, Value>,
}

/// A geometry optimization as archived by the server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptimizationRecord {
    pub id: String,
    pub status: RecordStatus,
    pub initial_molecule: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub procedure: Option<String>,
    #[serde(default)]
    pub final_molecule: Option<String>,
    #[serde(default)]
    pub program: Option<String>,
    #[serde(default)]
    pub energies: Vec<f64>,
    #[serde(default)]
    pub trajectory: Vec<String>,
    #[serde(default)]
    pub qc_spec: Option<QcSpec>,
    #[serde(default)]
    pub keywords: Map<String, Value>,
    #[serde(default)]
    pub hash_index: Option<String>,
    /// Fields this schema does not name, kept verbatim.
    #[serde(flatten)]
    pub extras: Map<String, Value>,
}

impl OptimizationRecord {
    /// Energy of the last trajectory step, if any step was recorded.
    pub fn final_energy(&self) -> Option<f64> {
        self.energies.last().copied()
    }
}

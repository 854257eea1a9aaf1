use super::optimization::QcSpec;
use super::status::RecordStatus;
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashMap;

/// Settings of the constrained optimizations run at each grid point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptimizationSpec {
    pub program: String,
    #[serde(default)]
    pub keywords: HashMap<String, Value>,
}

/// Scan definition of a torsion drive.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TorsionDriveKeywords {
    /// Driven dihedrals, as 0-based atom indices.
    #[serde(default)]
    pub dihedrals: Vec<[usize; 4]>,
    /// Grid spacing in degrees, one entry per dihedral.
    #[serde(default)]
    pub grid_spacing: Vec<i64>,
    #[serde(flatten)]
    pub extras: Map<String, Value>,
}

/// A torsion drive as archived by the server.
///
/// Grid points are keyed by their JSON-encoded angle list, e.g. `"[-120]"`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TorsionDriveRecord {
    pub id: String,
    pub status: RecordStatus,
    pub initial_molecule: Vec<String>,
    pub optimization_spec: OptimizationSpec,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub procedure: Option<String>,
    #[serde(rename = "final_energy_dict", default)]
    pub final_energies: HashMap<String, f64>,
    /// Index into `optimization_history[grid]` of the lowest-energy optimization.
    #[serde(default)]
    pub minimum_positions: HashMap<String, usize>,
    /// Optimization ids run at each grid point, in submission order.
    #[serde(default)]
    pub optimization_history: HashMap<String, Vec<String>>,
    #[serde(default)]
    pub qc_spec: Option<QcSpec>,
    #[serde(default)]
    pub keywords: TorsionDriveKeywords,
    #[serde(flatten)]
    pub extras: Map<String, Value>,
}

impl TorsionDriveRecord {
    /// Ids of the minimum-energy optimization at every grid point, sorted and
    /// de-duplicated. Grid points whose minimum position falls outside their
    /// history are skipped.
    pub fn minimum_optimization_ids(&self) -> Vec<String> {
        self.minimum_positions
            .iter()
            .filter_map(|(grid, &position)| {
                self.optimization_history
                    .get(grid)
                    .and_then(|history| history.get(position))
                    .cloned()
            })
            .sorted()
            .dedup()
            .collect()
    }

    pub fn grid_points(&self) -> usize {
        self.final_energies.len()
    }

    /// The lowest final energy over the whole grid and the grid point it belongs to.
    pub fn global_minimum(&self) -> Option<(&str, f64)> {
        self.final_energies
            .iter()
            .min_by(|(_, a), (_, b)| a.total_cmp(b))
            .map(|(grid, &energy)| (grid.as_str(), energy))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record() -> TorsionDriveRecord {
        serde_json::from_value(json!({
            "id": "21272387",
            "status": "COMPLETE",
            "procedure": "torsiondrive",
            "initial_molecule": ["18045478"],
            "optimization_spec": {"program": "geometric", "keywords": {"coordsys": "dlc"}},
            "final_energy_dict": {"[-120]": -350.2, "[0]": -350.5, "[120]": -350.1},
            "minimum_positions": {"[-120]": 2, "[0]": 0, "[120]": 1},
            "optimization_history": {
                "[-120]": ["104321688", "104405676", "104405677"],
                "[0]": ["104321690"],
                "[120]": ["104321690", "104321690"]
            },
            "keywords": {"dihedrals": [[1, 2, 3, 4]], "grid_spacing": [120], "dihedral_ranges": null}
        }))
        .unwrap()
    }

    #[test]
    fn decodes_renamed_and_nested_fields() {
        let record = record();
        assert_eq!(record.final_energies.len(), 3);
        assert_eq!(record.optimization_spec.program, "geometric");
        assert_eq!(record.keywords.dihedrals, vec![[1, 2, 3, 4]]);
        assert_eq!(record.keywords.grid_spacing, vec![120]);
        assert!(record.keywords.extras.contains_key("dihedral_ranges"));
        assert_eq!(record.grid_points(), 3);
    }

    #[test]
    fn minimum_ids_are_sorted_and_unique() {
        assert_eq!(
            record().minimum_optimization_ids(),
            vec!["104321690".to_string(), "104405677".to_string()]
        );
    }

    #[test]
    fn out_of_range_minimum_position_is_skipped() {
        let mut record = record();
        record.minimum_positions.insert("[0]".to_string(), 7);
        record
            .minimum_positions
            .insert("[60]".to_string(), 0);
        assert_eq!(
            record.minimum_optimization_ids(),
            vec!["104321690".to_string(), "104405677".to_string()]
        );
    }

    #[test]
    fn global_minimum_picks_lowest_energy() {
        assert_eq!(record().global_minimum(), Some(("[0]", -350.5)));
    }

    #[test]
    fn missing_optimization_spec_is_an_error() {
        let result = serde_json::from_value::<TorsionDriveRecord>(json!({
            "id": "1",
            "status": "COMPLETE",
            "initial_molecule": ["2"],
        }));
        assert!(result.is_err());
    }
}

/*
 * Folding Report (outbound DTO)
 *
 * Serializable snapshot of a finished run for report consumers: the
 * latest environment per method, every per-context environment, and the
 * solver and table counters. Methods are rendered by signature and
 * contexts by their display form so the JSON is stable across runs.
 */

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::errors::Result;
use crate::features::string_folding::domain::{AbstractValue, TableStatistics};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FoldingReport {
    /// Entry method signature
    pub entry: String,

    /// False if a solver limit cut the run short
    pub completed: bool,

    /// One entry per analyzed method, ordered by signature
    pub methods: Vec<MethodConstants>,

    pub solver: SolverSummary,

    pub table: TableStatistics,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MethodConstants {
    pub method: String,

    /// Latest environment written for the method (any context)
    pub constants: BTreeMap<String, AbstractValue>,

    /// Environment per call context
    pub contexts: Vec<ContextConstants>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContextConstants {
    pub context: String,
    pub constants: BTreeMap<String, AbstractValue>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SolverSummary {
    pub iterations: usize,
    pub path_edges: usize,
    pub end_summaries: usize,
    pub summary_reuses: usize,
    pub flow_applications: usize,
    pub analysis_time_ms: u64,
}

impl FoldingReport {
    /// Known constants of `method`, skipping Unknown bindings
    pub fn known_constants(&self, method: &str) -> BTreeMap<&str, &str> {
        self.methods
            .iter()
            .filter(|m| m.method == method)
            .flat_map(|m| m.constants.iter())
            .filter_map(|(local, value)| value.as_known().map(|text| (local.as_str(), text)))
            .collect()
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

//! Case file schema definitions.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Project {
    pub version: u32,
    pub name: String,
    #[serde(default)]
    pub settings: SettingsDef,
    #[serde(default)]
    pub cases: Vec<CaseDef>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub pumps: Vec<PumpDef>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub circular_channels: Vec<CircularChannelDef>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub drip_units: Vec<DripUnitDef>,
}

/// Solver settings. Unset fields fall back to the enclosing level
/// (case over project over built-in defaults).
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct SettingsDef {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gravity_mps2: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tolerance: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_iterations: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parallel_threshold: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub approach_velocity_head: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub perimeter: Option<PerimeterDef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fault_policy: Option<FaultPolicyDef>,
}

impl SettingsDef {
    /// Fields set in `over` win, the rest come from `self`.
    pub fn overlaid(&self, over: &SettingsDef) -> SettingsDef {
        SettingsDef {
            gravity_mps2: over.gravity_mps2.or(self.gravity_mps2),
            tolerance: over.tolerance.or(self.tolerance),
            max_iterations: over.max_iterations.or(self.max_iterations),
            parallel_threshold: over.parallel_threshold.or(self.parallel_threshold),
            approach_velocity_head: over.approach_velocity_head.or(self.approach_velocity_head),
            perimeter: over.perimeter.or(self.perimeter),
            fault_policy: over.fault_policy.or(self.fault_policy),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PerimeterDef {
    Standard,
    Reference,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum FaultPolicyDef {
    PerElement,
    WholeBatch,
}

/// One batch of problem instances and the operations to run on it, in order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CaseDef {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub settings: Option<SettingsDef>,
    pub operations: Vec<String>,
    /// Quantity name to one value per instance
    #[serde(default)]
    pub inputs: BTreeMap<String, Vec<f64>>,
    /// Quantity name to a value shared by every instance
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub broadcast: BTreeMap<String, f64>,
}

impl CaseDef {
    /// Instance count: the common length of `inputs`, or 1 when the case
    /// only has broadcast values.
    pub fn batch_len(&self) -> usize {
        self.inputs.values().next().map_or(1, Vec::len)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PumpDef {
    pub id: String,
    pub name: String,
    /// `[a0, a1, a2]` of `H = a0 + a1·Q + a2·Q²`
    pub head: [f64; 3],
    /// `[b1, b2]` of `eta = b1·Q + b2·Q²`
    pub efficiency: [f64; 2],
    #[serde(default)]
    pub speed_ratios: Vec<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CircularChannelDef {
    pub id: String,
    pub name: String,
    pub discharge_m3ps: Vec<f64>,
    pub slope: Vec<f64>,
    pub depth_m: Vec<f64>,
    pub diameter_m: Vec<f64>,
    pub manning_n: Vec<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gravity_mps2: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DripUnitDef {
    pub id: String,
    pub name: String,
    pub lateral_diameter_m: f64,
    pub manifold_diameter_m: f64,
    pub lateral_length_m: f64,
    pub manifold_length_m: f64,
    pub emitter_spacing_m: f64,
    pub lateral_spacing_m: f64,
    #[serde(default)]
    pub emitter_equivalent_length_m: f64,
    #[serde(default)]
    pub lateral_equivalent_length_m: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gravity_mps2: Option<f64>,
}

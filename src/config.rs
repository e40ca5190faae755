//! Settings for `Simulator`.
//!
//! Every field has a default, so a partial (or empty) serialized config is
//! valid.

use crate::distribution::Scale;
use crate::joint::JointAggregator;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulatorConfig {
    /// Most traits a single request may cross at once
    pub max_traits: usize,
    /// Report distributions as percentages (0 - 100) instead of fractions
    pub as_percentages: bool,
    /// Joins phenotype labels in joint distribution keys
    pub separator: String,
    /// Divide products of k percentages by 100^(k-1)
    pub rescale_percentages: bool,
    /// Children drawn by a sampled cross, at least one
    pub simulations: usize,
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self {
            max_traits: 5,
            as_percentages: false,
            separator: "+".to_owned(),
            rescale_percentages: true,
            simulations: 100,
        }
    }
}

impl SimulatorConfig {
    pub fn scale(&self) -> Scale {
        if self.as_percentages {
            Scale::Percentage
        } else {
            Scale::Fraction
        }
    }

    /// An aggregator for fraction-valued per-trait distributions.
    pub fn aggregator(&self) -> JointAggregator {
        let mut aggregator = JointAggregator::new();
        aggregator
            .separator(&self.separator)
            .rescale(self.rescale_percentages);
        aggregator
    }
}

//! Joint distributions over independently assorting traits.
//!
//! Every combination of one label per input distribution becomes one joint
//! outcome whose probability is the product of the chosen labels'
//! probabilities. Combinations are generated with the earlier traits held
//! fixed and the later traits varying fastest.

use crate::distribution::{Distribution, JointDistribution, Scale};
use log::warn;
use serde::{Deserialize, Serialize};

/// One combination of labels, kept structurally so that colliding composite
/// labels are never merged.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct JointOutcome {
    pub labels: Vec<String>,
    pub probability: f64,
}

impl JointOutcome {
    pub fn label(&self, separator: &str) -> String {
        self.labels.join(separator)
    }
}

/// Combines per-trait distributions into a joint distribution.
///
/// With [`Scale::Percentage`] inputs the product of k percentages is divided
/// by 100^(k-1) so the result is again a percentage, unless `rescale(false)`
/// asks for the raw product.
#[derive(Clone, Debug)]
pub struct JointAggregator {
    separator: String,
    scale: Scale,
    rescale: bool,
}

impl JointAggregator {
    pub fn new() -> Self {
        Self {
            separator: "+".to_owned(),
            scale: Scale::Fraction,
            rescale: true,
        }
    }

    pub fn separator(&mut self, separator: &str) -> &mut Self {
        self.separator = separator.to_owned();
        self
    }

    pub fn scale(&mut self, scale: Scale) -> &mut Self {
        self.scale = scale;
        self
    }

    pub fn rescale(&mut self, rescale: bool) -> &mut Self {
        self.rescale = rescale;
        self
    }

    /// All combinations in nested Cartesian order.
    ///
    /// Empty when there are no distributions or when any of them is empty.
    pub fn outcomes(&self, distributions: &[Distribution]) -> Vec<JointOutcome> {
        if distributions.is_empty() {
            return vec![];
        }

        let mut outcomes = vec![JointOutcome {
            labels: Vec::with_capacity(distributions.len()),
            probability: 1.0,
        }];
        for distribution in distributions {
            let mut next = Vec::with_capacity(outcomes.len() * distribution.len());
            for outcome in outcomes.iter() {
                for (label, probability) in distribution.iter() {
                    let mut labels = outcome.labels.clone();
                    labels.push(label.clone());
                    next.push(JointOutcome {
                        labels,
                        probability: outcome.probability * probability,
                    });
                }
            }
            outcomes = next;
        }

        if self.rescale && self.scale == Scale::Percentage {
            let divisor = self.scale.unit().powi(distributions.len() as i32 - 1);
            for outcome in outcomes.iter_mut() {
                outcome.probability /= divisor;
            }
        }
        outcomes
    }

    /// The joint distribution keyed by separator-joined labels.
    ///
    /// If two combinations spell the same composite label, the one generated
    /// later overwrites the earlier one; [`JointAggregator::outcomes`] keeps
    /// both.
    pub fn aggregate(&self, distributions: &[Distribution]) -> JointDistribution {
        let mut joint = JointDistribution::new();
        for outcome in self.outcomes(distributions) {
            let label = outcome.label(&self.separator);
            if let Some(previous) = joint.insert(label.clone(), outcome.probability) {
                warn!(
                    "joint label '{}' produced twice, replacing {} with {}",
                    label, previous, outcome.probability
                );
            }
        }
        joint
    }
}

impl Default for JointAggregator {
    fn default() -> Self {
        Self::new()
    }
}

/// Joint distribution of fraction-valued inputs, labels joined with `+`.
pub fn aggregate_joint(distributions: &[Distribution]) -> JointDistribution {
    JointAggregator::new().aggregate(distributions)
}

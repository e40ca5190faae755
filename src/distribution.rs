use indexmap::IndexMap;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Label (genotype or phenotype) to probability, in insertion order.
pub type Distribution = IndexMap<String, f64>;

/// Composite label to the product of per-trait probabilities.
pub type JointDistribution = Distribution;

/// How the values of a distribution are expressed.
///
/// A single distribution never mixes the two.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Scale {
    /// Values in [0, 1], summing to 1.
    Fraction,
    /// Values in [0, 100], summing to 100.
    Percentage,
}

impl Scale {
    /// The normalization constant of a distribution on this scale.
    pub fn unit(&self) -> f64 {
        match self {
            Scale::Fraction => 1.0,
            Scale::Percentage => 100.0,
        }
    }
}

impl Default for Scale {
    fn default() -> Self {
        Scale::Fraction
    }
}

pub trait DistributionExt {
    fn total(&self) -> f64;

    /// Rescales the values so they sum to 1.0.
    ///
    /// A distribution whose values sum to zero maps every label to 0.0.
    fn normalized(&self) -> Distribution;

    /// Normalizes, then expresses the values as percentages.
    fn to_percentages(&self) -> Distribution;

    fn is_normalized(&self, scale: Scale, tolerance: f64) -> bool;

    /// Draws a label with probability proportional to its value.
    ///
    /// Returns `None` for an empty distribution.
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<&str>;
}

impl DistributionExt for Distribution {
    fn total(&self) -> f64 {
        self.values().sum()
    }

    fn normalized(&self) -> Distribution {
        let total = self.total();
        if total == 0.0 {
            return self.keys().map(|label| (label.clone(), 0.0)).collect();
        }
        self.iter()
            .map(|(label, value)| (label.clone(), value / total))
            .collect()
    }

    fn to_percentages(&self) -> Distribution {
        self.normalized()
            .into_iter()
            .map(|(label, value)| (label, value * 100.0))
            .collect()
    }

    fn is_normalized(&self, scale: Scale, tolerance: f64) -> bool {
        (self.total() - scale.unit()).abs() <= tolerance
    }

    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<&str> {
        let first = self.keys().next()?;
        let total = self.total();
        if total <= 0.0 {
            return Some(first.as_str());
        }

        let threshold: f64 = rng.gen();
        let mut cumulative = 0.0;
        for (label, value) in self.iter() {
            cumulative += value / total;
            if threshold <= cumulative {
                return Some(label.as_str());
            }
        }
        // Rounding left the cumulative sum just short of the threshold.
        Some(first.as_str())
    }
}

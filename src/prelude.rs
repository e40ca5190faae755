pub use crate::config::SimulatorConfig;
pub use crate::distribution::{Distribution, DistributionExt, JointDistribution, Scale};
pub use crate::error::{Error, Result};
pub use crate::genotype::enumerate_genotypes;
pub use crate::joint::{aggregate_joint, JointAggregator, JointOutcome};
pub use crate::mendelian::{offspring_genotypes, GameteSampler, PunnettSquare};
pub use crate::registry::{Registry, TraitRecord};
pub use crate::simulator::{Simulator, TraitCross};
pub use crate::trait_csv::{TraitCsv, TraitCsvBuilder};
pub use crate::traits::Trait;
pub use crate::{Allele, Dosages, Genotype, Meta, ParentGenotypes, Phenotype};

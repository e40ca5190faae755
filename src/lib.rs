#![crate_name = "zygotrix"]
//! Mendelian genetics core for Zygotrix.
//!
//! Enumerates the genotype options for a trait's allele set, crosses parent
//! genotypes through a Punnett square, and combines independent per-trait
//! distributions into joint phenotype distributions.

use indexmap::IndexMap;
use std::collections::HashMap;

pub mod prelude;

pub mod config;
pub mod distribution;
pub mod error;
pub mod genotype;
pub mod joint;
pub mod mendelian;
pub mod polygenic;
pub mod registry;
pub mod simulator;
pub mod trait_csv;
pub mod traits;
pub mod workspace;

pub use error::{Error, Result};

pub type Allele = String;
pub type Genotype = String;
pub type Phenotype = String;
pub type Meta = HashMap<String, String>;

/// Trait key to genotype, in the order the traits were selected.
pub type ParentGenotypes = IndexMap<String, Genotype>;

/// SNP id to allele dosage (0, 1 or 2 copies of the effect allele).
pub type Dosages = IndexMap<String, f64>;

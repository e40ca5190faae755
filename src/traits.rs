use crate::distribution::{Distribution, DistributionExt};
use crate::error::{Error, Result};
use crate::genotype::enumerate_genotypes;
use crate::{Allele, Genotype, Meta, Phenotype};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// A Mendelian trait: its alleles and how genotypes map to phenotypes.
///
/// The order of `alleles` is significant. Canonical genotypes list their
/// alleles in that order, so with alleles `("B", "b")` both `"Bb"` and
/// `"bB"` canonicalize to `"Bb"`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Trait {
    pub name: String,
    pub alleles: Vec<Allele>,
    pub phenotype_map: IndexMap<Genotype, Phenotype>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub metadata: Meta,
}

impl Trait {
    pub fn new(name: &str, alleles: &[&str]) -> Self {
        Self {
            name: name.into(),
            alleles: alleles.iter().map(|a| a.to_string()).collect(),
            phenotype_map: IndexMap::new(),
            description: String::new(),
            metadata: Meta::new(),
        }
    }

    pub fn with_phenotype(mut self, genotype: &str, phenotype: &str) -> Self {
        self.phenotype_map.insert(genotype.into(), phenotype.into());
        self
    }

    pub fn with_description(mut self, description: &str) -> Self {
        self.description = description.into();
        self
    }

    fn position(&self, allele: &str) -> Option<usize> {
        self.alleles.iter().position(|a| a == allele)
    }

    fn invalid(&self, genotype: &str) -> Error {
        Error::InvalidGenotype {
            trait_name: self.name.clone(),
            genotype: genotype.into(),
            allowed: self.alleles.clone(),
        }
    }

    /// Splits a genotype into its two alleles, in the order written.
    ///
    /// Whitespace is ignored. Alleles may span several characters; the
    /// first split point at which both halves are known alleles wins.
    pub fn split_genotype<'a>(&'a self, genotype: &str) -> Result<(&'a str, &'a str)> {
        let cleaned: String = genotype.chars().filter(|c| !c.is_whitespace()).collect();
        for (split, _) in cleaned.char_indices().skip(1) {
            let (first, second) = cleaned.split_at(split);
            if let (Some(i), Some(j)) = (self.position(first), self.position(second)) {
                return Ok((self.alleles[i].as_str(), self.alleles[j].as_str()));
            }
        }
        Err(self.invalid(genotype))
    }

    /// Joins two alleles of this trait in allele order.
    ///
    /// Alleles unknown to the trait sort after the known ones.
    pub fn canonical_pair(&self, first: &str, second: &str) -> Genotype {
        let rank = |allele: &str| self.position(allele).unwrap_or(usize::MAX);
        if rank(second) < rank(first) {
            format!("{}{}", second, first)
        } else {
            format!("{}{}", first, second)
        }
    }

    pub fn canonical_genotype(&self, genotype: &str) -> Result<Genotype> {
        let (first, second) = self.split_genotype(genotype)?;
        Ok(self.canonical_pair(first, second))
    }

    /// The phenotype of a genotype, or the canonical genotype itself when
    /// the trait has no phenotype for it.
    pub fn phenotype_for(&self, genotype: &str) -> Result<Phenotype> {
        let canonical = self.canonical_genotype(genotype)?;
        Ok(match self.phenotype_map.get(&canonical) {
            Some(phenotype) => phenotype.clone(),
            None => canonical,
        })
    }

    /// Canonical genotypes, one per unordered allele pair.
    pub fn all_genotypes(&self) -> Vec<Genotype> {
        let mut genotypes = vec![];
        for (i, first) in self.alleles.iter().enumerate() {
            for second in self.alleles[i..].iter() {
                genotypes.push(self.canonical_pair(first, second));
            }
        }
        genotypes
    }

    /// Selectable genotypes with both heterozygous orders kept.
    pub fn genotype_options(&self) -> Vec<Genotype> {
        enumerate_genotypes(&self.alleles)
    }

    /// Sums genotype probabilities per phenotype and normalizes the result.
    pub fn phenotype_distribution(&self, genotypes: &Distribution) -> Result<Distribution> {
        let mut phenotypes = Distribution::new();
        for (genotype, probability) in genotypes.iter() {
            *phenotypes.entry(self.phenotype_for(genotype)?).or_insert(0.0) += probability;
        }
        Ok(phenotypes.normalized())
    }
}

/// Brown dominant, green intermediate, blue recessive.
pub fn eye_color() -> Trait {
    Trait::new("Eye Color", &["B", "G", "b"])
        .with_phenotype("BB", "Brown")
        .with_phenotype("BG", "Brown")
        .with_phenotype("Bb", "Brown")
        .with_phenotype("GG", "Green")
        .with_phenotype("Gb", "Green")
        .with_phenotype("bb", "Blue")
        .with_description(
            "Simplified eye color model with Brown dominant, Green intermediate, \
             and Blue recessive.",
        )
}

/// ABO blood group: A and B codominant, O recessive.
pub fn blood_type() -> Trait {
    Trait::new("Blood Type", &["A", "B", "O"])
        .with_phenotype("AA", "A")
        .with_phenotype("AO", "A")
        .with_phenotype("BB", "B")
        .with_phenotype("BO", "B")
        .with_phenotype("AB", "AB")
        .with_phenotype("OO", "O")
        .with_description("ABO blood group system with codominant A/B alleles and recessive O.")
}

pub fn hair_color() -> Trait {
    Trait::new("Hair Color", &["H", "h"])
        .with_phenotype("HH", "Brown")
        .with_phenotype("Hh", "Brown")
        .with_phenotype("hh", "Blonde")
        .with_description("Simplified hair color model with Brown dominant over Blonde.")
}

use crate::error::{Error, Result};
use crate::traits::{blood_type, eye_color, hair_color, Trait};
use crate::{Allele, Genotype, Phenotype};
use indexmap::IndexMap;

/// One observation about a trait, typically a row of a trait table.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TraitRecord {
    pub key: String,
    pub name: Option<String>,
    pub alleles: Vec<Allele>,
    pub genotype: Option<Genotype>,
    pub phenotype: Option<Phenotype>,
    pub description: Option<String>,
    pub meta: Vec<(String, String)>,
}

/// Traits by key, in the order they were first registered.
#[derive(Clone, Debug, Default)]
pub struct Registry {
    traits: IndexMap<String, Trait>,
}

impl Registry {
    /// Constructs a new empty `Registry`
    pub fn new() -> Self {
        Self {
            traits: IndexMap::new(),
        }
    }

    /// Eye color, blood type and hair color.
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        registry.insert("eye_color", eye_color());
        registry.insert("blood_type", blood_type());
        registry.insert("hair_color", hair_color());
        registry
    }

    pub fn insert(&mut self, key: &str, trait_: Trait) -> Option<Trait> {
        self.traits.insert(key.into(), trait_)
    }

    pub fn get(&self, key: &str) -> Option<&Trait> {
        self.traits.get(key)
    }

    pub fn require(&self, key: &str) -> Result<&Trait> {
        self.get(key).ok_or_else(|| Error::UnknownTrait(key.into()))
    }

    pub fn contains(&self, key: &str) -> bool {
        self.traits.contains_key(key)
    }

    pub fn keys(&self) -> Vec<&String> {
        self.traits.keys().collect()
    }

    pub fn len(&self) -> usize {
        self.traits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.traits.is_empty()
    }

    /// Folds a single `TraitRecord` into the registry.
    ///
    /// Creates the trait on first sight. New alleles are appended in the
    /// order they appear, and a genotype/phenotype pair is stored under the
    /// genotype's canonical form. A rejected record leaves the registry
    /// untouched.
    pub fn _observe(&mut self, record: TraitRecord) -> Result<()> {
        let mut trait_ = match self.traits.get(&record.key) {
            Some(existing) => existing.clone(),
            None => Trait::new(&record.key, &[]),
        };

        if let Some(name) = record.name {
            trait_.name = name;
        }
        for allele in record.alleles {
            if !trait_.alleles.contains(&allele) {
                trait_.alleles.push(allele);
            }
        }
        match (record.genotype, record.phenotype) {
            (Some(genotype), Some(phenotype)) => {
                let canonical = trait_.canonical_genotype(&genotype)?;
                trait_.phenotype_map.insert(canonical, phenotype);
            }
            (None, None) => {}
            _ => return Err(Error::IncompleteRecord(record.key)),
        }
        if let Some(description) = record.description {
            trait_.description = description;
        }
        trait_.metadata.extend(record.meta);

        self.traits.insert(record.key, trait_);
        Ok(())
    }

    /// Observe all the records in the argument.
    pub fn observe<I>(&mut self, records: I) -> Result<()>
    where
        I: Iterator<Item = Result<TraitRecord>>,
    {
        for record in records {
            self._observe(record?)?;
        }
        Ok(())
    }
}

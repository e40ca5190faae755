use thiserror::Error;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum Error {
    /// A genotype that cannot be split into two alleles of its trait.
    #[error("invalid genotype '{genotype}' for trait '{trait_name}', allowed alleles: {allowed:?}")]
    InvalidGenotype {
        trait_name: String,
        genotype: String,
        allowed: Vec<String>,
    },

    #[error("maximum {max} traits allowed, got {got}")]
    TooManyTraits { max: usize, got: usize },

    #[error("trait '{0}' not found in registry")]
    UnknownTrait(String),

    /// A delimited record that parsed but is missing required content.
    #[error("malformed trait record on line {line}: {reason}")]
    MalformedRecord { line: u64, reason: String },

    #[error("trait '{0}' record needs both a genotype and a phenotype, or neither")]
    IncompleteRecord(String),

    #[error(transparent)]
    Csv(#[from] csv::Error),
}

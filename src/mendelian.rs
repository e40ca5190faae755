use crate::distribution::{Distribution, DistributionExt};
use crate::error::Result;
use crate::joint::JointAggregator;
use crate::traits::Trait;
use crate::{Allele, Genotype};
use indexmap::IndexMap;
use log::trace;
use ndarray;
use rand::Rng;

/// Probability of each allele being passed on by a parent.
///
/// Each of the two alleles is transmitted with probability 0.5; a
/// homozygous parent transmits its single allele with probability 1.
pub fn gamete_distribution(genotype: &str, trait_: &Trait) -> Result<Distribution> {
    let (first, second) = trait_.split_genotype(genotype)?;
    let mut gametes = Distribution::new();
    for allele in [first, second].iter() {
        *gametes.entry(allele.to_string()).or_insert(0.0) += 0.5;
    }
    Ok(gametes)
}

/// Offspring genotypes of one cross, laid out as a grid.
///
/// Rows are the gametes of the first parent, columns those of the second.
/// Every cell holds the canonical genotype formed by its row and column.
pub struct PunnettSquare {
    rows: Vec<Allele>,
    columns: Vec<Allele>,
    cells: ndarray::Array2<Genotype>,
}

impl PunnettSquare {
    pub fn new(parent1: &str, parent2: &str, trait_: &Trait) -> Result<Self> {
        let (a, b) = trait_.split_genotype(parent1)?;
        let (c, d) = trait_.split_genotype(parent2)?;
        let rows = vec![a.to_string(), b.to_string()];
        let columns = vec![c.to_string(), d.to_string()];
        let cells = ndarray::Array2::from_shape_fn((rows.len(), columns.len()), |(i, j)| {
            trait_.canonical_pair(&rows[i], &columns[j])
        });
        Ok(Self {
            rows,
            columns,
            cells,
        })
    }

    pub fn rows(&self) -> &[Allele] {
        &self.rows
    }

    pub fn columns(&self) -> &[Allele] {
        &self.columns
    }

    pub fn cell(&self, row: usize, column: usize) -> Option<&Genotype> {
        self.cells.get((row, column))
    }

    /// Genotype frequencies over all cells, in row-major first-seen order.
    pub fn genotype_distribution(&self) -> Distribution {
        let share = 1.0 / self.cells.len() as f64;
        let mut genotypes = Distribution::new();
        for genotype in self.cells.iter() {
            *genotypes.entry(genotype.clone()).or_insert(0.0) += share;
        }
        genotypes.normalized()
    }
}

/// Draws single offspring genotypes of one cross at random.
///
/// Each child receives one gamete from each parent, drawn from the parent's
/// gamete distribution.
pub struct GameteSampler<'a> {
    trait_: &'a Trait,
    parent1: Distribution,
    parent2: Distribution,
}

impl<'a> GameteSampler<'a> {
    pub fn new(parent1: &str, parent2: &str, trait_: &'a Trait) -> Result<Self> {
        Ok(Self {
            trait_,
            parent1: gamete_distribution(parent1, trait_)?,
            parent2: gamete_distribution(parent2, trait_)?,
        })
    }

    pub fn trait_(&self) -> &Trait {
        self.trait_
    }

    /// The canonical genotype of one simulated child.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<Genotype> {
        let first = self.parent1.sample(rng)?;
        let second = self.parent2.sample(rng)?;
        Some(self.trait_.canonical_pair(first, second))
    }
}

/// Genotype probabilities of the offspring of two parents.
pub fn offspring_genotypes(parent1: &str, parent2: &str, trait_: &Trait) -> Result<Distribution> {
    let square = PunnettSquare::new(parent1, parent2, trait_)?;
    let genotypes = square.genotype_distribution();
    trace!(
        "{} x {} for '{}': {:?}",
        parent1,
        parent2,
        trait_.name,
        genotypes
    );
    Ok(genotypes)
}

/// Phenotype probabilities of the offspring of two parents.
pub fn offspring_phenotypes(parent1: &str, parent2: &str, trait_: &Trait) -> Result<Distribution> {
    trait_.phenotype_distribution(&offspring_genotypes(parent1, parent2, trait_)?)
}

/// Joint phenotype distribution over several independently assorting traits.
///
/// `crosses` maps a trait key to the trait and both parents' genotypes; its
/// order fixes the order of labels in the joint keys.
pub fn joint_phenotypes(
    crosses: &IndexMap<String, (&Trait, Genotype, Genotype)>,
    aggregator: &JointAggregator,
) -> Result<Distribution> {
    let mut distributions = Vec::with_capacity(crosses.len());
    for (_, (trait_, parent1, parent2)) in crosses.iter() {
        distributions.push(offspring_phenotypes(parent1, parent2, trait_)?);
    }
    Ok(aggregator.aggregate(&distributions))
}

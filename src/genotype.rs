use crate::Genotype;
use std::collections::BTreeSet;

/// Lists every genotype formable from two positions of `alleles`.
///
/// Homozygous pairs appear once; heterozygous pairs appear in both allele
/// orders (`"Aa"` and `"aA"` are distinct options). The result is
/// deduplicated and sorted lexicographically. No validation is performed on
/// the allele symbols themselves.
pub fn enumerate_genotypes<S: AsRef<str>>(alleles: &[S]) -> Vec<Genotype> {
    let mut genotypes = BTreeSet::new();
    for (i, first) in alleles.iter().enumerate() {
        let first = first.as_ref();
        genotypes.insert(format!("{}{}", first, first));
        for second in alleles[i + 1..].iter() {
            let second = second.as_ref();
            genotypes.insert(format!("{}{}", first, second));
            genotypes.insert(format!("{}{}", second, first));
        }
    }
    genotypes.into_iter().collect()
}

pub fn contains_allele(pair: (&str, &str), allele: &str) -> bool {
    pair.0 == allele || pair.1 == allele
}

pub fn is_homozygous(pair: (&str, &str), allele: &str) -> bool {
    pair.0 == allele && pair.1 == allele
}

/// True when exactly one of the two alleles is `allele`.
pub fn is_heterozygous(pair: (&str, &str), allele: &str) -> bool {
    (pair.0 == allele) ^ (pair.1 == allele)
}

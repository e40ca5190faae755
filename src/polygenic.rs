use crate::Dosages;

/// Expected polygenic score of an offspring.
///
/// The offspring dosage at each weighted SNP is the mean of the parents'
/// dosages; SNPs a parent does not list count as dosage 0.
pub fn polygenic_score(parent1: &Dosages, parent2: &Dosages, weights: &Dosages) -> f64 {
    weights.iter().fold(0.0, |score, (snp, weight)| {
        let dosage1 = parent1.get(snp).copied().unwrap_or(0.0);
        let dosage2 = parent2.get(snp).copied().unwrap_or(0.0);
        score + (dosage1 + dosage2) / 2.0 * weight
    })
}

use crate::config::SimulatorConfig;
use crate::distribution::{Distribution, DistributionExt, JointDistribution, Scale};
use crate::error::{Error, Result};
use crate::mendelian::{joint_phenotypes, offspring_genotypes, GameteSampler};
use crate::polygenic::polygenic_score;
use crate::registry::Registry;
use crate::traits::Trait;
use crate::{Dosages, Genotype, ParentGenotypes};
use indexmap::IndexMap;
use log::debug;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Offspring distributions of a single trait.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TraitCross {
    pub genotypic_ratios: Distribution,
    pub phenotypic_ratios: Distribution,
}

/// Crosses parents over the traits of a `Registry`.
pub struct Simulator {
    registry: Registry,
    config: SimulatorConfig,
}

impl Simulator {
    pub fn new(registry: Registry, config: SimulatorConfig) -> Self {
        Self { registry, config }
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn config(&self) -> &SimulatorConfig {
        &self.config
    }

    fn check_trait_count(&self, got: usize) -> Result<()> {
        if got > self.config.max_traits {
            return Err(Error::TooManyTraits {
                max: self.config.max_traits,
                got,
            });
        }
        Ok(())
    }

    /// Keys present for both parents, in the first parent's order.
    fn shared_keys<'a>(parent1: &'a ParentGenotypes, parent2: &ParentGenotypes) -> Vec<&'a str> {
        parent1
            .keys()
            .filter(|key| parent2.contains_key(key.as_str()))
            .map(String::as_str)
            .collect()
    }

    /// Shared keys that name a registered trait, with the trait.
    fn known_traits<'a>(&'a self, keys: Vec<&'a str>) -> Vec<(&'a str, &'a Trait)> {
        keys.into_iter()
            .filter_map(|key| match self.registry.get(key) {
                Some(trait_) => Some((key, trait_)),
                None => {
                    debug!("skipping '{}': not in registry", key);
                    None
                }
            })
            .collect()
    }

    fn present(&self, distribution: &Distribution) -> Distribution {
        if self.config.as_percentages {
            distribution.to_percentages()
        } else {
            distribution.normalized()
        }
    }

    /// Genotypic and phenotypic ratios for every trait both parents list.
    ///
    /// Traits missing from the registry are skipped.
    pub fn simulate_mendelian_traits(
        &self,
        parent1: &ParentGenotypes,
        parent2: &ParentGenotypes,
    ) -> Result<IndexMap<String, TraitCross>> {
        let keys = Self::shared_keys(parent1, parent2);
        self.check_trait_count(keys.len())?;

        let mut results = IndexMap::new();
        for (key, trait_) in self.known_traits(keys) {
            let genotypes = offspring_genotypes(&parent1[key], &parent2[key], trait_)?;
            let phenotypes = trait_.phenotype_distribution(&genotypes)?;
            results.insert(
                key.to_owned(),
                TraitCross {
                    genotypic_ratios: self.present(&genotypes),
                    phenotypic_ratios: self.present(&phenotypes),
                },
            );
        }
        Ok(results)
    }

    /// Joint phenotype distribution over every registered trait both
    /// parents list, e.g. `"Brown+Curly"`.
    ///
    /// Empty when none of the shared traits is registered.
    pub fn simulate_joint_phenotypes(
        &self,
        parent1: &ParentGenotypes,
        parent2: &ParentGenotypes,
    ) -> Result<JointDistribution> {
        let keys = Self::shared_keys(parent1, parent2);
        self.check_trait_count(keys.len())?;

        let crosses: IndexMap<String, (&Trait, Genotype, Genotype)> = self
            .known_traits(keys)
            .into_iter()
            .map(|(key, trait_)| {
                (
                    key.to_owned(),
                    (trait_, parent1[key].clone(), parent2[key].clone()),
                )
            })
            .collect();
        if crosses.is_empty() {
            return Ok(JointDistribution::new());
        }

        let joint = joint_phenotypes(&crosses, &self.config.aggregator())?;
        Ok(self.present(&joint))
    }

    /// Observed joint phenotype frequencies over `simulations` random
    /// children (at least one), each drawn gamete by gamete.
    ///
    /// Converges on `simulate_joint_phenotypes` as the number of children
    /// grows. Labels appear in the order they were first observed.
    pub fn simulate_sampled<R: Rng + ?Sized>(
        &self,
        parent1: &ParentGenotypes,
        parent2: &ParentGenotypes,
        rng: &mut R,
    ) -> Result<JointDistribution> {
        let keys = Self::shared_keys(parent1, parent2);
        self.check_trait_count(keys.len())?;

        let samplers = self
            .known_traits(keys)
            .into_iter()
            .map(|(key, trait_)| GameteSampler::new(&parent1[key], &parent2[key], trait_))
            .collect::<Result<Vec<_>>>()?;
        if samplers.is_empty() {
            return Ok(JointDistribution::new());
        }

        let simulations = self.config.simulations.max(1);
        let mut counts = JointDistribution::new();
        for _ in 0..simulations {
            let mut phenotypes = Vec::with_capacity(samplers.len());
            for sampler in samplers.iter() {
                if let Some(child) = sampler.sample(rng) {
                    phenotypes.push(sampler.trait_().phenotype_for(&child)?);
                }
            }
            *counts
                .entry(phenotypes.join(&self.config.separator))
                .or_insert(0.0) += 1.0;
        }
        debug!("{} sampled children, {} outcomes", simulations, counts.len());
        Ok(self.present(&counts))
    }

    /// Combines per-trait distributions already computed elsewhere, such as
    /// the ratios returned by `simulate_mendelian_traits`.
    pub fn aggregate(&self, distributions: &[Distribution], scale: Scale) -> JointDistribution {
        self.config.aggregator().scale(scale).aggregate(distributions)
    }

    fn genotypes_by_key<F>(
        &self,
        keys: &[&str],
        genotypes: F,
    ) -> Result<IndexMap<String, Vec<Genotype>>>
    where
        F: Fn(&Trait) -> Vec<Genotype>,
    {
        self.check_trait_count(keys.len())?;
        keys.iter()
            .map(|key| Ok((key.to_string(), genotypes(self.registry.require(key)?))))
            .collect()
    }

    /// Canonical genotypes of each trait, sorted.
    pub fn possible_genotypes(&self, keys: &[&str]) -> Result<IndexMap<String, Vec<Genotype>>> {
        self.genotypes_by_key(keys, |trait_| {
            let mut genotypes = trait_.all_genotypes();
            genotypes.sort();
            genotypes.dedup();
            genotypes
        })
    }

    /// Selectable genotypes of each trait, both heterozygous orders kept.
    pub fn genotype_options(&self, keys: &[&str]) -> Result<IndexMap<String, Vec<Genotype>>> {
        self.genotypes_by_key(keys, Trait::genotype_options)
    }

    pub fn simulate_polygenic_trait(
        &self,
        parent1: &Dosages,
        parent2: &Dosages,
        weights: &Dosages,
    ) -> f64 {
        polygenic_score(parent1, parent2, weights)
    }
}

impl Default for Simulator {
    fn default() -> Self {
        Self::new(Registry::builtin(), SimulatorConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::error::Error;

    fn parents(entries: &[(&str, &str)]) -> ParentGenotypes {
        entries
            .iter()
            .map(|(key, genotype)| (key.to_string(), genotype.to_string()))
            .collect()
    }

    #[test]
    fn test_mendelian_traits() -> Result<(), Box<dyn Error>> {
        let simulator = Simulator::default();
        let results = simulator.simulate_mendelian_traits(
            &parents(&[("blood_type", "AO"), ("eye_color", "Bb"), ("freckles", "Ff")]),
            &parents(&[("eye_color", "bb"), ("blood_type", "BO"), ("freckles", "ff")]),
        )?;
        assert_eq!(results.keys().collect::<Vec<_>>(), vec!["blood_type", "eye_color"]);
        let eye = &results["eye_color"];
        assert!((eye.genotypic_ratios["Bb"] - 0.5).abs() < 1e-12);
        assert!((eye.phenotypic_ratios["Blue"] - 0.5).abs() < 1e-12);
        Ok(())
    }

    #[test]
    fn test_mendelian_traits_as_percentages() -> Result<(), Box<dyn Error>> {
        let config = SimulatorConfig {
            as_percentages: true,
            ..SimulatorConfig::default()
        };
        let simulator = Simulator::new(Registry::builtin(), config);
        let results = simulator.simulate_mendelian_traits(
            &parents(&[("hair_color", "Hh")]),
            &parents(&[("hair_color", "Hh")]),
        )?;
        let hair = &results["hair_color"];
        assert!((hair.genotypic_ratios["Hh"] - 50.0).abs() < 1e-9);
        assert!((hair.phenotypic_ratios["Brown"] - 75.0).abs() < 1e-9);
        Ok(())
    }

    #[test]
    fn test_too_many_traits() {
        let config = SimulatorConfig {
            max_traits: 2,
            ..SimulatorConfig::default()
        };
        let simulator = Simulator::new(Registry::builtin(), config);
        let p = parents(&[("eye_color", "BB"), ("blood_type", "AA"), ("hair_color", "hh")]);
        assert!(simulator.simulate_mendelian_traits(&p, &p).is_err());
        assert!(simulator.simulate_joint_phenotypes(&p, &p).is_err());
        assert!(simulator
            .possible_genotypes(&["eye_color", "blood_type", "hair_color"])
            .is_err());
    }

    #[test]
    fn test_joint_without_known_traits_is_empty() -> Result<(), Box<dyn Error>> {
        let simulator = Simulator::default();
        let p = parents(&[("freckles", "Ff")]);
        assert!(simulator.simulate_joint_phenotypes(&p, &p)?.is_empty());
        Ok(())
    }

    #[test]
    fn test_joint_blood_and_hair() -> Result<(), Box<dyn Error>> {
        let simulator = Simulator::default();
        let joint = simulator.simulate_joint_phenotypes(
            &parents(&[("blood_type", "AO"), ("hair_color", "Hh")]),
            &parents(&[("blood_type", "BO"), ("hair_color", "hh")]),
        )?;
        assert_eq!(joint.len(), 8);
        assert!((joint["AB+Brown"] - 0.125).abs() < 1e-12);
        assert!((joint["O+Blonde"] - 0.125).abs() < 1e-12);
        assert!(joint.is_normalized(Scale::Fraction, 1e-9));
        Ok(())
    }

    #[test]
    fn test_invalid_genotype_is_reported() {
        let simulator = Simulator::default();
        let result = simulator.simulate_joint_phenotypes(
            &parents(&[("eye_color", "XY")]),
            &parents(&[("eye_color", "bb")]),
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_possible_genotypes() -> Result<(), Box<dyn Error>> {
        let simulator = Simulator::default();
        let genotypes = simulator.possible_genotypes(&["hair_color", "blood_type"])?;
        assert_eq!(genotypes["hair_color"], vec!["HH", "Hh", "hh"]);
        assert_eq!(genotypes["blood_type"], vec!["AA", "AB", "AO", "BB", "BO", "OO"]);
        assert!(simulator.possible_genotypes(&["widow_peak"]).is_err());
        Ok(())
    }

    #[test]
    fn test_genotype_options() -> Result<(), Box<dyn Error>> {
        let options = Simulator::default().genotype_options(&["hair_color"])?;
        assert_eq!(options["hair_color"], vec!["HH", "Hh", "hH", "hh"]);
        Ok(())
    }

    #[test]
    fn test_aggregate_server_percentages() -> Result<(), Box<dyn Error>> {
        let simulator = Simulator::default();
        let p = parents(&[("eye_color", "Bb"), ("hair_color", "Hh"), ("blood_type", "AB")]);
        let config = SimulatorConfig {
            as_percentages: true,
            ..SimulatorConfig::default()
        };
        let crosses =
            Simulator::new(Registry::builtin(), config).simulate_mendelian_traits(&p, &p)?;
        let distributions: Vec<Distribution> = crosses
            .values()
            .map(|cross| cross.phenotypic_ratios.clone())
            .collect();
        let joint = simulator.aggregate(&distributions, Scale::Percentage);
        assert!(joint.is_normalized(Scale::Percentage, 1e-6));
        let local = simulator.simulate_joint_phenotypes(&p, &p)?.to_percentages();
        assert_eq!(joint.keys().collect::<Vec<_>>(), local.keys().collect::<Vec<_>>());
        for (label, percentage) in joint.iter() {
            assert!((percentage - local[label]).abs() < 1e-9, "{}", label);
        }
        assert!((joint["Brown+Brown+AB"] - 28.125).abs() < 1e-9);
        Ok(())
    }

    fn dihybrid() -> Registry {
        let mut registry = Registry::new();
        registry.insert(
            "eye_color",
            Trait::new("Eye Color", &["B", "b"])
                .with_phenotype("BB", "Brown")
                .with_phenotype("Bb", "Brown")
                .with_phenotype("bb", "Blue"),
        );
        registry.insert(
            "hair_texture",
            Trait::new("Hair Texture", &["C", "c"])
                .with_phenotype("CC", "Curly")
                .with_phenotype("Cc", "Curly")
                .with_phenotype("cc", "Straight"),
        );
        registry
    }

    fn sampling(simulations: usize) -> Simulator {
        let config = SimulatorConfig {
            simulations,
            ..SimulatorConfig::default()
        };
        Simulator::new(dihybrid(), config)
    }

    #[test]
    fn test_sampled_dihybrid_approaches_ratio() -> Result<(), Box<dyn Error>> {
        let p = parents(&[("eye_color", "Bb"), ("hair_texture", "Cc")]);
        let mut rng = StdRng::seed_from_u64(7);
        let observed = sampling(4000).simulate_sampled(&p, &p, &mut rng)?;
        let expected = ["Brown+Curly", "Brown+Straight", "Blue+Curly", "Blue+Straight"];
        assert!(observed.keys().all(|label| expected.contains(&label.as_str())));
        assert!(observed.is_normalized(Scale::Fraction, 1e-9));
        assert!((observed["Brown+Curly"] - 0.5625).abs() < 0.04);
        Ok(())
    }

    #[test]
    fn test_sampled_is_reproducible() -> Result<(), Box<dyn Error>> {
        let simulator = sampling(50);
        let p = parents(&[("eye_color", "Bb"), ("hair_texture", "Cc")]);
        let first = simulator.simulate_sampled(&p, &p, &mut StdRng::seed_from_u64(3))?;
        let second = simulator.simulate_sampled(&p, &p, &mut StdRng::seed_from_u64(3))?;
        assert_eq!(first, second);
        Ok(())
    }

    #[test]
    fn test_sampled_draws_at_least_once() -> Result<(), Box<dyn Error>> {
        let p1 = parents(&[("eye_color", "BB")]);
        let p2 = parents(&[("eye_color", "bb")]);
        let mut rng = StdRng::seed_from_u64(1);
        let observed = sampling(0).simulate_sampled(&p1, &p2, &mut rng)?;
        assert_eq!(observed.len(), 1);
        assert_eq!(observed["Brown"], 1.0);
        Ok(())
    }

    #[test]
    fn test_sampled_limits_and_unknown_traits() -> Result<(), Box<dyn Error>> {
        let mut rng = StdRng::seed_from_u64(5);
        let config = SimulatorConfig {
            max_traits: 1,
            ..SimulatorConfig::default()
        };
        let limited = Simulator::new(dihybrid(), config);
        let p = parents(&[("eye_color", "Bb"), ("hair_texture", "Cc")]);
        assert!(limited.simulate_sampled(&p, &p, &mut rng).is_err());

        let unknown = parents(&[("freckles", "Ff")]);
        assert!(sampling(10)
            .simulate_sampled(&unknown, &unknown, &mut rng)?
            .is_empty());
        Ok(())
    }

    #[test]
    fn test_polygenic() {
        let p1: Dosages = vec![("rs1".to_string(), 2.0)].into_iter().collect();
        let p2 = Dosages::new();
        let weights: Dosages = vec![("rs1".to_string(), 1.5)].into_iter().collect();
        assert_eq!(Simulator::default().simulate_polygenic_trait(&p1, &p2, &weights), 1.5);
    }
}

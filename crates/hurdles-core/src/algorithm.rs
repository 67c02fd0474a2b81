//! Generational driver: seed, evaluate in a shared world, select, breed,
//! mutate, repeat.

use crate::config::{EvolutionConfig, PhenotypeKind};
use crate::error::{AlgorithmError, GeneticError};
use crate::genome::Genotype;
use crate::individual::Individual;
use crate::policy::PhenotypeMap;
use crate::report::{AlgorithmReport, GenerationReport};
use crate::rng::{create_rng, UniformSource};
use crate::world::{RunOutcome, World};
use rand_chacha::ChaCha12Rng;
use tracing::{info, warn};

pub struct GeneticAlgorithm<R = ChaCha12Rng, M = PhenotypeKind> {
    config: EvolutionConfig,
    source: R,
    phenotype_map: M,
    generation: usize,
    population: Vec<Individual>,
}

impl GeneticAlgorithm {
    /// Driver seeded from `config.seed`, decoding with `config.phenotype`.
    pub fn new(config: EvolutionConfig) -> Result<Self, AlgorithmError> {
        let source = create_rng(config.seed);
        let phenotype_map = config.phenotype;
        Self::with_source(config, source, phenotype_map)
    }
}

impl<R: UniformSource, M: PhenotypeMap> GeneticAlgorithm<R, M> {
    pub fn with_source(
        config: EvolutionConfig,
        source: R,
        phenotype_map: M,
    ) -> Result<Self, AlgorithmError> {
        config.validate()?;
        Ok(Self {
            config,
            source,
            phenotype_map,
            generation: 0,
            population: Vec::new(),
        })
    }

    pub fn config(&self) -> &EvolutionConfig {
        &self.config
    }

    /// Number of generations evaluated so far.
    pub fn generation(&self) -> usize {
        self.generation
    }

    /// Most recently evaluated population.
    pub fn population(&self) -> &[Individual] {
        &self.population
    }

    pub fn decode(&self, genotype: Genotype) -> Result<Individual, GeneticError> {
        let phenotype = self.phenotype_map.phenotype(&genotype)?;
        Ok(Individual::new(genotype, phenotype))
    }

    /// `population_size` individuals with genotypes drawn from `0..seed_max`.
    pub fn seed_generation(&mut self) -> Result<Vec<Individual>, GeneticError> {
        let seed_max = self.config.seed_max;
        let mut seeded = Vec::with_capacity(self.config.population_size);
        for _ in 0..self.config.population_size {
            let value = ((self.source.uniform() * seed_max as f64).floor() as u64)
                .min(seed_max.saturating_sub(1));
            let genotype = Genotype::from_int(value, self.config.mutation_rate)?;
            seeded.push(self.decode(genotype)?);
        }
        Ok(seeded)
    }

    /// Evaluate every individual as one agent in a single shared world.
    pub fn run_generation(&self, individuals: &[Individual]) -> Result<RunOutcome, AlgorithmError> {
        let policies = individuals.iter().map(Individual::phenotype).collect();
        let mut world = World::new(policies, self.config.world.clone())?;
        Ok(world.run())
    }

    /// Copy termination frames and histories back onto the individuals,
    /// matched by insertion order.
    pub fn post_process_generation(&self, individuals: &mut [Individual], outcome: RunOutcome) {
        for (individual, agent) in individuals.iter_mut().zip(outcome.agents) {
            individual.record_evaluation(agent.termination_frame, agent.history);
        }
    }

    /// Pair up the fitter half of `individuals` at random, without replacement.
    pub fn select(
        &mut self,
        individuals: &[Individual],
    ) -> Result<Vec<[Individual; 2]>, GeneticError> {
        let mut ranked = individuals
            .iter()
            .map(|i| i.fitness().map(|f| (f, i)))
            .collect::<Result<Vec<_>, _>>()?;
        ranked.sort_by(|a, b| b.0.cmp(&a.0));

        let mut pool: Vec<&Individual> = ranked
            .into_iter()
            .take(individuals.len() / 2)
            .map(|(_, i)| i)
            .collect();
        let mut pairs = Vec::with_capacity(pool.len() / 2);
        while pool.len() >= 2 {
            let first = pool.remove(self.source.index_below(pool.len()));
            let second = pool.remove(self.source.index_below(pool.len()));
            pairs.push([first.clone(), second.clone()]);
        }
        Ok(pairs)
    }

    /// Single-point crossover of exactly two parents. Both children record
    /// both parents' genotypes.
    pub fn breed(&mut self, parents: &[Individual]) -> Result<[Individual; 2], GeneticError> {
        let [a, b] = parents else {
            return Err(GeneticError::InvalidParentCount {
                actual: parents.len(),
            });
        };
        let (shorter, longer) = if b.genotype().len() < a.genotype().len() {
            (b.genotype(), a.genotype())
        } else {
            (a.genotype(), b.genotype())
        };
        let position = self.source.index_below(shorter.len() + 1);
        let (child_a, child_b) = shorter.crossover(longer, position)?;
        let provenance = [a.genotype().clone(), b.genotype().clone()];
        Ok([
            self.decode(child_a)?.with_parents(provenance.clone()),
            self.decode(child_b)?.with_parents(provenance),
        ])
    }

    /// Flip one random bit of a copy of the genotype and re-decode it.
    pub fn mutate(&mut self, individual: &Individual) -> Result<Individual, GeneticError> {
        let mut genotype = individual.genotype().clone();
        genotype.mutate(&mut self.source);
        let phenotype = self.phenotype_map.phenotype(&genotype)?;
        Ok(individual.reset_with(genotype, phenotype))
    }

    pub fn check_termination(&self) -> bool {
        self.generation >= self.config.generations
    }

    fn next_generation(&mut self, current: &[Individual]) -> Result<Vec<Individual>, AlgorithmError> {
        let mut pairs = Vec::new();
        for _ in 0..self.config.selection_rounds {
            pairs.extend(self.select(current)?);
        }
        let mut next = Vec::with_capacity(pairs.len() * 2);
        for pair in &pairs {
            for child in self.breed(pair)? {
                next.push(self.mutate(&child)?);
            }
        }
        if next.is_empty() {
            return Err(AlgorithmError::ExtinctGeneration {
                generation: self.generation,
            });
        }
        if next.len() < current.len() {
            warn!(
                generation = self.generation,
                from = current.len(),
                to = next.len(),
                "population shrank"
            );
        }
        Ok(next)
    }

    /// Run every configured generation and collect the per-generation reports.
    pub fn run(&mut self) -> Result<AlgorithmReport, AlgorithmError> {
        let mut population = self.seed_generation()?;
        let mut generations = Vec::with_capacity(self.config.generations);

        while !self.check_termination() {
            let outcome = self.run_generation(&population)?;
            self.post_process_generation(&mut population, outcome);
            let report = GenerationReport::from_individuals(self.generation, &population)?;
            info!(
                generation = self.generation,
                population = report.population_size,
                best_fitness = report.best_fitness,
                mean_fitness = report.mean_fitness,
                "generation evaluated"
            );
            generations.push(report);
            self.generation += 1;

            if self.check_termination() {
                break;
            }
            population = self.next_generation(&population)?;
        }

        self.population = population;
        Ok(AlgorithmReport::new(self.config.seed, generations))
    }

    /// Re-simulate `individuals` with frame capture on, for rendering.
    pub fn replay(&self, individuals: &[Individual]) -> Result<RunOutcome, AlgorithmError> {
        let mut world_config = self.config.world.clone();
        world_config.record_frames = true;
        let policies = individuals.iter().map(Individual::phenotype).collect();
        let mut world = World::new(policies, world_config)?;
        Ok(world.run())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::policy::JumpPolicy;
    use crate::rng::SequenceSource;

    fn config(population_size: usize) -> EvolutionConfig {
        EvolutionConfig {
            population_size,
            phenotype: PhenotypeKind::ConstantInterval,
            ..EvolutionConfig::default()
        }
    }

    fn scripted(
        values: impl IntoIterator<Item = f64>,
    ) -> GeneticAlgorithm<SequenceSource, PhenotypeKind> {
        GeneticAlgorithm::with_source(
            config(4),
            SequenceSource::new(values),
            PhenotypeKind::ConstantInterval,
        )
        .unwrap()
    }

    fn evaluated(ga: &GeneticAlgorithm<SequenceSource>, value: u64, fitness: u32) -> Individual {
        let mut ind = ga.decode(Genotype::from_int(value, 0.25).unwrap()).unwrap();
        ind.record_evaluation(fitness, Vec::new());
        ind
    }

    #[test]
    fn rejects_invalid_config() {
        let err = GeneticAlgorithm::new(config(2)).err();
        assert!(matches!(err, Some(AlgorithmError::Config(_))));
    }

    #[test]
    fn seeds_from_uniform_draws_below_seed_max() {
        let mut ga = scripted([0.0, 0.5, 0.999]);
        let seeded = ga.seed_generation().unwrap();
        let values: Vec<u64> = seeded.iter().map(|i| i.genotype().to_int().unwrap()).collect();
        assert_eq!(values, vec![0, 50, 99, 0]);
        assert_eq!(seeded[1].genotype().literal().to_string(), "0b110010");
        assert_eq!(seeded[1].phenotype(), JumpPolicy::ConstantInterval { period: 50 });
        assert!(seeded.iter().all(|i| i.genotype().mutation_rate() == 0.25));
        assert!(seeded.iter().all(|i| i.parents().is_none()));
    }

    #[test]
    fn breed_requires_two_parents() {
        let mut ga = scripted([0.5]);
        let one = evaluated(&ga, 3, 1);
        assert_eq!(
            ga.breed(std::slice::from_ref(&one)).err(),
            Some(GeneticError::InvalidParentCount { actual: 1 })
        );
        let three = vec![one.clone(), one.clone(), one];
        assert_eq!(
            ga.breed(&three).err(),
            Some(GeneticError::InvalidParentCount { actual: 3 })
        );
    }

    #[test]
    fn breed_crosses_within_shorter_parent() {
        let mut ga = scripted([0.5]);
        let long = ga.decode(Genotype::from_int(157, 0.1).unwrap()).unwrap();
        let short = ga.decode(Genotype::from_int(12, 0.3).unwrap()).unwrap();
        let [a, b] = ga.breed(&[long.clone(), short.clone()]).unwrap();

        // index_below(4 + 1) with 0.5 picks position 2.
        assert_eq!(a.genotype().literal().to_string(), "0b11011101");
        assert_eq!(b.genotype().literal().to_string(), "0b1000");
        assert_eq!(a.genotype().mutation_rate(), 0.3);
        assert_eq!(b.genotype().mutation_rate(), 0.1);
        assert_eq!(b.phenotype(), JumpPolicy::ConstantInterval { period: 8 });
        let expected = [long.genotype().clone(), short.genotype().clone()];
        assert_eq!(a.parents(), Some(&expected));
        assert_eq!(b.parents(), Some(&expected));
        assert_eq!(a.fitness(), Err(GeneticError::UninitializedFitness));
    }

    #[test]
    fn mutate_flips_one_bit_and_resets_evaluation() {
        let mut ga = scripted([0.0]);
        let original = evaluated(&ga, 12, 50);
        let mutated = ga.mutate(&original).unwrap();
        assert_eq!(mutated.genotype().literal().to_string(), "0b0100");
        assert_eq!(mutated.phenotype(), JumpPolicy::ConstantInterval { period: 4 });
        assert_eq!(
            mutated
                .genotype()
                .literal()
                .hamming_distance(original.genotype().literal()),
            1
        );
        assert_eq!(mutated.fitness(), Err(GeneticError::UninitializedFitness));
        assert_eq!(mutated.history(), Err(GeneticError::UninitializedHistory));
        assert_eq!(original.fitness(), Ok(50));
    }

    #[test]
    fn select_pairs_from_fitter_half() {
        let mut ga = scripted([0.0]);
        let individuals: Vec<Individual> =
            (0..10).map(|f| evaluated(&ga, u64::from(f) + 1, f)).collect();
        let pairs = ga.select(&individuals).unwrap();
        let fitness: Vec<[u32; 2]> = pairs
            .iter()
            .map(|[a, b]| [a.fitness().unwrap(), b.fitness().unwrap()])
            .collect();
        assert_eq!(fitness, vec![[9, 8], [7, 6]]);
    }

    #[test]
    fn select_requires_fitness() {
        let mut ga = scripted([0.0]);
        let pending = ga.decode(Genotype::from_int(3, 0.25).unwrap()).unwrap();
        let individuals = vec![pending.clone(), pending.clone(), pending.clone(), pending];
        assert_eq!(
            ga.select(&individuals).err(),
            Some(GeneticError::UninitializedFitness)
        );
    }

    #[test]
    fn post_process_copies_termination_frames() {
        let ga = scripted([0.0]);
        let mut individuals = vec![
            ga.decode(Genotype::from_int(10, 0.25).unwrap()).unwrap(),
            ga.decode(Genotype::from_int(25, 0.25).unwrap()).unwrap(),
        ];
        let outcome = ga.run_generation(&individuals).unwrap();
        ga.post_process_generation(&mut individuals, outcome);
        assert_eq!(individuals[0].fitness(), Ok(200));
        assert_eq!(individuals[1].fitness(), Ok(76));
        assert_eq!(individuals[1].history().map(<[_]>::len), Ok(77));
    }

    #[test]
    fn run_stops_after_configured_generations() {
        let mut ga = GeneticAlgorithm::new(EvolutionConfig {
            generations: 3,
            ..EvolutionConfig::default()
        })
        .unwrap();
        let report = ga.run().unwrap();
        assert!(ga.check_termination());
        assert_eq!(ga.generation(), 3);
        let sizes: Vec<usize> = report.generations.iter().map(|g| g.population_size).collect();
        assert_eq!(sizes, vec![10, 8, 8]);
        assert_eq!(ga.population().len(), 8);
        assert!(report.generations[1..]
            .iter()
            .flat_map(|g| &g.individuals)
            .all(|i| i.parent_literals.is_some()));
        assert!(report
            .generations
            .iter()
            .flat_map(|g| &g.individuals)
            .all(|i| i.fitness <= 200));
    }

    #[test]
    fn same_seed_reproduces_report() {
        let cfg = EvolutionConfig {
            generations: 4,
            ..EvolutionConfig::default()
        };
        let first = GeneticAlgorithm::new(cfg.clone()).unwrap().run().unwrap();
        let second = GeneticAlgorithm::new(cfg).unwrap().run().unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn replay_records_one_grid_per_frame() {
        let ga = scripted([0.0]);
        let individuals = vec![ga.decode(Genotype::from_int(25, 0.25).unwrap()).unwrap()];
        let outcome = ga.replay(&individuals).unwrap();
        assert_eq!(outcome.frames.len(), 200);
        assert_eq!(outcome.agents[0].termination_frame, 76);
        assert!(!ga.config().world.record_frames);
    }
}

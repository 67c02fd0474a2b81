//! Serializable run records handed to the report sink.

use crate::constants::REPORT_SCHEMA_VERSION;
use crate::error::GeneticError;
use crate::individual::Individual;
use crate::policy::JumpPolicy;
use crate::world::Action;
use serde::{Deserialize, Serialize};

fn default_schema_version() -> u32 {
    REPORT_SCHEMA_VERSION
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct IndividualReport {
    /// Genotype literal, e.g. `0b1011`.
    pub literal: String,
    pub parent_literals: Option<[String; 2]>,
    pub phenotype: JumpPolicy,
    /// One entry per frame the individual acted in.
    pub history: Vec<Option<Action>>,
    pub fitness: u32,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GenerationReport {
    pub generation: usize,
    pub population_size: usize,
    pub best_fitness: u32,
    pub mean_fitness: f64,
    pub individuals: Vec<IndividualReport>,
}

impl GenerationReport {
    /// Summarize an evaluated generation. Fails if any individual is missing
    /// its fitness or history.
    pub fn from_individuals(
        generation: usize,
        individuals: &[Individual],
    ) -> Result<Self, GeneticError> {
        let individuals = individuals
            .iter()
            .map(Individual::report)
            .collect::<Result<Vec<_>, _>>()?;
        let best_fitness = individuals.iter().map(|r| r.fitness).max().unwrap_or(0);
        let mean_fitness = if individuals.is_empty() {
            0.0
        } else {
            individuals.iter().map(|r| f64::from(r.fitness)).sum::<f64>()
                / individuals.len() as f64
        };
        Ok(Self {
            generation,
            population_size: individuals.len(),
            best_fitness,
            mean_fitness,
            individuals,
        })
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AlgorithmReport {
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,
    pub seed: u64,
    pub generations: Vec<GenerationReport>,
}

impl AlgorithmReport {
    pub fn new(seed: u64, generations: Vec<GenerationReport>) -> Self {
        Self {
            schema_version: REPORT_SCHEMA_VERSION,
            seed,
            generations,
        }
    }

    pub fn best_fitness(&self) -> Option<u32> {
        self.generations.iter().map(|g| g.best_fitness).max()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::genome::Genotype;

    fn evaluated(value: u64, fitness: u32) -> Individual {
        let genotype = Genotype::from_int(value, 0.25).unwrap();
        let mut individual =
            Individual::new(genotype, JumpPolicy::ConstantInterval { period: value });
        individual.record_evaluation(fitness, vec![None, Some(Action::Jump)]);
        individual
    }

    #[test]
    fn generation_report_summarizes_fitness() {
        let report =
            GenerationReport::from_individuals(3, &[evaluated(10, 200), evaluated(25, 76)])
                .unwrap();
        assert_eq!(report.generation, 3);
        assert_eq!(report.population_size, 2);
        assert_eq!(report.best_fitness, 200);
        assert_eq!(report.mean_fitness, 138.0);
        assert_eq!(report.individuals[1].literal, "0b11001");
    }

    #[test]
    fn generation_report_requires_evaluated_individuals() {
        let pending = Individual::new(
            Genotype::from_int(5, 0.25).unwrap(),
            JumpPolicy::ConstantInterval { period: 5 },
        );
        assert_eq!(
            GenerationReport::from_individuals(0, &[evaluated(1, 1), pending]),
            Err(GeneticError::UninitializedFitness)
        );
    }

    #[test]
    fn algorithm_report_json_shape() {
        let generation = GenerationReport::from_individuals(0, &[evaluated(2, 40)]).unwrap();
        let report = AlgorithmReport::new(42, vec![generation]);
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["schema_version"], 1);
        assert_eq!(json["seed"], 42);
        let individual = &json["generations"][0]["individuals"][0];
        assert_eq!(individual["literal"], "0b10");
        assert_eq!(individual["parent_literals"], serde_json::Value::Null);
        assert_eq!(individual["history"], serde_json::json!([null, "jump"]));
        assert_eq!(individual["fitness"], 40);
        assert_eq!(individual["phenotype"]["kind"], "constant_interval");
        assert_eq!(report.best_fitness(), Some(40));
    }

    #[test]
    fn missing_schema_version_defaults() {
        let report: AlgorithmReport =
            serde_json::from_str(r#"{"seed": 7, "generations": []}"#).unwrap();
        assert_eq!(report.schema_version, REPORT_SCHEMA_VERSION);
        assert_eq!(report.best_fitness(), None);
    }
}

use crate::error::GeneticError;
use crate::genome::Genotype;
use crate::policy::JumpPolicy;
use crate::report::IndividualReport;
use crate::world::Action;

/// Candidate solution: a genotype, the policy decoded from it, and, once its
/// generation has been simulated, the fitness and per-frame history.
#[derive(Clone, Debug, PartialEq)]
pub struct Individual {
    genotype: Genotype,
    phenotype: JumpPolicy,
    parents: Option<[Genotype; 2]>,
    fitness: Option<u32>,
    history: Option<Vec<Option<Action>>>,
}

impl Individual {
    pub fn new(genotype: Genotype, phenotype: JumpPolicy) -> Self {
        Self {
            genotype,
            phenotype,
            parents: None,
            fitness: None,
            history: None,
        }
    }

    pub fn with_parents(mut self, parents: [Genotype; 2]) -> Self {
        self.parents = Some(parents);
        self
    }

    pub fn genotype(&self) -> &Genotype {
        &self.genotype
    }

    pub fn phenotype(&self) -> JumpPolicy {
        self.phenotype
    }

    pub fn parents(&self) -> Option<&[Genotype; 2]> {
        self.parents.as_ref()
    }

    pub fn fitness(&self) -> Result<u32, GeneticError> {
        self.fitness.ok_or(GeneticError::UninitializedFitness)
    }

    pub fn history(&self) -> Result<&[Option<Action>], GeneticError> {
        self.history
            .as_deref()
            .ok_or(GeneticError::UninitializedHistory)
    }

    pub fn is_evaluated(&self) -> bool {
        self.fitness.is_some() && self.history.is_some()
    }

    pub fn record_evaluation(&mut self, fitness: u32, history: Vec<Option<Action>>) {
        self.fitness = Some(fitness);
        self.history = Some(history);
    }

    /// Same genotype lineage with a re-decoded phenotype and no evaluation.
    pub(crate) fn reset_with(&self, genotype: Genotype, phenotype: JumpPolicy) -> Self {
        Self {
            genotype,
            phenotype,
            parents: self.parents.clone(),
            fitness: None,
            history: None,
        }
    }

    pub fn report(&self) -> Result<IndividualReport, GeneticError> {
        let fitness = self.fitness()?;
        let history = self.history()?.to_vec();
        Ok(IndividualReport {
            literal: self.genotype.literal().to_string(),
            parent_literals: self
                .parents
                .as_ref()
                .map(|[a, b]| [a.literal().to_string(), b.literal().to_string()]),
            phenotype: self.phenotype,
            history,
            fitness,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn individual(value: u64) -> Individual {
        Individual::new(
            Genotype::from_int(value, 0.25).unwrap(),
            JumpPolicy::ProximityThreshold { threshold: value },
        )
    }

    #[test]
    fn fitness_and_history_fail_before_evaluation() {
        let ind = individual(12);
        assert_eq!(ind.fitness(), Err(GeneticError::UninitializedFitness));
        assert_eq!(ind.history(), Err(GeneticError::UninitializedHistory));
        assert!(!ind.is_evaluated());
        assert_eq!(ind.report(), Err(GeneticError::UninitializedFitness));
    }

    #[test]
    fn report_carries_literals_and_provenance() {
        let parents = [
            Genotype::from_int(157, 0.25).unwrap(),
            Genotype::from_int(12, 0.25).unwrap(),
        ];
        let mut ind = individual(8).with_parents(parents);
        ind.record_evaluation(76, vec![None, Some(Action::Jump), None]);
        assert!(ind.is_evaluated());

        let report = ind.report().unwrap();
        assert_eq!(report.literal, "0b1000");
        assert_eq!(
            report.parent_literals,
            Some(["0b10011101".to_string(), "0b1100".to_string()])
        );
        assert_eq!(report.history, vec![None, Some(Action::Jump), None]);
        assert_eq!(report.fitness, 76);
    }

    #[test]
    fn reset_keeps_parents_and_drops_evaluation() {
        let parents = [
            Genotype::from_int(1, 0.25).unwrap(),
            Genotype::from_int(2, 0.25).unwrap(),
        ];
        let mut ind = individual(3).with_parents(parents.clone());
        ind.record_evaluation(10, vec![]);
        let fresh = ind.reset_with(
            Genotype::from_int(7, 0.25).unwrap(),
            JumpPolicy::ProximityThreshold { threshold: 7 },
        );
        assert_eq!(fresh.parents(), Some(&parents));
        assert_eq!(fresh.fitness(), Err(GeneticError::UninitializedFitness));
        assert_eq!(fresh.genotype().to_int(), Ok(7));
    }
}

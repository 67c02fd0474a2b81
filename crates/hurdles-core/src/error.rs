use crate::config::ConfigError;
use crate::world::WorldInitError;
use std::{error::Error, fmt};

/// Validation failures raised by the genetic operators and the individual
/// bookkeeping. None of these are retried: they surface programming errors.
#[derive(Debug, Clone, PartialEq)]
pub enum GeneticError {
    InvalidLiteral { literal: String },
    BitIndexOutOfRange { index: usize, len: usize },
    CrossoverOutOfRange { position: usize, max: usize },
    LiteralTooWide { bits: usize },
    InvalidMutationRate { rate: f64 },
    InvalidParentCount { actual: usize },
    UninitializedFitness,
    UninitializedHistory,
}

impl fmt::Display for GeneticError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GeneticError::InvalidLiteral { literal } => {
                write!(f, "attempted to assign invalid literal \"{literal}\" to BitGenome")
            }
            GeneticError::BitIndexOutOfRange { index, len } => {
                write!(f, "bit index {index} out of range for genome of length {len}")
            }
            GeneticError::CrossoverOutOfRange { position, max } => {
                write!(f, "crossover position {position} exceeds maximum {max}")
            }
            GeneticError::LiteralTooWide { bits } => {
                write!(f, "literal with {bits} significant bits does not fit in u64")
            }
            GeneticError::InvalidMutationRate { rate } => {
                write!(f, "mutation rate {rate} must be finite and within [0,1]")
            }
            GeneticError::InvalidParentCount { actual } => {
                write!(f, "breeding requires exactly 2 parents, got {actual}")
            }
            GeneticError::UninitializedFitness => write!(f, "fitness accessed before initialized"),
            GeneticError::UninitializedHistory => write!(f, "history accessed before initialized"),
        }
    }
}

impl Error for GeneticError {}

#[derive(Debug, Clone, PartialEq)]
pub enum AlgorithmError {
    Config(ConfigError),
    Genetic(GeneticError),
    World(WorldInitError),
    ExtinctGeneration { generation: usize },
}

impl fmt::Display for AlgorithmError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AlgorithmError::Config(e) => write!(f, "{e}"),
            AlgorithmError::Genetic(e) => write!(f, "{e}"),
            AlgorithmError::World(e) => write!(f, "{e}"),
            AlgorithmError::ExtinctGeneration { generation } => {
                write!(f, "generation {generation} produced no offspring")
            }
        }
    }
}

impl Error for AlgorithmError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            AlgorithmError::Config(e) => Some(e),
            AlgorithmError::Genetic(e) => Some(e),
            AlgorithmError::World(e) => Some(e),
            AlgorithmError::ExtinctGeneration { .. } => None,
        }
    }
}

impl From<ConfigError> for AlgorithmError {
    fn from(err: ConfigError) -> Self {
        AlgorithmError::Config(err)
    }
}

impl From<GeneticError> for AlgorithmError {
    fn from(err: GeneticError) -> Self {
        AlgorithmError::Genetic(err)
    }
}

impl From<WorldInitError> for AlgorithmError {
    fn from(err: WorldInitError) -> Self {
        AlgorithmError::World(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn algorithm_error_chains_its_source() {
        let err = AlgorithmError::from(WorldInitError::from(ConfigError::InvalidCellSize));
        assert_eq!(err.to_string(), "cell_size must be finite and positive");
        let world = err.source().expect("world error source");
        assert!(world.source().is_some());
        assert!(AlgorithmError::ExtinctGeneration { generation: 3 }
            .source()
            .is_none());
    }
}

pub mod algorithm;
pub mod bits;
pub mod config;
pub mod constants;
pub mod error;
pub mod genome;
pub mod geometry;
pub mod individual;
pub mod policy;
pub mod render;
pub mod report;
pub mod rng;
pub mod world;

pub use algorithm::GeneticAlgorithm;
pub use bits::BitGenome;
pub use config::{EvolutionConfig, WorldConfig};
pub use error::{AlgorithmError, GeneticError};
pub use genome::Genotype;
pub use individual::Individual;
pub use report::{AlgorithmReport, GenerationReport, IndividualReport};
pub use world::World;

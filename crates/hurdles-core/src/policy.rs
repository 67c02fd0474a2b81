//! Jump policies: the phenotypes the genetic algorithm evolves.

use crate::config::PhenotypeKind;
use crate::error::GeneticError;
use crate::genome::Genotype;
use crate::geometry::Rectangle;
use crate::world::StatePacket;
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum JumpPolicy {
    /// Jump on every non-zero frame divisible by `period`. A zero period never jumps.
    ConstantInterval { period: u64 },
    /// Jump once the nearest obstacle is at most `threshold` units ahead.
    ProximityThreshold { threshold: u64 },
}

impl JumpPolicy {
    /// Whether the agent occupying `body` requests a jump this frame.
    ///
    /// Airborne agents never request one, so every `true` results in an impulse.
    pub fn decide_jump(&self, state: &StatePacket<'_>, body: &Rectangle, grounded: bool) -> bool {
        if !grounded {
            return false;
        }
        match *self {
            JumpPolicy::ConstantInterval { period } => {
                period != 0 && state.frame != 0 && u64::from(state.frame) % period == 0
            }
            JumpPolicy::ProximityThreshold { threshold } => {
                nearest_obstacle_distance(body, state.obstacles)
                    .is_some_and(|d| d <= threshold as f64)
            }
        }
    }
}

/// Signed horizontal distance from `body` to the obstacle closest to it,
/// measured between left edges. Negative once the obstacle has passed.
pub fn nearest_obstacle_distance(body: &Rectangle, obstacles: &[Rectangle]) -> Option<f64> {
    obstacles
        .iter()
        .map(|o| o.left() - body.left())
        .min_by(|a, b| a.abs().total_cmp(&b.abs()))
}

/// Decodes a genotype into the policy the simulation runs.
pub trait PhenotypeMap {
    fn phenotype(&self, genotype: &Genotype) -> Result<JumpPolicy, GeneticError>;
}

impl PhenotypeMap for PhenotypeKind {
    fn phenotype(&self, genotype: &Genotype) -> Result<JumpPolicy, GeneticError> {
        let value = genotype.to_int()?;
        Ok(match self {
            PhenotypeKind::ConstantInterval => JumpPolicy::ConstantInterval { period: value },
            PhenotypeKind::ProximityThreshold => {
                JumpPolicy::ProximityThreshold { threshold: value }
            }
        })
    }
}

impl<F> PhenotypeMap for F
where
    F: Fn(&Genotype) -> Result<JumpPolicy, GeneticError>,
{
    fn phenotype(&self, genotype: &Genotype) -> Result<JumpPolicy, GeneticError> {
        self(genotype)
    }
}

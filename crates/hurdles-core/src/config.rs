use serde::{Deserialize, Serialize};

/// What an obstacle does once its left edge crosses the world's left boundary.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ObstacleEdgePolicy {
    /// Jump back to the obstacle's spawn x and keep drifting.
    #[default]
    Respawn,
    /// Terminate and leave the live set.
    Terminate,
}

/// Genotype-to-phenotype decoding used when seeding and breeding.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PhenotypeKind {
    /// Genotype integer is the jump period in frames.
    ConstantInterval,
    /// Genotype integer is the proximity threshold in world units.
    #[default]
    ProximityThreshold,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct WorldConfig {
    /// Frames simulated before every still-active agent is force-terminated.
    pub frame_budget: u32,
    /// End the run as soon as no agent is left active.
    pub stop_when_all_terminated: bool,
    /// Vertical acceleration per frame applied while airborne (negative = down).
    pub gravity: f64,
    /// Vertical velocity impulse applied by a grounded jump.
    pub jump_speed: f64,
    pub agent_width: f64,
    pub agent_height: f64,
    pub agent_spawn_x: f64,
    pub obstacle_width: f64,
    pub obstacle_height: f64,
    /// One obstacle is spawned per entry.
    pub obstacle_spawn_xs: Vec<f64>,
    /// Horizontal displacement per frame for every obstacle.
    pub obstacle_drift: f64,
    pub obstacle_edge_policy: ObstacleEdgePolicy,
    /// Extent used when rasterizing frames.
    pub world_width: f64,
    pub world_height: f64,
    /// World units per rendered grid cell.
    pub cell_size: f64,
    /// Capture one [`crate::render::FrameGrid`] per simulated frame.
    pub record_frames: bool,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            frame_budget: 200,
            stop_when_all_terminated: false,
            gravity: -2.0,
            jump_speed: 20.0,
            agent_width: 50.0,
            agent_height: 50.0,
            agent_spawn_x: 100.0,
            obstacle_width: 50.0,
            obstacle_height: 50.0,
            obstacle_spawn_xs: vec![900.0],
            obstacle_drift: -10.0,
            obstacle_edge_policy: ObstacleEdgePolicy::Respawn,
            world_width: 1000.0,
            world_height: 200.0,
            cell_size: 10.0,
            record_frames: false,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct EvolutionConfig {
    /// Deterministic seed for seeding, crossover, mutation and pairing draws.
    pub seed: u64,
    pub population_size: usize,
    /// Generations evaluated before the run terminates.
    pub generations: usize,
    /// Seed genotypes are drawn uniformly from `0..seed_max`.
    pub seed_max: u64,
    /// Stored on every genotype; not applied automatically.
    pub mutation_rate: f64,
    /// Times `select` is invoked per generation.
    pub selection_rounds: usize,
    pub phenotype: PhenotypeKind,
    pub world: WorldConfig,
}

impl Default for EvolutionConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            population_size: 10,
            generations: 10,
            seed_max: 100,
            mutation_rate: 0.25,
            selection_rounds: 2,
            phenotype: PhenotypeKind::ProximityThreshold,
            world: WorldConfig::default(),
        }
    }
}

macro_rules! define_config_error {
    (
        $(
            $variant:ident $( { $($field:ident : $type:ty),* } )? => $fmt:literal $(, $arg:expr)*
        );* $(;)?
    ) => {
        #[derive(Debug, Clone, PartialEq)]
        pub enum ConfigError {
            $(
                $variant $( { $($field : $type),* } )?,
            )*
        }

        impl std::fmt::Display for ConfigError {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                match self {
                    $(
                        Self::$variant $( { $($field),* } )? => write!(f, $fmt $(, $arg)*),
                    )*
                }
            }
        }
    };
}

define_config_error! {
    InvalidFrameBudget => "frame_budget must be greater than 0";
    InvalidGravity => "gravity must be finite and negative";
    InvalidJumpSpeed => "jump_speed must be finite and positive";
    InvalidAgentSize => "agent_width/agent_height must be finite and at least 1";
    InvalidAgentSpawn => "agent_spawn_x must be finite";
    InvalidObstacleSize => "obstacle_width/obstacle_height must be finite and at least 1";
    InvalidObstacleSpawn { index: usize } => "obstacle_spawn_xs[{}] must be finite and non-negative", index;
    InvalidObstacleDrift => "obstacle_drift must be finite";
    InvalidWorldExtent => "world_width/world_height must be finite and positive";
    InvalidCellSize => "cell_size must be finite and positive";
    PopulationTooSmall { min: usize, actual: usize } => "population_size ({actual}) must be at least {min}";
    InvalidGenerations => "generations must be greater than 0";
    InvalidSeedMax => "seed_max must be greater than 0";
    InvalidMutationRate => "mutation_rate must be finite and within [0,1]";
    InvalidSelectionRounds => "selection_rounds must be greater than 0";
}

impl std::error::Error for ConfigError {}

impl WorldConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.frame_budget == 0 {
            return Err(ConfigError::InvalidFrameBudget);
        }
        if !(self.gravity.is_finite() && self.gravity < 0.0) {
            return Err(ConfigError::InvalidGravity);
        }
        if !(self.jump_speed.is_finite() && self.jump_speed > 0.0) {
            return Err(ConfigError::InvalidJumpSpeed);
        }
        if !(is_unit_extent(self.agent_width) && is_unit_extent(self.agent_height)) {
            return Err(ConfigError::InvalidAgentSize);
        }
        if !self.agent_spawn_x.is_finite() {
            return Err(ConfigError::InvalidAgentSpawn);
        }
        if !(is_unit_extent(self.obstacle_width) && is_unit_extent(self.obstacle_height)) {
            return Err(ConfigError::InvalidObstacleSize);
        }
        if let Some(index) = self
            .obstacle_spawn_xs
            .iter()
            .position(|x| !(x.is_finite() && *x >= 0.0))
        {
            return Err(ConfigError::InvalidObstacleSpawn { index });
        }
        if !self.obstacle_drift.is_finite() {
            return Err(ConfigError::InvalidObstacleDrift);
        }
        if !(self.world_width.is_finite()
            && self.world_width > 0.0
            && self.world_height.is_finite()
            && self.world_height > 0.0)
        {
            return Err(ConfigError::InvalidWorldExtent);
        }
        if !(self.cell_size.is_finite() && self.cell_size > 0.0) {
            return Err(ConfigError::InvalidCellSize);
        }
        Ok(())
    }
}

impl EvolutionConfig {
    /// Smallest population for which every selection round still yields a pair.
    pub const MIN_POPULATION: usize = 4;

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.population_size < Self::MIN_POPULATION {
            return Err(ConfigError::PopulationTooSmall {
                min: Self::MIN_POPULATION,
                actual: self.population_size,
            });
        }
        if self.generations == 0 {
            return Err(ConfigError::InvalidGenerations);
        }
        if self.seed_max == 0 {
            return Err(ConfigError::InvalidSeedMax);
        }
        if !(self.mutation_rate.is_finite() && (0.0..=1.0).contains(&self.mutation_rate)) {
            return Err(ConfigError::InvalidMutationRate);
        }
        if self.selection_rounds == 0 {
            return Err(ConfigError::InvalidSelectionRounds);
        }
        self.world.validate()
    }
}

fn is_unit_extent(v: f64) -> bool {
    v.is_finite() && v >= 1.0
}

use crate::config::{ConfigError, ObstacleEdgePolicy, WorldConfig};
use crate::constants::MAX_WORLD_OBJECTS;
use crate::geometry::Rectangle;
use crate::policy::JumpPolicy;
use crate::render::{self, FrameGrid};
use serde::{Deserialize, Serialize};
use std::time::Instant;
use std::{error::Error, fmt};

/// World-unique identifier handed out by the world's own sequence.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ObjectId(pub u32);

/// Per-frame action recorded in an agent's history.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    Jump,
}

/// Outcome of one object's per-frame act.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ActionResult {
    Idle,
    Jumped,
    /// Obstacle crossed the left boundary under [`ObstacleEdgePolicy::Terminate`].
    LeftWorld,
}

/// Frame-start view of the world shared by every object acting this frame.
#[derive(Clone, Copy, Debug)]
pub struct StatePacket<'a> {
    pub frame: u32,
    pub obstacles: &'a [Rectangle],
    pub agents: &'a [Rectangle],
}

/// Final snapshot of an object once it leaves the live set.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Termination {
    pub frame: u32,
    pub body: Rectangle,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Behavior {
    Hurdler(JumpPolicy),
    Drift { spawn_x: f64 },
}

#[derive(Clone, Debug)]
pub struct GameObject {
    pub id: ObjectId,
    pub body: Rectangle,
    pub velocity: [f64; 2],
    pub acceleration: [f64; 2],
    pub behavior: Behavior,
    pub history: Vec<Option<Action>>,
    pub termination: Option<Termination>,
}

impl GameObject {
    fn new(id: ObjectId, body: Rectangle, behavior: Behavior) -> Self {
        Self {
            id,
            body,
            velocity: [0.0; 2],
            acceleration: [0.0; 2],
            behavior,
            history: Vec::new(),
            termination: None,
        }
    }

    pub fn is_grounded(&self) -> bool {
        self.body.position[1] <= 0.0
    }

    pub fn is_terminated(&self) -> bool {
        self.termination.is_some()
    }

    /// Decide, then integrate one frame of motion.
    pub fn act(&mut self, state: &StatePacket<'_>, config: &WorldConfig) -> ActionResult {
        match self.behavior {
            Behavior::Hurdler(policy) => {
                let jumped = policy.decide_jump(state, &self.body, self.is_grounded());
                if jumped {
                    self.velocity[1] += config.jump_speed;
                }
                self.integrate(config.gravity);
                let action = jumped.then_some(Action::Jump);
                self.history.push(action);
                if jumped {
                    ActionResult::Jumped
                } else {
                    ActionResult::Idle
                }
            }
            Behavior::Drift { spawn_x } => {
                self.velocity = [config.obstacle_drift, 0.0];
                self.body.position[0] += self.velocity[0];
                if self.body.left() < 0.0 {
                    match config.obstacle_edge_policy {
                        ObstacleEdgePolicy::Respawn => self.body.position[0] = spawn_x,
                        ObstacleEdgePolicy::Terminate => return ActionResult::LeftWorld,
                    }
                }
                ActionResult::Idle
            }
        }
    }

    fn integrate(&mut self, gravity: f64) {
        self.acceleration = if self.is_grounded() {
            [0.0, 0.0]
        } else {
            [0.0, gravity]
        };
        for axis in 0..2 {
            self.velocity[axis] += self.acceleration[axis];
            self.body.position[axis] += self.velocity[axis];
        }
        if self.is_grounded() {
            self.body.position[1] = 0.0;
            self.velocity[1] = 0.0;
        }
    }

    fn terminate(&mut self, frame: u32) {
        if self.termination.is_none() {
            self.termination = Some(Termination {
                frame,
                body: self.body,
            });
        }
    }
}

#[derive(Clone, Debug)]
pub struct StepTimings {
    pub agents_us: u64,
    pub collisions_us: u64,
    pub obstacles_us: u64,
    pub total_us: u64,
}

/// Fitness-relevant result for one agent, in insertion order.
#[derive(Clone, Debug, PartialEq)]
pub struct AgentOutcome {
    pub id: ObjectId,
    pub termination_frame: u32,
    pub history: Vec<Option<Action>>,
}

#[derive(Clone, Debug)]
pub struct RunOutcome {
    pub frames_simulated: u32,
    pub agents: Vec<AgentOutcome>,
    /// Empty unless `record_frames` is enabled.
    pub frames: Vec<FrameGrid>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum WorldInitError {
    Config(ConfigError),
    TooManyObjects { max: usize, actual: usize },
}

impl fmt::Display for WorldInitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WorldInitError::Config(e) => write!(f, "{}", e),
            WorldInitError::TooManyObjects { max, actual } => {
                write!(f, "object count ({actual}) exceeds supported maximum ({max})")
            }
        }
    }
}

impl From<ConfigError> for WorldInitError {
    fn from(err: ConfigError) -> Self {
        WorldInitError::Config(err)
    }
}

impl Error for WorldInitError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            WorldInitError::Config(e) => Some(e),
            _ => None,
        }
    }
}

/// Stepped hurdle course. Owns every game object for its lifetime; terminated
/// objects stay in the arena but leave the live index lists.
pub struct World {
    agents: Vec<GameObject>,
    obstacles: Vec<GameObject>,
    live_agents: Vec<usize>,
    live_obstacles: Vec<usize>,
    config: WorldConfig,
    frame: u32,
    next_object_id: u32,
    frames: Vec<FrameGrid>,

    // Frame-start snapshots reused across steps.
    agent_snapshot_buffer: Vec<Rectangle>,
    obstacle_snapshot_buffer: Vec<Rectangle>,
}

impl World {
    pub fn new(policies: Vec<JumpPolicy>, config: WorldConfig) -> Result<Self, WorldInitError> {
        config.validate()?;
        let total = policies.len() + config.obstacle_spawn_xs.len();
        if total > MAX_WORLD_OBJECTS {
            return Err(WorldInitError::TooManyObjects {
                max: MAX_WORLD_OBJECTS,
                actual: total,
            });
        }

        let mut world = Self {
            agents: Vec::with_capacity(policies.len()),
            obstacles: Vec::with_capacity(config.obstacle_spawn_xs.len()),
            live_agents: Vec::with_capacity(policies.len()),
            live_obstacles: Vec::with_capacity(config.obstacle_spawn_xs.len()),
            config,
            frame: 0,
            next_object_id: 0,
            frames: Vec::new(),
            agent_snapshot_buffer: Vec::with_capacity(policies.len()),
            obstacle_snapshot_buffer: Vec::new(),
        };

        for policy in policies {
            let body = Rectangle::new(
                [world.config.agent_spawn_x, 0.0],
                world.config.agent_width,
                world.config.agent_height,
            );
            let id = world.next_object_id();
            world.live_agents.push(world.agents.len());
            world
                .agents
                .push(GameObject::new(id, body, Behavior::Hurdler(policy)));
        }
        for spawn_x in world.config.obstacle_spawn_xs.clone() {
            let body = Rectangle::new(
                [spawn_x, 0.0],
                world.config.obstacle_width,
                world.config.obstacle_height,
            );
            let id = world.next_object_id();
            world.live_obstacles.push(world.obstacles.len());
            world
                .obstacles
                .push(GameObject::new(id, body, Behavior::Drift { spawn_x }));
        }
        Ok(world)
    }

    pub fn config(&self) -> &WorldConfig {
        &self.config
    }

    /// Index of the next frame to simulate.
    pub fn frame(&self) -> u32 {
        self.frame
    }

    pub fn agents(&self) -> &[GameObject] {
        &self.agents
    }

    pub fn obstacles(&self) -> &[GameObject] {
        &self.obstacles
    }

    pub fn live_agent_count(&self) -> usize {
        self.live_agents.len()
    }

    pub fn live_obstacle_count(&self) -> usize {
        self.live_obstacles.len()
    }

    pub fn recorded_frames(&self) -> &[FrameGrid] {
        &self.frames
    }

    pub fn is_finished(&self) -> bool {
        self.frame >= self.config.frame_budget
            || (self.config.stop_when_all_terminated && self.live_agents.is_empty())
    }

    fn next_object_id(&mut self) -> ObjectId {
        let id = ObjectId(self.next_object_id);
        self.next_object_id = self.next_object_id.saturating_add(1);
        id
    }

    /// Advance one frame: snapshot, agents act, collisions, obstacles move,
    /// capture, then retire objects terminated this frame.
    pub fn step(&mut self) -> StepTimings {
        let total_start = Instant::now();
        self.fill_snapshots();

        let t0 = Instant::now();
        self.step_agents_phase();
        let agents_us = t0.elapsed().as_micros() as u64;

        let t1 = Instant::now();
        self.step_collision_phase();
        let collisions_us = t1.elapsed().as_micros() as u64;

        let t2 = Instant::now();
        self.step_obstacle_phase();
        let obstacles_us = t2.elapsed().as_micros() as u64;

        if self.config.record_frames {
            let grid = self.capture_frame();
            self.frames.push(grid);
        }
        self.retire_terminated();
        self.frame = self.frame.saturating_add(1);

        StepTimings {
            agents_us,
            collisions_us,
            obstacles_us,
            total_us: total_start.elapsed().as_micros() as u64,
        }
    }

    /// Step until the frame budget (or, if configured, the last agent) runs
    /// out, then terminate whatever is still live at the final frame.
    pub fn run(&mut self) -> RunOutcome {
        tracing::debug!(agents = self.agents.len(), "running hurdles");
        while !self.is_finished() {
            self.step();
        }
        self.terminate_remaining();
        tracing::debug!(frame = self.frame, "hurdles terminated");
        self.outcome()
    }

    /// Occupancy grid of the live set as it stands right now.
    pub fn capture_frame(&self) -> FrameGrid {
        let mut grid = FrameGrid::for_world(self.frame, &self.config);
        let cell = self.config.cell_size;
        for &idx in &self.live_obstacles {
            grid.paint(&self.obstacles[idx].body, render::OBSTACLE, cell);
        }
        for &idx in &self.live_agents {
            grid.paint(&self.agents[idx].body, render::AGENT, cell);
        }
        grid
    }

    pub fn outcome(&self) -> RunOutcome {
        RunOutcome {
            frames_simulated: self.frame,
            agents: self
                .agents
                .iter()
                .map(|a| AgentOutcome {
                    id: a.id,
                    termination_frame: a.termination.map_or(self.frame, |t| t.frame),
                    history: a.history.clone(),
                })
                .collect(),
            frames: self.frames.clone(),
        }
    }

    fn fill_snapshots(&mut self) {
        self.agent_snapshot_buffer.clear();
        self.agent_snapshot_buffer
            .extend(self.live_agents.iter().map(|&i| self.agents[i].body));
        self.obstacle_snapshot_buffer.clear();
        self.obstacle_snapshot_buffer
            .extend(self.live_obstacles.iter().map(|&i| self.obstacles[i].body));
    }

    fn retire_terminated(&mut self) {
        let agents = &self.agents;
        self.live_agents.retain(|&i| !agents[i].is_terminated());
        let obstacles = &self.obstacles;
        self.live_obstacles.retain(|&i| !obstacles[i].is_terminated());
    }

    fn terminate_remaining(&mut self) {
        let frame = self.frame;
        for &idx in &self.live_agents {
            self.agents[idx].terminate(frame);
        }
        for &idx in &self.live_obstacles {
            self.obstacles[idx].terminate(frame);
        }
        self.live_agents.clear();
        self.live_obstacles.clear();
    }
}

mod phases;

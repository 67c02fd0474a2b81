use super::super::{ActionResult, StatePacket, World};

impl World {
    /// Drift obstacles and apply the left-edge policy.
    pub(in crate::world) fn step_obstacle_phase(&mut self) {
        let state = StatePacket {
            frame: self.frame,
            obstacles: &self.obstacle_snapshot_buffer,
            agents: &self.agent_snapshot_buffer,
        };
        let config = &self.config;
        let obstacles = &mut self.obstacles;

        for &idx in &self.live_obstacles {
            let obstacle = &mut obstacles[idx];
            if obstacle.act(&state, config) == ActionResult::LeftWorld {
                obstacle.terminate(state.frame);
                tracing::debug!(id = obstacle.id.0, frame = state.frame, "obstacle left world");
            }
        }
    }
}

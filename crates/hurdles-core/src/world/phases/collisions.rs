use super::super::World;

impl World {
    /// Terminate agents overlapping any obstacle at its frame-start position.
    pub(in crate::world) fn step_collision_phase(&mut self) {
        let frame = self.frame;
        let obstacles = &self.obstacle_snapshot_buffer;
        let agents = &mut self.agents;

        for &idx in &self.live_agents {
            let agent = &mut agents[idx];
            if obstacles.iter().any(|o| agent.body.collides(o)) {
                agent.terminate(frame);
                tracing::debug!(id = agent.id.0, frame, "agent hit obstacle");
            }
        }
    }
}

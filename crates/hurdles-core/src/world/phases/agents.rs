use super::super::{ActionResult, StatePacket, World};

impl World {
    /// Let every live agent decide and move, in insertion order, against the
    /// frame-start snapshot.
    pub(in crate::world) fn step_agents_phase(&mut self) {
        let state = StatePacket {
            frame: self.frame,
            obstacles: &self.obstacle_snapshot_buffer,
            agents: &self.agent_snapshot_buffer,
        };
        let config = &self.config;
        let agents = &mut self.agents;

        for &idx in &self.live_agents {
            let agent = &mut agents[idx];
            if agent.act(&state, config) == ActionResult::Jumped {
                tracing::debug!(id = agent.id.0, frame = state.frame, "jump");
            }
        }
    }
}

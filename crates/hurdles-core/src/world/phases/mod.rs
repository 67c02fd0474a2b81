mod agents;
mod collisions;
mod obstacles;

use bevy::prelude::*;

/// Marker on the dune ground mesh.
#[derive(Component, Reflect)]
pub struct Ground;

/// A billboarded smoke sprite drifting away from its home position.
#[derive(Component, Reflect)]
pub struct SmokePuff {
    /// Position the puff returns to at the start of each cycle.
    pub home: Vec3,
    /// Seconds since spawn, offset per puff so cycles are staggered.
    pub age: f32,
    /// Accumulated spin around the view axis (radians).
    pub angle: f32,
}

use bevy::prelude::*;

/// Marker component for the intro camera entity.
#[derive(Component, Reflect)]
pub struct DollyCamera;

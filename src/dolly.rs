//! Dolly camera travelling along the intro path.
//!
//! Spawns the `Camera3d` entity with bloom and distance fog, then moves it at a
//! constant speed from the path origin to its destination, hugging the dunes.

mod entities;
mod systems;

pub use entities::DollyCamera;

use bevy::prelude::*;

use crate::error::ConfigError;
use crate::path::PathSettings;
use crate::{GameState, IntroSystems};

/// Per-plugin configuration for the dolly camera.
#[derive(Resource, Clone, Debug, Reflect)]
pub struct DollyConfig {
    /// Axis, bounds and direction of travel.
    pub path: PathSettings,
    /// Travel speed in world-units per second.
    pub speed: f32,
    /// Height above the dunes.
    pub altitude: f32,
    /// Height lerp factor for smooth camera Y transitions.
    pub height_lerp: f32,
    /// Offset across the path, on the ground plane.
    pub lateral: f32,
    /// Distance ahead of the camera it looks at.
    pub look_ahead: f32,
    /// How far below the camera the look-at point sits.
    pub look_down: f32,
    /// Bloom post-processing intensity.
    pub bloom_intensity: f32,
    /// Fog and clear color.
    pub fog_color: Color,
    /// Distance at which fog starts.
    pub fog_start: f32,
    /// Distance at which fog is opaque.
    pub fog_end: f32,
}

impl Default for DollyConfig {
    fn default() -> Self {
        Self {
            path: PathSettings::default(),
            speed: 8.0,
            altitude: 5.0,
            height_lerp: 0.05,
            lateral: 0.0,
            look_ahead: 25.0,
            look_down: 3.0,
            bloom_intensity: 0.12,
            fog_color: Color::srgb(0.78, 0.64, 0.47),
            fog_start: 15.0,
            fog_end: 140.0,
        }
    }
}

impl DollyConfig {
    /// Rejects an invalid path or a speed that never reaches its end.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.path.validate()?;
        if !(self.speed.is_finite() && self.speed > 0.0) {
            return Err(ConfigError::NonPositiveSpeed(self.speed));
        }
        Ok(())
    }
}

/// Camera spawn and constant-speed travel during [`GameState::Intro`].
pub struct DollyPlugin(pub DollyConfig);

impl Plugin for DollyPlugin {
    fn build(&self, app: &mut App) {
        app.register_type::<DollyCamera>()
            .register_type::<DollyConfig>()
            .insert_resource(self.0.clone())
            .insert_resource(ClearColor(self.0.fog_color))
            .add_systems(Startup, systems::spawn_camera)
            .add_systems(
                Update,
                systems::advance_dolly
                    .in_set(IntroSystems::Move)
                    .run_if(in_state(GameState::Intro)),
            );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(DollyConfig::default().validate().is_ok());
    }

    #[test]
    fn zero_speed_is_rejected() {
        let cfg = DollyConfig {
            speed: 0.0,
            ..default()
        };
        assert_eq!(cfg.validate(), Err(ConfigError::NonPositiveSpeed(0.0)));
    }

    #[test]
    fn invalid_path_wins_over_speed() {
        let cfg = DollyConfig {
            speed: -1.0,
            path: PathSettings {
                start: 5.0,
                end: 1.0,
                ..default()
            },
            ..default()
        };
        assert!(matches!(cfg.validate(), Err(ConfigError::InvalidPath { .. })));
    }
}

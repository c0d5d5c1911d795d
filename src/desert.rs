//! Desert scene: dune heightfield, sun, and drifting smoke.
//!
//! The [`DuneField`] is sampled at plugin build time so the dolly can read
//! ground height from its first frame.

mod dune_field;
mod entities;
mod systems;

pub use dune_field::DuneField;

use bevy::prelude::*;

/// Nested configuration for the desert scene.
#[derive(Resource, Clone, Debug, Reflect)]
pub struct DesertConfig {
    /// Dune heightfield and ground mesh settings.
    pub dunes: DuneSettings,
    /// Smoke sprite settings.
    pub smoke: SmokeSettings,
    /// Sun color.
    pub sun_color: Color,
    /// Sun illuminance in lux.
    pub sun_illuminance: f32,
}

/// Dune noise and ground mesh parameters.
#[derive(Clone, Debug, Reflect)]
pub struct DuneSettings {
    /// Seed for the dune noise generator.
    pub seed: u32,
    /// Number of octaves for dune noise.
    pub octaves: usize,
    /// Spatial scale divisor for noise sampling.
    pub scale: f64,
    /// Maximum dune height.
    pub max_height: f32,
    /// Side length of the square ground mesh.
    pub ground_size: f32,
    /// Ground mesh cells per side.
    pub resolution: u32,
    /// Sand surface color.
    pub sand_color: Color,
}

/// Smoke sprite placement and motion.
#[derive(Clone, Debug, Reflect)]
pub struct SmokeSettings {
    /// Number of puffs along the path.
    pub count: u32,
    /// Seed for placement jitter.
    pub seed: u32,
    /// Sprite edge length.
    pub size: f32,
    /// Maximum distance from the path centreline.
    pub spread: f32,
    /// Height of a puff's home position above the dunes.
    pub height: f32,
    /// Drift velocity (world-units per second).
    pub drift: Vec3,
    /// Seconds before a puff wraps back to its home position.
    pub cycle: f32,
    /// Spin speed (radians per second).
    pub spin: f32,
    /// Peak opacity.
    pub opacity: f32,
    /// Sprite texture asset path.
    pub texture: String,
}

impl Default for DesertConfig {
    fn default() -> Self {
        Self {
            dunes: DuneSettings {
                seed: 23,
                octaves: 4,
                scale: 90.0,
                max_height: 9.0,
                ground_size: 520.0,
                resolution: 128,
                sand_color: Color::srgb(0.76, 0.6, 0.42),
            },
            smoke: SmokeSettings {
                count: 28,
                seed: 7,
                size: 16.0,
                spread: 45.0,
                height: 3.0,
                drift: Vec3::new(0.4, 0.9, 0.2),
                cycle: 16.0,
                spin: 0.06,
                opacity: 0.35,
                texture: "textures/smoke.png".into(),
            },
            sun_color: Color::srgb(1.0, 0.88, 0.7),
            sun_illuminance: 9000.0,
        }
    }
}

/// Desert ground, sun light and smoke sprites.
pub struct DesertPlugin(pub DesertConfig);

impl Plugin for DesertPlugin {
    fn build(&self, app: &mut App) {
        app.register_type::<DesertConfig>()
            .register_type::<entities::SmokePuff>()
            .register_type::<entities::Ground>()
            .insert_resource(self.0.clone())
            .insert_resource(DuneField::from_settings(&self.0.dunes))
            .add_systems(
                Startup,
                (systems::spawn_ground, systems::spawn_sun, systems::spawn_smoke),
            )
            .add_systems(Update, systems::drift_smoke);
    }
}

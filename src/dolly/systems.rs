use bevy::core_pipeline::tonemapping::Tonemapping;
use bevy::pbr::{DistanceFog, FogFalloff};
use bevy::post_process::bloom::{Bloom, BloomCompositeMode};
use bevy::prelude::*;
use bevy::render::view::Hdr;

use super::DollyConfig;
use super::entities::DollyCamera;
use crate::desert::DuneField;

/// Spawns the Camera3d entity at the path origin, looking along the path.
pub fn spawn_camera(mut commands: Commands, cfg: Res<DollyConfig>, dunes: Res<DuneField>) {
    let path = &cfg.path;
    let ground = path.place(path.lateral() * cfg.lateral, path.origin());
    let eye = ground.with_y(dunes.height(ground.x, ground.z) + cfg.altitude);
    let target = eye + path.heading() * cfg.look_ahead - Vec3::Y * cfg.look_down;

    commands.spawn((
        Name::new("Dolly Camera"),
        Camera3d::default(),
        Hdr,
        Tonemapping::TonyMcMapface,
        Bloom {
            intensity: cfg.bloom_intensity,
            composite_mode: BloomCompositeMode::Additive,
            ..Bloom::NATURAL
        },
        DistanceFog {
            color: cfg.fog_color,
            falloff: FogFalloff::Linear {
                start: cfg.fog_start,
                end: cfg.fog_end,
            },
            ..default()
        },
        Transform::from_translation(eye).looking_at(target, Vec3::Y),
        DollyCamera,
    ));
}

/// Moves the camera towards the path destination and eases its height
/// towards the dune surface.
pub fn advance_dolly(
    time: Res<Time>,
    cfg: Res<DollyConfig>,
    dunes: Res<DuneField>,
    mut query: Query<&mut Transform, With<DollyCamera>>,
) {
    let Ok(mut transform) = query.single_mut() else {
        return;
    };

    let path = &cfg.path;
    let progress = path.advance(
        path.progress(transform.translation),
        cfg.speed * time.delta_secs(),
    );
    transform.translation = path.place(transform.translation, progress);

    let pos = transform.translation;
    let target_height = dunes.height(pos.x, pos.z) + cfg.altitude;
    transform.translation.y += (target_height - pos.y) * cfg.height_lerp;
}

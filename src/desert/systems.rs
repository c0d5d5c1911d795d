use bevy::asset::RenderAssetUsages;
use bevy::color::Alpha;
use bevy::mesh::Indices;
use bevy::prelude::*;
use bevy::render::render_resource::PrimitiveTopology;
use noise::{NoiseFn, Perlin};

use super::DesertConfig;
use super::dune_field::DuneField;
use super::entities::{Ground, SmokePuff};
use crate::dolly::{DollyCamera, DollyConfig};
use crate::math;

// ── Startup ─────────────────────────────────────────────────────────

/// Spawns the dune ground mesh centred on the middle of the path.
pub fn spawn_ground(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    cfg: Res<DesertConfig>,
    dolly: Res<DollyConfig>,
    dunes: Res<DuneField>,
) {
    let path = &dolly.path;
    let mid = path.place(Vec3::ZERO, (path.start + path.end) / 2.0);
    let size = cfg.dunes.ground_size.max(path.length() + 2.0 * dolly.fog_end);
    let ground = dunes.ground_mesh(Vec2::new(mid.x, mid.z), size, cfg.dunes.resolution);

    let mesh = Mesh::new(
        PrimitiveTopology::TriangleList,
        RenderAssetUsages::RENDER_WORLD,
    )
    .with_inserted_attribute(Mesh::ATTRIBUTE_POSITION, ground.positions)
    .with_inserted_attribute(Mesh::ATTRIBUTE_NORMAL, ground.normals)
    .with_inserted_attribute(Mesh::ATTRIBUTE_UV_0, ground.uvs)
    .with_inserted_indices(Indices::U32(ground.indices));

    let sand = materials.add(StandardMaterial {
        base_color: cfg.dunes.sand_color,
        perceptual_roughness: 0.95,
        reflectance: 0.1,
        ..default()
    });

    commands.spawn((
        Name::new("Dunes"),
        Ground,
        Mesh3d(meshes.add(mesh)),
        MeshMaterial3d(sand),
        Transform::default(),
    ));
}

/// Spawns a low, warm directional sun.
pub fn spawn_sun(mut commands: Commands, cfg: Res<DesertConfig>) {
    commands.spawn((
        Name::new("Sun"),
        DirectionalLight {
            color: cfg.sun_color,
            illuminance: cfg.sun_illuminance,
            shadows_enabled: false,
            ..default()
        },
        Transform::default().looking_to(Vec3::new(-0.5, -0.35, -0.4), Vec3::Y),
    ));
}

/// Scatters smoke puffs along the path with noise-derived jitter.
pub fn spawn_smoke(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    asset_server: Res<AssetServer>,
    cfg: Res<DesertConfig>,
    dolly: Res<DollyConfig>,
    dunes: Res<DuneField>,
) {
    let s = &cfg.smoke;
    if s.count == 0 {
        return;
    }
    let path = &dolly.path;
    let jitter = Perlin::new(s.seed);
    let texture: Handle<Image> = asset_server.load(s.texture.clone());
    let quad = meshes.add(Rectangle::new(s.size, s.size));
    let spacing = path.length() / s.count as f32;

    for i in 0..s.count {
        let along_noise = jitter.get([i as f64 * 0.61, 0.25]);
        let across_noise = jitter.get([i as f64 * 0.37, 4.75]);
        let along = path.start
            + spacing * (i as f32 + 0.5)
            + math::map_noise_to_range(along_noise, -0.5, 0.5) * spacing;
        let across = math::map_noise_to_range(across_noise, -s.spread, s.spread);

        let ground = path.place(path.lateral() * across, along);
        let home = ground.with_y(dunes.height(ground.x, ground.z) + s.height);

        let material = materials.add(StandardMaterial {
            base_color: Color::srgba(0.86, 0.8, 0.72, 0.0),
            base_color_texture: Some(texture.clone()),
            alpha_mode: AlphaMode::Blend,
            unlit: true,
            cull_mode: None,
            ..default()
        });

        commands.spawn((
            Name::new(format!("Smoke {i}")),
            SmokePuff {
                home,
                age: s.cycle * i as f32 / s.count as f32,
                angle: i as f32,
            },
            Mesh3d(quad.clone()),
            MeshMaterial3d(material),
            Transform::from_translation(home),
        ));
    }
}

// ── Update ──────────────────────────────────────────────────────────

/// Drifts, spins and fades each smoke puff, keeping it facing the camera.
pub fn drift_smoke(
    time: Res<Time>,
    cfg: Res<DesertConfig>,
    camera_q: Query<&Transform, (With<DollyCamera>, Without<SmokePuff>)>,
    mut puffs: Query<(&mut Transform, &mut SmokePuff, &MeshMaterial3d<StandardMaterial>)>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    let Ok(camera) = camera_q.single() else {
        return;
    };
    let s = &cfg.smoke;
    let dt = time.delta_secs();

    for (mut transform, mut puff, mat_handle) in &mut puffs {
        puff.age += dt;
        puff.angle += s.spin * dt;

        transform.translation = puff.home + math::drift_offset(puff.age, s.cycle, s.drift);
        transform.look_at(camera.translation, Vec3::Y);
        transform.rotate_local_z(puff.angle);

        let alpha = s.opacity * math::cycle_fade(puff.age, s.cycle);
        if let Some(mat) = materials.get_mut(&mat_handle.0) {
            mat.base_color.set_alpha(alpha);
        }
    }
}

use bevy::prelude::*;
use noise::{Fbm, MultiFractal, NoiseFn, Perlin};

use super::DuneSettings;
use crate::math;

/// Noise-derived dune heights, sampled on demand.
#[derive(Resource)]
pub struct DuneField {
    fbm: Fbm<Perlin>,
    scale: f64,
    max_height: f32,
}

/// Vertex and index buffers for a square patch of dunes.
pub struct GroundMesh {
    /// Vertex positions, row-major along +Z then +X.
    pub positions: Vec<[f32; 3]>,
    /// Per-vertex heightfield normals.
    pub normals: Vec<[f32; 3]>,
    /// Texture coordinates spanning `[0, 1]` over the patch.
    pub uvs: Vec<[f32; 2]>,
    /// Triangle list, counter-clockwise seen from above.
    pub indices: Vec<u32>,
}

impl DuneField {
    /// Builds the noise generator from dune settings.
    pub fn from_settings(s: &DuneSettings) -> Self {
        Self {
            fbm: Fbm::new(s.seed).set_octaves(s.octaves),
            scale: s.scale,
            max_height: s.max_height,
        }
    }

    /// Dune height at a world XZ position, in `[0, max_height]`.
    pub fn height(&self, x: f32, z: f32) -> f32 {
        let n = self.fbm.get([x as f64 / self.scale, z as f64 / self.scale]);
        math::map_noise_to_range(n, 0.0, self.max_height).clamp(0.0, self.max_height)
    }

    /// Surface normal from heights sampled `spacing` units around `(x, z)`.
    pub fn normal(&self, x: f32, z: f32, spacing: f32) -> Vec3 {
        math::heightfield_normal(
            self.height(x - spacing, z),
            self.height(x + spacing, z),
            self.height(x, z - spacing),
            self.height(x, z + spacing),
            spacing,
        )
    }

    /// Triangulates a `size` × `size` patch centred on `center` (world XZ)
    /// with `resolution` cells per side.
    pub fn ground_mesh(&self, center: Vec2, size: f32, resolution: u32) -> GroundMesh {
        let res = resolution.max(1);
        let side = res + 1;
        let cell = size / res as f32;
        let origin = center - Vec2::splat(size / 2.0);

        let vertex_count = (side * side) as usize;
        let mut positions = Vec::with_capacity(vertex_count);
        let mut normals = Vec::with_capacity(vertex_count);
        let mut uvs = Vec::with_capacity(vertex_count);

        for row in 0..side {
            for col in 0..side {
                let x = origin.x + col as f32 * cell;
                let z = origin.y + row as f32 * cell;
                positions.push([x, self.height(x, z), z]);
                normals.push(self.normal(x, z, cell).to_array());
                uvs.push([col as f32 / res as f32, row as f32 / res as f32]);
            }
        }

        let mut indices = Vec::with_capacity((res * res * 6) as usize);
        for row in 0..res {
            for col in 0..res {
                let a = row * side + col;
                let b = a + 1;
                let c = a + side;
                let d = c + 1;
                indices.extend_from_slice(&[a, c, b, b, c, d]);
            }
        }

        GroundMesh {
            positions,
            normals,
            uvs,
            indices,
        }
    }
}

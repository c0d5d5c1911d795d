//! Pure computation helpers extracted for testability.
//!
//! All functions in this module are free of Bevy ECS dependencies and operate
//! on plain numeric / `Vec3` / `Transform` inputs, making them straightforward to unit-test.

use bevy::prelude::{Transform, Vec3};

/// Maps a noise value from the standard `[-1, 1]` range into `[min, max]`.
///
/// Noise generators (e.g. `Fbm<Perlin>`) produce values centred around zero.
/// This linearly rescales to an arbitrary output range.
///
/// # Examples
/// ```
/// # use desert_intro::math::map_noise_to_range;
/// assert_eq!(map_noise_to_range(-1.0, 0.0, 10.0), 0.0);
/// assert_eq!(map_noise_to_range( 1.0, 0.0, 10.0), 10.0);
/// assert_eq!(map_noise_to_range( 0.0, 2.0, 6.0),  4.0);
/// ```
pub fn map_noise_to_range(noise_val: f64, min: f32, max: f32) -> f32 {
    min + ((noise_val as f32 + 1.0) / 2.0) * (max - min)
}

/// Cubic ease-out curve: fast start, gentle deceleration.
///
/// `t` should be in `[0, 1]`. Returns `1 - (1 - t)^3`.
pub fn ease_out_cubic(t: f32) -> f32 {
    1.0 - (1.0 - t).powi(3)
}

/// Evenly spaced reveal point for caption `index` of `count`.
///
/// The path from `origin` to `destination` is cut into `count + 1` equal
/// segments; caption `i` sits at the end of segment `i`, so no caption lands
/// exactly on either endpoint. Works for either travel direction.
pub fn even_threshold(index: usize, count: usize, origin: f32, destination: f32) -> f32 {
    let fraction = (index + 1) as f32 / (count + 1) as f32;
    origin + (destination - origin) * fraction
}

/// Opacity of a caption `age` seconds after it was presented.
///
/// Eases in over `fade_in`, holds at full opacity, and when `linger` is set
/// fades out linearly over `fade_out` once `linger` seconds have passed.
/// Zero-length fades snap.
pub fn caption_alpha(age: f32, fade_in: f32, linger: Option<f32>, fade_out: f32) -> f32 {
    if age < 0.0 {
        return 0.0;
    }
    let fade = if fade_in > 0.0 {
        ease_out_cubic((age / fade_in).min(1.0))
    } else {
        1.0
    };
    let Some(linger) = linger else {
        return fade;
    };
    if age <= linger {
        return fade;
    }
    if fade_out <= 0.0 {
        return 0.0;
    }
    let out = 1.0 - ((age - linger) / fade_out).min(1.0);
    fade * out
}

/// Where a caption appears relative to the camera.
///
/// Moves the camera transform `offset` units along its forward axis (negative
/// values place the caption behind) and keeps the camera's orientation.
pub fn caption_anchor(camera: &Transform, offset: f32) -> Transform {
    let forward = camera.forward().as_vec3();
    Transform::from_translation(camera.translation + forward * offset)
        .with_rotation(camera.rotation)
}

/// Displacement of a drifting sprite on a repeating cycle.
///
/// The sprite travels `velocity * t` where `t` wraps every `cycle` seconds,
/// snapping back to its home position at the start of each cycle.
pub fn drift_offset(age: f32, cycle: f32, velocity: Vec3) -> Vec3 {
    if cycle <= 0.0 {
        return Vec3::ZERO;
    }
    velocity * age.rem_euclid(cycle)
}

/// Opacity envelope for a drifting sprite: zero at both ends of each cycle,
/// full in the middle, so the wrap-around snap is invisible.
pub fn cycle_fade(age: f32, cycle: f32) -> f32 {
    if cycle <= 0.0 {
        return 0.0;
    }
    let t = age.rem_euclid(cycle) / cycle;
    (std::f32::consts::PI * t).sin()
}

/// Surface normal of a heightfield from central differences.
///
/// `left`/`right` are heights sampled `spacing` units along -X/+X, `back`/`front`
/// along -Z/+Z.
pub fn heightfield_normal(left: f32, right: f32, back: f32, front: f32, spacing: f32) -> Vec3 {
    Vec3::new(left - right, 2.0 * spacing, back - front).normalize_or_zero()
}

#[cfg(test)]
mod tests {
    use super::*;

    // ── map_noise_to_range ──────────────────────────────────────────

    #[test]
    fn noise_min_maps_to_range_min() {
        assert_eq!(map_noise_to_range(-1.0, 0.0, 10.0), 0.0);
    }

    #[test]
    fn noise_max_maps_to_range_max() {
        assert_eq!(map_noise_to_range(1.0, 0.0, 10.0), 10.0);
    }

    #[test]
    fn noise_zero_maps_to_midpoint() {
        let result = map_noise_to_range(0.0, 2.0, 6.0);
        assert!((result - 4.0).abs() < 1e-6);
    }

    // ── ease_out_cubic ──────────────────────────────────────────────

    #[test]
    fn ease_endpoints() {
        assert_eq!(ease_out_cubic(0.0), 0.0);
        assert_eq!(ease_out_cubic(1.0), 1.0);
    }

    #[test]
    fn ease_is_monotonically_increasing() {
        let steps: Vec<f32> = (0..=100)
            .map(|i| ease_out_cubic(i as f32 / 100.0))
            .collect();
        for w in steps.windows(2) {
            assert!(w[1] >= w[0], "ease_out_cubic must be non-decreasing");
        }
    }

    // ── even_threshold ──────────────────────────────────────────────

    #[test]
    fn seven_captions_split_path_into_eight_segments() {
        let thresholds: Vec<f32> = (0..7).map(|i| even_threshold(i, 7, -100.0, 200.0)).collect();
        let expected = [-62.5, -25.0, 12.5, 50.0, 87.5, 125.0, 162.5];
        for (got, want) in thresholds.iter().zip(expected) {
            assert!((got - want).abs() < 1e-4, "got {got}, expected {want}");
        }
    }

    #[test]
    fn descending_thresholds_start_near_origin() {
        let first = even_threshold(0, 3, 100.0, 0.0);
        let last = even_threshold(2, 3, 100.0, 0.0);
        assert!((first - 75.0).abs() < 1e-4);
        assert!((last - 25.0).abs() < 1e-4);
    }

    #[test]
    fn single_caption_sits_mid_path() {
        assert!((even_threshold(0, 1, 0.0, 10.0) - 5.0).abs() < 1e-6);
    }

    // ── caption_alpha ───────────────────────────────────────────────

    #[test]
    fn alpha_rises_then_holds_without_linger() {
        assert_eq!(caption_alpha(0.0, 1.0, None, 1.0), 0.0);
        assert!(caption_alpha(0.5, 1.0, None, 1.0) > 0.5);
        assert_eq!(caption_alpha(1.0, 1.0, None, 1.0), 1.0);
        assert_eq!(caption_alpha(100.0, 1.0, None, 1.0), 1.0);
    }

    #[test]
    fn alpha_fades_out_after_linger() {
        let mid = caption_alpha(5.5, 1.0, Some(5.0), 1.0);
        assert!((mid - 0.5).abs() < 1e-5, "got {mid}");
        assert_eq!(caption_alpha(6.0, 1.0, Some(5.0), 1.0), 0.0);
        assert_eq!(caption_alpha(60.0, 1.0, Some(5.0), 1.0), 0.0);
    }

    #[test]
    fn zero_length_fades_snap() {
        assert_eq!(caption_alpha(0.0, 0.0, Some(2.0), 0.0), 1.0);
        assert_eq!(caption_alpha(2.1, 0.0, Some(2.0), 0.0), 0.0);
    }

    // ── caption_anchor ──────────────────────────────────────────────

    #[test]
    fn anchor_sits_ahead_of_camera() {
        let camera = Transform::from_xyz(10.0, 2.0, 0.0).looking_to(Vec3::X, Vec3::Y);
        let anchor = caption_anchor(&camera, 30.0);
        assert!((anchor.translation - Vec3::new(40.0, 2.0, 0.0)).length() < 1e-4);
        assert_eq!(anchor.rotation, camera.rotation);
    }

    #[test]
    fn negative_offset_places_anchor_behind() {
        let camera = Transform::from_xyz(0.0, 0.0, 0.0).looking_to(Vec3::NEG_Z, Vec3::Y);
        let anchor = caption_anchor(&camera, -5.0);
        assert!((anchor.translation - Vec3::new(0.0, 0.0, 5.0)).length() < 1e-4);
    }

    // ── drift ───────────────────────────────────────────────────────

    #[test]
    fn drift_wraps_each_cycle() {
        let v = Vec3::new(0.0, 1.0, 0.5);
        assert_eq!(drift_offset(0.0, 4.0, v), Vec3::ZERO);
        assert!((drift_offset(3.0, 4.0, v) - v * 3.0).length() < 1e-5);
        assert!((drift_offset(5.0, 4.0, v) - v).length() < 1e-5);
    }

    #[test]
    fn cycle_fade_is_dark_at_wrap() {
        assert!(cycle_fade(0.0, 4.0).abs() < 1e-6);
        assert!((cycle_fade(2.0, 4.0) - 1.0).abs() < 1e-6);
        assert!(cycle_fade(3.999, 4.0) < 0.01);
    }

    // ── heightfield_normal ──────────────────────────────────────────

    #[test]
    fn flat_field_points_up() {
        assert_eq!(heightfield_normal(1.0, 1.0, 1.0, 1.0, 2.0), Vec3::Y);
    }

    #[test]
    fn slope_rising_along_x_tilts_normal_back() {
        let n = heightfield_normal(0.0, 2.0, 0.0, 0.0, 1.0);
        assert!(n.x < 0.0 && n.y > 0.0);
        assert!((n.length() - 1.0).abs() < 1e-5);
    }
}

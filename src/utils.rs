//! Utils

use image::Rgb;
use serde::{Deserialize, Serialize};

use crate::{random, Color, Vec3};

/// Compute a random vector with each component in [min, max)
pub fn random_vec(min: f64, max: f64) -> Vec3 {
    Vec3::new(
        random::random_range(min, max),
        random::random_range(min, max),
        random::random_range(min, max),
    )
}

/// Compute a random point strictly inside the unit ball
///
/// Rejection sampling: draw from the cube, keep the draw once it lands inside.
pub fn random_in_unit_sphere() -> Vec3 {
    loop {
        let p = random_vec(-1.0, 1.0);
        if p.norm_squared() < 1.0 {
            return p;
        }
    }
}

/// Compute a random point inside the unit disk (z = 0)
///
/// This simulates defocus blur
pub fn random_in_unit_disk() -> Vec3 {
    loop {
        let p = Vec3::new(
            random::random_range(-1.0, 1.0),
            random::random_range(-1.0, 1.0),
            0.0,
        );
        if p.norm_squared() < 1.0 {
            return p;
        }
    }
}

/// Whether every component is vanishingly small
///
/// Used to catch degenerate scatter directions before they become rays.
pub fn near_zero(v: &Vec3) -> bool {
    const EPS: f64 = 1e-8;
    v[0].abs() < EPS && v[1].abs() < EPS && v[2].abs() < EPS
}

/// Mirror reflection of `v` about the normal `n`
pub fn reflect(v: &Vec3, n: &Vec3) -> Vec3 {
    v - 2.0 * v.dot(n) * n
}

/// Snell's law refraction of the unit vector `uv` through the normal `n`
pub fn refract(uv: &Vec3, n: &Vec3, etai_over_etat: f64) -> Vec3 {
    let cos_theta = (-uv).dot(n).min(1.0);
    let r_out_perp = etai_over_etat * (uv + cos_theta * n);
    let r_out_parallel = -(1.0 - r_out_perp.norm_squared()).abs().sqrt() * n;
    r_out_perp + r_out_parallel
}

/// Convert an accumulated sample sum to an 8-bit pixel
pub fn get_pixel(color: &Color, samples_per_pixel: u32) -> Rgb<u8> {
    let scale = 1.0 / samples_per_pixel as f64;

    // Divide the color by the number of samples and gamma-correct for gamma = 2.0
    let r = scale_color((scale * color[0]).sqrt());
    let g = scale_color((scale * color[1]).sqrt());
    let b = scale_color((scale * color[2]).sqrt());

    Rgb([r, g, b])
}

/// scale the color to between 0 and 255
fn scale_color(val: f64) -> u8 {
    (256.0 * val.clamp(0.0, 0.999)) as u8
}

/// Parse a `#rrggbb` hex string into a color with components in [0, 1]
///
/// Malformed input falls back to black; the scene builders only call this
/// with literal constants.
pub fn hex_to_color(hex: &str) -> Color {
    let hex = hex.trim().trim_start_matches('#');
    let channel = |range: std::ops::Range<usize>| {
        hex.get(range)
            .and_then(|s| u8::from_str_radix(s, 16).ok())
            .unwrap_or(0) as f64
            / 255.0
    };
    Color::new(channel(0..2), channel(2..4), channel(4..6))
}

/// Three floats the way they appear in a config file
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SerdeVector {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}
impl From<SerdeVector> for Vec3 {
    fn from(v: SerdeVector) -> Self {
        Vec3::new(v.x, v.y, v.z)
    }
}
impl From<Vec3> for SerdeVector {
    fn from(v: Vec3) -> Self {
        Self {
            x: v[0],
            y: v[1],
            z: v[2],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reflect_flips_the_normal_component() {
        // dot(reflect(v, n), n) == -dot(v, n) for unit n
        let n = Vec3::new(0.0, 1.0, 0.0);
        let v = Vec3::new(0.3, -0.8, 0.5);
        let r = reflect(&v, &n);
        assert!((r.dot(&n) + v.dot(&n)).abs() < 1e-12);
        // tangential part is untouched
        assert!((r[0] - v[0]).abs() < 1e-12);
        assert!((r[2] - v[2]).abs() < 1e-12);
    }

    #[test]
    fn refract_at_normal_incidence_goes_straight_through() {
        let uv = Vec3::new(0.0, 0.0, -1.0);
        let n = Vec3::new(0.0, 0.0, 1.0);
        let refracted = refract(&uv, &n, 1.0 / 1.5);
        assert!((refracted - uv).norm() < 1e-12);
    }

    #[test]
    fn near_zero_checks_all_components() {
        assert!(near_zero(&Vec3::new(1e-9, -1e-9, 0.0)));
        assert!(!near_zero(&Vec3::new(1e-9, 1e-7, 0.0)));
    }

    #[test]
    fn ball_and_disk_samples_stay_inside() {
        crate::random::seed(3);
        for _ in 0..200 {
            assert!(random_in_unit_sphere().norm_squared() < 1.0);
            let d = random_in_unit_disk();
            assert!(d.norm_squared() < 1.0);
            assert_eq!(d[2], 0.0);
        }
    }

    #[test]
    fn pixels_are_averaged_gamma_corrected_and_clamped() {
        let sum = Color::new(4.0, 0.0, 1.0);
        let Rgb([r, g, b]) = get_pixel(&sum, 4);
        assert_eq!(r, 255); // clamped at 0.999
        assert_eq!(g, 0);
        assert_eq!(b, 128); // sqrt(0.25) * 256
    }

    #[test]
    fn hex_colors_parse() {
        let c = hex_to_color("#ff0080");
        assert!((c[0] - 1.0).abs() < 1e-12);
        assert_eq!(c[1], 0.0);
        assert!((c[2] - 128.0 / 255.0).abs() < 1e-12);
    }
}

//! Textures/colors

use std::path::Path;
use std::sync::Arc;

use log::error;

use crate::{random, utils, Color, Point, Vec3};

pub type Texture = Arc<dyn Textured + Send + Sync>;

/// Color lookup by surface coordinates and hit point
pub trait Textured {
    fn value(&self, u: f64, v: f64, p: &Point) -> Color;
}

/// Solid Color
#[derive(Debug, Clone)]
pub struct SolidColor {
    color_value: Color,
}
impl SolidColor {
    pub fn new(color: Color) -> Self {
        Self { color_value: color }
    }
}
impl Textured for SolidColor {
    fn value(&self, _u: f64, _v: f64, _p: &Point) -> Color {
        self.color_value
    }
}

/// Checker Texture
///
/// A 3D checker from the sign of a product of sines, independent of the
/// surface parameterization. Larger `size` means smaller squares.
pub struct Checker {
    odd: Texture,
    even: Texture,
    size: f64,
}
impl Checker {
    pub fn new(even: Texture, odd: Texture, size: f64) -> Self {
        Self { odd, even, size }
    }

    pub fn from_colors(c1: Color, c2: Color, size: f64) -> Self {
        Self {
            even: Arc::new(SolidColor::new(c1)),
            odd: Arc::new(SolidColor::new(c2)),
            size,
        }
    }
}
impl Textured for Checker {
    fn value(&self, u: f64, v: f64, p: &Point) -> Color {
        let sines =
            (self.size * p[0]).sin() * (self.size * p[1]).sin() * (self.size * p[2]).sin();
        if sines < 0.0 {
            self.odd.value(u, v, p)
        } else {
            self.even.value(u, v, p)
        }
    }
}

/// Noise Texture
///
/// Smoothed Perlin noise tinted by an albedo; the marbled variant modulates
/// a sine along z by multi-octave turbulence.
pub struct Noise {
    noise: Perlin,
    albedo: Color,
    scale: f64,
    marbled: bool,
}
impl Noise {
    pub fn new(scale: f64) -> Self {
        Self::with_albedo(Color::new(1.0, 1.0, 1.0), scale, false)
    }

    pub fn with_albedo(albedo: Color, scale: f64, marbled: bool) -> Self {
        Self {
            noise: Perlin::new(),
            albedo,
            scale,
            marbled,
        }
    }
}
impl Textured for Noise {
    fn value(&self, _u: f64, _v: f64, p: &Point) -> Color {
        let factor = if self.marbled {
            (self.scale * p[2] + 10.0 * self.noise.turbulence(p, 7)).sin()
        } else {
            self.noise.noise(&(self.scale * p))
        };
        0.5 * self.albedo * (1.0 + factor)
    }
}

/// Image-mapped texture over a decoded RGB8 buffer
///
/// Missing image data degrades to solid cyan so a lost asset shows up in the
/// render instead of aborting it.
pub struct ImageTexture {
    data: Option<Vec<u8>>,
    width: u32,
    height: u32,
}
impl ImageTexture {
    /// Decode an image file; on failure the texture renders cyan.
    pub fn open(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match image::open(path) {
            Ok(img) => {
                let img = img.to_rgb8();
                let (width, height) = img.dimensions();
                Self {
                    data: Some(img.into_raw()),
                    width,
                    height,
                }
            }
            Err(e) => {
                error!("could not load texture image {}: {e}", path.display());
                Self {
                    data: None,
                    width: 0,
                    height: 0,
                }
            }
        }
    }

    /// Wrap an already-decoded RGB8 buffer.
    pub fn from_raw(width: u32, height: u32, data: Vec<u8>) -> Self {
        Self {
            data: Some(data),
            width,
            height,
        }
    }
}
impl Textured for ImageTexture {
    fn value(&self, u: f64, v: f64, _p: &Point) -> Color {
        let data = match &self.data {
            Some(data) => data,
            // solid cyan as a debugging aid
            None => return Color::new(0.0, 1.0, 1.0),
        };

        // Clamp coordinates and flip v: image row 0 is the top
        let u = u.clamp(0.0, 1.0);
        let v = 1.0 - v.clamp(0.0, 1.0);

        let i = ((u * self.width as f64) as u32).min(self.width - 1);
        let j = ((v * self.height as f64) as u32).min(self.height - 1);

        let idx = 3 * (j * self.width + i) as usize;
        let color_scale = 1.0 / 255.0;
        Color::new(
            color_scale * data[idx] as f64,
            color_scale * data[idx + 1] as f64,
            color_scale * data[idx + 2] as f64,
        )
    }
}

const POINT_COUNT: usize = 256;

/// Perlin noise generator
///
/// Fixed permutation tables and random unit gradients, generated once and
/// read-only afterwards.
pub struct Perlin {
    ranvec: Vec<Vec3>,
    perm_x: Vec<i32>,
    perm_y: Vec<i32>,
    perm_z: Vec<i32>,
}
impl Perlin {
    pub fn new() -> Self {
        let ranvec = (0..POINT_COUNT)
            .map(|_| utils::random_vec(-1.0, 1.0).normalize())
            .collect();

        Self {
            ranvec,
            perm_x: Self::generate_perm(),
            perm_y: Self::generate_perm(),
            perm_z: Self::generate_perm(),
        }
    }

    /// Smoothed gradient noise in roughly [-1, 1]
    pub fn noise(&self, p: &Point) -> f64 {
        let u = p[0] - p[0].floor();
        let v = p[1] - p[1].floor();
        let w = p[2] - p[2].floor();

        let i = p[0].floor() as i32;
        let j = p[1].floor() as i32;
        let k = p[2].floor() as i32;

        let mut c = [[[Vec3::zeros(); 2]; 2]; 2];
        for (di, c0) in c.iter_mut().enumerate() {
            for (dj, c1) in c0.iter_mut().enumerate() {
                for (dk, c2) in c1.iter_mut().enumerate() {
                    *c2 = self.ranvec[(self.perm_x[((i + di as i32) & 255) as usize]
                        ^ self.perm_y[((j + dj as i32) & 255) as usize]
                        ^ self.perm_z[((k + dk as i32) & 255) as usize])
                        as usize]
                }
            }
        }

        Self::perlin_interp(c, u, v, w)
    }

    /// Multi-octave summed noise, weight halving per octave
    pub fn turbulence(&self, p: &Point, depth: u32) -> f64 {
        let mut accum = 0.0;
        let mut temp_p = *p;
        let mut weight = 1.0;

        for _ in 0..depth {
            accum += weight * self.noise(&temp_p);
            weight *= 0.5;
            temp_p *= 2.0;
        }
        accum.abs()
    }

    fn generate_perm() -> Vec<i32> {
        let mut p: Vec<i32> = (0..POINT_COUNT as i32).collect();
        // Fisher-Yates
        for i in (1..POINT_COUNT).rev() {
            let target = random::random_index(i + 1);
            p.swap(i, target);
        }
        p
    }

    fn perlin_interp(c: [[[Vec3; 2]; 2]; 2], u: f64, v: f64, w: f64) -> f64 {
        // Hermitian smoothing
        let uu = u.powi(2) * (3.0 - 2.0 * u);
        let vv = v.powi(2) * (3.0 - 2.0 * v);
        let ww = w.powi(2) * (3.0 - 2.0 * w);

        let mut accum = 0.0;

        for i in 0..2 {
            let fi = i as f64;
            for j in 0..2 {
                let fj = j as f64;
                for k in 0..2 {
                    let fk = k as f64;
                    let weight_v = Vec3::new(u - fi, v - fj, w - fk);
                    accum += (fi * uu + (1.0 - fi) * (1.0 - uu))
                        * (fj * vv + (1.0 - fj) * (1.0 - vv))
                        * (fk * ww + (1.0 - fk) * (1.0 - ww))
                        * c[i][j][k].dot(&weight_v);
                }
            }
        }
        accum
    }
}
impl Default for Perlin {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn solid_color_ignores_inputs() {
        let tex = SolidColor::new(Color::new(0.1, 0.5, 0.9));
        assert_eq!(tex.value(0.0, 0.0, &Point::zeros()), Color::new(0.1, 0.5, 0.9));
        assert_eq!(
            tex.value(0.7, 0.2, &Point::new(5.0, -3.0, 1.0)),
            Color::new(0.1, 0.5, 0.9)
        );
    }

    #[test]
    fn checker_alternates_with_the_sine_sign() {
        let even = Color::new(1.0, 1.0, 1.0);
        let odd = Color::new(0.0, 0.0, 0.0);
        let checker = Checker::from_colors(even, odd, 1.0);

        // sin(pi/2)^3 > 0 at (pi/2, pi/2, pi/2)
        let half_pi = std::f64::consts::FRAC_PI_2;
        let p_even = Point::new(half_pi, half_pi, half_pi);
        assert_eq!(checker.value(0.0, 0.0, &p_even), even);

        // flipping one axis flips the sign
        let p_odd = Point::new(-half_pi, half_pi, half_pi);
        assert_eq!(checker.value(0.0, 0.0, &p_odd), odd);
    }

    #[test]
    fn checker_size_scales_the_squares() {
        let even = Color::new(1.0, 1.0, 1.0);
        let odd = Color::new(0.0, 0.0, 0.0);
        let coarse = Checker::from_colors(even, odd, 1.0);
        let fine = Checker::from_colors(even, odd, 4.0);

        // The same point lands in different squares at different sizes
        let p = Point::new(1.0, 1.0, 1.0);
        assert_eq!(coarse.value(0.0, 0.0, &p), even);
        assert_eq!(fine.value(0.0, 0.0, &p), odd);
    }

    #[test]
    fn perlin_noise_is_smooth_and_bounded() {
        crate::random::seed(17);
        let perlin = Perlin::new();
        for i in 0..50 {
            let p = Point::new(i as f64 * 0.37, -i as f64 * 0.11, i as f64 * 0.73);
            let n = perlin.noise(&p);
            assert!(n.abs() <= 1.5, "noise out of range: {n}");
            // nearby points give nearby noise
            let q = p + Vec3::new(1e-6, 0.0, 0.0);
            assert!((perlin.noise(&q) - n).abs() < 1e-3);
        }
    }

    #[test]
    fn turbulence_is_non_negative() {
        crate::random::seed(23);
        let perlin = Perlin::new();
        for i in 0..50 {
            let p = Point::new(i as f64 * 0.61, i as f64 * 0.17, -i as f64 * 0.41);
            assert!(perlin.turbulence(&p, 7) >= 0.0);
        }
    }

    #[test]
    fn noise_texture_stays_within_its_albedo() {
        crate::random::seed(29);
        let albedo = Color::new(0.8, 0.6, 0.4);
        for marbled in [false, true] {
            let tex = Noise::with_albedo(albedo, 3.0, marbled);
            for i in 0..20 {
                let p = Point::new(i as f64 * 0.29, 0.5, -i as f64 * 0.13);
                let c = tex.value(0.0, 0.0, &p);
                for ch in 0..3 {
                    assert!(c[ch] >= -1e-9);
                    assert!(c[ch] <= albedo[ch] * 1.5 + 1e-9);
                }
            }
        }
    }

    #[test]
    fn image_texture_samples_the_buffer() {
        // 2x1: red on the left, blue on the right
        let tex = ImageTexture::from_raw(2, 1, vec![255, 0, 0, 0, 0, 255]);
        let left = tex.value(0.0, 0.5, &Point::zeros());
        let right = tex.value(0.9, 0.5, &Point::zeros());
        assert!((left - Color::new(1.0, 0.0, 0.0)).norm() < 1e-9);
        assert!((right - Color::new(0.0, 0.0, 1.0)).norm() < 1e-9);
    }

    #[test]
    fn missing_image_degrades_to_cyan() {
        let tex = ImageTexture::open("definitely/not/a/file.png");
        assert_eq!(tex.value(0.3, 0.7, &Point::zeros()), Color::new(0.0, 1.0, 1.0));
    }
}

//! Parallel tile-free renderer
//!
//! Rows are rendered in parallel with rayon and stitched into an
//! [`image::RgbImage`]; each pixel averages `samples_per_pixel` jittered
//! camera rays before tone mapping.

use image::RgbImage;
use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::cameras::Camera;
use crate::objects::Hittable;
use crate::utils::get_pixel;
use crate::{random, Background, Color};

/// Image and sampling parameters as they appear in a settings file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderConfig {
    pub image_width: u32,
    pub image_height: u32,
    pub samples_per_pixel: u32,
    pub max_depth: u32,
}
impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            image_width: 600,
            image_height: 400,
            samples_per_pixel: 100,
            max_depth: 50,
        }
    }
}
impl RenderConfig {
    pub fn aspect_ratio(&self) -> f64 {
        f64::from(self.image_width) / f64::from(self.image_height)
    }
}

/// Render the world into an image buffer.
///
/// Row `y = 0` of the output is the top of the frame, so rows are traced
/// with the flipped coordinate `j = height - 1 - y`.
pub fn render(
    world: &(dyn Hittable + Send + Sync),
    camera: &Camera,
    background: &Background,
    config: &RenderConfig,
) -> RgbImage {
    let width = config.image_width;
    let height = config.image_height;

    let progress = ProgressBar::new(u64::from(height));
    if let Ok(style) =
        ProgressStyle::with_template("{elapsed_precise} [{bar:40}] {pos}/{len} rows")
    {
        progress.set_style(style);
    }

    let rows: Vec<Vec<image::Rgb<u8>>> = (0..height)
        .into_par_iter()
        .map(|y| {
            let j = height - 1 - y;
            let row = (0..width)
                .map(|x| {
                    let mut color = Color::zeros();
                    for _ in 0..config.samples_per_pixel {
                        let u = (f64::from(x) + random::random_f64()) / f64::from(width - 1);
                        let v = (f64::from(j) + random::random_f64()) / f64::from(height - 1);
                        let ray = camera.get_ray(u, v);
                        color += ray.get_color(world, background, config.max_depth);
                    }
                    get_pixel(&color, config.samples_per_pixel)
                })
                .collect();
            progress.inc(1);
            row
        })
        .collect();
    progress.finish_and_clear();

    let mut img = RgbImage::new(width, height);
    for (y, row) in rows.iter().enumerate() {
        for (x, pixel) in row.iter().enumerate() {
            img.put_pixel(x as u32, y as u32, *pixel);
        }
    }
    img
}

//! Cameras and configs for cameras
use serde::{Deserialize, Serialize};

use crate::utils::{self, SerdeVector};
use crate::{random, Point, Ray, Vec3};

/// Camera Config
///
/// The full 9-parameter camera as it appears in a settings file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CameraConfig {
    pub look_from: SerdeVector,
    pub look_at: SerdeVector,
    pub v_up: SerdeVector,
    pub vertical_fov_deg: f64,
    pub aperture: f64,
    pub focus_distance: f64,
    #[serde(default)]
    pub time0: f64,
    #[serde(default)]
    pub time1: f64,
}

/// Camera and related tasks
///
/// The orthonormal basis, viewport spans and lens radius are derived once at
/// construction; `get_ray` is the only hot-path entry point.
#[derive(Debug)]
pub struct Camera {
    origin: Point,
    lower_left_corner: Point,
    horizontal: Vec3,
    vertical: Vec3,
    u: Vec3,
    v: Vec3,
    lens_radius: f64,
    time0: f64,
    time1: f64,
}
impl Camera {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        look_from: Point,
        look_at: Point,
        v_up: Vec3,
        vertical_fov_deg: f64,
        aspect_ratio: f64,
        aperture: f64,
        focus_dist: f64,
        time0: f64,
        time1: f64,
    ) -> Self {
        // Establish the viewport
        let theta = vertical_fov_deg.to_radians();
        let h = (theta / 2.0).tan();
        let viewport_height = 2.0 * h;
        let viewport_width = aspect_ratio * viewport_height;

        // Calculate the viewing vectors
        let w = (look_from - look_at).normalize();
        let u = (v_up.cross(&w)).normalize();
        let v = w.cross(&u);

        let origin = look_from;
        let horizontal = focus_dist * viewport_width * u;
        let vertical = focus_dist * viewport_height * v;
        let lower_left_corner = origin - horizontal / 2.0 - vertical / 2.0 - focus_dist * w;

        let lens_radius = aperture / 2.0;

        Self {
            origin,
            lower_left_corner,
            horizontal,
            vertical,
            u,
            v,
            lens_radius,
            time0,
            time1,
        }
    }

    pub fn from_config(config: &CameraConfig, aspect_ratio: f64) -> Self {
        Self::new(
            config.look_from.into(),
            config.look_at.into(),
            config.v_up.into(),
            config.vertical_fov_deg,
            aspect_ratio,
            config.aperture,
            config.focus_distance,
            config.time0,
            config.time1,
        )
    }

    /// Map normalized viewport coordinates to a world-space ray
    ///
    /// The origin is jittered within the lens disk for depth of field and the
    /// ray is stamped with a uniform random time inside the shutter window.
    pub fn get_ray(&self, s: f64, t: f64) -> Ray {
        let rd = self.lens_radius * utils::random_in_unit_disk();
        let offset = self.u * rd[0] + self.v * rd[1];

        let time = if self.time1 > self.time0 {
            random::random_range(self.time0, self.time1)
        } else {
            self.time0
        };

        Ray::new(
            self.origin + offset,
            self.lower_left_corner + s * self.horizontal + t * self.vertical - self.origin - offset,
            time,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_camera(aperture: f64) -> Camera {
        Camera::new(
            Point::new(0.0, 0.0, 2.0),
            Point::new(0.0, 0.0, 0.0),
            Vec3::new(0.0, 1.0, 0.0),
            60.0,
            16.0 / 9.0,
            aperture,
            2.0,
            0.0,
            1.0,
        )
    }

    #[test]
    fn center_ray_aims_at_the_look_target() {
        let camera = test_camera(0.0);
        let ray = camera.get_ray(0.5, 0.5);
        assert!((ray.orig - Point::new(0.0, 0.0, 2.0)).norm() < 1e-12);

        let expected = Vec3::new(0.0, 0.0, -1.0);
        assert!((ray.dir.normalize() - expected).norm() < 1e-12);
    }

    #[test]
    fn ray_times_stay_inside_the_shutter_window() {
        crate::random::seed(13);
        let camera = test_camera(0.0);
        for _ in 0..100 {
            let ray = camera.get_ray(0.3, 0.7);
            assert!((0.0..1.0).contains(&ray.time));
        }
    }

    #[test]
    fn zero_shutter_window_is_not_sampled() {
        let camera = Camera::new(
            Point::zeros(),
            Point::new(0.0, 0.0, -1.0),
            Vec3::new(0.0, 1.0, 0.0),
            90.0,
            1.0,
            0.0,
            1.0,
            0.25,
            0.25,
        );
        assert_eq!(camera.get_ray(0.5, 0.5).time, 0.25);
    }

    #[test]
    fn aperture_jitters_the_ray_origin_within_the_lens() {
        crate::random::seed(19);
        let camera = test_camera(0.5);
        let mut moved = false;
        for _ in 0..20 {
            let ray = camera.get_ray(0.5, 0.5);
            let offset = (ray.orig - Point::new(0.0, 0.0, 2.0)).norm();
            assert!(offset <= 0.25 + 1e-12); // lens radius = aperture / 2
            moved |= offset > 0.0;
        }
        assert!(moved);
    }
}

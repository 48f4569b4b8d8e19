//! Path Tracing Library
//!
//! An offline Monte Carlo path tracer: scenes are in-memory graphs of
//! [`objects::Hittable`] geometry, [`materials::Scatterable`] materials and
//! [`textures::Textured`] textures, queried per sample by the recursive
//! integrator in [`Ray::get_color`].

use std::sync::Arc;

pub mod bvh;
pub mod cameras;
pub mod materials;
pub mod mediums;
pub mod objects;
pub mod random;
pub mod render;
pub mod scenes;
pub mod textures;
pub mod transrot;
pub mod utils;

use objects::Hittable;

pub type Vec3 = nalgebra::Vector3<f64>;
pub type Point = Vec3;
pub type Color = Vec3;
pub type Material = Arc<dyn materials::Scatterable + Send + Sync>;

/// Prelude
pub mod prelude {
    pub use crate::bvh::Bvh;
    pub use crate::cameras::Camera;
    pub use crate::materials::{Dielectric, DiffuseLight, Lambertian, Metal};
    pub use crate::objects::{HittableList, HittableObj, Sphere};
    pub use crate::{Background, Color, Material, Point, Ray, Vec3};
}

/// The ray in ray tracing
///
/// The timestamp is the shutter instant the ray samples, used by moving
/// geometry for motion blur.
#[derive(Debug)]
pub struct Ray {
    pub orig: Point,
    pub dir: Vec3,
    pub time: f64,
}
impl Ray {
    pub fn new(orig: Point, dir: Vec3, time: f64) -> Self {
        Self { orig, dir, time }
    }

    pub fn at(&self, t: f64) -> Point {
        self.orig + t * self.dir
    }

    /// The recursive light-transport integrator
    ///
    /// Finds the nearest hit, adds the material's emission, and if the
    /// material scatters, recurses along the scattered ray with the
    /// attenuation applied componentwise.
    pub fn get_color(
        &self,
        world: &(dyn Hittable + Send + Sync),
        background: &Background,
        depth: u32,
    ) -> Color {
        // If we have exceeded the ray bounce limit, no more light is gathered
        if depth == 0 {
            return Color::zeros();
        }

        // Put a minimum of 0.001 to reduce shadow acne
        match world.try_hit(self, 0.001, f64::INFINITY) {
            Some(hr) => {
                let emitted = hr.material.emitted(hr.u, hr.v, &hr.p);
                match hr.material.try_scatter(self, &hr) {
                    Some(sr) => {
                        emitted
                            + sr.attenuation.component_mul(&sr.scattered.get_color(
                                world,
                                background,
                                depth - 1,
                            ))
                    }
                    None => emitted,
                }
            }
            None => background.color(self),
        }
    }
}

/// What a ray sees when it escapes the scene
#[derive(Debug, Clone)]
pub enum Background {
    /// Flat color, typically near black for scenes lit by emissive geometry
    Solid(Color),
    /// White-to-blue gradient keyed on the ray's vertical direction
    SkyGradient,
}
impl Background {
    pub fn color(&self, ray: &Ray) -> Color {
        match self {
            Self::Solid(color) => *color,
            Self::SkyGradient => {
                let unit_direction = ray.dir.normalize();
                let t = 0.5 * (unit_direction[1] + 1.0);
                (1.0 - t) * Color::new(1.0, 1.0, 1.0) + t * Color::new(0.5, 0.7, 1.0)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::materials::DiffuseLight;
    use crate::objects::{HittableList, Sphere};

    #[test]
    fn ray_evaluates_parametrically() {
        let ray = Ray::new(Point::new(1.0, 0.0, 0.0), Vec3::new(0.0, 2.0, 0.0), 0.0);
        assert_eq!(ray.at(1.5), Point::new(1.0, 3.0, 0.0));
    }

    #[test]
    fn zero_depth_is_black_regardless_of_scene() {
        // Even a bright emitter right in front of the ray contributes nothing
        let mut world = HittableList::default();
        world.add(Box::new(Sphere::new(
            Point::new(0.0, 0.0, -2.0),
            1.0,
            Arc::new(DiffuseLight::new(Color::new(10.0, 10.0, 10.0))),
        )));
        let ray = Ray::new(Point::zeros(), Vec3::new(0.0, 0.0, -1.0), 0.0);

        let color = ray.get_color(&world, &Background::SkyGradient, 0);
        assert_eq!(color, Color::zeros());
    }

    #[test]
    fn escaped_rays_take_the_background() {
        let world = HittableList::default();
        let ray = Ray::new(Point::zeros(), Vec3::new(0.0, 1.0, 0.0), 0.0);

        let solid = Background::Solid(Color::new(0.1, 0.2, 0.3));
        assert_eq!(ray.get_color(&world, &solid, 10), Color::new(0.1, 0.2, 0.3));

        // Straight up is the pure sky blue end of the gradient
        let sky = ray.get_color(&world, &Background::SkyGradient, 10);
        assert!((sky - Color::new(0.5, 0.7, 1.0)).norm() < 1e-12);
    }

    #[test]
    fn emitters_short_circuit_the_recursion() {
        let mut world = HittableList::default();
        world.add(Box::new(Sphere::new(
            Point::new(0.0, 0.0, -2.0),
            1.0,
            Arc::new(DiffuseLight::new(Color::new(3.0, 2.0, 1.0))),
        )));
        let ray = Ray::new(Point::zeros(), Vec3::new(0.0, 0.0, -1.0), 0.0);

        let color = ray.get_color(&world, &Background::Solid(Color::zeros()), 5);
        assert!((color - Color::new(3.0, 2.0, 1.0)).norm() < 1e-12);
    }
}

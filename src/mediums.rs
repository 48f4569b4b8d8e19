//! Mediums

use std::sync::Arc;

use crate::{
    bvh::Aabb,
    materials::Isotropic,
    objects::{HitRecord, Hittable, HittableObj},
    random,
    textures::Texture,
    Color, Material, Ray, Vec3,
};

/// Homogeneous participating medium (fog/smoke) bounded by a surface
///
/// A ray crossing the boundary scatters after an exponentially distributed
/// free-flight distance; if that distance exceeds the span inside the
/// boundary, the ray passes through unscattered.
pub struct ConstantMedium {
    boundary: HittableObj,
    phase_function: Material,
    neg_inv_density: f64,
}
impl ConstantMedium {
    pub fn new(boundary: HittableObj, density: f64, texture: Texture) -> Self {
        Self {
            boundary,
            phase_function: Arc::new(Isotropic::from_texture(texture)),
            neg_inv_density: -1.0 / density,
        }
    }

    pub fn from_color(boundary: HittableObj, density: f64, color: Color) -> Self {
        Self {
            boundary,
            phase_function: Arc::new(Isotropic::new(color)),
            neg_inv_density: -1.0 / density,
        }
    }
}
impl Hittable for ConstantMedium {
    fn try_hit(&self, ray: &Ray, t_min: f64, t_max: f64) -> Option<HitRecord> {
        // Entry and exit crossings of the boundary, over the whole line so a
        // ray starting inside the medium still finds its exit
        let mut entry = self
            .boundary
            .try_hit(ray, f64::NEG_INFINITY, f64::INFINITY)?;
        let mut exit = self
            .boundary
            .try_hit(ray, entry.t + 0.0001, f64::INFINITY)?;

        entry.t = entry.t.max(t_min);
        exit.t = exit.t.min(t_max);
        if entry.t >= exit.t {
            return None;
        }
        entry.t = entry.t.max(0.0);

        let ray_length = ray.dir.norm();
        let distance_inside_boundary = (exit.t - entry.t) * ray_length;
        let hit_distance = self.neg_inv_density * random::random_f64().ln();

        if hit_distance > distance_inside_boundary {
            return None;
        }

        let t = entry.t + hit_distance / ray_length;
        // normal and front_face are arbitrary for a medium-interior scatter
        Some(HitRecord::new(
            ray.at(t),
            t,
            ray,
            &Vec3::new(1.0, 0.0, 0.0),
            Arc::clone(&self.phase_function),
            0.0,
            0.0,
        ))
    }

    fn try_bounding_box(&self, time0: f64, time1: f64) -> Option<Aabb> {
        self.boundary.try_bounding_box(time0, time1)
    }
}

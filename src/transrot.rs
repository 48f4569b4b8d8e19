//! Translation and rotation

use crate::{
    bvh::Aabb,
    objects::{HitRecord, Hittable, HittableObj},
    Point, Ray, Vec3,
};

/// Translate an object
///
/// The incoming ray is shifted into the child's frame; the hit point is
/// shifted back. Normals are unaffected by translation.
pub struct Translate {
    obj: HittableObj,
    offset: Vec3,
}
impl Translate {
    pub fn new(obj: HittableObj, offset: Vec3) -> Self {
        Self { obj, offset }
    }
}
impl Hittable for Translate {
    fn try_hit(&self, ray: &Ray, t_min: f64, t_max: f64) -> Option<HitRecord> {
        let moved_ray = Ray::new(ray.orig - self.offset, ray.dir, ray.time);

        self.obj.try_hit(&moved_ray, t_min, t_max).map(|mut hr| {
            hr.p += self.offset;
            hr
        })
    }

    fn try_bounding_box(&self, time0: f64, time1: f64) -> Option<Aabb> {
        self.obj
            .try_bounding_box(time0, time1)
            .map(|bbox| Aabb::new(bbox.min + self.offset, bbox.max + self.offset))
    }
}

/// Rotation axis
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
    Z,
}

/// Rotate an object about one coordinate axis
///
/// The ray is rotated into the child's local frame, the hit is rotated back.
/// The bounding box is re-derived axis-aligned from the 8 rotated corners of
/// the child's box: a conservative over-approximation, kept deliberately
/// loose rather than tracking an oriented box.
pub struct Rotate {
    obj: HittableObj,
    axis: Axis,
    sin_theta: f64,
    cos_theta: f64,
    bbox: Option<Aabb>,
}
impl Rotate {
    pub fn new(obj: HittableObj, axis: Axis, angle_deg: f64) -> Self {
        let radians = angle_deg.to_radians();
        let sin_theta = radians.sin();
        let cos_theta = radians.cos();

        let bbox = obj.try_bounding_box(0.0, 1.0).map(|child_box| {
            let mut min = Point::new(f64::INFINITY, f64::INFINITY, f64::INFINITY);
            let mut max = Point::new(f64::NEG_INFINITY, f64::NEG_INFINITY, f64::NEG_INFINITY);

            for i in 0..2 {
                for j in 0..2 {
                    for k in 0..2 {
                        let corner = Point::new(
                            i as f64 * child_box.max[0] + (1 - i) as f64 * child_box.min[0],
                            j as f64 * child_box.max[1] + (1 - j) as f64 * child_box.min[1],
                            k as f64 * child_box.max[2] + (1 - k) as f64 * child_box.min[2],
                        );
                        let tester = rotate(&corner, axis, sin_theta, cos_theta);

                        for c in 0..3 {
                            min[c] = min[c].min(tester[c]);
                            max[c] = max[c].max(tester[c]);
                        }
                    }
                }
            }
            Aabb::new(min, max)
        });

        Self {
            obj,
            axis,
            sin_theta,
            cos_theta,
            bbox,
        }
    }
}
impl Hittable for Rotate {
    fn try_hit(&self, ray: &Ray, t_min: f64, t_max: f64) -> Option<HitRecord> {
        // Inverse rotation into the child's frame
        let origin = rotate(&ray.orig, self.axis, -self.sin_theta, self.cos_theta);
        let direction = rotate(&ray.dir, self.axis, -self.sin_theta, self.cos_theta);
        let rotated_ray = Ray::new(origin, direction, ray.time);

        self.obj.try_hit(&rotated_ray, t_min, t_max).map(|hr| {
            // Forward rotation back to world space
            let p = rotate(&hr.p, self.axis, self.sin_theta, self.cos_theta);
            let normal = rotate(&hr.normal, self.axis, self.sin_theta, self.cos_theta);
            HitRecord::new(p, hr.t, &rotated_ray, &normal, hr.material, hr.u, hr.v)
        })
    }

    fn try_bounding_box(&self, _time0: f64, _time1: f64) -> Option<Aabb> {
        self.bbox.clone()
    }
}

/// Rotate a vector about `axis`; negating `sin_theta` gives the inverse.
fn rotate(v: &Vec3, axis: Axis, sin_theta: f64, cos_theta: f64) -> Vec3 {
    let (s, c) = (sin_theta, cos_theta);
    match axis {
        Axis::X => Vec3::new(v[0], c * v[1] - s * v[2], s * v[1] + c * v[2]),
        Axis::Y => Vec3::new(c * v[0] + s * v[2], v[1], -s * v[0] + c * v[2]),
        Axis::Z => Vec3::new(c * v[0] - s * v[1], s * v[0] + c * v[1], v[2]),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::materials::Lambertian;
    use crate::objects::{Cuboid, Sphere};
    use crate::Color;

    fn gray() -> crate::Material {
        Arc::new(Lambertian::new(Color::new(0.5, 0.5, 0.5)))
    }

    fn unit_sphere_at(center: Point) -> HittableObj {
        Box::new(Sphere::new(center, 1.0, gray()))
    }

    #[test]
    fn translate_shifts_hits_and_boxes() {
        let translated = Translate::new(unit_sphere_at(Point::zeros()), Vec3::new(5.0, 0.0, 0.0));

        let ray = Ray::new(Point::new(0.0, 0.0, 0.0), Vec3::new(1.0, 0.0, 0.0), 0.0);
        let hr = translated.try_hit(&ray, 0.001, f64::INFINITY).unwrap();
        assert!((hr.p - Point::new(4.0, 0.0, 0.0)).norm() < 1e-12);
        assert!((hr.t - 4.0).abs() < 1e-12);

        let bbox = translated.try_bounding_box(0.0, 1.0).unwrap();
        assert!((bbox.min - Point::new(4.0, -1.0, -1.0)).norm() < 1e-12);
        assert!((bbox.max - Point::new(6.0, 1.0, 1.0)).norm() < 1e-12);
    }

    #[test]
    fn quarter_turn_about_y_moves_x_to_minus_z() {
        let rotated = Rotate::new(unit_sphere_at(Point::new(2.0, 0.0, 0.0)), Axis::Y, 90.0);

        let ray = Ray::new(Point::zeros(), Vec3::new(0.0, 0.0, -1.0), 0.0);
        let hr = rotated.try_hit(&ray, 0.001, f64::INFINITY).unwrap();
        assert!((hr.t - 1.0).abs() < 1e-9);
        assert!((hr.p - Point::new(0.0, 0.0, -1.0)).norm() < 1e-9);

        // a ray along +x no longer finds the sphere
        let old = Ray::new(Point::zeros(), Vec3::new(1.0, 0.0, 0.0), 0.0);
        assert!(rotated.try_hit(&old, 0.001, f64::INFINITY).is_none());
    }

    #[test]
    fn quarter_turn_about_x_moves_y_to_z() {
        let rotated = Rotate::new(unit_sphere_at(Point::new(0.0, 2.0, 0.0)), Axis::X, 90.0);
        let ray = Ray::new(Point::zeros(), Vec3::new(0.0, 0.0, 1.0), 0.0);
        let hr = rotated.try_hit(&ray, 0.001, f64::INFINITY).unwrap();
        assert!((hr.p - Point::new(0.0, 0.0, 1.0)).norm() < 1e-9);
    }

    #[test]
    fn quarter_turn_about_z_moves_x_to_y() {
        let rotated = Rotate::new(unit_sphere_at(Point::new(2.0, 0.0, 0.0)), Axis::Z, 90.0);
        let ray = Ray::new(Point::zeros(), Vec3::new(0.0, 1.0, 0.0), 0.0);
        let hr = rotated.try_hit(&ray, 0.001, f64::INFINITY).unwrap();
        assert!((hr.p - Point::new(0.0, 1.0, 0.0)).norm() < 1e-9);
    }

    #[test]
    fn rotated_box_rebounds_conservatively() {
        // A unit cube rotated 45 degrees about y needs a sqrt(2) footprint
        let cuboid: HittableObj = Box::new(Cuboid::new(
            Point::new(-0.5, -0.5, -0.5),
            Point::new(0.5, 0.5, 0.5),
            gray(),
        ));
        let rotated = Rotate::new(cuboid, Axis::Y, 45.0);

        let bbox = rotated.try_bounding_box(0.0, 1.0).unwrap();
        let half_diag = 2.0_f64.sqrt() / 2.0;
        assert!((bbox.min[0] + half_diag).abs() < 1e-9);
        assert!((bbox.max[0] - half_diag).abs() < 1e-9);
        // y extent untouched
        assert!((bbox.min[1] + 0.5).abs() < 1e-9);
        assert!((bbox.max[1] - 0.5).abs() < 1e-9);
    }
}

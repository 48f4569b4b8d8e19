//! Objects
use std::cmp::Ordering;
use std::sync::Arc;

use crate::{bvh::Aabb, Material, Point, Ray, Vec3};

pub type HittableObj = Box<dyn Hittable + Send + Sync>;

/// Anything a ray can intersect
///
/// `try_bounding_box` is `None` only for geometry without a finite extent;
/// every shape in this crate reports a box, but containers must tolerate the
/// contract for composability.
pub trait Hittable {
    fn try_hit(&self, ray: &Ray, t_min: f64, t_max: f64) -> Option<HitRecord>;

    fn try_bounding_box(&self, time0: f64, time1: f64) -> Option<Aabb>;
}

/// Represents a hit
pub struct HitRecord {
    /// Point of intersection
    pub p: Point,
    /// Surface normal, always oriented against the incoming ray
    pub normal: Vec3,
    /// Ray parameter of the intersection
    pub t: f64,
    /// Whether the geometric normal already faced the ray
    pub front_face: bool,
    /// Material at the hit point
    pub material: Material,
    /// U,V surface coordinates
    pub u: f64,
    /// U,V surface coordinates
    pub v: f64,
}
impl HitRecord {
    pub fn new(
        p: Point,
        t: f64,
        ray: &Ray,
        outward_normal: &Vec3,
        material: Material,
        u: f64,
        v: f64,
    ) -> Self {
        let front_face = ray.dir.dot(outward_normal) < 0.0;
        let normal = if front_face {
            *outward_normal
        } else {
            -outward_normal
        };
        Self {
            p,
            normal,
            t,
            front_face,
            material,
            u,
            v,
        }
    }
}

/// Unordered aggregate of hittables
#[derive(Default)]
pub struct HittableList(pub Vec<HittableObj>);
impl HittableList {
    pub fn add(&mut self, boxed_obj: HittableObj) {
        self.0.push(boxed_obj)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
impl Hittable for HittableList {
    fn try_hit(&self, ray: &Ray, t_min: f64, t_max: f64) -> Option<HitRecord> {
        let mut closest_so_far = t_max;
        let mut hr_final = None;

        for obj in &self.0 {
            if let Some(hr) = obj.try_hit(ray, t_min, closest_so_far) {
                closest_so_far = hr.t;
                hr_final = Some(hr)
            }
        }
        hr_final
    }

    fn try_bounding_box(&self, time0: f64, time1: f64) -> Option<Aabb> {
        if self.0.is_empty() {
            return None;
        }
        let mut output_box: Option<Aabb> = None;

        for obj in &self.0 {
            let tmp_box = obj.try_bounding_box(time0, time1)?;
            output_box = match output_box {
                Some(output_box) => Some(output_box.surrounding_box(&tmp_box)),
                None => Some(tmp_box),
            };
        }
        output_box
    }
}

pub struct Sphere {
    pub center: Point,
    pub radius: f64,
    pub material: Material,
}
impl Sphere {
    /// A negative radius flips the outward normal inward, which is how
    /// hollow glass shells are modeled.
    pub fn new(center: Point, radius: f64, material: Material) -> Self {
        Self {
            center,
            radius,
            material,
        }
    }

    pub fn get_uv(p: &Point) -> (f64, f64) {
        // p: a given point on the sphere of radius one, centered at the origin.
        // u: returned value [0,1] of angle around the Y axis from X=-1.
        // v: returned value [0,1] of angle from Y=-1 to Y=+1.
        //     <1 0 0> yields <0.50 0.50>       <-1  0  0> yields <0.00 0.50>
        //     <0 1 0> yields <0.50 1.00>       < 0 -1  0> yields <0.50 0.00>
        //     <0 0 1> yields <0.25 0.50>       < 0  0 -1> yields <0.75 0.50>

        let theta = (-p[1]).acos();
        let phi = (-p[2]).atan2(p[0]) + std::f64::consts::PI;

        let u = phi / (2.0 * std::f64::consts::PI);
        let v = theta / std::f64::consts::PI;
        (u, v)
    }
}
impl Hittable for Sphere {
    fn try_hit(&self, ray: &Ray, t_min: f64, t_max: f64) -> Option<HitRecord> {
        let oc = ray.orig - self.center;
        let a = ray.dir.norm_squared();
        let half_b = oc.dot(&ray.dir);
        let c = oc.norm_squared() - self.radius.powi(2);
        let discriminant = half_b.powi(2) - a * c;
        if discriminant < 0.0 {
            return None;
        }

        // Find the nearest root that lies in the acceptable range
        let sqrtd = discriminant.sqrt();
        let mut root = (-half_b - sqrtd) / a;
        if root < t_min || t_max < root {
            root = (-half_b + sqrtd) / a;
            if root < t_min || t_max < root {
                return None;
            }
        }
        let p = ray.at(root);
        let outward_normal = (p - self.center) / self.radius;
        let (u, v) = Self::get_uv(&outward_normal);
        Some(HitRecord::new(
            p,
            root,
            ray,
            &outward_normal,
            Arc::clone(&self.material),
            u,
            v,
        ))
    }

    fn try_bounding_box(&self, _time0: f64, _time1: f64) -> Option<Aabb> {
        let r = self.radius.abs();
        let v = Vec3::new(r, r, r);
        Some(Aabb::new(self.center - v, self.center + v))
    }
}

/// Sphere whose center interpolates between two keyframes over the
/// shutter window
pub struct MovingSphere {
    initial_center: Point,
    final_center: Point,
    initial_time: f64,
    final_time: f64,
    radius: f64,
    material: Material,
}
impl MovingSphere {
    pub fn new(
        initial_center: Point,
        final_center: Point,
        initial_time: f64,
        final_time: f64,
        radius: f64,
        material: Material,
    ) -> Self {
        Self {
            initial_center,
            final_center,
            initial_time,
            final_time,
            radius,
            material,
        }
    }

    pub fn center(&self, time: f64) -> Point {
        self.initial_center
            + ((time - self.initial_time) / (self.final_time - self.initial_time))
                * (self.final_center - self.initial_center)
    }
}
impl Hittable for MovingSphere {
    fn try_hit(&self, ray: &Ray, t_min: f64, t_max: f64) -> Option<HitRecord> {
        let center = self.center(ray.time);
        let oc = ray.orig - center;
        let a = ray.dir.norm_squared();
        let half_b = oc.dot(&ray.dir);
        let c = oc.norm_squared() - self.radius.powi(2);
        let discriminant = half_b.powi(2) - a * c;
        if discriminant < 0.0 {
            return None;
        }

        let sqrtd = discriminant.sqrt();
        let mut root = (-half_b - sqrtd) / a;
        if root < t_min || t_max < root {
            root = (-half_b + sqrtd) / a;
            if root < t_min || t_max < root {
                return None;
            }
        }
        let p = ray.at(root);
        let outward_normal = (p - center) / self.radius;
        let (u, v) = Sphere::get_uv(&outward_normal);
        Some(HitRecord::new(
            p,
            root,
            ray,
            &outward_normal,
            Arc::clone(&self.material),
            u,
            v,
        ))
    }

    fn try_bounding_box(&self, time0: f64, time1: f64) -> Option<Aabb> {
        let r = self.radius.abs();
        let v = Vec3::new(r, r, r);

        let box0 = Aabb::new(self.center(time0) - v, self.center(time0) + v);
        let box1 = Aabb::new(self.center(time1) - v, self.center(time1) + v);

        Some(box0.surrounding_box(&box1))
    }
}

// The box along the degenerate axis gets padded by this much so slab tests
// and hierarchy merges never see zero thickness.
const RECT_PAD: f64 = 1e-4;

/// XY Rectangle at z = k
pub struct XyRectangle {
    material: Material,
    x0: f64,
    x1: f64,
    y0: f64,
    y1: f64,
    k: f64,
}
impl XyRectangle {
    pub fn new(x0: f64, x1: f64, y0: f64, y1: f64, k: f64, material: Material) -> Self {
        Self {
            material,
            x0,
            x1,
            y0,
            y1,
            k,
        }
    }
}
impl Hittable for XyRectangle {
    fn try_hit(&self, ray: &Ray, t_min: f64, t_max: f64) -> Option<HitRecord> {
        let t = (self.k - ray.orig[2]) / ray.dir[2];
        if t < t_min || t > t_max {
            return None;
        }
        let x = ray.orig[0] + t * ray.dir[0];
        let y = ray.orig[1] + t * ray.dir[1];
        if x < self.x0 || x > self.x1 || y < self.y0 || y > self.y1 {
            return None;
        }
        let u = (x - self.x0) / (self.x1 - self.x0);
        let v = (y - self.y0) / (self.y1 - self.y0);
        let outward_normal = Vec3::new(0.0, 0.0, 1.0);
        Some(HitRecord::new(
            ray.at(t),
            t,
            ray,
            &outward_normal,
            Arc::clone(&self.material),
            u,
            v,
        ))
    }

    fn try_bounding_box(&self, _time0: f64, _time1: f64) -> Option<Aabb> {
        Some(Aabb::new(
            Point::new(self.x0, self.y0, self.k - RECT_PAD),
            Point::new(self.x1, self.y1, self.k + RECT_PAD),
        ))
    }
}

/// XZ Rectangle at y = k
pub struct XzRectangle {
    material: Material,
    x0: f64,
    x1: f64,
    z0: f64,
    z1: f64,
    k: f64,
}
impl XzRectangle {
    pub fn new(x0: f64, x1: f64, z0: f64, z1: f64, k: f64, material: Material) -> Self {
        Self {
            material,
            x0,
            x1,
            z0,
            z1,
            k,
        }
    }
}
impl Hittable for XzRectangle {
    fn try_hit(&self, ray: &Ray, t_min: f64, t_max: f64) -> Option<HitRecord> {
        let t = (self.k - ray.orig[1]) / ray.dir[1];
        if t < t_min || t > t_max {
            return None;
        }
        let x = ray.orig[0] + t * ray.dir[0];
        let z = ray.orig[2] + t * ray.dir[2];
        if x < self.x0 || x > self.x1 || z < self.z0 || z > self.z1 {
            return None;
        }
        let u = (x - self.x0) / (self.x1 - self.x0);
        let v = (z - self.z0) / (self.z1 - self.z0);
        let outward_normal = Vec3::new(0.0, 1.0, 0.0);
        Some(HitRecord::new(
            ray.at(t),
            t,
            ray,
            &outward_normal,
            Arc::clone(&self.material),
            u,
            v,
        ))
    }

    fn try_bounding_box(&self, _time0: f64, _time1: f64) -> Option<Aabb> {
        Some(Aabb::new(
            Point::new(self.x0, self.k - RECT_PAD, self.z0),
            Point::new(self.x1, self.k + RECT_PAD, self.z1),
        ))
    }
}

/// YZ Rectangle at x = k
pub struct YzRectangle {
    material: Material,
    y0: f64,
    y1: f64,
    z0: f64,
    z1: f64,
    k: f64,
}
impl YzRectangle {
    pub fn new(y0: f64, y1: f64, z0: f64, z1: f64, k: f64, material: Material) -> Self {
        Self {
            material,
            y0,
            y1,
            z0,
            z1,
            k,
        }
    }
}
impl Hittable for YzRectangle {
    fn try_hit(&self, ray: &Ray, t_min: f64, t_max: f64) -> Option<HitRecord> {
        let t = (self.k - ray.orig[0]) / ray.dir[0];
        if t < t_min || t > t_max {
            return None;
        }
        let y = ray.orig[1] + t * ray.dir[1];
        let z = ray.orig[2] + t * ray.dir[2];
        if y < self.y0 || y > self.y1 || z < self.z0 || z > self.z1 {
            return None;
        }
        let u = (y - self.y0) / (self.y1 - self.y0);
        let v = (z - self.z0) / (self.z1 - self.z0);
        let outward_normal = Vec3::new(1.0, 0.0, 0.0);
        Some(HitRecord::new(
            ray.at(t),
            t,
            ray,
            &outward_normal,
            Arc::clone(&self.material),
            u,
            v,
        ))
    }

    fn try_bounding_box(&self, _time0: f64, _time1: f64) -> Option<Aabb> {
        Some(Aabb::new(
            Point::new(self.k - RECT_PAD, self.y0, self.z0),
            Point::new(self.k + RECT_PAD, self.y1, self.z1),
        ))
    }
}

/// Closed axis-aligned cuboid built from six rectangles
pub struct Cuboid {
    min: Point,
    max: Point,
    sides: HittableList,
}
impl Cuboid {
    pub fn new(min: Point, max: Point, material: Material) -> Self {
        let mut sides = HittableList::default();

        sides.add(Box::new(XyRectangle::new(
            min[0],
            max[0],
            min[1],
            max[1],
            max[2],
            Arc::clone(&material),
        )));
        sides.add(Box::new(XyRectangle::new(
            min[0],
            max[0],
            min[1],
            max[1],
            min[2],
            Arc::clone(&material),
        )));

        sides.add(Box::new(XzRectangle::new(
            min[0],
            max[0],
            min[2],
            max[2],
            max[1],
            Arc::clone(&material),
        )));
        sides.add(Box::new(XzRectangle::new(
            min[0],
            max[0],
            min[2],
            max[2],
            min[1],
            Arc::clone(&material),
        )));

        sides.add(Box::new(YzRectangle::new(
            min[1],
            max[1],
            min[2],
            max[2],
            max[0],
            Arc::clone(&material),
        )));
        sides.add(Box::new(YzRectangle::new(
            min[1],
            max[1],
            min[2],
            max[2],
            min[0],
            material,
        )));

        Self { min, max, sides }
    }
}
impl Hittable for Cuboid {
    fn try_hit(&self, ray: &Ray, t_min: f64, t_max: f64) -> Option<HitRecord> {
        self.sides.try_hit(ray, t_min, t_max)
    }

    fn try_bounding_box(&self, _time0: f64, _time1: f64) -> Option<Aabb> {
        Some(Aabb::new(self.min, self.max))
    }
}

/// Compare two hittables by bounding-box minimum along one axis
///
/// Objects are validated to have boxes before BVH construction sorts with
/// this, so the missing-box fallback never decides an ordering in practice.
pub fn box_compare(a: &HittableObj, b: &HittableObj, axis: usize) -> Ordering {
    let min_coord = |obj: &HittableObj| {
        obj.try_bounding_box(0.0, 0.0)
            .map_or(f64::NEG_INFINITY, |bbox| bbox.min[axis])
    };
    min_coord(a)
        .partial_cmp(&min_coord(b))
        .unwrap_or(Ordering::Equal)
}

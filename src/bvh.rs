//! Axis-Aligned Bounding Boxes and Bounding Volume Hierarchies
//!
//! For optimizing intersection queries: the flat-list scan is O(n) per ray,
//! the hierarchy is O(log n) expected.

use thiserror::Error;

use crate::objects::{box_compare, HitRecord, Hittable, HittableList, HittableObj};
use crate::{random, Point, Ray};

/// Axis-Aligned Bounding Box
///
/// Callers keep `min <= max` componentwise; inverted/infinite boxes are valid
/// sentinel states during hierarchy construction.
#[derive(Debug, Clone)]
pub struct Aabb {
    pub min: Point,
    pub max: Point,
}
impl Aabb {
    pub fn new(min: Point, max: Point) -> Self {
        Self { min, max }
    }

    /// Whether the box is hit by a ray within the parameter range
    ///
    /// Three slab tests, tightening the running interval and failing fast.
    /// Axis-parallel rays divide by zero into IEEE infinities, which still
    /// order correctly in the min/max logic.
    pub fn hit(&self, r: &Ray, mut t_min: f64, mut t_max: f64) -> bool {
        for a in 0..3 {
            let inv_d = 1.0 / r.dir[a];
            let mut t0 = (self.min[a] - r.orig[a]) * inv_d;
            let mut t1 = (self.max[a] - r.orig[a]) * inv_d;
            if inv_d < 0.0 {
                std::mem::swap(&mut t0, &mut t1);
            }
            t_min = if t0 > t_min { t0 } else { t_min };
            t_max = if t1 < t_max { t1 } else { t_max };
            if t_max <= t_min {
                return false;
            }
        }
        true
    }

    /// Compute the surrounding AABB between this and another
    pub fn surrounding_box(&self, other: &Aabb) -> Aabb {
        let small = Point::new(
            self.min[0].min(other.min[0]),
            self.min[1].min(other.min[1]),
            self.min[2].min(other.min[2]),
        );
        let big = Point::new(
            self.max[0].max(other.max[0]),
            self.max[1].max(other.max[1]),
            self.max[2].max(other.max[2]),
        );
        Aabb::new(small, big)
    }

    /// Whether `other` lies entirely inside this box
    pub fn contains(&self, other: &Aabb) -> bool {
        (0..3).all(|a| self.min[a] <= other.min[a] && self.max[a] >= other.max[a])
    }
}

/// Construction-time failures
///
/// A hittable without a finite extent poisons every slab test above it, so
/// construction refuses to proceed rather than carry an undefined box.
#[derive(Debug, Error)]
pub enum BvhError {
    #[error("cannot build a BVH over an empty scene")]
    EmptyScene,
    #[error("object without a bounding box in BVH construction")]
    MissingBoundingBox,
}

type NodeId = u32;

enum BvhNode {
    Leaf {
        obj: HittableObj,
        bbox: Aabb,
    },
    Interior {
        left: NodeId,
        right: NodeId,
        bbox: Aabb,
    },
}
impl BvhNode {
    fn bbox(&self) -> &Aabb {
        match self {
            Self::Leaf { bbox, .. } | Self::Interior { bbox, .. } => bbox,
        }
    }
}

/// Bounding Volume Hierarchy
///
/// Binary tree over the scene's hittables. Nodes live in an arena and refer
/// to each other by index; recursion happens only while building, bounded by
/// log2 of the object count, so the stack stays shallow.
pub struct Bvh {
    nodes: Vec<BvhNode>,
    root: NodeId,
}
impl Bvh {
    pub fn new(list: HittableList, time0: f64, time1: f64) -> Result<Self, BvhError> {
        if list.is_empty() {
            return Err(BvhError::EmptyScene);
        }
        // Validate extents up front so the sort comparator below cannot meet
        // a boxless object.
        for obj in &list.0 {
            if obj.try_bounding_box(time0, time1).is_none() {
                return Err(BvhError::MissingBoundingBox);
            }
        }

        let mut nodes = Vec::with_capacity(2 * list.len());
        let root = Self::split(&mut nodes, list.0, time0, time1)?;
        Ok(Self { nodes, root })
    }

    /// Split a subtree
    ///
    /// Randomly choose an axis, sort by box minimum on it, put half in each
    /// child. A single object becomes a leaf.
    fn split(
        nodes: &mut Vec<BvhNode>,
        mut objects: Vec<HittableObj>,
        time0: f64,
        time1: f64,
    ) -> Result<NodeId, BvhError> {
        let axis = random::random_index(3);

        match objects.len() {
            0 => Err(BvhError::EmptyScene),
            1 => {
                let obj = objects.remove(0);
                Self::push_leaf(nodes, obj, time0, time1)
            }
            2 => {
                let second = objects.remove(1);
                let first = objects.remove(0);
                let (first, second) = if box_compare(&first, &second, axis).is_lt() {
                    (first, second)
                } else {
                    (second, first)
                };
                let left = Self::push_leaf(nodes, first, time0, time1)?;
                let right = Self::push_leaf(nodes, second, time0, time1)?;
                Self::push_interior(nodes, left, right)
            }
            _ => {
                objects.sort_by(|a, b| box_compare(a, b, axis));
                let mid = objects.len() / 2;
                let right_objects = objects.split_off(mid);

                let left = Self::split(nodes, objects, time0, time1)?;
                let right = Self::split(nodes, right_objects, time0, time1)?;
                Self::push_interior(nodes, left, right)
            }
        }
    }

    fn push_leaf(
        nodes: &mut Vec<BvhNode>,
        obj: HittableObj,
        time0: f64,
        time1: f64,
    ) -> Result<NodeId, BvhError> {
        let bbox = obj
            .try_bounding_box(time0, time1)
            .ok_or(BvhError::MissingBoundingBox)?;
        nodes.push(BvhNode::Leaf { obj, bbox });
        Ok((nodes.len() - 1) as NodeId)
    }

    fn push_interior(
        nodes: &mut Vec<BvhNode>,
        left: NodeId,
        right: NodeId,
    ) -> Result<NodeId, BvhError> {
        let bbox = nodes[left as usize]
            .bbox()
            .surrounding_box(nodes[right as usize].bbox());
        nodes.push(BvhNode::Interior { left, right, bbox });
        Ok((nodes.len() - 1) as NodeId)
    }

    fn hit_node(&self, id: NodeId, ray: &Ray, t_min: f64, t_max: f64) -> Option<HitRecord> {
        match &self.nodes[id as usize] {
            BvhNode::Leaf { obj, bbox } => {
                if !bbox.hit(ray, t_min, t_max) {
                    return None;
                }
                obj.try_hit(ray, t_min, t_max)
            }
            BvhNode::Interior { left, right, bbox } => {
                if !bbox.hit(ray, t_min, t_max) {
                    return None;
                }
                let hit_left = self.hit_node(*left, ray, t_min, t_max);
                // The right subtree only needs to beat the left's hit
                let upper = hit_left.as_ref().map_or(t_max, |hr| hr.t);
                self.hit_node(*right, ray, t_min, upper).or(hit_left)
            }
        }
    }
}
impl Hittable for Bvh {
    fn try_hit(&self, ray: &Ray, t_min: f64, t_max: f64) -> Option<HitRecord> {
        self.hit_node(self.root, ray, t_min, t_max)
    }

    fn try_bounding_box(&self, _time0: f64, _time1: f64) -> Option<Aabb> {
        Some(self.nodes[self.root as usize].bbox().clone())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::materials::DiffuseLight;
    use crate::objects::Sphere;
    use crate::{Color, Vec3};

    #[test]
    fn surrounding_box_is_the_tight_union() {
        let a = Aabb::new(Point::new(-1.0, 0.0, 2.0), Point::new(1.0, 1.0, 3.0));
        let b = Aabb::new(Point::new(0.0, -2.0, 2.5), Point::new(0.5, 0.5, 4.0));
        let u = a.surrounding_box(&b);

        assert!(u.contains(&a) && u.contains(&b));
        assert_eq!(u.min, Point::new(-1.0, -2.0, 2.0));
        assert_eq!(u.max, Point::new(1.0, 1.0, 4.0));
    }

    #[test]
    fn ray_from_inside_a_box_always_hits() {
        let bbox = Aabb::new(Point::new(-1.0, -1.0, -1.0), Point::new(1.0, 1.0, 1.0));
        for dir in [
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(0.0, -1.0, 0.0),
            Vec3::new(0.3, 0.4, -0.9),
            Vec3::new(-0.2, 0.9, 0.1),
        ] {
            let ray = Ray::new(Point::new(0.1, -0.2, 0.3), dir, 0.0);
            assert!(bbox.hit(&ray, 0.001, f64::INFINITY));
        }
    }

    #[test]
    fn axis_parallel_ray_handles_zero_direction_components() {
        let bbox = Aabb::new(Point::new(-1.0, -1.0, -5.0), Point::new(1.0, 1.0, -3.0));
        let hit = Ray::new(Point::zeros(), Vec3::new(0.0, 0.0, -1.0), 0.0);
        let miss = Ray::new(Point::new(2.0, 0.0, 0.0), Vec3::new(0.0, 0.0, -1.0), 0.0);
        assert!(bbox.hit(&hit, 0.001, f64::INFINITY));
        assert!(!bbox.hit(&miss, 0.001, f64::INFINITY));
    }

    fn sphere_field() -> HittableList {
        let mut list = HittableList::default();
        for i in 0..16 {
            let x = (i % 4) as f64 * 2.0 - 3.0;
            let z = -(i / 4) as f64 * 2.0 - 2.0;
            // unique emission per sphere identifies the winning material
            let tag = Color::new(i as f64, 0.0, 0.0);
            list.add(Box::new(Sphere::new(
                Point::new(x, 0.0, z),
                0.6,
                Arc::new(DiffuseLight::new(tag)),
            )));
        }
        list
    }

    #[test]
    fn bvh_agrees_with_the_flat_list() {
        crate::random::seed(11);
        let flat = sphere_field();
        let bvh = Bvh::new(sphere_field(), 0.0, 1.0).unwrap();

        let origins = [
            Point::new(0.0, 0.0, 5.0),
            Point::new(-3.0, 0.4, 5.0),
            Point::new(2.0, -0.3, 5.0),
            Point::new(0.5, 0.0, -4.0),
        ];
        let dirs = [
            Vec3::new(0.0, 0.0, -1.0),
            Vec3::new(-0.2, 0.0, -1.0),
            Vec3::new(0.3, 0.05, -1.0),
            Vec3::new(1.0, 0.0, 0.2),
            Vec3::new(0.0, 1.0, 0.0),
        ];

        for orig in origins {
            for dir in dirs {
                let ray = Ray::new(orig, dir, 0.0);
                let from_flat = flat.try_hit(&ray, 0.001, f64::INFINITY);
                let from_bvh = bvh.try_hit(&ray, 0.001, f64::INFINITY);

                match (from_flat, from_bvh) {
                    (None, None) => {}
                    (Some(a), Some(b)) => {
                        assert!((a.t - b.t).abs() < 1e-9);
                        let ea = a.material.emitted(a.u, a.v, &a.p);
                        let eb = b.material.emitted(b.u, b.v, &b.p);
                        assert_eq!(ea, eb);
                    }
                    (a, b) => panic!(
                        "flat list and BVH disagree: flat={:?} bvh={:?}",
                        a.map(|h| h.t),
                        b.map(|h| h.t)
                    ),
                }
            }
        }
    }

    #[test]
    fn single_object_scene_builds_a_leaf_root() {
        let mut list = HittableList::default();
        list.add(Box::new(Sphere::new(
            Point::new(0.0, 0.0, -3.0),
            1.0,
            Arc::new(DiffuseLight::new(Color::new(1.0, 1.0, 1.0))),
        )));
        let bvh = Bvh::new(list, 0.0, 1.0).unwrap();

        let ray = Ray::new(Point::zeros(), Vec3::new(0.0, 0.0, -1.0), 0.0);
        let hr = bvh.try_hit(&ray, 0.001, f64::INFINITY).unwrap();
        assert!((hr.t - 2.0).abs() < 1e-12);
    }

    #[test]
    fn empty_scene_is_a_construction_error() {
        assert!(matches!(
            Bvh::new(HittableList::default(), 0.0, 1.0),
            Err(BvhError::EmptyScene)
        ));
    }
}

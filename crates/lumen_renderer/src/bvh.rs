//! Bounding Volume Hierarchy (BVH) acceleration structure.
//!
//! A binary tree built once over the scene's primitives. Each level sorts
//! its primitives along a randomly chosen axis and halves the list by
//! index, so the tree is balanced by count rather than by surface area.

use crate::error::BuildError;
use crate::sampling::gen_f32;
use crate::{HitRecord, Hittable};
use lumen_math::{Aabb, Interval, Ray};
use rand::RngCore;

/// BVH node - either a branch with two children or a leaf with one primitive.
pub enum BvhNode {
    /// Internal node owning two subtrees.
    Branch {
        left: Box<BvhNode>,
        right: Box<BvhNode>,
        bbox: Aabb,
    },
    /// A single primitive.
    Leaf {
        object: Box<dyn Hittable>,
        bbox: Aabb,
    },
}

/// A primitive paired with its box, computed once before sorting.
struct Entry {
    object: Box<dyn Hittable>,
    bbox: Aabb,
}

impl BvhNode {
    /// Build a hierarchy over `objects` for the shutter interval `[time0, time1]`.
    ///
    /// Fails if the list is empty or any primitive is unbounded.
    pub fn new(
        objects: Vec<Box<dyn Hittable>>,
        time0: f32,
        time1: f32,
        rng: &mut dyn RngCore,
    ) -> Result<Self, BuildError> {
        if objects.is_empty() {
            return Err(BuildError::EmptyHierarchy);
        }

        let entries = objects
            .into_iter()
            .enumerate()
            .map(|(index, object)| {
                object
                    .bounding_box(time0, time1)
                    .map(|bbox| Entry { object, bbox })
                    .ok_or(BuildError::MissingBoundingBox { index })
            })
            .collect::<Result<Vec<_>, BuildError>>()?;

        let count = entries.len();
        let node = Self::build(entries, rng);
        log::debug!(
            "Built BVH over {} primitives (depth {}, {} leaves)",
            count,
            node.depth(),
            node.leaf_count()
        );

        Ok(node)
    }

    /// Recursive construction over a non-empty list.
    fn build(mut entries: Vec<Entry>, rng: &mut dyn RngCore) -> Self {
        let axis = ((gen_f32(rng) * 3.0) as usize).min(2);
        entries.sort_by(|a, b| {
            a.bbox
                .axis_interval(axis)
                .min
                .total_cmp(&b.bbox.axis_interval(axis).min)
        });

        if entries.len() == 1 {
            let Entry { object, bbox } = entries.remove(0);
            return BvhNode::Leaf { object, bbox };
        }

        let right_entries = entries.split_off(entries.len() / 2);
        let left = Self::build(entries, rng);
        let right = Self::build(right_entries, rng);
        let bbox = Aabb::surrounding(&left.bbox(), &right.bbox());

        BvhNode::Branch {
            left: Box::new(left),
            right: Box::new(right),
            bbox,
        }
    }

    /// Cached bounding box of this node.
    pub fn bbox(&self) -> Aabb {
        match self {
            BvhNode::Branch { bbox, .. } | BvhNode::Leaf { bbox, .. } => *bbox,
        }
    }

    /// Number of levels from this node down to its deepest leaf.
    pub fn depth(&self) -> usize {
        match self {
            BvhNode::Leaf { .. } => 1,
            BvhNode::Branch { left, right, .. } => 1 + left.depth().max(right.depth()),
        }
    }

    /// Number of primitives stored below this node.
    pub fn leaf_count(&self) -> usize {
        match self {
            BvhNode::Leaf { .. } => 1,
            BvhNode::Branch { left, right, .. } => left.leaf_count() + right.leaf_count(),
        }
    }
}

impl Hittable for BvhNode {
    fn hit<'a>(
        &'a self,
        ray: &Ray,
        ray_t: Interval,
        rng: &mut dyn RngCore,
    ) -> Option<HitRecord<'a>> {
        if !self.bbox().hit(ray, ray_t) {
            return None;
        }

        match self {
            BvhNode::Leaf { object, .. } => object.hit(ray, ray_t, rng),
            BvhNode::Branch { left, right, .. } => {
                // Both children see the full window; keep the nearer hit
                match (left.hit(ray, ray_t, rng), right.hit(ray, ray_t, rng)) {
                    (Some(l), Some(r)) => Some(if l.t <= r.t { l } else { r }),
                    (l, r) => l.or(r),
                }
            }
        }
    }

    fn bounding_box(&self, _time0: f32, _time1: f32) -> Option<Aabb> {
        Some(self.bbox())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{AaRect, HittableList, Lambertian, Material, MovingSphere, Sphere};
    use lumen_math::Vec3;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::sync::Arc;

    fn gray() -> Arc<dyn Material> {
        Arc::new(Lambertian::from_color(Vec3::splat(0.5)))
    }

    fn random_spheres(n: usize, rng: &mut StdRng) -> Vec<(Vec3, f32)> {
        (0..n)
            .map(|_| {
                let center = Vec3::new(
                    gen_f32(rng) * 20.0 - 10.0,
                    gen_f32(rng) * 20.0 - 10.0,
                    gen_f32(rng) * 20.0 - 10.0,
                );
                (center, 0.2 + gen_f32(rng) * 0.8)
            })
            .collect()
    }

    fn boxed(spheres: &[(Vec3, f32)]) -> Vec<Box<dyn Hittable>> {
        spheres
            .iter()
            .map(|&(c, r)| Box::new(Sphere::new(c, r, gray())) as Box<dyn Hittable>)
            .collect()
    }

    #[test]
    fn test_bvh_empty_is_error() {
        let mut rng = StdRng::seed_from_u64(42);
        let result = BvhNode::new(Vec::new(), 0.0, 1.0, &mut rng);
        assert_eq!(result.err(), Some(BuildError::EmptyHierarchy));
    }

    #[test]
    fn test_bvh_unbounded_primitive_is_error() {
        let mut rng = StdRng::seed_from_u64(42);
        let objects: Vec<Box<dyn Hittable>> = vec![
            Box::new(Sphere::new(Vec3::ZERO, 1.0, gray())),
            Box::new(HittableList::new()),
        ];

        let result = BvhNode::new(objects, 0.0, 1.0, &mut rng);
        assert_eq!(result.err(), Some(BuildError::MissingBoundingBox { index: 1 }));
    }

    #[test]
    fn test_bvh_single_sphere() {
        let mut rng = StdRng::seed_from_u64(42);
        let objects = boxed(&[(Vec3::new(0.0, 0.0, -1.0), 0.5)]);
        let bvh = BvhNode::new(objects, 0.0, 1.0, &mut rng).unwrap();

        assert!(matches!(bvh, BvhNode::Leaf { .. }));

        let ray = Ray::new(Vec3::ZERO, Vec3::new(0.0, 0.0, -1.0), 0.0);
        let rec = bvh.hit(&ray, Interval::new(0.001, f32::INFINITY), &mut rng).unwrap();
        assert!((rec.t - 0.5).abs() < 1e-5);
    }

    #[test]
    fn test_bvh_box_is_union_of_children() {
        let mut rng = StdRng::seed_from_u64(42);
        let spheres = random_spheres(37, &mut rng);
        let bvh = BvhNode::new(boxed(&spheres), 0.0, 1.0, &mut rng).unwrap();

        fn check(node: &BvhNode) {
            if let BvhNode::Branch { left, right, bbox } = node {
                assert_eq!(*bbox, Aabb::surrounding(&left.bbox(), &right.bbox()));
                check(left);
                check(right);
            }
        }
        check(&bvh);
        assert_eq!(bvh.leaf_count(), 37);
        // Halving by count keeps the tree shallow
        assert!(bvh.depth() <= 7);
    }

    #[test]
    fn test_bvh_matches_linear_scan() {
        let mut rng = StdRng::seed_from_u64(42);
        let window = Interval::new(0.001, f32::INFINITY);

        for n in [1, 2, 3, 5, 16, 64, 150, 300] {
            let spheres = random_spheres(n, &mut rng);
            let list = HittableList::from(boxed(&spheres));
            let bvh = BvhNode::new(boxed(&spheres), 0.0, 1.0, &mut rng).unwrap();

            for _ in 0..200 {
                let origin = Vec3::new(
                    gen_f32(&mut rng) * 30.0 - 15.0,
                    gen_f32(&mut rng) * 30.0 - 15.0,
                    gen_f32(&mut rng) * 30.0 - 15.0,
                );
                let target = Vec3::new(
                    gen_f32(&mut rng) * 20.0 - 10.0,
                    gen_f32(&mut rng) * 20.0 - 10.0,
                    gen_f32(&mut rng) * 20.0 - 10.0,
                );
                let ray = Ray::new(origin, target - origin, 0.0);

                let expected = list.hit(&ray, window, &mut rng);
                let actual = bvh.hit(&ray, window, &mut rng);
                match (expected, actual) {
                    (None, None) => {}
                    (Some(e), Some(a)) => {
                        assert!((e.t - a.t).abs() < 1e-4, "n = {n}: {} vs {}", e.t, a.t);
                        assert!((e.p - a.p).length() < 1e-3);
                    }
                    (e, a) => panic!(
                        "n = {n}: linear scan hit = {}, bvh hit = {}",
                        e.is_some(),
                        a.is_some()
                    ),
                }
            }
        }
    }

    #[test]
    fn test_bvh_handles_flat_and_moving_primitives() {
        let mut rng = StdRng::seed_from_u64(7);
        let objects: Vec<Box<dyn Hittable>> = vec![
            Box::new(AaRect::xz(-5.0, 5.0, -5.0, 5.0, 0.0, gray())),
            Box::new(MovingSphere::new(
                Vec3::new(0.0, 1.0, 0.0),
                Vec3::new(0.0, 3.0, 0.0),
                0.0,
                1.0,
                0.5,
                gray(),
            )),
            Box::new(Sphere::new(Vec3::new(3.0, 1.0, 0.0), 1.0, gray())),
        ];
        let bvh = BvhNode::new(objects, 0.0, 1.0, &mut rng).unwrap();
        let window = Interval::new(0.001, f32::INFINITY);

        // Straight down onto the floor
        let down = Ray::new(Vec3::new(-3.0, 10.0, 0.0), -Vec3::Y, 0.0);
        assert!((bvh.hit(&down, window, &mut rng).unwrap().t - 10.0).abs() < 1e-5);

        // The moving sphere sits higher late in the shutter
        let late = Ray::new(Vec3::new(0.0, 10.0, 0.0), -Vec3::Y, 1.0);
        assert!((bvh.hit(&late, window, &mut rng).unwrap().t - 6.5).abs() < 1e-4);
    }
}

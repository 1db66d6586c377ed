//! Axis-aligned box built from six rectangles.

use std::sync::Arc;

use crate::{AaRect, FlipNormals, HitRecord, Hittable, HittableList, Material};
use lumen_math::{Aabb, Interval, Ray, Vec3};
use rand::RngCore;

/// Box spanning `[p0, p1]`, with every face normal pointing out of the box.
pub struct Cuboid {
    min: Vec3,
    max: Vec3,
    sides: HittableList,
}

impl Cuboid {
    /// Create a box from its minimum corner `p0` and maximum corner `p1`.
    pub fn new(p0: Vec3, p1: Vec3, material: Arc<dyn Material>) -> Self {
        let mut sides = HittableList::new();

        sides.add(Box::new(AaRect::xy(p0.x, p1.x, p0.y, p1.y, p1.z, material.clone())));
        sides.add(flipped(AaRect::xy(p0.x, p1.x, p0.y, p1.y, p0.z, material.clone())));
        sides.add(Box::new(AaRect::xz(p0.x, p1.x, p0.z, p1.z, p1.y, material.clone())));
        sides.add(flipped(AaRect::xz(p0.x, p1.x, p0.z, p1.z, p0.y, material.clone())));
        sides.add(Box::new(AaRect::yz(p0.y, p1.y, p0.z, p1.z, p1.x, material.clone())));
        sides.add(flipped(AaRect::yz(p0.y, p1.y, p0.z, p1.z, p0.x, material)));

        Self {
            min: p0,
            max: p1,
            sides,
        }
    }
}

fn flipped(rect: AaRect) -> Box<dyn Hittable> {
    Box::new(FlipNormals::new(Box::new(rect)))
}

impl Hittable for Cuboid {
    fn hit<'a>(
        &'a self,
        ray: &Ray,
        ray_t: Interval,
        rng: &mut dyn RngCore,
    ) -> Option<HitRecord<'a>> {
        self.sides.hit(ray, ray_t, rng)
    }

    fn bounding_box(&self, _time0: f32, _time1: f32) -> Option<Aabb> {
        Some(Aabb::from_points(self.min, self.max))
    }
}

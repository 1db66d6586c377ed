//! Instance wrappers that transform another hittable.
//!
//! Each wrapper owns its inner object and maps the incoming ray into the
//! object's space, then maps the hit record back into world space.

use crate::{HitRecord, Hittable};
use lumen_math::{Aabb, Interval, Ray, Vec3};
use rand::RngCore;

/// Reports the inner object's hits with the normal negated.
pub struct FlipNormals {
    inner: Box<dyn Hittable>,
}

impl FlipNormals {
    pub fn new(inner: Box<dyn Hittable>) -> Self {
        Self { inner }
    }
}

impl Hittable for FlipNormals {
    fn hit<'a>(
        &'a self,
        ray: &Ray,
        ray_t: Interval,
        rng: &mut dyn RngCore,
    ) -> Option<HitRecord<'a>> {
        self.inner.hit(ray, ray_t, rng).map(|rec| HitRecord {
            normal: -rec.normal,
            ..rec
        })
    }

    fn bounding_box(&self, time0: f32, time1: f32) -> Option<Aabb> {
        self.inner.bounding_box(time0, time1)
    }
}

/// Translation instance - moves an object by an offset.
pub struct Translate {
    inner: Box<dyn Hittable>,
    offset: Vec3,
}

impl Translate {
    pub fn new(inner: Box<dyn Hittable>, offset: Vec3) -> Self {
        Self { inner, offset }
    }
}

impl Hittable for Translate {
    fn hit<'a>(
        &'a self,
        ray: &Ray,
        ray_t: Interval,
        rng: &mut dyn RngCore,
    ) -> Option<HitRecord<'a>> {
        let moved = Ray::new(ray.origin() - self.offset, ray.direction(), ray.time());

        self.inner.hit(&moved, ray_t, rng).map(|rec| HitRecord {
            p: rec.p + self.offset,
            ..rec
        })
    }

    fn bounding_box(&self, time0: f32, time1: f32) -> Option<Aabb> {
        self.inner
            .bounding_box(time0, time1)
            .map(|bbox| bbox.translate(self.offset))
    }
}

/// Rotation about the Y axis.
pub struct RotateY {
    inner: Box<dyn Hittable>,
    sin_theta: f32,
    cos_theta: f32,
}

impl RotateY {
    /// Rotate `inner` by `angle` degrees about the Y axis.
    pub fn new(inner: Box<dyn Hittable>, angle: f32) -> Self {
        let radians = angle.to_radians();
        Self {
            inner,
            sin_theta: radians.sin(),
            cos_theta: radians.cos(),
        }
    }
}

/// Object space to world space.
fn rotate(p: Vec3, sin_theta: f32, cos_theta: f32) -> Vec3 {
    Vec3::new(
        cos_theta * p.x + sin_theta * p.z,
        p.y,
        -sin_theta * p.x + cos_theta * p.z,
    )
}

/// World space to object space.
fn unrotate(p: Vec3, sin_theta: f32, cos_theta: f32) -> Vec3 {
    Vec3::new(
        cos_theta * p.x - sin_theta * p.z,
        p.y,
        sin_theta * p.x + cos_theta * p.z,
    )
}

impl Hittable for RotateY {
    fn hit<'a>(
        &'a self,
        ray: &Ray,
        ray_t: Interval,
        rng: &mut dyn RngCore,
    ) -> Option<HitRecord<'a>> {
        let (sin, cos) = (self.sin_theta, self.cos_theta);
        let local = Ray::new(
            unrotate(ray.origin(), sin, cos),
            unrotate(ray.direction(), sin, cos),
            ray.time(),
        );

        self.inner.hit(&local, ray_t, rng).map(|rec| HitRecord {
            p: rotate(rec.p, sin, cos),
            normal: rotate(rec.normal, sin, cos),
            ..rec
        })
    }

    fn bounding_box(&self, time0: f32, time1: f32) -> Option<Aabb> {
        // Enclose the eight rotated corners of the inner box
        self.inner.bounding_box(time0, time1).map(|bbox| {
            let (min, max) = bbox.corners().into_iter().fold(
                (Vec3::splat(f32::INFINITY), Vec3::splat(f32::NEG_INFINITY)),
                |(min, max), corner| {
                    let rotated = rotate(corner, self.sin_theta, self.cos_theta);
                    (min.min(rotated), max.max(rotated))
                },
            );
            Aabb::from_points(min, max)
        })
    }
}

//! Axis-aligned rectangles.

use std::sync::Arc;

use crate::{HitRecord, Hittable, Material};
use lumen_math::{Aabb, Interval, Ray, Vec3};
use rand::RngCore;

/// Half-thickness of a rectangle's bounding box along its fixed axis.
const THICKNESS: f32 = 0.0001;

/// The plane a rectangle lies in, named by its two free axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Plane {
    /// Fixed Z, normal +Z
    Xy,
    /// Fixed Y, normal +Y
    Xz,
    /// Fixed X, normal +X
    Yz,
}

impl Plane {
    /// Indices of the (first free, second free, fixed) axes.
    fn axes(self) -> (usize, usize, usize) {
        match self {
            Plane::Xy => (0, 1, 2),
            Plane::Xz => (0, 2, 1),
            Plane::Yz => (1, 2, 0),
        }
    }

    fn normal(self) -> Vec3 {
        match self {
            Plane::Xy => Vec3::Z,
            Plane::Xz => Vec3::Y,
            Plane::Yz => Vec3::X,
        }
    }
}

/// A rectangle `[a0, a1] × [b0, b1]` in a plane at constant `k`.
///
/// The normal always points along the positive fixed axis; wrap in
/// [`FlipNormals`](crate::FlipNormals) to face the other way.
pub struct AaRect {
    plane: Plane,
    a0: f32,
    a1: f32,
    b0: f32,
    b1: f32,
    k: f32,
    material: Arc<dyn Material>,
}

impl AaRect {
    pub fn new(
        plane: Plane,
        (a0, a1): (f32, f32),
        (b0, b1): (f32, f32),
        k: f32,
        material: Arc<dyn Material>,
    ) -> Self {
        Self {
            plane,
            a0,
            a1,
            b0,
            b1,
            k,
            material,
        }
    }

    /// Rectangle `[x0, x1] × [y0, y1]` at `z = k`.
    pub fn xy(x0: f32, x1: f32, y0: f32, y1: f32, k: f32, material: Arc<dyn Material>) -> Self {
        Self::new(Plane::Xy, (x0, x1), (y0, y1), k, material)
    }

    /// Rectangle `[x0, x1] × [z0, z1]` at `y = k`.
    pub fn xz(x0: f32, x1: f32, z0: f32, z1: f32, k: f32, material: Arc<dyn Material>) -> Self {
        Self::new(Plane::Xz, (x0, x1), (z0, z1), k, material)
    }

    /// Rectangle `[y0, y1] × [z0, z1]` at `x = k`.
    pub fn yz(y0: f32, y1: f32, z0: f32, z1: f32, k: f32, material: Arc<dyn Material>) -> Self {
        Self::new(Plane::Yz, (y0, y1), (z0, z1), k, material)
    }

    pub fn plane(&self) -> Plane {
        self.plane
    }
}

impl Hittable for AaRect {
    fn hit<'a>(
        &'a self,
        ray: &Ray,
        ray_t: Interval,
        _rng: &mut dyn RngCore,
    ) -> Option<HitRecord<'a>> {
        let (ia, ib, ik) = self.plane.axes();
        let origin = ray.origin();
        let direction = ray.direction();

        let t = (self.k - origin[ik]) / direction[ik];
        // NaN (ray parallel to the plane) fails the comparison too
        if !ray_t.contains(t) {
            return None;
        }

        let (width, height) = (self.a1 - self.a0, self.b1 - self.b0);
        // Degenerate extents have no (u, v) parameterization
        if !(width > 0.0 && height > 0.0) {
            return None;
        }

        let a = origin[ia] + t * direction[ia];
        let b = origin[ib] + t * direction[ib];
        if a < self.a0 || a > self.a1 || b < self.b0 || b > self.b1 {
            return None;
        }

        Some(HitRecord {
            p: ray.at(t),
            normal: self.plane.normal(),
            material: &*self.material,
            u: (a - self.a0) / width,
            v: (b - self.b0) / height,
            t,
        })
    }

    fn bounding_box(&self, _time0: f32, _time1: f32) -> Option<Aabb> {
        let (ia, ib, ik) = self.plane.axes();
        let mut min = Vec3::ZERO;
        let mut max = Vec3::ZERO;
        min[ia] = self.a0;
        max[ia] = self.a1;
        min[ib] = self.b0;
        max[ib] = self.b1;
        min[ik] = self.k - THICKNESS;
        max[ik] = self.k + THICKNESS;
        Some(Aabb::from_points(min, max))
    }
}

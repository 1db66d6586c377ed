//! Constant-density participating medium (smoke, fog).

use std::sync::Arc;

use crate::sampling::gen_f32;
use crate::{HitRecord, Hittable, Material};
use lumen_math::{Aabb, Interval, Ray, Vec3};
use rand::RngCore;

/// Offset past the entry point when searching for the exit point.
const EXIT_EPSILON: f32 = 0.0001;

/// A volume of uniform density bounded by a closed, convex surface.
///
/// A ray crossing the volume scatters at an exponentially distributed
/// distance. Pair it with an [`Isotropic`](crate::Isotropic) phase function.
pub struct ConstantMedium {
    boundary: Box<dyn Hittable>,
    density: f32,
    phase_function: Arc<dyn Material>,
}

impl ConstantMedium {
    pub fn new(
        boundary: Box<dyn Hittable>,
        density: f32,
        phase_function: Arc<dyn Material>,
    ) -> Self {
        if density <= 0.0 {
            log::warn!("ConstantMedium density {density} is not positive, the volume is invisible");
        }
        Self {
            boundary,
            density,
            phase_function,
        }
    }
}

impl Hittable for ConstantMedium {
    fn hit<'a>(
        &'a self,
        ray: &Ray,
        ray_t: Interval,
        rng: &mut dyn RngCore,
    ) -> Option<HitRecord<'a>> {
        let entry = self.boundary.hit(ray, Interval::UNIVERSE, rng)?;
        let exit = self
            .boundary
            .hit(ray, Interval::new(entry.t + EXIT_EPSILON, f32::INFINITY), rng)?;

        let t_enter = entry.t.max(ray_t.min).max(0.0);
        let t_exit = exit.t.min(ray_t.max);
        if t_enter >= t_exit {
            return None;
        }

        let ray_length = ray.direction().length();
        let distance_inside = (t_exit - t_enter) * ray_length;
        let hit_distance = -(1.0 - gen_f32(rng)).ln() / self.density;
        if hit_distance >= distance_inside {
            return None;
        }

        let t = t_enter + hit_distance / ray_length;
        Some(HitRecord {
            p: ray.at(t),
            // Arbitrary: the isotropic phase function ignores it
            normal: Vec3::X,
            material: &*self.phase_function,
            u: 0.0,
            v: 0.0,
            t,
        })
    }

    fn bounding_box(&self, time0: f32, time1: f32) -> Option<Aabb> {
        self.boundary.bounding_box(time0, time1)
    }
}

//! A renderable scene: world hierarchy, camera and background.

use std::time::Instant;

use crate::{BuildError, BvhNode, Camera, Color, Hittable};
use lumen_math::{Ray, Vec3};
use rand::RngCore;

/// Radiance returned for rays that escape the scene.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Background {
    /// The same color in every direction.
    Solid(Color),
    /// Vertical gradient from white at the horizon to light blue overhead.
    Sky,
}

impl Background {
    /// Background color seen along `ray`.
    pub fn color(&self, ray: &Ray) -> Color {
        match self {
            Background::Solid(color) => *color,
            Background::Sky => {
                let unit_direction = ray.direction().normalize();
                let a = 0.5 * (unit_direction.y + 1.0);
                (1.0 - a) * Color::ONE + a * Color::new(0.5, 0.7, 1.0)
            }
        }
    }
}

impl Default for Background {
    fn default() -> Self {
        Background::Solid(Vec3::ZERO)
    }
}

/// Everything the integrator needs, immutable once built.
pub struct Scene {
    pub world: BvhNode,
    pub camera: Camera,
    pub background: Background,
}

impl Scene {
    /// Build the hierarchy over `objects` for the camera's shutter interval.
    ///
    /// Fails before any rendering if the hierarchy cannot be built.
    pub fn new(
        objects: Vec<Box<dyn Hittable>>,
        camera: Camera,
        background: Background,
        rng: &mut dyn RngCore,
    ) -> Result<Self, BuildError> {
        let start = Instant::now();
        let count = objects.len();
        let (time0, time1) = camera.shutter();

        let world = BvhNode::new(objects, time0, time1, rng)?;

        log::info!(
            "Scene built: {} primitives in {:.2}ms",
            count,
            start.elapsed().as_secs_f64() * 1000.0
        );

        Ok(Self {
            world,
            camera,
            background,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{HittableList, Lambertian, Sphere};
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::sync::Arc;

    #[test]
    fn test_sky_gradient() {
        let up = Ray::new(Vec3::ZERO, Vec3::Y, 0.0);
        let down = Ray::new(Vec3::ZERO, -Vec3::Y, 0.0);
        let level = Ray::new(Vec3::ZERO, Vec3::X * 3.0, 0.0);

        assert!((Background::Sky.color(&up) - Color::new(0.5, 0.7, 1.0)).length() < 1e-6);
        assert!((Background::Sky.color(&down) - Color::ONE).length() < 1e-6);
        assert!((Background::Sky.color(&level) - Color::new(0.75, 0.85, 1.0)).length() < 1e-6);
    }

    #[test]
    fn test_solid_background_ignores_direction() {
        let bg = Background::Solid(Color::new(0.1, 0.2, 0.3));
        let ray = Ray::new(Vec3::ZERO, Vec3::new(1.0, -4.0, 2.0), 0.0);
        assert_eq!(bg.color(&ray), Color::new(0.1, 0.2, 0.3));
        assert_eq!(Background::default().color(&ray), Color::ZERO);
    }

    #[test]
    fn test_scene_build_errors_surface_early() {
        let mut rng = StdRng::seed_from_u64(42);
        let camera = Camera::builder().build();

        let empty = Scene::new(Vec::new(), camera.clone(), Background::Sky, &mut rng);
        assert_eq!(empty.err(), Some(BuildError::EmptyHierarchy));

        let unbounded: Vec<Box<dyn Hittable>> = vec![Box::new(HittableList::new())];
        let result = Scene::new(unbounded, camera, Background::Sky, &mut rng);
        assert_eq!(result.err(), Some(BuildError::MissingBoundingBox { index: 0 }));
    }

    #[test]
    fn test_scene_world_is_hittable() {
        let mut rng = StdRng::seed_from_u64(42);
        let material = Arc::new(Lambertian::from_color(Color::splat(0.5)));
        let objects: Vec<Box<dyn Hittable>> = vec![Box::new(Sphere::new(
            Vec3::new(0.0, 0.0, -2.0),
            1.0,
            material,
        ))];

        let scene =
            Scene::new(objects, Camera::builder().build(), Background::Sky, &mut rng).unwrap();
        let ray = scene.camera.get_ray(0.5, 0.5, &mut rng);
        let rec = scene
            .world
            .hit(&ray, lumen_math::Interval::new(0.001, f32::INFINITY), &mut rng)
            .unwrap();
        assert!((rec.t - 1.0).abs() < 1e-4);
    }
}

//! Camera for ray generation.

use crate::sampling::{gen_f32, random_in_unit_disk};
use lumen_math::{Ray, Vec3};
use rand::RngCore;

/// Thin-lens camera with a shutter interval for motion blur.
///
/// Built once per scene and read-only afterwards.
#[derive(Debug, Clone)]
pub struct Camera {
    origin: Vec3,
    lower_left_corner: Vec3,
    horizontal: Vec3,
    vertical: Vec3,
    u: Vec3,
    v: Vec3,
    w: Vec3,
    lens_radius: f32,
    time0: f32,
    time1: f32,
}

impl Camera {
    /// Start building a camera from the default settings.
    pub fn builder() -> CameraBuilder {
        CameraBuilder::default()
    }

    /// Generate a ray for normalized image-plane coordinates `(s, t)`.
    ///
    /// `(0, 0)` is the lower-left corner of the image. The origin is jittered
    /// across the lens and the time is drawn uniformly from the shutter.
    pub fn get_ray(&self, s: f32, t: f32, rng: &mut dyn RngCore) -> Ray {
        let rd = self.lens_radius * random_in_unit_disk(rng);
        let offset = self.u * rd.x + self.v * rd.y;
        let time = self.time0 + gen_f32(rng) * (self.time1 - self.time0);

        let target = self.lower_left_corner + s * self.horizontal + t * self.vertical;
        Ray::new(self.origin + offset, target - self.origin - offset, time)
    }

    /// Eye position.
    pub fn origin(&self) -> Vec3 {
        self.origin
    }

    /// Camera basis `(u, v, w)`: right, up, and backward.
    pub fn basis(&self) -> (Vec3, Vec3, Vec3) {
        (self.u, self.v, self.w)
    }

    /// Shutter open and close times.
    pub fn shutter(&self) -> (f32, f32) {
        (self.time0, self.time1)
    }
}

/// Builder for [`Camera`].
#[derive(Debug, Clone)]
pub struct CameraBuilder {
    look_from: Vec3,
    look_at: Vec3,
    vup: Vec3,
    vfov: f32,         // Vertical field of view in degrees
    aspect_ratio: f32, // Image width / height
    aperture: f32,
    focus_dist: f32, // Distance from the eye to the plane of perfect focus
    time0: f32,
    time1: f32,
}

impl Default for CameraBuilder {
    fn default() -> Self {
        Self {
            look_from: Vec3::ZERO,
            look_at: Vec3::new(0.0, 0.0, -1.0),
            vup: Vec3::Y,
            vfov: 90.0,
            aspect_ratio: 2.0,
            aperture: 0.0,
            focus_dist: 1.0,
            time0: 0.0,
            time1: 0.0,
        }
    }
}

impl CameraBuilder {
    pub fn look_from(mut self, look_from: Vec3) -> Self {
        self.look_from = look_from;
        self
    }

    pub fn look_at(mut self, look_at: Vec3) -> Self {
        self.look_at = look_at;
        self
    }

    /// Up hint; only its component perpendicular to the view direction matters.
    pub fn vup(mut self, vup: Vec3) -> Self {
        self.vup = vup;
        self
    }

    /// Set the vertical field of view in degrees.
    pub fn vfov(mut self, degrees: f32) -> Self {
        self.vfov = degrees;
        self
    }

    pub fn aspect_ratio(mut self, aspect_ratio: f32) -> Self {
        self.aspect_ratio = aspect_ratio;
        self
    }

    /// Lens diameter. Zero gives a pinhole camera with everything in focus.
    pub fn aperture(mut self, aperture: f32) -> Self {
        self.aperture = aperture;
        self
    }

    pub fn focus_dist(mut self, focus_dist: f32) -> Self {
        self.focus_dist = focus_dist;
        self
    }

    /// Set the shutter interval sampled for motion blur.
    pub fn shutter(mut self, time0: f32, time1: f32) -> Self {
        self.time0 = time0;
        self.time1 = time1;
        self
    }

    pub fn build(self) -> Camera {
        let half_height = (self.vfov.to_radians() / 2.0).tan();
        let half_width = self.aspect_ratio * half_height;
        let focus = self.focus_dist;

        // Camera looks along -w
        let w = (self.look_from - self.look_at).normalize();
        let u = self.vup.cross(w).normalize();
        let v = w.cross(u);

        let origin = self.look_from;
        Camera {
            origin,
            lower_left_corner: origin
                - half_width * focus * u
                - half_height * focus * v
                - focus * w,
            horizontal: 2.0 * half_width * focus * u,
            vertical: 2.0 * half_height * focus * v,
            u,
            v,
            w,
            lens_radius: self.aperture / 2.0,
            time0: self.time0,
            time1: self.time1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_default_camera_center_ray() {
        let camera = Camera::builder().build();
        let mut rng = StdRng::seed_from_u64(42);

        let ray = camera.get_ray(0.5, 0.5, &mut rng);
        assert_eq!(ray.origin(), Vec3::ZERO);
        assert!((ray.direction().normalize() - Vec3::new(0.0, 0.0, -1.0)).length() < 1e-5);
    }

    #[test]
    fn test_corners_follow_field_of_view() {
        let camera = Camera::builder().vfov(90.0).aspect_ratio(2.0).build();
        let mut rng = StdRng::seed_from_u64(42);

        // tan(45°) = 1, so the lower-left target sits at (-2, -1, -1)
        let ray = camera.get_ray(0.0, 0.0, &mut rng);
        assert!((ray.direction() - Vec3::new(-2.0, -1.0, -1.0)).length() < 1e-5);
        let ray = camera.get_ray(1.0, 1.0, &mut rng);
        assert!((ray.direction() - Vec3::new(2.0, 1.0, -1.0)).length() < 1e-5);
    }

    #[test]
    fn test_basis_is_orthonormal() {
        let camera = Camera::builder()
            .look_from(Vec3::new(13.0, 2.0, 3.0))
            .look_at(Vec3::ZERO)
            .vup(Vec3::Y)
            .build();
        let (u, v, w) = camera.basis();

        for axis in [u, v, w] {
            assert!((axis.length() - 1.0).abs() < 1e-5);
        }
        assert!(u.dot(v).abs() < 1e-5);
        assert!(u.dot(w).abs() < 1e-5);
        assert!(v.dot(w).abs() < 1e-5);
        // w points from the target back to the eye
        assert!(w.dot(Vec3::new(13.0, 2.0, 3.0)) > 0.0);
    }

    #[test]
    fn test_rays_converge_at_focus_distance() {
        let camera = Camera::builder()
            .look_from(Vec3::new(0.0, 0.0, 5.0))
            .look_at(Vec3::ZERO)
            .aperture(1.0)
            .focus_dist(5.0)
            .build();
        let mut rng = StdRng::seed_from_u64(42);

        let mut spread = false;
        for _ in 0..50 {
            let ray = camera.get_ray(0.5, 0.5, &mut rng);
            // Every lens sample passes through the focused center point at t = 1
            assert!(ray.at(1.0).length() < 1e-4);
            assert!((ray.origin() - camera.origin()).length() <= 0.5 + 1e-5);
            spread |= ray.origin() != camera.origin();
        }
        assert!(spread);
    }

    #[test]
    fn test_ray_times_within_shutter() {
        let camera = Camera::builder().shutter(0.25, 0.75).build();
        let mut rng = StdRng::seed_from_u64(42);

        for _ in 0..100 {
            let time = camera.get_ray(0.3, 0.6, &mut rng).time();
            assert!((0.25..=0.75).contains(&time));
        }
        assert_eq!(camera.shutter(), (0.25, 0.75));
    }

    #[test]
    fn test_pinhole_rays_share_origin() {
        let camera = Camera::builder().look_from(Vec3::new(1.0, 2.0, 3.0)).build();
        let mut rng = StdRng::seed_from_u64(42);

        for _ in 0..10 {
            assert_eq!(camera.get_ray(0.1, 0.9, &mut rng).origin(), Vec3::new(1.0, 2.0, 3.0));
        }
    }
}

//! Material trait for surface scattering.

use std::sync::Arc;

use crate::sampling::{gen_f32, random_in_unit_sphere};
use crate::{HitRecord, SolidColor, Texture};
use lumen_math::{Ray, Vec3};
use rand::RngCore;

/// Color type alias (RGB values typically 0-1)
pub type Color = Vec3;

/// Result of a successful scatter: how much light survives and where it goes next.
#[derive(Debug, Clone, Copy)]
pub struct ScatterResult {
    pub attenuation: Color,
    pub scattered: Ray,
}

/// Trait for materials that describe how light interacts with surfaces.
pub trait Material: Send + Sync {
    /// Scatter an incoming ray.
    ///
    /// Returns `None` if the ray is absorbed.
    fn scatter(&self, ray_in: &Ray, rec: &HitRecord, rng: &mut dyn RngCore)
        -> Option<ScatterResult>;

    /// Get emitted light from this material.
    ///
    /// Most materials return black (no emission).
    fn emitted(&self, _u: f32, _v: f32, _p: Vec3) -> Color {
        Color::ZERO
    }
}

/// Lambertian (diffuse) material.
#[derive(Clone)]
pub struct Lambertian {
    albedo: Arc<dyn Texture>,
}

impl Lambertian {
    /// Create a new Lambertian material sampling its albedo from a texture.
    pub fn new(albedo: Arc<dyn Texture>) -> Self {
        Self { albedo }
    }

    /// Create a Lambertian material with a constant albedo.
    pub fn from_color(albedo: Color) -> Self {
        Self::new(Arc::new(SolidColor::new(albedo)))
    }
}

impl Material for Lambertian {
    fn scatter(
        &self,
        ray_in: &Ray,
        rec: &HitRecord,
        rng: &mut dyn RngCore,
    ) -> Option<ScatterResult> {
        let mut scatter_direction = rec.normal + random_in_unit_sphere(rng);

        // Catch degenerate scatter direction
        if scatter_direction.length_squared() < 1e-8 {
            scatter_direction = rec.normal;
        }

        Some(ScatterResult {
            attenuation: self.albedo.value(rec.u, rec.v, rec.p),
            scattered: Ray::new(rec.p, scatter_direction, ray_in.time()),
        })
    }
}

/// Metal (specular) material.
pub struct Metal {
    albedo: Color,
    fuzz: f32,
}

impl Metal {
    /// Create a new Metal material.
    ///
    /// - `albedo`: The color of the metal
    /// - `fuzz`: Roughness, 0.0 = perfect mirror, 1.0 = very rough
    pub fn new(albedo: Color, fuzz: f32) -> Self {
        if !(0.0..=1.0).contains(&fuzz) {
            log::warn!("Metal fuzz {fuzz} outside [0, 1], clamping");
        }
        Self {
            albedo,
            fuzz: fuzz.clamp(0.0, 1.0),
        }
    }
}

impl Material for Metal {
    fn scatter(
        &self,
        ray_in: &Ray,
        rec: &HitRecord,
        rng: &mut dyn RngCore,
    ) -> Option<ScatterResult> {
        let reflected = reflect(ray_in.direction().normalize(), rec.normal);
        let scattered_dir = reflected + self.fuzz * random_in_unit_sphere(rng);

        // Rays pushed below the surface are absorbed
        if scattered_dir.dot(rec.normal) > 0.0 {
            Some(ScatterResult {
                attenuation: self.albedo,
                scattered: Ray::new(rec.p, scattered_dir, ray_in.time()),
            })
        } else {
            None
        }
    }
}

/// Dielectric (glass) material.
pub struct Dielectric {
    /// Index of refraction
    ior: f32,
}

impl Dielectric {
    /// Create a new Dielectric material.
    ///
    /// - `ior`: Index of refraction (1.0 = air, 1.5 = glass, 2.4 = diamond)
    pub fn new(ior: f32) -> Self {
        Self { ior }
    }
}

impl Material for Dielectric {
    fn scatter(
        &self,
        ray_in: &Ray,
        rec: &HitRecord,
        rng: &mut dyn RngCore,
    ) -> Option<ScatterResult> {
        let unit_direction = ray_in.direction().normalize();
        let d_dot_n = unit_direction.dot(rec.normal);

        // Normals point outward, so a positive dot means the ray is leaving the medium
        let (outward_normal, eta, cosine) = if d_dot_n > 0.0 {
            (-rec.normal, self.ior, d_dot_n)
        } else {
            (rec.normal, 1.0 / self.ior, -d_dot_n)
        };

        let direction = match refract(unit_direction, outward_normal, eta) {
            Some(refracted) if gen_f32(rng) >= reflectance(cosine, self.ior) => refracted,
            // Total internal reflection, or the Fresnel draw picked reflection
            _ => reflect(unit_direction, rec.normal),
        };

        Some(ScatterResult {
            attenuation: Color::ONE,
            scattered: Ray::new(rec.p, direction, ray_in.time()),
        })
    }
}

/// Diffuse light emitter.
pub struct DiffuseLight {
    emit: Arc<dyn Texture>,
}

impl DiffuseLight {
    /// Create a new diffuse light emitting the texture's value.
    ///
    /// Values above `(1, 1, 1)` are needed to light the rest of the scene.
    pub fn new(emit: Arc<dyn Texture>) -> Self {
        Self { emit }
    }

    /// Create a diffuse light with a constant emission color.
    pub fn from_color(emit: Color) -> Self {
        Self::new(Arc::new(SolidColor::new(emit)))
    }
}

impl Material for DiffuseLight {
    fn scatter(
        &self,
        _ray_in: &Ray,
        _rec: &HitRecord,
        _rng: &mut dyn RngCore,
    ) -> Option<ScatterResult> {
        None
    }

    fn emitted(&self, u: f32, v: f32, p: Vec3) -> Color {
        self.emit.value(u, v, p)
    }
}

/// Isotropic phase function for participating media.
pub struct Isotropic {
    albedo: Arc<dyn Texture>,
}

impl Isotropic {
    pub fn new(albedo: Arc<dyn Texture>) -> Self {
        Self { albedo }
    }

    pub fn from_color(albedo: Color) -> Self {
        Self::new(Arc::new(SolidColor::new(albedo)))
    }
}

impl Material for Isotropic {
    fn scatter(
        &self,
        ray_in: &Ray,
        rec: &HitRecord,
        rng: &mut dyn RngCore,
    ) -> Option<ScatterResult> {
        Some(ScatterResult {
            attenuation: self.albedo.value(rec.u, rec.v, rec.p),
            scattered: Ray::new(rec.p, random_in_unit_sphere(rng), ray_in.time()),
        })
    }
}

// =============================================================================
// Helper functions
// =============================================================================

/// Reflect a vector about a normal.
#[inline]
pub fn reflect(v: Vec3, n: Vec3) -> Vec3 {
    v - 2.0 * v.dot(n) * n
}

/// Refract a unit vector through a surface with Snell's law.
///
/// `n` must face the incoming side. Returns `None` on total internal reflection.
pub fn refract(uv: Vec3, n: Vec3, eta: f32) -> Option<Vec3> {
    let dt = uv.dot(n);
    let discriminant = 1.0 - eta * eta * (1.0 - dt * dt);
    if discriminant > 0.0 {
        Some(eta * (uv - n * dt) - n * discriminant.sqrt())
    } else {
        None
    }
}

/// Schlick's approximation for reflectance
pub fn reflectance(cosine: f32, ior: f32) -> f32 {
    let r0 = ((1.0 - ior) / (1.0 + ior)).powi(2);
    r0 + (1.0 - r0) * (1.0 - cosine).powi(5)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn record(material: &dyn Material, normal: Vec3) -> HitRecord<'_> {
        HitRecord {
            p: Vec3::ZERO,
            normal,
            material,
            u: 0.5,
            v: 0.5,
            t: 1.0,
        }
    }

    #[test]
    fn test_reflectance_limits() {
        let ior = 1.5f32;
        let r0 = ((1.0 - ior) / (1.0 + ior)).powi(2);

        assert!((reflectance(1.0, ior) - r0).abs() < 1e-6);
        assert!((reflectance(1e-4, ior) - 1.0).abs() < 1e-3);
        assert!(reflectance(0.5, ior) > r0 && reflectance(0.5, ior) < 1.0);
    }

    #[test]
    fn test_reflectance_is_symmetric_in_ior() {
        assert!((reflectance(0.3, 1.5) - reflectance(0.3, 1.0 / 1.5)).abs() < 1e-6);
    }

    #[test]
    fn test_reflect() {
        let v = Vec3::new(1.0, -1.0, 0.0);
        assert_eq!(reflect(v, Vec3::Y), Vec3::new(1.0, 1.0, 0.0));
    }

    #[test]
    fn test_refract_normal_incidence_passes_straight() {
        let out = refract(-Vec3::Y, Vec3::Y, 1.0 / 1.5).unwrap();
        assert!((out - -Vec3::Y).length() < 1e-6);
    }

    #[test]
    fn test_refract_total_internal_reflection() {
        // Grazing ray leaving glass
        let uv = Vec3::new(0.9, -0.1, 0.0).normalize();
        assert!(refract(uv, Vec3::Y, 1.5).is_none());
    }

    #[test]
    fn test_lambertian_scatters_towards_normal_side() {
        let material = Lambertian::from_color(Color::new(0.2, 0.4, 0.6));
        let rec = record(&material, Vec3::Y);
        let ray = Ray::new(Vec3::new(0.0, 1.0, 0.0), -Vec3::Y, 0.25);
        let mut rng = StdRng::seed_from_u64(3);

        for _ in 0..100 {
            let result = material.scatter(&ray, &rec, &mut rng).unwrap();
            assert_eq!(result.attenuation, Color::new(0.2, 0.4, 0.6));
            assert!(result.scattered.direction().dot(Vec3::Y) >= 0.0);
            assert_eq!(result.scattered.time(), 0.25);
        }
    }

    #[test]
    fn test_metal_mirror_reflection() {
        let material = Metal::new(Color::ONE, 0.0);
        let rec = record(&material, Vec3::Y);
        let ray = Ray::new(Vec3::new(-1.0, 1.0, 0.0), Vec3::new(1.0, -1.0, 0.0), 0.0);
        let mut rng = StdRng::seed_from_u64(3);

        let result = material.scatter(&ray, &rec, &mut rng).unwrap();
        let expected = Vec3::new(1.0, 1.0, 0.0).normalize();
        assert!((result.scattered.direction() - expected).length() < 1e-6);
    }

    #[test]
    fn test_metal_fuzz_is_clamped() {
        let material = Metal::new(Color::ONE, 3.0);
        assert_eq!(material.fuzz, 1.0);
    }

    #[test]
    fn test_metal_absorbs_rays_below_surface() {
        let material = Metal::new(Color::ONE, 0.0);
        // Normal facing the same way as the ray: reflection goes below the surface
        let rec = record(&material, -Vec3::Y);
        let ray = Ray::new(Vec3::new(0.0, 1.0, 0.0), -Vec3::Y, 0.0);
        let mut rng = StdRng::seed_from_u64(3);

        assert!(material.scatter(&ray, &rec, &mut rng).is_none());
    }

    #[test]
    fn test_dielectric_always_scatters_white() {
        let material = Dielectric::new(1.5);
        let rec = record(&material, Vec3::Y);
        let ray = Ray::new(Vec3::new(0.3, 1.0, 0.0), Vec3::new(-0.3, -1.0, 0.0), 0.0);
        let mut rng = StdRng::seed_from_u64(5);

        let mut reflected = 0;
        let trials = 2000;
        for _ in 0..trials {
            let result = material.scatter(&ray, &rec, &mut rng).unwrap();
            assert_eq!(result.attenuation, Color::ONE);
            if result.scattered.direction().y > 0.0 {
                reflected += 1;
            }
        }

        // Near-normal incidence reflects roughly r0 (4%) of the time
        let fraction = reflected as f32 / trials as f32;
        assert!(fraction > 0.01 && fraction < 0.1, "fraction = {fraction}");
    }

    #[test]
    fn test_dielectric_total_internal_reflection_always_reflects() {
        let material = Dielectric::new(1.5);
        let rec = record(&material, Vec3::Y);
        // Inside the glass, leaving at a grazing angle
        let ray = Ray::new(Vec3::ZERO, Vec3::new(0.9, 0.1, 0.0), 0.0);
        let mut rng = StdRng::seed_from_u64(5);

        for _ in 0..100 {
            let result = material.scatter(&ray, &rec, &mut rng).unwrap();
            assert!(result.scattered.direction().y < 0.0);
        }
    }

    #[test]
    fn test_diffuse_light_emits_and_absorbs() {
        let material = DiffuseLight::from_color(Color::splat(4.0));
        let rec = record(&material, Vec3::Y);
        let ray = Ray::new(Vec3::Y, -Vec3::Y, 0.0);
        let mut rng = StdRng::seed_from_u64(5);

        assert!(material.scatter(&ray, &rec, &mut rng).is_none());
        assert_eq!(material.emitted(0.0, 0.0, Vec3::ZERO), Color::splat(4.0));
        assert_eq!(Lambertian::from_color(Color::ONE).emitted(0.0, 0.0, Vec3::ZERO), Color::ZERO);
    }

    #[test]
    fn test_isotropic_scatters_anywhere() {
        let material = Isotropic::from_color(Color::new(0.4, 0.4, 1.0));
        let rec = record(&material, Vec3::X);
        let ray = Ray::new(Vec3::ZERO, Vec3::Z, 0.0);
        let mut rng = StdRng::seed_from_u64(9);

        let mut behind_normal = false;
        for _ in 0..200 {
            let result = material.scatter(&ray, &rec, &mut rng).unwrap();
            assert_eq!(result.attenuation, Color::new(0.4, 0.4, 1.0));
            assert!(result.scattered.direction().length() < 1.0);
            behind_normal |= result.scattered.direction().x < 0.0;
        }
        assert!(behind_normal);
    }
}

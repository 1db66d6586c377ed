//! Lumen Renderer - CPU Path Tracing
//!
//! A Monte Carlo path tracer: a BVH over analytic primitives, textured
//! scattering materials, a thin-lens camera with motion blur, and a
//! band-parallel integrator driven by rayon.

mod band;
mod bvh;
mod camera;
mod cuboid;
mod error;
mod hittable;
mod instance;
mod material;
mod medium;
mod perlin;
mod rect;
mod renderer;
mod sampling;
mod scene;
mod sphere;
mod texture;

pub use band::{generate_bands, render, render_band, Band, Framebuffer};
pub use bvh::BvhNode;
pub use camera::{Camera, CameraBuilder};
pub use cuboid::Cuboid;
pub use error::{BuildError, RenderError};
pub use hittable::{HitRecord, Hittable, HittableList};
pub use instance::{FlipNormals, RotateY, Translate};
pub use material::{
    reflect, reflectance, refract, Color, Dielectric, DiffuseLight, Isotropic, Lambertian,
    Material, Metal, ScatterResult,
};
pub use medium::ConstantMedium;
pub use perlin::Perlin;
pub use rect::{AaRect, Plane};
pub use renderer::{color_to_rgb8, linear_to_gamma, ray_color, render_pixel, RenderConfig, T_MIN};
pub use sampling::{gen_f32, random_in_unit_disk, random_in_unit_sphere};
pub use scene::{Background, Scene};
pub use sphere::{MovingSphere, Sphere};
pub use texture::{CheckerTexture, ImageTexture, NoiseTexture, SolidColor, Texture};

/// Re-export Vec3 and common math types from lumen_math
pub use lumen_math::{Aabb, Interval, Ray, Vec3};

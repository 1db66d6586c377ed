//! Demo scenes.
//!
//! Each builder returns the primitives, a configured camera and the
//! background. Building the hierarchy is left to `Scene::new`.

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::ValueEnum;
use lumen_math::Vec3;
use lumen_renderer::{
    gen_f32, AaRect, Background, Camera, CheckerTexture, Color, ConstantMedium, Cuboid, Dielectric,
    DiffuseLight, FlipNormals, Hittable, ImageTexture, Isotropic, Lambertian, Material, Metal,
    MovingSphere, NoiseTexture, Perlin, RotateY, SolidColor, Sphere, Translate,
};
use rand::RngCore;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SceneKind {
    /// Cover scene: hundreds of small spheres, some in motion, over a checker floor
    Random,
    /// Checker sphere under a fuzzy metal sphere
    TwoSpheres,
    /// Two marble-textured spheres
    Perlin,
    /// Image-textured globe (needs --texture)
    Earth,
    /// Marble spheres lit by an emissive sphere and rectangle
    SimpleLight,
    /// Cornell box with two rotated blocks
    Cornell,
    /// Cornell box with the blocks made of smoke
    CornellSmoke,
}

/// Everything needed to assemble a `Scene`.
pub struct SceneParts {
    pub objects: Vec<Box<dyn Hittable>>,
    pub camera: Camera,
    pub background: Background,
}

/// Build the demo scene `kind` for an image of the given aspect ratio.
pub fn build(
    kind: SceneKind,
    aspect_ratio: f32,
    texture: Option<&Path>,
    rng: &mut dyn RngCore,
) -> Result<SceneParts> {
    let parts = match kind {
        SceneKind::Random => random_spheres(aspect_ratio, rng),
        SceneKind::TwoSpheres => two_spheres(aspect_ratio),
        SceneKind::Perlin => perlin_spheres(aspect_ratio, rng),
        SceneKind::Earth => {
            let path = texture.context("the earth scene needs an image, pass --texture <path>")?;
            earth(aspect_ratio, path)?
        }
        SceneKind::SimpleLight => simple_light(aspect_ratio, rng),
        SceneKind::Cornell => cornell_box(aspect_ratio, false),
        SceneKind::CornellSmoke => cornell_box(aspect_ratio, true),
    };

    log::info!("Scene {:?}: {} top-level objects", kind, parts.objects.len());
    Ok(parts)
}

/// Camera shared by the outdoor scenes.
fn outdoor_camera(aspect_ratio: f32, vfov: f32) -> Camera {
    Camera::builder()
        .look_from(Vec3::new(13.0, 2.0, 3.0))
        .look_at(Vec3::ZERO)
        .vup(Vec3::Y)
        .vfov(vfov)
        .aspect_ratio(aspect_ratio)
        .aperture(0.0)
        .focus_dist(10.0)
        .shutter(0.0, 1.0)
        .build()
}

fn checker() -> Arc<CheckerTexture> {
    Arc::new(CheckerTexture::from_colors(
        Color::new(0.2, 0.3, 0.1),
        Color::new(0.9, 0.9, 0.9),
    ))
}

fn random_spheres(aspect_ratio: f32, rng: &mut dyn RngCore) -> SceneParts {
    let mut objects: Vec<Box<dyn Hittable>> = Vec::new();

    objects.push(Box::new(Sphere::new(
        Vec3::new(0.0, -1000.0, 0.0),
        1000.0,
        Arc::new(Lambertian::new(checker())),
    )));

    for a in -10..10 {
        for b in -10..10 {
            let choose_mat = gen_f32(rng);
            let center = Vec3::new(
                a as f32 + 0.9 * gen_f32(rng),
                0.2,
                b as f32 + 0.9 * gen_f32(rng),
            );

            // Keep clear of the big metal sphere
            if (center - Vec3::new(4.0, 0.2, 0.0)).length() <= 0.9 {
                continue;
            }

            if choose_mat < 0.8 {
                let albedo = Color::new(
                    gen_f32(rng) * gen_f32(rng),
                    gen_f32(rng) * gen_f32(rng),
                    gen_f32(rng) * gen_f32(rng),
                );
                let center1 = center + Vec3::new(0.0, 0.5 * gen_f32(rng), 0.0);
                objects.push(Box::new(MovingSphere::new(
                    center,
                    center1,
                    0.0,
                    1.0,
                    0.2,
                    Arc::new(Lambertian::from_color(albedo)),
                )));
            } else if choose_mat < 0.95 {
                let albedo = Color::new(
                    0.5 * (1.0 + gen_f32(rng)),
                    0.5 * (1.0 + gen_f32(rng)),
                    0.5 * (1.0 + gen_f32(rng)),
                );
                let fuzz = 0.5 * gen_f32(rng);
                let metal = Arc::new(Metal::new(albedo, fuzz));
                objects.push(Box::new(Sphere::new(center, 0.2, metal)));
            } else {
                objects.push(Box::new(Sphere::new(center, 0.2, Arc::new(Dielectric::new(1.5)))));
            }
        }
    }

    objects.push(Box::new(Sphere::new(
        Vec3::new(0.0, 1.0, 0.0),
        1.0,
        Arc::new(Dielectric::new(1.5)),
    )));
    objects.push(Box::new(Sphere::new(
        Vec3::new(-4.0, 1.0, 0.0),
        1.0,
        Arc::new(Lambertian::from_color(Color::new(0.4, 0.2, 0.1))),
    )));
    objects.push(Box::new(Sphere::new(
        Vec3::new(4.0, 1.0, 0.0),
        1.0,
        Arc::new(Metal::new(Color::new(0.7, 0.6, 0.5), 0.0)),
    )));

    SceneParts {
        objects,
        camera: outdoor_camera(aspect_ratio, 20.0),
        background: Background::Sky,
    }
}

fn two_spheres(aspect_ratio: f32) -> SceneParts {
    let objects: Vec<Box<dyn Hittable>> = vec![
        Box::new(Sphere::new(
            Vec3::new(0.0, -10.0, 0.0),
            10.0,
            Arc::new(Lambertian::new(checker())),
        )),
        Box::new(Sphere::new(
            Vec3::new(0.0, 10.0, 0.0),
            10.0,
            Arc::new(Metal::new(Color::new(0.8, 0.3, 0.3), 0.02)),
        )),
    ];

    SceneParts {
        objects,
        camera: outdoor_camera(aspect_ratio, 20.0),
        background: Background::Sky,
    }
}

fn marble(rng: &mut dyn RngCore) -> Arc<dyn Material> {
    let noise = Arc::new(Perlin::new(rng));
    Arc::new(Lambertian::new(Arc::new(NoiseTexture::new(noise, 4.0))))
}

fn perlin_spheres(aspect_ratio: f32, rng: &mut dyn RngCore) -> SceneParts {
    let material = marble(rng);
    let objects: Vec<Box<dyn Hittable>> = vec![
        Box::new(Sphere::new(Vec3::new(0.0, -1000.0, 0.0), 1000.0, material.clone())),
        Box::new(Sphere::new(Vec3::new(0.0, 2.0, 0.0), 2.0, material)),
    ];

    SceneParts {
        objects,
        camera: outdoor_camera(aspect_ratio, 20.0),
        background: Background::Sky,
    }
}

fn earth(aspect_ratio: f32, path: &Path) -> Result<SceneParts> {
    let image = lumen_core::load_image(path)
        .with_context(|| format!("failed to load earth texture {}", path.display()))?;
    let texture = Arc::new(ImageTexture::new(Arc::new(image)));
    let objects: Vec<Box<dyn Hittable>> = vec![Box::new(Sphere::new(
        Vec3::ZERO,
        1.0,
        Arc::new(Lambertian::new(texture)),
    ))];

    Ok(SceneParts {
        objects,
        camera: outdoor_camera(aspect_ratio, 20.0),
        background: Background::Sky,
    })
}

fn simple_light(aspect_ratio: f32, rng: &mut dyn RngCore) -> SceneParts {
    let material = marble(rng);
    // Emission above 1 so the lights illuminate the rest of the scene
    let light: Arc<dyn Material> =
        Arc::new(DiffuseLight::new(Arc::new(SolidColor::new(Color::splat(4.0)))));

    let objects: Vec<Box<dyn Hittable>> = vec![
        Box::new(Sphere::new(Vec3::new(0.0, -1000.0, 0.0), 1000.0, material.clone())),
        Box::new(Sphere::new(Vec3::new(0.0, 2.0, 0.0), 2.0, material)),
        Box::new(Sphere::new(Vec3::new(0.0, 7.0, 0.0), 2.0, light.clone())),
        Box::new(AaRect::xy(3.0, 5.0, 1.0, 3.0, -2.0, light)),
    ];

    SceneParts {
        objects,
        camera: outdoor_camera(aspect_ratio, 60.0),
        background: Background::Solid(Color::ZERO),
    }
}

fn cornell_box(aspect_ratio: f32, smoke: bool) -> SceneParts {
    let red: Arc<dyn Material> = Arc::new(Lambertian::from_color(Color::new(0.65, 0.05, 0.05)));
    let white: Arc<dyn Material> = Arc::new(Lambertian::from_color(Color::splat(0.73)));
    let green: Arc<dyn Material> = Arc::new(Lambertian::from_color(Color::new(0.12, 0.45, 0.15)));

    // The smoke scene uses a larger, dimmer light
    let (light, light_rect) = if smoke {
        (Color::splat(4.0), (113.0, 443.0, 127.0, 432.0))
    } else {
        (Color::splat(15.0), (213.0, 343.0, 227.0, 332.0))
    };
    let light: Arc<dyn Material> = Arc::new(DiffuseLight::from_color(light));
    let (lx0, lx1, lz0, lz1) = light_rect;

    let mut objects: Vec<Box<dyn Hittable>> = vec![
        flip(AaRect::yz(0.0, 555.0, 0.0, 555.0, 555.0, green)),
        Box::new(AaRect::yz(0.0, 555.0, 0.0, 555.0, 0.0, red)),
        Box::new(AaRect::xz(lx0, lx1, lz0, lz1, 554.0, light)),
        flip(AaRect::xz(0.0, 555.0, 0.0, 555.0, 555.0, white.clone())),
        Box::new(AaRect::xz(0.0, 555.0, 0.0, 555.0, 0.0, white.clone())),
        flip(AaRect::xy(0.0, 555.0, 0.0, 555.0, 555.0, white.clone())),
    ];

    let short_block = block(
        Vec3::splat(165.0),
        -18.0,
        Vec3::new(130.0, 0.0, 65.0),
        white.clone(),
    );
    let tall_block = block(
        Vec3::new(165.0, 330.0, 165.0),
        15.0,
        Vec3::new(265.0, 0.0, 295.0),
        white,
    );

    if smoke {
        objects.push(Box::new(ConstantMedium::new(
            short_block,
            0.01,
            Arc::new(Isotropic::from_color(Color::new(0.4, 0.4, 1.0))),
        )));
        objects.push(Box::new(ConstantMedium::new(
            tall_block,
            0.01,
            Arc::new(Isotropic::from_color(Color::ZERO)),
        )));
    } else {
        objects.push(short_block);
        objects.push(tall_block);
    }

    let camera = Camera::builder()
        .look_from(Vec3::new(278.0, 278.0, -800.0))
        .look_at(Vec3::new(278.0, 278.0, 0.0))
        .vup(Vec3::Y)
        .vfov(40.0)
        .aspect_ratio(aspect_ratio)
        .aperture(0.0)
        .focus_dist(10.0)
        .shutter(0.0, 1.0)
        .build();

    SceneParts {
        objects,
        camera,
        background: Background::Solid(Color::ZERO),
    }
}

fn flip(rect: AaRect) -> Box<dyn Hittable> {
    Box::new(FlipNormals::new(Box::new(rect)))
}

/// A box of the given size, rotated about Y and then moved into place.
fn block(size: Vec3, angle: f32, offset: Vec3, material: Arc<dyn Material>) -> Box<dyn Hittable> {
    let cuboid = Cuboid::new(Vec3::ZERO, size, material);
    let rotated = RotateY::new(Box::new(cuboid), angle);
    Box::new(Translate::new(Box::new(rotated), offset))
}

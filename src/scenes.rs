//! Programmatic scene assembly
//!
//! Scenes are built in code and handed to the renderer as an in-memory
//! object graph; there is deliberately no scene file format.

use std::sync::Arc;

use clap::ValueEnum;

use crate::bvh::{Bvh, BvhError};
use crate::cameras::CameraConfig;
use crate::materials::{Dielectric, DiffuseLight, Lambertian, Metal};
use crate::mediums::ConstantMedium;
use crate::objects::{
    Cuboid, HittableList, HittableObj, MovingSphere, Sphere, XyRectangle, XzRectangle,
    YzRectangle,
};
use crate::textures::{Checker, ImageTexture, Noise, Texture};
use crate::transrot::{Axis, Rotate, Translate};
use crate::utils::{hex_to_color, random_vec};
use crate::{random, Background, Color, Material, Point, Vec3};

/// Scene selector
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Scene {
    /// Checkered ground, hollow glass, diffuse, metal and marble spheres
    Standard,
    /// Two large checkered spheres
    CheckeredSpheres,
    /// Perlin noise and marble spheres on a checkered ground
    PerlinSpheres,
    /// Image-mapped earth and moon
    Earth,
    /// Emissive rectangles lighting a box and spheres
    Lights,
    /// Cornell box with two smoke volumes
    CornellSmoke,
    /// Cubes rotated about each axis
    Rotations,
    /// Field of small random spheres under a BVH, with motion blur
    RandomSpheres,
}

/// A fully assembled scene: world graph, camera parameters (aspect ratio is
/// supplied by the image size at render time) and background.
pub struct SceneData {
    pub world: HittableObj,
    pub camera: CameraConfig,
    pub background: Background,
}

impl Scene {
    pub fn build(self) -> Result<SceneData, BvhError> {
        match self {
            Self::Standard => Ok(standard()),
            Self::CheckeredSpheres => Ok(checkered_spheres()),
            Self::PerlinSpheres => Ok(perlin_spheres()),
            Self::Earth => Ok(earth()),
            Self::Lights => Ok(lights()),
            Self::CornellSmoke => Ok(cornell_smoke()),
            Self::Rotations => Ok(rotations()),
            Self::RandomSpheres => random_spheres(),
        }
    }
}

fn lambertian(color: Color) -> Material {
    Arc::new(Lambertian::new(color))
}

fn default_camera(look_from: Point, look_at: Point, fov: f64) -> CameraConfig {
    CameraConfig {
        look_from: look_from.into(),
        look_at: look_at.into(),
        v_up: Vec3::new(0.0, 1.0, 0.0).into(),
        vertical_fov_deg: fov,
        aperture: 0.0,
        focus_distance: 10.0,
        time0: 0.0,
        time1: 1.0,
    }
}

fn standard() -> SceneData {
    let mut objects = HittableList::default();

    // ground
    let ground: Material = Arc::new(Lambertian::from_texture(Arc::new(Checker::from_colors(
        hex_to_color("#15c4d1"),
        hex_to_color("#f57131"),
        6.0,
    ))));
    objects.add(Box::new(Sphere::new(
        Point::new(0.0, -1000.0, 0.0),
        1000.0,
        ground,
    )));

    let glass: Material = Arc::new(Dielectric::tinted(1.5, Color::new(1.0, 0.6, 0.6)));
    let blue = lambertian(Color::new(71.0, 160.0, 255.0) / 255.0);
    let gold: Material = Arc::new(Metal::new(Color::new(255.0, 174.0, 60.0) / 255.0, 0.01));

    let marble: Texture = Arc::new(Noise::with_albedo(
        Color::new(231.0, 122.0, 255.0) / 255.0,
        2.0,
        true,
    ));
    let marble_metal: Material = Arc::new(Metal::from_texture(marble, 0.0));

    // hollow glass shell: the inner sphere's negative radius flips its normal
    objects.add(Box::new(Sphere::new(
        Point::new(0.0, 1.0, 0.0),
        1.0,
        Arc::clone(&glass),
    )));
    objects.add(Box::new(Sphere::new(Point::new(0.0, 1.0, 0.0), -0.9, glass)));
    objects.add(Box::new(Sphere::new(Point::new(-4.0, 1.0, 0.0), 1.0, blue)));
    objects.add(Box::new(Sphere::new(Point::new(4.0, 1.0, 0.0), 1.0, gold)));
    objects.add(Box::new(Sphere::new(
        Point::new(3.0, 0.7, 3.0),
        0.5,
        marble_metal,
    )));

    SceneData {
        world: Box::new(objects),
        camera: default_camera(Point::new(13.0, 2.0, 3.0), Point::new(0.0, 0.0, 0.0), 20.0),
        background: Background::SkyGradient,
    }
}

fn checkered_spheres() -> SceneData {
    let mut objects = HittableList::default();

    let checker1: Material = Arc::new(Lambertian::from_texture(Arc::new(Checker::from_colors(
        random_vec(0.3, 0.8),
        Color::zeros(),
        2.0,
    ))));
    let checker2: Material = Arc::new(Lambertian::from_texture(Arc::new(Checker::from_colors(
        random_vec(0.3, 0.8),
        Color::zeros(),
        20.0,
    ))));

    objects.add(Box::new(Sphere::new(
        Point::new(0.0, -10.0, 0.0),
        10.0,
        checker1,
    )));
    objects.add(Box::new(Sphere::new(
        Point::new(0.0, 10.0, 0.0),
        10.0,
        checker2,
    )));

    SceneData {
        world: Box::new(objects),
        camera: default_camera(Point::new(13.0, 2.0, 3.0), Point::new(0.0, 0.0, 0.0), 20.0),
        background: Background::SkyGradient,
    }
}

fn perlin_spheres() -> SceneData {
    let mut objects = HittableList::default();

    let plain: Texture = Arc::new(Noise::new(5.0));
    let marble_red: Texture = Arc::new(Noise::with_albedo(hex_to_color("#cf6a5d"), 3.0, true));
    let marble_green: Texture = Arc::new(Noise::with_albedo(hex_to_color("#7fcf5d"), 12.0, true));
    let checker: Texture = Arc::new(Checker::from_colors(
        hex_to_color("#2c2c2c"),
        hex_to_color("#4a4a4a"),
        2.0,
    ));

    objects.add(Box::new(Sphere::new(
        Point::new(0.0, -1000.0, 0.0),
        1000.0,
        Arc::new(Lambertian::from_texture(checker)),
    )));
    objects.add(Box::new(Sphere::new(
        Point::new(0.0, 2.0, 0.0),
        2.0,
        Arc::new(Lambertian::from_texture(plain)),
    )));
    objects.add(Box::new(Sphere::new(
        Point::new(-5.0, 4.3, -1.0),
        1.1,
        Arc::new(Lambertian::from_texture(marble_red)),
    )));
    objects.add(Box::new(Sphere::new(
        Point::new(4.0, 1.2, 1.0),
        1.3,
        Arc::new(Lambertian::from_texture(marble_green)),
    )));

    SceneData {
        world: Box::new(objects),
        camera: default_camera(Point::new(13.0, 2.0, 3.0), Point::new(0.0, 2.0, 0.0), 30.0),
        background: Background::SkyGradient,
    }
}

fn earth() -> SceneData {
    let mut objects = HittableList::default();

    let earth_texture: Texture = Arc::new(ImageTexture::open("textures/earthmap.jpg"));
    objects.add(Box::new(Sphere::new(
        Point::new(0.0, 0.0, 0.0),
        2.0,
        Arc::new(Lambertian::from_texture(earth_texture)),
    )));

    let moon_texture: Texture = Arc::new(ImageTexture::open("textures/moonmap.jpg"));
    objects.add(Box::new(Sphere::new(
        Point::new(2.0, 1.5, -3.2),
        0.5,
        Arc::new(Lambertian::from_texture(moon_texture)),
    )));

    SceneData {
        world: Box::new(objects),
        camera: default_camera(Point::new(13.0, 2.0, 3.0), Point::new(0.0, 0.0, 0.0), 20.0),
        background: Background::SkyGradient,
    }
}

fn lights() -> SceneData {
    let mut objects = HittableList::default();

    // ground
    let checker: Texture = Arc::new(Checker::from_colors(
        hex_to_color("#611c80"),
        hex_to_color("#9c4ebf"),
        1.5,
    ));
    objects.add(Box::new(Sphere::new(
        Point::new(0.0, -1000.0, 0.0),
        1000.0,
        Arc::new(Lambertian::from_texture(checker)),
    )));

    let perlin: Texture = Arc::new(Noise::new(5.0));
    objects.add(Box::new(Sphere::new(
        Point::new(-1.0, 2.0, -2.5),
        2.0,
        Arc::new(Lambertian::from_texture(perlin)),
    )));

    let box_size = 2.0;
    let metal: Material = Arc::new(Metal::new(Color::new(0.7, 0.7, 0.7), 0.2));
    let cuboid: HittableObj = Box::new(Cuboid::new(
        Point::new(0.0, 0.0, 0.0),
        Point::new(box_size, box_size, box_size),
        Arc::clone(&metal),
    ));
    let cuboid: HittableObj = Box::new(Rotate::new(cuboid, Axis::Y, 25.0));
    objects.add(Box::new(Translate::new(cuboid, Vec3::new(1.0, 0.2, 1.0))));

    objects.add(Box::new(Sphere::new(
        Point::new(3.5, 1.0, -1.0),
        0.5,
        lambertian(Color::new(0.65, 0.05, 0.05)),
    )));

    // lights
    let white: Material = Arc::new(DiffuseLight::new(Color::new(1.0, 1.0, 1.0)));
    let blue: Material = Arc::new(DiffuseLight::new(hex_to_color("#5ec1ff")));
    let pink: Material = Arc::new(DiffuseLight::new(hex_to_color("#ff5ef2")));

    objects.add(Box::new(XzRectangle::new(-4.0, 4.0, -4.0, 4.0, 5.0, white)));

    let right_light: HittableObj = Box::new(XyRectangle::new(-2.0, 2.0, 0.0, 3.0, 0.0, blue));
    let right_light: HittableObj = Box::new(Rotate::new(right_light, Axis::Y, -40.0));
    objects.add(Box::new(Translate::new(
        right_light,
        Vec3::new(4.0, 0.5, -4.0),
    )));

    let left_light: HittableObj = Box::new(XyRectangle::new(-2.0, 2.0, 0.0, 3.0, 0.0, pink));
    let left_light: HittableObj = Box::new(Rotate::new(left_light, Axis::Y, 10.0));
    objects.add(Box::new(Translate::new(
        left_light,
        Vec3::new(3.0, 0.5, 4.0),
    )));

    SceneData {
        world: Box::new(objects),
        camera: default_camera(Point::new(14.0, 4.0, 6.0), Point::new(0.0, 2.0, 0.0), 30.0),
        background: Background::Solid(Color::new(0.02, 0.02, 0.02)),
    }
}

fn cornell_smoke() -> SceneData {
    let mut objects = HittableList::default();

    let red = lambertian(Color::new(0.65, 0.05, 0.05));
    let white = lambertian(Color::new(0.73, 0.73, 0.73));
    let green = lambertian(Color::new(0.12, 0.45, 0.15));
    let light: Material = Arc::new(DiffuseLight::new(Color::new(7.0, 7.0, 7.0)));

    objects.add(Box::new(YzRectangle::new(0.0, 555.0, 0.0, 555.0, 555.0, green)));
    objects.add(Box::new(YzRectangle::new(0.0, 555.0, 0.0, 555.0, 0.0, red)));
    objects.add(Box::new(XzRectangle::new(
        113.0, 443.0, 127.0, 432.0, 554.0, light,
    )));
    objects.add(Box::new(XzRectangle::new(
        0.0,
        555.0,
        0.0,
        555.0,
        0.0,
        Arc::clone(&white),
    )));
    objects.add(Box::new(XzRectangle::new(
        0.0,
        555.0,
        0.0,
        555.0,
        555.0,
        Arc::clone(&white),
    )));
    objects.add(Box::new(XyRectangle::new(
        0.0,
        555.0,
        0.0,
        555.0,
        555.0,
        Arc::clone(&white),
    )));

    let tall: HittableObj = Box::new(Cuboid::new(
        Point::new(0.0, 0.0, 0.0),
        Point::new(165.0, 330.0, 165.0),
        Arc::clone(&white),
    ));
    let tall: HittableObj = Box::new(Rotate::new(tall, Axis::Y, 15.0));
    let tall: HittableObj = Box::new(Translate::new(tall, Vec3::new(265.0, 0.0, 295.0)));
    objects.add(Box::new(ConstantMedium::from_color(
        tall,
        0.01,
        Color::zeros(),
    )));

    let short: HittableObj = Box::new(Cuboid::new(
        Point::new(0.0, 0.0, 0.0),
        Point::new(165.0, 165.0, 165.0),
        white,
    ));
    let short: HittableObj = Box::new(Rotate::new(short, Axis::Y, -18.0));
    let short: HittableObj = Box::new(Translate::new(short, Vec3::new(130.0, 0.0, 65.0)));
    objects.add(Box::new(ConstantMedium::from_color(
        short,
        0.01,
        Color::new(1.0, 1.0, 1.0),
    )));

    let mut camera = default_camera(
        Point::new(278.0, 278.0, -800.0),
        Point::new(278.0, 278.0, 0.0),
        40.0,
    );
    camera.focus_distance = 800.0;

    SceneData {
        world: Box::new(objects),
        camera,
        background: Background::Solid(Color::zeros()),
    }
}

fn rotations() -> SceneData {
    let mut objects = HittableList::default();

    // mirror-ish ground
    objects.add(Box::new(XzRectangle::new(
        -1000.0,
        1000.0,
        -1000.0,
        1000.0,
        0.0,
        Arc::new(Metal::new(hex_to_color("#cbbecf"), 0.95)),
    )));

    let size = 1.1;
    for (i, axis) in [Axis::X, Axis::Y, Axis::Z].into_iter().enumerate() {
        let marble: Texture = Arc::new(Noise::with_albedo(random_vec(0.4, 0.9), 3.0, true));
        let cube: HittableObj = Box::new(Cuboid::new(
            Point::new(-size, -size, -size),
            Point::new(size, size, size),
            Arc::new(Lambertian::from_texture(marble)),
        ));
        let cube: HittableObj = Box::new(Rotate::new(cube, axis, 30.0));
        objects.add(Box::new(Translate::new(
            cube,
            Vec3::new(-5.0 + 5.0 * i as f64, 2.0, 2.3),
        )));
    }

    SceneData {
        world: Box::new(objects),
        camera: default_camera(Point::new(0.0, 6.0, 18.0), Point::new(0.0, 2.0, 0.0), 35.0),
        background: Background::SkyGradient,
    }
}

fn random_spheres() -> Result<SceneData, BvhError> {
    let mut objects = HittableList::default();

    let ground: Material = Arc::new(Lambertian::from_texture(Arc::new(Checker::from_colors(
        Color::new(0.2, 0.3, 0.1),
        Color::new(0.9, 0.9, 0.9),
        10.0,
    ))));
    objects.add(Box::new(Sphere::new(
        Point::new(0.0, -1000.0, 0.0),
        1000.0,
        ground,
    )));

    let mut spheres = HittableList::default();
    for a in -7..7 {
        for b in -7..7 {
            let center = Point::new(
                a as f64 + 0.7 * random::random_f64(),
                0.2,
                b as f64 + 0.7 * random::random_f64(),
            );
            if (center - Point::new(4.0, 0.2, 0.0)).norm() <= 0.9 {
                continue;
            }

            let choose_mat = random::random_f64();
            if choose_mat < 0.6 {
                // diffuse, drifting upward over the shutter window
                let albedo = random_vec(0.1, 0.9);
                let final_center = center + Vec3::new(0.0, random::random_range(0.0, 0.4), 0.0);
                spheres.add(Box::new(MovingSphere::new(
                    center,
                    final_center,
                    0.0,
                    1.0,
                    0.2,
                    lambertian(albedo),
                )));
            } else if choose_mat < 0.8 {
                // metal
                let albedo = random_vec(0.5, 1.0);
                let fuzz = random::random_range(0.0, 0.3);
                spheres.add(Box::new(Sphere::new(
                    center,
                    0.2,
                    Arc::new(Metal::new(albedo, fuzz)),
                )));
            } else {
                // glass
                let albedo = random_vec(0.5, 1.0);
                spheres.add(Box::new(Sphere::new(
                    center,
                    0.2,
                    Arc::new(Dielectric::tinted(1.5, albedo)),
                )));
            }
        }
    }
    objects.add(Box::new(Bvh::new(spheres, 0.0, 1.0)?));

    objects.add(Box::new(Sphere::new(
        Point::new(0.0, 1.0, 0.0),
        1.0,
        Arc::new(Dielectric::new(1.5)),
    )));
    objects.add(Box::new(Sphere::new(
        Point::new(-4.0, 1.0, 0.0),
        1.0,
        lambertian(Color::new(0.4, 0.2, 0.1)),
    )));
    objects.add(Box::new(Sphere::new(
        Point::new(4.0, 1.0, 0.0),
        1.0,
        Arc::new(Metal::new(Color::new(0.7, 0.6, 0.5), 0.0)),
    )));

    let mut camera = default_camera(Point::new(13.0, 2.0, 3.0), Point::new(0.0, 0.0, 0.0), 20.0);
    camera.aperture = 0.1;

    Ok(SceneData {
        world: Box::new(objects),
        camera,
        background: Background::SkyGradient,
    })
}

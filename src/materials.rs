//! Implementation of materials

use std::sync::Arc;

use crate::{
    objects::HitRecord,
    random,
    textures::{SolidColor, Texture},
    utils, Color, Point, Ray,
};

/// Material
///
/// `try_scatter` returning `None` means the ray was absorbed; only emitters
/// override `emitted`.
pub trait Scatterable {
    fn try_scatter(&self, ray_in: &Ray, hit_record: &HitRecord) -> Option<ScatterResult>;

    fn emitted(&self, _u: f64, _v: f64, _p: &Point) -> Color {
        Color::zeros()
    }
}

/// Scatter Result
#[derive(Debug)]
pub struct ScatterResult {
    /// Attenuation Color
    pub attenuation: Color,
    /// Resulting Scattered Ray
    pub scattered: Ray,
}

/// Lambertian Scatterer
pub struct Lambertian {
    albedo: Texture,
}
impl Lambertian {
    pub fn new(albedo: Color) -> Self {
        Self {
            albedo: Arc::new(SolidColor::new(albedo)),
        }
    }

    pub fn from_texture(texture: Texture) -> Self {
        Self { albedo: texture }
    }
}
impl Scatterable for Lambertian {
    fn try_scatter(&self, ray_in: &Ray, hit_record: &HitRecord) -> Option<ScatterResult> {
        let mut scatter_direction = hit_record.normal + utils::random_in_unit_sphere();

        // Protect against the normal and the random sample being exact opposites
        if utils::near_zero(&scatter_direction) {
            scatter_direction = hit_record.normal;
        }
        let scattered = Ray::new(hit_record.p, scatter_direction, ray_in.time);
        let attenuation = self.albedo.value(hit_record.u, hit_record.v, &hit_record.p);
        Some(ScatterResult {
            attenuation,
            scattered,
        })
    }
}

/// Metal Scatterer
pub struct Metal {
    albedo: Texture,
    fuzz: f64,
}
impl Metal {
    pub fn new(albedo: Color, fuzz: f64) -> Self {
        Self::from_texture(Arc::new(SolidColor::new(albedo)), fuzz)
    }

    pub fn from_texture(albedo: Texture, fuzz: f64) -> Self {
        Self {
            albedo,
            fuzz: fuzz.min(1.0),
        }
    }
}
impl Scatterable for Metal {
    fn try_scatter(&self, ray_in: &Ray, hit_record: &HitRecord) -> Option<ScatterResult> {
        let reflected = utils::reflect(&ray_in.dir.normalize(), &hit_record.normal);
        let scattered = Ray::new(
            hit_record.p,
            reflected + self.fuzz * utils::random_in_unit_sphere(),
            ray_in.time,
        );
        // A fuzzed reflection that dips below the surface is absorbed
        if scattered.dir.dot(&hit_record.normal) > 0.0 {
            let attenuation = self.albedo.value(hit_record.u, hit_record.v, &hit_record.p);
            Some(ScatterResult {
                attenuation,
                scattered,
            })
        } else {
            None
        }
    }
}

/// A Dielectric is a refractive material, such as glass
///
/// The albedo tint defaults to white; colored glass is supported.
pub struct Dielectric {
    ir: f64,
    albedo: Color,
}
impl Dielectric {
    pub fn new(ir: f64) -> Self {
        Self {
            ir,
            albedo: Color::new(1.0, 1.0, 1.0),
        }
    }

    pub fn tinted(ir: f64, albedo: Color) -> Self {
        Self { ir, albedo }
    }

    fn reflectance(cosine: f64, ref_idx: f64) -> f64 {
        // Use Schlick's approximation for reflectance
        let r0 = ((1.0 - ref_idx) / (1.0 + ref_idx)).powi(2);
        r0 + (1.0 - r0) * (1.0 - cosine).powi(5)
    }
}
impl Scatterable for Dielectric {
    fn try_scatter(&self, ray_in: &Ray, hit_record: &HitRecord) -> Option<ScatterResult> {
        let refraction_ratio = if hit_record.front_face {
            1.0 / self.ir
        } else {
            self.ir
        };

        let unit_direction = ray_in.dir.normalize();
        let cos_theta = (-unit_direction).dot(&hit_record.normal).min(1.0);
        let sin_theta = (1.0 - cos_theta.powi(2)).sqrt();

        // Total internal reflection leaves no choice; otherwise Schlick's
        // reflectance decides stochastically
        let cannot_refract = refraction_ratio * sin_theta > 1.0;
        let direction = if cannot_refract
            || Self::reflectance(cos_theta, refraction_ratio) > random::random_f64()
        {
            utils::reflect(&unit_direction, &hit_record.normal)
        } else {
            utils::refract(&unit_direction, &hit_record.normal, refraction_ratio)
        };

        let scattered = Ray::new(hit_record.p, direction, ray_in.time);
        Some(ScatterResult {
            attenuation: self.albedo,
            scattered,
        })
    }
}

/// A pure emitter: never scatters, only contributes its texture's value
pub struct DiffuseLight {
    emit: Texture,
}
impl DiffuseLight {
    pub fn new(color: Color) -> Self {
        Self {
            emit: Arc::new(SolidColor::new(color)),
        }
    }

    pub fn from_texture(texture: Texture) -> Self {
        Self { emit: texture }
    }
}
impl Scatterable for DiffuseLight {
    fn try_scatter(&self, _ray_in: &Ray, _hit_record: &HitRecord) -> Option<ScatterResult> {
        None
    }

    fn emitted(&self, u: f64, v: f64, p: &Point) -> Color {
        self.emit.value(u, v, p)
    }
}

/// Phase function for constant-density media: scatters uniformly in all
/// directions
pub struct Isotropic {
    albedo: Texture,
}
impl Isotropic {
    pub fn new(color: Color) -> Self {
        Self {
            albedo: Arc::new(SolidColor::new(color)),
        }
    }

    pub fn from_texture(texture: Texture) -> Self {
        Self { albedo: texture }
    }
}
impl Scatterable for Isotropic {
    fn try_scatter(&self, ray_in: &Ray, hit_record: &HitRecord) -> Option<ScatterResult> {
        let scattered = Ray::new(hit_record.p, utils::random_in_unit_sphere(), ray_in.time);
        let attenuation = self.albedo.value(hit_record.u, hit_record.v, &hit_record.p);
        Some(ScatterResult {
            attenuation,
            scattered,
        })
    }
}

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Surface reflectance descriptor used by the Phong pipeline.
///
/// Colors are conventionally in `[0, 1]` but are not clamped. A material is
/// immutable once built; the catalog owns every instance for the lifetime of
/// the viewer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Material {
    ambient: Vec3,
    diffuse: Vec3,
    specular: Vec3,
    shininess: f32,
}

impl Material {
    pub fn new(ambient: Vec3, diffuse: Vec3, specular: Vec3, shininess: f32) -> Self {
        Self {
            ambient,
            diffuse,
            specular,
            shininess,
        }
    }

    pub fn ambient(&self) -> Vec3 {
        self.ambient
    }

    pub fn diffuse(&self) -> Vec3 {
        self.diffuse
    }

    pub fn specular(&self) -> Vec3 {
        self.specular
    }

    pub fn shininess(&self) -> f32 {
        self.shininess
    }
}

/// The three materials the viewer cycles through when no catalog is given:
/// a blue body with green highlights, a dull lavender, and a warm bright one.
pub fn default_materials() -> Vec<Material> {
    vec![
        Material::new(
            Vec3::splat(0.2),
            Vec3::new(0.0, 0.0, 1.0),
            Vec3::new(0.0, 1.0, 0.0),
            200.0,
        ),
        Material::new(
            Vec3::ZERO,
            Vec3::new(0.5, 0.5, 0.7),
            Vec3::splat(0.1),
            25.0,
        ),
        Material::new(
            Vec3::splat(0.2),
            Vec3::new(0.8, 0.7, 0.7),
            Vec3::new(1.0, 0.9, 0.8),
            200.0,
        ),
    ]
}

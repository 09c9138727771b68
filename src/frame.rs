use glam::{Mat4, Vec3};

use crate::light::Light;
use crate::scene::{SceneState, ShadingMode};

/// Everything the render driver binds for a single frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameParameters {
    pub projection: Mat4,
    pub view: Mat4,
    pub cull_back_faces: bool,
    pub shading: ShadingParameters,
}

/// Pipeline-specific part of [`FrameParameters`].
///
/// The flat pipeline has no lighting uniforms, so its variant carries no
/// scene lighting state at all.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ShadingParameters {
    Phong(PhongParameters),
    Flat,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PhongParameters {
    pub primary_light: LightParams,
    pub secondary_light: LightParams,
    pub ambient: Vec3,
    pub diffuse: Vec3,
    pub specular: Vec3,
    pub shininess: f32,
}

/// World-space light state consumed by the Phong uniform block.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LightParams {
    pub position: Vec3,
    pub intensity: f32,
}

impl From<&Light> for LightParams {
    fn from(light: &Light) -> Self {
        Self {
            position: light.position(),
            intensity: light.intensity(),
        }
    }
}

impl FrameParameters {
    /// Projects the scene selection and camera matrices into frame uniforms.
    ///
    /// Panics if the scene's indices are out of range or both light slots
    /// name the same light, which can only happen through a bug in the scene
    /// handlers.
    pub fn build(scene: &SceneState, projection: Mat4, view: Mat4) -> Self {
        let shading = match scene.shading_mode() {
            ShadingMode::Flat => ShadingParameters::Flat,
            ShadingMode::Phong => {
                assert_ne!(
                    scene.primary_light_index(),
                    scene.secondary_light_index(),
                    "light slots must reference distinct lights"
                );
                let material = scene.active_material();
                ShadingParameters::Phong(PhongParameters {
                    primary_light: scene.primary_light().into(),
                    secondary_light: scene.secondary_light().into(),
                    ambient: material.ambient(),
                    diffuse: material.diffuse(),
                    specular: material.specular(),
                    shininess: material.shininess(),
                })
            }
        };
        Self {
            projection,
            view,
            cull_back_faces: scene.cull_back_faces(),
            shading,
        }
    }

    pub fn shading_mode(&self) -> ShadingMode {
        match self.shading {
            ShadingParameters::Phong(_) => ShadingMode::Phong,
            ShadingParameters::Flat => ShadingMode::Flat,
        }
    }
}

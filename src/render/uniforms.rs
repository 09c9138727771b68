use bytemuck::{Pod, Zeroable};

use crate::frame::{FrameParameters, ShadingParameters};

/// Uniform block of the Phong pipeline. Each light packs its world position
/// in `xyz` and its intensity in `w`; the specular color carries the
/// shininess exponent in `w`.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct PhongUniform {
    pub projection: [[f32; 4]; 4],
    pub model_view: [[f32; 4]; 4],
    pub primary_light: [f32; 4],
    pub secondary_light: [f32; 4],
    pub ambient: [f32; 4],
    pub diffuse: [f32; 4],
    pub specular: [f32; 4],
}

/// Uniform block of the flat pipeline: the camera transforms only.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct FlatUniform {
    pub projection: [[f32; 4]; 4],
    pub model_view: [[f32; 4]; 4],
}

/// Uniform data for whichever pipeline the frame selected.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FrameUniform {
    Phong(PhongUniform),
    Flat(FlatUniform),
}

impl FrameUniform {
    /// Packs frame parameters for upload. The mesh is drawn with an identity
    /// model matrix, so the model-view matrix is the camera view.
    pub fn from_frame(frame: &FrameParameters) -> Self {
        let projection = frame.projection.to_cols_array_2d();
        let model_view = frame.view.to_cols_array_2d();
        match &frame.shading {
            ShadingParameters::Phong(phong) => Self::Phong(PhongUniform {
                projection,
                model_view,
                primary_light: phong
                    .primary_light
                    .position
                    .extend(phong.primary_light.intensity)
                    .into(),
                secondary_light: phong
                    .secondary_light
                    .position
                    .extend(phong.secondary_light.intensity)
                    .into(),
                ambient: phong.ambient.extend(1.0).into(),
                diffuse: phong.diffuse.extend(1.0).into(),
                specular: phong.specular.extend(phong.shininess).into(),
            }),
            ShadingParameters::Flat => Self::Flat(FlatUniform {
                projection,
                model_view,
            }),
        }
    }

    pub fn as_bytes(&self) -> &[u8] {
        match self {
            Self::Phong(uniform) => bytemuck::bytes_of(uniform),
            Self::Flat(uniform) => bytemuck::bytes_of(uniform),
        }
    }
}

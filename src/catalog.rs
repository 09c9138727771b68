use anyhow::{anyhow, Context, Result};
use glam::Vec3;
use roxmltree::{Document, Node};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::light::{default_lights, Light};
use crate::material::{default_materials, Material};
use crate::scene::SceneState;

/// Reasons a catalog cannot back a [`SceneState`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CatalogError {
    #[error("catalog must define at least one material")]
    EmptyMaterials,
    #[error("catalog must define at least two lights, found {found}")]
    TooFewLights { found: usize },
    #[error("material {index} has non-positive shininess {value}")]
    InvalidShininess { index: usize, value: f32 },
    #[error("material index {index} is out of range for {len} materials")]
    MaterialIndexOutOfRange { index: usize, len: usize },
    #[error("light index {index} is out of range for {len} lights")]
    LightIndexOutOfRange { index: usize, len: usize },
    #[error("primary and secondary light slots both reference light {index}")]
    SharedLightSlot { index: usize },
}

/// Ordered materials and lights the viewer cycles through.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    pub materials: Vec<Material>,
    pub lights: Vec<Light>,
}

impl Default for Catalog {
    fn default() -> Self {
        Self {
            materials: default_materials(),
            lights: default_lights(),
        }
    }
}

impl Catalog {
    /// Parses a `<catalog>` document. Element order is cycling order.
    pub fn from_xml(xml: &str) -> Result<Self> {
        let document = Document::parse(xml).context("invalid catalog XML")?;
        let mut materials = Vec::new();
        let mut lights = Vec::new();

        for node in document.descendants().filter(|n| n.has_tag_name("material")) {
            let index = materials.len();
            let ambient = parse_vec3(optional_text(&node, "ambient"), Vec3::ZERO)
                .with_context(|| format!("material {index}: bad <ambient>"))?;
            let diffuse = parse_vec3(optional_text(&node, "diffuse"), Vec3::ZERO)
                .with_context(|| format!("material {index}: bad <diffuse>"))?;
            let specular = parse_vec3(optional_text(&node, "specular"), Vec3::ZERO)
                .with_context(|| format!("material {index}: bad <specular>"))?;
            let shininess = parse_f32(&required_text(&node, "shininess")?)
                .with_context(|| format!("material {index}: bad <shininess>"))?;
            if shininess.is_nan() || shininess <= 0.0 {
                return Err(CatalogError::InvalidShininess {
                    index,
                    value: shininess,
                }
                .into());
            }
            materials.push(Material::new(ambient, diffuse, specular, shininess));
        }

        for node in document.descendants().filter(|n| n.has_tag_name("light")) {
            let index = lights.len();
            let position = parse_vec3(optional_text(&node, "position"), Vec3::ZERO)
                .with_context(|| format!("light {index}: bad <position>"))?;
            let intensity = match optional_text(&node, "intensity") {
                Some(text) => parse_f32(&text)
                    .with_context(|| format!("light {index}: bad <intensity>"))?,
                None => 1.0,
            };
            lights.push(Light::new(position, intensity));
        }

        Ok(Self { materials, lights })
    }

    /// Validates the catalog and builds the initial selection state.
    pub fn into_scene(self) -> Result<SceneState, CatalogError> {
        SceneState::new(self.materials, self.lights)
    }
}

fn required_text(node: &Node<'_, '_>, tag: &str) -> Result<String> {
    optional_text(node, tag).ok_or_else(|| anyhow!("<{tag}> tag is missing"))
}

fn optional_text(node: &Node<'_, '_>, tag: &str) -> Option<String> {
    node.children()
        .find(|child| child.has_tag_name(tag))
        .and_then(|child| child.text())
        .map(str::trim)
        .filter(|text| !text.is_empty())
        .map(|text| text.to_string())
}

fn parse_vec3(value: Option<String>, default: Vec3) -> Result<Vec3> {
    let Some(value) = value else {
        return Ok(default);
    };
    let components = value
        .split_whitespace()
        .map(parse_f32)
        .collect::<Result<Vec<_>>>()?;
    match components.as_slice() {
        [x, y, z] => Ok(Vec3::new(*x, *y, *z)),
        other => Err(anyhow!("expected 3 components, found {}", other.len())),
    }
}

fn parse_f32(value: &str) -> Result<f32> {
    value
        .trim()
        .parse::<f32>()
        .map_err(|err| anyhow!("failed to parse float {value:?}: {err}"))
}

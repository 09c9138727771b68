//! Interactive shading viewer.
//!
//! The crate is built around [`SceneState`], which owns the material and
//! light catalogs plus the user's current selection, and
//! [`FrameParameters::build`], which turns that state and the camera into the
//! uniforms of one frame. Windowing lives in the binary; everything here can
//! be driven headless.

pub mod app;
pub mod camera;
pub mod catalog;
pub mod frame;
pub mod input;
pub mod light;
pub mod material;
pub mod obj;
pub mod render;
pub mod scene;

pub use app::{Modifiers, Viewer};
pub use camera::{DragMode, OrbitCamera};
pub use catalog::{Catalog, CatalogError};
pub use frame::{FrameParameters, LightParams, PhongParameters, ShadingParameters};
pub use input::{KeyBindings, KeyCode, MouseButton, NamedKey};
pub use light::{Light, LIGHT_NUDGE_STEP};
pub use material::Material;
pub use obj::{load_obj_from_str, Mesh};
pub use render::Renderer;
pub use scene::{Axis, Direction, SceneEvent, SceneState, ShadingMode};

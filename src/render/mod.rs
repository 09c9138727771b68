mod renderer;
mod shaders;
pub mod uniforms;

pub use renderer::Renderer;
pub use uniforms::{FlatUniform, FrameUniform, PhongUniform};

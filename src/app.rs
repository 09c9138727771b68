use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use glam::Vec2;
use log::{debug, error, info};

use crate::camera::OrbitCamera;
use crate::catalog::Catalog;
use crate::frame::{FrameParameters, ShadingParameters};
use crate::input::{KeyBindings, KeyCode, MouseButton};
use crate::obj::{load_obj_file, Mesh};
use crate::scene::SceneState;

/// Distance from the origin the camera starts at.
pub const INITIAL_CAMERA_DISTANCE: f32 = 2.0;

/// Everything the event loop mutates: the scene selection, the camera and
/// the pointer state that drives it.
#[derive(Debug, Clone)]
pub struct Viewer {
    scene: SceneState,
    camera: OrbitCamera,
    bindings: KeyBindings,
    cursor: Vec2,
    dragging: bool,
    modifiers: Modifiers,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
}

impl Viewer {
    pub fn new(scene: SceneState, bindings: KeyBindings) -> Self {
        let mut camera = OrbitCamera::new();
        camera.set_init_distance(INITIAL_CAMERA_DISTANCE);
        Self {
            scene,
            camera,
            bindings,
            cursor: Vec2::ZERO,
            dragging: false,
            modifiers: Modifiers::default(),
        }
    }

    pub fn scene(&self) -> &SceneState {
        &self.scene
    }

    pub fn camera(&self) -> &OrbitCamera {
        &self.camera
    }

    /// Applies the event bound to `key`, if any. Returns whether a binding
    /// existed.
    pub fn key_pressed(&mut self, key: KeyCode) -> bool {
        match self.bindings.event_for(key) {
            Some(event) => {
                self.scene.apply(event);
                true
            }
            None => false,
        }
    }

    /// Feeds every character of `keys` through the bindings, returning how
    /// many were bound.
    pub fn replay_keys(&mut self, keys: &str) -> usize {
        let events: Vec<_> = self.bindings.events_for_text(keys).collect();
        for event in &events {
            self.scene.apply(*event);
        }
        debug!("replayed {} bound key(s) from {keys:?}", events.len());
        events.len()
    }

    pub fn set_modifiers(&mut self, modifiers: Modifiers) {
        self.modifiers = modifiers;
    }

    pub fn mouse_button(&mut self, button: MouseButton, pressed: bool) {
        if button != MouseButton::LEFT {
            return;
        }
        self.dragging = pressed;
        if pressed {
            let Modifiers { shift, ctrl, alt } = self.modifiers;
            self.camera.mouse_clicked(self.cursor, shift, ctrl, alt);
        }
    }

    pub fn cursor_moved(&mut self, position: Vec2) {
        self.cursor = position;
        if self.dragging {
            self.camera.mouse_moved(position);
        }
    }

    /// Parameters for the next frame at the given surface aspect ratio.
    pub fn frame(&mut self, aspect: f32) -> FrameParameters {
        self.camera.set_aspect(aspect);
        FrameParameters::build(
            &self.scene,
            self.camera.projection_matrix(),
            self.camera.view_matrix(),
        )
    }
}

/// Reads the catalog at `path`, or the built-in one when no path is given.
pub fn load_catalog(path: Option<&Path>) -> Result<Catalog> {
    let Some(path) = path else {
        return Ok(Catalog::default());
    };
    let xml = fs::read_to_string(path)
        .with_context(|| format!("unable to read catalog {}", path.display()))?;
    Catalog::from_xml(&xml).with_context(|| format!("failed to parse catalog {}", path.display()))
}

/// Loads and normalizes the model, falling back to a cube when the file is
/// missing or malformed.
pub fn load_mesh(path: &Path) -> Mesh {
    match load_obj_file(path) {
        Ok(mut mesh) => {
            mesh.fit_to_unit_box();
            info!(
                "loaded {} ({} vertices, {} triangles)",
                path.display(),
                mesh.vertex_count(),
                mesh.triangle_count()
            );
            mesh
        }
        Err(err) => {
            error!("failed to load mesh {}: {err:?}; using a cube", path.display());
            Mesh::cube()
        }
    }
}

/// Human-readable dump of the selection state and the Phong inputs it
/// currently produces.
pub fn state_summary(scene: &SceneState) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "Scene state: material={} primary_light={} secondary_light={} shading={} cull={}",
        scene.material_index(),
        scene.primary_light_index(),
        scene.secondary_light_index(),
        scene.shading_mode().name(),
        if scene.cull_back_faces() { "back" } else { "none" },
    );
    for (index, light) in scene.lights().iter().enumerate() {
        let p = light.position();
        let _ = writeln!(
            out,
            " - light {index} pos=({:.2}, {:.2}, {:.2}) intensity={:.2}",
            p.x,
            p.y,
            p.z,
            light.intensity()
        );
    }
    let material = scene.active_material();
    let (ka, kd, ks) = (material.ambient(), material.diffuse(), material.specular());
    let _ = writeln!(
        out,
        " - material ka=({:.2}, {:.2}, {:.2}) kd=({:.2}, {:.2}, {:.2}) ks=({:.2}, {:.2}, {:.2}) s={:.1}",
        ka.x,
        ka.y,
        ka.z,
        kd.x,
        kd.y,
        kd.z,
        ks.x,
        ks.y,
        ks.z,
        material.shininess()
    );
    out
}

/// One-line description of what a frame will upload.
pub fn frame_summary(frame: &FrameParameters) -> String {
    match &frame.shading {
        ShadingParameters::Phong(phong) => format!(
            "Frame: phong primary=({:.2}, {:.2}, {:.2})@{:.2} secondary=({:.2}, {:.2}, {:.2})@{:.2}",
            phong.primary_light.position.x,
            phong.primary_light.position.y,
            phong.primary_light.position.z,
            phong.primary_light.intensity,
            phong.secondary_light.position.x,
            phong.secondary_light.position.y,
            phong.secondary_light.position.z,
            phong.secondary_light.intensity,
        ),
        ShadingParameters::Flat => "Frame: flat (matrices only)".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec3;

    use super::*;
    use crate::camera::DragMode;
    use crate::scene::ShadingMode;

    fn viewer() -> Viewer {
        Viewer::new(
            Catalog::default().into_scene().unwrap(),
            KeyBindings::default(),
        )
    }

    #[test]
    fn replayed_keys_drive_the_scene() {
        let mut viewer = viewer();
        let bound = viewer.replay_keys("mmmlXXq");
        assert_eq!(bound, 6);
        let scene = viewer.scene();
        assert_eq!(scene.material_index(), 2);
        assert_eq!(scene.primary_light_index(), 1);
        let moved = scene.lights()[1].position();
        assert!((moved - Vec3::new(-0.98, 1.0, 1.0)).length() < 1e-5);
    }

    #[test]
    fn unbound_key_is_ignored() {
        let mut viewer = viewer();
        assert!(!viewer.key_pressed(KeyCode::Character('z')));
        assert!(viewer.key_pressed(KeyCode::Character('S')));
        assert_eq!(viewer.scene().shading_mode(), ShadingMode::Flat);
    }

    #[test]
    fn only_left_drag_moves_the_camera() {
        let mut viewer = viewer();
        let before = viewer.camera().view_matrix();
        viewer.mouse_button(MouseButton::new(1), true);
        viewer.cursor_moved(Vec2::new(50.0, 0.0));
        assert_eq!(viewer.camera().view_matrix(), before);

        viewer.set_modifiers(Modifiers {
            shift: true,
            ..Modifiers::default()
        });
        viewer.mouse_button(MouseButton::LEFT, true);
        assert_eq!(viewer.camera().drag_mode(), DragMode::Pan);
        viewer.cursor_moved(Vec2::new(80.0, 20.0));
        assert_ne!(viewer.camera().view_matrix(), before);

        viewer.mouse_button(MouseButton::LEFT, false);
        let released = viewer.camera().view_matrix();
        viewer.cursor_moved(Vec2::new(0.0, 0.0));
        assert_eq!(viewer.camera().view_matrix(), released);
    }

    #[test]
    fn frame_uses_camera_matrices() {
        let mut viewer = viewer();
        let frame = viewer.frame(4.0 / 3.0);
        assert_eq!(frame.view, viewer.camera().view_matrix());
        assert_eq!(frame.projection, viewer.camera().projection_matrix());
    }

    #[test]
    fn summaries_describe_state() {
        let mut viewer = viewer();
        viewer.replay_keys("S");
        let text = state_summary(viewer.scene());
        assert!(text.contains("material=0 primary_light=0 secondary_light=1 shading=flat"));
        assert!(text.contains(" - light 0 pos=(1.00, 1.00, 1.00) intensity=0.80"));
        assert_eq!(frame_summary(&viewer.frame(1.0)), "Frame: flat (matrices only)");
    }

    #[test]
    fn missing_mesh_falls_back_to_cube() {
        let mesh = load_mesh(Path::new("/definitely/not/here.obj"));
        assert_eq!(mesh, Mesh::cube());
    }

    #[test]
    fn missing_catalog_path_is_an_error() {
        assert!(load_catalog(Some(Path::new("/definitely/not/here.xml"))).is_err());
        assert_eq!(load_catalog(None).unwrap(), Catalog::default());
    }
}

use glam::{Mat4, Vec2, Vec3};

const ROTATE_FACTOR: f32 = 0.01;
const PAN_FACTOR: f32 = 0.001;
const ZOOM_FACTOR: f32 = 0.005;

/// What a left-button drag does to the camera.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DragMode {
    #[default]
    Rotate,
    Pan,
    Zoom,
}

/// Mouse-driven camera orbiting the origin.
///
/// Rotation is stored as (yaw, pitch) in radians; translation holds the pan
/// offset in x/y and the negated viewing distance in z.
#[derive(Debug, Clone)]
pub struct OrbitCamera {
    aspect: f32,
    fovy: f32,
    znear: f32,
    zfar: f32,
    rotation: Vec2,
    translation: Vec3,
    mouse_prev: Vec2,
    mode: DragMode,
}

impl Default for OrbitCamera {
    fn default() -> Self {
        Self {
            aspect: 1.0,
            fovy: 45f32.to_radians(),
            znear: 0.1,
            zfar: 1000.0,
            rotation: Vec2::ZERO,
            translation: Vec3::new(0.0, 0.0, -5.0),
            mouse_prev: Vec2::ZERO,
            mode: DragMode::Rotate,
        }
    }
}

impl OrbitCamera {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_init_distance(&mut self, distance: f32) {
        self.translation.z = -distance.abs();
    }

    pub fn set_aspect(&mut self, aspect: f32) {
        self.aspect = aspect.max(0.01);
    }

    pub fn drag_mode(&self) -> DragMode {
        self.mode
    }

    /// Starts a drag at `position`. Shift pans and ctrl zooms; anything else
    /// rotates.
    pub fn mouse_clicked(&mut self, position: Vec2, shift: bool, ctrl: bool, _alt: bool) {
        self.mouse_prev = position;
        self.mode = if shift {
            DragMode::Pan
        } else if ctrl {
            DragMode::Zoom
        } else {
            DragMode::Rotate
        };
    }

    pub fn mouse_moved(&mut self, position: Vec2) {
        let delta = position - self.mouse_prev;
        match self.mode {
            DragMode::Rotate => self.rotation += ROTATE_FACTOR * delta,
            DragMode::Pan => {
                self.translation.x -= self.translation.z * PAN_FACTOR * delta.x;
                self.translation.y += self.translation.z * PAN_FACTOR * delta.y;
            }
            DragMode::Zoom => self.translation.z *= 1.0 - ZOOM_FACTOR * delta.y,
        }
        self.mouse_prev = position;
    }

    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fovy, self.aspect, self.znear, self.zfar)
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::from_translation(self.translation)
            * Mat4::from_rotation_x(self.rotation.y)
            * Mat4::from_rotation_y(self.rotation.x)
    }
}

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Distance a single nudge event moves the active light along one axis.
pub const LIGHT_NUDGE_STEP: f32 = 0.01;

/// Point light with a movable world-space position and a fixed intensity.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Light {
    position: Vec3,
    intensity: f32,
}

impl Light {
    pub fn new(position: Vec3, intensity: f32) -> Self {
        Self {
            position,
            intensity,
        }
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn intensity(&self) -> f32 {
        self.intensity
    }

    /// Moves the light by the given deltas. There is no bound on how far a
    /// light may drift from the scene.
    pub fn offset_position(&mut self, dx: f32, dy: f32, dz: f32) {
        self.position += Vec3::new(dx, dy, dz);
    }
}

/// The reference light rig: a strong key light to the right and a weak fill
/// light to the left, both above and in front of the model.
pub fn default_lights() -> Vec<Light> {
    vec![
        Light::new(Vec3::new(1.0, 1.0, 1.0), 0.8),
        Light::new(Vec3::new(-1.0, 1.0, 1.0), 0.2),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offset_accumulates_and_keeps_intensity() {
        let mut light = Light::new(Vec3::ZERO, 0.5);
        light.offset_position(0.25, -0.5, 0.0);
        light.offset_position(0.25, 0.0, 2.0);
        assert_eq!(light.position(), Vec3::new(0.5, -0.5, 2.0));
        assert_eq!(light.intensity(), 0.5);
    }

    #[test]
    fn offset_is_unbounded() {
        let mut light = Light::new(Vec3::ZERO, 1.0);
        light.offset_position(1.0e6, -1.0e6, 0.0);
        assert_eq!(light.position(), Vec3::new(1.0e6, -1.0e6, 0.0));
    }
}

use log::debug;
use serde::{Deserialize, Serialize};

use crate::catalog::CatalogError;
use crate::light::{Light, LIGHT_NUDGE_STEP};
use crate::material::Material;

/// Which pipeline draws the frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ShadingMode {
    /// Per-fragment lighting with the active material and both light slots.
    #[default]
    Phong,
    /// Simplified pipeline that ignores lights and materials entirely.
    Flat,
}

impl ShadingMode {
    pub fn name(self) -> &'static str {
        match self {
            Self::Phong => "phong",
            Self::Flat => "flat",
        }
    }
}

/// Axis along which the active light can be nudged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Axis {
    X,
    Y,
}

/// Direction of a nudge along its axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Negative,
    Positive,
}

impl Direction {
    pub fn factor(self) -> f32 {
        match self {
            Self::Negative => -1.0,
            Self::Positive => 1.0,
        }
    }
}

/// Discrete semantic input understood by [`SceneState::apply`].
///
/// Raw key codes never reach the scene; the windowing layer translates them
/// through [`crate::input::KeyBindings`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SceneEvent {
    CycleMaterialForward,
    CycleMaterialBackward,
    /// Make light 0 primary (and light 1 secondary).
    SelectLightSlot0,
    /// Make light 1 primary (and light 0 secondary).
    SelectLightSlot1,
    SelectLight(usize),
    SelectSecondaryLight(usize),
    NudgeLight { axis: Axis, direction: Direction },
    SetShadingMode(ShadingMode),
    ToggleCulling,
}

/// Mutable selection state of the viewer.
///
/// Holds the material and light catalogs together with the indices that pick
/// what the Phong pipeline sees. The catalogs never change length, every
/// index stays in range, and the primary and secondary light indices are
/// always distinct. Handlers touch disjoint fields, so material cycling never
/// affects light selection and vice versa.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "SavedScene")]
pub struct SceneState {
    materials: Vec<Material>,
    lights: Vec<Light>,
    material_index: usize,
    primary_light: usize,
    secondary_light: usize,
    shading_mode: ShadingMode,
    cull_back_faces: bool,
}

/// Serialized form of [`SceneState`], checked before it becomes one.
#[derive(Deserialize)]
struct SavedScene {
    materials: Vec<Material>,
    lights: Vec<Light>,
    material_index: usize,
    primary_light: usize,
    secondary_light: usize,
    shading_mode: ShadingMode,
    cull_back_faces: bool,
}

impl TryFrom<SavedScene> for SceneState {
    type Error = CatalogError;

    fn try_from(saved: SavedScene) -> Result<Self, Self::Error> {
        let mut state = Self::new(saved.materials, saved.lights)?;
        if saved.material_index >= state.materials.len() {
            return Err(CatalogError::MaterialIndexOutOfRange {
                index: saved.material_index,
                len: state.materials.len(),
            });
        }
        for index in [saved.primary_light, saved.secondary_light] {
            if index >= state.lights.len() {
                return Err(CatalogError::LightIndexOutOfRange {
                    index,
                    len: state.lights.len(),
                });
            }
        }
        if saved.primary_light == saved.secondary_light {
            return Err(CatalogError::SharedLightSlot {
                index: saved.primary_light,
            });
        }
        state.material_index = saved.material_index;
        state.primary_light = saved.primary_light;
        state.secondary_light = saved.secondary_light;
        state.shading_mode = saved.shading_mode;
        state.cull_back_faces = saved.cull_back_faces;
        Ok(state)
    }
}

impl SceneState {
    /// Builds the initial state: first material, light 0 primary, light 1
    /// secondary, Phong shading, culling off.
    pub fn new(materials: Vec<Material>, lights: Vec<Light>) -> Result<Self, CatalogError> {
        if materials.is_empty() {
            return Err(CatalogError::EmptyMaterials);
        }
        if lights.len() < 2 {
            return Err(CatalogError::TooFewLights {
                found: lights.len(),
            });
        }
        Ok(Self {
            materials,
            lights,
            material_index: 0,
            primary_light: 0,
            secondary_light: 1,
            shading_mode: ShadingMode::Phong,
            cull_back_faces: false,
        })
    }

    pub fn materials(&self) -> &[Material] {
        &self.materials
    }

    pub fn lights(&self) -> &[Light] {
        &self.lights
    }

    pub fn material_index(&self) -> usize {
        self.material_index
    }

    pub fn primary_light_index(&self) -> usize {
        self.primary_light
    }

    pub fn secondary_light_index(&self) -> usize {
        self.secondary_light
    }

    pub fn shading_mode(&self) -> ShadingMode {
        self.shading_mode
    }

    pub fn cull_back_faces(&self) -> bool {
        self.cull_back_faces
    }

    pub fn active_material(&self) -> &Material {
        &self.materials[self.material_index]
    }

    pub fn primary_light(&self) -> &Light {
        &self.lights[self.primary_light]
    }

    pub fn secondary_light(&self) -> &Light {
        &self.lights[self.secondary_light]
    }

    /// Dispatches a semantic event to its handler.
    pub fn apply(&mut self, event: SceneEvent) {
        debug!("applying {event:?}");
        match event {
            SceneEvent::CycleMaterialForward => self.advance_material(),
            SceneEvent::CycleMaterialBackward => self.retreat_material(),
            SceneEvent::SelectLightSlot0 => self.demote_to_primary_zero(),
            SceneEvent::SelectLightSlot1 => self.promote_secondary_to_primary(),
            SceneEvent::SelectLight(index) => self.select_light(index),
            SceneEvent::SelectSecondaryLight(index) => self.select_secondary_light(index),
            SceneEvent::NudgeLight { axis, direction } => {
                let step = LIGHT_NUDGE_STEP * direction.factor();
                match axis {
                    Axis::X => self.nudge_active_light(step, 0.0),
                    Axis::Y => self.nudge_active_light(0.0, step),
                }
            }
            SceneEvent::SetShadingMode(mode) => self.set_shading_mode(mode),
            SceneEvent::ToggleCulling => self.toggle_culling(),
        }
    }

    /// Steps to the next material, saturating at the last one.
    pub fn advance_material(&mut self) {
        if self.material_index + 1 < self.materials.len() {
            self.material_index += 1;
        } else {
            debug!("already at the last material");
        }
    }

    /// Steps to the previous material, saturating at the first one.
    pub fn retreat_material(&mut self) {
        if self.material_index > 0 {
            self.material_index -= 1;
        } else {
            debug!("already at the first material");
        }
    }

    /// Moves light 1 into the primary slot. No-op if it is already there.
    pub fn promote_secondary_to_primary(&mut self) {
        self.select_light(1);
    }

    /// Moves light 0 back into the primary slot. No-op if it is already there.
    pub fn demote_to_primary_zero(&mut self) {
        self.select_light(0);
    }

    /// Makes `index` the primary light. Selecting the current secondary swaps
    /// the two slots; selecting any other light leaves the secondary alone.
    pub fn select_light(&mut self, index: usize) {
        if index >= self.lights.len() {
            debug!("ignoring selection of missing light {index}");
        } else if index == self.primary_light {
            debug!("light {index} is already primary");
        } else if index == self.secondary_light {
            std::mem::swap(&mut self.primary_light, &mut self.secondary_light);
        } else {
            self.primary_light = index;
        }
    }

    /// Mirror of [`select_light`](Self::select_light) for the secondary slot.
    pub fn select_secondary_light(&mut self, index: usize) {
        if index >= self.lights.len() {
            debug!("ignoring selection of missing light {index}");
        } else if index == self.secondary_light {
            debug!("light {index} is already secondary");
        } else if index == self.primary_light {
            std::mem::swap(&mut self.primary_light, &mut self.secondary_light);
        } else {
            self.secondary_light = index;
        }
    }

    /// Offsets the primary light in the XY plane.
    pub fn nudge_active_light(&mut self, dx: f32, dy: f32) {
        self.lights[self.primary_light].offset_position(dx, dy, 0.0);
    }

    pub fn set_shading_mode(&mut self, mode: ShadingMode) {
        self.shading_mode = mode;
    }

    pub fn toggle_culling(&mut self) {
        self.cull_back_faces = !self.cull_back_faces;
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec3;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    use super::*;
    use crate::light::default_lights;
    use crate::material::default_materials;

    fn reference_state() -> SceneState {
        SceneState::new(default_materials(), default_lights()).unwrap()
    }

    fn random_event(rng: &mut StdRng, light_count: usize) -> SceneEvent {
        let axis = if rng.gen() { Axis::X } else { Axis::Y };
        let direction = if rng.gen() {
            Direction::Positive
        } else {
            Direction::Negative
        };
        match rng.gen_range(0..9) {
            0 => SceneEvent::CycleMaterialForward,
            1 => SceneEvent::CycleMaterialBackward,
            2 => SceneEvent::SelectLightSlot0,
            3 => SceneEvent::SelectLightSlot1,
            4 => SceneEvent::SelectLight(rng.gen_range(0..light_count + 2)),
            5 => SceneEvent::SelectSecondaryLight(rng.gen_range(0..light_count + 2)),
            6 => SceneEvent::NudgeLight { axis, direction },
            7 => SceneEvent::SetShadingMode(if rng.gen() {
                ShadingMode::Phong
            } else {
                ShadingMode::Flat
            }),
            _ => SceneEvent::ToggleCulling,
        }
    }

    #[test]
    fn starts_with_reference_defaults() {
        let state = reference_state();
        assert_eq!(state.material_index(), 0);
        assert_eq!(state.primary_light_index(), 0);
        assert_eq!(state.secondary_light_index(), 1);
        assert_eq!(state.shading_mode(), ShadingMode::Phong);
        assert!(!state.cull_back_faces());
    }

    #[test]
    fn rejects_catalogs_that_break_invariants() {
        assert!(matches!(
            SceneState::new(Vec::new(), default_lights()),
            Err(CatalogError::EmptyMaterials)
        ));
        let one_light = vec![default_lights()[0]];
        assert!(matches!(
            SceneState::new(default_materials(), one_light),
            Err(CatalogError::TooFewLights { found: 1 })
        ));
    }

    #[test]
    fn material_cycling_saturates_at_both_ends() {
        let mut state = reference_state();
        for _ in 0..3 {
            state.retreat_material();
        }
        assert_eq!(state.material_index(), 0);

        for _ in 0..3 {
            state.advance_material();
        }
        assert_eq!(state.material_index(), 2);
        state.advance_material();
        assert_eq!(state.material_index(), 2);
    }

    #[test]
    fn promote_and_demote_swap_the_two_lights() {
        let mut state = reference_state();
        state.apply(SceneEvent::SelectLightSlot1);
        assert_eq!(
            (state.primary_light_index(), state.secondary_light_index()),
            (1, 0)
        );
        state.apply(SceneEvent::SelectLightSlot1);
        assert_eq!(
            (state.primary_light_index(), state.secondary_light_index()),
            (1, 0)
        );
        state.apply(SceneEvent::SelectLightSlot0);
        assert_eq!(
            (state.primary_light_index(), state.secondary_light_index()),
            (0, 1)
        );
    }

    #[test]
    fn select_light_with_a_third_light_keeps_secondary() {
        let mut lights = default_lights();
        lights.push(Light::new(Vec3::new(0.0, -1.0, 1.0), 0.5));
        let mut state = SceneState::new(default_materials(), lights).unwrap();

        state.select_light(2);
        assert_eq!(
            (state.primary_light_index(), state.secondary_light_index()),
            (2, 1)
        );
        state.select_secondary_light(2);
        assert_eq!(
            (state.primary_light_index(), state.secondary_light_index()),
            (1, 2)
        );
        state.select_secondary_light(0);
        assert_eq!(
            (state.primary_light_index(), state.secondary_light_index()),
            (1, 0)
        );
        state.select_light(7);
        assert_eq!(
            (state.primary_light_index(), state.secondary_light_index()),
            (1, 0)
        );
    }

    #[test]
    fn nudge_moves_only_the_primary_light() {
        let mut state = reference_state();
        state.apply(SceneEvent::SelectLightSlot1);
        let before = state.clone();

        state.apply(SceneEvent::NudgeLight {
            axis: Axis::X,
            direction: Direction::Negative,
        });
        state.apply(SceneEvent::NudgeLight {
            axis: Axis::Y,
            direction: Direction::Positive,
        });

        assert_eq!(state.lights()[0], before.lights()[0]);
        assert_eq!(state.materials(), before.materials());
        let moved = state.lights()[1].position();
        let expected = before.lights()[1].position()
            + Vec3::new(-LIGHT_NUDGE_STEP, LIGHT_NUDGE_STEP, 0.0);
        assert!((moved - expected).length() < 1e-6);
        assert_eq!(state.lights()[1].intensity(), 0.2);
    }

    #[test]
    fn last_shading_mode_wins() {
        let mut toggled = reference_state();
        toggled.set_shading_mode(ShadingMode::Phong);
        toggled.set_shading_mode(ShadingMode::Flat);
        toggled.set_shading_mode(ShadingMode::Phong);

        let mut single = reference_state();
        single.set_shading_mode(ShadingMode::Phong);

        assert_eq!(toggled, single);
    }

    #[test]
    fn handlers_do_not_interact() {
        let mut state = reference_state();
        state.apply(SceneEvent::SelectLightSlot1);
        state.apply(SceneEvent::CycleMaterialForward);
        state.apply(SceneEvent::SetShadingMode(ShadingMode::Flat));
        state.apply(SceneEvent::ToggleCulling);

        assert_eq!(state.material_index(), 1);
        assert_eq!(state.primary_light_index(), 1);
        assert_eq!(state.shading_mode(), ShadingMode::Flat);
        assert!(state.cull_back_faces());

        state.apply(SceneEvent::CycleMaterialBackward);
        assert_eq!(state.primary_light_index(), 1);
        state.apply(SceneEvent::SelectLightSlot0);
        assert_eq!(state.material_index(), 0);
        assert_eq!(state.shading_mode(), ShadingMode::Flat);
    }

    #[test]
    fn random_event_sequences_preserve_invariants() {
        let mut rng = StdRng::seed_from_u64(0x5eed);
        for light_count in 2..5 {
            let lights = (0..light_count)
                .map(|i| Light::new(Vec3::splat(i as f32), 1.0))
                .collect();
            let mut state = SceneState::new(default_materials(), lights).unwrap();
            for _ in 0..2_000 {
                state.apply(random_event(&mut rng, light_count));
                assert!(state.material_index() < state.materials().len());
                assert!(state.primary_light_index() < light_count);
                assert!(state.secondary_light_index() < light_count);
                assert_ne!(state.primary_light_index(), state.secondary_light_index());
                assert_eq!(state.lights().len(), light_count);
            }
        }
    }

    #[test]
    fn saved_state_is_restored() {
        let mut state = reference_state();
        state.apply(SceneEvent::CycleMaterialForward);
        state.apply(SceneEvent::SelectLightSlot1);
        state.apply(SceneEvent::ToggleCulling);
        let text = ron::to_string(&state).unwrap();
        let restored: SceneState = ron::from_str(&text).unwrap();
        assert_eq!(restored, state);
    }

    #[test]
    fn saved_state_with_bad_indices_is_rejected() {
        let text = ron::to_string(&reference_state()).unwrap();
        assert!(text.contains("material_index:0"));
        assert!(text.contains("secondary_light:1"));

        let bad_material = text.replace("material_index:0", "material_index:7");
        let err = ron::from_str::<SceneState>(&bad_material).unwrap_err();
        assert!(err.to_string().contains("material index 7 is out of range"));

        let shared_slot = text.replace("secondary_light:1", "secondary_light:0");
        let err = ron::from_str::<SceneState>(&shared_slot).unwrap_err();
        assert!(err.to_string().contains("both reference light 0"));

        let missing_light = text.replace("secondary_light:1", "secondary_light:5");
        assert!(ron::from_str::<SceneState>(&missing_light).is_err());
    }

    #[test]
    #[should_panic(expected = "light slots must reference distinct lights")]
    fn frame_build_aborts_on_shared_light_slots() {
        let mut state = reference_state();
        state.secondary_light = state.primary_light;
        crate::frame::FrameParameters::build(&state, glam::Mat4::IDENTITY, glam::Mat4::IDENTITY);
    }
}

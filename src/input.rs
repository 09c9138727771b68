use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::scene::{Axis, Direction, SceneEvent, ShadingMode};

/// Identifier for a keyboard key as seen after layout and shift are applied,
/// so `m` and `M` are different keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum KeyCode {
    Named(NamedKey),
    Character(char),
}

/// Non-character keys the viewer cares about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NamedKey {
    Escape,
}

/// Identifier for a mouse button (left button is zero).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MouseButton(u8);

impl MouseButton {
    pub const LEFT: Self = Self(0);

    pub fn new(index: u8) -> Self {
        Self(index)
    }
}

/// Translates keys into scene events.
#[derive(Debug, Clone, PartialEq)]
pub struct KeyBindings {
    bindings: HashMap<KeyCode, SceneEvent>,
}

impl Default for KeyBindings {
    fn default() -> Self {
        let nudge = |axis, direction| SceneEvent::NudgeLight { axis, direction };
        let bindings = [
            ('m', SceneEvent::CycleMaterialForward),
            ('M', SceneEvent::CycleMaterialBackward),
            ('l', SceneEvent::SelectLightSlot1),
            ('L', SceneEvent::SelectLightSlot0),
            ('x', nudge(Axis::X, Direction::Negative)),
            ('X', nudge(Axis::X, Direction::Positive)),
            ('y', nudge(Axis::Y, Direction::Negative)),
            ('Y', nudge(Axis::Y, Direction::Positive)),
            ('s', SceneEvent::SetShadingMode(ShadingMode::Phong)),
            ('S', SceneEvent::SetShadingMode(ShadingMode::Flat)),
            ('c', SceneEvent::ToggleCulling),
        ]
        .into_iter()
        .map(|(ch, event)| (KeyCode::Character(ch), event))
        .collect();
        Self { bindings }
    }
}

impl KeyBindings {
    pub fn event_for(&self, key: KeyCode) -> Option<SceneEvent> {
        self.bindings.get(&key).copied()
    }

    /// Events for each bound character of `text`, in order. Unbound
    /// characters are skipped.
    pub fn events_for_text<'a>(&'a self, text: &'a str) -> impl Iterator<Item = SceneEvent> + 'a {
        text.chars()
            .filter_map(|ch| self.event_for(KeyCode::Character(ch)))
    }
}

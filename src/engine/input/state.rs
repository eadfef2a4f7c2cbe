// Per-action resolved state

use super::action::ActionValue;
use glam::Vec2;

/// Resolved state of one action
///
/// Handed to subscribers by value, so later ticks never change what a subscriber saw.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ActionState {
    /// Whether the action is currently held/deflected
    pub is_down: bool,

    /// True for one tick after a released -> held transition
    pub just_pressed: bool,

    /// True for one tick after a held -> released transition
    pub just_released: bool,

    /// Latest value
    pub value: ActionValue,
}

impl ActionState {
    /// Create the resting state for an initial value
    pub fn new(initial: ActionValue) -> Self {
        Self {
            is_down: initial.is_active(),
            just_pressed: false,
            just_released: false,
            value: initial,
        }
    }

    /// Apply a freshly adapted value and derive the edge flags
    pub(crate) fn apply(&mut self, value: ActionValue) {
        let previous_is_down = self.is_down;

        self.value = value;
        self.is_down = value.is_active();
        self.just_pressed = self.is_down && !previous_is_down;
        self.just_released = !self.is_down && previous_is_down;
    }

    /// Clear one-tick edge flags
    pub(crate) fn clear_edges(&mut self) {
        self.just_pressed = false;
        self.just_released = false;
    }

    /// Button value, or `false` for non-button actions
    pub fn pressed(&self) -> bool {
        self.value.as_button().unwrap_or(false)
    }

    /// Axis value, or `0.0` for non-axis actions
    pub fn axis(&self) -> f32 {
        self.value.as_axis().unwrap_or(0.0)
    }

    /// Vector value, or zero for non-vector actions
    pub fn vector(&self) -> Vec2 {
        self.value.as_vector().unwrap_or(Vec2::ZERO)
    }
}

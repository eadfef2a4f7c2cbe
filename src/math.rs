// Math utilities shared by the input adapters

use glam::Vec2;

/// Clamp a value between min and max
pub fn clamp<T: PartialOrd>(value: T, min: T, max: T) -> T {
    if value < min {
        min
    } else if value > max {
        max
    } else {
        value
    }
}

/// Zero out an axis reading whose magnitude falls inside the deadzone
///
/// Values outside the deadzone are passed through unchanged, then clamped to `[-1, 1]`.
pub fn apply_deadzone(value: f32, deadzone: f32) -> f32 {
    if value.abs() < deadzone {
        0.0
    } else {
        clamp(value, -1.0, 1.0)
    }
}

/// Radial deadzone for a two-axis stick
///
/// Treats the stick as a single vector so diagonals are not clipped unevenly.
/// The result's length never exceeds 1.
pub fn apply_radial_deadzone(value: Vec2, deadzone: f32) -> Vec2 {
    let length = value.length();
    if length < deadzone || length == 0.0 {
        Vec2::ZERO
    } else if length > 1.0 {
        value / length
    } else {
        value
    }
}

/// Combine a negative and a positive digital input into one axis value (-1, 0 or 1)
pub fn digital_axis(negative: bool, positive: bool) -> f32 {
    let mut value = 0.0;
    if negative {
        value -= 1.0;
    }
    if positive {
        value += 1.0;
    }
    value
}

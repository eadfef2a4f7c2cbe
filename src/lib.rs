// Rusted Input: action-based input resolution
//
// Raw keyboard, mouse, gamepad and virtual-device events go in; named actions with
// per-tick edge flags come out. See `engine::input` for the architecture.

pub mod engine;
pub mod game;
pub mod math;

pub use engine::input;

// Game-side configuration: the actions the demo plays with

pub mod actions;

pub use actions::{default_bindings, FIRE, MENU, MOVE};

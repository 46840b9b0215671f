// Input handling
//
// Controllers are capabilities an entity owns: a keyboard, mouse or touch
// device bound to one target window. The host translates its events into
// `InputEvent`s and the scene routes them to every controller bound to the
// event's target.
//
// - `controller`: the tagged controller type and target ids
// - `keyboard`, `mouse`, `touch`: per-device state
// - `event`: host-independent input events
// - `direction`, `config`: per-player key bindings for movement

pub mod config;
pub mod controller;
pub mod direction;
pub mod event;
pub mod keyboard;
pub mod mouse;
pub mod touch;

pub use config::{InputConfig, InputConfigManager};
pub use controller::{Controller, ControllerKind, TargetId};
pub use direction::Direction;
pub use event::InputEvent;
pub use keyboard::KeyboardController;
pub use mouse::MouseController;
pub use touch::TouchController;

//! Input abstraction: platform-neutral key/pointer/wheel events, frame-coherent
//! keyboard and pointer state, configurable action bindings, and the listener
//! bus that scopes event delivery to a mounted view.

pub mod action_map;
mod bus;
mod error;
mod event;
pub mod keyboard;
pub mod pointer;

pub use action_map::{Action, InputBinding, InputMap, parse_key_name};
pub use bus::{InputBus, Subscription};
pub use error::InputError;
pub use event::InputEvent;
pub use keyboard::KeyboardState;
pub use pointer::PointerState;
pub use winit::keyboard::KeyCode;

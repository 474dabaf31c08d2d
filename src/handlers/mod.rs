//! Input handlers that translate terminal events into app actions.

pub mod keyboard;

pub use keyboard::handle_key_event;

//! Message model.
//!
//! Pure data (no FFI dependencies): native message codes, the raw message
//! triple, parameter unpacking helpers and the hook configuration.

pub mod config;
pub mod constants;
pub mod message;

pub use config::{HookConfig, TrayProtocol};
pub use message::{Point, RawMessage, WindowId};

//! Window message interception.
//!
//! Hooks native windows, classifies their raw messages (including tray-icon
//! callbacks) into typed [`WindowEvent`]s, tracks multi-message interactions
//! such as move/resize drags and tray balloons, and fans the result out to
//! per-window subscribers.
//!
//! Everything except [`platform`] is free of FFI so the core runs and tests on
//! any OS behind a [`NativeHost`].

pub mod error;
pub mod events;
pub mod hook;
pub mod interaction;
pub mod model;
pub mod platform;

pub use error::{FailureCause, HookError, HookResult, ListenerError, ListenerFailure};
pub use events::{
    Classifier, DispatchReport, Disposition, EventKind, HookEvent, Interaction, RemoteSubscriptions,
    SubscriptionToken, Subscriptions, WindowEvent,
};
pub use hook::{Adapter, DetachHandle, Directive, HookAttachment, MessageRoute, NativeHost};
pub use interaction::{BalloonState, DragState};
pub use model::{HookConfig, Point, RawMessage, TrayProtocol, WindowId};

#[cfg(target_os = "windows")]
pub use platform::Win32Host;

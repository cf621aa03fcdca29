//! Event layer: classification, typed events and subscriptions.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐   RawMessage   ┌─────────────┐  WindowEvent  ┌──────────────┐
//! │ Window Hook │ ─────────────▶ │ Classifier  │ ────────────▶ │ Interaction  │
//! │             │                │ (tables)    │               │ state mach.  │
//! └─────────────┘                └─────────────┘               └──────┬───────┘
//!                                                                     │ HookEvent
//!                     ┌──────────────────────┐  queued commands       ▼
//!                     │ RemoteSubscriptions  │ ─────────────▶ ┌──────────────┐
//!                     │ (any thread, mpsc)   │                │   Registry   │
//!                     └──────────────────────┘                │ (snapshot    │
//!                                                             │  fan-out)    │
//!                                                             └──────────────┘
//! ```
//!
//! # Module Structure
//!
//! - [`types`]: `EventKind`, `WindowEvent`, `HookEvent`, `Disposition`
//! - [`classifier`]: raw message → `WindowEvent`
//! - [`registry`]: thread-confined subscription registry
//! - [`bus`]: cross-thread subscription handoff

pub mod bus;
pub mod classifier;
pub mod registry;
pub mod types;

pub use bus::RemoteSubscriptions;
pub use classifier::{Classifier, TrayNotification};
pub use registry::{
    DispatchReport, Listener, ListenerResult, Registry, SendListener, SubscriptionToken,
    Subscriptions,
};
pub use types::{
    ButtonTransition, Disposition, EventKind, HookEvent, IconSize, InputSource, Interaction,
    MouseButton, SelectInput, SizeKind, SizingEdge, WindowEvent,
};

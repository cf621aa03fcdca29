//! Interaction state machines.
//!
//! Small trackers for interactions that span several messages. Each one
//! looks at classified events, updates its own state and annotates the event
//! (interaction tag, unexpected flag, optional derived event). They never
//! block and never suppress an event.

pub mod balloon;
pub mod drag;

pub use balloon::{BalloonState, BalloonTracker};
pub use drag::{DragState, DragTracker};

use crate::events::{Interaction, WindowEvent};

/// What a tracker adds to one classified event.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Annotation {
    pub interaction: Option<Interaction>,
    pub unexpected: bool,
    /// Event to deliver right after the observed one.
    pub derived: Option<WindowEvent>,
}

impl Annotation {
    /// Event arrived in a state that does not expect it.
    pub fn unexpected() -> Self {
        Self {
            unexpected: true,
            ..Self::default()
        }
    }

    /// Deliver `event` after the observed one.
    pub fn derived(event: WindowEvent) -> Self {
        Self {
            derived: Some(event),
            ..Self::default()
        }
    }

    /// Mark the observed event as user-driven or programmatic.
    pub fn tagged(interaction: Interaction) -> Self {
        Self {
            interaction: Some(interaction),
            ..Self::default()
        }
    }
}

//! Move/resize drag lifecycle.
//!
//! `Idle → Active` on DragLoopEntered, `Active → Idle` on DragLoopExited.
//! WindowMoving / WindowResizing seen while Active come from the user
//! dragging the frame; the same messages while Idle come from code
//! (SetWindowPos and friends).

use log::{debug, warn};

use super::Annotation;
use crate::events::{Interaction, WindowEvent};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DragState {
    #[default]
    Idle,
    Active,
}

#[derive(Debug, Clone)]
pub struct DragTracker {
    state: DragState,
    emit_markers: bool,
}

impl DragTracker {
    /// `emit_markers` controls whether DragStarted / DragEnded are derived.
    pub fn new(emit_markers: bool) -> Self {
        Self {
            state: DragState::Idle,
            emit_markers,
        }
    }

    pub fn state(&self) -> DragState {
        self.state
    }

    pub fn is_active(&self) -> bool {
        self.state == DragState::Active
    }

    /// Update the lifecycle for one classified event and annotate it.
    pub fn observe(&mut self, event: &WindowEvent) -> Annotation {
        match event {
            WindowEvent::DragLoopEntered => {
                if self.state == DragState::Active {
                    // Nested enter without an exit; stay Active.
                    warn!("[drag] Move/size loop entered while already active");
                    return Annotation::unexpected();
                }
                self.state = DragState::Active;
                debug!("[drag] Idle -> Active");
                self.marker(WindowEvent::DragStarted)
            }
            WindowEvent::DragLoopExited => {
                if self.state == DragState::Idle {
                    warn!("[drag] Move/size loop exited without a matching enter");
                    return Annotation::unexpected();
                }
                self.state = DragState::Idle;
                debug!("[drag] Active -> Idle");
                self.marker(WindowEvent::DragEnded)
            }
            WindowEvent::WindowMoving | WindowEvent::WindowResizing { .. } => {
                Annotation::tagged(self.interaction())
            }
            _ => Annotation::default(),
        }
    }

    /// Forget an in-flight drag (window torn down mid-drag).
    pub fn reset(&mut self) {
        self.state = DragState::Idle;
    }

    fn interaction(&self) -> Interaction {
        match self.state {
            DragState::Active => Interaction::Interactive,
            DragState::Idle => Interaction::Programmatic,
        }
    }

    fn marker(&self, event: WindowEvent) -> Annotation {
        if self.emit_markers {
            Annotation::derived(event)
        } else {
            Annotation::default()
        }
    }
}

impl Default for DragTracker {
    fn default() -> Self {
        Self::new(true)
    }
}

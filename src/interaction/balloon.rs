//! Tray balloon lifecycle.
//!
//! At most one balloon is outstanding. `None → Shown` on BalloonShown,
//! `Shown → None` on exactly one of BalloonHidden, BalloonTimedOut or
//! BalloonUserDismissed. A BalloonShown while one is already shown starts a
//! new instance; the previous one gets no synthetic hide.

use log::{debug, warn};

use super::Annotation;
use crate::events::WindowEvent;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BalloonState {
    #[default]
    None,
    Shown {
        icon_id: u32,
        /// Sequence number of the balloon instance, starting at 1.
        instance: u64,
    },
}

#[derive(Debug, Clone, Default)]
pub struct BalloonTracker {
    state: BalloonState,
    shown_count: u64,
}

impl BalloonTracker {
    /// Tracker with no balloon shown.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> BalloonState {
        self.state
    }

    pub fn is_shown(&self) -> bool {
        matches!(self.state, BalloonState::Shown { .. })
    }

    /// Number of balloon instances seen so far.
    pub fn shown_count(&self) -> u64 {
        self.shown_count
    }

    /// Update the lifecycle for one classified event and annotate it.
    pub fn observe(&mut self, event: &WindowEvent) -> Annotation {
        match event {
            WindowEvent::BalloonShown { icon_id } => {
                if let BalloonState::Shown { instance, .. } = self.state {
                    debug!(
                        "[balloon] Balloon {} replaced by a new one without a hide",
                        instance
                    );
                }
                self.shown_count += 1;
                self.state = BalloonState::Shown {
                    icon_id: *icon_id,
                    instance: self.shown_count,
                };
                Annotation::default()
            }
            _ if event.kind().is_balloon_terminal() => match self.state {
                BalloonState::Shown { instance, .. } => {
                    debug!("[balloon] Balloon {} closed: {:?}", instance, event.kind());
                    self.state = BalloonState::None;
                    Annotation::default()
                }
                BalloonState::None => {
                    warn!("[balloon] {:?} with no balloon shown", event.kind());
                    Annotation::unexpected()
                }
            },
            _ => Annotation::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shown() -> WindowEvent {
        WindowEvent::BalloonShown { icon_id: 1 }
    }

    #[test]
    fn each_terminal_closes_a_shown_balloon() {
        let terminals = [
            WindowEvent::BalloonHidden { icon_id: 1 },
            WindowEvent::BalloonTimedOut { icon_id: 1 },
            WindowEvent::BalloonUserDismissed { icon_id: 1 },
        ];
        for terminal in terminals {
            let mut balloon = BalloonTracker::new();
            balloon.observe(&shown());
            assert!(balloon.is_shown());
            assert!(!balloon.observe(&terminal).unexpected);
            assert_eq!(balloon.state(), BalloonState::None);
        }
    }

    #[test]
    fn second_terminal_is_unexpected() {
        let mut balloon = BalloonTracker::new();
        balloon.observe(&shown());
        assert!(!balloon.observe(&WindowEvent::BalloonTimedOut { icon_id: 1 }).unexpected);
        assert!(balloon.observe(&WindowEvent::BalloonHidden { icon_id: 1 }).unexpected);
    }

    #[test]
    fn terminal_without_balloon_is_unexpected_and_keeps_state() {
        let mut balloon = BalloonTracker::new();
        let a = balloon.observe(&WindowEvent::BalloonUserDismissed { icon_id: 2 });
        assert!(a.unexpected);
        assert_eq!(a.derived, None);
        assert_eq!(balloon.state(), BalloonState::None);
    }

    #[test]
    fn second_show_starts_new_instance_without_hide() {
        let mut balloon = BalloonTracker::new();
        balloon.observe(&shown());
        let a = balloon.observe(&WindowEvent::BalloonShown { icon_id: 5 });
        assert_eq!(a, Annotation::default());
        assert_eq!(
            balloon.state(),
            BalloonState::Shown {
                icon_id: 5,
                instance: 2
            }
        );
        assert_eq!(balloon.shown_count(), 2);
    }
}

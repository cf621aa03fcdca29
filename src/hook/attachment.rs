//! Attachment handles returned by `Adapter::attach`.

use std::fmt;
use std::rc::{Rc, Weak};

use super::window_hook::WindowHook;
use crate::events::{RemoteSubscriptions, Subscriptions};
use crate::interaction::{BalloonState, DragState};
use crate::model::WindowId;

/// Adapter operations an attachment needs, independent of the native host type.
pub(crate) trait HookControl {
    fn detach_window(&self, window: WindowId) -> bool;
    fn is_window_attached(&self, window: WindowId) -> bool;
}

/// Exclusive ownership of the hook on one window.
///
/// Not `Clone` and not `Send`. Dropping it detaches the hook.
pub struct HookAttachment {
    hook: Rc<WindowHook>,
    control: Weak<dyn HookControl>,
}

impl HookAttachment {
    pub(crate) fn new(hook: Rc<WindowHook>, control: Weak<dyn HookControl>) -> Self {
        Self { hook, control }
    }

    /// Window this attachment owns the hook for.
    pub fn window(&self) -> WindowId {
        self.hook.window()
    }

    /// Subscribe from the window's own thread.
    pub fn subscriptions(&self) -> Subscriptions {
        self.hook.subscriptions()
    }

    /// Subscribe from any thread.
    pub fn remote_subscriptions(&self) -> RemoteSubscriptions {
        self.hook.remote_subscriptions()
    }

    /// Handle that can detach this window later, including from a listener.
    pub fn detach_handle(&self) -> DetachHandle {
        DetachHandle {
            window: self.window(),
            hook: Rc::downgrade(&self.hook),
            control: self.control.clone(),
        }
    }

    /// False once detached, whether by request, by window destruction or by
    /// the adapter going away.
    pub fn is_attached(&self) -> bool {
        self.hook.is_attached()
    }

    /// Current move/size loop state of the window.
    pub fn drag_state(&self) -> DragState {
        self.hook.drag_state()
    }

    /// Current tray balloon state of the window.
    pub fn balloon_state(&self) -> BalloonState {
        self.hook.balloon_state()
    }

    /// Remove the hook. Safe to call repeatedly; returns true only the first time.
    pub fn detach(&self) -> bool {
        if !self.hook.is_attached() {
            return false;
        }
        match self.control.upgrade() {
            Some(control) => control.detach_window(self.window()),
            None => {
                // Adapter already gone; it shut the hook down on drop.
                false
            }
        }
    }
}

impl fmt::Debug for HookAttachment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HookAttachment")
            .field("window", &self.window())
            .field("attached", &self.is_attached())
            .finish()
    }
}

impl Drop for HookAttachment {
    fn drop(&mut self) {
        self.detach();
    }
}

/// Weak, cloneable detach capability for one window.
///
/// Bound to the hook it was taken from: after a detach and re-attach of the
/// same window, an old handle no longer affects the new hook.
#[derive(Clone)]
pub struct DetachHandle {
    window: WindowId,
    hook: Weak<WindowHook>,
    control: Weak<dyn HookControl>,
}

impl fmt::Debug for DetachHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DetachHandle")
            .field("window", &self.window)
            .field("attached", &self.is_attached())
            .finish()
    }
}

impl DetachHandle {
    /// Window this handle detaches.
    pub fn window(&self) -> WindowId {
        self.window
    }

    /// Detach the window if it is still attached.
    ///
    /// From inside a listener, the dispatch in progress still finishes; no
    /// message after it is delivered.
    pub fn detach(&self) -> bool {
        if !self.is_attached() {
            return false;
        }
        self.control
            .upgrade()
            .map(|control| control.detach_window(self.window))
            .unwrap_or(false)
    }

    /// True while the hook this handle came from is still installed.
    pub fn is_attached(&self) -> bool {
        let hook_live = self
            .hook
            .upgrade()
            .map(|hook| hook.is_attached())
            .unwrap_or(false);
        hook_live
            && self
                .control
                .upgrade()
                .map(|control| control.is_window_attached(self.window))
                .unwrap_or(false)
    }
}

//! Seam between the hook core and the native windowing system.

use std::rc::Weak;

use super::Directive;
use crate::model::{RawMessage, WindowId};

/// Receives raw messages from the native message chain.
///
/// Implemented by the adapter; the native side only holds a `Weak` to it, so
/// a message arriving after teardown falls through to default processing.
pub trait MessageRoute {
    fn route(&self, window: WindowId, msg: &RawMessage) -> Directive;
}

/// The operations the hook needs from the windowing system.
///
/// All calls happen on the thread that owns the window.
pub trait NativeHost {
    /// Whether `window` still refers to a live window.
    fn window_exists(&self, window: WindowId) -> bool;

    /// Whether `window` currently forwards to a live route, from any adapter
    /// on this thread.
    fn is_hooked(&self, window: WindowId) -> bool;

    /// Start forwarding every message of `window` to `route`. Returns false
    /// if the system refused or the window already forwards to a live route.
    fn install(&self, window: WindowId, route: Weak<dyn MessageRoute>) -> bool;

    /// Stop forwarding. Returns false if nothing was installed.
    fn uninstall(&self, window: WindowId) -> bool;

    /// Current DPI of `window`, if the host can tell.
    fn window_dpi(&self, _window: WindowId) -> Option<u16> {
        None
    }
}

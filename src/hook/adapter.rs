//! Binds window hooks to native windows.
//!
//! The adapter is the single owner of every installed hook on its thread:
//! - `attach` installs a hook once per window (`AlreadyAttached` otherwise)
//! - `detach` removes it once; repeated calls are no-ops
//! - WM_NCDESTROY, or a message for a window the host no longer knows,
//!   force-detaches and cancels that window's subscriptions

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::{Rc, Weak};

use log::{debug, info, warn};

use super::attachment::{HookAttachment, HookControl};
use super::host::{MessageRoute, NativeHost};
use super::window_hook::WindowHook;
use super::Directive;
use crate::error::{HookError, HookResult};
use crate::model::constants::WM_NCDESTROY;
use crate::model::{HookConfig, RawMessage, WindowId};

/// Shared core; native routes and attachments hold it weakly.
pub(crate) struct AdapterInner<H: NativeHost> {
    host: H,
    hooks: RefCell<HashMap<WindowId, Rc<WindowHook>>>,
}

impl<H: NativeHost> AdapterInner<H> {
    fn hook(&self, window: WindowId) -> Option<Rc<WindowHook>> {
        self.hooks.borrow().get(&window).cloned()
    }

    fn detach(&self, window: WindowId, reason: &str) -> bool {
        // Release the table borrow before touching the hook: shutdown drops
        // listeners, which may call back into the adapter.
        let removed = self.hooks.borrow_mut().remove(&window);
        let Some(hook) = removed else {
            debug!("[adapter] Detach of {} ignored: not attached", window);
            return false;
        };
        hook.shutdown();
        if !self.host.uninstall(window) {
            warn!("[adapter] Native hook for {} was already gone", window);
        }
        info!("[adapter] Hook detached from {} ({})", window, reason);
        true
    }
}

impl<H: NativeHost> MessageRoute for AdapterInner<H> {
    fn route(&self, window: WindowId, msg: &RawMessage) -> Directive {
        let Some(hook) = self.hook(window) else {
            return Directive::Continue;
        };
        if msg.code == WM_NCDESTROY {
            self.detach(window, "window destroyed");
            return Directive::Continue;
        }
        if !self.host.window_exists(window) {
            self.detach(window, "window no longer exists");
            return Directive::Continue;
        }
        hook.handle_message(msg)
    }
}

impl<H: NativeHost> HookControl for AdapterInner<H> {
    fn detach_window(&self, window: WindowId) -> bool {
        self.detach(window, "requested")
    }

    fn is_window_attached(&self, window: WindowId) -> bool {
        self.hooks.borrow().contains_key(&window)
    }
}

impl<H: NativeHost> Drop for AdapterInner<H> {
    fn drop(&mut self) {
        let hooks: Vec<_> = self.hooks.get_mut().drain().collect();
        for (window, hook) in hooks {
            hook.shutdown();
            self.host.uninstall(window);
            debug!("[adapter] Hook detached from {} (adapter dropped)", window);
        }
    }
}

/// Thread-confined owner of all hooks installed through one native host.
pub struct Adapter<H: NativeHost + 'static> {
    inner: Rc<AdapterInner<H>>,
}

impl<H: NativeHost + 'static> Adapter<H> {
    /// Adapter with no windows attached.
    pub fn new(host: H) -> Self {
        Self {
            inner: Rc::new(AdapterInner {
                host,
                hooks: RefCell::new(HashMap::new()),
            }),
        }
    }

    pub fn host(&self) -> &H {
        &self.inner.host
    }

    /// Install a hook on `window`.
    ///
    /// A failed attach leaves any existing hook on the window untouched.
    pub fn attach(&self, window: WindowId, config: HookConfig) -> HookResult<HookAttachment> {
        if self.inner.hooks.borrow().contains_key(&window) {
            warn!("[adapter] Window {} is already hooked", window);
            return Err(HookError::AlreadyAttached(window));
        }
        if !self.inner.host.window_exists(window) {
            return Err(HookError::UnknownWindow(window));
        }
        if self.inner.host.is_hooked(window) {
            warn!("[adapter] Window {} is already hooked by another adapter", window);
            return Err(HookError::AlreadyAttached(window));
        }

        let dpi = self.inner.host.window_dpi(window);
        let hook = Rc::new(WindowHook::new(window, config, dpi));
        self.inner
            .hooks
            .borrow_mut()
            .insert(window, Rc::clone(&hook));

        let route = Rc::downgrade(&self.inner);
        let route: Weak<dyn MessageRoute> = route;
        if !self.inner.host.install(window, route) {
            self.inner.hooks.borrow_mut().remove(&window);
            hook.shutdown();
            return Err(HookError::InstallFailed(window));
        }

        info!("[adapter] Hook attached to {} (dpi={:?})", window, dpi);
        let control = Rc::downgrade(&self.inner);
        let control: Weak<dyn HookControl> = control;
        Ok(HookAttachment::new(hook, control))
    }

    /// Remove the hook from `window`. Returns false (and does nothing) if the
    /// window is not attached.
    pub fn detach(&self, window: WindowId) -> bool {
        self.inner.detach(window, "requested")
    }

    /// Inbound call from the native chain for `window`.
    pub fn deliver(&self, window: WindowId, msg: &RawMessage) -> Directive {
        self.inner.route(window, msg)
    }

    /// Whether this adapter currently hooks `window`.
    pub fn is_attached(&self, window: WindowId) -> bool {
        self.inner.is_window_attached(window)
    }

    /// Windows hooked by this adapter, sorted.
    pub fn attached_windows(&self) -> Vec<WindowId> {
        let mut windows: Vec<_> = self.inner.hooks.borrow().keys().copied().collect();
        windows.sort();
        windows
    }
}

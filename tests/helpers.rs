//! In-memory native host shared by the integration tests.
#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::rc::{Rc, Weak};

use winmsg_hook::{
    Directive, EventKind, HookEvent, MessageRoute, NativeHost, RawMessage, Subscriptions, WindowId,
};

#[derive(Default)]
struct FakeState {
    live: HashSet<WindowId>,
    routes: HashMap<WindowId, Weak<dyn MessageRoute>>,
    dpi: HashMap<WindowId, u16>,
    refuse_install: bool,
    installs: usize,
    uninstalls: usize,
}

/// Native host double. Clones share state, so a test keeps one clone to
/// inspect what the adapter did with the other.
#[derive(Clone, Default)]
pub struct FakeHost {
    state: Rc<RefCell<FakeState>>,
}

impl FakeHost {
    pub fn with_windows(windows: &[WindowId]) -> Self {
        let host = Self::default();
        host.state.borrow_mut().live.extend(windows.iter().copied());
        host
    }

    pub fn create(&self, window: WindowId) {
        self.state.borrow_mut().live.insert(window);
    }

    /// Window vanishes without the hook seeing WM_NCDESTROY.
    pub fn destroy_silently(&self, window: WindowId) {
        self.state.borrow_mut().live.remove(&window);
    }

    pub fn set_dpi(&self, window: WindowId, dpi: u16) {
        self.state.borrow_mut().dpi.insert(window, dpi);
    }

    pub fn refuse_install(&self, refuse: bool) {
        self.state.borrow_mut().refuse_install = refuse;
    }

    pub fn installs(&self) -> usize {
        self.state.borrow().installs
    }

    pub fn uninstalls(&self) -> usize {
        self.state.borrow().uninstalls
    }

    pub fn is_installed(&self, window: WindowId) -> bool {
        self.state.borrow().routes.contains_key(&window)
    }

    /// Push a message through the native chain the way the system would.
    ///
    /// `None` means nothing was installed and the message went straight to
    /// default processing.
    pub fn send(&self, window: WindowId, msg: RawMessage) -> Option<Directive> {
        let route = self.state.borrow().routes.get(&window).cloned()?;
        let route = route.upgrade()?;
        Some(route.route(window, &msg))
    }
}

impl NativeHost for FakeHost {
    fn window_exists(&self, window: WindowId) -> bool {
        self.state.borrow().live.contains(&window)
    }

    fn is_hooked(&self, window: WindowId) -> bool {
        self.state
            .borrow()
            .routes
            .get(&window)
            .is_some_and(|route| route.strong_count() > 0)
    }

    fn install(&self, window: WindowId, route: Weak<dyn MessageRoute>) -> bool {
        if self.is_hooked(window) {
            return false;
        }
        let mut state = self.state.borrow_mut();
        if state.refuse_install {
            return false;
        }
        state.installs += 1;
        state.routes.insert(window, route);
        true
    }

    fn uninstall(&self, window: WindowId) -> bool {
        let mut state = self.state.borrow_mut();
        let removed = state.routes.remove(&window).is_some();
        if removed {
            state.uninstalls += 1;
        }
        removed
    }

    fn window_dpi(&self, window: WindowId) -> Option<u16> {
        self.state.borrow().dpi.get(&window).copied()
    }
}

/// Record every event of `kind` delivered through `subs`.
pub fn record(subs: &Subscriptions, kind: EventKind) -> Rc<RefCell<Vec<HookEvent>>> {
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&seen);
    subs.observe(kind, move |event| sink.borrow_mut().push(event.clone()))
        .expect("subscribe");
    seen
}

/// Record the kinds of every event delivered, in order.
pub fn record_all(subs: &Subscriptions) -> Rc<RefCell<Vec<EventKind>>> {
    let seen = Rc::new(RefCell::new(Vec::new()));
    for kind in EventKind::ALL {
        let sink = Rc::clone(&seen);
        subs.observe(kind, move |event| sink.borrow_mut().push(event.kind()))
            .expect("subscribe");
    }
    seen
}

//! Subscription registry.
//!
//! Maps each `EventKind` to its listeners in subscription order. Confined to
//! the window's thread (`Rc`/`RefCell`); other threads go through
//! [`RemoteSubscriptions`](super::bus::RemoteSubscriptions).
//!
//! Dispatch works on a snapshot taken when it starts, so a listener that
//! subscribes or unsubscribes (itself or anyone else) only affects later
//! dispatches. A listener that fails or panics does not stop delivery to the
//! ones after it; failures come back in the `DispatchReport`.
//!
//! A listener can trigger a nested native message (SetWindowPos from a move
//! handler). If that message reaches the same listener while it is still
//! running, the event is queued on the listener and delivered as soon as the
//! outer call returns, before the outer fan-out moves on.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::rc::{Rc, Weak};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver};
use std::sync::Arc;

use log::{debug, trace};

use super::bus::{self, RemoteCommand, RemoteSubscriptions, TokenSource};
use super::types::{Disposition, EventKind, HookEvent};
use crate::error::{FailureCause, HookError, HookResult, ListenerError, ListenerFailure};
use crate::model::WindowId;

/// What a listener returns.
pub type ListenerResult = Result<Disposition, ListenerError>;

/// Listener registered from the window thread.
pub type Listener = Box<dyn FnMut(&HookEvent) -> ListenerResult>;

/// Listener registered from another thread.
pub type SendListener = Box<dyn FnMut(&HookEvent) -> ListenerResult + Send>;

/// Identifies one subscription.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionToken(pub(crate) u64);

impl fmt::Display for SubscriptionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

struct Slot {
    callback: RefCell<Listener>,
    /// Events that arrived while `callback` was already running.
    deferred: RefCell<VecDeque<HookEvent>>,
}

struct Entry {
    token: SubscriptionToken,
    kind: EventKind,
    slot: Rc<Slot>,
}

#[derive(Default)]
struct RegistryState {
    entries: Vec<Entry>,
    closed: bool,
}

impl RegistryState {
    fn insert(&mut self, token: SubscriptionToken, kind: EventKind, listener: Listener) {
        self.entries.push(Entry {
            token,
            kind,
            slot: Rc::new(Slot {
                callback: RefCell::new(listener),
                deferred: RefCell::new(VecDeque::new()),
            }),
        });
    }

    fn remove(&mut self, token: SubscriptionToken) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| e.token != token);
        self.entries.len() != before
    }
}

/// Outcome of one fan-out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchReport {
    pub kind: EventKind,
    /// Listeners that ran to completion (successfully or with an `Err`),
    /// including queued nested events delivered during this fan-out.
    pub delivered: usize,
    /// Listeners that were busy further up the stack; the event was queued
    /// for them instead.
    pub deferred: usize,
    pub disposition: Disposition,
    pub failures: Vec<ListenerFailure>,
}

impl DispatchReport {
    fn empty(kind: EventKind) -> Self {
        Self {
            kind,
            delivered: 0,
            deferred: 0,
            disposition: Disposition::Continue,
            failures: Vec::new(),
        }
    }

    /// No listener failed.
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }

    /// Fold another report into this one (raw event plus derived events).
    pub fn absorb(&mut self, other: DispatchReport) {
        self.delivered += other.delivered;
        self.deferred += other.deferred;
        self.disposition = self.disposition.merge(other.disposition);
        self.failures.extend(other.failures);
    }

    /// Surface aggregated failures to a synchronous caller.
    pub fn into_result(self, window: WindowId) -> HookResult<Disposition> {
        if self.failures.is_empty() {
            Ok(self.disposition)
        } else {
            Err(HookError::ListenerFailures {
                window,
                failures: self.failures,
            })
        }
    }
}

/// Registry owned by one window hook.
pub struct Registry {
    window: WindowId,
    state: Rc<RefCell<RegistryState>>,
    tokens: TokenSource,
    inbox: Receiver<RemoteCommand>,
    remote: RemoteSubscriptions,
    closed: Arc<AtomicBool>,
}

impl Registry {
    /// Empty, open registry for `window`.
    pub fn new(window: WindowId) -> Self {
        let (sender, inbox) = mpsc::channel();
        let tokens = TokenSource::default();
        let closed = Arc::new(AtomicBool::new(false));
        Self {
            window,
            state: Rc::new(RefCell::new(RegistryState::default())),
            remote: RemoteSubscriptions::new(window, sender, tokens.clone(), Arc::clone(&closed)),
            tokens,
            inbox,
            closed,
        }
    }

    /// Thread-confined handle for subscribing from the window thread,
    /// including from inside listeners.
    pub fn handle(&self) -> Subscriptions {
        Subscriptions {
            window: self.window,
            state: Rc::downgrade(&self.state),
            tokens: self.tokens.clone(),
        }
    }

    /// Handle for subscribing from other threads.
    pub fn remote(&self) -> RemoteSubscriptions {
        self.remote.clone()
    }

    pub fn subscribe<F>(&self, kind: EventKind, listener: F) -> HookResult<SubscriptionToken>
    where
        F: FnMut(&HookEvent) -> ListenerResult + 'static,
    {
        self.handle().subscribe(kind, listener)
    }

    pub fn unsubscribe(&self, token: SubscriptionToken) -> bool {
        self.handle().unsubscribe(token)
    }

    pub fn len(&self) -> usize {
        self.state.borrow().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Listeners currently subscribed to `kind`.
    pub fn listener_count(&self, kind: EventKind) -> usize {
        self.state
            .borrow()
            .entries
            .iter()
            .filter(|e| e.kind == kind)
            .count()
    }

    /// True after `cancel_all`.
    pub fn is_closed(&self) -> bool {
        self.state.borrow().closed
    }

    /// Apply subscriptions queued by other threads.
    pub fn apply_pending(&self) {
        let commands = bus::drain(&self.inbox);
        if commands.is_empty() {
            return;
        }
        let mut state = self.state.borrow_mut();
        for command in commands {
            match command {
                RemoteCommand::Subscribe {
                    token,
                    kind,
                    listener,
                } => {
                    if state.closed {
                        debug!("[registry] Dropping remote subscription {} on closed registry", token);
                        continue;
                    }
                    trace!("[registry] Remote subscribe {} to {:?}", token, kind);
                    state.insert(token, kind, listener);
                }
                RemoteCommand::Unsubscribe(token) => {
                    state.remove(token);
                }
            }
        }
    }

    /// Deliver `event` to every listener subscribed to its kind.
    pub fn dispatch(&self, event: &HookEvent) -> DispatchReport {
        self.apply_pending();

        let kind = event.kind();
        let snapshot: Vec<(SubscriptionToken, Rc<Slot>)> = self
            .state
            .borrow()
            .entries
            .iter()
            .filter(|e| e.kind == kind)
            .map(|e| (e.token, Rc::clone(&e.slot)))
            .collect();

        let mut report = DispatchReport::empty(kind);
        for (token, slot) in snapshot {
            let Ok(mut callback) = slot.callback.try_borrow_mut() else {
                trace!("[registry] Listener {} busy, queueing {:?}", token, kind);
                slot.deferred.borrow_mut().push_back(event.clone());
                report.deferred += 1;
                continue;
            };
            let disposition = invoke(&mut callback, token, event, &mut report);
            report.disposition = report.disposition.merge(disposition);

            loop {
                let next = slot.deferred.borrow_mut().pop_front();
                let Some(next) = next else {
                    break;
                };
                if self.is_closed() {
                    slot.deferred.borrow_mut().clear();
                    break;
                }
                // The nested message has already been answered; only its
                // failures are kept.
                invoke(&mut callback, token, &next, &mut report);
            }
        }
        report
    }

    /// Cancel every subscription and refuse new ones. Used at teardown.
    pub fn cancel_all(&self) {
        self.closed.store(true, Ordering::Release);
        let _ = bus::drain(&self.inbox);
        let mut state = self.state.borrow_mut();
        if !state.entries.is_empty() {
            debug!(
                "[registry] Cancelling {} subscription(s) for window {}",
                state.entries.len(),
                self.window
            );
        }
        state.entries.clear();
        state.closed = true;
    }
}

impl Drop for Registry {
    fn drop(&mut self) {
        self.closed.store(true, Ordering::Release);
        // Listeners may hold `Subscriptions`; clearing here drops them before
        // the state itself goes away.
        if let Ok(mut state) = self.state.try_borrow_mut() {
            state.entries.clear();
            state.closed = true;
        }
    }
}

/// Run one listener with panics contained. Failures go into `report`.
fn invoke(
    callback: &mut Listener,
    token: SubscriptionToken,
    event: &HookEvent,
    report: &mut DispatchReport,
) -> Disposition {
    let kind = event.kind();
    match panic::catch_unwind(AssertUnwindSafe(|| callback(event))) {
        Ok(Ok(disposition)) => {
            report.delivered += 1;
            disposition
        }
        Ok(Err(e)) => {
            report.delivered += 1;
            report.failures.push(ListenerFailure {
                token,
                kind,
                cause: FailureCause::Error(e.to_string()),
            });
            Disposition::Continue
        }
        Err(payload) => {
            report.failures.push(ListenerFailure {
                token,
                kind,
                cause: FailureCause::Panicked(panic_message(payload.as_ref())),
            });
            Disposition::Continue
        }
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}

/// Cloneable handle to a window's registry, usable only on the window thread.
///
/// Safe to use from inside a listener. A listener that causes a nested native
/// message of the kind it is handling is not re-entered: the nested event is
/// delivered to it right after the current call returns. Its disposition
/// cannot affect the nested message, which has already been answered.
#[derive(Clone)]
pub struct Subscriptions {
    window: WindowId,
    state: Weak<RefCell<RegistryState>>,
    tokens: TokenSource,
}

impl Subscriptions {
    pub fn window(&self) -> WindowId {
        self.window
    }

    pub fn subscribe<F>(&self, kind: EventKind, listener: F) -> HookResult<SubscriptionToken>
    where
        F: FnMut(&HookEvent) -> ListenerResult + 'static,
    {
        let state = self.state.upgrade().ok_or(HookError::Detached(self.window))?;
        let mut state = state.borrow_mut();
        if state.closed {
            return Err(HookError::Detached(self.window));
        }
        let token = self.tokens.next();
        trace!("[registry] Subscribe {} to {:?}", token, kind);
        state.insert(token, kind, Box::new(listener));
        Ok(token)
    }

    /// Subscribe a listener that never suppresses default processing.
    pub fn observe<F>(&self, kind: EventKind, mut observer: F) -> HookResult<SubscriptionToken>
    where
        F: FnMut(&HookEvent) + 'static,
    {
        self.subscribe(kind, move |event| {
            observer(event);
            Ok(Disposition::Continue)
        })
    }

    /// Returns false if the token was not (or no longer) subscribed.
    pub fn unsubscribe(&self, token: SubscriptionToken) -> bool {
        let Some(state) = self.state.upgrade() else {
            return false;
        };
        let removed = state.borrow_mut().remove(token);
        if removed {
            trace!("[registry] Unsubscribe {}", token);
        }
        removed
    }

    pub fn is_active(&self) -> bool {
        self.state
            .upgrade()
            .map(|state| !state.borrow().closed)
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::types::WindowEvent;
    use std::cell::Cell;

    fn theme_event() -> HookEvent {
        HookEvent::new(WindowId(1), WindowEvent::ThemeChanged { colorization: false })
    }

    #[test]
    fn delivers_in_subscription_order() {
        let registry = Registry::new(WindowId(1));
        let order = Rc::new(RefCell::new(Vec::new()));
        for i in 0..3 {
            let order = Rc::clone(&order);
            registry
                .subscribe(EventKind::ThemeChanged, move |_| {
                    order.borrow_mut().push(i);
                    Ok(Disposition::Continue)
                })
                .unwrap();
        }

        let report = registry.dispatch(&theme_event());
        assert_eq!(report.delivered, 3);
        assert_eq!(*order.borrow(), vec![0, 1, 2]);
    }

    #[test]
    fn only_matching_kind_is_delivered() {
        let registry = Registry::new(WindowId(1));
        let hits = Rc::new(Cell::new(0));
        let h = Rc::clone(&hits);
        registry
            .handle()
            .observe(EventKind::PointerMoved, move |_| h.set(h.get() + 1))
            .unwrap();

        let report = registry.dispatch(&theme_event());
        assert_eq!(report.delivered, 0);
        assert_eq!(hits.get(), 0);
    }

    #[test]
    fn self_unsubscribe_takes_effect_next_dispatch() {
        let registry = Registry::new(WindowId(1));
        let handle = registry.handle();
        let hits = Rc::new(Cell::new(0));
        let token_slot: Rc<Cell<Option<SubscriptionToken>>> = Rc::new(Cell::new(None));

        let (h, slot, inner) = (Rc::clone(&hits), Rc::clone(&token_slot), handle.clone());
        let token = handle
            .subscribe(EventKind::ThemeChanged, move |_| {
                h.set(h.get() + 1);
                if let Some(token) = slot.get() {
                    assert!(inner.unsubscribe(token));
                }
                Ok(Disposition::Continue)
            })
            .unwrap();
        token_slot.set(Some(token));

        registry.dispatch(&theme_event());
        registry.dispatch(&theme_event());
        assert_eq!(hits.get(), 1);
        assert!(registry.is_empty());
    }

    #[test]
    fn subscribe_during_dispatch_waits_for_next_dispatch() {
        let registry = Registry::new(WindowId(1));
        let handle = registry.handle();
        let late_hits = Rc::new(Cell::new(0));

        let (inner, late) = (handle.clone(), Rc::clone(&late_hits));
        let added = Rc::new(Cell::new(false));
        handle
            .subscribe(EventKind::ThemeChanged, move |_| {
                if !added.replace(true) {
                    let late = Rc::clone(&late);
                    inner
                        .observe(EventKind::ThemeChanged, move |_| late.set(late.get() + 1))
                        .unwrap();
                }
                Ok(Disposition::Continue)
            })
            .unwrap();

        let first = registry.dispatch(&theme_event());
        assert_eq!(first.delivered, 1);
        assert_eq!(late_hits.get(), 0);

        let second = registry.dispatch(&theme_event());
        assert_eq!(second.delivered, 2);
        assert_eq!(late_hits.get(), 1);
    }

    #[test]
    fn failing_listener_does_not_stop_fan_out() {
        let registry = Registry::new(WindowId(1));
        let reached = Rc::new(Cell::new(false));

        let bad = registry
            .subscribe(EventKind::ThemeChanged, |_| Err("theme lookup failed".into()))
            .unwrap();
        let r = Rc::clone(&reached);
        registry
            .handle()
            .observe(EventKind::ThemeChanged, move |_| r.set(true))
            .unwrap();

        let report = registry.dispatch(&theme_event());
        assert!(reached.get());
        assert_eq!(report.delivered, 2);
        assert_eq!(
            report.failures,
            vec![ListenerFailure {
                token: bad,
                kind: EventKind::ThemeChanged,
                cause: FailureCause::Error("theme lookup failed".to_string()),
            }]
        );
        assert!(matches!(
            report.into_result(WindowId(1)),
            Err(HookError::ListenerFailures { .. })
        ));
    }

    #[test]
    fn panicking_listener_is_contained() {
        let registry = Registry::new(WindowId(1));
        let reached = Rc::new(Cell::new(false));

        registry
            .subscribe(EventKind::ThemeChanged, |_| panic!("listener bug"))
            .unwrap();
        let r = Rc::clone(&reached);
        registry
            .handle()
            .observe(EventKind::ThemeChanged, move |_| r.set(true))
            .unwrap();

        let report = registry.dispatch(&theme_event());
        assert!(reached.get());
        assert_eq!(report.delivered, 1);
        assert_eq!(
            report.failures[0].cause,
            FailureCause::Panicked("listener bug".to_string())
        );
    }

    #[test]
    fn nested_event_is_queued_for_busy_listener() {
        let registry = Rc::new(Registry::new(WindowId(1)));
        let weak = Rc::downgrade(&registry);
        let seen = Rc::new(RefCell::new(Vec::new()));
        let nested_report = Rc::new(RefCell::new(None));

        let (sink, slot) = (Rc::clone(&seen), Rc::clone(&nested_report));
        registry
            .subscribe(EventKind::ThemeChanged, move |event| {
                let WindowEvent::ThemeChanged { colorization } = event.event else {
                    return Ok(Disposition::Continue);
                };
                sink.borrow_mut().push(colorization);
                if !colorization {
                    if let Some(registry) = weak.upgrade() {
                        let nested = HookEvent::new(
                            WindowId(1),
                            WindowEvent::ThemeChanged { colorization: true },
                        );
                        *slot.borrow_mut() = Some(registry.dispatch(&nested));
                    }
                }
                Ok(Disposition::Continue)
            })
            .unwrap();
        let later = Rc::new(RefCell::new(Vec::new()));
        let l = Rc::clone(&later);
        registry
            .handle()
            .observe(EventKind::ThemeChanged, move |event| {
                if let WindowEvent::ThemeChanged { colorization } = event.event {
                    l.borrow_mut().push(colorization);
                }
            })
            .unwrap();

        let report = registry.dispatch(&theme_event());

        // The nested event reaches the busy listener right after its outer
        // call, and before the outer fan-out continues.
        assert_eq!(*seen.borrow(), vec![false, true]);
        assert_eq!(*later.borrow(), vec![true, false]);
        assert_eq!(report.delivered, 3);
        assert!(report.is_clean());

        let nested = nested_report.borrow_mut().take().unwrap();
        assert_eq!(nested.deferred, 1);
        assert_eq!(nested.delivered, 1);
    }

    #[test]
    fn queued_event_is_dropped_when_cancelled_mid_call() {
        let registry = Rc::new(Registry::new(WindowId(1)));
        let weak = Rc::downgrade(&registry);
        let calls = Rc::new(Cell::new(0));

        let c = Rc::clone(&calls);
        registry
            .subscribe(EventKind::ThemeChanged, move |_| {
                c.set(c.get() + 1);
                if c.get() == 1 {
                    if let Some(registry) = weak.upgrade() {
                        registry.dispatch(&theme_event());
                        registry.cancel_all();
                    }
                }
                Ok(Disposition::Continue)
            })
            .unwrap();

        registry.dispatch(&theme_event());
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn unsubscribing_a_later_listener_keeps_current_delivery() {
        let registry = Registry::new(WindowId(1));
        let handle = registry.handle();
        let victim_hits = Rc::new(Cell::new(0));

        let victim_slot: Rc<Cell<Option<SubscriptionToken>>> = Rc::new(Cell::new(None));
        let (inner, slot) = (handle.clone(), Rc::clone(&victim_slot));
        handle
            .observe(EventKind::ThemeChanged, move |_| {
                if let Some(token) = slot.get() {
                    inner.unsubscribe(token);
                }
            })
            .unwrap();
        let v = Rc::clone(&victim_hits);
        let victim = handle
            .observe(EventKind::ThemeChanged, move |_| v.set(v.get() + 1))
            .unwrap();
        victim_slot.set(Some(victim));

        registry.dispatch(&theme_event());
        registry.dispatch(&theme_event());
        assert_eq!(victim_hits.get(), 1);
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn cancel_all_closes_remote_handles() {
        let registry = Registry::new(WindowId(2));
        let remote = registry.remote();
        registry.cancel_all();
        assert!(!remote.is_active());
        assert!(matches!(
            remote.subscribe(EventKind::ThemeChanged, |_| Ok(Disposition::Continue)),
            Err(HookError::Detached(WindowId(2)))
        ));
    }

    #[test]
    fn handled_from_any_listener_wins() {
        let registry = Registry::new(WindowId(1));
        registry
            .subscribe(EventKind::ThemeChanged, |_| Ok(Disposition::Handled))
            .unwrap();
        registry
            .subscribe(EventKind::ThemeChanged, |_| Ok(Disposition::Continue))
            .unwrap();

        let report = registry.dispatch(&theme_event());
        assert_eq!(report.disposition, Disposition::Handled);
    }

    #[test]
    fn remote_subscriptions_apply_on_next_dispatch() {
        let registry = Registry::new(WindowId(1));
        let remote = registry.remote();
        let token = remote
            .subscribe(EventKind::ThemeChanged, |_| Ok(Disposition::Continue))
            .unwrap();
        assert_eq!(registry.len(), 0);

        let report = registry.dispatch(&theme_event());
        assert_eq!(report.delivered, 1);

        remote.unsubscribe(token).unwrap();
        let report = registry.dispatch(&theme_event());
        assert_eq!(report.delivered, 0);
    }

    #[test]
    fn cancel_all_closes_registry() {
        let registry = Registry::new(WindowId(1));
        let handle = registry.handle();
        handle
            .subscribe(EventKind::ThemeChanged, |_| Ok(Disposition::Continue))
            .unwrap();

        registry.cancel_all();
        assert!(registry.is_empty());
        assert!(registry.is_closed());
        assert!(!handle.is_active());
        assert!(matches!(
            handle.subscribe(EventKind::ThemeChanged, |_| Ok(Disposition::Continue)),
            Err(HookError::Detached(_))
        ));
    }

    #[test]
    fn handle_outliving_registry_is_detached() {
        let registry = Registry::new(WindowId(4));
        let handle = registry.handle();
        drop(registry);
        assert!(!handle.unsubscribe(SubscriptionToken(1)));
        assert!(matches!(
            handle.subscribe(EventKind::ThemeChanged, |_| Ok(Disposition::Continue)),
            Err(HookError::Detached(WindowId(4)))
        ));
    }
}

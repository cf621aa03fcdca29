//! Per-window message hook.
//!
//! Receives every raw message of one window: classifies it, runs it through
//! the drag and balloon trackers, fans it out to subscribers and tells the
//! native chain whether to continue default processing.

use std::cell::{Cell, RefCell};

use log::{error, trace};

use super::Directive;
use crate::events::{
    ButtonTransition, Classifier, DispatchReport, EventKind, HookEvent, InputSource, MouseButton,
    Registry, RemoteSubscriptions, SelectInput, Subscriptions, WindowEvent,
};
use crate::interaction::{Annotation, BalloonState, BalloonTracker, DragState, DragTracker};
use crate::model::{HookConfig, RawMessage, TrayProtocol, WindowId};

/// Message hook for one window: classifier, trackers and registry.
///
/// Confined to the window's thread.
pub struct WindowHook {
    window: WindowId,
    config: HookConfig,
    classifier: Classifier,
    drag: RefCell<DragTracker>,
    balloon: RefCell<BalloonTracker>,
    dpi: Cell<Option<u16>>,
    registry: Registry,
    attached: Cell<bool>,
}

impl WindowHook {
    /// `initial_dpi` seeds the `previous` value of the first DPI change.
    pub fn new(window: WindowId, config: HookConfig, initial_dpi: Option<u16>) -> Self {
        Self {
            window,
            classifier: Classifier::new(&config),
            drag: RefCell::new(DragTracker::new(config.emit_drag_markers)),
            balloon: RefCell::new(BalloonTracker::new()),
            dpi: Cell::new(initial_dpi),
            registry: Registry::new(window),
            attached: Cell::new(true),
            config,
        }
    }

    pub fn window(&self) -> WindowId {
        self.window
    }

    pub fn config(&self) -> &HookConfig {
        &self.config
    }

    pub fn is_attached(&self) -> bool {
        self.attached.get()
    }

    /// Subscribe from the window's own thread.
    pub fn subscriptions(&self) -> Subscriptions {
        self.registry.handle()
    }

    /// Subscribe from any thread.
    pub fn remote_subscriptions(&self) -> RemoteSubscriptions {
        self.registry.remote()
    }

    /// Listeners currently subscribed to `kind`.
    pub fn listener_count(&self, kind: EventKind) -> usize {
        self.registry.listener_count(kind)
    }

    /// Current move/size loop state.
    pub fn drag_state(&self) -> DragState {
        self.drag.borrow().state()
    }

    /// Current tray balloon state.
    pub fn balloon_state(&self) -> BalloonState {
        self.balloon.borrow().state()
    }

    /// Last DPI seen for the window.
    pub fn dpi(&self) -> Option<u16> {
        self.dpi.get()
    }

    /// Entry point from the native chain. No caller to report to, so listener
    /// failures are logged here.
    pub fn handle_message(&self, msg: &RawMessage) -> Directive {
        let Some(report) = self.deliver(msg) else {
            return Directive::Continue;
        };
        for failure in &report.failures {
            error!("[hook] Window {}: {}", self.window, failure);
        }
        Directive::from(report.disposition)
    }

    /// Classify and dispatch one message, returning the aggregated report.
    ///
    /// `None` when the message is unclassified or the hook is detached; in
    /// both cases no listener runs.
    pub fn deliver(&self, msg: &RawMessage) -> Option<DispatchReport> {
        if !self.attached.get() {
            return None;
        }
        let Some(mut event) = self.classifier.classify(msg) else {
            if self.config.log_unclassified {
                trace!("[hook] Window {}: unclassified {:#06x}", self.window, msg.code);
            }
            return None;
        };

        if let WindowEvent::DisplayDpiChanged {
            previous, dpi_x, ..
        } = &mut event
        {
            *previous = self.dpi.replace(Some(*dpi_x));
        }

        let drag = self.drag.borrow_mut().observe(&event);
        let balloon = self.balloon.borrow_mut().observe(&event);
        let legacy_select = self.legacy_selection(&event);

        let mut derived = Vec::new();
        derived.extend(drag.derived.clone());
        derived.extend(balloon.derived.clone());
        derived.extend(legacy_select);

        let envelope = self.envelope(event, &drag, &balloon);
        trace!(
            "[hook] Window {}: {:?} (interaction={:?}, unexpected={})",
            self.window,
            envelope.kind(),
            envelope.interaction,
            envelope.unexpected
        );

        let mut report = self.registry.dispatch(&envelope);
        for event in derived {
            report.absorb(self.registry.dispatch(&HookEvent::new(self.window, event)));
        }
        Some(report)
    }

    /// Stop delivering and cancel every subscription. Idempotent.
    pub(crate) fn shutdown(&self) {
        if !self.attached.replace(false) {
            return;
        }
        self.registry.cancel_all();
        self.drag.borrow_mut().reset();
    }

    fn envelope(&self, event: WindowEvent, drag: &Annotation, balloon: &Annotation) -> HookEvent {
        HookEvent {
            window: self.window,
            event,
            interaction: drag.interaction,
            unexpected: drag.unexpected || balloon.unexpected,
        }
    }

    /// The legacy tray protocol never sends NIN_SELECT; a left-button release
    /// on the icon is the selection.
    fn legacy_selection(&self, event: &WindowEvent) -> Option<WindowEvent> {
        if self.classifier.protocol() != TrayProtocol::Legacy {
            return None;
        }
        match event {
            WindowEvent::PointerButton {
                button: MouseButton::Left,
                transition: ButtonTransition::Release,
                source: InputSource::TrayIcon { icon_id },
                position,
                ..
            } => Some(WindowEvent::TrayIconSelected {
                input: SelectInput::Mouse,
                icon_id: *icon_id,
                anchor: *position,
            }),
            _ => None,
        }
    }
}

impl Drop for WindowHook {
    fn drop(&mut self) {
        self.shutdown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::{Disposition, Interaction};
    use crate::model::config::DEFAULT_TRAY_CALLBACK;
    use crate::model::constants::*;
    use crate::model::message::make_param;
    use std::rc::Rc;

    fn hook() -> WindowHook {
        WindowHook::new(WindowId(0x10), HookConfig::default(), Some(DEFAULT_DPI))
    }

    fn collect(hook: &WindowHook, kind: EventKind) -> Rc<RefCell<Vec<HookEvent>>> {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let s = Rc::clone(&seen);
        hook.subscriptions()
            .observe(kind, move |e| s.borrow_mut().push(e.clone()))
            .unwrap();
        seen
    }

    #[test]
    fn unclassified_message_returns_none() {
        let hook = hook();
        assert!(hook.deliver(&RawMessage::new(0x000F, 0, 0)).is_none());
        assert_eq!(hook.handle_message(&RawMessage::new(0x000F, 0, 0)), Directive::Continue);
    }

    #[test]
    fn dpi_change_reports_previous_value() {
        let hook = hook();
        let seen = collect(&hook, EventKind::DisplayDpiChanged);

        hook.deliver(&RawMessage::new(WM_DPICHANGED, make_param(144, 144), 0));
        hook.deliver(&RawMessage::new(WM_DPICHANGED, make_param(120, 120), 0));

        let seen = seen.borrow();
        assert_eq!(
            seen[0].event,
            WindowEvent::DisplayDpiChanged {
                previous: Some(96),
                dpi_x: 144,
                dpi_y: 144
            }
        );
        assert_eq!(
            seen[1].event,
            WindowEvent::DisplayDpiChanged {
                previous: Some(144),
                dpi_x: 120,
                dpi_y: 120
            }
        );
        assert_eq!(hook.dpi(), Some(120));
    }

    #[test]
    fn resizing_carries_interaction_tag() {
        let hook = hook();
        let seen = collect(&hook, EventKind::WindowResizing);

        hook.deliver(&RawMessage::new(WM_SIZING, WMSZ_RIGHT, 0));
        hook.deliver(&RawMessage::new(WM_ENTERSIZEMOVE, 0, 0));
        hook.deliver(&RawMessage::new(WM_SIZING, WMSZ_RIGHT, 0));

        let seen = seen.borrow();
        assert_eq!(seen[0].interaction, Some(Interaction::Programmatic));
        assert_eq!(seen[1].interaction, Some(Interaction::Interactive));
    }

    #[test]
    fn handled_listener_suppresses_default_processing() {
        let hook = hook();
        hook.subscriptions()
            .subscribe(EventKind::ContextMenuRequested, |_| Ok(Disposition::Handled))
            .unwrap();

        let directive = hook.handle_message(&RawMessage::new(WM_CONTEXTMENU, 0, -1));
        assert_eq!(directive, Directive::Handled(0));
    }

    #[test]
    fn legacy_protocol_derives_selection_from_left_release() {
        let config = HookConfig::with_tray(DEFAULT_TRAY_CALLBACK, TrayProtocol::Legacy);
        let hook = WindowHook::new(WindowId(0x20), config, None);
        let selected = collect(&hook, EventKind::TrayIconSelected);

        hook.deliver(&RawMessage::new(DEFAULT_TRAY_CALLBACK, 4, WM_LBUTTONDOWN as isize));
        assert!(selected.borrow().is_empty());
        hook.deliver(&RawMessage::new(DEFAULT_TRAY_CALLBACK, 4, WM_LBUTTONUP as isize));

        assert_eq!(
            selected.borrow()[0].event,
            WindowEvent::TrayIconSelected {
                input: SelectInput::Mouse,
                icon_id: 4,
                anchor: None
            }
        );
    }

    #[test]
    fn version4_left_release_is_not_a_selection() {
        let hook = hook();
        let selected = collect(&hook, EventKind::TrayIconSelected);
        hook.deliver(&RawMessage::new(
            DEFAULT_TRAY_CALLBACK,
            0,
            make_param(WM_LBUTTONUP as u16, 1) as isize,
        ));
        assert!(selected.borrow().is_empty());
    }

    #[test]
    fn shutdown_stops_delivery_and_cancels() {
        let hook = hook();
        let seen = collect(&hook, EventKind::ThemeChanged);
        hook.shutdown();
        hook.shutdown();

        assert!(!hook.is_attached());
        assert!(hook.deliver(&RawMessage::new(WM_THEMECHANGED, 0, 0)).is_none());
        assert!(seen.borrow().is_empty());
        assert_eq!(hook.listener_count(EventKind::ThemeChanged), 0);
    }
}

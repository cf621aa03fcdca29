//! Message classification.
//!
//! Maps a raw (code, wParam, lParam) triple to at most one `WindowEvent`.
//! The lookup tables are built once per process and never mutated; every
//! `Classifier` borrows the same tables. Classification is a hash lookup
//! followed by a parameter decode, with no side effects.

use std::collections::HashMap;
use std::sync::OnceLock;

use super::types::{
    ButtonTransition, EventKind, IconSize, InputSource, MouseButton, SelectInput, SizeKind,
    SizingEdge, WindowEvent,
};
use crate::model::constants::*;
use crate::model::message::{hiword, loword, packed_point, Point, RawMessage};
use crate::model::{HookConfig, TrayProtocol};

/// Decodes a window message whose code is already known.
type Decoder = fn(&RawMessage) -> WindowEvent;

/// Decodes a tray notification whose inner code is already known.
type TrayDecoder = fn(&TrayNotification) -> WindowEvent;

/// A tray callback message with its parameters unpacked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrayNotification {
    /// Inner event code (mouse message or NIN_*).
    pub code: u32,
    pub icon_id: u32,
    /// Anchor point in screen coordinates (Version4 only).
    pub anchor: Option<Point>,
}

struct Tables {
    window: HashMap<u32, (EventKind, Decoder)>,
    tray: HashMap<u32, (EventKind, TrayDecoder)>,
}

static TABLES: OnceLock<Tables> = OnceLock::new();

fn tables() -> &'static Tables {
    TABLES.get_or_init(|| Tables {
        window: window_rules().into_iter().collect(),
        tray: tray_rules().into_iter().collect(),
    })
}

fn rule(code: u32, kind: EventKind, decode: Decoder) -> (u32, (EventKind, Decoder)) {
    (code, (kind, decode))
}

fn tray_rule(code: u32, kind: EventKind, decode: TrayDecoder) -> (u32, (EventKind, TrayDecoder)) {
    (code, (kind, decode))
}

fn window_rules() -> Vec<(u32, (EventKind, Decoder))> {
    use ButtonTransition::{Press, Release};
    use EventKind as K;
    use MouseButton::{Left, Middle, Right};

    vec![
        rule(WM_MOVE, K::WindowMoved, |m| WindowEvent::WindowMoved {
            position: packed_point(m.lparam as usize),
        }),
        rule(WM_MOVING, K::WindowMoving, |_| WindowEvent::WindowMoving),
        rule(WM_SIZE, K::WindowResized, |m| WindowEvent::WindowResized {
            kind: size_kind(m.wparam),
            width: loword(m.lparam as usize),
            height: hiword(m.lparam as usize),
        }),
        rule(WM_SIZING, K::WindowResizing, |m| WindowEvent::WindowResizing {
            edge: sizing_edge(m.wparam),
        }),
        rule(WM_GETMINMAXINFO, K::MinMaxConstraintsQueried, |_| {
            WindowEvent::MinMaxConstraintsQueried
        }),
        rule(WM_ENABLE, K::EnabledStateChanged, |m| {
            WindowEvent::EnabledStateChanged {
                enabled: m.wparam != 0,
            }
        }),
        rule(WM_ENTERSIZEMOVE, K::DragLoopEntered, |_| WindowEvent::DragLoopEntered),
        rule(WM_EXITSIZEMOVE, K::DragLoopExited, |_| WindowEvent::DragLoopExited),
        rule(WM_CONTEXTMENU, K::ContextMenuRequested, |m| {
            WindowEvent::ContextMenuRequested {
                position: if m.lparam == CONTEXT_MENU_FROM_KEYBOARD {
                    None
                } else {
                    Some(packed_point(m.lparam as usize))
                },
                source: InputSource::Window,
            }
        }),
        rule(WM_MOUSEMOVE, K::PointerMoved, |m| WindowEvent::PointerMoved {
            position: Some(packed_point(m.lparam as usize)),
            source: InputSource::Window,
        }),
        rule(WM_LBUTTONDOWN, K::PointerButton, |m| button(m, Left, Press, 1)),
        rule(WM_LBUTTONUP, K::PointerButton, |m| button(m, Left, Release, 1)),
        rule(WM_LBUTTONDBLCLK, K::PointerButton, |m| button(m, Left, Press, 2)),
        rule(WM_RBUTTONDOWN, K::PointerButton, |m| button(m, Right, Press, 1)),
        rule(WM_RBUTTONUP, K::PointerButton, |m| button(m, Right, Release, 1)),
        rule(WM_RBUTTONDBLCLK, K::PointerButton, |m| button(m, Right, Press, 2)),
        rule(WM_MBUTTONDOWN, K::PointerButton, |m| button(m, Middle, Press, 1)),
        rule(WM_MBUTTONUP, K::PointerButton, |m| button(m, Middle, Release, 1)),
        rule(WM_MBUTTONDBLCLK, K::PointerButton, |m| button(m, Middle, Press, 2)),
        rule(WM_XBUTTONDOWN, K::PointerButton, |m| x_button(m, Press, 1)),
        rule(WM_XBUTTONUP, K::PointerButton, |m| x_button(m, Release, 1)),
        rule(WM_XBUTTONDBLCLK, K::PointerButton, |m| x_button(m, Press, 2)),
        rule(WM_SETICON, K::IconAssociated, |m| WindowEvent::IconAssociated {
            size: icon_size(m.wparam),
        }),
        rule(WM_DPICHANGED, K::DisplayDpiChanged, |m| {
            WindowEvent::DisplayDpiChanged {
                previous: None,
                dpi_x: loword(m.wparam),
                dpi_y: hiword(m.wparam),
            }
        }),
        rule(WM_DISPLAYCHANGE, K::DisplayResolutionChanged, |m| {
            WindowEvent::DisplayResolutionChanged {
                width: loword(m.lparam as usize),
                height: hiword(m.lparam as usize),
                bits_per_pixel: m.wparam as u32,
            }
        }),
        rule(WM_SETTINGCHANGE, K::SystemSettingChanged, |m| {
            WindowEvent::SystemSettingChanged {
                setting: Some(m.wparam as u32),
            }
        }),
        rule(WM_SYSCOLORCHANGE, K::SystemSettingChanged, |_| {
            WindowEvent::SystemSettingChanged { setting: None }
        }),
        rule(WM_THEMECHANGED, K::ThemeChanged, |_| WindowEvent::ThemeChanged {
            colorization: false,
        }),
        rule(WM_DWMCOLORIZATIONCOLORCHANGED, K::ThemeChanged, |_| {
            WindowEvent::ThemeChanged { colorization: true }
        }),
    ]
}

fn tray_rules() -> Vec<(u32, (EventKind, TrayDecoder))> {
    use ButtonTransition::{Press, Release};
    use EventKind as K;
    use MouseButton::{Left, Middle, Right};

    vec![
        tray_rule(WM_MOUSEMOVE, K::PointerMoved, |n| WindowEvent::PointerMoved {
            position: n.anchor,
            source: tray_source(n),
        }),
        tray_rule(WM_LBUTTONDOWN, K::PointerButton, |n| tray_button(n, Left, Press, 1)),
        tray_rule(WM_LBUTTONUP, K::PointerButton, |n| tray_button(n, Left, Release, 1)),
        tray_rule(WM_LBUTTONDBLCLK, K::PointerButton, |n| tray_button(n, Left, Press, 2)),
        tray_rule(WM_RBUTTONDOWN, K::PointerButton, |n| tray_button(n, Right, Press, 1)),
        tray_rule(WM_RBUTTONUP, K::PointerButton, |n| tray_button(n, Right, Release, 1)),
        tray_rule(WM_RBUTTONDBLCLK, K::PointerButton, |n| tray_button(n, Right, Press, 2)),
        tray_rule(WM_MBUTTONDOWN, K::PointerButton, |n| tray_button(n, Middle, Press, 1)),
        tray_rule(WM_MBUTTONUP, K::PointerButton, |n| tray_button(n, Middle, Release, 1)),
        tray_rule(WM_MBUTTONDBLCLK, K::PointerButton, |n| tray_button(n, Middle, Press, 2)),
        tray_rule(WM_CONTEXTMENU, K::ContextMenuRequested, |n| {
            WindowEvent::ContextMenuRequested {
                position: n.anchor,
                source: tray_source(n),
            }
        }),
        tray_rule(NIN_SELECT, K::TrayIconSelected, tray_select),
        tray_rule(NIN_KEYSELECT, K::TrayIconSelected, tray_select),
        tray_rule(NIN_BALLOONSHOW, K::BalloonShown, |n| WindowEvent::BalloonShown {
            icon_id: n.icon_id,
        }),
        tray_rule(NIN_BALLOONHIDE, K::BalloonHidden, |n| WindowEvent::BalloonHidden {
            icon_id: n.icon_id,
        }),
        tray_rule(NIN_BALLOONTIMEOUT, K::BalloonTimedOut, |n| {
            WindowEvent::BalloonTimedOut { icon_id: n.icon_id }
        }),
        tray_rule(NIN_BALLOONUSERCLICK, K::BalloonUserDismissed, |n| {
            WindowEvent::BalloonUserDismissed { icon_id: n.icon_id }
        }),
        tray_rule(NIN_POPUPOPEN, K::PopupOpened, |n| WindowEvent::PopupOpened {
            icon_id: n.icon_id,
            anchor: n.anchor,
        }),
        tray_rule(NIN_POPUPCLOSE, K::PopupClosed, |n| WindowEvent::PopupClosed {
            icon_id: n.icon_id,
        }),
    ]
}

fn button(
    m: &RawMessage,
    button: MouseButton,
    transition: ButtonTransition,
    click_count: u8,
) -> WindowEvent {
    WindowEvent::PointerButton {
        button,
        transition,
        click_count,
        position: Some(packed_point(m.lparam as usize)),
        source: InputSource::Window,
    }
}

fn x_button(m: &RawMessage, transition: ButtonTransition, click_count: u8) -> WindowEvent {
    let which = if hiword(m.wparam) == XBUTTON2 {
        MouseButton::X2
    } else {
        MouseButton::X1
    };
    button(m, which, transition, click_count)
}

fn tray_source(n: &TrayNotification) -> InputSource {
    InputSource::TrayIcon { icon_id: n.icon_id }
}

fn tray_button(
    n: &TrayNotification,
    button: MouseButton,
    transition: ButtonTransition,
    click_count: u8,
) -> WindowEvent {
    WindowEvent::PointerButton {
        button,
        transition,
        click_count,
        position: n.anchor,
        source: tray_source(n),
    }
}

fn tray_select(n: &TrayNotification) -> WindowEvent {
    let input = if n.code & NINF_KEY != 0 {
        SelectInput::Keyboard
    } else {
        SelectInput::Mouse
    };
    WindowEvent::TrayIconSelected {
        input,
        icon_id: n.icon_id,
        anchor: n.anchor,
    }
}

fn size_kind(wparam: usize) -> SizeKind {
    match wparam {
        SIZE_RESTORED => SizeKind::Restored,
        SIZE_MINIMIZED => SizeKind::Minimized,
        SIZE_MAXIMIZED => SizeKind::Maximized,
        SIZE_MAXSHOW => SizeKind::MaxShow,
        SIZE_MAXHIDE => SizeKind::MaxHide,
        other => SizeKind::Other(other),
    }
}

fn sizing_edge(wparam: usize) -> SizingEdge {
    match wparam {
        WMSZ_LEFT => SizingEdge::Left,
        WMSZ_RIGHT => SizingEdge::Right,
        WMSZ_TOP => SizingEdge::Top,
        WMSZ_TOPLEFT => SizingEdge::TopLeft,
        WMSZ_TOPRIGHT => SizingEdge::TopRight,
        WMSZ_BOTTOM => SizingEdge::Bottom,
        WMSZ_BOTTOMLEFT => SizingEdge::BottomLeft,
        WMSZ_BOTTOMRIGHT => SizingEdge::BottomRight,
        other => SizingEdge::Unknown(other),
    }
}

fn icon_size(wparam: usize) -> IconSize {
    match wparam {
        ICON_SMALL => IconSize::Small,
        ICON_BIG => IconSize::Big,
        ICON_SMALL2 => IconSize::SmallApp,
        other => IconSize::Other(other),
    }
}

/// Classifier bound to one hook's tray configuration.
#[derive(Debug, Clone, Copy)]
pub struct Classifier {
    tray_callback: Option<u32>,
    protocol: TrayProtocol,
}

impl Classifier {
    /// Classifier using the tray callback and protocol from `config`.
    pub fn new(config: &HookConfig) -> Self {
        Self {
            tray_callback: config.tray_callback_message,
            protocol: config.tray_protocol,
        }
    }

    /// Tray protocol used to unpack callback messages.
    pub fn protocol(&self) -> TrayProtocol {
        self.protocol
    }

    /// Whether `code` is the configured tray callback message.
    pub fn is_tray_callback(&self, code: u32) -> bool {
        self.tray_callback == Some(code)
    }

    /// Classify one raw message. `None` means the code is not recognized.
    pub fn classify(&self, msg: &RawMessage) -> Option<WindowEvent> {
        if let Some(notification) = self.unpack_tray(msg) {
            let (_, decode) = tables().tray.get(&notification.code)?;
            return Some(decode(&notification));
        }
        let (_, decode) = tables().window.get(&msg.code)?;
        Some(decode(msg))
    }

    /// Unpack a tray callback message. `None` if `msg` is not the tray callback.
    pub fn unpack_tray(&self, msg: &RawMessage) -> Option<TrayNotification> {
        if !self.is_tray_callback(msg.code) {
            return None;
        }
        let notification = match self.protocol {
            TrayProtocol::Version4 => TrayNotification {
                code: loword(msg.lparam as usize) as u32,
                icon_id: hiword(msg.lparam as usize) as u32,
                anchor: Some(packed_point(msg.wparam)),
            },
            TrayProtocol::Legacy => TrayNotification {
                code: msg.lparam as u32,
                icon_id: msg.wparam as u32,
                anchor: None,
            },
        };
        Some(notification)
    }

    /// Kind a window message code maps to, if any.
    pub fn window_kind(code: u32) -> Option<EventKind> {
        tables().window.get(&code).map(|(kind, _)| *kind)
    }

    /// Kind a tray notification code maps to, if any.
    pub fn tray_kind(code: u32) -> Option<EventKind> {
        tables().tray.get(&code).map(|(kind, _)| *kind)
    }

    /// Every recognized window code with its kind, sorted by code.
    pub fn recognized_codes() -> Vec<(u32, EventKind)> {
        let mut codes: Vec<_> = tables()
            .window
            .iter()
            .map(|(code, (kind, _))| (*code, *kind))
            .collect();
        codes.sort();
        codes
    }

    /// Every recognized tray notification code with its kind, sorted by code.
    pub fn recognized_tray_codes() -> Vec<(u32, EventKind)> {
        let mut codes: Vec<_> = tables()
            .tray
            .iter()
            .map(|(code, (kind, _))| (*code, *kind))
            .collect();
        codes.sort();
        codes
    }
}

impl Default for Classifier {
    fn default() -> Self {
        Self::new(&HookConfig::default())
    }
}

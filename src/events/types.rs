//! Typed window events.
//!
//! `EventKind` is the closed set of categories listeners subscribe to;
//! `WindowEvent` carries each category's payload. This module is pure Rust
//! with no FFI dependencies, making it fully testable.

use crate::model::{Point, WindowId};

/// Event category, used as the subscription key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EventKind {
    // === Geometry ===
    WindowMoved,
    WindowMoving,
    WindowResized,
    WindowResizing,
    MinMaxConstraintsQueried,
    EnabledStateChanged,
    DragLoopEntered,
    DragLoopExited,

    // === Input ===
    ContextMenuRequested,
    PointerMoved,
    PointerButton,

    // === Shell / display ===
    IconAssociated,
    DisplayDpiChanged,
    DisplayResolutionChanged,
    SystemSettingChanged,
    ThemeChanged,

    // === Tray icon ===
    TrayIconSelected,
    BalloonShown,
    BalloonHidden,
    BalloonTimedOut,
    BalloonUserDismissed,
    PopupOpened,
    PopupClosed,

    // === Derived by the drag state machine ===
    DragStarted,
    DragEnded,
}

impl EventKind {
    /// Every kind, in declaration order.
    pub const ALL: [EventKind; 25] = [
        EventKind::WindowMoved,
        EventKind::WindowMoving,
        EventKind::WindowResized,
        EventKind::WindowResizing,
        EventKind::MinMaxConstraintsQueried,
        EventKind::EnabledStateChanged,
        EventKind::DragLoopEntered,
        EventKind::DragLoopExited,
        EventKind::ContextMenuRequested,
        EventKind::PointerMoved,
        EventKind::PointerButton,
        EventKind::IconAssociated,
        EventKind::DisplayDpiChanged,
        EventKind::DisplayResolutionChanged,
        EventKind::SystemSettingChanged,
        EventKind::ThemeChanged,
        EventKind::TrayIconSelected,
        EventKind::BalloonShown,
        EventKind::BalloonHidden,
        EventKind::BalloonTimedOut,
        EventKind::BalloonUserDismissed,
        EventKind::PopupOpened,
        EventKind::PopupClosed,
        EventKind::DragStarted,
        EventKind::DragEnded,
    ];

    /// Kinds produced by the hook itself rather than classified from a code.
    pub fn is_derived(&self) -> bool {
        matches!(self, EventKind::DragStarted | EventKind::DragEnded)
    }

    /// Kinds that end a balloon instance.
    pub fn is_balloon_terminal(&self) -> bool {
        matches!(
            self,
            EventKind::BalloonHidden | EventKind::BalloonTimedOut | EventKind::BalloonUserDismissed
        )
    }

    /// Returns a human-readable description of the kind for logs.
    pub fn description(&self) -> &'static str {
        match self {
            EventKind::WindowMoved => "Window moved",
            EventKind::WindowMoving => "Window being moved",
            EventKind::WindowResized => "Window resized",
            EventKind::WindowResizing => "Window being resized",
            EventKind::MinMaxConstraintsQueried => "Min/max size queried",
            EventKind::EnabledStateChanged => "Enabled state changed",
            EventKind::DragLoopEntered => "Move/size loop entered",
            EventKind::DragLoopExited => "Move/size loop exited",
            EventKind::ContextMenuRequested => "Context menu requested",
            EventKind::PointerMoved => "Pointer moved",
            EventKind::PointerButton => "Pointer button",
            EventKind::IconAssociated => "Icon associated",
            EventKind::DisplayDpiChanged => "Display DPI changed",
            EventKind::DisplayResolutionChanged => "Display resolution changed",
            EventKind::SystemSettingChanged => "System setting changed",
            EventKind::ThemeChanged => "Theme changed",
            EventKind::TrayIconSelected => "Tray icon selected",
            EventKind::BalloonShown => "Balloon shown",
            EventKind::BalloonHidden => "Balloon hidden",
            EventKind::BalloonTimedOut => "Balloon timed out",
            EventKind::BalloonUserDismissed => "Balloon dismissed by user",
            EventKind::PopupOpened => "Tray popup opened",
            EventKind::PopupClosed => "Tray popup closed",
            EventKind::DragStarted => "Interactive drag started",
            EventKind::DragEnded => "Interactive drag ended",
        }
    }
}

/// Where a pointer or context-menu event originated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputSource {
    /// The window's own client area.
    Window,
    /// The tray icon, via the tray callback message.
    TrayIcon { icon_id: u32 },
}

/// Pointer button named by a button message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
    /// First extra button (usually "back").
    X1,
    /// Second extra button (usually "forward").
    X2,
}

/// Direction of a button change. Double-clicks are presses with
/// `click_count == 2`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonTransition {
    /// Button went down.
    Press,
    /// Button came up.
    Release,
}

/// How a tray icon was activated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectInput {
    /// NIN_SELECT, or a left-button release under the legacy protocol.
    Mouse,
    /// NIN_KEYSELECT (Space or Enter on the focused icon).
    Keyboard,
}

/// WM_SIZE request kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SizeKind {
    Restored,
    Minimized,
    Maximized,
    MaxShow,
    MaxHide,
    /// Value not defined by the headers, kept as-is.
    Other(usize),
}

/// Edge or corner being dragged in WM_SIZING.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SizingEdge {
    Left,
    Right,
    Top,
    TopLeft,
    TopRight,
    Bottom,
    BottomLeft,
    BottomRight,
    /// Value not defined by the headers, kept as-is.
    Unknown(usize),
}

/// WM_SETICON icon size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IconSize {
    Small,
    Big,
    /// Application-provided small icon (ICON_SMALL2).
    SmallApp,
    Other(usize),
}

/// Whether a move/resize step is part of a user drag or was requested in code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Interaction {
    /// Inside a move/size loop, so the user is dragging the frame.
    Interactive,
    /// Outside a move/size loop (SetWindowPos and friends).
    Programmatic,
}

/// Event payloads, one variant per `EventKind`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WindowEvent {
    WindowMoved {
        /// Client-area origin in screen coordinates.
        position: Point,
    },
    WindowMoving,
    WindowResized {
        kind: SizeKind,
        width: u16,
        height: u16,
    },
    WindowResizing {
        edge: SizingEdge,
    },
    MinMaxConstraintsQueried,
    EnabledStateChanged {
        enabled: bool,
    },
    DragLoopEntered,
    DragLoopExited,
    ContextMenuRequested {
        /// `None` when requested from the keyboard.
        position: Option<Point>,
        source: InputSource,
    },
    PointerMoved {
        position: Option<Point>,
        source: InputSource,
    },
    PointerButton {
        button: MouseButton,
        transition: ButtonTransition,
        click_count: u8,
        position: Option<Point>,
        source: InputSource,
    },
    IconAssociated {
        size: IconSize,
    },
    DisplayDpiChanged {
        /// DPI before the change, if known.
        previous: Option<u16>,
        dpi_x: u16,
        dpi_y: u16,
    },
    DisplayResolutionChanged {
        width: u16,
        height: u16,
        bits_per_pixel: u32,
    },
    SystemSettingChanged {
        /// SPI_* flag of WM_SETTINGCHANGE; `None` for WM_SYSCOLORCHANGE.
        setting: Option<u32>,
    },
    ThemeChanged {
        /// True for DWM colorization updates, false for visual style changes.
        colorization: bool,
    },
    TrayIconSelected {
        input: SelectInput,
        icon_id: u32,
        anchor: Option<Point>,
    },
    BalloonShown {
        icon_id: u32,
    },
    BalloonHidden {
        icon_id: u32,
    },
    BalloonTimedOut {
        icon_id: u32,
    },
    BalloonUserDismissed {
        icon_id: u32,
    },
    PopupOpened {
        icon_id: u32,
        anchor: Option<Point>,
    },
    PopupClosed {
        icon_id: u32,
    },
    DragStarted,
    DragEnded,
}

impl WindowEvent {
    /// Category this payload belongs to.
    pub fn kind(&self) -> EventKind {
        match self {
            WindowEvent::WindowMoved { .. } => EventKind::WindowMoved,
            WindowEvent::WindowMoving => EventKind::WindowMoving,
            WindowEvent::WindowResized { .. } => EventKind::WindowResized,
            WindowEvent::WindowResizing { .. } => EventKind::WindowResizing,
            WindowEvent::MinMaxConstraintsQueried => EventKind::MinMaxConstraintsQueried,
            WindowEvent::EnabledStateChanged { .. } => EventKind::EnabledStateChanged,
            WindowEvent::DragLoopEntered => EventKind::DragLoopEntered,
            WindowEvent::DragLoopExited => EventKind::DragLoopExited,
            WindowEvent::ContextMenuRequested { .. } => EventKind::ContextMenuRequested,
            WindowEvent::PointerMoved { .. } => EventKind::PointerMoved,
            WindowEvent::PointerButton { .. } => EventKind::PointerButton,
            WindowEvent::IconAssociated { .. } => EventKind::IconAssociated,
            WindowEvent::DisplayDpiChanged { .. } => EventKind::DisplayDpiChanged,
            WindowEvent::DisplayResolutionChanged { .. } => EventKind::DisplayResolutionChanged,
            WindowEvent::SystemSettingChanged { .. } => EventKind::SystemSettingChanged,
            WindowEvent::ThemeChanged { .. } => EventKind::ThemeChanged,
            WindowEvent::TrayIconSelected { .. } => EventKind::TrayIconSelected,
            WindowEvent::BalloonShown { .. } => EventKind::BalloonShown,
            WindowEvent::BalloonHidden { .. } => EventKind::BalloonHidden,
            WindowEvent::BalloonTimedOut { .. } => EventKind::BalloonTimedOut,
            WindowEvent::BalloonUserDismissed { .. } => EventKind::BalloonUserDismissed,
            WindowEvent::PopupOpened { .. } => EventKind::PopupOpened,
            WindowEvent::PopupClosed { .. } => EventKind::PopupClosed,
            WindowEvent::DragStarted => EventKind::DragStarted,
            WindowEvent::DragEnded => EventKind::DragEnded,
        }
    }
}

/// Delivery envelope handed to listeners.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HookEvent {
    pub window: WindowId,
    pub event: WindowEvent,
    /// Set for `WindowMoving` and `WindowResizing` only.
    pub interaction: Option<Interaction>,
    /// The message arrived in a lifecycle state that does not expect it
    /// (balloon end with no balloon shown, drag exit with no drag). Still
    /// delivered, since the message itself did occur.
    pub unexpected: bool,
}

impl HookEvent {
    /// Untagged envelope, as used for derived events.
    pub fn new(window: WindowId, event: WindowEvent) -> Self {
        Self {
            window,
            event,
            interaction: None,
            unexpected: false,
        }
    }

    pub fn kind(&self) -> EventKind {
        self.event.kind()
    }

    /// Moving or resizing driven by the user.
    pub fn is_interactive(&self) -> bool {
        self.interaction == Some(Interaction::Interactive)
    }
}

/// A listener's verdict on the message it observed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Disposition {
    /// Let the native chain process the message as usual.
    #[default]
    Continue,
    /// The message is fully handled; skip default processing.
    Handled,
}

impl Disposition {
    /// Handled wins over Continue.
    pub fn merge(self, other: Disposition) -> Disposition {
        if self == Disposition::Handled || other == Disposition::Handled {
            Disposition::Handled
        } else {
            Disposition::Continue
        }
    }
}

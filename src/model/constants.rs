//! Native message codes and parameter constants.
//!
//! Values match the Win32 headers (`winuser.h`, `shellapi.h`). They are kept
//! here as plain integers so the classifier and the state machines can be
//! built and tested on any platform.

// === Window geometry ===

/// Window moved; lParam is the new client-area origin.
pub const WM_MOVE: u32 = 0x0003;

/// Window resized; wParam is the SIZE_* kind, lParam the client extent.
pub const WM_SIZE: u32 = 0x0005;

/// Window enabled (wParam != 0) or disabled.
pub const WM_ENABLE: u32 = 0x000A;

/// Size or position about to change; lParam points to MINMAXINFO.
pub const WM_GETMINMAXINFO: u32 = 0x0024;

/// Frame edge being dragged; wParam is the WMSZ_* edge.
pub const WM_SIZING: u32 = 0x0214;

/// Window being moved; lParam points to the proposed RECT.
pub const WM_MOVING: u32 = 0x0216;

/// Modal move/size loop started.
pub const WM_ENTERSIZEMOVE: u32 = 0x0231;

/// Modal move/size loop finished.
pub const WM_EXITSIZEMOVE: u32 = 0x0232;

// === Window lifetime ===

/// Last message a window receives. The adapter force-detaches on it.
pub const WM_NCDESTROY: u32 = 0x0082;

// === Shell / icon ===

/// Icon associated with the window; wParam is the ICON_* size.
pub const WM_SETICON: u32 = 0x0080;

/// Context menu requested; lParam is the screen point or -1 from the keyboard.
pub const WM_CONTEXTMENU: u32 = 0x007B;

// === Display / theme ===

/// System colors changed.
pub const WM_SYSCOLORCHANGE: u32 = 0x0015;

/// System-wide setting changed; wParam is the SPI_* flag.
pub const WM_SETTINGCHANGE: u32 = 0x001A;

/// Display resolution changed; wParam is bits per pixel, lParam the extent.
pub const WM_DISPLAYCHANGE: u32 = 0x007E;

/// Effective DPI changed; wParam holds the new X and Y DPI.
pub const WM_DPICHANGED: u32 = 0x02E0;

/// Visual style changed.
pub const WM_THEMECHANGED: u32 = 0x031A;

/// DWM colorization color changed.
pub const WM_DWMCOLORIZATIONCOLORCHANGED: u32 = 0x0320;

// === Pointer ===

/// Pointer moved over the client area.
pub const WM_MOUSEMOVE: u32 = 0x0200;

/// Left button pressed.
pub const WM_LBUTTONDOWN: u32 = 0x0201;

/// Left button released.
pub const WM_LBUTTONUP: u32 = 0x0202;

/// Left button double-clicked.
pub const WM_LBUTTONDBLCLK: u32 = 0x0203;

/// Right button pressed.
pub const WM_RBUTTONDOWN: u32 = 0x0204;

/// Right button released.
pub const WM_RBUTTONUP: u32 = 0x0205;

/// Right button double-clicked.
pub const WM_RBUTTONDBLCLK: u32 = 0x0206;

/// Middle button pressed.
pub const WM_MBUTTONDOWN: u32 = 0x0207;

/// Middle button released.
pub const WM_MBUTTONUP: u32 = 0x0208;

/// Middle button double-clicked.
pub const WM_MBUTTONDBLCLK: u32 = 0x0209;

/// X button pressed; HIWORD(wParam) says which.
pub const WM_XBUTTONDOWN: u32 = 0x020B;

/// X button released.
pub const WM_XBUTTONUP: u32 = 0x020C;

/// X button double-clicked.
pub const WM_XBUTTONDBLCLK: u32 = 0x020D;

/// HIWORD(wParam) of an X button message for the first X button.
pub const XBUTTON1: u16 = 0x0001;

/// HIWORD(wParam) of an X button message for the second X button.
pub const XBUTTON2: u16 = 0x0002;

// === Application message ranges ===

/// First code of the class-private message range.
pub const WM_USER: u32 = 0x0400;

/// First code of the application-private message range.
pub const WM_APP: u32 = 0x8000;

/// Upper bound of the range usable for a private tray callback message.
pub const APP_MESSAGE_LAST: u32 = 0xBFFF;

// === Tray notifications (delivered inside the tray callback message) ===

/// Icon selected with the mouse.
pub const NIN_SELECT: u32 = WM_USER;

/// Set on NIN_SELECT when the icon was activated from the keyboard.
pub const NINF_KEY: u32 = 0x0001;

/// Icon selected from the keyboard.
pub const NIN_KEYSELECT: u32 = NIN_SELECT | NINF_KEY;

/// Balloon tooltip shown.
pub const NIN_BALLOONSHOW: u32 = WM_USER + 2;

/// Balloon tooltip hidden (icon removed or replaced).
pub const NIN_BALLOONHIDE: u32 = WM_USER + 3;

/// Balloon tooltip timed out or was closed with its X.
pub const NIN_BALLOONTIMEOUT: u32 = WM_USER + 4;

/// Balloon tooltip clicked by the user.
pub const NIN_BALLOONUSERCLICK: u32 = WM_USER + 5;

/// Rich popup should open (pointer hovered the icon).
pub const NIN_POPUPOPEN: u32 = WM_USER + 6;

/// Rich popup should close.
pub const NIN_POPUPCLOSE: u32 = WM_USER + 7;

// === Parameter values ===

/// WM_SIZE: restored.
pub const SIZE_RESTORED: usize = 0;

/// WM_SIZE: minimized.
pub const SIZE_MINIMIZED: usize = 1;

/// WM_SIZE: maximized.
pub const SIZE_MAXIMIZED: usize = 2;

/// WM_SIZE: another window was restored.
pub const SIZE_MAXSHOW: usize = 3;

/// WM_SIZE: another window was maximized.
pub const SIZE_MAXHIDE: usize = 4;

/// WM_SETICON: small icon.
pub const ICON_SMALL: usize = 0;

/// WM_SETICON: large icon.
pub const ICON_BIG: usize = 1;

/// WM_SETICON: small icon provided by the application.
pub const ICON_SMALL2: usize = 2;

/// WM_SIZING: left edge.
pub const WMSZ_LEFT: usize = 1;

/// WM_SIZING: right edge.
pub const WMSZ_RIGHT: usize = 2;

/// WM_SIZING: top edge.
pub const WMSZ_TOP: usize = 3;

/// WM_SIZING: top-left corner.
pub const WMSZ_TOPLEFT: usize = 4;

/// WM_SIZING: top-right corner.
pub const WMSZ_TOPRIGHT: usize = 5;

/// WM_SIZING: bottom edge.
pub const WMSZ_BOTTOM: usize = 6;

/// WM_SIZING: bottom-left corner.
pub const WMSZ_BOTTOMLEFT: usize = 7;

/// WM_SIZING: bottom-right corner.
pub const WMSZ_BOTTOMRIGHT: usize = 8;

/// Value of lParam in WM_CONTEXTMENU when the menu was requested from the keyboard.
pub const CONTEXT_MENU_FROM_KEYBOARD: isize = -1;

/// Baseline DPI (100% scaling).
pub const DEFAULT_DPI: u16 = 96;

//! Win32 implementation of the native host.
//!
//! - Liveness via `IsWindow`
//! - Message interception via comctl32 subclassing
//! - DPI seed via `GetDpiForWindow`

mod subclass;

use std::rc::Weak;

use windows::Win32::UI::HiDpi::GetDpiForWindow;
use windows::Win32::UI::WindowsAndMessaging::IsWindow;

use crate::hook::{MessageRoute, NativeHost};
use crate::model::WindowId;

use subclass::to_hwnd;

/// Native host backed by the Win32 API. Use it only on the thread that owns
/// the windows it hooks.
#[derive(Debug, Default)]
pub struct Win32Host;

impl Win32Host {
    /// Host for windows owned by the calling thread.
    pub fn new() -> Self {
        Self
    }
}

impl NativeHost for Win32Host {
    fn window_exists(&self, window: WindowId) -> bool {
        unsafe { IsWindow(Some(to_hwnd(window))) }.as_bool()
    }

    fn is_hooked(&self, window: WindowId) -> bool {
        subclass::is_hooked(window)
    }

    fn install(&self, window: WindowId, route: Weak<dyn MessageRoute>) -> bool {
        subclass::install(window, route)
    }

    fn uninstall(&self, window: WindowId) -> bool {
        subclass::uninstall(window)
    }

    fn window_dpi(&self, window: WindowId) -> Option<u16> {
        match unsafe { GetDpiForWindow(to_hwnd(window)) } {
            0 => None,
            dpi => u16::try_from(dpi).ok(),
        }
    }
}

//! Comctl32 window subclassing.
//!
//! One subclass procedure serves every hooked window. The route for each
//! window lives in a thread-local table: subclass procedures only ever run on
//! the thread that owns the window, which is also the thread that attached.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Weak;

use log::{trace, warn};
use windows::Win32::Foundation::{HWND, LPARAM, LRESULT, WPARAM};
use windows::Win32::UI::Shell::{DefSubclassProc, RemoveWindowSubclass, SetWindowSubclass};

use crate::hook::{Directive, MessageRoute};
use crate::model::{RawMessage, WindowId};

const HOOK_SUBCLASS_ID: usize = 0x574D_5348; // "WMSH"

thread_local! {
    static ROUTES: RefCell<HashMap<isize, Weak<dyn MessageRoute>>> = RefCell::new(HashMap::new());
}

pub(crate) fn to_hwnd(window: WindowId) -> HWND {
    HWND(window.0 as *mut core::ffi::c_void)
}

fn route_for(hwnd: HWND) -> Option<Weak<dyn MessageRoute>> {
    ROUTES.with(|routes| routes.borrow().get(&(hwnd.0 as isize)).cloned())
}

unsafe extern "system" fn hook_subclass_proc(
    hwnd: HWND,
    msg: u32,
    w_param: WPARAM,
    l_param: LPARAM,
    _u_id_subclass: usize,
    _dw_ref_data: usize,
) -> LRESULT {
    // The table borrow is released before routing; listeners may attach or
    // detach windows, which writes to it.
    if let Some(route) = route_for(hwnd).and_then(|weak| weak.upgrade()) {
        let raw = RawMessage::new(msg, w_param.0, l_param.0);
        if let Directive::Handled(result) = route.route(WindowId(hwnd.0 as isize), &raw) {
            return LRESULT(result);
        }
    }
    unsafe { DefSubclassProc(hwnd, msg, w_param, l_param) }
}

/// True while `window` has a route whose owner is still alive.
pub(crate) fn is_hooked(window: WindowId) -> bool {
    ROUTES.with(|routes| {
        routes
            .borrow()
            .get(&window.0)
            .is_some_and(|route| route.strong_count() > 0)
    })
}

/// Route `window` to `route`. Refuses a window that already routes to a live owner.
pub(crate) fn install(window: WindowId, route: Weak<dyn MessageRoute>) -> bool {
    if is_hooked(window) {
        warn!("[win32] {} already routes to another owner", window);
        return false;
    }
    let hwnd = to_hwnd(window);
    ROUTES.with(|routes| routes.borrow_mut().insert(window.0, route));
    let ok = unsafe { SetWindowSubclass(hwnd, Some(hook_subclass_proc), HOOK_SUBCLASS_ID, 0) };
    if !ok.as_bool() {
        ROUTES.with(|routes| routes.borrow_mut().remove(&window.0));
        warn!("[win32] SetWindowSubclass refused for {}", window);
        return false;
    }
    trace!("[win32] Subclass installed on {}", window);
    true
}

/// Drop the route and remove the subclass. False if nothing was installed.
pub(crate) fn uninstall(window: WindowId) -> bool {
    let known = ROUTES.with(|routes| routes.borrow_mut().remove(&window.0).is_some());
    if !known {
        return false;
    }
    let ok = unsafe {
        RemoveWindowSubclass(to_hwnd(window), Some(hook_subclass_proc), HOOK_SUBCLASS_ID)
    };
    if !ok.as_bool() {
        // Window already destroyed; comctl32 removed the subclass itself.
        trace!("[win32] RemoveWindowSubclass failed for {}", window);
    }
    true
}

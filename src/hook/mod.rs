//! Window hook and dispatch loop adapter.
//!
//! - [`window_hook`]: per-window classify, track, fan-out
//! - [`adapter`]: attach/detach against the native host, forced teardown
//! - [`attachment`]: RAII ownership of one attached window
//! - [`host`]: the native seam (`NativeHost`, `MessageRoute`)

pub mod adapter;
pub mod attachment;
pub mod host;
pub mod window_hook;

pub use adapter::Adapter;
pub use attachment::{DetachHandle, HookAttachment};
pub use host::{MessageRoute, NativeHost};
pub use window_hook::WindowHook;

use crate::events::Disposition;

/// What the native chain should do with a message after the hook has seen it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Directive {
    /// Pass the message on to the next handler / default window procedure.
    #[default]
    Continue,
    /// Stop here and return this value to the sender.
    Handled(isize),
}

impl Directive {
    /// Default processing is skipped.
    pub fn is_handled(self) -> bool {
        matches!(self, Directive::Handled(_))
    }
}

impl From<Disposition> for Directive {
    fn from(disposition: Disposition) -> Self {
        match disposition {
            Disposition::Continue => Directive::Continue,
            Disposition::Handled => Directive::Handled(0),
        }
    }
}

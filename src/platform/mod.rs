//! Platform-specific native hosts.
//!
//! The hook core is platform-free and talks to the windowing system through
//! [`NativeHost`](crate::hook::NativeHost). Only Windows has a real host.

#[cfg(target_os = "windows")]
pub mod windows;

#[cfg(target_os = "windows")]
pub use self::windows::Win32Host;

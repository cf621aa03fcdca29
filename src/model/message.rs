//! Raw message representation (pure Rust, no FFI).

use std::fmt;

/// Opaque identifier of a native window (the numeric value of its handle).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WindowId(pub isize);

impl fmt::Display for WindowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#x}", self.0)
    }
}

/// One message as delivered by the windowing system: code plus both parameters.
///
/// Only lives for the duration of a single dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawMessage {
    pub code: u32,
    pub wparam: usize,
    pub lparam: isize,
}

impl RawMessage {
    /// Build a message from its code and raw parameters.
    pub fn new(code: u32, wparam: usize, lparam: isize) -> Self {
        Self {
            code,
            wparam,
            lparam,
        }
    }
}

/// A point in screen or client coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    /// Point at (`x`, `y`).
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Low 16 bits of a parameter.
pub fn loword(value: usize) -> u16 {
    (value & 0xFFFF) as u16
}

/// Bits 16..32 of a parameter.
pub fn hiword(value: usize) -> u16 {
    ((value >> 16) & 0xFFFF) as u16
}

/// Signed x coordinate packed in the low word (GET_X_LPARAM).
pub fn signed_x(value: usize) -> i32 {
    loword(value) as i16 as i32
}

/// Signed y coordinate packed in the high word (GET_Y_LPARAM).
pub fn signed_y(value: usize) -> i32 {
    hiword(value) as i16 as i32
}

/// Unpack a point from a packed parameter.
pub fn packed_point(value: usize) -> Point {
    Point::new(signed_x(value), signed_y(value))
}

/// Build a packed parameter from two words (MAKELPARAM).
pub fn make_param(low: u16, high: u16) -> usize {
    (low as usize) | ((high as usize) << 16)
}

/// Pack a signed point the way the system does for mouse messages.
pub fn pack_point(x: i32, y: i32) -> usize {
    make_param(x as i16 as u16, y as i16 as u16)
}

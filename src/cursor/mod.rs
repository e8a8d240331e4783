//! Cursor decoding subsystem.
//!
//! - `source`: where raw cursor bitmaps come from (the OS seam)
//! - `bitmap`: raw bitmap model and mask bit addressing
//! - `decode`: the true-color, indexed and monochrome decoding paths
//! - `shape`: well-known system cursor shapes
//! - `loader`: per-handle cache of decoded cursors
//! - `win32`: GDI-backed source (Windows only)

pub mod bitmap;
pub mod decode;
pub mod loader;
pub mod shape;
pub mod source;

#[cfg(windows)]
mod win32;

use serde::{Deserialize, Serialize};
use std::fmt;

// Re-export commonly used types
pub use bitmap::{bit_position, MaskPlane, RawBitmap, RawCursor};
pub use decode::{decode, CursorEncoding, DecodedCursor};
pub use loader::{CursorLoader, SharedCursorLoader};
pub use shape::SystemCursor;
pub use source::CursorSource;

#[cfg(windows)]
pub use win32::WindowsCursorSource;

/// Opaque OS cursor handle, used as the cache key.
///
/// The value is only meaningful to the [`CursorSource`] that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CursorHandle(usize);

impl CursorHandle {
    pub const fn from_raw(raw: usize) -> Self {
        Self(raw)
    }

    pub const fn as_raw(self) -> usize {
        self.0
    }

    /// Null handles never name a cursor.
    pub const fn is_null(self) -> bool {
        self.0 == 0
    }
}

impl fmt::Display for CursorHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#x}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_handle_display_is_hex() {
        assert_eq!(CursorHandle::from_raw(0x10003).to_string(), "0x10003");
    }

    #[test]
    fn test_handle_serde_is_transparent() {
        let handle = CursorHandle::from_raw(65539);
        assert_eq!(serde_json::to_string(&handle).unwrap(), "65539");
        let parsed: CursorHandle = serde_json::from_str("65539").unwrap();
        assert_eq!(parsed, handle);
    }

    #[test]
    fn test_null_handle() {
        assert!(CursorHandle::from_raw(0).is_null());
        assert!(!CursorHandle::from_raw(1).is_null());
    }
}

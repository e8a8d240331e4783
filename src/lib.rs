//! Turns OS cursor handles into RGBA bitmaps with hotspots.
//!
//! A broadcasting pipeline polls [`CursorLoader::get_current`] once per
//! frame and composites the returned [`DecodedCursor`] onto the captured
//! image. `primary_image` is alpha blended; `invert_image`, present only for
//! legacy monochrome cursors, marks pixels that invert the frame beneath.
//!
//! On Windows, [`WindowsCursorSource`] reads cursors through GDI. Any other
//! [`CursorSource`] can be plugged in instead.

pub mod config;
pub mod cursor;
pub mod error;

pub use config::LoaderConfig;
pub use cursor::loader::decode_handle;
pub use cursor::{
    CursorEncoding, CursorHandle, CursorLoader, CursorSource, DecodedCursor, RawBitmap, RawCursor,
    SharedCursorLoader, SystemCursor,
};
pub use error::{CursorError, CursorResult};

#[cfg(windows)]
pub use cursor::WindowsCursorSource;

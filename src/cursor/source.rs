//! Where cursor bitmaps come from.
//!
//! The loader never talks to the OS directly. A [`CursorSource`] resolves
//! handles and copies their bitmaps out into owned [`RawCursor`] values, so
//! every OS resource it touches is released before the call returns.

use super::bitmap::RawCursor;
use super::shape::SystemCursor;
use super::CursorHandle;
use crate::error::CursorResult;

pub trait CursorSource {
    /// Handle of the cursor currently shown on screen, if the OS reports one.
    fn current_cursor(&self) -> CursorResult<Option<CursorHandle>>;

    /// Resolve a shared system cursor. `None` if the OS does not provide it.
    fn system_cursor(&self, cursor: SystemCursor) -> Option<CursorHandle>;

    /// Copy the hotspot, mask and color bitmaps for `handle`.
    fn read_cursor(&self, handle: CursorHandle) -> CursorResult<RawCursor>;
}

impl<S: CursorSource + ?Sized> CursorSource for &S {
    fn current_cursor(&self) -> CursorResult<Option<CursorHandle>> {
        (**self).current_cursor()
    }

    fn system_cursor(&self, cursor: SystemCursor) -> Option<CursorHandle> {
        (**self).system_cursor(cursor)
    }

    fn read_cursor(&self, handle: CursorHandle) -> CursorResult<RawCursor> {
        (**self).read_cursor(handle)
    }
}

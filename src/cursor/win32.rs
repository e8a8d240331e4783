//! GDI implementation of [`CursorSource`].
//!
//! `GetIconInfo` hands back copies of the cursor's mask and color bitmaps
//! that the caller must delete. They, and the memory DC used to read them,
//! are wrapped in guards as soon as they exist so every exit path releases
//! them exactly once.

use super::bitmap::{dib_stride, RawBitmap, RawCursor};
use super::shape::SystemCursor;
use super::source::CursorSource;
use super::CursorHandle;
use crate::error::{CursorError, CursorResult};
use image::Rgba;
use std::ffi::c_void;
use std::mem;
use windows::core::PCWSTR;
use windows::Win32::Foundation::POINT;
use windows::Win32::Graphics::Gdi::{
    CreateCompatibleDC, DeleteDC, DeleteObject, GetDIBits, GetObjectW, BITMAP, BITMAPINFO,
    BITMAPINFOHEADER, BI_RGB, DIB_RGB_COLORS, HBITMAP, HDC, RGBQUAD,
};
use windows::Win32::UI::WindowsAndMessaging::{
    GetCursorInfo, GetIconInfo, LoadCursorW, CURSORINFO, CURSORINFO_FLAGS, HCURSOR, HICON,
    ICONINFO,
};

impl From<HCURSOR> for CursorHandle {
    fn from(cursor: HCURSOR) -> Self {
        CursorHandle::from_raw(cursor.0 as usize)
    }
}

/// GDI bitmap owned by us, deleted on drop.
struct OwnedBitmap(HBITMAP);

impl OwnedBitmap {
    fn is_present(&self) -> bool {
        !self.0.is_invalid()
    }
}

impl Drop for OwnedBitmap {
    fn drop(&mut self) {
        if self.is_present() {
            unsafe {
                let _ = DeleteObject(self.0);
            }
        }
    }
}

/// Memory DC used as the reference context for `GetDIBits`.
struct MemoryDc(HDC);

impl MemoryDc {
    fn new() -> CursorResult<Self> {
        let dc = unsafe { CreateCompatibleDC(None) };
        if dc.is_invalid() {
            return Err(CursorError::Gdi {
                call: "CreateCompatibleDC",
            });
        }
        Ok(Self(dc))
    }
}

impl Drop for MemoryDc {
    fn drop(&mut self) {
        unsafe {
            let _ = DeleteDC(self.0);
        }
    }
}

/// `BITMAPINFO` with room for a full 256-entry color table.
/// `GetDIBits` writes the palette of indexed formats right after the header.
#[repr(C)]
struct DibInfo {
    header: BITMAPINFOHEADER,
    colors: [RGBQUAD; 256],
}

fn bitmap_metadata(bitmap: &OwnedBitmap) -> CursorResult<BITMAP> {
    let mut info = BITMAP::default();
    let copied = unsafe {
        GetObjectW(
            bitmap.0,
            mem::size_of::<BITMAP>() as i32,
            Some(&mut info as *mut BITMAP as *mut c_void),
        )
    };
    if copied == 0 {
        return Err(CursorError::Gdi { call: "GetObjectW" });
    }
    Ok(info)
}

/// Copy a bitmap's pixels out as a top-down DIB of the requested depth.
fn read_dib(
    dc: &MemoryDc,
    bitmap: &OwnedBitmap,
    width: i32,
    height: i32,
    bits_per_pixel: u16,
) -> CursorResult<RawBitmap> {
    let (width_px, height_px) = match (u32::try_from(width), u32::try_from(height)) {
        (Ok(w), Ok(h)) if w > 0 && h > 0 => (w, h),
        _ => {
            return Err(CursorError::InvalidBitmap(format!(
                "GDI reported a {}x{} bitmap",
                width, height
            )))
        },
    };

    let mut info = DibInfo {
        header: BITMAPINFOHEADER {
            biSize: mem::size_of::<BITMAPINFOHEADER>() as u32,
            biWidth: width,
            biHeight: -height, // Negative for top-down DIB
            biPlanes: 1,
            biBitCount: bits_per_pixel,
            biCompression: BI_RGB.0,
            ..Default::default()
        },
        colors: [RGBQUAD::default(); 256],
    };

    let stride = dib_stride(width_px, bits_per_pixel);
    let mut pixels = vec![0u8; stride * height_px as usize];

    let lines = unsafe {
        GetDIBits(
            dc.0,
            bitmap.0,
            0,
            height_px,
            Some(pixels.as_mut_ptr().cast::<c_void>()),
            (&mut info as *mut DibInfo).cast::<BITMAPINFO>(),
            DIB_RGB_COLORS,
        )
    };
    if lines == 0 {
        return Err(CursorError::Gdi { call: "GetDIBits" });
    }

    let palette = if bits_per_pixel <= 8 {
        info.colors[..1usize << bits_per_pixel]
            .iter()
            .map(|quad| Rgba([quad.rgbRed, quad.rgbGreen, quad.rgbBlue, 255]))
            .collect()
    } else {
        Vec::new()
    };

    Ok(RawBitmap::new(width_px, height_px, bits_per_pixel, pixels).with_palette(palette))
}

fn read_color(dc: &MemoryDc, color: &OwnedBitmap) -> CursorResult<RawBitmap> {
    let info = bitmap_metadata(color)?;
    let (width, height) = (info.bmWidth, info.bmHeight.abs());

    match info.bmBitsPixel {
        1 | 32 => read_dib(dc, color, width, height, info.bmBitsPixel),
        depth => {
            // No alpha below 32 bits: let GDI expand to BGRA and mark every pixel opaque
            log::debug!("[CURSOR] Expanding {}-bit color bitmap to 32 bits", depth);
            let mut bitmap = read_dib(dc, color, width, height, 32)?;
            for quad in bitmap.pixels.chunks_exact_mut(4) {
                quad[3] = 255;
            }
            Ok(bitmap)
        },
    }
}

/// Reads cursors through GDI.
#[derive(Debug, Default, Clone, Copy)]
pub struct WindowsCursorSource;

impl WindowsCursorSource {
    pub fn new() -> Self {
        Self
    }
}

impl CursorSource for WindowsCursorSource {
    fn current_cursor(&self) -> CursorResult<Option<CursorHandle>> {
        let mut cursor_info = CURSORINFO {
            cbSize: mem::size_of::<CURSORINFO>() as u32,
            flags: CURSORINFO_FLAGS(0),
            hCursor: HCURSOR::default(),
            ptScreenPos: POINT::default(),
        };

        unsafe { GetCursorInfo(&mut cursor_info) }?;

        if cursor_info.hCursor.is_invalid() {
            return Ok(None);
        }
        Ok(Some(cursor_info.hCursor.into()))
    }

    fn system_cursor(&self, cursor: SystemCursor) -> Option<CursorHandle> {
        // MAKEINTRESOURCE: the id travels in the pointer value
        let name = PCWSTR(cursor.resource_id() as usize as *const u16);
        match unsafe { LoadCursorW(None, name) } {
            Ok(handle) if !handle.is_invalid() => Some(handle.into()),
            Ok(_) => None,
            Err(err) => {
                log::debug!("[CURSOR] LoadCursorW({}) failed: {}", cursor, err);
                None
            },
        }
    }

    fn read_cursor(&self, handle: CursorHandle) -> CursorResult<RawCursor> {
        let hicon = HICON(handle.as_raw() as *mut c_void);
        let mut icon_info = ICONINFO::default();
        if let Err(err) = unsafe { GetIconInfo(hicon, &mut icon_info) } {
            log::debug!("[CURSOR] GetIconInfo({}) failed: {}", handle, err);
            return Err(CursorError::InvalidHandle(handle));
        }

        let mask = OwnedBitmap(icon_info.hbmMask);
        let color = OwnedBitmap(icon_info.hbmColor);
        if !mask.is_present() {
            return Err(CursorError::MissingMask(handle));
        }

        let dc = MemoryDc::new()?;

        let mask_info = bitmap_metadata(&mask)?;
        let mask_bitmap = read_dib(&dc, &mask, mask_info.bmWidth, mask_info.bmHeight.abs(), 1)?;

        let color_bitmap = if color.is_present() {
            Some(read_color(&dc, &color)?)
        } else {
            None
        };

        Ok(RawCursor {
            hotspot_x: icon_info.xHotspot,
            hotspot_y: icon_info.yHotspot,
            mask: mask_bitmap,
            color: color_bitmap,
        })
    }
}

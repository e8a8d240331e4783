//! Raw cursor bitmaps and mask bit addressing.
//!
//! A [`RawCursor`] is what the OS hands back for a cursor handle, already
//! copied out into owned, top-down buffers. Everything that reads 1-bit
//! data goes through [`bit_position`] so the packing rules live in one place.

use crate::error::{CursorError, CursorResult};
use image::Rgba;

/// Bytes per row of a device-independent bitmap. Rows are padded to 32 bits.
pub fn dib_stride(width: u32, bits_per_pixel: u16) -> usize {
    (width as usize * bits_per_pixel as usize).div_ceil(32) * 4
}

/// Locate pixel `(x, y)` in a 1-bit, MSB-first bitmap with `stride` bytes per row.
///
/// Returns `(byte_index, shift)`: the pixel is `(data[byte_index] >> shift) & 1`.
pub fn bit_position(stride: usize, x: u32, y: u32) -> (usize, u8) {
    let bit_index = stride * 8 * y as usize + x as usize;
    (bit_index / 8, 7 - (bit_index % 8) as u8)
}

/// Bounds-checked view over a packed 1-bit plane.
#[derive(Debug, Clone, Copy)]
pub struct MaskPlane<'a> {
    data: &'a [u8],
    stride: usize,
    width: u32,
    height: u32,
}

impl<'a> MaskPlane<'a> {
    pub fn new(data: &'a [u8], stride: usize, width: u32, height: u32) -> CursorResult<Self> {
        if stride * 8 < width as usize {
            return Err(CursorError::InvalidBitmap(format!(
                "stride {} too small for {} pixels of 1-bit data",
                stride, width
            )));
        }
        let needed = stride * height as usize;
        if data.len() < needed {
            return Err(CursorError::InvalidBitmap(format!(
                "mask holds {} bytes, {}x{} needs {}",
                data.len(),
                width,
                height,
                needed
            )));
        }
        Ok(Self {
            data,
            stride,
            width,
            height,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Read the bit for `(x, y)`. Pixels outside the plane read as unset.
    pub fn bit(&self, x: u32, y: u32) -> bool {
        if x >= self.width || y >= self.height {
            return false;
        }
        let (byte, shift) = bit_position(self.stride, x, y);
        self.data
            .get(byte)
            .map_or(false, |value| (value >> shift) & 1 == 1)
    }

    /// Split a plane holding two vertically stacked halves (AND over XOR).
    pub fn split_stacked(&self) -> CursorResult<(MaskPlane<'a>, MaskPlane<'a>)> {
        let half = self.height / 2;
        if half == 0 {
            return Err(CursorError::InvalidBitmap(
                "stacked mask needs at least two rows".to_string(),
            ));
        }
        let split = self.stride * half as usize;
        let top = MaskPlane::new(&self.data[..split], self.stride, self.width, half)?;
        let bottom = MaskPlane::new(&self.data[split..], self.stride, self.width, half)?;
        Ok((top, bottom))
    }
}

/// One bitmap copied out of the OS in top-down row order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawBitmap {
    pub width: u32,
    pub height: u32,
    pub bits_per_pixel: u16,
    /// Bytes per row, including padding.
    pub stride: usize,
    pub pixels: Vec<u8>,
    /// Color table of an indexed bitmap. Empty for true-color data.
    pub palette: Vec<Rgba<u8>>,
}

impl RawBitmap {
    /// Wrap pixel rows laid out with DIB padding.
    pub fn new(width: u32, height: u32, bits_per_pixel: u16, pixels: Vec<u8>) -> Self {
        Self {
            width,
            height,
            bits_per_pixel,
            stride: dib_stride(width, bits_per_pixel),
            pixels,
            palette: Vec::new(),
        }
    }

    pub fn with_stride(mut self, stride: usize) -> Self {
        self.stride = stride;
        self
    }

    pub fn with_palette(mut self, palette: Vec<Rgba<u8>>) -> Self {
        self.palette = palette;
        self
    }

    pub fn validate(&self) -> CursorResult<()> {
        if self.width == 0 || self.height == 0 {
            return Err(CursorError::InvalidBitmap(format!(
                "empty {}x{} bitmap",
                self.width, self.height
            )));
        }
        let row_bytes = (self.width as usize * self.bits_per_pixel as usize).div_ceil(8);
        if self.stride < row_bytes {
            return Err(CursorError::InvalidBitmap(format!(
                "stride {} shorter than a {}-byte row",
                self.stride, row_bytes
            )));
        }
        let needed = self.stride * self.height as usize;
        if self.pixels.len() < needed {
            return Err(CursorError::InvalidBitmap(format!(
                "{} bytes of pixel data, {} needed",
                self.pixels.len(),
                needed
            )));
        }
        Ok(())
    }

    /// View a 1-bit bitmap as a mask plane.
    pub fn plane(&self) -> CursorResult<MaskPlane<'_>> {
        if self.bits_per_pixel != 1 {
            return Err(CursorError::InvalidBitmap(format!(
                "expected 1-bit data, got {} bits per pixel",
                self.bits_per_pixel
            )));
        }
        MaskPlane::new(&self.pixels, self.stride, self.width, self.height)
    }

    /// BGRA quad of a 32-bit pixel.
    pub fn bgra(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if self.bits_per_pixel != 32 || x >= self.width || y >= self.height {
            return None;
        }
        let offset = self.stride * y as usize + x as usize * 4;
        let quad = self.pixels.get(offset..offset + 4)?;
        Some([quad[0], quad[1], quad[2], quad[3]])
    }
}

/// Everything the OS reports about one cursor handle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawCursor {
    pub hotspot_x: u32,
    pub hotspot_y: u32,
    pub mask: RawBitmap,
    /// Absent for monochrome cursors.
    pub color: Option<RawBitmap>,
}

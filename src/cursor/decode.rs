//! Cursor bitmap decoding.
//!
//! Windows keeps cursors in three historical layouts:
//!
//! - **True color**: 32-bit BGRA color bitmap plus a 1-bit mask
//! - **Indexed**: 1-bit color bitmap with a palette plus a 1-bit mask
//! - **Monochrome**: no color bitmap; the mask stacks the AND plane over
//!   the XOR plane
//!
//! All three are normalized into a [`DecodedCursor`] with straight-alpha RGBA.

use super::bitmap::{RawBitmap, RawCursor};
use crate::error::{CursorError, CursorResult};
use image::{Rgba, RgbaImage};
use serde::{Deserialize, Serialize};

const TRANSPARENT: Rgba<u8> = Rgba([0, 0, 0, 0]);
const OPAQUE_BLACK: Rgba<u8> = Rgba([0, 0, 0, 255]);
const OPAQUE_WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);

/// Which pixel layout a cursor was decoded from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CursorEncoding {
    TrueColor,
    Indexed,
    Monochrome,
}

impl CursorEncoding {
    /// Pick the decoding path from the color bitmap's bit depth.
    pub fn classify(raw: &RawCursor) -> Self {
        match raw.color.as_ref().map(|color| color.bits_per_pixel) {
            Some(32) => Self::TrueColor,
            Some(1) => Self::Indexed,
            _ => Self::Monochrome,
        }
    }
}

/// A cursor image ready to be drawn onto a frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedCursor {
    /// Offset of the pointer tip from the image's top-left corner.
    pub hotspot_x: i32,
    pub hotspot_y: i32,
    pub width: u32,
    pub height: u32,
    /// Straight-alpha RGBA, alpha blended onto the frame.
    pub primary_image: RgbaImage,
    /// Pixels that invert whatever lies beneath them. Monochrome cursors only.
    pub invert_image: Option<RgbaImage>,
    pub encoding: CursorEncoding,
}

impl DecodedCursor {
    /// Number of pixel buffers this cursor owns.
    pub fn pixel_buffer_count(&self) -> usize {
        1 + usize::from(self.invert_image.is_some())
    }

    /// Total bytes held by the pixel buffers.
    pub fn byte_len(&self) -> usize {
        self.primary_image.as_raw().len()
            + self
                .invert_image
                .as_ref()
                .map_or(0, |image| image.as_raw().len())
    }
}

/// Decode raw OS bitmaps into RGBA.
pub fn decode(raw: &RawCursor) -> CursorResult<DecodedCursor> {
    raw.mask.validate()?;

    let encoding = CursorEncoding::classify(raw);
    let (primary_image, invert_image) = match (encoding, raw.color.as_ref()) {
        (CursorEncoding::TrueColor, Some(color)) => (decode_true_color(color, &raw.mask)?, None),
        (CursorEncoding::Indexed, Some(color)) => (decode_indexed(color, &raw.mask)?, None),
        _ => {
            let (primary, invert) = decode_monochrome(&raw.mask)?;
            (primary, Some(invert))
        },
    };

    let hotspot_x = i32::try_from(raw.hotspot_x)
        .map_err(|_| CursorError::InvalidBitmap(format!("hotspot x {}", raw.hotspot_x)))?;
    let hotspot_y = i32::try_from(raw.hotspot_y)
        .map_err(|_| CursorError::InvalidBitmap(format!("hotspot y {}", raw.hotspot_y)))?;

    let (width, height) = primary_image.dimensions();
    log::debug!(
        "[CURSOR] Decoded {:?} cursor {}x{}, hotspot ({}, {})",
        encoding,
        width,
        height,
        hotspot_x,
        hotspot_y
    );

    Ok(DecodedCursor {
        hotspot_x,
        hotspot_y,
        width,
        height,
        primary_image,
        invert_image,
        encoding,
    })
}

/// 32-bit color: keep the bitmap's own alpha except where the mask is set.
fn decode_true_color(color: &RawBitmap, mask: &RawBitmap) -> CursorResult<RgbaImage> {
    color.validate()?;
    let mask = mask.plane()?;

    let mut image = RgbaImage::new(color.width, color.height);
    for (x, y, pixel) in image.enumerate_pixels_mut() {
        let [b, g, r, a] = color.bgra(x, y).unwrap_or_default();
        let alpha = if mask.bit(x, y) { 0 } else { a };
        *pixel = Rgba([r, g, b, alpha]);
    }
    Ok(image)
}

/// 1-bit color: mask bit set means transparent, otherwise the palette color.
fn decode_indexed(color: &RawBitmap, mask: &RawBitmap) -> CursorResult<RgbaImage> {
    color.validate()?;
    let indices = color.plane()?;
    let mask_plane = mask.plane()?;

    // A mask twice the color height carries AND over XOR; only the AND half is visible.
    let height = if mask.height == color.height * 2 {
        mask.height / 2
    } else {
        color.height
    };

    let mut image = RgbaImage::new(color.width, height);
    for (x, y, pixel) in image.enumerate_pixels_mut() {
        *pixel = if mask_plane.bit(x, y) {
            TRANSPARENT
        } else {
            palette_color(&color.palette, indices.bit(x, y))
        };
    }
    Ok(image)
}

fn palette_color(palette: &[Rgba<u8>], index: bool) -> Rgba<u8> {
    match palette.get(usize::from(index)) {
        Some(&Rgba([r, g, b, _])) => Rgba([r, g, b, 255]),
        None if index => OPAQUE_WHITE,
        None => OPAQUE_BLACK,
    }
}

/// Legacy AND/XOR cursor. Returns `(primary, invert)`.
fn decode_monochrome(mask: &RawBitmap) -> CursorResult<(RgbaImage, RgbaImage)> {
    let (and_plane, xor_plane) = mask.plane()?.split_stacked()?;
    let (width, height) = (and_plane.width(), and_plane.height());

    let mut primary = RgbaImage::new(width, height);
    let mut invert = RgbaImage::new(width, height);

    for y in 0..height {
        for x in 0..width {
            match (and_plane.bit(x, y), xor_plane.bit(x, y)) {
                (false, false) => primary.put_pixel(x, y, OPAQUE_BLACK),
                (false, true) => primary.put_pixel(x, y, OPAQUE_WHITE),
                (true, false) => {},
                (true, true) => invert.put_pixel(x, y, OPAQUE_WHITE),
            }
        }
    }
    Ok((primary, invert))
}

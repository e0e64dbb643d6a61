//! RFB pixel format descriptor.
//!
//! The RFB protocol describes pixel layout with a 16-byte PIXEL_FORMAT
//! structure (RFC 6143 §7.4): bits per pixel, colour depth, endianness, and
//! per-channel max/shift values.  This core always negotiates the same fixed
//! format (32-bit packed true-colour RGB) but carries the full descriptor
//! so the protocol engine can hand it to the server verbatim.

use serde::{Deserialize, Serialize};

/// Pixel layout negotiated with the server.
///
/// Immutable once negotiated: a format change (like a dimension change)
/// requires tearing down the session's buffers and re-initializing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PixelFormat {
    /// Bits per pixel on the wire. Must be a multiple of 8.
    pub bits_per_pixel: u8,
    /// Number of useful colour bits (24 for 8-8-8 RGB).
    pub depth: u8,
    /// Whether multi-byte pixel values are big-endian.
    pub big_endian: bool,
    /// Whether the pixel value encodes colour directly (as opposed to a
    /// palette index).
    pub true_color: bool,
    /// Maximum red value (2^red-bits − 1).
    pub red_max: u16,
    /// Maximum green value.
    pub green_max: u16,
    /// Maximum blue value.
    pub blue_max: u16,
    /// Bit offset of the red channel within the pixel value.
    pub red_shift: u8,
    /// Bit offset of the green channel.
    pub green_shift: u8,
    /// Bit offset of the blue channel.
    pub blue_shift: u8,
}

impl PixelFormat {
    /// The fixed format this core requests after the handshake: 32 bits per
    /// pixel, 24-bit depth, little-endian, true colour, 8 bits per channel
    /// with red in bits 16–23, green in 8–15, blue in 0–7.
    pub fn rgb32() -> Self {
        Self {
            bits_per_pixel: 32,
            depth: 24,
            big_endian: false,
            true_color: true,
            red_max: 255,
            green_max: 255,
            blue_max: 255,
            red_shift: 16,
            green_shift: 8,
            blue_shift: 0,
        }
    }

    /// Bytes occupied by one pixel in a [`crate::pixels::PixelBuffer`].
    pub fn bytes_per_pixel(&self) -> usize {
        usize::from(self.bits_per_pixel / 8)
    }
}

impl Default for PixelFormat {
    fn default() -> Self {
        Self::rgb32()
    }
}

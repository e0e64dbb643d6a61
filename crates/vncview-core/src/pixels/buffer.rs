//! The raw 2D pixel store mirroring the remote screen.
//!
//! A [`PixelBuffer`] is `width × height` pixels of a fixed [`PixelFormat`],
//! stored row-major in a flat byte vector.  Rectangle updates from the server
//! are applied with [`PixelBuffer::blit`]; overlapping blits are
//! last-write-wins in call order, with no internal reordering.
//!
//! The buffer is never resized after creation.  When the server renegotiates
//! its screen dimensions, the owner allocates a fresh buffer instead.

use thiserror::Error;

use crate::pixels::format::PixelFormat;

/// Errors raised by pixel buffer operations.
///
/// All of these indicate a contract violation by the caller (the protocol
/// engine handed over a malformed rectangle), so they are reported rather
/// than silently ignored.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BufferError {
    /// Zero or overflowing buffer dimensions.
    #[error("invalid framebuffer dimensions: {width}x{height}")]
    InvalidDimension { width: u32, height: u32 },

    /// The rectangle extends past the buffer edges.
    #[error(
        "rectangle ({x},{y}) {width}x{height} exceeds buffer bounds {buffer_width}x{buffer_height}"
    )]
    OutOfBounds {
        x: u32,
        y: u32,
        width: u32,
        height: u32,
        buffer_width: u32,
        buffer_height: u32,
    },

    /// The pixel slice length does not match the rectangle area.
    #[error("pixel data length mismatch: expected {expected} bytes, got {actual}")]
    LengthMismatch { expected: usize, actual: usize },
}

/// A fixed-size 2D pixel store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    format: PixelFormat,
    data: Vec<u8>,
}

impl PixelBuffer {
    /// Allocates a zero-filled buffer of `width × height` pixels.
    ///
    /// # Errors
    ///
    /// Returns [`BufferError::InvalidDimension`] when either dimension is
    /// zero or the total byte size would overflow `usize`.
    pub fn new(width: u32, height: u32, format: PixelFormat) -> Result<Self, BufferError> {
        if width == 0 || height == 0 {
            return Err(BufferError::InvalidDimension { width, height });
        }
        let size = (width as usize)
            .checked_mul(height as usize)
            .and_then(|n| n.checked_mul(format.bytes_per_pixel()))
            .ok_or(BufferError::InvalidDimension { width, height })?;
        Ok(Self {
            width,
            height,
            format,
            data: vec![0; size],
        })
    }

    /// Width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// The buffer's pixel format.
    pub fn format(&self) -> &PixelFormat {
        &self.format
    }

    /// The raw row-major pixel bytes.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Copies `pixels` (exactly `width * height * bytes_per_pixel` bytes,
    /// row-major) into the buffer at offset `(x, y)`.
    ///
    /// Zero-area rectangles are a silent no-op.  A failed blit leaves the
    /// buffer unchanged: all validation happens before the first byte is
    /// written.
    ///
    /// # Errors
    ///
    /// Returns [`BufferError::OutOfBounds`] when the rectangle extends past
    /// the buffer edges, and [`BufferError::LengthMismatch`] when the slice
    /// length does not match the rectangle area.
    pub fn blit(
        &mut self,
        x: u32,
        y: u32,
        width: u32,
        height: u32,
        pixels: &[u8],
    ) -> Result<(), BufferError> {
        if width == 0 || height == 0 {
            return Ok(());
        }
        self.check_bounds(x, y, width, height)?;

        let bpp = self.format.bytes_per_pixel();
        let row_bytes = width as usize * bpp;
        let expected = row_bytes * height as usize;
        if pixels.len() != expected {
            return Err(BufferError::LengthMismatch {
                expected,
                actual: pixels.len(),
            });
        }

        let stride = self.width as usize * bpp;
        for row in 0..height as usize {
            let src = &pixels[row * row_bytes..(row + 1) * row_bytes];
            let dst_start = (y as usize + row) * stride + x as usize * bpp;
            self.data[dst_start..dst_start + row_bytes].copy_from_slice(src);
        }
        Ok(())
    }

    /// Reads back a sub-rectangle as row-major bytes: the round-trip
    /// counterpart of [`PixelBuffer::blit`].
    ///
    /// # Errors
    ///
    /// Returns [`BufferError::OutOfBounds`] when the rectangle extends past
    /// the buffer edges.
    pub fn read_rect(
        &self,
        x: u32,
        y: u32,
        width: u32,
        height: u32,
    ) -> Result<Vec<u8>, BufferError> {
        if width == 0 || height == 0 {
            return Ok(Vec::new());
        }
        self.check_bounds(x, y, width, height)?;

        let bpp = self.format.bytes_per_pixel();
        let row_bytes = width as usize * bpp;
        let stride = self.width as usize * bpp;
        let mut out = Vec::with_capacity(row_bytes * height as usize);
        for row in 0..height as usize {
            let start = (y as usize + row) * stride + x as usize * bpp;
            out.extend_from_slice(&self.data[start..start + row_bytes]);
        }
        Ok(out)
    }

    fn check_bounds(&self, x: u32, y: u32, width: u32, height: u32) -> Result<(), BufferError> {
        let x_end = u64::from(x) + u64::from(width);
        let y_end = u64::from(y) + u64::from(height);
        if x_end > u64::from(self.width) || y_end > u64::from(self.height) {
            return Err(BufferError::OutOfBounds {
                x,
                y,
                width,
                height,
                buffer_width: self.width,
                buffer_height: self.height,
            });
        }
        Ok(())
    }
}

//! Composition of a published framebuffer snapshot into a display-ready
//! frame for an arbitrary local viewport.
//!
//! The composite is aspect-fit per [`crate::viewport::scale_to_fit`]: the
//! snapshot is scaled into a centered rectangle and the letterbox margins are
//! filled with opaque black, matching what the render path paints before any
//! frame has arrived.
//!
//! Two scale filters are available.  `Nearest` replicates/drops whole pixels
//! and is integer-exact; `Bilinear` interpolates each channel for a smoother
//! picture at non-integral scale factors.

use serde::{Deserialize, Serialize};

use crate::framebuffer::Snapshot;
use crate::pixels::{PixelBuffer, PixelFormat};
use crate::viewport::{scale_to_fit, FitTransform};

/// Pixel interpolation used when scaling a snapshot to the viewport.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScaleFilter {
    /// Whole-pixel replication.  Exact and cheap.
    #[default]
    Nearest,
    /// Per-channel linear interpolation between the four nearest pixels.
    Bilinear,
}

/// A display-ready composite: viewport-sized, letterboxed, tear-free.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    /// Viewport width in pixels.
    pub width: u32,
    /// Viewport height in pixels.
    pub height: u32,
    /// Row-major pixel bytes in `format` layout, `width * height` pixels.
    pub data: Vec<u8>,
    /// Pixel layout of `data`.
    pub format: PixelFormat,
    /// Where the remote frame sits inside the composite.
    pub fit: FitTransform,
    /// Generation of the snapshot this frame was composed from; 0 for the
    /// blank pre-initialization frame.
    pub generation: u64,
}

/// Composes `src` into a `viewport_w × viewport_h` letterboxed frame.
///
/// Returns `None` for zero-area viewports; callers skip drawing entirely.
pub fn compose(
    src: &PixelBuffer,
    viewport_w: u32,
    viewport_h: u32,
    filter: ScaleFilter,
) -> Option<Frame> {
    if viewport_w == 0 || viewport_h == 0 {
        return None;
    }
    let fit = scale_to_fit(src.width(), src.height(), viewport_w, viewport_h);
    if fit.is_degenerate() {
        return blank_frame(viewport_w, viewport_h);
    }

    let bpp = src.format().bytes_per_pixel();
    let mut data = vec![0u8; viewport_w as usize * viewport_h as usize * bpp];
    match filter {
        ScaleFilter::Nearest => scale_nearest(src, &fit, viewport_w, &mut data),
        ScaleFilter::Bilinear => scale_bilinear(src, &fit, viewport_w, &mut data),
    }

    Some(Frame {
        width: viewport_w,
        height: viewport_h,
        data,
        format: *src.format(),
        fit,
        generation: 0,
    })
}

/// Composes a published [`Snapshot`], carrying its generation into the frame.
pub fn compose_snapshot(
    snapshot: &Snapshot,
    viewport_w: u32,
    viewport_h: u32,
    filter: ScaleFilter,
) -> Option<Frame> {
    let mut frame = compose(&snapshot.buffer, viewport_w, viewport_h, filter)?;
    frame.generation = snapshot.generation;
    Some(frame)
}

/// The defined blank state: an all-black viewport-sized frame with a
/// degenerate fit, shown before the first complete update batch.
pub fn blank_frame(viewport_w: u32, viewport_h: u32) -> Option<Frame> {
    if viewport_w == 0 || viewport_h == 0 {
        return None;
    }
    let format = PixelFormat::rgb32();
    Some(Frame {
        width: viewport_w,
        height: viewport_h,
        data: vec![0u8; viewport_w as usize * viewport_h as usize * format.bytes_per_pixel()],
        format,
        fit: FitTransform::DEGENERATE,
        generation: 0,
    })
}

fn scale_nearest(src: &PixelBuffer, fit: &FitTransform, viewport_w: u32, dst: &mut [u8]) {
    let bpp = src.format().bytes_per_pixel();
    let src_data = src.data();
    let src_stride = src.width() as usize * bpp;
    let dst_stride = viewport_w as usize * bpp;

    for vy in 0..fit.scaled_height {
        let sy = (u64::from(vy) * u64::from(src.height()) / u64::from(fit.scaled_height)) as usize;
        let src_row = &src_data[sy * src_stride..(sy + 1) * src_stride];
        let dst_row_start =
            (fit.offset_y + vy) as usize * dst_stride + fit.offset_x as usize * bpp;

        if fit.scaled_width == src.width() {
            // Unit horizontal scale: copy the whole row.
            dst[dst_row_start..dst_row_start + src_stride].copy_from_slice(src_row);
            continue;
        }
        for vx in 0..fit.scaled_width {
            let sx = (u64::from(vx) * u64::from(src.width()) / u64::from(fit.scaled_width)) as usize;
            let dst_px = dst_row_start + vx as usize * bpp;
            dst[dst_px..dst_px + bpp].copy_from_slice(&src_row[sx * bpp..sx * bpp + bpp]);
        }
    }
}

fn scale_bilinear(src: &PixelBuffer, fit: &FitTransform, viewport_w: u32, dst: &mut [u8]) {
    let bpp = src.format().bytes_per_pixel();
    let src_data = src.data();
    let src_w = src.width() as usize;
    let src_stride = src_w * bpp;
    let dst_stride = viewport_w as usize * bpp;

    for vy in 0..fit.scaled_height {
        let fy = ((f64::from(vy) + 0.5) * f64::from(src.height()) / f64::from(fit.scaled_height)
            - 0.5)
            .max(0.0);
        let y0 = fy as usize;
        let y1 = (y0 + 1).min(src.height() as usize - 1);
        let ty = fy - y0 as f64;

        for vx in 0..fit.scaled_width {
            let fx = ((f64::from(vx) + 0.5) * f64::from(src.width())
                / f64::from(fit.scaled_width)
                - 0.5)
                .max(0.0);
            let x0 = fx as usize;
            let x1 = (x0 + 1).min(src_w - 1);
            let tx = fx - x0 as f64;

            let p00 = y0 * src_stride + x0 * bpp;
            let p10 = y0 * src_stride + x1 * bpp;
            let p01 = y1 * src_stride + x0 * bpp;
            let p11 = y1 * src_stride + x1 * bpp;
            let dst_px = (fit.offset_y + vy) as usize * dst_stride
                + (fit.offset_x + vx) as usize * bpp;

            for c in 0..bpp {
                let top = f64::from(src_data[p00 + c]) * (1.0 - tx)
                    + f64::from(src_data[p10 + c]) * tx;
                let bottom = f64::from(src_data[p01 + c]) * (1.0 - tx)
                    + f64::from(src_data[p11 + c]) * tx;
                dst[dst_px + c] = (top * (1.0 - ty) + bottom * ty).round() as u8;
            }
        }
    }
}

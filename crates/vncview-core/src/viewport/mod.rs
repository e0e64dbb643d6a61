//! Stateless scaling and coordinate-transform math between remote pixel
//! space and the local viewport.
//!
//! The policy is fixed: preserve aspect ratio, center the scaled image, and
//! letterbox the margins.  Two pure functions cover both directions:
//!
//! - [`scale_to_fit`] – remote → local: how large the remote frame is drawn
//!   and where it sits inside the viewport.
//! - [`local_to_remote`] – local → remote: which remote pixel a local cursor
//!   position refers to, for pointer-event translation.
//!
//! Degenerate inputs (a zero-area viewport, e.g. a window collapsed to a
//! sliver) produce `scale = 0`; callers must skip drawing and mapping.

/// Placement of the scaled remote frame inside a viewport.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FitTransform {
    /// Uniform scale factor applied to the remote frame.  0.0 when the fit
    /// is degenerate.
    pub scale: f64,
    /// Left letterbox margin in viewport pixels.
    pub offset_x: u32,
    /// Top letterbox margin in viewport pixels.
    pub offset_y: u32,
    /// Width of the scaled remote frame in viewport pixels.
    pub scaled_width: u32,
    /// Height of the scaled remote frame in viewport pixels.
    pub scaled_height: u32,
}

impl FitTransform {
    /// A zero transform: nothing can be drawn or mapped.
    pub const DEGENERATE: FitTransform = FitTransform {
        scale: 0.0,
        offset_x: 0,
        offset_y: 0,
        scaled_width: 0,
        scaled_height: 0,
    };

    /// `true` when drawing and coordinate mapping must be skipped.
    pub fn is_degenerate(&self) -> bool {
        self.scale <= 0.0 || self.scaled_width == 0 || self.scaled_height == 0
    }
}

/// Computes the largest uniform scale such that the remote frame fits inside
/// the viewport, then centers the result (letterbox).
///
/// Upscaling is permitted: a small remote screen fills a large viewport.
/// Any zero input dimension yields [`FitTransform::DEGENERATE`].
pub fn scale_to_fit(remote_w: u32, remote_h: u32, viewport_w: u32, viewport_h: u32) -> FitTransform {
    if remote_w == 0 || remote_h == 0 || viewport_w == 0 || viewport_h == 0 {
        return FitTransform::DEGENERATE;
    }

    let scale = f64::min(
        f64::from(viewport_w) / f64::from(remote_w),
        f64::from(viewport_h) / f64::from(remote_h),
    );
    let scaled_width = ((f64::from(remote_w) * scale).round() as u32).clamp(1, viewport_w);
    let scaled_height = ((f64::from(remote_h) * scale).round() as u32).clamp(1, viewport_h);

    FitTransform {
        scale,
        offset_x: (viewport_w - scaled_width) / 2,
        offset_y: (viewport_h - scaled_height) / 2,
        scaled_width,
        scaled_height,
    }
}

/// Maps a local viewport position to remote pixel coordinates.
///
/// The letterbox offset is subtracted and the position inverse-scaled with
/// endpoint-aligned interpolation, so the first and last columns of the
/// rendered area map exactly to remote columns `0` and `remote_w - 1` (and
/// likewise for rows).  Positions outside the rendered area clamp to the
/// nearest edge instead of erroring.  Degenerate transforms map to `(0, 0)`.
pub fn local_to_remote(
    local_x: i32,
    local_y: i32,
    remote_w: u32,
    remote_h: u32,
    fit: &FitTransform,
) -> (u16, u16) {
    if fit.is_degenerate() || remote_w == 0 || remote_h == 0 {
        return (0, 0);
    }
    let x = map_axis(local_x, fit.offset_x, fit.scaled_width, remote_w);
    let y = map_axis(local_y, fit.offset_y, fit.scaled_height, remote_h);
    (x, y)
}

/// Endpoint-aligned inverse mapping along one axis.
fn map_axis(local: i32, offset: u32, scaled: u32, remote: u32) -> u16 {
    // Clamp into the rendered span first; everything outside the letterbox
    // collapses onto the nearest edge.
    let rel = (i64::from(local) - i64::from(offset)).clamp(0, i64::from(scaled) - 1);
    if scaled <= 1 || remote <= 1 {
        return 0;
    }
    let mapped = (rel as f64 * f64::from(remote - 1) / f64::from(scaled - 1)).round() as u32;
    mapped.min(remote - 1) as u16
}

//! Target dimensions under a "long side strictly below N" constraint

/// Scale `(src_w, src_h)` so its long side is strictly below `max_long_exclusive`
///
/// Sources already below the bound are returned unchanged; nothing is upscaled.
/// Non-positive inputs are clamped into `[1, max_long_exclusive - 1]`.
/// `max_long_exclusive` must be at least 2.
pub fn scaled_size(src_w: i64, src_h: i64, max_long_exclusive: u32) -> (u32, u32) {
    let limit = i64::from(max_long_exclusive.max(2)) - 1;

    if src_w <= 0 || src_h <= 0 {
        return (src_w.clamp(1, limit) as u32, src_h.clamp(1, limit) as u32);
    }

    let long_side = src_w.max(src_h);
    if long_side <= limit {
        return (src_w as u32, src_h as u32);
    }

    // Half a pixel of headroom keeps the floored long side below the bound
    let scale = (f64::from(max_long_exclusive) - 0.5) / long_side as f64;
    let w = ((src_w as f64 * scale).floor() as i64).max(1).min(limit);
    let h = ((src_h as f64 * scale).floor() as i64).max(1).min(limit);
    (w as u32, h as u32)
}

/// Convenience wrapper for decoded image dimensions
pub fn scaled_dimensions(width: u32, height: u32, max_long_exclusive: u32) -> (u32, u32) {
    scaled_size(i64::from(width), i64::from(height), max_long_exclusive)
}

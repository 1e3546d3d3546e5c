/// RGB colour, one byte per channel.
pub type Rgb = [u8; 3];

/// Wrap boundary: a value past one end reappears at the other end.
///
/// Values already inside `[min, max]` are returned untouched, so the result
/// always lies in the closed interval.
#[inline]
pub fn wrap(value: f32, min: f32, max: f32) -> f32 {
    if value < min {
        max
    } else if value > max {
        min
    } else {
        value
    }
}

/// Nearness in [0,1]: 1 at the viewer, 0 at `max_depth`.
#[inline]
pub fn depth_factor(depth: f32, max_depth: f32) -> f32 {
    (1.0 - depth / max_depth).clamp(0.0, 1.0)
}

/// Parse `#rrggbb` (leading `#` optional).
pub fn parse_hex(hex: &str) -> Option<Rgb> {
    let hex = hex.strip_prefix('#').unwrap_or(hex);
    if hex.len() != 6 || !hex.is_ascii() {
        return None;
    }
    let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
    Some([channel(0)?, channel(2)?, channel(4)?])
}

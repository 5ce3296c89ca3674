//! Static glyph polylines.
//!
//! Each glyph is an open polyline in a unit cell centered on its origin
//! (roughly `[-0.5, 0.5]` on both axes). Only the letters of the demo title exist.

/// Polyline for `c`, or `None` if the character has no glyph.
pub fn glyph(c: char) -> Option<&'static [[f32; 2]]> {
    let points: &'static [[f32; 2]] = match c {
        'M' => &[[-0.5, -0.5], [-0.5, 0.5], [0.0, 0.0], [0.5, 0.5], [0.5, -0.5]],
        'A' => &[[-0.3, -0.5], [0.0, 0.5], [0.3, -0.5], [-0.15, 0.0], [0.15, 0.0]],
        'G' => &[
            [0.3, 0.2],
            [0.0, 0.3],
            [-0.3, 0.0],
            [-0.3, -0.3],
            [0.0, -0.4],
            [0.3, -0.3],
            [0.3, 0.0],
            [0.0, 0.0],
        ],
        'N' => &[[-0.3, -0.5], [-0.3, 0.5], [0.3, -0.5], [0.3, 0.5]],
        'U' => &[[-0.3, 0.5], [-0.3, -0.3], [0.0, -0.5], [0.3, -0.3], [0.3, 0.5]],
        'S' => &[
            [0.3, 0.4],
            [0.0, 0.5],
            [-0.3, 0.3],
            [-0.3, 0.1],
            [0.0, 0.0],
            [0.3, -0.1],
            [0.3, -0.3],
            [0.0, -0.5],
            [-0.3, -0.4],
        ],
        _ => return None,
    };
    Some(points)
}

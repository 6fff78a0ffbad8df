//! Small planar geometry helpers shared by the planner and navigator.

use glam::Vec2;

/// Closest point to `p` on the segment `a..b`.
/// Degenerate segments (a == b) return `a`.
pub fn closest_point_on_segment(a: Vec2, b: Vec2, p: Vec2) -> Vec2 {
    let ab = b - a;
    let len_sq = ab.length_squared();
    if len_sq < f32::EPSILON {
        return a;
    }
    let t = ((p - a).dot(ab) / len_sq).clamp(0.0, 1.0);
    a + ab * t
}

/// Squared distance from `p` to the segment `a..b`.
pub fn segment_point_dist_sq(a: Vec2, b: Vec2, p: Vec2) -> f32 {
    (p - closest_point_on_segment(a, b, p)).length_squared()
}

/// Whether the segment `a..b` passes within `radius` of circle center `c`.
pub fn segment_hits_circle(a: Vec2, b: Vec2, c: Vec2, radius: f32) -> bool {
    segment_point_dist_sq(a, b, c) <= radius * radius
}

//! Point and segment distance queries.

use glam::Vec3;

/// Below this squared length a segment is treated as a point.
const DEGENERATE_LENGTH_SQ: f32 = 1e-12;

/// A line segment between two points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    /// Start point.
    pub start: Vec3,
    /// End point.
    pub end: Vec3,
}

impl Segment {
    /// Creates a segment.
    #[must_use]
    pub const fn new(start: Vec3, end: Vec3) -> Self {
        Self { start, end }
    }

    /// `end - start`.
    #[must_use]
    pub fn vector(&self) -> Vec3 {
        self.end - self.start
    }

    /// Unit direction from start to end, or zero for a degenerate segment.
    #[must_use]
    pub fn direction(&self) -> Vec3 {
        self.vector().normalize_or_zero()
    }

    /// Segment length.
    #[must_use]
    pub fn length(&self) -> f32 {
        self.vector().length()
    }

    /// Point at parameter `t` (`0` = start, `1` = end).
    #[must_use]
    pub fn at(&self, t: f32) -> Vec3 {
        self.start + self.vector() * t
    }

    /// Closest point on this segment to `point`.
    #[must_use]
    pub fn closest_point(&self, point: Vec3) -> Vec3 {
        closest_point_on_segment(point, self.start, self.end)
    }

    /// Distance from `point` to this segment.
    #[must_use]
    pub fn distance_to_point(&self, point: Vec3) -> f32 {
        point_segment_distance(point, self.start, self.end)
    }

    /// Minimum distance to another segment.
    #[must_use]
    pub fn distance_to_segment(&self, other: &Self) -> f32 {
        segment_segment_distance(self.start, self.end, other.start, other.end)
    }
}

fn project_clamped(point: Vec3, start: Vec3, vector: Vec3, length_sq: f32) -> f32 {
    if length_sq <= DEGENERATE_LENGTH_SQ {
        return 0.0;
    }
    ((point - start).dot(vector) / length_sq).clamp(0.0, 1.0)
}

/// Closest point to `point` on the segment `a`-`b`.
///
/// A zero-length segment returns `a`.
#[must_use]
pub fn closest_point_on_segment(point: Vec3, a: Vec3, b: Vec3) -> Vec3 {
    let ab = b - a;
    a + ab * project_clamped(point, a, ab, ab.length_squared())
}

/// Distance from `point` to the segment `a`-`b`.
#[must_use]
pub fn point_segment_distance(point: Vec3, a: Vec3, b: Vec3) -> f32 {
    point.distance(closest_point_on_segment(point, a, b))
}

/// Closest points between segments `a0`-`a1` and `b0`-`b1`.
///
/// Solves the closest approach of the two carrier lines, clamps the
/// parameter on A, projects that point onto B and clamps, then projects the
/// result back onto A and clamps. Parallel segments fall back to the start
/// of A for the first step.
#[must_use]
#[allow(clippy::many_single_char_names)]
pub fn closest_points_between_segments(a0: Vec3, a1: Vec3, b0: Vec3, b1: Vec3) -> (Vec3, Vec3) {
    let da = a1 - a0;
    let db = b1 - b0;
    let r = a0 - b0;
    let a = da.length_squared();
    let e = db.length_squared();
    let b = da.dot(db);
    let c = da.dot(r);
    let f = db.dot(r);

    // |da × db|², zero for parallel carriers
    let denom = a * e - b * b;
    let s = if a > DEGENERATE_LENGTH_SQ && denom > DEGENERATE_LENGTH_SQ * a * e {
        ((b * f - c * e) / denom).clamp(0.0, 1.0)
    } else {
        0.0
    };

    let t = project_clamped(a0 + da * s, b0, db, e);
    let on_b = b0 + db * t;
    let s = project_clamped(on_b, a0, da, a);
    (a0 + da * s, on_b)
}

/// Minimum distance between segments `a0`-`a1` and `b0`-`b1`.
///
/// Near-parallel inputs are filtered by callers.
#[must_use]
pub fn segment_segment_distance(a0: Vec3, a1: Vec3, b0: Vec3, b1: Vec3) -> f32 {
    let (on_a, on_b) = closest_points_between_segments(a0, a1, b0, b1);
    on_a.distance(on_b)
}

// Line segment helpers for oriented-rectangle collision

use super::math::{Vector2, EPSILON};

/// A directed line segment
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    pub start: Vector2,
    pub end: Vector2,
}

impl Segment {
    pub fn new(start: Vector2, end: Vector2) -> Self {
        Self { start, end }
    }

    /// Direction vector from start to end (not normalized)
    pub fn direction(&self) -> Vector2 {
        self.end - self.start
    }

    pub fn midpoint(&self) -> Vector2 {
        self.start.plus(self.end) * 0.5
    }

    pub fn length(&self) -> f32 {
        self.direction().magnitude()
    }

    /// Proper crossing test.
    ///
    /// Both intersection parameters must lie in the open interval (0, 1), so
    /// segments that only touch at an endpoint, or that are parallel or
    /// collinear, never cross.
    pub fn crosses(&self, other: &Segment) -> bool {
        let (a, b) = (self.start, self.end);
        let (p, r) = (other.start, other.end);

        let det = (b.x - a.x) * (r.y - p.y) - (r.x - p.x) * (b.y - a.y);
        if det == 0.0 {
            return false;
        }

        let lambda = ((r.y - p.y) * (r.x - a.x) + (p.x - r.x) * (r.y - a.y)) / det;
        let gamma = ((a.y - b.y) * (r.x - a.x) + (b.x - a.x) * (r.y - a.y)) / det;
        lambda > 0.0 && lambda < 1.0 && gamma > 0.0 && gamma < 1.0
    }
}

/// Intersection point of the infinite line through `p1`-`p2` with the
/// infinite line carrying `segment`.
///
/// Returns `None` when the lines are parallel (zero determinant).
pub fn line_intersection(p1: Vector2, p2: Vector2, segment: &Segment) -> Option<Vector2> {
    let (p3, p4) = (segment.start, segment.end);

    let denom = (p1.x - p2.x) * (p3.y - p4.y) - (p1.y - p2.y) * (p3.x - p4.x);
    if denom.abs() <= EPSILON {
        return None;
    }

    let t = ((p1.x - p3.x) * (p3.y - p4.y) - (p1.y - p3.y) * (p3.x - p4.x)) / denom;
    Some(p1.plus((p2 - p1) * t))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn seg(ax: f32, ay: f32, bx: f32, by: f32) -> Segment {
        Segment::new(Vector2::new(ax, ay), Vector2::new(bx, by))
    }

    #[test]
    fn test_crossing_segments() {
        assert!(seg(0.0, 0.0, 2.0, 2.0).crosses(&seg(0.0, 2.0, 2.0, 0.0)));
    }

    #[test]
    fn test_disjoint_segments() {
        assert!(!seg(0.0, 0.0, 1.0, 0.0).crosses(&seg(0.0, 1.0, 1.0, 1.0)));
        assert!(!seg(0.0, 0.0, 1.0, 1.0).crosses(&seg(3.0, 0.0, 2.0, 1.0)));
    }

    #[test]
    fn test_endpoint_touch_is_not_a_crossing() {
        // T-junction: second segment ends exactly on the first
        assert!(!seg(0.0, 0.0, 2.0, 0.0).crosses(&seg(1.0, 1.0, 1.0, 0.0)));
        // shared corner
        assert!(!seg(0.0, 0.0, 1.0, 0.0).crosses(&seg(1.0, 0.0, 1.0, 1.0)));
    }

    #[test]
    fn test_collinear_overlap_is_not_a_crossing() {
        assert!(!seg(0.0, 0.0, 2.0, 0.0).crosses(&seg(1.0, 0.0, 3.0, 0.0)));
    }

    #[test]
    fn test_line_intersection() {
        let edge = seg(5.0, -10.0, 5.0, 10.0);
        let hit = line_intersection(Vector2::new(0.0, 0.0), Vector2::new(10.0, 0.0), &edge)
            .expect("lines are not parallel");
        assert_abs_diff_eq!(hit.x, 5.0, epsilon = 1e-5);
        assert_abs_diff_eq!(hit.y, 0.0, epsilon = 1e-5);
    }

    #[test]
    fn test_line_intersection_parallel() {
        let edge = seg(0.0, 1.0, 10.0, 1.0);
        assert!(line_intersection(Vector2::ZERO, Vector2::new(5.0, 0.0), &edge).is_none());
    }

    #[test]
    fn test_segment_helpers() {
        let s = seg(0.0, 0.0, 4.0, 0.0);
        assert_eq!(s.direction(), Vector2::new(4.0, 0.0));
        assert_eq!(s.midpoint(), Vector2::new(2.0, 0.0));
        assert_eq!(s.length(), 4.0);
    }
}

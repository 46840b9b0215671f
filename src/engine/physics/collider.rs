// Oriented-rectangle intersection tests

use crate::core::math::EPSILON;
use crate::core::{Segment, Vector2};
use crate::engine::transform::Transform;

/// Overlap shorter than this along any axis counts as touching
const OVERLAP_TOLERANCE: f32 = 1e-4;

/// Outcome of a pairwise collision test
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CollisionResult {
    pub collided: bool,
    /// The other body's edge that was struck
    pub edge: Option<Segment>,
}

impl CollisionResult {
    pub const MISS: CollisionResult = CollisionResult {
        collided: false,
        edge: None,
    };

    fn hit(edge: Segment) -> Self {
        Self {
            collided: true,
            edge: Some(edge),
        }
    }
}

/// What a collision handler receives: the test result plus the other body.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Contact {
    pub collided: bool,
    pub edge: Option<Segment>,
    /// Center of the other body at test time
    pub other_position: Vector2,
    pub other_size: Vector2,
}

/// Collision view over a transform.
///
/// The collider borrows the entity's own transform, so it always agrees with
/// the entity's position, rotation and size.
#[derive(Debug, Clone, Copy)]
pub struct Collider<'a> {
    transform: &'a Transform,
}

impl<'a> Collider<'a> {
    pub fn new(transform: &'a Transform) -> Self {
        Self { transform }
    }

    pub fn transform(&self) -> &'a Transform {
        self.transform
    }

    pub fn position(&self) -> Vector2 {
        self.transform.position()
    }

    pub fn size(&self) -> Vector2 {
        self.transform.scale()
    }

    pub fn width(&self) -> f32 {
        self.transform.width()
    }

    pub fn height(&self) -> f32 {
        self.transform.height()
    }

    /// Test this rectangle against `other`.
    ///
    /// Every edge pair is checked for a proper crossing; the last crossing
    /// found decides the struck edge. Edges that merely touch or lie on the
    /// same line do not count. When no edges cross but the rectangles still
    /// share positive area (one inside the other, or overlapping along a
    /// shared line), the struck edge is the other body's edge closest to this
    /// body's center.
    pub fn check_collision(&self, other: &Collider<'_>) -> CollisionResult {
        let mine = self.transform.edges();
        let theirs = other.transform.edges();

        let mut struck = None;
        for edge in &mine {
            for other_edge in &theirs {
                if edge.crosses(other_edge) {
                    struck = Some(*other_edge);
                }
            }
        }

        if let Some(edge) = struck {
            return CollisionResult::hit(edge);
        }

        if self.overlaps(other) {
            let center = self.position();
            let nearest = theirs.iter().copied().min_by(|a, b| {
                a.midpoint()
                    .distance(center)
                    .total_cmp(&b.midpoint().distance(center))
            });
            if let Some(edge) = nearest {
                return CollisionResult::hit(edge);
            }
        }

        CollisionResult::MISS
    }

    /// Run [`Collider::check_collision`] and hand the contact to `callback`,
    /// whether or not anything was hit
    pub fn collide<R>(&self, other: &Collider<'_>, callback: impl FnOnce(&Contact) -> R) -> R {
        let result = self.check_collision(other);
        callback(&Contact {
            collided: result.collided,
            edge: result.edge,
            other_position: other.position(),
            other_size: other.size(),
        })
    }

    /// Separating axis test that only accepts overlap with positive area
    fn overlaps(&self, other: &Collider<'_>) -> bool {
        if !has_area(self.transform) || !has_area(other.transform) {
            return false;
        }

        let mine = self.transform.corners();
        let theirs = other.transform.corners();

        let axes = self
            .transform
            .edges()
            .into_iter()
            .chain(other.transform.edges())
            .map(|edge| edge.direction())
            .filter(|direction| direction.magnitude() > EPSILON);

        for axis in axes {
            let normal = Vector2::new(-axis.y, axis.x).normalized();
            let (a_min, a_max) = project(&mine, normal);
            let (b_min, b_max) = project(&theirs, normal);
            if a_max - b_min <= OVERLAP_TOLERANCE || b_max - a_min <= OVERLAP_TOLERANCE {
                return false;
            }
        }
        true
    }
}

fn has_area(transform: &Transform) -> bool {
    transform.width().abs() > EPSILON && transform.height().abs() > EPSILON
}

fn project(corners: &[Vector2; 4], axis: Vector2) -> (f32, f32) {
    corners
        .iter()
        .map(|corner| corner.inner(axis))
        .fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), p| {
            (lo.min(p), hi.max(p))
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rect(x: f32, y: f32, w: f32, h: f32) -> Transform {
        Transform::from_rect(Vector2::new(x, y), Vector2::new(w, h))
    }

    fn check(a: &Transform, b: &Transform) -> CollisionResult {
        Collider::new(a).check_collision(&Collider::new(b))
    }

    #[test]
    fn test_overlapping_unit_squares_collide() {
        let a = rect(0.0, 0.0, 1.0, 1.0);
        let b = rect(0.5, 0.0, 1.0, 1.0);
        let result = check(&a, &b);
        assert!(result.collided);
        // b's left side is the one nearest a's center
        let edge = result.edge.unwrap();
        assert_eq!(edge.start.x, 0.0);
        assert_eq!(edge.end.x, 0.0);
    }

    #[test]
    fn test_edge_adjacent_squares_do_not_collide() {
        let a = rect(0.0, 0.0, 1.0, 1.0);
        let b = rect(1.0, 0.0, 1.0, 1.0);
        assert_eq!(check(&a, &b), CollisionResult::MISS);
        assert_eq!(check(&b, &a), CollisionResult::MISS);

        // corner to corner
        let c = rect(1.0, 1.0, 1.0, 1.0);
        assert!(!check(&a, &c).collided);
    }

    #[test]
    fn test_separated_rectangles_never_collide() {
        let cases = [
            (rect(0.0, 0.0, 2.0, 2.0), rect(5.0, 5.0, 2.0, 2.0)),
            (rect(0.0, 0.0, 2.0, 2.0), rect(2.5, 2.5, 2.0, 2.0)),
            (rect(-10.0, 3.0, 4.0, 1.0), rect(10.0, -3.0, 6.0, 8.0)),
            (rect(100.0, 100.0, 0.5, 0.5), rect(100.0, 101.0, 0.5, 0.5)),
        ];
        for (a, b) in cases {
            assert!(!check(&a, &b).collided, "{:?} vs {:?}", a, b);
            assert!(!check(&b, &a).collided, "{:?} vs {:?}", b, a);
        }
    }

    #[test]
    fn test_crossing_reports_other_edge() {
        // a's right half pokes through b's left side
        let a = rect(0.0, 0.0, 4.0, 2.0);
        let b = rect(3.0, 0.0, 4.0, 6.0);
        let result = check(&a, &b);
        assert!(result.collided);

        let edge = result.edge.unwrap();
        assert_eq!(edge.start.x, 1.0);
        assert_eq!(edge.end.x, 1.0);
        assert!(b.edges().contains(&edge));
    }

    #[test]
    fn test_contained_rectangle_collides() {
        let outer = rect(0.0, 0.0, 10.0, 10.0);
        let inner = rect(1.0, 0.0, 2.0, 2.0);
        let result = check(&inner, &outer);
        assert!(result.collided);
        assert!(outer.edges().contains(&result.edge.unwrap()));
        assert!(check(&outer, &inner).collided);
    }

    #[test]
    fn test_rotated_overlap() {
        let a = rect(0.0, 0.0, 4.0, 4.0);
        let mut b = rect(3.5, 0.0, 4.0, 4.0);
        b.set_rotation(45.0).unwrap();
        assert!(check(&a, &b).collided);

        // a diamond whose tip stops short of a's side
        let mut c = rect(4.9, 0.0, 4.0, 4.0);
        c.set_rotation(45.0).unwrap();
        assert!(!check(&a, &c).collided);
    }

    #[test]
    fn test_zero_size_rectangle_is_ignored_by_area_test() {
        let a = rect(0.0, 0.0, 0.0, 0.0);
        let b = rect(0.0, 0.0, 4.0, 4.0);
        assert!(!check(&a, &b).collided);
    }

    #[test]
    fn test_collide_invokes_callback_on_miss() {
        let a = rect(0.0, 0.0, 1.0, 1.0);
        let b = rect(9.0, 0.0, 2.0, 3.0);
        let contact = Collider::new(&a).collide(&Collider::new(&b), |contact| *contact);

        assert!(!contact.collided);
        assert_eq!(contact.edge, None);
        assert_eq!(contact.other_position, Vector2::new(9.0, 0.0));
        assert_eq!(contact.other_size, Vector2::new(2.0, 3.0));
    }

    #[test]
    fn test_collider_tracks_transform() {
        let t = rect(2.0, 3.0, 4.0, 5.0);
        let collider = Collider::new(&t);
        assert_eq!(collider.position(), Vector2::new(2.0, 3.0));
        assert_eq!(collider.width(), 4.0);
        assert_eq!(collider.height(), 5.0);
    }
}

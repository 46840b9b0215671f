// Math utilities and the Vector2 value type

use std::ops::{AddAssign, Mul, Neg, Sub, SubAssign};

use glam::Vec2;

/// Tolerance used when deciding a length or determinant is effectively zero
pub const EPSILON: f32 = 1e-6;

/// Clamp a value between min and max
pub fn clamp<T: PartialOrd>(value: T, min: T, max: T) -> T {
    if value < min {
        min
    } else if value > max {
        max
    } else {
        value
    }
}

/// Linear interpolation
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Check if two f32 values are approximately equal
pub fn approx_equal(a: f32, b: f32, epsilon: f32) -> bool {
    (a - b).abs() < epsilon
}

/// Reduce an angle in degrees into `[0, 360)`
pub fn normalize_degrees(degrees: f32) -> f32 {
    let reduced = degrees.rem_euclid(360.0);
    // rem_euclid can round tiny negative inputs up to exactly 360.0
    if reduced >= 360.0 {
        0.0
    } else {
        reduced
    }
}

/// A 2D vector with in-place arithmetic.
///
/// `Vector2` is `Copy`; anything that needs its own vector just holds a copy.
/// Every method taking `&mut self` mutates the receiver and leaves the
/// argument untouched.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Vector2 {
    pub x: f32,
    pub y: f32,
}

impl Vector2 {
    pub const ZERO: Self = Self::new(0.0, 0.0);
    pub const ONE: Self = Self::new(1.0, 1.0);
    pub const UP: Self = Self::new(0.0, 1.0);
    pub const DOWN: Self = Self::new(0.0, -1.0);
    pub const RIGHT: Self = Self::new(1.0, 0.0);
    pub const LEFT: Self = Self::new(-1.0, 0.0);

    /// Create a new vector
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Distance between two points
    pub fn distance_between(a: Vector2, b: Vector2) -> f32 {
        (b - a).magnitude()
    }

    /// Add another vector to this one
    pub fn add(&mut self, other: Vector2) {
        self.x += other.x;
        self.y += other.y;
    }

    /// Sum of two vectors as a new value, leaving both untouched
    pub fn plus(self, other: Vector2) -> Vector2 {
        Self::new(self.x + other.x, self.y + other.y)
    }

    /// Subtract another vector from this one
    pub fn subtract(&mut self, other: Vector2) {
        self.x -= other.x;
        self.y -= other.y;
    }

    /// Component-wise multiply by another vector.
    ///
    /// This is not the inner product; see [`Vector2::inner`] for that.
    pub fn dot(&mut self, other: Vector2) {
        self.x *= other.x;
        self.y *= other.y;
    }

    /// Multiply both components by a scalar
    pub fn scale(&mut self, factor: f32) {
        self.x *= factor;
        self.y *= factor;
    }

    /// Rotate counter-clockwise (in a y-up frame) by `angle` radians.
    ///
    /// A rotation that would yield NaN leaves the vector unchanged.
    pub fn rotate(&mut self, angle: f32) {
        let rotated = Vec2::from_angle(angle).rotate(Vec2::from(*self));
        if rotated.is_nan() {
            return;
        }
        self.x = rotated.x;
        self.y = rotated.y;
    }

    /// Euclidean length
    pub fn magnitude(&self) -> f32 {
        (self.x * self.x + self.y * self.y).sqrt()
    }

    /// Distance to another point
    pub fn distance(&self, other: Vector2) -> f32 {
        Self::distance_between(*self, other)
    }

    /// Inner (scalar) product
    pub fn inner(&self, other: Vector2) -> f32 {
        self.x * other.x + self.y * other.y
    }

    /// 2D cross product (z component of the 3D cross product)
    pub fn cross(&self, other: Vector2) -> f32 {
        self.x * other.y - self.y * other.x
    }

    /// Unit vector in the same direction, or the zero vector when the
    /// magnitude is zero
    pub fn normalized(&self) -> Vector2 {
        let magnitude = self.magnitude();
        if magnitude <= EPSILON {
            Vector2::ZERO
        } else {
            *self * (1.0 / magnitude)
        }
    }

    /// Unit vector in the same direction, failing on a zero vector
    pub fn try_normalized(&self) -> Result<Vector2, crate::engine::EngineError> {
        let magnitude = self.magnitude();
        if magnitude <= EPSILON {
            return Err(crate::engine::EngineError::DegenerateGeometry(
                "cannot normalize a zero-length vector",
            ));
        }
        Ok(*self * (1.0 / magnitude))
    }

    /// Vector with the components swapped
    pub fn inverse(&self) -> Vector2 {
        Vector2::new(self.y, self.x)
    }

    /// True when both components are finite
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl From<Vec2> for Vector2 {
    fn from(v: Vec2) -> Self {
        Self::new(v.x, v.y)
    }
}

impl From<Vector2> for Vec2 {
    fn from(v: Vector2) -> Self {
        Vec2::new(v.x, v.y)
    }
}

impl From<(f32, f32)> for Vector2 {
    fn from((x, y): (f32, f32)) -> Self {
        Self::new(x, y)
    }
}

impl AddAssign for Vector2 {
    fn add_assign(&mut self, rhs: Self) {
        Vector2::add(self, rhs);
    }
}

impl Sub for Vector2 {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl SubAssign for Vector2 {
    fn sub_assign(&mut self, rhs: Self) {
        self.subtract(rhs);
    }
}

impl Mul<f32> for Vector2 {
    type Output = Self;
    fn mul(self, rhs: f32) -> Self {
        Self::new(self.x * rhs, self.y * rhs)
    }
}

impl Neg for Vector2 {
    type Output = Self;
    fn neg(self) -> Self {
        Self::new(-self.x, -self.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use std::f32::consts::{FRAC_PI_2, PI};

    #[test]
    fn test_clamp() {
        assert_eq!(clamp(5.0, 0.0, 10.0), 5.0);
        assert_eq!(clamp(-5.0, 0.0, 10.0), 0.0);
        assert_eq!(clamp(15.0, 0.0, 10.0), 10.0);
    }

    #[test]
    fn test_lerp() {
        assert_eq!(lerp(0.0, 10.0, 0.0), 0.0);
        assert_eq!(lerp(0.0, 10.0, 1.0), 10.0);
        assert_eq!(lerp(0.0, 10.0, 0.5), 5.0);
    }

    #[test]
    fn test_approx_equal() {
        assert!(approx_equal(1.0, 1.00001, 0.0001));
        assert!(!approx_equal(1.0, 1.1, 0.01));
    }

    #[test]
    fn test_normalize_degrees() {
        assert_eq!(normalize_degrees(370.0), 10.0);
        assert_eq!(normalize_degrees(-90.0), 270.0);
        assert_eq!(normalize_degrees(360.0), 0.0);
        assert_eq!(normalize_degrees(0.0), 0.0);
        let tiny = normalize_degrees(-1e-8);
        assert!((0.0..360.0).contains(&tiny));
    }

    #[test]
    fn test_in_place_arithmetic() {
        let mut v = Vector2::new(1.0, 2.0);
        v.add(Vector2::new(3.0, 4.0));
        assert_eq!(v, Vector2::new(4.0, 6.0));
        v.subtract(Vector2::new(1.0, 1.0));
        assert_eq!(v, Vector2::new(3.0, 5.0));
        v.scale(2.0);
        assert_eq!(v, Vector2::new(6.0, 10.0));
    }

    #[test]
    fn test_add_mutates_with_operator_traits_in_scope() {
        #[allow(unused_imports)]
        use std::ops::Add;

        let mut v = Vector2::new(1.0, 2.0);
        v.add(Vector2::new(3.0, 4.0));
        assert_eq!(v, Vector2::new(4.0, 6.0));

        let mut w = Vector2::ZERO;
        w += Vector2::ONE;
        assert_eq!(w, Vector2::ONE);
        assert_eq!(Vector2::ONE.plus(Vector2::RIGHT), Vector2::new(2.0, 1.0));
    }

    #[test]
    fn test_dot_is_component_wise() {
        let mut v = Vector2::new(2.0, 3.0);
        v.dot(Vector2::new(4.0, -1.0));
        assert_eq!(v, Vector2::new(8.0, -3.0));
        assert_eq!(Vector2::new(2.0, 3.0).inner(Vector2::new(4.0, -1.0)), 5.0);
    }

    #[test]
    fn test_rotate() {
        let mut v = Vector2::RIGHT;
        v.rotate(FRAC_PI_2);
        assert_abs_diff_eq!(v.x, 0.0, epsilon = 1e-6);
        assert_abs_diff_eq!(v.y, 1.0, epsilon = 1e-6);

        let mut w = Vector2::new(2.0, 0.0);
        w.rotate(PI);
        assert_abs_diff_eq!(w.x, -2.0, epsilon = 1e-6);
        assert_abs_diff_eq!(w.y, 0.0, epsilon = 1e-6);
    }

    #[test]
    fn test_rotate_nan_is_noop() {
        let mut v = Vector2::new(3.0, 4.0);
        v.rotate(f32::NAN);
        assert_eq!(v, Vector2::new(3.0, 4.0));
        v.rotate(f32::INFINITY);
        assert_eq!(v, Vector2::new(3.0, 4.0));
    }

    #[test]
    fn test_magnitude_and_distance() {
        let a = Vector2::new(3.0, 4.0);
        assert_eq!(a.magnitude(), 5.0);
        let b = Vector2::new(6.0, 8.0);
        assert_eq!(a.distance(b), Vector2::distance_between(a, b));
        assert_eq!(a.distance(b), 5.0);
    }

    #[test]
    fn test_zero_normalization_clamps() {
        assert_eq!(Vector2::ZERO.normalized(), Vector2::ZERO);
        assert!(Vector2::ZERO.try_normalized().is_err());
        let unit = Vector2::new(0.0, 5.0).normalized();
        assert_eq!(unit, Vector2::new(0.0, 1.0));
    }

    #[test]
    fn test_inverse_swaps_components() {
        assert_eq!(Vector2::new(1.0, 2.0).inverse(), Vector2::new(2.0, 1.0));
    }

    #[test]
    fn test_cross() {
        assert_eq!(Vector2::RIGHT.cross(Vector2::UP), 1.0);
        assert_eq!(Vector2::UP.cross(Vector2::RIGHT), -1.0);
    }
}

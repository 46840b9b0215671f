// Position, rotation and scale of a rectangle, plus its derived edges

use glam::Vec2;

use crate::core::math::normalize_degrees;
use crate::core::{Segment, Vector2};

use super::error::{finite_scalar, finite_vector, EngineError};

/// Geometric state of a centered rectangle.
///
/// `position` is the rectangle center, `scale` holds width and height and
/// `rotation` is in degrees, always kept in `[0, 360)`. Scale components are
/// not required to be positive; a negative scale mirrors the rectangle and
/// flips the winding of [`Transform::edges`].
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Transform {
    position: Vector2,
    rotation: f32,
    scale: Vector2,
}

impl Transform {
    /// Create a transform at the origin with zero size
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an unrotated rectangle centered at `position`
    pub fn from_rect(position: Vector2, size: Vector2) -> Self {
        Self {
            position,
            rotation: 0.0,
            scale: size,
        }
    }

    pub fn position(&self) -> Vector2 {
        self.position
    }

    /// Rotation in degrees
    pub fn rotation(&self) -> f32 {
        self.rotation
    }

    pub fn rotation_radians(&self) -> f32 {
        self.rotation.to_radians()
    }

    pub fn scale(&self) -> Vector2 {
        self.scale
    }

    pub fn width(&self) -> f32 {
        self.scale.x
    }

    pub fn height(&self) -> f32 {
        self.scale.y
    }

    pub fn set_position(&mut self, position: Vector2) -> Result<(), EngineError> {
        self.position = finite_vector(position, "finite position")?;
        Ok(())
    }

    /// Set the rotation in degrees; the value is reduced into `[0, 360)`
    pub fn set_rotation(&mut self, degrees: f32) -> Result<(), EngineError> {
        self.rotation = normalize_degrees(finite_scalar(degrees, "finite rotation")?);
        Ok(())
    }

    pub fn set_scale(&mut self, scale: Vector2) -> Result<(), EngineError> {
        self.scale = finite_vector(scale, "finite scale")?;
        Ok(())
    }

    /// Move the position by `delta`
    pub fn translate(&mut self, delta: Vector2) -> Result<(), EngineError> {
        let delta = finite_vector(delta, "finite translation")?;
        self.position.add(delta);
        Ok(())
    }

    /// Add `delta` degrees to the rotation
    pub fn rotate(&mut self, delta: f32) -> Result<(), EngineError> {
        let delta = finite_scalar(delta, "finite rotation delta")?;
        self.rotation = normalize_degrees(self.rotation + delta);
        Ok(())
    }

    /// Add `delta` radians to the rotation
    pub fn rotate_radians(&mut self, delta: f32) -> Result<(), EngineError> {
        self.rotate(finite_scalar(delta, "finite rotation delta")?.to_degrees())
    }

    /// Multiply both scale components by `factor`
    pub fn scalar_scale(&mut self, factor: f32) -> Result<(), EngineError> {
        let factor = finite_scalar(factor, "finite scale factor")?;
        self.scale.scale(factor);
        Ok(())
    }

    /// Multiply scale components by the matching components of `factors`
    pub fn vector_scale(&mut self, factors: Vector2) -> Result<(), EngineError> {
        let factors = finite_vector(factors, "finite scale vector")?;
        self.scale.dot(factors);
        Ok(())
    }

    /// Unchecked translation used by the integrator
    pub(crate) fn offset(&mut self, delta: Vector2) {
        self.position.add(delta);
    }

    /// Rectangle corners in world space: top-left, top-right, bottom-right,
    /// bottom-left (screen coordinates, y down, before rotation)
    pub fn corners(&self) -> [Vector2; 4] {
        let half = Vec2::from(self.scale) * 0.5;
        let rotation = Vec2::from_angle(self.rotation_radians());
        let center = Vec2::from(self.position);

        [
            Vec2::new(-half.x, -half.y),
            Vec2::new(half.x, -half.y),
            Vec2::new(half.x, half.y),
            Vec2::new(-half.x, half.y),
        ]
        .map(|corner| Vector2::from(center + rotation.rotate(corner)))
    }

    /// The four sides of the rotated rectangle.
    ///
    /// Recomputed on every call. With non-negative scale the traversal is
    /// clockwise on screen for every rotation.
    pub fn edges(&self) -> [Segment; 4] {
        let [tl, tr, br, bl] = self.corners();
        [
            Segment::new(tl, tr),
            Segment::new(tr, br),
            Segment::new(br, bl),
            Segment::new(bl, tl),
        ]
    }

    /// Axis-aligned hit test against the unrotated rectangle (open interval)
    pub fn contains_point(&self, point: Vector2) -> bool {
        let half_w = self.scale.x.abs() / 2.0;
        let half_h = self.scale.y.abs() / 2.0;
        point.x > self.position.x - half_w
            && point.x < self.position.x + half_w
            && point.y > self.position.y - half_h
            && point.y < self.position.y + half_h
    }
}

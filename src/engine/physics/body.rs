// Per-entity physics state and integration

use crate::core::math::EPSILON;
use crate::core::{line_intersection, Segment, Vector2};
use crate::engine::error::{finite_scalar, finite_vector, EngineError};
use crate::engine::transform::Transform;

/// Axes along which a body never moves
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Freeze {
    pub x: bool,
    pub y: bool,
}

impl Freeze {
    pub const NONE: Freeze = Freeze { x: false, y: false };
    pub const X: Freeze = Freeze { x: true, y: false };
    pub const Y: Freeze = Freeze { x: false, y: true };
    pub const BOTH: Freeze = Freeze { x: true, y: true };

    /// Zero the frozen components of `v`
    pub fn apply(self, v: Vector2) -> Vector2 {
        Vector2::new(
            if self.x { 0.0 } else { v.x },
            if self.y { 0.0 } else { v.y },
        )
    }
}

/// What happens to accumulated acceleration after a step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AccelerationMode {
    /// Forces act for one step only
    #[default]
    ResetEachFrame,
    /// Forces keep acting every step once applied
    Persistent,
}

/// Physics component attached to an entity.
///
/// Time is measured in frames: `step` is one forward Euler step with no
/// sub-stepping.
#[derive(Debug, Clone, PartialEq)]
pub struct PhysicsBody {
    mass: f32,
    pub freeze: Freeze,
    pub mode: AccelerationMode,
    velocity: Vector2,
    acceleration: Vector2,
}

impl PhysicsBody {
    pub fn new(mass: f32) -> Result<Self, EngineError> {
        Ok(Self {
            mass: finite_scalar(mass, "finite mass")?,
            ..Self::default()
        })
    }

    pub fn with_freeze(mut self, freeze: Freeze) -> Self {
        self.freeze = freeze;
        self
    }

    pub fn with_mode(mut self, mode: AccelerationMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn mass(&self) -> f32 {
        self.mass
    }

    pub fn velocity(&self) -> Vector2 {
        self.velocity
    }

    pub fn acceleration(&self) -> Vector2 {
        self.acceleration
    }

    pub fn set_velocity(&mut self, velocity: Vector2) -> Result<(), EngineError> {
        self.velocity = finite_vector(velocity, "finite velocity")?;
        Ok(())
    }

    pub fn set_acceleration(&mut self, acceleration: Vector2) -> Result<(), EngineError> {
        self.acceleration = finite_vector(acceleration, "finite acceleration")?;
        Ok(())
    }

    /// Accumulate `force` scaled by mass into the acceleration
    pub fn apply_force(&mut self, force: Vector2) -> Result<(), EngineError> {
        let force = finite_vector(force, "finite force")?;
        self.acceleration += force * self.mass;
        Ok(())
    }

    /// Advance one frame, moving `transform` by the new velocity
    pub fn step(&mut self, transform: &mut Transform) {
        self.velocity.add(self.acceleration);
        self.velocity = self.freeze.apply(self.velocity);
        transform.offset(self.velocity);

        if self.mode == AccelerationMode::ResetEachFrame {
            self.acceleration = Vector2::ZERO;
        }
    }

    /// Reflect off `edge` and push `transform` back out of the other body.
    ///
    /// The velocity is mirrored across the struck edge's line. The body is then
    /// displaced away from the point where the line between both centers meets
    /// the edge, by a distance equal to its speed. Nothing is changed when that
    /// geometry is degenerate.
    pub fn respond(
        &mut self,
        transform: &mut Transform,
        edge: &Segment,
        other_position: Vector2,
    ) -> Result<(), EngineError> {
        let position = transform.position();
        let contact = line_intersection(position, other_position, edge)
            .ok_or(EngineError::DegenerateGeometry("center line parallel to struck edge"))?;

        let away = position - contact;
        let distance = away.magnitude();
        if distance <= EPSILON {
            return Err(EngineError::DegenerateGeometry("center lies on struck edge"));
        }

        let reflected = reflect(self.velocity, edge.direction());
        let displacement = self.freeze.apply(away * (reflected.magnitude() / distance));
        if !reflected.is_finite() || !displacement.is_finite() {
            return Err(EngineError::DegenerateGeometry("non-finite collision response"));
        }

        self.velocity = reflected;
        transform.offset(displacement);
        Ok(())
    }
}

impl Default for PhysicsBody {
    fn default() -> Self {
        Self {
            mass: 1.0,
            freeze: Freeze::NONE,
            mode: AccelerationMode::default(),
            velocity: Vector2::ZERO,
            acceleration: Vector2::ZERO,
        }
    }
}

/// Rotate `velocity` by twice the signed angle between it and `direction`.
///
/// The sign keeps the rotation on the side that mirrors across the edge line;
/// an unsigned angle turns glancing hits the wrong way.
fn reflect(velocity: Vector2, direction: Vector2) -> Vector2 {
    let angle = velocity.cross(direction).atan2(velocity.inner(direction));
    let mut reflected = velocity;
    reflected.rotate(2.0 * angle);
    reflected
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn body_with_velocity(v: Vector2) -> PhysicsBody {
        let mut body = PhysicsBody::default();
        body.set_velocity(v).unwrap();
        body
    }

    #[test]
    fn test_constant_velocity_accumulates_linearly() {
        let mut body = body_with_velocity(Vector2::new(1.0, 0.0));
        let mut t = Transform::from_rect(Vector2::new(3.0, 4.0), Vector2::ONE);
        for n in 1..=10 {
            body.step(&mut t);
            assert_eq!(t.position(), Vector2::new(3.0 + n as f32, 4.0));
        }
    }

    #[test]
    fn test_frozen_axis_pins_velocity() {
        let mut body = body_with_velocity(Vector2::new(5.0, 5.0)).with_freeze(Freeze::X);
        body.apply_force(Vector2::new(3.0, 1.0)).unwrap();
        let mut t = Transform::new();
        body.step(&mut t);

        assert_eq!(body.velocity().x, 0.0);
        assert_eq!(body.velocity().y, 6.0);
        assert_eq!(t.position(), Vector2::new(0.0, 6.0));
    }

    #[test]
    fn test_force_scales_with_mass() {
        let mut body = PhysicsBody::new(2.0).unwrap();
        body.apply_force(Vector2::new(1.0, -0.5)).unwrap();
        body.apply_force(Vector2::new(1.0, 0.0)).unwrap();
        assert_eq!(body.acceleration(), Vector2::new(4.0, -1.0));
    }

    #[test]
    fn test_acceleration_reset_policy() {
        let mut t = Transform::new();
        let mut reset = PhysicsBody::default();
        reset.apply_force(Vector2::new(1.0, 0.0)).unwrap();
        reset.step(&mut t);
        reset.step(&mut t);
        assert_eq!(reset.velocity(), Vector2::new(1.0, 0.0));
        assert_eq!(reset.acceleration(), Vector2::ZERO);

        let mut persistent = PhysicsBody::default().with_mode(AccelerationMode::Persistent);
        persistent.apply_force(Vector2::new(1.0, 0.0)).unwrap();
        persistent.step(&mut t);
        persistent.step(&mut t);
        assert_eq!(persistent.velocity(), Vector2::new(2.0, 0.0));
    }

    #[test]
    fn test_invalid_force_rejected() {
        let mut body = PhysicsBody::default();
        assert!(body.apply_force(Vector2::new(f32::NAN, 0.0)).is_err());
        assert_eq!(body.acceleration(), Vector2::ZERO);
        assert!(PhysicsBody::new(f32::INFINITY).is_err());
    }

    #[test]
    fn test_head_on_response() {
        let mut body = body_with_velocity(Vector2::new(2.0, 0.0));
        let mut t = Transform::from_rect(Vector2::new(12.0, 10.0), Vector2::new(4.0, 4.0));
        // a wall's left side at x = 12.5, traversed bottom to top
        let edge = Segment::new(Vector2::new(12.5, 20.0), Vector2::new(12.5, 0.0));

        body.respond(&mut t, &edge, Vector2::new(13.5, 10.0)).unwrap();

        assert_abs_diff_eq!(body.velocity().x, -2.0, epsilon = 1e-4);
        assert_abs_diff_eq!(body.velocity().y, 0.0, epsilon = 1e-4);
        assert_abs_diff_eq!(t.position().x, 10.0, epsilon = 1e-4);
        assert_abs_diff_eq!(t.position().y, 10.0, epsilon = 1e-4);
    }

    #[test]
    fn test_glancing_response_mirrors_across_edge() {
        let mut body = body_with_velocity(Vector2::new(3.0, 4.0));
        let mut t = Transform::from_rect(Vector2::new(0.0, 0.0), Vector2::ONE);
        let edge = Segment::new(Vector2::new(-10.0, 1.0), Vector2::new(10.0, 1.0));

        body.respond(&mut t, &edge, Vector2::new(0.0, 5.0)).unwrap();

        assert_abs_diff_eq!(body.velocity().x, 3.0, epsilon = 1e-4);
        assert_abs_diff_eq!(body.velocity().y, -4.0, epsilon = 1e-4);
        // pushed straight up by |v| = 5
        assert_abs_diff_eq!(t.position().y, -5.0, epsilon = 1e-4);
    }

    #[test]
    fn test_response_respects_freeze() {
        let mut body = body_with_velocity(Vector2::new(2.0, 0.0)).with_freeze(Freeze::X);
        let mut t = Transform::from_rect(Vector2::new(12.0, 10.0), Vector2::new(4.0, 4.0));
        let edge = Segment::new(Vector2::new(12.5, 20.0), Vector2::new(12.5, 0.0));
        body.respond(&mut t, &edge, Vector2::new(13.5, 10.0)).unwrap();
        assert_eq!(t.position().x, 12.0);
    }

    #[test]
    fn test_degenerate_geometry_leaves_state() {
        let mut body = body_with_velocity(Vector2::new(2.0, 0.0));
        let mut t = Transform::from_rect(Vector2::new(0.0, 0.0), Vector2::ONE);
        let before = (body.clone(), t);

        // center line runs along the edge
        let edge = Segment::new(Vector2::new(-5.0, 0.0), Vector2::new(5.0, 0.0));
        let err = body.respond(&mut t, &edge, Vector2::new(3.0, 0.0));
        assert!(matches!(err, Err(EngineError::DegenerateGeometry(_))));

        // both centers coincide
        let edge = Segment::new(Vector2::new(1.0, -1.0), Vector2::new(1.0, 1.0));
        let err = body.respond(&mut t, &edge, Vector2::new(0.0, 0.0));
        assert!(matches!(err, Err(EngineError::DegenerateGeometry(_))));

        assert_eq!((body, t), before);
    }

    #[test]
    fn test_freeze_apply() {
        let v = Vector2::new(1.0, 2.0);
        assert_eq!(Freeze::NONE.apply(v), v);
        assert_eq!(Freeze::Y.apply(v), Vector2::new(1.0, 0.0));
        assert_eq!(Freeze::BOTH.apply(v), Vector2::ZERO);
    }
}

// Physics: per-entity bodies and oriented-rectangle collision
//
// There is no world object. A physics layer owns the entities, tests every
// ordered pair with `Collider::check_collision` and lets each entity respond
// to its own contacts.

pub mod body;
pub mod collider;

pub use body::{AccelerationMode, Freeze, PhysicsBody};
pub use collider::{Collider, CollisionResult, Contact};

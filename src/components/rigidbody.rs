//! Kinematic body component with named acceleration forces.
//!
//! The [`RigidBody`] component stores velocity and named acceleration forces
//! for an entity. The bird carries a single `"gravity"` force whose value is
//! rewritten whenever the level settings change.
//!
//! Units are 60 Hz frames: velocity in pixels per frame, acceleration in
//! pixels per frame squared.
//!
//! The `frozen` flag disables movement integration, used while the bird
//! hovers before the first flap.

use bevy_ecs::prelude::Component;
use raylib::prelude::Vector2;
use rustc_hash::FxHashMap;

/// Name of the force the level drives from [`Settings::gravity`].
///
/// [`Settings::gravity`]: crate::resources::settings::Settings::gravity
pub const GRAVITY: &str = "gravity";

/// Kinematic body storing velocity and named acceleration forces.
#[derive(Component, Clone, Debug)]
pub struct RigidBody {
    /// Current velocity.
    pub velocity: Vector2,
    /// Named acceleration forces. The total acceleration is their sum.
    pub forces: FxHashMap<String, Vector2>,
    /// Optional maximum speed. If set, velocity magnitude is clamped to this value.
    pub max_speed: Option<f32>,
    /// When true, the movement system skips this entity.
    pub frozen: bool,
}

impl Default for RigidBody {
    fn default() -> Self {
        Self::new()
    }
}

impl RigidBody {
    /// Create a RigidBody with zero velocity and no forces.
    pub fn new() -> Self {
        Self {
            velocity: Vector2 { x: 0.0, y: 0.0 },
            forces: FxHashMap::default(),
            max_speed: None,
            frozen: false,
        }
    }

    /// Create a RigidBody with a downward gravity force and a speed cap.
    pub fn with_gravity(gravity: f32, max_speed: f32) -> Self {
        let mut rb = Self::new();
        rb.add_force(GRAVITY, Vector2 { x: 0.0, y: gravity });
        rb.max_speed = Some(max_speed);
        rb
    }

    /// Add or update a named acceleration force.
    pub fn add_force(&mut self, name: &str, value: Vector2) {
        self.forces.insert(name.to_string(), value);
    }

    /// Update the value of an existing force.
    /// Returns false if the force doesn't exist.
    pub fn set_force_value(&mut self, name: &str, value: Vector2) -> bool {
        if let Some(force) = self.forces.get_mut(name) {
            *force = value;
            true
        } else {
            false
        }
    }

    /// Calculate the total acceleration from all forces.
    pub fn total_acceleration(&self) -> Vector2 {
        let mut total = Vector2 { x: 0.0, y: 0.0 };
        for force in self.forces.values() {
            total += *force;
        }
        total
    }

    /// Whether integration alone will carry the body downwards: some net
    /// downward pull and a speed cap that lets it move.
    pub fn falls(&self) -> bool {
        self.total_acceleration().y > 0.0 && self.max_speed.is_none_or(|max| max > 0.0)
    }

    /// Clamp the velocity magnitude to `max_speed`, if any.
    pub fn clamp_speed(&mut self) {
        if let Some(max) = self.max_speed {
            let speed = self.velocity.length();
            if speed > max && speed > 0.0 {
                self.velocity = self.velocity.normalized() * max;
            }
        }
    }

    /// Freeze the rigid body, preventing movement system from updating it.
    pub fn freeze(&mut self) {
        self.frozen = true;
    }

    /// Unfreeze the rigid body, allowing movement system to update it.
    pub fn unfreeze(&mut self) {
        self.frozen = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f32 = 1e-6;

    fn approx_eq(a: f32, b: f32) -> bool {
        (a - b).abs() < EPSILON
    }

    #[test]
    fn test_with_gravity() {
        let rb = RigidBody::with_gravity(0.7, 20.0);
        let acc = rb.total_acceleration();
        assert!(approx_eq(acc.x, 0.0));
        assert!(approx_eq(acc.y, 0.7));
        assert_eq!(rb.max_speed, Some(20.0));
        assert!(!rb.frozen);
    }

    #[test]
    fn test_forces_add_up() {
        let mut rb = RigidBody::with_gravity(1.0, 20.0);
        rb.add_force("wind", Vector2 { x: 2.0, y: 0.0 });
        assert!(rb.set_force_value(GRAVITY, Vector2 { x: 0.0, y: 0.5 }));
        let acc = rb.total_acceleration();
        assert!(approx_eq(acc.x, 2.0));
        assert!(approx_eq(acc.y, 0.5));
    }

    #[test]
    fn test_set_force_value_missing() {
        let mut rb = RigidBody::new();
        assert!(!rb.set_force_value(GRAVITY, Vector2 { x: 0.0, y: 1.0 }));
    }

    #[test]
    fn test_falls_needs_pull_and_speed() {
        assert!(RigidBody::with_gravity(0.7, 20.0).falls());
        assert!(!RigidBody::with_gravity(0.0, 20.0).falls());
        assert!(!RigidBody::with_gravity(0.7, 0.0).falls());
        assert!(!RigidBody::new().falls());
    }

    #[test]
    fn test_clamp_speed() {
        let mut rb = RigidBody::with_gravity(0.7, 10.0);
        rb.velocity = Vector2 { x: 0.0, y: 25.0 };
        rb.clamp_speed();
        assert!(approx_eq(rb.velocity.y, 10.0));

        rb.velocity = Vector2 { x: 0.0, y: -4.0 };
        rb.clamp_speed();
        assert!(approx_eq(rb.velocity.y, -4.0));
    }

    #[test]
    fn test_freeze_unfreeze() {
        let mut rb = RigidBody::new();
        rb.freeze();
        assert!(rb.frozen);
        rb.unfreeze();
        assert!(!rb.frozen);
    }
}

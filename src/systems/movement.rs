//! Integrate rigid bodies.
//!
//! Velocity picks up the body's forces, is clamped to `max_speed`,
//! and moves the position. Everything is scaled by the tick length in 60 Hz
//! frames. Frozen bodies are skipped.

use bevy_ecs::prelude::*;

use crate::components::bird::Bird;
use crate::components::mapposition::MapPosition;
use crate::components::rigidbody::RigidBody;
use crate::resources::worldtime::WorldTime;

pub fn movement(mut query: Query<(&mut MapPosition, &mut RigidBody)>, time: Res<WorldTime>) {
    for (mut position, mut rigidbody) in query.iter_mut() {
        if rigidbody.frozen {
            continue;
        }
        let acceleration = rigidbody.total_acceleration();
        rigidbody.velocity += acceleration.scale_by(time.delta);
        rigidbody.clamp_speed();
        let delta = rigidbody.velocity.scale_by(time.delta);
        position.pos += delta;
    }
}

/// Keep the bird below the top of the screen.
pub fn ceiling_system(mut birds: Query<(&mut MapPosition, &mut RigidBody), With<Bird>>) {
    for (mut position, mut rigidbody) in birds.iter_mut() {
        if position.pos.y < 0.0 {
            position.pos.y = 0.0;
            rigidbody.velocity.y = rigidbody.velocity.y.max(0.0);
        }
    }
}

use bevy_ecs::prelude::Resource;

/// Whether a flap was requested this tick, by the player or the autopilot.
#[derive(Resource, Clone, Copy, Debug, Default, PartialEq)]
pub struct FlapInput {
    pub pressed: bool,
}

use glam::Affine3A;

use crate::collision::shapes::collision_shape::CollisionShapes;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ActivationState {
    Active,
    Sleeping,
    DisableSimulation,
}

pub enum CollisionFlags {
    StaticObject = 1,
    NoContactResponse = (1 << 1),
}

/// Geometry plus world placement of one body, owned by the caller's world layer.
#[derive(Clone, Debug)]
pub struct CollisionObject {
    world_transform: Affine3A,
    /// Predicted transform at the end of the step, used as the target state of
    /// time of impact sweeps.
    pub interpolation_world_transform: Affine3A,
    collision_shape: CollisionShapes,
    pub collision_flags: u8,
    activation_state: ActivationState,
    pub friction: f32,
    pub restitution: f32,
}

impl CollisionObject {
    #[must_use]
    pub const fn new(collision_shape: CollisionShapes, world_transform: Affine3A) -> Self {
        Self {
            world_transform,
            interpolation_world_transform: world_transform,
            collision_shape,
            collision_flags: 0,
            activation_state: ActivationState::Active,
            friction: 0.5,
            restitution: 0.0,
        }
    }

    #[must_use]
    pub const fn new_static(collision_shape: CollisionShapes, world_transform: Affine3A) -> Self {
        let mut obj = Self::new(collision_shape, world_transform);
        obj.collision_flags = CollisionFlags::StaticObject as u8;
        obj
    }

    #[must_use]
    pub const fn with_material(mut self, friction: f32, restitution: f32) -> Self {
        self.friction = friction;
        self.restitution = restitution;
        self
    }

    pub const fn set_world_transform(&mut self, world_trans: Affine3A) {
        self.world_transform = world_trans;
    }

    #[must_use]
    pub const fn get_world_transform(&self) -> &Affine3A {
        &self.world_transform
    }

    #[must_use]
    pub const fn get_collision_shape(&self) -> &CollisionShapes {
        &self.collision_shape
    }

    #[must_use]
    pub const fn is_static_object(&self) -> bool {
        self.collision_flags & CollisionFlags::StaticObject as u8 != 0
    }

    #[must_use]
    pub const fn is_active(&self) -> bool {
        !matches!(
            self.activation_state,
            ActivationState::Sleeping | ActivationState::DisableSimulation
        )
    }

    #[must_use]
    pub const fn has_contact_response(&self) -> bool {
        self.collision_flags & CollisionFlags::NoContactResponse as u8 == 0
    }

    #[inline]
    #[must_use]
    pub const fn get_activation_state(&self) -> ActivationState {
        self.activation_state
    }

    pub fn set_activation_state(&mut self, new_state: ActivationState) {
        if self.activation_state != ActivationState::DisableSimulation {
            self.activation_state = new_state;
        }
    }

    pub const fn force_activate(&mut self) {
        self.activation_state = ActivationState::Active;
    }
}

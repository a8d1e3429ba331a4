use crate::collision::dispatch::collision_object::CollisionObject;

/// Combines the surface materials of a pair when its manifold is created.
pub trait MaterialCombiner {
    /// Returns `(friction, restitution)` for contacts between the two bodies.
    fn combine(&self, body0: &CollisionObject, body1: &CollisionObject) -> (f32, f32);
}

/// Static surfaces impose their own friction and restitution limits, dynamic
/// pairs multiply.
#[derive(Clone, Copy, Debug, Default)]
pub struct DefaultMaterialCombiner;

impl DefaultMaterialCombiner {
    #[must_use]
    pub fn calculate_combined_friction(body0: &CollisionObject, body1: &CollisionObject) -> f32 {
        if body0.is_static_object() || body1.is_static_object() {
            body0.friction.min(body1.friction)
        } else {
            body0.friction * body1.friction
        }
    }

    #[must_use]
    pub fn calculate_combined_restitution(body0: &CollisionObject, body1: &CollisionObject) -> f32 {
        if body0.is_static_object() || body1.is_static_object() {
            body0.restitution.max(body1.restitution)
        } else {
            body0.restitution * body1.restitution
        }
    }
}

impl MaterialCombiner for DefaultMaterialCombiner {
    fn combine(&self, body0: &CollisionObject, body1: &CollisionObject) -> (f32, f32) {
        (
            Self::calculate_combined_friction(body0, body1),
            Self::calculate_combined_restitution(body0, body1),
        )
    }
}

/// Any `Fn(&CollisionObject, &CollisionObject) -> (f32, f32)` can stand in for
/// a combiner.
impl<F> MaterialCombiner for F
where
    F: Fn(&CollisionObject, &CollisionObject) -> (f32, f32),
{
    fn combine(&self, body0: &CollisionObject, body1: &CollisionObject) -> (f32, f32) {
        self(body0, body1)
    }
}

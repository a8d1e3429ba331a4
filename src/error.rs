use thiserror::Error;

use crate::collision::broadphase::BroadphaseNativeTypes;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Error)]
pub enum CollisionError {
    /// No algorithm handles this combination of shape types, in either order.
    #[error("no collision algorithm registered for {0:?}/{1:?}")]
    NoAlgorithm(BroadphaseNativeTypes, BroadphaseNativeTypes),
    #[error("a collision algorithm is already registered for {0:?}/{1:?}")]
    DuplicateRegistration(BroadphaseNativeTypes, BroadphaseNativeTypes),
    #[error("collision algorithm pool exhausted ({capacity} instances)")]
    AlgorithmPoolExhausted { capacity: usize },
    #[error("persistent manifold pool exhausted ({capacity} manifolds)")]
    ManifoldPoolExhausted { capacity: usize },
    #[error("persistent manifold is already bound to a collision algorithm")]
    ManifoldInUse,
    #[error("persistent manifold handle is not live")]
    InvalidManifold,
}

pub type CollisionResult<T> = Result<T, CollisionError>;

//! Narrowphase collision detection: per shape-pair contact algorithms, a
//! registry that dispatches pairs to them, and persistent contact manifolds
//! that keep solver impulses alive across steps.

pub mod collision;
pub mod error;
pub mod linear_math;
pub mod logging;

pub use collision::{
    broadphase::{
        BroadphaseInterface, BroadphaseNativeTypes, BroadphasePair, CollisionAlgorithm,
        DispatcherInfo, HashedOverlappingPairCache, ShapeProxy, SimpleBroadphase,
    },
    dispatch::{
        collision_configuration::{
            CollisionConfiguration, CollisionConstructionInfo, CreateFunc, PoolPolicy,
        },
        collision_dispatcher::{
            AlgorithmInstance, AlgorithmKey, Algorithms, CollisionDispatcher, ManifoldKey,
            ManifoldOwnership,
        },
        collision_object::{ActivationState, CollisionFlags, CollisionObject},
        collision_world::{CollisionWorld, StrictnessPolicy, WorldConfig},
        material_combiner::{DefaultMaterialCombiner, MaterialCombiner},
    },
    narrowphase::{
        manifold_point::ManifoldPoint,
        manifold_result::ManifoldResult,
        persistent_manifold::{CONTACT_BREAKING_THRESHOLD, MANIFOLD_CACHE_SIZE, PersistentManifold},
        time_of_impact::Sweep,
    },
    shapes::{
        box_shape::BoxShape, collision_shape::CollisionShapes, sphere_shape::SphereShape,
        static_plane_shape::StaticPlaneShape, triangle_shape::TriangleShape,
    },
};
pub use error::{CollisionError, CollisionResult};

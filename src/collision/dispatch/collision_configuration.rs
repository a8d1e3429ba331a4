use ahash::AHashMap;

use super::collision_dispatcher::Algorithms;
use crate::{
    collision::{
        broadphase::BroadphaseNativeTypes,
        narrowphase::persistent_manifold::CONTACT_BREAKING_THRESHOLD,
    },
    error::{CollisionError, CollisionResult},
};

/// Builds a fresh algorithm for one pair.
pub type CreateFunc = fn() -> Algorithms;

/// What the dispatcher does when a pool reaches its limit.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum PoolPolicy {
    /// Double the limit and warn once per growth.
    #[default]
    Grow,
    /// Refuse the allocation with an error.
    Reject,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CollisionConstructionInfo {
    pub default_max_persistent_manifold_pool_size: usize,
    pub default_max_collision_algorithm_pool_size: usize,
    pub pool_policy: PoolPolicy,
    pub contact_breaking_threshold: f32,
}

impl CollisionConstructionInfo {
    pub const DEFAULT: Self = Self {
        default_max_persistent_manifold_pool_size: 4096,
        default_max_collision_algorithm_pool_size: 4096,
        pool_policy: PoolPolicy::Grow,
        contact_breaking_threshold: CONTACT_BREAKING_THRESHOLD,
    };
}

impl Default for CollisionConstructionInfo {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Maps pairs of shape types to the algorithm that handles them.
///
/// A pair is registered in one order only. Lookups for the reverse order
/// find the same entry and flag the result as swapped.
#[derive(Clone)]
pub struct CollisionConfiguration {
    create_funcs: AHashMap<(BroadphaseNativeTypes, BroadphaseNativeTypes), CreateFunc>,
}

impl CollisionConfiguration {
    /// A configuration with nothing registered.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            create_funcs: AHashMap::new(),
        }
    }

    /// Registers `create_func` for `(type0, type1)`. Fails if either order of
    /// the pair already has an algorithm.
    pub fn register_algorithm(
        &mut self,
        type0: BroadphaseNativeTypes,
        type1: BroadphaseNativeTypes,
        create_func: CreateFunc,
    ) -> CollisionResult<()> {
        if self.create_funcs.contains_key(&(type0, type1))
            || self.create_funcs.contains_key(&(type1, type0))
        {
            return Err(CollisionError::DuplicateRegistration(type0, type1));
        }

        self.create_funcs.insert((type0, type1), create_func);
        Ok(())
    }

    /// Registers `create_func` for `(type0, type1)`, dropping any previous
    /// entry for either order. Returns the replaced function.
    pub fn replace_algorithm(
        &mut self,
        type0: BroadphaseNativeTypes,
        type1: BroadphaseNativeTypes,
        create_func: CreateFunc,
    ) -> Option<CreateFunc> {
        let old = self
            .create_funcs
            .remove(&(type0, type1))
            .or_else(|| self.create_funcs.remove(&(type1, type0)));
        self.create_funcs.insert((type0, type1), create_func);
        old
    }

    /// Finds the algorithm for `(type0, type1)`. The flag is `true` when it was
    /// registered for `(type1, type0)` and its bodies must be swapped.
    #[must_use]
    pub fn get_collision_algorithm_create_func(
        &self,
        type0: BroadphaseNativeTypes,
        type1: BroadphaseNativeTypes,
    ) -> Option<(CreateFunc, bool)> {
        if let Some(&create_func) = self.create_funcs.get(&(type0, type1)) {
            return Some((create_func, false));
        }

        self.create_funcs
            .get(&(type1, type0))
            .map(|&create_func| (create_func, true))
    }

    #[must_use]
    pub fn num_registered(&self) -> usize {
        self.create_funcs.len()
    }
}

impl Default for CollisionConfiguration {
    /// The built-in algorithms.
    fn default() -> Self {
        use BroadphaseNativeTypes::{
            BoxShapeProxytype, SphereShapeProxytype, StaticPlaneProxytype, TriangleShapeProxytype,
        };

        let builtins: [(BroadphaseNativeTypes, BroadphaseNativeTypes, CreateFunc); 5] = [
            (SphereShapeProxytype, TriangleShapeProxytype, Algorithms::new_sphere_triangle),
            (SphereShapeProxytype, SphereShapeProxytype, Algorithms::new_sphere_sphere),
            (SphereShapeProxytype, BoxShapeProxytype, Algorithms::new_sphere_obb),
            (SphereShapeProxytype, StaticPlaneProxytype, Algorithms::new_convex_plane),
            (BoxShapeProxytype, StaticPlaneProxytype, Algorithms::new_convex_plane),
        ];

        let mut config = Self::empty();
        for (type0, type1, create_func) in builtins {
            config.create_funcs.insert((type0, type1), create_func);
        }
        config
    }
}

use log::{debug, warn};
#[cfg(feature = "parallel")]
use rayon::prelude::*;
use slotmap::{SlotMap, new_key_type};

use super::{
    collision_configuration::{CollisionConfiguration, CollisionConstructionInfo, PoolPolicy},
    collision_object::CollisionObject,
    convex_plane_collision_algorithm::ConvexPlaneCollisionAlgorithm,
    material_combiner::{DefaultMaterialCombiner, MaterialCombiner},
    sphere_obb_collision_algorithm::SphereObbCollisionAlgorithm,
    sphere_sphere_collision_algorithm::SphereSphereCollisionAlgorithm,
    sphere_triangle_collision_algorithm::SphereTriangleCollisionAlgorithm,
};
use crate::{
    collision::{
        broadphase::{BroadphaseNativeTypes, CollisionAlgorithm, DispatcherInfo, ShapeProxy},
        narrowphase::{
            manifold_result::ManifoldResult, persistent_manifold::PersistentManifold,
            time_of_impact::Sweep,
        },
    },
    error::{CollisionError, CollisionResult},
};

new_key_type! {
    /// Handle of a live algorithm instance.
    pub struct AlgorithmKey;
    /// Handle of a pooled persistent manifold.
    pub struct ManifoldKey;
}

pub enum Algorithms {
    SphereTriangle(SphereTriangleCollisionAlgorithm),
    SphereSphere(SphereSphereCollisionAlgorithm),
    SphereObb(SphereObbCollisionAlgorithm),
    ConvexPlane(ConvexPlaneCollisionAlgorithm),
    Custom(Box<dyn CollisionAlgorithm + Send + Sync>),
}

impl Algorithms {
    #[must_use]
    pub const fn new_sphere_triangle() -> Self {
        Self::SphereTriangle(SphereTriangleCollisionAlgorithm)
    }

    #[must_use]
    pub const fn new_sphere_sphere() -> Self {
        Self::SphereSphere(SphereSphereCollisionAlgorithm)
    }

    #[must_use]
    pub const fn new_sphere_obb() -> Self {
        Self::SphereObb(SphereObbCollisionAlgorithm)
    }

    #[must_use]
    pub const fn new_convex_plane() -> Self {
        Self::ConvexPlane(ConvexPlaneCollisionAlgorithm)
    }

    #[must_use]
    pub fn new_custom(algorithm: impl CollisionAlgorithm + Send + Sync + 'static) -> Self {
        Self::Custom(Box::new(algorithm))
    }
}

impl CollisionAlgorithm for Algorithms {
    fn process_collision(
        &self,
        body0: &ShapeProxy,
        body1: &ShapeProxy,
        dispatch_info: &DispatcherInfo,
        result_out: &mut ManifoldResult,
    ) {
        match self {
            Self::SphereTriangle(alg) => {
                alg.process_collision(body0, body1, dispatch_info, result_out);
            }
            Self::SphereSphere(alg) => {
                alg.process_collision(body0, body1, dispatch_info, result_out);
            }
            Self::SphereObb(alg) => {
                alg.process_collision(body0, body1, dispatch_info, result_out);
            }
            Self::ConvexPlane(alg) => {
                alg.process_collision(body0, body1, dispatch_info, result_out);
            }
            Self::Custom(alg) => alg.process_collision(body0, body1, dispatch_info, result_out),
        }
    }

    fn calculate_time_of_impact(
        &self,
        body0: &ShapeProxy,
        sweep0: &Sweep,
        body1: &ShapeProxy,
        sweep1: &Sweep,
        dispatch_info: &DispatcherInfo,
    ) -> Option<f32> {
        match self {
            Self::SphereTriangle(alg) => {
                alg.calculate_time_of_impact(body0, sweep0, body1, sweep1, dispatch_info)
            }
            Self::SphereSphere(alg) => {
                alg.calculate_time_of_impact(body0, sweep0, body1, sweep1, dispatch_info)
            }
            Self::SphereObb(alg) => {
                alg.calculate_time_of_impact(body0, sweep0, body1, sweep1, dispatch_info)
            }
            Self::ConvexPlane(alg) => {
                alg.calculate_time_of_impact(body0, sweep0, body1, sweep1, dispatch_info)
            }
            Self::Custom(alg) => {
                alg.calculate_time_of_impact(body0, sweep0, body1, sweep1, dispatch_info)
            }
        }
    }
}

/// Runs `algorithm` on a pair given in manifold (A, B) order.
///
/// When `is_swapped` is set the algorithm was registered for `(B, A)`, so the
/// bodies are handed to it reversed and `result_out` maps its output back
/// onto A and B.
pub fn process_pair(
    algorithm: &dyn CollisionAlgorithm,
    body_a: &ShapeProxy,
    body_b: &ShapeProxy,
    is_swapped: bool,
    dispatch_info: &DispatcherInfo,
    manifold: &mut PersistentManifold,
) {
    let mut result_out = ManifoldResult::new(
        manifold,
        *body_a.get_world_transform(),
        *body_b.get_world_transform(),
        is_swapped,
    );

    if is_swapped {
        algorithm.process_collision(body_b, body_a, dispatch_info, &mut result_out);
    } else {
        algorithm.process_collision(body_a, body_b, dispatch_info, &mut result_out);
    }
}

/// Who frees the manifold an algorithm instance writes into.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ManifoldOwnership {
    /// Created with the instance and released with it.
    Exclusive,
    /// Supplied by the caller, only unbound when the instance goes away.
    Borrowed,
}

/// An algorithm bound to one ordered pair of collision objects.
pub struct AlgorithmInstance {
    algorithm: Algorithms,
    is_swapped: bool,
    body0_idx: usize,
    body1_idx: usize,
    /// Shape types of the bodies at creation, in (A, B) order.
    shape_types: (BroadphaseNativeTypes, BroadphaseNativeTypes),
    manifold: ManifoldKey,
    ownership: ManifoldOwnership,
}

impl AlgorithmInstance {
    #[inline]
    #[must_use]
    pub const fn is_swapped(&self) -> bool {
        self.is_swapped
    }

    /// Object indices in (A, B) order.
    #[inline]
    #[must_use]
    pub const fn get_body_indices(&self) -> (usize, usize) {
        (self.body0_idx, self.body1_idx)
    }

    #[inline]
    #[must_use]
    pub const fn get_manifold(&self) -> ManifoldKey {
        self.manifold
    }

    #[inline]
    #[must_use]
    pub const fn get_ownership(&self) -> ManifoldOwnership {
        self.ownership
    }

    #[must_use]
    pub const fn get_algorithm(&self) -> &Algorithms {
        &self.algorithm
    }

    #[inline]
    #[must_use]
    pub const fn get_shape_types(&self) -> (BroadphaseNativeTypes, BroadphaseNativeTypes) {
        self.shape_types
    }

    /// Whether the objects in (A, B) order still have the shape types this
    /// instance was created for.
    #[must_use]
    pub fn matches(&self, obj_a: &CollisionObject, obj_b: &CollisionObject) -> bool {
        self.shape_types
            == (
                obj_a.get_collision_shape().get_shape_type(),
                obj_b.get_collision_shape().get_shape_type(),
            )
    }

    pub fn process_collision(
        &self,
        body_a: &ShapeProxy,
        body_b: &ShapeProxy,
        dispatch_info: &DispatcherInfo,
        manifold: &mut PersistentManifold,
    ) {
        process_pair(
            &self.algorithm,
            body_a,
            body_b,
            self.is_swapped,
            dispatch_info,
            manifold,
        );
    }

    #[must_use]
    pub fn calculate_time_of_impact(
        &self,
        body_a: &ShapeProxy,
        sweep_a: &Sweep,
        body_b: &ShapeProxy,
        sweep_b: &Sweep,
        dispatch_info: &DispatcherInfo,
    ) -> Option<f32> {
        if self.is_swapped {
            self.algorithm
                .calculate_time_of_impact(body_b, sweep_b, body_a, sweep_a, dispatch_info)
        } else {
            self.algorithm
                .calculate_time_of_impact(body_a, sweep_a, body_b, sweep_b, dispatch_info)
        }
    }
}

/// Owns the algorithm instances and persistent manifolds of every live pair.
pub struct CollisionDispatcher {
    collision_configuration: CollisionConfiguration,
    construction_info: CollisionConstructionInfo,
    material_combiner: Box<dyn MaterialCombiner + Send + Sync>,
    algorithms: SlotMap<AlgorithmKey, AlgorithmInstance>,
    manifolds: SlotMap<ManifoldKey, PersistentManifold>,
    max_algorithms: usize,
    max_manifolds: usize,
}

impl CollisionDispatcher {
    /// Takes ownership of the registry, which can't change afterwards.
    #[must_use]
    pub fn new(
        collision_configuration: CollisionConfiguration,
        construction_info: CollisionConstructionInfo,
    ) -> Self {
        Self {
            collision_configuration,
            construction_info,
            material_combiner: Box::new(DefaultMaterialCombiner),
            algorithms: SlotMap::with_key(),
            manifolds: SlotMap::with_key(),
            max_algorithms: construction_info.default_max_collision_algorithm_pool_size,
            max_manifolds: construction_info.default_max_persistent_manifold_pool_size,
        }
    }

    pub fn set_material_combiner(
        &mut self,
        material_combiner: impl MaterialCombiner + Send + Sync + 'static,
    ) {
        self.material_combiner = Box::new(material_combiner);
    }

    #[must_use]
    pub const fn get_collision_configuration(&self) -> &CollisionConfiguration {
        &self.collision_configuration
    }

    #[must_use]
    pub const fn get_construction_info(&self) -> &CollisionConstructionInfo {
        &self.construction_info
    }

    /// Current pool limits as `(algorithms, manifolds)`.
    #[must_use]
    pub const fn get_pool_limits(&self) -> (usize, usize) {
        (self.max_algorithms, self.max_manifolds)
    }

    #[must_use]
    pub fn get_num_algorithms(&self) -> usize {
        self.algorithms.len()
    }

    #[must_use]
    pub fn get_num_manifolds(&self) -> usize {
        self.manifolds.len()
    }

    /// Pairs where both sides are asleep, or either side ignores contacts,
    /// are not worth testing.
    #[must_use]
    pub const fn needs_collision(body0: &CollisionObject, body1: &CollisionObject) -> bool {
        (body0.is_active() || body1.is_active())
            && body0.has_contact_response()
            && body1.has_contact_response()
    }

    /// Looks up the algorithm for a pair in (A, B) order.
    pub fn find_algorithm(
        &self,
        body_a: &ShapeProxy,
        body_b: &ShapeProxy,
    ) -> CollisionResult<(Algorithms, bool)> {
        let type_a = body_a.get_shape_type();
        let type_b = body_b.get_shape_type();

        self.collision_configuration
            .get_collision_algorithm_create_func(type_a, type_b)
            .map(|(create_func, is_swapped)| (create_func(), is_swapped))
            .ok_or(CollisionError::NoAlgorithm(type_a, type_b))
    }

    /// Makes room for one more entry in a pool that holds `len` of `limit`.
    fn reserve_slot(
        len: usize,
        limit: &mut usize,
        policy: PoolPolicy,
        pool_name: &str,
        exhausted: impl FnOnce(usize) -> CollisionError,
    ) -> CollisionResult<()> {
        if len < *limit {
            return Ok(());
        }

        match policy {
            PoolPolicy::Grow => {
                let new_limit = (*limit).max(1) * 2;
                warn!("{pool_name} pool of {limit} is full, growing to {new_limit}");
                *limit = new_limit;
                Ok(())
            }
            PoolPolicy::Reject => Err(exhausted(*limit)),
        }
    }

    /// Allocates an empty manifold for a pair in (A, B) order, with friction
    /// and restitution from the material combiner.
    pub fn get_new_manifold(
        &mut self,
        body_a: &ShapeProxy,
        body_b: &ShapeProxy,
    ) -> CollisionResult<ManifoldKey> {
        Self::reserve_slot(
            self.manifolds.len(),
            &mut self.max_manifolds,
            self.construction_info.pool_policy,
            "Persistent manifold",
            |capacity| CollisionError::ManifoldPoolExhausted { capacity },
        )?;

        let mut manifold = PersistentManifold::new(
            body_a.object_idx,
            body_b.object_idx,
            self.construction_info.contact_breaking_threshold,
        );
        (manifold.combined_friction, manifold.combined_restitution) =
            self.material_combiner.combine(body_a.object, body_b.object);

        Ok(self.manifolds.insert(manifold))
    }

    /// Frees a manifold that no algorithm is writing into.
    pub fn release_manifold(&mut self, key: ManifoldKey) -> CollisionResult<PersistentManifold> {
        match self.manifolds.get(key) {
            None => Err(CollisionError::InvalidManifold),
            Some(manifold) if manifold.is_bound() => Err(CollisionError::ManifoldInUse),
            Some(_) => self
                .manifolds
                .remove(key)
                .ok_or(CollisionError::InvalidManifold),
        }
    }

    /// Creates the algorithm instance for a pair in (A, B) order.
    ///
    /// With `shared_manifold` the instance writes into that caller-owned
    /// manifold, otherwise it gets one of its own.
    pub fn create_algorithm(
        &mut self,
        body_a: &ShapeProxy,
        body_b: &ShapeProxy,
        shared_manifold: Option<ManifoldKey>,
    ) -> CollisionResult<AlgorithmKey> {
        let (algorithm, is_swapped) = self.find_algorithm(body_a, body_b)?;

        if let Some(key) = shared_manifold {
            let manifold = self
                .manifolds
                .get(key)
                .ok_or(CollisionError::InvalidManifold)?;
            if manifold.is_bound() {
                return Err(CollisionError::ManifoldInUse);
            }
        }

        Self::reserve_slot(
            self.algorithms.len(),
            &mut self.max_algorithms,
            self.construction_info.pool_policy,
            "Collision algorithm",
            |capacity| CollisionError::AlgorithmPoolExhausted { capacity },
        )?;

        let (manifold_key, ownership) = match shared_manifold {
            Some(key) => (key, ManifoldOwnership::Borrowed),
            None => (
                self.get_new_manifold(body_a, body_b)?,
                ManifoldOwnership::Exclusive,
            ),
        };

        let alg_key = self.algorithms.insert(AlgorithmInstance {
            algorithm,
            is_swapped,
            body0_idx: body_a.object_idx,
            body1_idx: body_b.object_idx,
            shape_types: (body_a.get_shape_type(), body_b.get_shape_type()),
            manifold: manifold_key,
            ownership,
        });

        if let Some(manifold) = self.manifolds.get_mut(manifold_key) {
            if ownership == ManifoldOwnership::Borrowed
                && (manifold.body0_idx, manifold.body1_idx)
                    != (body_a.object_idx, body_b.object_idx)
            {
                manifold.clear_manifold();
                manifold.body0_idx = body_a.object_idx;
                manifold.body1_idx = body_b.object_idx;
            }
            manifold.algorithm = Some(alg_key);
        }

        debug!(
            "Created algorithm for pair ({}, {}){}",
            body_a.object_idx,
            body_b.object_idx,
            if is_swapped { ", swapped" } else { "" }
        );

        Ok(alg_key)
    }

    /// Destroys an instance. Its own manifold goes with it, a borrowed one is
    /// unbound and left in the pool. Returns `false` for a stale key.
    pub fn destroy_algorithm(&mut self, key: AlgorithmKey) -> bool {
        let Some(instance) = self.algorithms.remove(key) else {
            return false;
        };

        match instance.ownership {
            ManifoldOwnership::Exclusive => {
                self.manifolds.remove(instance.manifold);
            }
            ManifoldOwnership::Borrowed => {
                if let Some(manifold) = self.manifolds.get_mut(instance.manifold) {
                    manifold.algorithm = None;
                }
            }
        }

        true
    }

    #[must_use]
    pub fn get_algorithm(&self, key: AlgorithmKey) -> Option<&AlgorithmInstance> {
        self.algorithms.get(key)
    }

    #[must_use]
    pub fn get_manifold(&self, key: ManifoldKey) -> Option<&PersistentManifold> {
        self.manifolds.get(key)
    }

    pub fn get_manifold_mut(&mut self, key: ManifoldKey) -> Option<&mut PersistentManifold> {
        self.manifolds.get_mut(key)
    }

    #[must_use]
    pub fn get_manifold_for_algorithm(&self, key: AlgorithmKey) -> Option<&PersistentManifold> {
        self.algorithms
            .get(key)
            .and_then(|instance| self.manifolds.get(instance.manifold))
    }

    pub fn manifolds(&self) -> impl Iterator<Item = (ManifoldKey, &PersistentManifold)> {
        self.manifolds.iter()
    }

    pub fn manifolds_mut(
        &mut self,
    ) -> impl Iterator<Item = (ManifoldKey, &mut PersistentManifold)> {
        self.manifolds.iter_mut()
    }

    /// Runs the bound algorithm of `manifold` and evicts points that drifted
    /// apart. Unbound manifolds, pairs that don't need collision and pairs
    /// whose shape types changed since the instance was created are left
    /// untouched.
    fn process_manifold(
        algorithms: &SlotMap<AlgorithmKey, AlgorithmInstance>,
        objects: &[CollisionObject],
        dispatch_info: &DispatcherInfo,
        manifold: &mut PersistentManifold,
    ) {
        let Some(instance) = manifold.algorithm.and_then(|key| algorithms.get(key)) else {
            return;
        };

        let (Some(obj_a), Some(obj_b)) = (
            objects.get(instance.body0_idx),
            objects.get(instance.body1_idx),
        ) else {
            return;
        };

        if !Self::needs_collision(obj_a, obj_b) || !instance.matches(obj_a, obj_b) {
            return;
        }

        let body_a = ShapeProxy::new(obj_a, instance.body0_idx);
        let body_b = ShapeProxy::new(obj_b, instance.body1_idx);

        instance.process_collision(&body_a, &body_b, dispatch_info, manifold);
        manifold.remove_stale_points(
            obj_a.get_world_transform(),
            obj_b.get_world_transform(),
            dispatch_info.collision_margin,
        );
    }

    /// Runs one instance against the current object transforms.
    /// Returns `false` for a stale key.
    pub fn process_collision(
        &mut self,
        key: AlgorithmKey,
        objects: &[CollisionObject],
        dispatch_info: &DispatcherInfo,
    ) -> bool {
        let Some(manifold_key) = self
            .algorithms
            .get(key)
            .map(AlgorithmInstance::get_manifold)
        else {
            return false;
        };

        let Some(manifold) = self.manifolds.get_mut(manifold_key) else {
            return false;
        };

        Self::process_manifold(&self.algorithms, objects, dispatch_info, manifold);
        true
    }

    /// Runs every live instance. Each manifold is only touched by its own
    /// instance, so with the `parallel` feature pairs run on the rayon pool.
    pub fn dispatch_all_collision_pairs(
        &mut self,
        objects: &[CollisionObject],
        dispatch_info: &DispatcherInfo,
    ) {
        let algorithms = &self.algorithms;
        let process = |manifold: &mut PersistentManifold| {
            Self::process_manifold(algorithms, objects, dispatch_info, manifold);
        };

        #[cfg(feature = "parallel")]
        {
            let manifolds: Vec<&mut PersistentManifold> = self.manifolds.values_mut().collect();
            manifolds.into_par_iter().for_each(process);
        }

        #[cfg(not(feature = "parallel"))]
        self.manifolds.values_mut().for_each(process);
    }

    /// Time of impact for a pair in (A, B) order, without creating an instance.
    pub fn calculate_time_of_impact(
        &self,
        body_a: &ShapeProxy,
        sweep_a: &Sweep,
        body_b: &ShapeProxy,
        sweep_b: &Sweep,
        dispatch_info: &DispatcherInfo,
    ) -> CollisionResult<Option<f32>> {
        let (algorithm, is_swapped) = self.find_algorithm(body_a, body_b)?;

        Ok(if is_swapped {
            algorithm.calculate_time_of_impact(body_b, sweep_b, body_a, sweep_a, dispatch_info)
        } else {
            algorithm.calculate_time_of_impact(body_a, sweep_a, body_b, sweep_b, dispatch_info)
        })
    }
}

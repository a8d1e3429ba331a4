use ahash::{AHashMap, AHashSet};
use log::{debug, warn};

use super::{
    collision_configuration::{CollisionConfiguration, CollisionConstructionInfo, PoolPolicy},
    collision_dispatcher::{AlgorithmKey, CollisionDispatcher},
    collision_object::CollisionObject,
    material_combiner::MaterialCombiner,
};
use crate::{
    collision::{
        broadphase::{
            BroadphaseInterface, BroadphasePair, DispatcherInfo, HashedOverlappingPairCache,
            ShapeProxy,
        },
        narrowphase::{
            manifold_point::ManifoldPoint,
            persistent_manifold::{CONTACT_BREAKING_THRESHOLD, PersistentManifold},
            time_of_impact::Sweep,
        },
        shapes::collision_shape::CONVEX_DISTANCE_MARGIN,
    },
    error::{CollisionError, CollisionResult},
};

/// What a step does with a pair whose algorithm can't be created.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum StrictnessPolicy {
    /// Log the problem once and never collide the pair.
    #[default]
    Skip,
    /// Finish the step, then return the first error.
    Halt,
}

#[derive(Clone, Debug, PartialEq)]
pub struct WorldConfig {
    /// Shapes closer than this are reported as touching, and cached points
    /// separated by more are dropped.
    pub collision_margin: f32,
    pub contact_breaking_threshold: f32,
    pub toi_tolerance: f32,
    pub strictness: StrictnessPolicy,
    pub pool_policy: PoolPolicy,
    pub max_persistent_manifold_pool_size: usize,
    pub max_collision_algorithm_pool_size: usize,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl WorldConfig {
    pub const DEFAULT: Self = Self {
        collision_margin: CONVEX_DISTANCE_MARGIN,
        contact_breaking_threshold: CONTACT_BREAKING_THRESHOLD,
        toi_tolerance: 1e-3,
        strictness: StrictnessPolicy::Skip,
        pool_policy: PoolPolicy::Grow,
        max_persistent_manifold_pool_size: CollisionConstructionInfo::DEFAULT
            .default_max_persistent_manifold_pool_size,
        max_collision_algorithm_pool_size: CollisionConstructionInfo::DEFAULT
            .default_max_collision_algorithm_pool_size,
    };

    #[must_use]
    pub const fn construction_info(&self) -> CollisionConstructionInfo {
        CollisionConstructionInfo {
            default_max_persistent_manifold_pool_size: self.max_persistent_manifold_pool_size,
            default_max_collision_algorithm_pool_size: self.max_collision_algorithm_pool_size,
            pool_policy: self.pool_policy,
            contact_breaking_threshold: self.contact_breaking_threshold,
        }
    }
}

/// Keeps one algorithm instance and manifold alive per overlapping pair and
/// refreshes them every step.
pub struct CollisionWorld {
    dispatcher: CollisionDispatcher,
    config: WorldConfig,
    dispatch_info: DispatcherInfo,
    pair_cache: HashedOverlappingPairCache,
    pair_algorithms: AHashMap<BroadphasePair, AlgorithmKey>,
    reported_errors: AHashSet<CollisionError>,
    released_pairs: Vec<BroadphasePair>,
}

impl CollisionWorld {
    #[must_use]
    pub fn new(collision_configuration: CollisionConfiguration, config: WorldConfig) -> Self {
        let dispatch_info = DispatcherInfo {
            collision_margin: config.collision_margin,
            toi_tolerance: config.toi_tolerance,
        };

        Self {
            dispatcher: CollisionDispatcher::new(
                collision_configuration,
                config.construction_info(),
            ),
            config,
            dispatch_info,
            pair_cache: HashedOverlappingPairCache::default(),
            pair_algorithms: AHashMap::new(),
            reported_errors: AHashSet::new(),
            released_pairs: Vec::new(),
        }
    }

    /// Only applies to manifolds created after the call.
    pub fn set_material_combiner(
        &mut self,
        material_combiner: impl MaterialCombiner + Send + Sync + 'static,
    ) {
        self.dispatcher.set_material_combiner(material_combiner);
    }

    #[must_use]
    pub const fn get_config(&self) -> &WorldConfig {
        &self.config
    }

    #[must_use]
    pub const fn get_dispatcher(&self) -> &CollisionDispatcher {
        &self.dispatcher
    }

    #[must_use]
    pub const fn get_dispatch_info(&self) -> &DispatcherInfo {
        &self.dispatch_info
    }

    /// Pairs accepted by the last step, lower object index first.
    #[must_use]
    pub fn get_overlapping_pairs(&self) -> &[BroadphasePair] {
        self.pair_cache.get_overlapping_pair_array()
    }

    /// Runs `broadphase` over `objects` and then the narrowphase. The
    /// broadphase is asked for every pair within the collision margin.
    pub fn step(
        &mut self,
        objects: &[CollisionObject],
        broadphase: &mut impl BroadphaseInterface,
    ) -> CollisionResult<()> {
        self.pair_cache.clear();
        broadphase.calculate_overlapping_pairs(
            objects,
            self.config.collision_margin,
            &mut self.pair_cache,
        );
        self.dispatch_overlapping_pairs(objects)
    }

    /// Runs the narrowphase over candidate pairs from an external broadphase.
    ///
    /// Pairs may come in either order and may repeat. Self pairs and indices
    /// past the end of `objects` are ignored.
    pub fn perform_discrete_collision_detection(
        &mut self,
        objects: &[CollisionObject],
        pairs: &[BroadphasePair],
    ) -> CollisionResult<()> {
        self.pair_cache.clear();
        for pair in pairs {
            self.pair_cache
                .add_overlapping_pair(pair.proxy0, pair.proxy1, objects.len());
        }

        self.dispatch_overlapping_pairs(objects)
    }

    fn needs_collision(objects: &[CollisionObject], pair: &BroadphasePair) -> bool {
        match (objects.get(pair.proxy0), objects.get(pair.proxy1)) {
            (Some(obj0), Some(obj1)) => CollisionDispatcher::needs_collision(obj0, obj1),
            _ => false,
        }
    }

    fn dispatch_overlapping_pairs(&mut self, objects: &[CollisionObject]) -> CollisionResult<()> {
        self.released_pairs.clear();
        self.remove_released_pairs(objects);

        let mut first_error = None;
        for i in 0..self.pair_cache.len() {
            let pair = self.pair_cache.get_overlapping_pair_array()[i];
            if self.pair_algorithms.contains_key(&pair) || !Self::needs_collision(objects, &pair) {
                continue;
            }

            let body0 = ShapeProxy::new(&objects[pair.proxy0], pair.proxy0);
            let body1 = ShapeProxy::new(&objects[pair.proxy1], pair.proxy1);

            match self.dispatcher.create_algorithm(&body0, &body1, None) {
                Ok(key) => {
                    self.pair_algorithms.insert(pair, key);
                }
                Err(err) => {
                    self.report_error(&err);
                    if self.config.strictness == StrictnessPolicy::Halt && first_error.is_none() {
                        first_error = Some(err);
                    }
                }
            }
        }

        self.dispatcher
            .dispatch_all_collision_pairs(objects, &self.dispatch_info);

        first_error.map_or(Ok(()), Err)
    }

    /// Whether the instance bound to `pair` can keep colliding it: both
    /// objects still respond to contacts and still have the shape types the
    /// instance was created for.
    fn is_instance_valid(
        dispatcher: &CollisionDispatcher,
        objects: &[CollisionObject],
        pair: &BroadphasePair,
        key: AlgorithmKey,
    ) -> bool {
        let (Some(obj0), Some(obj1), Some(instance)) = (
            objects.get(pair.proxy0),
            objects.get(pair.proxy1),
            dispatcher.get_algorithm(key),
        ) else {
            return false;
        };

        obj0.has_contact_response() && obj1.has_contact_response() && instance.matches(obj0, obj1)
    }

    /// Destroys the instances of pairs that are no longer reported, stopped
    /// responding to contacts or changed shape type. Sleeping pairs keep their
    /// manifolds. Destruction runs in pair order so the pools reuse slots the
    /// same way on every run.
    fn remove_released_pairs(&mut self, objects: &[CollisionObject]) {
        for (pair, &key) in &self.pair_algorithms {
            if !self.pair_cache.contains_pair(pair.proxy0, pair.proxy1)
                || !Self::is_instance_valid(&self.dispatcher, objects, pair, key)
            {
                self.released_pairs.push(*pair);
            }
        }

        self.released_pairs
            .sort_unstable_by_key(|pair| (pair.proxy0, pair.proxy1));

        for pair in &self.released_pairs {
            if let Some(key) = self.pair_algorithms.remove(pair) {
                self.dispatcher.destroy_algorithm(key);
            }
        }

        if !self.released_pairs.is_empty() {
            debug!("Released {} pairs", self.released_pairs.len());
        }
    }

    /// Logs each distinct configuration or pool error once.
    fn report_error(&mut self, err: &CollisionError) {
        if self.reported_errors.contains(err) {
            return;
        }

        match self.config.strictness {
            StrictnessPolicy::Skip => warn!("{err}, pair will not collide"),
            StrictnessPolicy::Halt => warn!("{err}"),
        }
        self.reported_errors.insert(err.clone());
    }

    /// Destroys every pair and its manifold.
    pub fn clear(&mut self) {
        self.released_pairs.clear();
        self.released_pairs
            .extend(self.pair_algorithms.keys().copied());
        self.released_pairs
            .sort_unstable_by_key(|pair| (pair.proxy0, pair.proxy1));

        for pair in &self.released_pairs {
            if let Some(key) = self.pair_algorithms.remove(pair) {
                self.dispatcher.destroy_algorithm(key);
            }
        }

        self.pair_cache.clear();
    }

    /// Pairs whose manifolds were destroyed by the last step. Solvers holding
    /// state keyed by pair should drop it.
    #[must_use]
    pub fn released_pairs(&self) -> &[BroadphasePair] {
        &self.released_pairs
    }

    /// Every live manifold, including those without points.
    pub fn contact_manifolds(&self) -> impl Iterator<Item = &PersistentManifold> {
        self.dispatcher.manifolds().map(|(_, manifold)| manifold)
    }

    /// For solvers writing back accumulated impulses.
    pub fn contact_manifolds_mut(&mut self) -> impl Iterator<Item = &mut PersistentManifold> {
        self.dispatcher
            .manifolds_mut()
            .map(|(_, manifold)| manifold)
    }

    pub fn for_each_contact(&self, mut f: impl FnMut(&PersistentManifold, &ManifoldPoint)) {
        for manifold in self.contact_manifolds() {
            for point in manifold.points() {
                f(manifold, point);
            }
        }
    }

    #[must_use]
    pub fn get_num_manifolds(&self) -> usize {
        self.dispatcher.get_num_manifolds()
    }

    /// The manifold of a pair, in whichever order the indices are given.
    #[must_use]
    pub fn get_manifold_for_pair(
        &self,
        proxy0: usize,
        proxy1: usize,
    ) -> Option<&PersistentManifold> {
        self.pair_algorithms
            .get(&HashedOverlappingPairCache::normalize(proxy0, proxy1))
            .and_then(|&key| self.dispatcher.get_manifold_for_algorithm(key))
    }

    /// Earliest fraction of the step at which two objects touch, sweeping each
    /// from its world transform to its interpolation world transform.
    pub fn calculate_time_of_impact(
        &self,
        objects: &[CollisionObject],
        proxy0: usize,
        proxy1: usize,
    ) -> CollisionResult<Option<f32>> {
        let (Some(obj0), Some(obj1)) = (objects.get(proxy0), objects.get(proxy1)) else {
            return Ok(None);
        };

        let body0 = ShapeProxy::new(obj0, proxy0);
        let body1 = ShapeProxy::new(obj1, proxy1);
        let sweep0 = Sweep::new(
            *obj0.get_world_transform(),
            obj0.interpolation_world_transform,
        );
        let sweep1 = Sweep::new(
            *obj1.get_world_transform(),
            obj1.interpolation_world_transform,
        );

        self.dispatcher
            .calculate_time_of_impact(&body0, &sweep0, &body1, &sweep1, &self.dispatch_info)
    }
}

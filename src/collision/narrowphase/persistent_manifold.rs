use arrayvec::ArrayVec;
use glam::{Affine3A, Vec3A};

use super::manifold_point::ManifoldPoint;
use crate::collision::dispatch::collision_dispatcher::AlgorithmKey;

pub const CONTACT_BREAKING_THRESHOLD: f32 = 0.02;
pub const MANIFOLD_CACHE_SIZE: usize = 4;

/// The contact points cached between one ordered pair of collision objects.
///
/// Points are matched across steps so the impulses a solver accumulates on
/// them survive while the contact persists.
#[derive(Clone, Debug)]
pub struct PersistentManifold {
    pub point_cache: ArrayVec<ManifoldPoint, MANIFOLD_CACHE_SIZE>,
    pub body0_idx: usize,
    pub body1_idx: usize,
    /// Distance under which a new point merges with a cached one, and the
    /// largest tangential drift a cached point may accumulate.
    pub contact_breaking_threshold: f32,
    pub combined_friction: f32,
    pub combined_restitution: f32,
    pub(crate) algorithm: Option<AlgorithmKey>,
}

/// Squared area proxy of the quad spanned by 4 points, independent of their order.
fn quad_area_sq([p0, p1, p2, p3]: [Vec3A; 4]) -> f32 {
    let a = (p0 - p1).cross(p2 - p3).length_squared();
    let b = (p0 - p2).cross(p1 - p3).length_squared();
    let c = (p0 - p3).cross(p1 - p2).length_squared();
    a.max(b).max(c)
}

impl PersistentManifold {
    #[must_use]
    pub const fn new(body0_idx: usize, body1_idx: usize, contact_breaking_threshold: f32) -> Self {
        Self {
            point_cache: ArrayVec::new_const(),
            body0_idx,
            body1_idx,
            contact_breaking_threshold,
            combined_friction: 0.0,
            combined_restitution: 0.0,
            algorithm: None,
        }
    }

    #[inline]
    #[must_use]
    pub fn num_contacts(&self) -> usize {
        self.point_cache.len()
    }

    #[inline]
    #[must_use]
    pub fn get_contact_point(&self, index: usize) -> Option<&ManifoldPoint> {
        self.point_cache.get(index)
    }

    #[inline]
    #[must_use]
    pub fn points(&self) -> &[ManifoldPoint] {
        &self.point_cache
    }

    #[inline]
    pub fn points_mut(&mut self) -> &mut [ManifoldPoint] {
        &mut self.point_cache
    }

    /// Whether an algorithm instance is currently bound to this manifold.
    #[inline]
    #[must_use]
    pub const fn is_bound(&self) -> bool {
        self.algorithm.is_some()
    }

    pub fn clear_manifold(&mut self) {
        self.point_cache.clear();
    }

    /// Index of the cached point nearest to `new_point` on either body,
    /// if any lies within the breaking threshold.
    #[must_use]
    pub fn get_cache_entry(&self, new_point: &ManifoldPoint) -> Option<usize> {
        let mut shortest_dist = self.contact_breaking_threshold * self.contact_breaking_threshold;
        let mut nearest_point = None;

        for (i, mp) in self.point_cache.iter().enumerate() {
            let dist_a = (mp.local_point_a - new_point.local_point_a).length_squared();
            let dist_b = (mp.local_point_b - new_point.local_point_b).length_squared();
            let dist = dist_a.min(dist_b);

            if dist < shortest_dist {
                shortest_dist = dist;
                nearest_point = Some(i);
            }
        }

        nearest_point
    }

    /// Picks the slot `new_contact` should overwrite in a full cache, or
    /// `None` if the candidate itself is the least useful point.
    ///
    /// The deepest point among the cache and the candidate always survives.
    /// Among the rest, the one whose removal leaves the largest contact area
    /// is dropped. Ties go to the lowest slot, dropping the candidate last.
    fn sort_cached_points(&self, new_contact: &ManifoldPoint) -> Option<usize> {
        debug_assert_eq!(self.point_cache.len(), MANIFOLD_CACHE_SIZE);

        let mut max_penetration_index = MANIFOLD_CACHE_SIZE;
        let mut max_penetration = new_contact.distance_1;
        for (i, contact) in self.point_cache.iter().enumerate() {
            if contact.distance_1 < max_penetration {
                max_penetration_index = i;
                max_penetration = contact.distance_1;
            }
        }

        let mut candidates = [Vec3A::ZERO; MANIFOLD_CACHE_SIZE + 1];
        for (slot, point) in candidates.iter_mut().zip(&self.point_cache) {
            *slot = point.local_point_a;
        }
        candidates[MANIFOLD_CACHE_SIZE] = new_contact.local_point_a;

        let mut best_index = None;
        let mut best_area = -1.0;
        for removed in 0..=MANIFOLD_CACHE_SIZE {
            if removed == max_penetration_index {
                continue;
            }

            let mut kept = [Vec3A::ZERO; MANIFOLD_CACHE_SIZE];
            for (slot, point) in kept.iter_mut().zip(
                candidates
                    .iter()
                    .enumerate()
                    .filter(|(i, _)| *i != removed)
                    .map(|(_, p)| *p),
            ) {
                *slot = point;
            }

            let area = quad_area_sq(kept);
            if area > best_area {
                best_area = area;
                best_index = Some(removed);
            }
        }

        best_index.filter(|&i| i < MANIFOLD_CACHE_SIZE)
    }

    /// Overwrites the geometry of slot `insert_index`, keeping the impulses
    /// and lifetime the solver accumulated on it.
    pub fn replace_contact_point(&mut self, new_point: ManifoldPoint, insert_index: usize) {
        let old = &mut self.point_cache[insert_index];
        let applied_impulse = old.applied_impulse;
        let applied_impulse_lateral_1 = old.applied_impulse_lateral_1;
        let applied_impulse_lateral_2 = old.applied_impulse_lateral_2;
        let life_time = old.life_time;

        *old = new_point;
        old.applied_impulse = applied_impulse;
        old.applied_impulse_lateral_1 = applied_impulse_lateral_1;
        old.applied_impulse_lateral_2 = applied_impulse_lateral_2;
        old.life_time = life_time;
    }

    /// Merges `candidate` into the cache. Returns the slot it was written to,
    /// or `None` when the cache is full and the candidate was discarded.
    pub fn add_or_update_point(&mut self, mut candidate: ManifoldPoint) -> Option<usize> {
        if let Some(index) = self.get_cache_entry(&candidate) {
            self.replace_contact_point(candidate, index);
            return Some(index);
        }

        candidate.reset_impulses();

        let num_points = self.point_cache.len();
        if num_points < MANIFOLD_CACHE_SIZE {
            self.point_cache.push(candidate);
            return Some(num_points);
        }

        let index = self.sort_cached_points(&candidate)?;
        self.point_cache[index] = candidate;
        Some(index)
    }

    pub fn remove_contact_point(&mut self, index: usize) {
        self.point_cache.swap_remove(index);
    }

    /// Recomputes world positions and separations from the local points.
    pub fn refresh_contact_points(&mut self, tr_a: &Affine3A, tr_b: &Affine3A) {
        for manifold_point in &mut self.point_cache {
            manifold_point.position_world_on_a =
                tr_a.transform_point3a(manifold_point.local_point_a);
            manifold_point.position_world_on_b =
                tr_b.transform_point3a(manifold_point.local_point_b);
            manifold_point.distance_1 = (manifold_point.position_world_on_b
                - manifold_point.position_world_on_a)
                .dot(manifold_point.normal_world);
            manifold_point.life_time += 1;
        }
    }

    /// Re-measures every cached point and drops those separated by more than
    /// `max_separation` or that slid further than the breaking threshold
    /// orthogonally to the normal. Returns how many points were removed.
    pub fn remove_stale_points(
        &mut self,
        tr_a: &Affine3A,
        tr_b: &Affine3A,
        max_separation: f32,
    ) -> usize {
        self.refresh_contact_points(tr_a, tr_b);

        let contact_breaking_threshold_sq =
            self.contact_breaking_threshold * self.contact_breaking_threshold;
        let num_points = self.point_cache.len();

        for i in (0..num_points).rev() {
            let point = &self.point_cache[i];

            if point.distance_1 > max_separation {
                self.remove_contact_point(i);
                continue;
            }

            let projected_point = point.position_world_on_a + point.normal_world * point.distance_1;
            let projected_difference = point.position_world_on_b - projected_point;
            if projected_difference.length_squared() > contact_breaking_threshold_sq {
                self.remove_contact_point(i);
            }
        }

        num_points - self.point_cache.len()
    }
}

use super::HashedOverlappingPairCache;
use crate::collision::dispatch::collision_object::CollisionObject;

/// Produces the candidate pairs of a step. May over-report, must not miss.
pub trait BroadphaseInterface {
    /// Reports every pair whose shapes may come within `collision_margin` of
    /// each other.
    fn calculate_overlapping_pairs(
        &mut self,
        objects: &[CollisionObject],
        collision_margin: f32,
        pair_cache: &mut HashedOverlappingPairCache,
    );
}

/// Tests every object AABB against every other one.
#[derive(Clone, Copy, Debug, Default)]
pub struct SimpleBroadphase;

impl BroadphaseInterface for SimpleBroadphase {
    fn calculate_overlapping_pairs(
        &mut self,
        objects: &[CollisionObject],
        collision_margin: f32,
        pair_cache: &mut HashedOverlappingPairCache,
    ) {
        let aabbs = objects
            .iter()
            .map(|obj| {
                obj.get_collision_shape()
                    .get_aabb(obj.get_world_transform())
                    .expanded(collision_margin)
            })
            .collect::<Vec<_>>();

        for (i, (obj_i, aabb_i)) in objects.iter().zip(&aabbs).enumerate() {
            for (j, (obj_j, aabb_j)) in objects.iter().zip(&aabbs).enumerate().skip(i + 1) {
                if (obj_i.is_static_object() && obj_j.is_static_object())
                    || !obj_i.has_contact_response()
                    || !obj_j.has_contact_response()
                {
                    continue;
                }

                if aabb_i.intersects(aabb_j) {
                    pair_cache.add_overlapping_pair(i, j, objects.len());
                }
            }
        }
    }
}

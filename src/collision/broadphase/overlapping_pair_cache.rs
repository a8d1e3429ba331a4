use ahash::AHashSet;
use log::debug;

use super::BroadphasePair;

/// The deduplicated candidate pairs of one step, each stored with the lower
/// object index first.
#[derive(Default)]
pub struct HashedOverlappingPairCache {
    overlapping_pair_array: Vec<BroadphasePair>,
    hash_table: AHashSet<BroadphasePair>,
}

impl HashedOverlappingPairCache {
    #[inline]
    #[must_use]
    pub const fn normalize(proxy0: usize, proxy1: usize) -> BroadphasePair {
        if proxy0 > proxy1 {
            BroadphasePair::new(proxy1, proxy0)
        } else {
            BroadphasePair::new(proxy0, proxy1)
        }
    }

    /// Records a pair unless it is a duplicate, a self pair or refers past
    /// `num_objects`. Returns whether the pair was added.
    pub fn add_overlapping_pair(
        &mut self,
        proxy0: usize,
        proxy1: usize,
        num_objects: usize,
    ) -> bool {
        if proxy0 == proxy1 || proxy0 >= num_objects || proxy1 >= num_objects {
            debug!("Ignoring invalid broadphase pair ({proxy0}, {proxy1})");
            return false;
        }

        let pair = Self::normalize(proxy0, proxy1);
        if !self.hash_table.insert(pair) {
            return false;
        }

        self.overlapping_pair_array.push(pair);
        true
    }

    #[must_use]
    pub fn contains_pair(&self, proxy0: usize, proxy1: usize) -> bool {
        self.hash_table.contains(&Self::normalize(proxy0, proxy1))
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.overlapping_pair_array.is_empty()
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.overlapping_pair_array.len()
    }

    #[inline]
    #[must_use]
    pub fn get_overlapping_pair_array(&self) -> &[BroadphasePair] {
        &self.overlapping_pair_array
    }

    pub fn clear(&mut self) {
        self.overlapping_pair_array.clear();
        self.hash_table.clear();
    }
}

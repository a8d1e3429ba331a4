mod broadphase_proxy;
mod collision_algorithm;
mod overlapping_pair_cache;
mod simple_broadphase;

pub use broadphase_proxy::*;
pub use collision_algorithm::*;
pub use overlapping_pair_cache::*;
pub use simple_broadphase::*;

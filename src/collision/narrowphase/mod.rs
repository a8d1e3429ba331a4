pub mod manifold_point;
pub mod manifold_result;
pub mod persistent_manifold;
pub mod time_of_impact;

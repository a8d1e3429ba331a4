use super::ShapeProxy;
use crate::collision::{
    narrowphase::{manifold_result::ManifoldResult, time_of_impact::Sweep},
    shapes::collision_shape::CONVEX_DISTANCE_MARGIN,
};

/// Per-step parameters shared by every algorithm invocation.
#[derive(Clone, Copy, Debug)]
pub struct DispatcherInfo {
    /// Shapes closer than this are reported as touching.
    pub collision_margin: f32,
    /// Separation at which a time of impact query counts as touching.
    pub toi_tolerance: f32,
}

impl Default for DispatcherInfo {
    fn default() -> Self {
        Self {
            collision_margin: CONVEX_DISTANCE_MARGIN,
            toi_tolerance: 1e-3,
        }
    }
}

/// A narrowphase test for one combination of shape types.
///
/// Both methods receive the bodies in the algorithm's own order, e.g.
/// `(sphere, triangle)` for the sphere–triangle algorithm, whatever order the
/// broadphase reported them in.
pub trait CollisionAlgorithm {
    fn process_collision(
        &self,
        body0: &ShapeProxy,
        body1: &ShapeProxy,
        dispatch_info: &DispatcherInfo,
        result_out: &mut ManifoldResult,
    );

    /// Earliest fraction of the sweeps at which the bodies touch.
    fn calculate_time_of_impact(
        &self,
        _body0: &ShapeProxy,
        _sweep0: &Sweep,
        _body1: &ShapeProxy,
        _sweep1: &Sweep,
        _dispatch_info: &DispatcherInfo,
    ) -> Option<f32> {
        None
    }
}

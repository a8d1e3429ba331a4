use glam::{Affine3A, Vec3A};

use super::{
    box_shape::BoxShape, sphere_shape::SphereShape, static_plane_shape::StaticPlaneShape,
    triangle_shape::TriangleShape,
};
use crate::{collision::broadphase::BroadphaseNativeTypes, linear_math::aabb_util_2::Aabb};

/// Default distance by which shapes are reported as touching before they overlap.
pub const CONVEX_DISTANCE_MARGIN: f32 = 0.04;

#[derive(Clone, Debug, PartialEq)]
pub enum CollisionShapes {
    Sphere(SphereShape),
    Triangle(TriangleShape),
    Box(BoxShape),
    StaticPlane(StaticPlaneShape),
}

impl CollisionShapes {
    #[must_use]
    pub const fn get_shape_type(&self) -> BroadphaseNativeTypes {
        match self {
            Self::Sphere(_) => BroadphaseNativeTypes::SphereShapeProxytype,
            Self::Triangle(_) => BroadphaseNativeTypes::TriangleShapeProxytype,
            Self::Box(_) => BroadphaseNativeTypes::BoxShapeProxytype,
            Self::StaticPlane(_) => BroadphaseNativeTypes::StaticPlaneProxytype,
        }
    }

    #[must_use]
    pub fn get_aabb(&self, t: &Affine3A) -> Aabb {
        match self {
            Self::Sphere(shape) => shape.get_aabb(t),
            Self::Triangle(shape) => shape.get_aabb(t),
            Self::Box(shape) => shape.get_aabb(t),
            Self::StaticPlane(shape) => shape.get_aabb(t),
        }
    }

    /// Radius of the sphere around the local origin that bounds every point
    /// whose motion matters under rotation. Spheres are rotation invariant
    /// and planes are treated as non-rotating.
    #[must_use]
    pub fn get_angular_motion_radius(&self) -> f32 {
        match self {
            Self::Sphere(_) | Self::StaticPlane(_) => 0.0,
            Self::Triangle(shape) => shape.get_bounding_radius(),
            Self::Box(shape) => shape.get_half_extents().length(),
        }
    }

    /// Support point in local space, only defined for convex shapes.
    #[must_use]
    pub fn local_get_supporting_vertex(&self, vec: Vec3A) -> Option<Vec3A> {
        match self {
            Self::Sphere(shape) => Some(shape.local_get_supporting_vertex(vec)),
            Self::Box(shape) => Some(shape.local_get_supporting_vertex(vec)),
            Self::Triangle(shape) => {
                let idx = Vec3A::new(
                    shape.points[0].dot(vec),
                    shape.points[1].dot(vec),
                    shape.points[2].dot(vec),
                )
                .max_position();
                Some(shape.points[idx])
            }
            Self::StaticPlane(_) => None,
        }
    }
}

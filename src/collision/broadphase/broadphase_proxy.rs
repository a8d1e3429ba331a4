use glam::Affine3A;

use crate::collision::{
    dispatch::collision_object::CollisionObject, shapes::collision_shape::CollisionShapes,
};

#[derive(Clone, Copy, Default, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum BroadphaseNativeTypes {
    // polyhedral convex shapes
    BoxShapeProxytype,
    TriangleShapeProxytype,
    //implicit convex shapes
    SphereShapeProxytype,
    //concave shapes
    StaticPlaneProxytype,
    #[default]
    InvalidShapeProxytype,
}

/// One candidate pair reported by the broadphase, as indices into the
/// caller's collision object array. Either order is accepted.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct BroadphasePair {
    pub proxy0: usize,
    pub proxy1: usize,
}

impl BroadphasePair {
    #[inline]
    #[must_use]
    pub const fn new(proxy0: usize, proxy1: usize) -> Self {
        Self { proxy0, proxy1 }
    }
}

/// A collision object as seen by the narrowphase during one pass.
#[derive(Clone, Copy)]
pub struct ShapeProxy<'a> {
    pub object: &'a CollisionObject,
    /// The index of `object` in the caller's collision object array.
    pub object_idx: usize,
}

impl<'a> ShapeProxy<'a> {
    #[inline]
    #[must_use]
    pub const fn new(object: &'a CollisionObject, object_idx: usize) -> Self {
        Self { object, object_idx }
    }

    #[inline]
    #[must_use]
    pub const fn get_shape_type(&self) -> BroadphaseNativeTypes {
        self.object.get_collision_shape().get_shape_type()
    }

    #[inline]
    #[must_use]
    pub const fn get_collision_shape(&self) -> &'a CollisionShapes {
        self.object.get_collision_shape()
    }

    #[inline]
    #[must_use]
    pub const fn get_world_transform(&self) -> &'a Affine3A {
        self.object.get_world_transform()
    }
}

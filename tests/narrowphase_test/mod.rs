mod dispatch_cases;
mod world_cases;

use glam::{Affine3A, Vec3, Vec3A};
use narrowphase::{
    BoxShape, BroadphasePair, CollisionConfiguration, CollisionObject, CollisionShapes,
    CollisionWorld, PersistentManifold, SphereShape, StaticPlaneShape, TriangleShape, WorldConfig,
};

pub fn init_for_test() {
    // another test may have installed it already
    let _ = narrowphase::logging::try_init();
}

pub fn at(x: f32, y: f32, z: f32) -> Affine3A {
    Affine3A::from_translation(Vec3::new(x, y, z))
}

pub fn sphere(radius: f32) -> CollisionShapes {
    CollisionShapes::Sphere(SphereShape::new(radius))
}

pub fn cube(half_extent: f32) -> CollisionShapes {
    CollisionShapes::Box(BoxShape::new(Vec3A::splat(half_extent)))
}

pub fn ground_plane() -> CollisionShapes {
    CollisionShapes::StaticPlane(StaticPlaneShape::new(Vec3A::Z, 0.0))
}

/// Large triangle in the z = 0 plane, containing the origin.
pub fn big_triangle() -> CollisionShapes {
    CollisionShapes::Triangle(TriangleShape::new([
        Vec3A::new(-10.0, -10.0, 0.0),
        Vec3A::new(10.0, -10.0, 0.0),
        Vec3A::new(0.0, 10.0, 0.0),
    ]))
}

pub fn static_triangle() -> CollisionObject {
    CollisionObject::new_static(big_triangle(), Affine3A::IDENTITY)
}

pub fn new_world() -> CollisionWorld {
    init_for_test();
    CollisionWorld::new(CollisionConfiguration::default(), WorldConfig::DEFAULT)
}

pub fn world_with(config: WorldConfig) -> CollisionWorld {
    init_for_test();
    CollisionWorld::new(CollisionConfiguration::default(), config)
}

pub const PAIR_01: [BroadphasePair; 1] = [BroadphasePair::new(0, 1)];

/// Runs one step over the single pair (0, 1) and returns its manifold.
pub fn collide_once(world: &mut CollisionWorld, objects: &[CollisionObject]) -> PersistentManifold {
    world
        .perform_discrete_collision_detection(objects, &PAIR_01)
        .unwrap();
    world.get_manifold_for_pair(0, 1).unwrap().clone()
}

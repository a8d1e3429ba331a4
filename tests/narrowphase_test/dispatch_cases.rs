use approx::assert_abs_diff_eq;
use glam::{Affine3A, Vec3A};
use narrowphase::{
    Algorithms, BroadphaseNativeTypes, BroadphasePair, CollisionAlgorithm, CollisionConfiguration,
    CollisionConstructionInfo, CollisionDispatcher, CollisionError, CollisionObject,
    CollisionWorld, DispatcherInfo, ManifoldOwnership, ManifoldResult, PoolPolicy, ShapeProxy,
    StrictnessPolicy, WorldConfig,
};

use super::*;

/// Reports one contact 0.1 deep below body1's origin, whatever the shapes.
struct AlwaysTouching;

impl CollisionAlgorithm for AlwaysTouching {
    fn process_collision(
        &self,
        _body0: &ShapeProxy,
        body1: &ShapeProxy,
        _dispatch_info: &DispatcherInfo,
        result_out: &mut ManifoldResult,
    ) {
        result_out.add_contact_point(Vec3A::Z, body1.get_world_transform().translation, -0.1, 0, 1);
    }
}

fn boxes_and_sphere_on_triangle() -> Vec<CollisionObject> {
    vec![
        CollisionObject::new(cube(1.0), at(0.0, 0.0, 5.0)),
        CollisionObject::new(cube(1.0), at(0.0, 0.0, 6.5)),
        CollisionObject::new(sphere(1.0), at(0.0, 0.0, 0.95)),
        static_triangle(),
    ]
}

const MIXED_PAIRS: [BroadphasePair; 2] = [BroadphasePair::new(0, 1), BroadphasePair::new(2, 3)];

#[test]
fn unregistered_pair_is_skipped() {
    let mut world = new_world();
    let objects = boxes_and_sphere_on_triangle();

    // twice, the second step must not fail either
    for _ in 0..2 {
        assert!(
            world
                .perform_discrete_collision_detection(&objects, &MIXED_PAIRS)
                .is_ok()
        );
    }

    assert!(world.get_manifold_for_pair(0, 1).is_none());
    assert_eq!(world.get_num_manifolds(), 1);
    assert_eq!(world.get_manifold_for_pair(2, 3).unwrap().num_contacts(), 1);
}

#[test]
fn unregistered_pair_halts_after_the_step() {
    let mut world = world_with(WorldConfig {
        strictness: StrictnessPolicy::Halt,
        ..WorldConfig::DEFAULT
    });
    let objects = boxes_and_sphere_on_triangle();

    let result = world.perform_discrete_collision_detection(&objects, &MIXED_PAIRS);
    assert_eq!(
        result,
        Err(CollisionError::NoAlgorithm(
            BroadphaseNativeTypes::BoxShapeProxytype,
            BroadphaseNativeTypes::BoxShapeProxytype
        ))
    );

    // the rest of the step still ran
    assert_eq!(world.get_manifold_for_pair(2, 3).unwrap().num_contacts(), 1);
}

#[test]
fn custom_algorithm_registration() {
    init_for_test();

    let mut config = CollisionConfiguration::default();
    config
        .register_algorithm(
            BroadphaseNativeTypes::BoxShapeProxytype,
            BroadphaseNativeTypes::BoxShapeProxytype,
            || Algorithms::new_custom(AlwaysTouching),
        )
        .unwrap();

    assert_eq!(
        config.register_algorithm(
            BroadphaseNativeTypes::BoxShapeProxytype,
            BroadphaseNativeTypes::BoxShapeProxytype,
            || Algorithms::new_custom(AlwaysTouching),
        ),
        Err(CollisionError::DuplicateRegistration(
            BroadphaseNativeTypes::BoxShapeProxytype,
            BroadphaseNativeTypes::BoxShapeProxytype
        ))
    );

    let mut world = CollisionWorld::new(config, WorldConfig::DEFAULT);
    let objects = boxes_and_sphere_on_triangle();
    world
        .perform_discrete_collision_detection(&objects, &MIXED_PAIRS)
        .unwrap();

    let manifold = world.get_manifold_for_pair(0, 1).unwrap();
    assert_eq!(manifold.num_contacts(), 1);

    let point = manifold.points()[0];
    assert_abs_diff_eq!(point.get_distance(), -0.1, epsilon = 1e-5);
    assert!(point.normal_world.abs_diff_eq(Vec3A::NEG_Z, 1e-6));
    assert!(
        point
            .position_world_on_b
            .abs_diff_eq(Vec3A::new(0.0, 0.0, 6.5), 1e-5)
    );
}

#[test]
fn reverse_registration_swaps_bodies() {
    init_for_test();

    let mut config = CollisionConfiguration::empty();
    config
        .register_algorithm(
            BroadphaseNativeTypes::TriangleShapeProxytype,
            BroadphaseNativeTypes::SphereShapeProxytype,
            || Algorithms::new_custom(AlwaysTouching),
        )
        .unwrap();

    let mut world = CollisionWorld::new(config, WorldConfig::DEFAULT);
    let objects = [
        CollisionObject::new(sphere(1.0), at(1.0, 2.0, 3.0)),
        static_triangle(),
    ];

    let manifold = collide_once(&mut world, &objects);
    let point = manifold.points()[0];

    // body1 of the algorithm is the sphere, which is A here
    assert!(point.normal_world.abs_diff_eq(Vec3A::Z, 1e-6));
    assert!(
        point
            .position_world_on_a
            .abs_diff_eq(Vec3A::new(1.0, 2.0, 3.0), 1e-5)
    );
    assert_eq!((point.index_0, point.index_1), (1, 0));
}

fn three_overlapping_spheres() -> Vec<CollisionObject> {
    vec![
        CollisionObject::new(sphere(1.0), at(0.0, 0.0, 0.0)),
        CollisionObject::new(sphere(1.0), at(1.0, 0.0, 0.0)),
        CollisionObject::new(sphere(1.0), at(0.5, 1.0, 0.0)),
    ]
}

const ALL_PAIRS: [BroadphasePair; 3] = [
    BroadphasePair::new(0, 1),
    BroadphasePair::new(0, 2),
    BroadphasePair::new(1, 2),
];

#[test]
fn algorithm_pool_rejects_when_full() {
    let mut world = world_with(WorldConfig {
        max_collision_algorithm_pool_size: 1,
        pool_policy: PoolPolicy::Reject,
        strictness: StrictnessPolicy::Halt,
        ..WorldConfig::DEFAULT
    });
    let objects = three_overlapping_spheres();

    assert_eq!(
        world.perform_discrete_collision_detection(&objects, &ALL_PAIRS),
        Err(CollisionError::AlgorithmPoolExhausted { capacity: 1 })
    );
    assert_eq!(world.get_num_manifolds(), 1);
    assert_eq!(world.get_manifold_for_pair(0, 1).unwrap().num_contacts(), 1);
}

#[test]
fn manifold_pool_rejects_when_full() {
    let mut world = world_with(WorldConfig {
        max_persistent_manifold_pool_size: 2,
        pool_policy: PoolPolicy::Reject,
        ..WorldConfig::DEFAULT
    });
    let objects = three_overlapping_spheres();

    // skipped, so the step itself succeeds
    assert!(
        world
            .perform_discrete_collision_detection(&objects, &ALL_PAIRS)
            .is_ok()
    );
    assert_eq!(world.get_num_manifolds(), 2);
    assert_eq!(world.get_dispatcher().get_num_algorithms(), 2);
    assert!(world.get_manifold_for_pair(1, 2).is_none());
}

#[test]
fn pools_grow_by_doubling() {
    let mut world = world_with(WorldConfig {
        max_collision_algorithm_pool_size: 1,
        max_persistent_manifold_pool_size: 1,
        pool_policy: PoolPolicy::Grow,
        strictness: StrictnessPolicy::Halt,
        ..WorldConfig::DEFAULT
    });
    let objects = three_overlapping_spheres();

    world
        .perform_discrete_collision_detection(&objects, &ALL_PAIRS)
        .unwrap();
    assert_eq!(world.get_num_manifolds(), 3);
    assert_eq!(world.get_dispatcher().get_pool_limits(), (4, 4));
}

fn proxies_01(objects: &[CollisionObject]) -> (ShapeProxy<'_>, ShapeProxy<'_>) {
    (
        ShapeProxy::new(&objects[0], 0),
        ShapeProxy::new(&objects[1], 1),
    )
}

#[test]
fn borrowed_manifold_lifecycle() {
    init_for_test();

    let mut dispatcher = CollisionDispatcher::new(
        CollisionConfiguration::default(),
        CollisionConstructionInfo::DEFAULT,
    );
    let objects = [
        CollisionObject::new(sphere(1.0), at(0.0, 0.0, 0.95)),
        static_triangle(),
    ];
    let (body0, body1) = proxies_01(&objects);

    let manifold_key = dispatcher.get_new_manifold(&body0, &body1).unwrap();
    let alg_key = dispatcher
        .create_algorithm(&body0, &body1, Some(manifold_key))
        .unwrap();

    let instance = dispatcher.get_algorithm(alg_key).unwrap();
    assert_eq!(instance.get_ownership(), ManifoldOwnership::Borrowed);
    assert_eq!(instance.get_manifold(), manifold_key);
    assert!(!instance.is_swapped());

    assert!(matches!(
        dispatcher.create_algorithm(&body0, &body1, Some(manifold_key)),
        Err(CollisionError::ManifoldInUse)
    ));
    assert!(matches!(
        dispatcher.release_manifold(manifold_key),
        Err(CollisionError::ManifoldInUse)
    ));

    assert!(dispatcher.process_collision(alg_key, &objects, &DispatcherInfo::default()));
    assert_eq!(
        dispatcher
            .get_manifold(manifold_key)
            .unwrap()
            .num_contacts(),
        1
    );

    // the caller still owns the manifold after the algorithm is gone
    assert!(dispatcher.destroy_algorithm(alg_key));
    assert!(!dispatcher.destroy_algorithm(alg_key));
    assert!(!dispatcher.get_manifold(manifold_key).unwrap().is_bound());

    let manifold = dispatcher.release_manifold(manifold_key).unwrap();
    assert_eq!(manifold.num_contacts(), 1);
    assert!(matches!(
        dispatcher.release_manifold(manifold_key),
        Err(CollisionError::InvalidManifold)
    ));
}

#[test]
fn exclusive_manifold_dies_with_its_algorithm() {
    init_for_test();

    let mut dispatcher = CollisionDispatcher::new(
        CollisionConfiguration::default(),
        CollisionConstructionInfo::DEFAULT,
    );
    let objects = [
        static_triangle(),
        CollisionObject::new(sphere(1.0), at(0.0, 0.0, 0.95)),
    ];
    let (body0, body1) = proxies_01(&objects);

    let alg_key = dispatcher.create_algorithm(&body0, &body1, None).unwrap();
    let instance = dispatcher.get_algorithm(alg_key).unwrap();
    assert_eq!(instance.get_ownership(), ManifoldOwnership::Exclusive);
    assert!(instance.is_swapped());
    assert_eq!(dispatcher.get_num_manifolds(), 1);

    assert!(dispatcher.destroy_algorithm(alg_key));
    assert_eq!(dispatcher.get_num_manifolds(), 0);
    assert_eq!(dispatcher.get_num_algorithms(), 0);
}

#[test]
fn missing_algorithm_is_reported_by_the_dispatcher() {
    init_for_test();

    let mut dispatcher = CollisionDispatcher::new(
        CollisionConfiguration::default(),
        CollisionConstructionInfo::DEFAULT,
    );
    let objects = [
        CollisionObject::new_static(ground_plane(), Affine3A::IDENTITY),
        static_triangle(),
    ];
    let (body0, body1) = proxies_01(&objects);

    assert!(matches!(
        dispatcher.create_algorithm(&body0, &body1, None),
        Err(CollisionError::NoAlgorithm(
            BroadphaseNativeTypes::StaticPlaneProxytype,
            BroadphaseNativeTypes::TriangleShapeProxytype
        ))
    ));
    assert_eq!(dispatcher.get_num_manifolds(), 0);
}

use glam::{Affine3A, Vec3A};
use narrowphase::{
    ActivationState, BroadphasePair, CollisionFlags, CollisionObject, SimpleBroadphase,
    WorldConfig,
};

use super::*;

#[test]
fn dropped_pairs_release_their_manifolds() {
    let mut world = new_world();
    let objects = [
        CollisionObject::new(sphere(1.0), at(0.0, 0.0, 0.95)),
        static_triangle(),
    ];

    world
        .perform_discrete_collision_detection(&objects, &PAIR_01)
        .unwrap();
    assert_eq!(world.get_num_manifolds(), 1);
    assert!(world.released_pairs().is_empty());

    world
        .perform_discrete_collision_detection(&objects, &[])
        .unwrap();
    assert_eq!(world.released_pairs(), &[BroadphasePair::new(0, 1)]);
    assert_eq!(world.get_num_manifolds(), 0);
    assert_eq!(world.get_dispatcher().get_num_algorithms(), 0);

    // coming back starts from a fresh manifold
    world
        .perform_discrete_collision_detection(&objects, &PAIR_01)
        .unwrap();
    assert!(world.released_pairs().is_empty());
    let point = world.get_manifold_for_pair(0, 1).unwrap().points()[0];
    assert_eq!(point.get_life_time(), 1);
    assert_eq!(point.applied_impulse, 0.0);
}

#[test]
fn repeated_and_invalid_pairs_are_ignored() {
    let mut world = new_world();
    let objects = [
        CollisionObject::new(sphere(1.0), at(0.0, 0.0, 0.95)),
        static_triangle(),
    ];
    let pairs = [
        BroadphasePair::new(1, 0),
        BroadphasePair::new(0, 1),
        BroadphasePair::new(0, 0),
        BroadphasePair::new(0, 9),
    ];

    world
        .perform_discrete_collision_detection(&objects, &pairs)
        .unwrap();
    assert_eq!(world.get_num_manifolds(), 1);
    assert_eq!(world.get_overlapping_pairs(), &[BroadphasePair::new(0, 1)]);

    let manifold = world.get_manifold_for_pair(1, 0).unwrap();
    assert_eq!((manifold.body0_idx, manifold.body1_idx), (0, 1));
    assert_eq!(manifold.num_contacts(), 1);
}

#[test]
fn simple_broadphase_step() {
    let mut world = new_world();
    let mut broadphase = SimpleBroadphase::default();
    let objects = [
        CollisionObject::new_static(ground_plane(), Affine3A::IDENTITY),
        CollisionObject::new(sphere(1.0), at(0.0, 0.0, 0.95)),
        CollisionObject::new(sphere(1.0), at(50.0, 50.0, 50.0)),
        static_triangle(),
        CollisionObject::new(cube(0.5), at(15.0, 0.0, 0.49)),
    ];

    world.step(&objects, &mut broadphase).unwrap();

    // static pairs (plane, triangle) are never reported
    assert!(world.get_manifold_for_pair(0, 3).is_none());
    assert!(world.get_manifold_for_pair(0, 2).is_none());

    assert_eq!(world.get_manifold_for_pair(0, 1).unwrap().num_contacts(), 1);
    assert_eq!(world.get_manifold_for_pair(1, 3).unwrap().num_contacts(), 1);
    assert_eq!(world.get_manifold_for_pair(0, 4).unwrap().num_contacts(), 4);

    let mut num_contacts = 0;
    world.for_each_contact(|manifold, point| {
        assert!(manifold.num_contacts() > 0);
        assert!(point.get_distance() < 0.0);
        num_contacts += 1;
    });
    assert_eq!(num_contacts, 6);
}

#[test]
fn step_pads_bounds_by_the_world_margin() {
    let mut world = world_with(WorldConfig {
        collision_margin: 0.25,
        ..WorldConfig::DEFAULT
    });
    let objects = [
        CollisionObject::new(sphere(1.0), at(0.0, 0.0, 1.2)),
        static_triangle(),
    ];

    world.step(&objects, &mut SimpleBroadphase).unwrap();

    let manifold = world.get_manifold_for_pair(0, 1).unwrap();
    assert_eq!(manifold.num_contacts(), 1);
    assert!(manifold.points()[0].get_distance() > 0.0);
}

#[test]
fn changed_shape_type_recreates_the_pair() {
    let mut world = new_world();
    let mut objects = vec![
        CollisionObject::new(sphere(1.0), at(0.0, 0.0, 0.95)),
        static_triangle(),
    ];

    let manifold = collide_once(&mut world, &objects);
    assert_eq!(manifold.points()[0].index_1, 6);

    objects[1] = CollisionObject::new_static(ground_plane(), Affine3A::IDENTITY);
    let manifold = collide_once(&mut world, &objects);
    assert_eq!(world.released_pairs(), &PAIR_01);
    assert_eq!(manifold.num_contacts(), 1);
    // the plane reports no feature id
    assert_eq!(manifold.points()[0].index_1, -1);

    // box against triangle has no algorithm, so the pair goes away
    objects[0] = CollisionObject::new(cube(0.5), at(0.0, 0.0, 0.45));
    objects[1] = static_triangle();
    world
        .perform_discrete_collision_detection(&objects, &PAIR_01)
        .unwrap();
    assert_eq!(world.released_pairs(), &PAIR_01);
    assert!(world.get_manifold_for_pair(0, 1).is_none());
    assert_eq!(world.get_num_manifolds(), 0);
}

#[test]
fn contacts_without_response_are_dropped() {
    let mut world = new_world();
    let mut objects = vec![
        CollisionObject::new(sphere(1.0), at(0.0, 0.0, 0.95)),
        static_triangle(),
    ];

    world
        .perform_discrete_collision_detection(&objects, &PAIR_01)
        .unwrap();
    assert_eq!(world.get_num_manifolds(), 1);

    objects[0].collision_flags |= CollisionFlags::NoContactResponse as u8;
    world
        .perform_discrete_collision_detection(&objects, &PAIR_01)
        .unwrap();
    assert_eq!(world.get_num_manifolds(), 0);
    assert_eq!(world.released_pairs(), &[BroadphasePair::new(0, 1)]);
}

#[test]
fn sleeping_pairs_keep_their_manifolds() {
    let mut world = new_world();
    let mut objects = vec![
        CollisionObject::new(sphere(1.0), at(0.0, 0.0, 0.95)),
        CollisionObject::new(sphere(1.0), at(0.0, 0.0, -0.95)),
    ];

    world
        .perform_discrete_collision_detection(&objects, &PAIR_01)
        .unwrap();
    let before = world.get_manifold_for_pair(0, 1).unwrap().points()[0];

    for obj in &mut objects {
        obj.set_activation_state(ActivationState::Sleeping);
    }
    world
        .perform_discrete_collision_detection(&objects, &PAIR_01)
        .unwrap();

    // neither side is awake, so nothing is re-measured
    let manifold = world.get_manifold_for_pair(0, 1).unwrap();
    assert_eq!(manifold.num_contacts(), 1);
    assert_eq!(manifold.points()[0], before);
}

#[test]
fn clear_releases_everything() {
    let mut world = new_world();
    let objects = [
        CollisionObject::new(sphere(1.0), at(0.0, 0.0, 0.95)),
        static_triangle(),
        CollisionObject::new(sphere(1.0), at(0.0, 1.0, 0.95)),
    ];
    let pairs = [
        BroadphasePair::new(2, 1),
        BroadphasePair::new(0, 1),
        BroadphasePair::new(0, 2),
    ];

    world
        .perform_discrete_collision_detection(&objects, &pairs)
        .unwrap();
    assert_eq!(world.get_num_manifolds(), 3);

    world.clear();
    assert_eq!(world.get_num_manifolds(), 0);
    assert_eq!(
        world.released_pairs(),
        &[
            BroadphasePair::new(0, 1),
            BroadphasePair::new(0, 2),
            BroadphasePair::new(1, 2)
        ]
    );
}

pub mod collision_configuration;
pub mod collision_dispatcher;
pub mod collision_object;
pub mod collision_world;
pub mod convex_plane_collision_algorithm;
pub mod material_combiner;
pub mod sphere_obb_collision_algorithm;
pub mod sphere_sphere_collision_algorithm;
pub mod sphere_triangle_collision_algorithm;

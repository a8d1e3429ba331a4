pub mod box_shape;
pub mod collision_shape;
pub mod sphere_shape;
pub mod static_plane_shape;
pub mod triangle_shape;

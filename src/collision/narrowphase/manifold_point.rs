use glam::Vec3A;

#[derive(Debug, Default, Copy, Clone, PartialEq)]
pub struct ManifoldPoint {
    pub local_point_a: Vec3A,
    pub local_point_b: Vec3A,
    pub position_world_on_a: Vec3A,
    pub position_world_on_b: Vec3A,
    /// Unit normal pointing from body A toward body B.
    pub normal_world: Vec3A,
    /// Signed separation along `normal_world`, negative when overlapping.
    pub distance_1: f32,
    pub combined_friction: f32,
    pub combined_restitution: f32,
    /// Feature ids (triangle index, box corner...) on A and B, `-1` if unused.
    pub index_0: i32,
    pub index_1: i32,
    pub applied_impulse: f32,
    pub applied_impulse_lateral_1: f32,
    pub applied_impulse_lateral_2: f32,
    pub lateral_friction_dir_1: Vec3A,
    pub lateral_friction_dir_2: Vec3A,
    /// Number of refreshes this point survived.
    pub life_time: u32,
}

impl ManifoldPoint {
    #[must_use]
    pub const fn new(point_a: Vec3A, point_b: Vec3A, normal: Vec3A, distance: f32) -> Self {
        Self {
            local_point_a: point_a,
            local_point_b: point_b,
            position_world_on_a: Vec3A::ZERO,
            position_world_on_b: Vec3A::ZERO,
            normal_world: normal,
            distance_1: distance,
            combined_friction: 0.0,
            combined_restitution: 0.0,
            index_0: -1,
            index_1: -1,
            applied_impulse: 0.0,
            applied_impulse_lateral_1: 0.0,
            applied_impulse_lateral_2: 0.0,
            lateral_friction_dir_1: Vec3A::ZERO,
            lateral_friction_dir_2: Vec3A::ZERO,
            life_time: 0,
        }
    }

    #[inline]
    #[must_use]
    pub const fn get_distance(&self) -> f32 {
        self.distance_1
    }

    #[inline]
    #[must_use]
    pub const fn get_life_time(&self) -> u32 {
        self.life_time
    }

    pub(crate) const fn reset_impulses(&mut self) {
        self.applied_impulse = 0.0;
        self.applied_impulse_lateral_1 = 0.0;
        self.applied_impulse_lateral_2 = 0.0;
        self.life_time = 0;
    }
}

use glam::Affine3A;

use crate::linear_math::{
    SIMD_EPSILON,
    transform_util::{calculate_velocity, integrate_transform},
};

pub const MAX_TOI_ITERATIONS: usize = 64;

/// Start and end world transforms of a body over one step.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Sweep {
    pub from: Affine3A,
    pub to: Affine3A,
}

impl Sweep {
    #[must_use]
    pub const fn new(from: Affine3A, to: Affine3A) -> Self {
        Self { from, to }
    }

    #[must_use]
    pub const fn stationary(at: Affine3A) -> Self {
        Self { from: at, to: at }
    }
}

/// Conservative advancement between two moving bodies.
///
/// `distance` returns the signed separation of the bodies at the given
/// transforms, or `None` if it can't be measured. `angular_radius_*` bound how
/// far a surface point of each body sits from its rotation center.
///
/// Returns the earliest fraction in `[0, 1]` at which the separation drops to
/// `tolerance`, `Some(0.0)` if the bodies start in contact, or `None` if they
/// never touch within the sweep.
pub fn conservative_advancement(
    sweep0: &Sweep,
    angular_radius_0: f32,
    sweep1: &Sweep,
    angular_radius_1: f32,
    tolerance: f32,
    mut distance: impl FnMut(&Affine3A, &Affine3A) -> Option<f32>,
) -> Option<f32> {
    let (lin_vel_0, ang_vel_0) = calculate_velocity(&sweep0.from, &sweep0.to, 1.0);
    let (lin_vel_1, ang_vel_1) = calculate_velocity(&sweep1.from, &sweep1.to, 1.0);

    let bound = (lin_vel_1 - lin_vel_0).length()
        + ang_vel_0.length() * angular_radius_0
        + ang_vel_1.length() * angular_radius_1;

    let mut lambda = 0.0;
    for _ in 0..MAX_TOI_ITERATIONS {
        let tr0 = integrate_transform(&sweep0.from, lin_vel_0, ang_vel_0, lambda);
        let tr1 = integrate_transform(&sweep1.from, lin_vel_1, ang_vel_1, lambda);

        let dist = distance(&tr0, &tr1)?;
        if dist <= tolerance {
            return Some(lambda);
        }

        if bound <= SIMD_EPSILON {
            return None;
        }

        lambda += dist / bound;
        if lambda > 1.0 {
            return None;
        }
    }

    None
}

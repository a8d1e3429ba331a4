use glam::{Affine3A, Mat3A, Quat, Vec3A};
use std::f32::consts::FRAC_PI_4;

const ANGULAR_MOTION_THRESHOLD: f32 = FRAC_PI_4;

pub fn integrate_transform(
    cur_trans: &Affine3A,
    lin_vel: Vec3A,
    ang_vel: Vec3A,
    time_step: f32,
) -> Affine3A {
    let translation = cur_trans.translation + lin_vel * time_step;

    let mut angle = ang_vel.length();

    if angle * time_step > ANGULAR_MOTION_THRESHOLD {
        angle = ANGULAR_MOTION_THRESHOLD / time_step;
    }

    let axis = if angle < 0.001 {
        // Taylor expansion of sync function
        ang_vel
            * (0.5 * time_step
                - time_step * time_step * time_step * 0.020833334 * angle * angle)
    } else {
        ang_vel * ((0.5 * angle * time_step).sin() / angle)
    };

    let dorn = Quat::from_xyzw(axis.x, axis.y, axis.z, (angle * time_step * 0.5).cos());
    let orn0 = Quat::from_mat3a(&cur_trans.matrix3);
    let predicted_orn = (dorn * orn0).normalize();

    Affine3A {
        matrix3: Mat3A::from_quat(predicted_orn),
        translation,
    }
}

/// Linear and angular velocity that carries `trans0` to `trans1` in `time_step`.
pub fn calculate_velocity(trans0: &Affine3A, trans1: &Affine3A, time_step: f32) -> (Vec3A, Vec3A) {
    let lin_vel = (trans1.translation - trans0.translation) / time_step;

    let orn0 = Quat::from_mat3a(&trans0.matrix3);
    let orn1 = Quat::from_mat3a(&trans1.matrix3);
    let mut dorn = (orn1 * orn0.inverse()).normalize();

    // shortest arc
    if dorn.w < 0.0 {
        dorn = -dorn;
    }

    let (axis, angle) = dorn.to_axis_angle();
    let ang_vel = if angle.abs() < f32::EPSILON {
        Vec3A::ZERO
    } else {
        Vec3A::from(axis) * (angle / time_step)
    };

    (lin_vel, ang_vel)
}

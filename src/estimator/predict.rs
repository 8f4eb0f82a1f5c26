use crate::estimator::types::*;
use crate::estimator::Ekf;
use crate::logging::log_warn;
use crate::num_traits::{GravityConstants, IsFinite};
use crate::types::{InertialSample, Quaternion, Vector3};
use minikalman::matrix::MatrixDataType;
use minikalman::prelude::*;

impl<T> Ekf<T>
where
    T: MatrixDataType + IsFinite + GravityConstants,
{
    /// Propagates the nominal state and the error covariance over one inertial sample.
    ///
    /// Samples with a non-positive integration period are skipped. Returns whether the
    /// sample was used.
    pub fn predict(&mut self, imu: &InertialSample<T>) -> bool {
        let dt_ang = imu.delta_ang_dt;
        let dt_vel = imu.delta_vel_dt;
        if !(dt_ang > T::zero() && dt_vel > T::zero()) {
            log_warn!(
                "Skipping inertial sample at {} us without a valid integration period",
                imu.time_us
            );
            return false;
        }

        let delta_ang = imu.delta_ang - self.state.gyro_bias * dt_ang;
        let delta_vel = imu.delta_vel - self.state.accel_bias * dt_vel;

        // Transition and noise use the attitude at the start of the interval.
        let rotation = self.state.attitude.to_rotation_matrix();
        self.predict_covariance(&rotation, delta_ang, delta_vel, dt_ang, dt_vel);
        self.predict_state(delta_ang, delta_vel, dt_vel);

        self.panic_if_nan();
        true
    }

    fn predict_state(&mut self, delta_ang: Vector3<T>, delta_vel: Vector3<T>, dt_vel: T) {
        let delta_vel_earth = self.state.attitude.rotate_body_to_earth(delta_vel);
        let gravity = Vector3::new(T::zero(), T::zero(), T::ONE_G * dt_vel);

        self.state.attitude =
            (self.state.attitude * Quaternion::from_rotation_vector(delta_ang)).normalized();

        let previous_velocity = self.state.velocity;
        self.state.velocity = previous_velocity + delta_vel_earth + gravity;

        let half_dt = dt_vel * (T::one() + T::one()).recip();
        self.state.position =
            self.state.position + (previous_velocity + self.state.velocity) * half_dt;
    }

    fn predict_covariance(
        &mut self,
        rotation: &[[T; 3]; 3],
        delta_ang: Vector3<T>,
        delta_vel: Vector3<T>,
        dt_ang: T,
        dt_vel: T,
    ) {
        let zero = T::zero();
        let one = T::one();
        let angle_skew = delta_ang.skew();
        let vel_skew = delta_vel.skew();

        let transition = self.filter.state_transition_mut();
        transition.make_identity();
        transition.apply(|mat| {
            for row in 0..3 {
                for col in 0..3 {
                    let identity = if row == col { one } else { zero };
                    mat.set_at(ATTITUDE + row, ATTITUDE + col, identity - angle_skew[row][col]);

                    let mut rotated_skew = zero;
                    for k in 0..3 {
                        rotated_skew = rotated_skew + rotation[row][k] * vel_skew[k][col];
                    }
                    mat.set_at(VELOCITY + row, ATTITUDE + col, -rotated_skew);
                    mat.set_at(VELOCITY + row, ACCEL_BIAS + col, -(rotation[row][col] * dt_vel));
                }

                mat.set_at(ATTITUDE + row, GYRO_BIAS + row, -dt_ang);
                mat.set_at(POSITION + row, VELOCITY + row, dt_vel);
            }
        });

        let gyro_var = (self.params.gyro_noise * dt_ang) * (self.params.gyro_noise * dt_ang);
        let accel_var = (self.params.accel_noise * dt_vel) * (self.params.accel_noise * dt_vel);
        let gyro_bias_var =
            (self.params.gyro_bias_p_noise * dt_ang) * (self.params.gyro_bias_p_noise * dt_ang);
        let accel_bias_var =
            (self.params.accel_bias_p_noise * dt_vel) * (self.params.accel_bias_p_noise * dt_vel);

        self.filter.direct_process_noise_mut().apply(|mat| {
            for row in 0..STATES {
                for col in 0..STATES {
                    mat.set_at(row, col, zero);
                }
            }
            for axis in 0..3 {
                mat.set_at(ATTITUDE + axis, ATTITUDE + axis, gyro_var);
                mat.set_at(VELOCITY + axis, VELOCITY + axis, accel_var);
                mat.set_at(GYRO_BIAS + axis, GYRO_BIAS + axis, gyro_bias_var);
                mat.set_at(ACCEL_BIAS + axis, ACCEL_BIAS + axis, accel_bias_var);
            }
        });

        // P = F P Fᵀ + Q; the zero error state stays zero.
        self.filter.predict();
        self.force_symmetry();
        self.constrain_variances();
    }
}

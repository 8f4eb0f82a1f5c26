//! Gravity vector aiding.
//!
//! While the vehicle is not accelerating, the accelerometer measures the reaction to
//! gravity only. Fusing its direction constrains roll and pitch, much like the
//! accelerometer path of a complementary filter.

mod gate;
mod linearization;
mod observation;
mod sequential;

pub use crate::gravity::gate::GravityGate;
pub use crate::gravity::linearization::{compute_gravity_innovation, GravityInnovation};
pub use crate::gravity::observation::{observation_variance, GravityObservation};
pub use crate::gravity::sequential::fuse_axes;

use crate::estimator::Ekf;
use crate::logging::{log_debug, log_trace};
use crate::num_traits::{GravityConstants, IsFinite};
use crate::types::{InertialSample, Vector3};
use minikalman::matrix::MatrixDataType;

impl<T> Ekf<T>
where
    T: MatrixDataType + IsFinite + GravityConstants,
{
    /// Attempts to fuse the gravity observation of an inertial sample.
    ///
    /// Updates the `gravity_vector` control flag and refills the gravity aid-source status,
    /// whether or not the observation ends up being fused. Fusion happens only if the
    /// validity gate passes, no axis fails the innovation check and no accelerometer axis
    /// is clipping.
    pub fn control_gravity_fusion(&mut self, imu: &InertialSample<T>) {
        let observation =
            GravityObservation::from_sample(imu, self.state.accel_bias, self.params.gravity_noise);

        let gate = GravityGate {
            enabled: self.params.imu_ctrl.gravity_vector,
            filtered_accel_norm_sq: self.accel_vec_filt.norm_sq(),
            accel_norm_sq: observation.measurement.norm_sq(),
            vehicle_at_rest: self.control_status.vehicle_at_rest,
            horizontal_aiding_active: self.control_status.is_horizontal_aiding_active(),
        };
        self.control_status.gravity_vector = gate.is_valid();

        let linearized = compute_gravity_innovation(
            &self.state,
            self.covariance(),
            observation.measurement,
            observation.variance,
            <T as GravityConstants>::EPSILON,
        );

        let status = &mut self.aid_src_gravity;
        status.reset();
        status.timestamp_sample = imu.time_us;
        status.observation = observation.measurement;
        status.observation_variance =
            Vector3::new(observation.variance, observation.variance, observation.variance);
        status.innovation = linearized.innovation;
        status.innovation_variance = linearized.innovation_variance;
        status.set_test_ratio(T::INNOVATION_GATE);

        if !self.control_status.gravity_vector {
            log_trace!("Gravity observation at {} us failed the validity gate", imu.time_us);
            return;
        }

        if self.aid_src_gravity.innovation_rejected {
            log_debug!("Gravity innovation at {} us rejected", imu.time_us);
            return;
        }

        if imu.is_clipping() {
            log_debug!("Accelerometer clipping at {} us, skipping gravity fusion", imu.time_us);
            return;
        }

        let fused = fuse_axes(self, &linearized);
        self.aid_src_gravity.fused = fused;
        if fused {
            self.aid_src_gravity.time_last_fuse = imu.time_us;
        }
    }
}

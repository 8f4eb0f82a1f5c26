use crate::estimator::types::*;
use crate::estimator::types::StateVector;
use crate::estimator::Ekf;
use crate::logging::log_debug;
use crate::num_traits::IsFinite;
use minikalman::matrix::MatrixDataType;
use minikalman::prelude::*;

/// A scalar Kalman measurement update against the shared state and covariance.
pub trait MeasurementUpdate<T> {
    /// Applies one scalar observation, given its precomputed Kalman gain, innovation
    /// variance and innovation.
    ///
    /// Returns `false` without correcting the state if the covariance update would make any
    /// variance negative.
    fn measurement_update(
        &mut self,
        gain: &StateVector<T>,
        innovation_variance: T,
        innovation: T,
    ) -> bool;
}

impl<T> MeasurementUpdate<T> for Ekf<T>
where
    T: MatrixDataType + IsFinite,
{
    fn measurement_update(
        &mut self,
        gain: &StateVector<T>,
        innovation_variance: T,
        innovation: T,
    ) -> bool {
        let mut gain = *gain;
        self.clear_inhibited_gains(&mut gain);

        if !self.check_and_fix_covariance_update(&gain, innovation_variance) {
            return false;
        }

        // P = P - K S Kᵀ, which equals P - K H P for the optimal gain.
        self.filter.estimate_covariance_mut().apply(|mat| {
            for row in 0..STATES {
                let scaled = gain[row] * innovation_variance;
                for col in 0..STATES {
                    mat.set_at(row, col, mat.get_at(row, col) - scaled * gain[col]);
                }
            }
        });
        self.force_symmetry();
        self.constrain_variances();

        let mut correction = gain;
        for value in correction.iter_mut() {
            *value = *value * innovation;
        }
        self.state.inject(&correction);

        self.panic_if_nan();
        true
    }
}

impl<T> Ekf<T>
where
    T: MatrixDataType,
{
    /// Zeroes the gains of states whose learning is disabled.
    fn clear_inhibited_gains(&self, gain: &mut StateVector<T>) {
        let imu_ctrl = self.params.imu_ctrl;
        if !imu_ctrl.gyro_bias {
            gain[GYRO_BIAS..GYRO_BIAS + 3].fill(T::zero());
        }
        if !imu_ctrl.accel_bias {
            gain[ACCEL_BIAS..ACCEL_BIAS + 3].fill(T::zero());
        }
    }

    /// Checks that no variance would become negative and uncorrelates every state for
    /// which it would.
    fn check_and_fix_covariance_update(
        &mut self,
        gain: &StateVector<T>,
        innovation_variance: T,
    ) -> bool {
        let mut healthy = true;
        for index in 0..STATES {
            let reduction = gain[index] * gain[index] * innovation_variance;
            if self.covariance_at(index, index) < reduction {
                log_debug!("Covariance update would turn variance of state {} negative", index);
                self.uncorrelate_set_variance(index, T::zero());
                healthy = false;
            }
        }
        healthy
    }
}

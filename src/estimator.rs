mod covariance;
mod predict;
mod state;
mod types;
mod update;

pub use crate::estimator::state::NominalState;
pub use crate::estimator::types::{
    CovarianceMatrix, StateVector, ACCEL_BIAS, ATTITUDE, GYRO_BIAS, POSITION, STATES, VELOCITY,
};
pub use crate::estimator::update::MeasurementUpdate;

use crate::aid_source::AidSource3d;
use crate::alpha_filter::AlphaFilter;
use crate::control_status::ControlStatus;
use crate::estimator::types::OwnedKalmanFilter;
use crate::num_traits::{GravityConstants, IsFinite};
use crate::parameters::{ParameterError, Parameters};
use crate::types::{InertialSample, Quaternion};
use minikalman::matrix::MatrixDataType;

/// An error-state navigation filter with gravity vector aiding, with generic type `T`.
///
/// The filter carries fifteen error states (attitude, velocity, position, gyro bias and
/// accelerometer bias) against a [`NominalState`]. Each inertial sample is first used to
/// propagate the state and covariance, then as an observation of the gravity vector to
/// constrain roll and pitch.
pub struct Ekf<T> {
    pub(crate) filter: OwnedKalmanFilter<T>,
    pub(crate) state: NominalState<T>,
    pub(crate) params: Parameters<T>,
    pub(crate) control_status: ControlStatus,
    /// Low-pass filtered, bias-corrected specific force.
    pub(crate) accel_vec_filt: AlphaFilter<T>,
    pub(crate) aid_src_gravity: AidSource3d<T>,
}

impl<T> Ekf<T> {
    /// Initializes a new instance of the [`Ekf`] struct.
    ///
    /// ## Arguments
    /// * `params` - The estimator tuning; rejected if [`Parameters::validate`] fails.
    pub fn new(params: Parameters<T>) -> Result<Self, ParameterError>
    where
        T: MatrixDataType + IsFinite,
    {
        params.validate()?;

        Ok(Self {
            filter: Self::build_filter(&params),
            state: NominalState::default(),
            accel_vec_filt: AlphaFilter::new(params.accel_filter_time_constant),
            control_status: ControlStatus::default(),
            aid_src_gravity: AidSource3d::default(),
            params,
        })
    }
}

impl<T> Ekf<T>
where
    T: MatrixDataType + IsFinite + GravityConstants,
{
    /// Runs one estimator cycle: prediction followed by gravity fusion.
    ///
    /// Samples without a valid integration period are dropped. Gravity fusion is reported
    /// inactive for such a cycle.
    pub fn update(&mut self, imu: &InertialSample<T>) {
        if !self.predict(imu) {
            self.control_status.gravity_vector = false;
            return;
        }

        self.update_accel_filter(imu);
        self.control_gravity_fusion(imu);
    }

    /// Feeds the bias-corrected specific force of a sample into the low-pass filter used
    /// by the gravity validity gate.
    pub fn update_accel_filter(&mut self, imu: &InertialSample<T>) {
        if imu.delta_vel_dt > T::zero() {
            let specific_force = imu.specific_force() - self.state.accel_bias;
            self.accel_vec_filt.update(specific_force, imu.delta_vel_dt);
        }
    }
}

impl<T> Ekf<T> {
    /// Gets the nominal state.
    pub fn state(&self) -> &NominalState<T> {
        &self.state
    }

    /// Overrides the attitude, e.g. for an initial alignment.
    pub fn set_attitude(&mut self, attitude: Quaternion<T>)
    where
        T: MatrixDataType,
    {
        self.state.attitude = attitude.normalized();
    }

    /// Gets the error-state covariance.
    pub fn covariance(&self) -> &CovarianceMatrix<T>
    where
        T: MatrixDataType,
    {
        self.filter.estimate_covariance()
    }

    /// Gets the error-state covariance for modification.
    pub fn covariance_mut(&mut self) -> &mut CovarianceMatrix<T>
    where
        T: MatrixDataType,
    {
        self.filter.estimate_covariance_mut()
    }

    /// Gets the estimator control flags.
    pub fn control_status(&self) -> &ControlStatus {
        &self.control_status
    }

    /// Gets the estimator control flags for modification, e.g. to signal rest or other
    /// active aiding sources.
    pub fn control_status_mut(&mut self) -> &mut ControlStatus {
        &mut self.control_status
    }

    /// Gets the status of the last gravity fusion attempt.
    pub fn aid_src_gravity(&self) -> &AidSource3d<T> {
        &self.aid_src_gravity
    }

    /// Gets the estimator tuning.
    pub fn parameters(&self) -> &Parameters<T> {
        &self.params
    }

    #[allow(unused)]
    fn panic_if_nan(&self)
    where
        T: MatrixDataType + IsFinite,
    {
        #[cfg(debug_assertions)]
        if !self.state.is_finite() {
            panic!("NaN detected in state estimate")
        }
    }
}

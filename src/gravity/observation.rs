use crate::num_traits::GravityConstants;
use crate::types::{InertialSample, Vector3};
use minikalman::matrix::MatrixDataType;

/// The accelerometer reading interpreted as an observation of the gravity vector.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GravityObservation<T> {
    /// Bias-corrected specific force in the body frame, in m/s².
    pub measurement: Vector3<T>,
    /// Isotropic observation variance, in (m/s²)².
    pub variance: T,
}

impl<T> GravityObservation<T>
where
    T: MatrixDataType + GravityConstants,
{
    /// Builds the observation from an inertial sample and the accelerometer bias estimate.
    ///
    /// ## Arguments
    /// * `imu` - The sample; its delta velocity dt must be positive.
    /// * `accel_bias` - The current accelerometer bias estimate.
    /// * `gravity_noise` - The configured observation noise, in m/s².
    pub fn from_sample(imu: &InertialSample<T>, accel_bias: Vector3<T>, gravity_noise: T) -> Self {
        Self {
            measurement: imu.specific_force() - accel_bias,
            variance: observation_variance(gravity_noise),
        }
    }
}

/// Squares the configured noise, flooring it so the observation never becomes
/// overconfident.
pub fn observation_variance<T>(gravity_noise: T) -> T
where
    T: MatrixDataType + GravityConstants,
{
    let variance = gravity_noise * gravity_noise;
    let floor = T::MIN_GRAVITY_NOISE * T::MIN_GRAVITY_NOISE;
    if variance > floor {
        variance
    } else {
        floor
    }
}

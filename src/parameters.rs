//! Estimator configuration.

use crate::num_traits::IsFinite;
use minikalman::matrix::MatrixDataType;

/// IMU-related estimator capabilities.
///
/// Replaces the `imu_ctrl` bitmask of the parameter store with named switches while
/// keeping the bit layout available through [`from_bits`](Self::from_bits) and
/// [`bits`](Self::bits).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ImuControl {
    /// Learn the gyroscope bias.
    pub gyro_bias: bool,
    /// Learn the accelerometer bias.
    pub accel_bias: bool,
    /// Fuse the gravity vector observation to constrain roll and pitch.
    pub gravity_vector: bool,
}

impl ImuControl {
    pub const GYRO_BIAS: i32 = 1 << 0;
    pub const ACCEL_BIAS: i32 = 1 << 1;
    pub const GRAVITY_VECTOR: i32 = 1 << 2;

    /// Decodes the capabilities from a parameter bitmask.
    pub const fn from_bits(bits: i32) -> Self {
        Self {
            gyro_bias: bits & Self::GYRO_BIAS != 0,
            accel_bias: bits & Self::ACCEL_BIAS != 0,
            gravity_vector: bits & Self::GRAVITY_VECTOR != 0,
        }
    }

    /// Encodes the capabilities as a parameter bitmask.
    pub const fn bits(&self) -> i32 {
        let mut bits = 0;
        if self.gyro_bias {
            bits |= Self::GYRO_BIAS;
        }
        if self.accel_bias {
            bits |= Self::ACCEL_BIAS;
        }
        if self.gravity_vector {
            bits |= Self::GRAVITY_VECTOR;
        }
        bits
    }
}

impl Default for ImuControl {
    fn default() -> Self {
        Self::from_bits(Self::GYRO_BIAS | Self::ACCEL_BIAS | Self::GRAVITY_VECTOR)
    }
}

/// A rejected estimator configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ParameterError {
    /// A noise value is NaN or infinite.
    #[error("{name} must be finite")]
    NotFinite { name: &'static str },
    /// A noise or variance value is negative.
    #[error("{name} must not be negative")]
    Negative { name: &'static str },
    /// The accelerometer low-pass filter time constant is zero or negative.
    #[error("accel_filter_time_constant must be positive")]
    NonPositiveTimeConstant,
}

/// Tuning of the estimator and its gravity aiding.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Parameters<T> {
    /// Accelerometer noise for gravity fusion, in m/s².
    ///
    /// Values below `0.01` m/s² (including zero and negative values) are floored when
    /// the observation variance is formed.
    pub gravity_noise: T,
    /// Rate gyro noise for covariance prediction, in rad/s.
    pub gyro_noise: T,
    /// Accelerometer noise for covariance prediction, in m/s².
    pub accel_noise: T,
    /// Process noise of the gyro bias random walk, in rad/s².
    pub gyro_bias_p_noise: T,
    /// Process noise of the accelerometer bias random walk, in m/s³.
    pub accel_bias_p_noise: T,
    /// Time constant of the accelerometer low-pass filter used for gravity gating, in seconds.
    pub accel_filter_time_constant: T,
    /// Initial variance of each tilt and heading error state, in rad².
    pub initial_attitude_variance: T,
    /// Initial variance of each velocity error state, in (m/s)².
    pub initial_velocity_variance: T,
    /// Initial variance of each position error state, in m².
    pub initial_position_variance: T,
    /// Initial variance of each gyro bias error state, in (rad/s)².
    pub initial_gyro_bias_variance: T,
    /// Initial variance of each accelerometer bias error state, in (m/s²)².
    pub initial_accel_bias_variance: T,
    /// IMU capabilities, including the master enable of gravity fusion.
    pub imu_ctrl: ImuControl,
}

macro_rules! impl_default_parameters {
    ($type:ty) => {
        impl Default for Parameters<$type> {
            fn default() -> Self {
                Self {
                    gravity_noise: 1.0,
                    gyro_noise: 1.5e-2,
                    accel_noise: 3.5e-1,
                    gyro_bias_p_noise: 1.0e-3,
                    accel_bias_p_noise: 3.0e-3,
                    accel_filter_time_constant: 0.1,
                    initial_attitude_variance: 1.0e-2,
                    initial_velocity_variance: 0.25,
                    initial_position_variance: 1.0,
                    initial_gyro_bias_variance: 1.0e-4,
                    initial_accel_bias_variance: 1.0e-2,
                    imu_ctrl: ImuControl::default(),
                }
            }
        }
    };
}

impl_default_parameters!(f32);
impl_default_parameters!(f64);

impl<T> Parameters<T> {
    /// Checks the configuration for values the estimator cannot work with.
    ///
    /// `gravity_noise` only has to be finite; the observation variance floor takes care of
    /// small, zero or negative values.
    pub fn validate(&self) -> Result<(), ParameterError>
    where
        T: MatrixDataType + IsFinite,
    {
        if !self.gravity_noise.is_finite() {
            return Err(ParameterError::NotFinite {
                name: "gravity_noise",
            });
        }

        let non_negative = [
            ("gyro_noise", self.gyro_noise),
            ("accel_noise", self.accel_noise),
            ("gyro_bias_p_noise", self.gyro_bias_p_noise),
            ("accel_bias_p_noise", self.accel_bias_p_noise),
            ("initial_attitude_variance", self.initial_attitude_variance),
            ("initial_velocity_variance", self.initial_velocity_variance),
            ("initial_position_variance", self.initial_position_variance),
            ("initial_gyro_bias_variance", self.initial_gyro_bias_variance),
            (
                "initial_accel_bias_variance",
                self.initial_accel_bias_variance,
            ),
        ];

        for (name, value) in non_negative {
            if !value.is_finite() {
                return Err(ParameterError::NotFinite { name });
            }
            if value < T::zero() {
                return Err(ParameterError::Negative { name });
            }
        }

        let tau = self.accel_filter_time_constant;
        if !tau.is_finite() || tau <= T::zero() {
            return Err(ParameterError::NonPositiveTimeConstant);
        }

        Ok(())
    }
}

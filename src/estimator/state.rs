use crate::estimator::types::*;
use crate::num_traits::IsFinite;
use crate::types::{Quaternion, Vector3};
use minikalman::matrix::MatrixDataType;

/// The nominal (full) navigation state the error states are defined against.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NominalState<T> {
    /// Rotation from the body frame into the NED frame.
    pub attitude: Quaternion<T>,
    /// Velocity in the NED frame, in m/s.
    pub velocity: Vector3<T>,
    /// Position in the NED frame, in m.
    pub position: Vector3<T>,
    /// Gyroscope bias, in rad/s.
    pub gyro_bias: Vector3<T>,
    /// Accelerometer bias, in m/s².
    pub accel_bias: Vector3<T>,
}

impl<T> Default for NominalState<T>
where
    T: MatrixDataType,
{
    fn default() -> Self {
        let zero = Vector3::new(T::zero(), T::zero(), T::zero());
        Self {
            attitude: Quaternion::identity(),
            velocity: zero,
            position: zero,
            gyro_bias: zero,
            accel_bias: zero,
        }
    }
}

impl<T> NominalState<T>
where
    T: MatrixDataType,
{
    /// Folds an error-state correction into the nominal state.
    ///
    /// The attitude error is a body-frame rotation vector and is applied on the right;
    /// all other states are corrected additively.
    pub fn inject(&mut self, correction: &StateVector<T>) {
        let block = |offset: usize| {
            Vector3::new(
                correction[offset],
                correction[offset + 1],
                correction[offset + 2],
            )
        };

        let rotation = Quaternion::from_rotation_vector(block(ATTITUDE));
        self.attitude = (self.attitude * rotation).normalized();
        self.velocity = self.velocity + block(VELOCITY);
        self.position = self.position + block(POSITION);
        self.gyro_bias = self.gyro_bias + block(GYRO_BIAS);
        self.accel_bias = self.accel_bias + block(ACCEL_BIAS);
    }

    /// Determines whether every component of the state is a finite number.
    pub fn is_finite(&self) -> bool
    where
        T: IsFinite,
    {
        let q = &self.attitude;
        let vectors = [
            self.velocity,
            self.position,
            self.gyro_bias,
            self.accel_bias,
        ];

        [q.w, q.x, q.y, q.z].into_iter().all(IsFinite::is_finite)
            && vectors
                .iter()
                .all(|v| v.x.is_finite() && v.y.is_finite() && v.z.is_finite())
    }
}

use crate::num_traits::GravityConstants;
use minikalman::matrix::MatrixDataType;

/// The inputs deciding whether the gravity observation may be fused this cycle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GravityGate<T> {
    /// Gravity fusion is enabled in the IMU capabilities.
    pub enabled: bool,
    /// Squared length of the low-pass filtered specific force.
    pub filtered_accel_norm_sq: T,
    /// Squared length of the current specific force.
    pub accel_norm_sq: T,
    /// The vehicle is known to be at rest.
    pub vehicle_at_rest: bool,
    /// Another source observes horizontal position or velocity.
    pub horizontal_aiding_active: bool,
}

impl<T> GravityGate<T>
where
    T: MatrixDataType + GravityConstants,
{
    /// Determines whether the specific force can be taken as gravity alone.
    ///
    /// Both the filtered and the instantaneous magnitude must lie strictly between
    /// `0.9 g` and `1.1 g`, unless the vehicle is known to be at rest.
    pub fn is_valid(&self) -> bool {
        if !self.enabled || self.horizontal_aiding_active {
            return false;
        }

        self.vehicle_at_rest
            || (Self::is_plausible(self.filtered_accel_norm_sq)
                && Self::is_plausible(self.accel_norm_sq))
    }

    fn is_plausible(norm_sq: T) -> bool {
        let lower = T::ONE_G * T::LOWER_ACCEL_RATIO;
        let upper = T::ONE_G * T::UPPER_ACCEL_RATIO;
        norm_sq > lower * lower && norm_sq < upper * upper
    }
}

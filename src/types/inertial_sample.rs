use crate::types::Vector3;
use minikalman::matrix::MatrixDataType;

/// One integrated IMU sample as delivered to the estimator.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct InertialSample<T> {
    /// Timestamp of the sample, in microseconds.
    pub time_us: u64,
    /// Integrated angular rate over [`delta_ang_dt`](Self::delta_ang_dt), in radians.
    pub delta_ang: Vector3<T>,
    /// Integration period of the delta angle, in seconds.
    pub delta_ang_dt: T,
    /// Integrated specific force over [`delta_vel_dt`](Self::delta_vel_dt), in m/s.
    pub delta_vel: Vector3<T>,
    /// Integration period of the delta velocity, in seconds.
    pub delta_vel_dt: T,
    /// Per-axis accelerometer saturation flags.
    pub delta_vel_clipping: [bool; 3],
}

impl<T> InertialSample<T> {
    /// Determines whether any accelerometer axis saturated during this sample.
    #[inline]
    pub fn is_clipping(&self) -> bool {
        self.delta_vel_clipping.iter().any(|&clipping| clipping)
    }

    /// The average specific force over the sample, in m/s².
    #[inline]
    pub fn specific_force(&self) -> Vector3<T>
    where
        T: MatrixDataType,
    {
        self.delta_vel * self.delta_vel_dt.recip()
    }
}

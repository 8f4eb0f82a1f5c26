//! Diagnostic records of aiding-source fusion attempts.

use crate::num_traits::IsFinite;
use crate::types::Vector3;
use minikalman::matrix::MatrixDataType;

/// The outcome of the last fusion attempt of a three-axis aiding source.
///
/// The record is reset and refilled every cycle; only
/// [`time_last_fuse`](Self::time_last_fuse) carries over between cycles.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AidSource3d<T> {
    /// Timestamp of the sample the observation was taken from, in microseconds.
    pub timestamp_sample: u64,
    pub observation: Vector3<T>,
    pub observation_variance: Vector3<T>,
    pub innovation: Vector3<T>,
    pub innovation_variance: Vector3<T>,
    /// Normalized innovation squared of each axis.
    pub axis_test_ratio: Vector3<T>,
    /// The largest of the per-axis test ratios.
    pub test_ratio: T,
    /// The innovation consistency check failed on at least one axis.
    pub innovation_rejected: bool,
    /// All axes were fused successfully.
    pub fused: bool,
    /// Timestamp of the last complete fusion, in microseconds.
    pub time_last_fuse: u64,
}

impl<T> Default for AidSource3d<T>
where
    T: MatrixDataType,
{
    fn default() -> Self {
        let zero = Vector3::new(T::zero(), T::zero(), T::zero());
        Self {
            timestamp_sample: 0,
            observation: zero,
            observation_variance: zero,
            innovation: zero,
            innovation_variance: zero,
            axis_test_ratio: zero,
            test_ratio: T::zero(),
            innovation_rejected: false,
            fused: false,
            time_last_fuse: 0,
        }
    }
}

impl<T> AidSource3d<T>
where
    T: MatrixDataType,
{
    /// Clears the per-cycle fields, keeping the time of the last fusion.
    pub fn reset(&mut self) {
        let time_last_fuse = self.time_last_fuse;
        *self = Self {
            time_last_fuse,
            ..Self::default()
        };
    }

    /// Computes the test ratios from the stored innovations and decides on rejection.
    ///
    /// An axis fails when its ratio exceeds one, or when the ratio is not a finite,
    /// non-negative number (e.g. due to a non-positive innovation variance).
    pub fn set_test_ratio(&mut self, gate: T)
    where
        T: IsFinite,
    {
        let gate_sq = gate * gate;
        let ratio = |innovation: T, variance: T| innovation * innovation / (gate_sq * variance);

        self.axis_test_ratio = Vector3::new(
            ratio(self.innovation.x, self.innovation_variance.x),
            ratio(self.innovation.y, self.innovation_variance.y),
            ratio(self.innovation.z, self.innovation_variance.z),
        );

        let mut max_ratio = T::zero();
        let mut rejected = false;
        for axis in [
            self.axis_test_ratio.x,
            self.axis_test_ratio.y,
            self.axis_test_ratio.z,
        ] {
            if !axis.is_finite() || axis < T::zero() || axis > T::one() {
                rejected = true;
            }
            if axis > max_ratio {
                max_ratio = axis;
            }
        }

        self.test_ratio = max_ratio;
        self.innovation_rejected = rejected;
    }
}

use crate::estimator::{CovarianceMatrix, NominalState, StateVector, ATTITUDE, STATES};
use crate::num_traits::GravityConstants;
use crate::types::Vector3;
use minikalman::matrix::MatrixDataType;
use minikalman::prelude::*;

/// Innovation, innovation variance and Kalman gains of the three gravity axes, all
/// computed against the same covariance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GravityInnovation<T> {
    pub innovation: Vector3<T>,
    pub innovation_variance: Vector3<T>,
    pub kx: StateVector<T>,
    pub ky: StateVector<T>,
    pub kz: StateVector<T>,
}

/// Linearizes the gravity observation about the current state.
///
/// The predicted observation is the specific force of a vehicle at rest,
/// `Rᵀ · (0, 0, -g)`. The measurement only contributes its direction; it is rescaled to
/// a length of `g` so that the innovation is a pure tilt error. Only the attitude error
/// states enter the observation Jacobian, `H = [p]×`.
///
/// ## Arguments
/// * `state` - The nominal state.
/// * `covariance` - The error-state covariance.
/// * `measurement` - Bias-corrected specific force, in the body frame.
/// * `variance` - Observation variance of each axis.
/// * `epsilon` - Guard against divisions by zero.
pub fn compute_gravity_innovation<T>(
    state: &NominalState<T>,
    covariance: &CovarianceMatrix<T>,
    measurement: Vector3<T>,
    variance: T,
    epsilon: T,
) -> GravityInnovation<T>
where
    T: MatrixDataType + GravityConstants,
{
    let zero = T::zero();
    let gravity = Vector3::new(zero, zero, -T::ONE_G);
    let predicted = state.attitude.rotate_earth_to_body(gravity);

    let norm = measurement.norm();
    let norm = if norm > epsilon { norm } else { epsilon };
    let observed = measurement * (T::ONE_G / norm);

    let jacobian = predicted.skew();
    let p = |row: usize, col: usize| covariance.inspect(|mat| mat.get_at(row, col));

    let mut innovation_variance = [zero; 3];
    let mut gains = [[zero; STATES]; 3];
    for (axis, h) in jacobian.iter().enumerate() {
        let mut s = variance;
        for j in 0..3 {
            for k in 0..3 {
                s = s + h[j] * p(ATTITUDE + j, ATTITUDE + k) * h[k];
            }
        }
        innovation_variance[axis] = s;

        let s_inv = (if s > epsilon { s } else { epsilon }).recip();
        for (row, gain) in gains[axis].iter_mut().enumerate() {
            let mut pht = zero;
            for j in 0..3 {
                pht = pht + p(row, ATTITUDE + j) * h[j];
            }
            *gain = pht * s_inv;
        }
    }

    let [kx, ky, kz] = gains;
    GravityInnovation {
        innovation: observed - predicted,
        innovation_variance: innovation_variance.into(),
        kx,
        ky,
        kz,
    }
}

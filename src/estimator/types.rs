use minikalman::buffers::types::*;
use minikalman::prelude::*;
use minikalman::regular::RegularKalman;

/// The number of error states.
pub const STATES: usize = 15;

/// Offset of the body-frame attitude error (three states).
pub const ATTITUDE: usize = 0;
/// Offset of the NED velocity error (three states).
pub const VELOCITY: usize = 3;
/// Offset of the NED position error (three states).
pub const POSITION: usize = 6;
/// Offset of the gyroscope bias error (three states).
pub const GYRO_BIAS: usize = 9;
/// Offset of the accelerometer bias error (three states).
pub const ACCEL_BIAS: usize = 12;

/// A column over all error states, e.g. a Kalman gain.
pub type StateVector<T> = [T; STATES];

/// The error-state covariance buffer.
pub type CovarianceMatrix<T> = EstimateCovarianceMatrixBuffer<
    STATES,
    T,
    MatrixDataArray<STATES, STATES, { STATES * STATES }, T>,
>;

/// An error-state Kalman filter over all states, using owned buffers.
pub type OwnedKalmanFilter<T> = RegularKalman<
    STATES,
    T,
    StateTransitionMatrixMutBuffer<
        STATES,
        T,
        MatrixDataArray<STATES, STATES, { STATES * STATES }, T>,
    >,
    StateVectorBuffer<STATES, T, MatrixDataArray<STATES, 1, STATES, T>>,
    CovarianceMatrix<T>,
    DirectProcessNoiseCovarianceMatrixMutBuffer<
        STATES,
        T,
        MatrixDataArray<STATES, STATES, { STATES * STATES }, T>,
    >,
    PredictedStateEstimateVectorBuffer<STATES, T, MatrixDataArray<STATES, 1, STATES, T>>,
    TemporaryStateMatrixBuffer<STATES, T, MatrixDataArray<STATES, STATES, { STATES * STATES }, T>>,
>;

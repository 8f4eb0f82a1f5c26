use crate::estimator::types::*;
use crate::estimator::types::StateVector;
use crate::estimator::Ekf;
use crate::parameters::Parameters;
use minikalman::buffers::types::*;
use minikalman::matrix::MatrixDataType;
use minikalman::prelude::*;
use minikalman::regular::RegularKalmanBuilder;

impl<T> Ekf<T>
where
    T: MatrixDataType,
{
    /// Gets a single element of the error-state covariance.
    #[inline]
    pub fn covariance_at(&self, row: usize, col: usize) -> T {
        self.filter
            .estimate_covariance()
            .inspect(|mat| mat.get_at(row, col))
    }

    /// Sets a single element of the error-state covariance.
    ///
    /// Only the given element is changed; callers keeping the matrix symmetric have to set
    /// the transposed element as well.
    #[inline]
    pub fn set_covariance_at(&mut self, row: usize, col: usize, value: T) {
        self.filter
            .estimate_covariance_mut()
            .apply(|mat| mat.set_at(row, col, value));
    }

    /// Restores the initial covariance from the configured variances.
    pub fn reset_covariance(&mut self) {
        let diagonal = Self::initial_variances(&self.params);
        self.filter.estimate_covariance_mut().apply(|mat| {
            for row in 0..STATES {
                for col in 0..STATES {
                    let value = if row == col { diagonal[row] } else { T::zero() };
                    mat.set_at(row, col, value);
                }
            }
        });
    }

    /// Removes all correlations of a state and assigns it a new variance.
    pub(crate) fn uncorrelate_set_variance(&mut self, index: usize, variance: T) {
        self.filter.estimate_covariance_mut().apply(|mat| {
            for other in 0..STATES {
                mat.set_at(index, other, T::zero());
                mat.set_at(other, index, T::zero());
            }
            mat.set_at(index, index, variance);
        });
    }

    /// Replaces the covariance by the mean of itself and its transpose.
    pub(crate) fn force_symmetry(&mut self) {
        let half = (T::one() + T::one()).recip();
        self.filter.estimate_covariance_mut().apply(|mat| {
            for row in 0..STATES {
                for col in (row + 1)..STATES {
                    let mean = (mat.get_at(row, col) + mat.get_at(col, row)) * half;
                    mat.set_at(row, col, mean);
                    mat.set_at(col, row, mean);
                }
            }
        });
    }

    /// Clamps negative variances to zero.
    pub(crate) fn constrain_variances(&mut self) {
        self.filter.estimate_covariance_mut().apply(|mat| {
            for index in 0..STATES {
                if mat.get_at(index, index) < T::zero() {
                    mat.set_at(index, index, T::zero());
                }
            }
        });
    }

    fn initial_variances(params: &Parameters<T>) -> StateVector<T> {
        let mut diagonal = [T::zero(); STATES];
        for axis in 0..3 {
            diagonal[ATTITUDE + axis] = params.initial_attitude_variance;
            diagonal[VELOCITY + axis] = params.initial_velocity_variance;
            diagonal[POSITION + axis] = params.initial_position_variance;
            diagonal[GYRO_BIAS + axis] = params.initial_gyro_bias_variance;
            diagonal[ACCEL_BIAS + axis] = params.initial_accel_bias_variance;
        }
        diagonal
    }

    /// Builds the Kalman filter holding the error-state covariance.
    ///
    /// The error-state vector itself stays zero; corrections are folded into the nominal
    /// state as soon as they are computed.
    pub(crate) fn build_filter(params: &Parameters<T>) -> OwnedKalmanFilter<T> {
        let zero = T::zero();

        // State vector.
        let state_vec =
            StateVectorBuffer::<STATES, T, _>::new(MatrixData::new_array::<STATES, 1, STATES, T>(
                [zero; STATES],
            ));

        // State transition matrix, rebuilt on every prediction.
        let mut state_transition =
            StateTransitionMatrixMutBuffer::<STATES, T, _>::new(MatrixData::new_array::<
                STATES,
                STATES,
                { STATES * STATES },
                T,
            >(
                [zero; { STATES * STATES }]
            ));
        state_transition.make_identity();

        // Estimate covariance matrix.
        let diagonal = Self::initial_variances(params);
        let mut estimate_covariance =
            EstimateCovarianceMatrixBuffer::<STATES, T, _>::new(MatrixData::new_array::<
                STATES,
                STATES,
                { STATES * STATES },
                T,
            >(
                [zero; { STATES * STATES }]
            ));
        estimate_covariance.apply(|mat| {
            for (index, variance) in diagonal.into_iter().enumerate() {
                mat.set_at(index, index, variance);
            }
        });

        // Process noise matrix, rebuilt on every prediction.
        let process_noise = DirectProcessNoiseCovarianceMatrixMutBuffer::<STATES, T, _>::new(
            MatrixData::new_array::<STATES, STATES, { STATES * STATES }, T>(
                [zero; { STATES * STATES }],
            ),
        );

        // Predicted state vector.
        let predicted_state =
            PredictedStateEstimateVectorBuffer::<STATES, T, _>::new(MatrixData::new_array::<
                STATES,
                1,
                STATES,
                T,
            >([zero; STATES]));

        // Temporary estimate covariance matrix.
        let temp_state_matrix =
            TemporaryStateMatrixBuffer::<STATES, T, _>::new(MatrixData::new_array::<
                STATES,
                STATES,
                { STATES * STATES },
                T,
            >(
                [zero; { STATES * STATES }]
            ));

        RegularKalmanBuilder::new::<STATES, T>(
            state_transition,
            state_vec,
            estimate_covariance,
            process_noise,
            predicted_state,
            temp_state_matrix,
        )
    }
}

use crate::estimator::MeasurementUpdate;
use crate::gravity::linearization::GravityInnovation;
use crate::logging::log_debug;
use minikalman::matrix::MatrixDataType;

/// Fuses the X, Y and Z gravity axes one after another.
///
/// Every successful axis corrects the state and covariance before the next one runs; the
/// first failing axis ends the sequence. Returns `true` only if all three axes were fused.
pub fn fuse_axes<T, U>(updater: &mut U, linearized: &GravityInnovation<T>) -> bool
where
    T: MatrixDataType,
    U: MeasurementUpdate<T>,
{
    let axes = [
        ('x', &linearized.kx, linearized.innovation_variance.x, linearized.innovation.x),
        ('y', &linearized.ky, linearized.innovation_variance.y, linearized.innovation.y),
        ('z', &linearized.kz, linearized.innovation_variance.z, linearized.innovation.z),
    ];

    for (axis, gain, innovation_variance, innovation) in axes {
        if !updater.measurement_update(gain, innovation_variance, innovation) {
            log_debug!("Gravity fusion failed on the {} axis", axis);
            return false;
        }
    }

    true
}

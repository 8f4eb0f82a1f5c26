//! Gravity vector aiding for an error-state navigation Extended Kalman Filter.
//!
//! The [`Ekf`] propagates a fifteen-state error covariance with every inertial sample and
//! uses the accelerometer reading as an observation of the gravity vector whenever the
//! vehicle is not accelerating, correcting roll and pitch one axis at a time.
//!
//! ```
//! use ekf_gravity::{Ekf, InertialSample, Parameters, Vector3};
//!
//! let mut ekf = Ekf::<f32>::new(Parameters::default()).unwrap();
//! let sample = InertialSample {
//!     time_us: 4_000,
//!     delta_ang: Vector3::new(0.0, 0.0, 0.0),
//!     delta_ang_dt: 0.004,
//!     delta_vel: Vector3::new(0.0, 0.0, -9.80665 * 0.004),
//!     delta_vel_dt: 0.004,
//!     delta_vel_clipping: [false; 3],
//! };
//!
//! ekf.update(&sample);
//! assert!(ekf.control_status().gravity_vector);
//! assert!(ekf.aid_src_gravity().fused);
//! ```

// Enable no_std mode.
#![cfg_attr(not(any(feature = "std", test)), no_std)]
#![forbid(unsafe_code)]
// Only enables the `doc_cfg` feature when the `docsrs` configuration attribute is defined.
#![cfg_attr(docsrs, feature(doc_cfg))]

mod aid_source;
mod alpha_filter;
mod control_status;
mod estimator;
pub mod gravity;
mod logging;
mod num_traits;
mod parameters;
mod types;

pub use crate::aid_source::AidSource3d;
pub use crate::alpha_filter::AlphaFilter;
pub use crate::control_status::ControlStatus;
pub use crate::estimator::{
    CovarianceMatrix, Ekf, MeasurementUpdate, NominalState, StateVector, ACCEL_BIAS, ATTITUDE,
    GYRO_BIAS, POSITION, STATES, VELOCITY,
};
pub use crate::parameters::{ImuControl, ParameterError, Parameters};
pub use crate::types::*;

pub use crate::num_traits::*;

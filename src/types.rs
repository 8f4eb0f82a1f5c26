mod inertial_sample;
mod quaternion;
mod vector3;

pub use crate::types::inertial_sample::InertialSample;
pub use crate::types::quaternion::Quaternion;
pub use crate::types::vector3::Vector3;

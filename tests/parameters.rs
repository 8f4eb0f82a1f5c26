#![cfg(feature = "serde")]

use ekf_gravity::{Ekf, ImuControl, ParameterError, Parameters};

const TUNING: &str = r#"
gravity_noise = 0.5
gyro_noise = 0.015
accel_noise = 0.35
gyro_bias_p_noise = 0.001
accel_bias_p_noise = 0.003
accel_filter_time_constant = 0.1
initial_attitude_variance = 0.01
initial_velocity_variance = 0.25
initial_position_variance = 1.0
initial_gyro_bias_variance = 0.0001
initial_accel_bias_variance = 0.01

[imu_ctrl]
gyro_bias = true
accel_bias = false
gravity_vector = true
"#;

#[test]
fn tuning_from_toml() {
    let params: Parameters<f32> = toml::from_str(TUNING).expect("valid TOML");

    assert_eq!(params.gravity_noise, 0.5);
    assert_eq!(
        params.imu_ctrl,
        ImuControl::from_bits(ImuControl::GYRO_BIAS | ImuControl::GRAVITY_VECTOR)
    );
    assert_eq!(params.validate(), Ok(()));

    let ekf = Ekf::new(params).expect("valid parameters");
    assert_eq!(ekf.parameters().gravity_noise, 0.5);
}

#[test]
fn rejected_tuning_from_toml() {
    let tuning = TUNING.replace(
        "accel_filter_time_constant = 0.1",
        "accel_filter_time_constant = -0.1",
    );
    let params: Parameters<f64> = toml::from_str(&tuning).expect("valid TOML");

    assert_eq!(params.validate(), Err(ParameterError::NonPositiveTimeConstant));
    assert!(Ekf::new(params).is_err());
}

#[test]
fn default_tuning_round_trips() {
    let params = Parameters::<f64>::default();
    let text = toml::to_string(&params).expect("serializable");
    let parsed: Parameters<f64> = toml::from_str(&text).expect("valid TOML");
    assert_eq!(parsed, params);
}

#[test]
fn error_messages_name_the_parameter() {
    let error = ParameterError::Negative {
        name: "gyro_noise",
    };
    assert_eq!(error.to_string(), "gyro_noise must not be negative");
}

use approx::{assert_abs_diff_eq, assert_relative_eq};
use ekf_gravity::{
    Ekf, ImuControl, InertialSample, Parameters, Quaternion, Vector3, ATTITUDE, GYRO_BIAS,
    STATES, VELOCITY,
};

const G: f64 = 9.80665;
const DT: f64 = 0.004;
const DT_US: u64 = 4_000;

fn sample(time_us: u64, specific_force: Vector3<f64>) -> InertialSample<f64> {
    InertialSample {
        time_us,
        delta_ang: Vector3::new(0.0, 0.0, 0.0),
        delta_ang_dt: DT,
        delta_vel: specific_force * DT,
        delta_vel_dt: DT,
        delta_vel_clipping: [false; 3],
    }
}

fn level() -> Vector3<f64> {
    Vector3::new(0.0, 0.0, -G)
}

/// Specific force measured at rest with the given roll angle.
fn rolled(roll: f64) -> Vector3<f64> {
    Vector3::new(0.0, -G * roll.sin(), -G * roll.cos())
}

fn ekf_with(params: Parameters<f64>) -> Ekf<f64> {
    Ekf::new(params).expect("valid parameters")
}

fn ekf() -> Ekf<f64> {
    ekf_with(Parameters::default())
}

/// Runs the gravity fusion alone on a sample, with a primed accelerometer filter.
fn fuse(ekf: &mut Ekf<f64>, imu: &InertialSample<f64>) {
    ekf.update_accel_filter(imu);
    ekf.control_gravity_fusion(imu);
}

fn covariance_snapshot(ekf: &Ekf<f64>) -> Vec<f64> {
    let mut values = Vec::with_capacity(STATES * STATES);
    for row in 0..STATES {
        for col in 0..STATES {
            values.push(ekf.covariance_at(row, col));
        }
    }
    values
}

/// Cosine of the angle between the body z axis and the earth down axis.
fn cos_tilt(ekf: &Ekf<f64>) -> f64 {
    ekf.state()
        .attitude
        .rotate_body_to_earth(Vector3::new(0.0, 0.0, 1.0))
        .z
}

#[test]
fn stationary_level_vehicle_fuses() {
    let mut ekf = ekf();
    let imu = sample(1_000, level());
    fuse(&mut ekf, &imu);

    let status = ekf.aid_src_gravity();
    assert!(ekf.control_status().gravity_vector);
    assert!(!status.innovation_rejected);
    assert!(status.fused);
    assert_eq!(status.time_last_fuse, 1_000);
    assert_eq!(status.timestamp_sample, 1_000);
    assert!(status.test_ratio < 1e-12);
}

#[test]
fn high_acceleration_is_not_fused() {
    let mut ekf = ekf();

    // Sustained 2 g in total: gravity plus a lateral push of sqrt(3) g.
    let imu = sample(2_000, Vector3::new(3.0_f64.sqrt() * G, 0.0, -G));
    let covariance_before = covariance_snapshot(&ekf);
    let state_before = *ekf.state();

    fuse(&mut ekf, &imu);

    let status = ekf.aid_src_gravity();
    assert!(!ekf.control_status().gravity_vector);
    assert!(!status.fused);
    assert_eq!(status.time_last_fuse, 0);
    assert_eq!(covariance_snapshot(&ekf), covariance_before);
    assert_eq!(*ekf.state(), state_before);

    // The status is filled even though nothing was fused.
    assert_eq!(status.timestamp_sample, 2_000);
    assert_relative_eq!(status.observation.norm(), 2.0 * G, max_relative = 1e-9);
    assert_eq!(status.observation_variance, Vector3::new(1.0, 1.0, 1.0));
    assert_relative_eq!(status.innovation.x, 3.0_f64.sqrt() / 2.0 * G, max_relative = 1e-9);
    assert_relative_eq!(status.innovation.z, G / 2.0, max_relative = 1e-9);
    assert!(status.innovation_variance.x > 1.0);
}

#[test]
fn inconsistent_innovation_is_rejected() {
    let mut ekf = ekf();
    for axis in 0..3 {
        ekf.set_covariance_at(ATTITUDE + axis, ATTITUDE + axis, 0.0);
    }
    let state_before = *ekf.state();

    // Innovation of 2 m/s² on Y against an innovation variance of 1 (m/s²)².
    let imu = sample(3_000, Vector3::new(0.0, 2.0, -(G * G - 4.0).sqrt()));
    fuse(&mut ekf, &imu);

    let status = ekf.aid_src_gravity();
    assert!(ekf.control_status().gravity_vector);
    assert_relative_eq!(status.innovation.y, 2.0, max_relative = 1e-9);
    assert_relative_eq!(status.test_ratio, 4.0, max_relative = 1e-9);
    assert!(status.innovation_rejected);
    assert!(!status.fused);
    assert_eq!(*ekf.state(), state_before);
}

#[test]
fn clipping_axis_prevents_fusion() {
    let mut ekf = ekf();
    let mut imu = sample(4_000, level());
    imu.delta_vel_clipping = [false, false, true];
    let covariance_before = covariance_snapshot(&ekf);

    fuse(&mut ekf, &imu);

    let status = ekf.aid_src_gravity();
    assert!(ekf.control_status().gravity_vector);
    assert!(!status.innovation_rejected);
    assert!(!status.fused);
    assert_eq!(status.time_last_fuse, 0);
    assert_eq!(covariance_snapshot(&ekf), covariance_before);
}

#[test]
fn failed_x_update_stops_the_sequence() {
    let mut ekf = ekf();

    // A pitch error strongly correlated with an almost certain north velocity: the X axis
    // update would drive the velocity variance negative.
    ekf.set_covariance_at(VELOCITY, VELOCITY, 1e-6);
    ekf.set_covariance_at(VELOCITY, ATTITUDE + 1, 0.1);
    ekf.set_covariance_at(ATTITUDE + 1, VELOCITY, 0.1);

    let imu = sample(5_000, rolled(2.0_f64.to_radians()));
    fuse(&mut ekf, &imu);

    let status = ekf.aid_src_gravity();
    assert!(ekf.control_status().gravity_vector);
    assert!(!status.innovation_rejected);
    assert!(!status.fused);
    assert_eq!(status.time_last_fuse, 0);

    assert_eq!(ekf.state().attitude, Quaternion::identity());
    assert_eq!(ekf.covariance_at(VELOCITY, VELOCITY), 0.0);
    assert_eq!(ekf.covariance_at(VELOCITY, ATTITUDE + 1), 0.0);

    // The Y axis would have reduced the roll variance.
    assert_eq!(ekf.covariance_at(ATTITUDE, ATTITUDE), 0.01);
}

#[test]
fn rest_overrides_acceleration_check() {
    let mut ekf = ekf();
    ekf.control_status_mut().vehicle_at_rest = true;

    fuse(&mut ekf, &sample(6_000, Vector3::new(0.0, 0.0, -2.0 * G)));
    assert!(ekf.control_status().gravity_vector);
    assert!(ekf.aid_src_gravity().fused);
    assert_eq!(ekf.aid_src_gravity().time_last_fuse, 6_000);
}

#[test]
fn rest_does_not_override_disabled_fusion() {
    let params = Parameters {
        imu_ctrl: ImuControl {
            gravity_vector: false,
            ..ImuControl::default()
        },
        ..Parameters::default()
    };
    let mut ekf = ekf_with(params);
    ekf.control_status_mut().vehicle_at_rest = true;

    fuse(&mut ekf, &sample(7_000, level()));
    assert!(!ekf.control_status().gravity_vector);
    assert!(!ekf.aid_src_gravity().fused);
}

#[test]
fn horizontal_aiding_suppresses_fusion() {
    let mut ekf = ekf();
    ekf.control_status_mut().vehicle_at_rest = true;
    ekf.control_status_mut().gps = true;

    fuse(&mut ekf, &sample(8_000, level()));
    assert!(!ekf.control_status().gravity_vector);
    assert!(!ekf.aid_src_gravity().fused);

    ekf.control_status_mut().gps = false;
    ekf.control_status_mut().ev_vel = true;
    fuse(&mut ekf, &sample(12_000, level()));
    assert!(!ekf.control_status().gravity_vector);
}

#[test]
fn gravity_flag_is_rewritten_every_cycle() {
    let mut ekf = ekf();
    fuse(&mut ekf, &sample(1_000, level()));
    assert!(ekf.control_status().gravity_vector);

    fuse(&mut ekf, &sample(2_000, Vector3::new(0.0, 0.0, -3.0 * G)));
    assert!(!ekf.control_status().gravity_vector);
    assert!(!ekf.aid_src_gravity().fused);
    assert_eq!(ekf.aid_src_gravity().timestamp_sample, 2_000);
    assert_eq!(ekf.aid_src_gravity().time_last_fuse, 1_000);
}

#[test]
fn observation_variance_is_floored() {
    for gravity_noise in [0.0, -0.5e-3, 1e-9] {
        let mut ekf = ekf_with(Parameters {
            gravity_noise,
            ..Parameters::default()
        });
        fuse(&mut ekf, &sample(1_000, level()));

        let variance = ekf.aid_src_gravity().observation_variance;
        assert_relative_eq!(variance.x, 1e-4, max_relative = 1e-12);
        assert_eq!(variance.x, variance.y);
        assert_eq!(variance.y, variance.z);
    }
}

#[test]
fn fusion_is_deterministic() {
    let mut first = ekf();
    let mut second = ekf();

    for step in 1..=50 {
        let imu = sample(step * DT_US, rolled(0.02));
        first.update(&imu);
        second.update(&imu);
    }

    assert_eq!(first.aid_src_gravity(), second.aid_src_gravity());
    assert_eq!(first.state(), second.state());
    assert_eq!(covariance_snapshot(&first), covariance_snapshot(&second));
}

#[test]
fn tilt_converges_to_accelerometer() {
    let mut ekf = ekf();
    let half = 2.5_f64.to_radians();
    ekf.set_attitude(Quaternion::new(half.cos(), half.sin(), 0.0, 0.0));
    assert!(cos_tilt(&ekf) < 4.9_f64.to_radians().cos());

    for step in 1..=200 {
        ekf.update(&sample(step * DT_US, level()));
    }

    assert!(cos_tilt(&ekf) > 1.0_f64.to_radians().cos());
    assert_eq!(ekf.aid_src_gravity().time_last_fuse, 200 * DT_US);
}

#[test]
fn inhibited_gyro_bias_is_not_learned() {
    let mut ekf = ekf_with(Parameters {
        imu_ctrl: ImuControl {
            gyro_bias: false,
            ..ImuControl::default()
        },
        ..Parameters::default()
    });
    let half = 2.5_f64.to_radians();
    ekf.set_attitude(Quaternion::new(half.cos(), 0.0, half.sin(), 0.0));

    for step in 1..=100 {
        ekf.update(&sample(step * DT_US, level()));
    }

    assert!(ekf.aid_src_gravity().fused);
    assert_eq!(ekf.state().gyro_bias, Vector3::new(0.0, 0.0, 0.0));
    assert!(ekf.covariance_at(GYRO_BIAS, GYRO_BIAS) > 0.0);
}

#[test]
fn invalid_sample_is_dropped() {
    let mut ekf = ekf();
    let mut imu = sample(1_000, level());
    imu.delta_vel_dt = 0.0;

    ekf.update(&imu);
    assert!(!ekf.control_status().gravity_vector);
    assert_eq!(ekf.aid_src_gravity().timestamp_sample, 0);
}

#[test]
fn invalid_sample_clears_gravity_flag() {
    let mut ekf = ekf();
    ekf.update(&sample(DT_US, level()));
    assert!(ekf.control_status().gravity_vector);
    assert!(ekf.aid_src_gravity().fused);

    let mut imu = sample(2 * DT_US, level());
    imu.delta_ang_dt = 0.0;
    ekf.update(&imu);

    assert!(!ekf.control_status().gravity_vector);
    assert_eq!(ekf.aid_src_gravity().timestamp_sample, DT_US);
    assert_eq!(ekf.aid_src_gravity().time_last_fuse, DT_US);
}

#[test]
fn coarse_alignment_survives_acceleration_burst() {
    let mut ekf = ekf_with(Parameters {
        initial_attitude_variance: 0.1,
        ..Parameters::default()
    });

    let roll = 10.0_f64.to_radians();
    let at_rest = rolled(roll);
    let pushed = at_rest + Vector3::new(1.5 * G, 0.0, 0.0);
    let tilt_error_cos = |ekf: &Ekf<f64>| {
        ekf.state()
            .attitude
            .rotate_body_to_earth(Vector3::new(0.0, roll.sin(), roll.cos()))
            .z
    };

    ekf.update(&sample(DT_US, at_rest));
    assert!(ekf.aid_src_gravity().test_ratio <= 1.0);
    assert!(ekf.aid_src_gravity().fused);

    for step in 2..=250 {
        ekf.update(&sample(step * DT_US, at_rest));
    }
    assert!(tilt_error_cos(&ekf) > 1.0_f64.to_radians().cos());

    let mut gated = 0;
    for step in 251..=375 {
        ekf.update(&sample(step * DT_US, pushed));
        assert!(!ekf.aid_src_gravity().fused);
        if !ekf.control_status().gravity_vector {
            gated += 1;
        }
    }
    assert!(gated > 100);

    for step in 376..=1_000 {
        ekf.update(&sample(step * DT_US, at_rest));
    }
    assert!(ekf.aid_src_gravity().fused);
    assert_eq!(ekf.aid_src_gravity().time_last_fuse, 1_000 * DT_US);
    assert!(tilt_error_cos(&ekf) > 1.0_f64.to_radians().cos());
}

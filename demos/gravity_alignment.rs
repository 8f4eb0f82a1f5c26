//! Aligns a level-initialized estimator with a coarse attitude uncertainty to a tilted,
//! stationary IMU and shows the gravity validity gate holding off fusion during an
//! acceleration burst.
//!
//! Run with `cargo run --example gravity_alignment --features std,tracing`.

use ekf_gravity::{Ekf, InertialSample, Parameters, Vector3};
use tracing::info;

const G: f32 = 9.80665;
const RATE_HZ: u64 = 250;

fn main() -> Result<(), ekf_gravity::ParameterError> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    // About 18° of initial tilt uncertainty, so a 10° misalignment passes the innovation gate.
    let mut ekf = Ekf::<f32>::new(Parameters {
        initial_attitude_variance: 0.1,
        ..Parameters::default()
    })?;

    let dt = 1.0 / RATE_HZ as f32;
    let roll = 10.0_f32.to_radians();
    let at_rest = Vector3::new(0.0, -G * roll.sin(), -G * roll.cos());
    let pushed = at_rest + Vector3::new(1.5 * G, 0.0, 0.0);

    let mut fused = 0;
    let mut gated = 0;
    for step in 1..=(4 * RATE_HZ) {
        // Half a second of strong forward acceleration after one second.
        let specific_force = if (RATE_HZ..RATE_HZ + RATE_HZ / 2).contains(&step) {
            pushed
        } else {
            at_rest
        };

        let sample = InertialSample {
            time_us: step * 1_000_000 / RATE_HZ,
            delta_ang: Vector3::new(0.0, 0.0, 0.0),
            delta_ang_dt: dt,
            delta_vel: specific_force * dt,
            delta_vel_dt: dt,
            delta_vel_clipping: [false; 3],
        };
        ekf.update(&sample);

        let status = ekf.aid_src_gravity();
        if status.fused {
            fused += 1;
        }
        if !ekf.control_status().gravity_vector {
            gated += 1;
        }

        if step % (RATE_HZ / 2) == 0 {
            let up = ekf
                .state()
                .attitude
                .rotate_body_to_earth(Vector3::new(0.0, -roll.sin(), -roll.cos()));
            let error = (-up.z).clamp(-1.0, 1.0).acos().to_degrees();
            info!(
                "t = {:.1} s, tilt error {:.2}°, test ratio {:.3}, fused {}, gated {}",
                step as f32 * dt,
                error,
                status.test_ratio,
                fused,
                gated
            );
        }
    }

    Ok(())
}

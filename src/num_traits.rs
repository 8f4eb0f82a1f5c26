/// Determines whether a value is neither infinite nor NaN.
pub trait IsFinite {
    fn is_finite(self) -> bool;
}

/// Constants of the gravity observation, per scalar type.
pub trait GravityConstants {
    /// Standard gravity, in m/s².
    const ONE_G: Self;

    /// Lower bound of a plausible gravity-only acceleration, as a fraction of
    /// [`ONE_G`](Self::ONE_G).
    const LOWER_ACCEL_RATIO: Self;

    /// Upper bound of a plausible gravity-only acceleration, as a fraction of
    /// [`ONE_G`](Self::ONE_G).
    const UPPER_ACCEL_RATIO: Self;

    /// The smallest gravity observation noise, in m/s², ever used for fusion.
    const MIN_GRAVITY_NOISE: Self;

    /// Innovation consistency gate of the gravity observation, in standard deviations.
    const INNOVATION_GATE: Self;

    /// Division guard, i.e. the machine epsilon of the type.
    const EPSILON: Self;
}

impl IsFinite for f32 {
    #[inline(always)]
    fn is_finite(self) -> bool {
        f32::is_finite(self)
    }
}

impl IsFinite for f64 {
    #[inline(always)]
    fn is_finite(self) -> bool {
        f64::is_finite(self)
    }
}

impl GravityConstants for f32 {
    const ONE_G: f32 = 9.80665;
    const LOWER_ACCEL_RATIO: f32 = 0.9;
    const UPPER_ACCEL_RATIO: f32 = 1.1;
    const MIN_GRAVITY_NOISE: f32 = 0.01;
    const INNOVATION_GATE: f32 = 1.0;
    const EPSILON: f32 = f32::EPSILON;
}

impl GravityConstants for f64 {
    const ONE_G: f64 = 9.80665;
    const LOWER_ACCEL_RATIO: f64 = 0.9;
    const UPPER_ACCEL_RATIO: f64 = 1.1;
    const MIN_GRAVITY_NOISE: f64 = 0.01;
    const INNOVATION_GATE: f64 = 1.0;
    const EPSILON: f64 = f64::EPSILON;
}

use crate::types::Vector3;
use minikalman::matrix::MatrixDataType;

/// A first-order low-pass filter over a three-axis signal.
///
/// The filter coefficient is derived from the sample interval and the time constant on
/// every update, so irregular sample rates are handled.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AlphaFilter<T> {
    time_constant: T,
    state: Option<Vector3<T>>,
}

impl<T> AlphaFilter<T> {
    /// Initializes a new, empty [`AlphaFilter`] instance.
    ///
    /// ## Arguments
    /// * `time_constant` - The filter time constant, in seconds.
    pub const fn new(time_constant: T) -> Self {
        Self {
            time_constant,
            state: None,
        }
    }

    /// Forgets the filtered value; the next sample initializes the filter again.
    pub fn reset(&mut self) {
        self.state = None;
    }

    /// Gets the filtered value, if any sample was seen yet.
    pub fn state(&self) -> Option<Vector3<T>>
    where
        T: Copy,
    {
        self.state
    }
}

impl<T> AlphaFilter<T>
where
    T: MatrixDataType,
{
    /// Feeds a sample into the filter and returns the new filtered value.
    pub fn update(&mut self, sample: Vector3<T>, dt: T) -> Vector3<T> {
        let filtered = match self.state {
            None => sample,
            Some(state) => {
                let alpha = self.alpha(dt);
                state + (sample - state) * alpha
            }
        };

        self.state = Some(filtered);
        filtered
    }

    /// Gets the squared length of the filtered value, or zero if the filter is empty.
    pub fn norm_sq(&self) -> T {
        self.state.map_or(T::zero(), |state| state.norm_sq())
    }

    fn alpha(&self, dt: T) -> T {
        let denominator = dt + self.time_constant;
        if dt <= T::zero() || denominator <= T::zero() {
            return T::zero();
        }

        let alpha = dt / denominator;
        if alpha > T::one() {
            T::one()
        } else {
            alpha
        }
    }
}

use crate::types::Vector3;
use core::fmt::{Debug, Formatter};
use core::ops::Mul;
use minikalman::matrix::MatrixDataType;
use uniform_array_derive::UniformArray;

/// A unit quaternion in `(w, x, y, z)` order describing the rotation from the body frame
/// into the earth (NED) frame.
#[derive(UniformArray, Copy)]
#[cfg_attr(test, ensure_uniform_type::ensure_uniform_type)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(C)]
pub struct Quaternion<T> {
    pub w: T,
    pub x: T,
    pub y: T,
    pub z: T,
}

impl<T> Quaternion<T> {
    /// Initializes a new [`Quaternion`] instance.
    #[inline(always)]
    pub const fn new(w: T, x: T, y: T, z: T) -> Self {
        Self { w, x, y, z }
    }

    /// The identity rotation.
    #[inline]
    pub fn identity() -> Self
    where
        T: MatrixDataType,
    {
        Self::new(T::one(), T::zero(), T::zero(), T::zero())
    }

    /// Builds the rotation for a small rotation vector (axis times angle, in radians).
    ///
    /// This is the first-order expansion `[1, θ/2]`, normalized. It is exact to second
    /// order in the angle, which is plenty for per-sample delta angles and error-state
    /// corrections.
    pub fn from_rotation_vector(rotation: Vector3<T>) -> Self
    where
        T: MatrixDataType,
    {
        let half = (T::one() + T::one()).recip();
        Self::new(
            T::one(),
            rotation.x * half,
            rotation.y * half,
            rotation.z * half,
        )
        .normalized()
    }

    /// Returns the normalized quaternion with a non-negative scalar part.
    pub fn normalized(&self) -> Self
    where
        T: MatrixDataType,
    {
        let (w, x, y, z) = if self.w >= T::zero() {
            (self.w, self.x, self.y, self.z)
        } else {
            (-self.w, -self.x, -self.y, -self.z)
        };

        let norm_sq = w * w + x * x + y * y + z * z;
        let norm_inv = norm_sq.square_root().recip();
        Self::new(w * norm_inv, x * norm_inv, y * norm_inv, z * norm_inv)
    }

    /// Returns the direction cosine matrix, i.e. the rotation from body into earth frame.
    pub fn to_rotation_matrix(&self) -> [[T; 3]; 3]
    where
        T: MatrixDataType,
    {
        let (q0, q1, q2, q3) = (self.w, self.x, self.y, self.z);
        let one = T::one();
        let two = one + one;

        [
            [
                one - two * (q2 * q2 + q3 * q3),
                two * (q1 * q2 - q0 * q3),
                two * (q1 * q3 + q0 * q2),
            ],
            [
                two * (q1 * q2 + q0 * q3),
                one - two * (q1 * q1 + q3 * q3),
                two * (q2 * q3 - q0 * q1),
            ],
            [
                two * (q1 * q3 - q0 * q2),
                two * (q2 * q3 + q0 * q1),
                one - two * (q1 * q1 + q2 * q2),
            ],
        ]
    }

    /// Rotates a body-frame vector into the earth frame.
    pub fn rotate_body_to_earth(&self, vec: Vector3<T>) -> Vector3<T>
    where
        T: MatrixDataType,
    {
        let r = self.to_rotation_matrix();
        Vector3::new(
            r[0][0] * vec.x + r[0][1] * vec.y + r[0][2] * vec.z,
            r[1][0] * vec.x + r[1][1] * vec.y + r[1][2] * vec.z,
            r[2][0] * vec.x + r[2][1] * vec.y + r[2][2] * vec.z,
        )
    }

    /// Rotates an earth-frame vector into the body frame.
    pub fn rotate_earth_to_body(&self, vec: Vector3<T>) -> Vector3<T>
    where
        T: MatrixDataType,
    {
        let r = self.to_rotation_matrix();
        Vector3::new(
            r[0][0] * vec.x + r[1][0] * vec.y + r[2][0] * vec.z,
            r[0][1] * vec.x + r[1][1] * vec.y + r[2][1] * vec.z,
            r[0][2] * vec.x + r[1][2] * vec.y + r[2][2] * vec.z,
        )
    }
}

/// Implements the Hamilton product.
impl<T> Mul<Quaternion<T>> for Quaternion<T>
where
    T: MatrixDataType,
{
    type Output = Quaternion<T>;

    fn mul(self, rhs: Quaternion<T>) -> Self::Output {
        let (a, b) = (self, rhs);
        Quaternion::new(
            a.w * b.w - a.x * b.x - a.y * b.y - a.z * b.z,
            a.w * b.x + a.x * b.w + a.y * b.z - a.z * b.y,
            a.w * b.y - a.x * b.z + a.y * b.w + a.z * b.x,
            a.w * b.z + a.x * b.y - a.y * b.x + a.z * b.w,
        )
    }
}

impl<T> Clone for Quaternion<T>
where
    T: Clone,
{
    fn clone(&self) -> Self {
        Self {
            w: self.w.clone(),
            x: self.x.clone(),
            y: self.y.clone(),
            z: self.z.clone(),
        }
    }
}

impl<T> PartialEq for Quaternion<T>
where
    T: PartialEq,
{
    fn eq(&self, other: &Self) -> bool {
        self.w == other.w && self.x == other.x && self.y == other.y && self.z == other.z
    }
}

impl<T> Debug for Quaternion<T>
where
    T: Debug,
{
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        f.debug_tuple("Quaternion")
            .field(&self.w)
            .field(&self.x)
            .field(&self.y)
            .field(&self.z)
            .finish()
    }
}

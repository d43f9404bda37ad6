use std::fmt::{Debug, Display};
use std::hash::Hash;

use nalgebra::{RealField, SVector};
use num_traits::{Bounded, CheckedAdd, CheckedMul, CheckedSub, FromPrimitive, ToPrimitive};

/// Convenience trait for types that can be shared between threads
pub trait ThreadSafe: Sync + Send + 'static {}
impl<T> ThreadSafe for T where T: Sync + Send + 'static {}

/// Trait for integer types used to index grid cells, ensures checked arithmetic is available
pub trait Index:
    Copy
    + Hash
    + num_integer::Integer
    + Bounded
    + CheckedAdd
    + CheckedSub
    + CheckedMul
    + FromPrimitive
    + ToPrimitive
    + Debug
    + Display
    + ThreadSafe
{
    /// Converts the index to a real value, returns `None` if it cannot be represented
    fn to_real<R: Real>(self) -> Option<R> {
        R::from_f64(self.to_f64()?)
    }
}

impl<T> Index for T where
    T: Copy
        + Hash
        + num_integer::Integer
        + Bounded
        + CheckedAdd
        + CheckedSub
        + CheckedMul
        + FromPrimitive
        + ToPrimitive
        + Debug
        + Display
        + ThreadSafe
{
}

/// Trait for real types used for coordinates and scalar field values
pub trait Real: RealField + Copy + FromPrimitive + ToPrimitive + Debug + ThreadSafe {
    /// Tries to convert this value to another real type, returns `None` if conversion fails
    fn try_convert<T: Real>(self) -> Option<T> {
        T::from_f64(self.to_f64()?)
    }

    /// Tries to convert a vector component-wise to another real type, returns `None` if any component fails
    fn try_convert_vec_from<R, const D: usize>(vec: &SVector<R, D>) -> Option<SVector<Self, D>>
    where
        R: Real,
    {
        let mut converted = SVector::<Self, D>::zeros();
        for i in 0..D {
            converted[i] = vec[i].try_convert()?;
        }
        Some(converted)
    }

    /// Converts this value to the given index type, returns `None` if it cannot be represented
    fn to_index<I: Index>(self) -> Option<I> {
        I::from_f64(self.to_f64()?)
    }
}

impl<T: RealField + Copy + FromPrimitive + ToPrimitive + Debug + ThreadSafe> Real for T {}

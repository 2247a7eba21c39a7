use num_traits::{Float, FromPrimitive, NumAssignOps, NumOps};
use std::fmt::Debug;

/// Any value that can be stored in a `Tensor`.
///
/// Index tensors (`Tensor<i64>`) only need this bound; arithmetic kernels
/// require [`Numeric`].
pub trait Element: Copy + Debug + PartialEq + Send + Sync + 'static {}

impl<T> Element for T where T: Copy + Debug + PartialEq + Send + Sync + 'static {}

/// A trait representing numeric types usable in reduction kernels.
///
/// Reserved for floating point types (`f32`, `f64`): `Mean` divides in the
/// tensor's own type and selections compare with `PartialOrd`.
pub trait Numeric:
    Float // Includes Num + Copy + Bounded + Signed + etc.
    + NumAssignOps
    + NumOps
    + FromPrimitive // usize element counts -> T for Mean
    + PartialOrd
    + Element
{
}

impl Numeric for f32 {}
impl Numeric for f64 {}

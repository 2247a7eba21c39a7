// In-place kernels. The public entry points live in
// `tensor/inplace_arithmetic_methods.rs`.

pub(crate) mod div_scalar;
pub(crate) mod fill;
pub(crate) mod scatter;

//! # Operations Module (`ops`)
//!
//! - [`reduction`]: the differentiable reduction and selection nodes
//!   (sum, mean, max, min, mode, median). Each node implements
//!   [`Function`](crate::autograd::Function): it captures what it needs during
//!   `forward` and turns an upstream gradient into an input gradient in
//!   `backward`.
//! - [`traits`]: numeric bounds shared by the tensor kernels.

pub mod reduction;
pub mod traits;

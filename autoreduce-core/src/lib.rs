//! Reverse-mode differentiable reductions over N-dimensional tensors.
//!
//! Every operator is a node with a `forward`/`backward` pair (see
//! [`autograd::Function`]). Sum and Mean broadcast the upstream gradient back
//! over the collapsed axis; Max, Min, Mode and Median remember which input
//! positions they selected and route gradient to those positions only.

pub mod autograd;
pub mod error;
pub mod ops;
pub mod tensor;
pub mod tensor_data;
pub mod utils;

pub use autograd::{Function, FunctionOutput};
pub use error::AutoReduceError;
pub use ops::reduction::{DimReduce, ReductionFunction, Selection};
pub use tensor::Tensor;
// Re-export traits required by public functions/structs
pub use num_traits;

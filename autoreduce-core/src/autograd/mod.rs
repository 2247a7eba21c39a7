//! The node contract shared by every differentiable reduction.
//!
//! Graph construction, topological execution and gradient accumulation across
//! consumers belong to the engine driving these nodes, not to this crate.

pub mod function;
pub mod grad_check;

pub use function::{Function, FunctionCtx, FunctionOutput};

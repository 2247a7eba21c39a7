// src/ops/reduction/mod.rs
// Differentiable reduction nodes: Sum/Mean collapse an axis, Max/Min/Mode/Median
// select an element of it.

pub mod dim_reduce;
pub mod dispatch;
pub mod selection;

pub use dim_reduce::{mean, sum, DimReduce, ReduceKind};
pub use dispatch::ReductionFunction;
pub use selection::{max, median, min, mode, Selection, SelectionKind};

use crate::error::AutoReduceError;
use crate::ops::traits::Element;
use crate::tensor::Tensor;
use std::fmt::Debug;

/// What a node's forward pass hands back to the engine.
#[derive(Debug, Clone)]
pub enum FunctionOutput<T: Element> {
    /// The reduced or selected values alone.
    Single(Tensor<T>),
    /// Values plus the positions they were selected from. `indices` has the
    /// shape of `values` and is non-differentiable.
    WithIndices {
        values: Tensor<T>,
        indices: Tensor<i64>,
    },
}

impl<T: Element> FunctionOutput<T> {
    pub fn values(&self) -> &Tensor<T> {
        match self {
            FunctionOutput::Single(values) => values,
            FunctionOutput::WithIndices { values, .. } => values,
        }
    }

    pub fn indices(&self) -> Option<&Tensor<i64>> {
        match self {
            FunctionOutput::Single(_) => None,
            FunctionOutput::WithIndices { indices, .. } => Some(indices),
        }
    }

    pub fn into_values(self) -> Tensor<T> {
        match self {
            FunctionOutput::Single(values) => values,
            FunctionOutput::WithIndices { values, .. } => values,
        }
    }
}

/// Defines the interface of a differentiable node.
///
/// The engine calls `forward` once per evaluation, then `backward` at most once
/// with the gradient accumulated from every consumer of the node's output.
/// Both calls take `&mut self` because the node captures state in `forward`
/// (input shape, selected positions) and consumes it in `backward`.
///
/// The trait is object safe so an engine can hold `Box<dyn Function<T>>`.
pub trait Function<T: Element>: Debug + Send + Sync {
    /// Operator name used in logs and error messages.
    fn name(&self) -> &'static str;

    /// Computes the node's output from `input`.
    ///
    /// # Errors
    /// `StatePrecondition` if a previous forward has not been consumed by
    /// `backward` yet; otherwise whatever the tensor primitives report.
    fn forward(&mut self, input: &Tensor<T>) -> Result<FunctionOutput<T>, AutoReduceError>;

    /// Computes dL/dInput from dL/dOutput. The result always has the shape
    /// recorded by `forward` and is freshly allocated.
    ///
    /// # Errors
    /// `StatePrecondition` when called before `forward` or a second time.
    fn backward(&mut self, grad_output: &Tensor<T>) -> Result<Tensor<T>, AutoReduceError>;
}

/// Per-node context for tensors kept between forward and backward.
#[derive(Debug, Default)]
pub struct FunctionCtx {
    saved_indices: Vec<Tensor<i64>>,
    non_differentiable: usize,
}

impl FunctionCtx {
    pub fn new() -> Self {
        Self::default()
    }

    /// Keeps `tensor` alive until `take_saved_indices`.
    pub fn save_for_backward(&mut self, tensor: Tensor<i64>) {
        self.saved_indices.push(tensor);
    }

    /// Hands the saved tensors to the backward pass, leaving the slot empty.
    pub fn take_saved_indices(&mut self) -> Vec<Tensor<i64>> {
        std::mem::take(&mut self.saved_indices)
    }

    pub fn has_saved(&self) -> bool {
        !self.saved_indices.is_empty()
    }

    /// Flags an output that gradients must never flow through.
    pub fn mark_non_differentiable<U: Element>(&mut self, tensor: &Tensor<U>) {
        tensor.set_requires_grad(false);
        self.non_differentiable += 1;
    }

    /// How many outputs have been marked non-differentiable.
    pub fn non_differentiable_count(&self) -> usize {
        self.non_differentiable
    }
}

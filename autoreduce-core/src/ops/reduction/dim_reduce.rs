use crate::autograd::{Function, FunctionOutput};
use crate::error::AutoReduceError;
use crate::ops::traits::Numeric;
use crate::tensor::utils::validate_axis;
use crate::tensor::{create, Tensor};
use log::debug;

/// Which algebraic aggregate a [`DimReduce`] node computes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReduceKind {
    Sum,
    Mean,
}

impl ReduceKind {
    pub fn name(self) -> &'static str {
        match self {
            ReduceKind::Sum => "sum",
            ReduceKind::Mean => "mean",
        }
    }
}

/// Sum or Mean over the whole tensor (`dim == None`) or along one axis.
///
/// Forward output shapes:
/// - `dim == None`: `[1]`, the aggregate wrapped as a 1-element tensor.
/// - `dim == Some(d)`: the input shape with axis `d` collapsed to 1.
///
/// Backward spreads the upstream gradient over every contributing element:
/// unscaled for Sum, divided by the number of contributors for Mean.
#[derive(Debug)]
pub struct DimReduce {
    kind: ReduceKind,
    dim: Option<usize>,
    /// Set by `forward`, taken by `backward`.
    input_shape: Option<Vec<usize>>,
}

impl DimReduce {
    pub fn new(kind: ReduceKind, dim: Option<usize>) -> Self {
        debug!("{}: new node, dim={:?}", kind.name(), dim);
        DimReduce {
            kind,
            dim,
            input_shape: None,
        }
    }

    pub fn sum(dim: Option<usize>) -> Self {
        Self::new(ReduceKind::Sum, dim)
    }

    pub fn mean(dim: Option<usize>) -> Self {
        Self::new(ReduceKind::Mean, dim)
    }

    pub fn kind(&self) -> ReduceKind {
        self.kind
    }

    pub fn dim(&self) -> Option<usize> {
        self.dim
    }

    /// Input shape captured by the pending forward pass, if any.
    pub fn input_shape(&self) -> Option<&[usize]> {
        self.input_shape.as_deref()
    }
}

/// Sum over all elements (`None`) or along one axis.
pub fn sum(dim: Option<usize>) -> DimReduce {
    DimReduce::sum(dim)
}

/// Mean over all elements (`None`) or along one axis.
pub fn mean(dim: Option<usize>) -> DimReduce {
    DimReduce::mean(dim)
}

fn count_as<T: Numeric>(count: usize) -> Result<T, AutoReduceError> {
    T::from_usize(count)
        .ok_or_else(|| AutoReduceError::InternalError(format!("count {} not representable", count)))
}

impl<T: Numeric> Function<T> for DimReduce {
    fn name(&self) -> &'static str {
        self.kind.name()
    }

    fn forward(&mut self, input: &Tensor<T>) -> Result<FunctionOutput<T>, AutoReduceError> {
        if self.input_shape.is_some() {
            return Err(AutoReduceError::StatePrecondition {
                operation: format!("{}.forward", self.kind.name()),
                reason: "previous forward has not been consumed by backward".to_string(),
            });
        }
        let input_shape = input.shape();

        let output = match (self.kind, self.dim) {
            (ReduceKind::Sum, None) => Tensor::scalar_1d(input.sum_all()),
            (ReduceKind::Mean, None) => Tensor::scalar_1d(input.mean_all()?),
            (ReduceKind::Sum, Some(dim)) => input.sum_dim(dim)?,
            (ReduceKind::Mean, Some(dim)) => input.mean_dim(dim)?,
        };
        debug!(
            "{}.forward: dim={:?}, input {:?} -> output {:?}",
            self.kind.name(),
            self.dim,
            input_shape,
            output.shape()
        );

        self.input_shape = Some(input_shape);
        Ok(FunctionOutput::Single(output))
    }

    fn backward(&mut self, grad_output: &Tensor<T>) -> Result<Tensor<T>, AutoReduceError> {
        let input_shape = self.input_shape.take().ok_or_else(|| AutoReduceError::StatePrecondition {
            operation: format!("{}.backward", self.kind.name()),
            reason: "backward called without a pending forward".to_string(),
        })?;
        debug!(
            "{}.backward: dim={:?}, grad_output {:?} -> grad_input {:?}",
            self.kind.name(),
            self.dim,
            grad_output.shape(),
            input_shape
        );

        match self.dim {
            None => {
                let mut grad = grad_output.item_at_flat(0)?;
                if self.kind == ReduceKind::Mean {
                    grad /= count_as::<T>(input_shape.iter().product())?;
                }
                create::full(&input_shape, grad)
            }
            Some(dim) => {
                validate_axis(dim, input_shape.len())?;
                let dim_size = input_shape[dim];
                let mut repeats = vec![1; input_shape.len()];
                repeats[dim] = dim_size;

                let grad_input = grad_output.repeat(&repeats)?;
                if grad_input.shape() != input_shape {
                    return Err(AutoReduceError::ShapeMismatch {
                        expected: input_shape,
                        actual: grad_input.shape(),
                        operation: format!("{}.backward (repeat along dim {})", self.kind.name(), dim),
                    });
                }
                // An empty axis leaves nothing to scale.
                if self.kind == ReduceKind::Mean && dim_size > 0 {
                    grad_input.div_scalar_(count_as::<T>(dim_size)?)?;
                }
                Ok(grad_input)
            }
        }
    }
}

#[cfg(test)]
#[path = "dim_reduce_test.rs"]
mod tests;

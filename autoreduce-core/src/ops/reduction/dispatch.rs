use crate::autograd::{Function, FunctionOutput};
use crate::error::AutoReduceError;
use crate::ops::reduction::dim_reduce::{DimReduce, ReduceKind};
use crate::ops::reduction::selection::{Selection, SelectionKind};
use crate::ops::traits::Numeric;
use crate::tensor::Tensor;

/// Any reduction node, resolved once from its operator name.
///
/// Lets an engine build nodes from a name without knowing which family the
/// operator belongs to.
#[derive(Debug)]
pub enum ReductionFunction {
    Reduce(DimReduce),
    Select(Selection),
}

impl ReductionFunction {
    /// Builds the node named `name` (`sum`, `mean`, `max`, `min`, `mode`,
    /// `median`, case-insensitive).
    ///
    /// # Errors
    /// - `UnsupportedOperation` for an unknown name.
    /// - `InvalidConfiguration` if `return_indices` is requested from `sum` or
    ///   `mean`, or without a `dim`.
    pub fn from_name(
        name: &str,
        dim: Option<usize>,
        return_indices: bool,
    ) -> Result<Self, AutoReduceError> {
        let reduce = |kind: ReduceKind| {
            if return_indices {
                return Err(AutoReduceError::InvalidConfiguration {
                    operation: kind.name().to_string(),
                    reason: "only selections can return indices".to_string(),
                });
            }
            Ok(ReductionFunction::Reduce(DimReduce::new(kind, dim)))
        };
        let select = |kind: SelectionKind| {
            Selection::new(kind, dim, return_indices).map(ReductionFunction::Select)
        };

        match name.to_ascii_lowercase().as_str() {
            "sum" => reduce(ReduceKind::Sum),
            "mean" => reduce(ReduceKind::Mean),
            "max" => select(SelectionKind::Max),
            "min" => select(SelectionKind::Min),
            "mode" => select(SelectionKind::Mode),
            "median" => select(SelectionKind::Median),
            other => Err(AutoReduceError::UnsupportedOperation(format!(
                "unknown reduction '{}'",
                other
            ))),
        }
    }
}

impl From<DimReduce> for ReductionFunction {
    fn from(node: DimReduce) -> Self {
        ReductionFunction::Reduce(node)
    }
}

impl From<Selection> for ReductionFunction {
    fn from(node: Selection) -> Self {
        ReductionFunction::Select(node)
    }
}

impl<T: Numeric> Function<T> for ReductionFunction {
    fn name(&self) -> &'static str {
        match self {
            ReductionFunction::Reduce(node) => node.kind().name(),
            ReductionFunction::Select(node) => node.kind().name(),
        }
    }

    fn forward(&mut self, input: &Tensor<T>) -> Result<FunctionOutput<T>, AutoReduceError> {
        match self {
            ReductionFunction::Reduce(node) => node.forward(input),
            ReductionFunction::Select(node) => node.forward(input),
        }
    }

    fn backward(&mut self, grad_output: &Tensor<T>) -> Result<Tensor<T>, AutoReduceError> {
        match self {
            ReductionFunction::Reduce(node) => node.backward(grad_output),
            ReductionFunction::Select(node) => node.backward(grad_output),
        }
    }
}

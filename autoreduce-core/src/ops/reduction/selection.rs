use crate::autograd::{Function, FunctionCtx, FunctionOutput};
use crate::error::AutoReduceError;
use crate::ops::traits::Numeric;
use crate::tensor::{create, Tensor};
use log::{debug, trace};

/// Which element a [`Selection`] node picks along its axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionKind {
    Max,
    Min,
    Mode,
    Median,
}

impl SelectionKind {
    pub fn name(self) -> &'static str {
        match self {
            SelectionKind::Max => "max",
            SelectionKind::Min => "min",
            SelectionKind::Mode => "mode",
            SelectionKind::Median => "median",
        }
    }

    /// Whether a dim-less node reduces over every element.
    ///
    /// Only Max and Min do; Mode and Median without a dim select along the
    /// last axis instead.
    pub fn has_all_reduce(self) -> bool {
        matches!(self, SelectionKind::Max | SelectionKind::Min)
    }

    fn select_dim<T: Numeric>(
        self,
        input: &Tensor<T>,
        dim: usize,
    ) -> Result<(Tensor<T>, Tensor<i64>), AutoReduceError> {
        match self {
            SelectionKind::Max => input.max_dim(dim),
            SelectionKind::Min => input.min_dim(dim),
            SelectionKind::Mode => input.mode_dim(dim),
            SelectionKind::Median => input.median_dim(dim),
        }
    }

    fn select_all<T: Numeric>(self, input: &Tensor<T>) -> Result<T, AutoReduceError> {
        match self {
            SelectionKind::Max => input.max_all(),
            SelectionKind::Min => input.min_all(),
            SelectionKind::Mode | SelectionKind::Median => Err(AutoReduceError::UnsupportedOperation(
                format!("{} has no whole-tensor reduction", self.name()),
            )),
        }
    }
}

/// Where the selected positions live between forward and backward.
#[derive(Debug)]
enum Selected {
    /// Whole-tensor Max/Min: row-major position of the first extreme element.
    FlatPosition(usize),
    /// Per-axis selection with indices kept private to the node.
    Retained(Tensor<i64>),
    /// Per-axis selection whose indices were returned to the caller and saved
    /// in the node's `FunctionCtx`.
    Saved,
}

#[derive(Debug)]
struct SelectionState {
    input_shape: Vec<usize>,
    selected: Selected,
}

/// Max, Min, Mode or Median over the whole tensor or along one axis.
///
/// Gradient flows only to the selected input positions; every other position
/// receives zero.
#[derive(Debug)]
pub struct Selection {
    kind: SelectionKind,
    dim: Option<usize>,
    return_indices: bool,
    ctx: FunctionCtx,
    state: Option<SelectionState>,
}

impl Selection {
    /// Builds a selection node.
    ///
    /// # Errors
    /// `InvalidConfiguration` if `return_indices` is set without a `dim`.
    pub fn new(
        kind: SelectionKind,
        dim: Option<usize>,
        return_indices: bool,
    ) -> Result<Self, AutoReduceError> {
        if return_indices && dim.is_none() {
            return Err(AutoReduceError::InvalidConfiguration {
                operation: kind.name().to_string(),
                reason: "return_indices requires a dim".to_string(),
            });
        }
        debug!(
            "{}: new node, dim={:?}, return_indices={}",
            kind.name(),
            dim,
            return_indices
        );
        Ok(Selection {
            kind,
            dim,
            return_indices,
            ctx: FunctionCtx::new(),
            state: None,
        })
    }

    pub fn max(dim: Option<usize>, return_indices: bool) -> Result<Self, AutoReduceError> {
        Self::new(SelectionKind::Max, dim, return_indices)
    }

    pub fn min(dim: Option<usize>, return_indices: bool) -> Result<Self, AutoReduceError> {
        Self::new(SelectionKind::Min, dim, return_indices)
    }

    pub fn mode(dim: Option<usize>, return_indices: bool) -> Result<Self, AutoReduceError> {
        Self::new(SelectionKind::Mode, dim, return_indices)
    }

    pub fn median(dim: Option<usize>, return_indices: bool) -> Result<Self, AutoReduceError> {
        Self::new(SelectionKind::Median, dim, return_indices)
    }

    pub fn kind(&self) -> SelectionKind {
        self.kind
    }

    pub fn dim(&self) -> Option<usize> {
        self.dim
    }

    pub fn return_indices(&self) -> bool {
        self.return_indices
    }

    /// Flat position recorded by a pending whole-tensor forward.
    pub fn max_index(&self) -> Option<usize> {
        match self.state.as_ref()?.selected {
            Selected::FlatPosition(pos) => Some(pos),
            _ => None,
        }
    }

    fn uses_all_reduce(&self) -> bool {
        self.dim.is_none() && self.kind.has_all_reduce()
    }

    /// `dim` if given, otherwise the last axis of a rank-`rank` tensor.
    fn effective_dim(&self, rank: usize) -> Result<usize, AutoReduceError> {
        match self.dim {
            Some(dim) => Ok(dim),
            None => rank.checked_sub(1).ok_or_else(|| {
                AutoReduceError::UnsupportedOperation(format!(
                    "{} along the default axis needs a tensor with at least one dimension",
                    self.kind.name()
                ))
            }),
        }
    }

    fn precondition(&self, stage: &str, reason: &str) -> AutoReduceError {
        AutoReduceError::StatePrecondition {
            operation: format!("{}.{}", self.kind.name(), stage),
            reason: reason.to_string(),
        }
    }
}

/// Max over all elements (`None`) or along one axis.
pub fn max(dim: Option<usize>, return_indices: bool) -> Result<Selection, AutoReduceError> {
    Selection::max(dim, return_indices)
}

/// Min over all elements (`None`) or along one axis.
pub fn min(dim: Option<usize>, return_indices: bool) -> Result<Selection, AutoReduceError> {
    Selection::min(dim, return_indices)
}

/// Mode along `dim`, or along the last axis when `dim` is `None`.
pub fn mode(dim: Option<usize>, return_indices: bool) -> Result<Selection, AutoReduceError> {
    Selection::mode(dim, return_indices)
}

/// Median along `dim`, or along the last axis when `dim` is `None`.
pub fn median(dim: Option<usize>, return_indices: bool) -> Result<Selection, AutoReduceError> {
    Selection::median(dim, return_indices)
}

impl<T: Numeric> Function<T> for Selection {
    fn name(&self) -> &'static str {
        self.kind.name()
    }

    fn forward(&mut self, input: &Tensor<T>) -> Result<FunctionOutput<T>, AutoReduceError> {
        if self.state.is_some() {
            return Err(self.precondition(
                "forward",
                "previous forward has not been consumed by backward",
            ));
        }
        let input_shape = input.shape();

        if self.uses_all_reduce() {
            let value = self.kind.select_all(input)?;
            let position = input.flatten()?.first_position_of(value).ok_or_else(|| {
                AutoReduceError::InternalError(format!(
                    "{} selected {:?}, which matches no element",
                    self.kind.name(),
                    value
                ))
            })?;
            debug!(
                "{}.forward: all elements of {:?}, selected flat position {}",
                self.kind.name(),
                input_shape,
                position
            );
            self.state = Some(SelectionState {
                input_shape,
                selected: Selected::FlatPosition(position),
            });
            return Ok(FunctionOutput::Single(Tensor::scalar_1d(value)));
        }

        let dim = self.effective_dim(input_shape.len())?;
        let (output, indices) = self.kind.select_dim(input, dim)?;
        debug!(
            "{}.forward: dim={} (requested {:?}), input {:?} -> output {:?}",
            self.kind.name(),
            dim,
            self.dim,
            input_shape,
            output.shape()
        );
        trace!("{}.forward: selected indices {:?}", self.kind.name(), indices.to_vec());

        let (selected, result) = if self.return_indices {
            self.ctx.mark_non_differentiable(&indices);
            // Detached copy: in-place edits of the returned indices must not
            // move where backward scatters.
            self.ctx
                .save_for_backward(Tensor::new(indices.to_vec(), indices.shape())?);
            (
                Selected::Saved,
                FunctionOutput::WithIndices {
                    values: output,
                    indices,
                },
            )
        } else {
            (Selected::Retained(indices), FunctionOutput::Single(output))
        };
        self.state = Some(SelectionState {
            input_shape,
            selected,
        });
        Ok(result)
    }

    fn backward(&mut self, grad_output: &Tensor<T>) -> Result<Tensor<T>, AutoReduceError> {
        let state = self
            .state
            .take()
            .ok_or_else(|| self.precondition("backward", "backward called without a pending forward"))?;
        let grad_input = create::zeros::<T>(&state.input_shape)?;

        let indices = match state.selected {
            Selected::FlatPosition(position) => {
                debug!(
                    "{}.backward: routing gradient to flat position {} of {:?}",
                    self.kind.name(),
                    position,
                    state.input_shape
                );
                grad_input.set_flat_(position, grad_output.item_at_flat(0)?)?;
                return Ok(grad_input);
            }
            Selected::Retained(indices) => indices,
            Selected::Saved => self
                .ctx
                .take_saved_indices()
                .pop()
                .ok_or_else(|| self.precondition("backward", "saved indices already consumed"))?,
        };

        let dim = self.effective_dim(grad_output.rank())?;
        debug!(
            "{}.backward: scattering grad_output {:?} along dim {} into {:?}",
            self.kind.name(),
            grad_output.shape(),
            dim,
            state.input_shape
        );
        grad_input.scatter_(dim, &indices, grad_output)?;
        Ok(grad_input)
    }
}

#[cfg(test)]
#[path = "selection_test.rs"]
mod tests;

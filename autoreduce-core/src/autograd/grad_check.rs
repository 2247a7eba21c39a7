use crate::autograd::Function;
use crate::error::AutoReduceError;
use crate::ops::traits::Numeric;
use crate::tensor::Tensor;
use log::debug;
use thiserror::Error;

/// Error type specifically for gradient checking failures.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GradCheckError {
    #[error("Gradient check failed at element index {element_index}: Analytical grad {analytical_grad:?} != Numerical grad {numerical_grad:?}. Difference: {difference:?}")]
    GradientMismatch {
        element_index: usize,
        analytical_grad: f64, // Use f64 for precision
        numerical_grad: f64,
        difference: f64,
    },
    #[error("Forward function execution failed during gradient check: {0}")]
    ForwardPassError(AutoReduceError),
    #[error("Backward pass execution failed during gradient check: {0}")]
    BackwardPassError(AutoReduceError),
    #[error("Tensor error during intermediate calculation: {0}")]
    TensorError(AutoReduceError),
    #[error("Analytical gradient has shape {actual:?}, input has shape {expected:?}")]
    GradientShapeMismatch {
        expected: Vec<usize>,
        actual: Vec<usize>,
    },
    #[error("Numerical gradient is NaN or infinite at element {element_index}. Details: Loss+: {loss_plus:?}, Loss-: {loss_minus:?}")]
    NumericalGradNaNOrInfinite {
        element_index: usize,
        loss_plus: f64,
        loss_minus: f64,
    },
}

impl From<AutoReduceError> for GradCheckError {
    fn from(err: AutoReduceError) -> Self {
        GradCheckError::TensorError(err)
    }
}

/// Checks a node's analytical gradient against central finite differences.
///
/// `make_node` must return a fresh node each time: a node captures state on
/// forward, so every perturbed evaluation needs its own. The scalar loss is
/// `sum(output * output_grad)`, whose gradient w.r.t. the output is
/// `output_grad`.
///
/// An element passes when `|analytical - numerical| <= tolerance * (1 + |numerical|)`.
pub fn check_grad<T, N, F>(
    make_node: F,
    input: &Tensor<T>,
    output_grad: &Tensor<T>,
    epsilon: f64,
    tolerance: f64,
) -> Result<(), GradCheckError>
where
    T: Numeric,
    N: Function<T>,
    F: Fn() -> Result<N, AutoReduceError>,
{
    let input_shape = input.shape();

    // --- Analytical gradient ---
    let mut node = make_node()?;
    node.forward(input).map_err(GradCheckError::ForwardPassError)?;
    let analytical = node
        .backward(output_grad)
        .map_err(GradCheckError::BackwardPassError)?;
    if analytical.shape() != input_shape {
        return Err(GradCheckError::GradientShapeMismatch {
            expected: input_shape,
            actual: analytical.shape(),
        });
    }
    let analytical_data: Vec<f64> = analytical.to_vec().iter().map(to_f64).collect();

    // --- Numerical gradient, one element at a time ---
    let original: Vec<T> = input.to_vec();
    for elem_idx in 0..original.len() {
        let loss_at = |delta: f64| -> Result<f64, GradCheckError> {
            let mut data = original.clone();
            let shifted = to_f64(&data[elem_idx]) + delta;
            data[elem_idx] = T::from_f64(shifted).ok_or_else(|| {
                AutoReduceError::InternalError("perturbed value not representable".to_string())
            })?;
            let perturbed = Tensor::new(data, input_shape.clone())?;
            let mut node = make_node()?;
            let output = node
                .forward(&perturbed)
                .map_err(GradCheckError::ForwardPassError)?
                .into_values();
            calculate_loss(&output, output_grad)
        };
        let loss_plus = loss_at(epsilon)?;
        let loss_minus = loss_at(-epsilon)?;
        let numerical_grad = (loss_plus - loss_minus) / (2.0 * epsilon);

        if !numerical_grad.is_finite() {
            return Err(GradCheckError::NumericalGradNaNOrInfinite {
                element_index: elem_idx,
                loss_plus,
                loss_minus,
            });
        }

        let analytical_grad = analytical_data[elem_idx];
        let difference = (analytical_grad - numerical_grad).abs();
        if difference > tolerance * (1.0 + numerical_grad.abs()) {
            return Err(GradCheckError::GradientMismatch {
                element_index: elem_idx,
                analytical_grad,
                numerical_grad,
                difference,
            });
        }
    }
    debug!(
        "check_grad: {} elements of shape {:?} within tolerance {}",
        original.len(),
        input_shape,
        tolerance
    );
    Ok(())
}

fn to_f64<T: Numeric>(value: &T) -> f64 {
    value.to_f64().unwrap_or(f64::NAN)
}

/// `sum(output * output_grad)` in f64.
fn calculate_loss<T: Numeric>(output: &Tensor<T>, output_grad: &Tensor<T>) -> Result<f64, GradCheckError> {
    if output.shape() != output_grad.shape() {
        return Err(GradCheckError::TensorError(AutoReduceError::ShapeMismatch {
            expected: output.shape(),
            actual: output_grad.shape(),
            operation: "calculate_loss (grad_check)".to_string(),
        }));
    }
    Ok(output
        .to_vec()
        .iter()
        .zip(output_grad.to_vec().iter())
        .map(|(o, g)| to_f64(o) * to_f64(g))
        .sum())
}

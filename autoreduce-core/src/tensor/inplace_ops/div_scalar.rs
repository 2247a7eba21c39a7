use crate::error::AutoReduceError;
use crate::ops::traits::Numeric;
use crate::tensor::Tensor;

/// Divides every element by `scalar` in place.
pub(crate) fn perform_div_scalar_inplace<T: Numeric>(
    tensor: &Tensor<T>,
    scalar: T,
) -> Result<(), AutoReduceError> {
    if scalar.is_zero() {
        return Err(AutoReduceError::DivisionByZero);
    }
    let mut guard = tensor.write_data();
    for v in guard.buffer_mut().iter_mut() {
        *v /= scalar;
    }
    Ok(())
}

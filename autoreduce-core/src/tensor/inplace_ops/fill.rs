// Logic for the in-place fill and single-element write operations

use crate::error::AutoReduceError;
use crate::ops::traits::Element;
use crate::tensor::Tensor;

/// Overwrites every element with `value`.
/// The buffer is detached first if a view shares it.
pub(crate) fn perform_fill_inplace<T: Element>(tensor: &Tensor<T>, value: T) {
    let mut guard = tensor.write_data();
    for v in guard.buffer_mut().iter_mut() {
        *v = value;
    }
}

/// Writes `value` at a row-major flat position.
pub(crate) fn perform_set_flat_inplace<T: Element>(
    tensor: &Tensor<T>,
    index: usize,
    value: T,
) -> Result<(), AutoReduceError> {
    let mut guard = tensor.write_data();
    if index >= guard.numel() {
        return Err(AutoReduceError::IndexOutOfBounds {
            index: vec![index],
            shape: vec![guard.numel()],
        });
    }
    guard.buffer_mut()[index] = value;
    Ok(())
}

// src/tensor_data.rs
use std::sync::Arc;

use crate::error::AutoReduceError;
use crate::ops::traits::Element;
use crate::tensor::utils::calculate_strides;

/// Internal storage and metadata for a Tensor.
///
/// This struct holds the data buffer, shape, strides and the
/// `requires_grad` flag. It is wrapped in `Arc<RwLock<TensorData<T>>>` by the
/// `Tensor` struct to allow shared ownership and interior mutability.
///
/// Storage is always row-major and contiguous. The buffer itself sits behind
/// an `Arc` so that views (`flatten`) share it; in-place writes go through
/// [`TensorData::buffer_mut`], which copies the buffer first if it is shared.
#[derive(Debug)]
pub struct TensorData<T: Element> {
    /// The underlying CPU buffer, flattened in row-major order.
    pub(crate) buffer: Arc<Vec<T>>,
    /// The shape (dimensions) of the tensor.
    pub(crate) shape: Vec<usize>,
    /// Contiguous strides derived from `shape`.
    pub(crate) strides: Vec<usize>,
    /// Flag indicating if the tensor takes part in gradient computation.
    /// Index tensors returned by selections are marked non-differentiable.
    pub(crate) requires_grad: bool,
}

impl<T: Element> TensorData<T> {
    /// Creates a new `TensorData` from row-major data and a shape.
    ///
    /// # Errors
    /// Returns `AutoReduceError::TensorCreationError` if the length of `data_vec`
    /// does not match the number of elements implied by `shape`.
    pub fn new(data_vec: Vec<T>, shape: Vec<usize>) -> Result<Self, AutoReduceError> {
        let numel: usize = shape.iter().product();
        let data_len = data_vec.len();
        if data_len != numel {
            return Err(AutoReduceError::TensorCreationError { data_len, shape });
        }
        let strides = calculate_strides(&shape);
        Ok(TensorData {
            buffer: Arc::new(data_vec),
            shape,
            strides,
            requires_grad: false,
        })
    }

    /// Builds a new `TensorData` over an existing buffer (used by views).
    pub(crate) fn from_shared(buffer: Arc<Vec<T>>, shape: Vec<usize>) -> Result<Self, AutoReduceError> {
        let numel: usize = shape.iter().product();
        if buffer.len() != numel {
            return Err(AutoReduceError::TensorCreationError { data_len: buffer.len(), shape });
        }
        let strides = calculate_strides(&shape);
        Ok(TensorData {
            buffer,
            shape,
            strides,
            requires_grad: false,
        })
    }

    /// Number of elements. A rank-0 tensor holds one element.
    pub fn numel(&self) -> usize {
        self.shape.iter().product()
    }

    pub fn buffer(&self) -> &[T] {
        self.buffer.as_slice()
    }

    /// Mutable access to the buffer, detaching it from any view sharing it.
    pub(crate) fn buffer_mut(&mut self) -> &mut Vec<T> {
        Arc::make_mut(&mut self.buffer)
    }
}

use crate::error::AutoReduceError;
use crate::ops::traits::Element;
use crate::tensor::utils::{coord_to_index, index_to_coord};
use crate::tensor::Tensor;
use crate::tensor_data::TensorData;
use std::sync::Arc;

impl<T: Element> Tensor<T> {
    /// Tiles the tensor `repeats[d]` times along each axis `d`.
    ///
    /// The output always owns a fresh buffer. `repeats` must have one entry per
    /// axis.
    pub fn repeat(&self, repeats: &[usize]) -> Result<Tensor<T>, AutoReduceError> {
        let guard = self.read_data();
        let rank = guard.shape.len();
        if repeats.len() != rank {
            return Err(AutoReduceError::DimensionMismatch {
                expected: rank,
                actual: repeats.len(),
            });
        }
        let out_shape: Vec<usize> = guard
            .shape
            .iter()
            .zip(repeats.iter())
            .map(|(&size, &r)| size * r)
            .collect();
        let numel: usize = out_shape.iter().product();
        let data = guard.buffer();

        let mut result = Vec::with_capacity(numel);
        let mut src_coord = vec![0; rank];
        for i in 0..numel {
            let coord = index_to_coord(i, &out_shape);
            for d in 0..rank {
                src_coord[d] = coord[d] % guard.shape[d];
            }
            result.push(data[coord_to_index(&src_coord, &guard.strides)]);
        }
        drop(guard);
        Tensor::new(result, out_shape)
    }

    /// Returns a 1-D view over the same buffer.
    ///
    /// The view shares storage until either side is written to in place, at
    /// which point the writer gets its own copy.
    pub fn flatten(&self) -> Result<Tensor<T>, AutoReduceError> {
        let guard = self.read_data();
        let numel = guard.numel();
        let view = TensorData::from_shared(Arc::clone(&guard.buffer), vec![numel])?;
        Ok(Tensor::from_data(view))
    }
}

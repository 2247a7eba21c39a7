use crate::error::AutoReduceError;
use crate::ops::traits::Element;
use crate::tensor::utils::{coord_to_index, index_to_coord, validate_axis};
use crate::tensor::Tensor;
use std::sync::Arc;

/// Writes `src` into `target` along `dim` at the positions named by `index`.
///
/// For every coordinate `c` of `index`:
/// `target[c with c[dim] = index[c]] = src[c]`.
/// `index` and `src` must share a shape, have the same rank as `target`, and
/// fit inside `target` on every axis other than `dim`.
pub(crate) fn perform_scatter_inplace<T: Element>(
    target: &Tensor<T>,
    dim: usize,
    index: &Tensor<i64>,
    src: &Tensor<T>,
) -> Result<(), AutoReduceError> {
    // Snapshot the sources before locking the target, which may alias `src`.
    let (index_shape, index_data) = {
        let guard = index.read_data();
        (guard.shape.clone(), Arc::clone(&guard.buffer))
    };
    let (src_shape, src_data) = {
        let guard = src.read_data();
        (guard.shape.clone(), Arc::clone(&guard.buffer))
    };

    let mut guard = target.write_data();
    let target_shape = guard.shape.clone();
    let rank = target_shape.len();
    validate_axis(dim, rank)?;

    if index_shape != src_shape {
        return Err(AutoReduceError::ShapeMismatch {
            expected: index_shape,
            actual: src_shape,
            operation: "scatter_ (src vs index)".to_string(),
        });
    }
    if index_shape.len() != rank {
        return Err(AutoReduceError::DimensionMismatch {
            expected: rank,
            actual: index_shape.len(),
        });
    }
    let fits = index_shape
        .iter()
        .zip(target_shape.iter())
        .enumerate()
        .all(|(d, (&i, &t))| d == dim || i <= t);
    if !fits {
        return Err(AutoReduceError::ShapeMismatch {
            expected: target_shape,
            actual: index_shape,
            operation: "scatter_ (index vs target)".to_string(),
        });
    }

    let target_strides = guard.strides.clone();
    let buffer = guard.buffer_mut();
    for (pos, &selected) in index_data.iter().enumerate() {
        let mut coord = index_to_coord(pos, &index_shape);
        if selected < 0 || selected as usize >= target_shape[dim] {
            coord[dim] = selected.max(0) as usize;
            return Err(AutoReduceError::IndexOutOfBounds {
                index: coord,
                shape: target_shape,
            });
        }
        coord[dim] = selected as usize;
        buffer[coord_to_index(&coord, &target_strides)] = src_data[pos];
    }
    Ok(())
}

use crate::error::AutoReduceError;

/// Calculates the strides for a given shape.
/// Strides represent the number of elements to skip in the flattened data array
/// to move one step along each dimension.
///
/// Example:
/// shape = [2, 3] -> strides = [3, 1]
/// shape = [2, 2, 2] -> strides = [4, 2, 1]
pub fn calculate_strides(shape: &[usize]) -> Vec<usize> {
    if shape.is_empty() {
        return vec![];
    }
    let rank = shape.len();
    let mut strides = vec![1; rank];
    for i in (0..rank - 1).rev() {
        strides[i] = strides[i + 1] * shape[i + 1];
    }
    strides
}

/// Converts a row-major linear index into coordinates for `shape`.
pub fn index_to_coord(index: usize, shape: &[usize]) -> Vec<usize> {
    let mut coord = vec![0; shape.len()];
    let mut remaining = index;
    for dim in (0..shape.len()).rev() {
        let size = shape[dim];
        if size > 0 {
            coord[dim] = remaining % size;
            remaining /= size;
        }
    }
    coord
}

/// Converts coordinates into a linear offset using `strides`.
pub fn coord_to_index(coord: &[usize], strides: &[usize]) -> usize {
    coord.iter().zip(strides.iter()).map(|(c, s)| c * s).sum()
}

/// Checks that `axis` names a dimension of a rank-`rank` tensor.
pub fn validate_axis(axis: usize, rank: usize) -> Result<(), AutoReduceError> {
    if axis >= rank {
        return Err(AutoReduceError::InvalidAxis { axis, rank });
    }
    Ok(())
}

/// Splits `shape` around `axis` into `(outer, axis_len, inner)`.
///
/// Element `(o, k, i)` of the axis decomposition lives at flat offset
/// `(o * axis_len + k) * inner + i`; the same cell of a keep-dim reduction
/// output lives at `o * inner + i`.
pub fn axis_layout(shape: &[usize], axis: usize) -> (usize, usize, usize) {
    let outer: usize = shape[..axis].iter().product();
    let inner: usize = shape[axis + 1..].iter().product();
    (outer, shape[axis], inner)
}

/// Shape of a reduction along `axis` with the axis kept at size 1.
pub fn keep_dim_shape(shape: &[usize], axis: usize) -> Vec<usize> {
    let mut out = shape.to_vec();
    out[axis] = 1;
    out
}

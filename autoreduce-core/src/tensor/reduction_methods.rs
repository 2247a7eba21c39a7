//! Aggregate and per-axis selection primitives used by the reduction nodes.
//!
//! Every per-axis method keeps the reduced axis with size 1, so its output can
//! be tiled straight back to the input shape during the backward pass.

use crate::error::AutoReduceError;
use crate::ops::traits::{Element, Numeric};
use crate::tensor::utils::{axis_layout, keep_dim_shape, validate_axis};
use crate::tensor::Tensor;
use std::cmp::Ordering;

/// Total order over floats: NaN sorts above every number and equal to itself.
fn cmp_values<T: Numeric>(a: &T, b: &T) -> Ordering {
    a.partial_cmp(b).unwrap_or_else(|| a.is_nan().cmp(&b.is_nan()))
}

/// First NaN of the lane, if any. Max, min and median propagate it.
fn first_nan<T: Numeric>(lane: &[T]) -> Option<(T, usize)> {
    lane.iter().position(|v| v.is_nan()).map(|pos| (lane[pos], pos))
}

/// First position holding the maximum. Ties keep the earliest position.
fn pick_max<T: Numeric>(lane: &[T]) -> (T, usize) {
    if let Some(nan) = first_nan(lane) {
        return nan;
    }
    let mut best = (lane[0], 0);
    for (pos, &v) in lane.iter().enumerate().skip(1) {
        if v > best.0 {
            best = (v, pos);
        }
    }
    best
}

/// First position holding the minimum. Ties keep the earliest position.
fn pick_min<T: Numeric>(lane: &[T]) -> (T, usize) {
    if let Some(nan) = first_nan(lane) {
        return nan;
    }
    let mut best = (lane[0], 0);
    for (pos, &v) in lane.iter().enumerate().skip(1) {
        if v < best.0 {
            best = (v, pos);
        }
    }
    best
}

/// Lane sorted by value, stable with respect to position.
fn sorted_with_positions<T: Numeric>(lane: &[T]) -> Vec<(T, usize)> {
    let mut pairs: Vec<(T, usize)> = lane.iter().copied().zip(0..).collect();
    pairs.sort_by(|a, b| cmp_values(&a.0, &b.0));
    pairs
}

/// Most frequent value. Frequency ties go to the smallest value; the
/// reported position is the last occurrence of that value in the lane.
/// NaNs count as one value, ranked above every number.
fn pick_mode<T: Numeric>(lane: &[T]) -> (T, usize) {
    let sorted = sorted_with_positions(lane);
    let mut best = sorted[0];
    let mut best_freq = 0;
    let mut run_start = 0;
    for i in 0..sorted.len() {
        let run_ends = i + 1 == sorted.len()
            || cmp_values(&sorted[i + 1].0, &sorted[i].0) != Ordering::Equal;
        if run_ends {
            let freq = i + 1 - run_start;
            if freq > best_freq {
                best_freq = freq;
                best = sorted[i];
            }
            run_start = i + 1;
        }
    }
    best
}

/// Lower median: the element at sorted position `(n - 1) / 2`.
fn pick_median<T: Numeric>(lane: &[T]) -> (T, usize) {
    if let Some(nan) = first_nan(lane) {
        return nan;
    }
    let sorted = sorted_with_positions(lane);
    sorted[(sorted.len() - 1) / 2]
}

impl<T: Numeric> Tensor<T> {
    /// Arithmetic sum of all elements.
    pub fn sum_all(&self) -> T {
        self.read_data()
            .buffer()
            .iter()
            .fold(T::zero(), |acc, &v| acc + v)
    }

    /// Sum of all elements divided by the element count.
    pub fn mean_all(&self) -> Result<T, AutoReduceError> {
        let count = T::from_usize(self.numel()).ok_or_else(|| {
            AutoReduceError::InternalError("element count not representable".to_string())
        })?;
        Ok(self.sum_all() / count)
    }

    /// Largest element, or NaN if any element is NaN. Fails on an empty tensor.
    pub fn max_all(&self) -> Result<T, AutoReduceError> {
        let guard = self.read_data();
        if guard.buffer().is_empty() {
            return Err(AutoReduceError::UnsupportedOperation(
                "max of an empty tensor".to_string(),
            ));
        }
        Ok(pick_max(guard.buffer()).0)
    }

    /// Smallest element, or NaN if any element is NaN. Fails on an empty tensor.
    pub fn min_all(&self) -> Result<T, AutoReduceError> {
        let guard = self.read_data();
        if guard.buffer().is_empty() {
            return Err(AutoReduceError::UnsupportedOperation(
                "min of an empty tensor".to_string(),
            ));
        }
        Ok(pick_min(guard.buffer()).0)
    }

    /// Sum along `dim`, keeping the axis with size 1.
    pub fn sum_dim(&self, dim: usize) -> Result<Tensor<T>, AutoReduceError> {
        let guard = self.read_data();
        let shape = guard.shape.clone();
        validate_axis(dim, shape.len())?;
        let (outer, axis_len, inner) = axis_layout(&shape, dim);
        let data = guard.buffer();

        let mut result = vec![T::zero(); outer * inner];
        for o in 0..outer {
            for k in 0..axis_len {
                let base = (o * axis_len + k) * inner;
                for i in 0..inner {
                    result[o * inner + i] += data[base + i];
                }
            }
        }
        drop(guard);
        Tensor::new(result, keep_dim_shape(&shape, dim))
    }

    /// Mean along `dim`, keeping the axis with size 1.
    pub fn mean_dim(&self, dim: usize) -> Result<Tensor<T>, AutoReduceError> {
        let summed = self.sum_dim(dim)?;
        let count = T::from_usize(self.shape()[dim]).ok_or_else(|| {
            AutoReduceError::InternalError("axis length not representable".to_string())
        })?;
        {
            let mut guard = summed.write_data();
            for v in guard.buffer_mut().iter_mut() {
                *v /= count;
            }
        }
        Ok(summed)
    }

    /// Maximum along `dim` and the first position holding it.
    pub fn max_dim(&self, dim: usize) -> Result<(Tensor<T>, Tensor<i64>), AutoReduceError> {
        self.select_along(dim, "max_dim", pick_max)
    }

    /// Minimum along `dim` and the first position holding it.
    pub fn min_dim(&self, dim: usize) -> Result<(Tensor<T>, Tensor<i64>), AutoReduceError> {
        self.select_along(dim, "min_dim", pick_min)
    }

    /// Most frequent value along `dim` and a position holding it.
    pub fn mode_dim(&self, dim: usize) -> Result<(Tensor<T>, Tensor<i64>), AutoReduceError> {
        self.select_along(dim, "mode_dim", pick_mode)
    }

    /// Lower median along `dim` and the position it came from.
    pub fn median_dim(&self, dim: usize) -> Result<(Tensor<T>, Tensor<i64>), AutoReduceError> {
        self.select_along(dim, "median_dim", pick_median)
    }

    /// First row-major position holding `value`. A NaN `value` matches the
    /// first NaN element.
    pub fn first_position_of(&self, value: T) -> Option<usize> {
        if value.is_nan() {
            return self.read_data().buffer().iter().position(|v| v.is_nan());
        }
        self.eq_positions(value).first().copied()
    }

    /// Applies `pick` to every lane along `dim`.
    ///
    /// `pick` receives a non-empty lane and returns the selected value and its
    /// position within the lane.
    fn select_along<F>(
        &self,
        dim: usize,
        op_name: &str,
        pick: F,
    ) -> Result<(Tensor<T>, Tensor<i64>), AutoReduceError>
    where
        F: Fn(&[T]) -> (T, usize),
    {
        let guard = self.read_data();
        let shape = guard.shape.clone();
        validate_axis(dim, shape.len())?;
        let (outer, axis_len, inner) = axis_layout(&shape, dim);
        if axis_len == 0 {
            return Err(AutoReduceError::UnsupportedOperation(format!(
                "{} over an empty axis {} of shape {:?}",
                op_name, dim, shape
            )));
        }
        let data = guard.buffer();

        let mut values = Vec::with_capacity(outer * inner);
        let mut positions = Vec::with_capacity(outer * inner);
        let mut lane = Vec::with_capacity(axis_len);
        for o in 0..outer {
            for i in 0..inner {
                lane.clear();
                lane.extend((0..axis_len).map(|k| data[(o * axis_len + k) * inner + i]));
                let (value, pos) = pick(&lane);
                values.push(value);
                positions.push(pos as i64);
            }
        }
        drop(guard);

        let out_shape = keep_dim_shape(&shape, dim);
        Ok((
            Tensor::new(values, out_shape.clone())?,
            Tensor::new(positions, out_shape)?,
        ))
    }
}

impl<T: Element> Tensor<T> {
    /// Row-major flat positions of every element equal to `value`.
    pub fn eq_positions(&self, value: T) -> Vec<usize> {
        self.read_data()
            .buffer()
            .iter()
            .enumerate()
            .filter(|(_, v)| **v == value)
            .map(|(pos, _)| pos)
            .collect()
    }
}

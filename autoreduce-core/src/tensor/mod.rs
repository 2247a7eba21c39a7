// src/tensor/mod.rs

use crate::error::AutoReduceError;
use crate::ops::traits::Element;
use crate::tensor_data::TensorData;
use std::fmt;
use std::sync::{Arc, RwLock};

pub mod create;
mod inplace_arithmetic_methods;
mod inplace_ops;
mod reduction_methods;
pub mod utils;
mod view_methods;

pub use create::{full, randn, zeros};

/// Represents a multi-dimensional array (tensor).
///
/// `Tensor` uses `Arc<RwLock<TensorData<T>>>` internally to allow for:
/// 1.  **Shared Ownership:** cloning a `Tensor` is cheap and yields another
///     handle onto the same data.
/// 2.  **Interior Mutability:** in-place primitives (`fill_`, `scatter_`, ...)
///     and the `requires_grad` flag can be modified through `&Tensor`.
pub struct Tensor<T: Element> {
    pub(crate) data: Arc<RwLock<TensorData<T>>>,
}

impl<T: Element> Tensor<T> {
    /// Creates a new Tensor from row-major data and a shape.
    pub fn new(data_vec: Vec<T>, shape: Vec<usize>) -> Result<Self, AutoReduceError> {
        let tensor_data = TensorData::new(data_vec, shape)?;
        Ok(Self::from_data(tensor_data))
    }

    /// Wraps a single value as a 1-element tensor of shape `[1]`.
    ///
    /// This is the shape every whole-tensor reduction returns.
    pub fn scalar_1d(value: T) -> Self {
        Self::from_data(TensorData {
            buffer: Arc::new(vec![value]),
            shape: vec![1],
            strides: vec![1],
            requires_grad: false,
        })
    }

    pub(crate) fn from_data(tensor_data: TensorData<T>) -> Self {
        Tensor {
            data: Arc::new(RwLock::new(tensor_data)),
        }
    }

    /// Acquires a read lock on the tensor's data.
    /// Panics if the RwLock is poisoned.
    pub fn read_data(&self) -> std::sync::RwLockReadGuard<'_, TensorData<T>> {
        self.data.read().expect("RwLock poisoned")
    }

    /// Acquires a write lock on the tensor's data.
    /// Panics if the RwLock is poisoned.
    pub fn write_data(&self) -> std::sync::RwLockWriteGuard<'_, TensorData<T>> {
        self.data.write().expect("RwLock poisoned")
    }

    /// Returns a clone of the tensor's shape.
    pub fn shape(&self) -> Vec<usize> {
        self.read_data().shape.clone()
    }

    pub fn strides(&self) -> Vec<usize> {
        self.read_data().strides.clone()
    }

    /// Number of dimensions.
    pub fn rank(&self) -> usize {
        self.read_data().shape.len()
    }

    pub fn numel(&self) -> usize {
        self.read_data().numel()
    }

    /// Copies the elements out in row-major order.
    pub fn to_vec(&self) -> Vec<T> {
        self.read_data().buffer().to_vec()
    }

    /// Reads the element at a row-major flat position.
    pub fn item_at_flat(&self, index: usize) -> Result<T, AutoReduceError> {
        let guard = self.read_data();
        guard
            .buffer()
            .get(index)
            .copied()
            .ok_or_else(|| AutoReduceError::IndexOutOfBounds {
                index: vec![index],
                shape: guard.shape.clone(),
            })
    }

    pub fn requires_grad(&self) -> bool {
        self.read_data().requires_grad
    }

    pub fn set_requires_grad(&self, requires_grad: bool) {
        self.write_data().requires_grad = requires_grad;
    }

    /// Returns `true` if both handles point at the same `TensorData`.
    pub fn ptr_eq(&self, other: &Tensor<T>) -> bool {
        Arc::ptr_eq(&self.data, &other.data)
    }
}

impl<T: Element> Clone for Tensor<T> {
    /// Shallow clone: the new handle shares data with `self`.
    fn clone(&self) -> Self {
        Tensor {
            data: Arc::clone(&self.data),
        }
    }
}

impl<T: Element> PartialEq for Tensor<T> {
    /// Two tensors are equal when shapes and elements match.
    fn eq(&self, other: &Self) -> bool {
        if self.ptr_eq(other) {
            return true;
        }
        let a = self.read_data();
        let b = other.read_data();
        a.shape == b.shape && a.buffer() == b.buffer()
    }
}

impl<T: Element> fmt::Debug for Tensor<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let guard = self.read_data();
        f.debug_struct("Tensor")
            .field("shape", &guard.shape)
            .field("data", &guard.buffer())
            .field("requires_grad", &guard.requires_grad)
            .finish()
    }
}

#[cfg(test)]
#[path = "tests.rs"]
mod tests;

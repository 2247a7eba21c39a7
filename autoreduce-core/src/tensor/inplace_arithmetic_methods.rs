use crate::error::AutoReduceError;
use crate::ops::traits::{Element, Numeric};
use crate::tensor::inplace_ops::{div_scalar, fill, scatter};
use crate::tensor::Tensor;

impl<T: Element> Tensor<T> {
    /// Sets every element to `value`.
    pub fn fill_(&self, value: T) {
        fill::perform_fill_inplace(self, value)
    }

    /// Sets the element at a row-major flat position.
    pub fn set_flat_(&self, index: usize, value: T) -> Result<(), AutoReduceError> {
        fill::perform_set_flat_inplace(self, index, value)
    }

    /// Scatters `src` into `self` along `dim` at the positions in `index`.
    /// Positions not named by `index` are left untouched.
    pub fn scatter_(
        &self,
        dim: usize,
        index: &Tensor<i64>,
        src: &Tensor<T>,
    ) -> Result<(), AutoReduceError> {
        scatter::perform_scatter_inplace(self, dim, index, src)
    }
}

impl<T: Numeric> Tensor<T> {
    /// Divides every element by `scalar`.
    ///
    /// # Errors
    /// `AutoReduceError::DivisionByZero` if `scalar` is zero.
    pub fn div_scalar_(&self, scalar: T) -> Result<(), AutoReduceError> {
        div_scalar::perform_div_scalar_inplace(self, scalar)
    }
}

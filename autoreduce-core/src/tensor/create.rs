use crate::error::AutoReduceError;
use crate::ops::traits::{Element, Numeric};
use crate::tensor::Tensor;
use rand::Rng;
use rand_distr::{Distribution, StandardNormal};

/// Creates a new tensor of `shape` with every element set to `value`.
pub fn full<T: Element>(shape: &[usize], value: T) -> Result<Tensor<T>, AutoReduceError> {
    let numel = shape.iter().product();
    Tensor::new(vec![value; numel], shape.to_vec())
}

/// Creates a new zero-filled tensor of `shape`.
pub fn zeros<T: Numeric>(shape: &[usize]) -> Result<Tensor<T>, AutoReduceError> {
    full(shape, T::zero())
}

/// Creates a tensor with elements drawn from the standard normal distribution.
///
/// Takes the generator explicitly so tests can seed it.
pub fn randn<T, R>(shape: &[usize], rng: &mut R) -> Result<Tensor<T>, AutoReduceError>
where
    T: Numeric,
    R: Rng + ?Sized,
{
    let numel: usize = shape.iter().product();
    let data = (0..numel)
        .map(|_| {
            let sample: f64 = StandardNormal.sample(rng);
            T::from_f64(sample).ok_or_else(|| {
                AutoReduceError::InternalError("randn sample not representable".to_string())
            })
        })
        .collect::<Result<Vec<T>, _>>()?;
    Tensor::new(data, shape.to_vec())
}

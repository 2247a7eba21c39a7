use super::*;
use crate::error::AutoReduceError;
use crate::tensor::create;
use approx::assert_relative_eq;
use rand::rngs::StdRng;
use rand::SeedableRng;

fn t(data: Vec<f32>, shape: Vec<usize>) -> Tensor<f32> {
    Tensor::new(data, shape).expect("Test tensor creation failed")
}

#[test]
fn test_new_rejects_bad_length() {
    let result = Tensor::new(vec![1.0_f32, 2.0, 3.0], vec![2, 2]);
    assert_eq!(
        result.err(),
        Some(AutoReduceError::TensorCreationError { data_len: 3, shape: vec![2, 2] })
    );
}

#[test]
fn test_clone_shares_data() {
    let a = t(vec![1.0, 2.0], vec![2]);
    let b = a.clone();
    b.fill_(7.0);
    assert!(a.ptr_eq(&b));
    assert_eq!(a.to_vec(), vec![7.0, 7.0]);
}

#[test]
fn test_equality() {
    let a = t(vec![1.0, 2.0], vec![2]);
    assert_eq!(a, t(vec![1.0, 2.0], vec![2]));
    assert_ne!(a, t(vec![1.0, 2.0], vec![1, 2]));
    assert_ne!(a, t(vec![1.0, 2.5], vec![2]));
}

#[test]
fn test_whole_tensor_aggregates() -> Result<(), AutoReduceError> {
    let x = t(vec![1.0, -2.0, 3.0, 0.0, -5.0, 6.0], vec![2, 3]);
    assert_relative_eq!(x.sum_all(), 3.0);
    assert_relative_eq!(x.mean_all()?, 0.5);
    assert_relative_eq!(x.max_all()?, 6.0);
    assert_relative_eq!(x.min_all()?, -5.0);
    Ok(())
}

#[test]
fn test_max_all_empty_fails() {
    let x = t(vec![], vec![0]);
    assert!(matches!(x.max_all(), Err(AutoReduceError::UnsupportedOperation(_))));
}

#[test]
fn test_sum_and_mean_dim_keep_axis() -> Result<(), AutoReduceError> {
    let x = t(vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0], vec![2, 3]);

    let s0 = x.sum_dim(0)?;
    assert_eq!(s0.shape(), vec![1, 3]);
    assert_eq!(s0.to_vec(), vec![5.0, 7.0, 9.0]);

    let s1 = x.sum_dim(1)?;
    assert_eq!(s1.shape(), vec![2, 1]);
    assert_eq!(s1.to_vec(), vec![6.0, 15.0]);

    let m1 = x.mean_dim(1)?;
    assert_eq!(m1.to_vec(), vec![2.0, 5.0]);
    Ok(())
}

#[test]
fn test_sum_dim_invalid_axis() {
    let x = t(vec![1.0, 2.0], vec![2]);
    assert_eq!(x.sum_dim(1).err(), Some(AutoReduceError::InvalidAxis { axis: 1, rank: 1 }));
}

#[test]
fn test_max_min_dim_first_occurrence() -> Result<(), AutoReduceError> {
    let x = t(vec![3.0, 1.0, 3.0, 2.0, 2.0, 0.0], vec![2, 3]);
    let (values, indices) = x.max_dim(1)?;
    assert_eq!(values.shape(), vec![2, 1]);
    assert_eq!(values.to_vec(), vec![3.0, 2.0]);
    assert_eq!(indices.to_vec(), vec![0, 0]);

    let (values, indices) = x.min_dim(0)?;
    assert_eq!(values.to_vec(), vec![2.0, 1.0, 0.0]);
    assert_eq!(indices.to_vec(), vec![1, 0, 1]);
    Ok(())
}

#[test]
fn test_mode_dim() -> Result<(), AutoReduceError> {
    // Row 0: 2.0 appears twice. Row 1: every value once, smallest wins.
    let x = t(vec![2.0, 5.0, 2.0, 1.0, 9.0, 4.0, 7.0, 3.0], vec![2, 4]);
    let (values, indices) = x.mode_dim(1)?;
    assert_eq!(values.to_vec(), vec![2.0, 3.0]);
    assert_eq!(indices.to_vec(), vec![2, 3]);
    Ok(())
}

#[test]
fn test_median_dim_lower_median() -> Result<(), AutoReduceError> {
    let x = t(vec![4.0, 1.0, 3.0, 2.0, 9.0, 8.0, 7.0, 6.0], vec![2, 4]);
    let (values, indices) = x.median_dim(1)?;
    assert_eq!(values.to_vec(), vec![2.0, 7.0]);
    assert_eq!(indices.to_vec(), vec![3, 2]);
    Ok(())
}

#[test]
fn test_selection_over_empty_axis_fails() {
    let x = t(vec![], vec![2, 0]);
    assert!(matches!(x.median_dim(1), Err(AutoReduceError::UnsupportedOperation(_))));
}

#[test]
fn test_nan_propagates_wherever_it_sits() -> Result<(), AutoReduceError> {
    for data in [vec![f32::NAN, 1.0, 2.0], vec![1.0, f32::NAN, 2.0]] {
        let x = t(data, vec![3]);
        assert!(x.max_all()?.is_nan());
        assert!(x.min_all()?.is_nan());
    }
    let x = t(vec![f32::NAN, 1.0, 2.0, 1.0, f32::NAN, 2.0], vec![2, 3]);
    let (values, indices) = x.max_dim(1)?;
    assert!(values.to_vec().iter().all(|v| v.is_nan()));
    assert_eq!(indices.to_vec(), vec![0, 1]);
    let (_, indices) = x.min_dim(1)?;
    assert_eq!(indices.to_vec(), vec![0, 1]);
    Ok(())
}

#[test]
fn test_first_position_of_matches_nan() {
    let x = t(vec![3.0, f32::NAN, 3.0, f32::NAN], vec![2, 2]);
    assert_eq!(x.first_position_of(3.0), Some(0));
    assert_eq!(x.first_position_of(f32::NAN), Some(1));
    assert_eq!(x.first_position_of(7.0), None);
}

#[test]
fn test_eq_positions() {
    let x = t(vec![1.0, 3.0, 3.0, 2.0], vec![2, 2]);
    assert_eq!(x.eq_positions(3.0), vec![1, 2]);
    assert!(x.eq_positions(4.0).is_empty());
}

#[test]
fn test_repeat() -> Result<(), AutoReduceError> {
    let x = t(vec![1.0, 2.0], vec![1, 2]);
    let r = x.repeat(&[3, 1])?;
    assert_eq!(r.shape(), vec![3, 2]);
    assert_eq!(r.to_vec(), vec![1.0, 2.0, 1.0, 2.0, 1.0, 2.0]);

    let c = t(vec![1.0, 2.0], vec![2, 1]).repeat(&[1, 2])?;
    assert_eq!(c.to_vec(), vec![1.0, 1.0, 2.0, 2.0]);

    assert_eq!(
        x.repeat(&[2]).err(),
        Some(AutoReduceError::DimensionMismatch { expected: 2, actual: 1 })
    );
    Ok(())
}

#[test]
fn test_flatten_is_copy_on_write() -> Result<(), AutoReduceError> {
    let x = t(vec![1.0, 2.0, 3.0, 4.0], vec![2, 2]);
    let flat = x.flatten()?;
    assert_eq!(flat.shape(), vec![4]);
    flat.set_flat_(0, 10.0)?;
    assert_eq!(flat.to_vec(), vec![10.0, 2.0, 3.0, 4.0]);
    assert_eq!(x.to_vec(), vec![1.0, 2.0, 3.0, 4.0]);
    Ok(())
}

#[test]
fn test_div_scalar() -> Result<(), AutoReduceError> {
    let x = t(vec![2.0, 4.0], vec![2]);
    x.div_scalar_(2.0)?;
    assert_eq!(x.to_vec(), vec![1.0, 2.0]);
    assert_eq!(x.div_scalar_(0.0), Err(AutoReduceError::DivisionByZero));
    Ok(())
}

#[test]
fn test_set_flat_out_of_bounds() {
    let x = t(vec![0.0; 4], vec![2, 2]);
    assert!(matches!(
        x.set_flat_(4, 1.0),
        Err(AutoReduceError::IndexOutOfBounds { .. })
    ));
}

#[test]
fn test_scatter_along_axis() -> Result<(), AutoReduceError> {
    let target = create::zeros::<f32>(&[3, 2])?;
    let index = Tensor::new(vec![2_i64, 0], vec![1, 2])?;
    let src = t(vec![5.0, 6.0], vec![1, 2]);
    target.scatter_(0, &index, &src)?;
    assert_eq!(target.to_vec(), vec![0.0, 6.0, 0.0, 0.0, 5.0, 0.0]);
    Ok(())
}

#[test]
fn test_scatter_rejects_bad_index() -> Result<(), AutoReduceError> {
    let target = create::zeros::<f32>(&[2, 2])?;
    let index = Tensor::new(vec![0_i64, 2], vec![1, 2])?;
    let src = t(vec![1.0, 1.0], vec![1, 2]);
    assert_eq!(
        target.scatter_(0, &index, &src),
        Err(AutoReduceError::IndexOutOfBounds { index: vec![2, 1], shape: vec![2, 2] })
    );

    let wrong_src = t(vec![1.0, 1.0, 1.0], vec![1, 3]);
    assert!(matches!(
        target.scatter_(0, &Tensor::new(vec![0_i64; 3], vec![1, 3])?, &wrong_src),
        Err(AutoReduceError::ShapeMismatch { .. })
    ));
    Ok(())
}

#[test]
fn test_randn_is_seeded() -> Result<(), AutoReduceError> {
    let mut rng_a = StdRng::seed_from_u64(7);
    let mut rng_b = StdRng::seed_from_u64(7);
    let a = create::randn::<f64, _>(&[3, 4], &mut rng_a)?;
    let b = create::randn::<f64, _>(&[3, 4], &mut rng_b)?;
    assert_eq!(a.shape(), vec![3, 4]);
    assert_eq!(a, b);
    Ok(())
}

use super::*;
use crate::autograd::grad_check::check_grad;
use crate::utils::testing::{check_tensor_near, create_test_tensor};
use approx::assert_relative_eq;

// --- Forward Tests ---
#[test]
fn test_sum_all_forward() -> Result<(), AutoReduceError> {
    let t = create_test_tensor(vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0], vec![2, 3]);
    let mut node = sum(None);
    let out = node.forward(&t)?.into_values();
    assert_eq!(out.shape(), vec![1]);
    assert_relative_eq!(out.item_at_flat(0)?, 21.0);
    assert_eq!(node.input_shape(), Some(&[2, 3][..]));
    Ok(())
}

#[test]
fn test_mean_all_forward() -> Result<(), AutoReduceError> {
    let t = create_test_tensor(vec![1.0, 2.0, 3.0, 6.0], vec![4]);
    let out = mean(None).forward(&t)?.into_values();
    assert_eq!(out.shape(), vec![1]);
    assert_relative_eq!(out.item_at_flat(0)?, 3.0);
    Ok(())
}

#[test]
fn test_axis_forward_keeps_dim() -> Result<(), AutoReduceError> {
    let t = create_test_tensor(vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0], vec![2, 3]);
    let s = sum(Some(0)).forward(&t)?.into_values();
    check_tensor_near(&s, &[1, 3], &[5.0, 7.0, 9.0], 1e-6);

    let m = mean(Some(1)).forward(&t)?.into_values();
    check_tensor_near(&m, &[2, 1], &[2.0, 5.0], 1e-6);
    Ok(())
}

#[test]
fn test_forward_invalid_axis() {
    let t = create_test_tensor(vec![1.0, 2.0], vec![2]);
    let mut node = sum(Some(1));
    assert_eq!(
        node.forward(&t).err(),
        Some(AutoReduceError::InvalidAxis { axis: 1, rank: 1 })
    );
    // A failed forward records nothing.
    assert!(node.input_shape().is_none());
}

// --- Backward Tests ---
#[test]
fn test_sum_all_backward_is_uniform() -> Result<(), AutoReduceError> {
    let t = create_test_tensor(vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0], vec![2, 3]);
    let mut node = sum(None);
    node.forward(&t)?;
    let grad = node.backward(&Tensor::scalar_1d(5.0_f32))?;
    check_tensor_near(&grad, &[2, 3], &[5.0; 6], 1e-6);
    Ok(())
}

#[test]
fn test_mean_all_backward_divides_by_count() -> Result<(), AutoReduceError> {
    let t = create_test_tensor(vec![1.0, 2.0, 3.0, 4.0], vec![4]);
    let mut node = mean(None);
    node.forward(&t)?;
    let grad = node.backward(&Tensor::scalar_1d(8.0_f32))?;
    check_tensor_near(&grad, &[4], &[2.0; 4], 1e-6);
    Ok(())
}

#[test]
fn test_sum_axis0_backward_replicates() -> Result<(), AutoReduceError> {
    let t = create_test_tensor((0..12).map(|x| x as f32).collect(), vec![3, 4]);
    let mut node = sum(Some(0));
    node.forward(&t)?;
    let grad = node.backward(&create::full(&[1, 4], 1.0_f32)?)?;
    check_tensor_near(&grad, &[3, 4], &[1.0; 12], 1e-6);
    Ok(())
}

#[test]
fn test_mean_axis0_backward_scales() -> Result<(), AutoReduceError> {
    let t = create_test_tensor((0..12).map(|x| x as f32).collect(), vec![3, 4]);
    let mut node = mean(Some(0));
    node.forward(&t)?;
    let grad = node.backward(&create::full(&[1, 4], 1.0_f32)?)?;
    check_tensor_near(&grad, &[3, 4], &[1.0 / 3.0; 12], 1e-6);
    Ok(())
}

#[test]
fn test_axis_backward_keeps_distinct_upstream_values() -> Result<(), AutoReduceError> {
    let t = create_test_tensor(vec![0.0; 6], vec![2, 3]);
    let mut node = mean(Some(1));
    node.forward(&t)?;
    let grad = node.backward(&create_test_tensor(vec![3.0, 6.0], vec![2, 1]))?;
    check_tensor_near(&grad, &[2, 3], &[1.0, 1.0, 1.0, 2.0, 2.0, 2.0], 1e-6);
    Ok(())
}

#[test]
fn test_backward_does_not_alias_grad_output() -> Result<(), AutoReduceError> {
    let t = create_test_tensor(vec![1.0, 2.0], vec![1, 2]);
    let mut node = sum(Some(0));
    node.forward(&t)?;
    let grad_output = create_test_tensor(vec![1.0, 1.0], vec![1, 2]);
    let grad = node.backward(&grad_output)?;
    assert!(!grad.ptr_eq(&grad_output));
    grad.fill_(9.0);
    assert_eq!(grad_output.to_vec(), vec![1.0, 1.0]);
    Ok(())
}

#[test]
fn test_backward_rejects_mismatched_grad() -> Result<(), AutoReduceError> {
    let t = create_test_tensor(vec![0.0; 6], vec![2, 3]);
    let mut node = sum(Some(0));
    node.forward(&t)?;
    let result = node.backward(&create::full(&[1, 2], 1.0_f32)?);
    assert!(matches!(result, Err(AutoReduceError::ShapeMismatch { .. })));
    Ok(())
}

#[test]
fn test_backward_before_forward() {
    let mut node = mean(Some(0));
    let result = node.backward(&Tensor::scalar_1d(1.0_f32));
    assert!(matches!(result, Err(AutoReduceError::StatePrecondition { .. })));
}

#[test]
fn test_state_is_write_once_read_once() -> Result<(), AutoReduceError> {
    let t = create_test_tensor(vec![1.0, 2.0], vec![2]);
    let mut node = sum(None);
    node.forward(&t)?;
    assert!(matches!(
        node.forward(&t),
        Err(AutoReduceError::StatePrecondition { .. })
    ));

    node.backward(&Tensor::scalar_1d(1.0_f32))?;
    assert!(matches!(
        node.backward(&Tensor::scalar_1d(1.0_f32)),
        Err(AutoReduceError::StatePrecondition { .. })
    ));
    Ok(())
}

#[test]
fn test_f64_mean_backward() -> Result<(), AutoReduceError> {
    let t = Tensor::new(vec![1.0_f64; 6], vec![2, 3])?;
    let mut node = mean(Some(1));
    node.forward(&t)?;
    let grad = node.backward(&Tensor::new(vec![3.0_f64, 3.0], vec![2, 1])?)?;
    check_tensor_near(&grad, &[2, 3], &[1.0_f64; 6], 1e-12);
    Ok(())
}

// --- Gradient Check ---
#[test]
fn test_grad_check_sum_and_mean() {
    let input = Tensor::new(
        vec![0.3_f64, -1.2, 2.5, 0.7, 1.1, -0.4, 0.9, 3.3, -2.0, 0.05, 1.5, -0.8],
        vec![2, 3, 2],
    )
    .unwrap();

    for dim in [None, Some(0), Some(1), Some(2)] {
        let out_shape = sum(dim).forward(&input).unwrap().into_values().shape();
        let numel: usize = out_shape.iter().product();
        let grad_output =
            Tensor::new((0..numel).map(|i| 0.5 + i as f64).collect(), out_shape).unwrap();

        check_grad(|| Ok(sum(dim)), &input, &grad_output, 1e-6, 1e-5)
            .unwrap_or_else(|e| panic!("sum dim={:?}: {}", dim, e));
        check_grad(|| Ok(mean(dim)), &input, &grad_output, 1e-6, 1e-5)
            .unwrap_or_else(|e| panic!("mean dim={:?}: {}", dim, e));
    }
}

use autoreduce_core::tensor::Tensor;
use rand::rngs::StdRng;
use rand::SeedableRng;

// Helper function to create a basic tensor for testing.
// Added allow(dead_code) because usage across different test crates isn't detected easily.
#[allow(dead_code)]
pub fn create_test_tensor(data: Vec<f32>, shape: Vec<usize>) -> Tensor<f32> {
    Tensor::new(data, shape).expect("Test tensor creation failed")
}

/// Seeded generator so property tests are reproducible.
#[allow(dead_code)]
pub fn seeded_rng(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

/// A gradient of ones matching `shape`.
#[allow(dead_code)]
pub fn ones_like_shape(shape: &[usize]) -> Tensor<f32> {
    autoreduce_core::tensor::full(shape, 1.0_f32).expect("ones creation failed")
}

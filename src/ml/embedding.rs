// ============================================================
// Layer 5 — Input Embedding
// ============================================================
// Token id → dense vector lookup, scaled by √d_model so the
// embeddings and the sinusoidal position table have a
// comparable magnitude when they are summed.
//
// Reference: Vaswani et al. (2017) §3.4

use burn::{
    nn::{Embedding, EmbeddingConfig, Initializer},
    prelude::*,
};

#[derive(Module, Debug)]
pub struct InputEmbedding<B: Backend> {
    pub embedding: Embedding<B>,
    pub d_model:   usize,
}

impl<B: Backend> InputEmbedding<B> {
    pub fn new(d_model: usize, vocab_size: usize, device: &B::Device) -> Self {
        // EmbeddingConfig doesn't hand fan sizes to its initializer, so the
        // Xavier bound √(6 / (fan_in + fan_out)) is spelled out here.
        let bound = (6.0 / (vocab_size + d_model) as f64).sqrt();
        let embedding = EmbeddingConfig::new(vocab_size, d_model)
            .with_initializer(Initializer::Uniform { min: -bound, max: bound })
            .init(device);
        Self { embedding, d_model }
    }

    /// ids: [batch, seq_len] → [batch, seq_len, d_model]
    pub fn forward(&self, ids: Tensor<B, 2, Int>) -> Tensor<B, 3> {
        self.embedding
            .forward(ids)
            .mul_scalar((self.d_model as f64).sqrt())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use burn::backend::NdArray;

    type TestBackend = NdArray;

    #[test]
    fn test_output_shape() {
        let device = Default::default();
        let emb    = InputEmbedding::<TestBackend>::new(16, 50, &device);
        let ids    = Tensor::<TestBackend, 1, Int>::from_ints([1, 2, 3, 4, 5, 6], &device)
            .reshape([2, 3]);
        assert_eq!(emb.forward(ids).dims(), [2, 3, 16]);
    }

    #[test]
    fn test_rows_are_scaled_by_sqrt_d_model() {
        let device = Default::default();
        let emb    = InputEmbedding::<TestBackend>::new(16, 10, &device);
        let ids    = Tensor::<TestBackend, 1, Int>::from_ints([7], &device).reshape([1, 1]);

        let got: Vec<f32> = emb.forward(ids).into_data().to_vec().unwrap();
        let row: Vec<f32> = emb.embedding.weight.val()
            .slice([7..8, 0..16])
            .into_data()
            .to_vec()
            .unwrap();

        for (g, w) in got.iter().zip(row.iter()) {
            assert!((g - w * 4.0).abs() < 1e-5, "{g} != 4 * {w}");
        }
    }

    #[test]
    fn test_weights_stay_within_xavier_bound() {
        let device = Default::default();
        let emb    = InputEmbedding::<TestBackend>::new(24, 40, &device);
        let bound  = (6.0f32 / 64.0).sqrt();

        let weights: Vec<f32> = emb.embedding.weight.val().into_data().to_vec().unwrap();
        assert!(weights.iter().all(|w| w.abs() <= bound + 1e-6));
    }
}

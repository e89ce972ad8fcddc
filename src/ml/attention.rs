// ============================================================
// Layer 5 — Multi-Head Attention
// ============================================================
// Scaled dot-product attention run in `num_heads` parallel
// subspaces of size d_k = d_model / num_heads:
//
//   Attention(Q, K, V) = softmax(Q Kᵀ / √d_k) V
//
// Shapes through a forward pass:
//   inputs   [batch, seq, d_model]
//   heads    [batch, h, seq, d_k]
//   scores   [batch, h, q_len, k_len]
//   merged   [batch, q_len, d_model]
//
// Masks are boolean, `true` = may attend. Their head dim is 1
// and their query dim is either 1 (padding mask) or q_len
// (causal mask); both are expanded to the score shape.
//
// Reference: Vaswani et al. (2017) §3.2

use burn::{
    nn::{Dropout, DropoutConfig, Initializer, Linear, LinearConfig},
    prelude::*,
    tensor::activation::softmax,
};

/// Score given to masked positions before the softmax.
pub const MASK_FILL: f64 = -1e10;

#[derive(Module, Debug)]
pub struct MultiHeadAttention<B: Backend> {
    pub w_q:      Linear<B>,
    pub w_k:      Linear<B>,
    pub w_v:      Linear<B>,
    pub w_o:      Linear<B>,
    dropout:      Dropout,
    d_model:      usize,
    num_heads:    usize,
    d_k:          usize,
}

/// Result of one attention call. `weights` holds the post-softmax
/// probabilities, shape [batch, h, q_len, k_len].
#[derive(Debug, Clone)]
pub struct AttentionOutput<B: Backend> {
    pub context: Tensor<B, 3>,
    pub weights: Tensor<B, 4>,
}

impl<B: Backend> MultiHeadAttention<B> {
    pub fn new(d_model: usize, num_heads: usize, dropout: f64, device: &B::Device) -> Self {
        assert!(num_heads > 0, "num_heads must be positive");
        assert!(
            d_model % num_heads == 0,
            "d_model ({d_model}) must be divisible by num_heads ({num_heads})"
        );

        let projection = || {
            LinearConfig::new(d_model, d_model)
                .with_bias(false)
                .with_initializer(Initializer::XavierUniform { gain: 1.0 })
                .init(device)
        };

        Self {
            w_q: projection(),
            w_k: projection(),
            w_v: projection(),
            w_o: projection(),
            dropout: DropoutConfig::new(dropout).init(),
            d_model,
            num_heads,
            d_k: d_model / num_heads,
        }
    }

    /// Scaled dot-product attention over already-split heads.
    ///
    /// query: [batch, h, q_len, d_k], key/value: [batch, h, k_len, d_k],
    /// mask: broadcastable to [batch, h, q_len, k_len].
    /// Returns (weighted values [batch, h, q_len, d_k], probabilities).
    pub fn attention(
        query:   Tensor<B, 4>,
        key:     Tensor<B, 4>,
        value:   Tensor<B, 4>,
        mask:    Option<Tensor<B, 4, Bool>>,
        dropout: Option<&Dropout>,
    ) -> (Tensor<B, 4>, Tensor<B, 4>) {
        let d_k = query.dims()[3];

        let mut scores = query
            .matmul(key.swap_dims(2, 3))
            .div_scalar((d_k as f64).sqrt());

        if let Some(mask) = mask {
            let blocked = mask.expand(scores.dims()).bool_not();
            scores = scores.mask_fill(blocked, MASK_FILL);
        }

        let mut probs = softmax(scores, 3);
        if let Some(dropout) = dropout {
            probs = dropout.forward(probs);
        }

        (probs.clone().matmul(value), probs)
    }

    /// q: [batch, q_len, d_model], k/v: [batch, k_len, d_model]
    pub fn forward(
        &self,
        q:    Tensor<B, 3>,
        k:    Tensor<B, 3>,
        v:    Tensor<B, 3>,
        mask: Option<Tensor<B, 4, Bool>>,
    ) -> AttentionOutput<B> {
        let query = self.split_heads(self.w_q.forward(q));
        let key   = self.split_heads(self.w_k.forward(k));
        let value = self.split_heads(self.w_v.forward(v));

        let (x, weights) = Self::attention(query, key, value, mask, Some(&self.dropout));

        // [batch, h, q_len, d_k] → [batch, q_len, h, d_k] → [batch, q_len, d_model]
        let [batch, _, q_len, _] = x.dims();
        let merged = x.swap_dims(1, 2).reshape([batch, q_len, self.d_model]);

        AttentionOutput { context: self.w_o.forward(merged), weights }
    }

    fn split_heads(&self, x: Tensor<B, 3>) -> Tensor<B, 4> {
        let [batch, seq_len, _] = x.dims();
        x.reshape([batch, seq_len, self.num_heads, self.d_k])
            .swap_dims(1, 2)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use burn::backend::NdArray;

    type TestBackend = NdArray;

    fn random_input(batch: usize, seq: usize, d: usize) -> Tensor<TestBackend, 3> {
        Tensor::random(
            [batch, seq, d],
            burn::tensor::Distribution::Normal(0.0, 1.0),
            &Default::default(),
        )
    }

    #[test]
    fn test_self_attention_shapes() {
        let device = Default::default();
        let mha    = MultiHeadAttention::<TestBackend>::new(16, 4, 0.1, &device);
        let x      = random_input(2, 5, 16);

        let out = mha.forward(x.clone(), x.clone(), x, None);
        assert_eq!(out.context.dims(), [2, 5, 16]);
        assert_eq!(out.weights.dims(), [2, 4, 5, 5]);
    }

    #[test]
    fn test_cross_attention_with_different_lengths() {
        let device = Default::default();
        let mha    = MultiHeadAttention::<TestBackend>::new(8, 2, 0.0, &device);
        let q      = random_input(1, 3, 8);
        let kv     = random_input(1, 7, 8);

        let out = mha.forward(q, kv.clone(), kv, None);
        assert_eq!(out.context.dims(), [1, 3, 8]);
        assert_eq!(out.weights.dims(), [1, 2, 3, 7]);
    }

    #[test]
    fn test_probabilities_sum_to_one() {
        let device = Default::default();
        let mha    = MultiHeadAttention::<TestBackend>::new(8, 2, 0.0, &device);
        let x      = random_input(1, 4, 8);

        let weights: Vec<f32> = mha.forward(x.clone(), x.clone(), x, None)
            .weights.into_data().to_vec().unwrap();

        for row in weights.chunks(4) {
            let sum: f32 = row.iter().sum();
            assert!((sum - 1.0).abs() < 1e-5);
        }
    }

    #[test]
    fn test_masked_keys_get_no_weight() {
        let device = Default::default();
        let mha    = MultiHeadAttention::<TestBackend>::new(8, 2, 0.0, &device);
        let x      = random_input(1, 4, 8);

        // Only the first two keys are visible
        let mask = Tensor::<TestBackend, 1, Bool>::from_bool(
            TensorData::from([true, true, false, false]),
            &device,
        ).reshape([1, 1, 1, 4]);

        let weights: Vec<f32> = mha.forward(x.clone(), x.clone(), x, Some(mask))
            .weights.into_data().to_vec().unwrap();

        for row in weights.chunks(4) {
            assert!(row[2] < 1e-6 && row[3] < 1e-6);
            assert!((row[0] + row[1] - 1.0).abs() < 1e-5);
        }
    }

    #[test]
    fn test_attention_without_projection_matches_hand_computation() {
        let device = Default::default();
        // One head, one query, two keys: q·k = [0, 2], scaled by 1/√2
        let q = Tensor::<TestBackend, 1>::from_floats([1.0, 1.0], &device).reshape([1, 1, 1, 2]);
        let k = Tensor::<TestBackend, 1>::from_floats([0.0, 0.0, 1.0, 1.0], &device).reshape([1, 1, 2, 2]);
        let v = Tensor::<TestBackend, 1>::from_floats([1.0, 0.0, 0.0, 1.0], &device).reshape([1, 1, 2, 2]);

        let (out, probs) = MultiHeadAttention::attention(q, k, v, None, None);

        let s  = 2f32 / 2f32.sqrt();
        let p1 = s.exp() / (1.0 + s.exp());
        let probs: Vec<f32> = probs.into_data().to_vec().unwrap();
        let out:   Vec<f32> = out.into_data().to_vec().unwrap();

        assert!((probs[1] - p1).abs() < 1e-5);
        assert!((out[0] - (1.0 - p1)).abs() < 1e-5);
        assert!((out[1] - p1).abs() < 1e-5);
    }

    #[test]
    fn test_projections_have_no_bias() {
        let device = Default::default();
        let mha    = MultiHeadAttention::<TestBackend>::new(8, 2, 0.1, &device);
        assert_eq!(mha.num_params(), 4 * 8 * 8);
    }

    #[test]
    #[should_panic]
    fn test_heads_must_divide_d_model() {
        let device = Default::default();
        let _ = MultiHeadAttention::<TestBackend>::new(10, 3, 0.1, &device);
    }
}

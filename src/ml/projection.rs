use burn::{nn::Linear, prelude::*};

use super::init::xavier_linear;

/// Final linear map from the decoder's hidden size to vocabulary logits.
#[derive(Module, Debug)]
pub struct ProjectionLayer<B: Backend> {
    pub proj: Linear<B>,
}

impl<B: Backend> ProjectionLayer<B> {
    pub fn new(d_model: usize, vocab_size: usize, device: &B::Device) -> Self {
        Self { proj: xavier_linear(d_model, vocab_size, device) }
    }

    /// x: [batch, seq_len, d_model] → raw logits [batch, seq_len, vocab_size]
    pub fn forward(&self, x: Tensor<B, 3>) -> Tensor<B, 3> {
        self.proj.forward(x)
    }
}

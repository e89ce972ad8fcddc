// ============================================================
// Layer 5 — Encoder Stack
// ============================================================
// Each block:
//   x = x + SelfAttention(Norm(x), src_mask)
//   x = x + FeedForward(Norm(x))
// The stack ends with one more LayerNormalization.

use burn::prelude::*;

use crate::ml::{
    attention::MultiHeadAttention,
    feed_forward::FeedForward,
    norm::LayerNormalization,
    residual::ResidualConnection,
};

#[derive(Module, Debug)]
pub struct EncoderBlock<B: Backend> {
    pub self_attention: MultiHeadAttention<B>,
    pub feed_forward:   FeedForward<B>,
    pub residuals:      Vec<ResidualConnection<B>>,
}

impl<B: Backend> EncoderBlock<B> {
    pub fn new(
        features:       usize,
        self_attention: MultiHeadAttention<B>,
        feed_forward:   FeedForward<B>,
        dropout:        f64,
        device:         &B::Device,
    ) -> Self {
        let residuals = (0..2)
            .map(|_| ResidualConnection::new(features, dropout, device))
            .collect();
        Self { self_attention, feed_forward, residuals }
    }

    pub fn forward(&self, x: Tensor<B, 3>, src_mask: Option<Tensor<B, 4, Bool>>) -> Tensor<B, 3> {
        let x = self.residuals[0].forward(x, |h| {
            self.self_attention
                .forward(h.clone(), h.clone(), h, src_mask)
                .context
        });
        self.residuals[1].forward(x, |h| self.feed_forward.forward(h))
    }
}

#[derive(Module, Debug)]
pub struct Encoder<B: Backend> {
    pub layers: Vec<EncoderBlock<B>>,
    pub norm:   LayerNormalization<B>,
}

impl<B: Backend> Encoder<B> {
    pub fn new(features: usize, layers: Vec<EncoderBlock<B>>, device: &B::Device) -> Self {
        Self { layers, norm: LayerNormalization::new(features, device) }
    }

    /// x: [batch, src_len, d_model], mask: [batch, 1, 1, src_len]
    pub fn forward(&self, x: Tensor<B, 3>, mask: Option<Tensor<B, 4, Bool>>) -> Tensor<B, 3> {
        let x = self
            .layers
            .iter()
            .fold(x, |x, layer| layer.forward(x, mask.clone()));
        self.norm.forward(x)
    }
}

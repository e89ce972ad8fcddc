// ============================================================
// Layer 5 — Decoder Stack
// ============================================================
// Each block:
//   x = x + MaskedSelfAttention(Norm(x), tgt_mask)
//   x = x + CrossAttention(Norm(x), enc_out, enc_out, src_mask)
//   x = x + FeedForward(Norm(x))
// Queries of the cross-attention come from the decoder, keys and
// values from the encoder output. The stack ends with one more
// LayerNormalization.

use burn::prelude::*;

use crate::ml::{
    attention::MultiHeadAttention,
    feed_forward::FeedForward,
    norm::LayerNormalization,
    residual::ResidualConnection,
};

#[derive(Module, Debug)]
pub struct DecoderBlock<B: Backend> {
    pub self_attention:  MultiHeadAttention<B>,
    pub cross_attention: MultiHeadAttention<B>,
    pub feed_forward:    FeedForward<B>,
    pub residuals:       Vec<ResidualConnection<B>>,
}

impl<B: Backend> DecoderBlock<B> {
    pub fn new(
        features:        usize,
        self_attention:  MultiHeadAttention<B>,
        cross_attention: MultiHeadAttention<B>,
        feed_forward:    FeedForward<B>,
        dropout:         f64,
        device:          &B::Device,
    ) -> Self {
        let residuals = (0..3)
            .map(|_| ResidualConnection::new(features, dropout, device))
            .collect();
        Self { self_attention, cross_attention, feed_forward, residuals }
    }

    pub fn forward(
        &self,
        x:              Tensor<B, 3>,
        encoder_output: Tensor<B, 3>,
        src_mask:       Option<Tensor<B, 4, Bool>>,
        tgt_mask:       Option<Tensor<B, 4, Bool>>,
    ) -> Tensor<B, 3> {
        let x = self.residuals[0].forward(x, |h| {
            self.self_attention
                .forward(h.clone(), h.clone(), h, tgt_mask)
                .context
        });
        let x = self.residuals[1].forward(x, |h| {
            self.cross_attention
                .forward(h, encoder_output.clone(), encoder_output, src_mask)
                .context
        });
        self.residuals[2].forward(x, |h| self.feed_forward.forward(h))
    }
}

#[derive(Module, Debug)]
pub struct Decoder<B: Backend> {
    pub layers: Vec<DecoderBlock<B>>,
    pub norm:   LayerNormalization<B>,
}

impl<B: Backend> Decoder<B> {
    pub fn new(features: usize, layers: Vec<DecoderBlock<B>>, device: &B::Device) -> Self {
        Self { layers, norm: LayerNormalization::new(features, device) }
    }

    /// x: [batch, tgt_len, d_model], encoder_output: [batch, src_len, d_model]
    pub fn forward(
        &self,
        x:              Tensor<B, 3>,
        encoder_output: Tensor<B, 3>,
        src_mask:       Option<Tensor<B, 4, Bool>>,
        tgt_mask:       Option<Tensor<B, 4, Bool>>,
    ) -> Tensor<B, 3> {
        let x = self.layers.iter().fold(x, |x, layer| {
            layer.forward(x, encoder_output.clone(), src_mask.clone(), tgt_mask.clone())
        });
        self.norm.forward(x)
    }
}

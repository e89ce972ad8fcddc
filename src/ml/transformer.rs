use burn::prelude::*;

use crate::domain::settings::Settings;
use crate::ml::{
    attention::MultiHeadAttention,
    decoder::{Decoder, DecoderBlock},
    embedding::InputEmbedding,
    encoder::{Encoder, EncoderBlock},
    feed_forward::FeedForward,
    positional::PositionalEncoding,
    projection::ProjectionLayer,
};

// NOTE: #[derive(Config)] already generates Clone and Serialize/Deserialize.
#[derive(Config, Debug)]
pub struct TransformerConfig {
    pub src_vocab_size: usize,
    pub tgt_vocab_size: usize,
    pub src_seq_len:    usize,
    pub tgt_seq_len:    usize,
    #[config(default = 512)]
    pub d_model:        usize,
    /// Number of blocks in each of the encoder and decoder stacks.
    #[config(default = 6)]
    pub num_layers:     usize,
    #[config(default = 8)]
    pub num_heads:      usize,
    #[config(default = 0.1)]
    pub dropout:        f64,
    #[config(default = 2048)]
    pub d_ff:           usize,
}

impl TransformerConfig {
    /// Builds the full encoder-decoder model.
    ///
    /// Every matrix-shaped parameter (embedding tables and linear weights)
    /// is Xavier-uniform initialised; layer-norm gains and biases keep their
    /// ones/zeros start.
    pub fn init<B: Backend>(&self, device: &B::Device) -> Transformer<B> {
        let src_embed = InputEmbedding::new(self.d_model, self.src_vocab_size, device);
        let tgt_embed = InputEmbedding::new(self.d_model, self.tgt_vocab_size, device);

        let src_pos = PositionalEncoding::new(self.d_model, self.src_seq_len, self.dropout, device);
        let tgt_pos = PositionalEncoding::new(self.d_model, self.tgt_seq_len, self.dropout, device);

        let encoder_blocks = (0..self.num_layers)
            .map(|_| self.build_encoder_block(device))
            .collect();
        let decoder_blocks = (0..self.num_layers)
            .map(|_| self.build_decoder_block(device))
            .collect();

        Transformer {
            encoder:    Encoder::new(self.d_model, encoder_blocks, device),
            decoder:    Decoder::new(self.d_model, decoder_blocks, device),
            src_embed,
            tgt_embed,
            src_pos,
            tgt_pos,
            projection: ProjectionLayer::new(self.d_model, self.tgt_vocab_size, device),
        }
    }

    fn attention<B: Backend>(&self, device: &B::Device) -> MultiHeadAttention<B> {
        MultiHeadAttention::new(self.d_model, self.num_heads, self.dropout, device)
    }

    fn feed_forward<B: Backend>(&self, device: &B::Device) -> FeedForward<B> {
        FeedForward::new(self.d_model, self.d_ff, self.dropout, device)
    }

    fn build_encoder_block<B: Backend>(&self, device: &B::Device) -> EncoderBlock<B> {
        EncoderBlock::new(
            self.d_model,
            self.attention(device),
            self.feed_forward(device),
            self.dropout,
            device,
        )
    }

    fn build_decoder_block<B: Backend>(&self, device: &B::Device) -> DecoderBlock<B> {
        DecoderBlock::new(
            self.d_model,
            self.attention(device),
            self.attention(device),
            self.feed_forward(device),
            self.dropout,
            device,
        )
    }
}

impl From<&Settings> for TransformerConfig {
    fn from(s: &Settings) -> Self {
        TransformerConfig::new(s.src_vocab_size, s.tgt_vocab_size, s.src_seq_len, s.tgt_seq_len)
            .with_d_model(s.d_model)
            .with_num_layers(s.num_layers)
            .with_num_heads(s.num_heads)
            .with_dropout(s.dropout)
            .with_d_ff(s.d_ff)
    }
}

#[derive(Module, Debug)]
pub struct Transformer<B: Backend> {
    pub encoder:    Encoder<B>,
    pub decoder:    Decoder<B>,
    pub src_embed:  InputEmbedding<B>,
    pub tgt_embed:  InputEmbedding<B>,
    pub src_pos:    PositionalEncoding<B>,
    pub tgt_pos:    PositionalEncoding<B>,
    pub projection: ProjectionLayer<B>,
}

impl<B: Backend> Transformer<B> {
    /// src: [batch, src_len] → encoder output [batch, src_len, d_model]
    pub fn encode(
        &self,
        src:      Tensor<B, 2, Int>,
        src_mask: Option<Tensor<B, 4, Bool>>,
    ) -> Tensor<B, 3> {
        let x = self.src_pos.forward(self.src_embed.forward(src));
        self.encoder.forward(x, src_mask)
    }

    /// tgt: [batch, tgt_len] → decoder output [batch, tgt_len, d_model]
    pub fn decode(
        &self,
        encoder_output: Tensor<B, 3>,
        src_mask:       Option<Tensor<B, 4, Bool>>,
        tgt:            Tensor<B, 2, Int>,
        tgt_mask:       Option<Tensor<B, 4, Bool>>,
    ) -> Tensor<B, 3> {
        let x = self.tgt_pos.forward(self.tgt_embed.forward(tgt));
        self.decoder.forward(x, encoder_output, src_mask, tgt_mask)
    }

    /// [batch, seq_len, d_model] → logits [batch, seq_len, tgt_vocab_size]
    pub fn project(&self, x: Tensor<B, 3>) -> Tensor<B, 3> {
        self.projection.forward(x)
    }

    /// Longest target sequence the decoder's positional table accepts.
    pub fn max_tgt_len(&self) -> usize {
        self.tgt_pos.max_seq_len()
    }
}

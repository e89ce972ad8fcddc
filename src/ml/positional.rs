// ============================================================
// Layer 5 — Sinusoidal Positional Encoding
// ============================================================
// Self-attention is permutation-invariant, so position has to
// be injected explicitly. The table is fixed, not learned:
//
//   PE(pos, 2i)   = sin(pos / 10000^(2i / d_model))
//   PE(pos, 2i+1) = cos(pos / 10000^(2i / d_model))
//
// The table is stored as a plain tensor field, which Burn
// treats as constant module state: it never becomes a Param
// and never receives gradients.
//
// Reference: Vaswani et al. (2017) §3.5

use burn::{
    nn::{Dropout, DropoutConfig},
    prelude::*,
};

#[derive(Module, Debug)]
pub struct PositionalEncoding<B: Backend> {
    /// Shape [1, max_seq_len, d_model]
    pe:          Tensor<B, 3>,
    dropout:     Dropout,
    d_model:     usize,
    max_seq_len: usize,
}

impl<B: Backend> PositionalEncoding<B> {
    pub fn new(d_model: usize, max_seq_len: usize, dropout: f64, device: &B::Device) -> Self {
        let table = sinusoid_table(max_seq_len, d_model);
        let pe    = Tensor::<B, 3>::from_data(
            TensorData::new(table, [1, max_seq_len, d_model]),
            device,
        );
        Self {
            pe,
            dropout: DropoutConfig::new(dropout).init(),
            d_model,
            max_seq_len,
        }
    }

    pub fn max_seq_len(&self) -> usize {
        self.max_seq_len
    }

    /// x: [batch, seq_len, d_model] → same shape
    pub fn forward(&self, x: Tensor<B, 3>) -> Tensor<B, 3> {
        let [_, seq_len, _] = x.dims();
        assert!(
            seq_len <= self.max_seq_len,
            "sequence length {seq_len} exceeds the positional table length {}",
            self.max_seq_len
        );

        // [1, seq_len, d_model] broadcasts over the batch
        let pe = self.pe.clone().slice([0..1, 0..seq_len, 0..self.d_model]);
        self.dropout.forward(x + pe)
    }
}

/// Row-major [max_seq_len, d_model] sinusoid table.
fn sinusoid_table(max_seq_len: usize, d_model: usize) -> Vec<f32> {
    let scale = -(10_000f64.ln()) / d_model as f64;
    let mut table = Vec::with_capacity(max_seq_len * d_model);

    for pos in 0..max_seq_len {
        for i in 0..d_model {
            // Columns 2i and 2i+1 share the same frequency
            let div_term = ((i / 2 * 2) as f64 * scale).exp();
            let angle    = pos as f64 * div_term;
            let value    = if i % 2 == 0 { angle.sin() } else { angle.cos() };
            table.push(value as f32);
        }
    }
    table
}

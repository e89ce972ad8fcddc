// ============================================================
// Layer 5 — ML / Model Layer (Burn)
// ============================================================
// Every Burn-specific type lives in this layer. The domain and
// infra layers only see plain Rust values.
//
//   embedding.rs    — token embeddings scaled by √d_model
//   positional.rs   — fixed sinusoidal position table
//   norm.rs         — layer normalisation (unbiased std + eps)
//   attention.rs    — multi-head scaled dot-product attention
//   residual.rs     — pre-norm residual wrapper
//   feed_forward.rs — position-wise ReLU MLP
//   init.rs         — Xavier-initialised Linear layers
//   encoder.rs      — encoder blocks + final norm
//   decoder.rs      — decoder blocks + final norm
//   projection.rs   — hidden state → vocabulary logits
//   transformer.rs  — the full model and its Config
//   mask.rs         — padding / causal attention masks
//   greedy.rs       — greedy autoregressive decoding
//
// Reference: Vaswani et al. (2017) Attention Is All You Need
//            Burn Book §3 (Building Blocks)

pub mod attention;
pub mod decoder;
pub mod embedding;
pub mod encoder;
pub mod feed_forward;
pub mod greedy;
pub mod init;
pub mod mask;
pub mod norm;
pub mod positional;
pub mod projection;
pub mod residual;
pub mod transformer;

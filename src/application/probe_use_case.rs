// ============================================================
// Layer 2 — ProbeUseCase
// ============================================================
// Runs one random batch through encode → decode → project on a
// freshly built model and reports the shapes seen at each step.
// Useful to check a settings file before committing to it.

use anyhow::{ensure, Result};
use burn::prelude::*;
use rand::Rng;

use crate::domain::settings::Settings;
use crate::ml::{
    mask::{decoder_mask, padding_mask},
    transformer::{Transformer, TransformerConfig},
};

#[derive(Debug, Clone, Copy)]
pub struct ProbeRequest {
    pub batch_size: usize,
    pub src_len:    usize,
    pub tgt_len:    usize,
    pub pad_id:     u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeReport {
    pub encoder_output: [usize; 3],
    pub decoder_output: [usize; 3],
    pub logits:         [usize; 3],
}

pub struct ProbeUseCase {
    settings: Settings,
}

impl ProbeUseCase {
    pub fn new(settings: Settings) -> Self {
        Self { settings }
    }

    pub fn execute<B: Backend>(&self, req: ProbeRequest, device: &B::Device) -> Result<ProbeReport> {
        let s = &self.settings;
        s.validate()?;
        ensure!(req.batch_size > 0, "batch size must be positive");
        ensure!(
            (1..=s.src_seq_len).contains(&req.src_len),
            "source length must be in 1..={}",
            s.src_seq_len
        );
        ensure!(
            (1..=s.tgt_seq_len).contains(&req.tgt_len),
            "target length must be in 1..={}",
            s.tgt_seq_len
        );

        let model: Transformer<B> = TransformerConfig::from(s).init(device);

        let src = random_ids::<B>(req.batch_size, req.src_len, s.src_vocab_size, req.pad_id, device);
        let tgt = random_ids::<B>(req.batch_size, req.tgt_len, s.tgt_vocab_size, req.pad_id, device);

        let src_mask = padding_mask(src.clone(), req.pad_id);
        let tgt_mask = decoder_mask(tgt.clone(), req.pad_id);

        let memory = model.encode(src, Some(src_mask.clone()));
        let encoder_output = memory.dims();

        let hidden = model.decode(memory, Some(src_mask), tgt, Some(tgt_mask));
        let decoder_output = hidden.dims();

        let logits = model.project(hidden).dims();

        tracing::info!(
            "probe: encoder {:?} → decoder {:?} → logits {:?}",
            encoder_output, decoder_output, logits
        );
        Ok(ProbeReport { encoder_output, decoder_output, logits })
    }
}

/// Uniform token ids in [0, vocab_size) avoiding `pad_id`, so no row is
/// fully masked.
fn random_ids<B: Backend>(
    batch:      usize,
    len:        usize,
    vocab_size: usize,
    pad_id:     u32,
    device:     &B::Device,
) -> Tensor<B, 2, Int> {
    let mut rng = rand::thread_rng();
    let ids: Vec<i32> = (0..batch * len)
        .map(|_| loop {
            let id = rng.gen_range(0..vocab_size) as u32;
            if id != pad_id || vocab_size == 1 {
                break id as i32;
            }
        })
        .collect();

    Tensor::<B, 1, Int>::from_ints(ids.as_slice(), device).reshape([batch, len])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{tiny_settings, ScratchDir};
    use burn::backend::NdArray;

    #[test]
    fn test_probe_reports_expected_shapes() {
        let device = Default::default();
        let req    = ProbeRequest { batch_size: 3, src_len: 5, tgt_len: 4, pad_id: 0 };
        let scratch = ScratchDir::new("probe");
        let report = ProbeUseCase::new(tiny_settings(&scratch))
            .execute::<NdArray>(req, &device)
            .unwrap();

        assert_eq!(report.encoder_output, [3, 5, 8]);
        assert_eq!(report.decoder_output, [3, 4, 8]);
        assert_eq!(report.logits, [3, 4, 18]);
    }

    #[test]
    fn test_probe_rejects_lengths_beyond_positional_table() {
        let device = Default::default();
        let req    = ProbeRequest { batch_size: 1, src_len: 9, tgt_len: 2, pad_id: 0 };
        let scratch = ScratchDir::new("probe-long");
        assert!(ProbeUseCase::new(tiny_settings(&scratch))
            .execute::<NdArray>(req, &device)
            .is_err());
    }

    #[test]
    fn test_zero_d_model_is_an_error_not_a_panic() {
        let device   = Default::default();
        let scratch  = ScratchDir::new("probe-zero-width");
        let settings = Settings { d_model: 0, ..tiny_settings(&scratch) };
        let req      = ProbeRequest { batch_size: 1, src_len: 2, tgt_len: 2, pad_id: 0 };

        let err = ProbeUseCase::new(settings).execute::<NdArray>(req, &device).unwrap_err();
        assert!(err.to_string().contains("d_model"));
    }

    #[test]
    fn test_random_ids_avoid_padding() {
        let device = Default::default();
        let ids: Vec<i64> = random_ids::<NdArray>(4, 16, 3, 0, &device)
            .into_data()
            .convert::<i64>()
            .to_vec()
            .unwrap();
        assert!(ids.iter().all(|&id| id == 1 || id == 2));
    }
}

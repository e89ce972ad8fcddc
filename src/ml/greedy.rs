// ============================================================
// Layer 5 — Greedy Decoding
// ============================================================
// Autoregressive generation for a single source sequence:
//
//   memory = encode(src)
//   tgt    = [SOS]
//   repeat:
//     logits = project(decode(memory, tgt, causal_mask))
//     next   = argmax(logits[last position])
//     tgt   += next
//   until next == EOS or len(tgt) == max_len
//
// The whole prefix is re-decoded each step; there is no
// key/value cache.

use burn::prelude::*;

use crate::ml::{mask::causal_mask, transformer::Transformer};

/// Special token ids and length limit for a decoding run.
#[derive(Debug, Clone, Copy)]
pub struct GreedyOptions {
    pub sos_id:  u32,
    pub eos_id:  u32,
    pub max_len: usize,
}

/// src: [1, src_len]. Returns the generated ids, starting with `sos_id`.
///
/// `max_len` is clamped to the decoder's positional table length.
pub fn greedy_decode<B: Backend>(
    model:    &Transformer<B>,
    src:      Tensor<B, 2, Int>,
    src_mask: Option<Tensor<B, 4, Bool>>,
    opts:     GreedyOptions,
) -> Vec<u32> {
    let device  = src.device();
    let max_len = opts.max_len.min(model.max_tgt_len()).max(1);
    let memory  = model.encode(src, src_mask.clone());

    let mut tokens = vec![opts.sos_id];
    while tokens.len() < max_len {
        let len = tokens.len();
        let ids: Vec<i32> = tokens.iter().map(|&t| t as i32).collect();
        let tgt = Tensor::<B, 1, Int>::from_ints(ids.as_slice(), &device).reshape([1, len]);

        let hidden = model.decode(
            memory.clone(),
            src_mask.clone(),
            tgt,
            Some(causal_mask(len, &device)),
        );

        // Only the newest position is needed to choose the next token
        let [_, _, d_model] = hidden.dims();
        let last   = hidden.slice([0..1, len - 1..len, 0..d_model]);
        let logits = model.project(last);

        let next = logits.argmax(2).into_scalar().elem::<i64>() as u32;
        tokens.push(next);

        tracing::debug!("greedy step {}: token {}", len, next);
        if next == opts.eos_id {
            break;
        }
    }

    tokens
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ml::transformer::TransformerConfig;
    use burn::backend::NdArray;

    type TestBackend = NdArray;

    fn model(device: &<TestBackend as Backend>::Device) -> Transformer<TestBackend> {
        TransformerConfig::new(20, 20, 8, 6)
            .with_d_model(8)
            .with_num_layers(1)
            .with_num_heads(2)
            .with_d_ff(16)
            .init(device)
    }

    fn src(device: &<TestBackend as Backend>::Device) -> Tensor<TestBackend, 2, Int> {
        Tensor::<TestBackend, 1, Int>::from_ints([2, 5, 7, 3], device).reshape([1, 4])
    }

    #[test]
    fn test_output_starts_with_sos_and_respects_max_len() {
        let device = Default::default();
        let model  = model(&device);
        // An eos id outside the vocabulary can never be produced
        let opts   = GreedyOptions { sos_id: 1, eos_id: 999, max_len: 5 };

        let out = greedy_decode(&model, src(&device), None, opts);
        assert_eq!(out[0], 1);
        assert_eq!(out.len(), 5);
        assert!(out.iter().all(|&t| t < 20 || t == 1));
    }

    #[test]
    fn test_max_len_is_clamped_to_positional_table() {
        let device = Default::default();
        let model  = model(&device);
        let opts   = GreedyOptions { sos_id: 1, eos_id: 999, max_len: 100 };

        let out = greedy_decode(&model, src(&device), None, opts);
        assert_eq!(out.len(), 6);
    }

    #[test]
    fn test_stops_after_eos() {
        let device = Default::default();
        let model  = model(&device);

        // Whatever the untrained model emits first, declaring it the eos
        // token must end the run right there
        let probe = greedy_decode(
            &model,
            src(&device),
            None,
            GreedyOptions { sos_id: 1, eos_id: 999, max_len: 2 },
        );
        let first = probe[1];

        let out = greedy_decode(
            &model,
            src(&device),
            None,
            GreedyOptions { sos_id: 1, eos_id: first, max_len: 6 },
        );
        assert_eq!(out, vec![1, first]);
    }

    #[test]
    fn test_decoding_is_deterministic() {
        let device = Default::default();
        let model  = model(&device);
        let opts   = GreedyOptions { sos_id: 1, eos_id: 999, max_len: 6 };

        let a = greedy_decode(&model, src(&device), None, opts);
        let b = greedy_decode(&model, src(&device), None, opts);
        assert_eq!(a, b);
    }
}

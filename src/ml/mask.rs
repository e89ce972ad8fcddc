// ============================================================
// Layer 5 — Attention Masks
// ============================================================
// All masks are boolean with `true` meaning "may attend", laid
// out as [batch, heads=1, query, key] so MultiHeadAttention can
// expand them over heads:
//
//   padding_mask  [batch, 1, 1,   seq]   hides PAD keys
//   causal_mask   [1,     1, seq, seq]   hides future keys
//   decoder_mask  [batch, 1, seq, seq]   both of the above

use burn::prelude::*;

/// Lower-triangular mask: query position i may see keys 0..=i.
pub fn causal_mask<B: Backend>(seq_len: usize, device: &B::Device) -> Tensor<B, 4, Bool> {
    Tensor::<B, 2, Int>::ones([seq_len, seq_len], device)
        .tril(0)
        .bool()
        .reshape([1, 1, seq_len, seq_len])
}

/// Hides every key whose token id equals `pad_id`.
pub fn padding_mask<B: Backend>(ids: Tensor<B, 2, Int>, pad_id: u32) -> Tensor<B, 4, Bool> {
    let [batch, seq_len] = ids.dims();
    ids.not_equal_elem(pad_id as i64)
        .reshape([batch, 1, 1, seq_len])
}

/// Target-side mask combining padding and causality.
pub fn decoder_mask<B: Backend>(ids: Tensor<B, 2, Int>, pad_id: u32) -> Tensor<B, 4, Bool> {
    let [batch, seq_len] = ids.dims();
    let device = ids.device();

    let padding = padding_mask(ids, pad_id)
        .int()
        .expand([batch, 1, seq_len, seq_len]);
    let causal = causal_mask::<B>(seq_len, &device)
        .int()
        .expand([batch, 1, seq_len, seq_len]);

    padding.mul(causal).bool()
}

#[cfg(test)]
mod tests {
    use super::*;
    use burn::backend::NdArray;

    type TestBackend = NdArray;

    fn to_bools(mask: Tensor<TestBackend, 4, Bool>) -> Vec<bool> {
        mask.into_data().to_vec().unwrap()
    }

    #[test]
    fn test_causal_mask_is_lower_triangular() {
        let device = Default::default();
        let mask   = causal_mask::<TestBackend>(3, &device);
        assert_eq!(mask.dims(), [1, 1, 3, 3]);
        assert_eq!(
            to_bools(mask),
            vec![
                true, false, false,
                true, true,  false,
                true, true,  true,
            ]
        );
    }

    #[test]
    fn test_padding_mask_hides_pad_tokens() {
        let device = Default::default();
        let ids    = Tensor::<TestBackend, 1, Int>::from_ints([5, 9, 0, 0, 3, 0, 0, 0], &device)
            .reshape([2, 4]);
        let mask   = padding_mask(ids, 0);

        assert_eq!(mask.dims(), [2, 1, 1, 4]);
        assert_eq!(
            to_bools(mask),
            vec![true, true, false, false, true, false, false, false]
        );
    }

    #[test]
    fn test_decoder_mask_combines_padding_and_causality() {
        let device = Default::default();
        let ids    = Tensor::<TestBackend, 1, Int>::from_ints([4, 7, 1], &device).reshape([1, 3]);
        let mask   = decoder_mask(ids, 1);

        assert_eq!(mask.dims(), [1, 1, 3, 3]);
        assert_eq!(
            to_bools(mask),
            vec![
                true, false, false,
                true, true,  false,
                true, true,  false,
            ]
        );
    }
}

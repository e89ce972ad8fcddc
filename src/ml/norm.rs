use burn::{module::Param, prelude::*};

/// Layer normalisation over the last dimension with learnable gain (`alpha`)
/// and bias (`beta`).
///
/// Unlike `burn::nn::LayerNorm`, this divides by the unbiased standard
/// deviation plus `eps`, i.e. `alpha * (x - mean) / (std + eps) + beta`.
#[derive(Module, Debug)]
pub struct LayerNormalization<B: Backend> {
    pub alpha: Param<Tensor<B, 1>>,
    pub beta:  Param<Tensor<B, 1>>,
    eps:       f64,
}

impl<B: Backend> LayerNormalization<B> {
    pub const DEFAULT_EPS: f64 = 1e-6;

    pub fn new(features: usize, device: &B::Device) -> Self {
        Self::with_eps(features, Self::DEFAULT_EPS, device)
    }

    pub fn with_eps(features: usize, eps: f64, device: &B::Device) -> Self {
        Self {
            alpha: Param::from_tensor(Tensor::ones([features], device)),
            beta:  Param::from_tensor(Tensor::zeros([features], device)),
            eps,
        }
    }

    /// x: [batch, seq_len, features] → same shape
    pub fn forward(&self, x: Tensor<B, 3>) -> Tensor<B, 3> {
        // [batch, seq_len, 1], kept for broadcasting
        let mean = x.clone().mean_dim(2);
        let std  = x.clone().var(2).sqrt();

        let normed = (x - mean) / (std + self.eps);
        let alpha  = self.alpha.val().unsqueeze::<3>();
        let beta   = self.beta.val().unsqueeze::<3>();

        normed * alpha + beta
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use burn::backend::NdArray;

    type TestBackend = NdArray;

    #[test]
    fn test_rows_have_zero_mean_and_unit_unbiased_std() {
        let device = Default::default();
        let norm   = LayerNormalization::<TestBackend>::new(4, &device);
        let x      = Tensor::<TestBackend, 1>::from_floats(
            [1.0, 2.0, 3.0, 4.0, -3.0, 0.0, 3.0, 6.0],
            &device,
        ).reshape([1, 2, 4]);

        let out: Vec<f32> = norm.forward(x).into_data().to_vec().unwrap();

        for row in out.chunks(4) {
            let mean: f32 = row.iter().sum::<f32>() / 4.0;
            let var:  f32 = row.iter().map(|v| (v - mean).powi(2)).sum::<f32>() / 3.0;
            assert!(mean.abs() < 1e-5);
            assert!((var.sqrt() - 1.0).abs() < 1e-4);
        }
    }

    #[test]
    fn test_matches_hand_computed_row() {
        let device = Default::default();
        let norm   = LayerNormalization::<TestBackend>::new(3, &device);
        let x      = Tensor::<TestBackend, 1>::from_floats([1.0, 2.0, 3.0], &device)
            .reshape([1, 1, 3]);

        // mean = 2, unbiased std = 1
        let out: Vec<f32> = norm.forward(x).into_data().to_vec().unwrap();
        let want = [-1.0, 0.0, 1.0];
        for (g, w) in out.iter().zip(want) {
            assert!((g - w).abs() < 1e-5);
        }
    }

    #[test]
    fn test_constant_row_stays_finite() {
        let device = Default::default();
        let norm   = LayerNormalization::<TestBackend>::new(4, &device);
        let x      = Tensor::<TestBackend, 3>::ones([1, 1, 4], &device);

        let out: Vec<f32> = norm.forward(x).into_data().to_vec().unwrap();
        assert!(out.iter().all(|v| v.is_finite() && v.abs() < 1e-3));
    }

    #[test]
    fn test_gain_and_bias_are_parameters() {
        let device = Default::default();
        let norm   = LayerNormalization::<TestBackend>::new(8, &device);
        assert_eq!(norm.num_params(), 16);
    }
}

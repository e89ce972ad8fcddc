use burn::{
    nn::{Dropout, DropoutConfig},
    prelude::*,
};

use crate::ml::norm::LayerNormalization;

/// Pre-norm residual wrapper: `x + dropout(sublayer(norm(x)))`.
#[derive(Module, Debug)]
pub struct ResidualConnection<B: Backend> {
    pub norm: LayerNormalization<B>,
    dropout:  Dropout,
}

impl<B: Backend> ResidualConnection<B> {
    pub fn new(features: usize, dropout: f64, device: &B::Device) -> Self {
        Self {
            norm:    LayerNormalization::new(features, device),
            dropout: DropoutConfig::new(dropout).init(),
        }
    }

    pub fn forward<F>(&self, x: Tensor<B, 3>, sublayer: F) -> Tensor<B, 3>
    where
        F: FnOnce(Tensor<B, 3>) -> Tensor<B, 3>,
    {
        let out = sublayer(self.norm.forward(x.clone()));
        x + self.dropout.forward(out)
    }
}

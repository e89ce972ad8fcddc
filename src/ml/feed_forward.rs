// FFN(x) = max(0, x W1 + b1) W2 + b2, applied position-wise.
// Reference: Vaswani et al. (2017) §3.3

use burn::{
    nn::{Dropout, DropoutConfig, Linear},
    prelude::*,
    tensor::activation::relu,
};

use super::init::xavier_linear;

#[derive(Module, Debug)]
pub struct FeedForward<B: Backend> {
    pub linear_1: Linear<B>,
    pub linear_2: Linear<B>,
    dropout:      Dropout,
}

impl<B: Backend> FeedForward<B> {
    pub fn new(d_model: usize, d_ff: usize, dropout: f64, device: &B::Device) -> Self {
        Self {
            linear_1: xavier_linear(d_model, d_ff, device),
            linear_2: xavier_linear(d_ff, d_model, device),
            dropout:  DropoutConfig::new(dropout).init(),
        }
    }

    /// x: [batch, seq_len, d_model] → same shape
    pub fn forward(&self, x: Tensor<B, 3>) -> Tensor<B, 3> {
        let hidden = relu(self.linear_1.forward(x));
        self.linear_2.forward(self.dropout.forward(hidden))
    }
}

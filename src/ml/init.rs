// Xavier-uniform for weight matrices only. Linear biases keep
// Burn's default fan-in initializer.

use burn::{
    nn::{Initializer, Linear, LinearConfig},
    prelude::*,
};

pub fn xavier_linear<B: Backend>(d_input: usize, d_output: usize, device: &B::Device) -> Linear<B> {
    let config = LinearConfig::new(d_input, d_output);
    let bias   = config
        .initializer
        .init_with([d_output], Some(d_input), Some(d_output), device);

    let mut linear = config
        .with_initializer(Initializer::XavierUniform { gain: 1.0 })
        .init(device);
    linear.bias = Some(bias);
    linear
}

// ============================================================
// Layer 2 — Application / Use Cases
// ============================================================
// Workflow coordination between the ml and infra layers. No
// model math here and no printing (that's Layer 1).
//
// Every use case is generic over the Burn backend: the CLI runs
// them on `RuntimeBackend`, the tests on NdArray.

use burn::backend::wgpu::WgpuDevice;

/// Backend used by the command-line binary.
pub type RuntimeBackend = burn::backend::Wgpu;

pub fn runtime_device() -> WgpuDevice {
    WgpuDevice::default()
}

// Shared checkpoint → model rebuild
pub mod model_loader;

// Build a fresh model and save it as epoch 0
pub mod init_use_case;

// Summarise a saved checkpoint
pub mod inspect_use_case;

// Push a random batch through encode / decode / project
pub mod probe_use_case;

// Greedy-decode source token ids with a saved checkpoint
pub mod decode_use_case;


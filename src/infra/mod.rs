// ============================================================
// Layer 6 — Infrastructure Layer
// ============================================================
// File I/O used by the application layer:
//
//   config_store.rs — YAML settings file: load, merge-update,
//                     write back.
//
//   checkpoint.rs   — checkpoint path resolution (per-epoch
//                     names, latest lookup, `preload`) and
//                     weight/config persistence through Burn's
//                     CompactRecorder.
//
// Reference: Rust Book §9 (Error Handling with anyhow)
//            Burn Book §5 (Checkpointing)

/// YAML settings load/update helpers
pub mod config_store;

/// Model checkpoint path resolution, saving and loading
pub mod checkpoint;

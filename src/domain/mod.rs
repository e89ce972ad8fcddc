// ============================================================
// Layer 3 — Domain Layer
// ============================================================
// Plain Rust structs with no Burn types and no file I/O.
// The settings struct is what the YAML file deserialises into;
// the ml layer converts it into a `TransformerConfig`.

pub mod settings;

// ============================================================
// Layer 1 — CLI Commands and Arguments
// ============================================================
// clap's derive macros generate --help, error messages for
// missing args, and string → number conversion.

use clap::{Args, Subcommand};

use crate::application::{decode_use_case::DecodeRequest, probe_use_case::ProbeRequest};
use crate::infra::config_store::DEFAULT_CONFIG_FILE;

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Build a fresh model from the settings file and save it as epoch 0
    Init(InitArgs),

    /// Load a checkpoint and print its architecture and parameter counts
    Inspect(ConfigArg),

    /// Push a random batch through a freshly built model and print shapes
    Probe(ProbeArgs),

    /// Greedy-decode a sequence of source token ids with a checkpoint
    Decode(DecodeArgs),

    /// Read or modify the YAML settings file
    #[command(subcommand)]
    Config(ConfigCommands),
}

/// Path of the YAML settings file
#[derive(Args, Debug, Clone)]
pub struct ConfigArg {
    #[arg(long, short, default_value = DEFAULT_CONFIG_FILE)]
    pub config: String,
}

#[derive(Args, Debug)]
pub struct InitArgs {
    #[command(flatten)]
    pub config: ConfigArg,

    /// Overwrite epoch 0 even if the model folder already has checkpoints
    #[arg(long)]
    pub force: bool,
}

#[derive(Args, Debug)]
pub struct ProbeArgs {
    #[command(flatten)]
    pub config: ConfigArg,

    #[arg(long, default_value_t = 2)]
    pub batch_size: usize,

    #[arg(long, default_value_t = 16)]
    pub src_len: usize,

    #[arg(long, default_value_t = 16)]
    pub tgt_len: usize,

    #[arg(long, default_value_t = 0)]
    pub pad_id: u32,
}

impl From<&ProbeArgs> for ProbeRequest {
    fn from(a: &ProbeArgs) -> Self {
        ProbeRequest {
            batch_size: a.batch_size,
            src_len:    a.src_len,
            tgt_len:    a.tgt_len,
            pad_id:     a.pad_id,
        }
    }
}

#[derive(Args, Debug)]
pub struct DecodeArgs {
    #[command(flatten)]
    pub config: ConfigArg,

    /// Source token ids, comma separated (e.g. 1,45,872,2)
    #[arg(long, value_delimiter = ',', required = true)]
    pub src: Vec<u32>,

    /// Start-of-sequence token id
    #[arg(long, default_value_t = 1)]
    pub sos_id: u32,

    /// End-of-sequence token id
    #[arg(long, default_value_t = 2)]
    pub eos_id: u32,

    /// Padding token id, masked out of the source
    #[arg(long, default_value_t = 0)]
    pub pad_id: u32,

    /// Maximum output length including the start token
    #[arg(long)]
    pub max_len: Option<usize>,
}

impl From<&DecodeArgs> for DecodeRequest {
    fn from(a: &DecodeArgs) -> Self {
        DecodeRequest {
            src_ids: a.src.clone(),
            sos_id:  a.sos_id,
            eos_id:  a.eos_id,
            pad_id:  a.pad_id,
            max_len: a.max_len,
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Print the effective settings (file values plus defaults)
    Show(ConfigArg),

    /// Write a settings file with default values
    Init {
        #[command(flatten)]
        config: ConfigArg,

        /// Replace an existing file
        #[arg(long)]
        force: bool,
    },

    /// Overwrite top-level keys, e.g. `config set d_model=256 preload=null`
    Set {
        #[command(flatten)]
        config: ConfigArg,

        #[arg(required = true, value_name = "KEY=VALUE")]
        pairs: Vec<String>,
    },
}

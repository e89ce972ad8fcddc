// ============================================================
// Layer 1 — CLI / Presentation Layer
// ============================================================
// Parses arguments with clap, loads the settings file, and hands
// off to the use cases in Layer 2. Printing happens here only.

pub mod commands;

use anyhow::{bail, Result};
use clap::Parser;
use commands::{Commands, ConfigArg, ConfigCommands, DecodeArgs, InitArgs, ProbeArgs};

use crate::application::{
    decode_use_case::DecodeUseCase,
    init_use_case::InitUseCase,
    inspect_use_case::InspectUseCase,
    probe_use_case::ProbeUseCase,
    runtime_device, RuntimeBackend,
};
use crate::domain::settings::Settings;
use crate::infra::config_store::{parse_assignments, ConfigStore};

#[derive(Parser, Debug)]
#[command(
    name = "seq2seq-transformer",
    version,
    about = "Build, inspect and run an encoder-decoder Transformer."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    pub fn run(self) -> Result<()> {
        match self.command {
            Commands::Init(args)     => run_init(args),
            Commands::Inspect(args)  => run_inspect(args),
            Commands::Probe(args)    => run_probe(args),
            Commands::Decode(args)   => run_decode(args),
            Commands::Config(cmd)    => run_config(cmd),
        }
    }
}

fn load_settings(arg: &ConfigArg) -> Result<Settings> {
    ConfigStore::new(&arg.config).load()
}

fn run_init(args: InitArgs) -> Result<()> {
    let settings = load_settings(&args.config)?;
    let report   = InitUseCase::new(settings, args.force)
        .execute::<RuntimeBackend>(&runtime_device())?;

    println!(
        "Initialised {} parameters → {}",
        report.num_params,
        report.weights_path.display()
    );
    Ok(())
}

fn run_inspect(args: ConfigArg) -> Result<()> {
    let settings = load_settings(&args)?;
    let summary  = InspectUseCase::new(settings).execute::<RuntimeBackend>(&runtime_device())?;
    println!("{summary}");
    Ok(())
}

fn run_probe(args: ProbeArgs) -> Result<()> {
    let settings = load_settings(&args.config)?;
    let report   = ProbeUseCase::new(settings)
        .execute::<RuntimeBackend>((&args).into(), &runtime_device())?;

    println!("encoder output: {:?}", report.encoder_output);
    println!("decoder output: {:?}", report.decoder_output);
    println!("logits:         {:?}", report.logits);
    Ok(())
}

fn run_decode(args: DecodeArgs) -> Result<()> {
    let settings = load_settings(&args.config)?;
    let tokens   = DecodeUseCase::new(settings)
        .execute::<RuntimeBackend>(&(&args).into(), &runtime_device())?;

    let joined: Vec<String> = tokens.iter().map(u32::to_string).collect();
    println!("{}", joined.join(","));
    Ok(())
}

fn run_config(cmd: ConfigCommands) -> Result<()> {
    match cmd {
        ConfigCommands::Show(arg) => {
            let settings = load_settings(&arg)?;
            print!("{}", serde_yaml::to_string(&settings)?);
        }
        ConfigCommands::Init { config, force } => {
            let store = ConfigStore::new(&config.config);
            if store.exists() && !force {
                bail!("'{}' already exists; pass --force to replace it", config.config);
            }
            store.write(&Settings::default())?;
            println!("Wrote default settings to {}", store.path().display());
        }
        ConfigCommands::Set { config, pairs } => {
            let store    = ConfigStore::new(&config.config);
            let settings = store.update(parse_assignments(&pairs)?)?;
            if let Err(e) = settings.validate() {
                tracing::warn!("settings saved but not usable yet: {e}");
            }
            println!("Updated {}", store.path().display());
        }
    }
    Ok(())
}

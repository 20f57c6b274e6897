use std::path::PathBuf;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use tilesim_common::SimConfig;
use tilesim_kernel::{Simulation, format_checksum, verify_determinism};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "tilesim", about = "Deterministic tile-grid entity simulation benchmark")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print version and the default configuration
    Info,
    /// Run the simulation and print the final checksum
    Run {
        #[command(flatten)]
        overrides: ConfigArgs,
        /// Print the full run summary as JSON instead of the checksum line
        #[arg(long)]
        json: bool,
    },
    /// Run the simulation several times and compare checksums
    Verify {
        #[command(flatten)]
        overrides: ConfigArgs,
        /// Number of independent runs
        #[arg(short, long, default_value = "2")]
        runs: usize,
    },
}

/// Config file plus per-field overrides. Flags win over file values.
#[derive(Args)]
struct ConfigArgs {
    /// JSON config file; missing fields take defaults
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Frames to simulate
    #[arg(long)]
    frames: Option<u32>,
    /// Entities spawned before the first frame
    #[arg(long)]
    initial_entities: Option<u32>,
    /// Entities spawned each frame
    #[arg(long)]
    spawn_per_frame: Option<u32>,
    /// Tile grid width
    #[arg(long)]
    width: Option<u32>,
    /// Tile grid height
    #[arg(long)]
    height: Option<u32>,
    /// PRNG seed
    #[arg(long)]
    seed: Option<u32>,
    /// Fixed timestep in seconds
    #[arg(long)]
    dt: Option<f64>,
    /// Downward acceleration
    #[arg(long)]
    gravity: Option<f64>,
    /// Ground friction factor
    #[arg(long)]
    friction: Option<f64>,
    /// Chance that a tile is solid
    #[arg(long)]
    solid_probability: Option<f64>,
}

impl ConfigArgs {
    fn resolve(&self) -> anyhow::Result<SimConfig> {
        let mut config = match &self.config {
            Some(path) => SimConfig::from_json_file(path)
                .with_context(|| format!("load config {}", path.display()))?,
            None => SimConfig::default(),
        };
        macro_rules! apply {
            ($($field:ident),*) => {
                $(if let Some(v) = self.$field {
                    config.$field = v;
                })*
            };
        }
        apply!(
            frames,
            initial_entities,
            spawn_per_frame,
            width,
            height,
            seed,
            dt,
            gravity,
            friction,
            solid_probability
        );
        config.validate().context("invalid configuration")?;
        Ok(config)
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Info => {
            println!("tilesim v{}", env!("CARGO_PKG_VERSION"));
            println!("common: {}", tilesim_common::crate_info());
            println!("kernel: {}", tilesim_kernel::crate_info());
            println!(
                "defaults: {}",
                serde_json::to_string_pretty(&SimConfig::default())?
            );
        }
        Commands::Run { overrides, json } => {
            let config = overrides.resolve()?;
            tracing::debug!(?config, "starting run");
            let mut sim = Simulation::new(&config)?;
            let summary = sim.run();
            if json {
                println!("{}", serde_json::to_string_pretty(&summary)?);
            } else {
                println!("{}", summary.checksum_text);
            }
        }
        Commands::Verify { overrides, runs } => {
            if runs == 0 {
                anyhow::bail!("--runs must be at least 1");
            }
            let config = overrides.resolve()?;
            println!(
                "Determinism check: seed={}, frames={}, runs={runs}",
                config.seed, config.frames
            );
            let report = verify_determinism(&config, runs)?;
            for (i, checksum) in report.checksums.iter().enumerate() {
                println!("Run {}: {}", i + 1, format_checksum(*checksum));
            }
            if report.is_deterministic {
                println!("Match: OK");
            } else {
                println!("Match: MISMATCH");
                anyhow::bail!("checksums diverged across {runs} runs");
            }
        }
    }

    Ok(())
}

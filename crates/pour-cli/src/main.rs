// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! `pour-lab`: drives the pour lab headless.
//!
//! `scenario` replays a scripted pointer sequence against a fresh lab and
//! reports vessel volumes; `config` shows or seeds the JSON config.

mod output;
mod scenario;

use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{bail, ensure, Context, Result};
use clap::{Parser, Subcommand};
use lab_app_core::config::ConfigService;
use lab_app_core::config_port::ConfigPort;
use lab_app_core::settings::{LabConfig, LAB_CONFIG_KEY};
use lab_config_fs::FsConfigStore;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::scenario::ScenarioName;

#[derive(Parser, Debug)]
#[command(author, version, about = "Pour lab: headless vessel-pouring scenarios")]
struct Args {
    /// Directory holding lab.json (defaults to the platform config dir)
    #[arg(long, global = true)]
    config_dir: Option<PathBuf>,
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run a scripted pointer sequence and report vessel volumes
    Scenario {
        /// Which script to run
        #[arg(value_enum)]
        name: ScenarioName,
        /// Simulated duration in seconds
        #[arg(long, default_value_t = 3.0)]
        seconds: f32,
        /// Frames per simulated second
        #[arg(long, default_value_t = 60, value_parser = clap::value_parser!(u32).range(1..=1000))]
        fps: u32,
        /// Emit JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Inspect or seed the lab config
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigAction {
    /// Print the effective config as JSON
    Show,
    /// Write the default config to the store
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

fn main() -> Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .with_writer(std::io::stderr)
        .init();

    let store = open_store(args.config_dir.as_deref())?;
    match args.cmd {
        Command::Scenario {
            name,
            seconds,
            fps,
            json,
        } => {
            ensure!(
                seconds.is_finite() && seconds >= 0.0,
                "--seconds must be a non-negative number, got {seconds}"
            );
            let config = effective_config(store);
            let report = scenario::run(name, config, seconds, fps)
                .with_context(|| format!("scenario {name:?} failed"))?;
            let mut out = std::io::stdout().lock();
            if json {
                serde_json::to_writer_pretty(&mut out, &report)?;
                writeln!(out)?;
            } else {
                output::write_tables(&mut out, &report)?;
            }
        }
        Command::Config { action } => run_config(store, action)?,
    }
    Ok(())
}

fn open_store(dir: Option<&Path>) -> Result<FsConfigStore> {
    match dir {
        Some(dir) => FsConfigStore::at(dir)
            .with_context(|| format!("open config dir {}", dir.display())),
        None => FsConfigStore::new().context("open platform config dir"),
    }
}

fn effective_config(store: FsConfigStore) -> LabConfig {
    ConfigService::new(store).load_lab().unwrap_or_default()
}

fn run_config(store: FsConfigStore, action: ConfigAction) -> Result<()> {
    match action {
        ConfigAction::Show => {
            let config = effective_config(store);
            let mut out = std::io::stdout().lock();
            serde_json::to_writer_pretty(&mut out, &config)?;
            writeln!(out)?;
        }
        ConfigAction::Init { force } => {
            let path = store.lab_path();
            if path.exists() && !force {
                bail!("{} already exists; pass --force to overwrite", path.display());
            }
            ConfigService::new(store)
                .save(LAB_CONFIG_KEY, &LabConfig::default())
                .with_context(|| format!("write {}", path.display()))?;
            info!(path = %path.display(), "wrote default config");
            writeln!(std::io::stdout().lock(), "{}", path.display())?;
        }
    }
    Ok(())
}

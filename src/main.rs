//! Ponyshow - markdown slide decks with a live-reloading local preview.

#![allow(dead_code)]

mod actor;
mod cli;
mod config;
mod core;
mod deck;
mod embed;
mod logger;
mod pipeline;
mod publish;
mod reload;
mod render;
mod serve;
mod utils;

use anyhow::Result;
use clap::{ColorChoice, Parser};
use cli::{Cli, Commands};
use config::AppPaths;

fn main() -> Result<()> {
    // Setup global Ctrl+C handler (before any blocking operations)
    core::setup_shutdown_handler()?;

    let cli = Cli::parse();

    match cli.color {
        ColorChoice::Always => owo_colors::set_override(true),
        ColorChoice::Never => owo_colors::set_override(false),
        ColorChoice::Auto => {}
    }
    logger::set_verbose(cli.verbose);

    let paths = AppPaths::resolve()?;
    debug!("config"; "home: {}", paths.home().display());

    match &cli.command {
        Commands::Run { args } => cli::run::run_deck(args, &paths),
        Commands::New { args } => cli::new::new_deck(args, &paths),
        Commands::Config { assignment } => cli::config::run_config(assignment.as_deref(), &paths),
    }
}

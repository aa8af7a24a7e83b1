//! Command-line interface definitions.

use clap::{ColorChoice, Parser, Subcommand};
use std::path::PathBuf;

/// Markdown slide decks with a live-reloading local preview
#[derive(Parser, Debug, Clone)]
#[command(name = "pony", version, about, long_about = None, arg_required_else_help = true)]
pub struct Cli {
    /// Control colored output (auto, always, never)
    #[arg(long, global = true, default_value = "auto")]
    pub color: ColorChoice,

    /// Enable verbose output for debugging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// subcommands
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Find a deck, publish it and preview it with live reload
    #[command(visible_alias = "r")]
    Run {
        #[command(flatten)]
        args: RunArgs,
    },

    /// Create a new deck in the current directory
    #[command(visible_alias = "n")]
    New {
        #[command(flatten)]
        args: NewArgs,
    },

    /// Show settings, or set one with KEY=VALUE
    #[command(visible_alias = "c")]
    Config {
        /// Setting to change, e.g. `theme=ribbon`
        #[arg(value_name = "KEY=VALUE")]
        assignment: Option<String>,
    },
}

/// `run` command arguments.
#[derive(clap::Args, Debug, Clone, Default)]
pub struct RunArgs {
    /// Directory to search for decks (default: current directory)
    #[arg(value_hint = clap::ValueHint::DirPath)]
    pub path: Option<PathBuf>,

    /// Present a localized variant from `locales/<CODE>.md`
    #[arg(short, long, value_name = "CODE")]
    pub locale: Option<String>,

    /// HTTP port (overrides settings and `PORT`)
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Live reload socket port
    #[arg(short, long)]
    pub wsport: Option<u16>,

    /// Don't open a browser
    #[arg(long)]
    pub no_open: bool,
}

/// `new` command arguments. Anything left out is asked for interactively.
#[derive(clap::Args, Debug, Clone, Default)]
pub struct NewArgs {
    /// Deck directory name (spaces become `-`)
    pub name: String,

    #[arg(long)]
    pub title: Option<String>,

    #[arg(long)]
    pub description: Option<String>,

    #[arg(long)]
    pub author: Option<String>,

    /// Theme (default: the configured theme)
    #[arg(long)]
    pub theme: Option<String>,

    /// Deck language (default: the configured locale)
    #[arg(long)]
    pub locale: Option<String>,

    #[arg(long)]
    pub license: Option<String>,
}

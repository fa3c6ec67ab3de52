// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//
//! Revpick CLI - pick revisions to release across architectures

use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use revpick::commands::{self, view::ViewArgs, Globals};
use revpick::config;
use revpick::types::{AvailableMode, RevisionId};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "revpick")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Quiet mode (suppress non-error output)
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Configuration file path
    #[arg(short, long, env = "REVPICK_CONFIG", global = true)]
    config: Option<PathBuf>,

    /// Catalog snapshot override
    #[arg(long, env = "REVPICK_CATALOG", global = true)]
    catalog: Option<PathBuf>,

    /// Disable colored output
    #[arg(
        long,
        env = "NO_COLOR",
        global = true,
        value_parser = clap::builder::FalseyValueParser::new()
    )]
    no_color: bool,

    /// Output in JSON format
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the revisions list for a channel and architecture
    View {
        /// Channel as track/risk[/branch]; defaults to latest/available with --arch
        #[arg(long)]
        channel: Option<String>,

        /// Architecture to browse
        #[arg(long)]
        arch: Option<String>,

        /// Available revisions mode (all, unreleased, recent, launchpad)
        #[arg(long, default_value = "all")]
        mode: AvailableMode,

        /// Revisions to select
        #[arg(long, num_args = 1..)]
        select: Vec<RevisionId>,

        /// Show every revision instead of the first page
        #[arg(long)]
        all: bool,
    },

    /// Run line commands from stdin against one session
    Session,

    /// Summarize the catalog snapshot
    Catalog,

    /// Print the effective configuration
    Config,

    /// Generate shell completions
    Completions {
        /// Shell type (bash, zsh, fish, powershell)
        shell: clap_complete::Shell,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let mut config = config::load(cli.config.as_deref())?;
    if let Some(catalog) = cli.catalog {
        config.catalog = catalog;
    }

    // Initialize logging
    let log_level = match cli.verbose {
        0 if cli.quiet => tracing::Level::ERROR,
        0 => config.level()?,
        1 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };

    tracing_subscriber::fmt()
        .with_max_level(log_level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let globals = Globals {
        catalog: config.catalog.clone(),
        json: cli.json,
        color: !cli.no_color,
        page_size: config.page_size,
        recent_days: config.recent_window_days,
    };

    // Execute command
    match cli.command {
        Commands::View {
            channel,
            arch,
            mode,
            select,
            all,
        } => commands::view::run(
            &globals,
            ViewArgs {
                channel,
                arch,
                mode,
                select,
                all,
            },
        ),
        Commands::Session => commands::session::run(&globals),
        Commands::Catalog => commands::catalog::run(&globals),
        Commands::Config => commands::config::run(&config, cli.json),
        Commands::Completions { shell } => commands::completions::run(shell, &mut Cli::command()),
    }
}

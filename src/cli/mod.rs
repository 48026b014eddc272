//! CLI module - command-line interface definitions and handlers
//!
//! Uses clap v4 with derive macros for argument parsing.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub mod commands;
pub mod output;

/// skillmap - analyze skill frequency across job postings
#[derive(Parser, Debug)]
#[command(name = "skillmap")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable JSON output for machine consumption
    #[arg(long, global = true)]
    pub robot: bool,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Config file path (default: ~/.config/skillmap/config.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Database path (overrides config)
    #[arg(long, global = true)]
    pub db: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Ingest job postings and (optionally) the hierarchy definition
    Ingest(commands::ingest::IngestArgs),

    /// Count mentions and propagate frequencies up the hierarchy
    Analyze(commands::analyze::AnalyzeArgs),

    /// Show top skills by frequency
    Top(commands::top::TopArgs),

    /// Show a skill's hierarchy slice with aggregate rows
    Tree(commands::tree::TreeArgs),

    /// Search skills by name
    Search(commands::search::SearchArgs),

    /// Show parents and children of a skill
    Rel(commands::rel::RelArgs),

    /// List postings that mention a skill
    Jobs(commands::jobs::JobsArgs),

    /// Show database contents and frequency summary
    Status(commands::status::StatusArgs),

    /// Show edge weight distribution
    Weights(commands::weights::WeightsArgs),

    /// Clear derived or all data
    Reset(commands::reset::ResetArgs),
}

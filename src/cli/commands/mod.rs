//! CLI command implementations
//!
//! Each subcommand has its own module with:
//! - Args struct for command-line arguments
//! - `run()` function to execute the command

use crate::app::AppContext;
use crate::cli::Commands;
use crate::error::Result;

pub mod analyze;
pub mod ingest;
pub mod jobs;
pub mod rel;
pub mod reset;
pub mod search;
pub mod status;
pub mod top;
pub mod tree;
pub mod weights;

/// Dispatch a command to its handler
pub fn run(ctx: &AppContext, command: &Commands) -> Result<()> {
    match command {
        Commands::Ingest(args) => ingest::run(ctx, args),
        Commands::Analyze(args) => analyze::run(ctx, args),
        Commands::Top(args) => top::run(ctx, args),
        Commands::Tree(args) => tree::run(ctx, args),
        Commands::Search(args) => search::run(ctx, args),
        Commands::Rel(args) => rel::run(ctx, args),
        Commands::Jobs(args) => jobs::run(ctx, args),
        Commands::Status(args) => status::run(ctx, args),
        Commands::Weights(args) => weights::run(ctx, args),
        Commands::Reset(args) => reset::run(ctx, args),
    }
}

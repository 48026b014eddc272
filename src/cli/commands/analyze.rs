//! skillmap analyze - recompute leaf and aggregate frequencies.

use clap::Args;
use colored::Colorize;
use tracing::info;

use crate::analysis::run_analysis;
use crate::app::AppContext;
use crate::cli::output;
use crate::error::Result;
use crate::storage::RunLock;

#[derive(Args, Debug, Default)]
pub struct AnalyzeArgs {}

pub fn run(ctx: &AppContext, _args: &AnalyzeArgs) -> Result<()> {
    let data_dir = ctx.config.data_dir()?;
    let _lock = RunLock::acquire(&data_dir)?;

    let outcome = run_analysis(&ctx.db)?;
    info!(
        run_id = %outcome.run_id,
        mentions = outcome.mention_count,
        aggregates = outcome.aggregate_count,
        "analysis complete"
    );

    if ctx.robot_mode {
        return output::emit_json(&outcome);
    }

    output::heading("Analysis complete");
    output::field("run id", &outcome.run_id);
    output::field("mentions counted", outcome.mention_count);
    output::field("skills with direct mentions", outcome.leaf_count);
    output::field("skills with aggregate rows", outcome.aggregate_count);
    if outcome.mention_count == 0 {
        println!(
            "{}",
            "No job mentions found; ingest jobs first with `skillmap ingest --jobs`.".yellow()
        );
    }
    Ok(())
}

//! skillmap top - highest-frequency skills.

use clap::Args;
use colored::Colorize;
use serde::Serialize;

use crate::analysis::report::{top_skills, FrequencyRow, RankBy};
use crate::app::AppContext;
use crate::cli::output;
use crate::error::Result;

#[derive(Args, Debug)]
pub struct TopArgs {
    /// Max skills to display (default from config)
    #[arg(long)]
    pub limit: Option<usize>,

    /// Ranking key
    #[arg(long, value_enum, default_value = "total")]
    pub by: RankBy,
}

#[derive(Debug, Serialize)]
struct TopReport {
    status: &'static str,
    count: usize,
    skills: Vec<FrequencyRow>,
}

pub fn run(ctx: &AppContext, args: &TopArgs) -> Result<()> {
    let limit = args.limit.unwrap_or(ctx.config.report.top_limit);
    let rows = top_skills(&ctx.db, limit, args.by)?;

    if ctx.robot_mode {
        return output::emit_json(&TopReport {
            status: "ok",
            count: rows.len(),
            skills: rows,
        });
    }

    if rows.is_empty() {
        println!("No frequency data. Run `skillmap analyze` first.");
        return Ok(());
    }

    output::heading(&format!("Top {} skills", rows.len()));
    println!(
        "  {:<4} {:<32} {:>8} {:>8} {:>6}",
        "#".dimmed(),
        "skill".dimmed(),
        "total".dimmed(),
        "direct".dimmed(),
        "jobs".dimmed()
    );
    for (rank, row) in rows.iter().enumerate() {
        println!(
            "  {:<4} {:<32} {:>8} {:>8} {:>6}",
            rank + 1,
            row.name,
            row.total_frequency,
            row.direct_frequency,
            row.job_count
        );
    }
    Ok(())
}

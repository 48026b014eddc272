//! skillmap tree - downward hierarchy slice with frequencies.

use clap::Args;
use colored::Colorize;
use serde::Serialize;

use crate::analysis::report::{hierarchy_slice, HierarchyRow};
use crate::app::AppContext;
use crate::cli::output;
use crate::error::Result;

#[derive(Args, Debug)]
pub struct TreeArgs {
    /// Root skill name (case-insensitive)
    pub skill: String,

    /// Levels below the root to include (default from config)
    #[arg(long)]
    pub depth: Option<usize>,
}

#[derive(Debug, Serialize)]
struct TreeReport {
    status: &'static str,
    root: String,
    depth: usize,
    rows: Vec<HierarchyRow>,
}

pub fn run(ctx: &AppContext, args: &TreeArgs) -> Result<()> {
    let depth = args.depth.unwrap_or(ctx.config.report.tree_depth);
    let rows = hierarchy_slice(&ctx.db, &args.skill, depth)?;

    if ctx.robot_mode {
        return output::emit_json(&TreeReport {
            status: "ok",
            root: args.skill.clone(),
            depth,
            rows,
        });
    }

    output::heading(&format!("Hierarchy under {:?} (depth {})", args.skill, depth));
    for row in &rows {
        let indent = "  ".repeat(row.level + 1);
        println!(
            "{}{} {}",
            indent,
            row.name,
            format!(
                "(total {}, direct {}, jobs {})",
                row.total_frequency, row.direct_frequency, row.job_count
            )
            .dimmed()
        );
    }
    Ok(())
}

//! skillmap status - database contents and frequency summary.

use clap::Args;
use serde::Serialize;

use crate::analysis::report::{summary, SummaryStats};
use crate::app::AppContext;
use crate::cli::output;
use crate::error::Result;

#[derive(Args, Debug, Default)]
pub struct StatusArgs {}

#[derive(Debug, Serialize)]
struct StatusReport {
    status: &'static str,
    schema_version: u32,
    skills: i64,
    edges: i64,
    jobs: i64,
    mentions: i64,
    provenance: Vec<(String, i64)>,
    frequencies: Option<SummaryStats>,
}

pub fn run(ctx: &AppContext, _args: &StatusArgs) -> Result<()> {
    let report = StatusReport {
        status: "ok",
        schema_version: ctx.db.schema_version(),
        skills: ctx.db.table_count("skills")?,
        edges: ctx.db.table_count("skill_edges")?,
        jobs: ctx.db.table_count("jobs")?,
        mentions: ctx.db.table_count("skill_mentions")?,
        provenance: ctx.db.provenance_counts()?,
        frequencies: summary(&ctx.db)?,
    };

    if ctx.robot_mode {
        return output::emit_json(&report);
    }

    output::heading("Database");
    output::field("schema version", report.schema_version);
    output::field("skills", report.skills);
    output::field("edges", report.edges);
    output::field("jobs", report.jobs);
    output::field("mentions", report.mentions);
    for (provenance, count) in &report.provenance {
        output::field(&format!("  {provenance}"), count);
    }

    match &report.frequencies {
        Some(stats) => {
            output::heading("Frequencies");
            output::field("skills with rows", stats.skill_count);
            output::field("total direct mentions", stats.total_direct);
            output::field("total with hierarchy", stats.total_with_hierarchy);
            output::field("avg direct", format!("{:.2}", stats.avg_direct));
            output::field("max total", stats.max_total);
        }
        None => println!("No frequency data yet. Run `skillmap analyze`."),
    }
    Ok(())
}

//! skillmap ingest - load job postings and the hierarchy definition.

use std::path::PathBuf;

use clap::Args;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use tracing::info;

use crate::app::AppContext;
use crate::cli::output;
use crate::error::Result;
use crate::ingest::{
    hierarchy::{ingest_hierarchy, load_hierarchy},
    jobs::{ingest_jobs, load_jobs_file},
    BatchStats, HierarchyStats,
};

#[derive(Args, Debug)]
pub struct IngestArgs {
    /// JSON file of job postings
    #[arg(long)]
    pub jobs: Option<PathBuf>,

    /// JSON file mapping parent skills to their children
    #[arg(long)]
    pub hierarchy: Option<PathBuf>,
}

#[derive(Debug, Serialize)]
struct IngestReport {
    status: &'static str,
    hierarchy: Option<HierarchyStats>,
    jobs: Option<BatchStats>,
}

pub fn run(ctx: &AppContext, args: &IngestArgs) -> Result<()> {
    if args.jobs.is_none() && args.hierarchy.is_none() {
        return Err(crate::error::SkillmapError::Config(
            "nothing to ingest: pass --jobs and/or --hierarchy".to_string(),
        ));
    }

    // Hierarchy first so job mentions attach to already-known skills.
    let hierarchy_stats = match &args.hierarchy {
        Some(path) => {
            let def = load_hierarchy(path)?;
            let stats = ingest_hierarchy(&ctx.db, &def)?;
            info!(path = %path.display(), ?stats, "hierarchy file ingested");
            Some(stats)
        }
        None => None,
    };

    let job_stats = match &args.jobs {
        Some(path) => {
            let records = load_jobs_file(path)?;
            let progress = job_progress(ctx, records.len());
            let stats = ingest_jobs(&ctx.db, &records, &progress)?;
            progress.finish_and_clear();
            info!(path = %path.display(), ?stats, "jobs file ingested");
            Some(stats)
        }
        None => None,
    };

    if ctx.robot_mode {
        return output::emit_json(&IngestReport {
            status: "ok",
            hierarchy: hierarchy_stats,
            jobs: job_stats,
        });
    }

    if let Some(stats) = hierarchy_stats {
        output::heading("Hierarchy");
        output::field("skills created", stats.skills_created);
        output::field("edges added", stats.edges_added);
        output::field("edges already present", stats.edges_skipped);
    }
    if let Some(stats) = job_stats {
        output::heading("Jobs");
        output::field("total records", stats.total);
        output::field("processed", stats.processed);
        output::field("mentions recorded", stats.mentions_recorded);
        if stats.failed > 0 {
            output::field("failed", stats.failed.to_string().red());
        }
        if stats.skipped > 0 {
            output::field("skipped (no skills)", stats.skipped);
        }
    }
    println!("{}", "Run `skillmap analyze` to refresh frequencies.".dimmed());
    Ok(())
}

fn job_progress(ctx: &AppContext, total: usize) -> ProgressBar {
    if ctx.robot_mode {
        return ProgressBar::hidden();
    }
    let bar = ProgressBar::new(total as u64);
    bar.set_style(
        ProgressStyle::with_template("{spinner} [{bar:30}] {pos}/{len} postings")
            .unwrap_or_else(|_| ProgressStyle::default_bar()),
    );
    bar
}

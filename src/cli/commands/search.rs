//! skillmap search - find skills by name fragment.

use clap::Args;
use serde::Serialize;

use crate::analysis::report::{search, FrequencyRow};
use crate::app::AppContext;
use crate::cli::output;
use crate::error::Result;

#[derive(Args, Debug)]
pub struct SearchArgs {
    /// Substring to match against skill names
    pub term: String,
}

#[derive(Debug, Serialize)]
struct SearchReport {
    status: &'static str,
    term: String,
    count: usize,
    skills: Vec<FrequencyRow>,
}

pub fn run(ctx: &AppContext, args: &SearchArgs) -> Result<()> {
    let rows = search(&ctx.db, &args.term)?;

    if ctx.robot_mode {
        return output::emit_json(&SearchReport {
            status: "ok",
            term: args.term.clone(),
            count: rows.len(),
            skills: rows,
        });
    }

    if rows.is_empty() {
        println!("No skills match {:?}.", args.term);
        return Ok(());
    }

    output::heading(&format!("{} skills match {:?}", rows.len(), args.term));
    for row in &rows {
        println!(
            "  {} (total {}, direct {}, jobs {})",
            row.name, row.total_frequency, row.direct_frequency, row.job_count
        );
    }
    Ok(())
}

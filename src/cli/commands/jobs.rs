//! skillmap jobs - postings mentioning one skill.

use clap::Args;
use colored::Colorize;

use crate::analysis::report::jobs_with_skill;
use crate::app::AppContext;
use crate::cli::output;
use crate::error::Result;

#[derive(Args, Debug)]
pub struct JobsArgs {
    /// Skill name (case-insensitive)
    pub skill: String,
}

pub fn run(ctx: &AppContext, args: &JobsArgs) -> Result<()> {
    let view = jobs_with_skill(&ctx.db, &args.skill)?;

    if ctx.robot_mode {
        return output::emit_json(&view);
    }

    if view.jobs.is_empty() {
        println!("No postings mention {:?}.", view.skill);
        return Ok(());
    }

    output::heading(&format!(
        "{} postings mention {}",
        view.jobs.len(),
        view.skill
    ));
    for (job_id, mentions) in &view.jobs {
        println!("  {} {}", job_id, format!("({mentions} mentions)").dimmed());
    }
    Ok(())
}

//! skillmap rel - parents and children of one skill.

use clap::Args;
use colored::Colorize;

use crate::analysis::report::relationships_of;
use crate::app::AppContext;
use crate::cli::output;
use crate::error::Result;

#[derive(Args, Debug)]
pub struct RelArgs {
    /// Skill name (case-insensitive)
    pub skill: String,
}

pub fn run(ctx: &AppContext, args: &RelArgs) -> Result<()> {
    let view = relationships_of(&ctx.db, &args.skill)?;

    if ctx.robot_mode {
        return output::emit_json(&view);
    }

    output::heading(&view.skill);
    println!("  {}", "parents:".dimmed());
    if view.parents.is_empty() {
        println!("    (none)");
    }
    for (name, weight) in &view.parents {
        println!("    {} (weight {:.2})", name, weight);
    }
    println!("  {}", "children:".dimmed());
    if view.children.is_empty() {
        println!("    (none)");
    }
    for (name, weight) in &view.children {
        println!("    {} (weight {:.2})", name, weight);
    }
    Ok(())
}

//! skillmap reset - clear derived or all data.

use std::io::{self, BufRead, Write};

use clap::Args;
use colored::Colorize;
use serde::Serialize;
use tracing::warn;

use crate::app::AppContext;
use crate::cli::output;
use crate::error::Result;

#[derive(Args, Debug)]
pub struct ResetArgs {
    /// Only clear the computed frequency tables, keep skills and jobs
    #[arg(long)]
    pub frequencies_only: bool,

    /// Skip the confirmation prompt
    #[arg(long, short = 'y')]
    pub yes: bool,
}

#[derive(Debug, Serialize)]
struct ResetReport {
    status: &'static str,
    scope: &'static str,
}

pub fn run(ctx: &AppContext, args: &ResetArgs) -> Result<()> {
    let scope = if args.frequencies_only {
        "frequencies"
    } else {
        "all"
    };

    if !args.yes && !ctx.robot_mode {
        let prompt = if args.frequencies_only {
            "Clear computed frequency tables?"
        } else {
            "Delete ALL skills, edges, jobs and frequencies?"
        };
        if !confirm(prompt)? {
            println!("Aborted.");
            return Ok(());
        }
    }

    if args.frequencies_only {
        ctx.db.clear_frequencies()?;
    } else {
        ctx.db.clear_all()?;
    }
    warn!(scope, "database reset");

    if ctx.robot_mode {
        return output::emit_json(&ResetReport {
            status: "ok",
            scope,
        });
    }
    println!("{}", format!("Reset complete ({scope}).").bold());
    Ok(())
}

fn confirm(prompt: &str) -> Result<bool> {
    print!("{prompt} [y/N] ");
    io::stdout().flush()?;
    let mut answer = String::new();
    io::stdin().lock().read_line(&mut answer)?;
    Ok(matches!(answer.trim(), "y" | "Y" | "yes"))
}

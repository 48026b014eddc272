//! skillmap weights - edge weight distribution.

use clap::Args;

use crate::analysis::report::weight_summary;
use crate::app::AppContext;
use crate::cli::output;
use crate::error::Result;

#[derive(Args, Debug, Default)]
pub struct WeightsArgs {}

pub fn run(ctx: &AppContext, _args: &WeightsArgs) -> Result<()> {
    let ws = weight_summary(&ctx.db)?;

    if ctx.robot_mode {
        return output::emit_json(&ws);
    }

    if ws.edge_count == 0 {
        println!("No edges. Ingest a hierarchy first with `skillmap ingest --hierarchy`.");
        return Ok(());
    }

    output::heading(&format!("Edge weights ({} edges)", ws.edge_count));
    output::field("min", format!("{:.2}", ws.min));
    output::field("max", format!("{:.2}", ws.max));
    output::field("avg", format!("{:.2}", ws.avg));
    output::field("critical (>= 0.80)", ws.critical);
    output::field("important (0.70-0.79)", ws.important);
    output::field("moderate (0.60-0.69)", ws.moderate);
    output::field("low (< 0.60)", ws.low);
    Ok(())
}

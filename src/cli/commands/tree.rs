//! tree command - Emit the generation-layered layout as JSON

use anyhow::Result;

use crate::core::layout::{layout, LayoutOptions};
use crate::ui::output;

use super::Context;

/// Print the pedigree layout for a colony.
///
/// The JSON output (positioned nodes plus parent edges) is the entire
/// contract with rendering front ends.
pub fn tree(ctx: &Context, colony: &str, gap: Option<f64>) -> Result<()> {
    let state = super::load(ctx, colony)?;
    let options = LayoutOptions {
        vertical_gap: gap.unwrap_or(ctx.vertical_gap),
    };
    output::json(&layout(&state, &options))
}

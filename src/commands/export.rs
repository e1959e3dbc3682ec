use anyhow::{Context as _, Result};
use std::path::Path;

use crate::context::Context;
use crate::diff::{DiffRenderOptions, DiffRenderer, HtmlRenderer, PlanView};
use crate::plan::PlanFilter;

/// Handles the 'export' command - writes a self-contained HTML review page
pub struct ExportCommand;

impl ExportCommand {
    /// Execute the export command
    pub fn execute(
        ctx: &Context,
        source: &str,
        output_path: &Path,
        filter: &PlanFilter,
        options: &DiffRenderOptions,
    ) -> Result<()> {
        let plan = super::load_plan(ctx, source)?;
        let view = PlanView::build(&plan, filter);

        let html = HtmlRenderer::new().render(&view, options);

        ctx.fs
            .write(output_path, &html)
            .with_context(|| format!("Failed to write HTML report to {}", output_path.display()))?;

        ctx.output.success(&format!(
            "Exported {} resource change{} to {}",
            view.resources.len(),
            if view.resources.len() == 1 { "" } else { "s" },
            output_path.display()
        ));

        if view.hidden > 0 {
            ctx.output
                .dimmed(&format!("{} hidden by filter", view.hidden));
        }

        Ok(())
    }
}

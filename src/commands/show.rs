use anyhow::{Context as _, Result};
use clap::ValueEnum;

use crate::context::Context;
use crate::diff::{AsciiRenderer, DiffRenderOptions, DiffRenderer, PlanView};
use crate::plan::PlanFilter;

/// How `show` prints the plan
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human readable diff
    #[default]
    Text,
    /// The filtered plan view as JSON
    Json,
}

/// Handles the 'show' command - prints the filtered, normalized diff
pub struct ShowCommand;

impl ShowCommand {
    /// Execute the show command
    pub fn execute(
        ctx: &Context,
        source: &str,
        filter: &PlanFilter,
        options: &DiffRenderOptions,
        format: OutputFormat,
    ) -> Result<()> {
        let plan = super::load_plan(ctx, source)?;
        let mut view = PlanView::build(&plan, filter);

        tracing::debug!(
            visible = view.resources.len(),
            hidden = view.hidden,
            filtered = !filter.is_default(),
            "Built plan view"
        );

        match format {
            OutputFormat::Text => {
                ctx.output
                    .plain(&AsciiRenderer::new().render(&view, options));
            }
            OutputFormat::Json => {
                if !options.show_sensitive {
                    view.redact_sensitive();
                }
                let json = serde_json::to_string_pretty(&view)
                    .context("Failed to serialize plan view")?;
                ctx.output.plain(&format!("{}\n", json));
            }
        }

        Ok(())
    }
}

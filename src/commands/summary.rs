use anyhow::Result;

use crate::context::Context;
use crate::plan::PlanSummary;

/// Handles the 'summary' command - prints resource counts per category
pub struct SummaryCommand;

impl SummaryCommand {
    /// Execute the summary command
    pub fn execute(ctx: &Context, source: &str) -> Result<()> {
        let plan = super::load_plan(ctx, source)?;
        let summary = plan.summary();

        ctx.output.section("Plan Summary");

        if !plan.format_version.is_empty() {
            ctx.output.key_value("Format version", &plan.format_version);
        }
        if let Some(version) = &plan.terraform_version {
            ctx.output.key_value("Terraform version", version);
        }
        ctx.output
            .key_value("Resource changes", &plan.resource_changes.len().to_string());
        ctx.output.blank();

        Self::print_counts(ctx, &summary);

        ctx.output.blank();
        if summary.has_changes() {
            ctx.output.warning(&format!(
                "{} resource{} will change",
                summary.total_changes(),
                if summary.total_changes() == 1 { "" } else { "s" }
            ));
        } else {
            ctx.output.success("No changes. Infrastructure matches the configuration.");
        }

        Ok(())
    }

    fn print_counts(ctx: &Context, summary: &PlanSummary) {
        let rows = [
            ("To add", summary.to_add),
            ("To change", summary.to_change),
            ("To replace", summary.to_replace),
            ("To destroy", summary.to_destroy),
            ("To read", summary.to_read),
            ("Unchanged", summary.unchanged),
        ];

        for (label, count) in rows {
            if count > 0 && label != "Unchanged" {
                ctx.output.key_value_highlight(label, &count.to_string());
            } else {
                ctx.output.key_value(label, &count.to_string());
            }
        }
    }
}

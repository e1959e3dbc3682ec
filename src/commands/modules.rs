use anyhow::Result;

use crate::context::Context;
use crate::plan::Module;

/// Handles the 'modules' command - prints the planned module tree
pub struct ModulesCommand;

impl ModulesCommand {
    /// Execute the modules command
    pub fn execute(ctx: &Context, source: &str, show_resources: bool) -> Result<()> {
        let plan = super::load_plan(ctx, source)?;
        let root = &plan.planned_values.root_module;

        ctx.output.section("Modules");

        if root.resource_count() == 0 && root.child_modules.is_empty() {
            ctx.output.dimmed("The plan has no planned values");
            return Ok(());
        }

        root.walk(&mut |module: &Module, depth| {
            ctx.output.tree_item(
                depth,
                &format!(
                    "{} ({} resource{})",
                    module.display_address(),
                    module.resources.len(),
                    if module.resources.len() == 1 { "" } else { "s" }
                ),
            );

            if show_resources {
                for resource in &module.resources {
                    ctx.output.tree_item(depth + 1, &resource.address);
                }
            }
        });

        ctx.output.blank();
        ctx.output.key_value("Total resources", &root.resource_count().to_string());

        Ok(())
    }
}

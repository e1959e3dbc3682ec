pub mod export;
pub mod modules;
pub mod serve;
pub mod show;
pub mod summary;

pub use export::ExportCommand;
pub use modules::ModulesCommand;
pub use serve::ServeCommand;
pub use show::{OutputFormat, ShowCommand};
pub use summary::SummaryCommand;

use anyhow::{Context as _, Result};

use crate::context::Context;
use crate::plan::{Action, Plan, PlanFilter, PlanLoader, PlanSource};

/// Resolve a plan source string and load it through the context
pub fn load_plan(ctx: &Context, source: &str) -> Result<Plan> {
    let source = PlanSource::parse(source)?;
    let loader = PlanLoader::new(&*ctx.fs, &*ctx.http);

    let plan = loader
        .load(&source)
        .with_context(|| format!("Could not load plan from {}", source))?;

    Ok(plan)
}

/// Build the filter from `--action` / `--address` flags
///
/// Each action flag may hold a comma separated list. With no action flags
/// the configured default actions apply.
pub fn build_filter(ctx: &Context, actions: &[String], address: Option<&str>) -> Result<PlanFilter> {
    let mut filter = if actions.is_empty() {
        ctx.config.view.default_filter()
    } else {
        let mut parsed = Vec::new();
        for list in actions {
            parsed.extend(Action::parse_list(list)?);
        }
        PlanFilter::new().with_actions(parsed)
    };

    if let Some(query) = address {
        filter = filter.with_address_query(query);
    }

    Ok(filter)
}

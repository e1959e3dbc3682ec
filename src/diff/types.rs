//! Data types for plan diff visualization
//!
//! This module defines the prepared view of a plan that renderers and the
//! JSON API consume: the filtered resource changes, each already classified
//! and normalized.

use serde::Serialize;

use crate::plan::{
    Action, AttributeChangeRow, ChangeSet, Classification, Plan, PlanFilter, PlanSummary,
    ResourceChange, ResourceMode, classify, filter_changes, normalize,
};

/// Type of attribute change within a resource
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum AttributeChangeType {
    /// Attribute will be added
    Added,
    /// Attribute will be removed
    Removed,
    /// Attribute value will be modified
    Modified,
    /// Attribute is unchanged (for context)
    Unchanged,
}

impl AttributeChangeType {
    /// Derive the kind of change from a normalized row
    pub fn of(row: &AttributeChangeRow) -> Self {
        if !row.changed {
            AttributeChangeType::Unchanged
        } else if row.before.is_null() {
            AttributeChangeType::Added
        } else if row.after.is_null() && !row.is_after_unknown {
            AttributeChangeType::Removed
        } else {
            AttributeChangeType::Modified
        }
    }

    /// Get the symbol for this attribute change type
    pub fn symbol(&self) -> &'static str {
        match self {
            AttributeChangeType::Added => "+",
            AttributeChangeType::Removed => "-",
            AttributeChangeType::Modified => "~",
            AttributeChangeType::Unchanged => " ",
        }
    }

    /// Get RGB color tuple for this attribute change type
    pub fn color(&self) -> (u8, u8, u8) {
        match self {
            AttributeChangeType::Added => (152, 225, 152),   // Pastel mint green
            AttributeChangeType::Removed => (255, 160, 160), // Pastel coral
            AttributeChangeType::Modified => (255, 230, 160), // Pastel cream/yellow
            AttributeChangeType::Unchanged => (160, 160, 160), // Grey
        }
    }

    /// CSS class used by the HTML renderer
    pub fn css_class(&self) -> &'static str {
        match self {
            AttributeChangeType::Added => "add",
            AttributeChangeType::Removed => "remove",
            AttributeChangeType::Modified => "modify",
            AttributeChangeType::Unchanged => "unchanged",
        }
    }
}

/// One resource change ready for display
#[derive(Debug, Clone, Serialize)]
pub struct ResourceView<'a> {
    pub address: &'a str,

    #[serde(rename = "type")]
    pub resource_type: &'a str,

    pub mode: ResourceMode,

    pub actions: &'a [Action],

    pub classification: Classification,

    /// Every attribute row, keyed by attribute name
    pub changes: ChangeSet,

    pub changed_count: usize,

    pub unchanged_count: usize,
}

impl<'a> ResourceView<'a> {
    pub fn new(resource_change: &'a ResourceChange) -> Self {
        let changes = normalize(&resource_change.change);

        Self {
            address: &resource_change.address,
            resource_type: &resource_change.resource_type,
            mode: resource_change.mode,
            actions: &resource_change.change.actions,
            classification: classify(&resource_change.change.actions),
            changed_count: changes.changed_count(),
            unchanged_count: changes.unchanged_count(),
            changes,
        }
    }

    /// Rows shown in the detail view
    pub fn visible_rows(&self, show_unchanged: bool) -> Vec<&AttributeChangeRow> {
        self.changes
            .rows()
            .iter()
            .filter(|row| show_unchanged || row.changed)
            .collect()
    }
}

/// The filtered, classified and normalized view of a whole plan
#[derive(Debug, Clone, Serialize)]
pub struct PlanView<'a> {
    pub format_version: &'a str,

    /// Counts over the whole plan, not just the visible resources
    pub summary: PlanSummary,

    pub filter: &'a PlanFilter,

    pub resources: Vec<ResourceView<'a>>,

    /// Number of resource changes in the plan
    pub total: usize,

    /// Number of resource changes hidden by the filter
    pub hidden: usize,
}

impl<'a> PlanView<'a> {
    pub fn build(plan: &'a Plan, filter: &'a PlanFilter) -> Self {
        let resources: Vec<ResourceView<'a>> = filter_changes(&plan.resource_changes, filter)
            .into_iter()
            .map(ResourceView::new)
            .collect();

        let total = plan.resource_changes.len();

        Self {
            format_version: &plan.format_version,
            summary: plan.summary(),
            filter,
            hidden: total - resources.len(),
            total,
            resources,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }

    /// Mask sensitive values before the view leaves the process as JSON
    pub fn redact_sensitive(&mut self) {
        for resource in &mut self.resources {
            resource.changes.redact_sensitive();
        }
    }
}

/// Options for diff rendering
#[derive(Debug, Clone)]
pub struct DiffRenderOptions {
    /// Show unchanged attributes (for context)
    pub show_unchanged: bool,

    /// Use compact output (no extra spacing)
    pub compact_mode: bool,

    /// Use side-by-side view (ASCII only)
    pub side_by_side: bool,

    /// Maximum width for values before truncation
    pub max_value_width: usize,

    /// Show sensitive values (normally hidden)
    pub show_sensitive: bool,

    /// Colour terminal output (ASCII only)
    pub color: bool,

    /// Terminal width for formatting
    pub terminal_width: usize,
}

impl Default for DiffRenderOptions {
    fn default() -> Self {
        Self {
            show_unchanged: false,
            compact_mode: false,
            side_by_side: false,
            max_value_width: 60,
            show_sensitive: false,
            color: false,
            terminal_width: 100,
        }
    }
}

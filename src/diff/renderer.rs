//! Renderers for plan diff visualization
//!
//! This module provides ASCII (terminal) and HTML renderers for
//! displaying a [`PlanView`] in a formatted, color-coded manner.

use owo_colors::OwoColorize;
use serde_json::Value;

use super::types::{AttributeChangeType, DiffRenderOptions, PlanView, ResourceView};
use crate::plan::{AttributeChangeRow, PlanFilter, PlanSummary};

const KNOWN_AFTER_APPLY: &str = "(known after apply)";
const SENSITIVE: &str = "(sensitive)";

/// Trait for diff renderers
pub trait DiffRenderer {
    /// Render the prepared plan view to a string
    fn render(&self, view: &PlanView<'_>, options: &DiffRenderOptions) -> String;
}

/// ASCII renderer for terminal output
pub struct AsciiRenderer;

impl Default for AsciiRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl AsciiRenderer {
    pub fn new() -> Self {
        Self
    }

    /// Render summary section
    fn render_summary(&self, summary: &PlanSummary) -> String {
        let mut output = String::new();

        output.push_str("Plan Summary:\n");

        let mut parts = Vec::new();

        if summary.to_add > 0 {
            parts.push(format!("+{} to add", summary.to_add));
        }

        if summary.to_change > 0 {
            parts.push(format!("~{} to change", summary.to_change));
        }

        if summary.to_replace > 0 {
            parts.push(format!("±{} to replace", summary.to_replace));
        }

        if summary.to_destroy > 0 {
            parts.push(format!("-{} to destroy", summary.to_destroy));
        }

        if summary.to_read > 0 {
            parts.push(format!("{} to read", summary.to_read));
        }

        if parts.is_empty() {
            output.push_str("  No changes.\n");
        } else {
            output.push_str(&format!("  {}\n", parts.join(", ")));
        }

        output.push('\n');
        output
    }

    fn render_header(&self, resource: &ResourceView<'_>, options: &DiffRenderOptions) -> String {
        let category = resource.classification.category;
        let header = format!(
            "{} {} ({})",
            category.symbol(),
            resource.address,
            resource.classification.label
        );

        format!("{}\n", paint(&header, category.color(), options.color))
    }

    /// Render a single resource change
    fn render_resource(&self, resource: &ResourceView<'_>, options: &DiffRenderOptions) -> String {
        let mut output = self.render_header(resource, options);

        for row in resource.visible_rows(options.show_unchanged) {
            output.push_str(&self.render_attribute(row, options));
        }

        if !options.show_unchanged && resource.unchanged_count > 0 {
            let note = format!(
                "    ({} unchanged attribute{} hidden)",
                resource.unchanged_count,
                if resource.unchanged_count == 1 { "" } else { "s" }
            );
            output.push_str(&paint(&note, (160, 160, 160), options.color));
            output.push('\n');
        }

        if !options.compact_mode {
            output.push('\n');
        }

        output
    }

    /// Render a single attribute change
    fn render_attribute(&self, row: &AttributeChangeRow, options: &DiffRenderOptions) -> String {
        let change_type = AttributeChangeType::of(row);
        let symbol = paint(change_type.symbol(), change_type.color(), options.color);
        let mut line = format!("    {} {}", symbol, row.display_name());

        let before = self.format_value(&row.before, false, row.sensitive, options);
        let after = self.format_value(&row.after, row.is_after_unknown, row.sensitive, options);

        match change_type {
            AttributeChangeType::Added => {
                line.push_str(&format!(" = {}", after));
            }
            AttributeChangeType::Removed => {
                line.push_str(&format!(" = {}", before));
            }
            AttributeChangeType::Modified => {
                line.push_str(&format!(" = {} -> {}", before, after));
            }
            AttributeChangeType::Unchanged => {
                let value = if row.after.is_null() { before } else { after };
                line.push_str(&format!(" = {}", value));
            }
        }

        line.push('\n');
        line
    }

    /// Format a value for a single terminal line
    fn format_value(
        &self,
        value: &Value,
        unknown: bool,
        sensitive: bool,
        options: &DiffRenderOptions,
    ) -> String {
        if sensitive && !options.show_sensitive {
            return SENSITIVE.to_string();
        }

        if unknown {
            return KNOWN_AFTER_APPLY.to_string();
        }

        let text = match value {
            Value::String(s) => format!("\"{}\"", s),
            other => other.to_string(),
        };

        truncate_str(&text, options.max_value_width)
    }

    /// Render side-by-side view
    fn render_side_by_side(
        &self,
        resource: &ResourceView<'_>,
        options: &DiffRenderOptions,
    ) -> String {
        let mut output = self.render_header(resource, options);
        let half_width = (options.terminal_width / 2).saturating_sub(2).max(10);

        output.push_str(&format!(
            "    {:<width$} | {}\n",
            "OLD",
            "NEW",
            width = half_width
        ));
        output.push_str(&format!(
            "    {:-<width$}-+-{:-<width$}\n",
            "",
            "",
            width = half_width
        ));

        for row in resource.visible_rows(options.show_unchanged) {
            let change_type = AttributeChangeType::of(row);

            let old_value = if row.before.is_null() {
                "-".to_string()
            } else {
                self.format_value(&row.before, false, row.sensitive, options)
            };

            let new_value = if row.after.is_null() && !row.is_after_unknown {
                "-".to_string()
            } else {
                self.format_value(&row.after, row.is_after_unknown, row.sensitive, options)
            };

            let name = row.display_name();
            let name_width = name.chars().count();
            let column = half_width.saturating_sub(name_width + 4).max(1);

            output.push_str(&format!(
                "  {} {}: {:<width$} | {}\n",
                paint(change_type.symbol(), change_type.color(), options.color),
                name,
                truncate_str(&old_value, column),
                truncate_str(&new_value, half_width.saturating_sub(4).max(1)),
                width = column
            ));
        }

        output.push('\n');
        output
    }
}

impl DiffRenderer for AsciiRenderer {
    fn render(&self, view: &PlanView<'_>, options: &DiffRenderOptions) -> String {
        let mut output = String::new();

        output.push_str(&self.render_summary(&view.summary));

        if view.is_empty() {
            output.push_str("There is nothing to show.\n");
        }

        for resource in &view.resources {
            if options.side_by_side {
                output.push_str(&self.render_side_by_side(resource, options));
            } else {
                output.push_str(&self.render_resource(resource, options));
            }
        }

        if view.hidden > 0 {
            output.push_str(&format!(
                "{} of {} resource changes hidden by filter ({})\n",
                view.hidden,
                view.total,
                describe_filter(view.filter)
            ));
        }

        output
    }
}

/// HTML renderer for file export
pub struct HtmlRenderer;

impl Default for HtmlRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl HtmlRenderer {
    pub fn new() -> Self {
        Self
    }

    /// Generate CSS styles
    fn generate_styles(&self) -> String {
        r#"
<style>
    body {
        font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', sans-serif;
        background-color: #1e1e1e;
        color: #d4d4d4;
        padding: 20px;
        line-height: 1.5;
        max-width: 1200px;
        margin: 0 auto;
    }
    pre, code { font-family: 'Monaco', 'Menlo', 'Ubuntu Mono', monospace; }
    pre { margin: 0; white-space: pre-wrap; word-break: break-all; }
    .summary {
        background-color: #2d2d2d;
        padding: 15px;
        border-radius: 5px;
        margin-bottom: 20px;
    }
    .summary h2 { margin: 0 0 10px 0; color: #ffffff; }
    .summary-item {
        display: inline-block;
        margin-right: 20px;
        padding: 5px 10px;
        border-radius: 3px;
    }
    .filter-note { color: rgb(160, 160, 160); font-style: italic; }
    details.resource {
        background-color: #2d2d2d;
        border-radius: 5px;
        margin-bottom: 15px;
        border-left: 4px solid;
    }
    details.resource > summary {
        cursor: pointer;
        padding: 12px 15px;
        font-weight: bold;
    }
    details.resource .body { padding: 0 15px 15px 15px; }
    .resource.secondary { border-left-color: rgb(160, 160, 160); }
    .resource.warning { border-left-color: rgb(255, 230, 160); }
    .resource.danger { border-left-color: rgb(255, 160, 160); }
    .resource.info { border-left-color: rgb(160, 200, 255); }
    .badge {
        display: inline-block;
        padding: 1px 8px;
        margin-right: 8px;
        border-radius: 3px;
        color: #1e1e1e;
        font-size: 0.85em;
    }
    .badge.secondary { background: rgb(160, 160, 160); }
    .badge.warning { background: rgb(255, 230, 160); }
    .badge.danger { background: rgb(255, 160, 160); }
    .badge.info { background: rgb(160, 200, 255); }
    .resource-type { color: rgb(160, 160, 160); font-weight: normal; margin-left: 8px; }
    table.changes { width: 100%; border-collapse: collapse; }
    table.changes th, table.changes td {
        text-align: left;
        vertical-align: top;
        padding: 4px 8px;
        border-top: 1px solid #3c3c3c;
    }
    table.changes th { color: rgb(160, 160, 160); font-weight: normal; }
    .add { color: rgb(152, 225, 152); }
    .remove { color: rgb(255, 160, 160); }
    .modify { color: rgb(255, 230, 160); }
    .unchanged { color: rgb(160, 160, 160); }
    .attr-name { color: #9cdcfe; }
    .attr-key { color: rgb(160, 160, 160); font-size: 0.85em; }
    .arrow { color: #569cd6; }
    .unknown { color: #6a9955; font-style: italic; }
    .empty { color: rgb(160, 160, 160); font-style: italic; }
</style>
"#
        .to_string()
    }

    /// Render summary section
    fn render_summary(&self, view: &PlanView<'_>) -> String {
        let summary = &view.summary;
        let mut output = String::new();

        output.push_str("<div class=\"summary\">\n");
        output.push_str("  <h2>Plan Summary</h2>\n");

        if summary.to_add > 0 {
            output.push_str(&format!(
                "  <span class=\"summary-item add\">+{} to add</span>\n",
                summary.to_add
            ));
        }

        if summary.to_change > 0 {
            output.push_str(&format!(
                "  <span class=\"summary-item modify\">~{} to change</span>\n",
                summary.to_change
            ));
        }

        if summary.to_replace > 0 {
            output.push_str(&format!(
                "  <span class=\"summary-item remove\">±{} to replace</span>\n",
                summary.to_replace
            ));
        }

        if summary.to_destroy > 0 {
            output.push_str(&format!(
                "  <span class=\"summary-item remove\">-{} to destroy</span>\n",
                summary.to_destroy
            ));
        }

        if summary.to_read > 0 {
            output.push_str(&format!(
                "  <span class=\"summary-item\">{} to read</span>\n",
                summary.to_read
            ));
        }

        if !summary.has_changes() {
            output.push_str("  <span class=\"summary-item unchanged\">No changes</span>\n");
        }

        if view.hidden > 0 {
            output.push_str(&format!(
                "  <p class=\"filter-note\">{} of {} resource changes hidden by filter ({})</p>\n",
                view.hidden,
                view.total,
                html_escape(&describe_filter(view.filter))
            ));
        }

        output.push_str("</div>\n\n");
        output
    }

    /// Render a single resource as a collapsible card
    fn render_resource(&self, resource: &ResourceView<'_>, options: &DiffRenderOptions) -> String {
        let mut output = String::new();
        let class = resource.classification.category.as_str();

        output.push_str(&format!("<details class=\"resource {}\" open>\n", class));
        output.push_str(&format!(
            "  <summary><span class=\"badge {}\">{}</span>{}<span class=\"resource-type\">{}</span></summary>\n",
            class,
            html_escape(resource.classification.label),
            html_escape(resource.address),
            html_escape(resource.resource_type)
        ));
        output.push_str("  <div class=\"body\">\n");

        let rows = resource.visible_rows(options.show_unchanged);
        if rows.is_empty() {
            output.push_str("    <p class=\"empty\">No attribute changes</p>\n");
        } else {
            output.push_str("    <table class=\"changes\">\n");
            output.push_str(
                "      <tr><th></th><th>Attribute</th><th>Before</th><th></th><th>After</th></tr>\n",
            );
            for row in rows {
                output.push_str(&self.render_attribute(row, options));
            }
            output.push_str("    </table>\n");
        }

        if !options.show_unchanged && resource.unchanged_count > 0 {
            output.push_str(&format!(
                "    <p class=\"empty\">{} unchanged attributes hidden</p>\n",
                resource.unchanged_count
            ));
        }

        output.push_str("  </div>\n</details>\n\n");
        output
    }

    /// Render a single attribute as a table row
    fn render_attribute(&self, row: &AttributeChangeRow, options: &DiffRenderOptions) -> String {
        let change_type = AttributeChangeType::of(row);
        let masked = row.sensitive && !options.show_sensitive;

        let before = if masked {
            format!("<pre>{}</pre>", SENSITIVE)
        } else {
            format!("<pre>{}</pre>", html_escape(&row.formatted_before()))
        };

        let after = if row.is_after_unknown {
            format!("<span class=\"unknown\">{}</span>", KNOWN_AFTER_APPLY)
        } else if masked {
            format!("<pre>{}</pre>", SENSITIVE)
        } else {
            format!("<pre>{}</pre>", html_escape(&row.formatted_after()))
        };

        format!(
            "      <tr class=\"{}\"><td>{}</td><td><span class=\"attr-name\">{}</span><br><code class=\"attr-key\">{}</code></td><td>{}</td><td class=\"arrow\">→</td><td>{}</td></tr>\n",
            change_type.css_class(),
            html_escape(change_type.symbol()),
            html_escape(&row.display_name()),
            html_escape(&row.address),
            before,
            after
        )
    }
}

impl DiffRenderer for HtmlRenderer {
    fn render(&self, view: &PlanView<'_>, options: &DiffRenderOptions) -> String {
        let mut output = String::new();

        output.push_str("<!DOCTYPE html>\n");
        output.push_str("<html lang=\"en\">\n");
        output.push_str("<head>\n");
        output.push_str("  <meta charset=\"UTF-8\">\n");
        output.push_str("  <meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">\n");
        output.push_str("  <title>Terraform Plan Review</title>\n");
        output.push_str(&self.generate_styles());
        output.push_str("</head>\n");
        output.push_str("<body>\n\n");

        output.push_str(&self.render_summary(view));

        if view.is_empty() {
            output.push_str("<p class=\"empty\">There is nothing to show.</p>\n");
        }

        for resource in &view.resources {
            output.push_str(&self.render_resource(resource, options));
        }

        output.push_str("</body>\n");
        output.push_str("</html>\n");

        output
    }
}

fn describe_filter(filter: &PlanFilter) -> String {
    let actions: Vec<&str> = filter.actions.iter().map(|a| a.as_str()).collect();
    let mut description = format!("actions: {}", actions.join(", "));

    if !filter.address_query.is_empty() {
        description.push_str(&format!("; address contains \"{}\"", filter.address_query));
    }

    description
}

fn paint(text: &str, (r, g, b): (u8, u8, u8), enabled: bool) -> String {
    if enabled {
        text.truecolor(r, g, b).to_string()
    } else {
        text.to_string()
    }
}

/// Truncate to at most `max_len` characters, marking the cut with `...`
fn truncate_str(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else if max_len > 3 {
        let kept: String = s.chars().take(max_len - 3).collect();
        format!("{}...", kept)
    } else {
        s.chars().take(max_len).collect()
    }
}

/// Escape HTML special characters
fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

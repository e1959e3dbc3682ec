//! Maps a resource's action tuple to a severity category and a label

use serde::{Deserialize, Serialize};

use super::model::Action;

/// Severity of a resource change, named after the UI colour it is shown with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionCategory {
    Secondary,
    Warning,
    Danger,
    Info,
}

impl ActionCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActionCategory::Secondary => "secondary",
            ActionCategory::Warning => "warning",
            ActionCategory::Danger => "danger",
            ActionCategory::Info => "info",
        }
    }

    /// Get the symbol used to represent this category in the terminal
    pub fn symbol(&self) -> &'static str {
        match self {
            ActionCategory::Secondary => " ",
            ActionCategory::Warning => "~",
            ActionCategory::Danger => "!",
            ActionCategory::Info => "+",
        }
    }

    /// Get RGB color tuple for this category
    pub fn color(&self) -> (u8, u8, u8) {
        match self {
            ActionCategory::Secondary => (160, 160, 160), // Grey
            ActionCategory::Warning => (255, 230, 160),   // Pastel cream/yellow
            ActionCategory::Danger => (255, 160, 160),    // Pastel coral
            ActionCategory::Info => (160, 200, 255),      // Pastel sky blue
        }
    }
}

/// Category and human label for one action tuple
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Classification {
    pub category: ActionCategory,
    pub label: &'static str,
}

impl Classification {
    const fn new(category: ActionCategory, label: &'static str) -> Self {
        Self { category, label }
    }
}

/// Classify an ordered action sequence
///
/// Unrecognised tokens and unexpected lengths fall back to `Unknown` so that
/// new action types in future plan formats still render.
pub fn classify(actions: &[Action]) -> Classification {
    use ActionCategory::*;

    match actions {
        [Action::NoOp] => Classification::new(Secondary, "No change"),
        [Action::Update] => Classification::new(Warning, "Update in place"),
        [Action::Delete] => Classification::new(Danger, "Delete"),
        [Action::Create] => Classification::new(Info, "Create"),
        [Action::Read] => Classification::new(Info, "Read"),
        [Action::Create, Action::Delete] => {
            Classification::new(Danger, "Create new before delete old")
        }
        [Action::Delete, Action::Create] => {
            Classification::new(Danger, "Delete old before create new")
        }
        _ => Classification::new(Info, "Unknown"),
    }
}

/// Whether the action tuple replaces the resource
pub fn is_replace(actions: &[Action]) -> bool {
    matches!(
        actions,
        [Action::Create, Action::Delete] | [Action::Delete, Action::Create]
    )
}

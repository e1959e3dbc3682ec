use serde::{Deserialize, Serialize};

use super::classifier::is_replace;
use super::model::{Action, Plan, ResourceChange};

/// Summary statistics for the plan
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanSummary {
    /// Number of resources to add
    pub to_add: usize,

    /// Number of resources to change
    pub to_change: usize,

    /// Number of resources to replace
    pub to_replace: usize,

    /// Number of resources to destroy
    pub to_destroy: usize,

    /// Number of data sources to read
    pub to_read: usize,

    /// Number of unchanged resources
    pub unchanged: usize,
}

impl PlanSummary {
    pub fn from_changes<'a, I>(resource_changes: I) -> Self
    where
        I: IntoIterator<Item = &'a ResourceChange>,
    {
        let mut summary = Self::default();
        for resource_change in resource_changes {
            summary.record(&resource_change.change.actions);
        }
        summary
    }

    fn record(&mut self, actions: &[Action]) {
        if is_replace(actions) {
            self.to_replace += 1;
            return;
        }

        match actions {
            [Action::Create] => self.to_add += 1,
            [Action::Update] => self.to_change += 1,
            [Action::Delete] => self.to_destroy += 1,
            [Action::Read] => self.to_read += 1,
            [Action::NoOp] => self.unchanged += 1,
            _ => {}
        }
    }

    /// Check if there are any changes
    pub fn has_changes(&self) -> bool {
        self.total_changes() > 0
    }

    /// Get total number of changes
    pub fn total_changes(&self) -> usize {
        self.to_add + self.to_change + self.to_destroy + self.to_replace
    }
}

impl Plan {
    pub fn summary(&self) -> PlanSummary {
        PlanSummary::from_changes(&self.resource_changes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plan::model::Change;

    fn rc(address: &str, actions: &[Action]) -> ResourceChange {
        ResourceChange::new(address, Change::new(actions.to_vec()))
    }

    #[test]
    fn test_plan_summary() {
        let plan = Plan {
            resource_changes: vec![
                rc("aws_instance.a", &[Action::Create]),
                rc("aws_instance.b", &[Action::Update]),
                rc("aws_instance.c", &[Action::Delete]),
                rc("aws_instance.d", &[Action::Delete, Action::Create]),
                rc("aws_instance.e", &[Action::Create, Action::Delete]),
                rc("data.aws_ami.f", &[Action::Read]),
                rc("aws_instance.g", &[Action::NoOp]),
                rc("aws_instance.h", &[Action::Unknown]),
            ],
            ..Default::default()
        };

        let summary = plan.summary();
        assert_eq!(summary.to_add, 1);
        assert_eq!(summary.to_change, 1);
        assert_eq!(summary.to_destroy, 1);
        assert_eq!(summary.to_replace, 2);
        assert_eq!(summary.to_read, 1);
        assert_eq!(summary.unchanged, 1);
        assert_eq!(summary.total_changes(), 5);
        assert!(summary.has_changes());
    }

    #[test]
    fn test_empty_plan_has_no_changes() {
        let summary = Plan::default().summary();
        assert!(!summary.has_changes());
        assert_eq!(summary, PlanSummary::default());
    }
}

//! Narrows the resource-change list by action and address

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use super::model::{Action, ResourceChange};

/// View state selected by the user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanFilter {
    /// Actions currently visible
    pub actions: BTreeSet<Action>,

    /// Substring to look for in resource addresses, case-insensitive
    #[serde(rename = "addressQuery", default)]
    pub address_query: String,
}

impl Default for PlanFilter {
    fn default() -> Self {
        Self {
            actions: Action::FILTERABLE.into_iter().collect(),
            address_query: String::new(),
        }
    }
}

impl PlanFilter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Show only the given actions
    pub fn with_actions<I: IntoIterator<Item = Action>>(mut self, actions: I) -> Self {
        self.actions = actions.into_iter().collect();
        self
    }

    pub fn with_address_query(mut self, query: &str) -> Self {
        self.address_query = query.to_string();
        self
    }

    pub fn is_default(&self) -> bool {
        *self == Self::default()
    }

    /// Whether a resource change passes every predicate
    pub fn matches(&self, resource_change: &ResourceChange) -> bool {
        self.matches_address(&resource_change.address)
            && self.matches_actions(&resource_change.change.actions)
    }

    fn matches_address(&self, address: &str) -> bool {
        self.address_query.is_empty()
            || address
                .to_lowercase()
                .contains(&self.address_query.to_lowercase())
    }

    fn matches_actions(&self, actions: &[Action]) -> bool {
        actions.iter().any(|action| self.actions.contains(action))
    }
}

/// Keep the resource changes that pass the filter, in their original order
pub fn filter_changes<'a, I>(resource_changes: I, filter: &PlanFilter) -> Vec<&'a ResourceChange>
where
    I: IntoIterator<Item = &'a ResourceChange>,
{
    resource_changes
        .into_iter()
        .filter(|rc| filter.matches(rc))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plan::model::Change;
    use proptest::prelude::*;

    fn rc(address: &str, actions: &[Action]) -> ResourceChange {
        ResourceChange::new(address, Change::new(actions.to_vec()))
    }

    fn sample() -> Vec<ResourceChange> {
        vec![
            rc("aws_db_instance.main", &[Action::Delete]),
            rc("aws_instance.web", &[Action::Create]),
            rc("module.db.aws_db_subnet_group.this", &[Action::Delete, Action::Create]),
            rc("aws_s3_bucket.logs", &[Action::NoOp]),
            rc("module.db.aws_security_group.db", &[Action::Update]),
            rc("data.aws_ami.ubuntu", &[Action::Read]),
        ]
    }

    fn addresses<'a>(changes: &[&'a ResourceChange]) -> Vec<&'a str> {
        changes.iter().map(|rc| rc.address.as_str()).collect()
    }

    #[test]
    fn test_default_filter_shows_everything() {
        let changes = sample();
        let filter = PlanFilter::default();
        assert_eq!(filter.actions.len(), 5);
        assert_eq!(filter_changes(&changes, &filter).len(), changes.len());
    }

    #[test]
    fn test_delete_and_address_query() {
        let changes = sample();
        let filter = PlanFilter::new()
            .with_actions([Action::Delete])
            .with_address_query("db");

        let result = filter_changes(&changes, &filter);
        assert_eq!(
            addresses(&result),
            vec!["aws_db_instance.main", "module.db.aws_db_subnet_group.this"]
        );
    }

    #[test]
    fn test_address_query_is_case_insensitive() {
        let changes = sample();
        let filter = PlanFilter::new().with_address_query("WEB");
        assert_eq!(addresses(&filter_changes(&changes, &filter)), vec!["aws_instance.web"]);
    }

    #[test]
    fn test_empty_action_set_hides_everything() {
        let changes = sample();
        let filter = PlanFilter::new().with_actions([]);
        assert!(filter_changes(&changes, &filter).is_empty());
    }

    #[test]
    fn test_unknown_actions_never_match() {
        let changes = vec![rc("aws_thing.x", &[Action::Unknown])];
        assert!(filter_changes(&changes, &PlanFilter::default()).is_empty());
    }

    #[test]
    fn test_is_default() {
        assert!(PlanFilter::default().is_default());
        assert!(!PlanFilter::default().with_address_query("web").is_default());
        assert!(!PlanFilter::default().with_actions([Action::Create]).is_default());
    }

    #[test]
    fn test_preserves_order() {
        let changes = sample();
        let filter = PlanFilter::new().with_actions([Action::Create, Action::Update]);
        assert_eq!(
            addresses(&filter_changes(&changes, &filter)),
            vec![
                "aws_instance.web",
                "module.db.aws_db_subnet_group.this",
                "module.db.aws_security_group.db",
            ]
        );
    }

    fn action() -> impl Strategy<Value = Action> {
        prop::sample::select(vec![
            Action::NoOp,
            Action::Create,
            Action::Read,
            Action::Update,
            Action::Delete,
            Action::Unknown,
        ])
    }

    fn resource_change() -> impl Strategy<Value = ResourceChange> {
        ("[a-z]{1,3}\\.[a-zA-Z]{1,4}", prop::collection::vec(action(), 1..3))
            .prop_map(|(address, actions)| rc(&address, &actions))
    }

    fn plan_filter() -> impl Strategy<Value = PlanFilter> {
        (prop::collection::btree_set(action(), 0..5), "[a-zA-Z]{0,2}").prop_map(
            |(actions, query)| PlanFilter {
                actions,
                address_query: query,
            },
        )
    }

    proptest! {
        #[test]
        fn prop_filter_is_idempotent(
            changes in prop::collection::vec(resource_change(), 0..12),
            filter in plan_filter(),
        ) {
            let once = filter_changes(&changes, &filter);
            let twice = filter_changes(once.iter().copied(), &filter);
            prop_assert_eq!(once, twice);
        }

        #[test]
        fn prop_filter_output_is_ordered_subsequence(
            changes in prop::collection::vec(resource_change(), 0..12),
            filter in plan_filter(),
        ) {
            let result = filter_changes(&changes, &filter);
            let mut remaining = changes.iter();
            for kept in result {
                prop_assert!(remaining.any(|rc| std::ptr::eq(rc, kept)));
            }
        }
    }
}

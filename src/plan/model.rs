//! Typed representation of a `terraform show -json` plan export
//!
//! Field names and nesting follow the Terraform JSON output format. Parsing is
//! lenient about sparse documents: missing or null sections become empty
//! collections instead of errors, because most resources only populate a
//! subset of the change maps (a pure create has no `before`, a delete has no
//! `after`, and data sources often have neither).

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use super::error::{PlanError, PlanResult};

/// A single lifecycle operation token in a change's `actions` list
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Action {
    NoOp,
    Create,
    Read,
    Update,
    Delete,
    /// Any token this version does not recognise
    #[serde(other)]
    Unknown,
}

impl Action {
    /// The five known actions, in the order the UI lists them
    pub const FILTERABLE: [Action; 5] = [
        Action::NoOp,
        Action::Read,
        Action::Create,
        Action::Update,
        Action::Delete,
    ];

    /// Wire token for this action
    pub fn as_str(&self) -> &'static str {
        match self {
            Action::NoOp => "no-op",
            Action::Create => "create",
            Action::Read => "read",
            Action::Update => "update",
            Action::Delete => "delete",
            Action::Unknown => "unknown",
        }
    }

    /// Parse a comma separated list such as `create,delete`
    pub fn parse_list(list: &str) -> PlanResult<Vec<Action>> {
        list.split(',')
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .map(Action::from_str)
            .collect()
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Action {
    type Err = PlanError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "no-op" | "noop" => Ok(Action::NoOp),
            "create" => Ok(Action::Create),
            "read" => Ok(Action::Read),
            "update" => Ok(Action::Update),
            "delete" => Ok(Action::Delete),
            _ => Err(PlanError::UnknownAction(s.to_string())),
        }
    }
}

/// Whether a resource is managed by the configuration or is a data source
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceMode {
    #[default]
    Managed,
    Data,
}

/// The transition planned for one resource
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Change {
    /// One or two action tokens, e.g. `["update"]` or `["delete", "create"]`
    #[serde(default, deserialize_with = "lenient::seq")]
    pub actions: Vec<Action>,

    #[serde(default, deserialize_with = "lenient::object")]
    pub before: Map<String, Value>,

    #[serde(default, deserialize_with = "lenient::object")]
    pub after: Map<String, Value>,

    /// `true` for attributes whose value is only known after apply
    #[serde(default, deserialize_with = "lenient::object")]
    pub after_unknown: Map<String, Value>,

    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub before_sensitive: Value,

    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub after_sensitive: Value,
}

impl Change {
    /// Whether an attribute, or any part of it, is flagged sensitive on
    /// either side of the change
    ///
    /// Sensitivity marks mirror the value's shape, so a nested map such as
    /// `{"settings": {"password": true}}` flags the whole `settings` row.
    pub fn is_sensitive(&self, attribute: &str) -> bool {
        [&self.before_sensitive, &self.after_sensitive]
            .iter()
            .filter_map(|marks| marks.get(attribute))
            .any(contains_sensitive_mark)
    }
}

fn contains_sensitive_mark(marks: &Value) -> bool {
    match marks {
        Value::Bool(flag) => *flag,
        Value::Array(items) => items.iter().any(contains_sensitive_mark),
        Value::Object(fields) => fields.values().any(contains_sensitive_mark),
        _ => false,
    }
}

#[cfg(test)]
impl Change {
    pub fn new(actions: Vec<Action>) -> Self {
        Self {
            actions,
            ..Default::default()
        }
    }

    pub fn with_before(mut self, before: Map<String, Value>) -> Self {
        self.before = before;
        self
    }

    pub fn with_after(mut self, after: Map<String, Value>) -> Self {
        self.after = after;
        self
    }

    pub fn with_after_unknown(mut self, after_unknown: Map<String, Value>) -> Self {
        self.after_unknown = after_unknown;
        self
    }
}

/// One entry of `resource_changes`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResourceChange {
    /// Full address, e.g. `module.vpc.aws_subnet.public[0]`
    #[serde(default)]
    pub address: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub module_address: Option<String>,

    #[serde(default)]
    pub mode: ResourceMode,

    #[serde(rename = "type", default)]
    pub resource_type: String,

    #[serde(default)]
    pub name: String,

    /// `count` index (number) or `for_each` key (string)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub index: Option<Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deposed: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action_reason: Option<String>,

    #[serde(default)]
    pub change: Change,
}

impl ResourceChange {
    /// Fill module path, type and name from the address when the export omits them
    fn fill_from_address(&mut self) {
        if !self.resource_type.is_empty() && !self.name.is_empty() {
            return;
        }

        let (module_address, resource_type, name) = split_address(&self.address);
        if self.module_address.is_none() {
            self.module_address = module_address;
        }
        if self.resource_type.is_empty() {
            self.resource_type = resource_type;
        }
        if self.name.is_empty() {
            self.name = name;
        }
    }
}

#[cfg(test)]
impl ResourceChange {
    pub fn new(address: &str, change: Change) -> Self {
        let mut rc = Self {
            address: address.to_string(),
            change,
            ..Default::default()
        };
        rc.fill_from_address();
        rc
    }
}

/// Split `module.vpc.aws_subnet.main[0]` into module path, type and name
fn split_address(address: &str) -> (Option<String>, String, String) {
    let mut module_parts = Vec::new();
    let mut rest = address;

    while let Some(tail) = rest.strip_prefix("module.") {
        let end = tail.find('.').unwrap_or(tail.len());
        module_parts.push(format!("module.{}", &tail[..end]));
        rest = tail.get(end + 1..).unwrap_or("");
    }

    let rest = rest.strip_prefix("data.").unwrap_or(rest);
    let (resource_type, name) = match rest.split_once('.') {
        Some((resource_type, name)) => {
            let name = name.split('[').next().unwrap_or(name);
            (resource_type.to_string(), name.to_string())
        }
        None => (rest.to_string(), String::new()),
    };

    let module_address = if module_parts.is_empty() {
        None
    } else {
        Some(module_parts.join("."))
    };

    (module_address, resource_type, name)
}

/// A resource as it will look after apply, from `planned_values`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlannedResource {
    #[serde(default)]
    pub address: String,

    #[serde(default)]
    pub mode: ResourceMode,

    #[serde(rename = "type", default)]
    pub resource_type: String,

    #[serde(default)]
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub index: Option<Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema_version: Option<u64>,

    /// Planned attribute values; never serialized back out since they may hold secrets
    #[serde(default, skip_serializing, deserialize_with = "lenient::object")]
    pub values: Map<String, Value>,
}

/// A module in the `planned_values` tree; the root module has no address
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Module {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,

    #[serde(default, deserialize_with = "lenient::seq")]
    pub resources: Vec<PlannedResource>,

    #[serde(default, deserialize_with = "lenient::seq")]
    pub child_modules: Vec<Module>,
}

impl Module {
    /// Display name: the module address, or `root` for the root module
    pub fn display_address(&self) -> &str {
        self.address.as_deref().unwrap_or("root")
    }

    /// Visit this module and all descendants depth first, with their depth
    pub fn walk<'a, F>(&'a self, visit: &mut F)
    where
        F: FnMut(&'a Module, usize),
    {
        self.walk_at(0, visit);
    }

    fn walk_at<'a, F>(&'a self, depth: usize, visit: &mut F)
    where
        F: FnMut(&'a Module, usize),
    {
        visit(self, depth);
        for child in &self.child_modules {
            child.walk_at(depth + 1, visit);
        }
    }

    /// Number of resources in this module and all child modules
    pub fn resource_count(&self) -> usize {
        let mut count = 0;
        self.walk(&mut |module, _| count += module.resources.len());
        count
    }
}

/// An output value from `planned_values`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlannedOutput {
    #[serde(default)]
    pub sensitive: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
}

/// The `planned_values` section
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlannedValues {
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub outputs: BTreeMap<String, PlannedOutput>,

    #[serde(default, deserialize_with = "lenient::or_default")]
    pub root_module: Module,
}

/// A whole plan document
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Plan {
    #[serde(default)]
    pub format_version: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub terraform_version: Option<String>,

    #[serde(default, deserialize_with = "lenient::or_default")]
    pub planned_values: PlannedValues,

    #[serde(default, deserialize_with = "lenient::seq")]
    pub resource_changes: Vec<ResourceChange>,

    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub variables: Value,

    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub output_changes: Value,

    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub prior_state: Value,

    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub configuration: Value,
}

impl Plan {
    /// Parse a plan from JSON text
    pub fn from_json(content: &str) -> PlanResult<Self> {
        let value: Value = serde_json::from_str(content)?;
        Self::from_value(value)
    }

    /// Build a plan from an already parsed JSON document
    pub fn from_value(value: Value) -> PlanResult<Self> {
        if !value.is_object() {
            return Err(PlanError::NotAnObject);
        }

        let mut plan: Plan = serde_json::from_value(value)?;
        for rc in &mut plan.resource_changes {
            rc.fill_from_address();
        }

        Ok(plan)
    }
}

#[cfg(test)]
impl Plan {
    pub fn resource_change(&self, address: &str) -> Option<&ResourceChange> {
        self.resource_changes.iter().find(|rc| rc.address == address)
    }
}

/// Deserializers that degrade to empty values instead of failing on sparse input
mod lenient {
    use serde::de::{DeserializeOwned, Deserializer, Error};
    use serde::Deserialize;
    use serde_json::{Map, Value};

    /// Array → elements, anything else → empty
    pub fn seq<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
    where
        D: Deserializer<'de>,
        T: DeserializeOwned,
    {
        match Value::deserialize(deserializer)? {
            Value::Array(items) => items
                .into_iter()
                .map(|item| serde_json::from_value(item).map_err(D::Error::custom))
                .collect(),
            _ => Ok(Vec::new()),
        }
    }

    /// Object → map, anything else (including null) → empty map
    pub fn object<'de, D>(deserializer: D) -> Result<Map<String, Value>, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Value::deserialize(deserializer)? {
            Value::Object(map) => Ok(map),
            _ => Ok(Map::new()),
        }
    }

    /// Object → `T`, anything else → `T::default()`
    pub fn or_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
    where
        D: Deserializer<'de>,
        T: DeserializeOwned + Default,
    {
        match Value::deserialize(deserializer)? {
            value @ Value::Object(_) => serde_json::from_value(value).map_err(D::Error::custom),
            _ => Ok(T::default()),
        }
    }
}

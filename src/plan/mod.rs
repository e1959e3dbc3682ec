//! Terraform plan model and the logic that turns it into a reviewable diff
//!
//! - [`model`]: typed `terraform show -json` document
//! - [`normalizer`]: per-attribute before/after rows with change detection
//! - [`classifier`]: action tuple → category and label
//! - [`filter`]: action and address filtering of resource changes
//! - [`summary`]: per-category counts
//! - [`loader`]: reading plans from files, stdin and URLs

pub mod classifier;
pub mod error;
pub mod filter;
pub mod loader;
pub mod model;
pub mod normalizer;
pub mod summary;

pub use classifier::{Classification, classify};
pub use error::PlanError;
pub use filter::{PlanFilter, filter_changes};
pub use loader::{PlanLoader, PlanSource};
pub use model::{Action, Module, Plan, ResourceChange, ResourceMode};
pub use normalizer::{AttributeChangeRow, ChangeSet, normalize};
pub use summary::PlanSummary;

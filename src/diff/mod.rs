//! Plan diff visualization module
//!
//! This module turns a parsed [`Plan`](crate::plan::Plan) into a reviewable
//! view and renders it, displaying changes in a formatted, color-coded manner.
//!
//! # Features
//!
//! - **View**: filtered, classified and normalized resource changes
//! - **ASCII Rendering**: Terminal-friendly colored diff output
//! - **HTML Rendering**: Export diffs to a self-contained review page
//! - **Side-by-side view**: Optional two-column comparison
//!
//! # Example
//!
//! ```ignore
//! use tfsummary::diff::{AsciiRenderer, DiffRenderer, DiffRenderOptions, PlanView};
//!
//! let view = PlanView::build(&plan, &filter);
//! let output = AsciiRenderer::new().render(&view, &DiffRenderOptions::default());
//!
//! println!("{}", output);
//! ```

mod renderer;
mod types;

pub use renderer::{AsciiRenderer, DiffRenderer, HtmlRenderer};
pub use types::{AttributeChangeType, DiffRenderOptions, PlanView, ResourceView};

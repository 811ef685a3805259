//! Application Layer
//!
//! Use cases that orchestrate the business flow.
//! This layer:
//! - Depends on Domain layer (entities, ports)
//! - Does NOT contain conversion rules (those live with each flavor)
//! - Coordinates between Infrastructure and Domain
//!
//! ## Use Cases
//!
//! - `BuildMetaTransformer` - One transformation pass for one flavor
//! - `render_templates` - Every flavor a (possibly meta) flavor expands to
//! - `check_coverage` - Which entries each flavor converts, skips or ignores

pub mod check;
pub mod transformer;

pub use check::{check_coverage, CheckItem, CheckStatus, FlavorCoverage};
pub use transformer::{dispatch, render_templates, run_pass, BuildMetaTransformer};

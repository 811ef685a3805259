//! Property tests for Metaform.
//!
//! Run with: `cargo test --test properties`

#[path = "properties/naming.rs"]
mod naming;

#[path = "properties/transform.rs"]
mod transform;

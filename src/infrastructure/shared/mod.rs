//! Building blocks shared by every template flavor

pub mod api_spec;
pub mod batch;
pub mod body;
pub mod dynamodb;
pub mod event_patterns;
pub mod iam;
pub mod messaging;
pub mod naming;
pub mod s3;

pub use api_spec::{ApiMethod, ApiResourceNode, ApiSpec, Integration};
pub use body::Body;
pub use event_patterns::{rule_trigger, RuleTrigger};
pub use naming::{path_slug, path_words, tf_name, to_logical_id};

//! TemplateTransformer port - one implementation per template flavor
//!
//! A transformer owns the template document for a single pass. Every
//! per-resource operation must be implemented; a flavor that cannot express a
//! resource type provides an explicit no-op body instead.

use crate::domain::entities::{BuildMeta, ResourceMeta};
use crate::domain::value_objects::Flavor;
use crate::error::TransformResult;

/// Converts build meta entries into one flavor's template document
///
/// Implementations:
/// - `TerraformTransformer` - Terraform JSON configuration
/// - `CloudFormationTransformer` - CloudFormation YAML template
pub trait TemplateTransformer {
    /// Flavor produced by this transformer
    fn flavor(&self) -> Flavor;

    /// Fixed file name the composed document is written under
    fn output_file_name(&self) -> &'static str {
        self.flavor().output_file_name()
    }

    /// Called once with the whole build meta before any entry is converted
    fn begin_pass(&mut self, _build_meta: &BuildMeta) {}

    fn transform_iam_managed_policy(&mut self, name: &str, resource: &ResourceMeta)
        -> TransformResult<()>;

    fn transform_iam_role(&mut self, name: &str, resource: &ResourceMeta) -> TransformResult<()>;

    fn transform_lambda(&mut self, name: &str, resource: &ResourceMeta) -> TransformResult<()>;

    fn transform_dynamo_db_table(&mut self, name: &str, resource: &ResourceMeta)
        -> TransformResult<()>;

    /// Annotates an already-converted table rather than adding a resource
    fn transform_dynamo_db_stream(&mut self, name: &str, resource: &ResourceMeta)
        -> TransformResult<()>;

    fn transform_s3_bucket(&mut self, name: &str, resource: &ResourceMeta) -> TransformResult<()>;

    fn transform_sns_topic(&mut self, name: &str, resource: &ResourceMeta) -> TransformResult<()>;

    fn transform_sqs_queue(&mut self, name: &str, resource: &ResourceMeta) -> TransformResult<()>;

    fn transform_api_gateway(&mut self, name: &str, resource: &ResourceMeta)
        -> TransformResult<()>;

    fn transform_cloudwatch_rule(&mut self, name: &str, resource: &ResourceMeta)
        -> TransformResult<()>;

    fn transform_cloudwatch_alarm(&mut self, name: &str, resource: &ResourceMeta)
        -> TransformResult<()>;

    fn transform_batch_job_definition(&mut self, name: &str, resource: &ResourceMeta)
        -> TransformResult<()>;

    /// Serialize the accumulated document. Does not clear state, so calling it
    /// again yields identical output.
    fn compose_template(&self) -> TransformResult<String>;
}

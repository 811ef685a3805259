//! Build meta transformation use case
//!
//! Walks a build meta in document order, hands every entry with a supported
//! `resource_type` to the flavor's transformer and composes the result.
//! Entries with an unknown tag are skipped. A converter failure aborts the
//! whole pass: a partially written template is never returned.
//!
//! ## Usage
//!
//! ```ignore
//! use metaform::application::BuildMetaTransformer;
//! use metaform::domain::ports::NoResources;
//!
//! let settings = TemplateSettings::default();
//! let transformer = BuildMetaTransformer::new(Flavor::Terraform, &settings, &NoResources);
//! let document = transformer.transform(&build_meta)?;
//! ```

use tracing::{debug, info};

use crate::domain::entities::{BuildMeta, RenderedTemplate, ResourceMeta};
use crate::domain::ports::{ResourcesProvider, TemplateTransformer};
use crate::domain::value_objects::{Flavor, ResourceType, TemplateSettings};
use crate::error::{TransformError, TransformResult};
use crate::infrastructure::transformer_for;

/// Route one entry to the matching per-type operation
pub fn dispatch(
    transformer: &mut dyn TemplateTransformer,
    resource_type: ResourceType,
    name: &str,
    resource: &ResourceMeta,
) -> TransformResult<()> {
    match resource_type {
        ResourceType::IamManagedPolicy => transformer.transform_iam_managed_policy(name, resource),
        ResourceType::IamRole => transformer.transform_iam_role(name, resource),
        ResourceType::Lambda => transformer.transform_lambda(name, resource),
        ResourceType::DynamoDbTable => transformer.transform_dynamo_db_table(name, resource),
        ResourceType::DynamoDbStream => transformer.transform_dynamo_db_stream(name, resource),
        ResourceType::S3Bucket => transformer.transform_s3_bucket(name, resource),
        ResourceType::SnsTopic => transformer.transform_sns_topic(name, resource),
        ResourceType::SqsQueue => transformer.transform_sqs_queue(name, resource),
        ResourceType::ApiGateway => transformer.transform_api_gateway(name, resource),
        ResourceType::CloudWatchRule => transformer.transform_cloudwatch_rule(name, resource),
        ResourceType::CloudWatchAlarm => transformer.transform_cloudwatch_alarm(name, resource),
        ResourceType::BatchJobDefinition => {
            transformer.transform_batch_job_definition(name, resource)
        }
    }
}

/// Feed every supported entry of `build_meta` into `transformer`, then compose.
///
/// Returns the composed document and the number of entries that were skipped
/// for carrying an unknown `resource_type`.
pub fn run_pass(
    transformer: &mut dyn TemplateTransformer,
    build_meta: &BuildMeta,
) -> TransformResult<(String, usize)> {
    let flavor = transformer.flavor();
    let mut skipped = 0;
    transformer.begin_pass(build_meta);

    for (name, resource) in build_meta.iter() {
        let Some(resource_type) = resource.resource_type() else {
            debug!(
                resource = name,
                resource_type = resource.resource_type_tag(),
                %flavor,
                "skipping entry with unsupported resource type"
            );
            skipped += 1;
            continue;
        };

        debug!(resource = name, %resource_type, %flavor, "converting resource");
        dispatch(transformer, resource_type, name, resource)?;
    }

    let document = transformer.compose_template()?;
    Ok((document, skipped))
}

/// Transforms build meta into one template flavor
pub struct BuildMetaTransformer<'a> {
    flavor: Flavor,
    settings: &'a TemplateSettings,
    resources: &'a dyn ResourcesProvider,
}

impl<'a> BuildMetaTransformer<'a> {
    pub fn new(
        flavor: Flavor,
        settings: &'a TemplateSettings,
        resources: &'a dyn ResourcesProvider,
    ) -> Self {
        Self {
            flavor,
            settings,
            resources,
        }
    }

    pub fn flavor(&self) -> Flavor {
        self.flavor
    }

    /// Fixed file name of the produced document
    pub fn output_file_name(&self) -> &'static str {
        self.flavor.output_file_name()
    }

    /// Run one transformation pass over `build_meta`.
    ///
    /// Every call starts from a fresh template document.
    pub fn transform(&self, build_meta: &BuildMeta) -> TransformResult<String> {
        let mut transformer = transformer_for(self.flavor, self.settings, self.resources)
            .ok_or_else(|| TransformError::ConcreteFlavorRequired(self.flavor.to_string()))?;

        let (document, skipped) = run_pass(transformer.as_mut(), build_meta)?;

        info!(
            flavor = %self.flavor,
            resources = build_meta.len(),
            skipped,
            "composed template"
        );
        Ok(document)
    }

    /// Like [`transform`](Self::transform), wrapped with flavor and file name
    pub fn render(&self, build_meta: &BuildMeta) -> TransformResult<RenderedTemplate> {
        self.transform(build_meta)
            .map(|content| RenderedTemplate::new(self.flavor, content))
    }
}

/// Render `build_meta` for every concrete flavor `flavor` expands to
pub fn render_templates(
    build_meta: &BuildMeta,
    flavor: Flavor,
    settings: &TemplateSettings,
    resources: &dyn ResourcesProvider,
) -> TransformResult<Vec<RenderedTemplate>> {
    flavor
        .expand()
        .into_iter()
        .map(|concrete| BuildMetaTransformer::new(concrete, settings, resources).render(build_meta))
        .collect()
}

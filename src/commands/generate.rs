use std::io::Write;

use anyhow::{bail, Context, Result};
use metaform::config::{self, CliOverrides};
use metaform::infrastructure::write_templates;
use metaform::render_templates;

use crate::cli::GenerateArgs;

pub fn cmd_generate(args: &GenerateArgs, json: bool) -> Result<()> {
    if args.stdout && args.flavor.is_all() {
        bail!("--stdout prints a single document; choose --flavor terraform or cloudformation");
    }

    let project_root = std::env::current_dir()?;
    let overrides = CliOverrides {
        profile: args.profile.clone(),
        region: args.region.clone(),
        bundle_bucket: args.bundle_bucket.clone(),
    };
    let (config, warnings) = config::resolve(args.config.as_deref(), &project_root, &overrides)
        .context("failed to load configuration")?;

    let build_meta = super::load_build_meta(&args.build_meta)?;
    let settings = config.settings();
    let resources = config.resources_provider();

    let templates = render_templates(&build_meta, args.flavor, &settings, &resources)
        .with_context(|| format!("failed to transform {}", args.build_meta.display()))?;

    if args.stdout {
        let mut out = std::io::stdout().lock();
        for template in &templates {
            out.write_all(template.content().as_bytes())?;
        }
        return Ok(());
    }

    let written = write_templates(&args.output_dir, templates)
        .with_context(|| format!("failed to write templates to {}", args.output_dir.display()))?;

    if json {
        let summary = serde_json::json!({
            "command": "generate",
            "resources": build_meta.len(),
            "templates": written,
            "warnings": warnings.iter().map(ToString::to_string).collect::<Vec<_>>(),
        });
        println!("{}", serde_json::to_string(&summary)?);
    } else {
        for template in &written {
            println!("{} {} ({})", template.flavor, template.path.display(), template.hash);
        }
    }
    Ok(())
}

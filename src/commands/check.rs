use std::path::Path;

use anyhow::Result;
use metaform::application::CheckStatus;
use metaform::{check_coverage, Flavor};

pub fn cmd_check(build_meta: &Path, flavor: Flavor, json: bool) -> Result<()> {
    let meta = super::load_build_meta(build_meta)?;
    let coverage = check_coverage(&meta, flavor);

    if json {
        let summary = serde_json::json!({
            "command": "check",
            "build_meta": build_meta.display().to_string(),
            "flavors": coverage,
        });
        println!("{}", serde_json::to_string(&summary)?);
        return Ok(());
    }

    for report in &coverage {
        println!(
            "{}: {} converted, {} no-op, {} unknown",
            report.flavor,
            report.count(CheckStatus::Converted),
            report.count(CheckStatus::NoOp),
            report.count(CheckStatus::Unknown)
        );
        for item in &report.items {
            let marker = match item.status {
                CheckStatus::Converted => "+",
                CheckStatus::NoOp => "~",
                CheckStatus::Unknown => "?",
            };
            println!("  {} {} ({})", marker, item.name, item.resource_type);
        }
    }
    Ok(())
}

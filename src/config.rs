//! Configuration for Metaform
//!
//! Resolution order (highest first):
//! 1. CLI flags
//! 2. Environment variables (METAFORM_*)
//! 3. Explicit `--config` file
//! 4. Project config (`./metaform.toml`)
//! 5. User config (`<config_dir>/metaform/config.toml`)
//! 6. Built-in defaults
//!
//! Only the first config file found is read; files are not merged.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::domain::value_objects::TemplateSettings;
use crate::error::{TransformError, TransformResult};
use crate::infrastructure::StaticResourcesProvider;

pub const PROJECT_CONFIG_FILE: &str = "metaform.toml";

const KNOWN_KEYS: &[&str] = &[
    "provider",
    "name",
    "profile",
    "region",
    "deploy",
    "bundle_bucket",
    "lambda_layers",
];

/// `[provider]` section
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    /// Terraform provider block key
    pub name: String,
    pub profile: String,
    pub region: String,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        let defaults = TemplateSettings::default();
        Self {
            name: defaults.provider,
            profile: defaults.profile,
            region: defaults.region,
        }
    }
}

/// `[deploy]` section
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeployConfig {
    pub bundle_bucket: Option<String>,
}

/// Whole configuration file
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub provider: ProviderConfig,
    pub deploy: DeployConfig,
    /// Layer name -> deployed layer version ARN
    pub lambda_layers: BTreeMap<String, String>,
}

/// Non-fatal configuration warning, e.g. an unknown key
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigWarning {
    pub key: String,
    pub file: PathBuf,
    pub line: Option<usize>,
    pub suggestion: Option<String>,
}

impl std::fmt::Display for ConfigWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "unknown config key '{}' in {}", self.key, self.file.display())?;
        if let Some(line) = self.line {
            write!(f, ":{}", line)?;
        }
        if let Some(suggestion) = &self.suggestion {
            write!(f, " (did you mean '{}'?)", suggestion)?;
        }
        Ok(())
    }
}

/// Values given on the command line
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CliOverrides {
    pub profile: Option<String>,
    pub region: Option<String>,
    pub bundle_bucket: Option<String>,
}

impl Config {
    /// Parse `content`, collecting unknown keys as warnings
    pub fn parse(content: &str, path: &Path) -> TransformResult<(Self, Vec<ConfigWarning>)> {
        let mut unknown_paths: Vec<String> = Vec::new();
        let deserializer = toml::de::Deserializer::new(content);

        let config: Config = serde_ignored::deserialize(deserializer, |p| {
            unknown_paths.push(p.to_string());
        })
        .map_err(|e| TransformError::Config {
            file: path.to_path_buf(),
            message: e.to_string(),
        })?;

        let warnings = unknown_paths
            .into_iter()
            .map(|path_str| {
                let key = path_str
                    .split('.')
                    .next_back()
                    .unwrap_or(path_str.as_str())
                    .to_string();
                ConfigWarning {
                    line: find_line_number(content, &key),
                    suggestion: suggest_key(&key),
                    key,
                    file: path.to_path_buf(),
                }
            })
            .collect();

        Ok((config, warnings))
    }

    /// Read and parse one config file
    pub fn load(path: &Path) -> TransformResult<(Self, Vec<ConfigWarning>)> {
        let content = fs::read_to_string(path)?;
        Self::parse(&content, path)
    }

    /// Settings embedded into every generated template
    pub fn settings(&self) -> TemplateSettings {
        TemplateSettings {
            provider: self.provider.name.clone(),
            profile: self.provider.profile.clone(),
            region: self.provider.region.clone(),
            bundle_bucket: self.deploy.bundle_bucket.clone(),
        }
    }

    /// Layer lookups recorded in `[lambda_layers]`
    pub fn resources_provider(&self) -> StaticResourcesProvider {
        StaticResourcesProvider::new(self.lambda_layers.clone())
    }

    /// Apply `METAFORM_*` overrides through `lookup`
    pub fn with_env_overrides<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let set = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        if let Some(provider) = set("METAFORM_PROVIDER") {
            self.provider.name = provider;
        }
        if let Some(profile) = set("METAFORM_PROFILE") {
            self.provider.profile = profile;
        }
        if let Some(region) = set("METAFORM_REGION") {
            self.provider.region = region;
        }
        if let Some(bucket) = set("METAFORM_BUNDLE_BUCKET") {
            self.deploy.bundle_bucket = Some(bucket);
        }
        self
    }

    pub fn with_cli_overrides(mut self, overrides: &CliOverrides) -> Self {
        if let Some(profile) = &overrides.profile {
            self.provider.profile = profile.clone();
        }
        if let Some(region) = &overrides.region {
            self.provider.region = region.clone();
        }
        if let Some(bucket) = &overrides.bundle_bucket {
            self.deploy.bundle_bucket = Some(bucket.clone());
        }
        self
    }
}

/// Config file that would be read, if any
pub fn locate(explicit: Option<&Path>, project_root: &Path) -> Option<PathBuf> {
    if let Some(path) = explicit {
        return Some(path.to_path_buf());
    }

    let project_config = project_root.join(PROJECT_CONFIG_FILE);
    if project_config.is_file() {
        return Some(project_config);
    }

    dirs::config_dir()
        .map(|dir| dir.join("metaform").join("config.toml"))
        .filter(|path| path.is_file())
}

/// Resolve the full configuration for one run.
///
/// An explicit file must exist; discovered files are optional. Warnings are
/// logged and also returned so the CLI can report them in `--json` output.
pub fn resolve(
    explicit: Option<&Path>,
    project_root: &Path,
    overrides: &CliOverrides,
) -> TransformResult<(Config, Vec<ConfigWarning>)> {
    let (config, warnings) = match locate(explicit, project_root) {
        Some(path) => {
            debug!(file = %path.display(), "loading configuration");
            Config::load(&path)?
        }
        None => (Config::default(), Vec::new()),
    };

    for warning in &warnings {
        warn!("{}", warning);
    }

    let config = config
        .with_env_overrides(|key| std::env::var(key).ok())
        .with_cli_overrides(overrides);
    Ok((config, warnings))
}

fn find_line_number(content: &str, needle: &str) -> Option<usize> {
    content
        .lines()
        .position(|line| line.contains(needle))
        .map(|i| i + 1)
}

fn suggest_key(unknown: &str) -> Option<String> {
    KNOWN_KEYS
        .iter()
        .map(|candidate| (*candidate, edit_distance(unknown, candidate)))
        .min_by_key(|(_, dist)| *dist)
        .filter(|(_, dist)| *dist <= 2)
        .map(|(candidate, _)| candidate.to_string())
}

/// Edit distance between two config keys, counted in chars
fn edit_distance(a: &str, b: &str) -> usize {
    let target: Vec<char> = b.chars().collect();
    // row[j]: distance from the consumed prefix of `a` to target[..j]
    let mut row: Vec<usize> = (0..=target.len()).collect();

    for (i, source) in a.chars().enumerate() {
        let mut diagonal = row[0];
        row[0] = i + 1;
        for (j, wanted) in target.iter().enumerate() {
            let substitute = diagonal + usize::from(source != *wanted);
            diagonal = row[j + 1];
            row[j + 1] = substitute.min(row[j] + 1).min(diagonal + 1);
        }
    }
    row[target.len()]
}

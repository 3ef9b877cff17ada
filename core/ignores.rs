use crate::error::{AppError, Result};
use crate::resolve::build_glob_set_from_vec;
use globset::GlobSet;
use log;
use once_cell::sync::Lazy;
use serde::Deserialize;

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct CatalogueGroups {
    #[serde(default)]
    dependencies: Vec<String>,
    #[serde(default)]
    build_outputs: Vec<String>,
    #[serde(default)]
    vcs: Vec<String>,
    #[serde(default)]
    os_artifacts: Vec<String>,
    #[serde(default)]
    environment: Vec<String>,
    #[serde(default)]
    web_caches: Vec<String>,
    #[serde(default)]
    tool_output: Vec<String>,
}

/// Paths excluded from every normal include. Never mutated after load.
#[derive(Debug)]
pub struct IgnoreCatalogue {
    patterns: Vec<String>,
    set: GlobSet,
}

static GLOBAL_CATALOGUE: Lazy<IgnoreCatalogue> = Lazy::new(|| {
    let yaml_content = include_str!(concat!(
        env!("CARGO_MANIFEST_DIR"),
        "/../data/ignore_catalogue.yaml"
    ));
    IgnoreCatalogue::from_yaml(yaml_content)
        .expect("Failed to load embedded data/ignore_catalogue.yaml")
});

impl IgnoreCatalogue {
    pub fn global() -> &'static IgnoreCatalogue {
        &GLOBAL_CATALOGUE
    }

    pub fn from_yaml(yaml_content: &str) -> Result<Self> {
        let groups: CatalogueGroups = serde_yml::from_str(yaml_content)?;
        let patterns: Vec<String> = [
            groups.dependencies,
            groups.build_outputs,
            groups.vcs,
            groups.os_artifacts,
            groups.environment,
            groups.web_caches,
            groups.tool_output,
        ]
        .into_iter()
        .flatten()
        .collect();
        Self::from_patterns(patterns)
    }

    pub fn from_patterns(patterns: Vec<String>) -> Result<Self> {
        let set = build_glob_set_from_vec(&patterns).map_err(|e| {
            AppError::DataLoading(format!("Invalid ignore catalogue entry: {}", e))
        })?;
        log::trace!("Ignore catalogue compiled with {} entries", patterns.len());
        Ok(IgnoreCatalogue { patterns, set })
    }

    pub fn patterns(&self) -> &[String] {
        &self.patterns
    }

    pub fn glob_set(&self) -> &GlobSet {
        &self.set
    }

    pub fn is_globally_ignored(&self, relative_path: &str) -> bool {
        self.set.is_match(relative_path)
    }
}

use crate::error::{AppError, Result};
use crate::pattern::{self, Pattern};
use indexmap::IndexMap;
use log;
use serde::Deserialize;
use std::env;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG_FILENAME: &str = ".ctxpack";
pub const DEFAULT_SETTINGS_FILENAME: &str = ".ctxpack.toml";
pub const PROJECT_ROOT_ENV: &str = "CTXPACK_ROOT";

/// Ordered `[section]` -> raw pattern lines, as written in the section file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SectionConfig {
    sections: IndexMap<String, Vec<String>>,
}

impl SectionConfig {
    pub fn parse(text: &str) -> Self {
        let mut sections: IndexMap<String, Vec<String>> = IndexMap::new();
        let mut current: Option<String> = None;

        for (line_no, line) in text.lines().enumerate() {
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }
            if trimmed.len() >= 2 && trimmed.starts_with('[') && trimmed.ends_with(']') {
                let name = trimmed[1..trimmed.len() - 1].trim().to_string();
                if sections.insert(name.clone(), Vec::new()).is_some() {
                    log::debug!(
                        "Section '{}' declared again on line {}, discarding earlier patterns",
                        name,
                        line_no + 1
                    );
                }
                current = Some(name);
                continue;
            }
            match &current {
                Some(name) => {
                    if let Some(lines) = sections.get_mut(name) {
                        lines.push(trimmed.to_string());
                    }
                }
                None => {
                    log::trace!(
                        "Ignoring line {} outside any section: {}",
                        line_no + 1,
                        trimmed
                    );
                }
            }
        }

        log::debug!("Parsed {} sections", sections.len());
        SectionConfig { sections }
    }

    pub fn load(config_path: &Path) -> Result<Self> {
        log::info!("Loading sections from: {}", config_path.display());
        let text = fs::read_to_string(config_path).map_err(|e| {
            if e.kind() == ErrorKind::NotFound {
                AppError::ConfigNotFound {
                    path: config_path.to_path_buf(),
                }
            } else {
                AppError::FileRead {
                    path: config_path.to_path_buf(),
                    source: e,
                }
            }
        })?;
        Ok(Self::parse(&text))
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    pub fn len(&self) -> usize {
        self.sections.len()
    }

    pub fn section_names(&self) -> impl Iterator<Item = &str> {
        self.sections.keys().map(String::as_str)
    }

    pub fn raw_lines(&self, section: &str) -> Option<&[String]> {
        self.sections.get(section).map(Vec::as_slice)
    }

    /// Sections in declaration order with their classified patterns.
    pub fn classified(&self) -> Vec<(String, Vec<Pattern>)> {
        self.sections
            .iter()
            .map(|(name, lines)| (name.clone(), pattern::classify_all(lines)))
            .collect()
    }

    pub fn determine_project_root(cli_project_root: Option<&PathBuf>) -> Result<PathBuf> {
        let path_str_opt = cli_project_root
            .map(|p| p.to_string_lossy().to_string())
            .or_else(|| env::var(PROJECT_ROOT_ENV).ok().filter(|s| !s.is_empty()));

        let path_to_resolve = match path_str_opt {
            Some(p_str) => PathBuf::from(shellexpand::tilde(&p_str).as_ref()),
            None => env::current_dir().map_err(AppError::Io)?,
        };

        path_to_resolve.canonicalize().map_err(|e| {
            AppError::Io(std::io::Error::new(
                e.kind(),
                format!(
                    "Failed to canonicalize project root '{}': {}",
                    path_to_resolve.display(),
                    e
                ),
            ))
        })
    }

    /// The CLI path when given (relative to the working directory), otherwise
    /// the default section file inside the project root. Existence is checked
    /// by [`SectionConfig::load`].
    pub fn resolve_config_path(project_root: &Path, cli_config_file: Option<&String>) -> PathBuf {
        match cli_config_file {
            Some(p_str) => {
                let path = PathBuf::from(shellexpand::tilde(p_str).as_ref());
                let resolved = if path.is_absolute() {
                    path
                } else {
                    env::current_dir()
                        .map(|cwd| cwd.join(&path))
                        .unwrap_or(path)
                };
                log::debug!("Using specified section file: {}", resolved.display());
                resolved
            }
            None => {
                let default_path = project_root.join(DEFAULT_CONFIG_FILENAME);
                log::debug!("Using default section file: {}", default_path.display());
                default_path
            }
        }
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq, Default)]
#[serde(deny_unknown_fields)]
pub struct Settings {
    #[serde(default)]
    pub output: OutputSettings,
    #[serde(default)]
    pub tree: TreeSettings,
}

#[derive(Debug, Deserialize, Clone, PartialEq, Default)]
#[serde(deny_unknown_fields)]
pub struct OutputSettings {
    /// Relative paths are taken from the project root.
    #[serde(default)]
    pub dir: Option<PathBuf>,
}

#[derive(Debug, Deserialize, Clone, PartialEq, Default)]
#[serde(deny_unknown_fields)]
pub struct TreeSettings {
    #[serde(default)]
    pub max_depth: Option<usize>,
}

impl Settings {
    /// Reads `.ctxpack.toml` from the project root; a missing file yields defaults.
    pub fn load_or_default(project_root: &Path) -> Result<Self> {
        let settings_path = project_root.join(DEFAULT_SETTINGS_FILENAME);
        if !settings_path.exists() {
            log::debug!(
                "No settings file at {}, using defaults",
                settings_path.display()
            );
            return Ok(Settings::default());
        }
        log::info!("Loading settings from: {}", settings_path.display());
        let toml_content = fs::read_to_string(&settings_path).map_err(|e| AppError::FileRead {
            path: settings_path.clone(),
            source: e,
        })?;
        toml::from_str::<Settings>(&toml_content).map_err(|e| {
            AppError::TomlParse(format!(
                "Error parsing settings file '{}': {}. Check TOML syntax and structure.",
                settings_path.display(),
                e
            ))
        })
    }

    pub fn output_dir(&self, project_root: &Path) -> PathBuf {
        match &self.output.dir {
            Some(dir) => {
                let expanded = PathBuf::from(shellexpand::tilde(&dir.to_string_lossy()).as_ref());
                if expanded.is_absolute() {
                    expanded
                } else {
                    project_root.join(expanded)
                }
            }
            None => project_root.to_path_buf(),
        }
    }
}

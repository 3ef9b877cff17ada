use crate::error::{AppError, Result};
use crate::ignores::IgnoreCatalogue;
use crate::pattern::{Pattern, PatternKind};
use globset::{Glob, GlobBuilder, GlobSet, GlobSetBuilder};
use ignore::{WalkBuilder, WalkState};
use log;
use std::collections::BTreeSet;
use std::path::{Component, Path, PathBuf};
use std::sync::mpsc;

/// Every regular file under the project root, as sorted `/`-separated
/// relative paths. Built once per run and shared by all sections.
#[derive(Debug, Clone, Default)]
pub struct ProjectIndex {
    files: Vec<String>,
    walk_errors: Vec<String>,
}

impl ProjectIndex {
    pub fn scan(project_root: &Path) -> Result<Self> {
        if !project_root.is_dir() {
            return Err(AppError::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("Project root is not a directory: {}", project_root.display()),
            )));
        }

        let mut builder = WalkBuilder::new(project_root);
        builder.threads(rayon::current_num_threads().min(12));
        // Explicit includes must be able to reach hidden and gitignored paths.
        builder.standard_filters(false);
        builder.follow_links(false);

        enum Walked {
            File(String),
            Failed(String),
        }
        let (tx_walked, rx_walked) = mpsc::channel::<Walked>();
        let tx_for_closure = tx_walked.clone();
        let project_root_clone = project_root.to_path_buf();

        log::info!("Walking project directory: {}", project_root.display());
        builder.build_parallel().run(move || {
            let tx_thread = tx_for_closure.clone();
            let proj_root = project_root_clone.clone();

            Box::new(move |entry_result| {
                let message = match entry_result {
                    Ok(entry) => {
                        if entry.depth() == 0 || !entry.file_type().is_some_and(|ft| ft.is_file())
                        {
                            return WalkState::Continue;
                        }
                        match pathdiff::diff_paths(entry.path(), &proj_root) {
                            Some(relative_path) => Walked::File(to_slash_path(&relative_path)),
                            None => {
                                log::warn!(
                                    "Could not get relative path for: {}",
                                    entry.path().display()
                                );
                                return WalkState::Continue;
                            }
                        }
                    }
                    Err(e) => {
                        log::warn!("Error walking directory: {}", e);
                        Walked::Failed(e.to_string())
                    }
                };
                if tx_thread.send(message).is_err() {
                    log::error!("Receiver dropped for walked paths, stopping walk early.");
                    return WalkState::Quit;
                }
                WalkState::Continue
            })
        });
        drop(tx_walked);

        let mut files = Vec::new();
        let mut walk_errors = Vec::new();
        for walked in rx_walked {
            match walked {
                Walked::File(path) => files.push(path),
                Walked::Failed(e) => walk_errors.push(e),
            }
        }
        files.sort_unstable();
        log::info!("Directory walk complete. Indexed {} files.", files.len());
        Ok(ProjectIndex { files, walk_errors })
    }

    pub fn from_paths<I, S>(paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut files: Vec<String> = paths.into_iter().map(Into::into).collect();
        files.sort_unstable();
        files.dedup();
        ProjectIndex {
            files,
            walk_errors: Vec::new(),
        }
    }

    pub fn files(&self) -> &[String] {
        &self.files
    }

    pub fn walk_errors(&self) -> &[String] {
        &self.walk_errors
    }

    #[cfg(test)]
    pub(crate) fn with_walk_errors(mut self, walk_errors: Vec<String>) -> Self {
        self.walk_errors = walk_errors;
        self
    }
}

fn to_slash_path(relative_path: &Path) -> String {
    relative_path
        .components()
        .filter_map(|c| match c {
            Component::Normal(name) => Some(name.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}

/// `*` stops at `/`, `**` spans directories, a trailing `/` selects
/// everything beneath the directory.
pub(crate) fn compile_glob(pattern_str: &str) -> std::result::Result<Glob, globset::Error> {
    let mut processed_pattern = pattern_str.trim().trim_start_matches("./").to_string();
    if processed_pattern.ends_with('/') && processed_pattern.len() > 1 {
        processed_pattern.push_str("**");
    }
    log::trace!(
        "Compiling glob pattern: {} (processed as {})",
        pattern_str,
        processed_pattern
    );
    GlobBuilder::new(&processed_pattern)
        .literal_separator(true)
        .build()
}

pub(crate) fn build_glob_set_from_vec(patterns: &[String]) -> Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for pattern_str in patterns {
        let glob = compile_glob(pattern_str).map_err(|e| {
            log::error!("Invalid glob pattern \"{}\": {}", pattern_str, e);
            AppError::Glob(format!("Invalid glob pattern \"{}\": {}", pattern_str, e))
        })?;
        builder.add(glob);
    }
    builder.build().map_err(|e| {
        log::error!("Error building glob set: {}", e);
        AppError::Glob(e.to_string())
    })
}

#[derive(Debug, Default)]
pub struct SectionSelection {
    pub name: String,
    pub files: BTreeSet<String>,
    pub errors: Vec<AppError>,
}

/// Files matched by one pattern. Only normal includes are filtered through
/// the catalogue.
pub fn match_pattern(
    section: &str,
    pattern: &Pattern,
    index: &ProjectIndex,
    catalogue: &IgnoreCatalogue,
) -> Result<BTreeSet<String>> {
    let pattern_error = |reason: String| AppError::PatternResolution {
        section: section.to_string(),
        pattern: pattern.glob.clone(),
        reason,
    };
    if pattern.glob.is_empty() {
        return Err(pattern_error("empty glob expression".to_string()));
    }
    let matcher = compile_glob(&pattern.glob)
        .map_err(|e| pattern_error(e.to_string()))?
        .compile_matcher();
    let respect_catalogue = pattern.kind == PatternKind::NormalInclude;

    let matches: BTreeSet<String> = index
        .files()
        .iter()
        .filter(|path| matcher.is_match(path.as_str()))
        .filter(|path| {
            if respect_catalogue && catalogue.is_globally_ignored(path) {
                log::trace!("Catalogue suppresses {} for '{}'", path, pattern.glob);
                false
            } else {
                true
            }
        })
        .cloned()
        .collect();
    log::trace!(
        "[{}] {:?} '{}' matched {} files",
        section,
        pattern.kind,
        pattern.glob,
        matches.len()
    );
    Ok(matches)
}

pub fn resolve_section(
    section: &str,
    patterns: &[Pattern],
    index: &ProjectIndex,
    catalogue: &IgnoreCatalogue,
) -> SectionSelection {
    let (includes, excludes): (Vec<&Pattern>, Vec<&Pattern>) =
        patterns.iter().partition(|p| p.is_include());
    let mut errors = Vec::new();

    let mut fold_matches = |patterns: &[&Pattern]| {
        patterns
            .iter()
            .fold(BTreeSet::new(), |mut acc: BTreeSet<String>, pattern| {
                match match_pattern(section, pattern, index, catalogue) {
                    Ok(matches) => acc.extend(matches),
                    Err(e) => {
                        log::warn!("{}", e);
                        errors.push(e);
                    }
                }
                acc
            })
    };

    let included = fold_matches(includes.as_slice());
    let excluded = fold_matches(excludes.as_slice());
    let files: BTreeSet<String> = included.difference(&excluded).cloned().collect();

    log::debug!(
        "[{}] {} included, {} excluded, {} selected",
        section,
        included.len(),
        included.len() - files.len(),
        files.len()
    );
    SectionSelection {
        name: section.to_string(),
        files,
        errors,
    }
}

pub fn absolute_path(project_root: &Path, relative_path: &str) -> PathBuf {
    relative_path
        .split('/')
        .fold(project_root.to_path_buf(), |acc, part| acc.join(part))
}

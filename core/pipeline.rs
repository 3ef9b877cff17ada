use crate::config::SectionConfig;
use crate::error::{AppError, Result};
use crate::ignores::IgnoreCatalogue;
use crate::normalize;
use crate::render::{self, SectionOutput};
use crate::resolve::{self, ProjectIndex, SectionSelection};
use crate::tree;
use log;
use rayon::prelude::*;
use std::fmt;
use std::fs;
use std::path::Path;

/// A non-fatal failure, attributed to a section when it belongs to one.
#[derive(Debug)]
pub struct Diagnostic {
    pub section: Option<String>,
    pub error: AppError,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.section {
            Some(section) => write!(f, "[{}] {}", section, self.error),
            None => write!(f, "{}", self.error),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    Success,
    PartialSuccess,
}

#[derive(Debug, Default)]
pub struct RunReport {
    /// In section declaration order; sections without files are absent.
    pub outputs: Vec<SectionOutput>,
    pub empty_sections: Vec<String>,
    pub diagnostics: Vec<Diagnostic>,
}

impl RunReport {
    pub fn status(&self) -> RunStatus {
        if self.diagnostics.is_empty() {
            RunStatus::Success
        } else {
            RunStatus::PartialSuccess
        }
    }

    pub fn push_diagnostic(&mut self, section: Option<&str>, error: AppError) {
        self.diagnostics.push(Diagnostic {
            section: section.map(str::to_string),
            error,
        });
    }
}

pub fn run_sections(project_root: &Path, config: &SectionConfig) -> Result<RunReport> {
    if config.is_empty() {
        log::warn!("No sections configured; nothing to generate.");
        return Ok(RunReport::default());
    }
    let index = ProjectIndex::scan(project_root)?;
    Ok(run_sections_with_index(
        project_root,
        config,
        &index,
        IgnoreCatalogue::global(),
    ))
}

pub fn run_sections_with_index(
    project_root: &Path,
    config: &SectionConfig,
    index: &ProjectIndex,
    catalogue: &IgnoreCatalogue,
) -> RunReport {
    let mut report = RunReport::default();
    for walk_error in index.walk_errors() {
        report.push_diagnostic(None, AppError::Walk(walk_error.clone()));
    }

    let sections = config.classified();
    log::info!("Resolving {} sections...", sections.len());
    let selections: Vec<SectionSelection> = sections
        .par_iter()
        .map(|(name, patterns)| resolve::resolve_section(name, patterns, index, catalogue))
        .collect();

    for selection in selections {
        let SectionSelection {
            name,
            files,
            errors,
        } = selection;
        for error in errors {
            report.push_diagnostic(Some(&name), error);
        }
        if files.is_empty() {
            log::info!("Section '{}' matched no files, skipping.", name);
            report.empty_sections.push(name);
            continue;
        }

        let paths: Vec<&String> = files.iter().collect();
        log::info!("Reading {} files for section '{}'...", paths.len(), name);
        let blocks: Vec<(String, Result<String>)> = paths
            .par_iter()
            .map(|rel_path| {
                let rendered = read_normalized(project_root, rel_path)
                    .map(|content| render::render_file_block(rel_path, &content));
                (rel_path.to_string(), rendered)
            })
            .collect();

        let mut rendered_files = Vec::with_capacity(blocks.len());
        let mut rendered_blocks = Vec::with_capacity(blocks.len());
        for (rel_path, rendered) in blocks {
            match rendered {
                Ok(block) => {
                    rendered_files.push(rel_path);
                    rendered_blocks.push(block);
                }
                Err(e) => {
                    log::warn!("[{}] {}", name, e);
                    report.push_diagnostic(Some(&name), e);
                }
            }
        }

        if rendered_blocks.is_empty() {
            log::warn!("Section '{}' has no readable files, skipping.", name);
            report.empty_sections.push(name);
            continue;
        }
        let body = render::render_section(&name, &rendered_blocks);
        report.outputs.push(SectionOutput {
            name,
            files: rendered_files,
            body,
        });
    }

    log::info!(
        "Rendered {} sections ({} empty, {} diagnostics).",
        report.outputs.len(),
        report.empty_sections.len(),
        report.diagnostics.len()
    );
    report
}

fn read_normalized(project_root: &Path, relative_path: &str) -> Result<String> {
    let path = resolve::absolute_path(project_root, relative_path);
    let bytes = fs::read(&path).map_err(|e| AppError::FileRead {
        path: path.clone(),
        source: e,
    })?;
    let content = String::from_utf8(bytes).map_err(|_| AppError::FileRead {
        path: path.clone(),
        source: std::io::Error::new(std::io::ErrorKind::InvalidData, "not valid UTF-8"),
    })?;
    Ok(normalize::normalize_file(&path, &content))
}

pub fn run_tree(project_root: &Path, max_depth: Option<usize>) -> Result<String> {
    let index = ProjectIndex::scan(project_root)?;
    let visible = tree::visible_paths(&index, IgnoreCatalogue::global());
    let nodes = tree::build_tree(&visible);
    let root_name = project_root
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| ".".to_string());
    Ok(tree::render_tree(&root_name, &nodes, max_depth))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn project() -> (tempfile::TempDir, PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().to_path_buf();
        fs::create_dir_all(root.join("src")).unwrap();
        fs::write(root.join("src/app.js"), "function f() {\n  return 1;\n}\n").unwrap();
        fs::write(root.join("src/tool.py"), "def f():\n    return 1\n\n").unwrap();
        fs::write(root.join("src/blob.bin"), [0xff, 0xfe, 0x00, 0x80]).unwrap();
        (dir, root)
    }

    #[test]
    fn test_sections_render_in_declaration_order() {
        let (_dir, root) = project();
        let config = SectionConfig::parse("[python]\nsrc/*.py\n[js]\nsrc/*.js\n");
        let report = run_sections(&root, &config).unwrap();
        let names: Vec<_> = report.outputs.iter().map(|o| o.name.as_str()).collect();
        assert_eq!(names, vec!["python", "js"]);
        assert_eq!(report.status(), RunStatus::Success);
        assert!(report.outputs[0].body.contains("```py\ndef f():\n    return 1\n```"));
        assert!(report.outputs[1].body.contains("```js\nfunction f(){return 1;}\n```"));
    }

    #[test]
    fn test_unreadable_file_is_omitted_with_diagnostic() {
        let (_dir, root) = project();
        let config = SectionConfig::parse("[all]\nsrc/*\n");
        let report = run_sections(&root, &config).unwrap();
        assert_eq!(report.outputs.len(), 1);
        assert_eq!(report.outputs[0].files, vec!["src/app.js", "src/tool.py"]);
        assert!(!report.outputs[0].body.contains("blob.bin"));
        assert_eq!(report.status(), RunStatus::PartialSuccess);
        assert!(matches!(
            report.diagnostics[0].error,
            AppError::FileRead { .. }
        ));
        assert_eq!(report.diagnostics[0].section.as_deref(), Some("all"));
    }

    #[test]
    fn test_empty_section_produces_no_output() {
        let (_dir, root) = project();
        let config = SectionConfig::parse("[go]\n**/*.go\n[js]\nsrc/*.js\n");
        let report = run_sections(&root, &config).unwrap();
        assert_eq!(report.outputs.len(), 1);
        assert_eq!(report.empty_sections, vec!["go".to_string()]);
        assert_eq!(report.status(), RunStatus::Success);
    }

    #[test]
    fn test_walk_errors_become_unattributed_diagnostics() {
        let (_dir, root) = project();
        let index = ProjectIndex::from_paths(["src/app.js"])
            .with_walk_errors(vec!["locked/: Permission denied".to_string()]);
        let config = SectionConfig::parse("[js]\nsrc/*.js\n");
        let report =
            run_sections_with_index(&root, &config, &index, IgnoreCatalogue::global());
        assert_eq!(report.outputs.len(), 1);
        assert_eq!(report.status(), RunStatus::PartialSuccess);
        assert_eq!(report.diagnostics.len(), 1);
        assert!(report.diagnostics[0].section.is_none());
        assert!(matches!(
            &report.diagnostics[0].error,
            AppError::Walk(message) if message.contains("Permission denied")
        ));
    }

    #[test]
    fn test_no_sections_is_a_no_op() {
        let (_dir, root) = project();
        let report = run_sections(&root, &SectionConfig::parse("")).unwrap();
        assert!(report.outputs.is_empty());
        assert!(report.diagnostics.is_empty());
    }

    #[test]
    fn test_run_tree_renders_project() {
        let (_dir, root) = project();
        fs::create_dir_all(root.join("node_modules/x")).unwrap();
        fs::write(root.join("node_modules/x/index.js"), "x").unwrap();
        let rendered = run_tree(&root, None).unwrap();
        assert!(rendered.contains("src/"));
        assert!(rendered.contains("app.js"));
        assert!(!rendered.contains("node_modules"));
    }
}

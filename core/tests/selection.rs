use ctxpack_core::{
    AppError, IgnoreCatalogue, ProjectIndex, RunStatus, SectionConfig, classify_all,
    resolve_section, run_sections,
};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn write(root: &Path, rel: &str, content: &str) {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

fn setup_project() -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();
    write(root, "src/a.js", "const a = 1;\n");
    write(root, "src/b.js", "const b = 2;\n");
    write(root, "src/legacy/a.js", "var old = true;\n");
    write(root, "node_modules/pkg-a/index.js", "module.exports = {};\n");
    write(root, "node_modules/pkg-b/index.js", "module.exports = null;\n");
    write(root, ".gitignore", "src/legacy/\n");
    write(root, ".env", "SECRET=1\n");
    write(root, "README.md", "# Demo\n");
    dir
}

fn selected(root: &Path, lines: &[&str]) -> Vec<String> {
    let index = ProjectIndex::scan(root).unwrap();
    let selection = resolve_section(
        "test",
        &classify_all(lines),
        &index,
        IgnoreCatalogue::global(),
    );
    assert!(selection.errors.is_empty(), "{:?}", selection.errors);
    selection.files.into_iter().collect()
}

#[test]
fn test_explicit_include_override() {
    let dir = setup_project();
    let files = selected(dir.path(), &["+node_modules/pkg-a/**/*.js"]);
    assert_eq!(files, vec!["node_modules/pkg-a/index.js"]);
}

#[test]
fn test_normal_include_respects_catalogue() {
    let dir = setup_project();
    let files = selected(dir.path(), &["node_modules/**/*.js"]);
    assert!(files.is_empty());
}

#[test]
fn test_exclude_always_wins() {
    let dir = setup_project();
    let files = selected(dir.path(), &["src/**/*.js", "-src/legacy/a.js"]);
    assert_eq!(files, vec!["src/a.js", "src/b.js"]);
}

#[test]
fn test_union_and_dedup() {
    let dir = setup_project();
    let files = selected(dir.path(), &["src/**/*.js", "src/a.js"]);
    assert_eq!(files, vec!["src/a.js", "src/b.js", "src/legacy/a.js"]);
}

#[test]
fn test_gitignore_does_not_hide_files() {
    // Selection is driven by the section file and the catalogue only.
    let dir = setup_project();
    let files = selected(dir.path(), &["src/legacy/*.js"]);
    assert_eq!(files, vec!["src/legacy/a.js"]);
}

#[test]
fn test_hidden_env_file_needs_explicit_include() {
    let dir = setup_project();
    assert!(selected(dir.path(), &[".env"]).is_empty());
    assert_eq!(selected(dir.path(), &["+.env"]), vec![".env"]);
}

#[test]
fn test_zero_match_section_produces_nothing() {
    let dir = setup_project();
    let config = SectionConfig::parse("[rust]\n**/*.rs\n");
    let report = run_sections(dir.path(), &config).unwrap();
    assert!(report.outputs.is_empty());
    assert_eq!(report.empty_sections, vec!["rust".to_string()]);
    assert_eq!(report.status(), RunStatus::Success);
}

#[test]
fn test_missing_configuration_is_fatal() {
    let dir = setup_project();
    let err = SectionConfig::load(&dir.path().join("does-not-exist")).unwrap_err();
    assert!(matches!(err, AppError::ConfigNotFound { .. }));
}

#[test]
fn test_full_run_renders_sections() {
    let dir = setup_project();
    write(
        dir.path(),
        ".ctxpack",
        "[js]\nsrc/**/*.js\n-src/legacy/**\n+node_modules/pkg-b/**\n\n[docs]\n*.md\n[broken]\nsrc/[x\n",
    );
    let config = SectionConfig::load(&dir.path().join(".ctxpack")).unwrap();
    let report = run_sections(dir.path(), &config).unwrap();

    let names: Vec<_> = report.outputs.iter().map(|o| o.name.as_str()).collect();
    assert_eq!(names, vec!["js", "docs"]);
    assert_eq!(
        report.outputs[0].files,
        vec!["node_modules/pkg-b/index.js", "src/a.js", "src/b.js"]
    );
    assert!(report.outputs[0].body.contains("## src/a.js\n\n```js\nconst a = 1;\n```"));
    assert!(
        report.outputs[1]
            .body
            .contains("## README.md\n\n```md\n# Demo\n```")
    );

    assert_eq!(report.empty_sections, vec!["broken".to_string()]);
    assert_eq!(report.status(), RunStatus::PartialSuccess);
    assert!(matches!(
        &report.diagnostics[0].error,
        AppError::PatternResolution { section, pattern, .. }
            if section == "broken" && pattern == "src/[x"
    ));
}

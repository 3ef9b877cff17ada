use anyhow::{Context, Result};
use colored::*;
use comfy_table::{Cell, CellAlignment, Color, ContentArrangement, Table, presets::UTF8_FULL};
use ctxpack_core::{AppError, Diagnostic, RunReport};
use std::fs::{self, File};
use std::io::{self, Write};
use std::path::Path;

pub fn write_to_file(path: &Path, content: &str) -> ctxpack_core::Result<()> {
    let write_error = |source: io::Error| AppError::OutputWrite {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(write_error)?;
    }
    let mut file = File::create(path).map_err(write_error)?;
    file.write_all(content.as_bytes()).map_err(write_error)?;
    if !content.ends_with('\n') {
        file.write_all(b"\n").map_err(write_error)?;
    }
    Ok(())
}

pub fn write_to_stdout(content: &str) -> Result<()> {
    let stdout = io::stdout();
    let mut handle = stdout.lock();
    handle
        .write_all(content.as_bytes())
        .context("Failed to write to stdout")?;
    if !content.ends_with('\n') {
        handle
            .write_all(b"\n")
            .context("Failed to write newline to stdout")?;
    }
    handle.flush().context("Failed to flush stdout")?;
    Ok(())
}

pub fn print_saved(path: &Path, quiet: bool) {
    if !quiet {
        eprintln!(
            "{} Saved: {}",
            "✅".green(),
            path.display().to_string().blue()
        );
    }
}

pub fn print_diagnostics(diagnostics: &[Diagnostic], quiet: bool) {
    if diagnostics.is_empty() || quiet {
        return;
    }
    eprintln!(
        "\n{}",
        "⚠️ Warning: Some patterns or files could not be processed:".yellow()
    );
    for diagnostic in diagnostics {
        eprintln!(" - {}", diagnostic);
    }
    eprintln!("---");
}

pub fn print_section_summary(report: &RunReport) {
    eprintln!();
    eprintln!("{}", " Section Summary ".green().bold().underline());
    for output in &report.outputs {
        eprintln!("{}", format!("[{}]", output.name).cyan().bold());
        for file in &output.files {
            eprintln!("  - {}", file);
        }
    }

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![
        Cell::new("Section").fg(Color::Green),
        Cell::new("Files").fg(Color::Green),
        Cell::new("Chars").fg(Color::Green),
    ]);
    for output in &report.outputs {
        table.add_row(vec![
            Cell::new(&output.name).fg(Color::Cyan),
            Cell::new(output.files.len()).set_alignment(CellAlignment::Right),
            Cell::new(output.body.chars().count()).set_alignment(CellAlignment::Right),
        ]);
    }
    for name in &report.empty_sections {
        table.add_row(vec![
            Cell::new(name).fg(Color::DarkGrey),
            Cell::new(0).set_alignment(CellAlignment::Right),
            Cell::new("-").set_alignment(CellAlignment::Right),
        ]);
    }
    eprintln!("{table}");
    eprintln!();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_to_file_creates_parents() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("a.ctx.md");
        write_to_file(&path, "# a").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "# a\n");
    }

    #[test]
    fn test_write_failure_is_output_write_error() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("blocker");
        fs::write(&blocker, "not a directory").unwrap();
        let err = write_to_file(&blocker.join("a.ctx.md"), "x").unwrap_err();
        assert!(matches!(err, AppError::OutputWrite { .. }));
    }
}

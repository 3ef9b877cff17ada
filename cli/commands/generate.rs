use crate::cli_args::GenerateArgs;
use crate::output;
use anyhow::{Context, Result};
use colored::Colorize;
use ctxpack_core::{self as core, RunStatus, SectionConfig, Settings};
use log;
use std::path::{Path, PathBuf};

pub fn handle_generate_command(args: &GenerateArgs, quiet: bool, verbose: u8) -> Result<()> {
    let project_root =
        SectionConfig::determine_project_root(args.project_config.project_root.as_ref())
            .context("Failed to determine project root")?;
    log::info!("Project root determined: {}", project_root.display());

    let config_path =
        SectionConfig::resolve_config_path(&project_root, args.project_config.config.as_ref());
    let config = SectionConfig::load(&config_path)?;
    if config.is_empty() {
        if !quiet {
            eprintln!(
                "{} No sections found in {}; nothing to generate.",
                "ℹ️".blue(),
                config_path.display()
            );
        }
        return Ok(());
    }

    let settings = Settings::load_or_default(&project_root).context("Failed to load settings")?;
    let output_dir = resolve_output_dir(args.output.output_dir.as_ref(), &settings, &project_root);

    let mut report = core::run_sections(&project_root, &config)
        .context("Failed to generate section documents")?;

    let file_names = core::unique_output_file_names(&report.outputs);
    let mut write_failures = Vec::new();
    for (section_output, file_name) in report.outputs.iter().zip(&file_names) {
        if args.output.stdout {
            output::write_to_stdout(&section_output.body)?;
            continue;
        }
        let path = output_dir.join(file_name);
        match output::write_to_file(&path, &section_output.body) {
            Ok(()) => {
                log::info!("Wrote section '{}' to {}", section_output.name, path.display());
                output::print_saved(&path, quiet);
            }
            Err(e) => {
                log::warn!("[{}] {}", section_output.name, e);
                write_failures.push((section_output.name.clone(), e));
            }
        }
    }
    for (name, error) in write_failures {
        report.push_diagnostic(Some(&name), error);
    }

    if verbose > 0 && !quiet {
        output::print_section_summary(&report);
    }
    output::print_diagnostics(&report.diagnostics, quiet);

    if report.status() == RunStatus::PartialSuccess && !quiet {
        eprintln!(
            "{}",
            format!(
                "Finished with partial success: {} of {} sections written, {} problems reported.",
                report.outputs.len(),
                config.len(),
                report.diagnostics.len()
            )
            .yellow()
        );
    }
    Ok(())
}

fn resolve_output_dir(cli_dir: Option<&PathBuf>, settings: &Settings, project_root: &Path) -> PathBuf {
    match cli_dir {
        Some(dir) => {
            log::trace!("Output directory provided via CLI: {}", dir.display());
            dir.clone()
        }
        None => settings.output_dir(project_root),
    }
}

use crate::cli_args::TreeArgs;
use crate::output;
use anyhow::{Context, Result};
use ctxpack_core::{self as core, SectionConfig, Settings, render};
use log;

pub fn handle_tree_command(args: &TreeArgs, quiet: bool) -> Result<()> {
    let project_root = SectionConfig::determine_project_root(args.project_root.as_ref())
        .context("Failed to determine project root")?;
    log::info!("Project root determined: {}", project_root.display());

    let settings = Settings::load_or_default(&project_root).context("Failed to load settings")?;
    let max_depth = args.max_depth.or(settings.tree.max_depth);
    log::debug!("Rendering tree (max depth: {:?})", max_depth);

    let rendered = core::run_tree(&project_root, max_depth).context("Failed to render tree")?;

    if args.output.stdout {
        return output::write_to_stdout(&rendered);
    }
    let output_dir = args
        .output
        .output_dir
        .clone()
        .unwrap_or_else(|| settings.output_dir(&project_root));
    let path = output_dir.join(render::output_file_name(render::TREE_OUTPUT_STEM));
    let body = format!("# {}\n\n```\n{}```\n", render::TREE_OUTPUT_STEM, rendered);
    output::write_to_file(&path, &body)?;
    output::print_saved(&path, quiet);
    Ok(())
}

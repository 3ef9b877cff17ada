mod cli_args;
mod commands;
mod output;

use anyhow::Result;
use clap::Parser;
use colored::*;
use log;
use std::process;

use cli_args::{Cli, Mode, RunOptions};
use ctxpack_core::AppError;

fn main() {
    let options = RunOptions::from(Cli::parse());

    setup_logging(options.quiet, options.verbose);
    log::debug!("Run options: {:?}", options);

    let quiet = options.quiet;
    let exit_code = match run_app(&options) {
        Ok(()) => {
            log::info!("Application finished successfully.");
            0
        }
        Err(e) => {
            let exit_code = exit_code_for(&e);
            if !quiet || exit_code == 1 {
                eprintln!("{} {:#}", "Error:".red().bold(), e);
            } else {
                log::error!("Application failed: {:#}", e);
            }
            exit_code
        }
    };
    log::debug!("Exiting with code {}", exit_code);
    process::exit(exit_code);
}

/// 1 for a missing section file, 2 for any other fatal error.
fn exit_code_for(e: &anyhow::Error) -> i32 {
    match e.downcast_ref::<AppError>() {
        Some(AppError::ConfigNotFound { .. }) => 1,
        _ => 2,
    }
}

fn setup_logging(quiet: bool, verbose: u8) {
    let log_level = if quiet {
        log::LevelFilter::Off
    } else {
        match verbose {
            0 => log::LevelFilter::Warn,
            1 => log::LevelFilter::Info,
            2 => log::LevelFilter::Debug,
            _ => log::LevelFilter::Trace,
        }
    };
    env_logger::Builder::new()
        .filter_level(log_level)
        .format_timestamp(None)
        .init();
    log::trace!("Logger initialized with level: {:?}", log_level);
}

fn run_app(options: &RunOptions) -> Result<()> {
    match &options.mode {
        Mode::Generate(args) => {
            log::debug!("Executing 'generate' mode...");
            commands::generate::handle_generate_command(args, options.quiet, options.verbose)
        }
        Mode::Tree(args) => {
            log::debug!("Executing 'tree' mode...");
            commands::tree::handle_tree_command(args, options.quiet)
        }
    }
}

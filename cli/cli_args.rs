use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Args, Debug, Clone, Default)]
pub struct ProjectConfigOpts {
    #[arg(
        long,
        help = "Specify the target project directory (default: $CTXPACK_ROOT or current dir).",
        help_heading = "Project Setup",
        value_name = "PATH"
    )]
    pub project_root: Option<PathBuf>,

    #[arg(
        short = 'c',
        long,
        help = "Specify the section file (default: <project root>/.ctxpack).",
        value_name = "SECTION_FILE",
        help_heading = "Project Setup"
    )]
    pub config: Option<String>,
}

#[derive(Args, Debug, Clone, Default)]
pub struct OutputOpts {
    #[arg(
        short = 'o',
        long,
        help = "Directory for generated *.ctx.md files (default: settings or project root).",
        value_name = "DIR",
        help_heading = "Output Control",
        conflicts_with = "stdout"
    )]
    pub output_dir: Option<PathBuf>,

    #[arg(
        long,
        help = "Print generated documents to standard output instead of writing files.",
        help_heading = "Output Control"
    )]
    pub stdout: bool,
}

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Pack selected project files into AI-ready markdown, one document per section.",
    long_about = "ctxpack reads a section file ([name] headers followed by glob patterns), \nselects files per section (+pattern bypasses the built-in ignore list, -pattern excludes), \nlines starting with # are comments (so a pattern cannot start with #), \ncompacts their content and writes one <section>.ctx.md document per section.",
    help_template = "{about-section}\nUsage: {usage}\n\n{all-args}{after-help}",
    after_help = "EXAMPLES:\n  ctxpack\n  ctxpack generate -v --output-dir ./context\n  ctxpack tree --max-depth 2 --stdout"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    #[arg(short, long, action = clap::ArgAction::Count, global = true, help = "Increase message verbosity (-v, -vv).")]
    pub verbose: u8,

    #[arg(
        short,
        long,
        global = true,
        help = "Silence informational messages and warnings."
    )]
    pub quiet: bool,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    #[command(
        visible_alias = "g",
        about = "Generate one document per configured section [default]."
    )]
    Generate(GenerateArgs),

    #[command(
        visible_alias = "t",
        about = "Render the project directory tree (built-in ignores applied)."
    )]
    Tree(TreeArgs),
}

#[derive(Args, Debug, Clone, Default)]
pub struct GenerateArgs {
    #[clap(flatten)]
    pub project_config: ProjectConfigOpts,
    #[clap(flatten)]
    pub output: OutputOpts,
}

#[derive(Args, Debug, Clone, Default)]
pub struct TreeArgs {
    #[arg(
        long,
        help = "Specify the target project directory (default: $CTXPACK_ROOT or current dir).",
        help_heading = "Project Setup",
        value_name = "PATH"
    )]
    pub project_root: Option<PathBuf>,

    #[clap(flatten)]
    pub output: OutputOpts,

    #[arg(
        long,
        value_name = "N",
        help = "Limit the rendered depth (default: settings or unlimited)."
    )]
    pub max_depth: Option<usize>,
}

#[derive(Debug, Clone)]
pub enum Mode {
    Generate(GenerateArgs),
    Tree(TreeArgs),
}

/// Everything one invocation needs, independent of how it was spelled.
#[derive(Debug, Clone)]
pub struct RunOptions {
    pub verbose: u8,
    pub quiet: bool,
    pub mode: Mode,
}

impl From<Cli> for RunOptions {
    fn from(cli: Cli) -> Self {
        let mode = match cli.command {
            Some(Commands::Generate(args)) => Mode::Generate(args),
            Some(Commands::Tree(args)) => Mode::Tree(args),
            None => Mode::Generate(GenerateArgs::default()),
        };
        RunOptions {
            verbose: cli.verbose,
            quiet: cli.quiet,
            mode,
        }
    }
}

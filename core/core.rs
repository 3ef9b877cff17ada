pub mod config;
pub mod error;
pub mod ignores;
pub mod normalize;
pub mod pattern;
pub mod pipeline;
pub mod render;
pub mod resolve;
pub mod tree;

pub use config::{SectionConfig, Settings};
pub use error::{AppError, Result};
pub use ignores::IgnoreCatalogue;
pub use normalize::{WHITESPACE_SENSITIVE_EXTENSIONS, is_whitespace_sensitive, normalize};
pub use pattern::{Pattern, PatternKind, classify_all};
pub use pipeline::{Diagnostic, RunReport, RunStatus, run_sections, run_tree};
pub use render::{SectionOutput, output_file_name, unique_output_file_names};
pub use resolve::{ProjectIndex, SectionSelection, resolve_section};
pub use tree::{TreeNode, build_tree, render_tree};

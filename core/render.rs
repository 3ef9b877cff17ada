use log;
use std::collections::HashSet;
use std::path::Path;

pub const OUTPUT_EXTENSION: &str = "ctx.md";
pub const TREE_OUTPUT_STEM: &str = "tree";

/// One rendered section, ready for the writer.
#[derive(Debug, Clone, PartialEq)]
pub struct SectionOutput {
    pub name: String,
    pub files: Vec<String>,
    pub body: String,
}

pub fn output_file_name(stem: &str) -> String {
    format!("{}.{}", sanitize_stem(stem), OUTPUT_EXTENSION)
}

/// One file name per output, in order. A name already taken (ignoring ASCII
/// case) gets the first free `-2`, `-3`, ... suffix.
pub fn unique_output_file_names(outputs: &[SectionOutput]) -> Vec<String> {
    let mut taken: HashSet<String> = HashSet::new();
    outputs
        .iter()
        .map(|output| {
            let stem = sanitize_stem(&output.name);
            let mut file_name = format!("{}.{}", stem, OUTPUT_EXTENSION);
            let mut n = 2;
            while !taken.insert(file_name.to_ascii_lowercase()) {
                file_name = format!("{}-{}.{}", stem, n, OUTPUT_EXTENSION);
                n += 1;
            }
            if n > 2 {
                log::warn!(
                    "Section '{}' collides with an earlier output name, writing {}",
                    output.name,
                    file_name
                );
            }
            file_name
        })
        .collect()
}

fn sanitize_stem(stem: &str) -> String {
    let sanitized: String = stem
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                c
            } else {
                '_'
            }
        })
        .collect();
    if sanitized.trim_matches('.').is_empty() {
        "section".to_string()
    } else {
        sanitized
    }
}

pub fn fence_tag(relative_path: &str) -> &str {
    Path::new(relative_path)
        .extension()
        .and_then(|ext| ext.to_str())
        .unwrap_or("")
}

// Longer than any backtick run in the content so the block cannot close early.
fn fence_for(content: &str) -> String {
    let longest_run = content
        .split(|c| c != '`')
        .map(str::len)
        .max()
        .unwrap_or(0);
    "`".repeat(longest_run.max(2) + 1)
}

pub fn render_file_block(relative_path: &str, content: &str) -> String {
    let fence = fence_for(content);
    let mut block = format!("## {}\n\n{}{}\n", relative_path, fence, fence_tag(relative_path));
    if !content.is_empty() {
        block.push_str(content);
        block.push('\n');
    }
    block.push_str(&fence);
    block.push('\n');
    block
}

pub fn render_section(name: &str, blocks: &[String]) -> String {
    format!("# {}\n\n{}", name, blocks.join("\n"))
}

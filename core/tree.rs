use crate::ignores::IgnoreCatalogue;
use crate::resolve::ProjectIndex;
use log;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum NodeKind {
    Directory,
    File,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TreeNode {
    pub name: String,
    pub kind: NodeKind,
    pub children: Vec<TreeNode>,
}

/// Index paths that survive the same catalogue normal includes respect.
pub fn visible_paths<'a>(index: &'a ProjectIndex, catalogue: &IgnoreCatalogue) -> Vec<&'a str> {
    index
        .files()
        .iter()
        .filter(|path| {
            let ignored = catalogue.is_globally_ignored(path);
            if ignored {
                log::trace!("Tree skips catalogue path: {}", path);
            }
            !ignored
        })
        .map(String::as_str)
        .collect()
}

pub fn build_tree<S: AsRef<str>>(relative_paths: &[S]) -> Vec<TreeNode> {
    log::debug!(
        "Building tree structure from {} paths...",
        relative_paths.len()
    );
    let mut root_nodes: Vec<TreeNode> = Vec::new();
    for rel_path in relative_paths {
        let components: Vec<&str> = rel_path
            .as_ref()
            .split('/')
            .filter(|c| !c.is_empty())
            .collect();
        if !components.is_empty() {
            insert_node(&mut root_nodes, &components);
        }
    }
    sort_nodes(&mut root_nodes);
    root_nodes
}

fn insert_node(current_level_nodes: &mut Vec<TreeNode>, components: &[&str]) {
    let Some((component_name, remaining_components)) = components.split_first() else {
        return;
    };
    let is_last_component = remaining_components.is_empty();
    let kind = if is_last_component {
        NodeKind::File
    } else {
        NodeKind::Directory
    };

    let position = current_level_nodes
        .iter()
        .position(|node| node.name == *component_name && node.kind == kind);
    let node = match position {
        Some(index) => &mut current_level_nodes[index],
        None => {
            current_level_nodes.push(TreeNode {
                name: component_name.to_string(),
                kind,
                children: Vec::new(),
            });
            let last = current_level_nodes.len() - 1;
            &mut current_level_nodes[last]
        }
    };
    if !is_last_component {
        insert_node(&mut node.children, remaining_components);
    }
}

// Directories first, then files, each alphabetical.
fn sort_nodes(nodes: &mut [TreeNode]) {
    nodes.sort_by(|a, b| a.kind.cmp(&b.kind).then_with(|| a.name.cmp(&b.name)));
    for node in nodes.iter_mut() {
        sort_nodes(&mut node.children);
    }
}

pub fn render_tree(root_name: &str, nodes: &[TreeNode], max_depth: Option<usize>) -> String {
    let mut out = format!("{}/\n", root_name);
    render_level(&mut out, nodes, "", 1, max_depth);
    out
}

fn render_level(
    out: &mut String,
    nodes: &[TreeNode],
    prefix: &str,
    depth: usize,
    max_depth: Option<usize>,
) {
    for (i, node) in nodes.iter().enumerate() {
        let is_last = i + 1 == nodes.len();
        let connector = if is_last { "└── " } else { "├── " };
        let suffix = if node.kind == NodeKind::Directory {
            "/"
        } else {
            ""
        };
        out.push_str(&format!("{}{}{}{}\n", prefix, connector, node.name, suffix));

        if max_depth.is_some_and(|max| depth >= max) {
            continue;
        }
        let child_prefix = format!("{}{}", prefix, if is_last { "    " } else { "│   " });
        render_level(out, &node.children, &child_prefix, depth + 1, max_depth);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_and_render() {
        let nodes = build_tree(&["src/main.rs", "README.md", "src/util/mod.rs", "Cargo.toml"]);
        let rendered = render_tree("demo", &nodes, None);
        assert_eq!(
            rendered,
            "demo/\n\
             ├── src/\n\
             │   ├── util/\n\
             │   │   └── mod.rs\n\
             │   └── main.rs\n\
             ├── Cargo.toml\n\
             └── README.md\n"
        );
    }

    #[test]
    fn test_max_depth_truncates() {
        let nodes = build_tree(&["a/b/c.txt", "a/d.txt", "e.txt"]);
        let rendered = render_tree("root", &nodes, Some(1));
        assert_eq!(rendered, "root/\n├── a/\n└── e.txt\n");
    }

    #[test]
    fn test_tree_uses_ignore_catalogue() {
        let index = ProjectIndex::from_paths([
            "src/lib.rs",
            "node_modules/pkg/index.js",
            "target/debug/app",
            ".git/HEAD",
            "notes.ctx.md",
        ]);
        let visible = visible_paths(&index, IgnoreCatalogue::global());
        assert_eq!(visible, vec!["src/lib.rs"]);
        let rendered = render_tree("p", &build_tree(&visible), None);
        assert!(!rendered.contains("node_modules"));
        assert!(rendered.contains("lib.rs"));
    }
}

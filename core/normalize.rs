use once_cell::sync::Lazy;
use regex::Regex;
use std::path::Path;

/// Extensions whose indentation or line breaks carry meaning.
pub const WHITESPACE_SENSITIVE_EXTENSIONS: &[&str] = &[
    ".py", ".yaml", ".yml", ".jade", ".haml", ".slim", ".coffee", ".pug", ".styl",
];

static WHITESPACE_RUN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s+").expect("valid whitespace regex"));
static AROUND_BRACKETS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s*([(){}\[\]])\s*").expect("valid bracket regex"));
static AFTER_SEPARATORS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"([;,])\s+").expect("valid separator regex"));

pub fn is_whitespace_sensitive(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            WHITESPACE_SENSITIVE_EXTENSIONS
                .iter()
                .any(|sensitive| sensitive[1..].eq_ignore_ascii_case(ext))
        })
}

pub fn normalize(content: &str, whitespace_sensitive: bool) -> String {
    if whitespace_sensitive {
        content
            .lines()
            .map(str::trim_end)
            .filter(|line| !line.is_empty())
            .collect::<Vec<_>>()
            .join("\n")
    } else {
        let joined = content
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect::<Vec<_>>()
            .join(" ");
        let collapsed = WHITESPACE_RUN.replace_all(&joined, " ");
        let tightened = AROUND_BRACKETS.replace_all(&collapsed, "$1");
        AFTER_SEPARATORS.replace_all(&tightened, "$1").into_owned()
    }
}

pub fn normalize_file(path: &Path, content: &str) -> String {
    normalize(content, is_whitespace_sensitive(path))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PatternKind {
    /// `+glob`: matches are taken even inside the ignore catalogue.
    ExplicitInclude,
    NormalInclude,
    /// `-glob`: matches are removed after every include is applied.
    Exclude,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pattern {
    pub kind: PatternKind,
    pub glob: String,
}

impl Pattern {
    pub fn classify(raw: &str) -> Self {
        let trimmed = raw.trim();
        let (kind, rest) = match trimmed.chars().next() {
            Some('-') => (PatternKind::Exclude, &trimmed[1..]),
            Some('+') => (PatternKind::ExplicitInclude, &trimmed[1..]),
            _ => (PatternKind::NormalInclude, trimmed),
        };
        Pattern {
            kind,
            glob: rest.trim().to_string(),
        }
    }

    pub fn is_include(&self) -> bool {
        !matches!(self.kind, PatternKind::Exclude)
    }
}

pub fn classify_all<S: AsRef<str>>(lines: &[S]) -> Vec<Pattern> {
    lines
        .iter()
        .map(|line| Pattern::classify(line.as_ref()))
        .collect()
}

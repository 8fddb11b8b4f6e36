use std::fmt;
use std::ops::Range;

/// A labeled attribute section within a command block:
/// a `## <Label>` heading plus its body text.
#[derive(Debug, Clone, PartialEq)]
pub struct AttributeSection {
    /// The label text, whitespace-normalized, case preserved.
    pub label: String,
    /// Cleaned body text: comment lines removed, blank-line runs collapsed,
    /// leading and trailing whitespace trimmed. Empty when the section has
    /// no body.
    pub body: String,
    /// Byte span in source for error reporting.
    pub span: Range<usize>,
}

impl AttributeSection {
    pub fn new(label: impl Into<String>, body: impl Into<String>) -> Self {
        AttributeSection {
            label: label.into(),
            body: body.into(),
            span: 0..0,
        }
    }

    /// Case-insensitive label comparison against a candidate label.
    pub fn matches_label(&self, label: &str) -> bool {
        self.label.eq_ignore_ascii_case(label.trim())
    }
}

/// A command block: one top-level heading and the attribute sections that
/// follow it, up to the next top-level heading or end of document.
#[derive(Debug, Clone, PartialEq)]
pub struct CommandBlock {
    /// Full heading text, e.g. "Create Glossary Term".
    /// `None` for a preamble block holding content that appears before the
    /// first top-level heading.
    pub heading: Option<String>,
    /// Loose prose outside any attribute section: preamble paragraphs and
    /// text between the heading and the first `##`. Never command or
    /// attribute content, but preserved so a re-rendered document keeps it.
    pub prose: Vec<String>,
    /// Attribute sections in document order.
    pub sections: Vec<AttributeSection>,
    /// Comment (`>`) lines captured from the block. Never part of command
    /// or attribute text.
    pub comments: Vec<String>,
    /// Byte span in source for error reporting.
    pub span: Range<usize>,
}

impl CommandBlock {
    /// The full command heading, if this block has one.
    pub fn command(&self) -> Option<&str> {
        self.heading.as_deref()
    }

    /// The object action: the first whitespace token of the heading,
    /// e.g. "Create" in "Create Glossary Term".
    pub fn action(&self) -> Option<&str> {
        self.heading.as_deref()?.split_whitespace().next()
    }

    /// The object type: everything after the first heading token, joined
    /// with single spaces. `None` when the heading has a single token —
    /// the action is known but the type is not.
    pub fn object_type(&self) -> Option<String> {
        let mut tokens = self.heading.as_deref()?.split_whitespace();
        tokens.next()?;
        let rest: Vec<&str> = tokens.collect();
        if rest.is_empty() {
            None
        } else {
            Some(rest.join(" "))
        }
    }

    /// Look up an attribute by label synonyms, in priority order: for each
    /// candidate label, the first section with a case-insensitive label
    /// match and a non-blank body wins.
    pub fn attribute(&self, labels: &[&str]) -> Option<&str> {
        for label in labels {
            for section in &self.sections {
                if section.matches_label(label) && !section.body.trim().is_empty() {
                    return Some(section.body.as_str());
                }
            }
        }
        None
    }

    /// Whether any section carries the given label, blank or not.
    pub fn has_section(&self, label: &str) -> bool {
        self.sections.iter().any(|s| s.matches_label(label))
    }
}

impl fmt::Display for CommandBlock {
    /// Re-render the block as markdown. Comment lines are not round-tripped;
    /// they are working notes, not command content.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(heading) = &self.heading {
            writeln!(f, "# {}", heading)?;
        }
        for (idx, paragraph) in self.prose.iter().enumerate() {
            if self.heading.is_some() || idx > 0 {
                writeln!(f)?;
            }
            writeln!(f, "{}", paragraph)?;
        }
        for section in &self.sections {
            writeln!(f)?;
            writeln!(f, "## {}", section.label)?;
            if !section.body.is_empty() {
                writeln!(f, "{}", section.body)?;
            }
        }
        Ok(())
    }
}

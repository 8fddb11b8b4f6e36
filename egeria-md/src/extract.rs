//! Text-level extraction helpers.
//!
//! These wrap the structural parser so callers holding a raw markdown
//! fragment can pull out the command heading or a single attribute without
//! building a document themselves. Comment (`>`) lines never reach the
//! returned values.

use crate::block::CommandBlock;
use crate::parser::Parser;

/// The structured split of a command heading.
#[derive(Debug, Clone, PartialEq)]
pub struct CommandParts {
    /// Full heading text, whitespace-normalized.
    pub heading: String,
    /// First heading token, e.g. "Create".
    pub action: String,
    /// Remaining tokens joined with spaces, e.g. "Glossary Category".
    /// `None` for a single-token heading: the action is present, the type
    /// is unknown.
    pub object_type: Option<String>,
}

fn first_command_block(text: &str) -> Option<CommandBlock> {
    let document = Parser::new(text.to_string(), 0).parse().ok()?;
    document.blocks.into_iter().find(|b| b.heading.is_some())
}

/// The trimmed text of the first top-level heading, ignoring comment lines.
/// `None` when the fragment contains no command heading.
pub fn extract_command(text: &str) -> Option<String> {
    first_command_block(text)?.heading
}

/// The first top-level heading split into action and object type.
pub fn extract_command_plus(text: &str) -> Option<CommandParts> {
    let block = first_command_block(text)?;
    let heading = block.heading.clone()?;
    let action = block.action()?.to_string();
    let object_type = block.object_type();
    Some(CommandParts {
        heading,
        action,
        object_type,
    })
}

/// Look up an attribute by label synonyms, in priority order, across the
/// fragment's blocks (including sections before any command heading).
/// Returns the cleaned body of the first non-blank match.
pub fn extract_attribute(text: &str, labels: &[&str]) -> Option<String> {
    let document = Parser::new(text.to_string(), 0).parse().ok()?;
    for block in &document.blocks {
        if let Some(value) = block.attribute(labels) {
            return Some(value.to_string());
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_plus_splits_action_and_type() {
        let parts = extract_command_plus("# Create Glossary Category\n").unwrap();
        assert_eq!(parts.action, "Create");
        assert_eq!(parts.object_type.as_deref(), Some("Glossary Category"));
        assert_eq!(parts.heading, "Create Glossary Category");
    }

    #[test]
    fn command_plus_single_token_heading() {
        let parts = extract_command_plus("# Create\n").unwrap();
        assert_eq!(parts.action, "Create");
        assert_eq!(parts.object_type, None);
    }

    #[test]
    fn command_ignores_comment_lines() {
        let text = "> # Not A Command\n\n# Create Term\n";
        assert_eq!(extract_command(text).as_deref(), Some("Create Term"));
    }

    #[test]
    fn no_heading_is_none() {
        assert_eq!(extract_command("just text\n"), None);
        assert_eq!(extract_command_plus("just text\n"), None);
    }

    #[test]
    fn attribute_synonym_priority() {
        let text = "# Create Term\n\n## Glossary\nSecond\n\n## Glossary Name\nFirst\n";
        let value = extract_attribute(text, &["Glossary Name", "Glossary"]);
        assert_eq!(value.as_deref(), Some("First"));
    }

    #[test]
    fn attribute_skips_blank_sections() {
        let text = "# Create Term\n\n## Term Name\n\n## Term\nWidget\n";
        let value = extract_attribute(text, &["Term Name", "Term"]);
        assert_eq!(value.as_deref(), Some("Widget"));
    }
}

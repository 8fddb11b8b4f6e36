//! Structured Create↔Update rewriting of a command block.
//!
//! When processing discovers that a Create target already exists (or that an
//! Update target has vanished), the command is rewritten with the opposite
//! action so the document can be resubmitted as-is: creates that already
//! succeeded become no-op-safe updates. The rewrite is a list edit on the
//! parsed block followed by a re-render, not a textual substitution.

use crate::block::{AttributeSection, CommandBlock};
use crate::labels;
use crate::parser::Parser;

fn is_identity_label(label: &str) -> bool {
    label.eq_ignore_ascii_case(labels::QUALIFIED_NAME_LABEL)
        || label.eq_ignore_ascii_case(labels::GUID_LABEL)
}

fn flipped_action(action: &str) -> Option<&'static str> {
    if action.eq_ignore_ascii_case("Create") {
        Some("Update")
    } else if action.eq_ignore_ascii_case("Update") {
        Some("Create")
    } else {
        None
    }
}

/// Toggle the action token of a block's heading (Create↔Update).
///
/// When the flip goes toward Update and both a qualified name and a guid are
/// supplied, `## Qualified Name` and `## GUID` sections are inserted ahead of
/// the first ordinary attribute section, unless already present. Blocks whose
/// action is neither Create nor Update come back unchanged.
pub fn flip_action(
    block: &CommandBlock,
    qualified_name: Option<&str>,
    guid: Option<&str>,
) -> CommandBlock {
    let mut rewritten = block.clone();

    let Some(action) = block.action() else {
        return rewritten;
    };
    let Some(new_action) = flipped_action(action) else {
        return rewritten;
    };

    let mut heading = new_action.to_string();
    if let Some(object_type) = block.object_type() {
        heading.push(' ');
        heading.push_str(&object_type);
    }
    rewritten.heading = Some(heading);

    // Identity sections only accompany a flip toward Update, and only when
    // both values are known.
    if new_action == "Update" {
        if let (Some(qualified_name), Some(guid)) = (qualified_name, guid) {
            let at = rewritten
                .sections
                .iter()
                .position(|s| !is_identity_label(&s.label))
                .unwrap_or(rewritten.sections.len());
            if !rewritten.has_section(labels::GUID_LABEL) {
                rewritten
                    .sections
                    .insert(at, AttributeSection::new(labels::GUID_LABEL, guid));
            }
            if !rewritten.has_section(labels::QUALIFIED_NAME_LABEL) {
                rewritten.sections.insert(
                    at,
                    AttributeSection::new(labels::QUALIFIED_NAME_LABEL, qualified_name),
                );
            }
        }
    }

    rewritten
}

/// Text-level variant of [`flip_action`]: parse the fragment's first command
/// block, flip it, and render the result. `None` when the fragment has no
/// command heading.
pub fn update_command_text(
    text: &str,
    qualified_name: Option<&str>,
    guid: Option<&str>,
) -> Option<String> {
    let document = Parser::new(text.to_string(), 0).parse().ok()?;
    let block = document.blocks.iter().find(|b| b.heading.is_some())?;
    Some(flip_action(block, qualified_name, guid).to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_block(text: &str) -> CommandBlock {
        let document = Parser::new(text.to_string(), 0).parse().expect("parse failed");
        document
            .blocks
            .into_iter()
            .find(|b| b.heading.is_some())
            .expect("no command block")
    }

    #[test]
    fn create_becomes_update_with_identity_sections() {
        let block = parse_block("# Create Term\n\n## Term Name\nWidget\n");
        let flipped = flip_action(&block, Some("Term::Widget"), Some("g-1"));
        assert_eq!(flipped.heading.as_deref(), Some("Update Term"));
        assert_eq!(flipped.sections[0].label, "Qualified Name");
        assert_eq!(flipped.sections[0].body, "Term::Widget");
        assert_eq!(flipped.sections[1].label, "GUID");
        assert_eq!(flipped.sections[1].body, "g-1");
        assert_eq!(flipped.sections[2].label, "Term Name");
    }

    #[test]
    fn update_becomes_create_without_injection() {
        let block = parse_block("# Update Term\n\n## Term Name\nWidget\n");
        let flipped = flip_action(&block, Some("Term::Widget"), Some("g-1"));
        assert_eq!(flipped.heading.as_deref(), Some("Create Term"));
        assert!(!flipped.has_section("Qualified Name"));
        assert!(!flipped.has_section("GUID"));
    }

    #[test]
    fn no_injection_when_guid_missing() {
        let block = parse_block("# Create Term\n\n## Term Name\nWidget\n");
        let flipped = flip_action(&block, Some("Term::Widget"), None);
        assert_eq!(flipped.heading.as_deref(), Some("Update Term"));
        assert!(!flipped.has_section("Qualified Name"));
    }

    #[test]
    fn existing_identity_sections_not_duplicated() {
        let text = "# Create Term\n\n## Qualified Name\nTerm::Widget\n\n## Term Name\nWidget\n";
        let block = parse_block(text);
        let flipped = flip_action(&block, Some("Term::Widget"), Some("g-1"));
        let qn_count = flipped
            .sections
            .iter()
            .filter(|s| s.matches_label("Qualified Name"))
            .count();
        assert_eq!(qn_count, 1);
        assert!(flipped.has_section("GUID"));
    }

    #[test]
    fn flip_is_its_own_inverse_at_the_action_token() {
        let original = "# Create Term\n\n## Term Name\nWidget\n";
        let once = update_command_text(original, Some("Term::Widget"), Some("g-1")).unwrap();
        let twice = update_command_text(&once, Some("Term::Widget"), Some("g-1")).unwrap();
        assert!(once.starts_with("# Update Term"));
        assert!(twice.starts_with("# Create Term"));
    }

    #[test]
    fn non_upsert_action_unchanged() {
        let block = parse_block("# List Terms\n");
        let flipped = flip_action(&block, None, None);
        assert_eq!(flipped.heading.as_deref(), Some("List Terms"));
    }
}

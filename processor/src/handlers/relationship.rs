//! Term-term relationship commands.

use std::io::{self, Write};

use egeria_md::block::CommandBlock;
use egeria_md::labels;
use tracing::error;

use crate::cache::ElementCache;
use crate::client::EgeriaClient;
use crate::directive::Directive;
use crate::handlers::{CommandOutcome, write_preview};
use crate::report::Reporter;
use crate::resolve::{self, ResolutionAction, ResolvedIdentity};

/// The relationship vocabulary, in canonical casing.
pub const TERM_RELATIONSHIP_TYPES: &[&str] = &[
    "Synonym",
    "Translation",
    "PreferredTerm",
    "TermISATYPEOFRelationship",
    "TermTYPEDBYRelationship",
    "Antonym",
    "ReplacementTerm",
    "ValidValue",
    "TermHASARelationship",
    "RelatedTerm",
    "ISARelationship",
];

/// Map a written relationship type to its canonical spelling.
fn canonical_relationship_type(written: &str) -> Option<&'static str> {
    let written = written.trim();
    TERM_RELATIONSHIP_TYPES
        .iter()
        .copied()
        .find(|t| t.eq_ignore_ascii_case(written))
}

struct RelationshipCheck {
    term1: ResolvedIdentity,
    term2: ResolvedIdentity,
    relationship_type: Option<&'static str>,
    valid: bool,
}

fn check_relationship(
    client: &dyn EgeriaClient,
    cache: &mut ElementCache,
    block: &CommandBlock,
    reporter: &mut Reporter,
) -> RelationshipCheck {
    let term1 = resolve::resolve_element_identity(
        client,
        cache,
        "Term",
        labels::TERM_1_LABELS,
        block,
        ResolutionAction::ExistsRequired,
        reporter,
    );
    let term2 = resolve::resolve_element_identity(
        client,
        cache,
        "Term",
        labels::TERM_2_LABELS,
        block,
        ResolutionAction::ExistsRequired,
        reporter,
    );

    let relationship_type = match block.attribute(labels::RELATIONSHIP_TYPE_LABELS) {
        Some(written) => {
            let canonical = canonical_relationship_type(written);
            if canonical.is_none() {
                reporter.error(format!(
                    "unknown term relationship type '{}'; valid types are: {}",
                    written,
                    TERM_RELATIONSHIP_TYPES.join(", ")
                ));
            }
            canonical
        }
        None => {
            reporter.error("no relationship type found in command block".to_string());
            None
        }
    };

    let valid = term1.valid && term2.valid && relationship_type.is_some();
    RelationshipCheck {
        term1,
        term2,
        relationship_type,
        valid,
    }
}

/// Handle `# Create Term-Term Relationship`. Creating the same edge twice is
/// idempotent: an existing relationship of the same type between the two
/// terms downgrades the command to a warning without another remote write.
pub fn process_term_relationship(
    client: &dyn EgeriaClient,
    cache: &mut ElementCache,
    block: &CommandBlock,
    directive: Directive,
    out: &mut dyn Write,
    reporter: &mut Reporter,
) -> io::Result<CommandOutcome> {
    write_preview(
        out,
        "Create Term-Term Relationship",
        &[
            ("Term 1", block.attribute(labels::TERM_1_LABELS)),
            ("Term 2", block.attribute(labels::TERM_2_LABELS)),
            (
                "Relationship Type",
                block.attribute(labels::RELATIONSHIP_TYPE_LABELS),
            ),
        ],
    )?;

    // Display stops at the echo; only validate and process resolve the
    // endpoints against the remote catalog.
    if directive == Directive::Display {
        return Ok(CommandOutcome::Displayed);
    }

    let check = check_relationship(client, cache, block, reporter);

    match directive {
        Directive::Display => Ok(CommandOutcome::Displayed),
        Directive::Validate => {
            reporter.always(format!(
                "validation of Create Term-Term Relationship: {}",
                if check.valid { "ok" } else { "failed" }
            ));
            Ok(CommandOutcome::Validated(check.valid))
        }
        Directive::Process => Ok(apply(client, block, check, reporter)),
    }
}

fn apply(
    client: &dyn EgeriaClient,
    block: &CommandBlock,
    check: RelationshipCheck,
    reporter: &mut Reporter,
) -> CommandOutcome {
    let (Some(guid1), Some(guid2), Some(relationship_type)) = (
        check.term1.guid.as_deref(),
        check.term2.guid.as_deref(),
        check.relationship_type,
    ) else {
        reporter.error(
            "validation failed for Create Term-Term Relationship; nothing processed".to_string(),
        );
        return CommandOutcome::Processed(None);
    };

    match client.get_term_relationships(guid1) {
        Ok(existing) => {
            let duplicate = existing.iter().any(|r| {
                r.end_guid == guid2 && r.relationship_type.eq_ignore_ascii_case(relationship_type)
            });
            if duplicate {
                reporter.warning(format!(
                    "a {} relationship between these terms already exists",
                    relationship_type
                ));
                return CommandOutcome::Processed(None);
            }
        }
        Err(e) => {
            // Fail closed: without the existing edges the duplicate guard
            // cannot run, and a blind create could double the edge.
            reporter.error(format!(
                "could not read existing relationships, not creating: {}",
                e
            ));
            return CommandOutcome::Processed(None);
        }
    }

    if let Err(e) = client.create_term_relationship(guid1, guid2, relationship_type) {
        error!(relationship_type, "create failed: {e}");
        reporter.error(format!(
            "create of {} relationship failed: {}",
            relationship_type, e
        ));
        return CommandOutcome::Processed(None);
    }

    reporter.info(format!("created {} relationship", relationship_type));
    CommandOutcome::Processed(Some(block.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn relationship_type_matching_is_case_insensitive() {
        assert_eq!(canonical_relationship_type("synonym"), Some("Synonym"));
        assert_eq!(
            canonical_relationship_type("  isarelationship "),
            Some("ISARelationship")
        );
        assert_eq!(canonical_relationship_type("FriendOf"), None);
    }
}

use egeria_md::parser::Parser;
use egeria_md::{extract, labels, rewrite};

fn parse(source: &str) -> egeria_md::CommandDocument {
    Parser::new(source.to_string(), 0)
        .parse()
        .expect("document failed to parse")
}

#[test]
fn any_label_synonym_yields_the_same_value() {
    let synonym_sets: &[&[&str]] = &[
        labels::GLOSSARY_NAME_LABELS,
        labels::CATEGORY_NAME_LABELS,
        labels::TERM_NAME_LABELS,
        labels::PARENT_CATEGORY_LABELS,
        labels::OUTPUT_FORMAT_LABELS,
        labels::SEARCH_LABELS,
    ];
    for set in synonym_sets {
        for synonym in *set {
            let text = format!("# Create Term\n\n## {}\nSame Value\n", synonym);
            assert_eq!(
                extract::extract_attribute(&text, set).as_deref(),
                Some("Same Value"),
                "synonym '{}' did not resolve",
                synonym
            );
        }
    }
}

#[test]
fn later_synonyms_lose_to_earlier_ones() {
    let text = "# Create Term\n\n## Term\nLoser\n\n## Term Name\nWinner\n";
    assert_eq!(
        extract::extract_attribute(text, labels::TERM_NAME_LABELS).as_deref(),
        Some("Winner")
    );
}

#[test]
fn comment_lines_are_invisible_to_extraction() {
    let text = "\
> # Create Glossary
> stray commentary

# Create Term

## Term Name
Widget

> a trailing comment

## Description
Line one
Line two

> another comment
";
    assert_eq!(
        extract::extract_command(text).as_deref(),
        Some("Create Term")
    );
    assert_eq!(
        extract::extract_attribute(text, labels::TERM_NAME_LABELS).as_deref(),
        Some("Widget")
    );
    let description = extract::extract_attribute(text, labels::DESCRIPTION_LABELS)
        .expect("description missing");
    assert_eq!(description, "Line one\nLine two");
    assert!(!description.contains("comment"));
}

#[test]
fn extraction_is_case_insensitive_on_labels() {
    let text = "# Create Term\n\n## TERM NAME\nWidget\n";
    assert_eq!(
        extract::extract_attribute(text, labels::TERM_NAME_LABELS).as_deref(),
        Some("Widget")
    );
}

#[test]
fn create_update_round_trip_preserves_attributes() {
    let original = "\
# Create Term

## Term Name
Widget

## Glossary Name
Core

## Description
A reusable widget.
";
    let updated = rewrite::update_command_text(original, Some("Term::Widget"), Some("guid-7"))
        .expect("rewrite produced nothing");

    let parts = extract::extract_command_plus(&updated).expect("rewritten heading unparseable");
    assert_eq!(parts.action, "Update");
    assert_eq!(parts.object_type.as_deref(), Some("Term"));

    // Identity sections are present and every original attribute survived.
    assert_eq!(
        extract::extract_attribute(&updated, labels::QUALIFIED_NAME_LABELS).as_deref(),
        Some("Term::Widget")
    );
    assert_eq!(
        extract::extract_attribute(&updated, labels::GUID_LABELS).as_deref(),
        Some("guid-7")
    );
    assert_eq!(
        extract::extract_attribute(&updated, labels::TERM_NAME_LABELS).as_deref(),
        Some("Widget")
    );
    assert_eq!(
        extract::extract_attribute(&updated, labels::GLOSSARY_NAME_LABELS).as_deref(),
        Some("Core")
    );
    assert_eq!(
        extract::extract_attribute(&updated, labels::DESCRIPTION_LABELS).as_deref(),
        Some("A reusable widget.")
    );

    // Flipping back strips nothing: the identity sections stay, only the
    // action token toggles.
    let reverted =
        rewrite::update_command_text(&updated, Some("Term::Widget"), Some("guid-7"))
            .expect("second rewrite produced nothing");
    assert!(reverted.starts_with("# Create Term"));
    assert_eq!(
        extract::extract_attribute(&reverted, labels::TERM_NAME_LABELS).as_deref(),
        Some("Widget")
    );
}

#[test]
fn multiple_command_blocks_parse_independently() {
    let text = "\
Preamble prose outside any command.

# Create Glossary

## Glossary Name
Core

# Create Term

## Term Name
Widget

## Glossary Name
Core
";
    let document = parse(text);
    let headings: Vec<_> = document
        .command_blocks()
        .filter_map(|b| b.command())
        .collect();
    assert_eq!(headings, vec!["Create Glossary", "Create Term"]);

    // The preamble survives as a heading-less block.
    assert!(document.blocks.iter().any(|b| b.heading.is_none()));
}

#[test]
fn prose_outside_sections_survives_a_round_trip() {
    let text = "\
Intro paragraph before any command.

# Create Term

Context sentence under the heading.

## Term Name
Widget
";
    let document = parse(text);
    let rendered: Vec<String> = document.blocks.iter().map(|b| b.to_string()).collect();
    let joined = rendered.join("\n");

    assert!(joined.contains("Intro paragraph before any command."));
    assert!(joined.contains("# Create Term"));
    assert!(joined.contains("Context sentence under the heading."));
    assert!(joined.contains("## Term Name"));
    // Prose never leaks into attribute values.
    assert_eq!(
        extract::extract_attribute(text, labels::TERM_NAME_LABELS).as_deref(),
        Some("Widget")
    );
}

#[test]
fn list_valued_attributes_keep_one_item_per_line() {
    let text = "\
# Create Term

## Term Name
Widget

## Categories

- Hardware
- Tools
";
    let value = extract::extract_attribute(text, labels::CATEGORY_NAME_LABELS)
        .expect("categories missing");
    assert_eq!(value, "Hardware\nTools");
}

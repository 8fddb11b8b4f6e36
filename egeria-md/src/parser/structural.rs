use std::ops::Range;

use pulldown_cmark::{Event, HeadingLevel, Options, Parser as CmarkParser, Tag, TagEnd};

use crate::block::{AttributeSection, CommandBlock};
use crate::parser::error::ParseError;

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Parse markdown source text into a list of command blocks.
///
/// Every level-1 heading opens a new command block; every deeper heading
/// opens an attribute section inside the current block. Blockquote lines are
/// comments and never contribute to command or attribute text. A horizontal
/// rule or a blockquote terminates the attribute body being collected.
pub fn parse_blocks(source: &str, file_id: usize) -> Result<Vec<CommandBlock>, Vec<ParseError>> {
    let parser = CmarkParser::new_ext(source, Options::empty());
    let events: Vec<(Event<'_>, Range<usize>)> = parser.into_offset_iter().collect();

    let mut state = ParseState::new(file_id);
    state.process_events(&events);
    state.finalize(source.len())
}

// ---------------------------------------------------------------------------
// Parse state
// ---------------------------------------------------------------------------

struct ParseState {
    file_id: usize,
    /// The block being built, if any.
    current: Option<BlockBuilder>,
    /// Completed blocks.
    blocks: Vec<CommandBlock>,
    errors: Vec<ParseError>,
}

struct BlockBuilder {
    heading: Option<String>,
    prose: Vec<String>,
    sections: Vec<AttributeSection>,
    comments: Vec<String>,
    /// The attribute section currently accepting body text. `None` when no
    /// section is open or the open one was terminated by a rule or comment.
    open_section: Option<SectionBuilder>,
    span_start: usize,
}

struct SectionBuilder {
    label: String,
    parts: Vec<String>,
    span_start: usize,
}

impl BlockBuilder {
    fn new(heading: Option<String>, span_start: usize) -> Self {
        BlockBuilder {
            heading,
            prose: Vec::new(),
            sections: Vec::new(),
            comments: Vec::new(),
            open_section: None,
            span_start,
        }
    }

    /// Record loose prose: text arriving outside any attribute section.
    fn push_prose(&mut self, text: String) {
        if !text.trim().is_empty() {
            self.prose.push(text.trim().to_string());
        }
    }

    /// Close the open attribute section, if any, cleaning its body.
    fn close_section(&mut self, span_end: usize) {
        if let Some(section) = self.open_section.take() {
            self.sections.push(AttributeSection {
                label: section.label,
                body: clean_body(&section.parts.join("\n")),
                span: section.span_start..span_end,
            });
        }
    }

    fn into_block(mut self, span_end: usize) -> CommandBlock {
        self.close_section(span_end);
        CommandBlock {
            heading: self.heading,
            prose: self.prose,
            sections: self.sections,
            comments: self.comments,
            span: self.span_start..span_end,
        }
    }
}

impl ParseState {
    fn new(file_id: usize) -> Self {
        ParseState {
            file_id,
            current: None,
            blocks: Vec::new(),
            errors: Vec::new(),
        }
    }

    fn process_events(&mut self, events: &[(Event<'_>, Range<usize>)]) {
        let mut i = 0;

        while i < events.len() {
            let (ref ev, ref range) = events[i];

            match ev {
                Event::Start(Tag::Heading { level, .. }) => {
                    let heading_level = heading_level_to_u8(level);
                    i += 1;
                    let name = normalize_text(&collect_heading_text(events, &mut i));

                    if heading_level == 1 {
                        self.close_block(range.start);
                        if name.is_empty() {
                            self.errors.push(ParseError::error(
                                "empty command heading",
                                range.clone(),
                                self.file_id,
                            ));
                        }
                        self.current = Some(BlockBuilder::new(Some(name), range.start));
                    } else {
                        // An attribute section. Sections appearing before any
                        // command heading land in a preamble block.
                        let builder = self
                            .current
                            .get_or_insert_with(|| BlockBuilder::new(None, range.start));
                        builder.close_section(range.start);
                        if name.is_empty() {
                            self.errors.push(ParseError::error(
                                "empty attribute label",
                                range.clone(),
                                self.file_id,
                            ));
                        }
                        builder.open_section = Some(SectionBuilder {
                            label: name,
                            parts: Vec::new(),
                            span_start: range.start,
                        });
                    }
                }

                Event::Start(Tag::Paragraph) => {
                    i += 1;
                    let text =
                        collect_text_until(events, &mut i, |e| matches!(e, TagEnd::Paragraph));
                    // Text before any heading opens a preamble block; text
                    // between a heading and its first section is loose prose.
                    let builder = self
                        .current
                        .get_or_insert_with(|| BlockBuilder::new(None, range.start));
                    if let Some(section) = &mut builder.open_section {
                        section.parts.push(text);
                    } else {
                        builder.push_prose(text);
                    }
                }

                // Blockquote = comment lines. They terminate the attribute
                // body being collected and are excluded from all values.
                Event::Start(Tag::BlockQuote(_)) => {
                    i += 1;
                    let lines = collect_blockquote_lines(events, &mut i);
                    if let Some(builder) = &mut self.current {
                        builder.close_section(range.start);
                        builder.comments.extend(lines);
                    }
                }

                // A rule (`___` or `---`) terminates the open attribute body.
                Event::Rule => {
                    if let Some(builder) = &mut self.current {
                        builder.close_section(range.start);
                    }
                    i += 1;
                }

                // List items become individual body lines, so multi-valued
                // attributes may be written either as lines or as a list.
                Event::Start(Tag::List(_)) => {
                    i += 1;
                    let items = collect_list_items(events, &mut i);
                    let builder = self
                        .current
                        .get_or_insert_with(|| BlockBuilder::new(None, range.start));
                    if let Some(section) = &mut builder.open_section {
                        section.parts.extend(items);
                    } else if !items.is_empty() {
                        let rendered: Vec<String> =
                            items.iter().map(|item| format!("- {}", item)).collect();
                        builder.push_prose(rendered.join("\n"));
                    }
                }

                Event::Start(Tag::CodeBlock(_)) => {
                    i += 1;
                    let text =
                        collect_text_until(events, &mut i, |e| matches!(e, TagEnd::CodeBlock));
                    let builder = self
                        .current
                        .get_or_insert_with(|| BlockBuilder::new(None, range.start));
                    if let Some(section) = &mut builder.open_section {
                        section.parts.push(text.trim_end().to_string());
                    } else {
                        builder.push_prose(format!("```\n{}\n```", text.trim_end()));
                    }
                }

                _ => {
                    i += 1;
                }
            }
        }
    }

    fn close_block(&mut self, span_end: usize) {
        if let Some(builder) = self.current.take() {
            self.blocks.push(builder.into_block(span_end));
        }
    }

    fn finalize(mut self, end: usize) -> Result<Vec<CommandBlock>, Vec<ParseError>> {
        self.close_block(end);
        if self.errors.is_empty() {
            Ok(self.blocks)
        } else {
            Err(self.errors)
        }
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn heading_level_to_u8(level: &HeadingLevel) -> u8 {
    match level {
        HeadingLevel::H1 => 1,
        HeadingLevel::H2 => 2,
        HeadingLevel::H3 => 3,
        HeadingLevel::H4 => 4,
        HeadingLevel::H5 => 5,
        HeadingLevel::H6 => 6,
    }
}

/// Collect heading text (all Text/Code events until End(Heading)).
fn collect_heading_text(events: &[(Event<'_>, Range<usize>)], i: &mut usize) -> String {
    let mut name = String::new();
    while *i < events.len() {
        let (ref ev, _) = events[*i];
        match ev {
            Event::End(TagEnd::Heading(_)) => {
                *i += 1;
                break;
            }
            Event::Text(s) => {
                name.push_str(s);
                *i += 1;
            }
            Event::Code(s) => {
                name.push_str(s);
                *i += 1;
            }
            _ => {
                *i += 1;
            }
        }
    }
    name
}

/// Collect text content until a matching End tag, preserving line breaks.
fn collect_text_until(
    events: &[(Event<'_>, Range<usize>)],
    i: &mut usize,
    is_end: impl Fn(&TagEnd) -> bool,
) -> String {
    let mut text = String::new();
    while *i < events.len() {
        let (ref ev, _) = events[*i];
        match ev {
            Event::End(tag_end) if is_end(tag_end) => {
                *i += 1;
                break;
            }
            Event::Text(s) => {
                text.push_str(s);
                *i += 1;
            }
            Event::Code(s) => {
                text.push_str(s);
                *i += 1;
            }
            Event::SoftBreak | Event::HardBreak => {
                text.push('\n');
                *i += 1;
            }
            _ => {
                *i += 1;
            }
        }
    }
    text
}

/// Collect a blockquote's content as comment lines, one per paragraph line.
fn collect_blockquote_lines(events: &[(Event<'_>, Range<usize>)], i: &mut usize) -> Vec<String> {
    let mut lines = Vec::new();
    while *i < events.len() {
        let (ref ev, _) = events[*i];
        match ev {
            Event::End(TagEnd::BlockQuote(_)) => {
                *i += 1;
                break;
            }
            Event::Start(Tag::Paragraph) => {
                *i += 1;
                let text = collect_text_until(events, i, |e| matches!(e, TagEnd::Paragraph));
                lines.extend(text.lines().map(|l| l.trim().to_string()));
            }
            _ => {
                *i += 1;
            }
        }
    }
    lines
}

/// Collect the text of each list item. Nested items flatten into their own
/// lines; nesting depth carries no meaning in attribute bodies.
fn collect_list_items(events: &[(Event<'_>, Range<usize>)], i: &mut usize) -> Vec<String> {
    let mut items = Vec::new();
    let mut depth = 1u32;

    while *i < events.len() {
        let (ref ev, _) = events[*i];
        match ev {
            Event::Start(Tag::List(_)) => {
                depth += 1;
                *i += 1;
            }
            Event::End(TagEnd::List(_)) => {
                depth -= 1;
                *i += 1;
                if depth == 0 {
                    break;
                }
            }
            Event::Start(Tag::Item) => {
                *i += 1;
            }
            Event::End(TagEnd::Item) => {
                *i += 1;
            }
            Event::Start(Tag::Paragraph) => {
                *i += 1;
                let text = collect_text_until(events, i, |e| matches!(e, TagEnd::Paragraph));
                if !text.trim().is_empty() {
                    items.push(text.trim().to_string());
                }
            }
            Event::Text(s) => {
                if !s.trim().is_empty() {
                    items.push(s.trim().to_string());
                }
                *i += 1;
            }
            _ => {
                *i += 1;
            }
        }
    }

    items
}

/// Normalize heading text: strip surrounding whitespace, collapse interior
/// whitespace runs to single spaces.
fn normalize_text(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Clean an attribute body: drop comment lines, collapse blank-line runs to
/// one, trim the ends.
fn clean_body(raw: &str) -> String {
    let mut lines: Vec<&str> = Vec::new();
    let mut prev_blank = false;
    for line in raw.lines() {
        if line.trim_start().starts_with('>') {
            continue;
        }
        let blank = line.trim().is_empty();
        if blank && prev_blank {
            continue;
        }
        prev_blank = blank;
        lines.push(line);
    }
    lines.join("\n").trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(source: &str) -> Vec<CommandBlock> {
        parse_blocks(source, 0).expect("parse failed")
    }

    #[test]
    fn heading_splits_blocks() {
        let blocks = parse("# Create Term\n\n## Term Name\nWidget\n\n# Update Glossary\n");
        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[0].heading.as_deref(), Some("Create Term"));
        assert_eq!(blocks[1].heading.as_deref(), Some("Update Glossary"));
    }

    #[test]
    fn section_body_collected() {
        let blocks = parse("# Create Term\n\n## Term Name\nWidget\n");
        assert_eq!(blocks[0].attribute(&["Term Name"]), Some("Widget"));
    }

    #[test]
    fn preamble_sections_have_no_heading() {
        let blocks = parse("## Term Name\nWidget\n");
        assert_eq!(blocks.len(), 1);
        assert!(blocks[0].heading.is_none());
        assert_eq!(blocks[0].attribute(&["Term Name"]), Some("Widget"));
    }

    #[test]
    fn comments_excluded_from_values() {
        let blocks = parse("# Create Term\n\n## Term Name\nWidget\n\n> a note\n");
        assert_eq!(blocks[0].attribute(&["Term Name"]), Some("Widget"));
        assert_eq!(blocks[0].comments, vec!["a note".to_string()]);
    }

    #[test]
    fn rule_terminates_section_body() {
        let blocks = parse("# Create Term\n\n## Term Name\nWidget\n\n___\n\nstray text\n");
        assert_eq!(blocks[0].attribute(&["Term Name"]), Some("Widget"));
    }

    #[test]
    fn blank_runs_collapse() {
        let blocks = parse("# Create Term\n\n## Description\nline one\n\n\n\nline two\n");
        let body = blocks[0].attribute(&["Description"]).unwrap();
        assert_eq!(body, "line one\nline two");
    }

    #[test]
    fn preamble_prose_opens_a_headingless_block() {
        let blocks = parse("Some intro text.\n\n# Create Term\n\n## Term Name\nWidget\n");
        assert_eq!(blocks.len(), 2);
        assert!(blocks[0].heading.is_none());
        assert_eq!(blocks[0].prose, vec!["Some intro text.".to_string()]);
        assert_eq!(blocks[1].heading.as_deref(), Some("Create Term"));
    }

    #[test]
    fn prose_between_heading_and_first_section_is_kept() {
        let blocks = parse("# Create Term\n\nLead-in note.\n\n## Term Name\nWidget\n");
        assert_eq!(blocks[0].prose, vec!["Lead-in note.".to_string()]);
        assert_eq!(blocks[0].attribute(&["Term Name"]), Some("Widget"));

        let rendered = blocks[0].to_string();
        assert!(rendered.contains("Lead-in note."));
        assert!(rendered.contains("## Term Name"));
    }

    #[test]
    fn list_items_become_lines() {
        let blocks = parse("# Create Term\n\n## Categories\n- First\n- Second\n");
        let body = blocks[0].attribute(&["Categories"]).unwrap();
        assert_eq!(body, "First\nSecond");
    }
}

//! Directive-driven command handlers.
//!
//! Every handler is a function of (client, cache, block, directive): under
//! `display` it echoes what it extracted, under `validate` it checks the
//! command against the remote catalog and returns a verdict, under `process`
//! it performs the mutation or query. The human-readable preview is written
//! to the output sink before anything else happens, so failures are visible
//! in context.

mod category;
mod glossary;
mod list;
mod relationship;
mod term;

pub use category::process_category_upsert;
pub use glossary::process_glossary_upsert;
pub use list::{
    process_category_list, process_glossary_list, process_glossary_structure, process_term_list,
};
pub use relationship::{TERM_RELATIONSHIP_TYPES, process_term_relationship};
pub use term::process_term_upsert;

use std::io::{self, Write};

use egeria_md::CommandDocument;
use egeria_md::block::CommandBlock;

use crate::cache::ElementCache;
use crate::client::{ClientError, EgeriaClient, ElementSummary};
use crate::directive::Directive;
use crate::formats::OutputFormat;
use crate::report::Reporter;
use crate::resolve::ResolutionAction;

/// What a handler produced for one command block.
#[derive(Debug, Clone, PartialEq)]
pub enum CommandOutcome {
    /// Display directive: attributes echoed, nothing executed.
    Displayed,
    /// Validate directive: the verdict.
    Validated(bool),
    /// Process directive: the rewritten or freshly rendered markdown, or
    /// `None` when processing failed without mutating anything.
    Processed(Option<String>),
    /// The heading matched no known command; the block passes through.
    Unrecognized,
}

/// The upsert half of a command heading.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum UpsertAction {
    Create,
    Update,
}

impl UpsertAction {
    pub(crate) fn of(block: &CommandBlock) -> Option<Self> {
        let action = block.action()?;
        if action.eq_ignore_ascii_case("Create") {
            Some(UpsertAction::Create)
        } else if action.eq_ignore_ascii_case("Update") {
            Some(UpsertAction::Update)
        } else {
            None
        }
    }

    pub(crate) fn resolution(self) -> ResolutionAction {
        match self {
            UpsertAction::Create => ResolutionAction::Create,
            UpsertAction::Update => ResolutionAction::Update,
        }
    }

    pub(crate) fn as_str(self) -> &'static str {
        match self {
            UpsertAction::Create => "Create",
            UpsertAction::Update => "Update",
        }
    }
}

/// Write the attribute preview every directive starts with.
pub(crate) fn write_preview(
    out: &mut dyn Write,
    title: &str,
    rows: &[(&str, Option<&str>)],
) -> io::Result<()> {
    writeln!(out, "{}", title)?;
    for (label, value) in rows {
        writeln!(out, "  {}: {}", label, value.unwrap_or("---"))?;
    }
    writeln!(out)
}

/// Turn the post-mutation rendering fetch into an outcome. The mutation
/// already happened, so a fetch failure degrades to echoing the command
/// block rather than reporting a failed process.
pub(crate) fn render_result(
    fetched: Result<String, ClientError>,
    block: &CommandBlock,
    reporter: &mut Reporter,
) -> CommandOutcome {
    match fetched {
        Ok(rendered) => CommandOutcome::Processed(Some(rendered)),
        Err(e) => {
            reporter.warning(format!(
                "change applied but fetching the rendered element failed: {}",
                e
            ));
            CommandOutcome::Processed(Some(block.to_string()))
        }
    }
}

/// Render a list of element summaries in the requested output format.
pub(crate) fn render_elements(format: OutputFormat, elements: &[ElementSummary]) -> String {
    if elements.is_empty() {
        return "no elements found".to_string();
    }
    match format {
        OutputFormat::List => elements
            .iter()
            .map(|e| e.display_name.as_str())
            .collect::<Vec<_>>()
            .join("\n"),
        OutputFormat::Dict => {
            serde_json::to_string_pretty(elements).unwrap_or_else(|_| "[]".to_string())
        }
        OutputFormat::Md | OutputFormat::Form | OutputFormat::Report => {
            let mut table = String::from("| Display Name | Qualified Name | GUID |\n|---|---|---|\n");
            for e in elements {
                table.push_str(&format!(
                    "| {} | {} | {} |\n",
                    e.display_name,
                    e.qualified_name.as_deref().unwrap_or("---"),
                    e.guid.as_deref().unwrap_or("---"),
                ));
            }
            table
        }
    }
}

/// Dispatch one command block to its handler by (action, object type).
pub fn process_command_block(
    client: &dyn EgeriaClient,
    cache: &mut ElementCache,
    block: &CommandBlock,
    directive: Directive,
    out: &mut dyn Write,
    reporter: &mut Reporter,
) -> io::Result<CommandOutcome> {
    let Some(heading) = block.command() else {
        return Ok(CommandOutcome::Unrecognized);
    };
    let action = block
        .action()
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();
    let object_type = block
        .object_type()
        .map(|t| t.to_ascii_lowercase())
        .unwrap_or_default();

    match (action.as_str(), object_type.as_str()) {
        ("create" | "update", "glossary") => {
            process_glossary_upsert(client, cache, block, directive, out, reporter)
        }
        ("create" | "update", "category" | "glossary category") => {
            process_category_upsert(client, cache, block, directive, out, reporter)
        }
        ("create" | "update", "term" | "glossary term") => {
            process_term_upsert(client, cache, block, directive, out, reporter)
        }
        ("create", "term-term relationship") => {
            process_term_relationship(client, cache, block, directive, out, reporter)
        }
        ("list", "glossaries") => {
            process_glossary_list(client, cache, block, directive, out, reporter)
        }
        ("list", "categories" | "glossary categories") => {
            process_category_list(client, cache, block, directive, out, reporter)
        }
        ("list", "terms" | "glossary terms") => {
            process_term_list(client, cache, block, directive, out, reporter)
        }
        ("list", "glossary structure") => {
            process_glossary_structure(client, cache, block, directive, out, reporter)
        }
        _ => {
            reporter.warning(format!("unrecognized command '{}'", heading));
            Ok(CommandOutcome::Unrecognized)
        }
    }
}

/// Process every command block in a document under one directive.
///
/// All blocks share one cache, so later commands can reference elements
/// created earlier in the same run. The returned text is the rewritten
/// document: processed blocks are replaced by their handler's output,
/// everything else (preamble, unrecognized, failed, non-process directives)
/// passes through re-rendered but unchanged.
pub fn process_document(
    client: &dyn EgeriaClient,
    document: &CommandDocument,
    directive: Directive,
    out: &mut dyn Write,
    reporter: &mut Reporter,
) -> io::Result<String> {
    let mut cache = ElementCache::new();
    let mut fragments = Vec::new();

    for block in &document.blocks {
        if block.heading.is_none() {
            fragments.push(block.to_string());
            continue;
        }
        let outcome = process_command_block(client, &mut cache, block, directive, out, reporter)?;
        match outcome {
            CommandOutcome::Processed(Some(text)) => fragments.push(text),
            _ => fragments.push(block.to_string()),
        }
    }

    Ok(fragments.join("\n"))
}

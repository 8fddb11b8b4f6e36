//! Read-only list and structure commands.

use std::io::{self, Write};

use egeria_md::block::CommandBlock;
use egeria_md::labels;

use crate::cache::ElementCache;
use crate::client::{ClientError, EgeriaClient, ElementSummary};
use crate::directive::Directive;
use crate::formats::OutputFormat;
use crate::handlers::{CommandOutcome, render_elements, write_preview};
use crate::report::Reporter;
use crate::resolve::{self, ResolutionAction, ResolvedIdentity};

/// Resolve a scoping element, but only when the block actually names one.
fn resolve_scope(
    client: &dyn EgeriaClient,
    cache: &mut ElementCache,
    element_type: &str,
    name_labels: &[&str],
    block: &CommandBlock,
    reporter: &mut Reporter,
) -> Option<ResolvedIdentity> {
    block.attribute(name_labels).is_some().then(|| {
        resolve::resolve_element_identity(
            client,
            cache,
            element_type,
            name_labels,
            block,
            ResolutionAction::ExistsRequired,
            reporter,
        )
    })
}

fn echo(
    out: &mut dyn Write,
    title: &str,
    format: OutputFormat,
    block: &CommandBlock,
) -> io::Result<()> {
    write_preview(
        out,
        title,
        &[
            ("Output Format", Some(format.as_str())),
            ("Search String", block.attribute(labels::SEARCH_LABELS)),
            ("Glossary", block.attribute(labels::GLOSSARY_NAME_LABELS)),
            ("Category", block.attribute(labels::CATEGORY_NAME_LABELS)),
        ],
    )
}

fn finish(
    title: &str,
    valid: bool,
    format: OutputFormat,
    directive: Directive,
    reporter: &mut Reporter,
    fetch: impl FnOnce() -> Result<Vec<ElementSummary>, ClientError>,
) -> CommandOutcome {
    match directive {
        Directive::Display => CommandOutcome::Displayed,
        Directive::Validate => {
            reporter.always(format!(
                "validation of {}: {}",
                title,
                if valid { "ok" } else { "failed" }
            ));
            CommandOutcome::Validated(valid)
        }
        Directive::Process => {
            if !valid {
                reporter.error(format!("validation failed for {}; nothing processed", title));
                return CommandOutcome::Processed(None);
            }
            match fetch() {
                Ok(elements) => {
                    CommandOutcome::Processed(Some(render_elements(format, &elements)))
                }
                Err(e) => {
                    reporter.error(format!("{} failed: {}", title, e));
                    CommandOutcome::Processed(None)
                }
            }
        }
    }
}

/// Handle `# List Glossaries`.
pub fn process_glossary_list(
    client: &dyn EgeriaClient,
    _cache: &mut ElementCache,
    block: &CommandBlock,
    directive: Directive,
    out: &mut dyn Write,
    reporter: &mut Reporter,
) -> io::Result<CommandOutcome> {
    let format =
        OutputFormat::from_attribute(block.attribute(labels::OUTPUT_FORMAT_LABELS), reporter);
    echo(out, "List Glossaries", format, block)?;
    if directive == Directive::Display {
        return Ok(CommandOutcome::Displayed);
    }

    let search = block.attribute(labels::SEARCH_LABELS).map(str::to_string);
    Ok(finish(
        "List Glossaries",
        true,
        format,
        directive,
        reporter,
        || client.list_glossaries(search.as_deref()),
    ))
}

/// Handle `# List Categories`, optionally scoped to one glossary.
pub fn process_category_list(
    client: &dyn EgeriaClient,
    cache: &mut ElementCache,
    block: &CommandBlock,
    directive: Directive,
    out: &mut dyn Write,
    reporter: &mut Reporter,
) -> io::Result<CommandOutcome> {
    let format =
        OutputFormat::from_attribute(block.attribute(labels::OUTPUT_FORMAT_LABELS), reporter);
    echo(out, "List Categories", format, block)?;
    if directive == Directive::Display {
        return Ok(CommandOutcome::Displayed);
    }

    let glossary = resolve_scope(
        client,
        cache,
        "Glossary",
        labels::GLOSSARY_NAME_LABELS,
        block,
        reporter,
    );
    let valid = glossary.as_ref().is_none_or(|g| g.valid);
    let glossary_guid = glossary.and_then(|g| g.guid);
    let search = block.attribute(labels::SEARCH_LABELS).map(str::to_string);

    Ok(finish(
        "List Categories",
        valid,
        format,
        directive,
        reporter,
        || match glossary_guid {
            Some(guid) => client.list_categories_for_glossary(&guid),
            None => client.list_categories(search.as_deref()),
        },
    ))
}

/// Handle `# List Terms`. The narrowest named scope wins: a category scope
/// beats a glossary scope, and with neither the whole catalog is searched.
pub fn process_term_list(
    client: &dyn EgeriaClient,
    cache: &mut ElementCache,
    block: &CommandBlock,
    directive: Directive,
    out: &mut dyn Write,
    reporter: &mut Reporter,
) -> io::Result<CommandOutcome> {
    let format =
        OutputFormat::from_attribute(block.attribute(labels::OUTPUT_FORMAT_LABELS), reporter);
    echo(out, "List Terms", format, block)?;
    if directive == Directive::Display {
        return Ok(CommandOutcome::Displayed);
    }

    let glossary = resolve_scope(
        client,
        cache,
        "Glossary",
        labels::GLOSSARY_NAME_LABELS,
        block,
        reporter,
    );
    let category = resolve_scope(
        client,
        cache,
        "Category",
        labels::CATEGORY_NAME_LABELS,
        block,
        reporter,
    );
    let valid = glossary.as_ref().is_none_or(|g| g.valid)
        && category.as_ref().is_none_or(|c| c.valid);
    let glossary_guid = glossary.and_then(|g| g.guid);
    let category_guid = category.and_then(|c| c.guid);
    let search = block.attribute(labels::SEARCH_LABELS).map(str::to_string);

    Ok(finish("List Terms", valid, format, directive, reporter, || {
        if let Some(guid) = category_guid {
            client.list_terms_for_category(&guid)
        } else if let Some(guid) = glossary_guid {
            client.list_terms_for_glossary(&guid)
        } else {
            client.list_terms(search.as_deref())
        }
    }))
}

/// Handle `# List Glossary Structure`: the named glossary rendered as its
/// category tree with terms, in the requested output format.
pub fn process_glossary_structure(
    client: &dyn EgeriaClient,
    cache: &mut ElementCache,
    block: &CommandBlock,
    directive: Directive,
    out: &mut dyn Write,
    reporter: &mut Reporter,
) -> io::Result<CommandOutcome> {
    let format =
        OutputFormat::from_attribute(block.attribute(labels::OUTPUT_FORMAT_LABELS), reporter);
    echo(out, "List Glossary Structure", format, block)?;
    if directive == Directive::Display {
        return Ok(CommandOutcome::Displayed);
    }

    let glossary = resolve::resolve_element_identity(
        client,
        cache,
        "Glossary",
        labels::GLOSSARY_NAME_LABELS,
        block,
        ResolutionAction::ExistsRequired,
        reporter,
    );

    match directive {
        Directive::Display => Ok(CommandOutcome::Displayed),
        Directive::Validate => {
            reporter.always(format!(
                "validation of List Glossary Structure: {}",
                if glossary.valid { "ok" } else { "failed" }
            ));
            Ok(CommandOutcome::Validated(glossary.valid))
        }
        Directive::Process => {
            let Some(guid) = glossary.guid.as_deref() else {
                reporter.error(
                    "validation failed for List Glossary Structure; nothing processed".to_string(),
                );
                return Ok(CommandOutcome::Processed(None));
            };
            match client.get_glossary_structure(guid, format) {
                Ok(rendered) => Ok(CommandOutcome::Processed(Some(rendered))),
                Err(e) => {
                    reporter.error(format!("List Glossary Structure failed: {}", e));
                    Ok(CommandOutcome::Processed(None))
                }
            }
        }
    }
}

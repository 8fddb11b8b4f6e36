use std::collections::HashSet;
use std::io::{self, Write};

use egeria_md::block::CommandBlock;
use egeria_md::{labels, rewrite};
use tracing::error;

use crate::cache::{CachedElement, ElementCache};
use crate::client::{EgeriaClient, TermProperties};
use crate::directive::Directive;
use crate::formats::OutputFormat;
use crate::handlers::{CommandOutcome, UpsertAction, render_result, write_preview};
use crate::report::{NoteLevel, Reporter};
use crate::resolve::{
    self, ElementFamily, NameListResolution, ResolutionAction, ResolvedIdentity,
    qualified_name_for, split_name_list,
};

struct TermCheck {
    name: Option<String>,
    properties: TermProperties,
    resolved: ResolvedIdentity,
    glossary: ResolvedIdentity,
    categories: NameListResolution,
    aliases: Vec<String>,
    valid: bool,
}

fn check_term(
    client: &dyn EgeriaClient,
    cache: &mut ElementCache,
    block: &CommandBlock,
    action: UpsertAction,
    reporter: &mut Reporter,
) -> TermCheck {
    let name_labels: Vec<&str> = [labels::TERM_NAME_LABELS, &["Display Name"]].concat();
    let name = block.attribute(&name_labels).map(str::to_string);
    let summary =
        resolve::process_simple_attribute(block, labels::SUMMARY_LABELS, NoteLevel::Info, reporter);
    let description = resolve::process_simple_attribute(
        block,
        labels::DESCRIPTION_LABELS,
        NoteLevel::Info,
        reporter,
    );
    let abbreviation = resolve::process_simple_attribute(
        block,
        labels::ABBREVIATION_LABELS,
        NoteLevel::Info,
        reporter,
    );
    let examples =
        resolve::process_simple_attribute(block, labels::EXAMPLES_LABELS, NoteLevel::Info, reporter);
    let usage =
        resolve::process_simple_attribute(block, labels::USAGE_LABELS, NoteLevel::Info, reporter);
    let version_identifier =
        resolve::process_simple_attribute(block, labels::VERSION_LABELS, NoteLevel::Info, reporter);
    let status =
        resolve::process_simple_attribute(block, labels::STATUS_LABELS, NoteLevel::Info, reporter);

    let resolved = resolve::resolve_element_identity(
        client,
        cache,
        "Term",
        &name_labels,
        block,
        action.resolution(),
        reporter,
    );

    let glossary = resolve::resolve_element_identity(
        client,
        cache,
        "Glossary",
        labels::GLOSSARY_NAME_LABELS,
        block,
        ResolutionAction::ExistsRequired,
        reporter,
    );

    // Every named category must already exist before a term can join it.
    let categories = resolve::process_name_list(
        client,
        cache,
        "Category",
        block,
        labels::CATEGORY_NAME_LABELS,
        reporter,
    );

    let aliases = block
        .attribute(labels::ALIAS_LABELS)
        .map(split_name_list)
        .unwrap_or_default();

    let valid = name.is_some() && resolved.valid && glossary.valid && categories.all_valid;

    TermCheck {
        properties: TermProperties {
            display_name: name.clone().unwrap_or_default(),
            summary,
            description,
            abbreviation,
            examples,
            usage,
            version_identifier,
            status,
        },
        name,
        resolved,
        glossary,
        categories,
        aliases,
        valid,
    }
}

/// Handle `# Create Term` / `# Update Term` (and the "Glossary Term"
/// heading spellings).
pub fn process_term_upsert(
    client: &dyn EgeriaClient,
    cache: &mut ElementCache,
    block: &CommandBlock,
    directive: Directive,
    out: &mut dyn Write,
    reporter: &mut Reporter,
) -> io::Result<CommandOutcome> {
    let Some(action) = UpsertAction::of(block) else {
        reporter.warning("term command without a Create or Update action");
        return Ok(CommandOutcome::Unrecognized);
    };

    let name_labels: Vec<&str> = [labels::TERM_NAME_LABELS, &["Display Name"]].concat();
    write_preview(
        out,
        &format!("{} Term", action.as_str()),
        &[
            ("Term Name", block.attribute(&name_labels)),
            ("Summary", block.attribute(labels::SUMMARY_LABELS)),
            ("Description", block.attribute(labels::DESCRIPTION_LABELS)),
            ("Status", block.attribute(labels::STATUS_LABELS)),
            ("Version", block.attribute(labels::VERSION_LABELS)),
            ("Glossary", block.attribute(labels::GLOSSARY_NAME_LABELS)),
            ("Categories", block.attribute(labels::CATEGORY_NAME_LABELS)),
            ("Aliases", block.attribute(labels::ALIAS_LABELS)),
        ],
    )?;

    // Display stops at the echo; only validate and process resolve names
    // against the remote catalog.
    if directive == Directive::Display {
        return Ok(CommandOutcome::Displayed);
    }

    let check = check_term(client, cache, block, action, reporter);

    match directive {
        Directive::Display => Ok(CommandOutcome::Displayed),
        Directive::Validate => {
            reporter.always(format!(
                "validation of {} Term: {}",
                action.as_str(),
                if check.valid { "ok" } else { "failed" }
            ));
            Ok(CommandOutcome::Validated(check.valid))
        }
        Directive::Process => Ok(apply(client, cache, block, action, check, reporter)),
    }
}

fn apply(
    client: &dyn EgeriaClient,
    cache: &mut ElementCache,
    block: &CommandBlock,
    action: UpsertAction,
    check: TermCheck,
    reporter: &mut Reporter,
) -> CommandOutcome {
    let name = check.name.clone().unwrap_or_default();

    if !check.valid {
        if action == UpsertAction::Create && check.resolved.exists {
            reporter.warning(format!(
                "term '{}' already exists; command rewritten as Update",
                name
            ));
            let corrected = rewrite::flip_action(
                block,
                check.resolved.qualified_name.as_deref(),
                check.resolved.guid.as_deref(),
            );
            return CommandOutcome::Processed(Some(corrected.to_string()));
        }
        reporter.error(format!(
            "validation failed for {} Term; nothing processed",
            action.as_str()
        ));
        return CommandOutcome::Processed(None);
    }

    match action {
        UpsertAction::Update => {
            let (Some(guid), Some(qualified_name)) =
                (check.resolved.guid.clone(), check.resolved.qualified_name.clone())
            else {
                reporter.error(format!(
                    "term '{}' is no longer resolvable; command rewritten as Create",
                    name
                ));
                let corrected = rewrite::flip_action(block, None, None);
                return CommandOutcome::Processed(Some(corrected.to_string()));
            };

            if let Err(e) = client.update_term(&guid, &check.properties) {
                error!(term = %name, "update failed: {e}");
                reporter.error(format!("update of term '{}' failed: {}", name, e));
                return CommandOutcome::Processed(None);
            }
            cache.update(&qualified_name, CachedElement::full(guid.clone(), name.clone()));
            reporter.info(format!("updated term '{}'", name));

            reconcile_categories(client, &guid, &check.categories, reporter);
            reconcile_aliases(client, &guid, &check.aliases, reporter);

            render_result(
                client.get_term_by_guid(&guid, OutputFormat::Md),
                block,
                reporter,
            )
        }
        UpsertAction::Create => {
            if check.resolved.exists {
                reporter.warning(format!(
                    "term '{}' already exists; command rewritten as Update",
                    name
                ));
                let corrected = rewrite::flip_action(
                    block,
                    check.resolved.qualified_name.as_deref(),
                    check.resolved.guid.as_deref(),
                );
                return CommandOutcome::Processed(Some(corrected.to_string()));
            }

            let Some(glossary_guid) = check.glossary.guid.as_deref() else {
                reporter.error(format!(
                    "owning glossary for term '{}' has no guid; nothing processed",
                    name
                ));
                return CommandOutcome::Processed(None);
            };

            match client.create_term(glossary_guid, &check.properties) {
                Err(e) => {
                    error!(term = %name, "create failed: {e}");
                    reporter.error(format!("create of term '{}' failed: {}", name, e));
                    CommandOutcome::Processed(None)
                }
                Ok(None) => {
                    reporter.error(format!("server reported failure creating term '{}'", name));
                    CommandOutcome::Processed(None)
                }
                Ok(Some(guid)) => {
                    let qualified_name = qualified_name_for(
                        ElementFamily::Term,
                        &name,
                        check.properties.version_identifier.as_deref(),
                    );
                    cache.update(&qualified_name, CachedElement::full(guid.clone(), name.clone()));
                    reporter.info(format!("created term '{}' ({})", name, guid));

                    for category_guid in &check.categories.guids {
                        if let Err(e) = client.add_term_to_category(category_guid, &guid) {
                            reporter.warning(format!(
                                "could not add term '{}' to a category: {}",
                                name, e
                            ));
                        }
                    }
                    for alias in &check.aliases {
                        if let Err(e) = client.add_term_alias(&guid, alias) {
                            reporter
                                .warning(format!("could not add alias '{}': {}", alias, e));
                        }
                    }

                    render_result(
                        client.get_term_by_guid(&guid, OutputFormat::Md),
                        block,
                        reporter,
                    )
                }
            }
        }
    }
}

/// Reconcile a term's category memberships with the requested list: one
/// add/remove call per differing membership, computed as a set difference on
/// qualified names. A block naming no categories leaves memberships alone.
fn reconcile_categories(
    client: &dyn EgeriaClient,
    term_guid: &str,
    requested: &NameListResolution,
    reporter: &mut Reporter,
) {
    if requested.names.is_empty() {
        return;
    }

    let current = match client.get_categories_for_term(term_guid) {
        Ok(current) => current,
        Err(e) => {
            reporter.warning(format!("could not read current categories: {}", e));
            return;
        }
    };

    let requested_set: HashSet<&str> =
        requested.qualified_names.iter().map(String::as_str).collect();
    let current_set: HashSet<&str> = current
        .iter()
        .filter_map(|c| c.qualified_name.as_deref())
        .collect();

    for category in &current {
        let Some(qualified_name) = category.qualified_name.as_deref() else {
            continue;
        };
        if !requested_set.contains(qualified_name) {
            if let Some(category_guid) = category.guid.as_deref() {
                if let Err(e) = client.remove_term_from_category(category_guid, term_guid) {
                    reporter.warning(format!(
                        "could not remove term from category '{}': {}",
                        qualified_name, e
                    ));
                }
            }
        }
    }

    for (qualified_name, category_guid) in
        requested.qualified_names.iter().zip(&requested.guids)
    {
        if !current_set.contains(qualified_name.as_str()) {
            if let Err(e) = client.add_term_to_category(category_guid, term_guid) {
                reporter.warning(format!(
                    "could not add term to category '{}': {}",
                    qualified_name, e
                ));
            }
        }
    }
}

/// Reconcile a term's alias list with the requested one, case-sensitively.
/// A block naming no aliases leaves the current list alone.
fn reconcile_aliases(
    client: &dyn EgeriaClient,
    term_guid: &str,
    requested: &[String],
    reporter: &mut Reporter,
) {
    if requested.is_empty() {
        return;
    }

    let current = match client.get_term_aliases(term_guid) {
        Ok(current) => current,
        Err(e) => {
            reporter.warning(format!("could not read current aliases: {}", e));
            return;
        }
    };

    let requested_set: HashSet<&str> = requested.iter().map(String::as_str).collect();
    let current_set: HashSet<&str> = current.iter().map(String::as_str).collect();

    for alias in &current {
        if !requested_set.contains(alias.as_str()) {
            if let Err(e) = client.remove_term_alias(term_guid, alias) {
                reporter.warning(format!("could not remove alias '{}': {}", alias, e));
            }
        }
    }
    for alias in requested {
        if !current_set.contains(alias.as_str()) {
            if let Err(e) = client.add_term_alias(term_guid, alias) {
                reporter.warning(format!("could not add alias '{}': {}", alias, e));
            }
        }
    }
}

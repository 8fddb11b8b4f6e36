use std::io::{self, Write};

use egeria_md::block::CommandBlock;
use egeria_md::{labels, rewrite};
use tracing::error;

use crate::cache::{CachedElement, ElementCache};
use crate::client::{CategoryProperties, EgeriaClient};
use crate::directive::Directive;
use crate::formats::OutputFormat;
use crate::handlers::{CommandOutcome, UpsertAction, render_result, write_preview};
use crate::report::{NoteLevel, Reporter};
use crate::resolve::{
    self, ElementFamily, ResolutionAction, ResolvedIdentity, qualified_name_for,
};

struct CategoryCheck {
    name: Option<String>,
    version: Option<String>,
    properties: CategoryProperties,
    resolved: ResolvedIdentity,
    glossary: ResolvedIdentity,
    /// `None` when the block names no parent category.
    parent: Option<ResolvedIdentity>,
    valid: bool,
}

fn check_category(
    client: &dyn EgeriaClient,
    cache: &mut ElementCache,
    block: &CommandBlock,
    action: UpsertAction,
    reporter: &mut Reporter,
) -> CategoryCheck {
    let name_labels: Vec<&str> = [labels::CATEGORY_NAME_LABELS, &["Display Name"]].concat();
    let name = block.attribute(&name_labels).map(str::to_string);
    let description = resolve::process_simple_attribute(
        block,
        labels::DESCRIPTION_LABELS,
        NoteLevel::Info,
        reporter,
    );
    let version =
        resolve::process_simple_attribute(block, labels::VERSION_LABELS, NoteLevel::Info, reporter);

    let resolved = resolve::resolve_element_identity(
        client,
        cache,
        "Category",
        &name_labels,
        block,
        action.resolution(),
        reporter,
    );

    // The owning glossary must already exist for both create and update.
    let glossary = resolve::resolve_element_identity(
        client,
        cache,
        "Glossary",
        labels::GLOSSARY_NAME_LABELS,
        block,
        ResolutionAction::ExistsRequired,
        reporter,
    );

    let parent = block
        .attribute(labels::PARENT_CATEGORY_LABELS)
        .is_some()
        .then(|| {
            resolve::resolve_element_identity(
                client,
                cache,
                "Category",
                labels::PARENT_CATEGORY_LABELS,
                block,
                ResolutionAction::ExistsRequired,
                reporter,
            )
        });

    let valid = name.is_some()
        && resolved.valid
        && glossary.valid
        && parent.as_ref().is_none_or(|p| p.valid);

    CategoryCheck {
        properties: CategoryProperties {
            display_name: name.clone().unwrap_or_default(),
            description,
        },
        name,
        version,
        resolved,
        glossary,
        parent,
        valid,
    }
}

/// Handle `# Create Category` / `# Update Category` (and the
/// "Glossary Category" heading spellings).
pub fn process_category_upsert(
    client: &dyn EgeriaClient,
    cache: &mut ElementCache,
    block: &CommandBlock,
    directive: Directive,
    out: &mut dyn Write,
    reporter: &mut Reporter,
) -> io::Result<CommandOutcome> {
    let Some(action) = UpsertAction::of(block) else {
        reporter.warning("category command without a Create or Update action");
        return Ok(CommandOutcome::Unrecognized);
    };

    let name_labels: Vec<&str> = [labels::CATEGORY_NAME_LABELS, &["Display Name"]].concat();
    write_preview(
        out,
        &format!("{} Category", action.as_str()),
        &[
            ("Category Name", block.attribute(&name_labels)),
            ("Description", block.attribute(labels::DESCRIPTION_LABELS)),
            ("In Glossary", block.attribute(labels::GLOSSARY_NAME_LABELS)),
            (
                "Parent Category",
                block.attribute(labels::PARENT_CATEGORY_LABELS),
            ),
        ],
    )?;

    // Display stops at the echo; only validate and process resolve names
    // against the remote catalog.
    if directive == Directive::Display {
        return Ok(CommandOutcome::Displayed);
    }

    let check = check_category(client, cache, block, action, reporter);

    match directive {
        Directive::Display => Ok(CommandOutcome::Displayed),
        Directive::Validate => {
            reporter.always(format!(
                "validation of {} Category: {}",
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
    check: CategoryCheck,
    reporter: &mut Reporter,
) -> CommandOutcome {
    let name = check.name.clone().unwrap_or_default();

    if !check.valid {
        if action == UpsertAction::Create && check.resolved.exists {
            reporter.warning(format!(
                "category '{}' already exists; command rewritten as Update",
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
            "validation failed for {} Category; nothing processed",
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
                    "category '{}' is no longer resolvable; command rewritten as Create",
                    name
                ));
                let corrected = rewrite::flip_action(block, None, None);
                return CommandOutcome::Processed(Some(corrected.to_string()));
            };

            if let Err(e) = client.update_category(&guid, &check.properties) {
                error!(category = %name, "update failed: {e}");
                reporter.error(format!("update of category '{}' failed: {}", name, e));
                return CommandOutcome::Processed(None);
            }
            cache.update(&qualified_name, CachedElement::full(guid.clone(), name.clone()));
            reporter.info(format!("updated category '{}'", name));

            reparent(client, &guid, check.parent.as_ref(), reporter);

            render_result(
                client.get_category_by_guid(&guid, OutputFormat::Md),
                block,
                reporter,
            )
        }
        UpsertAction::Create => {
            if check.resolved.exists {
                reporter.warning(format!(
                    "category '{}' already exists; command rewritten as Update",
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
                    "owning glossary for category '{}' has no guid; nothing processed",
                    name
                ));
                return CommandOutcome::Processed(None);
            };

            match client.create_category(glossary_guid, &check.properties) {
                Err(e) => {
                    error!(category = %name, "create failed: {e}");
                    reporter.error(format!("create of category '{}' failed: {}", name, e));
                    CommandOutcome::Processed(None)
                }
                Ok(None) => {
                    reporter.error(format!(
                        "server reported failure creating category '{}'",
                        name
                    ));
                    CommandOutcome::Processed(None)
                }
                Ok(Some(guid)) => {
                    let qualified_name = qualified_name_for(
                        ElementFamily::Category,
                        &name,
                        check.version.as_deref(),
                    );
                    cache.update(&qualified_name, CachedElement::full(guid.clone(), name.clone()));
                    reporter.info(format!("created category '{}' ({})", name, guid));

                    if let Some(parent) = &check.parent {
                        if let Some(parent_guid) = parent.guid.as_deref() {
                            if let Err(e) = client.add_parent_category(parent_guid, &guid) {
                                reporter.warning(format!(
                                    "could not set parent for category '{}': {}",
                                    name, e
                                ));
                            }
                        }
                    }

                    render_result(
                        client.get_category_by_guid(&guid, OutputFormat::Md),
                        block,
                        reporter,
                    )
                }
            }
        }
    }
}

/// Reconcile a category's parent with what the command requested: remove the
/// current parent when it differs, then attach the requested one. A block
/// naming no parent leaves the hierarchy untouched.
fn reparent(
    client: &dyn EgeriaClient,
    category_guid: &str,
    requested: Option<&ResolvedIdentity>,
    reporter: &mut Reporter,
) {
    let Some(requested) = requested else {
        return;
    };
    let Some(requested_guid) = requested.guid.as_deref() else {
        return;
    };

    let current = match client.get_parent_category(category_guid) {
        Ok(current) => current,
        Err(e) => {
            reporter.warning(format!("could not read current parent category: {}", e));
            return;
        }
    };

    let current_guid = current.as_ref().and_then(|c| c.guid.as_deref());
    if current_guid == Some(requested_guid) {
        return;
    }

    if let Some(old_guid) = current_guid {
        if let Err(e) = client.remove_parent_category(old_guid, category_guid) {
            reporter.warning(format!("could not detach old parent category: {}", e));
            return;
        }
    }
    if let Err(e) = client.add_parent_category(requested_guid, category_guid) {
        reporter.warning(format!("could not attach parent category: {}", e));
    }
}

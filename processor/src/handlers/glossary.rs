use std::io::{self, Write};

use egeria_md::block::CommandBlock;
use egeria_md::{labels, rewrite};
use tracing::error;

use crate::cache::{CachedElement, ElementCache};
use crate::client::{EgeriaClient, GlossaryProperties};
use crate::directive::Directive;
use crate::formats::OutputFormat;
use crate::handlers::{CommandOutcome, UpsertAction, render_result, write_preview};
use crate::report::{NoteLevel, Reporter};
use crate::resolve::{self, ElementFamily, ResolvedIdentity, qualified_name_for};

struct GlossaryCheck {
    name: Option<String>,
    version: Option<String>,
    properties: GlossaryProperties,
    resolved: ResolvedIdentity,
    valid: bool,
}

fn check_glossary(
    client: &dyn EgeriaClient,
    cache: &mut ElementCache,
    block: &CommandBlock,
    action: UpsertAction,
    reporter: &mut Reporter,
) -> GlossaryCheck {
    let name_labels: Vec<&str> = [labels::GLOSSARY_NAME_LABELS, &["Display Name"]].concat();
    let name = block.attribute(&name_labels).map(str::to_string);
    let language =
        resolve::process_simple_attribute(block, labels::LANGUAGE_LABELS, NoteLevel::Info, reporter);
    let description = resolve::process_simple_attribute(
        block,
        labels::DESCRIPTION_LABELS,
        NoteLevel::Info,
        reporter,
    );
    let usage =
        resolve::process_simple_attribute(block, labels::USAGE_LABELS, NoteLevel::Info, reporter);
    let version =
        resolve::process_simple_attribute(block, labels::VERSION_LABELS, NoteLevel::Info, reporter);

    let resolved = resolve::resolve_element_identity(
        client,
        cache,
        "Glossary",
        &name_labels,
        block,
        action.resolution(),
        reporter,
    );

    let valid = name.is_some() && resolved.valid;
    GlossaryCheck {
        properties: GlossaryProperties {
            display_name: name.clone().unwrap_or_default(),
            language,
            description,
            usage,
        },
        name,
        version,
        resolved,
        valid,
    }
}

/// Handle `# Create Glossary` / `# Update Glossary`.
pub fn process_glossary_upsert(
    client: &dyn EgeriaClient,
    cache: &mut ElementCache,
    block: &CommandBlock,
    directive: Directive,
    out: &mut dyn Write,
    reporter: &mut Reporter,
) -> io::Result<CommandOutcome> {
    let Some(action) = UpsertAction::of(block) else {
        reporter.warning("glossary command without a Create or Update action");
        return Ok(CommandOutcome::Unrecognized);
    };

    let name_labels: Vec<&str> = [labels::GLOSSARY_NAME_LABELS, &["Display Name"]].concat();
    write_preview(
        out,
        &format!("{} Glossary", action.as_str()),
        &[
            ("Glossary Name", block.attribute(&name_labels)),
            ("Language", block.attribute(labels::LANGUAGE_LABELS)),
            ("Description", block.attribute(labels::DESCRIPTION_LABELS)),
            ("Usage", block.attribute(labels::USAGE_LABELS)),
        ],
    )?;

    // Display stops at the echo; only validate and process resolve names
    // against the remote catalog.
    if directive == Directive::Display {
        return Ok(CommandOutcome::Displayed);
    }

    let check = check_glossary(client, cache, block, action, reporter);

    match directive {
        Directive::Display => Ok(CommandOutcome::Displayed),
        Directive::Validate => {
            reporter.always(format!(
                "validation of {} Glossary: {}",
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
    check: GlossaryCheck,
    reporter: &mut Reporter,
) -> CommandOutcome {
    let name = check.name.clone().unwrap_or_default();

    if !check.valid {
        // A create that collided with an existing element is not a failure:
        // rewrite the command as an update so a resubmitted document is safe.
        if action == UpsertAction::Create && check.resolved.exists {
            reporter.warning(format!(
                "glossary '{}' already exists; command rewritten as Update",
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
            "validation failed for {} Glossary; nothing processed",
            action.as_str()
        ));
        return CommandOutcome::Processed(None);
    }

    match action {
        UpsertAction::Update => {
            let (Some(guid), Some(qualified_name)) =
                (check.resolved.guid.clone(), check.resolved.qualified_name.clone())
            else {
                // The target vanished between validate and process.
                reporter.error(format!(
                    "glossary '{}' is no longer resolvable; command rewritten as Create",
                    name
                ));
                let corrected = rewrite::flip_action(block, None, None);
                return CommandOutcome::Processed(Some(corrected.to_string()));
            };

            if let Err(e) = client.update_glossary(&guid, &check.properties) {
                error!(glossary = %name, "update failed: {e}");
                reporter.error(format!("update of glossary '{}' failed: {}", name, e));
                return CommandOutcome::Processed(None);
            }
            cache.update(&qualified_name, CachedElement::full(guid.clone(), name.clone()));
            reporter.info(format!("updated glossary '{}'", name));
            render_result(
                client.get_glossary_by_guid(&guid, OutputFormat::Md),
                block,
                reporter,
            )
        }
        UpsertAction::Create => {
            if check.resolved.exists {
                reporter.warning(format!(
                    "glossary '{}' already exists; command rewritten as Update",
                    name
                ));
                let corrected = rewrite::flip_action(
                    block,
                    check.resolved.qualified_name.as_deref(),
                    check.resolved.guid.as_deref(),
                );
                return CommandOutcome::Processed(Some(corrected.to_string()));
            }

            match client.create_glossary(&check.properties) {
                Err(e) => {
                    error!(glossary = %name, "create failed: {e}");
                    reporter.error(format!("create of glossary '{}' failed: {}", name, e));
                    CommandOutcome::Processed(None)
                }
                Ok(None) => {
                    reporter.error(format!(
                        "server reported failure creating glossary '{}'",
                        name
                    ));
                    CommandOutcome::Processed(None)
                }
                Ok(Some(guid)) => {
                    let qualified_name = qualified_name_for(
                        ElementFamily::Glossary,
                        &name,
                        check.version.as_deref(),
                    );
                    cache.update(&qualified_name, CachedElement::full(guid.clone(), name.clone()));
                    reporter.info(format!("created glossary '{}' ({})", name, guid));
                    render_result(
                        client.get_glossary_by_guid(&guid, OutputFormat::Md),
                        block,
                        reporter,
                    )
                }
            }
        }
    }
}

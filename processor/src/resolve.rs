//! Name-to-identity resolution.
//!
//! A document refers to elements by human-typed display name; the remote
//! catalog knows them by qualified name and guid. Resolution consults the
//! session cache first, then the family's remote list call, and records what
//! it learned back into the cache.

use egeria_md::block::CommandBlock;
use egeria_md::labels;
use tracing::error;

use crate::cache::{CachedElement, ElementCache};
use crate::client::{ClientError, EgeriaClient, ElementSummary};
use crate::report::{NoteLevel, Reporter};

/// The closed set of element families name resolution can target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementFamily {
    Glossary,
    Category,
    Term,
    Project,
    Blueprint,
    Component,
}

impl ElementFamily {
    pub const ALL: &'static [ElementFamily] = &[
        ElementFamily::Glossary,
        ElementFamily::Category,
        ElementFamily::Term,
        ElementFamily::Project,
        ElementFamily::Blueprint,
        ElementFamily::Component,
    ];

    /// Map a type label (any synonym) to its family.
    pub fn from_label(label: &str) -> Option<Self> {
        let label = label.trim();
        Self::ALL.iter().copied().find(|family| {
            family
                .synonyms()
                .iter()
                .any(|s| s.eq_ignore_ascii_case(label))
        })
    }

    /// Labels that denote this family in documents.
    pub fn synonyms(self) -> &'static [&'static str] {
        match self {
            ElementFamily::Glossary => labels::GLOSSARY_NAME_LABELS,
            ElementFamily::Category => labels::CATEGORY_NAME_LABELS,
            ElementFamily::Term => labels::TERM_NAME_LABELS,
            ElementFamily::Project => labels::PROJECT_NAME_LABELS,
            ElementFamily::Blueprint => labels::BLUEPRINT_NAME_LABELS,
            ElementFamily::Component => labels::COMPONENT_NAME_LABELS,
        }
    }

    /// Canonical type name, as embedded in qualified names.
    pub fn type_name(self) -> &'static str {
        match self {
            ElementFamily::Glossary => "Glossary",
            ElementFamily::Category => "Category",
            ElementFamily::Term => "Term",
            ElementFamily::Project => "Project",
            ElementFamily::Blueprint => "SolutionBlueprint",
            ElementFamily::Component => "SolutionComponent",
        }
    }

    fn list(
        self,
        client: &dyn EgeriaClient,
        search: Option<&str>,
    ) -> Result<Vec<ElementSummary>, ClientError> {
        match self {
            ElementFamily::Glossary => client.list_glossaries(search),
            ElementFamily::Category => client.list_categories(search),
            ElementFamily::Term => client.list_terms(search),
            ElementFamily::Project => client.list_projects(search),
            ElementFamily::Blueprint => client.list_blueprints(search),
            ElementFamily::Component => client.list_components(search),
        }
    }
}

/// Build the qualified name for a newly created element. Mirrors the naming
/// scheme the metadata server applies, so cache entries seeded after a
/// create match later remote lookups.
pub fn qualified_name_for(family: ElementFamily, name: &str, version: Option<&str>) -> String {
    match version {
        Some(version) if !version.trim().is_empty() => {
            format!("{}::{}::{}", family.type_name(), name.trim(), version.trim())
        }
        _ => format!("{}::{}", family.type_name(), name.trim()),
    }
}

/// Outcome of a display-name lookup.
#[derive(Debug, Clone, PartialEq)]
pub enum Lookup {
    /// An element with a matching display name, possibly malformed.
    Found(ElementSummary),
    NotFound,
    /// The remote lookup itself failed. Kept distinct from NotFound so a
    /// backend outage cannot masquerade as "safe to create".
    Failed,
}

/// Resolve a display name to identity: cache first, then the family's remote
/// list call. A well-formed remote hit is written back into the cache.
pub fn find_element_by_name(
    client: &dyn EgeriaClient,
    cache: &mut ElementCache,
    element_type: &str,
    name: &str,
    reporter: &mut Reporter,
) -> Lookup {
    let Some(family) = ElementFamily::from_label(element_type) else {
        reporter.error(format!("unknown element type '{}'", element_type));
        return Lookup::Failed;
    };

    // A cached entry resolves only when it already carries a guid; a name
    // recorded without one still needs the remote lookup.
    if let Some((qualified_name, entry)) = cache.find_display_name(family.type_name(), name) {
        if let Some(guid) = &entry.guid {
            return Lookup::Found(ElementSummary {
                guid: Some(guid.clone()),
                qualified_name: Some(qualified_name.clone()),
                display_name: entry.display_name.clone().unwrap_or_else(|| name.to_string()),
            });
        }
    }

    let elements = match family.list(client, Some(name)) {
        Ok(elements) => elements,
        Err(e) => {
            error!(element_type = family.type_name(), name, "list call failed: {e}");
            reporter.error(format!(
                "lookup of {} '{}' failed: {}",
                family.type_name(),
                name,
                e
            ));
            return Lookup::Failed;
        }
    };

    let hit = elements
        .into_iter()
        .find(|e| e.display_name.eq_ignore_ascii_case(name.trim()));

    match hit {
        Some(summary) => {
            if let (Some(qualified_name), Some(guid)) = (&summary.qualified_name, &summary.guid) {
                cache.update(
                    qualified_name,
                    CachedElement::full(guid.clone(), summary.display_name.clone()),
                );
            }
            Lookup::Found(summary)
        }
        None => Lookup::NotFound,
    }
}

/// Action context for identity resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolutionAction {
    Create,
    Update,
    /// The element is referenced, not targeted: it must already exist.
    ExistsRequired,
}

impl ResolutionAction {
    fn requires_existence(self) -> bool {
        matches!(
            self,
            ResolutionAction::Update | ResolutionAction::ExistsRequired
        )
    }
}

/// Resolved identity plus the validity verdict for the requested action.
/// `valid` means the action is semantically coherent given remote state,
/// independent of whether the element exists.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResolvedIdentity {
    pub qualified_name: Option<String>,
    pub guid: Option<String>,
    pub valid: bool,
    pub exists: bool,
}

impl ResolvedIdentity {
    fn invalid() -> Self {
        ResolvedIdentity::default()
    }
}

/// Resolve the element a command block names and judge the requested action
/// against what the catalog holds:
///
/// - no name in the block: invalid, does not exist;
/// - name absent remotely and the action requires existence: invalid;
/// - name absent remotely otherwise: valid for a create, does not exist;
/// - found but missing guid or qualified name: invalid, exists;
/// - found and well-formed: valid, exists (a Create gets a warning that the
///   element is already there, anything else an informational note);
/// - remote lookup failed: invalid, treated as unresolved.
pub fn resolve_element_identity(
    client: &dyn EgeriaClient,
    cache: &mut ElementCache,
    element_type: &str,
    name_labels: &[&str],
    block: &CommandBlock,
    action: ResolutionAction,
    reporter: &mut Reporter,
) -> ResolvedIdentity {
    let Some(name) = block.attribute(name_labels) else {
        reporter.push_spanned(
            NoteLevel::Error,
            format!("no {} name found in command block", element_type),
            block.span.clone(),
        );
        return ResolvedIdentity::invalid();
    };
    let name = name.to_string();

    match find_element_by_name(client, cache, element_type, &name, reporter) {
        Lookup::Failed => ResolvedIdentity::invalid(),
        Lookup::NotFound => {
            if action.requires_existence() {
                reporter.error(format!("{} '{}' does not exist", element_type, name));
                ResolvedIdentity::invalid()
            } else {
                ResolvedIdentity {
                    qualified_name: None,
                    guid: None,
                    valid: true,
                    exists: false,
                }
            }
        }
        Lookup::Found(summary) => {
            let (Some(qualified_name), Some(guid)) = (summary.qualified_name, summary.guid)
            else {
                reporter.error(format!(
                    "{} '{}' exists but is missing its guid or qualified name",
                    element_type, name
                ));
                return ResolvedIdentity {
                    qualified_name: None,
                    guid: None,
                    valid: false,
                    exists: true,
                };
            };
            match action {
                ResolutionAction::Create => {
                    reporter.warning(format!("{} '{}' already exists", element_type, name));
                }
                _ => {
                    reporter.info(format!("{} '{}' exists", element_type, name));
                }
            }
            ResolvedIdentity {
                qualified_name: Some(qualified_name),
                guid: Some(guid),
                valid: true,
                exists: true,
            }
        }
    }
}

/// Extract an attribute, reporting at `if_missing` when absent. Always
/// returns `None` on a miss rather than failing; callers decide whether a
/// missing attribute is fatal.
pub fn process_simple_attribute(
    block: &CommandBlock,
    attribute_labels: &[&str],
    if_missing: NoteLevel,
    reporter: &mut Reporter,
) -> Option<String> {
    match block.attribute(attribute_labels) {
        Some(value) => Some(value.to_string()),
        None => {
            let label = attribute_labels.first().copied().unwrap_or("attribute");
            reporter.push_spanned(
                if_missing,
                format!("attribute '{}' not found", label),
                block.span.clone(),
            );
            None
        }
    }
}

/// Split a comma- or newline-separated attribute value into names.
pub fn split_name_list(value: &str) -> Vec<String> {
    value
        .split(['\n', ','])
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Resolution of a multi-valued name attribute.
#[derive(Debug, Default)]
pub struct NameListResolution {
    /// The raw names as written, resolved or not.
    pub names: Vec<String>,
    /// Qualified names of the names that resolved, in input order.
    pub qualified_names: Vec<String>,
    /// Guids paired with `qualified_names`.
    pub guids: Vec<String>,
    /// False when any name failed to resolve.
    pub all_valid: bool,
    /// True when at least one name resolved.
    pub any_exist: bool,
}

/// Resolve a comma/newline-separated attribute of element names, e.g. the
/// categories a term belongs to. A missing attribute yields an empty,
/// vacuously valid resolution.
pub fn process_name_list(
    client: &dyn EgeriaClient,
    cache: &mut ElementCache,
    element_type: &str,
    block: &CommandBlock,
    attribute_labels: &[&str],
    reporter: &mut Reporter,
) -> NameListResolution {
    let mut resolution = NameListResolution {
        all_valid: true,
        ..NameListResolution::default()
    };

    let Some(value) = block.attribute(attribute_labels) else {
        return resolution;
    };

    for name in split_name_list(value) {
        match find_element_by_name(client, cache, element_type, &name, reporter) {
            Lookup::Found(ElementSummary {
                guid: Some(guid),
                qualified_name: Some(qualified_name),
                ..
            }) => {
                resolution.qualified_names.push(qualified_name);
                resolution.guids.push(guid);
                resolution.any_exist = true;
            }
            Lookup::Found(_) => {
                reporter.error(format!(
                    "{} '{}' exists but is missing its guid or qualified name",
                    element_type, name
                ));
                resolution.all_valid = false;
            }
            Lookup::NotFound => {
                reporter.error(format!("{} '{}' does not exist", element_type, name));
                resolution.all_valid = false;
            }
            Lookup::Failed => {
                resolution.all_valid = false;
            }
        }
        resolution.names.push(name);
    }

    resolution
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn family_from_any_synonym() {
        assert_eq!(
            ElementFamily::from_label("Owning Glossary"),
            Some(ElementFamily::Glossary)
        );
        assert_eq!(
            ElementFamily::from_label("glossary category"),
            Some(ElementFamily::Category)
        );
        assert_eq!(ElementFamily::from_label("Term"), Some(ElementFamily::Term));
        assert_eq!(ElementFamily::from_label("Gadget"), None);
    }

    #[test]
    fn qualified_names_embed_type_and_version() {
        assert_eq!(
            qualified_name_for(ElementFamily::Glossary, "Core", None),
            "Glossary::Core"
        );
        assert_eq!(
            qualified_name_for(ElementFamily::Term, "Widget", Some("V1")),
            "Term::Widget::V1"
        );
    }

    #[test]
    fn name_list_splitting() {
        assert_eq!(
            split_name_list("A, B\nC,\n"),
            vec!["A".to_string(), "B".to_string(), "C".to_string()]
        );
        assert!(split_name_list("  \n , ").is_empty());
    }
}

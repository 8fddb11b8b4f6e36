//! Closed label-synonym sets for the Dr.Egeria document format.
//!
//! A document author may use any synonym for a semantic field; lookups try
//! each synonym in order and take the first non-blank match. These are
//! `&'static` slices on purpose: call sites that need an extra candidate
//! label build a fresh `Vec` rather than mutating a shared table.

/// The glossary that owns or scopes an element.
pub const GLOSSARY_NAME_LABELS: &[&str] = &[
    "Glossary Name",
    "Glossary",
    "Glossaries",
    "Owning Glossary",
    "In Glossary",
];

pub const CATEGORY_NAME_LABELS: &[&str] = &[
    "Glossary Category Name",
    "Glossary Category",
    "Glossary Categories",
    "Category Name",
    "Category",
    "Categories",
];

pub const TERM_NAME_LABELS: &[&str] = &[
    "Glossary Term Name",
    "Glossary Term",
    "Glossary Terms",
    "Term Name",
    "Term",
    "Terms",
    "Term Names",
];

pub const PROJECT_NAME_LABELS: &[&str] = &["Project Name", "Project", "Projects"];

pub const BLUEPRINT_NAME_LABELS: &[&str] = &[
    "Solution Blueprint",
    "Solution Blueprints",
    "Blueprint",
    "Blueprints",
];

pub const COMPONENT_NAME_LABELS: &[&str] = &[
    "Solution Component",
    "Solution Components",
    "Component",
    "Components",
];

/// The category a category is reparented under.
pub const PARENT_CATEGORY_LABELS: &[&str] = &["Parent Category", "In Category", "Parent"];

pub const OUTPUT_FORMAT_LABELS: &[&str] = &["Output", "Output Format"];

pub const SEARCH_LABELS: &[&str] = &["Search String", "Filter"];

pub const DESCRIPTION_LABELS: &[&str] = &["Description"];
pub const LANGUAGE_LABELS: &[&str] = &["Language"];
pub const USAGE_LABELS: &[&str] = &["Usage"];
pub const SUMMARY_LABELS: &[&str] = &["Summary"];
pub const ABBREVIATION_LABELS: &[&str] = &["Abbreviation", "Abbreviations"];
pub const EXAMPLES_LABELS: &[&str] = &["Examples", "Example"];
pub const STATUS_LABELS: &[&str] = &["Status", "Term Status"];
pub const VERSION_LABELS: &[&str] = &["Version", "Version Identifier", "Version Id"];
pub const ALIAS_LABELS: &[&str] = &["Aliases", "Alias"];

/// Identity sections injected by the Create→Update rewrite.
pub const QUALIFIED_NAME_LABEL: &str = "Qualified Name";
pub const GUID_LABEL: &str = "GUID";
pub const QUALIFIED_NAME_LABELS: &[&str] = &["Qualified Name"];
pub const GUID_LABELS: &[&str] = &["GUID", "Guid"];

/// Term-term relationship endpoints and type.
pub const TERM_1_LABELS: &[&str] = &["Term 1", "First Term", "Term 1 Name"];
pub const TERM_2_LABELS: &[&str] = &["Term 2", "Second Term", "Term 2 Name"];
pub const RELATIONSHIP_TYPE_LABELS: &[&str] = &["Relationship Type", "Term Relationship"];

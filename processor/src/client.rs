//! The remote metadata-server collaborator contract.
//!
//! Everything the command processor needs from the Egeria backend sits
//! behind [`EgeriaClient`]; the processing layer never builds a request or
//! parses a response itself. Create calls return the new element's guid, or
//! `None` when the server reported failure without an error. List calls
//! return an empty vector when nothing matched.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::formats::OutputFormat;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("transport error: {0}")]
    Transport(String),
    #[error("remote returned HTTP {status}: {message}")]
    Status { status: u16, message: String },
    #[error("unexpected response shape: {0}")]
    Protocol(String),
}

/// Identity summary returned by list/search calls.
///
/// `guid` and `qualified_name` are optional because remote elements are
/// occasionally malformed; resolution treats such elements as found but
/// unusable rather than pretending they do not exist.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ElementSummary {
    #[serde(default)]
    pub guid: Option<String>,
    #[serde(default)]
    pub qualified_name: Option<String>,
    #[serde(default)]
    pub display_name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GlossaryProperties {
    pub display_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub usage: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryProperties {
    pub display_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TermProperties {
    pub display_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub abbreviation: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub examples: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub usage: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version_identifier: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

/// One edge of a term-term relationship, seen from the queried term.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TermRelationship {
    pub end_guid: String,
    pub relationship_type: String,
}

/// CRUD and list/search operations against the metadata server.
///
/// Implementations are synchronous; each call blocks until the remote round
/// trip completes. No retry or backoff happens at this layer.
pub trait EgeriaClient {
    // Glossaries
    fn create_glossary(&self, properties: &GlossaryProperties)
    -> Result<Option<String>, ClientError>;
    fn update_glossary(
        &self,
        guid: &str,
        properties: &GlossaryProperties,
    ) -> Result<(), ClientError>;
    fn get_glossary_by_guid(
        &self,
        guid: &str,
        output_format: OutputFormat,
    ) -> Result<String, ClientError>;
    fn list_glossaries(&self, search: Option<&str>) -> Result<Vec<ElementSummary>, ClientError>;

    // Categories
    fn create_category(
        &self,
        glossary_guid: &str,
        properties: &CategoryProperties,
    ) -> Result<Option<String>, ClientError>;
    fn update_category(
        &self,
        guid: &str,
        properties: &CategoryProperties,
    ) -> Result<(), ClientError>;
    fn get_category_by_guid(
        &self,
        guid: &str,
        output_format: OutputFormat,
    ) -> Result<String, ClientError>;
    fn list_categories(&self, search: Option<&str>) -> Result<Vec<ElementSummary>, ClientError>;
    fn list_categories_for_glossary(
        &self,
        glossary_guid: &str,
    ) -> Result<Vec<ElementSummary>, ClientError>;
    fn get_parent_category(
        &self,
        category_guid: &str,
    ) -> Result<Option<ElementSummary>, ClientError>;
    fn add_parent_category(&self, parent_guid: &str, child_guid: &str) -> Result<(), ClientError>;
    fn remove_parent_category(
        &self,
        parent_guid: &str,
        child_guid: &str,
    ) -> Result<(), ClientError>;

    // Terms
    fn create_term(
        &self,
        glossary_guid: &str,
        properties: &TermProperties,
    ) -> Result<Option<String>, ClientError>;
    fn update_term(&self, guid: &str, properties: &TermProperties) -> Result<(), ClientError>;
    fn get_term_by_guid(
        &self,
        guid: &str,
        output_format: OutputFormat,
    ) -> Result<String, ClientError>;
    fn list_terms(&self, search: Option<&str>) -> Result<Vec<ElementSummary>, ClientError>;
    fn list_terms_for_glossary(
        &self,
        glossary_guid: &str,
    ) -> Result<Vec<ElementSummary>, ClientError>;
    fn list_terms_for_category(
        &self,
        category_guid: &str,
    ) -> Result<Vec<ElementSummary>, ClientError>;
    fn get_categories_for_term(&self, term_guid: &str)
    -> Result<Vec<ElementSummary>, ClientError>;
    fn add_term_to_category(&self, category_guid: &str, term_guid: &str)
    -> Result<(), ClientError>;
    fn remove_term_from_category(
        &self,
        category_guid: &str,
        term_guid: &str,
    ) -> Result<(), ClientError>;
    fn get_term_aliases(&self, term_guid: &str) -> Result<Vec<String>, ClientError>;
    fn add_term_alias(&self, term_guid: &str, alias: &str) -> Result<(), ClientError>;
    fn remove_term_alias(&self, term_guid: &str, alias: &str) -> Result<(), ClientError>;

    // Term-term relationships
    fn create_term_relationship(
        &self,
        term1_guid: &str,
        term2_guid: &str,
        relationship_type: &str,
    ) -> Result<(), ClientError>;
    fn get_term_relationships(
        &self,
        term_guid: &str,
    ) -> Result<Vec<TermRelationship>, ClientError>;

    // Remaining name-resolution families
    fn list_projects(&self, search: Option<&str>) -> Result<Vec<ElementSummary>, ClientError>;
    fn list_blueprints(&self, search: Option<&str>) -> Result<Vec<ElementSummary>, ClientError>;
    fn list_components(&self, search: Option<&str>) -> Result<Vec<ElementSummary>, ClientError>;

    // Structure rendering
    fn get_glossary_structure(
        &self,
        glossary_guid: &str,
        output_format: OutputFormat,
    ) -> Result<String, ClientError>;
}

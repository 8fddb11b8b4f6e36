//! Blocking HTTP implementation of [`EgeriaClient`] against a view server.
//!
//! Paths follow the view-server REST layout: mutations go through the
//! glossary-manager service, reads through glossary-browser. Every call is a
//! single round trip; errors surface as [`ClientError`] with the HTTP status
//! and the server's message when one is present.

use reqwest::blocking::{Client, Response};
use serde_json::{Value, json};
use tracing::debug;

use crate::client::{
    CategoryProperties, ClientError, EgeriaClient, ElementSummary, GlossaryProperties,
    TermProperties, TermRelationship,
};
use crate::formats::OutputFormat;

pub struct HttpEgeriaClient {
    http: Client,
    platform_url: String,
    view_server: String,
    user: String,
}

impl HttpEgeriaClient {
    pub fn new(platform_url: &str, view_server: &str, user: &str) -> Result<Self, ClientError> {
        let http = Client::builder()
            .build()
            .map_err(|e| ClientError::Transport(e.to_string()))?;
        Ok(HttpEgeriaClient {
            http,
            platform_url: platform_url.trim_end_matches('/').to_string(),
            view_server: view_server.to_string(),
            user: user.to_string(),
        })
    }

    fn url(&self, service: &str, path: &str) -> String {
        format!(
            "{}/servers/{}/api/open-metadata/{}/{}",
            self.platform_url, self.view_server, service, path
        )
    }

    fn post(&self, url: &str, body: &Value) -> Result<Value, ClientError> {
        debug!(%url, "POST");
        let response = self
            .http
            .post(url)
            .header("x-egeria-user", &self.user)
            .json(body)
            .send()
            .map_err(|e| ClientError::Transport(e.to_string()))?;
        Self::into_json(response)
    }

    fn get(&self, url: &str) -> Result<Value, ClientError> {
        debug!(%url, "GET");
        let response = self
            .http
            .get(url)
            .header("x-egeria-user", &self.user)
            .send()
            .map_err(|e| ClientError::Transport(e.to_string()))?;
        Self::into_json(response)
    }

    fn into_json(response: Response) -> Result<Value, ClientError> {
        let status = response.status();
        let text = response
            .text()
            .map_err(|e| ClientError::Transport(e.to_string()))?;
        if !status.is_success() {
            return Err(ClientError::Status {
                status: status.as_u16(),
                message: text,
            });
        }
        if text.trim().is_empty() {
            return Ok(Value::Null);
        }
        serde_json::from_str(&text).map_err(|e| ClientError::Protocol(e.to_string()))
    }

    fn guid_of(value: &Value) -> Result<Option<String>, ClientError> {
        match value.get("guid") {
            Some(Value::String(guid)) => Ok(Some(guid.clone())),
            Some(Value::Null) | None => Ok(None),
            Some(other) => Err(ClientError::Protocol(format!(
                "guid field is not a string: {other}"
            ))),
        }
    }

    fn summaries_of(value: &Value) -> Vec<ElementSummary> {
        let Some(elements) = value.get("elementList").and_then(Value::as_array) else {
            return Vec::new();
        };
        elements
            .iter()
            .map(|element| ElementSummary {
                guid: element
                    .pointer("/elementHeader/guid")
                    .and_then(Value::as_str)
                    .map(str::to_string),
                qualified_name: element
                    .pointer("/properties/qualifiedName")
                    .and_then(Value::as_str)
                    .map(str::to_string),
                display_name: element
                    .pointer("/properties/displayName")
                    .and_then(Value::as_str)
                    .unwrap_or_default()
                    .to_string(),
            })
            .collect()
    }

    fn search_body(search: Option<&str>) -> Value {
        json!({
            "class": "SearchStringRequestBody",
            "searchString": search.unwrap_or(""),
            "startsWith": false,
            "endsWith": false,
            "ignoreCase": true,
        })
    }

    fn find_elements(
        &self,
        service: &str,
        path: &str,
        search: Option<&str>,
    ) -> Result<Vec<ElementSummary>, ClientError> {
        let value = self.post(&self.url(service, path), &Self::search_body(search))?;
        Ok(Self::summaries_of(&value))
    }

    fn retrieve_rendered(
        &self,
        path: &str,
        output_format: OutputFormat,
    ) -> Result<String, ClientError> {
        let url = format!(
            "{}?outputFormat={}",
            self.url("glossary-browser", path),
            output_format.as_str()
        );
        let value = self.get(&url)?;
        match output_format {
            OutputFormat::Dict => serde_json::to_string_pretty(&value)
                .map_err(|e| ClientError::Protocol(e.to_string())),
            _ => match value.get("element") {
                Some(Value::String(rendered)) => Ok(rendered.clone()),
                Some(element) => serde_json::to_string_pretty(element)
                    .map_err(|e| ClientError::Protocol(e.to_string())),
                None => Err(ClientError::Protocol(
                    "response carried no element".to_string(),
                )),
            },
        }
    }

    fn properties_body<T: serde::Serialize>(properties: &T) -> Result<Value, ClientError> {
        let properties =
            serde_json::to_value(properties).map_err(|e| ClientError::Protocol(e.to_string()))?;
        Ok(json!({
            "class": "ReferenceableRequestBody",
            "elementProperties": properties,
        }))
    }
}

impl EgeriaClient for HttpEgeriaClient {
    fn create_glossary(
        &self,
        properties: &GlossaryProperties,
    ) -> Result<Option<String>, ClientError> {
        let value = self.post(
            &self.url("glossary-manager", "glossaries"),
            &Self::properties_body(properties)?,
        )?;
        Self::guid_of(&value)
    }

    fn update_glossary(
        &self,
        guid: &str,
        properties: &GlossaryProperties,
    ) -> Result<(), ClientError> {
        self.post(
            &self.url("glossary-manager", &format!("glossaries/{guid}/update")),
            &Self::properties_body(properties)?,
        )?;
        Ok(())
    }

    fn get_glossary_by_guid(
        &self,
        guid: &str,
        output_format: OutputFormat,
    ) -> Result<String, ClientError> {
        self.retrieve_rendered(&format!("glossaries/{guid}/retrieve"), output_format)
    }

    fn list_glossaries(&self, search: Option<&str>) -> Result<Vec<ElementSummary>, ClientError> {
        self.find_elements("glossary-browser", "glossaries/by-search-string", search)
    }

    fn create_category(
        &self,
        glossary_guid: &str,
        properties: &CategoryProperties,
    ) -> Result<Option<String>, ClientError> {
        let value = self.post(
            &self.url(
                "glossary-manager",
                &format!("glossaries/{glossary_guid}/categories"),
            ),
            &Self::properties_body(properties)?,
        )?;
        Self::guid_of(&value)
    }

    fn update_category(
        &self,
        guid: &str,
        properties: &CategoryProperties,
    ) -> Result<(), ClientError> {
        self.post(
            &self.url("glossary-manager", &format!("categories/{guid}/update")),
            &Self::properties_body(properties)?,
        )?;
        Ok(())
    }

    fn get_category_by_guid(
        &self,
        guid: &str,
        output_format: OutputFormat,
    ) -> Result<String, ClientError> {
        self.retrieve_rendered(&format!("categories/{guid}/retrieve"), output_format)
    }

    fn list_categories(&self, search: Option<&str>) -> Result<Vec<ElementSummary>, ClientError> {
        self.find_elements("glossary-browser", "categories/by-search-string", search)
    }

    fn list_categories_for_glossary(
        &self,
        glossary_guid: &str,
    ) -> Result<Vec<ElementSummary>, ClientError> {
        let value = self.get(&self.url(
            "glossary-browser",
            &format!("glossaries/{glossary_guid}/categories/retrieve"),
        ))?;
        Ok(Self::summaries_of(&value))
    }

    fn get_parent_category(
        &self,
        category_guid: &str,
    ) -> Result<Option<ElementSummary>, ClientError> {
        let value = self.get(&self.url(
            "glossary-browser",
            &format!("categories/{category_guid}/parent/retrieve"),
        ))?;
        if value.is_null() {
            return Ok(None);
        }
        Ok(Self::summaries_of(&json!({ "elementList": [value] }))
            .into_iter()
            .next())
    }

    fn add_parent_category(&self, parent_guid: &str, child_guid: &str) -> Result<(), ClientError> {
        self.post(
            &self.url(
                "glossary-manager",
                &format!("categories/{parent_guid}/subcategories/{child_guid}"),
            ),
            &Value::Null,
        )?;
        Ok(())
    }

    fn remove_parent_category(
        &self,
        parent_guid: &str,
        child_guid: &str,
    ) -> Result<(), ClientError> {
        self.post(
            &self.url(
                "glossary-manager",
                &format!("categories/{parent_guid}/subcategories/{child_guid}/remove"),
            ),
            &Value::Null,
        )?;
        Ok(())
    }

    fn create_term(
        &self,
        glossary_guid: &str,
        properties: &TermProperties,
    ) -> Result<Option<String>, ClientError> {
        let value = self.post(
            &self.url(
                "glossary-manager",
                &format!("glossaries/{glossary_guid}/terms"),
            ),
            &Self::properties_body(properties)?,
        )?;
        Self::guid_of(&value)
    }

    fn update_term(&self, guid: &str, properties: &TermProperties) -> Result<(), ClientError> {
        self.post(
            &self.url("glossary-manager", &format!("terms/{guid}/update")),
            &Self::properties_body(properties)?,
        )?;
        Ok(())
    }

    fn get_term_by_guid(
        &self,
        guid: &str,
        output_format: OutputFormat,
    ) -> Result<String, ClientError> {
        self.retrieve_rendered(&format!("terms/{guid}/retrieve"), output_format)
    }

    fn list_terms(&self, search: Option<&str>) -> Result<Vec<ElementSummary>, ClientError> {
        self.find_elements("glossary-browser", "terms/by-search-string", search)
    }

    fn list_terms_for_glossary(
        &self,
        glossary_guid: &str,
    ) -> Result<Vec<ElementSummary>, ClientError> {
        let value = self.get(&self.url(
            "glossary-browser",
            &format!("glossaries/{glossary_guid}/terms/retrieve"),
        ))?;
        Ok(Self::summaries_of(&value))
    }

    fn list_terms_for_category(
        &self,
        category_guid: &str,
    ) -> Result<Vec<ElementSummary>, ClientError> {
        let value = self.get(&self.url(
            "glossary-browser",
            &format!("categories/{category_guid}/terms/retrieve"),
        ))?;
        Ok(Self::summaries_of(&value))
    }

    fn get_categories_for_term(
        &self,
        term_guid: &str,
    ) -> Result<Vec<ElementSummary>, ClientError> {
        let value = self.get(&self.url(
            "glossary-browser",
            &format!("terms/{term_guid}/categories/retrieve"),
        ))?;
        Ok(Self::summaries_of(&value))
    }

    fn add_term_to_category(
        &self,
        category_guid: &str,
        term_guid: &str,
    ) -> Result<(), ClientError> {
        self.post(
            &self.url(
                "glossary-manager",
                &format!("categories/{category_guid}/terms/{term_guid}"),
            ),
            &Value::Null,
        )?;
        Ok(())
    }

    fn remove_term_from_category(
        &self,
        category_guid: &str,
        term_guid: &str,
    ) -> Result<(), ClientError> {
        self.post(
            &self.url(
                "glossary-manager",
                &format!("categories/{category_guid}/terms/{term_guid}/remove"),
            ),
            &Value::Null,
        )?;
        Ok(())
    }

    fn get_term_aliases(&self, term_guid: &str) -> Result<Vec<String>, ClientError> {
        let value = self.get(&self.url(
            "glossary-browser",
            &format!("terms/{term_guid}/aliases/retrieve"),
        ))?;
        let Some(aliases) = value.get("aliases").and_then(Value::as_array) else {
            return Ok(Vec::new());
        };
        Ok(aliases
            .iter()
            .filter_map(Value::as_str)
            .map(str::to_string)
            .collect())
    }

    fn add_term_alias(&self, term_guid: &str, alias: &str) -> Result<(), ClientError> {
        self.post(
            &self.url("glossary-manager", &format!("terms/{term_guid}/aliases")),
            &json!({ "alias": alias }),
        )?;
        Ok(())
    }

    fn remove_term_alias(&self, term_guid: &str, alias: &str) -> Result<(), ClientError> {
        self.post(
            &self.url(
                "glossary-manager",
                &format!("terms/{term_guid}/aliases/remove"),
            ),
            &json!({ "alias": alias }),
        )?;
        Ok(())
    }

    fn create_term_relationship(
        &self,
        term1_guid: &str,
        term2_guid: &str,
        relationship_type: &str,
    ) -> Result<(), ClientError> {
        self.post(
            &self.url(
                "glossary-manager",
                &format!("terms/{term1_guid}/relationships/{relationship_type}/terms/{term2_guid}"),
            ),
            &Value::Null,
        )?;
        Ok(())
    }

    fn get_term_relationships(
        &self,
        term_guid: &str,
    ) -> Result<Vec<TermRelationship>, ClientError> {
        let value = self.get(&self.url(
            "glossary-browser",
            &format!("terms/{term_guid}/relationships/retrieve"),
        ))?;
        let Some(edges) = value.get("relationshipList").and_then(Value::as_array) else {
            return Ok(Vec::new());
        };
        edges
            .iter()
            .map(|edge| {
                serde_json::from_value(edge.clone())
                    .map_err(|e| ClientError::Protocol(e.to_string()))
            })
            .collect()
    }

    fn list_projects(&self, search: Option<&str>) -> Result<Vec<ElementSummary>, ClientError> {
        self.find_elements("project-manager", "projects/by-search-string", search)
    }

    fn list_blueprints(&self, search: Option<&str>) -> Result<Vec<ElementSummary>, ClientError> {
        self.find_elements(
            "solution-architect",
            "solution-blueprints/by-search-string",
            search,
        )
    }

    fn list_components(&self, search: Option<&str>) -> Result<Vec<ElementSummary>, ClientError> {
        self.find_elements(
            "solution-architect",
            "solution-components/by-search-string",
            search,
        )
    }

    fn get_glossary_structure(
        &self,
        glossary_guid: &str,
        output_format: OutputFormat,
    ) -> Result<String, ClientError> {
        self.retrieve_rendered(
            &format!("glossaries/{glossary_guid}/structure"),
            output_format,
        )
    }
}

use std::cell::{Cell, RefCell};
use std::io::Write;

use egeria_md::CommandDocument;
use egeria_md::block::CommandBlock;
use egeria_md::parser::Parser;

use processor::cache::{CachedElement, ElementCache};
use processor::client::{
    CategoryProperties, ClientError, EgeriaClient, ElementSummary, GlossaryProperties,
    TermProperties, TermRelationship,
};
use processor::resolve::{self, Lookup, ResolutionAction};
use processor::{Directive, NoteLevel, Reporter, process_document};

// ---------------------------------------------------------------------------
// Mock client
// ---------------------------------------------------------------------------

#[derive(Default)]
struct MockClient {
    glossaries: RefCell<Vec<ElementSummary>>,
    categories: RefCell<Vec<ElementSummary>>,
    terms: RefCell<Vec<ElementSummary>>,
    /// (origin term guid, edge) pairs.
    relationships: RefCell<Vec<(String, TermRelationship)>>,
    /// Current category memberships reported for any term.
    current_term_categories: RefCell<Vec<ElementSummary>>,
    /// Current aliases reported for any term.
    current_term_aliases: RefCell<Vec<String>>,
    /// Current parent reported for any category.
    current_parent: RefCell<Option<ElementSummary>>,
    calls: RefCell<Vec<String>>,
    /// When set, every list/search call fails with a transport error.
    fail_lists: Cell<bool>,
    next_guid: Cell<u32>,
}

fn summary(guid: &str, qualified_name: &str, display_name: &str) -> ElementSummary {
    ElementSummary {
        guid: Some(guid.to_string()),
        qualified_name: Some(qualified_name.to_string()),
        display_name: display_name.to_string(),
    }
}

impl MockClient {
    fn with_glossary(self, guid: &str, name: &str) -> Self {
        self.glossaries
            .borrow_mut()
            .push(summary(guid, &format!("Glossary::{name}"), name));
        self
    }

    fn with_category(self, guid: &str, name: &str) -> Self {
        self.categories
            .borrow_mut()
            .push(summary(guid, &format!("Category::{name}"), name));
        self
    }

    fn with_term(self, guid: &str, name: &str) -> Self {
        self.terms
            .borrow_mut()
            .push(summary(guid, &format!("Term::{name}"), name));
        self
    }

    fn with_relationship(self, from_guid: &str, to_guid: &str, relationship_type: &str) -> Self {
        self.relationships.borrow_mut().push((
            from_guid.to_string(),
            TermRelationship {
                end_guid: to_guid.to_string(),
                relationship_type: relationship_type.to_string(),
            },
        ));
        self
    }

    fn with_current_category(self, guid: &str, name: &str) -> Self {
        self.current_term_categories
            .borrow_mut()
            .push(summary(guid, &format!("Category::{name}"), name));
        self
    }

    fn with_current_alias(self, alias: &str) -> Self {
        self.current_term_aliases
            .borrow_mut()
            .push(alias.to_string());
        self
    }

    fn with_current_parent(self, guid: &str, name: &str) -> Self {
        *self.current_parent.borrow_mut() =
            Some(summary(guid, &format!("Category::{name}"), name));
        self
    }

    fn record(&self, call: impl Into<String>) {
        self.calls.borrow_mut().push(call.into());
    }

    fn count(&self, call: &str) -> usize {
        self.calls.borrow().iter().filter(|c| *c == call).count()
    }

    fn mint_guid(&self, prefix: &str) -> String {
        let n = self.next_guid.get() + 1;
        self.next_guid.set(n);
        format!("{prefix}-{n}")
    }

    fn listing(
        &self,
        call: &'static str,
        pool: &RefCell<Vec<ElementSummary>>,
    ) -> Result<Vec<ElementSummary>, ClientError> {
        self.record(call);
        if self.fail_lists.get() {
            return Err(ClientError::Transport("connection refused".to_string()));
        }
        Ok(pool.borrow().clone())
    }
}

impl EgeriaClient for MockClient {
    fn create_glossary(
        &self,
        properties: &GlossaryProperties,
    ) -> Result<Option<String>, ClientError> {
        self.record("create_glossary");
        let guid = self.mint_guid("g");
        self.glossaries.borrow_mut().push(summary(
            &guid,
            &format!("Glossary::{}", properties.display_name),
            &properties.display_name,
        ));
        Ok(Some(guid))
    }

    fn update_glossary(
        &self,
        _guid: &str,
        _properties: &GlossaryProperties,
    ) -> Result<(), ClientError> {
        self.record("update_glossary");
        Ok(())
    }

    fn get_glossary_by_guid(
        &self,
        guid: &str,
        _output_format: processor::OutputFormat,
    ) -> Result<String, ClientError> {
        self.record("get_glossary_by_guid");
        Ok(format!("rendered glossary {guid}"))
    }

    fn list_glossaries(&self, _search: Option<&str>) -> Result<Vec<ElementSummary>, ClientError> {
        self.listing("list_glossaries", &self.glossaries)
    }

    fn create_category(
        &self,
        _glossary_guid: &str,
        properties: &CategoryProperties,
    ) -> Result<Option<String>, ClientError> {
        self.record("create_category");
        let guid = self.mint_guid("c");
        self.categories.borrow_mut().push(summary(
            &guid,
            &format!("Category::{}", properties.display_name),
            &properties.display_name,
        ));
        Ok(Some(guid))
    }

    fn update_category(
        &self,
        _guid: &str,
        _properties: &CategoryProperties,
    ) -> Result<(), ClientError> {
        self.record("update_category");
        Ok(())
    }

    fn get_category_by_guid(
        &self,
        guid: &str,
        _output_format: processor::OutputFormat,
    ) -> Result<String, ClientError> {
        self.record("get_category_by_guid");
        Ok(format!("rendered category {guid}"))
    }

    fn list_categories(&self, _search: Option<&str>) -> Result<Vec<ElementSummary>, ClientError> {
        self.listing("list_categories", &self.categories)
    }

    fn list_categories_for_glossary(
        &self,
        _glossary_guid: &str,
    ) -> Result<Vec<ElementSummary>, ClientError> {
        self.listing("list_categories_for_glossary", &self.categories)
    }

    fn get_parent_category(
        &self,
        _category_guid: &str,
    ) -> Result<Option<ElementSummary>, ClientError> {
        self.record("get_parent_category");
        Ok(self.current_parent.borrow().clone())
    }

    fn add_parent_category(&self, parent_guid: &str, _child_guid: &str) -> Result<(), ClientError> {
        self.record(format!("add_parent_category {parent_guid}"));
        Ok(())
    }

    fn remove_parent_category(
        &self,
        parent_guid: &str,
        _child_guid: &str,
    ) -> Result<(), ClientError> {
        self.record(format!("remove_parent_category {parent_guid}"));
        Ok(())
    }

    fn create_term(
        &self,
        _glossary_guid: &str,
        properties: &TermProperties,
    ) -> Result<Option<String>, ClientError> {
        self.record("create_term");
        let guid = self.mint_guid("t");
        self.terms.borrow_mut().push(summary(
            &guid,
            &format!("Term::{}", properties.display_name),
            &properties.display_name,
        ));
        Ok(Some(guid))
    }

    fn update_term(&self, _guid: &str, _properties: &TermProperties) -> Result<(), ClientError> {
        self.record("update_term");
        Ok(())
    }

    fn get_term_by_guid(
        &self,
        guid: &str,
        _output_format: processor::OutputFormat,
    ) -> Result<String, ClientError> {
        self.record("get_term_by_guid");
        Ok(format!("rendered term {guid}"))
    }

    fn list_terms(&self, _search: Option<&str>) -> Result<Vec<ElementSummary>, ClientError> {
        self.listing("list_terms", &self.terms)
    }

    fn list_terms_for_glossary(
        &self,
        _glossary_guid: &str,
    ) -> Result<Vec<ElementSummary>, ClientError> {
        self.listing("list_terms_for_glossary", &self.terms)
    }

    fn list_terms_for_category(
        &self,
        _category_guid: &str,
    ) -> Result<Vec<ElementSummary>, ClientError> {
        self.listing("list_terms_for_category", &self.terms)
    }

    fn get_categories_for_term(
        &self,
        _term_guid: &str,
    ) -> Result<Vec<ElementSummary>, ClientError> {
        self.record("get_categories_for_term");
        Ok(self.current_term_categories.borrow().clone())
    }

    fn add_term_to_category(
        &self,
        category_guid: &str,
        _term_guid: &str,
    ) -> Result<(), ClientError> {
        self.record(format!("add_term_to_category {category_guid}"));
        Ok(())
    }

    fn remove_term_from_category(
        &self,
        category_guid: &str,
        _term_guid: &str,
    ) -> Result<(), ClientError> {
        self.record(format!("remove_term_from_category {category_guid}"));
        Ok(())
    }

    fn get_term_aliases(&self, _term_guid: &str) -> Result<Vec<String>, ClientError> {
        self.record("get_term_aliases");
        Ok(self.current_term_aliases.borrow().clone())
    }

    fn add_term_alias(&self, _term_guid: &str, alias: &str) -> Result<(), ClientError> {
        self.record(format!("add_term_alias {alias}"));
        Ok(())
    }

    fn remove_term_alias(&self, _term_guid: &str, alias: &str) -> Result<(), ClientError> {
        self.record(format!("remove_term_alias {alias}"));
        Ok(())
    }

    fn create_term_relationship(
        &self,
        term1_guid: &str,
        term2_guid: &str,
        relationship_type: &str,
    ) -> Result<(), ClientError> {
        self.record("create_term_relationship");
        self.relationships.borrow_mut().push((
            term1_guid.to_string(),
            TermRelationship {
                end_guid: term2_guid.to_string(),
                relationship_type: relationship_type.to_string(),
            },
        ));
        Ok(())
    }

    fn get_term_relationships(
        &self,
        term_guid: &str,
    ) -> Result<Vec<TermRelationship>, ClientError> {
        self.record("get_term_relationships");
        Ok(self
            .relationships
            .borrow()
            .iter()
            .filter(|(from, _)| from == term_guid)
            .map(|(_, edge)| edge.clone())
            .collect())
    }

    fn list_projects(&self, _search: Option<&str>) -> Result<Vec<ElementSummary>, ClientError> {
        self.record("list_projects");
        Ok(Vec::new())
    }

    fn list_blueprints(&self, _search: Option<&str>) -> Result<Vec<ElementSummary>, ClientError> {
        self.record("list_blueprints");
        Ok(Vec::new())
    }

    fn list_components(&self, _search: Option<&str>) -> Result<Vec<ElementSummary>, ClientError> {
        self.record("list_components");
        Ok(Vec::new())
    }

    fn get_glossary_structure(
        &self,
        glossary_guid: &str,
        _output_format: processor::OutputFormat,
    ) -> Result<String, ClientError> {
        self.record("get_glossary_structure");
        Ok(format!("structure of {glossary_guid}"))
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn parse_doc(source: &str) -> CommandDocument {
    Parser::new(source.to_string(), 0)
        .parse()
        .expect("document failed to parse")
}

fn first_block(source: &str) -> CommandBlock {
    parse_doc(source)
        .blocks
        .into_iter()
        .find(|b| b.heading.is_some())
        .expect("no command block")
}

fn run(client: &MockClient, source: &str, directive: Directive) -> (String, Reporter) {
    let document = parse_doc(source);
    let mut reporter = Reporter::new(0);
    let mut sink = std::io::sink();
    let rewritten = process_document(client, &document, directive, &mut sink, &mut reporter)
        .expect("writing to a sink failed");
    (rewritten, reporter)
}

fn note_messages(reporter: &Reporter, level: NoteLevel) -> Vec<String> {
    reporter
        .notes()
        .iter()
        .filter(|n| n.level == level)
        .map(|n| n.message.clone())
        .collect()
}

// ---------------------------------------------------------------------------
// Identity resolution
// ---------------------------------------------------------------------------

#[test]
fn missing_name_is_invalid_for_every_action() {
    let client = MockClient::default();
    let block = first_block("# Create Term\n\n## Description\nNo name here.\n");

    for action in [
        ResolutionAction::Create,
        ResolutionAction::Update,
        ResolutionAction::ExistsRequired,
    ] {
        let mut cache = ElementCache::new();
        let mut reporter = Reporter::new(0);
        let resolved = resolve::resolve_element_identity(
            &client,
            &mut cache,
            "Term",
            &["Term Name"],
            &block,
            action,
            &mut reporter,
        );
        assert!(!resolved.valid);
        assert!(!resolved.exists);
        assert!(reporter.has_errors());
    }
}

#[test]
fn absent_element_is_valid_only_for_create() {
    let client = MockClient::default();
    let block = first_block("# Create Term\n\n## Term Name\nWidget\n");

    let mut cache = ElementCache::new();
    let mut reporter = Reporter::new(0);
    let resolved = resolve::resolve_element_identity(
        &client,
        &mut cache,
        "Term",
        &["Term Name"],
        &block,
        ResolutionAction::Create,
        &mut reporter,
    );
    assert!(resolved.valid);
    assert!(!resolved.exists);
    assert!(!reporter.has_errors());

    for action in [ResolutionAction::Update, ResolutionAction::ExistsRequired] {
        let mut cache = ElementCache::new();
        let mut reporter = Reporter::new(0);
        let resolved = resolve::resolve_element_identity(
            &client,
            &mut cache,
            "Term",
            &["Term Name"],
            &block,
            action,
            &mut reporter,
        );
        assert!(!resolved.valid);
        assert!(reporter.has_errors());
    }
}

#[test]
fn existing_element_is_valid_with_a_warning_on_create() {
    let client = MockClient::default().with_term("t-1", "Widget");
    let block = first_block("# Create Term\n\n## Term Name\nWidget\n");

    let mut cache = ElementCache::new();
    let mut reporter = Reporter::new(0);
    let resolved = resolve::resolve_element_identity(
        &client,
        &mut cache,
        "Term",
        &["Term Name"],
        &block,
        ResolutionAction::Create,
        &mut reporter,
    );
    assert!(resolved.valid);
    assert!(resolved.exists);
    assert_eq!(resolved.guid.as_deref(), Some("t-1"));
    assert_eq!(resolved.qualified_name.as_deref(), Some("Term::Widget"));
    assert_eq!(note_messages(&reporter, NoteLevel::Warning).len(), 1);

    let mut reporter = Reporter::new(0);
    let resolved = resolve::resolve_element_identity(
        &client,
        &mut cache,
        "Term",
        &["Term Name"],
        &block,
        ResolutionAction::Update,
        &mut reporter,
    );
    assert!(resolved.valid);
    assert!(resolved.exists);
    assert!(note_messages(&reporter, NoteLevel::Warning).is_empty());
}

#[test]
fn malformed_element_exists_but_is_invalid() {
    let client = MockClient::default();
    client.terms.borrow_mut().push(ElementSummary {
        guid: None,
        qualified_name: None,
        display_name: "Widget".to_string(),
    });
    let block = first_block("# Update Term\n\n## Term Name\nWidget\n");

    let mut cache = ElementCache::new();
    let mut reporter = Reporter::new(0);
    let resolved = resolve::resolve_element_identity(
        &client,
        &mut cache,
        "Term",
        &["Term Name"],
        &block,
        ResolutionAction::Update,
        &mut reporter,
    );
    assert!(!resolved.valid);
    assert!(resolved.exists);
    assert!(reporter.has_errors());
}

#[test]
fn backend_failure_never_looks_like_safe_to_create() {
    let client = MockClient::default();
    client.fail_lists.set(true);
    let block = first_block("# Create Term\n\n## Term Name\nWidget\n");

    let mut cache = ElementCache::new();
    let mut reporter = Reporter::new(0);
    let resolved = resolve::resolve_element_identity(
        &client,
        &mut cache,
        "Term",
        &["Term Name"],
        &block,
        ResolutionAction::Create,
        &mut reporter,
    );
    assert!(!resolved.valid);
    assert!(!resolved.exists);
    assert!(reporter.has_errors());
}

#[test]
fn cached_identity_wins_without_a_remote_call() {
    let client = MockClient::default();
    let mut cache = ElementCache::new();
    cache.update("Term::Widget", CachedElement::full("t-5", "Widget"));

    let mut reporter = Reporter::new(0);
    let lookup = resolve::find_element_by_name(&client, &mut cache, "Term", "Widget", &mut reporter);

    match lookup {
        Lookup::Found(summary) => {
            assert_eq!(summary.guid.as_deref(), Some("t-5"));
            assert_eq!(summary.qualified_name.as_deref(), Some("Term::Widget"));
        }
        other => panic!("expected Found, got {other:?}"),
    }
    assert_eq!(client.count("list_terms"), 0);
}

// ---------------------------------------------------------------------------
// Document processing
// ---------------------------------------------------------------------------

#[test]
fn create_term_happy_path_replaces_block_with_rendering() {
    let client = MockClient::default().with_glossary("g-1", "Core");
    let source = "\
# Create Term

## Term Name
Widget

## Glossary Name
Core

## Description
A reusable widget.
";
    let (rewritten, reporter) = run(&client, source, Directive::Process);

    assert_eq!(client.count("create_term"), 1);
    assert!(rewritten.contains("rendered term t-1"));
    assert!(!reporter.has_errors());
}

#[test]
fn create_collision_rewrites_to_update_without_creating() {
    let client = MockClient::default()
        .with_glossary("g-1", "Core")
        .with_term("t-9", "Widget");
    let source = "\
# Create Term

## Term Name
Widget

## Glossary Name
Core
";
    let (rewritten, reporter) = run(&client, source, Directive::Process);

    assert_eq!(client.count("create_term"), 0);
    assert!(rewritten.contains("# Update Term"));
    assert!(rewritten.contains("## Qualified Name\nTerm::Widget"));
    assert!(rewritten.contains("## GUID\nt-9"));
    // The collision is a warning, not an error.
    assert!(!reporter.has_errors());
    assert!(
        note_messages(&reporter, NoteLevel::Warning)
            .iter()
            .any(|m| m.contains("already exists"))
    );
}

#[test]
fn update_term_reconciles_categories_and_aliases_by_difference() {
    let client = MockClient::default()
        .with_glossary("g-1", "Core")
        .with_term("t-1", "Widget")
        .with_category("c-hw", "Hardware")
        .with_category("c-tools", "Tools")
        .with_category("c-docs", "Docs")
        .with_current_category("c-tools", "Tools")
        .with_current_category("c-hw", "Hardware")
        .with_current_alias("old")
        .with_current_alias("keep");
    let source = "\
# Update Term

## Term Name
Widget

## Glossary Name
Core

## Categories
Hardware, Docs

## Aliases
keep, new
";
    let (rewritten, reporter) = run(&client, source, Directive::Process);

    assert_eq!(client.count("update_term"), 1);
    // One edge call per differing membership; unchanged members untouched.
    assert_eq!(client.count("remove_term_from_category c-tools"), 1);
    assert_eq!(client.count("add_term_to_category c-docs"), 1);
    assert_eq!(client.count("remove_term_from_category c-hw"), 0);
    assert_eq!(client.count("add_term_to_category c-hw"), 0);
    assert_eq!(client.count("remove_term_alias old"), 1);
    assert_eq!(client.count("add_term_alias new"), 1);
    assert_eq!(client.count("remove_term_alias keep"), 0);
    assert_eq!(client.count("add_term_alias keep"), 0);
    assert!(rewritten.contains("rendered term t-1"));
    assert!(!reporter.has_errors());
}

#[test]
fn update_category_swaps_the_parent_when_it_differs() {
    let client = MockClient::default()
        .with_glossary("g-1", "Core")
        .with_category("c-child", "Child")
        .with_category("c-old", "OldParent")
        .with_category("c-new", "NewParent")
        .with_current_parent("c-old", "OldParent");
    let source = "\
# Update Category

## Category Name
Child

## Glossary Name
Core

## Parent Category
NewParent
";
    let (rewritten, reporter) = run(&client, source, Directive::Process);

    assert_eq!(client.count("update_category"), 1);
    assert_eq!(client.count("remove_parent_category c-old"), 1);
    assert_eq!(client.count("add_parent_category c-new"), 1);
    assert!(rewritten.contains("rendered category c-child"));
    assert!(!reporter.has_errors());
}

#[test]
fn update_category_leaves_a_matching_parent_alone() {
    let client = MockClient::default()
        .with_glossary("g-1", "Core")
        .with_category("c-child", "Child")
        .with_category("c-old", "OldParent")
        .with_current_parent("c-old", "OldParent");
    let source = "\
# Update Category

## Category Name
Child

## Glossary Name
Core

## Parent Category
OldParent
";
    let (_, reporter) = run(&client, source, Directive::Process);

    assert_eq!(client.count("update_category"), 1);
    assert_eq!(client.count("remove_parent_category c-old"), 0);
    assert_eq!(client.count("add_parent_category c-old"), 0);
    assert!(!reporter.has_errors());
}

#[test]
fn duplicate_relationship_is_a_warning_and_no_write() {
    let client = MockClient::default()
        .with_term("t-1", "Alpha")
        .with_term("t-2", "Beta")
        .with_relationship("t-1", "t-2", "Synonym");
    let source = "\
# Create Term-Term Relationship

## Term 1
Alpha

## Term 2
Beta

## Relationship Type
synonym
";
    let (_, reporter) = run(&client, source, Directive::Process);

    assert_eq!(client.count("create_term_relationship"), 0);
    assert!(!reporter.has_errors());
    assert!(
        note_messages(&reporter, NoteLevel::Warning)
            .iter()
            .any(|m| m.contains("already exists"))
    );
}

#[test]
fn new_relationship_is_created_once() {
    let client = MockClient::default()
        .with_term("t-1", "Alpha")
        .with_term("t-2", "Beta");
    let source = "\
# Create Term-Term Relationship

## Term 1
Alpha

## Term 2
Beta

## Relationship Type
Antonym
";
    let (_, reporter) = run(&client, source, Directive::Process);

    assert_eq!(client.count("create_term_relationship"), 1);
    assert!(!reporter.has_errors());
}

#[test]
fn unknown_output_format_warns_and_falls_back() {
    let client = MockClient::default().with_glossary("g-1", "Core");
    let source = "# List Glossaries\n\n## Output Format\nbogus\n";
    let (rewritten, reporter) = run(&client, source, Directive::Process);

    assert!(
        note_messages(&reporter, NoteLevel::Warning)
            .iter()
            .any(|m| m.contains("unrecognized output format"))
    );
    // MD fallback renders a table.
    assert!(rewritten.contains("| Core |"));
}

#[test]
fn display_directive_makes_no_remote_calls() {
    let client = MockClient::default().with_glossary("g-1", "Core");
    let source = "\
# Create Term

## Term Name
Widget

## Glossary Name
Core
";
    let (rewritten, _) = run(&client, source, Directive::Display);

    // Display only echoes: no remote call of any kind happens.
    assert!(client.calls.borrow().is_empty());
    // The document passes through unchanged in structure.
    assert!(rewritten.contains("# Create Term"));
}

#[test]
fn validate_directive_reports_a_verdict_per_command() {
    let client = MockClient::default().with_glossary("g-1", "Core");
    let source = "\
# Create Term

## Term Name
Widget

## Glossary Name
Core

# Update Term

## Term Name
Nonexistent

## Glossary Name
Core
";
    let (_, reporter) = run(&client, source, Directive::Validate);

    let verdicts = note_messages(&reporter, NoteLevel::Always);
    assert_eq!(verdicts.len(), 2);
    assert!(verdicts[0].contains("ok"));
    assert!(verdicts[1].contains("failed"));
    assert_eq!(client.count("create_term"), 0);
    assert_eq!(client.count("update_term"), 0);
}

#[test]
fn later_commands_see_elements_created_earlier_in_the_run() {
    let client = MockClient::default();
    let source = "\
# Create Glossary

## Glossary Name
Core

## Language
English

# Create Term

## Term Name
Widget

## Glossary Name
Core
";
    let (rewritten, reporter) = run(&client, source, Directive::Process);

    assert_eq!(client.count("create_glossary"), 1);
    assert_eq!(client.count("create_term"), 1);
    assert!(!reporter.has_errors());
    assert!(rewritten.contains("rendered glossary g-1"));
    assert!(rewritten.contains("rendered term t-2"));
    // The only remote glossary search is the first block's own existence
    // check; the term block resolves "Core" from the session cache.
    assert_eq!(client.count("list_glossaries"), 1);
}

#[test]
fn unrecognized_commands_pass_through() {
    let client = MockClient::default();
    let source = "# Frobnicate Widget\n\n## Widget Name\nThing\n";
    let (rewritten, reporter) = run(&client, source, Directive::Process);

    assert!(rewritten.contains("# Frobnicate Widget"));
    assert!(
        note_messages(&reporter, NoteLevel::Warning)
            .iter()
            .any(|m| m.contains("unrecognized command"))
    );
}

#[test]
fn glossary_structure_renders_via_the_remote() {
    let client = MockClient::default().with_glossary("g-1", "Core");
    let source = "# List Glossary Structure\n\n## Glossary Name\nCore\n";
    let (rewritten, reporter) = run(&client, source, Directive::Process);

    assert_eq!(client.count("get_glossary_structure"), 1);
    assert!(rewritten.contains("structure of g-1"));
    assert!(!reporter.has_errors());
}

#[test]
fn processes_a_document_read_from_disk() {
    let client = MockClient::default().with_glossary("g-1", "Core");
    let mut file = tempfile::NamedTempFile::new().expect("tempfile");
    write!(
        file,
        "# Create Term\n\n## Term Name\nWidget\n\n## Glossary Name\nCore\n"
    )
    .expect("write");

    let source = std::fs::read_to_string(file.path()).expect("read back");
    let (rewritten, reporter) = run(&client, &source, Directive::Process);

    assert_eq!(client.count("create_term"), 1);
    assert!(rewritten.contains("rendered term"));
    assert!(!reporter.has_errors());
}

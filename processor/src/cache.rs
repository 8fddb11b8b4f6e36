use std::collections::HashMap;

/// Cached identity fields for one element. Either field may be absent; the
/// merge rules in [`ElementCache::update`] let callers record a guid now and
/// a display name later (or vice versa) without clobbering the other.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CachedElement {
    pub guid: Option<String>,
    pub display_name: Option<String>,
}

impl CachedElement {
    pub fn with_guid(guid: impl Into<String>) -> Self {
        CachedElement {
            guid: Some(guid.into()),
            display_name: None,
        }
    }

    pub fn full(guid: impl Into<String>, display_name: impl Into<String>) -> Self {
        CachedElement {
            guid: Some(guid.into()),
            display_name: Some(display_name.into()),
        }
    }
}

/// Session cache of resolved element identities, keyed by qualified name.
///
/// Written after every successful remote lookup, create, and update, so
/// later commands in the same run can reference elements created earlier
/// without another round trip. Entries are never evicted within a run. One
/// cache per processing run; callers thread it explicitly through every
/// resolution rather than sharing process-wide state.
#[derive(Debug, Default)]
pub struct ElementCache {
    entries: HashMap<String, CachedElement>,
}

impl ElementCache {
    pub fn new() -> Self {
        ElementCache::default()
    }

    pub fn get(&self, qualified_name: &str) -> Option<&CachedElement> {
        self.entries.get(qualified_name)
    }

    /// Upsert with merge: fields left `None` in `fields` never clobber
    /// values already stored under the key.
    pub fn update(&mut self, qualified_name: &str, fields: CachedElement) {
        let entry = self.entries.entry(qualified_name.to_string()).or_default();
        if fields.guid.is_some() {
            entry.guid = fields.guid;
        }
        if fields.display_name.is_some() {
            entry.display_name = fields.display_name;
        }
    }

    /// Scan for an entry whose display name equals `name` case-insensitively.
    ///
    /// Entries whose qualified name mentions `element_type` are preferred:
    /// qualified names embed their type family, so the substring check is a
    /// cheap type filter. An entry matching on display name alone is still
    /// accepted when no type-qualified entry matches.
    pub fn find_display_name(
        &self,
        element_type: &str,
        name: &str,
    ) -> Option<(&String, &CachedElement)> {
        let mut untyped = None;
        for (qualified_name, entry) in &self.entries {
            let matches = entry
                .display_name
                .as_deref()
                .is_some_and(|d| d.eq_ignore_ascii_case(name.trim()));
            if !matches {
                continue;
            }
            if qualified_name.contains(element_type) {
                return Some((qualified_name, entry));
            }
            untyped.get_or_insert((qualified_name, entry));
        }
        untyped
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn update_merges_without_clobbering() {
        let mut cache = ElementCache::new();
        cache.update(
            "Term::Widget",
            CachedElement {
                guid: Some("g-1".into()),
                display_name: None,
            },
        );
        cache.update(
            "Term::Widget",
            CachedElement {
                guid: None,
                display_name: Some("Widget".into()),
            },
        );

        let entry = cache.get("Term::Widget").unwrap();
        assert_eq!(entry.guid.as_deref(), Some("g-1"));
        assert_eq!(entry.display_name.as_deref(), Some("Widget"));
    }

    #[test]
    fn update_overwrites_present_fields() {
        let mut cache = ElementCache::new();
        cache.update("Term::Widget", CachedElement::full("g-1", "Widget"));
        cache.update("Term::Widget", CachedElement::with_guid("g-2"));

        let entry = cache.get("Term::Widget").unwrap();
        assert_eq!(entry.guid.as_deref(), Some("g-2"));
        assert_eq!(entry.display_name.as_deref(), Some("Widget"));
    }

    #[test]
    fn display_name_scan_is_case_insensitive() {
        let mut cache = ElementCache::new();
        cache.update("Term::Widget", CachedElement::full("g-1", "Widget"));

        let (qualified_name, entry) = cache.find_display_name("Term", "widget").unwrap();
        assert_eq!(qualified_name, "Term::Widget");
        assert_eq!(entry.guid.as_deref(), Some("g-1"));
    }

    #[test]
    fn typed_entry_preferred_over_untyped() {
        let mut cache = ElementCache::new();
        cache.update("X::Foo", CachedElement::full("g-untyped", "Foo"));
        cache.update("Term::Foo", CachedElement::full("g-typed", "Foo"));

        let (qualified_name, _) = cache.find_display_name("Term", "Foo").unwrap();
        assert_eq!(qualified_name, "Term::Foo");
    }

    #[test]
    fn untyped_entry_accepted_as_fallback() {
        let mut cache = ElementCache::new();
        cache.update("X::Foo", CachedElement::full("g-1", "Foo"));

        let (qualified_name, entry) = cache.find_display_name("Term", "Foo").unwrap();
        assert_eq!(qualified_name, "X::Foo");
        assert_eq!(entry.guid.as_deref(), Some("g-1"));
    }
}

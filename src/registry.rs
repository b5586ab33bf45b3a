//! Ordered schema collection and section-to-schema resolution.
//!
//! Resolution is **first match wins** in registration order. When two
//! schemas both match a section name, the one registered first is used,
//! even if the later one has a more specific pattern. Register narrow
//! schemas before broad ones.

use crate::schema::{SectionSchema, section_matches};

#[derive(Debug, Clone)]
struct Entry {
    schema: SectionSchema,
    primary: bool,
}

/// Schemas in priority order.
#[derive(Debug, Clone, Default)]
pub struct SchemaRegistry {
    entries: Vec<Entry>,
}

impl SchemaRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, schema: SectionSchema) {
        self.entries.push(Entry {
            schema,
            primary: false,
        });
    }

    /// Register a schema whose sections merge into the root storage.
    pub fn register_primary(&mut self, schema: SectionSchema) {
        self.entries.push(Entry {
            schema,
            primary: true,
        });
    }

    pub fn schemas(&self) -> impl Iterator<Item = &SectionSchema> {
        self.entries.iter().map(|e| &e.schema)
    }

    /// The first schema matching `section_name`, or `None`.
    ///
    /// `None` is not an error here; the reader decides whether an unmatched
    /// section is fatal.
    pub fn select_config_schema_for(&self, section_name: &str) -> Option<&SectionSchema> {
        self.select_entry(section_name).map(|e| &e.schema)
    }

    /// True if the schema governing `section_name` was registered as primary.
    pub fn is_primary_section(&self, section_name: &str) -> bool {
        self.select_entry(section_name).is_some_and(|e| e.primary)
    }

    /// Every pattern of every schema, flattened in registration order.
    pub fn collect_config_sections(&self) -> Vec<String> {
        collect_config_sections_from_schemas(self.schemas())
    }

    fn select_entry(&self, section_name: &str) -> Option<&Entry> {
        self.entries.iter().find(|e| e.schema.matches(section_name))
    }
}

/// Flatten the patterns of `schemas`, preserving order and duplicates.
pub fn collect_config_sections_from_schemas<'a, I>(schemas: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a SectionSchema>,
{
    schemas
        .into_iter()
        .flat_map(|s| s.section_names())
        .map(str::to_string)
        .collect()
}

/// Section names that match any of `patterns`, in input order. Each section
/// is selected at most once.
pub fn select_config_sections<'a, S, P>(section_names: S, patterns: &[P]) -> Vec<&'a str>
where
    S: IntoIterator<Item = &'a str>,
    P: AsRef<str>,
{
    section_names
        .into_iter()
        .filter(|name| patterns.iter().any(|p| section_matches(name, p.as_ref())))
        .collect()
}

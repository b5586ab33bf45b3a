//! Storage routing: where a section's parsed values land in the result.
//!
//! The primary section merges into the root table. Every other section gets
//! a nested table under a key derived by [`StorageNaming`]; a derived key
//! of `""` also means the root. Nested tables are created on first use and
//! updated in place afterwards, so several sections (or several files) can
//! feed one logical table.

use std::fmt;
use std::sync::Arc;

use toml::{Table, Value};

use crate::error::ConfigFileError;

type NamingFn = dyn Fn(&str) -> Option<String> + Send + Sync;

/// How a non-primary section name maps to its storage key.
#[derive(Clone, Default)]
pub enum StorageNaming {
    /// Use the section name verbatim: `[hello.foo]` -> `"hello.foo"`.
    #[default]
    SectionName,
    /// Strip a leading prefix: with `"hello.more."`, `[hello.more.alice]`
    /// -> `"alice"`. Sections without the prefix keep their full name.
    StripPrefix(String),
    /// Caller-defined. Returning `None` fails the read with
    /// [`ConfigFileError::UnnamedStorage`].
    Custom(Arc<NamingFn>),
}

impl StorageNaming {
    pub fn custom<F>(f: F) -> Self
    where
        F: Fn(&str) -> Option<String> + Send + Sync + 'static,
    {
        StorageNaming::Custom(Arc::new(f))
    }

    /// Derive the storage key for `section_name`.
    pub fn storage_name_for(&self, section_name: &str) -> Option<String> {
        match self {
            StorageNaming::SectionName => Some(section_name.to_string()),
            StorageNaming::StripPrefix(prefix) => Some(
                section_name
                    .strip_prefix(prefix.as_str())
                    .unwrap_or(section_name)
                    .to_string(),
            ),
            StorageNaming::Custom(f) => f(section_name),
        }
    }
}

impl fmt::Debug for StorageNaming {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageNaming::SectionName => f.write_str("SectionName"),
            StorageNaming::StripPrefix(p) => f.debug_tuple("StripPrefix").field(p).finish(),
            StorageNaming::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

/// Routes sections to their target table.
#[derive(Debug, Clone, Default)]
pub struct StorageRouter {
    primary_section: Option<String>,
    naming: StorageNaming,
}

impl StorageRouter {
    pub fn new(primary_section: Option<String>, naming: StorageNaming) -> Self {
        Self {
            primary_section,
            naming,
        }
    }

    pub fn primary_section(&self) -> Option<&str> {
        self.primary_section.as_deref()
    }

    /// Storage key for `section_name`; `""` means the root table.
    pub fn get_storage_name_for(&self, section_name: &str) -> Result<String, ConfigFileError> {
        if self.primary_section() == Some(section_name) {
            return Ok(String::new());
        }
        self.naming
            .storage_name_for(section_name)
            .ok_or_else(|| ConfigFileError::UnnamedStorage {
                section: section_name.to_string(),
            })
    }

    /// The table that `section_name`'s values merge into.
    ///
    /// Inserts an empty nested table on first access. Fails with
    /// [`ConfigFileError::StorageConflict`] if the key already holds a
    /// non-table value.
    pub fn select_storage_for<'a>(
        &self,
        section_name: &str,
        storage: &'a mut Table,
    ) -> Result<&'a mut Table, ConfigFileError> {
        let key = self.get_storage_name_for(section_name)?;
        nested_table(storage, key)
    }
}

/// Root table for `""`, otherwise the (possibly new) nested table at `key`.
pub(crate) fn nested_table(storage: &mut Table, key: String) -> Result<&mut Table, ConfigFileError> {
    if key.is_empty() {
        return Ok(storage);
    }
    let conflict = ConfigFileError::StorageConflict { key: key.clone() };
    storage
        .entry(key)
        .or_insert_with(|| Value::Table(Table::new()))
        .as_table_mut()
        .ok_or(conflict)
}

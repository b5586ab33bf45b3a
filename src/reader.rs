//! The config file reader: discovery, section selection, schema resolution,
//! parsing, and storage routing in one call.
//!
//! ```ignore
//! let reader = ConfigFileReader::builder()
//!     .config_files(["hello.ini", "hello.cfg"])
//!     .schema(hello)
//!     .schema(hello_more)
//!     .storage_naming(StorageNaming::StripPrefix("hello.more.".into()))
//!     .build()?;
//!
//! let defaults = reader.read_config()?;
//! ```
//!
//! # Pipeline
//!
//! 1. Generate existing config files from basenames and search path
//!    (lowest precedence first) and merge them into one
//!    [`IniDocument`](crate::IniDocument).
//! 2. Take the sections of interest: the explicit list, or every pattern of
//!    every schema in registration order.
//! 3. For each section in the files that matches one of those patterns,
//!    resolve its schema (first match wins). A selected section without a
//!    schema fails the read with [`ConfigFileError::UnmappedSection`].
//! 4. Parse the declared params, then merge them into the section's
//!    storage: the root for the primary section or a primary schema, a
//!    nested table otherwise.
//!
//! The primary section is the first entry of the sections of interest.
//! Every read starts from an empty table; a failed read returns no partial
//! result.

use std::path::PathBuf;

use serde::de::DeserializeOwned;
use toml::{Table, Value};

use crate::error::ConfigFileError;
use crate::file;
use crate::ini::SectionSource;
use crate::merge::merge_into;
use crate::registry::{
    SchemaRegistry, collect_config_sections_from_schemas, select_config_sections,
};
use crate::schema::{SectionPattern, SectionSchema};
use crate::storage::{StorageNaming, StorageRouter};
use crate::types::SearchPath;

/// Builder for a [`ConfigFileReader`].
#[derive(Debug, Clone, Default)]
pub struct ConfigFileReaderBuilder {
    config_files: Vec<PathBuf>,
    searchpath: Option<Vec<SearchPath>>,
    registry: SchemaRegistry,
    config_sections: Option<Vec<String>>,
    storage_naming: StorageNaming,
}

impl ConfigFileReaderBuilder {
    /// Config file basenames, most important first.
    pub fn config_files<I, P>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        self.config_files = names.into_iter().map(Into::into).collect();
        self
    }

    /// Append a basename (lower precedence than those already listed).
    pub fn add_config_file<P: Into<PathBuf>>(mut self, name: P) -> Self {
        self.config_files.push(name.into());
        self
    }

    /// Replace the search path (default: `[SearchPath::Cwd]`).
    ///
    /// Directories are listed **most important first**.
    pub fn searchpath(mut self, paths: Vec<SearchPath>) -> Self {
        self.searchpath = Some(paths);
        self
    }

    /// Append a search directory without replacing the default.
    /// If no paths have been set yet, starts from `[Cwd]`.
    pub fn add_search_path(mut self, path: SearchPath) -> Self {
        self.searchpath
            .get_or_insert_with(|| vec![SearchPath::Cwd])
            .push(path);
        self
    }

    /// Register a schema. Registration order is resolution priority.
    pub fn schema(mut self, schema: SectionSchema) -> Self {
        self.registry.register(schema);
        self
    }

    pub fn schemas<I: IntoIterator<Item = SectionSchema>>(mut self, schemas: I) -> Self {
        for schema in schemas {
            self.registry.register(schema);
        }
        self
    }

    /// Register a schema whose sections always merge into the root table.
    pub fn primary_schema(mut self, schema: SectionSchema) -> Self {
        self.registry.register_primary(schema);
        self
    }

    /// Process only sections matching these patterns. The first entry is
    /// the primary section.
    pub fn config_sections<I, S>(mut self, patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config_sections = Some(patterns.into_iter().map(Into::into).collect());
        self
    }

    pub fn storage_naming(mut self, naming: StorageNaming) -> Self {
        self.storage_naming = naming;
        self
    }

    /// Freeze the reader. Fails with [`ConfigFileError::BadPattern`] if an
    /// explicit section pattern is invalid.
    pub fn build(self) -> Result<ConfigFileReader, ConfigFileError> {
        for pattern in self.config_sections.iter().flatten() {
            SectionPattern::new(pattern)?;
        }
        Ok(ConfigFileReader {
            config_files: self.config_files,
            searchpath: self
                .searchpath
                .unwrap_or_else(|| vec![SearchPath::Cwd]),
            registry: self.registry,
            config_sections: self.config_sections,
            storage_naming: self.storage_naming,
        })
    }
}

/// Reads schema-typed defaults from INI config files.
#[derive(Debug, Clone)]
pub struct ConfigFileReader {
    config_files: Vec<PathBuf>,
    searchpath: Vec<SearchPath>,
    registry: SchemaRegistry,
    config_sections: Option<Vec<String>>,
    storage_naming: StorageNaming,
}

impl ConfigFileReader {
    pub fn builder() -> ConfigFileReaderBuilder {
        ConfigFileReaderBuilder::default()
    }

    pub fn config_files(&self) -> &[PathBuf] {
        &self.config_files
    }

    pub fn searchpath(&self) -> &[SearchPath] {
        &self.searchpath
    }

    pub fn registry(&self) -> &SchemaRegistry {
        &self.registry
    }

    /// Every pattern of every registered schema, in registration order.
    pub fn collect_config_sections_from_schemas(&self) -> Vec<String> {
        collect_config_sections_from_schemas(self.registry.schemas())
    }

    /// The effective sections of interest.
    pub fn config_sections(&self) -> Vec<String> {
        match &self.config_sections {
            Some(sections) => sections.clone(),
            None => self.collect_config_sections_from_schemas(),
        }
    }

    pub fn select_config_schema_for(&self, section_name: &str) -> Option<&SectionSchema> {
        self.registry.select_config_schema_for(section_name)
    }

    /// The router for this reader's primary section and naming policy.
    pub fn storage_router(&self) -> StorageRouter {
        StorageRouter::new(
            self.config_sections().into_iter().next(),
            self.storage_naming.clone(),
        )
    }

    /// The table that `section_name`'s values merge into.
    pub fn select_storage_for<'a>(
        &self,
        section_name: &str,
        storage: &'a mut Table,
    ) -> Result<&'a mut Table, ConfigFileError> {
        select_storage(&self.registry, &self.storage_router(), section_name, storage)
    }

    /// Existing config files, lowest precedence first.
    pub fn config_file_names(&self) -> Vec<PathBuf> {
        let dirs = file::expand_search_paths(&self.searchpath);
        file::generate_configfile_names(&self.config_files, Some(dirs.as_slice())).collect()
    }

    /// Read all config files and return the merged defaults table.
    pub fn read_config(&self) -> Result<Table, ConfigFileError> {
        let paths = self.config_file_names();
        let files = file::load_config_files(&paths)?;
        let document = file::parse_config_files(&files)?;
        self.read_config_from(&document)
    }

    /// Run the section pipeline on already parsed content. No I/O.
    pub fn read_config_from<S: SectionSource + ?Sized>(
        &self,
        source: &S,
    ) -> Result<Table, ConfigFileError> {
        let sections = self.config_sections();
        let router = StorageRouter::new(sections.first().cloned(), self.storage_naming.clone());
        let mut storage = Table::new();

        let names = source.section_names();
        let selected = select_config_sections(names.iter().copied(), sections.as_slice());
        log::trace!("sections {names:?}, selected {selected:?}");

        for section in selected {
            let schema = self.registry.select_config_schema_for(section).ok_or_else(|| {
                ConfigFileError::UnmappedSection {
                    section: section.to_string(),
                }
            })?;
            let values = parse_config_section(source, section, schema)?;
            let target = select_storage(&self.registry, &router, section, &mut storage)?;
            merge_into(target, values);
        }

        Ok(storage)
    }

    /// Read config files and deserialize the result into `T`.
    pub fn read_config_as<T: DeserializeOwned>(&self) -> Result<T, ConfigFileError> {
        let table = self.read_config()?;
        Ok(Value::Table(table).try_into()?)
    }
}

fn select_storage<'a>(
    registry: &SchemaRegistry,
    router: &StorageRouter,
    section_name: &str,
    storage: &'a mut Table,
) -> Result<&'a mut Table, ConfigFileError> {
    if registry.is_primary_section(section_name) {
        return Ok(storage);
    }
    router.select_storage_for(section_name, storage)
}

/// Parse one section with its schema.
///
/// Each declared key present in the section is converted; an absent key
/// falls back to the param's default, or is left out. Values are stored
/// under the param's bound name. A conversion failure aborts with
/// [`ConfigFileError::BadParameter`].
pub fn parse_config_section<S: SectionSource + ?Sized>(
    source: &S,
    section: &str,
    schema: &SectionSchema,
) -> Result<Table, ConfigFileError> {
    let mut values = Table::new();
    for (key, param) in schema.params() {
        let value = match source.get(section, key) {
            Some(raw) => param
                .parse(raw)
                .map_err(|e| ConfigFileError::BadParameter {
                    section: section.to_string(),
                    param: key.to_string(),
                    value: raw.to_string(),
                    reason: e.to_string(),
                })?,
            None => match param.default_value() {
                Some(default) => default.clone(),
                None => continue,
            },
        };
        log::debug!("[{section}] {key} = {value}");
        values.insert(param.name().unwrap_or(key).to_string(), value);
    }
    Ok(values)
}

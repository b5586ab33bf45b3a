//! Schema-driven INI configuration files as defaults for command line apps.
//!
//! Clapini finds config files by basename across a list of search
//! directories, picks the sections you care about, converts their values
//! with per-section schemas, and hands back one merged table ready to be
//! used as defaults for a CLI.
//!
//! ```ignore
//! let hello = SectionSchema::builder("Hello")
//!     .matches_section("hello")
//!     .param("name", Param::string())
//!     .param("number", Param::integer().default(42))
//!     .build()?;
//!
//! let reader = ConfigFileReader::builder()
//!     .config_files(["hello.ini", "hello.cfg"])
//!     .schema(hello)
//!     .build()?;
//!
//! let defaults = reader.read_config()?;
//! ```
//!
//! # Precedence
//!
//! Both config file basenames and search directories are listed **most
//! important first**. Every existing file is read, and values from more
//! important files override less important ones key by key:
//!
//! ```text
//! searchpath = [., config/profile]      basenames = [hello.ini, hello.cfg]
//!
//! ./hello.ini                 wins
//! ./hello.cfg
//! config/profile/hello.ini
//! config/profile/hello.cfg    loses
//! ```
//!
//! Missing directories and files are skipped.
//!
//! # Sections and schemas
//!
//! A [`SectionSchema`] declares the section name patterns it governs and the
//! typed parameters it reads. Patterns are shell-style wildcards (`*`, `?`,
//! `[...]`), matched case-sensitively against the whole section name.
//!
//! The sections of interest are either listed explicitly with
//! [`config_sections()`](ConfigFileReaderBuilder::config_sections) or derived
//! from every registered schema's patterns. A file section that matches one
//! of them must be governed by a schema, or the read fails with
//! [`ConfigFileError::UnmappedSection`]. When several schemas match a
//! section, the first registered one wins.
//!
//! Undeclared keys in a section are ignored. A declared key that is missing
//! falls back to the param's default, if it has one.
//!
//! # Result layout
//!
//! The first section of interest is the primary section: its values land at
//! the top level of the result, as do values from schemas registered with
//! [`primary_schema()`](ConfigFileReaderBuilder::primary_schema). Every other
//! section gets a nested table keyed by [`StorageNaming`]:
//!
//! ```text
//! [hello]                 name = "Alice"
//! name = Alice      ->    [foo]
//! [hello.more.foo]        numbers = [1, 2, 3]
//! numbers = 1 2 3
//! ```
//!
//! (with `StorageNaming::StripPrefix("hello.more.")`).
//!
//! # Clap adapter
//!
//! With the `clap` feature (on by default), [`apply_default_map`] installs a
//! result table as argument defaults on a `clap::Command`, and
//! [`apply_schema_help`] uses param help texts for args without help. Without it the
//! crate has no CLI framework dependency:
//!
//! ```toml
//! clapini = { version = "...", default-features = false }
//! ```
//!
//! # Error handling
//!
//! All fallible operations return [`ConfigFileError`]. A failed read returns
//! no partial result. With the `rich-errors` feature the error type also
//! implements `miette::Diagnostic`.

pub mod error;
pub mod types;

mod convert;
mod file;
mod ini;
pub(crate) mod merge;
mod param;
mod reader;
mod registry;
mod schema;
mod storage;

#[cfg(feature = "clap")]
mod cli;

#[cfg(feature = "clap")]
pub use cli::{apply_default_map, apply_schema_help};
pub use convert::{ParamType, ValueConverter};
pub use error::{ConfigFileError, ConversionError};
pub use file::{generate_configfile_names, resolve_search_path};
pub use ini::{IniDocument, SectionSource};
pub use param::Param;
pub use reader::{ConfigFileReader, ConfigFileReaderBuilder, parse_config_section};
pub use registry::{SchemaRegistry, collect_config_sections_from_schemas, select_config_sections};
pub use schema::{SchemaBuilder, SchemaNamespace, SectionPattern, SectionSchema, section_matches};
pub use storage::{StorageNaming, StorageRouter};
pub use types::SearchPath;

//! INI section source.
//!
//! The reader only needs two things from a parsed config file: the section
//! names, and the raw text of a key inside a section. [`SectionSource`]
//! captures that; [`IniDocument`] is the built-in implementation.
//!
//! Syntax follows the common `configparser` conventions:
//!
//! - `[section]` headers; every key belongs to a section. The header name
//!   runs to the last `]` on the line, anything after it is ignored.
//! - `[DEFAULT]` holds fallback values for every other section. It is not
//!   reported as a section itself.
//! - `key = value` or `key: value`, split at the first delimiter. Keys are
//!   lowercased when parsed and when looked up; keys and values are trimmed.
//! - Lines starting with `#` or `;` are comments. There are no inline
//!   comments: `name = Bob  # note` keeps the `# note`.
//! - A line indented deeper than its key continues the previous value and is
//!   joined with a newline, which is how multi-value params span lines.
//!
//! When several files are merged, later files win per key and section order
//! is first appearance.

use std::path::Path;

use crate::error::ConfigFileError;

/// Minimal read access to sectioned key/value text.
pub trait SectionSource {
    /// Section names, in file order.
    fn section_names(&self) -> Vec<&str>;

    /// Raw value of `key` in `section`, if present. `key` is normalised the
    /// same way keys are when the source is parsed.
    fn get(&self, section: &str, key: &str) -> Option<&str>;
}

#[derive(Debug, Clone, Default, PartialEq)]
struct IniSection {
    name: String,
    entries: Vec<(String, String)>,
}

impl IniSection {
    fn lookup(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    fn set(&mut self, key: String, value: String) {
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key, value)),
        }
    }
}

const DEFAULT_SECTION: &str = "DEFAULT";

#[derive(Debug, Clone, Copy)]
enum Slot {
    Defaults,
    Section(usize),
}

/// Parsed INI content from one or more files.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IniDocument {
    defaults: IniSection,
    sections: Vec<IniSection>,
}

impl IniDocument {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse INI text. `path` is only used in error messages.
    pub fn parse(content: &str, path: &Path) -> Result<Self, ConfigFileError> {
        let mut doc = IniDocument::new();
        let mut current: Option<Slot> = None;
        // (key, indent of the key line) for the value being continued
        let mut open_value: Option<(String, usize)> = None;

        for (i, line) in content.lines().enumerate() {
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') || trimmed.starts_with(';') {
                continue;
            }
            let indent = line.len() - line.trim_start().len();

            if let (Some(slot), Some((key, key_indent))) = (current, &open_value)
                && indent > *key_indent
            {
                let section = doc.slot_mut(slot);
                if let Some(entry) = section.entries.iter_mut().find(|(k, _)| k == key) {
                    if !entry.1.is_empty() {
                        entry.1.push('\n');
                    }
                    entry.1.push_str(trimmed);
                }
                continue;
            }

            if let Some(header) = section_header(trimmed) {
                let name = header.trim();
                if name.is_empty() {
                    return Err(parse_error(path, i, "empty section name"));
                }
                current = Some(doc.slot_for(name));
                open_value = None;
                continue;
            }

            let Some(slot) = current else {
                return Err(parse_error(path, i, "key outside of any [section]"));
            };
            let Some(pos) = trimmed.find(['=', ':']) else {
                return Err(parse_error(path, i, "expected 'key = value'"));
            };
            let key = trimmed[..pos].trim().to_lowercase();
            if key.is_empty() {
                return Err(parse_error(path, i, "empty key"));
            }
            let value = trimmed[pos + 1..].trim().to_string();
            doc.slot_mut(slot).set(key.clone(), value);
            open_value = Some((key, indent));
        }

        Ok(doc)
    }

    /// Overlay `other` on top of `self`: its keys win, new sections append.
    pub fn merge(&mut self, other: IniDocument) {
        for (key, value) in other.defaults.entries {
            self.defaults.set(key, value);
        }
        for section in other.sections {
            let idx = self.section_index(&section.name);
            for (key, value) in section.entries {
                self.sections[idx].set(key, value);
            }
        }
    }

    /// True for sections present in the file. `DEFAULT` is not a section.
    pub fn has_section(&self, name: &str) -> bool {
        self.find(name).is_some()
    }

    /// Keys of `section` in file order, followed by inherited `DEFAULT` keys.
    pub fn keys(&self, section: &str) -> Vec<&str> {
        let Some(found) = self.find(section) else {
            return Vec::new();
        };
        let own = found.entries.iter().map(|(k, _)| k.as_str());
        let inherited = self
            .defaults
            .entries
            .iter()
            .map(|(k, _)| k.as_str())
            .filter(|k| found.lookup(k).is_none());
        own.chain(inherited).collect()
    }

    /// Values of the `[DEFAULT]` section.
    pub fn defaults(&self) -> impl Iterator<Item = (&str, &str)> {
        self.defaults
            .entries
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
    }

    fn find(&self, name: &str) -> Option<&IniSection> {
        self.sections.iter().find(|s| s.name == name)
    }

    fn slot_for(&mut self, name: &str) -> Slot {
        if name == DEFAULT_SECTION {
            Slot::Defaults
        } else {
            Slot::Section(self.section_index(name))
        }
    }

    fn slot_mut(&mut self, slot: Slot) -> &mut IniSection {
        match slot {
            Slot::Defaults => &mut self.defaults,
            Slot::Section(idx) => &mut self.sections[idx],
        }
    }

    fn section_index(&mut self, name: &str) -> usize {
        match self.sections.iter().position(|s| s.name == name) {
            Some(idx) => idx,
            None => {
                self.sections.push(IniSection {
                    name: name.to_string(),
                    entries: Vec::new(),
                });
                self.sections.len() - 1
            }
        }
    }
}

impl SectionSource for IniDocument {
    fn section_names(&self) -> Vec<&str> {
        self.sections.iter().map(|s| s.name.as_str()).collect()
    }

    fn get(&self, section: &str, key: &str) -> Option<&str> {
        let key = key.to_lowercase();
        let section = self.find(section)?;
        section
            .lookup(&key)
            .or_else(|| self.defaults.lookup(&key))
    }
}

/// Header name of a `[section]` line: everything up to the last `]`.
fn section_header(line: &str) -> Option<&str> {
    let rest = line.strip_prefix('[')?;
    let end = rest.rfind(']')?;
    Some(&rest[..end])
}

fn parse_error(path: &Path, line_index: usize, message: &str) -> ConfigFileError {
    ConfigFileError::Parse {
        path: path.to_path_buf(),
        line: line_index + 1,
        message: message.to_string(),
    }
}

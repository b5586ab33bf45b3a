//! Section schemas: which params a section holds and which section names
//! it applies to.
//!
//! A schema is assembled with [`SchemaBuilder`] and frozen by
//! [`build()`](SchemaBuilder::build). Section name patterns use shell
//! wildcards (`*`, `?`, `[...]`, `[!...]`), matched case-sensitively against
//! the whole name; a pattern without wildcards matches only itself. `*`
//! matches any run of characters, dots included, and a run of stars is the
//! same as one. A `[` without a closing `]` is an ordinary character.
//!
//! ```ignore
//! let hello = SectionSchema::builder("Hello")
//!     .matches_section("hello")
//!     .param("name", Param::string())
//!     .param("number", Param::integer().default(42))
//!     .build()?;
//!
//! let more = SectionSchema::builder("HelloMore")
//!     .matches_sections(["hello.more.*", "more.*"])
//!     .param("numbers", Param::integer().multiple())
//!     .build()?;
//! ```
//!
//! # Pattern order
//!
//! Repeated `matches_section`/`matches_sections` calls append in call
//! order. A pattern that is already registered is skipped, so the first
//! declaration keeps its position. Reopening a built schema with
//! [`into_builder()`](SectionSchema::into_builder) follows the same rule.

use glob::{MatchOptions, Pattern};

use crate::error::ConfigFileError;
use crate::param::Param;

const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: false,
    require_literal_leading_dot: false,
};

/// A compiled section name pattern.
#[derive(Debug, Clone)]
pub struct SectionPattern {
    source: String,
    compiled: Pattern,
}

impl SectionPattern {
    pub fn new(pattern: &str) -> Result<Self, ConfigFileError> {
        if pattern.is_empty() {
            return Err(ConfigFileError::BadPattern {
                pattern: pattern.to_string(),
                reason: "pattern is empty".into(),
            });
        }
        let compiled =
            Pattern::new(&to_glob(pattern)).map_err(|e| ConfigFileError::BadPattern {
                pattern: pattern.to_string(),
                reason: e.msg.to_string(),
            })?;
        Ok(Self {
            source: pattern.to_string(),
            compiled,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }

    pub fn matches(&self, section_name: &str) -> bool {
        self.compiled.matches_with(section_name, MATCH_OPTIONS)
    }
}

impl PartialEq for SectionPattern {
    fn eq(&self, other: &Self) -> bool {
        self.source == other.source
    }
}

/// Match a section name against a raw pattern string.
///
/// Invalid patterns never match; the reader rejects them up front.
pub fn section_matches(section_name: &str, pattern: &str) -> bool {
    SectionPattern::new(pattern).is_ok_and(|p| p.matches(section_name))
}

/// Rewrite shell wildcards into `glob` syntax. `glob` reserves `**` for
/// path recursion and rejects unclosed brackets, neither of which apply to
/// section names.
fn to_glob(pattern: &str) -> String {
    let chars: Vec<char> = pattern.chars().collect();
    let mut out = String::with_capacity(pattern.len());
    let mut i = 0;
    while i < chars.len() {
        match chars[i] {
            '*' => {
                out.push('*');
                while chars.get(i + 1) == Some(&'*') {
                    i += 1;
                }
            }
            '[' => match class_end(&chars, i) {
                Some(end) => {
                    out.extend(&chars[i..=end]);
                    i = end;
                }
                None => out.push_str("[[]"),
            },
            ']' => out.push_str("[]]"),
            c => out.push(c),
        }
        i += 1;
    }
    out
}

/// Index of the `]` closing the class opened at `start`. A `]` right after
/// `[` or `[!` belongs to the class.
fn class_end(chars: &[char], start: usize) -> Option<usize> {
    let mut j = start + 1;
    if chars.get(j) == Some(&'!') {
        j += 1;
    }
    if chars.get(j) == Some(&']') {
        j += 1;
    }
    (j..chars.len()).find(|&k| chars[k] == ']')
}

/// Typed description of the params in sections matching its patterns.
#[derive(Debug, Clone)]
pub struct SectionSchema {
    id: String,
    patterns: Vec<SectionPattern>,
    params: Vec<(String, Param)>,
}

impl SectionSchema {
    /// Start a schema. `id` is a logical name used in logs and namespaces;
    /// it takes no part in matching.
    pub fn builder(id: &str) -> SchemaBuilder {
        SchemaBuilder {
            id: id.to_string(),
            patterns: Vec::new(),
            params: Vec::new(),
        }
    }

    /// Reopen the schema to register more patterns or params.
    pub fn into_builder(self) -> SchemaBuilder {
        SchemaBuilder {
            id: self.id,
            patterns: self.patterns.into_iter().map(|p| p.source).collect(),
            params: self.params,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Registered patterns, in precedence order.
    pub fn section_names(&self) -> Vec<&str> {
        self.patterns.iter().map(SectionPattern::as_str).collect()
    }

    /// Declared params as `(key, param)` pairs, in declaration order.
    pub fn params(&self) -> impl Iterator<Item = (&str, &Param)> {
        self.params.iter().map(|(key, param)| (key.as_str(), param))
    }

    pub fn param(&self, key: &str) -> Option<&Param> {
        self.params.iter().find(|(k, _)| k == key).map(|(_, p)| p)
    }

    /// True if `section_name` matches any registered pattern.
    pub fn matches(&self, section_name: &str) -> bool {
        self.patterns.iter().any(|p| p.matches(section_name))
    }

    pub(crate) fn with_id(mut self, id: String) -> Self {
        self.id = id;
        self
    }
}

/// Accumulates patterns and params for a [`SectionSchema`].
#[derive(Debug, Clone)]
pub struct SchemaBuilder {
    id: String,
    patterns: Vec<String>,
    params: Vec<(String, Param)>,
}

impl SchemaBuilder {
    /// Register one section name pattern.
    pub fn matches_section(mut self, pattern: &str) -> Self {
        self.push_pattern(pattern);
        self
    }

    /// Register several section name patterns, in order.
    pub fn matches_sections<I, S>(mut self, patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for pattern in patterns {
            self.push_pattern(pattern.as_ref());
        }
        self
    }

    /// Declare a param under `key`. An unnamed param is bound to `key`.
    /// Declaring the same key again replaces the earlier param in place.
    pub fn param(mut self, key: &str, mut param: Param) -> Self {
        param.bind_name(key);
        match self.params.iter_mut().find(|(k, _)| k == key) {
            Some(slot) => slot.1 = param,
            None => self.params.push((key.to_string(), param)),
        }
        self
    }

    /// Compile patterns and freeze the schema.
    pub fn build(self) -> Result<SectionSchema, ConfigFileError> {
        if self.patterns.is_empty() {
            return Err(ConfigFileError::BadPattern {
                pattern: String::new(),
                reason: format!("schema '{}' matches no section", self.id),
            });
        }
        let patterns = self
            .patterns
            .iter()
            .map(|p| SectionPattern::new(p))
            .collect::<Result<Vec<_>, _>>()?;
        for (key, param) in &self.params {
            param.check_default(key)?;
        }
        Ok(SectionSchema {
            id: self.id,
            patterns,
            params: self.params,
        })
    }

    fn push_pattern(&mut self, pattern: &str) {
        if !self.patterns.iter().any(|p| p == pattern) {
            self.patterns.push(pattern.to_string());
        }
    }
}

/// Hierarchical grouping of schemas for authoring.
///
/// Flattening yields each schema with a dotted id built from the enclosing
/// namespace names (`Config.Level.Example`). Resolution only ever works on
/// the flat list.
#[derive(Debug, Clone, Default)]
pub struct SchemaNamespace {
    name: String,
    schemas: Vec<SectionSchema>,
    children: Vec<SchemaNamespace>,
}

impl SchemaNamespace {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Default::default()
        }
    }

    pub fn schema(mut self, schema: SectionSchema) -> Self {
        self.schemas.push(schema);
        self
    }

    pub fn namespace(mut self, child: SchemaNamespace) -> Self {
        self.children.push(child);
        self
    }

    /// All schemas, depth-first, own schemas before child namespaces.
    pub fn flatten(self) -> Vec<SectionSchema> {
        let mut out = Vec::new();
        self.flatten_into("", &mut out);
        out
    }

    /// Look up a schema by its dotted id.
    pub fn get(&self, dotted_id: &str) -> Option<&SectionSchema> {
        let rest = if self.name.is_empty() {
            dotted_id
        } else {
            dotted_id.strip_prefix(&self.name)?.strip_prefix('.')?
        };
        self.schemas
            .iter()
            .find(|s| s.id() == rest)
            .or_else(|| self.children.iter().find_map(|c| c.get(rest)))
    }

    fn flatten_into(self, prefix: &str, out: &mut Vec<SectionSchema>) {
        let path = match (prefix.is_empty(), self.name.is_empty()) {
            (_, true) => prefix.to_string(),
            (true, false) => self.name.clone(),
            (false, false) => format!("{prefix}.{}", self.name),
        };
        for schema in self.schemas {
            let id = if path.is_empty() {
                schema.id().to_string()
            } else {
                format!("{path}.{}", schema.id())
            };
            out.push(schema.with_id(id));
        }
        for child in self.children {
            child.flatten_into(&path, out);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn schema(patterns: &[&str]) -> SectionSchema {
        SectionSchema::builder("Example")
            .matches_sections(patterns)
            .build()
            .unwrap()
    }

    #[test]
    fn single_pattern_registered() {
        for name in ["hello", "hello.*", "*.hello"] {
            assert_eq!(schema(&[name]).section_names(), vec![name]);
        }
    }

    #[test]
    fn multiple_patterns_keep_order() {
        let s = schema(&["hello", "hello.*"]);
        assert_eq!(s.section_names(), vec!["hello", "hello.*"]);
    }

    #[test]
    fn repeated_calls_append_in_call_order() {
        let s = SectionSchema::builder("Hello")
            .matches_section("foo")
            .matches_section("bar.*")
            .build()
            .unwrap();
        assert_eq!(s.section_names(), vec!["foo", "bar.*"]);
    }

    #[test]
    fn duplicate_patterns_keep_first_position() {
        let s = SectionSchema::builder("Hello")
            .matches_sections(["foo", "bar"])
            .matches_sections(["baz", "foo"])
            .build()
            .unwrap();
        assert_eq!(s.section_names(), vec!["foo", "bar", "baz"]);
    }

    #[test]
    fn reopened_schema_appends_unseen_patterns() {
        let s = schema(&["foo"])
            .into_builder()
            .matches_sections(["hello", "foo"])
            .build()
            .unwrap();
        assert_eq!(s.section_names(), vec!["foo", "hello"]);
    }

    #[test]
    fn no_patterns_is_bad_pattern() {
        let err = SectionSchema::builder("Empty").build().unwrap_err();
        assert!(matches!(err, ConfigFileError::BadPattern { .. }));
    }

    #[test]
    fn empty_pattern_is_bad_pattern() {
        let err = SectionSchema::builder("Bad")
            .matches_section("")
            .build()
            .unwrap_err();
        match err {
            ConfigFileError::BadPattern { pattern, .. } => assert_eq!(pattern, ""),
            other => panic!("Expected BadPattern, got {other:?}"),
        }
    }

    #[test]
    fn exact_pattern_matches_only_itself() {
        let s = schema(&["foo"]);
        assert!(s.matches("foo"));
        assert!(!s.matches("foo.bar"));
        assert!(!s.matches("Foo"));
    }

    #[test]
    fn wildcards_match() {
        let s = schema(&["foo.*", "*.foo", "x?z", "item[0-9]"]);
        assert!(s.matches("foo.alice"));
        assert!(s.matches("some.foo"));
        assert!(s.matches("xyz"));
        assert!(s.matches("item7"));
        assert!(!s.matches("foo_bar"));
        assert!(!s.matches("itemX"));
    }

    #[test]
    fn repeated_stars_act_as_one() {
        let s = schema(&["hello.**", "a**b"]);
        assert!(s.matches("hello.a"));
        assert!(s.matches("hello.a.b"));
        assert!(s.matches("ab"));
        assert!(s.matches("a.x.b"));
        assert!(!s.matches("hello"));
        assert!(section_matches("hello.a", "hello**"));
    }

    #[test]
    fn unclosed_bracket_is_literal() {
        let s = schema(&["foo[", "[bar"]);
        assert!(s.matches("foo["));
        assert!(s.matches("[bar"));
        assert!(!s.matches("foo"));
    }

    #[test]
    fn bracket_classes() {
        assert!(section_matches("item7", "item[!a-z]"));
        assert!(!section_matches("itemx", "item[!a-z]"));
        assert!(section_matches("a]", "a[]]"));
        assert!(section_matches("a]", "a]"));
        assert!(section_matches("x.[y]", "x.[[]y]"));
    }

    #[test]
    fn star_crosses_dots_and_slashes() {
        assert!(section_matches("foo.a.b/c", "foo.*"));
    }

    #[test]
    fn params_bound_to_declared_key() {
        let s = SectionSchema::builder("Example")
            .matches_section("example")
            .param("person", Param::string())
            .param("number", Param::float().named("PHI"))
            .build()
            .unwrap();
        assert_eq!(s.param("person").unwrap().name(), Some("person"));
        assert_eq!(s.param("number").unwrap().name(), Some("PHI"));
        let keys: Vec<&str> = s.params().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["person", "number"]);
    }

    #[test]
    fn bad_default_rejected_at_build() {
        let err = SectionSchema::builder("Example")
            .matches_section("example")
            .param("numbers", Param::integer().multiple().default(1))
            .build()
            .unwrap_err();
        assert!(matches!(err, ConfigFileError::BadDefault { .. }));
    }

    #[test]
    fn namespace_flattens_with_dotted_ids() {
        let tree = SchemaNamespace::new("Config")
            .schema(
                SectionSchema::builder("Hello")
                    .matches_section("hello")
                    .build()
                    .unwrap(),
            )
            .namespace(
                SchemaNamespace::new("Level").schema(
                    SectionSchema::builder("Example")
                        .matches_section("example")
                        .param("person", Param::string())
                        .build()
                        .unwrap(),
                ),
            );

        let example = tree.get("Config.Level.Example").unwrap();
        assert_eq!(example.param("person").unwrap().name(), Some("person"));
        assert!(tree.get("Config.Missing").is_none());

        let flat = tree.flatten();
        let ids: Vec<&str> = flat.iter().map(SectionSchema::id).collect();
        assert_eq!(ids, vec!["Config.Hello", "Config.Level.Example"]);
    }
}

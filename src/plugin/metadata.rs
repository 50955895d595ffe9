//! Descriptive plugin metadata.

use std::fmt;

/// Value used for any field a plugin does not declare properly.
pub const UNKNOWN: &str = "unknown";

/// Raw, unchecked fields as a plugin declares them.
///
/// Manifest units fill these straight from TOML, so a field may hold a
/// value of the wrong type.
#[derive(Debug, Clone, Default)]
pub struct RawMetadata {
    pub author: Option<toml::Value>,
    pub category: Option<toml::Value>,
    pub group: Option<toml::Value>,
    pub description: Option<toml::Value>,
}

impl RawMetadata {
    /// Convenience for bundled plugins that declare plain strings.
    pub fn new(author: &str, category: &str, group: &str, description: &str) -> Self {
        let field = |s: &str| Some(toml::Value::String(s.to_string()));
        Self {
            author: field(author),
            category: field(category),
            group: field(group),
            description: field(description),
        }
    }
}

/// Checked metadata attached to a loaded unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Metadata {
    pub author: String,
    pub category: String,
    pub group: String,
    pub description: String,
}

impl Default for Metadata {
    fn default() -> Self {
        Self {
            author: UNKNOWN.to_string(),
            category: UNKNOWN.to_string(),
            group: UNKNOWN.to_string(),
            description: UNKNOWN.to_string(),
        }
    }
}

impl Metadata {
    /// Read the four descriptive fields of `unit`.
    ///
    /// Never fails: a missing, blank or non-string field becomes [`UNKNOWN`].
    pub fn extract(unit: &str, raw: &RawMetadata) -> Self {
        Self {
            author: field(unit, "author", raw.author.as_ref()),
            category: field(unit, "category", raw.category.as_ref()),
            group: field(unit, "group", raw.group.as_ref()),
            description: field(unit, "description", raw.description.as_ref()),
        }
    }

    /// `category/group` label used to bucket help output.
    pub fn section(&self) -> String {
        format!("{}/{}", self.category, self.group)
    }
}

impl fmt::Display for Metadata {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} [{}] by {}",
            self.description,
            self.section(),
            self.author
        )
    }
}

fn field(unit: &str, name: &str, value: Option<&toml::Value>) -> String {
    match value {
        None => UNKNOWN.to_string(),
        Some(toml::Value::String(s)) if !s.trim().is_empty() => s.trim().to_string(),
        Some(toml::Value::String(_)) => UNKNOWN.to_string(),
        Some(other) => {
            warn!(
                "{}: metadata field '{}' is a {}, not a string",
                unit,
                name,
                other.type_str()
            );
            UNKNOWN.to_string()
        }
    }
}

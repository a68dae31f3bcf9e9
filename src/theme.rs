//! Theme document model
//!
//! A theme is a TOML document with a `colors` palette, a `styles` section whose
//! values may reference the palette through `{{ colors.name }}` placeholders, and
//! optional `scopes` that bind resolved values to an output agent.
//!
//! ```toml
//! name = "dracula"
//! type = "dark"
//!
//! [colors]
//! background = "#282a36"
//! foreground = "#f8f8f2"
//!
//! [styles]
//! text = "{{ colors.foreground }} on {{ colors.background }}"
//!
//! [scopes.fzf]
//! agent = "fzf"
//! styles.text = "{{ styles.text }}"
//! ```

use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

/// Errors that can occur when loading a theme document
#[derive(Error, Debug)]
pub enum ThemeError {
    #[error("failed to read theme file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse theme TOML: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("malformed theme: {0}")]
    Structure(String),
}

/// One of the two resolvable top-level sections
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Section {
    Colors,
    Styles,
}

impl Section {
    pub fn as_str(self) -> &'static str {
        match self {
            Section::Colors => "colors",
            Section::Styles => "styles",
        }
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Ordered string mapping that keeps document order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Entries {
    items: Vec<(String, String)>,
    index: HashMap<String, usize>,
}

impl Entries {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace; a replaced key keeps its original position
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.index.get(&key) {
            Some(&i) => self.items[i].1 = value,
            None => {
                self.index.insert(key.clone(), self.items.len());
                self.items.push((key, value));
            }
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.index.get(key).map(|&i| self.items[i].1.as_str())
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.index.contains_key(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.items.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.items.iter().map(|(k, _)| k.as_str())
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Entries {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut entries = Entries::new();
        for (k, v) in iter {
            entries.insert(k, v);
        }
        entries
    }
}

/// Descriptive fields passed through unchanged
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Metadata {
    pub name: Option<String>,
    pub theme_type: Option<String>,
    pub version: Option<String>,
    pub description: Option<String>,
}

/// A loaded, unresolved theme document
#[derive(Debug, Clone, Default)]
pub struct Theme {
    filename: Option<PathBuf>,
    metadata: Metadata,
    colors: Entries,
    styles: Entries,
    scopes: Vec<(String, toml::Table)>,
}

/// TOML structure for deserializing themes
#[derive(Deserialize, Default)]
struct TomlTheme {
    name: Option<String>,
    #[serde(rename = "type")]
    theme_type: Option<String>,
    version: Option<String>,
    description: Option<String>,
    metadata: Option<TomlMetadata>,
    colors: Option<toml::Table>,
    styles: Option<toml::Table>,
    #[serde(alias = "scope")]
    scopes: Option<toml::Table>,
}

#[derive(Deserialize, Default)]
struct TomlMetadata {
    name: Option<String>,
    #[serde(rename = "type")]
    theme_type: Option<String>,
    version: Option<String>,
    description: Option<String>,
}

impl Theme {
    /// Load a theme from a TOML file
    pub fn from_file(path: &Path) -> Result<Self, ThemeError> {
        let content = std::fs::read_to_string(path).map_err(|source| ThemeError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let mut theme = Self::from_str(&content)?;
        theme.filename = Some(path.to_path_buf());
        Ok(theme)
    }

    /// Load a theme from a TOML string
    pub fn from_str(content: &str) -> Result<Self, ThemeError> {
        let parsed: TomlTheme = toml::from_str(content)?;

        // top-level fields win over a [metadata] table
        let meta = parsed.metadata.unwrap_or_default();
        let metadata = Metadata {
            name: parsed.name.or(meta.name),
            theme_type: parsed.theme_type.or(meta.theme_type),
            version: parsed.version.or(meta.version),
            description: parsed.description.or(meta.description),
        };

        let colors = match &parsed.colors {
            Some(table) => flatten_section(Section::Colors, table)?,
            None => Entries::new(),
        };
        let styles = match &parsed.styles {
            Some(table) => flatten_section(Section::Styles, table)?,
            None => Entries::new(),
        };

        let mut scopes = Vec::new();
        for (name, value) in parsed.scopes.unwrap_or_default() {
            match value {
                toml::Value::Table(table) => scopes.push((name, table)),
                other => {
                    return Err(ThemeError::Structure(format!(
                        "scopes.{} must be a table, found {}",
                        name,
                        other.type_str()
                    )))
                }
            }
        }

        Ok(Theme {
            filename: None,
            metadata,
            colors,
            styles,
            scopes,
        })
    }

    pub fn filename(&self) -> Option<&Path> {
        self.filename.as_deref()
    }

    pub fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    pub fn name(&self) -> Option<&str> {
        self.metadata.name.as_deref()
    }

    pub fn theme_type(&self) -> Option<&str> {
        self.metadata.theme_type.as_deref()
    }

    pub fn version(&self) -> Option<&str> {
        self.metadata.version.as_deref()
    }

    pub fn description(&self) -> Option<&str> {
        self.metadata.description.as_deref()
    }

    pub fn colors(&self) -> &Entries {
        &self.colors
    }

    pub fn styles(&self) -> &Entries {
        &self.styles
    }

    pub fn entries(&self, section: Section) -> &Entries {
        match section {
            Section::Colors => &self.colors,
            Section::Styles => &self.styles,
        }
    }

    /// Raw, unresolved scope tables in document order
    pub fn scopes(&self) -> &[(String, toml::Table)] {
        &self.scopes
    }

    pub fn scope(&self, name: &str) -> Option<&toml::Table> {
        self.scopes
            .iter()
            .find(|(scope, _)| scope == name)
            .map(|(_, table)| table)
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty() && self.styles.is_empty() && self.scopes.is_empty()
    }
}

/// Flatten nested tables into dotted keys, keeping document order
fn flatten_section(section: Section, table: &toml::Table) -> Result<Entries, ThemeError> {
    let mut entries = Entries::new();
    flatten_into(section, "", table, &mut entries)?;
    Ok(entries)
}

fn flatten_into(
    section: Section,
    prefix: &str,
    table: &toml::Table,
    entries: &mut Entries,
) -> Result<(), ThemeError> {
    for (key, value) in table {
        let path = if prefix.is_empty() {
            key.clone()
        } else {
            format!("{}.{}", prefix, key)
        };
        match value {
            toml::Value::String(s) => entries.insert(path, s.as_str()),
            toml::Value::Table(nested) => flatten_into(section, &path, nested, entries)?,
            other => {
                return Err(ThemeError::Structure(format!(
                    "{}.{} must be a string or a table, found {}",
                    section,
                    path,
                    other.type_str()
                )))
            }
        }
    }
    Ok(())
}

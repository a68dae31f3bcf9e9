//! A scope definition with every template rendered

use std::process::Command;

use tracing::debug;

use super::AgentError;
use crate::style::Style;
use crate::template::{ResolveError, ResolvedTheme};

/// A `[scopes.<name>]` table whose string values have been rendered
#[derive(Debug, Clone)]
pub struct Scope {
    name: String,
    definition: toml::Table,
}

impl Scope {
    /// Render every string in the raw table against the resolved theme
    pub fn resolve(
        name: &str,
        raw: &toml::Table,
        resolved: &ResolvedTheme,
    ) -> Result<Self, ResolveError> {
        let definition = render_table(&format!("scopes.{}", name), raw, resolved)?;
        Ok(Self::from_table(name, definition))
    }

    /// Wrap an already-rendered table
    pub fn from_table(name: &str, definition: toml::Table) -> Self {
        Self {
            name: name.to_string(),
            definition,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn definition(&self) -> &toml::Table {
        &self.definition
    }

    pub fn agent(&self) -> Result<&str, AgentError> {
        self.get_str("agent").ok_or_else(|| AgentError::MissingAgent {
            scope: self.name.clone(),
        })
    }

    pub fn get(&self, key: &str) -> Option<&toml::Value> {
        self.definition.get(key)
    }

    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.definition.get(key).and_then(|v| v.as_str())
    }

    /// A string value, with `""` treated as unset
    pub fn get_nonempty(&self, key: &str) -> Option<&str> {
        self.get_str(key).filter(|v| !v.is_empty())
    }

    pub fn get_table(&self, key: &str) -> Option<&toml::Table> {
        self.definition.get(key).and_then(|v| v.as_table())
    }

    /// A key that must be a boolean when present
    pub fn get_bool(&self, key: &str) -> Result<Option<bool>, AgentError> {
        match self.definition.get(key) {
            None => Ok(None),
            Some(toml::Value::Boolean(b)) => Ok(Some(*b)),
            Some(_) => Err(self.invalid(format!("'{}' must be true or false", key))),
        }
    }

    /// Parsed entries of the `styles` table, skipping empty ones
    pub fn styles(&self) -> Result<Vec<(String, Style)>, AgentError> {
        let Some(table) = self.get_table("styles").or_else(|| self.get_table("style")) else {
            return Ok(Vec::new());
        };

        let mut styles = Vec::new();
        for (name, value) in table {
            let text = value
                .as_str()
                .ok_or_else(|| self.invalid(format!("style '{}' must be a string", name)))?;
            let style = Style::parse(text).map_err(|source| AgentError::Style {
                scope: self.name.clone(),
                name: name.clone(),
                source,
            })?;
            if !style.is_null() {
                styles.push((name.clone(), style));
            }
        }
        Ok(styles)
    }

    /// One parsed style by name
    pub fn style(&self, name: &str) -> Result<Option<Style>, AgentError> {
        Ok(self
            .styles()?
            .into_iter()
            .find(|(n, _)| n == name)
            .map(|(_, style)| style))
    }

    /// Whether the agent should run at all
    ///
    /// `enabled` wins when present. Otherwise a non-empty `enabled_if` runs
    /// through `sh -c` and a non-zero exit disables the scope.
    pub fn is_enabled(&self) -> Result<bool, AgentError> {
        if let Some(enabled) = self.get_bool("enabled")? {
            return Ok(enabled);
        }

        let command = match self.get("enabled_if") {
            None => return Ok(true),
            Some(toml::Value::String(cmd)) if cmd.trim().is_empty() => return Ok(true),
            Some(toml::Value::String(cmd)) => cmd,
            Some(_) => return Err(self.invalid("'enabled_if' must be a string".to_string())),
        };

        let status = Command::new("sh")
            .arg("-c")
            .arg(command)
            .output()
            .map_err(|source| AgentError::EnabledIf {
                scope: self.name.clone(),
                source,
            })?
            .status;

        debug!(scope = %self.name, command = %command, success = status.success(), "enabled_if");
        Ok(status.success())
    }

    pub(crate) fn invalid(&self, message: String) -> AgentError {
        AgentError::InvalidKey {
            scope: self.name.clone(),
            message,
        }
    }
}

fn render_table(
    path: &str,
    table: &toml::Table,
    resolved: &ResolvedTheme,
) -> Result<toml::Table, ResolveError> {
    let mut out = toml::Table::new();
    for (key, value) in table {
        let child = format!("{}.{}", path, key);
        out.insert(key.clone(), render_value(&child, value, resolved)?);
    }
    Ok(out)
}

fn render_value(
    path: &str,
    value: &toml::Value,
    resolved: &ResolvedTheme,
) -> Result<toml::Value, ResolveError> {
    Ok(match value {
        toml::Value::String(s) => toml::Value::String(resolved.render(path, s)?),
        toml::Value::Array(items) => toml::Value::Array(
            items
                .iter()
                .map(|item| render_value(path, item, resolved))
                .collect::<Result<_, _>>()?,
        ),
        toml::Value::Table(table) => toml::Value::Table(render_table(path, table, resolved)?),
        other => other.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::theme::Theme;
    use crate::template::resolve_theme;

    fn scope_from(source: &str, name: &str) -> Result<Scope, ResolveError> {
        let theme = Theme::from_str(source).unwrap();
        let resolved = resolve_theme(&theme).unwrap();
        Scope::resolve(name, theme.scope(name).unwrap(), &resolved)
    }

    #[test]
    fn test_renders_nested_values() {
        let scope = scope_from(
            r##"
[colors]
pink = "#ff79c6"

[scopes.env]
agent = "environment_variables"
unset = ["A", "{{ colors.pink }}"]
export.ACCENT = "{{ colors.pink }}"
"##,
            "env",
        )
        .unwrap();

        let export = scope.get_table("export").unwrap();
        assert_eq!(export["ACCENT"].as_str(), Some("#ff79c6"));
        let unset = scope.get("unset").unwrap().as_array().unwrap();
        assert_eq!(unset[1].as_str(), Some("#ff79c6"));
    }

    #[test]
    fn test_missing_reference_names_scope_path() {
        let err = scope_from(
            r#"
[scopes.fzf]
agent = "fzf"
opt.border = "{{ colors.nope }}"
"#,
            "fzf",
        )
        .unwrap_err();
        match err {
            ResolveError::MissingReference { scope, .. } => assert_eq!(scope, "scopes.fzf.opt.border"),
            other => panic!("Expected MissingReference, got {:?}", other),
        }
    }

    #[test]
    fn test_styles_skip_empty() {
        let scope = Scope::from_table(
            "t",
            toml::toml! {
                agent = "fzf"
                [styles]
                text = "red"
                border = ""
            },
        );
        let styles = scope.styles().unwrap();
        assert_eq!(styles.len(), 1);
        assert_eq!(styles[0].0, "text");
    }

    #[test]
    fn test_bad_style_is_error() {
        let scope = Scope::from_table(
            "t",
            toml::toml! {
                [styles]
                text = "chartreuse"
            },
        );
        assert!(matches!(scope.styles(), Err(AgentError::Style { .. })));
    }

    #[test]
    fn test_enabled_is_authoritative() {
        let scope = Scope::from_table(
            "t",
            toml::toml! {
                enabled = false
                enabled_if = "true"
            },
        );
        assert!(!scope.is_enabled().unwrap());
    }

    #[test]
    fn test_enabled_must_be_bool() {
        let scope = Scope::from_table("t", toml::toml! { enabled = "yes" });
        assert!(matches!(scope.is_enabled(), Err(AgentError::InvalidKey { .. })));
    }

    #[test]
    fn test_enabled_by_default() {
        assert!(Scope::from_table("t", toml::Table::new()).is_enabled().unwrap());
        let empty = Scope::from_table("t", toml::toml! { enabled_if = "" });
        assert!(empty.is_enabled().unwrap());
    }

    #[cfg(unix)]
    #[test]
    fn test_enabled_if_runs_command() {
        let yes = Scope::from_table("t", toml::toml! { enabled_if = "exit 0" });
        assert!(yes.is_enabled().unwrap());
        let no = Scope::from_table("t", toml::toml! { enabled_if = "exit 1" });
        assert!(!no.is_enabled().unwrap());
    }
}

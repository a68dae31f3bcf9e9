//! Template resolution - substitutes placeholders with palette and style values

use std::collections::HashMap;
use std::fmt;

use thiserror::Error;
use tracing::{debug, trace};

use crate::parser::{self, Expr, Reference};
use crate::theme::{Entries, Section, Theme};
use crate::ExpressionError;

/// Errors that can occur while resolving a theme
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ResolveError {
    /// Placeholder names an unknown section or key
    #[error("{scope}: reference to undefined '{reference}'{}", format_chain(chain))]
    MissingReference {
        /// Qualified entry containing the placeholder
        scope: String,
        /// The placeholder as written (`colors.missing`)
        reference: String,
        /// Key half of the placeholder (`missing`)
        key: String,
        /// Entries being resolved when the reference was hit, outermost first
        chain: Vec<String>,
    },

    /// An entry depends on itself, directly or through others
    #[error("circular reference detected: {}", cycle.join(" -> "))]
    CircularReference { cycle: Vec<String> },

    /// Unbalanced braces or an otherwise unparseable placeholder
    #[error("{scope}: malformed expression \"{source_text}\": {}", format_expression_errors(errors))]
    MalformedExpression {
        scope: String,
        source_text: String,
        errors: Vec<ExpressionError>,
    },
}

impl ResolveError {
    /// Render an ariadne report for malformed expressions
    pub fn report(&self, color: bool) -> Option<String> {
        match self {
            ResolveError::MalformedExpression {
                scope,
                source_text,
                errors,
            } => Some(
                errors
                    .iter()
                    .map(|e| e.format_with(source_text, scope, color))
                    .collect::<Vec<_>>()
                    .join("\n"),
            ),
            _ => None,
        }
    }
}

fn format_chain(chain: &[String]) -> String {
    if chain.len() < 2 {
        String::new()
    } else {
        format!(" (via {})", chain.join(" -> "))
    }
}

fn format_expression_errors(errors: &[ExpressionError]) -> String {
    errors
        .iter()
        .map(|e| match e {
            ExpressionError::Syntax { message, .. } => message.clone(),
        })
        .collect::<Vec<_>>()
        .join("; ")
}

/// Identity of a resolvable entry
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct EntryId {
    section: Section,
    key: String,
}

impl EntryId {
    fn new(section: Section, key: &str) -> Self {
        Self {
            section,
            key: key.to_string(),
        }
    }
}

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.section, self.key)
    }
}

/// Lazily resolves every color and style in a theme
///
/// Each entry is parsed and resolved on first reference, then memoized, so an
/// entry resolves to the same value everywhere it is used.
pub struct Resolver<'t> {
    theme: &'t Theme,
    /// Finished entries
    resolved: HashMap<EntryId, String>,
    /// Entries currently being resolved (for cycle detection)
    resolving: Vec<EntryId>,
}

impl<'t> Resolver<'t> {
    pub fn new(theme: &'t Theme) -> Self {
        Self {
            theme,
            resolved: HashMap::new(),
            resolving: Vec::new(),
        }
    }

    /// Resolve the whole document, colors first, then styles
    ///
    /// All-or-nothing: the first failure is returned and nothing else.
    pub fn resolve(mut self) -> Result<ResolvedTheme, ResolveError> {
        let theme = self.theme;

        let mut colors = Entries::new();
        for key in theme.colors().keys() {
            let value = self.resolve_entry(Section::Colors, key)?;
            colors.insert(key, value);
        }

        let mut styles = Entries::new();
        for key in theme.styles().keys() {
            let value = self.resolve_entry(Section::Styles, key)?;
            styles.insert(key, value);
        }

        debug!(
            colors = colors.len(),
            styles = styles.len(),
            "resolved theme"
        );
        Ok(ResolvedTheme { colors, styles })
    }

    fn resolve_entry(&mut self, section: Section, key: &str) -> Result<String, ResolveError> {
        let id = EntryId::new(section, key);

        if let Some(value) = self.resolved.get(&id) {
            return Ok(value.clone());
        }

        if let Some(pos) = self.resolving.iter().position(|e| *e == id) {
            let mut cycle: Vec<String> = self.resolving[pos..].iter().map(|e| e.to_string()).collect();
            cycle.push(id.to_string());
            return Err(ResolveError::CircularReference { cycle });
        }

        let theme = self.theme;
        // callers only ask for keys that exist
        let source = theme.entries(section).get(key).unwrap_or_default();

        let expr = parser::parse(source).map_err(|errors| ResolveError::MalformedExpression {
            scope: id.to_string(),
            source_text: source.to_string(),
            errors,
        })?;

        self.resolving.push(id.clone());
        let value = self.evaluate(&expr, &id);
        self.resolving.pop();
        let value = value?;

        trace!(entry = %id, value = %value, "resolved entry");
        self.resolved.insert(id, value.clone());
        Ok(value)
    }

    fn evaluate(&mut self, expr: &Expr, scope: &EntryId) -> Result<String, ResolveError> {
        match expr {
            Expr::Literal(text) => Ok(text.clone()),
            Expr::Reference(reference) => self.lookup(reference, scope),
            Expr::Composite(parts) => parts.iter().map(|part| self.evaluate(part, scope)).collect(),
        }
    }

    fn lookup(&mut self, reference: &Reference, scope: &EntryId) -> Result<String, ResolveError> {
        let section = reference
            .namespace
            .section()
            .filter(|section| self.theme.entries(*section).contains_key(&reference.key));

        match section {
            Some(section) => self.resolve_entry(section, &reference.key),
            None => Err(ResolveError::MissingReference {
                scope: scope.to_string(),
                reference: reference.qualified(),
                key: reference.key.clone(),
                chain: self.resolving.iter().map(|e| e.to_string()).collect(),
            }),
        }
    }
}

/// The fully-resolved colors and styles of a theme
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResolvedTheme {
    colors: Entries,
    styles: Entries,
}

impl ResolvedTheme {
    pub fn colors(&self) -> &Entries {
        &self.colors
    }

    pub fn styles(&self) -> &Entries {
        &self.styles
    }

    pub fn color(&self, key: &str) -> Option<&str> {
        self.colors.get(key)
    }

    pub fn style(&self, key: &str) -> Option<&str> {
        self.styles.get(key)
    }

    pub fn get(&self, section: Section, key: &str) -> Option<&str> {
        match section {
            Section::Colors => self.colors.get(key),
            Section::Styles => self.styles.get(key),
        }
    }

    /// Every scope as `colors.name` / `styles.name`, in document order
    pub fn flatten(&self) -> Entries {
        self.colors
            .iter()
            .map(|(k, v)| (format!("colors.{}", k), v))
            .chain(self.styles.iter().map(|(k, v)| (format!("styles.{}", k), v)))
            .collect()
    }

    /// Resolve a one-off template against the finished mapping
    ///
    /// Used for scope values. Nothing can reference the template itself, so no
    /// cycle is possible. `scope` names the template in error messages.
    pub fn render(&self, scope: &str, template: &str) -> Result<String, ResolveError> {
        let expr = parser::parse(template).map_err(|errors| ResolveError::MalformedExpression {
            scope: scope.to_string(),
            source_text: template.to_string(),
            errors,
        })?;
        self.render_expr(scope, &expr)
    }

    fn render_expr(&self, scope: &str, expr: &Expr) -> Result<String, ResolveError> {
        match expr {
            Expr::Literal(text) => Ok(text.clone()),
            Expr::Reference(reference) => reference
                .namespace
                .section()
                .and_then(|section| self.get(section, &reference.key))
                .map(str::to_string)
                .ok_or_else(|| ResolveError::MissingReference {
                    scope: scope.to_string(),
                    reference: reference.qualified(),
                    key: reference.key.clone(),
                    chain: vec![],
                }),
            Expr::Composite(parts) => parts.iter().map(|part| self.render_expr(scope, part)).collect(),
        }
    }
}

/// Resolve a theme into its flat mapping
pub fn resolve_theme(theme: &Theme) -> Result<ResolvedTheme, ResolveError> {
    Resolver::new(theme).resolve()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolve(source: &str) -> Result<ResolvedTheme, ResolveError> {
        let theme = Theme::from_str(source).expect("Should parse");
        resolve_theme(&theme)
    }

    #[test]
    fn test_identity_without_placeholders() {
        let resolved = resolve(
            r##"
[colors]
background = "#282a36"
foreground = "#f8f8f2"

[styles]
text = "bold #f8f8f2 on #282a36"
"##,
        )
        .expect("Should resolve");
        assert_eq!(resolved.color("background"), Some("#282a36"));
        assert_eq!(resolved.color("foreground"), Some("#f8f8f2"));
        assert_eq!(resolved.style("text"), Some("bold #f8f8f2 on #282a36"));
    }

    #[test]
    fn test_composite_style() {
        let resolved = resolve(
            r##"
[colors]
background = "#282a36"
foreground = "#f8f8f2"

[styles]
text = "{{colors.foreground}} on {{colors.background}}"
"##,
        )
        .expect("Should resolve");
        assert_eq!(resolved.style("text"), Some("#f8f8f2 on #282a36"));
    }

    #[test]
    fn test_chain_resolves_to_final_literal() {
        let resolved = resolve(
            r##"
[colors]
a = "{{ colors.b }}"
b = "{{ colors.c }}"
c = "#123456"
"##,
        )
        .expect("Should resolve");
        assert_eq!(resolved.color("a"), Some("#123456"));
        assert_eq!(resolved.color("b"), Some("#123456"));
    }

    #[test]
    fn test_forward_reference_across_sections() {
        let resolved = resolve(
            r##"
[colors]
border = "{{ styles.accent }}"

[styles]
accent = "#ff79c6"
"##,
        )
        .expect("Should resolve");
        assert_eq!(resolved.color("border"), Some("#ff79c6"));
    }

    #[test]
    fn test_self_reference_is_circular() {
        let err = resolve("[colors]\nx = \"{{colors.x}}\"\n").unwrap_err();
        assert_eq!(
            err,
            ResolveError::CircularReference {
                cycle: vec!["colors.x".to_string(), "colors.x".to_string()],
            }
        );
    }

    #[test]
    fn test_mutual_reference_lists_cycle() {
        let err = resolve(
            r#"
[colors]
a = "{{ colors.b }}"
b = "{{ styles.c }}"

[styles]
c = "bold {{ colors.a }}"
"#,
        )
        .unwrap_err();
        match err {
            ResolveError::CircularReference { cycle } => {
                assert_eq!(cycle, vec!["colors.a", "colors.b", "styles.c", "colors.a"]);
            }
            other => panic!("Expected CircularReference, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_reference_names_key() {
        let err = resolve("[styles]\ntext = \"{{colors.missing}}\"\n").unwrap_err();
        match err {
            ResolveError::MissingReference {
                scope,
                reference,
                key,
                ..
            } => {
                assert_eq!(scope, "styles.text");
                assert_eq!(reference, "colors.missing");
                assert_eq!(key, "missing");
            }
            other => panic!("Expected MissingReference, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_reference_through_chain() {
        let err = resolve(
            r#"
[colors]
a = "{{ colors.b }}"
b = "{{ colors.nope }}"
"#,
        )
        .unwrap_err();
        match &err {
            ResolveError::MissingReference { scope, chain, .. } => {
                assert_eq!(scope, "colors.b");
                assert_eq!(chain, &vec!["colors.a".to_string(), "colors.b".to_string()]);
            }
            other => panic!("Expected MissingReference, got {:?}", other),
        }
        assert_eq!(
            err.to_string(),
            "colors.b: reference to undefined 'colors.nope' (via colors.a -> colors.b)"
        );
    }

    #[test]
    fn test_unknown_namespace_is_missing_reference() {
        let err = resolve("[styles]\ntext = \"{{ vars.x }}\"\n").unwrap_err();
        assert!(matches!(err, ResolveError::MissingReference { .. }));
    }

    #[test]
    fn test_empty_value_resolves_to_empty() {
        let resolved = resolve(
            r#"
[colors]
unset = ""
alias = "{{ colors.unset }}"
"#,
        )
        .expect("Should resolve");
        assert_eq!(resolved.color("unset"), Some(""));
        assert_eq!(resolved.color("alias"), Some(""));
    }

    #[test]
    fn test_malformed_expression() {
        let err = resolve("[styles]\ntext = \"{{ colors.fg\"\n").unwrap_err();
        match &err {
            ResolveError::MalformedExpression { scope, source_text, .. } => {
                assert_eq!(scope, "styles.text");
                assert_eq!(source_text, "{{ colors.fg");
            }
            other => panic!("Expected MalformedExpression, got {:?}", other),
        }
        let report = err.report(false).expect("Should have a report");
        assert!(report.contains("styles.text"));
    }

    #[test]
    fn test_memoized_value_reused() {
        let theme = Theme::from_str(
            r##"
[colors]
base = "#000000"
one = "{{ colors.base }}"
two = "{{ colors.base }} {{ colors.one }}"
"##,
        )
        .unwrap();
        let mut resolver = Resolver::new(&theme);
        assert_eq!(resolver.resolve_entry(Section::Colors, "two").unwrap(), "#000000 #000000");
        assert_eq!(resolver.resolved.len(), 3);
        assert!(resolver.resolving.is_empty());
    }

    #[test]
    fn test_flatten_uses_qualified_names() {
        let resolved = resolve(
            r##"
[colors]
bg = "#000000"

[styles]
text = "on {{ colors.bg }}"
"##,
        )
        .unwrap();
        let flat: Vec<_> = resolved.flatten().iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        assert_eq!(
            flat,
            vec![
                ("colors.bg".to_string(), "#000000".to_string()),
                ("styles.text".to_string(), "on #000000".to_string()),
            ]
        );
    }

    #[test]
    fn test_render_one_off_template() {
        let resolved = resolve("[colors]\nbg = \"#000000\"\n").unwrap();
        assert_eq!(
            resolved.render("scopes.fzf.opt", "--color=bg:{{ color.bg }}").unwrap(),
            "--color=bg:#000000"
        );
        assert!(matches!(
            resolved.render("scopes.fzf.opt", "{{ colors.fg }}"),
            Err(ResolveError::MissingReference { .. })
        ));
    }
}

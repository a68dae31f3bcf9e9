//! Abstract Syntax Tree types for template expressions

use std::fmt;

use crate::theme::Section;

/// Byte range in source text
pub type Span = std::ops::Range<usize>;

/// The namespace half of a `{{ namespace.key }}` placeholder
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Namespace {
    /// `colors` or `color`
    Colors,
    /// `styles` or `style`
    Styles,
    /// Anything else; fails at resolution time
    Unknown(String),
}

impl Namespace {
    pub fn from_name(name: &str) -> Self {
        match name {
            "colors" | "color" => Namespace::Colors,
            "styles" | "style" => Namespace::Styles,
            other => Namespace::Unknown(other.to_string()),
        }
    }

    /// The document section this namespace refers to, if any
    pub fn section(&self) -> Option<Section> {
        match self {
            Namespace::Colors => Some(Section::Colors),
            Namespace::Styles => Some(Section::Styles),
            Namespace::Unknown(_) => None,
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Namespace::Colors => "colors",
            Namespace::Styles => "styles",
            Namespace::Unknown(name) => name,
        }
    }
}

impl fmt::Display for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single placeholder: `{{ colors.background }}`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reference {
    pub namespace: Namespace,
    /// Key within the section; may itself contain dots (`triad.first`)
    pub key: String,
    /// Span of the whole placeholder including braces
    pub span: Span,
}

impl Reference {
    pub fn new(namespace: Namespace, key: impl Into<String>, span: Span) -> Self {
        Self {
            namespace,
            key: key.into(),
            span,
        }
    }

    /// `namespace.key`, as written in the template
    pub fn qualified(&self) -> String {
        format!("{}.{}", self.namespace, self.key)
    }
}

/// A parsed template expression
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expr {
    /// Text with no placeholders
    Literal(String),
    /// Exactly one placeholder and nothing else
    Reference(Reference),
    /// Literal text interleaved with placeholders, in source order
    Composite(Vec<Expr>),
}

impl Expr {
    /// Collapse a parsed sequence of parts into the smallest equivalent expression
    pub fn from_parts(parts: Vec<Expr>) -> Self {
        match <[Expr; 1]>::try_from(parts) {
            Ok([only]) => only,
            Err(parts) if parts.is_empty() => Expr::Literal(String::new()),
            Err(parts) => Expr::Composite(parts),
        }
    }

    /// True if the expression contains no placeholders
    pub fn is_literal(&self) -> bool {
        matches!(self, Expr::Literal(_))
    }

    /// All placeholders in source order
    pub fn references(&self) -> Vec<&Reference> {
        match self {
            Expr::Literal(_) => vec![],
            Expr::Reference(r) => vec![r],
            Expr::Composite(parts) => parts.iter().flat_map(|p| p.references()).collect(),
        }
    }
}

//! dye - apply a declarative color theme to command-line tools
//!
//! This library loads a TOML theme, resolves the `{{ namespace.key }}`
//! placeholders between its colors and styles, and runs each `[scopes.*]`
//! table through an agent that emits shell code.
//!
//! # Example
//!
//! ```rust
//! use dye::resolve;
//!
//! let resolved = resolve(r##"
//! [colors]
//! background = "#282a36"
//! foreground = "#f8f8f2"
//!
//! [styles]
//! text = "{{ colors.foreground }} on {{ colors.background }}"
//! "##).unwrap();
//!
//! assert_eq!(resolved.style("text"), Some("#f8f8f2 on #282a36"));
//! ```

pub mod agents;
pub mod config;
pub mod error;
pub mod parser;
pub mod preview;
pub mod style;
pub mod template;
pub mod theme;

pub use agents::{Agent, AgentError, AgentRegistry, Scope};
pub use config::{Settings, SettingsError};
pub use error::ExpressionError;
pub use parser::{parse, Expr, Span};
pub use preview::{render_preview, render_styled, PreviewConfig};
pub use style::{parse_color, Attribute, Color, Style, StyleError};
pub use template::{resolve_theme, ResolveError, ResolvedTheme, Resolver};
pub use theme::{Entries, Metadata, Section, Theme, ThemeError};

use thiserror::Error;
use tracing::debug;

/// Errors that can occur anywhere in the apply pipeline
#[derive(Debug, Error)]
pub enum DyeError {
    #[error(transparent)]
    Theme(#[from] ThemeError),

    #[error(transparent)]
    Resolve(#[from] ResolveError),

    #[error(transparent)]
    Agent(#[from] AgentError),

    #[error(transparent)]
    Style(#[from] StyleError),

    #[error(transparent)]
    Settings(#[from] SettingsError),

    /// A scope named on the command line is not in the theme
    #[error("{0}: no such scope")]
    UnknownScope(String),

    /// A command needs a theme and none was given
    #[error("no theme given; use --theme-file, --theme or set DYE_THEME_FILE")]
    NoTheme,
}

impl DyeError {
    /// Human-readable report, with source context for malformed expressions
    pub fn report(&self, color: bool) -> String {
        let resolve = match self {
            DyeError::Resolve(err) | DyeError::Agent(AgentError::Resolve(err)) => Some(err),
            _ => None,
        };
        match resolve.and_then(|err| err.report(color)) {
            Some(report) => format!("{}\n{}", self, report),
            None => self.to_string(),
        }
    }
}

/// Options for [`apply`]
#[derive(Debug, Clone, Default)]
pub struct ApplyConfig {
    /// Scopes to run, in this order; `None` runs every scope in document order
    pub scopes: Option<Vec<String>>,
    /// Emit a `# [scopes.<name>]` comment before each scope
    pub comments: bool,
}

impl ApplyConfig {
    /// Create a new configuration with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Only run the named scopes
    pub fn with_scopes<I, S>(mut self, scopes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.scopes = Some(scopes.into_iter().map(Into::into).collect());
        self
    }

    /// Enable or disable comments in the output
    pub fn with_comments(mut self, comments: bool) -> Self {
        self.comments = comments;
        self
    }
}

/// Parse and resolve a theme from TOML source
pub fn resolve(source: &str) -> Result<ResolvedTheme, DyeError> {
    let theme = Theme::from_str(source)?;
    Ok(resolve_theme(&theme)?)
}

/// Resolve a theme and run its scopes through their agents
///
/// Returns shell code meant to be `source`d. Nothing is returned unless every
/// selected scope succeeds.
///
/// # Example
///
/// ```rust
/// use dye::{apply, ApplyConfig, Theme};
///
/// let theme = Theme::from_str(r##"
/// [colors]
/// pink = "#ff79c6"
///
/// [scopes.env]
/// agent = "environment_variables"
/// export.ACCENT = "{{ colors.pink }}"
/// "##).unwrap();
///
/// let out = apply(&theme, &ApplyConfig::new()).unwrap();
/// assert_eq!(out, r##"export ACCENT="#ff79c6""##);
/// ```
pub fn apply(theme: &Theme, config: &ApplyConfig) -> Result<String, DyeError> {
    apply_with_registry(theme, config, &AgentRegistry::with_builtin())
}

/// [`apply`] with a caller-supplied set of agents
pub fn apply_with_registry(
    theme: &Theme,
    config: &ApplyConfig,
    registry: &AgentRegistry,
) -> Result<String, DyeError> {
    let resolved = resolve_theme(theme)?;

    let selected: Vec<(&str, &toml::Table)> = match &config.scopes {
        Some(names) => names
            .iter()
            .map(|name| {
                theme
                    .scope(name)
                    .map(|table| (name.as_str(), table))
                    .ok_or_else(|| DyeError::UnknownScope(name.clone()))
            })
            .collect::<Result<_, _>>()?,
        None => theme
            .scopes()
            .iter()
            .map(|(name, table)| (name.as_str(), table))
            .collect(),
    };

    let mut output = Vec::new();
    for (name, table) in selected {
        let scope = Scope::resolve(name, table, &resolved)?;
        let agent = scope.agent()?;
        if !registry.contains(agent) {
            return Err(AgentError::UnknownAgent(agent.to_string()).into());
        }

        if config.comments {
            output.push(format!("# [scopes.{}]", name));
        }
        if !scope.is_enabled()? {
            debug!(scope = name, "scope disabled");
            if config.comments {
                output.push(format!("# scope '{}' skipped because it is not enabled", name));
            }
            continue;
        }

        let text = registry.run(&scope)?;
        if !text.is_empty() {
            output.push(text);
        }
    }

    Ok(output.join("\n"))
}

//! Template system for theme resolution
//!
//! Colors and styles may reference each other through `{{ namespace.key }}`
//! placeholders. This module resolves a [`Theme`](crate::Theme) into a flat
//! mapping where no placeholders remain.
//!
//! # Example
//!
//! ```text
//! [colors]
//! background = "#282a36"
//! foreground = "#f8f8f2"
//!
//! [styles]
//! text = "{{ colors.foreground }} on {{ colors.background }}"
//! ```
//!
//! resolves `styles.text` to `#f8f8f2 on #282a36`.

mod resolver;

pub use resolver::{resolve_theme, ResolveError, ResolvedTheme, Resolver};

//! Terminal preview of a resolved theme
//!
//! Lists the theme inputs, every color with a swatch, and every style painted
//! in itself.

pub mod config;

pub use config::PreviewConfig;

use crate::style::{Color, Style, StyleError};
use crate::template::ResolvedTheme;
use crate::theme::{Section, Theme};

/// Render the preview as a string ready to print
pub fn render_preview(theme: &Theme, resolved: &ResolvedTheme, config: &PreviewConfig) -> String {
    let text_style = resolved
        .style("text")
        .and_then(|s| Style::parse(s).ok())
        .filter(|_| config.color)
        .unwrap_or_default();
    let plain = |s: &str| text_style.paint(s);

    let mut lines = Vec::new();

    match theme.filename() {
        Some(path) => lines.push(plain(&format!(" Theme file: {}", path.display()))),
        None => lines.push(plain(" No theme file.")),
    }
    for (label, value) in [
        ("name", theme.name()),
        ("description", theme.description()),
        ("type", theme.theme_type()),
        ("version", theme.version()),
    ] {
        let row = match value {
            Some(v) => format!("   {} = \"{}\"", label, v),
            None => format!("   {} =", label),
        };
        lines.push(plain(&row));
    }

    lines.push(String::new());
    lines.push(plain(" [colors]"));
    for (name, value) in resolved.colors().iter() {
        let swatch = match swatch_color(value) {
            Some(color) if config.color => Style {
                fg: Some(color),
                ..Style::default()
            }
            .paint(&config.swatch),
            _ => " ".repeat(config.swatch.chars().count()),
        };
        let assignment = format!(
            " {} = \"{}\"{}",
            name,
            value,
            template_note(theme, Section::Colors, name, value, config)
        );
        lines.push(format!("{}{}", plain(" "), swatch) + &plain(&assignment));
    }

    lines.push(String::new());
    lines.push(plain(" [styles]"));
    for (name, value) in resolved.styles().iter() {
        let label = match Style::parse(value) {
            Ok(style) if config.color => style.paint(name),
            _ => name.to_string(),
        };
        let assignment = format!(
            " = \"{}\"{}",
            value,
            template_note(theme, Section::Styles, name, value, config)
        );
        lines.push(plain(" ") + &label + &plain(&assignment));
    }

    lines.join("\n")
}

/// Color to draw a swatch in; palette entries may hold a full style string
fn swatch_color(value: &str) -> Option<Color> {
    let style = Style::parse(value).ok()?;
    style.fg.or(style.bg).filter(|c| *c != Color::Reset)
}

fn template_note(
    theme: &Theme,
    section: Section,
    name: &str,
    resolved: &str,
    config: &PreviewConfig,
) -> String {
    match theme.entries(section).get(name) {
        Some(raw) if config.show_templates && raw != resolved => format!("  # {}", raw),
        _ => String::new(),
    }
}

/// Text painted with a named theme style, for `dye print`
///
/// An unknown style name leaves the text unstyled.
pub fn render_styled(
    resolved: &ResolvedTheme,
    style: Option<&str>,
    text: &str,
    color: bool,
) -> Result<String, StyleError> {
    let Some(definition) = style.and_then(|name| resolved.style(name)) else {
        return Ok(text.to_string());
    };
    if !color {
        return Ok(text.to_string());
    }
    Ok(Style::parse(definition)?.paint(text))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::template::resolve_theme;
    use pretty_assertions::assert_eq;

    const THEME: &str = r##"
name = "tiny"
type = "dark"

[colors]
background = "#282a36"
foreground = "#f8f8f2"
alias = "{{ colors.foreground }}"

[styles]
text = "{{ colors.foreground }} on {{ colors.background }}"
warn = "bold yellow"
"##;

    fn preview(config: PreviewConfig) -> String {
        let theme = Theme::from_str(THEME).unwrap();
        let resolved = resolve_theme(&theme).unwrap();
        render_preview(&theme, &resolved, &config)
    }

    #[test]
    fn test_plain_preview() {
        let out = preview(PreviewConfig::new().with_color(false));
        let expected = r##" No theme file.
   name = "tiny"
   description =
   type = "dark"
   version =

 [colors]
    background = "#282a36"
    foreground = "#f8f8f2"
    alias = "#f8f8f2"  # {{ colors.foreground }}

 [styles]
 text = "#f8f8f2 on #282a36"  # {{ colors.foreground }} on {{ colors.background }}
 warn = "bold yellow""##;
        assert_eq!(out, expected);
    }

    #[test]
    fn test_preview_without_templates() {
        let out = preview(PreviewConfig::new().with_color(false).with_templates(false));
        assert!(!out.contains("{{"));
    }

    #[test]
    fn test_colored_preview_has_swatches() {
        let out = preview(PreviewConfig::new());
        let swatch = Style::parse("#282a36").unwrap().paint("██");
        assert!(out.contains(&swatch));
        assert!(out.contains(&Style::parse("bold yellow").unwrap().paint("warn")));
    }

    #[test]
    fn test_render_styled() {
        let theme = Theme::from_str(THEME).unwrap();
        let resolved = resolve_theme(&theme).unwrap();
        assert_eq!(
            render_styled(&resolved, Some("warn"), "careful", true).unwrap(),
            Style::parse("bold yellow").unwrap().paint("careful")
        );
        assert_ne!(
            render_styled(&resolved, Some("warn"), "careful", true).unwrap(),
            "careful"
        );
        assert_eq!(
            render_styled(&resolved, Some("warn"), "careful", false).unwrap(),
            "careful"
        );
        assert_eq!(
            render_styled(&resolved, Some("nope"), "careful", true).unwrap(),
            "careful"
        );
        assert_eq!(render_styled(&resolved, None, "x", true).unwrap(), "x");
    }
}

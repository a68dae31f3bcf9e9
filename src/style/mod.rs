//! Style strings: parse `bold #f8f8f2 on #282a36` into colors and attributes
//!
//! The resolver never looks inside values. Agents that need real colors parse
//! the resolved string here and convert it to whatever the target tool wants.
//! Colors and attributes are crossterm's; painting goes through
//! [`ContentStyle`].

mod palette;

use std::str::FromStr;

pub use crossterm::style::{Attribute, Attributes, Color};
use crossterm::style::ContentStyle;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum StyleError {
    #[error("unknown color '{0}'")]
    UnknownColor(String),
    #[error("unknown attribute '{0}'")]
    UnknownAttribute(String),
    #[error("invalid style '{style}': {message}")]
    Syntax { style: String, message: String },
}

/// The 16 standard colors, in palette order
pub const ANSI_COLORS: [(&str, Color); 16] = [
    ("black", Color::Black),
    ("red", Color::DarkRed),
    ("green", Color::DarkGreen),
    ("yellow", Color::DarkYellow),
    ("blue", Color::DarkBlue),
    ("magenta", Color::DarkMagenta),
    ("cyan", Color::DarkCyan),
    ("white", Color::Grey),
    ("bright_black", Color::DarkGrey),
    ("bright_red", Color::Red),
    ("bright_green", Color::Green),
    ("bright_yellow", Color::Yellow),
    ("bright_blue", Color::Blue),
    ("bright_magenta", Color::Magenta),
    ("bright_cyan", Color::Cyan),
    ("bright_white", Color::White),
];

/// Attribute words, with their short forms
const ATTRIBUTE_NAMES: [(&str, Attribute); 14] = [
    ("bold", Attribute::Bold),
    ("b", Attribute::Bold),
    ("dim", Attribute::Dim),
    ("d", Attribute::Dim),
    ("italic", Attribute::Italic),
    ("i", Attribute::Italic),
    ("underline", Attribute::Underlined),
    ("u", Attribute::Underlined),
    ("blink", Attribute::SlowBlink),
    ("reverse", Attribute::Reverse),
    ("r", Attribute::Reverse),
    ("strike", Attribute::CrossedOut),
    ("s", Attribute::CrossedOut),
    ("strikethrough", Attribute::CrossedOut),
];

/// Attributes a style can carry, ordered by SGR code
pub const SUPPORTED_ATTRIBUTES: [Attribute; 7] = [
    Attribute::Bold,
    Attribute::Dim,
    Attribute::Italic,
    Attribute::Underlined,
    Attribute::SlowBlink,
    Attribute::Reverse,
    Attribute::CrossedOut,
];

/// Parse one color word
///
/// Accepts `default`, `#rrggbb`, `#rgb`, `color(N)`, the standard names and
/// the named colors of the 256-color palette.
pub fn parse_color(s: &str) -> Result<Color, StyleError> {
    let lower = s.to_ascii_lowercase();
    let unknown = || StyleError::UnknownColor(s.to_string());

    if lower == "default" {
        return Ok(Color::Reset);
    }
    if let Some(hex) = lower.strip_prefix('#') {
        return parse_hex(hex).ok_or_else(unknown);
    }
    if let Some(inner) = lower.strip_prefix("color(").and_then(|r| r.strip_suffix(')')) {
        return inner.trim().parse::<u8>().map(from_index).map_err(|_| unknown());
    }
    if let Some((_, color)) = ANSI_COLORS.iter().find(|(name, _)| *name == lower) {
        return Ok(*color);
    }
    palette::index_of(&lower).map(from_index).ok_or_else(unknown)
}

/// Palette index to color; the first 16 are the standard colors
pub fn from_index(index: u8) -> Color {
    match ANSI_COLORS.get(index as usize) {
        Some((_, color)) => *color,
        None => Color::AnsiValue(index),
    }
}

/// Palette index of a standard or 256-color value
pub fn ansi_index(color: Color) -> Option<u8> {
    match color {
        Color::AnsiValue(n) => Some(n),
        other => ANSI_COLORS
            .iter()
            .position(|(_, c)| *c == other)
            .map(|n| n as u8),
    }
}

/// Color as fzf expects it in `--color`
pub fn fzf_color(color: Color) -> String {
    match color {
        Color::Reset => "-1".to_string(),
        Color::Rgb { r, g, b } => format!("#{:02x}{:02x}{:02x}", r, g, b),
        other => ansi_index(other).map(|n| n.to_string()).unwrap_or_default(),
    }
}

/// The color written the way a theme would write it
pub fn color_name(color: Color) -> String {
    match color {
        Color::Reset => "default".to_string(),
        Color::Rgb { r, g, b } => format!("#{:02x}{:02x}{:02x}", r, g, b),
        Color::AnsiValue(n) => format!("color({})", n),
        other => ANSI_COLORS
            .iter()
            .find(|(_, c)| *c == other)
            .map(|(name, _)| name.to_string())
            .unwrap_or_default(),
    }
}

fn parse_hex(s: &str) -> Option<Color> {
    if !s.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    let (r, g, b) = match s.len() {
        6 => (
            u8::from_str_radix(&s[0..2], 16).ok()?,
            u8::from_str_radix(&s[2..4], 16).ok()?,
            u8::from_str_radix(&s[4..6], 16).ok()?,
        ),
        // #rgb -> #rrggbb
        3 => (
            u8::from_str_radix(&s[0..1], 16).ok()? * 17,
            u8::from_str_radix(&s[1..2], 16).ok()? * 17,
            u8::from_str_radix(&s[2..3], 16).ok()? * 17,
        ),
        _ => return None,
    };
    Some(Color::Rgb { r, g, b })
}

fn attribute_named(name: &str) -> Option<Attribute> {
    ATTRIBUTE_NAMES
        .iter()
        .find(|(known, _)| *known == name)
        .map(|(_, attr)| *attr)
}

/// A parsed style: optional foreground, optional background, attributes
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Style {
    pub fg: Option<Color>,
    pub bg: Option<Color>,
    pub attributes: Attributes,
}

impl Style {
    /// Parse `[attributes] [color] [on color]`
    ///
    /// Words may come in any order. `not <attr>` is accepted and has no
    /// effect. An empty string (or `none`) is the null style.
    pub fn parse(s: &str) -> Result<Self, StyleError> {
        let mut style = Style::default();
        let mut words = s.split_whitespace();
        let syntax = |message: String| StyleError::Syntax {
            style: s.to_string(),
            message,
        };

        while let Some(word) = words.next() {
            let lower = word.to_ascii_lowercase();
            match lower.as_str() {
                "none" => {}
                "on" => {
                    let color = words
                        .next()
                        .ok_or_else(|| syntax("'on' must be followed by a color".to_string()))?;
                    if style.bg.is_some() {
                        return Err(syntax(format!(
                            "more than one background color at 'on {}'",
                            color
                        )));
                    }
                    style.bg = Some(parse_color(color)?);
                }
                "not" => {
                    let attr = words.next().ok_or_else(|| {
                        syntax("'not' must be followed by an attribute".to_string())
                    })?;
                    attribute_named(&attr.to_ascii_lowercase())
                        .ok_or_else(|| StyleError::UnknownAttribute(attr.to_string()))?;
                }
                other => match attribute_named(other) {
                    Some(attr) => style.attributes.set(attr),
                    None => {
                        if style.fg.is_some() {
                            return Err(syntax(format!(
                                "more than one foreground color at '{}'",
                                word
                            )));
                        }
                        style.fg = Some(parse_color(word)?);
                    }
                },
            }
        }

        Ok(style)
    }

    /// A style with nothing set
    pub fn is_null(&self) -> bool {
        self.fg.is_none() && self.bg.is_none() && self.attributes.is_empty()
    }

    pub fn has(&self, attr: Attribute) -> bool {
        self.attributes.has(attr)
    }

    /// The supported attributes that are set, in SGR order
    pub fn attribute_list(&self) -> impl Iterator<Item = Attribute> + '_ {
        SUPPORTED_ATTRIBUTES.into_iter().filter(|a| self.has(*a))
    }

    pub fn content_style(&self) -> ContentStyle {
        let mut style = ContentStyle::new();
        style.foreground_color = self.fg;
        style.background_color = self.bg;
        style.attributes = self.attributes;
        style
    }

    /// Wrap text in this style's escape sequences
    pub fn paint(&self, text: &str) -> String {
        if self.is_null() {
            return text.to_string();
        }
        self.content_style().apply(text).to_string()
    }

    /// Attribute list in fzf syntax, always starting with `regular`
    pub fn fzf_attributes(&self) -> String {
        let mut out = String::from("regular");
        for (attr, name) in [
            (Attribute::Bold, "bold"),
            (Attribute::Underlined, "underline"),
            (Attribute::Reverse, "reverse"),
            (Attribute::Dim, "dim"),
            (Attribute::Italic, "italic"),
            (Attribute::CrossedOut, "strikethrough"),
        ] {
            if self.has(attr) {
                out.push(':');
                out.push_str(name);
            }
        }
        out
    }
}

impl FromStr for Style {
    type Err = StyleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Style::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rgb(r: u8, g: u8, b: u8) -> Color {
        Color::Rgb { r, g, b }
    }

    #[test]
    fn test_parse_hex_colors() {
        assert_eq!(parse_color("#f8f8f2").unwrap(), rgb(248, 248, 242));
        assert_eq!(parse_color("#FFF").unwrap(), rgb(255, 255, 255));
        assert!(parse_color("#12345").is_err());
        assert!(parse_color("#gggggg").is_err());
    }

    #[test]
    fn test_parse_named_and_indexed() {
        assert_eq!(parse_color("white").unwrap(), Color::Grey);
        assert_eq!(parse_color("bright_red").unwrap(), Color::Red);
        assert_eq!(parse_color("color(4)").unwrap(), Color::DarkBlue);
        assert_eq!(parse_color("color(208)").unwrap(), Color::AnsiValue(208));
        assert_eq!(parse_color("default").unwrap(), Color::Reset);
        assert!(parse_color("color(256)").is_err());
        assert_eq!(
            parse_color("chartreuse"),
            Err(StyleError::UnknownColor("chartreuse".to_string()))
        );
    }

    #[test]
    fn test_parse_palette_names() {
        assert_eq!(parse_color("magenta3").unwrap(), Color::AnsiValue(164));
        assert_eq!(parse_color("green4").unwrap(), Color::AnsiValue(28));
        assert_eq!(parse_color("Grey82").unwrap(), Color::AnsiValue(252));

        let style = Style::parse("navy_blue dim on grey82").unwrap();
        assert_eq!(style.fg, Some(Color::AnsiValue(17)));
        assert_eq!(style.bg, Some(Color::AnsiValue(252)));
        assert!(style.has(Attribute::Dim));
    }

    #[test]
    fn test_parse_full_style() {
        let style = Style::parse("bold #f8f8f2 on #282a36").unwrap();
        assert_eq!(style.fg, Some(rgb(248, 248, 242)));
        assert_eq!(style.bg, Some(rgb(40, 42, 54)));
        assert!(style.has(Attribute::Bold));
    }

    #[test]
    fn test_attributes_in_any_position() {
        let style = Style::parse("bold default on default underline").unwrap();
        assert_eq!(style.fg, Some(Color::Reset));
        assert_eq!(style.bg, Some(Color::Reset));
        assert_eq!(
            style.attribute_list().collect::<Vec<_>>(),
            vec![Attribute::Bold, Attribute::Underlined]
        );
    }

    #[test]
    fn test_not_is_ignored() {
        let style = Style::parse("not bold red").unwrap();
        assert!(!style.has(Attribute::Bold));
        assert_eq!(style.fg, Some(Color::DarkRed));
    }

    #[test]
    fn test_empty_is_null() {
        assert!(Style::parse("").unwrap().is_null());
        assert!(Style::parse("   ").unwrap().is_null());
        assert!(!Style::parse("dim").unwrap().is_null());
    }

    #[test]
    fn test_parse_errors() {
        assert!(matches!(Style::parse("red on"), Err(StyleError::Syntax { .. })));
        assert!(matches!(Style::parse("red blue"), Err(StyleError::Syntax { .. })));
        assert!(matches!(
            Style::parse("not shiny"),
            Err(StyleError::UnknownAttribute(_))
        ));
    }

    #[test]
    fn test_second_background_is_error() {
        let err = Style::parse("red on black on white").unwrap_err();
        assert_eq!(
            err,
            StyleError::Syntax {
                style: "red on black on white".to_string(),
                message: "more than one background color at 'on white'".to_string(),
            }
        );
    }

    #[test]
    fn test_paint() {
        let painted = Style::parse("bold red").unwrap().paint("hi");
        assert!(painted.starts_with("\x1b["));
        assert!(painted.contains("hi"));
        assert_ne!(painted, "hi");
        assert_eq!(Style::default().paint("hi"), "hi");
    }

    #[test]
    fn test_content_style() {
        let style = Style::parse("italic #000000 on blue").unwrap().content_style();
        assert_eq!(style.foreground_color, Some(rgb(0, 0, 0)));
        assert_eq!(style.background_color, Some(Color::DarkBlue));
        assert!(style.attributes.has(Attribute::Italic));
    }

    #[test]
    fn test_fzf_colors() {
        assert_eq!(fzf_color(Color::Reset), "-1");
        assert_eq!(fzf_color(Color::White), "15");
        assert_eq!(fzf_color(Color::AnsiValue(252)), "252");
        assert_eq!(fzf_color(rgb(0xaf, 0x00, 0xff)), "#af00ff");
    }

    #[test]
    fn test_fzf_attributes() {
        let cases = [
            ("bold", "regular:bold"),
            ("strike", "regular:strikethrough"),
            ("bold underline", "regular:bold:underline"),
            ("italic underline", "regular:underline:italic"),
            ("red", "regular"),
        ];
        for (input, expected) in cases {
            assert_eq!(Style::parse(input).unwrap().fzf_attributes(), expected, "{}", input);
        }
    }

    #[test]
    fn test_color_names() {
        assert_eq!(color_name(Color::Blue), "bright_blue");
        assert_eq!(color_name(Color::AnsiValue(28)), "color(28)");
        assert_eq!(color_name(Color::Reset), "default");
        assert_eq!(color_name(rgb(1, 2, 3)), "#010203");
    }
}

//! `iterm` agent

use super::{Agent, AgentError, Scope};
use crate::style::{color_name, Color};

/// `cursor = "..."` names and their iTerm `CursorShape` value
const CURSOR_SHAPES: [(&str, u8); 7] = [
    ("block", 0),
    ("box", 0),
    ("vertical_bar", 1),
    ("vertical", 1),
    ("bar", 1),
    ("pipe", 1),
    ("underline", 2),
];

/// Send escape sequences to the iTerm terminal emulator
pub struct Iterm;

impl Agent for Iterm {
    fn name(&self) -> &'static str {
        "iterm"
    }

    fn description(&self) -> &'static str {
        "Send escape sequences to iTerm terminal emulator"
    }

    fn run(&self, scope: &Scope) -> Result<String, AgentError> {
        let mut output = Vec::new();

        if let Some(profile) = scope.get_nonempty("profile") {
            output.push(osc1337(&format!("SetProfile={}", profile)));
        }

        if let Some(tab) = scope.style("tab")?.and_then(|style| style.fg) {
            match tab {
                Color::Reset => output.push(echo(r"\e]6;1;bg;*;default\a")),
                color => {
                    let (r, g, b) = truecolor(scope, "tab", color)?;
                    for (channel, value) in [("red", r), ("green", g), ("blue", b)] {
                        output.push(echo(&format!(r"\e]6;1;bg;{};brightness;{}\a", channel, value)));
                    }
                }
            }
        }

        set_color(scope, &mut output, "foreground", "fg")?;
        set_color(scope, &mut output, "background", "bg")?;

        match scope.get_nonempty("cursor") {
            None => {}
            Some("profile") => output.push(echo(r"\e[0q")),
            Some(shape) => {
                let (_, value) = CURSOR_SHAPES
                    .iter()
                    .find(|(name, _)| *name == shape)
                    .ok_or_else(|| scope.invalid(format!("unknown cursor '{}'", shape)))?;
                output.push(osc1337(&format!("CursorShape={}", value)));
            }
        }
        // iTerm also has curfg, but it has no visible effect
        set_color(scope, &mut output, "cursor", "curbg")?;

        Ok(output.join("\n"))
    }
}

fn echo(sequence: &str) -> String {
    format!("builtin echo -en \"{}\"", sequence)
}

fn osc1337(body: &str) -> String {
    echo(&format!(r"\e]1337;{}\a", body))
}

fn set_color(
    scope: &Scope,
    output: &mut Vec<String>,
    style_name: &str,
    key: &str,
) -> Result<(), AgentError> {
    if let Some(color) = scope.style(style_name)?.and_then(|style| style.fg) {
        let (r, g, b) = truecolor(scope, style_name, color)?;
        output.push(osc1337(&format!("SetColors={}={:02x}{:02x}{:02x}", key, r, g, b)));
    }
    Ok(())
}

/// iTerm only takes RGB values; palette colors would need a lookup table
fn truecolor(scope: &Scope, style_name: &str, color: Color) -> Result<(u8, u8, u8), AgentError> {
    match color {
        Color::Rgb { r, g, b } => Ok((r, g, b)),
        other => Err(scope.invalid(format!(
            "style '{}' must use a hex color for iterm, found '{}'",
            style_name,
            color_name(other)
        ))),
    }
}

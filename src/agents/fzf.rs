//! `fzf` agent

use super::{Agent, AgentError, Scope};
use crate::style::{fzf_color, Style};

/// Style names that carry both a foreground and a background in fzf
const PAIRED: [(&str, &str, &str); 4] = [
    ("text", "fg", "bg"),
    ("current-line", "fg+", "bg+"),
    ("selected-line", "selected-fg", "selected-bg"),
    ("preview", "preview-fg", "preview-bg"),
];

/// Set fzf options and colors in an environment variable
pub struct Fzf;

impl Agent for Fzf {
    fn name(&self) -> &'static str {
        "fzf"
    }

    fn description(&self) -> &'static str {
        "Set fzf options and colors in FZF_DEFAULT_OPTS"
    }

    fn run(&self, scope: &Scope) -> Result<String, AgentError> {
        let mut opts = String::new();
        if let Some(table) = scope.get_table("opt") {
            for (key, value) in table {
                match value {
                    toml::Value::String(s) if s.is_empty() => {}
                    toml::Value::String(s) => opts.push_str(&format!(" {}='{}'", key, s)),
                    toml::Value::Boolean(true) => opts.push_str(&format!(" {}", key)),
                    toml::Value::Boolean(false) => {}
                    _ => {
                        return Err(scope.invalid(format!(
                            "fzf option '{}' must be a string or a boolean",
                            key
                        )))
                    }
                }
            }
        }

        let colors: Vec<String> = scope
            .styles()?
            .iter()
            .map(|(name, style)| color_spec(name, style))
            .filter(|spec| !spec.is_empty())
            .collect();

        let colorbase = scope
            .get_nonempty("colorbase")
            .map(|base| format!("{},", base))
            .unwrap_or_default();

        let colorstr = if colorbase.is_empty() && colors.is_empty() {
            String::new()
        } else {
            format!(" --color='{}{}'", colorbase, colors.join(","))
        };

        let varname = scope
            .get_nonempty("environment_variable")
            .unwrap_or("FZF_DEFAULT_OPTS");

        Ok(format!("export {}=\"{}{}\"", varname, opts, colorstr))
    }
}

/// One style as fzf `--color` entries
fn color_spec(name: &str, style: &Style) -> String {
    let mut parts = Vec::new();
    match PAIRED.iter().find(|(n, _, _)| *n == name) {
        Some((_, fg_name, bg_name)) => {
            if let Some(fg) = style.fg {
                parts.push(format!("{}:{}:{}", fg_name, fzf_color(fg), style.fzf_attributes()));
            }
            if let Some(bg) = style.bg {
                parts.push(format!("{}:{}", bg_name, fzf_color(bg)));
            }
        }
        // everything else only takes a foreground
        None => {
            if let Some(fg) = style.fg {
                parts.push(format!("{}:{}:{}", name, fzf_color(fg), style.fzf_attributes()));
            }
        }
    }
    parts.join(",")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec(name: &str, style: &str) -> String {
        color_spec(name, &Style::parse(style).unwrap())
    }

    #[test]
    fn test_color_spec() {
        let cases = [
            ("text", "", ""),
            ("text", "default", "fg:-1:regular"),
            ("text", "default on default", "fg:-1:regular,bg:-1"),
            (
                "text",
                "bold default on default underline",
                "fg:-1:regular:bold:underline,bg:-1",
            ),
            ("text", "white on bright_red", "fg:7:regular,bg:9"),
            ("text", "bright_white", "fg:15:regular"),
            ("text", "bright_yellow on color(4)", "fg:11:regular,bg:4"),
            ("text", "green4", "fg:28:regular"),
            ("current-line", "navy_blue dim on grey82", "fg+:17:regular:dim,bg+:252"),
            (
                "selected-line",
                "navy_blue dim on grey82",
                "selected-fg:17:regular:dim,selected-bg:252",
            ),
            (
                "preview",
                "#af00ff on bright_white",
                "preview-fg:#af00ff:regular,preview-bg:15",
            ),
            ("border", "magenta on white", "border:5:regular"),
            ("query", "#2932dc", "query:#2932dc:regular"),
        ];
        for (name, style, expected) in cases {
            assert_eq!(spec(name, style), expected, "{} = {}", name, style);
        }
    }

    fn scope(source: &str) -> Scope {
        Scope::from_table("fzf", toml::from_str(source).unwrap())
    }

    #[test]
    fn test_full_output() {
        let scope = scope(
            r##"
agent = "fzf"
environment_variable = "QQQ"
opt."+i" = true
opt.--border = "rounded"
styles.prompt = "magenta3"
styles.info = "#7060eb"
"##,
        );
        assert_eq!(
            Fzf.run(&scope).unwrap(),
            r#"export QQQ=" +i --border='rounded' --color='prompt:164:regular,info:#7060eb:regular'""#
        );
    }

    #[test]
    fn test_colorbase() {
        let scope = scope(
            r#"
colorbase = "bw"
styles.border = "red"
"#,
        );
        assert_eq!(
            Fzf.run(&scope).unwrap(),
            r#"export FZF_DEFAULT_OPTS=" --color='bw,border:1:regular'""#
        );
    }

    #[test]
    fn test_no_opts() {
        let scope = scope(r#"environment_variable = "QZZQQ""#);
        assert_eq!(Fzf.run(&scope).unwrap(), r#"export QZZQQ="""#);
    }

    #[test]
    fn test_false_flag_omitted() {
        let scope = scope(
            r#"
opt.--no-sort = false
opt.--cycle = true
"#,
        );
        assert_eq!(Fzf.run(&scope).unwrap(), r#"export FZF_DEFAULT_OPTS=" --cycle""#);
    }

    #[test]
    fn test_empty_values_are_unset() {
        let scope = scope(
            r#"
environment_variable = ""
colorbase = ""
opt.--border = ""
opt.--cycle = true
styles.info = ""
"#,
        );
        assert_eq!(Fzf.run(&scope).unwrap(), r#"export FZF_DEFAULT_OPTS=" --cycle""#);
    }
}

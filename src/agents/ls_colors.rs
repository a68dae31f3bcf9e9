//! `ls_colors` and `eza` agents

use super::{Agent, AgentError, Scope};
use crate::style::{ansi_index, Color, Style};

/// Friendly name to GNU `LS_COLORS` code
const LS_COLORS_MAP: &[(&str, &str)] = &[
    ("text", "no"),
    ("file", "fi"),
    ("directory", "di"),
    ("symlink", "ln"),
    ("multi_hard_link", "mh"),
    ("pipe", "pi"),
    ("socket", "so"),
    ("door", "do"),
    ("block_device", "bd"),
    ("character_device", "cd"),
    ("broken_symlink", "or"),
    ("missing_symlink_target", "mi"),
    ("setuid", "su"),
    ("setgid", "sg"),
    ("sticky", "st"),
    ("other_writable", "ow"),
    ("sticky_other_writable", "tw"),
    ("executable_file", "ex"),
    ("file_with_capability", "ca"),
];

/// Friendly name (as in eza's own theme.yml) to `EZA_COLORS` code
const EZA_COLORS_MAP: &[(&str, &str)] = &[
    ("filekinds:normal", "fi"),
    ("filekinds:directory", "di"),
    ("filekinds:symlink", "ln"),
    ("filekinds:pipe", "pi"),
    ("filekinds:block_device", "bd"),
    ("filekinds:char_device", "cd"),
    ("filekinds:socket", "so"),
    ("filekinds:special", "sp"),
    ("filekinds:executable", "ex"),
    ("filekinds:mount_point", "mp"),
    ("perms:user_read", "ur"),
    ("perms:user_write", "uw"),
    ("perms:user_executable_file", "ux"),
    ("perms:user_execute_other", "ue"),
    ("perms:group_read", "gr"),
    ("perms:group_write", "gw"),
    ("perms:group_execute", "gx"),
    ("perms:other_read", "tr"),
    ("perms:other_write", "tw"),
    ("perms:other_execute", "tx"),
    ("perms:special_user_file", "su"),
    ("perms:special_other", "sf"),
    ("perms:attribute", "xa"),
    ("size:major", "df"),
    ("size:minor", "ds"),
    ("size:number_style", "sn"),
    ("size:number_byte", "nb"),
    ("size:number_kilo", "nk"),
    ("size:number_mega", "nm"),
    ("size:number_giga", "ng"),
    ("size:number_huge", "nt"),
    ("size:unit_style", "sb"),
    ("size:unit_byte", "ub"),
    ("size:unit_kilo", "uk"),
    ("size:unit_mega", "um"),
    ("size:unit_giga", "ug"),
    ("size:unit_huge", "ut"),
    ("users:user_you", "uu"),
    ("users:user_other", "un"),
    ("users:user_root", "uR"),
    ("users:group_yours", "gu"),
    ("users:group_other", "gn"),
    ("users:group_root", "gR"),
    ("links:normal", "lc"),
    ("links:multi_link_file", "lm"),
    ("git:new", "ga"),
    ("git:modified", "gm"),
    ("git:deleted", "gd"),
    ("git:renamed", "gv"),
    ("git:typechange", "gt"),
    ("git:ignored", "gi"),
    ("git:conflicted", "gc"),
    ("git_repo:branch_main", "Gm"),
    ("git_repo:branch_other", "Go"),
    ("git_repo:git_clean", "Gc"),
    ("git_repo:git_dirty", "Gd"),
    ("selinux:colon", "Sn"),
    ("selinux:user", "Su"),
    ("selinux:role", "Sr"),
    ("selinux:typ", "St"),
    ("selinux:range", "Sl"),
    ("file_type:image", "im"),
    ("file_type:video", "vi"),
    ("file_type:music", "mu"),
    ("file_type:lossless", "lo"),
    ("file_type:crypto", "cr"),
    ("file_type:document", "do"),
    ("file_type:compressed", "co"),
    ("file_type:temp", "tm"),
    ("file_type:compiled", "cm"),
    ("file_type:build", "bu"),
    ("file_type:source", "sc"),
    ("punctuation", "xx"),
    ("date", "da"),
    ("inode", "in"),
    ("blocks", "bl"),
    ("header", "hd"),
    ("octal", "oc"),
    ("flags", "ff"),
    ("symlink_path", "lp"),
    ("control_char", "cc"),
    ("broken_path_overlay", "b0"),
    ("broken_symlink", "or"),
];

/// Look up a friendly or native name
fn code_for<'m>(map: &'m [(&'m str, &'m str)], name: &str) -> Option<&'m str> {
    map.iter()
        .find(|(friendly, code)| *friendly == name || *code == name)
        .map(|(_, code)| *code)
}

/// SGR codes for an ls-style variable; an explicit default foreground is `0`
fn ls_codes(style: &Style) -> String {
    if style.fg == Some(Color::Reset) {
        return "0".to_string();
    }
    let mut codes: Vec<String> = style.attribute_list().map(|attr| attr.sgr()).collect();
    codes.extend(style.fg.map(|fg| color_code(fg, 30)));
    codes.extend(style.bg.map(|bg| color_code(bg, 40)));
    codes.join(";")
}

/// `base` is 30 for a foreground, 40 for a background
fn color_code(color: Color, base: u8) -> String {
    match color {
        Color::Reset => (base + 9).to_string(),
        Color::Rgb { r, g, b } => format!("{};2;{};{};{}", base + 8, r, g, b),
        Color::AnsiValue(n) => format!("{};5;{}", base + 8, n),
        named => match ansi_index(named) {
            Some(n) if n < 8 => (base + n).to_string(),
            // bright colors: 90-97 and 100-107
            Some(n) => (base + 52 + n).to_string(),
            None => format!("{};5;0", base + 8),
        },
    }
}

/// `code=sgr` entries for every style in the scope
fn entries(
    scope: &Scope,
    map: &[(&str, &str)],
    allow_unknown: bool,
) -> Result<Vec<(String, String)>, AgentError> {
    let mut out = Vec::new();
    for (name, style) in scope.styles()? {
        let code = match code_for(map, &name) {
            Some(code) => code.to_string(),
            None if allow_unknown => name.clone(),
            None => return Err(scope.invalid(format!("unknown style '{}'", name))),
        };
        let render = format!("{}={}", code, ls_codes(&style));
        out.push((code, render));
    }
    Ok(out)
}

/// Create `LS_COLORS` for GNU ls
pub struct LsColors;

impl Agent for LsColors {
    fn name(&self) -> &'static str {
        "ls_colors"
    }

    fn description(&self) -> &'static str {
        "Create LS_COLORS environment variable for use with GNU ls"
    }

    fn run(&self, scope: &Scope) -> Result<String, AgentError> {
        let clear_builtin = scope.get_bool("clear_builtin")?.unwrap_or(false);

        let entries = entries(scope, LS_COLORS_MAP, false)?;
        let mut outlist: Vec<String> = entries.iter().map(|(_, render)| render.clone()).collect();

        if clear_builtin {
            for (_, code) in LS_COLORS_MAP {
                if !entries.iter().any(|(have, _)| have == code) {
                    outlist.push(format!("{}=0", code));
                }
            }
        }

        let varname = scope.get_nonempty("environment_variable").unwrap_or("LS_COLORS");
        // always set the variable, even when empty, to replace a previous theme
        Ok(format!("export {}=\"{}\"", varname, outlist.join(":")))
    }
}

/// Create `EZA_COLORS` for eza
pub struct Eza;

impl Agent for Eza {
    fn name(&self) -> &'static str {
        "eza"
    }

    fn description(&self) -> &'static str {
        "Create EZA_COLORS environment variable for use with ls replacement eza"
    }

    fn run(&self, scope: &Scope) -> Result<String, AgentError> {
        let mut outlist = Vec::new();
        if scope.get_bool("clear_builtin")?.unwrap_or(false) {
            outlist.push("reset".to_string());
        }
        outlist.extend(
            entries(scope, EZA_COLORS_MAP, true)?
                .into_iter()
                .map(|(_, render)| render),
        );

        let varname = scope.get_nonempty("environment_variable").unwrap_or("EZA_COLORS");
        Ok(format!("export {}=\"{}\"", varname, outlist.join(":")))
    }
}

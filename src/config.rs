//! Settings gathered from the environment
//!
//! `DYE_DIR` holds a `themes` directory, `DYE_THEME_FILE` names the theme used
//! when none is given on the command line, and `NO_COLOR` turns off styled
//! output.

use std::path::{Path, PathBuf};

use thiserror::Error;

/// Directory holding the `themes` directory
pub const ENV_DYE_DIR: &str = "DYE_DIR";

/// Theme file used when no theme is given on the command line
pub const ENV_THEME_FILE: &str = "DYE_THEME_FILE";

/// Any non-empty value turns off color
pub const ENV_NO_COLOR: &str = "NO_COLOR";

#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("cannot determine the themes directory; set DYE_DIR")]
    NoThemesDir,

    #[error("{}: is not a directory", .0.display())]
    NotADirectory(PathBuf),

    #[error("{name}: theme not found in {}", dir.display())]
    ThemeNotFound { name: String, dir: PathBuf },

    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Settings {
    /// `$DYE_DIR`
    pub dye_dir: Option<PathBuf>,
    /// `$DYE_THEME_FILE`
    pub theme_file: Option<PathBuf>,
    /// `$NO_COLOR` is set
    pub no_color: bool,
}

impl Settings {
    /// Read settings from the process environment
    pub fn from_env() -> Self {
        let var = |name: &str| std::env::var_os(name).filter(|v| !v.is_empty());
        Self {
            dye_dir: var(ENV_DYE_DIR).map(|v| expand_tilde(Path::new(&v))),
            theme_file: var(ENV_THEME_FILE).map(|v| expand_tilde(Path::new(&v))),
            no_color: var(ENV_NO_COLOR).is_some(),
        }
    }

    pub fn with_dye_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.dye_dir = Some(dir.into());
        self
    }

    pub fn with_theme_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.theme_file = Some(path.into());
        self
    }

    pub fn with_no_color(mut self, no_color: bool) -> Self {
        self.no_color = no_color;
        self
    }

    /// `$DYE_DIR/themes`, else `<config dir>/dye/themes`
    pub fn themes_dir(&self) -> Result<PathBuf, SettingsError> {
        match &self.dye_dir {
            Some(dir) => Ok(dir.join("themes")),
            None => dirs::config_dir()
                .map(|dir| dir.join("dye").join("themes"))
                .ok_or(SettingsError::NoThemesDir),
        }
    }

    /// Pick the theme file: explicit path, then a named theme, then `$DYE_THEME_FILE`
    pub fn locate_theme(
        &self,
        file: Option<&Path>,
        name: Option<&str>,
    ) -> Result<Option<PathBuf>, SettingsError> {
        if let Some(file) = file {
            return Ok(Some(expand_tilde(file)));
        }
        if let Some(name) = name {
            let dir = self.themes_dir()?;
            let path = dir.join(format!("{}.toml", name));
            if !path.is_file() {
                return Err(SettingsError::ThemeNotFound {
                    name: name.to_string(),
                    dir,
                });
            }
            return Ok(Some(path));
        }
        Ok(self.theme_file.clone())
    }

    /// Sorted names of the `*.toml` files in the themes directory
    pub fn list_themes(&self) -> Result<Vec<String>, SettingsError> {
        let dir = self.themes_dir()?;
        if !dir.is_dir() {
            return Err(SettingsError::NotADirectory(dir));
        }

        let entries = std::fs::read_dir(&dir).map_err(|source| SettingsError::Io {
            path: dir.clone(),
            source,
        })?;

        let mut themes: Vec<String> = entries
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| path.extension().is_some_and(|ext| ext == "toml"))
            .filter_map(|path| path.file_stem().map(|s| s.to_string_lossy().into_owned()))
            .collect();
        themes.sort();
        Ok(themes)
    }
}

/// Replace a leading `~` with the home directory
pub fn expand_tilde(path: &Path) -> PathBuf {
    let Ok(rest) = path.strip_prefix("~") else {
        return path.to_path_buf();
    };
    match dirs::home_dir() {
        Some(home) => home.join(rest),
        None => path.to_path_buf(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// A scratch `DYE_DIR` with an empty `themes` directory
    fn dye_dir() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("themes")).unwrap();
        dir
    }

    #[test]
    fn test_themes_dir_from_dye_dir() {
        let settings = Settings::default().with_dye_dir("/opt/dye");
        assert_eq!(settings.themes_dir().unwrap(), PathBuf::from("/opt/dye/themes"));
    }

    #[test]
    fn test_explicit_file_wins() {
        let settings = Settings::default().with_theme_file("/env/theme.toml");
        let found = settings
            .locate_theme(Some(Path::new("/cli/theme.toml")), Some("ignored"))
            .unwrap();
        assert_eq!(found, Some(PathBuf::from("/cli/theme.toml")));
    }

    #[test]
    fn test_env_theme_file_is_last_resort() {
        let settings = Settings::default().with_theme_file("/env/theme.toml");
        assert_eq!(
            settings.locate_theme(None, None).unwrap(),
            Some(PathBuf::from("/env/theme.toml"))
        );
        assert_eq!(Settings::default().locate_theme(None, None).unwrap(), None);
    }

    #[test]
    fn test_named_theme() {
        let dir = dye_dir();
        std::fs::write(dir.path().join("themes/dracula.toml"), "").unwrap();
        let settings = Settings::default().with_dye_dir(dir.path());

        assert_eq!(
            settings.locate_theme(None, Some("dracula")).unwrap(),
            Some(dir.path().join("themes/dracula.toml"))
        );
        assert!(matches!(
            settings.locate_theme(None, Some("missing")),
            Err(SettingsError::ThemeNotFound { .. })
        ));
    }

    #[test]
    fn test_list_themes_sorted() {
        let dir = dye_dir();
        for file in ["zenburn.toml", "dracula.toml", "notes.txt"] {
            std::fs::write(dir.path().join("themes").join(file), "").unwrap();
        }
        let settings = Settings::default().with_dye_dir(dir.path());
        assert_eq!(settings.list_themes().unwrap(), vec!["dracula", "zenburn"]);
    }

    #[test]
    fn test_list_themes_missing_dir() {
        let dir = tempfile::tempdir().unwrap();
        let settings = Settings::default().with_dye_dir(dir.path());
        assert!(matches!(
            settings.list_themes(),
            Err(SettingsError::NotADirectory(_))
        ));
    }

    #[test]
    fn test_expand_tilde() {
        assert_eq!(expand_tilde(Path::new("/abs/path")), PathBuf::from("/abs/path"));
        if let Some(home) = dirs::home_dir() {
            assert_eq!(expand_tilde(Path::new("~/themes")), home.join("themes"));
        }
    }
}

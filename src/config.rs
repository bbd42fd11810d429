//! User configuration (`config.toml`).

use directories::ProjectDirs;
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub sheet: SheetConfig,
    /// Log filter used when `RUST_LOG` is not set (e.g. "debug").
    pub log_level: Option<String>,
}

#[derive(Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct SheetConfig {
    pub rows: usize,
    pub columns: usize,
}

impl Default for SheetConfig {
    fn default() -> Self {
        SheetConfig {
            rows: 100,
            columns: 26,
        }
    }
}

/// Load configuration, falling back to defaults.
///
/// Problems never abort startup; they are returned as warnings for the caller
/// to print. A missing file is only reported when it was asked for explicitly.
pub fn load_config(config_file: Option<&Path>) -> (Config, Vec<String>) {
    let mut warnings: Vec<String> = Vec::new();
    let Some(path) = config_file.map(Path::to_path_buf).or_else(user_config_path) else {
        return (Config::default(), warnings);
    };

    if !path.exists() {
        if config_file.is_some() {
            warnings.push(format!("Config file not found: {}", path.display()));
        }
        return (Config::default(), warnings);
    }

    let config = match std::fs::read_to_string(&path) {
        Ok(content) => match toml::from_str::<Config>(&content) {
            Ok(parsed) => parsed,
            Err(err) => {
                warnings.push(format!("Failed to parse {}: {}", path.display(), err));
                Config::default()
            }
        },
        Err(err) => {
            warnings.push(format!("Failed to read {}: {}", path.display(), err));
            Config::default()
        }
    };
    (config, warnings)
}

fn user_config_path() -> Option<PathBuf> {
    let proj = ProjectDirs::from("", "", "tally")?;
    let mut path = proj.config_dir().to_path_buf();
    path.push("config.toml");
    Some(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_config(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.sheet.rows, 100);
        assert_eq!(config.sheet.columns, 26);
        assert_eq!(config.log_level, None);
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let file = write_config("[sheet]\nrows = 5\n");
        let (config, warnings) = load_config(Some(file.path()));
        assert!(warnings.is_empty());
        assert_eq!(config.sheet.rows, 5);
        assert_eq!(config.sheet.columns, 26);
    }

    #[test]
    fn test_full_file() {
        let file = write_config("log_level = \"debug\"\n\n[sheet]\nrows = 7\ncolumns = 3\n");
        let (config, warnings) = load_config(Some(file.path()));
        assert!(warnings.is_empty());
        assert_eq!(config.sheet, SheetConfig { rows: 7, columns: 3 });
        assert_eq!(config.log_level.as_deref(), Some("debug"));
    }

    #[test]
    fn test_bad_toml_warns_and_uses_defaults() {
        let file = write_config("[sheet\nrows = ");
        let (config, warnings) = load_config(Some(file.path()));
        assert_eq!(config, Config::default());
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].starts_with("Failed to parse"));
    }

    #[test]
    fn test_missing_explicit_file_warns() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nope.toml");
        let (config, warnings) = load_config(Some(&path));
        assert_eq!(config, Config::default());
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("not found"));
    }
}

use std::path::{Path, PathBuf};

pub const DATA_DIR_ENV: &str = "SCHOLAR_DATA_DIR";
pub const LOG_JSON_ENV: &str = "SCHOLAR_LOG_JSON";
const DEFAULT_DATA_DIR: &str = ".scholar";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Directory holding the slot store; one directory is one profile.
    pub data_dir: PathBuf,
    pub roster: Option<PathBuf>,
    pub log_json: bool,
}

impl Config {
    /// Flags win over the environment, the environment over defaults.
    pub fn resolve(data_dir: Option<PathBuf>, roster: Option<PathBuf>) -> Self {
        Self::from_lookup(data_dir, roster, |key| std::env::var(key).ok())
    }

    fn from_lookup(
        data_dir: Option<PathBuf>,
        roster: Option<PathBuf>,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Self {
        let data_dir = data_dir
            .or_else(|| lookup(DATA_DIR_ENV).filter(|v| !v.trim().is_empty()).map(PathBuf::from))
            .unwrap_or_else(|| Path::new(DEFAULT_DATA_DIR).to_path_buf());

        Self {
            data_dir,
            roster,
            log_json: lookup(LOG_JSON_ENV).map_or(false, |v| env_bool(&v)),
        }
    }
}

fn env_bool(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

use crate::i18n::LanguageFilter;
use anyhow::{ensure, Result};
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct Config {
    // Staging
    pub work_dir: PathBuf,

    // Languages
    pub languages: LanguageFilter,
    pub language_fixture: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            work_dir: std::env::temp_dir(),
            languages: LanguageFilter::All,
            language_fixture: None,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        // Load .env file if present
        let _ = dotenvy::dotenv();

        let work_dir = match std::env::var("LOCALIZE_WORK_DIR") {
            Ok(dir) => {
                let dir = PathBuf::from(dir);
                ensure!(
                    dir.is_dir(),
                    "LOCALIZE_WORK_DIR is not a directory: {}",
                    dir.display()
                );
                dir
            }
            Err(_) => std::env::temp_dir(),
        };

        let languages = std::env::var("LOCALIZE_LANGUAGES")
            .ok()
            .and_then(|v| v.parse::<LanguageFilter>().ok())
            .unwrap_or_default();

        let language_fixture = std::env::var("LOCALIZE_LANGUAGE_FIXTURE")
            .ok()
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from);

        Ok(Self {
            work_dir,
            languages,
            language_fixture,
        })
    }
}

//! Configuration file loader with multi-source merging

use super::file_config::FileConfig;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use std::path::{Path, PathBuf};

const APP_DIR: &str = "x-studio";
const PROJECT_FILES: [&str; 2] = ["x-studio.toml", ".x-studio.toml"];
const ENV_PREFIX: &str = "XSTUDIO_";

/// Configuration loader that handles file discovery and merging
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from all sources with proper priority
    ///
    /// Priority (highest to lowest):
    /// 1. `XSTUDIO_` environment variables (`__` separates sections,
    ///    e.g. `XSTUDIO_SELECTION__TEMPERATURE=0.7`)
    /// 2. Explicit config path (if provided)
    /// 3. Project root: `./x-studio.toml` or `./.x-studio.toml`
    /// 4. Global: `$XDG_CONFIG_HOME/x-studio/config.toml`
    /// 5. Default values
    pub fn load(config_path: Option<&PathBuf>) -> Result<FileConfig, Box<figment::Error>> {
        Self::load_layers(
            Self::global_config_path().as_deref(),
            Self::project_config_path().as_deref(),
            config_path.map(PathBuf::as_path),
            ENV_PREFIX,
        )
    }

    /// Load only default configuration (for --no-config)
    pub fn load_defaults() -> FileConfig {
        FileConfig::default()
    }

    fn load_layers(
        global: Option<&Path>,
        project: Option<&Path>,
        explicit: Option<&Path>,
        env_prefix: &str,
    ) -> Result<FileConfig, Box<figment::Error>> {
        let mut figment = Figment::new().merge(Serialized::defaults(FileConfig::default()));

        if let Some(path) = global
            && path.exists()
        {
            figment = figment.merge(Toml::file(path));
        }

        if let Some(path) = project
            && path.exists()
        {
            figment = figment.merge(Toml::file(path));
        }

        // A missing explicit file is an error, not an empty layer
        if let Some(path) = explicit {
            if !path.exists() {
                return Err(Box::new(figment::Error::from(format!(
                    "config file not found: {}",
                    path.display()
                ))));
            }
            figment = figment.merge(Toml::file(path));
        }

        figment = figment.merge(Env::prefixed(env_prefix).split("__"));

        figment.extract().map_err(Box::new)
    }

    /// Get the global config file path
    ///
    /// Returns XDG_CONFIG_HOME/x-studio/config.toml if set,
    /// otherwise falls back to ~/.config/x-studio/config.toml
    pub fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join(APP_DIR).join("config.toml"))
    }

    /// Get the project-level config file path (if it exists)
    pub fn project_config_path() -> Option<PathBuf> {
        PROJECT_FILES
            .iter()
            .map(PathBuf::from)
            .find(|path| path.exists())
    }

    /// Print the config file locations being used (for debugging)
    pub fn print_config_sources(config_path: Option<&PathBuf>) {
        println!("Configuration sources (in priority order):");

        println!("  [ENV  ] Environment: {}*", ENV_PREFIX);

        if let Some(path) = config_path {
            let marker = if path.exists() { "FOUND" } else { "MISS " };
            println!("  [{}] Explicit: {}", marker, path.display());
        }

        if let Some(path) = Self::project_config_path() {
            println!("  [FOUND] Project: {}", path.display());
        } else {
            println!("  [     ] Project: ./x-studio.toml or ./.x-studio.toml");
        }

        if let Some(path) = Self::global_config_path() {
            if path.exists() {
                println!("  [FOUND] Global:  {}", path.display());
            } else {
                println!("  [     ] Global:  {}", path.display());
            }
        }

        println!("  [     ] Default: built-in defaults");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::StorageBackend;

    const NO_ENV: &str = "XSTUDIO_LOADER_TEST_UNSET_";

    fn write(dir: &Path, name: &str, contents: &str) -> PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn test_load_defaults() {
        let config = ConfigLoader::load_defaults();
        assert_eq!(config.selection.temperature, 1.0);
        assert_eq!(config.generation.max_attempts, 3);
    }

    #[test]
    fn test_global_config_path_returns_some() {
        // Should return a path (even if file doesn't exist)
        let path = ConfigLoader::global_config_path();
        assert!(path.is_some());
        assert!(path.unwrap().to_string_lossy().contains("x-studio"));
    }

    #[test]
    fn test_no_files_yields_defaults() {
        let config = ConfigLoader::load_layers(None, None, None, NO_ENV).unwrap();
        assert_eq!(config, FileConfig::default());
    }

    #[test]
    fn test_later_layers_override_earlier() {
        let dir = tempfile::tempdir().unwrap();
        let global = write(
            dir.path(),
            "global.toml",
            "[selection]\ntemperature = 0.5\n[generation]\nmax_attempts = 7\n",
        );
        let project = write(
            dir.path(),
            "project.toml",
            "[selection]\ntemperature = 2.0\n[storage]\nbackend = \"memory\"\n",
        );
        let explicit = write(dir.path(), "explicit.toml", "[content]\nmax_chars = 140\n");

        let config = ConfigLoader::load_layers(
            Some(&global),
            Some(&project),
            Some(&explicit),
            NO_ENV,
        )
        .unwrap();

        assert_eq!(config.selection.temperature, 2.0);
        assert_eq!(config.generation.max_attempts, 7);
        assert_eq!(config.storage.backend, StorageBackend::Memory);
        assert_eq!(config.content.max_chars, 140);
        // untouched keys keep their defaults
        assert_eq!(config.generation.initial_backoff_ms, 500);
    }

    #[test]
    fn test_missing_layers_are_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("absent.toml");
        let config = ConfigLoader::load_layers(Some(&missing), Some(&missing), None, NO_ENV)
            .unwrap();
        assert_eq!(config, FileConfig::default());
    }

    #[test]
    fn test_missing_explicit_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("absent.toml");
        let result = ConfigLoader::load_layers(None, None, Some(&missing), NO_ENV);
        assert!(result.is_err());
    }

    #[test]
    fn test_malformed_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let bad = write(dir.path(), "bad.toml", "[selection]\ntemperature = \"hot\"\n");
        assert!(ConfigLoader::load_layers(None, None, Some(&bad), NO_ENV).is_err());
    }

    #[test]
    fn test_environment_overrides_files() {
        let prefix = "XSTUDIO_LOADER_TEST_ENV_";
        let dir = tempfile::tempdir().unwrap();
        let explicit = write(dir.path(), "explicit.toml", "[generation]\nmax_attempts = 2\n");

        // SAFETY: the variable name is unique to this test
        unsafe {
            std::env::set_var(format!("{}GENERATION__MAX_ATTEMPTS", prefix), "9");
        }
        let config = ConfigLoader::load_layers(None, None, Some(&explicit), prefix).unwrap();
        unsafe {
            std::env::remove_var(format!("{}GENERATION__MAX_ATTEMPTS", prefix));
        }

        assert_eq!(config.generation.max_attempts, 9);
    }
}

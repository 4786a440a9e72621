//! Configuration file loader with multi-source merging

use super::error::ConfigError;
use super::file_config::FileConfig;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Directory name under the platform config dir
const APP_DIR: &str = "quorum-debate";
/// Project-level config file names, checked in order
const PROJECT_FILES: [&str; 2] = ["debate.toml", ".debate.toml"];
/// Prefix of environment overrides; `__` separates nested keys
pub const ENV_PREFIX: &str = "DEBATE_";

/// Configuration loader that handles file discovery and merging
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from all sources with proper priority
    ///
    /// Priority (highest to lowest):
    /// 1. Environment: `DEBATE_OUTPUT__FORMAT=json`, `DEBATE_INVOCATION__MAX_RETRIES=2`, ...
    /// 2. Explicit config path (if provided)
    /// 3. Project root: `./debate.toml` or `./.debate.toml`
    /// 4. Global: `$XDG_CONFIG_HOME/quorum-debate/config.toml`
    /// 5. Default values
    ///
    /// Environment keys are lowercased, so they only reach the snake_case
    /// sections; `[debate]` is set from files or CLI flags.
    pub fn load(config_path: Option<&Path>) -> Result<FileConfig, ConfigError> {
        if let Some(path) = config_path
            && !path.exists()
        {
            return Err(ConfigError::NotFound(path.to_path_buf()));
        }
        let config = Self::figment(config_path).extract()?;
        Ok(config)
    }

    /// The merged figment, before extraction
    pub fn figment(config_path: Option<&Path>) -> Figment {
        let mut figment = Figment::new().merge(Serialized::defaults(FileConfig::default()));

        if let Some(global_path) = Self::global_config_path()
            && global_path.exists()
        {
            debug!(path = %global_path.display(), "Merging global config");
            figment = figment.merge(Toml::file(&global_path));
        }

        if let Some(project_path) = Self::project_config_path() {
            debug!(path = %project_path.display(), "Merging project config");
            figment = figment.merge(Toml::file(&project_path));
        }

        if let Some(path) = config_path {
            debug!(path = %path.display(), "Merging explicit config");
            figment = figment.merge(Toml::file(path));
        }

        figment.merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    /// Load only default configuration (for --no-config)
    pub fn load_defaults() -> FileConfig {
        FileConfig::default()
    }

    /// Get the global config file path
    ///
    /// Returns `$XDG_CONFIG_HOME/quorum-debate/config.toml` if set,
    /// otherwise the platform default config directory.
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

    /// Print the config file locations being used (for --show-config)
    pub fn print_config_sources(config_path: Option<&Path>) {
        println!("Configuration sources (in priority order):");

        println!("  [     ] Env:      {}*", ENV_PREFIX);

        if let Some(path) = config_path {
            let mark = if path.exists() { "FOUND" } else { "MISSING" };
            println!("  [{:<5}] Explicit: {}", mark, path.display());
        }

        if let Some(path) = Self::project_config_path() {
            println!("  [FOUND] Project:  {}", path.display());
        } else {
            println!("  [     ] Project:  ./{} or ./{}", PROJECT_FILES[0], PROJECT_FILES[1]);
        }

        if let Some(path) = Self::global_config_path() {
            let mark = if path.exists() { "FOUND" } else { "" };
            println!("  [{:<5}] Global:   {}", mark, path.display());
        }

        println!("  [     ] Default:  built-in defaults");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use debate_domain::OutputFormat;
    use figment::Jail;

    fn isolate_global(jail: &mut Jail) {
        let xdg = jail.directory().join("xdg");
        jail.set_env("XDG_CONFIG_HOME", xdg.display().to_string());
    }

    #[test]
    fn test_load_defaults() {
        let config = ConfigLoader::load_defaults();
        assert_eq!(config.debate.max_rounds, 3);
        assert!(config.debate.roles.is_empty());
        assert!(config.output.color);
    }

    #[test]
    fn test_global_config_path_returns_some() {
        // Should return a path (even if file doesn't exist)
        let path = ConfigLoader::global_config_path().unwrap();
        assert!(path.to_string_lossy().contains("quorum-debate"));
    }

    #[test]
    fn test_missing_explicit_file_is_an_error() {
        let err = ConfigLoader::load(Some(Path::new("/definitely/not/here.toml"))).unwrap_err();
        assert!(matches!(err, ConfigError::NotFound(_)));
    }

    #[test]
    fn test_layer_priority() {
        Jail::expect_with(|jail| {
            isolate_global(jail);
            std::fs::create_dir_all(jail.directory().join("xdg").join(APP_DIR))
                .map_err(|e| e.to_string())?;
            jail.create_file(
                "xdg/quorum-debate/config.toml",
                r#"
[debate]
maxRounds = 5
summaryEnabled = true

[output]
format = "full"
"#,
            )?;
            jail.create_file(
                "debate.toml",
                r#"
[debate]
maxRounds = 2
"#,
            )?;
            jail.create_file(
                "custom.toml",
                r#"
[output]
color = false
"#,
            )?;
            jail.set_env("DEBATE_OUTPUT__FORMAT", "json");
            jail.set_env("DEBATE_INVOCATION__MAX_RETRIES", "4");

            let config = ConfigLoader::load(Some(Path::new("custom.toml")))
                .map_err(|e| e.to_string())?;

            // project beats global, global beats defaults
            assert_eq!(config.debate.max_rounds, 2);
            assert!(config.debate.summary_enabled);
            // explicit file
            assert!(!config.output.color);
            // env beats files
            assert_eq!(config.output.format, Some(OutputFormat::Json));
            assert_eq!(config.invocation.max_retries, 4);
            Ok(())
        });
    }

    #[test]
    fn test_hidden_project_file() {
        Jail::expect_with(|jail| {
            isolate_global(jail);
            jail.create_file(
                ".debate.toml",
                r#"
[provider]
kind = "echo"
"#,
            )?;
            assert_eq!(
                ConfigLoader::project_config_path(),
                Some(PathBuf::from(".debate.toml"))
            );
            let config = ConfigLoader::load(None).map_err(|e| e.to_string())?;
            assert_eq!(config.provider.kind, "echo");
            Ok(())
        });
    }

    #[test]
    fn test_invalid_value_is_reported() {
        Jail::expect_with(|jail| {
            isolate_global(jail);
            jail.create_file(
                "debate.toml",
                r#"
[debate]
maxRounds = "many"
"#,
            )?;
            let err = ConfigLoader::load(None).unwrap_err();
            assert!(matches!(err, ConfigError::Invalid(_)));
            Ok(())
        });
    }
}

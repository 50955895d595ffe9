//! Host configuration.
//!
//! Layers, later wins: built-in defaults, the TOML config file, `PSCLI_*`
//! environment variables, then command-line overrides applied by `main`.

use std::io::IsTerminal;
use std::path::{Path, PathBuf};

use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use serde::{Deserialize, Serialize};

use crate::console::style::Style;
use crate::error::ConfigError;
use crate::user::builtins::history::DEFAULT_HISTORY_LIMIT;

/// Environment variable prefix.
pub const ENV_PREFIX: &str = "PSCLI_";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorMode {
    #[default]
    Auto,
    Always,
    Never,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HostConfig {
    /// Directories searched for `*.toml` plugin manifests, in order.
    pub plugin_dirs: Vec<PathBuf>,
    pub prompt: String,
    pub color: ColorMode,
    /// Default log filter when `RUST_LOG` is unset.
    pub log: String,
    pub history_limit: usize,
    /// Load the plugins compiled into the host.
    pub bundled_plugins: bool,
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            plugin_dirs: default_plugin_dir().into_iter().collect(),
            prompt: "pscli> ".to_string(),
            color: ColorMode::Auto,
            log: "warn".to_string(),
            history_limit: DEFAULT_HISTORY_LIMIT,
            bundled_plugins: true,
        }
    }
}

/// `<home>/.pscli/plugins`
pub fn default_plugin_dir() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".pscli").join("plugins"))
}

/// `<config dir>/pscli/config.toml`
pub fn default_config_file() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("pscli").join("config.toml"))
}

impl HostConfig {
    /// Assemble the configuration.
    ///
    /// An explicitly named file must exist; the default file is optional.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        let file = match explicit {
            Some(path) if !path.exists() => return Err(ConfigError::NotFound(path.to_path_buf())),
            Some(path) => Some(path.to_path_buf()),
            None => default_config_file(),
        };
        Self::figment(file.as_deref()).extract().map_err(ConfigError::from)
    }

    pub fn figment(file: Option<&Path>) -> Figment {
        let mut figment = Figment::from(Serialized::defaults(HostConfig::default()));
        if let Some(file) = file {
            debug!("config file: {}", file.display());
            figment = figment.merge(Toml::file(file));
        }
        figment.merge(Env::prefixed(ENV_PREFIX))
    }

    /// Pick the style table for this terminal.
    pub fn style(&self) -> Style {
        let ansi = match self.color {
            ColorMode::Always => true,
            ColorMode::Never => false,
            ColorMode::Auto => {
                std::env::var_os("NO_COLOR").is_none() && std::io::stdout().is_terminal()
            }
        };
        if ansi { Style::ansi() } else { Style::plain() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        figment::Jail::expect_with(|_jail| {
            let config: HostConfig = HostConfig::figment(None).extract()?;
            assert_eq!(config.prompt, "pscli> ");
            assert_eq!(config.color, ColorMode::Auto);
            assert_eq!(config.history_limit, DEFAULT_HISTORY_LIMIT);
            assert!(config.bundled_plugins);
            Ok(())
        });
    }

    #[test]
    fn test_file_then_env_layering() {
        figment::Jail::expect_with(|jail| {
            jail.create_file(
                "pscli.toml",
                r#"
                    plugin_dirs = ["plugins", "more"]
                    prompt = "> "
                    color = "never"
                    history_limit = 5
                "#,
            )?;
            jail.set_env("PSCLI_HISTORY_LIMIT", "9");

            let config: HostConfig =
                HostConfig::figment(Some(Path::new("pscli.toml"))).extract()?;
            assert_eq!(
                config.plugin_dirs,
                vec![PathBuf::from("plugins"), PathBuf::from("more")]
            );
            assert_eq!(config.prompt, "> ");
            assert_eq!(config.color, ColorMode::Never);
            assert_eq!(config.history_limit, 9);
            assert_eq!(config.log, "warn");
            assert!(config.style().is_plain());
            Ok(())
        });
    }

    #[test]
    fn test_explicit_missing_file_is_an_error() {
        let err = HostConfig::load(Some(Path::new("/definitely/not/here.toml"))).unwrap_err();
        assert!(matches!(err, ConfigError::NotFound(_)));
    }

    #[test]
    fn test_bad_value_is_an_error() {
        figment::Jail::expect_with(|jail| {
            jail.create_file("bad.toml", "history_limit = \"lots\"")?;
            assert!(HostConfig::load(Some(Path::new("bad.toml"))).is_err());
            Ok(())
        });
    }
}

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Application configuration with strongly-typed sections.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AppConfig {
    /// Backend API endpoint settings.
    pub api: ApiConfig,
    /// Local session persistence settings.
    pub session: SessionConfig,
    /// Logging configuration (optional, uses console defaults if None).
    pub logging: Option<LoggingConfig>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ApiConfig {
    /// API root, including the base path (e.g. "http://127.0.0.1:8080/api").
    pub base_url: String,
    #[serde(default)]
    pub timeout_sec: u64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct SessionConfig {
    pub home_dir: String, // will be normalized to absolute path
}

/// Logging configuration - maps subsystem names to their logging settings.
/// Key "default" is the catch-all for logs that don't match explicit subsystems.
pub type LoggingConfig = HashMap<String, Section>;

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Section {
    pub console_level: String, // "info", "debug", "error", "off"
    #[serde(default)]
    pub file: String, // "logs/inventory.log"
    #[serde(default)]
    pub file_level: String,
    #[serde(default)]
    pub max_size_mb: Option<u64>, // Max size of the file in MB
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:8080/api".to_string(),
            timeout_sec: 30,
        }
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            // Empty => resolved to $HOME/.inventory-client on load.
            home_dir: String::new(),
        }
    }
}

/// Create a default logging configuration.
pub fn default_logging_config() -> LoggingConfig {
    let mut logging = HashMap::new();
    logging.insert(
        "default".to_string(),
        Section {
            console_level: "info".to_string(),
            file: String::new(),
            file_level: "debug".to_string(),
            max_size_mb: Some(20),
        },
    );
    logging
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api: ApiConfig::default(),
            session: SessionConfig::default(),
            logging: Some(default_logging_config()),
        }
    }
}

impl AppConfig {
    /// Load configuration with layered loading: defaults → YAML file → environment variables.
    /// Also normalizes `session.home_dir` into an absolute path and creates the directory.
    pub fn load_layered<P: AsRef<Path>>(config_path: P) -> Result<Self> {
        Self::load_or_default(Some(config_path))
    }

    /// Load configuration with or without a YAML file; environment variables
    /// apply either way. Also normalizes `session.home_dir` into an absolute
    /// path and creates the directory.
    pub fn load_or_default<P: AsRef<Path>>(config_path: Option<P>) -> Result<Self> {
        use figment::{
            providers::{Env, Format, Serialized, Yaml},
            Figment,
        };

        // Start from a minimal base where the optional logging section is
        // None, so it stays None unless explicitly provided by YAML/ENV.
        let base = AppConfig {
            api: ApiConfig::default(),
            session: SessionConfig::default(),
            logging: None,
        };

        let mut figment = Figment::new().merge(Serialized::defaults(base));
        if let Some(path) = config_path {
            figment = figment.merge(Yaml::file(path.as_ref()));
        }
        // Example: INVENTORY__API__BASE_URL=... maps to api.base_url
        let figment = figment.merge(Env::prefixed("INVENTORY__").split("__"));

        let mut config: AppConfig = figment
            .extract()
            .with_context(|| "Failed to extract config from figment".to_string())?;

        normalize_home_dir_inplace(&mut config.session)
            .context("Failed to resolve session.home_dir")?;

        Ok(config)
    }

    /// Serialize configuration to YAML.
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self).context("Failed to serialize config to YAML")
    }

    /// Apply overrides from command line arguments.
    pub fn apply_cli_overrides(&mut self, args: &CliArgs) {
        if let Some(base_url) = &args.base_url {
            self.api.base_url = base_url.clone();
        }

        // Set logging level based on verbose flags for "default" section.
        let logging = self.logging.get_or_insert_with(default_logging_config);
        if let Some(default_section) = logging.get_mut("default") {
            default_section.console_level = match args.verbose {
                0 => default_section.console_level.clone(), // keep
                1 => "debug".to_string(),
                _ => "trace".to_string(),
            };
        }
    }

    pub fn home_dir(&self) -> &Path {
        Path::new(&self.session.home_dir)
    }
}

/// Command line arguments structure.
#[derive(Debug, Clone, Default)]
pub struct CliArgs {
    pub config: Option<String>,
    pub base_url: Option<String>,
    pub print_config: bool,
    pub verbose: u8,
}

const fn default_subdir() -> &'static str {
    ".inventory-client"
}

/// Normalize `session.home_dir` into an absolute, existing directory and
/// store it back. An empty value resolves to `$HOME/.inventory-client`; a
/// leading `~` expands to the user's home directory.
fn normalize_home_dir_inplace(session: &mut SessionConfig) -> Result<()> {
    let raw = session.home_dir.trim();

    let resolved: PathBuf = if raw.is_empty() {
        user_home()?.join(default_subdir())
    } else if let Some(rest) = raw.strip_prefix("~/") {
        user_home()?.join(rest)
    } else if raw == "~" {
        user_home()?
    } else {
        let p = PathBuf::from(raw);
        if p.is_absolute() {
            p
        } else {
            std::env::current_dir()?.join(p)
        }
    };

    std::fs::create_dir_all(&resolved)
        .with_context(|| format!("Failed to create home dir {}", resolved.display()))?;

    session.home_dir = resolved.to_string_lossy().to_string();
    Ok(())
}

fn user_home() -> Result<PathBuf> {
    dirs::home_dir().context("Cannot determine the user home directory")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    /// Helper: a normalized home_dir should be absolute and not start with '~'.
    fn is_normalized_path(p: &str) -> bool {
        let pb = PathBuf::from(p);
        pb.is_absolute() && !p.starts_with('~')
    }

    #[test]
    fn default_config_structure() {
        let config = AppConfig::default();

        assert_eq!(config.api.base_url, "http://127.0.0.1:8080/api");
        assert_eq!(config.api.timeout_sec, 30);
        // raw (not yet normalized)
        assert_eq!(config.session.home_dir, "");

        let logging = config.logging.as_ref().unwrap();
        assert!(logging.contains_key("default"));
        assert_eq!(logging["default"].console_level, "info");
    }

    #[test]
    fn load_layered_reads_yaml_and_normalizes_home_dir() {
        let tmp = tempdir().unwrap();
        let cfg_path = tmp.path().join("cfg.yaml");
        let home = tmp.path().join("client-home");

        let yaml = format!(
            r#"
api:
  base_url: "http://inventory.local/api"
  timeout_sec: 5

session:
  home_dir: "{}"

logging:
  default:
    console_level: debug
"#,
            home.display()
        );
        fs::write(&cfg_path, yaml).unwrap();

        let config = AppConfig::load_layered(&cfg_path).unwrap();
        assert_eq!(config.api.base_url, "http://inventory.local/api");
        assert_eq!(config.api.timeout_sec, 5);
        assert!(is_normalized_path(&config.session.home_dir));
        assert!(home.is_dir());

        let logging = config.logging.unwrap();
        assert_eq!(logging["default"].console_level, "debug");
    }

    #[test]
    fn missing_file_keeps_defaults() {
        let tmp = tempdir().unwrap();
        let config = AppConfig::load_layered(tmp.path().join("nope.yaml")).unwrap();
        assert_eq!(config.api.base_url, "http://127.0.0.1:8080/api");
        // Logging stays None when no layer provides it.
        assert!(config.logging.is_none());
    }

    #[test]
    fn cli_overrides_apply() {
        let mut config = AppConfig::default();
        let args = CliArgs {
            base_url: Some("http://other:9999/api".to_string()),
            verbose: 2,
            ..CliArgs::default()
        };
        config.apply_cli_overrides(&args);

        assert_eq!(config.api.base_url, "http://other:9999/api");
        assert_eq!(
            config.logging.unwrap()["default"].console_level,
            "trace"
        );
    }

    #[test]
    fn round_trips_through_yaml() {
        let config = AppConfig::default();
        let yaml = config.to_yaml().unwrap();
        let back: AppConfig = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(back.api.base_url, config.api.base_url);
    }
}

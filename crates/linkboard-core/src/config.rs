//! Application configuration
//!
//! Loaded from a TOML file (default `config.toml` in the working directory)
//! with environment variable overrides under the `LINKBOARD_` prefix.
//! A missing file loads defaults.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::PageMeta;

/// Environment variable prefix
const ENV_PREFIX: &str = "LINKBOARD";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file '{path}': {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Address the HTTP server binds to
    #[serde(default = "default_http_addr")]
    pub http_addr: String,

    /// Path to the SQLite database file
    #[serde(default = "default_db_file")]
    pub db_file: PathBuf,

    /// Static page metadata
    #[serde(default)]
    pub page: PageConfig,

    /// Admin basic-auth credentials
    #[serde(default)]
    pub auth: AuthConfig,

    /// Social network name -> profile URL
    #[serde(default)]
    pub social: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PageConfig {
    #[serde(default)]
    pub logo_url: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub intro: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AuthConfig {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            http_addr: default_http_addr(),
            db_file: default_db_file(),
            page: PageConfig::default(),
            auth: AuthConfig::default(),
            social: BTreeMap::new(),
        }
    }
}

impl Config {
    /// Load configuration from a file, falling back to defaults when the
    /// file does not exist. Environment overrides are applied either way.
    pub fn load_from_path(path: &Path) -> Result<Self, ConfigError> {
        let mut config = if path.exists() {
            let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
                path: path.to_path_buf(),
                source,
            })?;
            toml::from_str(&content).map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            })?
        } else {
            Self::default()
        };

        config.apply_env_overrides();
        Ok(config)
    }

    /// Load configuration from a TOML string (useful for testing)
    pub fn load_from_str(toml_content: &str) -> Result<Self, toml::de::Error> {
        let mut config: Config = toml::from_str(toml_content)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Apply environment variable overrides
    fn apply_env_overrides(&mut self) {
        if let Ok(val) = std::env::var(format!("{ENV_PREFIX}_HTTP_ADDR")) {
            self.http_addr = val;
        }
        if let Ok(val) = std::env::var(format!("{ENV_PREFIX}_DB_FILE")) {
            self.db_file = PathBuf::from(val);
        }
    }

    /// The static page metadata this configuration describes
    pub fn page_meta(&self) -> PageMeta {
        PageMeta {
            logo_url: self.page.logo_url.clone(),
            title: self.page.title.clone(),
            intro: self.page.intro.clone(),
            social: self.social.clone(),
        }
    }

    /// Sample configuration written by first-run initialization
    pub fn sample_toml() -> &'static str {
        r#"http_addr = "0.0.0.0:9000"
db_file = "app.db"

[page]
logo_url = "/static/logo.png"
title = "My Links"
intro = "A collection of my favorite places on the web."

[auth]
username = "admin"
password = "change-me"

[social]
github = "https://github.com/example"
mastodon = "https://mastodon.social/@example"
"#
    }
}

fn default_http_addr() -> String {
    "0.0.0.0:9000".to_string()
}

fn default_db_file() -> PathBuf {
    PathBuf::from("app.db")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::Mutex;

    // Mutex to serialize tests that touch environment variables
    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    struct EnvGuard<'a> {
        _lock: std::sync::MutexGuard<'a, ()>,
        saved: Vec<(String, Option<String>)>,
    }

    impl<'a> EnvGuard<'a> {
        fn new(vars: &[&str]) -> Self {
            let lock = ENV_MUTEX.lock().unwrap();
            let saved = vars
                .iter()
                .map(|&name| (name.to_string(), env::var(name).ok()))
                .collect();
            for name in vars {
                env::remove_var(name);
            }
            Self { _lock: lock, saved }
        }
    }

    impl Drop for EnvGuard<'_> {
        fn drop(&mut self) {
            for (name, value) in &self.saved {
                match value {
                    Some(v) => env::set_var(name, v),
                    None => env::remove_var(name),
                }
            }
        }
    }

    const ENV_VARS: &[&str] = &["LINKBOARD_HTTP_ADDR", "LINKBOARD_DB_FILE"];

    #[test]
    fn test_defaults() {
        let _guard = EnvGuard::new(ENV_VARS);
        let config = Config::default();
        assert_eq!(config.http_addr, "0.0.0.0:9000");
        assert_eq!(config.db_file, PathBuf::from("app.db"));
        assert!(config.auth.username.is_empty());
        assert!(config.social.is_empty());
    }

    #[test]
    fn test_load_from_str() {
        let _guard = EnvGuard::new(ENV_VARS);
        let toml = r#"
            http_addr = "127.0.0.1:8080"
            db_file = "/data/links.db"

            [page]
            title = "My Links"
            intro = "hello"

            [auth]
            username = "admin"
            password = "secret"

            [social]
            github = "https://github.com/me"
        "#;

        let config = Config::load_from_str(toml).unwrap();
        assert_eq!(config.http_addr, "127.0.0.1:8080");
        assert_eq!(config.db_file, PathBuf::from("/data/links.db"));
        assert_eq!(config.page.title, "My Links");
        assert_eq!(config.auth.username, "admin");
        assert_eq!(config.social["github"], "https://github.com/me");
    }

    #[test]
    fn test_env_overrides() {
        let _guard = EnvGuard::new(ENV_VARS);

        env::set_var("LINKBOARD_HTTP_ADDR", "127.0.0.1:7777");
        env::set_var("LINKBOARD_DB_FILE", "/tmp/other.db");

        let config = Config::load_from_str("").unwrap();
        assert_eq!(config.http_addr, "127.0.0.1:7777");
        assert_eq!(config.db_file, PathBuf::from("/tmp/other.db"));
    }

    #[test]
    fn test_load_from_path_missing_file() {
        let _guard = EnvGuard::new(ENV_VARS);
        let config = Config::load_from_path(Path::new("/nonexistent/config.toml")).unwrap();
        assert_eq!(config.http_addr, "0.0.0.0:9000");
    }

    #[test]
    fn test_sample_toml_parses() {
        let _guard = EnvGuard::new(ENV_VARS);
        let config = Config::load_from_str(Config::sample_toml()).unwrap();
        assert_eq!(config.auth.username, "admin");
        assert_eq!(config.page.title, "My Links");
        assert_eq!(config.social.len(), 2);
    }

    #[test]
    fn test_page_meta() {
        let _guard = EnvGuard::new(ENV_VARS);
        let config = Config::load_from_str(Config::sample_toml()).unwrap();
        let meta = config.page_meta();
        assert_eq!(meta.title, "My Links");
        assert_eq!(meta.social["github"], "https://github.com/example");
    }
}

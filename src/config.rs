use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_API_URL: &str = "https://localhost:5000";
pub const API_URL_ENV: &str = "MAILSYNC_API_URL";

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Config {
    #[serde(default = "default_api_url")]
    pub api_url: String,
    /// Address the OAuth return page is served on, e.g. "127.0.0.1:5173"
    pub callback_addr: Option<String>,
    /// Backend session cookie as `name=value`
    pub session_cookie: Option<String>,
    pub storage_path: Option<String>,
    pub log_path: Option<String>,
    /// The backend ships with a self-signed localhost certificate
    #[serde(default)]
    pub accept_invalid_certs: bool,
    pub mock_auth_delay_ms: Option<u64>,
}

fn default_api_url() -> String {
    DEFAULT_API_URL.to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            callback_addr: None,
            session_cookie: None,
            storage_path: None,
            log_path: None,
            accept_invalid_certs: false,
            mock_auth_delay_ms: None,
        }
    }
}

fn config_dir() -> Result<PathBuf> {
    Ok(dirs::config_dir()
        .ok_or_else(|| anyhow::anyhow!("no config dir available"))?
        .join("mailsync"))
}

fn in_config_dir(file: &str) -> Result<PathBuf> {
    let mut p = config_dir()?;
    fs::create_dir_all(&p)?;
    p.push(file);
    Ok(p)
}

pub fn config_path() -> Result<PathBuf> {
    in_config_dir("config.toml")
}

pub fn load_config() -> Result<Config> {
    let mut cfg = load_config_from(&config_path()?)?;
    if let Ok(url) = std::env::var(API_URL_ENV) {
        cfg.api_url = url;
    }
    Ok(cfg)
}

pub fn load_config_from(path: &Path) -> Result<Config> {
    if !path.exists() {
        // create a template config for users to edit
        let sample = Config {
            api_url: DEFAULT_API_URL.to_string(),
            callback_addr: Some("127.0.0.1:5173".to_string()),
            session_cookie: None,
            storage_path: None,
            log_path: None,
            accept_invalid_certs: true,
            mock_auth_delay_ms: Some(1000),
        };
        let tom = format!(
            "# MailSync configuration\n# session_cookie = \"session=...\"  (or use `mailsync set-session-cookie`)\n{}",
            toml::to_string_pretty(&sample)?
        );
        fs::write(path, tom)?;
        return Err(anyhow::anyhow!(
            "Created template config at {}; edit it and run again",
            path.display()
        ));
    }
    let s = fs::read_to_string(path)?;
    let cfg: Config = toml::from_str(&s)?;
    Ok(cfg)
}

pub fn resolve_storage_path(cfg: &Config) -> Result<PathBuf> {
    match &cfg.storage_path {
        Some(p) => Ok(PathBuf::from(p)),
        None => in_config_dir("storage.json"),
    }
}

pub fn resolve_log_path(cfg: &Config) -> Result<PathBuf> {
    match &cfg.log_path {
        Some(p) => Ok(PathBuf::from(p)),
        None => in_config_dir("mailsync.log"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_writes_template_and_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        let err = load_config_from(&path).unwrap_err();
        assert!(err.to_string().contains("Created template config"));

        // the template itself must be loadable
        let cfg = load_config_from(&path).unwrap();
        assert_eq!(cfg.api_url, DEFAULT_API_URL);
        assert_eq!(cfg.callback_addr.as_deref(), Some("127.0.0.1:5173"));
    }

    #[test]
    fn minimal_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "session_cookie = \"session=abc\"\n").unwrap();

        let cfg = load_config_from(&path).unwrap();
        assert_eq!(cfg.api_url, DEFAULT_API_URL);
        assert_eq!(cfg.session_cookie.as_deref(), Some("session=abc"));
        assert!(!cfg.accept_invalid_certs);
    }
}

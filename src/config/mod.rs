//! Configuration management

use anyhow::{bail, Context, Result};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct Config {
    #[serde(default = "default_port")]
    pub port: u16,

    /// Directory holding the built web bundle served at `/`.
    #[serde(default = "default_static_dir")]
    pub static_dir: String,

    /// Origin of the platform REST API. When unset the server only hosts
    /// static files and every `/api` request answers 502.
    #[serde(default)]
    pub backend_url: Option<String>,
}

fn default_port() -> u16 {
    8080
}

fn default_static_dir() -> String {
    "dist".to_string()
}

/// Get config directory (XDG_CONFIG_HOME or platform default)
pub fn get_config_dir() -> std::path::PathBuf {
    if let Ok(dir) = std::env::var("PIXC_CONFIG_DIR") {
        return std::path::PathBuf::from(dir);
    }

    #[cfg(target_os = "macos")]
    {
        if let Ok(home) = std::env::var("HOME") {
            return std::path::PathBuf::from(home).join("Library/Application Support/pix-console");
        }
    }

    #[cfg(target_os = "linux")]
    {
        if let Ok(xdg) = std::env::var("XDG_CONFIG_HOME") {
            return std::path::PathBuf::from(xdg).join("pix-console");
        }
        if let Ok(home) = std::env::var("HOME") {
            return std::path::PathBuf::from(home).join(".config/pix-console");
        }
    }

    #[cfg(target_os = "windows")]
    {
        if let Ok(appdata) = std::env::var("APPDATA") {
            return std::path::PathBuf::from(appdata).join("pix-console");
        }
    }

    // Fallback to current directory
    std::path::PathBuf::from(".")
}

pub fn load_config() -> Result<Config> {
    let config_dir = get_config_dir();

    let mut builder = ::config::Config::builder()
        // Start with defaults
        .set_default("port", default_port() as i64)?
        .set_default("static_dir", default_static_dir())?
        // Load from config file if it exists
        .add_source(
            ::config::File::with_name(&config_dir.join("config").to_string_lossy()).required(false),
        )
        // Override with environment variables (PIXC_PORT, PIXC_BACKEND_URL, etc.)
        .add_source(
            ::config::Environment::with_prefix("PIXC")
                .separator("__")
                .try_parsing(true),
        );

    // Support PORT env vars with explicit precedence: PIXC_PORT > PORT > config > default
    // Handle manually to ensure consistent behavior across all environments
    if let Ok(port) = std::env::var("PIXC_PORT") {
        if let Ok(port_num) = port.parse::<u16>() {
            builder = builder.set_override("port", port_num as i64)?;
        }
    } else if let Ok(port) = std::env::var("PORT") {
        // Legacy PORT fallback (Docker, PaaS platforms)
        if let Ok(port_num) = port.parse::<u16>() {
            builder = builder.set_override("port", port_num as i64)?;
        }
    }

    let config: Config = builder.build()?.try_deserialize()?;

    if let Some(backend) = &config.backend_url {
        validate_backend_url(backend)?;
    }

    Ok(config)
}

/// The proxy target must be an absolute http(s) origin.
fn validate_backend_url(raw: &str) -> Result<()> {
    let parsed = url::Url::parse(raw).with_context(|| format!("invalid backend_url: {raw}"))?;
    if parsed.scheme() != "http" && parsed.scheme() != "https" {
        bail!("backend_url must be http or https, got: {raw}");
    }
    if parsed.host_str().is_none() {
        bail!("backend_url has no host: {raw}");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::env;

    fn clear_env() {
        env::remove_var("PIXC_PORT");
        env::remove_var("PORT");
        env::remove_var("PIXC_BACKEND_URL");
        env::remove_var("PIXC_STATIC_DIR");
        env::remove_var("PIXC_CONFIG_DIR");
    }

    #[test]
    #[serial]
    fn test_defaults_without_config_file() {
        clear_env();
        env::set_var("PIXC_CONFIG_DIR", "/tmp/pixc-test-nonexistent");

        let config = load_config().expect("config should load");

        clear_env();

        assert_eq!(config.port, 8080);
        assert_eq!(config.static_dir, "dist");
        assert!(config.backend_url.is_none());
    }

    #[test]
    #[serial]
    fn test_port_env_fallback() {
        // PORT env var should work as fallback when PIXC_PORT is not set
        clear_env();
        env::set_var("PIXC_CONFIG_DIR", "/tmp/pixc-test-nonexistent");
        env::set_var("PORT", "3000");

        let config = load_config().expect("config should load");

        clear_env();

        assert_eq!(config.port, 3000, "PORT env var should set config.port");
    }

    #[test]
    #[serial]
    fn test_pixc_port_takes_precedence_over_port() {
        clear_env();
        env::set_var("PIXC_CONFIG_DIR", "/tmp/pixc-test-nonexistent");
        env::set_var("PIXC_PORT", "5000");
        env::set_var("PORT", "3000");

        let config = load_config().expect("config should load");

        clear_env();

        assert_eq!(
            config.port, 5000,
            "PIXC_PORT should take precedence over PORT"
        );
    }

    #[test]
    #[serial]
    fn test_invalid_port_uses_default() {
        clear_env();
        env::set_var("PIXC_CONFIG_DIR", "/tmp/pixc-test-nonexistent");
        env::set_var("PORT", "not-a-number");

        let config = load_config().expect("config should load");

        clear_env();

        assert_eq!(config.port, 8080, "Invalid PORT should fall back to default");
    }

    #[test]
    #[serial]
    fn test_backend_url_from_env() {
        clear_env();
        env::set_var("PIXC_CONFIG_DIR", "/tmp/pixc-test-nonexistent");
        env::set_var("PIXC_BACKEND_URL", "https://api.example.com");

        let config = load_config().expect("config should load");

        clear_env();

        assert_eq!(
            config.backend_url.as_deref(),
            Some("https://api.example.com")
        );
    }

    #[test]
    #[serial]
    fn test_rejects_malformed_backend_url() {
        clear_env();
        env::set_var("PIXC_CONFIG_DIR", "/tmp/pixc-test-nonexistent");
        env::set_var("PIXC_BACKEND_URL", "not a url");

        let result = load_config();

        clear_env();

        assert!(result.is_err(), "malformed backend_url should be rejected");
    }

    #[test]
    #[serial]
    fn test_rejects_non_http_backend_url() {
        clear_env();
        env::set_var("PIXC_CONFIG_DIR", "/tmp/pixc-test-nonexistent");
        env::set_var("PIXC_BACKEND_URL", "ftp://api.example.com");

        let result = load_config();

        clear_env();

        assert!(result.is_err(), "non-http backend_url should be rejected");
    }

    #[test]
    #[serial]
    fn test_reads_config_file_from_config_dir() {
        clear_env();
        let temp_dir = tempfile::tempdir().expect("create temp dir");
        std::fs::write(
            temp_dir.path().join("config.toml"),
            "port = 9999\nstatic_dir = \"web\"\n",
        )
        .expect("write config file");
        env::set_var("PIXC_CONFIG_DIR", temp_dir.path());

        let config = load_config().expect("config should load");

        clear_env();

        assert_eq!(config.port, 9999);
        assert_eq!(config.static_dir, "web");
    }
}

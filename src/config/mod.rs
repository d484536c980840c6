#[cfg(feature = "cli")]
pub mod cli;
pub mod toml_config;

#[cfg(feature = "cli")]
pub use cli::CliConfig;
pub use toml_config::TomlConfig;

use crate::utils::error::Result;
use crate::utils::logger::LogFormat;
use crate::utils::validation::{
    validate_at_least, validate_bind_host, validate_tracking_uri, Validate,
};
use std::time::Duration;

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8000;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
        }
    }
}

impl ServerConfig {
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModelConfig {
    /// Raw value as configured; reported verbatim by the health endpoint.
    pub uri: Option<String>,
    pub tracking_uri: Option<String>,
    pub load_timeout_secs: Option<u64>,
}

impl ModelConfig {
    pub fn load_timeout(&self) -> Option<Duration> {
        self.load_timeout_secs.map(Duration::from_secs)
    }
}

/// Effective settings after merging defaults, the config file and the command line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Settings {
    pub server: ServerConfig,
    pub model: ModelConfig,
    pub log_format: LogFormat,
    pub verbose: bool,
}

impl Settings {
    pub fn from_toml(file: TomlConfig) -> Self {
        let defaults = ServerConfig::default();
        let logging = file.logging.unwrap_or_default();
        Self {
            server: ServerConfig {
                host: file.server.host.unwrap_or(defaults.host),
                port: file.server.port.unwrap_or(defaults.port),
            },
            model: ModelConfig {
                uri: file.model.uri,
                tracking_uri: file.model.tracking_uri,
                load_timeout_secs: file.model.load_timeout_secs,
            },
            log_format: logging.format.unwrap_or_default(),
            verbose: logging.verbose.unwrap_or(false),
        }
    }

    /// 命令列與環境變數優先於設定檔
    #[cfg(feature = "cli")]
    pub fn resolve(cli: &CliConfig) -> Result<Self> {
        let file = match &cli.config {
            Some(path) => TomlConfig::from_file(path)?,
            None => TomlConfig::default(),
        };
        let mut settings = Self::from_toml(file);

        if let Some(host) = &cli.host {
            settings.server.host = host.clone();
        }
        if let Some(port) = cli.port {
            settings.server.port = port;
        }
        if cli.model_uri.is_some() {
            settings.model.uri = cli.model_uri.clone();
        }
        if cli.tracking_uri.is_some() {
            settings.model.tracking_uri = cli.tracking_uri.clone();
        }
        if cli.load_timeout_secs.is_some() {
            settings.model.load_timeout_secs = cli.load_timeout_secs;
        }
        if let Some(format) = cli.log_format {
            settings.log_format = format;
        }
        settings.verbose |= cli.verbose;

        Ok(settings)
    }
}

impl Validate for Settings {
    fn validate(&self) -> Result<()> {
        validate_bind_host("server.host", &self.server.host)?;
        validate_at_least("server.port", u64::from(self.server.port), 1)?;

        if let Some(tracking_uri) = &self.model.tracking_uri {
            validate_tracking_uri("model.tracking_uri", tracking_uri)?;
        }
        if let Some(timeout) = self.model.load_timeout_secs {
            validate_at_least("model.load_timeout_secs", timeout, 1)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = Settings::from_toml(TomlConfig::default());
        assert_eq!(settings.server.addr(), "0.0.0.0:8000");
        assert_eq!(settings.model.uri, None);
        assert_eq!(settings.log_format, LogFormat::Compact);
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_validation_rejects_bad_values() {
        let mut settings = Settings::default();
        settings.model.tracking_uri = Some("ftp://mlflow:5000".to_string());
        assert!(settings.validate().is_err());

        // A bare path names a file-backed tracking store.
        let mut settings = Settings::default();
        settings.model.tracking_uri = Some("./mlruns".to_string());
        assert!(settings.validate().is_ok());

        let mut settings = Settings::default();
        settings.server.port = 0;
        assert!(settings.validate().is_err());

        let mut settings = Settings::default();
        settings.model.load_timeout_secs = Some(0);
        assert!(settings.validate().is_err());
    }

    #[cfg(feature = "cli")]
    #[test]
    fn test_cli_overrides_file() {
        use std::io::Write;

        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(
            br#"
[server]
host = "127.0.0.1"
port = 9000

[model]
uri = "runs:/from-file/model"
tracking_uri = "http://file-tracking:5000"
"#,
        )
        .unwrap();

        let cli = CliConfig {
            config: Some(file.path().to_path_buf()),
            port: Some(8080),
            model_uri: Some("runs:/from-cli/model".to_string()),
            ..Default::default()
        };

        let settings = Settings::resolve(&cli).unwrap();
        assert_eq!(settings.server.host, "127.0.0.1");
        assert_eq!(settings.server.port, 8080);
        assert_eq!(settings.model.uri.as_deref(), Some("runs:/from-cli/model"));
        assert_eq!(
            settings.model.tracking_uri.as_deref(),
            Some("http://file-tracking:5000")
        );
    }
}

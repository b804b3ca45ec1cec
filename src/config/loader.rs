use std::path::Path;

use super::{AppConfig, ConfigError};

/// Load configuration from a YAML file
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<AppConfig, ConfigError> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(ConfigError::NotFound(path.display().to_string()));
    }

    let content = std::fs::read_to_string(path)?;
    let config: AppConfig = serde_yaml::from_str(&content)?;

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_config(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_load_missing_config() {
        let result = load_config("/nonexistent/config.yaml");
        assert!(result.is_err());
        assert!(matches!(result.unwrap_err(), ConfigError::NotFound(_)));
    }

    #[test]
    fn test_load_config_invalid_yaml() {
        let file = write_config("invalid: yaml: content: [");

        let result = load_config(file.path());
        assert!(matches!(result.unwrap_err(), ConfigError::Parse(_)));
    }

    #[test]
    fn test_load_config_valid() {
        let file = write_config(
            r#"
server:
  port: 8066
  host: "0.0.0.0"

backend:
  url: "https://models.internal:8443/"
  tls:
    accept_invalid_certs: true
    ca_cert_path: "/etc/ssl/models-ca.pem"
"#,
        );

        let config = load_config(file.path()).unwrap();
        assert_eq!(config.server.port, 8066);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.backend.base_url(), "https://models.internal:8443");
        let tls = config.backend.tls.unwrap();
        assert!(tls.accept_invalid_certs);
        assert_eq!(tls.ca_cert_path.as_deref(), Some("/etc/ssl/models-ca.pem"));
    }

    #[test]
    fn test_load_config_minimal() {
        let file = write_config(
            r#"
backend:
  url: "http://10.0.0.5:8000"
"#,
        );

        let config = load_config(file.path()).unwrap();
        assert_eq!(config.backend.url, "http://10.0.0.5:8000");
        assert_eq!(config.server.port, 3000);
        assert!(config.backend.tls.is_none());
    }

    #[test]
    fn test_load_config_empty_mapping_uses_defaults() {
        let file = write_config("{}\n");

        let config = load_config(file.path()).unwrap();
        assert_eq!(config.backend.url, super::super::DEFAULT_BACKEND_URL);
        assert_eq!(config.server.host, "127.0.0.1");
    }

    #[test]
    fn test_config_from_file() {
        let result = AppConfig::from_file("/nonexistent/path.yaml");
        assert!(result.is_err());
    }
}

use crate::config::ClientConfig;
use crate::utils::error::{FirmhouseError, Result};
use crate::utils::validation::Validate;
use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// On-disk configuration file.
///
/// ```toml
/// [client]
/// access_token = "${FIRMHOUSE_API_TOKEN}"
/// access_type = "write"
/// base_url = "https://portal.firmhouse.com/graphql"
/// timeout_seconds = 20
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TomlConfig {
    pub client: ClientConfig,
    pub output: Option<OutputConfig>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OutputConfig {
    pub format: Option<String>,
    pub page_size: Option<u32>,
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(FirmhouseError::Io)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| FirmhouseError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${FIRMHOUSE_API_TOKEN})
    ///
    /// Unknown variables are left as written so validation can point at them.
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| FirmhouseError::ConfigError {
            message: format!("Invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn page_size(&self) -> Option<u32> {
        self.output.as_ref().and_then(|o| o.page_size)
    }

    pub fn into_client_config(self) -> ClientConfig {
        self.client
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        if self.client.access_token.contains("${") {
            return Err(FirmhouseError::MissingConfigError {
                field: format!("client.access_token ({})", self.client.access_token),
            });
        }
        self.client.validate()?;

        if let Some(page_size) = self.page_size() {
            crate::utils::validation::validate_range("output.page_size", page_size, 1, 100)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{AccessType, DEFAULT_BASE_URL};
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_minimal_config() {
        let toml_content = r#"
[client]
access_token = "abc123"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();

        assert_eq!(config.client.access_token, "abc123");
        assert_eq!(config.client.access_type, AccessType::Storefront);
        assert_eq!(config.client.base_url, DEFAULT_BASE_URL);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("TEST_FIRMHOUSE_TOML_TOKEN", "from-env");

        let toml_content = r#"
[client]
access_token = "${TEST_FIRMHOUSE_TOML_TOKEN}"
access_type = "write"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.client.access_token, "from-env");
        assert_eq!(config.client.access_type, AccessType::Write);

        std::env::remove_var("TEST_FIRMHOUSE_TOML_TOKEN");
    }

    #[test]
    fn test_unresolved_variable_fails_validation() {
        let toml_content = r#"
[client]
access_token = "${TEST_FIRMHOUSE_TOML_UNSET_VAR}"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_page_size() {
        let toml_content = r#"
[client]
access_token = "abc"

[output]
page_size = 500
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();

        let toml_content = r#"
[client]
access_token = "file-token"
base_url = "https://staging.example.com/graphql"
timeout_seconds = 5

[output]
format = "csv"
"#;

        temp_file.write_all(toml_content.as_bytes()).unwrap();

        let config = TomlConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.client.base_url, "https://staging.example.com/graphql");
        assert_eq!(config.client.timeout_seconds, 5);
        assert_eq!(config.output.unwrap().format.as_deref(), Some("csv"));
    }

    #[test]
    fn test_client_config_from_file_validates() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file
            .write_all(b"[client]\naccess_token = \"t\"\naccess_type = \"write\"\ntimeout_seconds = 900\n")
            .unwrap();

        let result = ClientConfig::from_file(temp_file.path());
        assert!(matches!(result, Err(FirmhouseError::InvalidConfigValueError { .. })));
    }

    #[test]
    fn test_malformed_toml_is_config_error() {
        let result = TomlConfig::from_toml_str("[client\naccess_token = 1");
        assert!(matches!(result, Err(FirmhouseError::ConfigError { .. })));
    }
}

use crate::core::parser::{DEFAULT_IMAGE_BASE_URL, DEFAULT_IMAGE_SIZE};
use crate::domain::model::SortCriterion;
use crate::domain::ports::ConfigProvider;
use crate::utils::error::{MovieError, Result};
use crate::utils::validation::{self, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const DEFAULT_API_BASE_URL: &str = "https://api.themoviedb.org/3";
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 30;
pub const DEFAULT_PROBE_ADDR: &str = "api.themoviedb.org:443";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TomlConfig {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub images: ImagesConfig,
    #[serde(default)]
    pub connectivity: ConnectivityConfig,
    #[serde(default)]
    pub list: ListConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_api_base_url")]
    pub base_url: String,
    #[serde(default)]
    pub api_key: String,
    pub timeout_seconds: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImagesConfig {
    #[serde(default = "default_image_base_url")]
    pub base_url: String,
    #[serde(default = "default_image_size")]
    pub size: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConnectivityConfig {
    #[serde(default = "default_probe_addr")]
    pub probe_addr: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListConfig {
    #[serde(default)]
    pub default_sort: SortCriterion,
}

fn default_api_base_url() -> String {
    DEFAULT_API_BASE_URL.to_string()
}

fn default_image_base_url() -> String {
    DEFAULT_IMAGE_BASE_URL.to_string()
}

fn default_image_size() -> String {
    DEFAULT_IMAGE_SIZE.to_string()
}

fn default_probe_addr() -> String {
    DEFAULT_PROBE_ADDR.to_string()
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_api_base_url(),
            api_key: String::new(),
            timeout_seconds: None,
        }
    }
}

impl Default for ImagesConfig {
    fn default() -> Self {
        Self {
            base_url: default_image_base_url(),
            size: default_image_size(),
        }
    }
}

impl Default for ConnectivityConfig {
    fn default() -> Self {
        Self {
            probe_addr: default_probe_addr(),
        }
    }
}

impl TomlConfig {
    /// Loads configuration from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(MovieError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// Parses configuration from a TOML string, after `${VAR}` substitution.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| MovieError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Replaces `${VAR}` with the environment value; unknown variables are left as-is.
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| MovieError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: e.to_string(),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn default_sort(&self) -> SortCriterion {
        self.list.default_sort
    }

    pub fn validate_config(&self) -> Result<()> {
        validation::validate_url("api.base_url", &self.api.base_url)?;

        validation::validate_non_empty_string("api.api_key", &self.api.api_key)?;
        if self.api.api_key.contains("${") {
            return Err(MovieError::InvalidConfigValueError {
                field: "api.api_key".to_string(),
                value: self.api.api_key.clone(),
                reason: "Environment variable placeholder was not resolved".to_string(),
            });
        }

        if let Some(timeout) = self.api.timeout_seconds {
            validation::validate_positive_number("api.timeout_seconds", timeout, 1)?;
        }

        validation::validate_url_prefix("images.base_url", &self.images.base_url)?;
        validation::validate_non_empty_string("images.size", &self.images.size)?;
        validation::validate_host_port("connectivity.probe_addr", &self.connectivity.probe_addr)?;

        Ok(())
    }
}

impl ConfigProvider for TomlConfig {
    fn api_base_url(&self) -> &str {
        &self.api.base_url
    }

    fn api_key(&self) -> &str {
        &self.api.api_key
    }

    fn image_base_url(&self) -> &str {
        &self.images.base_url
    }

    fn image_size(&self) -> &str {
        &self.images.size
    }

    fn request_timeout_secs(&self) -> u64 {
        self.api.timeout_seconds.unwrap_or(DEFAULT_TIMEOUT_SECONDS)
    }

    fn connectivity_probe_addr(&self) -> &str {
        &self.connectivity.probe_addr
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_full_toml_config() {
        let toml_content = r#"
[api]
base_url = "https://api.themoviedb.org/3"
api_key = "abc123"
timeout_seconds = 10

[images]
base_url = "https://image.tmdb.org/t/p/"
size = "w342"

[connectivity]
probe_addr = "api.themoviedb.org:443"

[list]
default_sort = "top_rated"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();

        assert_eq!(config.api_key(), "abc123");
        assert_eq!(config.request_timeout_secs(), 10);
        assert_eq!(config.image_size(), "w342");
        assert_eq!(config.default_sort(), SortCriterion::TopRated);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_defaults_for_missing_sections() {
        let config = TomlConfig::from_toml_str("[api]\napi_key = \"k\"\n").unwrap();

        assert_eq!(config.api_base_url(), DEFAULT_API_BASE_URL);
        assert_eq!(config.image_base_url(), "http://image.tmdb.org/t/p/");
        assert_eq!(config.image_size(), "w185");
        assert_eq!(config.request_timeout_secs(), DEFAULT_TIMEOUT_SECONDS);
        assert_eq!(config.connectivity_probe_addr(), DEFAULT_PROBE_ADDR);
        assert_eq!(config.default_sort(), SortCriterion::MostPopular);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("TMDB_MOVIES_TEST_API_KEY", "from-env");

        let toml_content = r#"
[api]
api_key = "${TMDB_MOVIES_TEST_API_KEY}"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.api.api_key, "from-env");

        std::env::remove_var("TMDB_MOVIES_TEST_API_KEY");
    }

    #[test]
    fn test_unresolved_placeholder_fails_validation() {
        let toml_content = r#"
[api]
api_key = "${TMDB_MOVIES_TEST_UNSET_VARIABLE}"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.api.api_key, "${TMDB_MOVIES_TEST_UNSET_VARIABLE}");
        assert!(matches!(
            config.validate(),
            Err(MovieError::InvalidConfigValueError { .. })
        ));
    }

    #[test]
    fn test_config_validation() {
        let cases = [
            "[api]\napi_key = \"\"\n",
            "[api]\napi_key = \"k\"\nbase_url = \"invalid-url\"\n",
            "[api]\napi_key = \"k\"\ntimeout_seconds = 0\n",
            "[api]\napi_key = \"k\"\n[images]\nbase_url = \"http://image.tmdb.org/t/p\"\n",
            "[api]\napi_key = \"k\"\n[connectivity]\nprobe_addr = \"nohost\"\n",
        ];

        for toml_content in cases {
            let config = TomlConfig::from_toml_str(toml_content).unwrap();
            assert!(config.validate().is_err(), "{} should be rejected", toml_content);
        }
    }

    #[test]
    fn test_invalid_toml_and_sort() {
        assert!(matches!(
            TomlConfig::from_toml_str("[api"),
            Err(MovieError::ConfigValidationError { .. })
        ));
        assert!(TomlConfig::from_toml_str("[list]\ndefault_sort = \"upcoming\"\n").is_err());
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file
            .write_all(b"[api]\napi_key = \"file-key\"\n\n[list]\ndefault_sort = \"popular\"\n")
            .unwrap();

        let config = TomlConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.api_key(), "file-key");
        assert_eq!(config.default_sort(), SortCriterion::MostPopular);
    }
}

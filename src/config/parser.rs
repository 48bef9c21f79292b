use crate::config::types::Config;
use crate::config::validation::validate;
use crate::ConfigError;
use sha2::{Digest, Sha256};
use std::path::Path;

/// Loads and parses a configuration file from the given path
///
/// # Example
///
/// ```no_run
/// use std::path::Path;
/// use vncrawl::config::load_config;
///
/// let config = load_config(Path::new("config.toml")).unwrap();
/// println!("Max depth: {}", config.crawler.max_depth);
/// ```
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    let config: Config = toml::from_str(&content)?;
    validate(&config)?;
    Ok(config)
}

/// Computes a SHA-256 hash of the configuration file content
///
/// Used to tell which configuration produced a given output set when
/// comparing crawl runs.
pub fn compute_config_hash(path: &Path) -> Result<String, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    Ok(hex::encode(hasher.finalize()))
}

/// Loads a configuration and returns both the config and its hash
pub fn load_config_with_hash(path: &Path) -> Result<(Config, String), ConfigError> {
    let config = load_config(path)?;
    let hash = compute_config_hash(path)?;
    Ok((config, hash))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Backend;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_temp_config(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_load_valid_config() {
        let config_content = r#"
[crawler]
backend = "http"
max-depth = 1
delay-ms = 500

[output]
directory = "./out"

[[site]]
name = "baomoi"
seeds = ["https://baomoi.com/van-hoa.epi"]
url-must-contain = [".epi"]
"#;

        let file = create_temp_config(config_content);
        let config = load_config(file.path()).unwrap();

        assert_eq!(config.crawler.backend, Backend::Http);
        assert_eq!(config.crawler.max_depth, 1);
        assert_eq!(config.crawler.delay_ms, 500);
        assert_eq!(config.site.len(), 1);
        assert_eq!(config.site[0].url_must_contain, vec![".epi".to_string()]);
    }

    #[test]
    fn test_defaults_applied() {
        let config_content = r#"
[crawler]

[output]
directory = "./out"

[[site]]
name = "nhandan"
seeds = ["https://nhandan.vn/vanhoa/"]
"#;

        let file = create_temp_config(config_content);
        let config = load_config(file.path()).unwrap();

        assert_eq!(config.crawler.backend, Backend::Http);
        assert_eq!(config.crawler.max_depth, 2);
        assert_eq!(config.crawler.delay_ms, 1000);
        assert_eq!(config.crawler.timeout_secs, 30);
        assert!(config.crawler.headless);
        assert!(config.crawler.max_pages.is_none());
        assert_eq!(config.site[0].title_selector, "h1");
    }

    #[test]
    fn test_browser_backend_parses() {
        let config_content = r#"
[crawler]
backend = "browser"
headless = false

[output]
directory = "./out"

[[site]]
name = "baovanhoa"
seeds = ["https://baovanhoa.vn/"]
"#;

        let file = create_temp_config(config_content);
        let config = load_config(file.path()).unwrap();
        assert_eq!(config.crawler.backend, Backend::Browser);
        assert!(!config.crawler.headless);
    }

    #[test]
    fn test_load_config_with_invalid_path() {
        let result = load_config(Path::new("/nonexistent/config.toml"));
        assert!(result.is_err());
    }

    #[test]
    fn test_load_config_with_invalid_toml() {
        let file = create_temp_config("this is not valid TOML {{{");
        assert!(load_config(file.path()).is_err());
    }

    #[test]
    fn test_unknown_backend_rejected() {
        let config_content = r#"
[crawler]
backend = "carrier-pigeon"

[output]
directory = "./out"

[[site]]
name = "a"
seeds = ["https://example.com/"]
"#;
        let file = create_temp_config(config_content);
        assert!(matches!(
            load_config(file.path()),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_compute_config_hash() {
        let file = create_temp_config("test content");

        let hash1 = compute_config_hash(file.path()).unwrap();
        let hash2 = compute_config_hash(file.path()).unwrap();

        assert_eq!(hash1, hash2);
        assert_eq!(hash1.len(), 64);
    }

    #[test]
    fn test_different_content_different_hash() {
        let file1 = create_temp_config("content 1");
        let file2 = create_temp_config("content 2");

        assert_ne!(
            compute_config_hash(file1.path()).unwrap(),
            compute_config_hash(file2.path()).unwrap()
        );
    }
}

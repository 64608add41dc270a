use crate::config::types::Config;
use crate::config::validation::validate;
use crate::ConfigError;
use sha2::{Digest, Sha256};
use std::path::Path;

/// Loads and parses a configuration file from the given path
///
/// Missing sections and keys take their defaults.
///
/// # Returns
///
/// * `Ok(Config)` - Successfully loaded and validated configuration
/// * `Err(ConfigError)` - Failed to load, parse, or validate the configuration
///
/// # Example
///
/// ```no_run
/// use std::path::Path;
/// use newsreel::config::load_config;
///
/// let config = load_config(Path::new("newsreel.toml")).unwrap();
/// println!("Polling {}", config.crawler.listing_url);
/// ```
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    let config = parse_config(&content)?;
    validate(&config)?;
    Ok(config)
}

/// Parses TOML configuration text without validating it
pub fn parse_config(content: &str) -> Result<Config, ConfigError> {
    Ok(toml::from_str(content)?)
}

/// Computes a SHA-256 hash of the configuration file content
///
/// Logged at startup so runs can be matched to the configuration they used.
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
listing-url = "https://lobste.rs/"
max-items = 10
wait-secs = 60
max-concurrent-detail-fetches = 2
cycles = 4

[http]
timeout-secs = 15
user-agent = "TestCrawler/1.0"

[output]
folder = "./stories"
"#;

        let file = create_temp_config(config_content);
        let config = load_config(file.path()).unwrap();

        assert_eq!(config.crawler.listing_url, "https://lobste.rs/");
        assert_eq!(config.crawler.max_items, 10);
        assert_eq!(config.crawler.wait_secs, 60);
        assert_eq!(config.crawler.max_concurrent_detail_fetches, 2);
        assert_eq!(config.crawler.cycles, Some(4));
        assert_eq!(config.http.timeout_secs, 15);
        assert_eq!(config.http.connect_timeout_secs, 10);
        assert_eq!(config.http.user_agent, "TestCrawler/1.0");
        assert_eq!(config.output.folder, std::path::PathBuf::from("./stories"));
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = parse_config("").unwrap();

        assert_eq!(config.crawler.listing_url, "https://news.ycombinator.com/");
        assert_eq!(config.crawler.max_items, 5);
        assert_eq!(config.crawler.wait_secs, 30);
        assert_eq!(config.crawler.cycles, None);
        assert_eq!(config.crawler.base_url(), "https://news.ycombinator.com/");
        assert_eq!(config.output.folder, std::path::PathBuf::from("news"));
    }

    #[test]
    fn test_base_url_override() {
        let config = parse_config(
            r#"
[crawler]
listing-url = "https://news.ycombinator.com/newest"
base-url = "https://news.ycombinator.com/"
"#,
        )
        .unwrap();

        assert_eq!(config.crawler.base_url(), "https://news.ycombinator.com/");
    }

    #[test]
    fn test_base_url_always_ends_with_slash() {
        let config = parse_config("[crawler]\nlisting-url = \"https://news.ycombinator.com\"\n").unwrap();
        assert_eq!(config.crawler.base_url(), "https://news.ycombinator.com/");

        let config = parse_config(
            "[crawler]\nlisting-url = \"https://news.ycombinator.com/newest?p=2\"\n",
        )
        .unwrap();
        assert_eq!(config.crawler.base_url(), "https://news.ycombinator.com/");

        let config = parse_config("[crawler]\nbase-url = \"https://example.com/board\"\n").unwrap();
        assert_eq!(config.crawler.base_url(), "https://example.com/board/");
    }

    #[test]
    fn test_load_config_with_invalid_path() {
        let result = load_config(Path::new("/nonexistent/newsreel.toml"));
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }

    #[test]
    fn test_load_config_with_invalid_toml() {
        let file = create_temp_config("this is not valid TOML {{{");
        let result = load_config(file.path());
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_load_config_with_validation_error() {
        let file = create_temp_config("[crawler]\nmax-items = 0\n");
        let result = load_config(file.path());
        assert!(matches!(result, Err(ConfigError::Validation(_))));
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

        let hash1 = compute_config_hash(file1.path()).unwrap();
        let hash2 = compute_config_hash(file2.path()).unwrap();

        assert_ne!(hash1, hash2);
    }
}

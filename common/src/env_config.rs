use std::{env, path::PathBuf, sync::Arc, time::Duration};

#[derive(Clone, Debug)]
/// Configuration struct for the workspace.
///
/// Holds everything the binary needs to open the key-value store,
/// set up logging, run the session component and reach the
/// text-generation provider.
pub struct Config {
    // environment
    pub environment: String, // development or production
    /// Path of the JSON file backing the key-value store.
    pub storage_path: PathBuf,
    /// A boolean indicating whether console logging is enabled.
    pub console_logging_enabled: bool,
    /// Log level filter (`error`, `warn`, `info`, `debug`, `trace`).
    pub log_level: String,
    /// Optional file that receives a copy of every log line.
    pub log_file: Option<PathBuf>,
    /// Session component settings.
    pub auth_config: AuthConfig,
    /// Text-generation provider settings.
    pub gemini_config: GeminiConfig,
}

#[derive(Clone, Debug)]
/// Configuration for the local credential store.
pub struct AuthConfig {
    /// Delay inserted before login and signup complete.
    pub latency: Duration,
    /// Store new passwords as Argon2 hashes instead of plain text.
    pub hash_passwords: bool,
}

#[derive(Clone, Debug)]
/// Configuration for the Gemini `generateContent` endpoint.
pub struct GeminiConfig {
    /// API key. `None` makes every generation call return the
    /// missing-key placeholder.
    pub api_key: Option<String>,
    /// Model name, e.g. `gemini-3-flash-preview`.
    pub model: String,
    /// Scheme and host of the provider.
    pub base_url: String,
}

impl Default for AuthConfig {
    fn default() -> Self {
        AuthConfig {
            latency: Duration::from_millis(800),
            hash_passwords: false,
        }
    }
}

impl AuthConfig {
    /// Creates a new `AuthConfig` instance from environment variables.
    ///
    /// - `AUTH_LATENCY_MS`: Optional. Defaults to 800.
    /// - `HASH_PASSWORDS`: Optional. Defaults to false.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        AuthConfig {
            latency: Duration::from_millis(
                env::var("AUTH_LATENCY_MS")
                    .unwrap_or_else(|_| "800".to_string())
                    .parse()
                    .unwrap_or(800),
            ),
            hash_passwords: parse_bool(env::var("HASH_PASSWORDS").ok(), false),
        }
    }
}

impl GeminiConfig {
    pub const DEFAULT_MODEL: &'static str = "gemini-3-flash-preview";
    pub const DEFAULT_BASE_URL: &'static str = "https://generativelanguage.googleapis.com";

    /// Creates a new `GeminiConfig` instance from environment variables.
    ///
    /// - `API_KEY`: Optional. Empty values count as missing.
    /// - `GEMINI_MODEL`, `GEMINI_BASE_URL`: Optional, with provider defaults.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        GeminiConfig {
            api_key: env::var("API_KEY").ok().filter(|k| !k.trim().is_empty()),
            model: env::var("GEMINI_MODEL").unwrap_or_else(|_| Self::DEFAULT_MODEL.to_string()),
            base_url: env::var("GEMINI_BASE_URL")
                .unwrap_or_else(|_| Self::DEFAULT_BASE_URL.to_string()),
        }
    }
}

impl Config {
    /// Creates a new `Config` instance from environment variables.
    ///
    /// Every setting is optional:
    /// - `ENVIRONMENT`: default "development"
    /// - `STORAGE_PATH`: default ".nexus/storage.json"
    /// - `ENABLE_CONSOLE_LOGGING`: default true
    /// - `LOG_LEVEL`: default "info"
    /// - `LOG_FILE`: default unset
    /// - see `AuthConfig::from_env` and `GeminiConfig::from_env`
    pub fn from_env() -> Arc<Self> {
        dotenvy::dotenv().ok();

        Arc::new(Config {
            environment: env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string()),
            storage_path: env::var("STORAGE_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(".nexus/storage.json")),
            console_logging_enabled: parse_bool(env::var("ENABLE_CONSOLE_LOGGING").ok(), true),
            log_level: env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
            log_file: env::var("LOG_FILE").ok().map(PathBuf::from),
            auth_config: AuthConfig::from_env(),
            gemini_config: GeminiConfig::from_env(),
        })
    }
}

fn parse_bool(value: Option<String>, default: bool) -> bool {
    match value {
        Some(v) => matches!(v.trim().to_lowercase().as_str(), "true" | "1" | "yes"),
        None => default,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_bool_falls_back_to_default() {
        assert!(parse_bool(None, true));
        assert!(!parse_bool(None, false));
        assert!(parse_bool(Some("TRUE".into()), false));
        assert!(parse_bool(Some("1".into()), false));
        assert!(!parse_bool(Some("nope".into()), true));
    }

    #[test]
    fn auth_defaults_match_the_dashboard() {
        let auth = AuthConfig::default();
        assert_eq!(auth.latency, Duration::from_millis(800));
        assert!(!auth.hash_passwords);
    }
}

use crate::error::{PassportError, Result};
use crate::logger::{LogFormat, LogLevel, LoggerConfig};
use std::env;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_MODEL: &str = "gemini-2.5-flash-image";
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_OUTPUT_DIR: &str = "passport-photos";

/// Set and non-blank, or `None`.
fn non_empty_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|value| !value.trim().is_empty())
}

#[derive(Debug, Clone)]
pub struct GeminiConfig {
    pub api_key: Option<String>,
    pub model: String,
    pub base_url: String,
    pub timeout: Option<Duration>,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        GeminiConfig {
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: None,
        }
    }
}

impl GeminiConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads `GEMINI_API_KEY` (falling back to `API_KEY`), `GEMINI_MODEL` and
    /// `GEMINI_BASE_URL`. Blank values count as unset.
    pub fn from_env() -> Self {
        let api_key = non_empty_var("GEMINI_API_KEY").or_else(|| non_empty_var("API_KEY"));
        let model = non_empty_var("GEMINI_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string());
        let base_url =
            non_empty_var("GEMINI_BASE_URL").unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        GeminiConfig {
            api_key,
            model,
            base_url,
            timeout: None,
        }
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn require_api_key(&self) -> Result<&str> {
        self.api_key
            .as_deref()
            .ok_or(PassportError::MissingCredential)
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub gemini: GeminiConfig,
    pub output_dir: PathBuf,
    pub log_level: LogLevel,
    pub log_format: LogFormat,
    pub log_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            gemini: GeminiConfig::default(),
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            log_level: LogLevel::Info,
            log_format: LogFormat::Text,
            log_file: None,
        }
    }
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads the application config. The credential is checked here so a
    /// missing key stops the process before any work starts.
    pub fn from_env() -> Result<Self> {
        let gemini = GeminiConfig::from_env();
        gemini.require_api_key()?;

        let output_dir = non_empty_var("PASSPORT_OUTPUT_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_DIR));
        let log_level = match non_empty_var("PASSPORT_LOG_LEVEL") {
            Some(raw) => raw.parse().map_err(PassportError::Config)?,
            None => LogLevel::Info,
        };
        let log_format = match non_empty_var("PASSPORT_LOG_FORMAT") {
            Some(raw) => raw.parse().map_err(PassportError::Config)?,
            None => LogFormat::Text,
        };
        let log_file = non_empty_var("PASSPORT_LOG_FILE").map(PathBuf::from);

        Ok(Config {
            gemini,
            output_dir,
            log_level,
            log_format,
            log_file,
        })
    }

    pub fn with_gemini(mut self, config: GeminiConfig) -> Self {
        self.gemini = config;
        self
    }

    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = dir.into();
        self
    }

    pub fn with_log_level(mut self, level: LogLevel) -> Self {
        self.log_level = level;
        self
    }

    pub fn with_log_format(mut self, format: LogFormat) -> Self {
        self.log_format = format;
        self
    }

    pub fn with_log_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.log_file = Some(path.into());
        self
    }

    /// Debug and trace levels get the development preset with source locations.
    pub fn logger_config(&self) -> LoggerConfig {
        let base = if self.log_level <= LogLevel::Debug {
            LoggerConfig::development()
        } else {
            LoggerConfig::new()
        };
        let config = base
            .with_level(self.log_level)
            .with_format(self.log_format);
        match &self.log_file {
            Some(path) => config.with_file_output(path.clone()),
            None => config,
        }
    }
}

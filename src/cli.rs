use crate::{
    config::Config,
    logger::{LogFormat, LogLevel},
};
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

/// Turn photos into passport-style variants with the Gemini image model.
///
/// The API key is read from GEMINI_API_KEY (or API_KEY). Flags override the
/// matching PASSPORT_* / GEMINI_* environment variables.
#[derive(Debug, Parser)]
#[command(name = "passport-gen", version, about)]
pub struct Cli {
    /// PNG, JPEG or WEBP photos to transform
    pub images: Vec<PathBuf>,

    /// Directory the generated photos are written to
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,

    /// Gemini model id
    #[arg(long)]
    pub model: Option<String>,

    /// Gemini API base URL
    #[arg(long)]
    pub base_url: Option<String>,

    /// Per-request timeout in seconds (no timeout when omitted)
    #[arg(long)]
    pub timeout_secs: Option<u64>,

    /// trace, debug, info, warn or error
    #[arg(long)]
    pub log_level: Option<LogLevel>,

    /// text or json
    #[arg(long)]
    pub log_format: Option<LogFormat>,

    /// Also append log records to this file
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

impl Cli {
    /// Layers the flags that were given on top of `config`.
    pub fn apply(&self, mut config: Config) -> Config {
        if let Some(dir) = &self.output_dir {
            config = config.with_output_dir(dir.clone());
        }
        if let Some(model) = &self.model {
            config.gemini = config.gemini.with_model(model.clone());
        }
        if let Some(base_url) = &self.base_url {
            config.gemini = config.gemini.with_base_url(base_url.clone());
        }
        if let Some(secs) = self.timeout_secs {
            config.gemini = config.gemini.with_timeout(Duration::from_secs(secs));
        }
        if let Some(level) = self.log_level {
            config = config.with_log_level(level);
        }
        if let Some(format) = self.log_format {
            config = config.with_log_format(format);
        }
        if let Some(path) = &self.log_file {
            config = config.with_log_file(path.clone());
        }
        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{GeminiConfig, DEFAULT_MODEL};

    fn base() -> Config {
        Config::new()
            .with_output_dir("from-env")
            .with_gemini(GeminiConfig::new().with_api_key("key"))
    }

    #[test]
    fn test_positional_images_and_flags() {
        let cli = Cli::try_parse_from([
            "passport-gen",
            "a.png",
            "b.jpg",
            "-o",
            "out",
            "--model",
            "gemini-exp",
            "--timeout-secs",
            "45",
            "--log-level",
            "debug",
            "--log-format",
            "json",
        ])
        .unwrap();
        assert_eq!(cli.images, vec![PathBuf::from("a.png"), PathBuf::from("b.jpg")]);

        let config = cli.apply(base());
        assert_eq!(config.output_dir, PathBuf::from("out"));
        assert_eq!(config.gemini.model, "gemini-exp");
        assert_eq!(config.gemini.timeout, Some(Duration::from_secs(45)));
        assert_eq!(config.log_level, LogLevel::Debug);
        assert_eq!(config.log_format, LogFormat::Json);
        assert_eq!(config.gemini.api_key.as_deref(), Some("key"));
    }

    #[test]
    fn test_environment_values_survive_without_flags() {
        let cli = Cli::try_parse_from(["passport-gen"]).unwrap();
        assert!(cli.images.is_empty());

        let config = cli.apply(base());
        assert_eq!(config.output_dir, PathBuf::from("from-env"));
        assert_eq!(config.gemini.model, DEFAULT_MODEL);
        assert!(config.gemini.timeout.is_none());
        assert!(config.log_file.is_none());
    }

    #[test]
    fn test_help_and_version_are_not_images() {
        let help = Cli::try_parse_from(["passport-gen", "--help"]).unwrap_err();
        assert_eq!(help.kind(), clap::error::ErrorKind::DisplayHelp);

        let version = Cli::try_parse_from(["passport-gen", "--version"]).unwrap_err();
        assert_eq!(version.kind(), clap::error::ErrorKind::DisplayVersion);
    }

    #[test]
    fn test_bad_log_level_is_rejected() {
        let err = Cli::try_parse_from(["passport-gen", "--log-level", "loud", "a.png"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::ValueValidation);
    }
}

//! Error-logging configuration loaded from TOML and the environment.
//!
//! ```toml
//! level = "debug"
//! error_key = "err"
//! verbose_errors = false
//! ```

use std::error::Error as StdError;
use std::path::Path;

use logf_error::{Error, Result};
use serde::Deserialize;

use crate::encoder::FieldEncoder;
use crate::error_encoder::{ErrorEncoder, default_error_encoder, message_error_encoder};
use crate::level::{Level, LevelChecker};
use crate::wrap::collect_error_fields;

/// Environment variable overriding the configured level.
pub const LEVEL_ENV: &str = "LOGF_LEVEL";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LogConfig {
    /// Threshold for emitted messages.
    pub level: Level,
    /// Key under which an error is encoded.
    pub error_key: String,
    /// Emit `<error_key>.verbose` when an error has a richer rendering.
    pub verbose_errors: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: Level::default(),
            error_key: "error".to_string(),
            verbose_errors: true,
        }
    }
}

impl LogConfig {
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: LogConfig = toml::from_str(text).map_err(|err| {
            Error::deserialization_failed(err.message().to_string())
                .with_operation("config::from_toml_str")
                .set_source(err)
        })?;
        config.validate()?;

        tracing::debug!(
            level = %config.level,
            error_key = %config.error_key,
            verbose_errors = config.verbose_errors,
            "loaded logf config"
        );
        Ok(config)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|err| {
            let display = path.display().to_string();
            match err.kind() {
                std::io::ErrorKind::NotFound => Error::config_not_found(display).set_source(err),
                _ => Error::from(err).with_context("path", display),
            }
            .with_operation("config::from_file")
        })?;

        Self::from_toml_str(&text).map_err(|err| {
            err.with_operation("config::from_file")
                .with_context("path", path.display().to_string())
        })
    }

    /// Applies [`LEVEL_ENV`] when it is set.
    pub fn with_env_overrides(self) -> Self {
        let value = std::env::var(LEVEL_ENV).ok();
        self.with_level_override(value.as_deref())
    }

    /// Replaces the level with `value` when it names a valid level.
    ///
    /// An unparsable value keeps the configured level.
    pub fn with_level_override(mut self, value: Option<&str>) -> Self {
        let Some(value) = value else {
            return self;
        };
        match value.parse::<Level>() {
            Ok(level) => self.level = level,
            Err(err) => {
                tracing::warn!(
                    value,
                    error = %err,
                    kept = %self.level,
                    "ignoring invalid level override"
                );
            }
        }
        self
    }

    fn validate(&self) -> Result<()> {
        if self.error_key.is_empty() {
            return Err(Error::config_invalid("error_key must not be empty")
                .with_operation("config::validate")
                .with_context("key", "error_key"));
        }
        Ok(())
    }

    pub fn error_encoder(&self) -> ErrorEncoder {
        if self.verbose_errors {
            default_error_encoder
        } else {
            message_error_encoder
        }
    }

    pub fn level_checker(&self) -> LevelChecker {
        self.level.checker()
    }

    /// Encodes `err` at the configured key, then every field attached along its chain.
    pub fn encode_error(
        &self,
        err: Option<&(dyn StdError + 'static)>,
        encoder: &mut dyn FieldEncoder,
    ) {
        (self.error_encoder())(&self.error_key, err, encoder);
        for field in collect_error_fields(err) {
            field.accept(&mut *encoder);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::Field;
    use crate::recorder::{FieldRecorder, RecordedValue};
    use crate::wrap::wrap_error;
    use logf_error::ErrorKind;
    use pretty_assertions::assert_eq;
    use serial_test::serial;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = LogConfig::from_toml_str("").unwrap();
        assert_eq!(config, LogConfig::default());
        assert_eq!(config.level, Level::Info);
        assert_eq!(config.error_key, "error");
        assert!(config.verbose_errors);
    }

    #[test]
    fn test_from_toml_str() {
        let config = LogConfig::from_toml_str(
            r#"
            level = "Warn"
            error_key = "err"
            verbose_errors = false
            "#,
        )
        .unwrap();

        assert_eq!(config.level, Level::Warn);
        assert_eq!(config.error_key, "err");
        assert!(!config.verbose_errors);
    }

    #[test]
    fn test_invalid_level_is_rejected() {
        let err = LogConfig::from_toml_str("level = \"loud\"").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DeserializationFailed);
        assert!(err.message().contains("loud"), "{err}");
    }

    #[test]
    fn test_unknown_key_is_rejected() {
        let err = LogConfig::from_toml_str("levle = \"info\"").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DeserializationFailed);
    }

    #[test]
    fn test_empty_error_key_is_rejected() {
        let err = LogConfig::from_toml_str("error_key = \"\"").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ConfigInvalid);
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "level = \"debug\"").unwrap();

        let config = LogConfig::from_file(file.path()).unwrap();
        assert_eq!(config.level, Level::Debug);
    }

    #[test]
    fn test_from_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = LogConfig::from_file(dir.path().join("logf.toml")).unwrap_err();

        assert_eq!(err.kind(), ErrorKind::ConfigNotFound);
        assert_eq!(err.operation(), "config::from_file");
        assert!(StdError::source(&err).is_some());
    }

    #[test]
    fn test_bad_file_names_the_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "level = [").unwrap();

        let err = LogConfig::from_file(file.path()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DeserializationFailed);
        assert!(err.context().iter().any(|(key, _)| *key == "path"));
    }

    #[test]
    fn test_level_override() {
        let config = LogConfig::default().with_level_override(Some("debug"));
        assert_eq!(config.level, Level::Debug);

        let config = config.with_level_override(Some("nonsense"));
        assert_eq!(config.level, Level::Debug);

        let config = config.with_level_override(None);
        assert_eq!(config.level, Level::Debug);
    }

    #[test]
    #[serial]
    fn test_env_override() {
        // SAFETY: serialized with every other test touching the environment.
        unsafe { std::env::set_var(LEVEL_ENV, "error") };
        let config = LogConfig::default().with_env_overrides();
        unsafe { std::env::remove_var(LEVEL_ENV) };

        assert_eq!(config.level, Level::Error);
        assert!(!config.level_checker()(Level::Warn));
    }

    #[test]
    fn test_encode_error_with_chain_fields() {
        let inner = wrap_error(
            std::io::Error::other("refused"),
            &[Field::string("host", "db-1"), Field::int("port", 5432)],
        );
        let outer = wrap_error(inner, &[Field::string("host", "db-1")]);

        let config = LogConfig {
            error_key: "err".to_string(),
            ..LogConfig::default()
        };
        let mut rec = FieldRecorder::new();
        config.encode_error(Some(&outer), &mut rec);

        assert_eq!(
            rec.into_entries(),
            vec![
                ("err".to_string(), RecordedValue::String("refused".to_string())),
                ("host".to_string(), RecordedValue::String("db-1".to_string())),
                ("port".to_string(), RecordedValue::Int(5432)),
            ]
        );
    }

    #[test]
    fn test_encode_missing_error() {
        let mut rec = FieldRecorder::new();
        LogConfig::default().encode_error(None, &mut rec);
        assert_eq!(rec.len(), 1);
        assert_eq!(
            rec.get("error"),
            Some(&RecordedValue::String("<nil>".to_string()))
        );
    }
}

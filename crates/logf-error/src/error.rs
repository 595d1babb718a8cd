//! The main Error type for logf.

use crate::ErrorKind;
use std::fmt;

/// Error returned by the fallible edges of logf.
pub struct Error {
    kind: ErrorKind,
    message: String,
    operation: &'static str,
    context: Vec<(&'static str, String)>,
    source: Option<Box<dyn std::error::Error + Send + Sync + 'static>>,
}

impl Error {
    /// Create a new error with the given kind and message.
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            operation: "",
            context: Vec::new(),
            source: None,
        }
    }

    /// Get the error kind.
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Get the error message
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Get the operation that caused this error
    pub fn operation(&self) -> &'static str {
        self.operation
    }

    /// Get the context key-value pairs
    pub fn context(&self) -> &[(&'static str, String)] {
        &self.context
    }

    /// Set the operation that caused this error.
    ///
    /// If an operation was already set, the previous one is moved to context
    /// as "called" to preserve the call chain.
    pub fn with_operation(mut self, operation: &'static str) -> Self {
        if !self.operation.is_empty() {
            self.context.push(("called", self.operation.to_string()));
        }
        self.operation = operation;
        self
    }

    /// Add context to the error
    pub fn with_context(mut self, key: &'static str, value: impl Into<String>) -> Self {
        self.context.push((key, value.into()));
        self
    }

    /// Set the source error.
    ///
    /// # Panics (debug only)
    /// Panics in debug mode if source was already set.
    pub fn set_source<E>(mut self, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        debug_assert!(self.source.is_none(), "source error already set");
        self.source = Some(Box::new(source));
        self
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.kind)?;
        if !self.operation.is_empty() {
            write!(f, " at {}", self.operation)?;
        }

        if !self.context.is_empty() {
            write!(f, ", context {{ ")?;
            for (i, (key, value)) in self.context.iter().enumerate() {
                if i > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{}: {}", key, value)?;
            }
            write!(f, " }}")?;
        }

        if !self.message.is_empty() {
            write!(f, " => {}", self.message)?;
        }

        // `{:#}` appends the source so verbose renderings carry the whole story.
        if f.alternate() {
            if let Some(source) = &self.source {
                write!(f, ": {:#}", source)?;
            }
        }

        Ok(())
    }
}

impl fmt::Debug for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} at {}", self.kind, self.operation)?;

        if !self.message.is_empty() {
            writeln!(f)?;
            writeln!(f, "    Message: {}", self.message)?;
        }

        if !self.context.is_empty() {
            writeln!(f)?;
            writeln!(f, "    Context:")?;
            for (key, value) in &self.context {
                writeln!(f, "        {}: {}", key, value)?;
            }
        }

        if let Some(source) = &self.source {
            writeln!(f)?;
            writeln!(f, "    Source: {:?}", source)?;
        }

        Ok(())
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|e| e.as_ref() as &(dyn std::error::Error + 'static))
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        let kind = match err.kind() {
            std::io::ErrorKind::NotFound => ErrorKind::ConfigNotFound,
            _ => ErrorKind::IoFailed,
        };
        Error::new(kind, err.to_string())
            .with_operation("io")
            .set_source(err)
    }
}

impl Error {
    /// Create an Unexpected error.
    pub fn unexpected(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Unexpected, message)
    }

    /// Create an InvalidLevel error for the rejected level name
    pub fn invalid_level(name: impl Into<String>) -> Self {
        let name = name.into();
        Self::new(
            ErrorKind::InvalidLevel,
            format!("unknown level '{}'", name),
        )
        .with_context("level", name)
    }

    /// Create a ConfigInvalid error
    pub fn config_invalid(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::ConfigInvalid, message)
    }

    /// Create a ConfigNotFound error
    pub fn config_not_found(path: impl Into<String>) -> Self {
        let path = path.into();
        Self::new(
            ErrorKind::ConfigNotFound,
            format!("config file '{}' not found", path),
        )
        .with_context("path", path)
    }

    /// Create a DeserializationFailed error
    pub fn deserialization_failed(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::DeserializationFailed, message)
    }

    /// Create an EncodeFailed error
    pub fn encode_failed(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::EncodeFailed, message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_error_creation() {
        let err = Error::new(ErrorKind::EncodeFailed, "cannot encode");
        assert_eq!(err.kind(), ErrorKind::EncodeFailed);
        assert_eq!(err.message(), "cannot encode");
        assert_eq!(err.operation(), "");
    }

    #[test]
    fn test_error_with_context() {
        let err = Error::config_invalid("bad value")
            .with_operation("config::from_toml_str")
            .with_context("key", "level")
            .with_context("value", "loud");

        assert_eq!(err.operation(), "config::from_toml_str");
        assert_eq!(err.context().len(), 2);
        assert_eq!(err.context()[0], ("key", "level".to_string()));
    }

    #[test]
    fn test_operation_chaining() {
        let err = Error::deserialization_failed("expected string")
            .with_operation("config::from_toml_str")
            .with_operation("config::from_file");

        assert_eq!(err.operation(), "config::from_file");
        assert_eq!(
            err.context(),
            &[("called", "config::from_toml_str".to_string())]
        );
    }

    #[test]
    fn test_display() {
        let err = Error::invalid_level("loud").with_operation("level::from_str");

        let display = format!("{}", err);
        assert_eq!(
            display,
            "InvalidLevel at level::from_str, context { level: loud } => unknown level 'loud'"
        );
    }

    #[test]
    fn test_alternate_display_appends_source() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "no such file");
        let err = Error::config_not_found("logf.toml").set_source(io_err);

        let short = format!("{}", err);
        let verbose = format!("{:#}", err);
        assert!(!short.contains("no such file"));
        assert!(verbose.ends_with(": no such file"));
    }

    #[test]
    fn test_from_io_error() {
        let err: Error = std::io::Error::new(std::io::ErrorKind::NotFound, "gone").into();
        assert_eq!(err.kind(), ErrorKind::ConfigNotFound);
        assert!(std::error::Error::source(&err).is_some());

        let err: Error =
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied").into();
        assert_eq!(err.kind(), ErrorKind::IoFailed);
    }
}

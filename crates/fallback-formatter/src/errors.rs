use thiserror::Error;

/// Error a renderer reports when it cannot render an item list.
#[derive(Debug, Error)]
#[error("{0}")]
pub struct RendererError(pub String);

impl From<String> for RendererError {
    fn from(value: String) -> Self {
        RendererError(value)
    }
}

impl From<&str> for RendererError {
    fn from(value: &str) -> Self {
        RendererError(value.to_string())
    }
}

/// Failures surfaced while driving a single chain entry.
///
/// The compositor never lets these escape; they are logged and the entry is
/// skipped so the rest of the chain still runs.
#[derive(Debug, Error)]
pub enum FallbackError {
    #[error("unknown renderer: {id}")]
    UnknownRenderer { id: String },
    #[error("renderer `{id}` failed: {source}")]
    Render {
        id: String,
        #[source]
        source: RendererError,
    },
}

impl FallbackError {
    pub fn unknown_renderer(id: impl Into<String>) -> Self {
        FallbackError::UnknownRenderer { id: id.into() }
    }

    pub fn render(id: impl Into<String>, source: impl Into<RendererError>) -> Self {
        FallbackError::Render {
            id: id.into(),
            source: source.into(),
        }
    }
}

/// Problems loading a formatter configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid JSON configuration: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid YAML configuration: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("unsupported schema version: expected {expected}, got {got}")]
    UnsupportedSchemaVersion { expected: u32, got: u32 },
    #[error("unsupported configuration format: {0}")]
    UnsupportedFormat(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_renderer_message() {
        let err = FallbackError::unknown_renderer("missing");
        assert!(matches!(err, FallbackError::UnknownRenderer { ref id } if id == "missing"));
        assert_eq!(err.to_string(), "unknown renderer: missing");
    }

    #[test]
    fn render_error_keeps_source() {
        let err = FallbackError::render("pattern", "bad regex");
        assert_eq!(err.to_string(), "renderer `pattern` failed: bad regex");
        let source = std::error::Error::source(&err).expect("source");
        assert_eq!(source.to_string(), "bad regex");
    }
}

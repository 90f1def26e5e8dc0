use std::path::PathBuf;

use designer::error::{EditorError, ErrorCode};

#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error(transparent)]
    Editor(#[from] EditorError),
    #[error("{path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("{0} already exists; pass --force to overwrite")]
    AlreadyExists(PathBuf),
    #[error("no records file; pass --records or set FORMDESK_RECORDS")]
    NoRecordsFile,
    #[error("invalid field assignment `{0}`; expected FIELD=VALUE")]
    BadAssignment(String),
    #[error("submission rejected: {0} field(s) failed validation")]
    Invalid(usize),
}

impl CliError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io { path: path.into(), source }
    }
}

impl ErrorCode for CliError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Editor(e) => e.error_code(),
            Self::Io { .. } => "E_IO",
            Self::Json(_) => "E_PARSE",
            Self::AlreadyExists(_) => "E_EXISTS",
            Self::NoRecordsFile => "E_CONFIG",
            Self::BadAssignment(_) => "E_ARGS",
            Self::Invalid(_) => "E_VALIDATION",
        }
    }
}

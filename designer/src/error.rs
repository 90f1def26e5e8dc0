//! Error taxonomy for editor operations.
//!
//! DESIGN
//! ======
//! Three failure classes reach callers. `UnknownType` is fatal to the
//! operation that hit it and must be surfaced: it means the document's
//! registry and the requested element type disagree. `Parse` and
//! `MissingTarget` are recoverable and local; the engine logs them and
//! leaves the document untouched.

use std::fmt;

/// What kind of document node a missing-target error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetKind {
    Section,
    Row,
    Column,
    Element,
    Record,
}

impl fmt::Display for TargetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Section => "section",
            Self::Row => "row",
            Self::Column => "column",
            Self::Element => "element",
            Self::Record => "record",
        };
        f.write_str(name)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum EditorError {
    #[error("no schema definition for type: {0}")]
    UnknownType(String),
    #[error("unknown view mode: {0}")]
    UnknownMode(String),
    #[error("invalid JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("{kind} not found: {id}")]
    MissingTarget { kind: TargetKind, id: String },
    #[error("element `{id}` of type `{element_type}` carries `{field}`")]
    InvalidElement { id: String, element_type: String, field: &'static str },
}

impl EditorError {
    pub(crate) fn missing(kind: TargetKind, id: impl Into<String>) -> Self {
        Self::MissingTarget { kind, id: id.into() }
    }
}

/// Grepable error code and recoverability flag.
pub trait ErrorCode: fmt::Display {
    fn error_code(&self) -> &'static str;

    fn recoverable(&self) -> bool {
        false
    }
}

impl ErrorCode for EditorError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::UnknownType(_) => "E_SCHEMA",
            Self::UnknownMode(_) => "E_MODE",
            Self::Parse(_) => "E_PARSE",
            Self::MissingTarget { .. } => "E_MISSING_TARGET",
            Self::InvalidElement { .. } => "E_INVALID_ELEMENT",
        }
    }

    fn recoverable(&self) -> bool {
        !matches!(self, Self::UnknownType(_))
    }
}

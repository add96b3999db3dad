//! Error taxonomy shared by the builder, navigation and dispatch layers.

use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationErrorKind {
    Required,
    TooMany { limit: usize, actual: usize },
    OutOfRange { detail: String },
    InvalidUrl { detail: String },
    DuplicateFieldName,
    UnknownField { name: String },
    Conflict { detail: String },
    NotAllowed { detail: String },
}

impl fmt::Display for ValidationErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Required => write!(f, "is required"),
            Self::TooMany { limit, actual } => {
                write!(f, "has {actual} entries, at most {limit} allowed")
            }
            Self::OutOfRange { detail } => write!(f, "is out of range: {detail}"),
            Self::InvalidUrl { detail } => write!(f, "is not a valid URL: {detail}"),
            Self::DuplicateFieldName => write!(f, "reuses a field name already taken in this card"),
            Self::UnknownField { name } => write!(f, "names unknown field `{name}`"),
            Self::Conflict { detail } => write!(f, "conflicts: {detail}"),
            Self::NotAllowed { detail } => write!(f, "is not allowed: {detail}"),
        }
    }
}

/// A field-level build failure. `path` locates the node inside the card tree
/// (e.g. `sections[0].widgets[2].textInput`), `field` names the offending field.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{}{} {}", path_prefix(.path), .field, .kind)]
pub struct ValidationError {
    pub path: String,
    pub field: String,
    pub kind: ValidationErrorKind,
}

impl ValidationError {
    pub fn new(path: impl Into<String>, field: impl Into<String>, kind: ValidationErrorKind) -> Self {
        Self {
            path: path.into(),
            field: field.into(),
            kind,
        }
    }

    pub fn out_of_range(field: impl Into<String>, detail: impl Into<String>) -> Self {
        Self::new(
            "",
            field,
            ValidationErrorKind::OutOfRange {
                detail: detail.into(),
            },
        )
    }
}

fn path_prefix(path: &str) -> String {
    if path.is_empty() {
        String::new()
    } else {
        format!("{path}.")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ValidationErrors(pub Vec<ValidationError>);

impl ValidationErrors {
    pub fn iter(&self) -> std::slice::Iter<'_, ValidationError> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_vec(self) -> Vec<ValidationError> {
        self.0
    }
}

impl From<ValidationError> for ValidationErrors {
    fn from(e: ValidationError) -> Self {
        Self(vec![e])
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for e in &self.0 {
            if !first {
                f.write_str("; ")?;
            }
            first = false;
            write!(f, "{e}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

/// Misuse of an object whose lifecycle is already over. Always a programming
/// defect on the caller's side.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("illegal state: {0}")]
pub struct IllegalStateError(pub String);

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NavigationError {
    #[error("no card named `{name}` on the navigation stack")]
    NamedCardNotFound { name: String },
    #[error("cannot pop the only card on the navigation stack")]
    PopOnRoot,
    #[error("navigation stack is empty")]
    EmptyStack,
}

/// Raised by a callback that needs the user to grant access before it can run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
#[serde(rename_all = "camelCase")]
#[error("authorization required for {resource_display_name} at {authorization_url}")]
pub struct AuthorizationRequired {
    pub resource_display_name: String,
    pub authorization_url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DispatchError {
    #[error("no callback registered for `{0}`")]
    UnknownTarget(String),
    #[error("callback failed: {0}")]
    Failed(String),
    #[error("callback returned malformed data: {0}")]
    Malformed(String),
    #[error(transparent)]
    AuthorizationRequired(#[from] AuthorizationRequired),
}

#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("missing required fields: {}", .0.join(", "))]
    MissingRequiredFields(Vec<String>),
    #[error("input is blocked while a dispatch is in flight")]
    InputBlocked,
    #[error("no action at {0}")]
    UnknownAction(String),
    #[error("no input field named `{0}` on the visible card")]
    UnknownField(String),
    #[error("dispatch was cancelled")]
    Cancelled,
    #[error("dispatch timed out after {0} ms")]
    TimedOut(u64),
    #[error(transparent)]
    Navigation(#[from] NavigationError),
    #[error(transparent)]
    IllegalState(#[from] IllegalStateError),
    #[error(transparent)]
    Validation(#[from] ValidationErrors),
}

#[derive(Debug, thiserror::Error)]
pub enum WireError {
    #[error("malformed wire document: {0}")]
    Json(#[from] serde_json::Error),
    #[error("wire version {found} is newer than supported version {supported}")]
    UnsupportedVersion { found: u32, supported: u32 },
    #[error("expected exactly one card, found {0}")]
    CardCount(usize),
}

#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("settings io: {0}")]
    Io(#[from] std::io::Error),
    #[error("settings json: {0}")]
    Json(#[from] serde_json::Error),
    #[error("cannot determine settings directory")]
    NoSettingsDir,
}

#[cfg(test)]
#[path = "../../tests/unit/core/error.rs"]
mod tests;

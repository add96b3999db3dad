//! Shared error taxonomy.

pub mod error;

pub use error::{
    AuthorizationRequired, DispatchError, EngineError, IllegalStateError, NavigationError,
    SettingsError, ValidationError, ValidationErrorKind, ValidationErrors, WireError,
};

//! Error types for the container.
//!
//! Each phase of container use has its own error type, and [`LigatureError`]
//! wraps all of them for callers that do not care which phase failed.
//!
//! ## Error Hierarchy
//!
//! ```text
//! LigatureError (top-level wrapper)
//! ├── RegistrationError - Invalid or conflicting registrations
//! ├── ResolveError      - Lookup, construction and cast failures
//! └── UnregisterError   - Removal of absent registrations
//! ```
//!
//! ## Propagation
//!
//! Registration errors are always returned. Resolution and unregistration
//! only report a missing registration when the caller asked for it through
//! the `THROW_IF_NOT_REGISTERED` option; otherwise absence is `Ok(None)` or a
//! removal count of zero. Errors raised by user constructors pass through
//! unchanged as [`ResolveError::Construction`].

use std::error::Error as StdError;
use std::fmt;

use thiserror::Error;

/// Boxed error produced by user-supplied constructors and factories.
pub type BoxError = Box<dyn StdError + Send + Sync + 'static>;

/// Renders an optional registration name for messages.
pub(crate) struct DisplayName<'a>(pub Option<&'a str>);

impl fmt::Display for DisplayName<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(name) => write!(f, "'{name}'"),
            None => f.write_str("<unnamed>"),
        }
    }
}

/// Formats a registration target as `Type` or `Type ('name')`.
pub fn describe_target(type_name: &str, name: Option<&str>) -> String {
    match name {
        Some(_) => format!("{type_name} ({})", DisplayName(name)),
        None => type_name.to_string(),
    }
}

// ============================================================================
// Registration Errors
// ============================================================================

/// Errors raised while registering a type or instance.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistrationError {
    /// A required argument was missing or does not fit the registration.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The key is already registered and `THROW_IF_EXISTS` was requested.
    #[error("already registered: {target}")]
    AlreadyRegistered {
        /// The conflicting registration target.
        target: String,
    },

    /// The key is registered with `PROTECT` and cannot be replaced.
    #[error("registration for {target} is protected and cannot be replaced")]
    ProtectedRegistration {
        /// The protected registration target.
        target: String,
    },
}

impl RegistrationError {
    /// Build an `InvalidArgument` error.
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        RegistrationError::InvalidArgument(message.into())
    }
}

// ============================================================================
// Resolve Errors
// ============================================================================

/// Errors raised while resolving an instance.
#[derive(Debug, Error)]
pub enum ResolveError {
    /// Nothing is registered and `THROW_IF_NOT_REGISTERED` was requested.
    #[error("not registered: {target}")]
    NotRegistered {
        /// The requested target.
        target: String,
    },

    /// No constructor or factory accepts the arguments, and the type has no
    /// parameterless constructor either.
    #[error("no constructor or factory of {type_name} accepts ({arguments})")]
    MissingMember {
        /// The implementation type.
        type_name: String,
        /// Comma separated argument type names.
        arguments: String,
    },

    /// A resolved instance is not of the requested type.
    #[error("type mismatch: expected {expected}, found {actual}")]
    TypeMismatch {
        /// The requested type.
        expected: String,
        /// The runtime type of the instance.
        actual: String,
    },

    /// An argument could not be converted to the parameter type.
    #[error("invalid argument at position {index}: {message}")]
    InvalidArgument {
        /// Position of the argument.
        index: usize,
        /// What went wrong.
        message: String,
    },

    /// A user constructor or factory failed.
    #[error(transparent)]
    Construction(BoxError),
}

impl ResolveError {
    /// Build a `NotRegistered` error for a type and optional name.
    pub fn not_registered(type_name: &str, name: Option<&str>) -> Self {
        ResolveError::NotRegistered {
            target: describe_target(type_name, name),
        }
    }

    /// Build a `TypeMismatch` error.
    pub fn type_mismatch(expected: impl Into<String>, actual: impl Into<String>) -> Self {
        ResolveError::TypeMismatch {
            expected: expected.into(),
            actual: actual.into(),
        }
    }

    /// Wrap an error raised by user code.
    pub fn construction<E>(err: E) -> Self
    where
        E: Into<BoxError>,
    {
        ResolveError::Construction(err.into())
    }

    /// Check if this is a `NotRegistered` error.
    pub fn is_not_registered(&self) -> bool {
        matches!(self, ResolveError::NotRegistered { .. })
    }

    /// Check if this is a `MissingMember` error.
    pub fn is_missing_member(&self) -> bool {
        matches!(self, ResolveError::MissingMember { .. })
    }

    /// Check if this is a `TypeMismatch` error.
    pub fn is_type_mismatch(&self) -> bool {
        matches!(self, ResolveError::TypeMismatch { .. })
    }
}

// ============================================================================
// Unregister Errors
// ============================================================================

/// Errors raised while removing registrations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UnregisterError {
    /// Nothing was removed and `THROW_IF_NOT_REGISTERED` was requested.
    #[error("not registered: {target}")]
    NotRegistered {
        /// The requested target.
        target: String,
    },
}

// ============================================================================
// Unified Error
// ============================================================================

/// Any error produced by the container.
///
/// ```ignore
/// fn bootstrap(framework: &mut Framework) -> Result<(), LigatureError> {
///     framework.types.register_type::<dyn Clock, SystemClock>(None)?;  // RegistrationError
///     let clock = framework.types.resolve::<dyn Clock>()?;            // ResolveError
///     Ok(())
/// }
/// ```
#[derive(Debug, Error)]
pub enum LigatureError {
    /// A registration error.
    #[error(transparent)]
    Registration(#[from] RegistrationError),

    /// A resolution error.
    #[error(transparent)]
    Resolve(#[from] ResolveError),

    /// An unregistration error.
    #[error(transparent)]
    Unregister(#[from] UnregisterError),
}

impl LigatureError {
    /// Check if this is a registration error.
    pub fn is_registration(&self) -> bool {
        matches!(self, LigatureError::Registration(_))
    }

    /// Check if this is a resolution error.
    pub fn is_resolve(&self) -> bool {
        matches!(self, LigatureError::Resolve(_))
    }

    /// Check if this is an unregistration error.
    pub fn is_unregister(&self) -> bool {
        matches!(self, LigatureError::Unregister(_))
    }
}

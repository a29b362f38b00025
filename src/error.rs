//! # Error Taxonomy
//!
//! Two families of errors exist and they never mix:
//!
//! - [`StartupError`] aborts initialization. Startup is all-or-nothing: a single bad
//!   component, alias clash or malformed route prevents the engine from serving.
//! - [`DispatchError`] is produced per request and is always converted into a response
//!   at the dispatch boundary. It never escapes to the transport.

use std::path::PathBuf;
use thiserror::Error;

/// Fatal error raised while building the dispatch context.
#[derive(Debug, Error)]
pub enum StartupError {
    /// The configuration resource is missing or malformed.
    #[error("configuration error in {}: {message}", path.display())]
    Config { path: PathBuf, message: String },

    /// The root package to scan cannot be located.
    #[error("cannot scan package `{package}`: {reason}")]
    Scan { package: String, reason: String },

    /// A discovered class cannot be constructed.
    #[error("cannot instantiate `{class}`: {reason}")]
    Instantiation { class: String, reason: String },

    /// Two services claim the same interface alias.
    #[error("interface `{interface}` is already claimed by bean `{existing}`, cannot alias it to `{class}`")]
    DuplicateAlias {
        interface: String,
        existing: String,
        class: String,
    },

    /// An autowired field exists but the resolved bean is not assignable to it.
    #[error("bean `{target}` cannot be assigned to field `{owner}.{field}`")]
    IncompatibleBean {
        owner: String,
        field: String,
        target: String,
    },

    /// An autowired field has no matching bean. Only raised when dependencies are required.
    #[error("autowired field `{owner}.{field}` has no bean named `{target}`")]
    UnresolvedDependency {
        owner: String,
        field: String,
        target: String,
    },

    /// A normalized route path is not a valid pattern.
    #[error("route `{path}` on {handler} does not compile: {source}")]
    Pattern {
        path: String,
        handler: String,
        #[source]
        source: regex::Error,
    },

    /// The same owner + method signature was declared twice.
    #[error("handler {handler} is declared more than once")]
    DuplicateHandler { handler: String },
}

/// Per-request failure, reported to the caller as a response.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// No handler pattern matches the normalized path. Non-fatal.
    #[error("no handler matches `{path}`")]
    RouteNotFound { path: String },

    /// A request parameter could not be converted to the declared parameter type.
    #[error("cannot convert parameter `{param}` value `{value}` to {target}")]
    Conversion {
        param: String,
        value: String,
        target: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// The handler method failed or panicked.
    #[error("handler {handler} failed")]
    Invocation {
        handler: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl DispatchError {
    /// HTTP status reported for this failure.
    #[must_use]
    pub fn status(&self) -> http::StatusCode {
        match self {
            DispatchError::RouteNotFound { .. } => http::StatusCode::NOT_FOUND,
            DispatchError::Conversion { .. } | DispatchError::Invocation { .. } => {
                http::StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

//! # brrtmvc
//!
//! **brrtmvc** is a small request-dispatch engine in the style of an annotation-driven
//! MVC framework: a component registry, a dependency injector and a handler mapping
//! that routes normalized request paths to typed controller methods.
//!
//! ## Overview
//!
//! Components describe themselves statically with a
//! [`ComponentClass`](component::ComponentClass) and register through `inventory`.
//! At startup the engine:
//!
//! 1. **scans** a root package for component classes ([`scan`])
//! 2. **instantiates** controllers and services into a bean registry ([`registry`])
//! 3. **wires** autowired fields between beans ([`inject`])
//! 4. **compiles** every mapped controller method into a full-match route ([`mapping`])
//!
//! The result is a frozen [`DispatchContext`] whose [`Dispatcher`] binds request
//! parameters to method arguments, invokes the method and writes the response.
//!
//! ## Architecture
//!
//! - **[`component`]** - component metadata, the `Component` trait, beans and argument slots
//! - **[`scan`]** - class path abstraction over `inventory` or an explicit list
//! - **[`registry`]** - bean naming, interface aliases, instantiation
//! - **[`inject`]** - autowiring with a configurable policy for missing beans
//! - **[`mapping`]** - path normalization, route patterns, parameter index tables
//! - **[`dispatcher`]** - per-request state machine and value conversion
//! - **[`server`]** - request and response objects handed in by the transport
//! - **[`context`]** - the assembled engine
//! - **[`config`]** - properties/TOML configuration with environment overrides
//! - **[`logging`]** - `tracing` subscriber setup
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use brrtmvc::{AppConfig, DispatchContext};
//! use brrtmvc::scan::InventoryClassPath;
//! use brrtmvc::server::Request;
//!
//! let ctx = DispatchContext::initialize(AppConfig::new("brrtmvc::demo"), &InventoryClassPath)?;
//! let (resp, _) = ctx.serve(&Request::from_uri("/app/add?a=2&b=3"));
//! assert_eq!(resp.body(), "2+3=5");
//! ```
//!
//! ## Concurrency
//!
//! Startup runs once on one thread. Afterwards the registry and handler table are
//! immutable and shared through `Arc`, so a context can be used from any number of
//! transport threads without locking.

pub mod cli;
pub mod component;
pub mod config;
pub mod context;
pub mod demo;
pub mod dispatcher;
pub mod error;
pub mod ids;
pub mod inject;
pub mod logging;
pub mod mapping;
pub mod registry;
pub mod scan;
pub mod server;

pub use config::{AppConfig, CompatMode};
pub use context::DispatchContext;
pub use dispatcher::{DispatchOutcome, Dispatcher};
pub use error::{DispatchError, StartupError};

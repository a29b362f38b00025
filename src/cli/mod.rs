//! # CLI Module
//!
//! Command-line access to a dispatch context. There is no network transport: the
//! CLI builds the engine from a configuration file and drives it directly.
//!
//! ## Commands
//!
//! ### `routes`
//!
//! Print the handler table in precedence order:
//!
//! ```bash
//! brrtmvc routes --config application.properties
//! brrtmvc routes --config application.toml --json
//! ```
//!
//! ### `call`
//!
//! Dispatch one request built from a path and query string:
//!
//! ```bash
//! brrtmvc call --config application.properties '/app/add?a=2&b=3'
//! # 200 OK
//! # 2+3=5
//! ```
//!
//! `--request-id <ULID>` sets the correlation id logged for the request.
//! `--config` may also come from `BRRTMVC_CONFIG`.

mod commands;


pub use commands::{run_cli, Cli, Commands};

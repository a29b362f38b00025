//! # Dispatcher Module
//!
//! The dispatcher is the request-time entry point. It runs synchronously on the
//! caller's thread against a frozen [`HandlerTable`](crate::mapping::HandlerTable)
//! and never mutates shared state, so one instance serves every worker thread the
//! surrounding transport uses.
//!
//! ## Request Flow
//!
//! Each request walks the same states:
//!
//! 1. **Normalizing**: strip the context prefix when present, collapse `/` runs
//! 2. **Matching**: first handler in table order whose pattern matches the whole path
//! 3. **Binding**: one argument slot per declared parameter, filled from the request
//!    parameter map and the reserved request/response bindings
//! 4. **Invoking**: call the method on its shared controller instance
//! 5. **Responding**: a returned value becomes the whole body; `None` means the
//!    handler wrote its own response
//!
//! Any state can exit to an error response instead.
//!
//! ## Parameter Conversion
//!
//! | Declared type | Conversion |
//! |---|---|
//! | `Text` | unchanged |
//! | `Int32` | base-10 parse, failure is a conversion error |
//! | `Double` | float parse, failure is a conversion error |
//! | other | raw text passed through |
//!
//! Multi-valued parameters are joined with `", "` before conversion, so `a=1&a=2`
//! binds the text `"1, 2"`.
//!
//! ## Error Handling
//!
//! | Outcome | Status | Body |
//! |---|---|---|
//! | no match | 404 | `404 Not Found!` |
//! | conversion or handler failure, legacy mode | 500 | `500, ErrInfo :<detail>` |
//! | conversion or handler failure, hardened mode | 500 | `500 Internal Server Error` |
//!
//! Handler panics are caught and reported like handler errors. Whatever a handler
//! wrote before failing stays in the response.
//!
//! ```rust,ignore
//! use brrtmvc::server::Request;
//!
//! let (resp, outcome) = dispatcher.serve(&Request::from_uri("/app/add?a=2&b=3"));
//! assert!(outcome.is_completed());
//! assert_eq!(resp.body(), "2+3=5");
//! ```

mod convert;
mod core;

pub use convert::{collapse_values, convert};
pub use core::{
    bind, error_detail, DispatchOutcome, Dispatcher, INTERNAL_ERROR_BODY, LEGACY_ERROR_PREFIX,
};

//! # Handler Mapping Module
//!
//! Compiles every route-mapped controller method into a [`Handler`] and collects
//! them, in discovery order, into a [`HandlerTable`].
//!
//! ## Overview
//!
//! For each controller the builder:
//!
//! 1. Reads the type-level base path (empty when absent)
//! 2. Joins `"/" + base + "/" + method_path` and collapses repeated separators
//! 3. Compiles the normalized path as a **full-match** regular expression
//! 4. Derives the [`ParamIndexMapping`] from the method's parameter metadata
//! 5. Appends the handler and logs `mapped: <pattern> : <method>`
//!
//! ## Literal paths are pattern source
//!
//! The normalized path is used as pattern source without escaping. A path segment
//! containing pattern metacharacters (`.`, `+`, `(`, ...) changes what the route
//! matches: `/files/a.txt` also matches `/files/abtxt`. Mappings that need a
//! literal match must escape the metacharacter themselves (`/files/a\\.txt`).
//!
//! ## Precedence
//!
//! Overlapping patterns are legal. Lookup takes the first handler in table order
//! whose pattern matches the entire normalized path.
//!
//! ## Example
//!
//! ```rust,ignore
//! use brrtmvc::mapping::{normalize_path, HandlerMappingBuilder};
//!
//! let table = HandlerMappingBuilder::new().build(&registry)?;
//! if let Some(handler) = table.find(&normalize_path("/app//add")) {
//!     println!("{} -> {}", handler.pattern(), handler.identifier());
//! }
//! ```

mod core;
#[cfg(test)]
mod tests;

pub use core::{
    compile_pattern, normalize_path, BindingKey, Handler, HandlerMappingBuilder, HandlerTable,
    ParamIndexMapping, RouteInfo,
};

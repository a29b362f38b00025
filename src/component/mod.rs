//! # Component Module
//!
//! Declarative component metadata and the runtime capabilities that replace
//! reflection.
//!
//! ## Overview
//!
//! A component is described once, statically, by a [`ComponentClass`]: its qualified
//! name, its [`Role`] (controller, service or unmarked), an optional bean name override,
//! a base path, the interface aliases it provides, its autowired fields and its
//! route-mapped methods. The live instance implements [`Component`], which gives the
//! engine three things it cannot get from the type system at runtime:
//!
//! - [`Component::autowire`] assigns a resolved [`Bean`] to a named field
//! - [`Component::cast`] hands out the instance as a concrete or trait-object `Arc`
//! - [`Component::invoke`] calls a mapped method with positional [`Args`]
//!
//! ## Registration
//!
//! Classes become discoverable by submitting a [`ComponentRegistration`] through
//! `inventory`:
//!
//! ```rust,ignore
//! use brrtmvc::component::*;
//!
//! static METHODS: &[MethodMeta] = &[MethodMeta::mapped(
//!     "ping",
//!     "/ping",
//!     &[],
//! )];
//!
//! static PING_CONTROLLER: ComponentClass = ComponentClass {
//!     name: concat!(module_path!(), "::PingController"),
//!     role: Role::Controller,
//!     bean_name: None,
//!     base_path: "/health",
//!     interfaces: &[],
//!     fields: &[],
//!     methods: METHODS,
//!     factory: Some(construct::<PingController>),
//! };
//!
//! inventory::submit! { ComponentRegistration::new(&PING_CONTROLLER) }
//! ```

mod args;
mod core;
mod meta;

pub use args::{Arg, Args, MAX_INLINE_ARGS};
pub use core::{construct, Autowired, Bean, Cast, Component};
pub use meta::{
    ComponentClass, ComponentRegistration, Factory, FieldMeta, MethodMeta, ParamMeta, ParamType,
    Role,
};

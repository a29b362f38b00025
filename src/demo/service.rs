use std::any::TypeId;
use std::sync::Arc;

use anyhow::Context;

use crate::component::{
    construct, Cast, Component, ComponentClass, ComponentRegistration, Role,
};
use crate::component_casts;

/// Qualified interface name under which [`GreetingService`] is aliased.
pub const GREETER: &str = concat!(module_path!(), "::Greeter");

/// Qualified type name of [`ArithmeticService`].
pub const ARITHMETIC: &str = concat!(module_path!(), "::ArithmeticService");

/// Interface name no demo service provides.
pub const AUDIT_LOG: &str = concat!(module_path!(), "::AuditLog");

pub trait Greeter: Send + Sync {
    fn greet(&self, name: &str) -> String;
}

pub trait AuditLog: Send + Sync {
    fn latest(&self) -> String;
}

#[derive(Debug, Default)]
pub struct GreetingService;

impl Greeter for GreetingService {
    fn greet(&self, name: &str) -> String {
        if name.trim().is_empty() {
            "hello, stranger".to_string()
        } else {
            format!("hello, {name}")
        }
    }
}

impl Component for GreetingService {
    fn cast(self: Arc<Self>, target: TypeId) -> Option<Cast> {
        component_casts!(self, target; Self, dyn Greeter)
    }
}

pub static GREETING_SERVICE: ComponentClass = ComponentClass {
    name: concat!(module_path!(), "::GreetingService"),
    role: Role::Service,
    bean_name: None,
    base_path: "",
    interfaces: &[GREETER],
    fields: &[],
    methods: &[],
    factory: Some(construct::<GreetingService>),
};

inventory::submit! { ComponentRegistration::new(&GREETING_SERVICE) }

/// Checked integer and float arithmetic, registered as `arithmetic`.
#[derive(Debug, Default)]
pub struct ArithmeticService;

impl ArithmeticService {
    pub fn add(&self, a: i32, b: i32) -> anyhow::Result<i32> {
        a.checked_add(b).with_context(|| format!("{a} + {b} overflows i32"))
    }

    pub fn mul(&self, a: i32, b: i32) -> anyhow::Result<i32> {
        a.checked_mul(b).with_context(|| format!("{a} * {b} overflows i32"))
    }

    pub fn sub(&self, a: f64, b: f64) -> f64 {
        a - b
    }
}

impl Component for ArithmeticService {
    fn cast(self: Arc<Self>, target: TypeId) -> Option<Cast> {
        component_casts!(self, target; Self)
    }
}

pub static ARITHMETIC_SERVICE: ComponentClass = ComponentClass {
    name: ARITHMETIC,
    role: Role::Service,
    bean_name: Some("arithmetic"),
    base_path: "",
    interfaces: &[],
    fields: &[],
    methods: &[],
    factory: Some(construct::<ArithmeticService>),
};

inventory::submit! { ComponentRegistration::new(&ARITHMETIC_SERVICE) }

/// Plain helper living in the scanned package without a role.
#[derive(Debug, Default)]
pub struct Formatter;

pub static FORMATTER: ComponentClass = ComponentClass {
    name: concat!(module_path!(), "::Formatter"),
    role: Role::Unmarked,
    bean_name: None,
    base_path: "",
    interfaces: &[],
    fields: &[],
    methods: &[],
    factory: None,
};

inventory::submit! { ComponentRegistration::new(&FORMATTER) }

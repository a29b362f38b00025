use std::fmt;
use std::sync::Arc;

use super::Component;

/// Constructor for a component. Stands in for a public no-argument constructor.
pub type Factory = fn() -> anyhow::Result<Arc<dyn Component>>;

/// Type-level stereotype of a component.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    /// Carries route-mapped methods.
    Controller,
    /// Injectable collaborator, aliased under every interface it implements.
    Service,
    /// Discovered but not managed.
    Unmarked,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Controller => f.write_str("controller"),
            Role::Service => f.write_str("service"),
            Role::Unmarked => f.write_str("unmarked"),
        }
    }
}

/// Declared type of a handler method parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamType {
    Text,
    Int32,
    Double,
    /// The live request object.
    Request,
    /// The live response object.
    Response,
    /// Any other type. Bound values are passed through as raw text.
    Other(&'static str),
}

impl fmt::Display for ParamType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamType::Text => f.write_str("String"),
            ParamType::Int32 => f.write_str("i32"),
            ParamType::Double => f.write_str("f64"),
            ParamType::Request => f.write_str("Request"),
            ParamType::Response => f.write_str("Response"),
            ParamType::Other(name) => f.write_str(name),
        }
    }
}

/// One positional parameter of a handler method.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParamMeta {
    pub ty: ParamType,
    /// Request-parameter name this position is bound from.
    pub request_param: Option<&'static str>,
}

impl ParamMeta {
    /// Parameter bound from the named request parameter.
    pub const fn param(name: &'static str, ty: ParamType) -> Self {
        Self {
            ty,
            request_param: Some(name),
        }
    }

    /// Parameter receiving the request object.
    pub const fn request() -> Self {
        Self {
            ty: ParamType::Request,
            request_param: None,
        }
    }

    /// Parameter receiving the response object.
    pub const fn response() -> Self {
        Self {
            ty: ParamType::Response,
            request_param: None,
        }
    }

    /// Parameter with no binding. Its slot stays unset.
    pub const fn plain(ty: ParamType) -> Self {
        Self {
            ty,
            request_param: None,
        }
    }
}

/// A public method of a component.
#[derive(Debug, Clone, Copy)]
pub struct MethodMeta {
    pub name: &'static str,
    /// Method-level path fragment. `None` means the method is not routable.
    pub mapping: Option<&'static str>,
    pub params: &'static [ParamMeta],
}

impl MethodMeta {
    pub const fn mapped(name: &'static str, path: &'static str, params: &'static [ParamMeta]) -> Self {
        Self {
            name,
            mapping: Some(path),
            params,
        }
    }

    pub const fn unmapped(name: &'static str, params: &'static [ParamMeta]) -> Self {
        Self {
            name,
            mapping: None,
            params,
        }
    }

    /// `name(T1, T2, ...)`
    #[must_use]
    pub fn signature(&self) -> String {
        let params: Vec<String> = self.params.iter().map(|p| p.ty.to_string()).collect();
        format!("{}({})", self.name, params.join(", "))
    }
}

/// An autowired field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldMeta {
    pub name: &'static str,
    /// Qualified name of the field's declared type, used when no qualifier is given.
    pub declared_type: &'static str,
    /// Explicit bean name.
    pub qualifier: Option<&'static str>,
}

impl FieldMeta {
    /// Field resolved by its declared type.
    pub const fn autowired(name: &'static str, declared_type: &'static str) -> Self {
        Self {
            name,
            declared_type,
            qualifier: None,
        }
    }

    /// Field resolved by an explicit bean name.
    pub const fn qualified(
        name: &'static str,
        declared_type: &'static str,
        bean: &'static str,
    ) -> Self {
        Self {
            name,
            declared_type,
            qualifier: Some(bean),
        }
    }

    /// Bean name this field resolves against: the trimmed qualifier when it is
    /// non-blank, otherwise the declared type.
    #[must_use]
    pub fn target(&self) -> &'static str {
        match self.qualifier.map(str::trim) {
            Some(bean) if !bean.is_empty() => bean,
            _ => self.declared_type,
        }
    }
}

/// Static description of a component type.
#[derive(Debug)]
pub struct ComponentClass {
    /// Fully qualified name, e.g. `my_app::web::OrderController`.
    pub name: &'static str,
    pub role: Role,
    /// Explicit bean name; blank or `None` selects the default.
    pub bean_name: Option<&'static str>,
    /// Type-level path fragment, empty when the controller has none.
    pub base_path: &'static str,
    /// Qualified names of implemented interfaces.
    pub interfaces: &'static [&'static str],
    pub fields: &'static [FieldMeta],
    pub methods: &'static [MethodMeta],
    /// `None` when the type cannot be constructed without arguments.
    pub factory: Option<Factory>,
}

impl ComponentClass {
    /// Last path segment of the qualified name.
    #[must_use]
    pub fn simple_name(&self) -> &'static str {
        self.name.rsplit("::").next().unwrap_or(self.name)
    }

    /// Identifier used in route logs: `owner::method(T1, T2)`.
    #[must_use]
    pub fn method_identifier(&self, method: &MethodMeta) -> String {
        format!("{}::{}", self.name, method.signature())
    }
}

/// Link-time registration record collected with `inventory`.
pub struct ComponentRegistration {
    pub class: &'static ComponentClass,
}

impl ComponentRegistration {
    pub const fn new(class: &'static ComponentClass) -> Self {
        Self { class }
    }
}

inventory::collect!(ComponentRegistration);

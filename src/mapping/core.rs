use std::collections::HashMap;
use std::fmt;

use regex::Regex;
use serde::Serialize;
use tracing::{debug, info};

use crate::component::{Bean, MethodMeta, ParamMeta, ParamType, Role};
use crate::error::StartupError;
use crate::registry::Registry;

/// Collapse every run of `/` into a single `/`.
///
/// Idempotent: normalizing a normalized path returns it unchanged.
#[must_use]
pub fn normalize_path(path: &str) -> String {
    let mut out = String::with_capacity(path.len());
    let mut prev_slash = false;
    for c in path.chars() {
        if c == '/' {
            if !prev_slash {
                out.push(c);
            }
            prev_slash = true;
        } else {
            out.push(c);
            prev_slash = false;
        }
    }
    out
}

/// Compile a normalized path as a pattern that must match the whole input.
///
/// # Errors
///
/// Returns the regex error when the path is not valid pattern source.
pub fn compile_pattern(path: &str) -> Result<Regex, regex::Error> {
    Regex::new(&format!("^(?:{path})$"))
}

/// Key of a [`ParamIndexMapping`] entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum BindingKey {
    /// A named request parameter.
    Param(String),
    /// The request object.
    Request,
    /// The response object.
    Response,
}

impl fmt::Display for BindingKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BindingKey::Param(name) => f.write_str(name),
            BindingKey::Request => f.write_str("<request>"),
            BindingKey::Response => f.write_str("<response>"),
        }
    }
}

/// Binding key → positional parameter index.
///
/// Indices lie in `[0, arity)`. Parameters with neither a request-parameter name nor
/// a context type get no entry and their argument slot stays unset. Named
/// parameters are keyed by `String` so the dispatcher looks them up with the
/// incoming `&str` directly.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParamIndexMapping {
    params: HashMap<String, usize>,
    request: Option<usize>,
    response: Option<usize>,
}

impl ParamIndexMapping {
    /// Derive the mapping from a method's parameter list.
    ///
    /// A repeated key keeps its last index.
    #[must_use]
    pub fn from_params(params: &[ParamMeta]) -> Self {
        let mut mapping = Self {
            params: HashMap::with_capacity(params.len()),
            request: None,
            response: None,
        };

        for (index, param) in params.iter().enumerate() {
            if let Some(name) = param.request_param {
                if !name.trim().is_empty() {
                    mapping.params.insert(name.to_string(), index);
                }
            }
            match param.ty {
                ParamType::Request => mapping.request = Some(index),
                ParamType::Response => mapping.response = Some(index),
                _ => {}
            }
        }

        mapping
    }

    #[must_use]
    pub fn get(&self, key: &BindingKey) -> Option<usize> {
        match key {
            BindingKey::Param(name) => self.param(name),
            BindingKey::Request => self.request,
            BindingKey::Response => self.response,
        }
    }

    /// Index of the named request parameter.
    #[must_use]
    pub fn param(&self, name: &str) -> Option<usize> {
        self.params.get(name).copied()
    }

    #[must_use]
    pub fn request_index(&self) -> Option<usize> {
        self.request
    }

    #[must_use]
    pub fn response_index(&self) -> Option<usize> {
        self.response
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.params.len()
            + usize::from(self.request.is_some())
            + usize::from(self.response.is_some())
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn iter(&self) -> impl Iterator<Item = (BindingKey, usize)> + '_ {
        self.params
            .iter()
            .map(|(name, index)| (BindingKey::Param(name.clone()), *index))
            .chain(self.request.map(|index| (BindingKey::Request, index)))
            .chain(self.response.map(|index| (BindingKey::Response, index)))
    }
}

/// A compiled route: pattern, owning controller, target method and bindings.
#[derive(Debug, Clone)]
pub struct Handler {
    pattern: Regex,
    source: String,
    controller: Bean,
    method: &'static MethodMeta,
    param_types: Vec<ParamType>,
    mapping: ParamIndexMapping,
    identifier: String,
}

impl Handler {
    /// Compile a handler for `method` on `controller` at the normalized `path`.
    ///
    /// # Errors
    ///
    /// [`StartupError::Pattern`] when `path` is not valid pattern source.
    pub fn new(path: String, controller: Bean, method: &'static MethodMeta) -> Result<Self, StartupError> {
        let identifier = controller.class().method_identifier(method);
        let pattern = compile_pattern(&path).map_err(|source| StartupError::Pattern {
            path: path.clone(),
            handler: identifier.clone(),
            source,
        })?;

        Ok(Self {
            pattern,
            source: path,
            controller,
            method,
            param_types: method.params.iter().map(|p| p.ty).collect(),
            mapping: ParamIndexMapping::from_params(method.params),
            identifier,
        })
    }

    /// True when the pattern matches the entire path.
    #[inline]
    #[must_use]
    pub fn matches(&self, path: &str) -> bool {
        self.pattern.is_match(path)
    }

    /// The normalized path the pattern was compiled from.
    #[must_use]
    pub fn pattern(&self) -> &str {
        &self.source
    }

    #[must_use]
    pub fn controller(&self) -> &Bean {
        &self.controller
    }

    #[must_use]
    pub fn method(&self) -> &'static MethodMeta {
        self.method
    }

    #[must_use]
    pub fn param_types(&self) -> &[ParamType] {
        &self.param_types
    }

    #[must_use]
    pub fn mapping(&self) -> &ParamIndexMapping {
        &self.mapping
    }

    /// `owner::method(T1, T2)`
    #[must_use]
    pub fn identifier(&self) -> &str {
        &self.identifier
    }
}

/// Serializable summary of one table entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RouteInfo {
    pub pattern: String,
    pub method: String,
    pub bean: String,
}

/// Ordered handlers. Order decides precedence.
#[derive(Debug, Clone, Default)]
pub struct HandlerTable {
    handlers: Vec<Handler>,
}

impl HandlerTable {
    /// First handler whose pattern fully matches the normalized `path`.
    #[must_use]
    pub fn find(&self, path: &str) -> Option<&Handler> {
        self.handlers.iter().find(|handler| handler.matches(path))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Handler> {
        self.handlers.iter()
    }

    #[must_use]
    pub fn routes(&self) -> Vec<RouteInfo> {
        self.handlers
            .iter()
            .map(|handler| RouteInfo {
                pattern: handler.pattern().to_string(),
                method: handler.identifier().to_string(),
                bean: handler.controller().name().to_string(),
            })
            .collect()
    }

    /// Append a handler, rejecting a second registration of the same method.
    ///
    /// # Errors
    ///
    /// [`StartupError::DuplicateHandler`] when the identifier is already present.
    pub fn push(&mut self, handler: Handler) -> Result<(), StartupError> {
        if self
            .handlers
            .iter()
            .any(|existing| existing.identifier() == handler.identifier())
        {
            return Err(StartupError::DuplicateHandler {
                handler: handler.identifier().to_string(),
            });
        }
        info!(
            pattern = %handler.pattern(),
            method = %handler.identifier(),
            "mapped: {} : {}",
            handler.pattern(),
            handler.identifier()
        );
        self.handlers.push(handler);
        Ok(())
    }
}

/// Builds the [`HandlerTable`] from the registered controllers.
#[derive(Debug, Default, Clone, Copy)]
pub struct HandlerMappingBuilder;

impl HandlerMappingBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// `"/" + base + "/" + method_path`, normalized.
    #[must_use]
    pub fn route_path(base_path: &str, method_path: &str) -> String {
        normalize_path(&format!("/{base_path}/{method_path}"))
    }

    /// Compile every mapped method of every controller, in discovery order.
    ///
    /// # Errors
    ///
    /// [`StartupError::Pattern`] or [`StartupError::DuplicateHandler`].
    pub fn build(&self, registry: &Registry) -> Result<HandlerTable, StartupError> {
        let mut table = HandlerTable::default();

        for bean in registry.instances() {
            let class = bean.class();
            if class.role != Role::Controller {
                continue;
            }

            for method in class.methods {
                let Some(method_path) = method.mapping else {
                    debug!(class = %class.name, method = %method.name, "Skipping unmapped method");
                    continue;
                };
                let path = Self::route_path(class.base_path, method_path);
                table.push(Handler::new(path, bean.clone(), method)?)?;
            }
        }

        info!(routes_count = table.len(), "Handler table built");
        Ok(table)
    }
}

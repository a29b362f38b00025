//! # Component Registry
//!
//! The registry maps bean names to live component instances. It is populated once
//! by [`RegistryBuilder`] and is read-only for the rest of the process lifetime.
//!
//! ## Bean naming
//!
//! A bean is named by its explicit marker value when that value is non-blank,
//! otherwise by its simple class name with the first character lower-cased
//! (`TestService` → `testService`).
//!
//! ## Interface aliases
//!
//! Services are additionally registered under the qualified name of every interface
//! they implement. The alias and the primary entry share one instance. Two services
//! may not claim the same interface.

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;

use indexmap::IndexMap;
use tracing::{debug, info, warn};

use crate::component::{Bean, Component, ComponentClass, Role};
use crate::error::StartupError;
use crate::scan::ClassPath;

/// A discovered class's identity as seen by the registry builder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComponentDescriptor {
    pub name: String,
    pub role: Role,
    pub bean_name: Option<String>,
}

impl ComponentDescriptor {
    #[must_use]
    pub fn of(class: &ComponentClass) -> Self {
        Self {
            name: class.name.to_string(),
            role: class.role,
            bean_name: class.bean_name.map(str::to_string),
        }
    }

    #[must_use]
    pub fn simple_name(&self) -> &str {
        self.name.rsplit("::").next().unwrap_or(&self.name)
    }

    /// Explicit bean name if non-blank, otherwise the lower-camel simple name.
    #[must_use]
    pub fn resolved_bean_name(&self) -> String {
        match self.bean_name.as_deref().map(str::trim) {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => lower_first(self.simple_name()),
        }
    }
}

/// Lower-case the first character only.
#[must_use]
pub fn lower_first(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Bean name → instance. Insertion order is discovery order.
#[derive(Debug, Default, Clone)]
pub struct Registry {
    beans: IndexMap<String, Bean>,
}

impl Registry {
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Bean> {
        self.beans.get(name)
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.beans.contains_key(name)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.beans.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.beans.is_empty()
    }

    /// All entries, aliases included.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Bean)> {
        self.beans.iter().map(|(name, bean)| (name.as_str(), bean))
    }

    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        self.beans.keys().map(String::as_str).collect()
    }

    /// One entry per distinct instance, in discovery order.
    #[must_use]
    pub fn instances(&self) -> Vec<&Bean> {
        let mut seen: Vec<&Bean> = Vec::with_capacity(self.beans.len());
        for bean in self.beans.values() {
            if !seen.iter().any(|s| s.same_instance(bean)) {
                seen.push(bean);
            }
        }
        seen
    }

    fn insert(&mut self, name: String, bean: Bean) -> Option<Bean> {
        self.beans.insert(name, bean)
    }
}

/// Instantiates discovered controllers and services into a [`Registry`].
pub struct RegistryBuilder<'a> {
    class_path: &'a dyn ClassPath,
}

impl<'a> RegistryBuilder<'a> {
    pub fn new(class_path: &'a dyn ClassPath) -> Self {
        Self { class_path }
    }

    /// Build the registry from the scanned class names.
    ///
    /// # Errors
    ///
    /// - [`StartupError::Instantiation`] when a class cannot be loaded or constructed
    /// - [`StartupError::DuplicateAlias`] when two services claim one interface
    pub fn build(&self, class_names: &[String]) -> Result<Registry, StartupError> {
        let mut registry = Registry::default();

        for class_name in class_names {
            let class = self.class_path.load(class_name).ok_or_else(|| {
                StartupError::Instantiation {
                    class: class_name.clone(),
                    reason: "class not found on class path".to_string(),
                }
            })?;

            match class.role {
                Role::Controller | Role::Service => self.register(&mut registry, class)?,
                Role::Unmarked => {
                    debug!(class = %class.name, "Skipping unmarked class");
                }
            }
        }

        info!(
            beans = registry.len(),
            names = ?registry.names(),
            "Component registry built"
        );
        Ok(registry)
    }

    fn register(
        &self,
        registry: &mut Registry,
        class: &'static ComponentClass,
    ) -> Result<(), StartupError> {
        let descriptor = ComponentDescriptor::of(class);
        let bean_name = descriptor.resolved_bean_name();
        let bean = Bean::new(&bean_name, class, instantiate(class)?);

        if let Some(replaced) = registry.insert(bean_name.clone(), bean.clone()) {
            warn!(
                bean = %bean_name,
                replaced = %replaced.class().name,
                class = %class.name,
                "Bean name already registered, replacing previous instance"
            );
        }
        debug!(bean = %bean_name, class = %class.name, role = %class.role, "Registered bean");

        if class.role != Role::Service {
            return Ok(());
        }

        for interface in class.interfaces {
            if let Some(existing) = registry.get(interface) {
                if !existing.same_instance(&bean) {
                    return Err(StartupError::DuplicateAlias {
                        interface: (*interface).to_string(),
                        existing: existing.name().to_string(),
                        class: class.name.to_string(),
                    });
                }
            }
            registry.insert((*interface).to_string(), bean.clone());
            debug!(bean = %bean_name, alias = %interface, "Registered interface alias");
        }
        Ok(())
    }
}

fn instantiate(class: &'static ComponentClass) -> Result<Arc<dyn Component>, StartupError> {
    let factory = class.factory.ok_or_else(|| StartupError::Instantiation {
        class: class.name.to_string(),
        reason: "no no-argument constructor".to_string(),
    })?;

    match catch_unwind(AssertUnwindSafe(factory)) {
        Ok(Ok(instance)) => Ok(instance),
        Ok(Err(err)) => Err(StartupError::Instantiation {
            class: class.name.to_string(),
            reason: format!("{err:#}"),
        }),
        Err(panic) => Err(StartupError::Instantiation {
            class: class.name.to_string(),
            reason: format!("constructor panicked: {}", panic_message(panic.as_ref())),
        }),
    }
}

/// Best-effort text of a panic payload.
pub(crate) fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        (*msg).to_string()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "unknown panic".to_string()
    }
}

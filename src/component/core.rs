use std::any::{Any, TypeId};
use std::fmt;
use std::sync::{Arc, OnceLock};

use tracing::debug;

use super::{Args, ComponentClass};

/// Type-erased `Arc<T>` handed out by [`Component::cast`].
pub type Cast = Box<dyn Any + Send + Sync>;

/// A live, registry-managed instance.
///
/// Instances are shared: the registry, every alias and every autowired field that
/// resolves to a bean all point at the same object. Mutation after construction
/// therefore goes through interior mutability ([`Autowired`]).
pub trait Component: Any + Send + Sync {
    /// Assign `bean` to the autowired field `field`.
    ///
    /// Returns `false` when the field is unknown or the bean is not assignable to it.
    fn autowire(&self, _field: &str, _bean: &Bean) -> bool {
        false
    }

    /// Hand this instance out as an `Arc` of the type identified by `target`
    /// (a `TypeId` of `Arc<T>`). Implement with [`component_casts!`](crate::component_casts).
    fn cast(self: Arc<Self>, _target: TypeId) -> Option<Cast> {
        None
    }

    /// Invoke a mapped method. `Ok(None)` means the method produced no value and has
    /// written its own response.
    fn invoke(&self, method: &str, _args: &mut Args<'_>) -> anyhow::Result<Option<String>> {
        anyhow::bail!("method `{method}` is not invocable")
    }
}

/// Implements [`Component::cast`] for the listed target types.
///
/// ```rust,ignore
/// fn cast(self: Arc<Self>, target: TypeId) -> Option<Cast> {
///     brrtmvc::component_casts!(self, target; Self, dyn Greeter)
/// }
/// ```
#[macro_export]
macro_rules! component_casts {
    ($this:ident, $target:ident; $($ty:ty),+ $(,)?) => {{
        $(
            if $target == ::std::any::TypeId::of::<::std::sync::Arc<$ty>>() {
                let this = ::std::sync::Arc::clone(&$this);
                let cast: ::std::sync::Arc<$ty> = this;
                return ::std::option::Option::Some(::std::boxed::Box::new(cast));
            }
        )+
        ::std::option::Option::None
    }};
}

/// Default factory for types with a `Default` constructor.
pub fn construct<T: Component + Default>() -> anyhow::Result<Arc<dyn Component>> {
    Ok(Arc::new(T::default()))
}

/// A registry entry: the primary bean name, the static class and the shared instance.
#[derive(Clone)]
pub struct Bean {
    name: Arc<str>,
    class: &'static ComponentClass,
    instance: Arc<dyn Component>,
}

impl Bean {
    pub fn new(name: &str, class: &'static ComponentClass, instance: Arc<dyn Component>) -> Self {
        Self {
            name: Arc::from(name),
            class,
            instance,
        }
    }

    /// Primary bean name (aliases share the primary entry's name).
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn class(&self) -> &'static ComponentClass {
        self.class
    }

    #[must_use]
    pub fn instance(&self) -> &Arc<dyn Component> {
        &self.instance
    }

    /// The instance as `Arc<T>`, where `T` is the concrete type or one of the trait
    /// objects the component casts to.
    #[must_use]
    pub fn get<T: ?Sized + 'static>(&self) -> Option<Arc<T>> {
        Arc::clone(&self.instance)
            .cast(TypeId::of::<Arc<T>>())?
            .downcast::<Arc<T>>()
            .ok()
            .map(|cast| *cast)
    }

    /// True when both entries share one instance.
    #[must_use]
    pub fn same_instance(&self, other: &Bean) -> bool {
        std::ptr::addr_eq(Arc::as_ptr(&self.instance), Arc::as_ptr(&other.instance))
    }
}

impl fmt::Debug for Bean {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Bean")
            .field("name", &self.name)
            .field("class", &self.class.name)
            .finish()
    }
}

/// Injection slot for an autowired field.
///
/// Filled at most once during startup; read-only afterwards.
pub struct Autowired<T: ?Sized> {
    slot: OnceLock<Arc<T>>,
}

impl<T: ?Sized + 'static> Autowired<T> {
    pub const fn new() -> Self {
        Self {
            slot: OnceLock::new(),
        }
    }

    /// Assign the bean if it casts to `T`. Returns `false` when it does not.
    pub fn fill(&self, bean: &Bean) -> bool {
        let Some(value) = bean.get::<T>() else {
            return false;
        };
        if self.slot.set(value).is_err() {
            debug!(bean = %bean.name(), "Autowired slot already filled, keeping first value");
        }
        true
    }

    #[must_use]
    pub fn get(&self) -> Option<&T> {
        self.slot.get().map(|value| &**value)
    }

    #[must_use]
    pub fn is_set(&self) -> bool {
        self.slot.get().is_some()
    }

    /// The injected dependency, or an error naming the field when it was left unset.
    pub fn require(&self, field: &str) -> anyhow::Result<&T> {
        self.get()
            .ok_or_else(|| anyhow::anyhow!("autowired field `{field}` is not set"))
    }
}

impl<T: ?Sized + 'static> Default for Autowired<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: ?Sized> fmt::Debug for Autowired<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = if self.slot.get().is_some() { "set" } else { "unset" };
        f.debug_tuple("Autowired").field(&state).finish()
    }
}

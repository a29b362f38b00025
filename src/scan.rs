//! # Component Scanning
//!
//! Enumerates the qualified names of component classes reachable under a root
//! package (a module path such as `my_app::web`) and loads their static
//! [`ComponentClass`] descriptions by name.
//!
//! Two class paths are provided:
//!
//! - [`InventoryClassPath`] sees every class submitted with
//!   `inventory::submit! { ComponentRegistration::new(&CLASS) }` anywhere in the binary.
//! - [`StaticClassPath`] sees an explicit list, which keeps tests isolated from each other.

use tracing::{debug, info};

use crate::component::{ComponentClass, ComponentRegistration};
use crate::error::StartupError;

/// Source of component classes.
pub trait ClassPath: Send + Sync {
    /// Qualified names of all classes under `root`, recursively.
    fn list(&self, root: &str) -> Result<Vec<String>, StartupError>;

    /// Static description for a qualified name.
    fn load(&self, name: &str) -> Option<&'static ComponentClass>;
}

/// True when `name` is `root` itself or lives in a module below it.
#[must_use]
pub fn is_under(name: &str, root: &str) -> bool {
    if root.is_empty() {
        return true;
    }
    name.strip_prefix(root)
        .is_some_and(|rest| rest.is_empty() || rest.starts_with("::"))
}

fn collect_under<'a>(
    classes: impl Iterator<Item = &'a ComponentClass>,
    root: &str,
) -> Result<Vec<String>, StartupError> {
    let root = root.trim();
    if root.is_empty() {
        return Err(StartupError::Scan {
            package: String::new(),
            reason: "no scan package configured".to_string(),
        });
    }

    let names: Vec<String> = classes
        .filter(|class| is_under(class.name, root))
        .map(|class| class.name.to_string())
        .collect();

    if names.is_empty() {
        return Err(StartupError::Scan {
            package: root.to_string(),
            reason: "package not found".to_string(),
        });
    }

    info!(package = %root, classes = names.len(), "Component scan complete");
    Ok(names)
}

/// Class path backed by link-time `inventory` registrations.
///
/// Link order is not stable across builds, so names are returned sorted to keep
/// discovery order (and with it route precedence) deterministic.
#[derive(Debug, Default, Clone, Copy)]
pub struct InventoryClassPath;

impl ClassPath for InventoryClassPath {
    fn list(&self, root: &str) -> Result<Vec<String>, StartupError> {
        let mut names = collect_under(
            inventory::iter::<ComponentRegistration>
                .into_iter()
                .map(|registration| registration.class),
            root,
        )?;
        names.sort_unstable();
        names.dedup();
        debug!(package = %root, classes = ?names, "Inventory class path listing");
        Ok(names)
    }

    fn load(&self, name: &str) -> Option<&'static ComponentClass> {
        inventory::iter::<ComponentRegistration>
            .into_iter()
            .map(|registration| registration.class)
            .find(|class| class.name == name)
    }
}

/// Class path over an explicit list, listed in the order given.
#[derive(Debug, Default, Clone)]
pub struct StaticClassPath {
    classes: Vec<&'static ComponentClass>,
}

impl StaticClassPath {
    pub fn new(classes: impl IntoIterator<Item = &'static ComponentClass>) -> Self {
        Self {
            classes: classes.into_iter().collect(),
        }
    }

    #[must_use]
    pub fn with(mut self, class: &'static ComponentClass) -> Self {
        self.classes.push(class);
        self
    }
}

impl ClassPath for StaticClassPath {
    fn list(&self, root: &str) -> Result<Vec<String>, StartupError> {
        collect_under(self.classes.iter().copied(), root)
    }

    fn load(&self, name: &str) -> Option<&'static ComponentClass> {
        self.classes.iter().copied().find(|class| class.name == name)
    }
}

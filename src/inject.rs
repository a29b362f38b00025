//! # Dependency Injection
//!
//! Resolves every autowired field of every registered component against the
//! registry and assigns the resolved bean in place. Because instances are shared,
//! every holder of a bean observes the same wired graph.
//!
//! A field resolves against its explicit bean name when one is given, otherwise
//! against the qualified name of its declared type (which matches service interface
//! aliases).
//!
//! ## Unresolved fields
//!
//! A field whose target is absent from the registry is left unset. What happens
//! beyond that depends on [`UnresolvedPolicy`]:
//!
//! | Policy | Effect |
//! |---|---|
//! | `Silent` | debug log only (legacy behavior) |
//! | `Warn` | warning per field |
//! | `Fail` | startup fails with [`StartupError::UnresolvedDependency`] |

use tracing::{debug, info, warn};

use crate::component::Bean;
use crate::error::StartupError;
use crate::registry::Registry;

/// Reaction to an autowired field whose target bean does not exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UnresolvedPolicy {
    Silent,
    #[default]
    Warn,
    Fail,
}

/// One autowiring decision: which field of which bean targets which bean name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldBinding {
    pub owner: String,
    pub field: String,
    pub target: String,
}

/// Outcome of an injection pass.
#[derive(Debug, Clone, Default)]
pub struct InjectionReport {
    pub bound: Vec<FieldBinding>,
    pub unresolved: Vec<FieldBinding>,
}

impl InjectionReport {
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.unresolved.is_empty()
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Injector {
    policy: UnresolvedPolicy,
}

impl Injector {
    #[must_use]
    pub fn new(policy: UnresolvedPolicy) -> Self {
        Self { policy }
    }

    /// Wire every distinct instance in the registry.
    ///
    /// # Errors
    ///
    /// - [`StartupError::IncompatibleBean`] when a resolved bean does not fit its field
    /// - [`StartupError::UnresolvedDependency`] under [`UnresolvedPolicy::Fail`]
    pub fn inject(&self, registry: &Registry) -> Result<InjectionReport, StartupError> {
        let mut report = InjectionReport::default();

        for owner in registry.instances() {
            for field in owner.class().fields {
                let binding = FieldBinding {
                    owner: owner.name().to_string(),
                    field: field.name.to_string(),
                    target: field.target().to_string(),
                };

                match registry.get(&binding.target) {
                    Some(target) => {
                        assign(owner, target, &binding)?;
                        report.bound.push(binding);
                    }
                    None => {
                        self.unresolved(&binding);
                        report.unresolved.push(binding);
                    }
                }
            }
        }

        if self.policy == UnresolvedPolicy::Fail {
            if let Some(first) = report.unresolved.first() {
                return Err(StartupError::UnresolvedDependency {
                    owner: first.owner.clone(),
                    field: first.field.clone(),
                    target: first.target.clone(),
                });
            }
        }

        info!(
            bound = report.bound.len(),
            unresolved = report.unresolved.len(),
            "Dependency injection complete"
        );
        Ok(report)
    }

    fn unresolved(&self, binding: &FieldBinding) {
        match self.policy {
            UnresolvedPolicy::Silent => debug!(
                owner = %binding.owner,
                field = %binding.field,
                target = %binding.target,
                "Autowired field left unset"
            ),
            UnresolvedPolicy::Warn | UnresolvedPolicy::Fail => warn!(
                owner = %binding.owner,
                field = %binding.field,
                target = %binding.target,
                "Autowired field has no matching bean, leaving it unset"
            ),
        }
    }
}

fn assign(owner: &Bean, target: &Bean, binding: &FieldBinding) -> Result<(), StartupError> {
    if owner.instance().autowire(&binding.field, target) {
        debug!(
            owner = %binding.owner,
            field = %binding.field,
            target = %binding.target,
            "Autowired field"
        );
        Ok(())
    } else {
        Err(StartupError::IncompatibleBean {
            owner: binding.owner.clone(),
            field: binding.field.clone(),
            target: binding.target.clone(),
        })
    }
}

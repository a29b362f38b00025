//! # Dispatch Context
//!
//! The engine as one explicitly constructed value. [`DispatchContext::initialize`]
//! runs the startup pipeline once, in order:
//!
//! 1. scan the configured package on a [`ClassPath`]
//! 2. instantiate controllers and services into the [`Registry`]
//! 3. wire autowired fields with the [`Injector`]
//! 4. compile the [`HandlerTable`]
//!
//! Any step failing aborts construction, so a context that exists is complete. After
//! construction the registry and table are frozen behind `Arc`s and shared read-only
//! by every request. Independent contexts do not interact, which keeps tests isolated.

use std::path::Path;
use std::sync::Arc;

use tracing::info;

use crate::config::AppConfig;
use crate::dispatcher::{DispatchOutcome, Dispatcher};
use crate::error::StartupError;
use crate::inject::{InjectionReport, Injector};
use crate::mapping::{HandlerMappingBuilder, HandlerTable};
use crate::registry::{Registry, RegistryBuilder};
use crate::scan::{ClassPath, InventoryClassPath};
use crate::server::{Request, Response};

#[derive(Debug, Clone)]
pub struct DispatchContext {
    config: AppConfig,
    registry: Arc<Registry>,
    table: Arc<HandlerTable>,
    report: InjectionReport,
    dispatcher: Dispatcher,
}

impl DispatchContext {
    /// Build the engine from `config`, discovering components on `class_path`.
    ///
    /// # Errors
    ///
    /// The first [`StartupError`] raised by any startup step.
    pub fn initialize(config: AppConfig, class_path: &dyn ClassPath) -> Result<Self, StartupError> {
        info!(
            scan_package = %config.scan_package,
            context_path = %config.context_path,
            compat_mode = ?config.compat_mode,
            require_dependencies = config.require_dependencies,
            "Initializing dispatch context"
        );

        let class_names = class_path.list(&config.scan_package)?;
        let registry = RegistryBuilder::new(class_path).build(&class_names)?;
        let report = Injector::new(config.unresolved_policy()).inject(&registry)?;
        let table = Arc::new(HandlerMappingBuilder::new().build(&registry)?);

        let dispatcher = Dispatcher::new(Arc::clone(&table), config.compat_mode)
            .with_context_path(config.context_path.clone());

        info!(
            beans = registry.len(),
            routes = table.len(),
            unresolved = report.unresolved.len(),
            "Dispatch context ready"
        );

        Ok(Self {
            config,
            registry: Arc::new(registry),
            table,
            report,
            dispatcher,
        })
    }

    /// Load the configuration file and build the engine over every component linked
    /// into the binary.
    ///
    /// # Errors
    ///
    /// [`StartupError::Config`] or any startup step's error.
    pub fn from_config_file(path: impl AsRef<Path>) -> Result<Self, StartupError> {
        let config = AppConfig::load(path)?;
        Self::initialize(config, &InventoryClassPath)
    }

    #[must_use]
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    #[must_use]
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    #[must_use]
    pub fn table(&self) -> &HandlerTable {
        &self.table
    }

    /// Autowiring results from startup.
    #[must_use]
    pub fn injection_report(&self) -> &InjectionReport {
        &self.report
    }

    #[must_use]
    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    pub fn dispatch(&self, req: &Request, resp: &mut Response) -> DispatchOutcome {
        self.dispatcher.dispatch(req, resp)
    }

    #[must_use]
    pub fn serve(&self, req: &Request) -> (Response, DispatchOutcome) {
        self.dispatcher.serve(req)
    }
}

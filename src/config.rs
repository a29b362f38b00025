//! # Startup Configuration
//!
//! The engine is configured by a single key-value resource read once at startup.
//! Two formats are accepted, selected by file extension:
//!
//! - `.toml`: deserialized with `serde`
//! - anything else: properties (`key=value` or `key: value`, `#`/`!` comments)
//!
//! ## Keys
//!
//! | Key | Default | Meaning |
//! |---|---|---|
//! | `scanPackage` | required | root module path to scan for components |
//! | `contextPath` | empty | deployment prefix stripped before route matching |
//! | `compatMode` | `hardened` | `legacy` or `hardened`, see [`CompatMode`] |
//! | `requireDependencies` | `false` | fail startup on unresolved autowired fields |
//!
//! ## Environment Variables
//!
//! Applied on top of the file by [`AppConfig::load`]:
//!
//! - `BRRTMVC_SCAN_PACKAGE`
//! - `BRRTMVC_CONTEXT_PATH`
//! - `BRRTMVC_COMPAT_MODE`
//!
//! ## Example
//!
//! ```properties
//! # application.properties
//! scanPackage=brrtmvc::demo
//! contextPath=/shop
//! compatMode=legacy
//! ```

use std::collections::HashMap;
use std::env;
use std::path::Path;
use std::str::FromStr;

use serde::Deserialize;

use crate::error::StartupError;
use crate::inject::UnresolvedPolicy;

/// How strictly the engine treats missing dependencies and how much a failure body reveals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CompatMode {
    /// Unresolved autowired fields are silent and failure bodies carry the internal
    /// error detail (`500, ErrInfo :<detail>`).
    Legacy,
    /// Unresolved autowired fields are logged as warnings and failure bodies are a
    /// generic `500 Internal Server Error`; the detail is only logged.
    #[default]
    Hardened,
}

impl FromStr for CompatMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "legacy" => Ok(CompatMode::Legacy),
            "hardened" => Ok(CompatMode::Hardened),
            other => Err(format!("unknown compat mode `{other}`, expected `legacy` or `hardened`")),
        }
    }
}

/// Engine configuration.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppConfig {
    #[serde(alias = "scan_package")]
    pub scan_package: String,
    #[serde(default, alias = "context_path")]
    pub context_path: String,
    #[serde(default, alias = "compat_mode")]
    pub compat_mode: CompatMode,
    #[serde(default, alias = "require_dependencies")]
    pub require_dependencies: bool,
}

impl AppConfig {
    /// Configuration scanning `scan_package` with every other key at its default.
    pub fn new(scan_package: impl Into<String>) -> Self {
        Self {
            scan_package: scan_package.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_context_path(mut self, context_path: impl Into<String>) -> Self {
        self.context_path = context_path.into();
        self
    }

    #[must_use]
    pub fn with_compat_mode(mut self, mode: CompatMode) -> Self {
        self.compat_mode = mode;
        self
    }

    #[must_use]
    pub fn with_require_dependencies(mut self, required: bool) -> Self {
        self.require_dependencies = required;
        self
    }

    /// Read the resource at `path`, then apply environment overrides.
    ///
    /// # Errors
    ///
    /// [`StartupError::Config`] when the file is missing, malformed or lacks `scanPackage`.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, StartupError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| config_error(path, e.to_string()))?;

        let is_toml = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("toml"));
        let mut config = if is_toml {
            toml::from_str::<AppConfig>(&content).map_err(|e| config_error(path, e.to_string()))?
        } else {
            Self::from_properties(&content).map_err(|message| config_error(path, message))?
        };

        config.apply_env_overrides().map_err(|message| config_error(path, message))?;
        config.validate().map_err(|message| config_error(path, message))?;
        Ok(config)
    }

    /// Parse properties text.
    ///
    /// # Errors
    ///
    /// A message naming the offending key or value.
    pub fn from_properties(content: &str) -> Result<Self, String> {
        let props = parse_properties(content);
        let mut config = AppConfig::default();

        if let Some(scan) = props.get("scanPackage") {
            config.scan_package = scan.clone();
        }
        if let Some(context) = props.get("contextPath") {
            config.context_path = context.clone();
        }
        if let Some(mode) = props.get("compatMode") {
            config.compat_mode = mode.parse()?;
        }
        if let Some(required) = props.get("requireDependencies") {
            config.require_dependencies = required
                .trim()
                .parse()
                .map_err(|_| format!("requireDependencies must be true or false, got `{required}`"))?;
        }
        Ok(config)
    }

    /// Override fields from `BRRTMVC_*` environment variables.
    ///
    /// # Errors
    ///
    /// A message when `BRRTMVC_COMPAT_MODE` holds an unknown mode.
    pub fn apply_env_overrides(&mut self) -> Result<(), String> {
        if let Ok(scan) = env::var("BRRTMVC_SCAN_PACKAGE") {
            self.scan_package = scan;
        }
        if let Ok(context) = env::var("BRRTMVC_CONTEXT_PATH") {
            self.context_path = context;
        }
        if let Ok(mode) = env::var("BRRTMVC_COMPAT_MODE") {
            self.compat_mode = mode.parse()?;
        }
        Ok(())
    }

    fn validate(&self) -> Result<(), String> {
        if self.scan_package.trim().is_empty() {
            return Err("missing required key `scanPackage`".to_string());
        }
        Ok(())
    }

    /// Injection policy implied by the mode and `requireDependencies`.
    #[must_use]
    pub fn unresolved_policy(&self) -> UnresolvedPolicy {
        match (self.require_dependencies, self.compat_mode) {
            (true, _) => UnresolvedPolicy::Fail,
            (false, CompatMode::Legacy) => UnresolvedPolicy::Silent,
            (false, CompatMode::Hardened) => UnresolvedPolicy::Warn,
        }
    }
}

fn config_error(path: &Path, message: String) -> StartupError {
    StartupError::Config {
        path: path.to_path_buf(),
        message,
    }
}

/// Parse `key=value` / `key: value` lines. Keys and values are trimmed; later keys win.
#[must_use]
pub fn parse_properties(content: &str) -> HashMap<String, String> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#') && !line.starts_with('!'))
        .filter_map(|line| {
            let split = line.find(['=', ':'])?;
            let (key, value) = line.split_at(split);
            Some((key.trim().to_string(), value[1..].trim().to_string()))
        })
        .collect()
}

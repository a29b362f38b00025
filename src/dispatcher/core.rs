use std::error::Error as _;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;
use std::time::Instant;

use http::StatusCode;
use tracing::{debug, error, info};

use super::convert::{collapse_values, convert};
use crate::component::{Arg, Args};
use crate::config::CompatMode;
use crate::error::DispatchError;
use crate::mapping::{normalize_path, Handler, HandlerTable};
use crate::registry::panic_message;
use crate::server::{Request, Response, NOT_FOUND_BODY};

/// Body written for failed requests in [`CompatMode::Hardened`].
pub const INTERNAL_ERROR_BODY: &str = "500 Internal Server Error";

/// Prefix of the failure body in [`CompatMode::Legacy`]. The error detail follows it.
pub const LEGACY_ERROR_PREFIX: &str = "500, ErrInfo :";

/// Terminal state of one dispatch.
#[derive(Debug)]
pub enum DispatchOutcome {
    /// The handler ran. `returned` is true when its return value became the body.
    Completed { handler: String, returned: bool },
    /// No pattern matched; the not-found body was written.
    NotFound { path: String },
    /// Binding or invocation failed; an error body was written.
    Failed(DispatchError),
}

impl DispatchOutcome {
    #[must_use]
    pub fn is_completed(&self) -> bool {
        matches!(self, DispatchOutcome::Completed { .. })
    }

    #[must_use]
    pub fn error(&self) -> Option<&DispatchError> {
        match self {
            DispatchOutcome::Failed(err) => Some(err),
            _ => None,
        }
    }

    /// Status written to the response for this outcome.
    #[must_use]
    pub fn status(&self) -> StatusCode {
        match self {
            DispatchOutcome::Completed { .. } => StatusCode::OK,
            DispatchOutcome::NotFound { .. } => StatusCode::NOT_FOUND,
            DispatchOutcome::Failed(err) => err.status(),
        }
    }
}

/// Per-request entry point over a frozen [`HandlerTable`].
///
/// Holds no per-request state, so one dispatcher can serve any number of threads.
#[derive(Debug, Clone)]
pub struct Dispatcher {
    table: Arc<HandlerTable>,
    mode: CompatMode,
    context_path: String,
}

impl Dispatcher {
    pub fn new(table: Arc<HandlerTable>, mode: CompatMode) -> Self {
        Self {
            table,
            mode,
            context_path: String::new(),
        }
    }

    /// Context prefix used for requests that do not carry their own.
    #[must_use]
    pub fn with_context_path(mut self, context_path: impl Into<String>) -> Self {
        self.context_path = context_path.into();
        self
    }

    #[must_use]
    pub fn table(&self) -> &HandlerTable {
        &self.table
    }

    #[must_use]
    pub fn mode(&self) -> CompatMode {
        self.mode
    }

    /// Strip the context prefix when present, then collapse separator runs.
    #[must_use]
    pub fn normalize(&self, req: &Request) -> String {
        let context = if req.context_path().is_empty() {
            self.context_path.as_str()
        } else {
            req.context_path()
        };
        let path = req.path();
        let stripped = if context.is_empty() {
            path
        } else {
            path.strip_prefix(context).unwrap_or(path)
        };
        normalize_path(stripped)
    }

    /// Dispatch into a fresh response and return it.
    #[must_use]
    pub fn serve(&self, req: &Request) -> (Response, DispatchOutcome) {
        let mut resp = Response::new();
        let outcome = self.dispatch(req, &mut resp);
        (resp, outcome)
    }

    /// Run one request through normalize, match, bind, invoke and respond.
    ///
    /// Every failure is turned into a response here; nothing escapes to the caller
    /// except the returned [`DispatchOutcome`].
    pub fn dispatch(&self, req: &Request, resp: &mut Response) -> DispatchOutcome {
        let request_id = req.id();
        let start = Instant::now();

        // D1: normalizing
        let path = self.normalize(req);
        debug!(
            request_id = %request_id,
            raw_path = %req.path(),
            path = %path,
            "Dispatch start"
        );

        // D2: matching
        let Some(handler) = self.table.find(&path) else {
            info!(request_id = %request_id, path = %path, "No handler matched");
            resp.set_status(StatusCode::NOT_FOUND);
            resp.write(NOT_FOUND_BODY);
            return DispatchOutcome::NotFound { path };
        };
        debug!(
            request_id = %request_id,
            path = %path,
            pattern = %handler.pattern(),
            handler = %handler.identifier(),
            "Handler matched"
        );

        match self.execute(handler, req, resp) {
            Ok(value) => {
                // D5: responding
                let returned = value.is_some();
                if let Some(body) = value {
                    resp.write(&body);
                }
                info!(
                    request_id = %request_id,
                    handler = %handler.identifier(),
                    returned = returned,
                    execution_time_ms = start.elapsed().as_millis() as u64,
                    "Dispatch complete"
                );
                DispatchOutcome::Completed {
                    handler: handler.identifier().to_string(),
                    returned,
                }
            }
            Err(err) => {
                self.write_error(req, &err, resp);
                DispatchOutcome::Failed(err)
            }
        }
    }

    fn execute(
        &self,
        handler: &Handler,
        req: &Request,
        resp: &mut Response,
    ) -> Result<Option<String>, DispatchError> {
        // D3: binding
        let mut args = bind(handler, req, resp)?;
        debug!(
            request_id = %req.id(),
            handler = %handler.identifier(),
            arity = args.len(),
            "Arguments bound"
        );

        // D4: invoking
        invoke(handler, &mut args)
    }

    fn write_error(&self, req: &Request, err: &DispatchError, resp: &mut Response) {
        let detail = error_detail(err);
        error!(
            request_id = %req.id(),
            path = %req.path(),
            status = err.status().as_u16(),
            error = %detail,
            "Dispatch failed"
        );

        resp.set_status(err.status());
        match self.mode {
            CompatMode::Legacy => resp.write(&format!("{LEGACY_ERROR_PREFIX}{detail}")),
            CompatMode::Hardened => resp.write(INTERNAL_ERROR_BODY),
        }
    }
}

/// Build the positional argument array for `handler` from `req`.
///
/// Request parameters without a binding are ignored. Unbound positions stay unset.
///
/// # Errors
///
/// [`DispatchError::Conversion`] for the first parameter that fails conversion.
pub fn bind<'a>(
    handler: &Handler,
    req: &'a Request,
    resp: &'a mut Response,
) -> Result<Args<'a>, DispatchError> {
    let types = handler.param_types();
    let mapping = handler.mapping();
    let mut args = Args::with_arity(types.len());

    for (name, values) in req.parameter_map() {
        let Some(index) = mapping.param(name) else {
            continue;
        };
        let Some(ty) = types.get(index).copied() else {
            continue;
        };
        args.set(index, convert(ty, collapse_values(values), name)?);
    }

    if let Some(index) = mapping.request_index() {
        args.set(index, Arg::Request(req));
    }
    if let Some(index) = mapping.response_index() {
        args.set(index, Arg::Response(resp));
    }
    Ok(args)
}

fn invoke(handler: &Handler, args: &mut Args<'_>) -> Result<Option<String>, DispatchError> {
    let instance = handler.controller().instance();
    let method = handler.method().name;

    match catch_unwind(AssertUnwindSafe(|| instance.invoke(method, args))) {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(source)) => Err(DispatchError::Invocation {
            handler: handler.identifier().to_string(),
            source: source.into(),
        }),
        Err(panic) => Err(DispatchError::Invocation {
            handler: handler.identifier().to_string(),
            source: format!("handler panicked: {}", panic_message(panic.as_ref())).into(),
        }),
    }
}

/// The error message followed by its cause chain, one cause per line.
#[must_use]
pub fn error_detail(err: &DispatchError) -> String {
    let mut detail = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        detail.push_str("\nCaused by: ");
        detail.push_str(&cause.to_string());
        source = cause.source();
    }
    detail
}

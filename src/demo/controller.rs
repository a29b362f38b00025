use std::any::TypeId;
use std::sync::Arc;

use anyhow::{bail, Context};
use tracing::debug;

use super::service::{ArithmeticService, AuditLog, Greeter, ARITHMETIC, AUDIT_LOG, GREETER};
use crate::component::{
    construct, Args, Autowired, Bean, Cast, Component, ComponentClass, ComponentRegistration,
    FieldMeta, MethodMeta, ParamMeta, ParamType, Role,
};
use crate::component_casts;

/// Arithmetic over query parameters, mounted at `/app`.
#[derive(Debug, Default)]
pub struct CalcController {
    arithmetic: Autowired<ArithmeticService>,
}

impl CalcController {
    /// `/app/add?a=2&b=3` writes `2+3=5`.
    fn add(&self, args: &mut Args<'_>) -> anyhow::Result<Option<String>> {
        if let Some(req) = args.request(0) {
            debug!(request_id = %req.id(), params = ?req.parameter_map(), "add");
        }
        let a = args.int32(2).context("parameter `a` is missing")?;
        let b = args.int32(3).context("parameter `b` is missing")?;
        let sum = self.arithmetic.require("arithmetic")?.add(a, b)?;

        let resp = args.response(1).context("response is not bound")?;
        resp.write(&format!("{a}+{b}={sum}"));
        Ok(None)
    }

    /// `/app/sub?a=5&b=1.5` writes `5.0-1.5=3.5`.
    fn sub(&self, args: &mut Args<'_>) -> anyhow::Result<Option<String>> {
        let a = args.double(2).context("parameter `a` is missing")?;
        let b = args.double(3).context("parameter `b` is missing")?;
        let diff = self.arithmetic.require("arithmetic")?.sub(a, b);

        let resp = args.response(1).context("response is not bound")?;
        resp.write(&format!("{a:?}-{b:?}={diff:?}"));
        Ok(None)
    }

    /// `/app/mul?a=4&b=5` returns `20` as the body.
    fn mul(&self, args: &mut Args<'_>) -> anyhow::Result<Option<String>> {
        let a = args.int32(0).context("parameter `a` is missing")?;
        let b = args.int32(1).context("parameter `b` is missing")?;
        let product = self.arithmetic.require("arithmetic")?.mul(a, b)?;
        Ok(Some(product.to_string()))
    }
}

impl Component for CalcController {
    fn autowire(&self, field: &str, bean: &Bean) -> bool {
        match field {
            "arithmetic" => self.arithmetic.fill(bean),
            _ => false,
        }
    }

    fn cast(self: Arc<Self>, target: TypeId) -> Option<Cast> {
        component_casts!(self, target; Self)
    }

    fn invoke(&self, method: &str, args: &mut Args<'_>) -> anyhow::Result<Option<String>> {
        match method {
            "add" => self.add(args),
            "sub" => self.sub(args),
            "mul" => self.mul(args),
            other => bail!("CalcController has no method `{other}`"),
        }
    }
}

static CALC_FIELDS: &[FieldMeta] = &[FieldMeta::qualified("arithmetic", ARITHMETIC, "arithmetic")];

static CALC_METHODS: &[MethodMeta] = &[
    MethodMeta::mapped(
        "add",
        "/add",
        &[
            ParamMeta::request(),
            ParamMeta::response(),
            ParamMeta::param("a", ParamType::Int32),
            ParamMeta::param("b", ParamType::Int32),
        ],
    ),
    MethodMeta::mapped(
        "sub",
        "/sub",
        &[
            ParamMeta::request(),
            ParamMeta::response(),
            ParamMeta::param("a", ParamType::Double),
            ParamMeta::param("b", ParamType::Double),
        ],
    ),
    MethodMeta::mapped(
        "mul",
        "mul",
        &[
            ParamMeta::param("a", ParamType::Int32),
            ParamMeta::param("b", ParamType::Int32),
        ],
    ),
];

pub static CALC_CONTROLLER: ComponentClass = ComponentClass {
    name: concat!(module_path!(), "::CalcController"),
    role: Role::Controller,
    bean_name: None,
    base_path: "/app",
    interfaces: &[],
    fields: CALC_FIELDS,
    methods: CALC_METHODS,
    factory: Some(construct::<CalcController>),
};

inventory::submit! { ComponentRegistration::new(&CALC_CONTROLLER) }

/// Greets by name through whichever service provides the greeter interface.
#[derive(Debug, Default)]
pub struct QueryController {
    greeter: Autowired<dyn Greeter>,
}

impl QueryController {
    fn query(&self, args: &mut Args<'_>) -> anyhow::Result<Option<String>> {
        let name = args.text(2).unwrap_or_default().to_string();
        let greeting = self.greeter.require("greeter")?.greet(&name);

        let resp = args.response(1).context("response is not bound")?;
        resp.write(&greeting);
        Ok(None)
    }

    /// Tags arrive unconverted, so a repeated `tag` shows up joined.
    fn tags(&self, args: &mut Args<'_>) -> anyhow::Result<Option<String>> {
        Ok(Some(format!("tags=[{}]", args.text(0).unwrap_or_default())))
    }
}

impl Component for QueryController {
    fn autowire(&self, field: &str, bean: &Bean) -> bool {
        match field {
            "greeter" => self.greeter.fill(bean),
            _ => false,
        }
    }

    fn cast(self: Arc<Self>, target: TypeId) -> Option<Cast> {
        component_casts!(self, target; Self)
    }

    fn invoke(&self, method: &str, args: &mut Args<'_>) -> anyhow::Result<Option<String>> {
        match method {
            "query" => self.query(args),
            "tags" => self.tags(args),
            other => bail!("QueryController has no method `{other}`"),
        }
    }
}

static QUERY_FIELDS: &[FieldMeta] = &[FieldMeta::autowired("greeter", GREETER)];

static QUERY_METHODS: &[MethodMeta] = &[
    MethodMeta::mapped(
        "query",
        "/query",
        &[
            ParamMeta::request(),
            ParamMeta::response(),
            ParamMeta::param("name", ParamType::Text),
        ],
    ),
    MethodMeta::mapped(
        "tags",
        "/tags",
        &[ParamMeta::param("tag", ParamType::Other("Vec<String>"))],
    ),
    MethodMeta::unmapped("describe", &[]),
];

pub static QUERY_CONTROLLER: ComponentClass = ComponentClass {
    name: concat!(module_path!(), "::QueryController"),
    role: Role::Controller,
    bean_name: None,
    base_path: "/greet",
    interfaces: &[],
    fields: QUERY_FIELDS,
    methods: QUERY_METHODS,
    factory: Some(construct::<QueryController>),
};

inventory::submit! { ComponentRegistration::new(&QUERY_CONTROLLER) }

/// Depends on an audit service that is never registered.
#[derive(Debug, Default)]
pub struct ReportController {
    audit: Autowired<dyn AuditLog>,
}

impl ReportController {
    fn latest(&self) -> anyhow::Result<Option<String>> {
        Ok(Some(self.audit.require("audit")?.latest()))
    }
}

impl Component for ReportController {
    fn autowire(&self, field: &str, bean: &Bean) -> bool {
        match field {
            "audit" => self.audit.fill(bean),
            _ => false,
        }
    }

    fn cast(self: Arc<Self>, target: TypeId) -> Option<Cast> {
        component_casts!(self, target; Self)
    }

    fn invoke(&self, method: &str, _args: &mut Args<'_>) -> anyhow::Result<Option<String>> {
        match method {
            "latest" => self.latest(),
            "ping" => Ok(Some("pong".to_string())),
            other => bail!("ReportController has no method `{other}`"),
        }
    }
}

static REPORT_FIELDS: &[FieldMeta] = &[FieldMeta::qualified("audit", AUDIT_LOG, "auditService")];

static REPORT_METHODS: &[MethodMeta] = &[
    MethodMeta::mapped("latest", "/latest", &[]),
    MethodMeta::mapped("ping", "/ping", &[]),
];

pub static REPORT_CONTROLLER: ComponentClass = ComponentClass {
    name: concat!(module_path!(), "::ReportController"),
    role: Role::Controller,
    bean_name: Some("reports"),
    base_path: "reports",
    interfaces: &[],
    fields: REPORT_FIELDS,
    methods: REPORT_METHODS,
    factory: Some(construct::<ReportController>),
};

inventory::submit! { ComponentRegistration::new(&REPORT_CONTROLLER) }

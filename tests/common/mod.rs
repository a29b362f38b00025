#![allow(dead_code)]

//! Shared fixtures for integration tests.
//!
//! Fixture components live under the `fixture` package and are only visible through
//! a [`StaticClassPath`], so each test picks exactly the classes it needs.

use std::any::TypeId;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use anyhow::{anyhow, bail, Context};
use brrtmvc::component::{
    construct, Args, Autowired, Bean, Cast, Component, ComponentClass, FieldMeta, MethodMeta,
    ParamMeta, ParamType, Role,
};
use brrtmvc::component_casts;
use brrtmvc::dispatcher::DispatchOutcome;
use brrtmvc::scan::StaticClassPath;
use brrtmvc::server::{Request, Response};
use brrtmvc::{demo, AppConfig, CompatMode, DispatchContext, StartupError};

pub const ROOT: &str = "fixture";
pub const INVENTORY: &str = "fixture::shop::Inventory";

/// Build a context over the given fixture classes, in the given order.
pub fn fixture_context(
    classes: &[&'static ComponentClass],
    config: AppConfig,
) -> Result<DispatchContext, StartupError> {
    let class_path = StaticClassPath::new(classes.iter().copied());
    DispatchContext::initialize(config, &class_path)
}

/// The usual healthy fixture set.
pub fn shop_context(mode: CompatMode) -> DispatchContext {
    fixture_context(
        &[&STOCK_SERVICE, &CLOCK, &ORDER_CONTROLLER, &CATCH_ALL_CONTROLLER],
        AppConfig::new(ROOT).with_compat_mode(mode),
    )
    .unwrap()
}

pub fn demo_context(mode: CompatMode) -> DispatchContext {
    let class_path = StaticClassPath::new(demo::classes());
    DispatchContext::initialize(
        AppConfig::new(demo::DEMO_PACKAGE).with_compat_mode(mode),
        &class_path,
    )
    .unwrap()
}

pub fn call(ctx: &DispatchContext, uri: &str) -> (Response, DispatchOutcome) {
    ctx.serve(&Request::from_uri(uri))
}

pub trait Inventory: Send + Sync {
    fn stock(&self, sku: &str) -> usize;
}

#[derive(Debug, Default)]
pub struct StockService {
    pub lookups: AtomicUsize,
}

impl Inventory for StockService {
    fn stock(&self, sku: &str) -> usize {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        sku.len()
    }
}

impl Component for StockService {
    fn cast(self: Arc<Self>, target: TypeId) -> Option<Cast> {
        component_casts!(self, target; Self, dyn Inventory)
    }
}

pub static STOCK_SERVICE: ComponentClass = ComponentClass {
    name: "fixture::shop::StockService",
    role: Role::Service,
    bean_name: None,
    base_path: "",
    interfaces: &[INVENTORY],
    fields: &[],
    methods: &[],
    factory: Some(construct::<StockService>),
};

/// Second provider of the same interface.
pub static BACKUP_STOCK_SERVICE: ComponentClass = ComponentClass {
    name: "fixture::shop::backup::BackupStockService",
    role: Role::Service,
    bean_name: None,
    base_path: "",
    interfaces: &[INVENTORY],
    fields: &[],
    methods: &[],
    factory: Some(construct::<StockService>),
};

#[derive(Debug, Default)]
pub struct Clock;

impl Component for Clock {
    fn cast(self: Arc<Self>, target: TypeId) -> Option<Cast> {
        component_casts!(self, target; Self)
    }
}

pub static CLOCK: ComponentClass = ComponentClass {
    name: "fixture::shop::Clock",
    role: Role::Service,
    bean_name: Some("clock"),
    base_path: "",
    interfaces: &[],
    fields: &[],
    methods: &[],
    factory: Some(construct::<Clock>),
};

/// Claims the `clock` bean name a second time.
pub static REPLACEMENT_CLOCK: ComponentClass = ComponentClass {
    name: "fixture::shop::ReplacementClock",
    role: Role::Service,
    bean_name: Some("clock"),
    base_path: "",
    interfaces: &[],
    fields: &[],
    methods: &[],
    factory: Some(construct::<Clock>),
};

/// Discovered but not managed. Constructing it would fail.
pub static HELPER: ComponentClass = ComponentClass {
    name: "fixture::shop::Helper",
    role: Role::Unmarked,
    bean_name: None,
    base_path: "",
    interfaces: &[],
    fields: &[],
    methods: &[],
    factory: None,
};

#[derive(Debug, Default)]
pub struct OrderController {
    stock: Autowired<dyn Inventory>,
    ghost: Autowired<dyn Inventory>,
}

impl Component for OrderController {
    fn autowire(&self, field: &str, bean: &Bean) -> bool {
        match field {
            "stock" => self.stock.fill(bean),
            "ghost" => self.ghost.fill(bean),
            _ => false,
        }
    }

    fn cast(self: Arc<Self>, target: TypeId) -> Option<Cast> {
        component_casts!(self, target; Self)
    }

    fn invoke(&self, method: &str, args: &mut Args<'_>) -> anyhow::Result<Option<String>> {
        match method {
            "stock" => {
                let sku = args.text(0).context("sku missing")?;
                let count = self.stock.require("stock")?.stock(sku);
                Ok(Some(format!("{sku}={count}")))
            }
            "total" => {
                let a = args.int32(0).context("a missing")?;
                let b = args.double(1).context("b missing")?;
                Ok(Some(format!("{a}|{b:?}|{}", args.is_unset(2))))
            }
            "boom" => panic!("kaboom"),
            "partial" => {
                let resp = args.response(0).context("response missing")?;
                resp.write("partial;");
                bail!("gave up halfway")
            }
            "ghost" => {
                let count = self.ghost.require("ghost")?.stock("x");
                Ok(Some(count.to_string()))
            }
            "echo" => {
                let req = args.request(0).context("request missing")?;
                let msg = args.text(1).unwrap_or_default();
                Ok(Some(format!("{}:{msg}", req.path())))
            }
            "silent" => Ok(None),
            other => Err(anyhow!("no method {other}")),
        }
    }
}

static ORDER_FIELDS: &[FieldMeta] = &[
    FieldMeta::autowired("stock", INVENTORY),
    FieldMeta::qualified("ghost", INVENTORY, " ghost "),
];

static ORDER_METHODS: &[MethodMeta] = &[
    MethodMeta::mapped("stock", "/stock", &[ParamMeta::param("sku", ParamType::Text)]),
    MethodMeta::mapped(
        "total",
        "/total",
        &[
            ParamMeta::param("a", ParamType::Int32),
            ParamMeta::param("b", ParamType::Double),
            ParamMeta::plain(ParamType::Text),
        ],
    ),
    MethodMeta::mapped("boom", "/boom", &[]),
    MethodMeta::mapped("partial", "/partial", &[ParamMeta::response()]),
    MethodMeta::mapped("ghost", "/ghost", &[]),
    MethodMeta::mapped(
        "echo",
        "//echo",
        &[
            ParamMeta::request(),
            ParamMeta::param("msg", ParamType::Other("Cow<str>")),
        ],
    ),
    MethodMeta::mapped("silent", "/silent", &[]),
    MethodMeta::unmapped("helper", &[]),
];

pub static ORDER_CONTROLLER: ComponentClass = ComponentClass {
    name: "fixture::shop::OrderController",
    role: Role::Controller,
    bean_name: None,
    base_path: "orders/",
    interfaces: &[],
    fields: ORDER_FIELDS,
    methods: ORDER_METHODS,
    factory: Some(construct::<OrderController>),
};

#[derive(Debug, Default)]
pub struct CatchAllController;

impl Component for CatchAllController {
    fn invoke(&self, _method: &str, _args: &mut Args<'_>) -> anyhow::Result<Option<String>> {
        Ok(Some("catch-all".to_string()))
    }
}

pub static CATCH_ALL_CONTROLLER: ComponentClass = ComponentClass {
    name: "fixture::shop::CatchAllController",
    role: Role::Controller,
    bean_name: None,
    base_path: "/orders",
    interfaces: &[],
    fields: &[],
    methods: &[MethodMeta::mapped("any", ".*", &[])],
    factory: Some(construct::<CatchAllController>),
};

/// Wants an inventory but is pointed at the clock.
#[derive(Debug, Default)]
pub struct MiswiredController {
    stock: Autowired<dyn Inventory>,
}

impl Component for MiswiredController {
    fn autowire(&self, field: &str, bean: &Bean) -> bool {
        match field {
            "stock" => self.stock.fill(bean),
            _ => false,
        }
    }
}

pub static MISWIRED_CONTROLLER: ComponentClass = ComponentClass {
    name: "fixture::broken::MiswiredController",
    role: Role::Controller,
    bean_name: None,
    base_path: "",
    interfaces: &[],
    fields: &[FieldMeta::qualified("stock", INVENTORY, "clock")],
    methods: &[],
    factory: Some(construct::<MiswiredController>),
};

pub static BROKEN_PATTERN_CONTROLLER: ComponentClass = ComponentClass {
    name: "fixture::broken::BrokenPatternController",
    role: Role::Controller,
    bean_name: None,
    base_path: "/broken",
    interfaces: &[],
    fields: &[],
    methods: &[MethodMeta::mapped("open", "/open(", &[])],
    factory: Some(construct::<CatchAllController>),
};

static DUPLICATE_METHODS: &[MethodMeta] = &[
    MethodMeta::mapped("get", "/one", &[ParamMeta::param("id", ParamType::Int32)]),
    MethodMeta::mapped("get", "/two", &[ParamMeta::param("id", ParamType::Int32)]),
];

pub static DUPLICATE_CONTROLLER: ComponentClass = ComponentClass {
    name: "fixture::broken::DuplicateController",
    role: Role::Controller,
    bean_name: None,
    base_path: "/dup",
    interfaces: &[],
    fields: &[],
    methods: DUPLICATE_METHODS,
    factory: Some(construct::<CatchAllController>),
};

pub static NO_CTOR_SERVICE: ComponentClass = ComponentClass {
    name: "fixture::broken::NoCtorService",
    role: Role::Service,
    bean_name: None,
    base_path: "",
    interfaces: &[],
    fields: &[],
    methods: &[],
    factory: None,
};

fn failing_factory() -> anyhow::Result<Arc<dyn Component>> {
    Err(anyhow!("database is down"))
}

pub static FAILING_CTOR_SERVICE: ComponentClass = ComponentClass {
    name: "fixture::broken::FailingCtorService",
    role: Role::Service,
    bean_name: None,
    base_path: "",
    interfaces: &[],
    fields: &[],
    methods: &[],
    factory: Some(failing_factory),
};

fn panicking_factory() -> anyhow::Result<Arc<dyn Component>> {
    panic!("constructor exploded")
}

pub static PANICKING_CTOR_SERVICE: ComponentClass = ComponentClass {
    name: "fixture::broken::PanickingCtorService",
    role: Role::Service,
    bean_name: None,
    base_path: "",
    interfaces: &[],
    fields: &[],
    methods: &[],
    factory: Some(panicking_factory),
};

/// A service carrying a mapped method. Services are never routed.
pub static ROUTED_SERVICE: ComponentClass = ComponentClass {
    name: "fixture::shop::RoutedService",
    role: Role::Service,
    bean_name: None,
    base_path: "/svc",
    interfaces: &[],
    fields: &[],
    methods: &[MethodMeta::mapped("hidden", "/hidden", &[])],
    factory: Some(construct::<Clock>),
};

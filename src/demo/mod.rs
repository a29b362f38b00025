//! Sample components registered through `inventory`.
//!
//! Scanning [`DEMO_PACKAGE`] yields:
//!
//! | Bean | Role | Notes |
//! |---|---|---|
//! | `greetingService` | service | aliased as [`service::GREETER`] |
//! | `arithmetic` | service | explicit bean name |
//! | `calcController` | controller | `/app/add`, `/app/sub`, `/app/mul` |
//! | `queryController` | controller | `/greet/query`, `/greet/tags`; greeter wired by interface |
//! | `reports` | controller | `/reports/latest`, `/reports/ping`; audit dependency never resolves |
//!
//! `Formatter` sits in the same package without a role and is skipped.

use crate::component::ComponentClass;

pub mod controller;
pub mod service;

/// Root package of the sample components.
pub const DEMO_PACKAGE: &str = module_path!();

/// Keep the sample statics, and their `inventory` submissions, in the final binary.
pub fn ensure_linked() {
    std::hint::black_box(classes());
}

/// Every sample class, in declaration order.
#[must_use]
pub fn classes() -> Vec<&'static ComponentClass> {
    vec![
        &service::GREETING_SERVICE,
        &service::ARITHMETIC_SERVICE,
        &service::FORMATTER,
        &controller::CALC_CONTROLLER,
        &controller::QUERY_CONTROLLER,
        &controller::REPORT_CONTROLLER,
    ]
}

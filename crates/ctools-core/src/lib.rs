//! Fleet maintenance workflows between `ctools-api` and the `ctools` CLI.
//!
//! - **[`Session`]**: authenticated administrative session against the
//!   portal. [`Session::login`] opens it, [`Session::logout`] consumes it.
//!
//! - **Fleet enumeration** ([`fleet`]): tenants, tenant-scoped filer
//!   listings and single-device resolution. The tenant is always an explicit
//!   argument; the session holds no "current tenant".
//!
//! - **Filer inspection** ([`inspector`], [`resolver`]): builds one
//!   [`StatusRow`] per filer. Columns with several possible configuration
//!   locations are read through an ordered candidate list and degrade to
//!   [`SENTINEL`] instead of failing the row.
//!
//! - **[`ReportWriter`]**: BOM-prefixed CSV status report, flushed row by row.
//!
//! - **[`dispatch`]**: runs exactly one [`Task`] and always logs the
//!   session out afterwards.

pub mod config;
pub mod error;
pub mod fleet;
pub mod inspector;
pub mod model;
pub mod report;
pub mod resolver;
pub mod session;
pub mod task;

// ── Primary re-exports ──────────────────────────────────────────────
pub use config::{SessionConfig, TlsVerification, portal_url};
pub use error::CoreError;
pub use fleet::TenantScope;
pub use inspector::snapshot;
pub use model::{
    DeviceRef, Filer, SENTINEL, STATUS_COLUMNS, STATUS_HEADER, StatusRow, Tenant,
};
pub use report::{OutputMode, ReportError, ReportWriter};
pub use session::Session;
pub use task::{
    CommandReport, CommandTarget, SkippedFiler, StatusSummary, Task, TaskOutcome,
    TenantSelector, dispatch,
};

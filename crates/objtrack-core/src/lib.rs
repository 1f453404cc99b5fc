//! Object lifecycle tracking and validation engine for handle-based APIs.
//!
//! The engine shadows every object a client creates through an intercepted
//! API: each create registers a record, each use validates the handle, each
//! destroy retires the record. Ownership is hierarchical — destroying a
//! parent implicitly destroys its children — and scope teardown reports
//! everything the client forgot to destroy.
//!
//! # Architecture
//!
//! - [`handle`] / [`kind`] / [`record`]: the vocabulary — opaque handles,
//!   the closed kind enumeration, and the per-object record.
//! - [`registry`]: per-scope storage, partitioned by kind, with live counts.
//! - [`tracker`]: the lifecycle engine and the coarse lock guarding it;
//!   every operation runs inside a [`tracker::TrackerGuard`] critical
//!   section.
//! - [`cascade`]: implicit destruction for pool-, swapchain- and
//!   scope-owned children.
//! - [`leaks`]: the read-only leak report and the force-destroy pass run at
//!   scope teardown.
//! - [`report`]: violations and the pluggable diagnostic sink.
//! - [`config`] / [`metrics`]: environment-driven mode and atomic counters.
//!
//! The engine never panics on client misuse; misuse is reported through the
//! sink. Internal bookkeeping inconsistencies abort.

pub mod cascade;
pub mod config;
pub mod handle;
pub mod kind;
pub mod leaks;
pub mod metrics;
pub mod record;
pub mod registry;
pub mod report;
pub mod tracker;

pub use config::{TrackerMode, tracker_mode};
pub use handle::Handle;
pub use kind::ObjectKind;
pub use metrics::{MetricsSnapshot, TrackerMetrics};
pub use record::{ObjectRecord, ObjectStatus, QueueCaps};
pub use registry::ScopeRegistry;
pub use report::{
    CollectingSink, DiagnosticEvent, DiagnosticSink, MessageCode, NullSink, Severity, TracingSink,
    Violation,
};
pub use tracker::{ObjectTracker, Scope, TrackerGuard};

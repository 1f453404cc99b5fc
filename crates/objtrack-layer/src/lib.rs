//! Interception surface for the object tracker.
//!
//! Wires the tracking engine between a client and the real driver: each
//! intercepted entry point validates its handle arguments, forwards the
//! call, and records the call's effect on the object graph. A
//! representative set of entry points is implemented — every core
//! primitive and every cascade path — behind the [`dispatch`] traits that
//! abstract the next layer down.

pub mod codes;
pub mod dispatch;
pub mod layer;

pub use dispatch::{DeviceDriver, DispatchForwarder, InstanceDriver};
pub use layer::{CallSuppressed, ValidationLayer};

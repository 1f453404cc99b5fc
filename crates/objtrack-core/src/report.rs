//! Violations and the diagnostic sink collaborator contract.

use std::fmt;

use parking_lot::Mutex;

use crate::handle::Handle;
use crate::kind::ObjectKind;

/// Severity of a reported diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Create/destroy trace events.
    Info,
    Warning,
    /// Detected misuse; conventionally suppresses the forwarded call.
    Error,
}

/// Numeric diagnostic code carried alongside every report.
///
/// Well-known codes live here; per-entry-point codes are defined by the
/// interception surface that owns the call site.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MessageCode(pub u32);

impl MessageCode {
    /// Informational trace events (create/destroy).
    pub const NONE: MessageCode = MessageCode(0);
    /// A handle did not resolve to a live record of the expected kind.
    pub const UNKNOWN_OBJECT: MessageCode = MessageCode(1);
    /// Internal bookkeeping inconsistency.
    pub const INTERNAL_ERROR: MessageCode = MessageCode(2);
    /// An object was still live when its owning scope was torn down.
    pub const OBJECT_LEAK: MessageCode = MessageCode(3);
    /// No call-site-specific code was assigned.
    pub const UNDEFINED: MessageCode = MessageCode(u32::MAX);
}

impl fmt::Display for MessageCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:08x}", self.0)
    }
}

/// A detected misuse of a handle.
///
/// Violations are returned by value and reported through the sink; they are
/// never panicked across the API. Internal-consistency faults (duplicate
/// insert, count underflow) abort instead and are not represented here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum Violation {
    /// The handle does not resolve to a live record of the expected kind:
    /// never created, already destroyed, or the wrong kind entirely.
    #[error("Invalid {} Object {handle}.", kind.tag())]
    NotFound {
        kind: ObjectKind,
        handle: Handle,
        code: MessageCode,
    },
    /// The handle is live, but its recorded parent is not the parent the
    /// caller asserted (e.g. freeing through the wrong pool).
    #[error(
        "{} object {handle} belongs to parent {recorded_parent}, not {asserted_parent}.",
        kind.tag()
    )]
    WrongParent {
        kind: ObjectKind,
        handle: Handle,
        recorded_parent: Handle,
        asserted_parent: Handle,
        code: MessageCode,
    },
}

impl Violation {
    /// The kind of the offending handle.
    #[must_use]
    pub fn kind(&self) -> ObjectKind {
        match self {
            Violation::NotFound { kind, .. } | Violation::WrongParent { kind, .. } => *kind,
        }
    }

    /// The offending handle.
    #[must_use]
    pub fn handle(&self) -> Handle {
        match self {
            Violation::NotFound { handle, .. } | Violation::WrongParent { handle, .. } => *handle,
        }
    }

    /// The call-site diagnostic code.
    #[must_use]
    pub fn code(&self) -> MessageCode {
        match self {
            Violation::NotFound { code, .. } | Violation::WrongParent { code, .. } => *code,
        }
    }
}

/// The diagnostic sink collaborator.
///
/// The engine reports every violation and every informational create/destroy
/// trace event through this contract. The boolean result is the sink's
/// "suppress the call" decision: error-severity violations conventionally
/// suppress, informational events never do.
pub trait DiagnosticSink: Send + Sync {
    fn report(
        &self,
        severity: Severity,
        kind: ObjectKind,
        handle: Handle,
        code: MessageCode,
        message: &str,
    ) -> bool;
}

/// Sink adapter that forwards diagnostics to `tracing` events.
///
/// Suppresses on error severity, per the conventional policy.
#[derive(Debug, Default)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn report(
        &self,
        severity: Severity,
        kind: ObjectKind,
        handle: Handle,
        code: MessageCode,
        message: &str,
    ) -> bool {
        let kind = kind.tag();
        let handle = handle.to_string();
        let code = code.to_string();
        match severity {
            Severity::Info => tracing::info!(kind, %handle, %code, "{message}"),
            Severity::Warning => tracing::warn!(kind, %handle, %code, "{message}"),
            Severity::Error => tracing::error!(kind, %handle, %code, "{message}"),
        }
        matches!(severity, Severity::Error)
    }
}

/// Sink that drops every diagnostic and never suppresses.
#[derive(Debug, Default)]
pub struct NullSink;

impl DiagnosticSink for NullSink {
    fn report(&self, _: Severity, _: ObjectKind, _: Handle, _: MessageCode, _: &str) -> bool {
        false
    }
}

/// One diagnostic captured by a [`CollectingSink`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiagnosticEvent {
    pub severity: Severity,
    pub kind: ObjectKind,
    pub handle: Handle,
    pub code: MessageCode,
    pub message: String,
}

/// Sink that records every diagnostic for later inspection.
///
/// Used by the harness and by tests to assert on exactly what the engine
/// reported. Suppresses on error severity.
#[derive(Debug, Default)]
pub struct CollectingSink {
    events: Mutex<Vec<DiagnosticEvent>>,
}

impl CollectingSink {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything reported so far.
    #[must_use]
    pub fn events(&self) -> Vec<DiagnosticEvent> {
        self.events.lock().clone()
    }

    /// Snapshot of error-severity diagnostics only.
    #[must_use]
    pub fn errors(&self) -> Vec<DiagnosticEvent> {
        self.events
            .lock()
            .iter()
            .filter(|e| e.severity == Severity::Error)
            .cloned()
            .collect()
    }

    /// Discard everything captured so far.
    pub fn clear(&self) {
        self.events.lock().clear();
    }
}

impl DiagnosticSink for CollectingSink {
    fn report(
        &self,
        severity: Severity,
        kind: ObjectKind,
        handle: Handle,
        code: MessageCode,
        message: &str,
    ) -> bool {
        self.events.lock().push(DiagnosticEvent {
            severity,
            kind,
            handle,
            code,
            message: message.to_owned(),
        });
        matches!(severity, Severity::Error)
    }
}

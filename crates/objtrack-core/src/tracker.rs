//! The object tracker: lifecycle engine and concurrency coordinator.
//!
//! An [`ObjectTracker`] is an explicitly owned instance — there is no
//! process-global registry. All registry state sits behind one
//! coarse-grained mutex; [`ObjectTracker::lock`] yields a [`TrackerGuard`]
//! representing a single critical section.
//!
//! # Locking protocol
//!
//! Intercepting wrappers follow a two-phase pattern:
//!
//! 1. lock, run every `validate` for the call's handle arguments, unlock
//!    (drop the guard);
//! 2. forward the call to the real implementation with no lock held —
//!    the forwarded call may block or take arbitrarily long;
//! 3. re-lock and run the `create`/`destroy` calls reflecting the call's
//!    effect.
//!
//! A wrapper may hold one guard across a forwarded call only when that call
//! is known to be non-blocking and the intervening state must not be
//! observed half-updated (e.g. queue retrieval followed immediately by
//! registration). Validate-only paths never forward while locked, so a
//! single guard for their whole duration is fine.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::{Mutex, MutexGuard};

use crate::config::{TrackerMode, tracker_mode};
use crate::handle::Handle;
use crate::kind::ObjectKind;
use crate::metrics::TrackerMetrics;
use crate::record::{ObjectRecord, ObjectStatus, QueueCaps};
use crate::registry::ScopeRegistry;
use crate::report::{DiagnosticSink, MessageCode, Severity, Violation};

/// Which scope's registry an operation targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    /// The top-level scope owned by an instance handle.
    Instance(Handle),
    /// A device scope nested under an instance.
    Device(Handle),
}

impl Scope {
    /// The handle of the scope object itself.
    #[must_use]
    pub fn handle(self) -> Handle {
        match self {
            Scope::Instance(h) | Scope::Device(h) => h,
        }
    }

    /// The kind of the scope object itself.
    #[must_use]
    pub fn kind(self) -> ObjectKind {
        match self {
            Scope::Instance(_) => ObjectKind::Instance,
            Scope::Device(_) => ObjectKind::Device,
        }
    }
}

pub(crate) struct InstanceScope {
    pub(crate) registry: ScopeRegistry,
    /// Queue-family capability flags captured from the instance-level
    /// property query, indexed by family.
    pub(crate) queue_caps: Vec<QueueCaps>,
}

impl InstanceScope {
    fn new() -> Self {
        Self {
            registry: ScopeRegistry::new(),
            queue_caps: Vec::new(),
        }
    }
}

pub(crate) struct DeviceScope {
    /// The instance this device scope is registered under.
    pub(crate) owner: Handle,
    pub(crate) registry: ScopeRegistry,
    /// Queue handle → queue family index, for capability checks.
    pub(crate) queue_families: HashMap<Handle, u32>,
    /// Images implicitly owned by a swapchain. Tracked outside the normal
    /// partitions: their destruction is always implicit, so they never
    /// participate in live counts or the explicit destroy path.
    pub(crate) swapchain_images: HashMap<Handle, ObjectRecord>,
}

impl DeviceScope {
    fn new(owner: Handle) -> Self {
        Self {
            owner,
            registry: ScopeRegistry::new(),
            queue_families: HashMap::new(),
            swapchain_images: HashMap::new(),
        }
    }
}

pub(crate) struct TrackerState {
    pub(crate) instances: HashMap<Handle, InstanceScope>,
    pub(crate) devices: HashMap<Handle, DeviceScope>,
}

/// Owns every scope registry and the lock that guards them.
pub struct ObjectTracker {
    state: Mutex<TrackerState>,
    sink: Arc<dyn DiagnosticSink>,
    /// Process-wide trace sequence for diagnostic correlation across scopes.
    sequence: AtomicU64,
    metrics: TrackerMetrics,
    mode: TrackerMode,
}

impl ObjectTracker {
    /// Create a tracker reporting into `sink`, with the mode taken from the
    /// environment (`OBJTRACK_MODE`).
    #[must_use]
    pub fn new(sink: Arc<dyn DiagnosticSink>) -> Self {
        Self::with_mode(sink, tracker_mode())
    }

    /// Create a tracker with an explicit mode.
    #[must_use]
    pub fn with_mode(sink: Arc<dyn DiagnosticSink>, mode: TrackerMode) -> Self {
        Self {
            state: Mutex::new(TrackerState {
                instances: HashMap::new(),
                devices: HashMap::new(),
            }),
            sink,
            sequence: AtomicU64::new(0),
            metrics: TrackerMetrics::new(),
            mode,
        }
    }

    /// Enter a critical section of the coordinator lock.
    #[must_use]
    pub fn lock(&self) -> TrackerGuard<'_> {
        TrackerGuard {
            state: self.state.lock(),
            sink: &*self.sink,
            sequence: &self.sequence,
            metrics: &self.metrics,
            mode: self.mode,
        }
    }

    /// The tracker's operation counters.
    #[must_use]
    pub fn metrics(&self) -> &TrackerMetrics {
        &self.metrics
    }

    /// The diagnostic sink this tracker reports into.
    #[must_use]
    pub fn sink(&self) -> &Arc<dyn DiagnosticSink> {
        &self.sink
    }
}

/// One critical section over the tracker's registries.
///
/// Every registry read or write happens through a guard. Drop the guard
/// before forwarding a call that may block (see the module docs for the
/// two-phase protocol).
pub struct TrackerGuard<'a> {
    pub(crate) state: MutexGuard<'a, TrackerState>,
    pub(crate) sink: &'a dyn DiagnosticSink,
    pub(crate) sequence: &'a AtomicU64,
    pub(crate) metrics: &'a TrackerMetrics,
    pub(crate) mode: TrackerMode,
}

impl TrackerGuard<'_> {
    pub(crate) fn registry(&self, scope: Scope) -> Option<&ScopeRegistry> {
        match scope {
            Scope::Instance(h) => self.state.instances.get(&h).map(|s| &s.registry),
            Scope::Device(h) => self.state.devices.get(&h).map(|s| &s.registry),
        }
    }

    pub(crate) fn registry_mut(&mut self, scope: Scope) -> Option<&mut ScopeRegistry> {
        match scope {
            Scope::Instance(h) => self.state.instances.get_mut(&h).map(|s| &mut s.registry),
            Scope::Device(h) => self.state.devices.get_mut(&h).map(|s| &mut s.registry),
        }
    }

    /// Report a violation through the sink; returns the suppress decision.
    pub(crate) fn report_violation(&mut self, violation: &Violation) -> bool {
        TrackerMetrics::inc(&self.metrics.violations);
        self.sink.report(
            Severity::Error,
            violation.kind(),
            violation.handle(),
            violation.code(),
            &violation.to_string(),
        )
    }

    /// Report that an operation named a scope the tracker does not know.
    fn report_missing_scope(&mut self, scope: Scope, code: MessageCode) -> bool {
        let violation = Violation::NotFound {
            kind: scope.kind(),
            handle: scope.handle(),
            code,
        };
        self.report_violation(&violation)
    }

    // ── Scope lifecycle ──────────────────────────────────────

    /// Register a new top-level scope and its Instance record.
    pub fn create_instance(&mut self, instance: Handle) {
        if !self.mode.tracking_enabled() {
            return;
        }
        let prior = self.state.instances.insert(instance, InstanceScope::new());
        assert!(prior.is_none(), "duplicate instance scope for {instance}");
        self.create(
            Scope::Instance(instance),
            instance,
            ObjectKind::Instance,
            Handle::NULL,
            ObjectStatus::empty(),
        );
    }

    /// Register a new device scope under `instance` and record the Device
    /// object in the instance's registry with the instance as parent.
    pub fn create_device(&mut self, instance: Handle, device: Handle) {
        if !self.mode.tracking_enabled() {
            return;
        }
        if !self.state.instances.contains_key(&instance) {
            self.report_missing_scope(Scope::Instance(instance), MessageCode::INTERNAL_ERROR);
            return;
        }
        let prior = self.state.devices.insert(device, DeviceScope::new(instance));
        assert!(prior.is_none(), "duplicate device scope for {device}");
        self.create(
            Scope::Instance(instance),
            device,
            ObjectKind::Device,
            instance,
            ObjectStatus::empty(),
        );
    }

    // ── Lifecycle engine ─────────────────────────────────────

    /// Insert a new record for `handle` and emit the create trace event.
    ///
    /// Never fails: a duplicate handle is a fatal internal-consistency
    /// violation, not a reportable condition.
    pub fn create(
        &mut self,
        scope: Scope,
        handle: Handle,
        kind: ObjectKind,
        parent: Handle,
        status: ObjectStatus,
    ) {
        if !self.mode.tracking_enabled() {
            return;
        }
        if self.registry(scope).is_none() {
            self.report_missing_scope(scope, MessageCode::INTERNAL_ERROR);
            return;
        }

        let seq = self.sequence.fetch_add(1, Ordering::Relaxed);
        self.sink.report(
            Severity::Info,
            kind,
            handle,
            MessageCode::NONE,
            &format!("OBJ[0x{seq:x}] : CREATE {} object {handle}", kind.tag()),
        );

        let record = ObjectRecord {
            handle,
            kind,
            parent,
            status,
        };
        if let Some(registry) = self.registry_mut(scope) {
            registry.insert(record);
        }
        TrackerMetrics::inc(&self.metrics.creates);
    }

    /// Check that `handle` designates a live object of `kind`.
    ///
    /// Returns the suppress decision: `false` when the handle is valid (or
    /// null and `allow_null`), otherwise the sink's answer for the reported
    /// not-found violation. Never mutates state.
    pub fn validate(
        &mut self,
        scope: Scope,
        handle: Handle,
        kind: ObjectKind,
        allow_null: bool,
        not_found: MessageCode,
    ) -> bool {
        if !self.mode.tracking_enabled() {
            return false;
        }
        TrackerMetrics::inc(&self.metrics.validations);

        if handle.is_null() && allow_null {
            return false;
        }

        let live = match self.registry(scope) {
            Some(registry) => registry.contains(kind, handle),
            None => return self.report_missing_scope(scope, not_found),
        };
        if live {
            return false;
        }

        let violation = Violation::NotFound {
            kind,
            handle,
            code: not_found,
        };
        self.report_violation(&violation)
    }

    /// Check that the scope object itself is still live.
    ///
    /// Interception surfaces use this for entry points whose only handle
    /// argument is the scope (e.g. resource creation against a device).
    pub fn validate_scope(&mut self, scope: Scope, not_found: MessageCode) -> bool {
        if !self.mode.tracking_enabled() {
            return false;
        }
        TrackerMetrics::inc(&self.metrics.validations);
        let present = match scope {
            Scope::Instance(h) => self.state.instances.contains_key(&h),
            Scope::Device(h) => self.state.devices.contains_key(&h),
        };
        if present {
            return false;
        }
        self.report_missing_scope(scope, not_found)
    }

    /// As [`validate`](Self::validate), additionally checking that the
    /// record's parent is the parent the caller asserts.
    ///
    /// A mismatch is reported but the returned suppress decision is the
    /// sink's; whether it gates the operation is the call site's policy.
    pub fn validate_parent(
        &mut self,
        scope: Scope,
        handle: Handle,
        kind: ObjectKind,
        asserted_parent: Handle,
        not_found: MessageCode,
        wrong_parent: MessageCode,
    ) -> bool {
        if !self.mode.tracking_enabled() {
            return false;
        }
        TrackerMetrics::inc(&self.metrics.validations);

        let recorded_parent = match self.registry(scope) {
            Some(registry) => registry.get(kind, handle).map(|r| r.parent),
            None => return self.report_missing_scope(scope, not_found),
        };
        let violation = match recorded_parent {
            None => Violation::NotFound {
                kind,
                handle,
                code: not_found,
            },
            Some(recorded) if recorded != asserted_parent => Violation::WrongParent {
                kind,
                handle,
                recorded_parent: recorded,
                asserted_parent,
                code: wrong_parent,
            },
            Some(_) => return false,
        };
        self.report_violation(&violation)
    }

    /// Remove the record for `handle`, emitting the destroy trace event.
    ///
    /// If the handle does not designate a live object of `kind`, the given
    /// violation code is reported and nothing is removed.
    pub fn destroy(
        &mut self,
        scope: Scope,
        handle: Handle,
        kind: ObjectKind,
        not_found: MessageCode,
    ) -> bool {
        if !self.mode.tracking_enabled() {
            return false;
        }

        let removed = match self.registry_mut(scope) {
            Some(registry) => registry.remove(kind, handle),
            None => return self.report_missing_scope(scope, not_found),
        };
        if removed.is_none() {
            let violation = Violation::NotFound {
                kind,
                handle,
                code: not_found,
            };
            return self.report_violation(&violation);
        }

        TrackerMetrics::inc(&self.metrics.destroys);
        if let Some(registry) = self.registry(scope) {
            let total = registry.total_live();
            let remaining = registry.live_count(kind);
            self.sink.report(
                Severity::Info,
                kind,
                handle,
                MessageCode::NONE,
                &format!(
                    "OBJ_STAT Destroy {} object {handle} ({total} total objs remain & {remaining} {} objs).",
                    kind.tag(),
                    kind.tag(),
                ),
            );
        }
        false
    }

    /// Remove a record without validation or reporting.
    ///
    /// Only cascade and leak-teardown passes call this; they have already
    /// established the record's existence by iteration, so absence here is
    /// a fatal internal-consistency violation.
    pub fn destroy_silently(&mut self, scope: Scope, handle: Handle, kind: ObjectKind) {
        if !self.mode.tracking_enabled() {
            return;
        }
        let removed = self
            .registry_mut(scope)
            .and_then(|registry| registry.remove(kind, handle));
        assert!(
            removed.is_some(),
            "silent destroy of untracked {} {handle}",
            kind.tag()
        );
        TrackerMetrics::inc(&self.metrics.cascade_destroys);
    }

    // ── Queue metadata ───────────────────────────────────────

    /// Record a queue retrieved from the device, remembering its family.
    ///
    /// Idempotent: the same queue may be retrieved any number of times.
    pub fn create_queue(&mut self, device: Handle, queue: Handle, family_index: u32) {
        if !self.mode.tracking_enabled() {
            return;
        }
        let scope = Scope::Device(device);
        let known = match self.registry(scope) {
            Some(registry) => registry.contains(ObjectKind::Queue, queue),
            None => {
                self.report_missing_scope(scope, MessageCode::INTERNAL_ERROR);
                return;
            }
        };
        if !known {
            self.create(
                scope,
                queue,
                ObjectKind::Queue,
                device,
                ObjectStatus::empty(),
            );
        }
        if let Some(device_scope) = self.state.devices.get_mut(&device) {
            device_scope.queue_families.entry(queue).or_insert(family_index);
        }
    }

    /// Store the queue-family capability flags captured at instance scope.
    pub fn set_queue_family_caps(&mut self, instance: Handle, caps: Vec<QueueCaps>) {
        if !self.mode.tracking_enabled() {
            return;
        }
        if let Some(scope) = self.state.instances.get_mut(&instance) {
            scope.queue_caps = caps;
        }
    }

    /// Check that `queue` belongs to a family carrying `required` flags.
    ///
    /// Unknown queues and families with uncaptured properties are not
    /// violations; only a known family lacking the capability reports.
    pub fn validate_queue_caps(
        &mut self,
        device: Handle,
        queue: Handle,
        required: QueueCaps,
        code: MessageCode,
    ) -> bool {
        if !self.mode.tracking_enabled() {
            return false;
        }
        let caps = self.state.devices.get(&device).and_then(|dev| {
            let family = *dev.queue_families.get(&queue)?;
            let instance = self.state.instances.get(&dev.owner)?;
            instance.queue_caps.get(family as usize).copied()
        });
        match caps {
            Some(caps) if !caps.contains(required) => {
                TrackerMetrics::inc(&self.metrics.violations);
                self.sink.report(
                    Severity::Error,
                    ObjectKind::Queue,
                    queue,
                    code,
                    &format!(
                        "Attempting an operation on queue {queue} whose family lacks {required:?}."
                    ),
                )
            }
            _ => false,
        }
    }

    // ── Swapchain images ─────────────────────────────────────

    /// Record an image implicitly owned by `swapchain`.
    ///
    /// Swapchain images bypass the normal partitions and live counts; their
    /// destruction is always implicit via the swapchain cascade.
    pub fn create_swapchain_image(&mut self, device: Handle, image: Handle, swapchain: Handle) {
        if !self.mode.tracking_enabled() {
            return;
        }
        let seq = self.sequence.fetch_add(1, Ordering::Relaxed);
        self.sink.report(
            Severity::Info,
            ObjectKind::Image,
            image,
            MessageCode::NONE,
            &format!("OBJ[0x{seq:x}] : CREATE SwapchainImage object {image}"),
        );
        if let Some(device_scope) = self.state.devices.get_mut(&device) {
            device_scope.swapchain_images.insert(
                image,
                ObjectRecord::child(image, ObjectKind::Image, swapchain),
            );
        }
    }

    /// Returns true if `image` is currently tracked as a swapchain image.
    #[must_use]
    pub fn has_swapchain_image(&self, device: Handle, image: Handle) -> bool {
        self.state
            .devices
            .get(&device)
            .is_some_and(|dev| dev.swapchain_images.contains_key(&image))
    }

    // ── Queries ──────────────────────────────────────────────

    /// Live count for one kind in one scope (0 for an unknown scope).
    #[must_use]
    pub fn live_count(&self, scope: Scope, kind: ObjectKind) -> u64 {
        self.registry(scope).map_or(0, |r| r.live_count(kind))
    }

    /// Total live count in one scope (0 for an unknown scope).
    #[must_use]
    pub fn total_live(&self, scope: Scope) -> u64 {
        self.registry(scope).map_or(0, ScopeRegistry::total_live)
    }

    /// Copy of the live record for `handle`, if any.
    #[must_use]
    pub fn record(&self, scope: Scope, kind: ObjectKind, handle: Handle) -> Option<ObjectRecord> {
        self.registry(scope).and_then(|r| r.get(kind, handle)).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::CollectingSink;

    fn tracker_with_sink() -> (ObjectTracker, Arc<CollectingSink>) {
        let sink = Arc::new(CollectingSink::new());
        let tracker = ObjectTracker::with_mode(sink.clone(), TrackerMode::Enabled);
        (tracker, sink)
    }

    #[test]
    fn create_then_destroy_then_validate_reports_not_found() {
        let (tracker, _sink) = tracker_with_sink();
        let mut guard = tracker.lock();
        guard.create_instance(Handle(1));
        guard.create_device(Handle(1), Handle(2));
        let dev = Scope::Device(Handle(2));

        guard.create(dev, Handle(10), ObjectKind::Buffer, Handle(2), ObjectStatus::empty());
        assert!(!guard.validate(dev, Handle(10), ObjectKind::Buffer, false, MessageCode::UNDEFINED));

        assert!(!guard.destroy(dev, Handle(10), ObjectKind::Buffer, MessageCode::UNDEFINED));
        assert!(guard.validate(dev, Handle(10), ObjectKind::Buffer, false, MessageCode::UNDEFINED));
    }

    #[test]
    fn double_destroy_reports_and_leaves_counts_alone() {
        let (tracker, sink) = tracker_with_sink();
        let mut guard = tracker.lock();
        guard.create_instance(Handle(1));
        guard.create_device(Handle(1), Handle(2));
        let dev = Scope::Device(Handle(2));

        guard.create(dev, Handle(10), ObjectKind::Fence, Handle(2), ObjectStatus::empty());
        assert!(!guard.destroy(dev, Handle(10), ObjectKind::Fence, MessageCode::UNKNOWN_OBJECT));
        let count_before = guard.live_count(dev, ObjectKind::Fence);

        sink.clear();
        assert!(guard.destroy(dev, Handle(10), ObjectKind::Fence, MessageCode::UNKNOWN_OBJECT));
        assert_eq!(guard.live_count(dev, ObjectKind::Fence), count_before);
        assert_eq!(sink.errors().len(), 1);
    }

    #[test]
    fn null_handle_is_legal_when_allowed() {
        let (tracker, sink) = tracker_with_sink();
        let mut guard = tracker.lock();
        guard.create_instance(Handle(1));
        let scope = Scope::Instance(Handle(1));

        assert!(!guard.validate(scope, Handle::NULL, ObjectKind::Fence, true, MessageCode::UNDEFINED));
        assert!(sink.errors().is_empty());

        assert!(guard.validate(scope, Handle::NULL, ObjectKind::Fence, false, MessageCode::UNDEFINED));
        assert_eq!(sink.errors().len(), 1);
    }

    #[test]
    fn wrong_kind_lookup_is_not_found() {
        let (tracker, _sink) = tracker_with_sink();
        let mut guard = tracker.lock();
        guard.create_instance(Handle(1));
        guard.create_device(Handle(1), Handle(2));
        let dev = Scope::Device(Handle(2));

        guard.create(dev, Handle(10), ObjectKind::Buffer, Handle(2), ObjectStatus::empty());
        assert!(guard.validate(dev, Handle(10), ObjectKind::Image, false, MessageCode::UNDEFINED));
    }

    #[test]
    fn validate_parent_reports_mismatch_with_both_parents() {
        let (tracker, sink) = tracker_with_sink();
        let mut guard = tracker.lock();
        guard.create_instance(Handle(1));
        guard.create_device(Handle(1), Handle(2));
        let dev = Scope::Device(Handle(2));

        guard.create(dev, Handle(30), ObjectKind::CommandPool, Handle(2), ObjectStatus::empty());
        guard.create(dev, Handle(40), ObjectKind::CommandBuffer, Handle(30), ObjectStatus::empty());

        assert!(!guard.validate_parent(
            dev,
            Handle(40),
            ObjectKind::CommandBuffer,
            Handle(30),
            MessageCode::UNDEFINED,
            MessageCode::UNDEFINED,
        ));

        sink.clear();
        let suppress = guard.validate_parent(
            dev,
            Handle(40),
            ObjectKind::CommandBuffer,
            Handle(99),
            MessageCode::UNDEFINED,
            MessageCode::UNDEFINED,
        );
        assert!(suppress);
        let errors = sink.errors();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].message.contains("0x1e")); // recorded parent
        assert!(errors[0].message.contains("0x63")); // asserted parent
    }

    #[test]
    fn create_trace_carries_monotonic_sequence() {
        let (tracker, sink) = tracker_with_sink();
        let mut guard = tracker.lock();
        guard.create_instance(Handle(1));
        let scope = Scope::Instance(Handle(1));
        guard.create(scope, Handle(5), ObjectKind::Fence, Handle(1), ObjectStatus::empty());
        guard.create(scope, Handle(6), ObjectKind::Fence, Handle(1), ObjectStatus::empty());

        let traces: Vec<String> = sink
            .events()
            .iter()
            .filter(|e| e.severity == Severity::Info)
            .map(|e| e.message.clone())
            .collect();
        assert!(traces[0].starts_with("OBJ[0x0]"));
        assert!(traces[1].starts_with("OBJ[0x1]"));
        assert!(traces[2].starts_with("OBJ[0x2]"));
    }

    #[test]
    fn queue_creation_is_idempotent() {
        let (tracker, _sink) = tracker_with_sink();
        let mut guard = tracker.lock();
        guard.create_instance(Handle(1));
        guard.create_device(Handle(1), Handle(2));
        let dev = Scope::Device(Handle(2));

        guard.create_queue(Handle(2), Handle(70), 0);
        guard.create_queue(Handle(2), Handle(70), 0);
        assert_eq!(guard.live_count(dev, ObjectKind::Queue), 1);
    }

    #[test]
    fn queue_caps_violation_reports_on_missing_capability() {
        let (tracker, sink) = tracker_with_sink();
        let mut guard = tracker.lock();
        guard.create_instance(Handle(1));
        guard.create_device(Handle(1), Handle(2));
        guard.set_queue_family_caps(Handle(1), vec![QueueCaps::GRAPHICS | QueueCaps::TRANSFER]);
        guard.create_queue(Handle(2), Handle(70), 0);

        assert!(!guard.validate_queue_caps(
            Handle(2),
            Handle(70),
            QueueCaps::GRAPHICS,
            MessageCode::UNDEFINED
        ));
        assert!(guard.validate_queue_caps(
            Handle(2),
            Handle(70),
            QueueCaps::SPARSE_BINDING,
            MessageCode::UNDEFINED
        ));
        assert_eq!(sink.errors().len(), 1);
    }

    #[test]
    fn off_mode_is_passthrough() {
        let sink = Arc::new(CollectingSink::new());
        let tracker = ObjectTracker::with_mode(sink.clone(), TrackerMode::Off);
        let mut guard = tracker.lock();
        guard.create_instance(Handle(1));
        let scope = Scope::Instance(Handle(1));
        guard.create(scope, Handle(5), ObjectKind::Fence, Handle(1), ObjectStatus::empty());

        assert!(!guard.validate(scope, Handle(99), ObjectKind::Fence, false, MessageCode::UNDEFINED));
        assert!(!guard.destroy(scope, Handle(99), ObjectKind::Fence, MessageCode::UNDEFINED));
        assert!(sink.events().is_empty());
        assert_eq!(tracker.metrics().snapshot().creates, 0);
    }
}

//! Leak reporting at scope teardown.
//!
//! Reporting and destruction are separate passes, in that order: the report
//! pass is strictly read-only, so every diagnostic reflects the registry as
//! it stood before teardown began.

use crate::handle::Handle;
use crate::kind::ObjectKind;
use crate::metrics::TrackerMetrics;
use crate::report::{MessageCode, Severity};
use crate::tracker::{Scope, TrackerGuard};

/// Kinds the client never destroys explicitly: retrieved, not created, so
/// their survival at teardown is normal, not a leak.
fn leak_exempt(kind: ObjectKind) -> bool {
    matches!(kind, ObjectKind::PhysicalDevice | ObjectKind::Queue)
}

impl TrackerGuard<'_> {
    /// Emit one error-severity diagnostic per object still live in `scope`.
    ///
    /// The scope's own record is not a leak; it is about to be destroyed by
    /// the teardown that triggered this pass. Retrieved-not-created kinds
    /// are exempt (they are still force-destroyed afterwards).
    pub fn report_leaks(&mut self, scope: Scope, code: MessageCode) {
        if !self.mode.tracking_enabled() {
            return;
        }
        let mut leaked: Vec<(ObjectKind, Handle)> = Vec::new();
        if let Some(registry) = self.registry(scope) {
            for kind in ObjectKind::ALL {
                if leak_exempt(kind) {
                    continue;
                }
                for record in registry.iter_kind(kind) {
                    if record.handle == scope.handle() && record.kind == scope.kind() {
                        continue;
                    }
                    leaked.push((kind, record.handle));
                }
            }
        }
        for (kind, handle) in leaked {
            TrackerMetrics::inc(&self.metrics.leaks);
            self.sink.report(
                Severity::Error,
                kind,
                handle,
                code,
                &format!(
                    "For {} {}, {} object {handle} has not been destroyed.",
                    scope.kind().tag(),
                    scope.handle(),
                    kind.tag(),
                ),
            );
        }
    }

    /// Force-destroy every remaining record in `scope`, the scope's own
    /// record included, and release device-scoped auxiliary maps.
    ///
    /// Teardown always completes: nothing here validates or reports.
    pub fn force_destroy_all(&mut self, scope: Scope) {
        if !self.mode.tracking_enabled() {
            return;
        }
        let mut victims: Vec<(ObjectKind, Handle)> = Vec::new();
        if let Some(registry) = self.registry(scope) {
            for kind in ObjectKind::ALL {
                for handle in registry.handles_of(kind) {
                    victims.push((kind, handle));
                }
            }
        }
        for (kind, handle) in victims {
            self.destroy_silently(scope, handle, kind);
        }
        if let Scope::Device(device) = scope
            && let Some(device_scope) = self.state.devices.get_mut(&device)
        {
            device_scope.queue_families.clear();
            device_scope.swapchain_images.clear();
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::config::TrackerMode;
    use crate::record::ObjectStatus;
    use crate::report::CollectingSink;
    use crate::tracker::ObjectTracker;

    fn scoped_tracker() -> (ObjectTracker, Arc<CollectingSink>) {
        let sink = Arc::new(CollectingSink::new());
        let tracker = ObjectTracker::with_mode(sink.clone(), TrackerMode::Enabled);
        {
            let mut guard = tracker.lock();
            guard.create_instance(Handle(1));
            guard.create_device(Handle(1), Handle(2));
        }
        (tracker, sink)
    }

    #[test]
    fn one_diagnostic_per_leaked_object() {
        let (tracker, sink) = scoped_tracker();
        let mut guard = tracker.lock();
        let dev = Scope::Device(Handle(2));

        for h in 10..13u64 {
            guard.create(dev, Handle(h), ObjectKind::Fence, Handle(2), ObjectStatus::empty());
        }
        guard.create(dev, Handle(20), ObjectKind::Buffer, Handle(2), ObjectStatus::empty());

        sink.clear();
        guard.report_leaks(dev, MessageCode::OBJECT_LEAK);

        let errors = sink.errors();
        assert_eq!(errors.len(), 4);
        assert_eq!(errors.iter().filter(|e| e.kind == ObjectKind::Fence).count(), 3);
        assert!(errors[0].message.contains("For Device 0x2"));
        assert!(errors[0].message.contains("has not been destroyed"));

        // Read-only: everything is still live afterwards.
        assert_eq!(guard.total_live(dev), 4);
        assert_eq!(tracker.metrics().snapshot().leaks, 4);
    }

    #[test]
    fn force_destroy_empties_every_partition_and_aux_map() {
        let (tracker, _sink) = scoped_tracker();
        let mut guard = tracker.lock();
        let dev = Scope::Device(Handle(2));

        guard.create(dev, Handle(10), ObjectKind::Buffer, Handle(2), ObjectStatus::empty());
        guard.create_queue(Handle(2), Handle(70), 0);
        guard.create(dev, Handle(60), ObjectKind::Swapchain, Handle(2), ObjectStatus::empty());
        guard.create_swapchain_image(Handle(2), Handle(61), Handle(60));

        guard.force_destroy_all(dev);
        assert_eq!(guard.total_live(dev), 0);
        assert!(!guard.has_swapchain_image(Handle(2), Handle(61)));
    }

    #[test]
    fn scope_record_itself_is_not_a_leak() {
        let (tracker, sink) = scoped_tracker();
        let mut guard = tracker.lock();

        sink.clear();
        guard.report_leaks(Scope::Instance(Handle(1)), MessageCode::OBJECT_LEAK);

        // The device record leaks; the instance's own record does not.
        let errors = sink.errors();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].kind, ObjectKind::Device);
    }
}

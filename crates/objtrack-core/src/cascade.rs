//! Implicit-destruction cascades.
//!
//! Four parent kinds destroy their children implicitly: descriptor pools
//! (on destroy or reset), command pools, swapchains, and the scope objects
//! themselves. Every cascade snapshots its victim set before removing
//! anything, so no pass ever mutates a partition it is iterating.

use crate::handle::Handle;
use crate::kind::ObjectKind;
use crate::report::MessageCode;
use crate::tracker::{Scope, TrackerGuard};

impl TrackerGuard<'_> {
    /// Silently remove every live child of `parent` with the given kind.
    ///
    /// A victim whose recorded parent disagrees with the cascade root is an
    /// internal-consistency fault and aborts.
    fn cascade_children(&mut self, scope: Scope, parent: Handle, child_kind: ObjectKind) {
        let victims = match self.registry(scope) {
            Some(registry) => registry.children_of(child_kind, parent),
            None => return,
        };
        for handle in victims {
            if let Some(registry) = self.registry(scope) {
                let recorded = registry.get(child_kind, handle).map(|r| r.parent);
                assert_eq!(
                    recorded,
                    Some(parent),
                    "cascade root {parent} does not own {} {handle}",
                    child_kind.tag()
                );
            }
            self.destroy_silently(scope, handle, child_kind);
        }
    }

    /// Reset a descriptor pool: implicitly destroy every descriptor set
    /// allocated from it. The pool itself stays live.
    pub fn reset_descriptor_pool(
        &mut self,
        device: Handle,
        pool: Handle,
        not_found: MessageCode,
    ) -> bool {
        if !self.mode.tracking_enabled() {
            return false;
        }
        let scope = Scope::Device(device);
        if self.validate(scope, pool, ObjectKind::DescriptorPool, false, not_found) {
            return true;
        }
        self.cascade_children(scope, pool, ObjectKind::DescriptorSet);
        false
    }

    /// Destroy a descriptor pool and, implicitly, every descriptor set
    /// allocated from it.
    pub fn destroy_descriptor_pool(
        &mut self,
        device: Handle,
        pool: Handle,
        not_found: MessageCode,
    ) -> bool {
        if !self.mode.tracking_enabled() {
            return false;
        }
        let scope = Scope::Device(device);
        if self.validate(scope, pool, ObjectKind::DescriptorPool, false, not_found) {
            return true;
        }
        self.cascade_children(scope, pool, ObjectKind::DescriptorSet);
        self.destroy(scope, pool, ObjectKind::DescriptorPool, not_found)
    }

    /// Destroy a command pool and, implicitly, every command buffer
    /// allocated from it.
    pub fn destroy_command_pool(
        &mut self,
        device: Handle,
        pool: Handle,
        not_found: MessageCode,
    ) -> bool {
        if !self.mode.tracking_enabled() {
            return false;
        }
        let scope = Scope::Device(device);
        if self.validate(scope, pool, ObjectKind::CommandPool, false, not_found) {
            return true;
        }
        self.cascade_children(scope, pool, ObjectKind::CommandBuffer);
        self.destroy(scope, pool, ObjectKind::CommandPool, not_found)
    }

    /// Destroy a swapchain and, implicitly, every image it presented.
    ///
    /// Swapchain images live in the device's auxiliary map, outside the
    /// counted partitions, so their removal touches no live counts.
    pub fn destroy_swapchain(
        &mut self,
        device: Handle,
        swapchain: Handle,
        not_found: MessageCode,
    ) -> bool {
        if !self.mode.tracking_enabled() {
            return false;
        }
        let scope = Scope::Device(device);
        if self.validate(scope, swapchain, ObjectKind::Swapchain, false, not_found) {
            return true;
        }
        if let Some(device_scope) = self.state.devices.get_mut(&device) {
            device_scope
                .swapchain_images
                .retain(|_, record| record.parent != swapchain);
        }
        self.destroy(scope, swapchain, ObjectKind::Swapchain, not_found)
    }

    /// Tear down a device scope: report every leaked object, force-destroy
    /// all of them, release the auxiliary maps, then remove the Device
    /// record from the owning instance's registry.
    pub fn destroy_device(
        &mut self,
        instance: Handle,
        device: Handle,
        not_found: MessageCode,
        leak: MessageCode,
    ) -> bool {
        if !self.mode.tracking_enabled() {
            return false;
        }
        if self.validate(
            Scope::Instance(instance),
            device,
            ObjectKind::Device,
            false,
            not_found,
        ) {
            return true;
        }

        let scope = Scope::Device(device);
        self.report_leaks(scope, leak);
        self.force_destroy_all(scope);
        self.state.devices.remove(&device);
        self.destroy(Scope::Instance(instance), device, ObjectKind::Device, not_found)
    }

    /// Tear down a top-level scope: cascade over every child device scope
    /// still registered under it, then over the scope-rooted objects
    /// (physical devices, debug callbacks and messengers) the instance owns
    /// directly, and finally remove the scope itself.
    pub fn destroy_instance(
        &mut self,
        instance: Handle,
        not_found: MessageCode,
        leak: MessageCode,
    ) -> bool {
        if !self.mode.tracking_enabled() {
            return false;
        }
        let scope = Scope::Instance(instance);
        if self.validate(scope, instance, ObjectKind::Instance, false, not_found) {
            return true;
        }

        // Report against the pre-teardown state: a still-registered device
        // is itself a leak, over and above whatever it contains.
        self.report_leaks(scope, leak);

        // Then destroy: child device scopes first (each runs its own leak
        // report and cascade), then the scope-rooted objects.
        let child_devices: Vec<Handle> = self
            .state
            .devices
            .iter()
            .filter(|(_, dev)| dev.owner == instance)
            .map(|(&h, _)| h)
            .collect();
        for device in child_devices {
            self.destroy_device(instance, device, not_found, leak);
        }

        self.force_destroy_all(scope);
        self.state.instances.remove(&instance);
        false
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

    fn tracker_with_sink() -> (ObjectTracker, Arc<CollectingSink>) {
        let sink = Arc::new(CollectingSink::new());
        let tracker = ObjectTracker::with_mode(sink.clone(), TrackerMode::Enabled);
        (tracker, sink)
    }

    fn scoped_tracker() -> (ObjectTracker, Arc<CollectingSink>) {
        let (tracker, sink) = tracker_with_sink();
        {
            let mut guard = tracker.lock();
            guard.create_instance(Handle(1));
            guard.create_device(Handle(1), Handle(2));
        }
        (tracker, sink)
    }

    #[test]
    fn command_pool_destroy_takes_its_buffers_with_it() {
        let (tracker, _sink) = scoped_tracker();
        let mut guard = tracker.lock();
        let dev = Scope::Device(Handle(2));

        guard.create(dev, Handle(30), ObjectKind::CommandPool, Handle(2), ObjectStatus::empty());
        guard.create(dev, Handle(31), ObjectKind::CommandBuffer, Handle(30), ObjectStatus::empty());
        guard.create(dev, Handle(32), ObjectKind::CommandBuffer, Handle(30), ObjectStatus::empty());

        assert!(!guard.destroy_command_pool(Handle(2), Handle(30), MessageCode::UNDEFINED));
        assert_eq!(guard.live_count(dev, ObjectKind::CommandBuffer), 0);
        assert_eq!(guard.live_count(dev, ObjectKind::CommandPool), 0);
        assert!(guard.validate(dev, Handle(31), ObjectKind::CommandBuffer, false, MessageCode::UNDEFINED));
    }

    #[test]
    fn cascade_spares_siblings_from_other_pools() {
        let (tracker, _sink) = scoped_tracker();
        let mut guard = tracker.lock();
        let dev = Scope::Device(Handle(2));

        guard.create(dev, Handle(30), ObjectKind::CommandPool, Handle(2), ObjectStatus::empty());
        guard.create(dev, Handle(33), ObjectKind::CommandPool, Handle(2), ObjectStatus::empty());
        guard.create(dev, Handle(31), ObjectKind::CommandBuffer, Handle(30), ObjectStatus::empty());
        guard.create(dev, Handle(34), ObjectKind::CommandBuffer, Handle(33), ObjectStatus::empty());

        guard.destroy_command_pool(Handle(2), Handle(30), MessageCode::UNDEFINED);
        assert!(!guard.validate(dev, Handle(34), ObjectKind::CommandBuffer, false, MessageCode::UNDEFINED));
        assert_eq!(guard.live_count(dev, ObjectKind::CommandBuffer), 1);
    }

    #[test]
    fn descriptor_pool_reset_empties_its_sets_but_keeps_the_pool() {
        let (tracker, sink) = scoped_tracker();
        let mut guard = tracker.lock();
        let dev = Scope::Device(Handle(2));

        guard.create(dev, Handle(50), ObjectKind::DescriptorPool, Handle(2), ObjectStatus::empty());
        guard.create(dev, Handle(51), ObjectKind::DescriptorSet, Handle(50), ObjectStatus::empty());

        assert!(!guard.reset_descriptor_pool(Handle(2), Handle(50), MessageCode::UNDEFINED));
        assert_eq!(guard.live_count(dev, ObjectKind::DescriptorSet), 0);
        assert_eq!(guard.live_count(dev, ObjectKind::DescriptorPool), 1);

        // Explicit destroy of the reset set is an ordinary not-found report,
        // not a double count.
        sink.clear();
        assert!(guard.destroy(dev, Handle(51), ObjectKind::DescriptorSet, MessageCode::UNKNOWN_OBJECT));
        assert_eq!(sink.errors().len(), 1);
        assert_eq!(guard.live_count(dev, ObjectKind::DescriptorSet), 0);
    }

    #[test]
    fn swapchain_destroy_clears_only_its_own_images() {
        let (tracker, _sink) = scoped_tracker();
        let mut guard = tracker.lock();
        let dev = Scope::Device(Handle(2));

        guard.create(dev, Handle(60), ObjectKind::Swapchain, Handle(2), ObjectStatus::empty());
        guard.create(dev, Handle(61), ObjectKind::Swapchain, Handle(2), ObjectStatus::empty());
        guard.create_swapchain_image(Handle(2), Handle(62), Handle(60));
        guard.create_swapchain_image(Handle(2), Handle(63), Handle(61));

        guard.destroy_swapchain(Handle(2), Handle(60), MessageCode::UNDEFINED);
        assert!(!guard.has_swapchain_image(Handle(2), Handle(62)));
        assert!(guard.has_swapchain_image(Handle(2), Handle(63)));
        assert_eq!(guard.live_count(dev, ObjectKind::Swapchain), 1);
    }

    #[test]
    fn device_teardown_reports_leaks_then_empties_the_scope() {
        let (tracker, sink) = scoped_tracker();
        let mut guard = tracker.lock();
        let dev = Scope::Device(Handle(2));

        guard.create(dev, Handle(10), ObjectKind::Buffer, Handle(2), ObjectStatus::empty());
        guard.create(dev, Handle(11), ObjectKind::Fence, Handle(2), ObjectStatus::empty());

        sink.clear();
        assert!(!guard.destroy_device(Handle(1), Handle(2), MessageCode::UNDEFINED, MessageCode::OBJECT_LEAK));

        let leaks: Vec<_> = sink
            .errors()
            .into_iter()
            .filter(|e| e.code == MessageCode::OBJECT_LEAK)
            .collect();
        assert_eq!(leaks.len(), 2);
        assert!(leaks.iter().all(|e| e.message.contains("has not been destroyed")));
        assert_eq!(guard.total_live(dev), 0);
        assert!(guard.validate(
            Scope::Instance(Handle(1)),
            Handle(2),
            ObjectKind::Device,
            false,
            MessageCode::UNDEFINED
        ));
    }

    #[test]
    fn instance_teardown_cascades_devices_then_rooted_objects() {
        let (tracker, sink) = tracker_with_sink();
        let mut guard = tracker.lock();
        guard.create_instance(Handle(1));
        guard.create(
            Scope::Instance(Handle(1)),
            Handle(3),
            ObjectKind::PhysicalDevice,
            Handle(1),
            ObjectStatus::empty(),
        );
        guard.create_device(Handle(1), Handle(2));
        guard.create(
            Scope::Device(Handle(2)),
            Handle(10),
            ObjectKind::Buffer,
            Handle(2),
            ObjectStatus::empty(),
        );

        sink.clear();
        assert!(!guard.destroy_instance(Handle(1), MessageCode::UNDEFINED, MessageCode::OBJECT_LEAK));

        // Two leaks: the still-registered device at instance scope, and the
        // buffer inside it. The physical device is retrieved-not-created
        // and therefore exempt.
        let leaks: Vec<_> = sink
            .errors()
            .into_iter()
            .filter(|e| e.code == MessageCode::OBJECT_LEAK)
            .collect();
        assert_eq!(leaks.len(), 2);
        assert!(leaks.iter().any(|e| e.kind == ObjectKind::Device));
        assert!(leaks.iter().any(|e| e.kind == ObjectKind::Buffer));
        assert_eq!(guard.total_live(Scope::Instance(Handle(1))), 0);
        assert_eq!(guard.total_live(Scope::Device(Handle(2))), 0);
    }

    #[test]
    fn clean_teardown_reports_no_leaks() {
        let (tracker, sink) = scoped_tracker();
        let mut guard = tracker.lock();
        let dev = Scope::Device(Handle(2));

        guard.create(dev, Handle(10), ObjectKind::Buffer, Handle(2), ObjectStatus::empty());
        guard.destroy(dev, Handle(10), ObjectKind::Buffer, MessageCode::UNDEFINED);

        sink.clear();
        guard.destroy_device(Handle(1), Handle(2), MessageCode::UNDEFINED, MessageCode::OBJECT_LEAK);
        guard.destroy_instance(Handle(1), MessageCode::UNDEFINED, MessageCode::OBJECT_LEAK);
        assert!(sink.errors().is_empty());
    }
}

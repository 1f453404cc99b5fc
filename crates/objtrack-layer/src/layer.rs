//! Intercepted entry points.
//!
//! Every wrapper follows the same shape: lock the tracker, validate the
//! call's handle arguments, drop the lock, forward to the driver, re-lock,
//! record the call's effect. An error-severity violation suppresses the
//! forwarded call and surfaces as [`CallSuppressed`].
//!
//! The one exception is queue retrieval, which holds the lock across the
//! (non-blocking) forward so the queue is registered before any other
//! thread can observe the handle.

use objtrack_core::{Handle, MessageCode, ObjectKind, ObjectStatus, ObjectTracker, QueueCaps, Scope};

use crate::codes;
use crate::dispatch::DispatchForwarder;

/// A forwarded call was suppressed after validation reported a violation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("call suppressed after validation failure (code {code})")]
pub struct CallSuppressed {
    pub code: MessageCode,
}

fn suppressed(code: MessageCode) -> CallSuppressed {
    CallSuppressed { code }
}

/// The interception layer: an [`ObjectTracker`] in front of a
/// [`DispatchForwarder`].
pub struct ValidationLayer {
    tracker: ObjectTracker,
    forwarder: DispatchForwarder,
}

impl ValidationLayer {
    #[must_use]
    pub fn new(tracker: ObjectTracker, forwarder: DispatchForwarder) -> Self {
        Self { tracker, forwarder }
    }

    /// The tracker behind this layer, for inspection.
    #[must_use]
    pub fn tracker(&self) -> &ObjectTracker {
        &self.tracker
    }

    // ── Instance scope ───────────────────────────────────────

    pub fn create_instance(&self) -> Handle {
        // Nothing to validate: no scope exists yet.
        let instance = self.forwarder.instance().create_instance();
        self.tracker.lock().create_instance(instance);
        instance
    }

    pub fn destroy_instance(&self, instance: Handle) -> Result<(), CallSuppressed> {
        {
            let mut guard = self.tracker.lock();
            if guard.destroy_instance(
                instance,
                codes::DESTROY_INSTANCE_BAD_INSTANCE,
                codes::INSTANCE_OBJECT_LEAK,
            ) {
                return Err(suppressed(codes::DESTROY_INSTANCE_BAD_INSTANCE));
            }
        }
        self.forwarder.instance().destroy_instance(instance);
        Ok(())
    }

    pub fn enumerate_physical_devices(&self, instance: Handle) -> Result<Vec<Handle>, CallSuppressed> {
        let scope = Scope::Instance(instance);
        {
            let mut guard = self.tracker.lock();
            if guard.validate_scope(scope, codes::ENUM_PHYSICAL_DEVICES_BAD_INSTANCE) {
                return Err(suppressed(codes::ENUM_PHYSICAL_DEVICES_BAD_INSTANCE));
            }
        }
        let physical_devices = self.forwarder.instance().enumerate_physical_devices(instance);
        let mut guard = self.tracker.lock();
        for &pd in &physical_devices {
            // Re-enumeration returns handles already tracked.
            if guard.record(scope, ObjectKind::PhysicalDevice, pd).is_none() {
                guard.create(scope, pd, ObjectKind::PhysicalDevice, instance, ObjectStatus::empty());
            }
        }
        Ok(physical_devices)
    }

    pub fn get_queue_family_properties(
        &self,
        instance: Handle,
        physical_device: Handle,
    ) -> Result<Vec<QueueCaps>, CallSuppressed> {
        let scope = Scope::Instance(instance);
        {
            let mut guard = self.tracker.lock();
            if guard.validate(
                scope,
                physical_device,
                ObjectKind::PhysicalDevice,
                false,
                codes::QUEUE_FAMILY_PROPS_BAD_PHYSICAL_DEVICE,
            ) {
                return Err(suppressed(codes::QUEUE_FAMILY_PROPS_BAD_PHYSICAL_DEVICE));
            }
        }
        let caps = self
            .forwarder
            .instance()
            .get_queue_family_properties(physical_device);
        self.tracker.lock().set_queue_family_caps(instance, caps.clone());
        Ok(caps)
    }

    pub fn create_device(
        &self,
        instance: Handle,
        physical_device: Handle,
    ) -> Result<Handle, CallSuppressed> {
        {
            let mut guard = self.tracker.lock();
            if guard.validate(
                Scope::Instance(instance),
                physical_device,
                ObjectKind::PhysicalDevice,
                false,
                codes::CREATE_DEVICE_BAD_PHYSICAL_DEVICE,
            ) {
                return Err(suppressed(codes::CREATE_DEVICE_BAD_PHYSICAL_DEVICE));
            }
        }
        let device = self.forwarder.instance().create_device(physical_device);
        self.tracker.lock().create_device(instance, device);
        Ok(device)
    }

    // ── Device scope ─────────────────────────────────────────

    pub fn destroy_device(&self, instance: Handle, device: Handle) -> Result<(), CallSuppressed> {
        {
            let mut guard = self.tracker.lock();
            if guard.destroy_device(
                instance,
                device,
                codes::DESTROY_DEVICE_BAD_DEVICE,
                codes::DEVICE_OBJECT_LEAK,
            ) {
                return Err(suppressed(codes::DESTROY_DEVICE_BAD_DEVICE));
            }
        }
        self.forwarder.device().destroy_device(device);
        Ok(())
    }

    pub fn get_device_queue(
        &self,
        device: Handle,
        family: u32,
        index: u32,
    ) -> Result<Handle, CallSuppressed> {
        // Held-lock path: queue retrieval is non-blocking, and the queue
        // must be registered before the handle escapes this call.
        let mut guard = self.tracker.lock();
        if guard.validate_scope(Scope::Device(device), codes::GET_DEVICE_QUEUE_BAD_DEVICE) {
            return Err(suppressed(codes::GET_DEVICE_QUEUE_BAD_DEVICE));
        }
        let queue = self.forwarder.device().get_device_queue(device, family, index);
        guard.create_queue(device, queue, family);
        Ok(queue)
    }

    pub fn queue_bind_sparse(&self, device: Handle, queue: Handle) -> Result<(), CallSuppressed> {
        {
            let mut guard = self.tracker.lock();
            let mut skip = guard.validate(
                Scope::Device(device),
                queue,
                ObjectKind::Queue,
                false,
                codes::QUEUE_BIND_SPARSE_BAD_QUEUE,
            );
            skip |= guard.validate_queue_caps(
                device,
                queue,
                QueueCaps::SPARSE_BINDING,
                codes::QUEUE_BIND_SPARSE_MISSING_CAP,
            );
            if skip {
                return Err(suppressed(codes::QUEUE_BIND_SPARSE_BAD_QUEUE));
            }
        }
        self.forwarder.device().queue_bind_sparse(queue);
        Ok(())
    }

    pub fn create_buffer(&self, device: Handle) -> Result<Handle, CallSuppressed> {
        let scope = Scope::Device(device);
        {
            let mut guard = self.tracker.lock();
            if guard.validate_scope(scope, codes::CREATE_BUFFER_BAD_DEVICE) {
                return Err(suppressed(codes::CREATE_BUFFER_BAD_DEVICE));
            }
        }
        let buffer = self.forwarder.device().create_buffer(device);
        self.tracker.lock().create(
            scope,
            buffer,
            ObjectKind::Buffer,
            device,
            ObjectStatus::empty(),
        );
        Ok(buffer)
    }

    pub fn destroy_buffer(&self, device: Handle, buffer: Handle) -> Result<(), CallSuppressed> {
        let scope = Scope::Device(device);
        {
            let mut guard = self.tracker.lock();
            if guard.validate(
                scope,
                buffer,
                ObjectKind::Buffer,
                true,
                codes::DESTROY_BUFFER_BAD_BUFFER,
            ) {
                return Err(suppressed(codes::DESTROY_BUFFER_BAD_BUFFER));
            }
        }
        self.forwarder.device().destroy_buffer(device, buffer);
        if !buffer.is_null() {
            self.tracker.lock().destroy(
                scope,
                buffer,
                ObjectKind::Buffer,
                codes::DESTROY_BUFFER_BAD_BUFFER,
            );
        }
        Ok(())
    }

    // ── Command pools and buffers ────────────────────────────

    pub fn create_command_pool(&self, device: Handle) -> Result<Handle, CallSuppressed> {
        let scope = Scope::Device(device);
        {
            let mut guard = self.tracker.lock();
            if guard.validate_scope(scope, codes::CREATE_COMMAND_POOL_BAD_DEVICE) {
                return Err(suppressed(codes::CREATE_COMMAND_POOL_BAD_DEVICE));
            }
        }
        let pool = self.forwarder.device().create_command_pool(device);
        self.tracker.lock().create(
            scope,
            pool,
            ObjectKind::CommandPool,
            device,
            ObjectStatus::empty(),
        );
        Ok(pool)
    }

    pub fn destroy_command_pool(&self, device: Handle, pool: Handle) -> Result<(), CallSuppressed> {
        {
            let mut guard = self.tracker.lock();
            if guard.destroy_command_pool(device, pool, codes::DESTROY_COMMAND_POOL_BAD_POOL) {
                return Err(suppressed(codes::DESTROY_COMMAND_POOL_BAD_POOL));
            }
        }
        self.forwarder.device().destroy_command_pool(device, pool);
        Ok(())
    }

    pub fn allocate_command_buffers(
        &self,
        device: Handle,
        pool: Handle,
        count: u32,
        secondary: bool,
    ) -> Result<Vec<Handle>, CallSuppressed> {
        let scope = Scope::Device(device);
        {
            let mut guard = self.tracker.lock();
            if guard.validate(
                scope,
                pool,
                ObjectKind::CommandPool,
                false,
                codes::ALLOC_COMMAND_BUFFERS_BAD_POOL,
            ) {
                return Err(suppressed(codes::ALLOC_COMMAND_BUFFERS_BAD_POOL));
            }
        }
        let buffers = self.forwarder.device().allocate_command_buffers(device, pool, count);
        let status = if secondary {
            ObjectStatus::SECONDARY_COMMAND_BUFFER
        } else {
            ObjectStatus::empty()
        };
        let mut guard = self.tracker.lock();
        for &cb in &buffers {
            guard.create(scope, cb, ObjectKind::CommandBuffer, pool, status);
        }
        Ok(buffers)
    }

    /// Freeing through the wrong pool is reported but does not gate the
    /// free: the driver releases the buffers either way, so the records go
    /// too. Unknown buffer handles do suppress.
    pub fn free_command_buffers(
        &self,
        device: Handle,
        pool: Handle,
        buffers: &[Handle],
    ) -> Result<(), CallSuppressed> {
        let scope = Scope::Device(device);
        {
            let mut guard = self.tracker.lock();
            let mut skip = guard.validate(
                scope,
                pool,
                ObjectKind::CommandPool,
                false,
                codes::DESTROY_COMMAND_POOL_BAD_POOL,
            );
            for &cb in buffers {
                if guard.validate(
                    scope,
                    cb,
                    ObjectKind::CommandBuffer,
                    true,
                    codes::FREE_COMMAND_BUFFERS_BAD_BUFFER,
                ) {
                    skip = true;
                } else if !cb.is_null() {
                    guard.validate_parent(
                        scope,
                        cb,
                        ObjectKind::CommandBuffer,
                        pool,
                        codes::FREE_COMMAND_BUFFERS_BAD_BUFFER,
                        codes::FREE_COMMAND_BUFFERS_WRONG_POOL,
                    );
                }
            }
            if skip {
                return Err(suppressed(codes::FREE_COMMAND_BUFFERS_BAD_BUFFER));
            }
        }
        self.forwarder.device().free_command_buffers(device, pool, buffers);
        let mut guard = self.tracker.lock();
        for &cb in buffers {
            if !cb.is_null() {
                guard.destroy(
                    scope,
                    cb,
                    ObjectKind::CommandBuffer,
                    codes::FREE_COMMAND_BUFFERS_BAD_BUFFER,
                );
            }
        }
        Ok(())
    }

    // ── Descriptor pools and sets ────────────────────────────

    pub fn create_descriptor_pool(&self, device: Handle) -> Result<Handle, CallSuppressed> {
        let scope = Scope::Device(device);
        {
            let mut guard = self.tracker.lock();
            if guard.validate_scope(scope, codes::CREATE_DESCRIPTOR_POOL_BAD_DEVICE) {
                return Err(suppressed(codes::CREATE_DESCRIPTOR_POOL_BAD_DEVICE));
            }
        }
        let pool = self.forwarder.device().create_descriptor_pool(device);
        self.tracker.lock().create(
            scope,
            pool,
            ObjectKind::DescriptorPool,
            device,
            ObjectStatus::empty(),
        );
        Ok(pool)
    }

    pub fn destroy_descriptor_pool(&self, device: Handle, pool: Handle) -> Result<(), CallSuppressed> {
        {
            let mut guard = self.tracker.lock();
            if guard.destroy_descriptor_pool(device, pool, codes::DESTROY_DESCRIPTOR_POOL_BAD_POOL) {
                return Err(suppressed(codes::DESTROY_DESCRIPTOR_POOL_BAD_POOL));
            }
        }
        self.forwarder.device().destroy_descriptor_pool(device, pool);
        Ok(())
    }

    pub fn reset_descriptor_pool(&self, device: Handle, pool: Handle) -> Result<(), CallSuppressed> {
        {
            let mut guard = self.tracker.lock();
            if guard.reset_descriptor_pool(device, pool, codes::RESET_DESCRIPTOR_POOL_BAD_POOL) {
                return Err(suppressed(codes::RESET_DESCRIPTOR_POOL_BAD_POOL));
            }
        }
        self.forwarder.device().reset_descriptor_pool(device, pool);
        Ok(())
    }

    pub fn allocate_descriptor_sets(
        &self,
        device: Handle,
        pool: Handle,
        count: u32,
    ) -> Result<Vec<Handle>, CallSuppressed> {
        let scope = Scope::Device(device);
        {
            let mut guard = self.tracker.lock();
            if guard.validate(
                scope,
                pool,
                ObjectKind::DescriptorPool,
                false,
                codes::ALLOC_DESCRIPTOR_SETS_BAD_POOL,
            ) {
                return Err(suppressed(codes::ALLOC_DESCRIPTOR_SETS_BAD_POOL));
            }
        }
        let sets = self.forwarder.device().allocate_descriptor_sets(device, pool, count);
        let mut guard = self.tracker.lock();
        for &ds in &sets {
            guard.create(scope, ds, ObjectKind::DescriptorSet, pool, ObjectStatus::empty());
        }
        Ok(sets)
    }

    /// Same wrong-pool policy as [`free_command_buffers`](Self::free_command_buffers).
    pub fn free_descriptor_sets(
        &self,
        device: Handle,
        pool: Handle,
        sets: &[Handle],
    ) -> Result<(), CallSuppressed> {
        let scope = Scope::Device(device);
        {
            let mut guard = self.tracker.lock();
            let mut skip = guard.validate(
                scope,
                pool,
                ObjectKind::DescriptorPool,
                false,
                codes::DESTROY_DESCRIPTOR_POOL_BAD_POOL,
            );
            for &ds in sets {
                if guard.validate(
                    scope,
                    ds,
                    ObjectKind::DescriptorSet,
                    true,
                    codes::FREE_DESCRIPTOR_SETS_BAD_SET,
                ) {
                    skip = true;
                } else if !ds.is_null() {
                    guard.validate_parent(
                        scope,
                        ds,
                        ObjectKind::DescriptorSet,
                        pool,
                        codes::FREE_DESCRIPTOR_SETS_BAD_SET,
                        codes::FREE_DESCRIPTOR_SETS_WRONG_POOL,
                    );
                }
            }
            if skip {
                return Err(suppressed(codes::FREE_DESCRIPTOR_SETS_BAD_SET));
            }
        }
        self.forwarder.device().free_descriptor_sets(device, pool, sets);
        let mut guard = self.tracker.lock();
        for &ds in sets {
            if !ds.is_null() {
                guard.destroy(
                    scope,
                    ds,
                    ObjectKind::DescriptorSet,
                    codes::FREE_DESCRIPTOR_SETS_BAD_SET,
                );
            }
        }
        Ok(())
    }

    // ── Swapchains ───────────────────────────────────────────

    pub fn create_swapchain(&self, device: Handle) -> Result<Handle, CallSuppressed> {
        let scope = Scope::Device(device);
        {
            let mut guard = self.tracker.lock();
            if guard.validate_scope(scope, codes::CREATE_SWAPCHAIN_BAD_DEVICE) {
                return Err(suppressed(codes::CREATE_SWAPCHAIN_BAD_DEVICE));
            }
        }
        let swapchain = self.forwarder.device().create_swapchain(device);
        self.tracker.lock().create(
            scope,
            swapchain,
            ObjectKind::Swapchain,
            device,
            ObjectStatus::empty(),
        );
        Ok(swapchain)
    }

    pub fn destroy_swapchain(&self, device: Handle, swapchain: Handle) -> Result<(), CallSuppressed> {
        {
            let mut guard = self.tracker.lock();
            if guard.destroy_swapchain(device, swapchain, codes::DESTROY_SWAPCHAIN_BAD_SWAPCHAIN) {
                return Err(suppressed(codes::DESTROY_SWAPCHAIN_BAD_SWAPCHAIN));
            }
        }
        self.forwarder.device().destroy_swapchain(device, swapchain);
        Ok(())
    }

    pub fn get_swapchain_images(
        &self,
        device: Handle,
        swapchain: Handle,
    ) -> Result<Vec<Handle>, CallSuppressed> {
        let scope = Scope::Device(device);
        {
            let mut guard = self.tracker.lock();
            if guard.validate(
                scope,
                swapchain,
                ObjectKind::Swapchain,
                false,
                codes::GET_SWAPCHAIN_IMAGES_BAD_SWAPCHAIN,
            ) {
                return Err(suppressed(codes::GET_SWAPCHAIN_IMAGES_BAD_SWAPCHAIN));
            }
        }
        let images = self.forwarder.device().get_swapchain_images(device, swapchain);
        let mut guard = self.tracker.lock();
        for &image in &images {
            if !guard.has_swapchain_image(device, image) {
                guard.create_swapchain_image(device, image, swapchain);
            }
        }
        Ok(images)
    }
}

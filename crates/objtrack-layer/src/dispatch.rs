//! The dispatch-forwarder collaborator contract.
//!
//! The layer sits between the client and the real implementation. These
//! traits are the downward edge: one method per intercepted entry point,
//! implemented by whatever actually executes the call (the real driver in
//! production, a mock in tests). The tracker core never sees these types.

use std::sync::Arc;

use objtrack_core::{Handle, QueueCaps};

/// Instance-scope entry points of the next layer down.
pub trait InstanceDriver: Send + Sync {
    fn create_instance(&self) -> Handle;
    fn destroy_instance(&self, instance: Handle);
    fn enumerate_physical_devices(&self, instance: Handle) -> Vec<Handle>;
    /// Capability flags per queue family of the given physical device.
    fn get_queue_family_properties(&self, physical_device: Handle) -> Vec<QueueCaps>;
    fn create_device(&self, physical_device: Handle) -> Handle;
}

/// Device-scope entry points of the next layer down.
pub trait DeviceDriver: Send + Sync {
    fn destroy_device(&self, device: Handle);
    fn get_device_queue(&self, device: Handle, family: u32, index: u32) -> Handle;
    fn queue_bind_sparse(&self, queue: Handle);
    fn create_buffer(&self, device: Handle) -> Handle;
    fn destroy_buffer(&self, device: Handle, buffer: Handle);
    fn create_command_pool(&self, device: Handle) -> Handle;
    fn destroy_command_pool(&self, device: Handle, pool: Handle);
    fn allocate_command_buffers(&self, device: Handle, pool: Handle, count: u32) -> Vec<Handle>;
    fn free_command_buffers(&self, device: Handle, pool: Handle, buffers: &[Handle]);
    fn create_descriptor_pool(&self, device: Handle) -> Handle;
    fn destroy_descriptor_pool(&self, device: Handle, pool: Handle);
    fn reset_descriptor_pool(&self, device: Handle, pool: Handle);
    fn allocate_descriptor_sets(&self, device: Handle, pool: Handle, count: u32) -> Vec<Handle>;
    fn free_descriptor_sets(&self, device: Handle, pool: Handle, sets: &[Handle]);
    fn create_swapchain(&self, device: Handle) -> Handle;
    fn destroy_swapchain(&self, device: Handle, swapchain: Handle);
    fn get_swapchain_images(&self, device: Handle, swapchain: Handle) -> Vec<Handle>;
}

/// Routes intercepted calls to the drivers of the next layer down.
pub struct DispatchForwarder {
    instance: Arc<dyn InstanceDriver>,
    device: Arc<dyn DeviceDriver>,
}

impl DispatchForwarder {
    #[must_use]
    pub fn new(instance: Arc<dyn InstanceDriver>, device: Arc<dyn DeviceDriver>) -> Self {
        Self { instance, device }
    }

    #[must_use]
    pub fn instance(&self) -> &dyn InstanceDriver {
        &*self.instance
    }

    #[must_use]
    pub fn device(&self) -> &dyn DeviceDriver {
        &*self.device
    }
}

//! The closed enumeration of trackable object categories.

/// Category of a tracked object.
///
/// Every trackable resource of the intercepted API falls into exactly one
/// kind. Each kind owns its own registry partition, so a handle is only
/// meaningful together with its kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ObjectKind {
    Instance,
    PhysicalDevice,
    Device,
    Queue,
    Semaphore,
    Fence,
    DeviceMemory,
    Event,
    QueryPool,
    CommandPool,
    CommandBuffer,
    DescriptorPool,
    DescriptorSet,
    DescriptorSetLayout,
    ShaderModule,
    PipelineCache,
    PipelineLayout,
    Pipeline,
    RenderPass,
    Framebuffer,
    Buffer,
    BufferView,
    Image,
    ImageView,
    Sampler,
    Swapchain,
    Display,
    DisplayMode,
    DebugCallback,
    DebugMessenger,
}

impl ObjectKind {
    /// Number of kinds; the size of a per-kind partition table.
    pub const COUNT: usize = 30;

    /// All kinds, in partition order.
    pub const ALL: [ObjectKind; Self::COUNT] = [
        ObjectKind::Instance,
        ObjectKind::PhysicalDevice,
        ObjectKind::Device,
        ObjectKind::Queue,
        ObjectKind::Semaphore,
        ObjectKind::Fence,
        ObjectKind::DeviceMemory,
        ObjectKind::Event,
        ObjectKind::QueryPool,
        ObjectKind::CommandPool,
        ObjectKind::CommandBuffer,
        ObjectKind::DescriptorPool,
        ObjectKind::DescriptorSet,
        ObjectKind::DescriptorSetLayout,
        ObjectKind::ShaderModule,
        ObjectKind::PipelineCache,
        ObjectKind::PipelineLayout,
        ObjectKind::Pipeline,
        ObjectKind::RenderPass,
        ObjectKind::Framebuffer,
        ObjectKind::Buffer,
        ObjectKind::BufferView,
        ObjectKind::Image,
        ObjectKind::ImageView,
        ObjectKind::Sampler,
        ObjectKind::Swapchain,
        ObjectKind::Display,
        ObjectKind::DisplayMode,
        ObjectKind::DebugCallback,
        ObjectKind::DebugMessenger,
    ];

    /// Stable index of this kind's registry partition.
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Reportable identity tag, used only for diagnostics.
    #[must_use]
    pub const fn tag(self) -> &'static str {
        match self {
            ObjectKind::Instance => "Instance",
            ObjectKind::PhysicalDevice => "PhysicalDevice",
            ObjectKind::Device => "Device",
            ObjectKind::Queue => "Queue",
            ObjectKind::Semaphore => "Semaphore",
            ObjectKind::Fence => "Fence",
            ObjectKind::DeviceMemory => "DeviceMemory",
            ObjectKind::Event => "Event",
            ObjectKind::QueryPool => "QueryPool",
            ObjectKind::CommandPool => "CommandPool",
            ObjectKind::CommandBuffer => "CommandBuffer",
            ObjectKind::DescriptorPool => "DescriptorPool",
            ObjectKind::DescriptorSet => "DescriptorSet",
            ObjectKind::DescriptorSetLayout => "DescriptorSetLayout",
            ObjectKind::ShaderModule => "ShaderModule",
            ObjectKind::PipelineCache => "PipelineCache",
            ObjectKind::PipelineLayout => "PipelineLayout",
            ObjectKind::Pipeline => "Pipeline",
            ObjectKind::RenderPass => "RenderPass",
            ObjectKind::Framebuffer => "Framebuffer",
            ObjectKind::Buffer => "Buffer",
            ObjectKind::BufferView => "BufferView",
            ObjectKind::Image => "Image",
            ObjectKind::ImageView => "ImageView",
            ObjectKind::Sampler => "Sampler",
            ObjectKind::Swapchain => "Swapchain",
            ObjectKind::Display => "Display",
            ObjectKind::DisplayMode => "DisplayMode",
            ObjectKind::DebugCallback => "DebugCallback",
            ObjectKind::DebugMessenger => "DebugMessenger",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partition_indexes_are_dense_and_unique() {
        for (i, kind) in ObjectKind::ALL.iter().enumerate() {
            assert_eq!(kind.index(), i);
        }
    }

    #[test]
    fn tags_are_distinct() {
        let mut tags: Vec<&str> = ObjectKind::ALL.iter().map(|k| k.tag()).collect();
        tags.sort_unstable();
        tags.dedup();
        assert_eq!(tags.len(), ObjectKind::COUNT);
    }
}

//! Per-entry-point diagnostic codes.
//!
//! Each intercepted entry point reports through its own code so a consumer
//! can map a diagnostic back to the offending call site. Codes are grouped
//! by entry point in blocks of 0x10.

use objtrack_core::MessageCode;

pub const DESTROY_INSTANCE_BAD_INSTANCE: MessageCode = MessageCode(0x0010);
pub const INSTANCE_OBJECT_LEAK: MessageCode = MessageCode(0x0011);

pub const ENUM_PHYSICAL_DEVICES_BAD_INSTANCE: MessageCode = MessageCode(0x0020);
pub const QUEUE_FAMILY_PROPS_BAD_PHYSICAL_DEVICE: MessageCode = MessageCode(0x0030);
pub const CREATE_DEVICE_BAD_PHYSICAL_DEVICE: MessageCode = MessageCode(0x0040);

pub const DESTROY_DEVICE_BAD_DEVICE: MessageCode = MessageCode(0x0050);
pub const DEVICE_OBJECT_LEAK: MessageCode = MessageCode(0x0051);

pub const GET_DEVICE_QUEUE_BAD_DEVICE: MessageCode = MessageCode(0x0060);
pub const QUEUE_BIND_SPARSE_BAD_QUEUE: MessageCode = MessageCode(0x0070);
pub const QUEUE_BIND_SPARSE_MISSING_CAP: MessageCode = MessageCode(0x0071);

pub const CREATE_BUFFER_BAD_DEVICE: MessageCode = MessageCode(0x0080);
pub const DESTROY_BUFFER_BAD_BUFFER: MessageCode = MessageCode(0x0090);

pub const CREATE_COMMAND_POOL_BAD_DEVICE: MessageCode = MessageCode(0x00a0);
pub const DESTROY_COMMAND_POOL_BAD_POOL: MessageCode = MessageCode(0x00b0);
pub const ALLOC_COMMAND_BUFFERS_BAD_POOL: MessageCode = MessageCode(0x00c0);
pub const FREE_COMMAND_BUFFERS_BAD_BUFFER: MessageCode = MessageCode(0x00d0);
pub const FREE_COMMAND_BUFFERS_WRONG_POOL: MessageCode = MessageCode(0x00d1);

pub const CREATE_DESCRIPTOR_POOL_BAD_DEVICE: MessageCode = MessageCode(0x00e0);
pub const DESTROY_DESCRIPTOR_POOL_BAD_POOL: MessageCode = MessageCode(0x00f0);
pub const RESET_DESCRIPTOR_POOL_BAD_POOL: MessageCode = MessageCode(0x0100);
pub const ALLOC_DESCRIPTOR_SETS_BAD_POOL: MessageCode = MessageCode(0x0110);
pub const FREE_DESCRIPTOR_SETS_BAD_SET: MessageCode = MessageCode(0x0120);
pub const FREE_DESCRIPTOR_SETS_WRONG_POOL: MessageCode = MessageCode(0x0121);

pub const CREATE_SWAPCHAIN_BAD_DEVICE: MessageCode = MessageCode(0x0130);
pub const DESTROY_SWAPCHAIN_BAD_SWAPCHAIN: MessageCode = MessageCode(0x0140);
pub const GET_SWAPCHAIN_IMAGES_BAD_SWAPCHAIN: MessageCode = MessageCode(0x0150);

//! Per-object tracked state.

use bitflags::bitflags;

use crate::handle::Handle;
use crate::kind::ObjectKind;

bitflags! {
    /// Kind-specific secondary state carried by a record.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct ObjectStatus: u32 {
        /// The record is a secondary-level command buffer.
        const SECONDARY_COMMAND_BUFFER = 1 << 0;
        /// The object was created with a caller-supplied allocator.
        const CUSTOM_ALLOCATOR = 1 << 1;
    }
}

bitflags! {
    /// Capability flags of a queue family.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct QueueCaps: u32 {
        const GRAPHICS = 1 << 0;
        const COMPUTE = 1 << 1;
        const TRANSFER = 1 << 2;
        const SPARSE_BINDING = 1 << 3;
    }
}

/// One live tracked object.
///
/// Records are immutable after insertion; they are only ever created by the
/// lifecycle engine's `create` path and removed by `destroy`/cascade paths.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ObjectRecord {
    /// Opaque identity, unique within its registry partition while live.
    pub handle: Handle,
    /// Category; fixes the registry partition the record lives in.
    pub kind: ObjectKind,
    /// Handle of the object this record's lifetime depends on.
    /// [`Handle::NULL`] for scope-root objects.
    pub parent: Handle,
    /// Kind-specific secondary state.
    pub status: ObjectStatus,
}

impl ObjectRecord {
    /// Build a record for a scope-root object (no parent).
    #[must_use]
    pub fn root(handle: Handle, kind: ObjectKind) -> Self {
        Self {
            handle,
            kind,
            parent: Handle::NULL,
            status: ObjectStatus::empty(),
        }
    }

    /// Build a record owned by `parent`.
    #[must_use]
    pub fn child(handle: Handle, kind: ObjectKind, parent: Handle) -> Self {
        Self {
            handle,
            kind,
            parent,
            status: ObjectStatus::empty(),
        }
    }

    /// Attach status flags.
    #[must_use]
    pub fn with_status(mut self, status: ObjectStatus) -> Self {
        self.status = status;
        self
    }
}

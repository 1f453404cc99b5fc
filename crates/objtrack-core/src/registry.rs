//! Per-scope object registry: kind-partitioned handle → record maps.

use std::collections::HashMap;

use crate::handle::Handle;
use crate::kind::ObjectKind;
use crate::record::ObjectRecord;

/// Owns every live record of one scope (instance or device), partitioned by
/// kind, together with per-kind live counts and a total live count.
///
/// This is a pure container: insertion, lookup, and removal only. Duplicate
/// insertion and count underflow indicate lifecycle-engine bugs and abort.
#[derive(Debug)]
pub struct ScopeRegistry {
    partitions: [HashMap<u64, ObjectRecord>; ObjectKind::COUNT],
    live_counts: [u64; ObjectKind::COUNT],
    total_live: u64,
}

impl ScopeRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            partitions: std::array::from_fn(|_| HashMap::new()),
            live_counts: [0; ObjectKind::COUNT],
            total_live: 0,
        }
    }

    /// Insert a freshly created record.
    ///
    /// Panics if a record with the same handle already exists in the kind's
    /// partition; callers must have established the handle is fresh.
    pub fn insert(&mut self, record: ObjectRecord) {
        let kind = record.kind;
        let prior = self.partitions[kind.index()].insert(record.handle.raw(), record);
        assert!(
            prior.is_none(),
            "duplicate {} record for handle {}",
            kind.tag(),
            record.handle
        );
        self.live_counts[kind.index()] += 1;
        self.total_live += 1;
    }

    /// Look up a live record by kind and handle.
    #[must_use]
    pub fn get(&self, kind: ObjectKind, handle: Handle) -> Option<&ObjectRecord> {
        self.partitions[kind.index()].get(&handle.raw())
    }

    /// Returns true if a live record exists for this kind and handle.
    #[must_use]
    pub fn contains(&self, kind: ObjectKind, handle: Handle) -> bool {
        self.get(kind, handle).is_some()
    }

    /// Remove a record, decrementing the live counts.
    ///
    /// Counts are sanity-checked before every decrement; underflow is a
    /// bookkeeping bug and aborts.
    pub fn remove(&mut self, kind: ObjectKind, handle: Handle) -> Option<ObjectRecord> {
        let removed = self.partitions[kind.index()].remove(&handle.raw())?;
        assert!(
            self.live_counts[kind.index()] > 0,
            "{} live count underflow removing {}",
            kind.tag(),
            handle
        );
        assert!(self.total_live > 0, "total live count underflow removing {handle}");
        self.live_counts[kind.index()] -= 1;
        self.total_live -= 1;
        Some(removed)
    }

    /// Number of live records of one kind.
    #[must_use]
    pub fn live_count(&self, kind: ObjectKind) -> u64 {
        self.live_counts[kind.index()]
    }

    /// Number of live records across all kinds.
    #[must_use]
    pub fn total_live(&self) -> u64 {
        self.total_live
    }

    /// Iterate the live records of one kind (unspecified order).
    pub fn iter_kind(&self, kind: ObjectKind) -> impl Iterator<Item = &ObjectRecord> {
        self.partitions[kind.index()].values()
    }

    /// Snapshot the handles of every live record of one kind.
    #[must_use]
    pub fn handles_of(&self, kind: ObjectKind) -> Vec<Handle> {
        self.partitions[kind.index()]
            .values()
            .map(|r| r.handle)
            .collect()
    }

    /// Snapshot the handles of records of `kind` whose parent is `parent`.
    ///
    /// Cascade passes collect victims through this before mutating, so no
    /// iteration ever observes its own removals.
    #[must_use]
    pub fn children_of(&self, kind: ObjectKind, parent: Handle) -> Vec<Handle> {
        self.partitions[kind.index()]
            .values()
            .filter(|r| r.parent == parent)
            .map(|r| r.handle)
            .collect()
    }
}

impl Default for ScopeRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::ObjectRecord;

    #[test]
    fn insert_lookup_remove_cycle() {
        let mut reg = ScopeRegistry::new();
        reg.insert(ObjectRecord::root(Handle(1), ObjectKind::Buffer));
        assert!(reg.contains(ObjectKind::Buffer, Handle(1)));
        assert_eq!(reg.live_count(ObjectKind::Buffer), 1);
        assert_eq!(reg.total_live(), 1);

        let removed = reg.remove(ObjectKind::Buffer, Handle(1)).expect("record");
        assert_eq!(removed.handle, Handle(1));
        assert_eq!(reg.live_count(ObjectKind::Buffer), 0);
        assert_eq!(reg.total_live(), 0);
    }

    #[test]
    fn lookup_is_kind_partitioned() {
        let mut reg = ScopeRegistry::new();
        reg.insert(ObjectRecord::root(Handle(1), ObjectKind::Buffer));
        assert!(!reg.contains(ObjectKind::Image, Handle(1)));
    }

    #[test]
    fn remove_of_absent_handle_is_none_and_counts_hold() {
        let mut reg = ScopeRegistry::new();
        reg.insert(ObjectRecord::root(Handle(1), ObjectKind::Buffer));
        assert!(reg.remove(ObjectKind::Buffer, Handle(2)).is_none());
        assert_eq!(reg.live_count(ObjectKind::Buffer), 1);
        assert_eq!(reg.total_live(), 1);
    }

    #[test]
    #[should_panic(expected = "duplicate")]
    fn duplicate_insert_aborts() {
        let mut reg = ScopeRegistry::new();
        reg.insert(ObjectRecord::root(Handle(1), ObjectKind::Buffer));
        reg.insert(ObjectRecord::root(Handle(1), ObjectKind::Buffer));
    }

    #[test]
    fn children_of_filters_by_parent() {
        let mut reg = ScopeRegistry::new();
        reg.insert(ObjectRecord::child(Handle(10), ObjectKind::CommandBuffer, Handle(1)));
        reg.insert(ObjectRecord::child(Handle(11), ObjectKind::CommandBuffer, Handle(1)));
        reg.insert(ObjectRecord::child(Handle(12), ObjectKind::CommandBuffer, Handle(2)));

        let mut victims = reg.children_of(ObjectKind::CommandBuffer, Handle(1));
        victims.sort_unstable();
        assert_eq!(victims, vec![Handle(10), Handle(11)]);
    }
}

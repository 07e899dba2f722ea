//! The update diff: what a write request transmits.

use ews_xml::Field;

/// Partition of an entity's declared fields for the write path.
///
/// `sets` is the only list the write path transmits. A field in
/// `deletes` is simply not mentioned in the outgoing request, which
/// leaves the remote value untouched; there is no remote-clear
/// primitive. `adds` is reserved for multi-valued-property insertion and
/// stays empty in the base contract.
#[derive(Debug, Clone, Default)]
pub struct UpdateDiff {
    /// Multi-valued insertions (reserved, always empty).
    pub adds: Vec<Field>,
    /// Fields with a pending value, in declaration order.
    pub sets: Vec<Field>,
    /// Fields with nothing to send, in declaration order.
    pub deletes: Vec<Field>,
}

impl UpdateDiff {
    /// Partitions declared fields by their pending-update state.
    ///
    /// Every field lands in exactly one of sets/deletes. Read-only
    /// fields never enter sets regardless of their state.
    pub fn partition<'a>(fields: impl IntoIterator<Item = &'a Field>) -> Self {
        let mut diff = Self::default();
        for field in fields {
            if field.has_pending_update() && !field.is_read_only() {
                diff.sets.push(field.clone());
            } else {
                diff.deletes.push(field.clone());
            }
        }
        diff
    }

    /// Total number of partitioned fields.
    pub fn len(&self) -> usize {
        self.adds.len() + self.sets.len() + self.deletes.len()
    }

    /// True when nothing was partitioned.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

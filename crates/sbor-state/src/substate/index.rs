use std::mem;

use crate::error::SubstateError;
use crate::substate::{LockStatus, check_writable};

/// One entry of an append-ordered index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IndexEntrySubstate<V> {
    V1(IndexEntrySubstateV1<V>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexEntrySubstateV1<V> {
    value: V,
    lock_status: LockStatus,
}

/// Sorted index entries share the layout of index entries; the sort key
/// lives in the storage key, not the substate.
pub type SortedIndexEntrySubstate<V> = IndexEntrySubstate<V>;

impl_substate_codec!(IndexEntrySubstate, IndexEntrySubstateV1, value: V);

impl<V> IndexEntrySubstate<V> {
    pub(crate) fn new_locked(value: V) -> Self {
        IndexEntrySubstate::V1(IndexEntrySubstateV1 {
            value,
            lock_status: LockStatus::Locked,
        })
    }

    pub(crate) fn new_unlocked(value: V) -> Self {
        IndexEntrySubstate::V1(IndexEntrySubstateV1 {
            value,
            lock_status: LockStatus::Unlocked,
        })
    }

    fn inner_mut(&mut self) -> &mut IndexEntrySubstateV1<V> {
        match self {
            IndexEntrySubstate::V1(inner) => inner,
        }
    }

    pub fn value(&self) -> &V {
        match self {
            IndexEntrySubstate::V1(inner) => &inner.value,
        }
    }

    pub fn into_value(self) -> V {
        match self {
            IndexEntrySubstate::V1(inner) => inner.value,
        }
    }

    pub fn lock_status(&self) -> LockStatus {
        match self {
            IndexEntrySubstate::V1(inner) => inner.lock_status,
        }
    }

    pub fn is_locked(&self) -> bool {
        self.lock_status().is_locked()
    }

    pub fn lock(&mut self) {
        self.inner_mut().lock_status = LockStatus::Locked;
    }

    pub fn replace_value(&mut self, value: V) -> Result<V, SubstateError> {
        let inner = self.inner_mut();
        check_writable(inner.lock_status, "index_entry")?;
        Ok(mem::replace(&mut inner.value, value))
    }
}

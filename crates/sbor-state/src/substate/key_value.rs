use std::mem;

use crate::error::SubstateError;
use crate::substate::{LockStatus, check_writable};

/// One entry of a key-value collection. An entry may be vacant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyValueEntrySubstate<V> {
    V1(KeyValueEntrySubstateV1<V>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyValueEntrySubstateV1<V> {
    value: Option<V>,
    lock_status: LockStatus,
}

impl_substate_codec!(KeyValueEntrySubstate, KeyValueEntrySubstateV1, value: Option<V>);

impl<V> Default for KeyValueEntrySubstate<V> {
    /// A vacant, unlocked entry.
    fn default() -> Self {
        KeyValueEntrySubstate::V1(KeyValueEntrySubstateV1 {
            value: None,
            lock_status: LockStatus::Unlocked,
        })
    }
}

impl<V> KeyValueEntrySubstate<V> {
    pub(crate) fn new_locked(value: V) -> Self {
        KeyValueEntrySubstate::V1(KeyValueEntrySubstateV1 {
            value: Some(value),
            lock_status: LockStatus::Locked,
        })
    }

    pub(crate) fn new_unlocked(value: V) -> Self {
        KeyValueEntrySubstate::V1(KeyValueEntrySubstateV1 {
            value: Some(value),
            lock_status: LockStatus::Unlocked,
        })
    }

    fn inner(&self) -> &KeyValueEntrySubstateV1<V> {
        match self {
            KeyValueEntrySubstate::V1(inner) => inner,
        }
    }

    fn inner_mut(&mut self) -> &mut KeyValueEntrySubstateV1<V> {
        match self {
            KeyValueEntrySubstate::V1(inner) => inner,
        }
    }

    pub fn value(&self) -> Option<&V> {
        self.inner().value.as_ref()
    }

    pub fn into_value(self) -> Option<V> {
        match self {
            KeyValueEntrySubstate::V1(inner) => inner.value,
        }
    }

    pub fn is_occupied(&self) -> bool {
        self.inner().value.is_some()
    }

    pub fn lock_status(&self) -> LockStatus {
        self.inner().lock_status
    }

    pub fn is_locked(&self) -> bool {
        self.lock_status().is_locked()
    }

    /// Locks the entry, vacant or not. There is no way back.
    pub fn lock(&mut self) {
        self.inner_mut().lock_status = LockStatus::Locked;
    }

    /// Stores a value and returns the previous one.
    pub fn set_value(&mut self, value: V) -> Result<Option<V>, SubstateError> {
        let inner = self.inner_mut();
        check_writable(inner.lock_status, "key_value_entry")?;
        Ok(inner.value.replace(value))
    }

    /// Vacates the entry and returns what it held.
    pub fn remove(&mut self) -> Result<Option<V>, SubstateError> {
        let inner = self.inner_mut();
        check_writable(inner.lock_status, "key_value_entry")?;
        Ok(mem::take(&mut inner.value))
    }
}

use std::mem;

use crate::error::SubstateError;
use crate::substate::{LockStatus, check_writable};

/// The single value of a field owned by some entity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldSubstate<V> {
    V1(FieldSubstateV1<V>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSubstateV1<V> {
    payload: V,
    lock_status: LockStatus,
}

impl_substate_codec!(FieldSubstate, FieldSubstateV1, payload: V);

impl<V> FieldSubstate<V> {
    pub(crate) fn new_field(payload: V, lock_status: LockStatus) -> Self {
        FieldSubstate::V1(FieldSubstateV1 {
            payload,
            lock_status,
        })
    }

    pub(crate) fn new_locked(payload: V) -> Self {
        Self::new_field(payload, LockStatus::Locked)
    }

    pub(crate) fn new_unlocked(payload: V) -> Self {
        Self::new_field(payload, LockStatus::Unlocked)
    }

    fn inner(&self) -> &FieldSubstateV1<V> {
        match self {
            FieldSubstate::V1(inner) => inner,
        }
    }

    fn inner_mut(&mut self) -> &mut FieldSubstateV1<V> {
        match self {
            FieldSubstate::V1(inner) => inner,
        }
    }

    pub fn payload(&self) -> &V {
        &self.inner().payload
    }

    pub fn into_payload(self) -> V {
        match self {
            FieldSubstate::V1(inner) => inner.payload,
        }
    }

    pub fn lock_status(&self) -> LockStatus {
        self.inner().lock_status
    }

    pub fn is_locked(&self) -> bool {
        self.lock_status().is_locked()
    }

    /// Locks the field. There is no way back.
    pub fn lock(&mut self) {
        self.inner_mut().lock_status = LockStatus::Locked;
    }

    /// Swaps in a new payload and returns the old one.
    pub fn replace_payload(&mut self, payload: V) -> Result<V, SubstateError> {
        let inner = self.inner_mut();
        check_writable(inner.lock_status, "field")?;
        Ok(mem::replace(&mut inner.payload, payload))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extension::basic::{basic_decode, basic_encode};

    #[test]
    fn test_field_bytes() {
        let field = FieldSubstate::new_unlocked(7u8);
        let bytes = basic_encode(&field).unwrap();
        assert_eq!(
            bytes,
            vec![
                0x22, 0x00, 0x01, // V1
                0x21, 0x02, // (payload, lock_status)
                0x07, 0x07, // payload
                0x22, 0x00, 0x00, // Unlocked
            ]
        );
        assert_eq!(basic_decode::<FieldSubstate<u8>>(&bytes).unwrap(), field);
    }

    #[test]
    fn test_replace_until_locked() {
        let mut field = FieldSubstate::new_unlocked(String::from("a"));
        assert_eq!(field.replace_payload("b".into()), Ok("a".into()));
        assert_eq!(field.payload(), "b");

        field.lock();
        assert!(field.is_locked());
        assert_eq!(field.replace_payload("c".into()), Err(SubstateError::Locked));
        assert_eq!(field.into_payload(), "b");
    }

    #[test]
    fn test_unknown_generation_rejected() {
        let bytes = [0x22, 0x01, 0x01, 0x21, 0x02, 0x07, 0x07, 0x22, 0x00, 0x00];
        assert_eq!(
            basic_decode::<FieldSubstate<u8>>(&bytes),
            Err(crate::error::DecodeError::UnknownDiscriminator(1))
        );
    }
}

use std::collections::BTreeMap;

use crate::codec::{Decode, Decoder, Encode, Encoder};
use crate::error::{DecodeError, EncodeError};
use crate::model::{Categorize, CustomValueKind, SborEnum, ValueKind};
use crate::schema::{CustomSchema, Describe, RustTypeId, TypeData, novel_type_id};

pub const LOCK_STATUS_UNLOCKED: u8 = 0;
pub const LOCK_STATUS_LOCKED: u8 = 1;

/// Whether a substate may still be written.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum LockStatus {
    #[default]
    Unlocked,
    Locked,
}

impl LockStatus {
    pub fn is_locked(&self) -> bool {
        matches!(self, LockStatus::Locked)
    }

    fn discriminator(&self) -> u8 {
        match self {
            LockStatus::Unlocked => LOCK_STATUS_UNLOCKED,
            LockStatus::Locked => LOCK_STATUS_LOCKED,
        }
    }
}

impl<X: CustomValueKind> Categorize<X> for LockStatus {
    #[inline]
    fn value_kind() -> ValueKind<X> {
        ValueKind::Enum
    }
}

impl<X: CustomValueKind> SborEnum<X> for LockStatus {
    fn get_discriminator(&self) -> u8 {
        self.discriminator()
    }

    fn get_length(&self) -> usize {
        0
    }
}

impl<X: CustomValueKind> Encode<X> for LockStatus {
    #[inline]
    fn encode_value_kind(&self, encoder: &mut Encoder<X>) -> Result<(), EncodeError> {
        encoder.write_value_kind(ValueKind::Enum)
    }

    fn encode_body(&self, encoder: &mut Encoder<X>) -> Result<(), EncodeError> {
        encoder.write_discriminator(self.discriminator())?;
        encoder.write_size(0)
    }
}

impl<X: CustomValueKind> Decode<X> for LockStatus {
    fn decode_body_with_value_kind(
        decoder: &mut Decoder<'_, X>,
        value_kind: ValueKind<X>,
    ) -> Result<Self, DecodeError> {
        decoder.check_preloaded_value_kind(value_kind, ValueKind::Enum)?;
        let status = match decoder.read_discriminator()? {
            LOCK_STATUS_UNLOCKED => LockStatus::Unlocked,
            LOCK_STATUS_LOCKED => LockStatus::Locked,
            other => return Err(DecodeError::UnknownDiscriminator(other)),
        };
        decoder.read_and_check_size(0)?;
        Ok(status)
    }
}

impl<X: CustomSchema> Describe<X> for LockStatus {
    fn type_id() -> RustTypeId {
        novel_type_id("LockStatus", &[])
    }

    fn type_data() -> TypeData<X, RustTypeId> {
        TypeData::enum_variants(
            "LockStatus",
            BTreeMap::from([
                (LOCK_STATUS_UNLOCKED, ("Unlocked", vec![])),
                (LOCK_STATUS_LOCKED, ("Locked", vec![])),
            ]),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extension::basic::{basic_decode, basic_encode};

    #[test]
    fn test_lock_status_bytes() {
        assert_eq!(basic_encode(&LockStatus::Unlocked).unwrap(), vec![0x22, 0x00, 0x00]);
        assert_eq!(basic_encode(&LockStatus::Locked).unwrap(), vec![0x22, 0x01, 0x00]);
        assert_eq!(basic_decode::<LockStatus>(&[0x22, 0x01, 0x00]).unwrap(), LockStatus::Locked);
    }

    #[test]
    fn test_lock_status_rejects_fields_and_unknown_variants() {
        assert_eq!(
            basic_decode::<LockStatus>(&[0x22, 0x02, 0x00]),
            Err(DecodeError::UnknownDiscriminator(2))
        );
        assert_eq!(
            basic_decode::<LockStatus>(&[0x22, 0x00, 0x01, 0x00, 0x00]),
            Err(DecodeError::UnexpectedSize {
                expected: 0,
                actual: 1,
            })
        );
    }
}

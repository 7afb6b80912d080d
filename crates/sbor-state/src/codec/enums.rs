//! Codec for `Option` and `Result`.

use crate::codec::{Decode, Decoder, Encode, Encoder};
use crate::error::{DecodeError, EncodeError};
use crate::model::{Categorize, CustomValueKind, SborEnum, ValueKind};

pub const OPTION_VARIANT_NONE: u8 = 0;
pub const OPTION_VARIANT_SOME: u8 = 1;
pub const RESULT_VARIANT_OK: u8 = 0;
pub const RESULT_VARIANT_ERR: u8 = 1;

impl<X: CustomValueKind, T> Categorize<X> for Option<T> {
    #[inline]
    fn value_kind() -> ValueKind<X> {
        ValueKind::Enum
    }
}

impl<X: CustomValueKind, T> SborEnum<X> for Option<T> {
    fn get_discriminator(&self) -> u8 {
        match self {
            None => OPTION_VARIANT_NONE,
            Some(_) => OPTION_VARIANT_SOME,
        }
    }

    fn get_length(&self) -> usize {
        match self {
            None => 0,
            Some(_) => 1,
        }
    }
}

impl<X: CustomValueKind, T: Encode<X>> Encode<X> for Option<T> {
    #[inline]
    fn encode_value_kind(&self, encoder: &mut Encoder<X>) -> Result<(), EncodeError> {
        encoder.write_value_kind(ValueKind::Enum)
    }

    fn encode_body(&self, encoder: &mut Encoder<X>) -> Result<(), EncodeError> {
        match self {
            None => {
                encoder.write_discriminator(OPTION_VARIANT_NONE)?;
                encoder.write_size(0)
            }
            Some(value) => {
                encoder.write_discriminator(OPTION_VARIANT_SOME)?;
                encoder.write_size(1)?;
                encoder.encode(value)
            }
        }
    }
}

impl<X: CustomValueKind, T: Decode<X>> Decode<X> for Option<T> {
    fn decode_body_with_value_kind(
        decoder: &mut Decoder<'_, X>,
        value_kind: ValueKind<X>,
    ) -> Result<Self, DecodeError> {
        decoder.check_preloaded_value_kind(value_kind, ValueKind::Enum)?;
        match decoder.read_discriminator()? {
            OPTION_VARIANT_NONE => {
                decoder.read_and_check_size(0)?;
                Ok(None)
            }
            OPTION_VARIANT_SOME => {
                decoder.read_and_check_size(1)?;
                Ok(Some(decoder.decode()?))
            }
            discriminator => Err(DecodeError::UnknownDiscriminator(discriminator)),
        }
    }
}

impl<X: CustomValueKind, T, E> Categorize<X> for Result<T, E> {
    #[inline]
    fn value_kind() -> ValueKind<X> {
        ValueKind::Enum
    }
}

impl<X: CustomValueKind, T, E> SborEnum<X> for Result<T, E> {
    fn get_discriminator(&self) -> u8 {
        match self {
            Ok(_) => RESULT_VARIANT_OK,
            Err(_) => RESULT_VARIANT_ERR,
        }
    }

    fn get_length(&self) -> usize {
        1
    }
}

impl<X: CustomValueKind, T: Encode<X>, E: Encode<X>> Encode<X> for Result<T, E> {
    #[inline]
    fn encode_value_kind(&self, encoder: &mut Encoder<X>) -> Result<(), EncodeError> {
        encoder.write_value_kind(ValueKind::Enum)
    }

    fn encode_body(&self, encoder: &mut Encoder<X>) -> Result<(), EncodeError> {
        match self {
            Ok(value) => {
                encoder.write_discriminator(RESULT_VARIANT_OK)?;
                encoder.write_size(1)?;
                encoder.encode(value)
            }
            Err(error) => {
                encoder.write_discriminator(RESULT_VARIANT_ERR)?;
                encoder.write_size(1)?;
                encoder.encode(error)
            }
        }
    }
}

impl<X: CustomValueKind, T: Decode<X>, E: Decode<X>> Decode<X> for Result<T, E> {
    fn decode_body_with_value_kind(
        decoder: &mut Decoder<'_, X>,
        value_kind: ValueKind<X>,
    ) -> Result<Self, DecodeError> {
        decoder.check_preloaded_value_kind(value_kind, ValueKind::Enum)?;
        match decoder.read_discriminator()? {
            RESULT_VARIANT_OK => {
                decoder.read_and_check_size(1)?;
                Ok(Ok(decoder.decode()?))
            }
            RESULT_VARIANT_ERR => {
                decoder.read_and_check_size(1)?;
                Ok(Err(decoder.decode()?))
            }
            discriminator => Err(DecodeError::UnknownDiscriminator(discriminator)),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::error::DecodeError;
    use crate::extension::basic::{basic_decode, basic_encode};

    #[test]
    fn test_option_bytes() {
        assert_eq!(basic_encode(&None::<u8>).unwrap(), vec![0x22, 0, 0]);
        assert_eq!(basic_encode(&Some(9u8)).unwrap(), vec![0x22, 1, 1, 0x07, 9]);
        assert_eq!(basic_decode::<Option<u8>>(&[0x22, 1, 1, 0x07, 9]).unwrap(), Some(9));
    }

    #[test]
    fn test_result_roundtrip() {
        let ok: Result<u32, String> = Ok(3);
        let err: Result<u32, String> = Err("no".into());
        for value in [ok, err] {
            let bytes = basic_encode(&value).unwrap();
            assert_eq!(basic_decode::<Result<u32, String>>(&bytes).unwrap(), value);
        }
    }

    #[test]
    fn test_unknown_discriminator() {
        assert_eq!(
            basic_decode::<Option<u8>>(&[0x22, 2, 0]),
            Err(DecodeError::UnknownDiscriminator(2))
        );
    }

    #[test]
    fn test_none_with_fields_rejected() {
        assert_eq!(
            basic_decode::<Option<u8>>(&[0x22, 0, 1, 0x07, 9]),
            Err(DecodeError::UnexpectedSize {
                expected: 0,
                actual: 1,
            })
        );
    }
}

//! Codec for scalars, strings and pointer-like wrappers.

use crate::codec::{Decode, Decoder, Encode, Encoder};
use crate::error::{DecodeError, EncodeError};
use crate::model::{Categorize, CustomValueKind, ValueKind};

impl<X: CustomValueKind> Categorize<X> for () {
    #[inline]
    fn value_kind() -> ValueKind<X> {
        ValueKind::Unit
    }
}

impl<X: CustomValueKind> Encode<X> for () {
    #[inline]
    fn encode_value_kind(&self, encoder: &mut Encoder<X>) -> Result<(), EncodeError> {
        encoder.write_value_kind(ValueKind::Unit)
    }

    #[inline]
    fn encode_body(&self, encoder: &mut Encoder<X>) -> Result<(), EncodeError> {
        encoder.write_byte(0)
    }
}

impl<X: CustomValueKind> Decode<X> for () {
    fn decode_body_with_value_kind(
        decoder: &mut Decoder<'_, X>,
        value_kind: ValueKind<X>,
    ) -> Result<Self, DecodeError> {
        decoder.check_preloaded_value_kind(value_kind, ValueKind::Unit)?;
        match decoder.read_byte()? {
            0 => Ok(()),
            byte => Err(DecodeError::InvalidUnit(byte)),
        }
    }
}

impl<X: CustomValueKind> Categorize<X> for bool {
    #[inline]
    fn value_kind() -> ValueKind<X> {
        ValueKind::Bool
    }
}

impl<X: CustomValueKind> Encode<X> for bool {
    #[inline]
    fn encode_value_kind(&self, encoder: &mut Encoder<X>) -> Result<(), EncodeError> {
        encoder.write_value_kind(ValueKind::Bool)
    }

    #[inline]
    fn encode_body(&self, encoder: &mut Encoder<X>) -> Result<(), EncodeError> {
        encoder.write_byte(u8::from(*self))
    }
}

impl<X: CustomValueKind> Decode<X> for bool {
    fn decode_body_with_value_kind(
        decoder: &mut Decoder<'_, X>,
        value_kind: ValueKind<X>,
    ) -> Result<Self, DecodeError> {
        decoder.check_preloaded_value_kind(value_kind, ValueKind::Bool)?;
        match decoder.read_byte()? {
            0 => Ok(false),
            1 => Ok(true),
            byte => Err(DecodeError::InvalidBool(byte)),
        }
    }
}

macro_rules! impl_int {
    ($type:ty, $kind:ident) => {
        impl<X: CustomValueKind> Categorize<X> for $type {
            #[inline]
            fn value_kind() -> ValueKind<X> {
                ValueKind::$kind
            }
        }

        impl<X: CustomValueKind> Encode<X> for $type {
            #[inline]
            fn encode_value_kind(&self, encoder: &mut Encoder<X>) -> Result<(), EncodeError> {
                encoder.write_value_kind(ValueKind::$kind)
            }

            #[inline]
            fn encode_body(&self, encoder: &mut Encoder<X>) -> Result<(), EncodeError> {
                encoder.write_slice(&self.to_le_bytes())
            }
        }

        impl<X: CustomValueKind> Decode<X> for $type {
            fn decode_body_with_value_kind(
                decoder: &mut Decoder<'_, X>,
                value_kind: ValueKind<X>,
            ) -> Result<Self, DecodeError> {
                decoder.check_preloaded_value_kind(value_kind, ValueKind::$kind)?;
                let bytes = decoder.read_array::<{ std::mem::size_of::<$type>() }>()?;
                Ok(<$type>::from_le_bytes(bytes))
            }
        }
    };
}

impl_int!(i8, I8);
impl_int!(i16, I16);
impl_int!(i32, I32);
impl_int!(i64, I64);
impl_int!(i128, I128);
impl_int!(u8, U8);
impl_int!(u16, U16);
impl_int!(u32, U32);
impl_int!(u64, U64);
impl_int!(u128, U128);

impl<X: CustomValueKind> Categorize<X> for str {
    #[inline]
    fn value_kind() -> ValueKind<X> {
        ValueKind::String
    }
}

impl<X: CustomValueKind> Encode<X> for str {
    #[inline]
    fn encode_value_kind(&self, encoder: &mut Encoder<X>) -> Result<(), EncodeError> {
        encoder.write_value_kind(ValueKind::String)
    }

    #[inline]
    fn encode_body(&self, encoder: &mut Encoder<X>) -> Result<(), EncodeError> {
        encoder.write_size(self.len())?;
        encoder.write_slice(self.as_bytes())
    }
}

impl<X: CustomValueKind> Categorize<X> for String {
    #[inline]
    fn value_kind() -> ValueKind<X> {
        ValueKind::String
    }
}

impl<X: CustomValueKind> Encode<X> for String {
    #[inline]
    fn encode_value_kind(&self, encoder: &mut Encoder<X>) -> Result<(), EncodeError> {
        encoder.write_value_kind(ValueKind::String)
    }

    #[inline]
    fn encode_body(&self, encoder: &mut Encoder<X>) -> Result<(), EncodeError> {
        self.as_str().encode_body(encoder)
    }
}

impl<X: CustomValueKind> Decode<X> for String {
    fn decode_body_with_value_kind(
        decoder: &mut Decoder<'_, X>,
        value_kind: ValueKind<X>,
    ) -> Result<Self, DecodeError> {
        decoder.check_preloaded_value_kind(value_kind, ValueKind::String)?;
        let len = decoder.read_size()?;
        let bytes = decoder.read_slice(len)?;
        // Validate UTF-8 on the borrowed slice, then allocate once
        std::str::from_utf8(bytes)
            .map(|s| s.to_string())
            .map_err(|_| DecodeError::InvalidUtf8)
    }
}

impl<X: CustomValueKind, T: Categorize<X> + ?Sized> Categorize<X> for &T {
    #[inline]
    fn value_kind() -> ValueKind<X> {
        T::value_kind()
    }
}

impl<X: CustomValueKind, T: Encode<X> + ?Sized> Encode<X> for &T {
    #[inline]
    fn encode_value_kind(&self, encoder: &mut Encoder<X>) -> Result<(), EncodeError> {
        (*self).encode_value_kind(encoder)
    }

    #[inline]
    fn encode_body(&self, encoder: &mut Encoder<X>) -> Result<(), EncodeError> {
        (*self).encode_body(encoder)
    }
}

impl<X: CustomValueKind, T: Categorize<X> + ?Sized> Categorize<X> for Box<T> {
    #[inline]
    fn value_kind() -> ValueKind<X> {
        T::value_kind()
    }
}

impl<X: CustomValueKind, T: Encode<X> + ?Sized> Encode<X> for Box<T> {
    #[inline]
    fn encode_value_kind(&self, encoder: &mut Encoder<X>) -> Result<(), EncodeError> {
        self.as_ref().encode_value_kind(encoder)
    }

    #[inline]
    fn encode_body(&self, encoder: &mut Encoder<X>) -> Result<(), EncodeError> {
        self.as_ref().encode_body(encoder)
    }
}

impl<X: CustomValueKind, T: Decode<X>> Decode<X> for Box<T> {
    fn decode_body_with_value_kind(
        decoder: &mut Decoder<'_, X>,
        value_kind: ValueKind<X>,
    ) -> Result<Self, DecodeError> {
        T::decode_body_with_value_kind(decoder, value_kind).map(Box::new)
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use crate::error::DecodeError;
    use crate::extension::basic::{basic_decode, basic_encode};

    #[test]
    fn test_scalar_bytes() {
        assert_eq!(basic_encode(&()).unwrap(), vec![0x00, 0x00]);
        assert_eq!(basic_encode(&true).unwrap(), vec![0x01, 0x01]);
        assert_eq!(basic_encode(&1i16).unwrap(), vec![0x03, 0x01, 0x00]);
        assert_eq!(basic_encode(&1u32).unwrap(), vec![0x09, 0x01, 0x00, 0x00, 0x00]);
        assert_eq!(
            basic_encode(&"hello").unwrap(),
            vec![0x0c, 5, b'h', b'e', b'l', b'l', b'o']
        );
    }

    #[test]
    fn test_invalid_unit_and_bool() {
        assert_eq!(basic_decode::<()>(&[0x00, 0x01]), Err(DecodeError::InvalidUnit(1)));
        assert_eq!(basic_decode::<bool>(&[0x01, 0x02]), Err(DecodeError::InvalidBool(2)));
    }

    #[test]
    fn test_invalid_utf8() {
        let result = basic_decode::<String>(&[0x0c, 2, 0xff, 0xfe]);
        assert_eq!(result, Err(DecodeError::InvalidUtf8));
    }

    #[test]
    fn test_truncated_int() {
        let result = basic_decode::<u64>(&[0x0a, 1, 0, 0]);
        assert_eq!(
            result,
            Err(DecodeError::BufferUnderflow {
                required: 8,
                remaining: 3,
            })
        );
    }

    #[test]
    fn test_tag_mismatch_is_not_coerced() {
        let bytes = basic_encode(&7u32).unwrap();
        assert_eq!(
            basic_decode::<u64>(&bytes),
            Err(DecodeError::UnexpectedValueKind {
                expected: 0x0a,
                actual: 0x09,
            })
        );
        assert_eq!(
            basic_decode::<i32>(&bytes),
            Err(DecodeError::UnexpectedValueKind {
                expected: 0x04,
                actual: 0x09,
            })
        );
    }

    #[test]
    fn test_box_is_transparent() {
        let bytes = basic_encode(&Box::new(5u8)).unwrap();
        assert_eq!(bytes, vec![0x07, 5]);
        assert_eq!(basic_decode::<Box<u8>>(&bytes).unwrap(), Box::new(5u8));
    }

    proptest! {
        #[test]
        fn prop_i128_roundtrip(v in any::<i128>()) {
            let bytes = basic_encode(&v).unwrap();
            prop_assert_eq!(basic_decode::<i128>(&bytes).unwrap(), v);
        }

        #[test]
        fn prop_u16_roundtrip(v in any::<u16>()) {
            let bytes = basic_encode(&v).unwrap();
            prop_assert_eq!(basic_decode::<u16>(&bytes).unwrap(), v);
        }

        #[test]
        fn prop_string_roundtrip(s in ".*") {
            let bytes = basic_encode(&s).unwrap();
            prop_assert_eq!(basic_decode::<String>(&bytes).unwrap(), s);
        }
    }
}

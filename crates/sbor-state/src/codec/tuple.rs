//! Codec for Rust tuples, which encode as SBOR tuples with tagged fields.

use crate::codec::{Decode, Decoder, Encode, Encoder};
use crate::error::{DecodeError, EncodeError};
use crate::model::{Categorize, CustomValueKind, SborTuple, ValueKind};

macro_rules! impl_tuple {
    ($n:tt $($idx:tt $name:ident)+) => {
        impl<X: CustomValueKind, $($name),+> Categorize<X> for ($($name,)+) {
            #[inline]
            fn value_kind() -> ValueKind<X> {
                ValueKind::Tuple
            }
        }

        impl<X: CustomValueKind, $($name),+> SborTuple<X> for ($($name,)+) {
            #[inline]
            fn get_length(&self) -> usize {
                $n
            }
        }

        impl<X: CustomValueKind, $($name: Encode<X>),+> Encode<X> for ($($name,)+) {
            #[inline]
            fn encode_value_kind(&self, encoder: &mut Encoder<X>) -> Result<(), EncodeError> {
                encoder.write_value_kind(ValueKind::Tuple)
            }

            fn encode_body(&self, encoder: &mut Encoder<X>) -> Result<(), EncodeError> {
                encoder.write_size($n)?;
                $(encoder.encode(&self.$idx)?;)+
                Ok(())
            }
        }

        impl<X: CustomValueKind, $($name: Decode<X>),+> Decode<X> for ($($name,)+) {
            fn decode_body_with_value_kind(
                decoder: &mut Decoder<'_, X>,
                value_kind: ValueKind<X>,
            ) -> Result<Self, DecodeError> {
                decoder.check_preloaded_value_kind(value_kind, ValueKind::Tuple)?;
                decoder.read_and_check_size($n)?;
                Ok(($(decoder.decode::<$name>()?,)+))
            }
        }
    };
}

impl_tuple!(1 0 A);
impl_tuple!(2 0 A 1 B);
impl_tuple!(3 0 A 1 B 2 C);
impl_tuple!(4 0 A 1 B 2 C 3 D);
impl_tuple!(5 0 A 1 B 2 C 3 D 4 E);
impl_tuple!(6 0 A 1 B 2 C 3 D 4 E 5 F);
impl_tuple!(7 0 A 1 B 2 C 3 D 4 E 5 F 6 G);
impl_tuple!(8 0 A 1 B 2 C 3 D 4 E 5 F 6 G 7 H);
impl_tuple!(9 0 A 1 B 2 C 3 D 4 E 5 F 6 G 7 H 8 I);
impl_tuple!(10 0 A 1 B 2 C 3 D 4 E 5 F 6 G 7 H 8 I 9 J);

#[cfg(test)]
mod tests {
    use crate::error::DecodeError;
    use crate::extension::basic::{basic_decode, basic_encode};

    #[test]
    fn test_tuple_bytes() {
        let bytes = basic_encode(&(1u8, String::from("a"))).unwrap();
        assert_eq!(bytes, vec![0x21, 2, 0x07, 1, 0x0c, 1, b'a']);
        assert_eq!(
            basic_decode::<(u8, String)>(&bytes).unwrap(),
            (1u8, String::from("a"))
        );
    }

    #[test]
    fn test_tuple_arity_checked() {
        let bytes = basic_encode(&(1u8, 2u8, 3u8)).unwrap();
        assert_eq!(
            basic_decode::<(u8, u8)>(&bytes),
            Err(DecodeError::UnexpectedSize {
                expected: 2,
                actual: 3,
            })
        );
    }
}

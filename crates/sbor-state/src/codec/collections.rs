//! Codec for arrays, sets and maps.
//!
//! Element kinds are written once in the container header and every decoded
//! collection checks the header against the Rust element type before reading
//! any element. Declared lengths never drive allocation beyond the bytes that
//! are actually left in the input.

use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};

use crate::codec::{Decode, Decoder, Encode, Encoder};
use crate::error::{DecodeError, EncodeError};
use crate::model::{Categorize, CustomValueKind, ValueKind};

/// Reads an array header and checks the element kind against `T`.
fn read_array_header<X: CustomValueKind, T: Categorize<X>>(
    decoder: &mut Decoder<'_, X>,
) -> Result<(ValueKind<X>, usize), DecodeError> {
    let element_value_kind = decoder.read_and_check_value_kind(T::value_kind())?;
    let len = decoder.read_size()?;
    Ok((element_value_kind, len))
}

fn encode_elements<'a, X, T, I>(encoder: &mut Encoder<X>, len: usize, iter: I) -> Result<(), EncodeError>
where
    X: CustomValueKind,
    T: Encode<X> + Categorize<X> + 'a,
    I: Iterator<Item = &'a T>,
{
    encoder.write_value_kind(T::value_kind())?;
    encoder.write_size(len)?;
    for element in iter {
        encoder.encode_deeper_body(element)?;
    }
    Ok(())
}

// =============================================================================
// ARRAYS
// =============================================================================

impl<X: CustomValueKind, T> Categorize<X> for [T] {
    #[inline]
    fn value_kind() -> ValueKind<X> {
        ValueKind::Array
    }
}

impl<X: CustomValueKind, T: Encode<X> + Categorize<X>> Encode<X> for [T] {
    #[inline]
    fn encode_value_kind(&self, encoder: &mut Encoder<X>) -> Result<(), EncodeError> {
        encoder.write_value_kind(ValueKind::Array)
    }

    fn encode_body(&self, encoder: &mut Encoder<X>) -> Result<(), EncodeError> {
        encode_elements(encoder, self.len(), self.iter())
    }
}

impl<X: CustomValueKind, T> Categorize<X> for Vec<T> {
    #[inline]
    fn value_kind() -> ValueKind<X> {
        ValueKind::Array
    }
}

impl<X: CustomValueKind, T: Encode<X> + Categorize<X>> Encode<X> for Vec<T> {
    #[inline]
    fn encode_value_kind(&self, encoder: &mut Encoder<X>) -> Result<(), EncodeError> {
        encoder.write_value_kind(ValueKind::Array)
    }

    #[inline]
    fn encode_body(&self, encoder: &mut Encoder<X>) -> Result<(), EncodeError> {
        self.as_slice().encode_body(encoder)
    }
}

impl<X: CustomValueKind, T: Decode<X> + Categorize<X>> Decode<X> for Vec<T> {
    fn decode_body_with_value_kind(
        decoder: &mut Decoder<'_, X>,
        value_kind: ValueKind<X>,
    ) -> Result<Self, DecodeError> {
        decoder.check_preloaded_value_kind(value_kind, ValueKind::Array)?;
        let (element_value_kind, len) = read_array_header::<X, T>(decoder)?;
        // Every element takes at least one byte
        let mut elements = Vec::with_capacity(len.min(decoder.remaining_len()));
        for _ in 0..len {
            elements.push(decoder.decode_deeper_body_with_value_kind(element_value_kind)?);
        }
        Ok(elements)
    }
}

impl<X: CustomValueKind, T, const N: usize> Categorize<X> for [T; N] {
    #[inline]
    fn value_kind() -> ValueKind<X> {
        ValueKind::Array
    }
}

impl<X: CustomValueKind, T: Encode<X> + Categorize<X>, const N: usize> Encode<X> for [T; N] {
    #[inline]
    fn encode_value_kind(&self, encoder: &mut Encoder<X>) -> Result<(), EncodeError> {
        encoder.write_value_kind(ValueKind::Array)
    }

    #[inline]
    fn encode_body(&self, encoder: &mut Encoder<X>) -> Result<(), EncodeError> {
        self.as_slice().encode_body(encoder)
    }
}

impl<X: CustomValueKind, T: Decode<X> + Categorize<X>, const N: usize> Decode<X> for [T; N] {
    fn decode_body_with_value_kind(
        decoder: &mut Decoder<'_, X>,
        value_kind: ValueKind<X>,
    ) -> Result<Self, DecodeError> {
        decoder.check_preloaded_value_kind(value_kind, ValueKind::Array)?;
        let (element_value_kind, len) = read_array_header::<X, T>(decoder)?;
        if len != N {
            return Err(DecodeError::UnexpectedSize {
                expected: N,
                actual: len,
            });
        }
        let mut elements = Vec::with_capacity(N);
        for _ in 0..N {
            elements.push(decoder.decode_deeper_body_with_value_kind(element_value_kind)?);
        }
        elements.try_into().map_err(|_| DecodeError::UnexpectedSize {
            expected: N,
            actual: len,
        })
    }
}

// =============================================================================
// SETS
// =============================================================================

impl<X: CustomValueKind, T> Categorize<X> for BTreeSet<T> {
    #[inline]
    fn value_kind() -> ValueKind<X> {
        ValueKind::Array
    }
}

impl<X: CustomValueKind, T: Encode<X> + Categorize<X>> Encode<X> for BTreeSet<T> {
    #[inline]
    fn encode_value_kind(&self, encoder: &mut Encoder<X>) -> Result<(), EncodeError> {
        encoder.write_value_kind(ValueKind::Array)
    }

    fn encode_body(&self, encoder: &mut Encoder<X>) -> Result<(), EncodeError> {
        encode_elements(encoder, self.len(), self.iter())
    }
}

impl<X: CustomValueKind, T: Decode<X> + Categorize<X> + Ord> Decode<X> for BTreeSet<T> {
    fn decode_body_with_value_kind(
        decoder: &mut Decoder<'_, X>,
        value_kind: ValueKind<X>,
    ) -> Result<Self, DecodeError> {
        decoder.check_preloaded_value_kind(value_kind, ValueKind::Array)?;
        let (element_value_kind, len) = read_array_header::<X, T>(decoder)?;
        let mut set = BTreeSet::new();
        for _ in 0..len {
            let element: T = decoder.decode_deeper_body_with_value_kind(element_value_kind)?;
            if let Some(last) = set.last() {
                check_key_order(last, &element)?;
            }
            set.insert(element);
        }
        Ok(set)
    }
}

// =============================================================================
// MAPS
// =============================================================================

impl<X: CustomValueKind, K, V> Categorize<X> for BTreeMap<K, V> {
    #[inline]
    fn value_kind() -> ValueKind<X> {
        ValueKind::Map
    }
}

impl<X, K, V> Encode<X> for BTreeMap<K, V>
where
    X: CustomValueKind,
    K: Encode<X> + Categorize<X>,
    V: Encode<X> + Categorize<X>,
{
    #[inline]
    fn encode_value_kind(&self, encoder: &mut Encoder<X>) -> Result<(), EncodeError> {
        encoder.write_value_kind(ValueKind::Map)
    }

    fn encode_body(&self, encoder: &mut Encoder<X>) -> Result<(), EncodeError> {
        encoder.write_value_kind(K::value_kind())?;
        encoder.write_value_kind(V::value_kind())?;
        encoder.write_size(self.len())?;
        for (key, value) in self {
            encoder.encode_deeper_body(key)?;
            encoder.encode_deeper_body(value)?;
        }
        Ok(())
    }
}

impl<X, K, V> Decode<X> for BTreeMap<K, V>
where
    X: CustomValueKind,
    K: Decode<X> + Categorize<X> + Ord,
    V: Decode<X> + Categorize<X>,
{
    fn decode_body_with_value_kind(
        decoder: &mut Decoder<'_, X>,
        value_kind: ValueKind<X>,
    ) -> Result<Self, DecodeError> {
        decoder.check_preloaded_value_kind(value_kind, ValueKind::Map)?;
        let key_value_kind = decoder.read_and_check_value_kind(K::value_kind())?;
        let value_value_kind = decoder.read_and_check_value_kind(V::value_kind())?;
        let len = decoder.read_size()?;
        let mut map = BTreeMap::new();
        for _ in 0..len {
            let key: K = decoder.decode_deeper_body_with_value_kind(key_value_kind)?;
            if let Some((last, _)) = map.last_key_value() {
                check_key_order(last, &key)?;
            }
            let value = decoder.decode_deeper_body_with_value_kind(value_value_kind)?;
            map.insert(key, value);
        }
        Ok(map)
    }
}

/// Keys are stored in ascending order, so each one must exceed its predecessor.
fn check_key_order<K: Ord>(previous: &K, next: &K) -> Result<(), DecodeError> {
    match previous.cmp(next) {
        Ordering::Less => Ok(()),
        Ordering::Equal => Err(DecodeError::DuplicateKey),
        Ordering::Greater => Err(DecodeError::UnorderedKeys),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::{BTreeMap, BTreeSet};

    use proptest::prelude::*;

    use crate::error::DecodeError;
    use crate::extension::basic::{basic_decode, basic_encode};

    #[test]
    fn test_vec_bytes() {
        let bytes = basic_encode(&vec![1u16, 2]).unwrap();
        assert_eq!(bytes, vec![0x20, 0x08, 2, 1, 0, 2, 0]);
    }

    #[test]
    fn test_empty_vec() {
        let bytes = basic_encode(&Vec::<String>::new()).unwrap();
        assert_eq!(bytes, vec![0x20, 0x0c, 0]);
        assert!(basic_decode::<Vec<String>>(&bytes).unwrap().is_empty());
    }

    #[test]
    fn test_element_kind_checked() {
        let bytes = basic_encode(&vec![1u16, 2]).unwrap();
        assert_eq!(
            basic_decode::<Vec<u32>>(&bytes),
            Err(DecodeError::UnexpectedValueKind {
                expected: 0x09,
                actual: 0x08,
            })
        );
    }

    #[test]
    fn test_huge_declared_length_does_not_allocate() {
        // Declares 0x0FFFFFFF u8 elements but carries none
        let bytes = [0x20, 0x07, 0xff, 0xff, 0xff, 0x7f];
        assert!(matches!(
            basic_decode::<Vec<u8>>(&bytes),
            Err(DecodeError::BufferUnderflow { .. })
        ));
    }

    #[test]
    fn test_fixed_array_length() {
        let bytes = basic_encode(&[1u8, 2, 3]).unwrap();
        assert_eq!(basic_decode::<[u8; 3]>(&bytes).unwrap(), [1, 2, 3]);
        assert_eq!(
            basic_decode::<[u8; 4]>(&bytes),
            Err(DecodeError::UnexpectedSize {
                expected: 4,
                actual: 3,
            })
        );
    }

    #[test]
    fn test_set_rejects_duplicates() {
        let bytes = basic_encode(&vec![7u8, 7]).unwrap();
        assert_eq!(
            basic_decode::<BTreeSet<u8>>(&bytes),
            Err(DecodeError::DuplicateKey)
        );
    }

    #[test]
    fn test_map_bytes_and_duplicates() {
        let mut map = BTreeMap::new();
        map.insert(1u8, true);
        let bytes = basic_encode(&map).unwrap();
        assert_eq!(bytes, vec![0x23, 0x07, 0x01, 1, 1, 1]);

        let duplicated = [0x23, 0x07, 0x01, 2, 1, 1, 1, 0];
        assert_eq!(
            basic_decode::<BTreeMap<u8, bool>>(&duplicated),
            Err(DecodeError::DuplicateKey)
        );
    }

    #[test]
    fn test_map_rejects_unordered_keys() {
        // Keys 2 then 1
        let bytes = [0x23, 0x07, 0x07, 2, 2, 20, 1, 10];
        assert_eq!(
            basic_decode::<BTreeMap<u8, u8>>(&bytes),
            Err(DecodeError::UnorderedKeys)
        );

        let sorted = [0x23, 0x07, 0x07, 2, 1, 10, 2, 20];
        let map = basic_decode::<BTreeMap<u8, u8>>(&sorted).unwrap();
        assert_eq!(basic_encode(&map).unwrap(), sorted.to_vec());
    }

    #[test]
    fn test_set_rejects_unordered_elements() {
        let bytes = basic_encode(&vec![3u16, 1]).unwrap();
        assert_eq!(
            basic_decode::<BTreeSet<u16>>(&bytes),
            Err(DecodeError::UnorderedKeys)
        );
        // The same elements as a list keep their order
        assert_eq!(basic_decode::<Vec<u16>>(&bytes).unwrap(), vec![3, 1]);
    }

    proptest! {
        #[test]
        fn prop_map_roundtrip(map in prop::collection::btree_map(any::<u32>(), ".{0,8}", 0..16)) {
            let bytes = basic_encode(&map).unwrap();
            prop_assert_eq!(basic_decode::<BTreeMap<u32, String>>(&bytes).unwrap(), map);
        }

        #[test]
        fn prop_nested_vec_roundtrip(v in prop::collection::vec(prop::collection::vec(any::<i64>(), 0..4), 0..8)) {
            let bytes = basic_encode(&v).unwrap();
            prop_assert_eq!(basic_decode::<Vec<Vec<i64>>>(&bytes).unwrap(), v);
        }
    }
}

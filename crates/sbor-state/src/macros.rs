//! Codec impls for plain structs.

/// Implements `Categorize`, `SborTuple`, `Encode`, `Decode` and `Describe`
/// for a struct with named fields. The struct encodes as a tuple of its
/// fields in declaration order; field names only appear in the schema.
///
/// Without a leading kind the impls are generic over every extension, which
/// requires every field to be. With one (`LedgerCustomValueKind; Name {..}`)
/// they are for that extension only.
///
/// ```
/// use sbor_state::impl_codec_for_struct;
/// use sbor_state::extension::basic::{basic_decode, basic_encode};
///
/// #[derive(Debug, PartialEq)]
/// struct Point {
///     x: i32,
///     y: i32,
/// }
/// impl_codec_for_struct!(Point { x: i32, y: i32 });
///
/// let bytes = basic_encode(&Point { x: 1, y: -1 }).unwrap();
/// assert_eq!(basic_decode::<Point>(&bytes).unwrap(), Point { x: 1, y: -1 });
/// ```
#[macro_export]
macro_rules! impl_codec_for_struct {
    (@impl [$($generics:tt)*] [$kind:ty] $name:ident { $($field:ident : $field_type:ty),* }) => {
        impl<$($generics)*> $crate::model::Categorize<$kind> for $name {
            #[inline]
            fn value_kind() -> $crate::model::ValueKind<$kind> {
                $crate::model::ValueKind::Tuple
            }
        }

        impl<$($generics)*> $crate::model::SborTuple<$kind> for $name {
            fn get_length(&self) -> usize {
                <[&str]>::len(&[$(stringify!($field)),*])
            }
        }

        impl<$($generics)*> $crate::codec::Encode<$kind> for $name {
            #[inline]
            fn encode_value_kind(
                &self,
                encoder: &mut $crate::codec::Encoder<$kind>,
            ) -> ::core::result::Result<(), $crate::error::EncodeError> {
                encoder.write_value_kind($crate::model::ValueKind::Tuple)
            }

            fn encode_body(
                &self,
                encoder: &mut $crate::codec::Encoder<$kind>,
            ) -> ::core::result::Result<(), $crate::error::EncodeError> {
                encoder.write_size(<[&str]>::len(&[$(stringify!($field)),*]))?;
                $(encoder.encode(&self.$field)?;)*
                ::core::result::Result::Ok(())
            }
        }

        impl<$($generics)*> $crate::codec::Decode<$kind> for $name {
            fn decode_body_with_value_kind(
                decoder: &mut $crate::codec::Decoder<'_, $kind>,
                value_kind: $crate::model::ValueKind<$kind>,
            ) -> ::core::result::Result<Self, $crate::error::DecodeError> {
                decoder.check_preloaded_value_kind(value_kind, $crate::model::ValueKind::Tuple)?;
                decoder.read_and_check_size(<[&str]>::len(&[$(stringify!($field)),*]))?;
                ::core::result::Result::Ok(Self {
                    $($field: decoder.decode()?,)*
                })
            }
        }

        impl<$($generics)*> $crate::schema::Describe<$kind> for $name {
            fn type_id() -> $crate::schema::RustTypeId {
                $crate::schema::novel_type_id(
                    concat!(module_path!(), "::", stringify!($name)),
                    &[],
                )
            }

            fn type_data() -> $crate::schema::TypeData<$kind, $crate::schema::RustTypeId> {
                $crate::schema::TypeData::struct_with_named_fields(
                    stringify!($name),
                    vec![$((
                        stringify!($field),
                        <$field_type as $crate::schema::Describe<$kind>>::type_id(),
                    )),*],
                )
            }

            fn add_all_dependencies(aggregator: &mut $crate::schema::TypeAggregator<$kind>) {
                $(aggregator.add_child_type_and_descendents::<$field_type>();)*
            }
        }
    };
    ($name:ident { $($field:ident : $field_type:ty),* $(,)? }) => {
        $crate::impl_codec_for_struct!(
            @impl [X: $crate::schema::CustomSchema] [X] $name { $($field: $field_type),* }
        );
    };
    ($kind:ty; $name:ident { $($field:ident : $field_type:ty),* $(,)? }) => {
        $crate::impl_codec_for_struct!(@impl [] [$kind] $name { $($field: $field_type),* });
    };
}

#[cfg(test)]
mod tests {
    use crate::error::DecodeError;
    use crate::extension::basic::{NoCustomValueKind, basic_decode, basic_encode};
    use crate::extension::ledger::{Decimal, LedgerCustomValueKind, ledger_decode, ledger_encode};
    use crate::schema::{TypeKind, generate_full_schema_from_single_type};

    #[derive(Debug, Clone, PartialEq, Eq)]
    struct Account {
        owner: String,
        nonce: u32,
    }
    crate::impl_codec_for_struct!(Account { owner: String, nonce: u32 });

    #[derive(Debug, Clone, PartialEq, Eq)]
    struct Tree {
        label: u8,
        children: Vec<Tree>,
    }
    crate::impl_codec_for_struct!(Tree { label: u8, children: Vec<Tree> });

    #[derive(Debug, Clone, PartialEq, Eq)]
    struct Balance {
        amount: Decimal,
    }
    crate::impl_codec_for_struct!(LedgerCustomValueKind; Balance { amount: Decimal });

    #[test]
    fn test_struct_is_a_tuple() {
        let account = Account {
            owner: "ab".into(),
            nonce: 1,
        };
        let bytes = basic_encode(&account).unwrap();
        assert_eq!(
            bytes,
            vec![0x21, 0x02, 0x0c, 0x02, b'a', b'b', 0x09, 0x01, 0x00, 0x00, 0x00]
        );
        assert_eq!(basic_decode::<Account>(&bytes).unwrap(), account);
        assert_eq!(basic_decode::<(String, u32)>(&bytes).unwrap(), ("ab".into(), 1));
    }

    #[test]
    fn test_field_count_checked() {
        let bytes = basic_encode(&(String::from("ab"), 1u32, true)).unwrap();
        assert_eq!(
            basic_decode::<Account>(&bytes),
            Err(DecodeError::UnexpectedSize {
                expected: 2,
                actual: 3,
            })
        );
    }

    #[test]
    fn test_recursive_struct() {
        let tree = Tree {
            label: 1,
            children: vec![Tree {
                label: 2,
                children: vec![],
            }],
        };
        let bytes = basic_encode(&tree).unwrap();
        assert_eq!(basic_decode::<Tree>(&bytes).unwrap(), tree);

        let (index, schema) = generate_full_schema_from_single_type::<Tree, NoCustomValueKind>().unwrap();
        let metadata = schema.resolve_type_metadata(index).unwrap();
        assert_eq!(metadata.get_name(), Some("Tree"));
        assert_eq!(metadata.get_field_name(1), Some("children"));
    }

    #[test]
    fn test_extension_specific_struct() {
        let balance = Balance {
            amount: Decimal::from(3u64),
        };
        let bytes = ledger_encode(&balance).unwrap();
        assert_eq!(ledger_decode::<Balance>(&bytes).unwrap(), balance);

        let (index, schema) =
            generate_full_schema_from_single_type::<Balance, LedgerCustomValueKind>().unwrap();
        match schema.resolve_type_kind(index).unwrap().as_ref() {
            TypeKind::Tuple { field_types } => assert_eq!(field_types.len(), 1),
            other => panic!("expected tuple, got {other:?}"),
        }
    }
}

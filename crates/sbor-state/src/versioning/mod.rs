//! Content versioning.
//!
//! A versioned type is an enum with one variant per generation of a record.
//! Decoding always yields the variant that was stored; upgrading to the
//! latest generation is a separate, explicit call. This keeps bytes that are
//! read back and re-encoded identical to what was hashed.

/// An enum over the generations of one logical record.
pub trait Versioned: Sized {
    /// The newest generation.
    type Latest;

    /// The enum discriminator of the stored generation.
    fn discriminator(&self) -> u8;

    /// Variant name of the stored generation, e.g. `"V1"`.
    fn version_name(&self) -> &'static str;

    fn is_fully_updated(&self) -> bool;

    /// Upgrades in place to the latest generation.
    fn fully_update(self) -> Self {
        Self::from_latest(self.into_latest())
    }

    /// Upgrades to the latest generation, one step at a time.
    fn into_latest(self) -> Self::Latest;

    /// The latest generation, if that is what is stored.
    fn as_latest_ref(&self) -> Option<&Self::Latest>;

    fn from_latest(latest: Self::Latest) -> Self;
}

/// Conversion of a record generation (or the versioned enum itself) into
/// its versioned enum.
pub trait IntoVersioned: Sized {
    type Versioned: Versioned;

    fn into_versioned(self) -> Self::Versioned;
}

/// Declares a versioned enum.
///
/// Every previous version names the variant it upgrades to, and needs a
/// `From` impl from its type to that variant's type. Discriminators are
/// given explicitly and are part of the wire format.
///
/// ```
/// use sbor_state::{define_versioned, impl_codec_for_struct};
/// use sbor_state::versioning::Versioned;
///
/// #[derive(Debug, Clone, PartialEq, Eq)]
/// pub struct RecordV1 {
///     pub amount: u64,
/// }
/// impl_codec_for_struct!(RecordV1 { amount: u64 });
///
/// #[derive(Debug, Clone, PartialEq, Eq)]
/// pub struct RecordV2 {
///     pub amount: u64,
///     pub memo: String,
/// }
/// impl_codec_for_struct!(RecordV2 { amount: u64, memo: String });
///
/// impl From<RecordV1> for RecordV2 {
///     fn from(v1: RecordV1) -> Self {
///         Self { amount: v1.amount, memo: String::new() }
///     }
/// }
///
/// define_versioned! {
///     #[derive(Debug, Clone, PartialEq, Eq)]
///     pub enum VersionedRecord {
///         previous_versions: [
///             0 => V1(RecordV1) as as_v1: { updates_to: V2 },
///         ],
///         latest_version: {
///             1 => V2(RecordV2) as as_v2,
///         },
///     }
/// }
///
/// let stored = VersionedRecord::from(RecordV1 { amount: 100 });
/// assert_eq!(stored.version_name(), "V1");
/// assert_eq!(stored.into_latest().amount, 100);
/// ```
#[macro_export]
macro_rules! define_versioned {
    (
        $(#[$attr:meta])*
        $vis:vis enum $name:ident {
            previous_versions: [
                $(
                    $prev_discriminator:literal => $prev_variant:ident($prev_type:ty)
                        as $prev_accessor:ident : { updates_to: $updates_to:ident }
                ),* $(,)?
            ],
            latest_version: {
                $latest_discriminator:literal => $latest_variant:ident($latest_type:ty)
                    as $latest_accessor:ident $(,)?
            } $(,)?
        }
    ) => {
        $(#[$attr])*
        $vis enum $name {
            $($prev_variant($prev_type),)*
            $latest_variant($latest_type),
        }

        #[allow(unreachable_patterns)]
        impl $name {
            $(
                pub fn $prev_accessor(&self) -> ::core::option::Option<&$prev_type> {
                    match self {
                        Self::$prev_variant(inner) => ::core::option::Option::Some(inner),
                        _ => ::core::option::Option::None,
                    }
                }
            )*

            pub fn $latest_accessor(&self) -> ::core::option::Option<&$latest_type> {
                match self {
                    Self::$latest_variant(inner) => ::core::option::Option::Some(inner),
                    _ => ::core::option::Option::None,
                }
            }
        }

        #[allow(unreachable_patterns, unreachable_code, unused_mut)]
        impl $crate::versioning::Versioned for $name {
            type Latest = $latest_type;

            fn discriminator(&self) -> u8 {
                match self {
                    $(Self::$prev_variant(_) => $prev_discriminator,)*
                    Self::$latest_variant(_) => $latest_discriminator,
                }
            }

            fn version_name(&self) -> &'static str {
                match self {
                    $(Self::$prev_variant(_) => stringify!($prev_variant),)*
                    Self::$latest_variant(_) => stringify!($latest_variant),
                }
            }

            fn is_fully_updated(&self) -> bool {
                matches!(self, Self::$latest_variant(_))
            }

            fn into_latest(self) -> Self::Latest {
                let mut current = self;
                loop {
                    current = match current {
                        Self::$latest_variant(latest) => return latest,
                        $(
                            Self::$prev_variant(previous) => {
                                Self::$updates_to(::core::convert::From::from(previous))
                            }
                        )*
                    };
                }
            }

            fn as_latest_ref(&self) -> ::core::option::Option<&Self::Latest> {
                match self {
                    Self::$latest_variant(latest) => ::core::option::Option::Some(latest),
                    _ => ::core::option::Option::None,
                }
            }

            fn from_latest(latest: Self::Latest) -> Self {
                Self::$latest_variant(latest)
            }
        }

        $(
            impl ::core::convert::From<$prev_type> for $name {
                fn from(inner: $prev_type) -> Self {
                    Self::$prev_variant(inner)
                }
            }

            impl $crate::versioning::IntoVersioned for $prev_type {
                type Versioned = $name;

                fn into_versioned(self) -> $name {
                    $name::$prev_variant(self)
                }
            }
        )*

        impl ::core::convert::From<$latest_type> for $name {
            fn from(inner: $latest_type) -> Self {
                Self::$latest_variant(inner)
            }
        }

        impl $crate::versioning::IntoVersioned for $latest_type {
            type Versioned = $name;

            fn into_versioned(self) -> $name {
                $name::$latest_variant(self)
            }
        }

        impl $crate::versioning::IntoVersioned for $name {
            type Versioned = $name;

            fn into_versioned(self) -> $name {
                self
            }
        }

        impl<X: $crate::model::CustomValueKind> $crate::model::Categorize<X> for $name {
            #[inline]
            fn value_kind() -> $crate::model::ValueKind<X> {
                $crate::model::ValueKind::Enum
            }
        }

        impl<X: $crate::model::CustomValueKind> $crate::model::SborEnum<X> for $name {
            fn get_discriminator(&self) -> u8 {
                $crate::versioning::Versioned::discriminator(self)
            }

            fn get_length(&self) -> usize {
                1
            }
        }

        impl<X: $crate::model::CustomValueKind> $crate::codec::Encode<X> for $name
        where
            $($prev_type: $crate::codec::Encode<X>,)*
            $latest_type: $crate::codec::Encode<X>,
        {
            #[inline]
            fn encode_value_kind(
                &self,
                encoder: &mut $crate::codec::Encoder<X>,
            ) -> ::core::result::Result<(), $crate::error::EncodeError> {
                encoder.write_value_kind($crate::model::ValueKind::Enum)
            }

            fn encode_body(
                &self,
                encoder: &mut $crate::codec::Encoder<X>,
            ) -> ::core::result::Result<(), $crate::error::EncodeError> {
                match self {
                    $(
                        Self::$prev_variant(inner) => {
                            encoder.write_discriminator($prev_discriminator)?;
                            encoder.write_size(1)?;
                            encoder.encode(inner)
                        }
                    )*
                    Self::$latest_variant(inner) => {
                        encoder.write_discriminator($latest_discriminator)?;
                        encoder.write_size(1)?;
                        encoder.encode(inner)
                    }
                }
            }
        }

        impl<X: $crate::model::CustomValueKind> $crate::codec::Decode<X> for $name
        where
            $($prev_type: $crate::codec::Decode<X>,)*
            $latest_type: $crate::codec::Decode<X>,
        {
            fn decode_body_with_value_kind(
                decoder: &mut $crate::codec::Decoder<'_, X>,
                value_kind: $crate::model::ValueKind<X>,
            ) -> ::core::result::Result<Self, $crate::error::DecodeError> {
                decoder.check_preloaded_value_kind(value_kind, $crate::model::ValueKind::Enum)?;
                match decoder.read_discriminator()? {
                    $(
                        $prev_discriminator => {
                            decoder.read_and_check_size(1)?;
                            ::core::result::Result::Ok(Self::$prev_variant(decoder.decode()?))
                        }
                    )*
                    $latest_discriminator => {
                        decoder.read_and_check_size(1)?;
                        ::core::result::Result::Ok(Self::$latest_variant(decoder.decode()?))
                    }
                    other => ::core::result::Result::Err(
                        $crate::error::DecodeError::UnknownDiscriminator(other),
                    ),
                }
            }
        }

        impl<X: $crate::schema::CustomSchema> $crate::schema::Describe<X> for $name
        where
            $($prev_type: $crate::schema::Describe<X>,)*
            $latest_type: $crate::schema::Describe<X>,
        {
            fn type_id() -> $crate::schema::RustTypeId {
                $crate::schema::novel_type_id(
                    concat!(module_path!(), "::", stringify!($name)),
                    &[],
                )
            }

            fn type_data() -> $crate::schema::TypeData<X, $crate::schema::RustTypeId> {
                let mut variants = ::std::collections::BTreeMap::new();
                $(
                    variants.insert(
                        $prev_discriminator,
                        (
                            stringify!($prev_variant),
                            vec![<$prev_type as $crate::schema::Describe<X>>::type_id()],
                        ),
                    );
                )*
                variants.insert(
                    $latest_discriminator,
                    (
                        stringify!($latest_variant),
                        vec![<$latest_type as $crate::schema::Describe<X>>::type_id()],
                    ),
                );
                $crate::schema::TypeData::enum_variants(stringify!($name), variants)
            }

            fn add_all_dependencies(aggregator: &mut $crate::schema::TypeAggregator<X>) {
                $(aggregator.add_child_type_and_descendents::<$prev_type>();)*
                aggregator.add_child_type_and_descendents::<$latest_type>();
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;
    use crate::error::DecodeError;
    use crate::extension::basic::{NoCustomValueKind, basic_decode, basic_encode};
    use crate::limits::DEFAULT_MAX_DEPTH;
    use crate::schema::{TypeKind, generate_full_schema_from_single_type};
    use crate::validate::validate_payload_against_schema;
    use crate::{define_versioned, impl_codec_for_struct};

    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct RecordV1 {
        pub amount: u64,
    }
    impl_codec_for_struct!(RecordV1 { amount: u64 });

    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct RecordV2 {
        pub amount: u64,
        pub memo: String,
    }
    impl_codec_for_struct!(RecordV2 { amount: u64, memo: String });

    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct RecordV3 {
        pub amount: u128,
        pub memo: Option<String>,
    }
    impl_codec_for_struct!(RecordV3 { amount: u128, memo: Option<String> });

    impl From<RecordV1> for RecordV2 {
        fn from(v1: RecordV1) -> Self {
            Self {
                amount: v1.amount,
                memo: String::new(),
            }
        }
    }

    impl From<RecordV2> for RecordV3 {
        fn from(v2: RecordV2) -> Self {
            Self {
                amount: u128::from(v2.amount),
                memo: (!v2.memo.is_empty()).then_some(v2.memo),
            }
        }
    }

    define_versioned! {
        #[derive(Debug, Clone, PartialEq, Eq)]
        pub enum VersionedRecord {
            previous_versions: [
                0 => V1(RecordV1) as as_v1: { updates_to: V2 },
                1 => V2(RecordV2) as as_v2: { updates_to: V3 },
            ],
            latest_version: {
                2 => V3(RecordV3) as as_v3,
            },
        }
    }

    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct CounterV1 {
        pub count: u64,
    }
    impl_codec_for_struct!(CounterV1 { count: u64 });

    define_versioned! {
        #[derive(Debug, Clone, PartialEq, Eq)]
        pub enum VersionedCounter {
            previous_versions: [],
            latest_version: {
                0 => V1(CounterV1) as as_v1,
            },
        }
    }

    /// `VersionedRecord::V1(RecordV1 { amount: 100 })`, captured before V2 existed.
    const STORED_V1: [u8; 14] = [
        0x22, 0x00, 0x01, // enum, variant 0, one field
        0x21, 0x01, // tuple, one field
        0x0a, 0x64, 0, 0, 0, 0, 0, 0, 0, // u64 100
    ];

    #[test]
    fn test_stored_v1_stays_v1() {
        let decoded: VersionedRecord = basic_decode(&STORED_V1).unwrap();
        assert_eq!(decoded.version_name(), "V1");
        assert_eq!(decoded.discriminator(), 0);
        assert_eq!(decoded.as_v1(), Some(&RecordV1 { amount: 100 }));
        assert!(!decoded.is_fully_updated());
        assert!(decoded.as_latest_ref().is_none());

        // Re-encoding keeps the stored bytes
        assert_eq!(basic_encode(&decoded).unwrap(), STORED_V1.to_vec());

        let latest = decoded.into_latest();
        assert_eq!(
            latest,
            RecordV3 {
                amount: 100,
                memo: None,
            }
        );
    }

    #[test]
    fn test_fully_update_walks_every_step() {
        let stored = VersionedRecord::from(RecordV2 {
            amount: 5,
            memo: "gas".into(),
        });
        let updated = stored.fully_update();
        assert!(updated.is_fully_updated());
        assert_eq!(updated.version_name(), "V3");
        assert_eq!(
            updated.as_v3(),
            Some(&RecordV3 {
                amount: 5,
                memo: Some("gas".into()),
            })
        );
    }

    #[test]
    fn test_into_versioned() {
        assert_eq!(
            RecordV1 { amount: 1 }.into_versioned(),
            VersionedRecord::V1(RecordV1 { amount: 1 })
        );
        let latest = VersionedRecord::from_latest(RecordV3 {
            amount: 2,
            memo: None,
        });
        assert_eq!(latest.clone().into_versioned(), latest);
    }

    #[test]
    fn test_unknown_version_rejected() {
        let mut bytes = STORED_V1;
        bytes[1] = 0x07;
        assert_eq!(
            basic_decode::<VersionedRecord>(&bytes),
            Err(DecodeError::UnknownDiscriminator(7))
        );
    }

    #[test]
    fn test_single_version() {
        let single = VersionedCounter::from(CounterV1 { count: 3 });
        assert!(single.is_fully_updated());
        assert_eq!(single.clone().into_latest(), CounterV1 { count: 3 });

        // Same wire shape as V1 of the multi-version record
        let bytes = basic_encode(&VersionedCounter::V1(CounterV1 { count: 100 })).unwrap();
        assert_eq!(bytes, STORED_V1.to_vec());
    }

    #[test]
    fn test_versioned_schema() {
        let (index, schema) =
            generate_full_schema_from_single_type::<VersionedRecord, NoCustomValueKind>().unwrap();
        let kind = schema.resolve_type_kind(index).unwrap();
        match kind.as_ref() {
            TypeKind::Enum { variants } => {
                assert_eq!(variants.keys().copied().collect::<Vec<_>>(), vec![0, 1, 2]);
            }
            other => panic!("expected enum, got {other:?}"),
        }
        let metadata = schema.resolve_type_metadata(index).unwrap();
        assert_eq!(metadata.get_variant(1).and_then(|v| v.get_name()), Some("V2"));

        validate_payload_against_schema(&STORED_V1, &schema, index, DEFAULT_MAX_DEPTH).unwrap();
    }

    fn arb_record() -> impl Strategy<Value = VersionedRecord> {
        prop_oneof![
            any::<u64>().prop_map(|amount| VersionedRecord::V1(RecordV1 { amount })),
            (any::<u64>(), ".{0,8}")
                .prop_map(|(amount, memo)| VersionedRecord::V2(RecordV2 { amount, memo })),
            (any::<u128>(), proptest::option::of(".{1,8}"))
                .prop_map(|(amount, memo)| VersionedRecord::V3(RecordV3 { amount, memo })),
        ]
    }

    proptest! {
        #[test]
        fn prop_versioned_roundtrip_keeps_variant(record in arb_record()) {
            let bytes = basic_encode(&record).unwrap();
            let decoded: VersionedRecord = basic_decode(&bytes).unwrap();
            prop_assert_eq!(&decoded, &record);
            prop_assert_eq!(basic_encode(&decoded).unwrap(), bytes);
        }

        #[test]
        fn prop_upgrade_keeps_amount(record in arb_record()) {
            let amount = match &record {
                VersionedRecord::V1(v1) => u128::from(v1.amount),
                VersionedRecord::V2(v2) => u128::from(v2.amount),
                VersionedRecord::V3(v3) => v3.amount,
            };
            let upgraded = record.fully_update();
            prop_assert!(upgraded.is_fully_updated());
            prop_assert_eq!(upgraded.into_latest().amount, amount);
        }
    }
}

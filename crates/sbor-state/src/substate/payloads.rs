//! Payload and content-source traits.
//!
//! A payload is a transparent wrapper around a versioned content type, one
//! per storage slot, so two slots holding the same content stay distinct
//! types. A content source is anything that converts into that content: the
//! versioned enum itself or any of its version types. Locked and unlocked
//! substates are only constructed from payloads, so what is persisted always
//! matches the slot's declared content type.

use crate::substate::{FieldSubstate, IndexEntrySubstate, KeyValueEntrySubstate};
use crate::versioning::{IntoVersioned, Versioned};

macro_rules! declare_payload_traits {
    ($payload_trait:ident, $content_source_trait:ident, $substate:ident) => {
        pub trait $payload_trait: Sized {
            type Content: Versioned;

            fn into_content(self) -> Self::Content;

            fn from_content(content: Self::Content) -> Self;

            fn as_content(&self) -> &Self::Content;

            fn from_content_source<T: $content_source_trait<Self>>(source: T) -> Self {
                Self::from_content($content_source_trait::<Self>::into_content(source))
            }

            fn into_locked_substate(self) -> $substate<Self> {
                $substate::new_locked(self)
            }

            fn into_unlocked_substate(self) -> $substate<Self> {
                $substate::new_unlocked(self)
            }
        }

        pub trait $content_source_trait<Payload: $payload_trait>: Sized {
            fn into_content(self) -> Payload::Content;

            fn into_payload(self) -> Payload {
                Payload::from_content_source(self)
            }

            fn into_locked_substate(self) -> $substate<Payload> {
                $substate::new_locked($content_source_trait::<Payload>::into_payload(self))
            }

            fn into_unlocked_substate(self) -> $substate<Payload> {
                $substate::new_unlocked($content_source_trait::<Payload>::into_payload(self))
            }
        }

        impl<Payload, T> $content_source_trait<Payload> for T
        where
            Payload: $payload_trait,
            T: IntoVersioned<Versioned = Payload::Content>,
        {
            fn into_content(self) -> Payload::Content {
                IntoVersioned::into_versioned(self)
            }
        }
    };
}

declare_payload_traits!(FieldPayload, FieldContentSource, FieldSubstate);
declare_payload_traits!(KeyValueEntryPayload, KeyValueEntryContentSource, KeyValueEntrySubstate);
declare_payload_traits!(IndexEntryPayload, IndexEntryContentSource, IndexEntrySubstate);
declare_payload_traits!(
    SortedIndexEntryPayload,
    SortedIndexEntryContentSource,
    IndexEntrySubstate
);

/// Declares a payload type wrapping a versioned content type.
///
/// The payload encodes and describes exactly as its content does.
///
/// ```
/// use sbor_state::{declare_payload_new_type, define_versioned, impl_codec_for_struct};
/// use sbor_state::substate::{FieldContentSource, FieldPayload, FieldSubstate};
///
/// #[derive(Debug, Clone, PartialEq, Eq)]
/// pub struct ConfigV1 {
///     pub fee_bps: u16,
/// }
/// impl_codec_for_struct!(ConfigV1 { fee_bps: u16 });
///
/// define_versioned! {
///     #[derive(Debug, Clone, PartialEq, Eq)]
///     pub enum VersionedConfig {
///         previous_versions: [],
///         latest_version: {
///             0 => V1(ConfigV1) as as_v1,
///         },
///     }
/// }
///
/// declare_payload_new_type! {
///     payload_trait: FieldPayload,
///     #[derive(Debug, Clone, PartialEq, Eq)]
///     pub struct ConfigFieldPayload(VersionedConfig);
/// }
///
/// let substate: FieldSubstate<ConfigFieldPayload> =
///     FieldContentSource::into_unlocked_substate(ConfigV1 { fee_bps: 30 });
/// assert!(!substate.is_locked());
/// ```
#[macro_export]
macro_rules! declare_payload_new_type {
    (
        payload_trait: $payload_trait:ident,
        $(#[$attr:meta])*
        $vis:vis struct $name:ident($content:ty);
    ) => {
        $(#[$attr])*
        $vis struct $name {
            pub content: $content,
        }

        impl $crate::substate::$payload_trait for $name {
            type Content = $content;

            fn into_content(self) -> $content {
                self.content
            }

            fn from_content(content: $content) -> Self {
                Self { content }
            }

            fn as_content(&self) -> &$content {
                &self.content
            }
        }

        impl ::core::convert::From<$content> for $name {
            fn from(content: $content) -> Self {
                Self { content }
            }
        }

        impl ::core::convert::AsMut<$content> for $name {
            fn as_mut(&mut self) -> &mut $content {
                &mut self.content
            }
        }

        impl<X: $crate::model::CustomValueKind> $crate::model::Categorize<X> for $name
        where
            $content: $crate::model::Categorize<X>,
        {
            #[inline]
            fn value_kind() -> $crate::model::ValueKind<X> {
                <$content as $crate::model::Categorize<X>>::value_kind()
            }
        }

        impl<X: $crate::model::CustomValueKind> $crate::codec::Encode<X> for $name
        where
            $content: $crate::codec::Encode<X>,
        {
            #[inline]
            fn encode_value_kind(
                &self,
                encoder: &mut $crate::codec::Encoder<X>,
            ) -> ::core::result::Result<(), $crate::error::EncodeError> {
                self.content.encode_value_kind(encoder)
            }

            #[inline]
            fn encode_body(
                &self,
                encoder: &mut $crate::codec::Encoder<X>,
            ) -> ::core::result::Result<(), $crate::error::EncodeError> {
                self.content.encode_body(encoder)
            }
        }

        impl<X: $crate::model::CustomValueKind> $crate::codec::Decode<X> for $name
        where
            $content: $crate::codec::Decode<X>,
        {
            #[inline]
            fn decode_body_with_value_kind(
                decoder: &mut $crate::codec::Decoder<'_, X>,
                value_kind: $crate::model::ValueKind<X>,
            ) -> ::core::result::Result<Self, $crate::error::DecodeError> {
                <$content as $crate::codec::Decode<X>>::decode_body_with_value_kind(decoder, value_kind)
                    .map(|content| Self { content })
            }
        }

        impl<X: $crate::schema::CustomSchema> $crate::schema::Describe<X> for $name
        where
            $content: $crate::schema::Describe<X>,
        {
            fn type_id() -> $crate::schema::RustTypeId {
                <$content as $crate::schema::Describe<X>>::type_id()
            }

            fn type_data() -> $crate::schema::TypeData<X, $crate::schema::RustTypeId> {
                <$content as $crate::schema::Describe<X>>::type_data()
            }

            fn add_all_dependencies(aggregator: &mut $crate::schema::TypeAggregator<X>) {
                <$content as $crate::schema::Describe<X>>::add_all_dependencies(aggregator)
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extension::basic::{NoCustomValueKind, basic_decode, basic_encode};
    use crate::schema::Describe;
    use crate::{declare_payload_new_type, define_versioned, impl_codec_for_struct};

    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct EntryV1 {
        pub count: u32,
    }
    impl_codec_for_struct!(EntryV1 { count: u32 });

    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct EntryV2 {
        pub count: u64,
    }
    impl_codec_for_struct!(EntryV2 { count: u64 });

    impl From<EntryV1> for EntryV2 {
        fn from(v1: EntryV1) -> Self {
            Self {
                count: u64::from(v1.count),
            }
        }
    }

    define_versioned! {
        #[derive(Debug, Clone, PartialEq, Eq)]
        pub enum VersionedEntry {
            previous_versions: [
                0 => V1(EntryV1) as as_v1: { updates_to: V2 },
            ],
            latest_version: {
                1 => V2(EntryV2) as as_v2,
            },
        }
    }

    declare_payload_new_type! {
        payload_trait: KeyValueEntryPayload,
        #[derive(Debug, Clone, PartialEq, Eq)]
        pub struct EntryPayload(VersionedEntry);
    }

    declare_payload_new_type! {
        payload_trait: SortedIndexEntryPayload,
        #[derive(Debug, Clone, PartialEq, Eq)]
        pub struct SortedEntryPayload(VersionedEntry);
    }

    #[test]
    fn test_any_version_is_a_content_source() {
        let from_v1: EntryPayload = KeyValueEntryContentSource::into_payload(EntryV1 { count: 1 });
        assert_eq!(from_v1.as_content().as_v1(), Some(&EntryV1 { count: 1 }));

        let from_versioned: EntryPayload =
            KeyValueEntryContentSource::into_payload(VersionedEntry::V2(EntryV2 { count: 2 }));
        assert_eq!(from_versioned.into_content().into_latest().count, 2);
    }

    #[test]
    fn test_locked_substate_from_content() {
        let substate: KeyValueEntrySubstate<EntryPayload> =
            KeyValueEntryContentSource::into_locked_substate(EntryV2 { count: 9 });
        assert!(substate.is_locked());
        assert!(substate.is_occupied());

        let sorted: IndexEntrySubstate<SortedEntryPayload> =
            SortedIndexEntryContentSource::into_unlocked_substate(EntryV1 { count: 3 });
        assert!(!sorted.is_locked());
        assert_eq!(sorted.value().as_content().discriminator(), 0);
    }

    #[test]
    fn test_payload_from_source_then_replaced() {
        let mut payload = EntryPayload::from_content_source(EntryV1 { count: 5 });
        assert_eq!(payload.as_content().as_v1(), Some(&EntryV1 { count: 5 }));

        // Writers replace the whole versioned content, never a field of it
        *payload.as_mut() = VersionedEntry::from(EntryV2 { count: 6 });
        assert!(payload.as_content().is_fully_updated());
        assert_eq!(payload.into_content().into_latest(), EntryV2 { count: 6 });
    }

    #[test]
    fn test_payload_is_transparent() {
        let payload = EntryPayload::from(VersionedEntry::V1(EntryV1 { count: 4 }));
        let bytes = basic_encode(&payload).unwrap();
        assert_eq!(bytes, basic_encode(&payload.content).unwrap());
        assert_eq!(basic_decode::<EntryPayload>(&bytes).unwrap(), payload);
        assert_eq!(
            <EntryPayload as Describe<NoCustomValueKind>>::type_id(),
            <VersionedEntry as Describe<NoCustomValueKind>>::type_id()
        );
    }
}

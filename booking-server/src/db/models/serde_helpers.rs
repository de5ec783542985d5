//! Serde helpers for SurrealDB record types

/// Serialize/deserialize a `RecordId` as a plain "table:id" string.
///
/// SurrealDB returns record ids as structured values; the API exposes them
/// as strings. This module accepts either form on input.
pub mod record_id {
    use serde::de::{self, Deserializer, Visitor};
    use serde::ser::Serializer;
    use std::fmt;
    use surrealdb::RecordId;

    pub fn serialize<S>(id: &RecordId, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&id.to_string())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<RecordId, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(FlexibleRecordId)
    }

    pub(super) struct FlexibleRecordId;

    impl<'de> Visitor<'de> for FlexibleRecordId {
        type Value = RecordId;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("a record id string or structured record id")
        }

        fn visit_str<E>(self, value: &str) -> Result<RecordId, E>
        where
            E: de::Error,
        {
            value
                .parse::<RecordId>()
                .map_err(|_| E::custom(format!("invalid record id: {}", value)))
        }

        fn visit_map<A>(self, map: A) -> Result<RecordId, A::Error>
        where
            A: de::MapAccess<'de>,
        {
            use serde::Deserialize;
            RecordId::deserialize(de::value::MapAccessDeserializer::new(map))
        }
    }
}

/// Like [`record_id`] but for `Option<RecordId>` fields.
pub mod option_record_id {
    use serde::de::{self, Deserializer, Visitor};
    use serde::ser::Serializer;
    use std::fmt;
    use surrealdb::RecordId;

    pub fn serialize<S>(id: &Option<RecordId>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match id {
            Some(id) => serializer.serialize_some(&id.to_string()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<RecordId>, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_option(OptionalRecordId)
    }

    struct OptionalRecordId;

    impl<'de> Visitor<'de> for OptionalRecordId {
        type Value = Option<RecordId>;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("an optional record id")
        }

        fn visit_none<E>(self) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(None)
        }

        fn visit_unit<E>(self) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(None)
        }

        fn visit_some<D>(self, deserializer: D) -> Result<Self::Value, D::Error>
        where
            D: Deserializer<'de>,
        {
            deserializer
                .deserialize_any(super::record_id::FlexibleRecordId)
                .map(Some)
        }
    }
}

/// Default helper for fields that should be `true` when absent
pub fn bool_true() -> bool {
    true
}

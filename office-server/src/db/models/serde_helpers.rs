//! Common serde helpers for handling mixed-quality values from upstream rows
//!
//! 支持两种 RecordId 格式的反序列化：
//! - 字符串格式 "table:id" (来自 API JSON)
//! - SurrealDB 原生格式 (来自数据库)
//!
//! 宽松字段解析：上游数据源混用数字/字符串 ID，数量字段偶有脏数据，
//! 统一在反序列化时兜底，不让一行坏数据拖垮整批查询。

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serializer};
use std::fmt;
use surrealdb::RecordId;

/// 内部辅助：同时支持字符串和原生 RecordId 格式
#[derive(Debug, Clone)]
struct FlexibleRecordId(RecordId);

impl<'de> Deserialize<'de> for FlexibleRecordId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct FlexibleVisitor;

        impl<'de> Visitor<'de> for FlexibleVisitor {
            type Value = FlexibleRecordId;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a string 'table:id' or RecordId")
            }

            fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                value
                    .parse::<RecordId>()
                    .map(FlexibleRecordId)
                    .map_err(|_| de::Error::custom(format!("invalid RecordId: {}", value)))
            }

            fn visit_map<M>(self, map: M) -> Result<Self::Value, M::Error>
            where
                M: de::MapAccess<'de>,
            {
                // 委托给 RecordId 原生反序列化
                RecordId::deserialize(de::value::MapAccessDeserializer::new(map))
                    .map(FlexibleRecordId)
            }
        }

        deserializer.deserialize_any(FlexibleVisitor)
    }
}

/// RecordId serialization as "table:id" string
pub mod record_id {
    use super::*;

    pub fn serialize<S>(id: &RecordId, s: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        s.serialize_str(&id.to_string())
    }

    pub fn deserialize<'de, D>(d: D) -> Result<RecordId, D::Error>
    where
        D: Deserializer<'de>,
    {
        FlexibleRecordId::deserialize(d).map(|f| f.0)
    }
}

/// Option<RecordId> serialization
pub mod option_record_id {
    use super::*;

    pub fn serialize<S>(id: &Option<RecordId>, s: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match id {
            Some(id) => s.serialize_some(&id.to_string()),
            None => s.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(d: D) -> Result<Option<RecordId>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Option::<FlexibleRecordId>::deserialize(d).map(|opt| opt.map(|f| f.0))
    }
}

/// Deserialize an id that may arrive as a string or a number
///
/// Numbers render in canonical decimal form; null and other shapes read as
/// an empty string (excluded downstream by normalization).
pub fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    struct LenientStringVisitor;

    impl<'de> Visitor<'de> for LenientStringVisitor {
        type Value = String;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("a string or number id")
        }

        fn visit_str<E: de::Error>(self, value: &str) -> Result<Self::Value, E> {
            Ok(value.to_string())
        }

        fn visit_i64<E: de::Error>(self, value: i64) -> Result<Self::Value, E> {
            Ok(value.to_string())
        }

        fn visit_u64<E: de::Error>(self, value: u64) -> Result<Self::Value, E> {
            Ok(value.to_string())
        }

        fn visit_f64<E: de::Error>(self, value: f64) -> Result<Self::Value, E> {
            // 整数值的浮点形式按整数渲染，避免 "42.0" 与 "42" 不一致
            if value.fract() == 0.0 && value.is_finite() {
                Ok(format!("{}", value as i64))
            } else {
                Ok(value.to_string())
            }
        }

        fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
            Ok(String::new())
        }

        fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
            Ok(String::new())
        }

        fn visit_some<D2: Deserializer<'de>>(self, d: D2) -> Result<Self::Value, D2::Error> {
            d.deserialize_any(LenientStringVisitor)
        }
    }

    deserializer.deserialize_any(LenientStringVisitor)
}

/// Deserialize a quantity that may arrive as an integer, float, or string
///
/// Non-numeric values read as 0 (zero contribution, not an error).
pub fn lenient_quantity<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    struct LenientQuantityVisitor;

    impl<'de> Visitor<'de> for LenientQuantityVisitor {
        type Value = i64;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("a quantity as integer, float, or numeric string")
        }

        fn visit_i64<E: de::Error>(self, value: i64) -> Result<Self::Value, E> {
            Ok(value)
        }

        fn visit_u64<E: de::Error>(self, value: u64) -> Result<Self::Value, E> {
            Ok(i64::try_from(value).unwrap_or(i64::MAX))
        }

        fn visit_f64<E: de::Error>(self, value: f64) -> Result<Self::Value, E> {
            if value.is_finite() {
                Ok(value.trunc() as i64)
            } else {
                Ok(0)
            }
        }

        fn visit_str<E: de::Error>(self, value: &str) -> Result<Self::Value, E> {
            let trimmed = value.trim();
            if let Ok(n) = trimmed.parse::<i64>() {
                return Ok(n);
            }
            if let Ok(f) = trimmed.parse::<f64>()
                && f.is_finite()
            {
                return Ok(f.trunc() as i64);
            }
            Ok(0)
        }

        fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
            Ok(0)
        }

        fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
            Ok(0)
        }

        fn visit_bool<E: de::Error>(self, _value: bool) -> Result<Self::Value, E> {
            Ok(0)
        }

        fn visit_some<D2: Deserializer<'de>>(self, d: D2) -> Result<Self::Value, D2::Error> {
            d.deserialize_any(LenientQuantityVisitor)
        }
    }

    deserializer.deserialize_any(LenientQuantityVisitor)
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;

    #[derive(Deserialize)]
    struct Probe {
        #[serde(deserialize_with = "super::lenient_string")]
        id: String,
        #[serde(deserialize_with = "super::lenient_quantity")]
        quantity: i64,
    }

    #[test]
    fn numeric_id_renders_canonically() {
        let p: Probe = serde_json::from_str(r#"{"id": 42, "quantity": 3}"#).unwrap();
        assert_eq!(p.id, "42");
        assert_eq!(p.quantity, 3);
    }

    #[test]
    fn float_id_with_integral_value() {
        let p: Probe = serde_json::from_str(r#"{"id": 42.0, "quantity": 2.9}"#).unwrap();
        assert_eq!(p.id, "42");
        assert_eq!(p.quantity, 2);
    }

    #[test]
    fn string_quantity_parses() {
        let p: Probe = serde_json::from_str(r#"{"id": "p-1", "quantity": " 5 "}"#).unwrap();
        assert_eq!(p.quantity, 5);
    }

    #[test]
    fn garbage_quantity_reads_as_zero() {
        let p: Probe = serde_json::from_str(r#"{"id": "p-1", "quantity": "lots"}"#).unwrap();
        assert_eq!(p.quantity, 0);

        let p: Probe = serde_json::from_str(r#"{"id": "p-1", "quantity": null}"#).unwrap();
        assert_eq!(p.quantity, 0);
    }

    #[test]
    fn null_id_reads_as_empty() {
        let p: Probe = serde_json::from_str(r#"{"id": null, "quantity": 1}"#).unwrap();
        assert_eq!(p.id, "");
    }
}

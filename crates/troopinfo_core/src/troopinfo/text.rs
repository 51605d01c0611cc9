//! TOML form of a [`Container`].
//!
//! The document has `version`, `count` and a `troop_infos` array of 43 tables,
//! preceded by `# <index> -- <name>` comment lines. The trailer is never written.
//! Parsing requires every field, ignores unknown keys and yields a zero trailer.
//! Each troop needs exactly three `level_up_data` tables, and float fields only
//! accept numbers an `f32` holds without overflow or integer rounding.

use std::fmt;

use serde::de::{self, Deserializer, Unexpected, Visitor};
use serde::Deserialize;
use toml::{Table, Value};

use super::types::{LEVEL_UP_FIELDS, LEVEL_UP_SLOTS, TROOP_COUNT, TROOP_NAMES};
use super::{Container, FieldValue, LevelUpData, TroopInfo, validate_header};
use crate::error::{CoreError, FormatError};

#[derive(Debug, Deserialize)]
struct TextDocument {
    version: i32,
    count: i32,
    troop_infos: Vec<TroopInfo>,
}

impl Container {
    pub fn to_text(&self) -> Result<String, CoreError> {
        let mut root = Table::new();
        root.insert("version".to_string(), Value::Integer(self.version.into()));
        root.insert("count".to_string(), Value::Integer(self.count.into()));
        root.insert(
            "troop_infos".to_string(),
            Value::Array(
                self.troop_infos
                    .iter()
                    .map(|troop| Value::Table(troop_table(troop)))
                    .collect(),
            ),
        );

        let body = toml::to_string(&root).map_err(|e| FormatError::Text(e.to_string()))?;

        let mut out = String::with_capacity(body.len() + TROOP_COUNT * 32);
        for (index, name) in TROOP_NAMES.iter().enumerate() {
            out.push_str(&format!("# {index} -- {name}\n"));
        }
        out.push_str(&body);
        Ok(out)
    }

    pub fn from_text(text: &str) -> Result<Self, CoreError> {
        let doc: TextDocument =
            toml::from_str(text).map_err(|e| FormatError::Text(e.to_string()))?;
        validate_header(doc.version, doc.count)?;

        let found = doc.troop_infos.len();
        let troop_infos: [TroopInfo; TROOP_COUNT] =
            doc.troop_infos
                .try_into()
                .map_err(|_| FormatError::TroopCount {
                    expected: TROOP_COUNT,
                    found,
                })?;

        Ok(Self {
            version: doc.version,
            count: doc.count,
            troop_infos,
            ..Self::default()
        })
    }
}

fn troop_table(troop: &TroopInfo) -> Table {
    let mut table = Table::new();
    for field in troop.fields() {
        if LEVEL_UP_FIELDS.contains(&field.index) {
            continue;
        }
        table.insert(field.label.to_string(), field_value(field.value));
    }

    let level_up = troop
        .level_up_data
        .iter()
        .map(|entry| {
            let mut slot = Table::new();
            slot.insert(
                "skill_id".to_string(),
                field_value(FieldValue::Int(entry.skill_id)),
            );
            slot.insert(
                "skill_per_level".to_string(),
                field_value(FieldValue::Float(entry.skill_per_level)),
            );
            Value::Table(slot)
        })
        .collect();
    table.insert("level_up_data".to_string(), Value::Array(level_up));
    table
}

fn field_value(value: FieldValue) -> Value {
    match value {
        FieldValue::Int(v) => Value::Integer(v.into()),
        FieldValue::Float(_) => Value::Float(value.to_f64()),
    }
}

/// `level_up_data` must hold exactly [`LEVEL_UP_SLOTS`] tables; extra tables are an error.
pub(super) fn level_up_slots<'de, D>(
    deserializer: D,
) -> Result<[LevelUpData; LEVEL_UP_SLOTS], D::Error>
where
    D: Deserializer<'de>,
{
    let entries = Vec::<LevelUpData>::deserialize(deserializer)?;
    let found = entries.len();
    entries
        .try_into()
        .map_err(|_| {
            <D::Error as de::Error>::invalid_length(found, &"exactly 3 level_up_data entries")
        })
}

/// Reads a float field, rejecting numbers that do not survive narrowing to `f32`.
pub(super) fn exact_f32<'de, D>(deserializer: D) -> Result<f32, D::Error>
where
    D: Deserializer<'de>,
{
    deserializer.deserialize_f64(ExactF32)
}

struct ExactF32;

impl<'de> Visitor<'de> for ExactF32 {
    type Value = f32;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a number representable as a 32-bit float")
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<f32, E> {
        let narrowed = v as f32;
        if v.is_finite() && !narrowed.is_finite() {
            return Err(E::invalid_value(Unexpected::Float(v), &self));
        }
        Ok(narrowed)
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<f32, E> {
        let narrowed = v as f32;
        if narrowed as i128 != i128::from(v) {
            return Err(E::invalid_value(Unexpected::Signed(v), &self));
        }
        Ok(narrowed)
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<f32, E> {
        let narrowed = v as f32;
        if narrowed as u128 != u128::from(v) {
            return Err(E::invalid_value(Unexpected::Unsigned(v), &self));
        }
        Ok(narrowed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn widen(v: f32) -> f64 {
        FieldValue::Float(v).to_f64()
    }

    #[test]
    fn widen_prefers_short_decimal() {
        assert_eq!(widen(0.1), 0.1_f64);
        assert_eq!(widen(1.5), 1.5_f64);
        assert_eq!(widen(-0.0).to_bits(), (-0.0_f64).to_bits());
    }

    #[test]
    fn widen_narrows_back_exactly() {
        for v in [
            f32::MIN_POSITIVE,
            f32::MAX,
            f32::MIN,
            1.0e-45,
            std::f32::consts::PI,
            16_777_217.0,
            0.3,
        ] {
            assert_eq!((widen(v) as f32).to_bits(), v.to_bits(), "value {v:e}");
        }
    }

    fn narrow(v: Value) -> Result<f32, toml::de::Error> {
        exact_f32(v)
    }

    #[test]
    fn exact_f32_accepts_representable_numbers() {
        assert_eq!(narrow(Value::Float(0.1)).unwrap(), 0.1_f32);
        assert_eq!(narrow(Value::Integer(16_777_216)).unwrap(), 16_777_216.0);
        assert_eq!(narrow(Value::Integer(-12)).unwrap(), -12.0);
        assert_eq!(narrow(Value::Float(f64::INFINITY)).unwrap(), f32::INFINITY);
        assert!(narrow(Value::Float(f64::NAN)).unwrap().is_nan());
    }

    #[test]
    fn exact_f32_rejects_lossy_numbers() {
        assert!(narrow(Value::Float(1e300)).is_err());
        assert!(narrow(Value::Float(-1e39)).is_err());
        assert!(narrow(Value::Integer(16_777_217)).is_err());
        assert!(narrow(Value::Integer(i64::MAX)).is_err());
    }

    #[test]
    fn widen_keeps_infinities() {
        assert_eq!(widen(f32::INFINITY), f64::INFINITY);
        assert_eq!(widen(f32::NEG_INFINITY), f64::NEG_INFINITY);
        assert!(widen(f32::NAN).is_nan());
    }
}

pub mod text;
pub mod types;

use std::fmt;
use std::io::{Cursor, Read, Seek};

use serde::Deserialize;
use tracing::{debug, warn};

use crate::error::{CoreError, FormatError};
use crate::reader::LittleEndianReader;
use crate::writer::LittleEndianWriter;
use types::{
    EXPECTED_VERSION, FIELD_COUNT, FIELD_LABELS, FILE_LEN, LEVEL_UP_SLOTS, TRAILER_LEN,
    TROOP_COUNT,
};

#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize)]
pub struct LevelUpData {
    pub skill_id: i32,
    #[serde(deserialize_with = "text::exact_f32")]
    pub skill_per_level: f32,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize)]
pub struct TroopInfo {
    /// Job type, as numbered by the game's job table.
    pub job: i32,
    /// Troop type id, as numbered by the game's troop table.
    pub type_id: i32,

    #[serde(deserialize_with = "text::exact_f32")]
    pub move_speed: f32,
    #[serde(deserialize_with = "text::exact_f32")]
    pub rotate_rate: f32,
    #[serde(deserialize_with = "text::exact_f32")]
    pub move_acceleration: f32,
    #[serde(deserialize_with = "text::exact_f32")]
    pub move_deceleration: f32,

    #[serde(deserialize_with = "text::exact_f32")]
    pub sight_range: f32,

    #[serde(deserialize_with = "text::exact_f32")]
    pub attack_range_max: f32,
    /// Ranged attack range. 0 when the troop has no ranged attack.
    #[serde(deserialize_with = "text::exact_f32")]
    pub attack_range_min: f32,
    /// Frontal attack range. 0 when the troop has no frontal attack.
    #[serde(deserialize_with = "text::exact_f32")]
    pub attack_front_range: f32,

    /// Melee and frontal attack strength.
    #[serde(deserialize_with = "text::exact_f32")]
    pub direct_attack: f32,
    /// Ranged attack strength.
    #[serde(deserialize_with = "text::exact_f32")]
    pub indirect_attack: f32,
    #[serde(deserialize_with = "text::exact_f32")]
    pub defense: f32,

    #[serde(deserialize_with = "text::exact_f32")]
    pub base_width: f32,

    #[serde(deserialize_with = "text::exact_f32")]
    pub resist_melee: f32,
    #[serde(deserialize_with = "text::exact_f32")]
    pub resist_ranged: f32,
    #[serde(deserialize_with = "text::exact_f32")]
    pub resist_frontal: f32,
    #[serde(deserialize_with = "text::exact_f32")]
    pub resist_explosion: f32,
    #[serde(deserialize_with = "text::exact_f32")]
    pub resist_fire: f32,
    #[serde(deserialize_with = "text::exact_f32")]
    pub resist_ice: f32,
    #[serde(deserialize_with = "text::exact_f32")]
    pub resist_lightning: f32,
    #[serde(deserialize_with = "text::exact_f32")]
    pub resist_holy: f32,
    #[serde(deserialize_with = "text::exact_f32")]
    pub resist_curse: f32,
    #[serde(deserialize_with = "text::exact_f32")]
    pub resist_poison: f32,

    #[serde(deserialize_with = "text::exact_f32")]
    pub max_unit_speed_multiplier: f32,
    #[serde(deserialize_with = "text::exact_f32")]
    pub default_unit_hp: f32,
    pub formation_random: i32,
    pub default_unit_num_x: i32,
    pub default_unit_num_y: i32,

    #[serde(deserialize_with = "text::exact_f32")]
    pub unit_hp_lev_up: f32,

    #[serde(deserialize_with = "text::level_up_slots")]
    pub level_up_data: [LevelUpData; LEVEL_UP_SLOTS],

    #[serde(deserialize_with = "text::exact_f32")]
    pub damage_distribution: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldValue {
    Int(i32),
    Float(f32),
}

impl FieldValue {
    /// Bit-level equality: NaN matches itself, `-0.0` does not match `0.0`.
    pub fn same_bits(&self, other: &FieldValue) -> bool {
        match (self, other) {
            (Self::Int(a), Self::Int(b)) => a == b,
            (Self::Float(a), Self::Float(b)) => a.to_bits() == b.to_bits(),
            _ => false,
        }
    }

    /// Widens to f64, preferring the value that prints as the f32's shortest
    /// decimal form when it narrows back to exactly the same bits.
    pub fn to_f64(&self) -> f64 {
        match *self {
            Self::Int(v) => f64::from(v),
            Self::Float(v) => {
                if v.is_finite()
                    && let Ok(shortest) = v.to_string().parse::<f64>()
                    && (shortest as f32).to_bits() == v.to_bits()
                {
                    return shortest;
                }
                f64::from(v)
            }
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::Int(v) => write!(f, "{v}"),
            Self::Float(v) => write!(f, "{v:?}"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TroopField {
    pub index: usize,
    pub label: &'static str,
    pub value: FieldValue,
}

impl TroopInfo {
    fn parse<R: Read + Seek>(r: &mut LittleEndianReader<R>) -> std::io::Result<Self> {
        Ok(Self {
            job: r.read_i32()?,
            type_id: r.read_i32()?,

            move_speed: r.read_f32()?,
            rotate_rate: r.read_f32()?,
            move_acceleration: r.read_f32()?,
            move_deceleration: r.read_f32()?,

            sight_range: r.read_f32()?,

            attack_range_max: r.read_f32()?,
            attack_range_min: r.read_f32()?,
            attack_front_range: r.read_f32()?,

            direct_attack: r.read_f32()?,
            indirect_attack: r.read_f32()?,
            defense: r.read_f32()?,

            base_width: r.read_f32()?,

            resist_melee: r.read_f32()?,
            resist_ranged: r.read_f32()?,
            resist_frontal: r.read_f32()?,
            resist_explosion: r.read_f32()?,
            resist_fire: r.read_f32()?,
            resist_ice: r.read_f32()?,
            resist_lightning: r.read_f32()?,
            resist_holy: r.read_f32()?,
            resist_curse: r.read_f32()?,
            resist_poison: r.read_f32()?,

            max_unit_speed_multiplier: r.read_f32()?,
            default_unit_hp: r.read_f32()?,
            formation_random: r.read_i32()?,
            default_unit_num_x: r.read_i32()?,
            default_unit_num_y: r.read_i32()?,

            unit_hp_lev_up: r.read_f32()?,

            level_up_data: [
                LevelUpData::parse(r)?,
                LevelUpData::parse(r)?,
                LevelUpData::parse(r)?,
            ],

            damage_distribution: r.read_f32()?,
        })
    }

    /// Every word of the record, in on-disk order.
    pub fn fields(&self) -> [TroopField; FIELD_COUNT] {
        use FieldValue::{Float, Int};

        let [a, b, c] = self.level_up_data;
        let values = [
            Int(self.job),
            Int(self.type_id),
            Float(self.move_speed),
            Float(self.rotate_rate),
            Float(self.move_acceleration),
            Float(self.move_deceleration),
            Float(self.sight_range),
            Float(self.attack_range_max),
            Float(self.attack_range_min),
            Float(self.attack_front_range),
            Float(self.direct_attack),
            Float(self.indirect_attack),
            Float(self.defense),
            Float(self.base_width),
            Float(self.resist_melee),
            Float(self.resist_ranged),
            Float(self.resist_frontal),
            Float(self.resist_explosion),
            Float(self.resist_fire),
            Float(self.resist_ice),
            Float(self.resist_lightning),
            Float(self.resist_holy),
            Float(self.resist_curse),
            Float(self.resist_poison),
            Float(self.max_unit_speed_multiplier),
            Float(self.default_unit_hp),
            Int(self.formation_random),
            Int(self.default_unit_num_x),
            Int(self.default_unit_num_y),
            Float(self.unit_hp_lev_up),
            Int(a.skill_id),
            Float(a.skill_per_level),
            Int(b.skill_id),
            Float(b.skill_per_level),
            Int(c.skill_id),
            Float(c.skill_per_level),
            Float(self.damage_distribution),
        ];

        let mut index = 0;
        values.map(|value| {
            let field = TroopField {
                index,
                label: FIELD_LABELS[index],
                value,
            };
            index += 1;
            field
        })
    }

    fn emit(&self, w: &mut LittleEndianWriter) {
        for field in self.fields() {
            match field.value {
                FieldValue::Int(v) => w.write_i32(v),
                FieldValue::Float(v) => w.write_f32(v),
            }
        }
    }
}

impl LevelUpData {
    fn parse<R: Read + Seek>(r: &mut LittleEndianReader<R>) -> std::io::Result<Self> {
        Ok(Self {
            skill_id: r.read_i32()?,
            skill_per_level: r.read_f32()?,
        })
    }
}

/// One whole TroopInfo.sox file.
#[derive(Debug, Clone, PartialEq)]
pub struct Container {
    pub version: i32,
    pub count: i32,
    pub troop_infos: [TroopInfo; TROOP_COUNT],
    /// Opaque bytes after the last record, kept verbatim.
    pub trailer: [u8; TRAILER_LEN],
}

impl Default for Container {
    fn default() -> Self {
        Self {
            version: EXPECTED_VERSION,
            count: TROOP_COUNT as i32,
            troop_infos: [TroopInfo::default(); TROOP_COUNT],
            trailer: [0; TRAILER_LEN],
        }
    }
}

impl Container {
    /// Reads `reader` to the end, then decodes.
    pub fn parse<R: Read>(mut reader: R) -> Result<Self, CoreError> {
        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes)?;
        Self::decode(&bytes)
    }

    pub fn decode(bytes: &[u8]) -> Result<Self, CoreError> {
        if bytes.len() < FILE_LEN {
            return Err(FormatError::Truncated {
                expected: FILE_LEN,
                actual: bytes.len(),
            }
            .into());
        }

        let mut r = LittleEndianReader::new(Cursor::new(bytes));
        let version = r.read_i32()?;
        let count = r.read_i32()?;
        validate_header(version, count)?;

        let mut troop_infos = [TroopInfo::default(); TROOP_COUNT];
        for troop in &mut troop_infos {
            *troop = TroopInfo::parse(&mut r)?;
        }
        let trailer = r.read_array::<TRAILER_LEN>()?;

        let consumed = r.position()? as usize;
        if consumed < bytes.len() {
            warn!(
                extra = bytes.len() - consumed,
                "ignoring bytes past the {TRAILER_LEN}-byte trailer"
            );
        }
        debug!(consumed, "decoded TroopInfo container");

        Ok(Self {
            version,
            count,
            troop_infos,
            trailer,
        })
    }

    pub fn encode(&self) -> Vec<u8> {
        let mut w = LittleEndianWriter::with_capacity(FILE_LEN);
        w.write_i32(self.version);
        w.write_i32(self.count);
        for troop in &self.troop_infos {
            troop.emit(&mut w);
        }
        w.write_bytes(&self.trailer);
        debug_assert_eq!(w.len(), FILE_LEN);
        debug!(len = w.len(), "encoded TroopInfo container");
        w.into_inner()
    }

    /// Replaces the trailer, e.g. with the one decoded from the file being overwritten.
    pub fn with_trailer(mut self, trailer: [u8; TRAILER_LEN]) -> Self {
        self.trailer = trailer;
        self
    }
}

pub(crate) fn validate_header(version: i32, count: i32) -> Result<(), FormatError> {
    if version != EXPECTED_VERSION {
        return Err(FormatError::VersionMismatch {
            expected: EXPECTED_VERSION,
            found: version,
        });
    }
    if count != TROOP_COUNT as i32 {
        return Err(FormatError::CountMismatch {
            expected: TROOP_COUNT as i32,
            found: count,
        });
    }
    Ok(())
}

//! Canonical record - the format-agnostic description of one creature
//!
//! Every leaf is independently optional: absence is meaningful (converters
//! default the value and warn) and is distinct from an explicit out-of-range
//! value (converters clamp and warn). Records arrive schema-validated from
//! an external source; the engine only re-checks value ranges.
//!
//! A record is immutable during a port operation apart from the stat
//! override normalization applied up front; no converter mutates it after
//! the point it is read.

use serde::{Deserialize, Serialize};

use crate::{Gender, LanguageId, Nature};

/// Calendar date as stored by date-bearing formats
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortDate {
    pub year: u16,
    pub month: u8,
    pub day: u8,
}

/// One known move with its per-move metadata
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct MoveRecord {
    pub name: Option<String>,
    pub pp: Option<u32>,
    pub pp_ups: Option<u32>,
}

/// The six battle stats, each independently optional
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatSet {
    pub hp: Option<u32>,
    pub attack: Option<u32>,
    pub defense: Option<u32>,
    pub speed: Option<u32>,
    pub sp_attack: Option<u32>,
    pub sp_defense: Option<u32>,
}

impl StatSet {
    /// Sub-slot names in canonical order, for aggregated alert text
    pub const NAMES: [&'static str; 6] = [
        "HP",
        "Attack",
        "Defense",
        "Speed",
        "Special Attack",
        "Special Defense",
    ];

    /// Values in canonical order
    pub fn slots(&self) -> [Option<u32>; 6] {
        [
            self.hp,
            self.attack,
            self.defense,
            self.speed,
            self.sp_attack,
            self.sp_defense,
        ]
    }
}

/// The six contest conditions
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContestSet {
    pub coolness: Option<u32>,
    pub beauty: Option<u32>,
    pub cuteness: Option<u32>,
    pub smartness: Option<u32>,
    pub toughness: Option<u32>,
    pub sheen: Option<u32>,
}

impl ContestSet {
    pub const NAMES: [&'static str; 6] = [
        "Coolness", "Beauty", "Cuteness", "Smartness", "Toughness", "Sheen",
    ];

    pub fn slots(&self) -> [Option<u32>; 6] {
        [
            self.coolness,
            self.beauty,
            self.cuteness,
            self.smartness,
            self.toughness,
            self.sheen,
        ]
    }
}

/// Box markings some formats let the owner toggle
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Marking {
    Circle,
    Square,
    Triangle,
    Heart,
}

impl Marking {
    /// Bit position within a markings byte
    #[inline]
    pub fn bit(self) -> u8 {
        match self {
            Marking::Circle => 0,
            Marking::Square => 1,
            Marking::Triangle => 2,
            Marking::Heart => 3,
        }
    }
}

/// Original-trainer block
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Trainer {
    pub name: Option<String>,
    /// Raw codepoints of the whole encoded name field, position-aligned;
    /// slots after the terminator carry residue from a previous name
    pub name_trash: Option<Vec<u16>>,
    pub public_id: Option<u32>,
    pub secret_id: Option<u32>,
    pub gender: Option<Gender>,
    pub language: Option<LanguageId>,
    pub origin_game: Option<String>,
}

/// Catch/met metadata
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Met {
    pub location: Option<String>,
    pub level: Option<u32>,
    pub date: Option<PortDate>,
    pub ball: Option<String>,
    pub egg_date: Option<PortDate>,
    pub egg_location: Option<String>,
}

/// Battle-stat block
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Battle {
    pub level: Option<u32>,
    pub experience: Option<u32>,
    pub friendship: Option<u32>,
    pub ivs: Option<StatSet>,
    pub evs: Option<StatSet>,
    /// Replacement IVs applied by the stat-override normalization
    pub override_ivs: Option<StatSet>,
    pub contest: Option<ContestSet>,
    pub pokerus_strain: Option<u32>,
    pub pokerus_days: Option<u32>,
}

/// The canonical record
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct CanonicalRecord {
    pub species: Option<String>,
    pub form: Option<String>,
    pub nickname: Option<String>,
    /// Raw codepoints of the whole encoded nickname field, position-aligned;
    /// slots after the terminator carry residue from a previous nickname
    pub nickname_trash: Option<Vec<u16>>,
    /// What the source format claimed about nickname presence; may disagree
    /// with the nickname actually carried
    pub nickname_flagged: Option<bool>,
    pub gender: Option<Gender>,
    pub ability: Option<String>,
    pub nature: Option<Nature>,
    /// Identity seed, when the source format carried one
    pub pid: Option<u32>,
    pub is_egg: Option<bool>,
    pub held_item: Option<String>,
    #[serde(default)]
    pub trainer: Trainer,
    #[serde(default)]
    pub met: Met,
    #[serde(default)]
    pub battle: Battle,
    #[serde(default)]
    pub moves: Vec<MoveRecord>,
    #[serde(default)]
    pub ribbons: Vec<String>,
    #[serde(default)]
    pub markings: Vec<Marking>,
}

impl CanonicalRecord {
    pub fn new() -> Self {
        CanonicalRecord::default()
    }

    /// The single pre-conversion normalization: when the caller enables the
    /// stat override, replacement IVs swap in before any converter runs.
    /// This is the only in-place mutation a port ever applies.
    pub fn apply_stat_override(&mut self) {
        if let Some(override_ivs) = self.battle.override_ivs.take() {
            self.battle.ivs = Some(override_ivs);
        }
    }

    /// Whether the record carries a nickname distinct from the species name
    pub fn has_nickname(&self) -> bool {
        match (&self.nickname, &self.species) {
            (Some(nick), Some(species)) => !nick.eq_ignore_ascii_case(species),
            (Some(_), None) => true,
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stat_override_swaps_ivs() {
        let mut record = CanonicalRecord::new();
        record.battle.ivs = Some(StatSet {
            hp: Some(1),
            ..Default::default()
        });
        record.battle.override_ivs = Some(StatSet {
            hp: Some(31),
            ..Default::default()
        });

        record.apply_stat_override();

        assert_eq!(record.battle.ivs.unwrap().hp, Some(31));
        assert!(record.battle.override_ivs.is_none());
    }

    #[test]
    fn test_has_nickname() {
        let mut record = CanonicalRecord::new();
        record.species = Some("Unown".to_string());
        assert!(!record.has_nickname());

        record.nickname = Some("UNOWN".to_string());
        assert!(!record.has_nickname());

        record.nickname = Some("Letters".to_string());
        assert!(record.has_nickname());
    }

    #[test]
    fn test_record_deserializes_from_sparse_json() {
        let json = r#"{
            "species": "Unown",
            "nature": "Jolly",
            "battle": { "friendship": 70 }
        }"#;
        let record: CanonicalRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.species.as_deref(), Some("Unown"));
        assert_eq!(record.nature, Some(Nature::Jolly));
        assert_eq!(record.battle.friendship, Some(70));
        assert!(record.pid.is_none());
        assert!(record.moves.is_empty());
    }
}

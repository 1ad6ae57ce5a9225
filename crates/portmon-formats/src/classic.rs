//! Classic format - big-endian, language-independent, 69 bytes
//!
//! The oldest target the engine supports: one charset for every language,
//! uppercase-only names, no identity seed (gender and shininess live in the
//! visible stats, not a seed), and a packed 4-nibble IV block.

use portmon_core::{CanonicalRecord, Dex, Gender, MoveRecord, PortResult, StatSet};
use portmon_engine::tags::{
    EggTag, ExperienceTag, IndexTag, MarkingsTag, MovesTag, MultiNumericTag, NicknameFlagTag,
    NumericTag, OtGenderTag, PpTag, SpeciesTag, StringTag,
};
use portmon_engine::{
    IndexSpec, NumericSpec, RegistryBuilder, StringSpec, TagRegistry, TargetFormat,
};
use portmon_wire::{BitBuffer, ByteOrder, Charset, Codec, FieldLayout, FieldSheet};

use crate::import_util::{markings_from_mask, reverse, trash_codes};

pub const NAME: &str = "classic";
pub const SIZE: usize = 69;

const NAME_LEN: usize = 11;
const TERMINATOR: u16 = 0x50;

pub const LAYOUT: [FieldLayout; 30] = [
    FieldLayout::uint("species", 0, 1),
    FieldLayout::uint("held_item", 1, 1),
    FieldLayout::array("moves", 2, 1, 4),
    FieldLayout::uint("trainer_id", 6, 2),
    FieldLayout::uint("experience", 8, 3),
    FieldLayout::uint("ev_hp", 11, 2),
    FieldLayout::uint("ev_attack", 13, 2),
    FieldLayout::uint("ev_defense", 15, 2),
    FieldLayout::uint("ev_speed", 17, 2),
    FieldLayout::uint("ev_special", 19, 2),
    FieldLayout::array("pp", 21, 1, 4).with_max(63),
    FieldLayout::packed("pp_ups", 25, 2, 4),
    FieldLayout::uint("friendship", 26, 1),
    FieldLayout::bits("pokerus_days", 27, 0, 4),
    FieldLayout::bits("pokerus_strain", 27, 4, 4),
    FieldLayout::uint("met_location", 28, 1),
    FieldLayout::uint("met_level", 29, 1).with_max(100),
    FieldLayout::flag("ot_gender", 30, 7),
    FieldLayout::bits("iv_attack", 31, 0, 4),
    FieldLayout::bits("iv_defense", 31, 4, 4),
    FieldLayout::bits("iv_speed", 32, 0, 4),
    FieldLayout::bits("iv_special", 32, 4, 4),
    FieldLayout::flag("is_egg", 33, 0),
    FieldLayout::flag("nickname_flag", 33, 1),
    FieldLayout::uint("level", 34, 1).with_min(1).with_max(100),
    FieldLayout::string("nickname", 35, 1, NAME_LEN),
    FieldLayout::string("ot_name", 46, 1, NAME_LEN),
    FieldLayout::uint("ball", 57, 1),
    FieldLayout::uint("origin_game", 58, 1),
    FieldLayout::uint("markings", 59, 1),
];

/// The classic character table: space, letters, digits, terminator 0x50
fn charset() -> Charset {
    let mut pairs: Vec<(u16, char)> = vec![(0x7F, ' ')];
    pairs.extend((0..26u16).map(|i| (0x80 + i, (b'A' + i as u8) as char)));
    pairs.extend((0..26u16).map(|i| (0xA0 + i, (b'a' + i as u8) as char)));
    pairs.extend((0..10u16).map(|i| (0xF6 + i, (b'0' + i as u8) as char)));
    Charset::new(TERMINATOR, &pairs)
}

pub fn codec() -> Codec {
    Codec::universal(charset())
}

fn registry() -> PortResult<TagRegistry> {
    RegistryBuilder::new()
        .register(SpeciesTag {
            field: "species",
            column: "index",
        })
        .register(StringTag {
            name: "nickname",
            prereqs: &[],
            spec: StringSpec {
                title: "Nickname",
                field: "nickname",
                uppercase: true,
            },
            value: |r| r.nickname.as_deref(),
            trash: |r| r.nickname_trash.as_deref(),
            species_default: true,
            record_nickname: true,
        })
        .register(NicknameFlagTag {
            field: "nickname_flag",
        })
        .register(StringTag {
            name: "ot_name",
            prereqs: &[],
            spec: StringSpec {
                title: "Trainer name",
                field: "ot_name",
                uppercase: true,
            },
            value: |r| r.trainer.name.as_deref(),
            trash: |r| r.trainer.name_trash.as_deref(),
            species_default: false,
            record_nickname: false,
        })
        .register(OtGenderTag { field: "ot_gender" })
        .register(IndexTag {
            name: "held_item",
            prereqs: &[],
            spec: IndexSpec {
                title: "Held item",
                field: "held_item",
                prefix: "item:",
                column: "index",
                default: 0,
                default_desc: "no held item",
                silent_default: true,
            },
            value: |r| r.held_item.as_deref(),
        })
        .register(MovesTag {
            field: "moves",
            prefix: "move:",
            column: "index",
        })
        .register(PpTag {
            pp_field: "pp",
            pp_ups_field: Some("pp_ups"),
            prefix: "move:",
        })
        .register(NumericTag {
            name: "trainer_id",
            prereqs: &[],
            spec: NumericSpec {
                title: "Trainer ID",
                field: "trainer_id",
                default: 0,
                silent_default: false,
            },
            value: |r| r.trainer.public_id,
        })
        .register(ExperienceTag {
            exp_field: Some("experience"),
            level_field: Some("level"),
        })
        .register(NumericTag {
            name: "friendship",
            prereqs: &[],
            spec: NumericSpec {
                title: "Friendship",
                field: "friendship",
                default: 70,
                silent_default: true,
            },
            value: |r| r.battle.friendship,
        })
        .register(MultiNumericTag {
            name: "evs",
            prereqs: &[],
            title: "EVs",
            slots: &[
                ("HP", "ev_hp"),
                ("Attack", "ev_attack"),
                ("Defense", "ev_defense"),
                ("Speed", "ev_speed"),
                ("Special", "ev_special"),
            ],
            values: |r| {
                let s = r.battle.evs.unwrap_or_default();
                vec![s.hp, s.attack, s.defense, s.speed, s.sp_attack]
            },
            default: 0,
        })
        .register(MultiNumericTag {
            name: "ivs",
            prereqs: &[],
            title: "IVs",
            slots: &[
                ("Attack", "iv_attack"),
                ("Defense", "iv_defense"),
                ("Speed", "iv_speed"),
                ("Special", "iv_special"),
            ],
            values: |r| {
                let s = r.battle.ivs.unwrap_or_default();
                vec![s.attack, s.defense, s.speed, s.sp_attack]
            },
            default: 0,
        })
        .register(NumericTag {
            name: "pokerus_strain",
            prereqs: &[],
            spec: NumericSpec {
                title: "Pokerus strain",
                field: "pokerus_strain",
                default: 0,
                silent_default: true,
            },
            value: |r| r.battle.pokerus_strain,
        })
        .register(NumericTag {
            name: "pokerus_days",
            prereqs: &[],
            spec: NumericSpec {
                title: "Pokerus days",
                field: "pokerus_days",
                default: 0,
                silent_default: true,
            },
            value: |r| r.battle.pokerus_days,
        })
        .register(IndexTag {
            name: "met_location",
            prereqs: &[],
            spec: IndexSpec {
                title: "Met location",
                field: "met_location",
                prefix: "location:",
                column: "index",
                default: 0,
                default_desc: "an unknown location",
                silent_default: true,
            },
            value: |r| r.met.location.as_deref(),
        })
        .register(NumericTag {
            name: "met_level",
            prereqs: &[],
            spec: NumericSpec {
                title: "Met level",
                field: "met_level",
                default: 0,
                silent_default: true,
            },
            value: |r| r.met.level,
        })
        .register(EggTag { field: "is_egg" })
        .register(IndexTag {
            name: "ball",
            prereqs: &[],
            spec: IndexSpec {
                title: "Ball",
                field: "ball",
                prefix: "ball:",
                column: "index",
                default: 0,
                default_desc: "the standard ball",
                silent_default: true,
            },
            value: |r| r.met.ball.as_deref(),
        })
        .register(IndexTag {
            name: "origin_game",
            prereqs: &[],
            spec: IndexSpec {
                title: "Origin game",
                field: "origin_game",
                prefix: "game:",
                column: "index",
                default: 0,
                default_desc: "an unknown game",
                silent_default: true,
            },
            value: |r| r.trainer.origin_game.as_deref(),
        })
        .register(MarkingsTag { field: "markings" })
        .build()
}

/// The exporter's format descriptor
pub fn target() -> PortResult<TargetFormat> {
    Ok(TargetFormat {
        name: NAME,
        size: SIZE,
        order: ByteOrder::Big,
        layouts: &LAYOUT,
        codec: codec(),
        registry: registry()?,
    })
}

/// Read a classic buffer back into a canonical record
pub fn import(bytes: Vec<u8>, dex: &dyn Dex) -> PortResult<CanonicalRecord> {
    let sheet = FieldSheet::over(BitBuffer::from_bytes(bytes, ByteOrder::Big), &LAYOUT)?;
    let codec = codec();
    let language = portmon_core::LanguageId::English;

    let mut record = CanonicalRecord::new();
    record.species = reverse(dex, NAME, "", sheet.get_uint("species")?);
    record.held_item = match sheet.get_uint("held_item")? {
        0 => None,
        idx => reverse(dex, NAME, "item:", idx),
    };

    let pp = sheet.get_array("pp")?;
    let pp_ups = sheet.get_array("pp_ups")?;
    record.moves = sheet
        .get_array("moves")?
        .iter()
        .enumerate()
        .filter(|&(_, &idx)| idx != 0)
        .map(|(slot, &idx)| MoveRecord {
            name: reverse(dex, NAME, "move:", idx),
            pp: pp.get(slot).map(|&p| p as u32),
            pp_ups: pp_ups.get(slot).map(|&u| u as u32),
        })
        .collect();

    record.trainer.public_id = Some(sheet.get_uint("trainer_id")? as u32);
    record.trainer.gender = Some(if sheet.get_flag("ot_gender")? {
        Gender::Female
    } else {
        Gender::Male
    });
    record.trainer.origin_game = match sheet.get_uint("origin_game")? {
        0 => None,
        idx => reverse(dex, NAME, "game:", idx),
    };

    let ot_codes = sheet.get_codes("ot_name")?;
    record.trainer.name = Some(codec.decode(&ot_codes, language)?);
    record.trainer.name_trash = trash_codes(&ot_codes, TERMINATOR);

    record.battle.level = Some(sheet.get_uint("level")? as u32);
    record.battle.experience = Some(sheet.get_uint("experience")? as u32);
    record.battle.friendship = Some(sheet.get_uint("friendship")? as u32);
    record.battle.evs = Some(StatSet {
        hp: Some(sheet.get_uint("ev_hp")? as u32),
        attack: Some(sheet.get_uint("ev_attack")? as u32),
        defense: Some(sheet.get_uint("ev_defense")? as u32),
        speed: Some(sheet.get_uint("ev_speed")? as u32),
        sp_attack: Some(sheet.get_uint("ev_special")? as u32),
        sp_defense: None,
    });
    record.battle.ivs = Some(StatSet {
        hp: None,
        attack: Some(sheet.get_uint("iv_attack")? as u32),
        defense: Some(sheet.get_uint("iv_defense")? as u32),
        speed: Some(sheet.get_uint("iv_speed")? as u32),
        sp_attack: Some(sheet.get_uint("iv_special")? as u32),
        sp_defense: None,
    });
    record.battle.pokerus_strain = Some(sheet.get_uint("pokerus_strain")? as u32);
    record.battle.pokerus_days = Some(sheet.get_uint("pokerus_days")? as u32);

    record.met.location = match sheet.get_uint("met_location")? {
        0 => None,
        idx => reverse(dex, NAME, "location:", idx),
    };
    record.met.level = Some(sheet.get_uint("met_level")? as u32);
    record.met.ball = match sheet.get_uint("ball")? {
        0 => None,
        idx => reverse(dex, NAME, "ball:", idx),
    };

    record.is_egg = Some(sheet.get_flag("is_egg")?);
    record.nickname_flagged = Some(sheet.get_flag("nickname_flag")?);
    let nick_codes = sheet.get_codes("nickname")?;
    let nickname = codec.decode(&nick_codes, language)?;
    if !nickname.is_empty() {
        record.nickname = Some(nickname);
    }
    record.nickname_trash = trash_codes(&nick_codes, TERMINATOR);

    record.markings = markings_from_mask(sheet.get_uint("markings")?);
    Ok(record)
}

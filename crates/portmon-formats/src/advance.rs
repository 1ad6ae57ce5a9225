//! Advance format - little-endian, per-language charsets, 80 bytes
//!
//! The seed-bearing target: shininess, gender, nature, ability slot, and
//! the letter form all derive from the 32-bit identity seed, so the seed
//! converter runs in both passes and everything seed-derived waits for the
//! committed value. Strings are language-dependent; the language converter
//! must run before either name.

use portmon_core::{
    CanonicalRecord, ContestSet, Dex, Gender, LanguageId, MoveRecord, PortDate, PortResult,
    StatSet,
};
use portmon_engine::tags::{
    AbilityTag, DateTag, EggTag, ExperienceTag, IndexTag, LanguageTag, MarkingsTag, MovesTag,
    MultiNumericTag, NicknameFlagTag, NumericTag, OtGenderTag, PidCommitTag, PidTag, PpTag,
    RibbonsTag, SpeciesTag, StringTag,
};
use portmon_engine::{
    IndexSpec, NumericSpec, RegistryBuilder, StringSpec, TagRegistry, TargetFormat,
};
use portmon_wire::{BitBuffer, ByteOrder, Charset, Codec, FieldLayout, FieldSheet};

use crate::import_util::{markings_from_mask, reverse, trash_codes};

pub const NAME: &str = "advance";
pub const SIZE: usize = 80;

const NICK_LEN: usize = 10;
const OT_LEN: usize = 6;
const TERMINATOR: u16 = 0xFF;

pub const LAYOUT: [FieldLayout; 49] = [
    FieldLayout::uint("pid", 0, 4),
    FieldLayout::uint("trainer_id", 4, 2),
    FieldLayout::uint("secret_id", 6, 2),
    FieldLayout::uint("species", 8, 2),
    FieldLayout::uint("held_item", 10, 2),
    FieldLayout::uint("experience", 12, 4),
    FieldLayout::array("moves", 16, 2, 4),
    FieldLayout::array("pp", 24, 1, 4),
    FieldLayout::packed("pp_ups", 28, 2, 4),
    FieldLayout::uint("friendship", 29, 1),
    FieldLayout::uint("language", 30, 1),
    FieldLayout::flag("nickname_flag", 31, 0),
    FieldLayout::uint("ev_hp", 32, 1),
    FieldLayout::uint("ev_attack", 33, 1),
    FieldLayout::uint("ev_defense", 34, 1),
    FieldLayout::uint("ev_speed", 35, 1),
    FieldLayout::uint("ev_sp_attack", 36, 1),
    FieldLayout::uint("ev_sp_defense", 37, 1),
    FieldLayout::uint("contest_cool", 38, 1),
    FieldLayout::uint("contest_beauty", 39, 1),
    FieldLayout::uint("contest_cute", 40, 1),
    FieldLayout::uint("contest_smart", 41, 1),
    FieldLayout::uint("contest_tough", 42, 1),
    FieldLayout::uint("contest_sheen", 43, 1),
    FieldLayout::bits("pokerus_days", 44, 0, 4),
    FieldLayout::bits("pokerus_strain", 44, 4, 4),
    FieldLayout::uint("met_location", 45, 2),
    FieldLayout::bits("met_level", 47, 0, 7).with_max(100),
    FieldLayout::bits("ball", 47, 7, 4),
    FieldLayout::bits("origin_game", 48, 3, 4),
    FieldLayout::flag("ot_gender", 48, 7),
    FieldLayout::bits("iv_hp", 49, 0, 5),
    FieldLayout::bits("iv_attack", 49, 5, 5),
    FieldLayout::bits("iv_defense", 50, 2, 5),
    FieldLayout::bits("iv_speed", 50, 7, 5),
    FieldLayout::bits("iv_sp_attack", 51, 4, 5),
    FieldLayout::bits("iv_sp_defense", 52, 1, 5),
    FieldLayout::flag("is_egg", 52, 6),
    FieldLayout::flag("ability", 52, 7),
    FieldLayout::uint("ribbons", 53, 4),
    FieldLayout::uint("markings", 57, 1),
    FieldLayout::uint("met_year", 58, 1),
    FieldLayout::uint("met_month", 59, 1),
    FieldLayout::uint("met_day", 60, 1),
    FieldLayout::uint("egg_year", 61, 1),
    FieldLayout::uint("egg_month", 62, 1),
    FieldLayout::uint("egg_day", 63, 1),
    FieldLayout::string("nickname", 64, 1, NICK_LEN),
    FieldLayout::string("ot_name", 74, 1, OT_LEN),
];

const SUPPORTED_LANGUAGES: [LanguageId; 6] = [
    LanguageId::Japanese,
    LanguageId::English,
    LanguageId::French,
    LanguageId::Italian,
    LanguageId::German,
    LanguageId::Spanish,
];

/// International character table: digits, punctuation, letters
fn international_charset() -> Charset {
    let mut pairs: Vec<(u16, char)> = vec![(0x00, ' '), (0xAB, '!'), (0xAC, '?'), (0xAE, '-')];
    pairs.extend((0..10u16).map(|i| (0xA1 + i, (b'0' + i as u8) as char)));
    pairs.extend((0..26u16).map(|i| (0xBB + i, (b'A' + i as u8) as char)));
    pairs.extend((0..26u16).map(|i| (0xD5 + i, (b'a' + i as u8) as char)));
    Charset::new(TERMINATOR, &pairs)
}

/// Japanese table: the kana rows the importer tests exercise
fn japanese_charset() -> Charset {
    let mut pairs: Vec<(u16, char)> = vec![(0x00, '　')];
    for (i, ch) in "あいうえおかきくけこさしすせそたちつてとなにぬねの"
        .chars()
        .enumerate()
    {
        pairs.push((0x01 + i as u16, ch));
    }
    for (i, ch) in "アイウエオカキクケコサシスセソタチツテトナニヌネノ"
        .chars()
        .enumerate()
    {
        pairs.push((0x51 + i as u16, ch));
    }
    Charset::new(TERMINATOR, &pairs)
}

pub fn codec() -> Codec {
    let intl = international_charset();
    let mut sets: Vec<(LanguageId, Charset)> = SUPPORTED_LANGUAGES
        .iter()
        .filter(|&&l| l != LanguageId::Japanese)
        .map(|&l| (l, intl.clone()))
        .collect();
    sets.push((LanguageId::Japanese, japanese_charset()));
    Codec::by_language(sets)
}

fn registry() -> PortResult<TagRegistry> {
    RegistryBuilder::new()
        .register(SpeciesTag {
            field: "species",
            column: "index",
        })
        .register(LanguageTag {
            field: "language",
            supported: &SUPPORTED_LANGUAGES,
            default: LanguageId::English,
        })
        .register(StringTag {
            name: "nickname",
            prereqs: &["language"],
            spec: StringSpec {
                title: "Nickname",
                field: "nickname",
                uppercase: false,
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
            prereqs: &["language"],
            spec: StringSpec {
                title: "Trainer name",
                field: "ot_name",
                uppercase: false,
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
        .register(NumericTag {
            name: "secret_id",
            prereqs: &[],
            spec: NumericSpec {
                title: "Secret ID",
                field: "secret_id",
                default: 0,
                silent_default: true,
            },
            value: |r| r.trainer.secret_id,
        })
        .register(ExperienceTag {
            exp_field: Some("experience"),
            level_field: None,
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
                ("Special Attack", "ev_sp_attack"),
                ("Special Defense", "ev_sp_defense"),
            ],
            values: |r| r.battle.evs.unwrap_or_default().slots().to_vec(),
            default: 0,
        })
        .register(MultiNumericTag {
            name: "contest",
            prereqs: &[],
            title: "Contest stats",
            slots: &[
                ("Coolness", "contest_cool"),
                ("Beauty", "contest_beauty"),
                ("Cuteness", "contest_cute"),
                ("Smartness", "contest_smart"),
                ("Toughness", "contest_tough"),
                ("Sheen", "contest_sheen"),
            ],
            values: |r| r.battle.contest.unwrap_or_default().slots().to_vec(),
            default: 0,
        })
        .register(MultiNumericTag {
            name: "ivs",
            prereqs: &[],
            title: "IVs",
            slots: &[
                ("HP", "iv_hp"),
                ("Attack", "iv_attack"),
                ("Defense", "iv_defense"),
                ("Speed", "iv_speed"),
                ("Special Attack", "iv_sp_attack"),
                ("Special Defense", "iv_sp_defense"),
            ],
            values: |r| r.battle.ivs.unwrap_or_default().slots().to_vec(),
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
        .register(IndexTag {
            name: "ball",
            prereqs: &[],
            spec: IndexSpec {
                title: "Ball",
                field: "ball",
                prefix: "ball:",
                column: "index",
                default: 4,
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
        .register(EggTag { field: "is_egg" })
        .register(DateTag {
            name: "met_date",
            title: "Met date",
            year_field: "met_year",
            month_field: "met_month",
            day_field: "met_day",
            value: |r| r.met.date,
            silent_default: true,
        })
        .register(DateTag {
            name: "egg_date",
            title: "Egg date",
            year_field: "egg_year",
            month_field: "egg_month",
            day_field: "egg_day",
            value: |r| r.met.egg_date,
            silent_default: true,
        })
        .register(RibbonsTag {
            field: "ribbons",
            prefix: "ribbon:",
        })
        .register(MarkingsTag { field: "markings" })
        .register(PidTag)
        .register(PidCommitTag { field: "pid" })
        .register(AbilityTag {
            field: "ability",
            pid_field: "pid",
        })
        .build()
}

/// The exporter's format descriptor
pub fn target() -> PortResult<TargetFormat> {
    Ok(TargetFormat {
        name: NAME,
        size: SIZE,
        order: ByteOrder::Little,
        layouts: &LAYOUT,
        codec: codec(),
        registry: registry()?,
    })
}

/// Read an advance buffer back into a canonical record
pub fn import(bytes: Vec<u8>, dex: &dyn Dex) -> PortResult<CanonicalRecord> {
    let sheet = FieldSheet::over(BitBuffer::from_bytes(bytes, ByteOrder::Little), &LAYOUT)?;
    let codec = codec();
    let language =
        LanguageId::from_byte(sheet.get_uint("language")? as u8).unwrap_or(LanguageId::English);

    let mut record = CanonicalRecord::new();
    record.pid = Some(sheet.get_uint("pid")? as u32);
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
    record.trainer.secret_id = Some(sheet.get_uint("secret_id")? as u32);
    record.trainer.language = Some(language);
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

    record.battle.experience = Some(sheet.get_uint("experience")? as u32);
    record.battle.friendship = Some(sheet.get_uint("friendship")? as u32);
    record.battle.evs = Some(StatSet {
        hp: Some(sheet.get_uint("ev_hp")? as u32),
        attack: Some(sheet.get_uint("ev_attack")? as u32),
        defense: Some(sheet.get_uint("ev_defense")? as u32),
        speed: Some(sheet.get_uint("ev_speed")? as u32),
        sp_attack: Some(sheet.get_uint("ev_sp_attack")? as u32),
        sp_defense: Some(sheet.get_uint("ev_sp_defense")? as u32),
    });
    record.battle.ivs = Some(StatSet {
        hp: Some(sheet.get_uint("iv_hp")? as u32),
        attack: Some(sheet.get_uint("iv_attack")? as u32),
        defense: Some(sheet.get_uint("iv_defense")? as u32),
        speed: Some(sheet.get_uint("iv_speed")? as u32),
        sp_attack: Some(sheet.get_uint("iv_sp_attack")? as u32),
        sp_defense: Some(sheet.get_uint("iv_sp_defense")? as u32),
    });
    record.battle.contest = Some(ContestSet {
        coolness: Some(sheet.get_uint("contest_cool")? as u32),
        beauty: Some(sheet.get_uint("contest_beauty")? as u32),
        cuteness: Some(sheet.get_uint("contest_cute")? as u32),
        smartness: Some(sheet.get_uint("contest_smart")? as u32),
        toughness: Some(sheet.get_uint("contest_tough")? as u32),
        sheen: Some(sheet.get_uint("contest_sheen")? as u32),
    });
    record.battle.pokerus_strain = Some(sheet.get_uint("pokerus_strain")? as u32);
    record.battle.pokerus_days = Some(sheet.get_uint("pokerus_days")? as u32);

    record.met.location = match sheet.get_uint("met_location")? {
        0 => None,
        idx => reverse(dex, NAME, "location:", idx),
    };
    record.met.level = Some(sheet.get_uint("met_level")? as u32);
    record.met.ball = reverse(dex, NAME, "ball:", sheet.get_uint("ball")?);
    record.met.date = import_date(&sheet, "met_year", "met_month", "met_day")?;
    record.met.egg_date = import_date(&sheet, "egg_year", "egg_month", "egg_day")?;

    record.is_egg = Some(sheet.get_flag("is_egg")?);
    record.nickname_flagged = Some(sheet.get_flag("nickname_flag")?);
    let nick_codes = sheet.get_codes("nickname")?;
    let nickname = codec.decode(&nick_codes, language)?;
    if !nickname.is_empty() {
        record.nickname = Some(nickname);
    }
    record.nickname_trash = trash_codes(&nick_codes, TERMINATOR);

    let ribbon_mask = sheet.get_uint("ribbons")?;
    record.ribbons = (0..64)
        .filter(|bit| ribbon_mask & (1 << bit) != 0)
        .filter_map(|bit| {
            dex.name_for(
                NAME,
                "ribbon:",
                &portmon_core::DexValue::Int(bit),
                "bit",
            )
        })
        .collect();
    record.markings = markings_from_mask(sheet.get_uint("markings")?);
    Ok(record)
}

fn import_date(
    sheet: &FieldSheet,
    year: &str,
    month: &str,
    day: &str,
) -> PortResult<Option<PortDate>> {
    let (y, m, d) = (
        sheet.get_uint(year)?,
        sheet.get_uint(month)?,
        sheet.get_uint(day)?,
    );
    if m == 0 || d == 0 {
        return Ok(None);
    }
    Ok(Some(PortDate {
        year: 2000 + y as u16,
        month: m as u8,
        day: d as u8,
    }))
}

//! Species, trainer-identity enums, and boolean flag tags

use portmon_core::{Alert, Gender, GenderRatio, LanguageId, PortResult};

use crate::{PortContext, Tag};

/// Writes the species index and publishes the species working variables
/// (index, gender ratio) every downstream converter keys off
pub struct SpeciesTag {
    pub field: &'static str,
    pub column: &'static str,
}

impl Tag for SpeciesTag {
    fn name(&self) -> &'static str {
        "species"
    }

    fn run(&self, ctx: &mut PortContext<'_>) -> PortResult<()> {
        // can_port guarantees presence and existence; defaulting here only
        // covers a format registered without the pre-check
        let Some(species) = ctx.record.species.clone() else {
            ctx.warn(Alert::invalid("Species", "index 0"));
            ctx.sheet.set_uint(self.field, 0)?;
            return Ok(());
        };

        match ctx.dex.index_of(ctx.format, &species, self.column) {
            Some(index) => {
                ctx.scratch.species_index = Some(index);
                ctx.sheet.set_uint(self.field, index as u64)?;
            }
            None => {
                ctx.warn(Alert::invalid("Species", "index 0"));
                ctx.sheet.set_uint(self.field, 0)?;
            }
        }

        if let Some(code) = ctx
            .dex
            .value_of(ctx.format, &species, "gender_ratio")
            .and_then(|v| v.as_int())
        {
            ctx.scratch.gender_ratio = GenderRatio::from_code(code as u8);
        }
        Ok(())
    }
}

/// Trainer gender: enum family restricted to Male/Female
pub struct OtGenderTag {
    pub field: &'static str,
}

impl Tag for OtGenderTag {
    fn name(&self) -> &'static str {
        "ot_gender"
    }

    fn run(&self, ctx: &mut PortContext<'_>) -> PortResult<()> {
        let value = ctx.record.trainer.gender;
        ctx.put_enum(
            "Trainer gender",
            self.field,
            value,
            Gender::Male,
            |g| matches!(g, Gender::Male | Gender::Female),
            |g| (g == Gender::Female) as u64,
        )?;
        Ok(())
    }
}

/// Language byte; publishes the written language so string converters pick
/// the matching charset
pub struct LanguageTag {
    pub field: &'static str,
    pub supported: &'static [LanguageId],
    pub default: LanguageId,
}

impl Tag for LanguageTag {
    fn name(&self) -> &'static str {
        "language"
    }

    fn run(&self, ctx: &mut PortContext<'_>) -> PortResult<()> {
        let value = ctx.record.trainer.language;
        let supported = self.supported;
        let chosen = ctx.put_enum(
            "Language",
            self.field,
            value,
            self.default,
            |l| supported.contains(&l),
            |l| l.to_byte() as u64,
        )?;
        ctx.scratch.language = Some(chosen);
        Ok(())
    }
}

/// Egg flag; absence simply means "not an egg"
pub struct EggTag {
    pub field: &'static str,
}

impl Tag for EggTag {
    fn name(&self) -> &'static str {
        "egg"
    }

    fn run(&self, ctx: &mut PortContext<'_>) -> PortResult<()> {
        let is_egg = ctx.record.is_egg.unwrap_or(false);
        ctx.sheet.set_flag(self.field, is_egg)?;
        Ok(())
    }
}

/// Nickname-presence flag, checked against what the source format claimed
pub struct NicknameFlagTag {
    pub field: &'static str,
}

impl Tag for NicknameFlagTag {
    fn name(&self) -> &'static str {
        "nickname_flag"
    }

    fn prerequisites(&self) -> &'static [&'static str] {
        &["nickname"]
    }

    fn run(&self, ctx: &mut PortContext<'_>) -> PortResult<()> {
        let actual = ctx.scratch.has_nickname;
        if let Some(claimed) = ctx.record.nickname_flagged {
            if claimed != actual {
                ctx.warn(Alert::mismatch(
                    "Nickname flag",
                    "the source claimed a nickname state that disagrees with the name actually carried; the flag now follows the name",
                ));
            }
        }
        ctx.sheet.set_flag(self.field, actual)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use portmon_core::{AlertKind, CanonicalRecord, DexValue, MemoryDex};
    use portmon_wire::{ByteOrder, Charset, Codec, FieldLayout, FieldSheet};

    const LAYOUT: [FieldLayout; 4] = [
        FieldLayout::uint("species", 0, 2),
        FieldLayout::flag("ot_gender", 2, 7),
        FieldLayout::uint("language", 3, 1),
        FieldLayout::flag("nickname_flag", 2, 0),
    ];

    fn codec() -> Codec {
        Codec::universal(Charset::new(0xFF, &[(0x01, 'A')]))
    }

    fn ctx<'a>(codec: &'a Codec, dex: &'a MemoryDex, record: CanonicalRecord) -> PortContext<'a> {
        let sheet = FieldSheet::new(8, ByteOrder::Little, &LAYOUT).unwrap();
        PortContext::new(record, sheet, codec, dex, "test", Default::default())
    }

    #[test]
    fn test_species_publishes_working_variables() {
        let codec = codec();
        let mut dex = MemoryDex::new();
        dex.insert("test", "Unown", "index", DexValue::Int(201));
        dex.insert("test", "Unown", "gender_ratio", DexValue::Int(2));

        let mut record = CanonicalRecord::new();
        record.species = Some("Unown".into());
        let mut ctx = ctx(&codec, &dex, record);

        SpeciesTag {
            field: "species",
            column: "index",
        }
        .run(&mut ctx)
        .unwrap();

        assert_eq!(ctx.sheet.get_uint("species").unwrap(), 201);
        assert_eq!(ctx.scratch.species_index, Some(201));
        assert_eq!(ctx.scratch.gender_ratio, Some(portmon_core::GenderRatio::Genderless));
    }

    #[test]
    fn test_ot_gender_rejects_genderless() {
        let codec = codec();
        let dex = MemoryDex::new();
        let mut record = CanonicalRecord::new();
        record.trainer.gender = Some(Gender::Genderless);
        let mut ctx = ctx(&codec, &dex, record);

        OtGenderTag { field: "ot_gender" }.run(&mut ctx).unwrap();

        assert_eq!(ctx.warnings()[0].kind, AlertKind::Invalid);
        assert!(!ctx.sheet.get_flag("ot_gender").unwrap());
    }

    #[test]
    fn test_language_publishes_choice() {
        let codec = codec();
        let dex = MemoryDex::new();
        let mut record = CanonicalRecord::new();
        record.trainer.language = Some(LanguageId::Korean);
        let mut ctx = ctx(&codec, &dex, record);

        LanguageTag {
            field: "language",
            supported: &[LanguageId::English, LanguageId::Japanese],
            default: LanguageId::English,
        }
        .run(&mut ctx)
        .unwrap();

        // unsupported language falls back with an INVALID warning
        assert_eq!(ctx.warnings()[0].kind, AlertKind::Invalid);
        assert_eq!(ctx.scratch.language, Some(LanguageId::English));
        assert_eq!(
            ctx.sheet.get_uint("language").unwrap(),
            LanguageId::English.to_byte() as u64
        );
    }

    #[test]
    fn test_nickname_flag_mismatch_warns() {
        let codec = codec();
        let dex = MemoryDex::new();
        let mut record = CanonicalRecord::new();
        record.nickname_flagged = Some(true);
        let mut ctx = ctx(&codec, &dex, record);
        ctx.scratch.has_nickname = false;

        NicknameFlagTag {
            field: "nickname_flag",
        }
        .run(&mut ctx)
        .unwrap();

        assert_eq!(ctx.warnings()[0].kind, AlertKind::Mismatch);
        assert!(!ctx.sheet.get_flag("nickname_flag").unwrap());
    }
}

//! Identity-seed conversion, split across both passes
//!
//! The first-pass tag decides the seed (keeping, regenerating, or deferring
//! the conflict to the caller) and parks it in scratch as a resolver; the
//! second-pass committer writes whichever candidate survived resolution.
//! The ability slot derives from the committed seed, so it is second-pass
//! too.

use portmon_core::{
    gender_of, is_shiny, letter_form, letter_index, letter_name, nature_of, Alert, Choice,
    ErrorResolver, GenderRatio, PortError, PortResult, SHINY_THRESHOLD_CLASSIC,
    SHINY_THRESHOLD_WIDE,
};

use crate::{Phase, PidConstraints, PortContext, ShinyTarget, Tag};

/// Seed-derived attributes in display form, for choice and alert text
fn describe(pid: u32, ratio: GenderRatio, letters: bool) -> String {
    let mut parts = vec![format!("nature {:?}", nature_of(pid))];
    if ratio.fixed().is_none() {
        parts.push(format!("gender {:?}", gender_of(pid, ratio)));
    }
    if letters {
        if let Some(name) = letter_name(letter_form(pid)) {
            parts.push(format!("letter {name}"));
        }
    }
    parts.join(", ")
}

/// First pass: decide the identity seed
///
/// Publishes `scratch.pid` for the committer. A record without a seed gets
/// a generated one satisfying its stated attributes; a record whose seed
/// contradicts its stated attributes either regenerates silently (stat
/// override ports) or defers a keep-or-regenerate choice to the caller.
pub struct PidTag;

impl PidTag {
    fn constraints(&self, ctx: &mut PortContext<'_>) -> (PidConstraints, GenderRatio, bool) {
        let ratio = ctx
            .scratch
            .gender_ratio
            .unwrap_or(GenderRatio::Male1Female1);

        let mut constraints = PidConstraints {
            nature: ctx.record.nature,
            ..Default::default()
        };

        if let Some(gender) = ctx.record.gender {
            if ratio.admits(gender) {
                constraints.gender = Some((gender, ratio));
            } else {
                ctx.warn(Alert::invalid(
                    "Gender",
                    "the gender the species distribution allows",
                ));
            }
        }

        let letters = ctx
            .record
            .species
            .as_deref()
            .and_then(|s| ctx.dex.value_of(ctx.format, s, "letter_forms"))
            .and_then(|v| v.as_int())
            .map(|n| n > 1)
            .unwrap_or(false);
        if letters {
            constraints.letter = ctx.record.form.as_deref().and_then(letter_index);
        }

        (constraints, ratio, letters)
    }
}

impl Tag for PidTag {
    fn name(&self) -> &'static str {
        "pid"
    }

    fn prerequisites(&self) -> &'static [&'static str] {
        &["species"]
    }

    fn run(&self, ctx: &mut PortContext<'_>) -> PortResult<()> {
        let (constraints, ratio, letters) = self.constraints(ctx);
        let threshold = if ctx.flags.wide_shiny_window {
            SHINY_THRESHOLD_WIDE
        } else {
            SHINY_THRESHOLD_CLASSIC
        };
        let public_id = ctx.record.trainer.public_id.unwrap_or(0) as u16;
        let secret_id = ctx.record.trainer.secret_id.unwrap_or(0) as u16;

        let resolver = match ctx.record.pid {
            None => {
                let pid = constraints.generate(ctx.rng_mut());
                ctx.warn(Alert::unspecified(
                    "Identity seed",
                    &format!("a generated seed ({})", describe(pid, ratio, letters)),
                ));
                ErrorResolver::immediate(pid)
            }
            Some(pid) if constraints.satisfied_by(pid) => ErrorResolver::immediate(pid),
            Some(pid) => {
                // regeneration preserves the seed's shininess under the
                // target format's window
                let regen = PidConstraints {
                    shiny: Some(ShinyTarget {
                        shiny: is_shiny(pid, public_id, secret_id, threshold),
                        public_id,
                        secret_id,
                        threshold,
                    }),
                    ..constraints
                }
                .generate(ctx.rng_mut());

                if ctx.flags.apply_stat_override {
                    ctx.warn(Alert::casted(
                        "Identity seed",
                        &describe(regen, ratio, letters),
                    ));
                    ErrorResolver::immediate(regen)
                } else {
                    let choice = Choice::new(
                        "Identity seed",
                        "The seed disagrees with the record's stated attributes.",
                        vec![
                            format!("Keep the current seed ({})", describe(pid, ratio, letters)),
                            format!(
                                "Generate a new seed ({})",
                                describe(regen, ratio, letters)
                            ),
                        ],
                    );
                    ctx.defer(choice, vec![pid, regen])
                }
            }
        };

        ctx.scratch.pid = Some(resolver);
        Ok(())
    }
}

/// Second pass: commit the resolved seed
pub struct PidCommitTag {
    pub field: &'static str,
}

impl Tag for PidCommitTag {
    fn name(&self) -> &'static str {
        "pid_commit"
    }

    fn phase(&self) -> Phase {
        Phase::Second
    }

    fn prerequisites(&self) -> &'static [&'static str] {
        &["pid"]
    }

    fn run(&self, ctx: &mut PortContext<'_>) -> PortResult<()> {
        let resolver = ctx
            .scratch
            .pid
            .take()
            .ok_or(PortError::MissingWorkingValue("pid"))?;
        let pid = *resolver.resolve(ctx.choices())?;

        if let Some(original) = ctx.record.pid {
            if original != pid {
                ctx.note(Alert::casted("Identity seed", &format!("{pid:#010X}")));
            }
        }
        ctx.sheet.set_uint(self.field, pid as u64)?;
        Ok(())
    }
}

/// Second pass: ability slot, derived from the committed seed when the
/// record does not name one
pub struct AbilityTag {
    pub field: &'static str,
    pub pid_field: &'static str,
}

impl Tag for AbilityTag {
    fn name(&self) -> &'static str {
        "ability"
    }

    fn phase(&self) -> Phase {
        Phase::Second
    }

    fn prerequisites(&self) -> &'static [&'static str] {
        &["pid_commit"]
    }

    fn run(&self, ctx: &mut PortContext<'_>) -> PortResult<()> {
        let pid = ctx.sheet.get_uint(self.pid_field)? as u32;
        let parity = pid & 1 == 1;

        let slot = match ctx.record.ability.clone() {
            None => parity,
            Some(name) => {
                let slot_of = |column: &str| {
                    ctx.record
                        .species
                        .as_deref()
                        .and_then(|s| ctx.dex.value_of(ctx.format, s, column))
                        .and_then(|v| v.as_str().map(str::to_string))
                };
                if slot_of("ability0").as_deref() == Some(name.as_str()) {
                    false
                } else if slot_of("ability1").as_deref() == Some(name.as_str()) {
                    true
                } else {
                    ctx.warn(Alert::invalid(
                        "Ability",
                        "the slot the committed seed selects",
                    ));
                    parity
                }
            }
        };

        ctx.sheet.set_flag(self.field, slot)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use portmon_core::{AlertKind, CanonicalRecord, DexValue, Gender, MemoryDex, Nature};
    use portmon_wire::{ByteOrder, Charset, Codec, FieldLayout, FieldSheet};

    const LAYOUT: [FieldLayout; 2] = [
        FieldLayout::uint("pid", 0, 4),
        FieldLayout::flag("ability", 4, 0),
    ];

    fn dex() -> MemoryDex {
        let mut dex = MemoryDex::new();
        dex.insert("test", "Unown", "index", DexValue::Int(201));
        dex.insert("test", "Unown", "letter_forms", DexValue::Int(28));
        dex.insert("test", "Mudkip", "index", DexValue::Int(258));
        dex.insert("test", "Mudkip", "ability0", DexValue::Str("Torrent".into()));
        dex.insert("test", "Mudkip", "ability1", DexValue::Str("Damp".into()));
        dex
    }

    fn ctx<'a>(codec: &'a Codec, dex: &'a MemoryDex, record: CanonicalRecord) -> PortContext<'a> {
        let sheet = FieldSheet::new(8, ByteOrder::Little, &LAYOUT).unwrap();
        let mut ctx = PortContext::new(record, sheet, codec, dex, "test", Default::default());
        ctx.seed_rng(42);
        ctx
    }

    #[test]
    fn test_absent_seed_generates_and_warns() {
        let codec = Codec::universal(Charset::new(0xFF, &[(1, 'A')]));
        let dex = dex();
        let mut record = CanonicalRecord::new();
        record.species = Some("Mudkip".into());
        record.nature = Some(Nature::Adamant);
        let mut ctx = ctx(&codec, &dex, record);

        PidTag.run(&mut ctx).unwrap();
        PidCommitTag { field: "pid" }.run(&mut ctx).unwrap();

        let pid = ctx.sheet.get_uint("pid").unwrap() as u32;
        assert_eq!(nature_of(pid), Nature::Adamant);
        assert_eq!(ctx.warnings()[0].kind, AlertKind::Unspecified);
        assert!(ctx.choices().is_empty());
    }

    #[test]
    fn test_consistent_seed_kept_verbatim() {
        let codec = Codec::universal(Charset::new(0xFF, &[(1, 'A')]));
        let dex = dex();
        let mut record = CanonicalRecord::new();
        record.species = Some("Mudkip".into());
        record.pid = Some(3); // nature 3 = Adamant
        record.nature = Some(Nature::Adamant);
        let mut ctx = ctx(&codec, &dex, record);

        PidTag.run(&mut ctx).unwrap();
        PidCommitTag { field: "pid" }.run(&mut ctx).unwrap();

        assert_eq!(ctx.sheet.get_uint("pid").unwrap(), 3);
        assert!(ctx.warnings().is_empty());
        assert!(ctx.notes().is_empty());
    }

    #[test]
    fn test_conflicting_seed_defers_keep_or_regenerate() {
        let codec = Codec::universal(Charset::new(0xFF, &[(1, 'A')]));
        let dex = dex();
        let mut record = CanonicalRecord::new();
        record.species = Some("Mudkip".into());
        record.pid = Some(3); // Adamant
        record.nature = Some(Nature::Jolly);
        let mut ctx = ctx(&codec, &dex, record);

        PidTag.run(&mut ctx).unwrap();

        assert_eq!(ctx.choices().len(), 1);
        assert_eq!(ctx.choices()[0].options.len(), 2);
        assert!(ctx.choices()[0].options[0].contains("Adamant"));
        assert!(ctx.choices()[0].options[1].contains("Jolly"));

        // committing before resolution fails
        let mut unresolved = ctx;
        assert!(matches!(
            PidCommitTag { field: "pid" }.run(&mut unresolved),
            Err(PortError::UnresolvedChoice(0))
        ));
    }

    #[test]
    fn test_resolved_regeneration_commits_with_note() {
        let codec = Codec::universal(Charset::new(0xFF, &[(1, 'A')]));
        let dex = dex();
        let mut record = CanonicalRecord::new();
        record.species = Some("Mudkip".into());
        record.pid = Some(3);
        record.nature = Some(Nature::Jolly);
        let mut ctx = ctx(&codec, &dex, record);

        PidTag.run(&mut ctx).unwrap();
        ctx.select(0, 1).unwrap();
        PidCommitTag { field: "pid" }.run(&mut ctx).unwrap();

        let pid = ctx.sheet.get_uint("pid").unwrap() as u32;
        assert_eq!(nature_of(pid), Nature::Jolly);
        assert_eq!(ctx.notes()[0].kind, AlertKind::Casted);
    }

    #[test]
    fn test_override_port_regenerates_silently() {
        let codec = Codec::universal(Charset::new(0xFF, &[(1, 'A')]));
        let dex = dex();
        let mut record = CanonicalRecord::new();
        record.species = Some("Mudkip".into());
        record.pid = Some(3);
        record.nature = Some(Nature::Jolly);
        let sheet = FieldSheet::new(8, ByteOrder::Little, &LAYOUT).unwrap();
        let mut ctx = PortContext::new(
            record,
            sheet,
            &codec,
            &dex,
            "test",
            crate::PortFlags {
                apply_stat_override: true,
                ..Default::default()
            },
        );
        ctx.seed_rng(42);

        PidTag.run(&mut ctx).unwrap();
        PidCommitTag { field: "pid" }.run(&mut ctx).unwrap();

        assert!(ctx.choices().is_empty());
        assert!(ctx.warnings().iter().any(|a| a.kind == AlertKind::Casted));
        let pid = ctx.sheet.get_uint("pid").unwrap() as u32;
        assert_eq!(nature_of(pid), Nature::Jolly);
    }

    #[test]
    fn test_letter_constraint_from_form() {
        let codec = Codec::universal(Charset::new(0xFF, &[(1, 'A')]));
        let dex = dex();
        let mut record = CanonicalRecord::new();
        record.species = Some("Unown".into());
        record.form = Some("Z".into());
        let mut ctx = ctx(&codec, &dex, record);
        ctx.scratch.gender_ratio = Some(GenderRatio::Genderless);

        PidTag.run(&mut ctx).unwrap();
        PidCommitTag { field: "pid" }.run(&mut ctx).unwrap();

        let pid = ctx.sheet.get_uint("pid").unwrap() as u32;
        assert_eq!(letter_form(pid), 25);
    }

    #[test]
    fn test_inadmissible_gender_dropped_with_alert() {
        let codec = Codec::universal(Charset::new(0xFF, &[(1, 'A')]));
        let dex = dex();
        let mut record = CanonicalRecord::new();
        record.species = Some("Mudkip".into());
        record.gender = Some(Gender::Female);
        let mut ctx = ctx(&codec, &dex, record);
        ctx.scratch.gender_ratio = Some(GenderRatio::MaleOnly);

        PidTag.run(&mut ctx).unwrap();

        assert_eq!(ctx.warnings()[0].kind, AlertKind::Invalid);
    }

    #[test]
    fn test_ability_slot_from_name_and_parity() {
        let codec = Codec::universal(Charset::new(0xFF, &[(1, 'A')]));
        let dex = dex();
        let mut record = CanonicalRecord::new();
        record.species = Some("Mudkip".into());
        record.ability = Some("Damp".into());
        let mut ctx = ctx(&codec, &dex, record);
        ctx.sheet.set_uint("pid", 2).unwrap(); // even parity

        AbilityTag {
            field: "ability",
            pid_field: "pid",
        }
        .run(&mut ctx)
        .unwrap();
        assert!(ctx.sheet.get_flag("ability").unwrap());

        // unknown ability name falls back to seed parity
        ctx.record.ability = Some("Overgrow".into());
        AbilityTag {
            field: "ability",
            pid_field: "pid",
        }
        .run(&mut ctx)
        .unwrap();
        assert!(!ctx.sheet.get_flag("ability").unwrap());
        assert_eq!(ctx.warnings()[0].kind, AlertKind::Invalid);
    }
}

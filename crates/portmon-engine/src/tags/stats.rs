//! Experience/level consistency converter and the growth curve it uses

use portmon_core::{Alert, PortResult};

use crate::{PortContext, Tag};

pub const MAX_LEVEL: u32 = 100;

/// Medium-slow growth: `6/5 n^3 - 15 n^2 + 100 n - 140`, floored at zero
pub fn exp_for_level(level: u32) -> u32 {
    let n = level as i64;
    let e = 6 * n * n * n / 5 - 15 * n * n + 100 * n - 140;
    e.max(0) as u32
}

/// Highest level whose threshold `exp` reaches
pub fn level_for_exp(exp: u32) -> u32 {
    (1..=MAX_LEVEL)
        .rev()
        .find(|&l| exp_for_level(l) <= exp)
        .unwrap_or(1)
}

/// Cross-attribute converter for level and experience
///
/// Either side may be absent; when both are present and disagree, the level
/// wins and the recomputed experience is reported as a cast.
pub struct ExperienceTag {
    pub exp_field: Option<&'static str>,
    pub level_field: Option<&'static str>,
}

impl Tag for ExperienceTag {
    fn name(&self) -> &'static str {
        "experience"
    }

    fn run(&self, ctx: &mut PortContext<'_>) -> PortResult<()> {
        let (min_level, max_level) = match self.level_field {
            Some(field) => ctx.sheet.bounds(field)?,
            None => (1, MAX_LEVEL as u64),
        };

        let clamp_level = |ctx: &mut PortContext<'_>, level: u32| -> u32 {
            if (level as u64) > max_level {
                ctx.warn(Alert::overflow("Level", max_level));
                max_level as u32
            } else if (level as u64) < min_level {
                ctx.warn(Alert::underflow("Level", min_level));
                min_level as u32
            } else {
                level
            }
        };

        let (level, exp) = match (ctx.record.battle.level, ctx.record.battle.experience) {
            (None, None) => {
                ctx.warn(Alert::unspecified("Level", "level 5"));
                (5, exp_for_level(5))
            }
            (Some(l), None) => {
                let l = clamp_level(ctx, l);
                (l, exp_for_level(l))
            }
            (None, Some(x)) => {
                let cap = exp_for_level(max_level as u32);
                let x = if x > cap {
                    ctx.warn(Alert::overflow("Experience", cap as u64));
                    cap
                } else {
                    x
                };
                (level_for_exp(x).max(min_level as u32), x)
            }
            (Some(l), Some(x)) => {
                let l = clamp_level(ctx, l);
                if level_for_exp(x) != l {
                    ctx.warn(Alert::casted(
                        "Experience",
                        "experience does not match the level; recomputed from the level",
                    ));
                    (l, exp_for_level(l))
                } else {
                    (l, x)
                }
            }
        };

        if let Some(field) = self.exp_field {
            ctx.sheet.set_uint(field, exp as u64)?;
        }
        if let Some(field) = self.level_field {
            ctx.sheet.set_uint(field, level as u64)?;
        }
        ctx.scratch.level = Some(level);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use portmon_core::{AlertKind, CanonicalRecord, MemoryDex};
    use portmon_wire::{ByteOrder, Charset, Codec, FieldLayout, FieldSheet};

    const LAYOUT: [FieldLayout; 2] = [
        FieldLayout::uint("exp", 0, 4),
        FieldLayout::uint("level", 4, 1).with_min(1).with_max(100),
    ];

    fn run(record: CanonicalRecord) -> (u64, u64, Vec<AlertKind>) {
        let codec = Codec::universal(Charset::new(0xFF, &[(1, 'A')]));
        let dex = MemoryDex::new();
        let sheet = FieldSheet::new(8, ByteOrder::Little, &LAYOUT).unwrap();
        let mut ctx = PortContext::new(record, sheet, &codec, &dex, "test", Default::default());
        ExperienceTag {
            exp_field: Some("exp"),
            level_field: Some("level"),
        }
        .run(&mut ctx)
        .unwrap();
        let kinds = ctx.warnings().iter().map(|a| a.kind).collect();
        (
            ctx.sheet.get_uint("exp").unwrap(),
            ctx.sheet.get_uint("level").unwrap(),
            kinds,
        )
    }

    #[test]
    fn test_curve_is_monotonic() {
        assert_eq!(exp_for_level(1), 0);
        for l in 2..=100 {
            assert!(exp_for_level(l) > exp_for_level(l - 1));
        }
        for l in 1..=100 {
            assert_eq!(level_for_exp(exp_for_level(l)), l);
        }
    }

    #[test]
    fn test_level_only_derives_exp() {
        let mut record = CanonicalRecord::new();
        record.battle.level = Some(50);
        let (exp, level, kinds) = run(record);
        assert_eq!(level, 50);
        assert_eq!(exp, exp_for_level(50) as u64);
        assert!(kinds.is_empty());
    }

    #[test]
    fn test_exp_only_derives_level() {
        let mut record = CanonicalRecord::new();
        record.battle.experience = Some(exp_for_level(30) + 1);
        let (exp, level, _) = run(record);
        assert_eq!(level, 30);
        assert_eq!(exp, (exp_for_level(30) + 1) as u64);
    }

    #[test]
    fn test_disagreement_prefers_level() {
        let mut record = CanonicalRecord::new();
        record.battle.level = Some(10);
        record.battle.experience = Some(exp_for_level(60));
        let (exp, level, kinds) = run(record);
        assert_eq!(level, 10);
        assert_eq!(exp, exp_for_level(10) as u64);
        assert_eq!(kinds, vec![AlertKind::Casted]);
    }

    #[test]
    fn test_absent_both_defaults_level_five() {
        let (exp, level, kinds) = run(CanonicalRecord::new());
        assert_eq!(level, 5);
        assert_eq!(exp, exp_for_level(5) as u64);
        assert_eq!(kinds, vec![AlertKind::Unspecified]);
    }

    #[test]
    fn test_level_clamps_with_alerts() {
        let mut record = CanonicalRecord::new();
        record.battle.level = Some(140);
        let (_, level, kinds) = run(record);
        assert_eq!(level, 100);
        assert_eq!(kinds, vec![AlertKind::Overflow]);
    }
}

//! Move-set converters
//!
//! The moves tag fills the target's move slots through the dex and records
//! which canonical moves were actually used, so the PP tags can line their
//! metadata up with the slots that survived.

use portmon_core::{Alert, AlertKind, PortResult};

use crate::{PortContext, Tag};

/// Move indices; publishes `scratch.used_moves`
pub struct MovesTag {
    pub field: &'static str,
    pub prefix: &'static str,
    pub column: &'static str,
}

impl Tag for MovesTag {
    fn name(&self) -> &'static str {
        "moves"
    }

    fn run(&self, ctx: &mut PortContext<'_>) -> PortResult<()> {
        let slots = ctx.sheet.layout(self.field)?.count;
        let mut out = vec![0u64; slots];
        let mut used = Vec::new();
        let mut unknown: Vec<String> = Vec::new();
        let mut overflowed = false;

        for (i, mv) in ctx.record.moves.clone().iter().enumerate() {
            let Some(name) = mv.name.as_deref() else {
                continue;
            };
            let key = format!("{}{}", self.prefix, name);
            match ctx.dex.index_of(ctx.format, &key, self.column) {
                Some(index) => {
                    if used.len() == slots {
                        overflowed = true;
                        break;
                    }
                    out[used.len()] = index as u64;
                    used.push(i);
                }
                None => unknown.push(name.to_string()),
            }
        }

        if used.is_empty() {
            ctx.warn(Alert::unspecified("Moves", "an empty move set"));
        }
        if !unknown.is_empty() {
            ctx.warn(Alert::invalid("Moves", "the moves this format knows").with_message(
                format!("Moves not in this format were dropped: {}.", unknown.join(", ")),
            ));
        }
        if overflowed {
            ctx.warn(Alert::too_long("Moves", slots));
        }

        ctx.sheet.set_array(self.field, &out)?;
        ctx.scratch.used_moves = used;
        Ok(())
    }
}

/// PP and PP-up metadata for the slots the moves tag kept
pub struct PpTag {
    pub pp_field: &'static str,
    /// Some formats pack PP-ups separately; absent means the format does
    /// not store them
    pub pp_ups_field: Option<&'static str>,
    pub prefix: &'static str,
}

impl Tag for PpTag {
    fn name(&self) -> &'static str {
        "pp"
    }

    fn prerequisites(&self) -> &'static [&'static str] {
        &["moves"]
    }

    fn run(&self, ctx: &mut PortContext<'_>) -> PortResult<()> {
        let slots = ctx.sheet.layout(self.pp_field)?.count;
        let (_, pp_max) = ctx.sheet.bounds(self.pp_field)?;
        let ups_bounds = match self.pp_ups_field {
            Some(f) => Some((ctx.sheet.layout(f)?.count, ctx.sheet.bounds(f)?.1)),
            None => None,
        };

        let used = ctx.scratch.used_moves.clone();
        let mut pp_out = vec![0u64; slots];
        let mut ups_out = vec![0u64; ups_bounds.map(|(c, _)| c).unwrap_or(0)];
        let mut clamped: Vec<String> = Vec::new();

        for (slot, &mi) in used.iter().enumerate().take(slots) {
            let mv = &ctx.record.moves[mi];
            let name = mv.name.clone().unwrap_or_default();

            // base PP from the dex when the record does not carry one
            let base = ctx
                .dex
                .value_of(ctx.format, &format!("{}{}", self.prefix, name), "pp")
                .and_then(|v| v.as_int())
                .unwrap_or(0) as u64;
            let pp = mv.pp.map(|p| p as u64).unwrap_or(base);
            pp_out[slot] = if pp > pp_max {
                clamped.push(name.clone());
                pp_max
            } else {
                pp
            };

            if let Some((count, ups_max)) = ups_bounds {
                if slot < count {
                    let ups = mv.pp_ups.map(|u| u as u64).unwrap_or(0);
                    ups_out[slot] = if ups > ups_max {
                        clamped.push(format!("{name} (PP ups)"));
                        ups_max
                    } else {
                        ups
                    };
                }
            }
        }

        if !clamped.is_empty() {
            ctx.warn(
                Alert::new(AlertKind::Overflow, "PP", "").with_message(format!(
                    "PP above this format's maximum was clamped: {}.",
                    clamped.join(", ")
                )),
            );
        }

        ctx.sheet.set_array(self.pp_field, &pp_out)?;
        if let Some(f) = self.pp_ups_field {
            ctx.sheet.set_array(f, &ups_out)?;
        }
        Ok(())
    }
}

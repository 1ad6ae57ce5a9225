//! Ribbons, box markings, and calendar dates

use portmon_core::{Alert, CanonicalRecord, PortDate, PortResult};

use crate::{PortContext, Tag};

/// Ribbon set packed into a bitmask, one dex-declared bit per ribbon
pub struct RibbonsTag {
    pub field: &'static str,
    pub prefix: &'static str,
}

impl Tag for RibbonsTag {
    fn name(&self) -> &'static str {
        "ribbons"
    }

    fn run(&self, ctx: &mut PortContext<'_>) -> PortResult<()> {
        let (_, max) = ctx.sheet.bounds(self.field)?;
        let mut mask = 0u64;
        let mut unknown: Vec<String> = Vec::new();

        for ribbon in ctx.record.ribbons.clone() {
            let key = format!("{}{}", self.prefix, ribbon);
            match ctx
                .dex
                .value_of(ctx.format, &key, "bit")
                .and_then(|v| v.as_int())
            {
                Some(bit) if (0..64).contains(&bit) && (1u64 << bit) <= max => mask |= 1 << bit,
                _ => unknown.push(ribbon),
            }
        }

        if !unknown.is_empty() {
            ctx.warn(
                Alert::invalid("Ribbons", "the ribbons this format stores").with_message(format!(
                    "Ribbons this format cannot store were dropped: {}.",
                    unknown.join(", ")
                )),
            );
        }
        ctx.sheet.set_uint(self.field, mask)?;
        Ok(())
    }
}

/// Box markings packed into their fixed bit positions
pub struct MarkingsTag {
    pub field: &'static str,
}

impl Tag for MarkingsTag {
    fn name(&self) -> &'static str {
        "markings"
    }

    fn run(&self, ctx: &mut PortContext<'_>) -> PortResult<()> {
        let mask = ctx
            .record
            .markings
            .iter()
            .fold(0u64, |m, mark| m | 1 << mark.bit());
        ctx.sheet.set_uint(self.field, mask)?;
        Ok(())
    }
}

/// One calendar date written as a year-since-2000 byte plus month and day
pub struct DateTag {
    pub name: &'static str,
    pub title: &'static str,
    pub year_field: &'static str,
    pub month_field: &'static str,
    pub day_field: &'static str,
    pub value: fn(&CanonicalRecord) -> Option<PortDate>,
    /// Absent dates are ordinary for most records (egg dates especially);
    /// suppress the UNSPECIFIED warning when set
    pub silent_default: bool,
}

impl Tag for DateTag {
    fn name(&self) -> &'static str {
        self.name
    }

    fn run(&self, ctx: &mut PortContext<'_>) -> PortResult<()> {
        let Some(date) = (self.value)(&ctx.record) else {
            if !self.silent_default {
                ctx.warn(Alert::unspecified(self.title, "no date"));
            }
            ctx.sheet.set_uint(self.year_field, 0)?;
            ctx.sheet.set_uint(self.month_field, 0)?;
            ctx.sheet.set_uint(self.day_field, 0)?;
            return Ok(());
        };

        let (_, year_max) = ctx.sheet.bounds(self.year_field)?;
        let year = if date.year < 2000 {
            ctx.warn(Alert::underflow(self.title, 2000));
            0
        } else if (date.year as u64 - 2000) > year_max {
            ctx.warn(Alert::overflow(self.title, 2000 + year_max));
            year_max
        } else {
            date.year as u64 - 2000
        };

        let mut out_of_range = false;
        let month = if (1..=12).contains(&date.month) {
            date.month as u64
        } else {
            out_of_range = true;
            1
        };
        let day = if (1..=31).contains(&date.day) {
            date.day as u64
        } else {
            out_of_range = true;
            1
        };
        if out_of_range {
            ctx.warn(Alert::invalid(self.title, "the first of the month"));
        }

        ctx.sheet.set_uint(self.year_field, year)?;
        ctx.sheet.set_uint(self.month_field, month)?;
        ctx.sheet.set_uint(self.day_field, day)?;
        Ok(())
    }
}

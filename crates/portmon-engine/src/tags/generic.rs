//! Declaratively configured tags for the shared converter families

use portmon_core::{CanonicalRecord, PortResult};

use crate::{IndexSpec, NumericSpec, PortContext, StringSpec, Tag};

/// Numeric family: one clamped scalar
pub struct NumericTag {
    pub name: &'static str,
    pub prereqs: &'static [&'static str],
    pub spec: NumericSpec,
    pub value: fn(&CanonicalRecord) -> Option<u32>,
}

impl Tag for NumericTag {
    fn name(&self) -> &'static str {
        self.name
    }

    fn prerequisites(&self) -> &'static [&'static str] {
        self.prereqs
    }

    fn run(&self, ctx: &mut PortContext<'_>) -> PortResult<()> {
        let value = (self.value)(&ctx.record);
        ctx.put_numeric(&self.spec, value)?;
        Ok(())
    }
}

/// Multi-numeric family: fixed named sub-slots, aggregated alerts
pub struct MultiNumericTag {
    pub name: &'static str,
    pub prereqs: &'static [&'static str],
    pub title: &'static str,
    /// (display name, field name) per sub-slot
    pub slots: &'static [(&'static str, &'static str)],
    /// Sub-slot values in slot order
    pub values: fn(&CanonicalRecord) -> Vec<Option<u32>>,
    pub default: u64,
}

impl Tag for MultiNumericTag {
    fn name(&self) -> &'static str {
        self.name
    }

    fn prerequisites(&self) -> &'static [&'static str] {
        self.prereqs
    }

    fn run(&self, ctx: &mut PortContext<'_>) -> PortResult<()> {
        let values = (self.values)(&ctx.record);
        assert_eq!(
            values.len(),
            self.slots.len(),
            "slot values must match declared slots for '{}'",
            self.name
        );
        let slots: Vec<(&'static str, &'static str, Option<u32>)> = self
            .slots
            .iter()
            .zip(values)
            .map(|(&(display, field), value)| (display, field, value))
            .collect();
        ctx.put_multi_numeric(self.title, &slots, self.default)
    }
}

/// Index family: canonical name to per-format index via the dex
pub struct IndexTag {
    pub name: &'static str,
    pub prereqs: &'static [&'static str],
    pub spec: IndexSpec,
    pub value: fn(&CanonicalRecord) -> Option<&str>,
}

impl Tag for IndexTag {
    fn name(&self) -> &'static str {
        self.name
    }

    fn prerequisites(&self) -> &'static [&'static str] {
        self.prereqs
    }

    fn run(&self, ctx: &mut PortContext<'_>) -> PortResult<()> {
        let value = (self.value)(&ctx.record).map(str::to_string);
        ctx.put_index(&self.spec, value.as_deref())?;
        Ok(())
    }
}

/// Encoded-string family: charset encoding plus trash preservation
pub struct StringTag {
    pub name: &'static str,
    pub prereqs: &'static [&'static str],
    pub spec: StringSpec,
    pub value: fn(&CanonicalRecord) -> Option<&str>,
    pub trash: fn(&CanonicalRecord) -> Option<&[u16]>,
    /// Fall back to the species name when the value is absent (nickname
    /// convention)
    pub species_default: bool,
    /// Publish nickname presence for the flag tag
    pub record_nickname: bool,
}

impl Tag for StringTag {
    fn name(&self) -> &'static str {
        self.name
    }

    fn prerequisites(&self) -> &'static [&'static str] {
        self.prereqs
    }

    fn run(&self, ctx: &mut PortContext<'_>) -> PortResult<()> {
        let value = (self.value)(&ctx.record).map(str::to_string);
        let trash = (self.trash)(&ctx.record).map(<[u16]>::to_vec);
        let default = if self.species_default {
            ctx.record.species.clone()
        } else {
            None
        };
        ctx.put_string(&self.spec, value.as_deref(), trash.as_deref(), default.as_deref())?;
        if self.record_nickname {
            ctx.scratch.has_nickname = ctx.record.has_nickname();
        }
        Ok(())
    }
}

//! Porter facade - one record in, one target buffer out
//!
//! The contract: a port either fails up front in `can_port` (structural
//! problems, reported as a reason) or runs to completion. `first_pass`
//! populates the buffer and may leave pending choices; `resolve` applies
//! the external selections; `second_pass` commits the resolved values; and
//! `to_bytes` hands the finished buffer out. There is no partially
//! successful terminal state: abandoning a port mid-flight simply drops it.

use bytes::Bytes;

use portmon_core::{Alert, CanonicalRecord, Choice, Dex, PortError, PortResult};
use portmon_wire::{ByteOrder, Codec, FieldLayout, FieldSheet};

use crate::{Phase, PortContext, PortFlags, TagRegistry};

/// Everything the engine needs to know about one target format
pub struct TargetFormat {
    /// Dex key of the format
    pub name: &'static str,
    /// Target buffer size in bytes
    pub size: usize,
    pub order: ByteOrder,
    pub layouts: &'static [FieldLayout],
    pub codec: Codec,
    pub registry: TagRegistry,
}

/// Outcome of the first pass
#[derive(Clone, Debug)]
pub struct FirstPassReport {
    pub warnings: Vec<Alert>,
    /// Mismatches the caller must settle before the second pass
    pub choices: Vec<Choice>,
}

/// Outcome of the second pass
#[derive(Clone, Debug)]
pub struct PortReport {
    pub notes: Vec<Alert>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Stage {
    Created,
    FirstDone,
    SecondDone,
}

/// One port operation
pub struct Porter<'a> {
    format: &'a TargetFormat,
    ctx: PortContext<'a>,
    stage: Stage,
}

impl<'a> Porter<'a> {
    pub fn new(
        format: &'a TargetFormat,
        dex: &'a dyn Dex,
        mut record: CanonicalRecord,
        flags: PortFlags,
    ) -> PortResult<Self> {
        let sheet = FieldSheet::new(format.size, format.order, format.layouts)?;
        if flags.apply_stat_override {
            record.apply_stat_override();
        }
        Ok(Porter {
            ctx: PortContext::new(record, sheet, &format.codec, dex, format.name, flags),
            format,
            stage: Stage::Created,
        })
    }

    /// Fix the seed sampler (tests)
    pub fn seed_rng(&mut self, seed: u64) {
        self.ctx.seed_rng(seed);
    }

    /// Cheap structural pre-check. Failures here are fatal to the whole
    /// port and reported as a reason, never as an alert.
    pub fn can_port(&self) -> PortResult<()> {
        let record = &self.ctx.record;
        let Some(species) = record.species.as_deref() else {
            return Err(PortError::NotPortable("record carries no species".into()));
        };
        if !self.ctx.dex.exists(self.format.name, species) {
            return Err(PortError::NotPortable(format!(
                "species '{species}' does not exist in format '{}'",
                self.format.name
            )));
        }
        if let Some(form) = record.form.as_deref() {
            let letter_species = self
                .ctx
                .dex
                .value_of(self.format.name, species, "letter_forms")
                .and_then(|v| v.as_int())
                .map(|n| n > 1)
                .unwrap_or(false);
            let known = if letter_species {
                portmon_core::letter_index(form).is_some()
            } else {
                self.ctx
                    .dex
                    .exists(self.format.name, &format!("form:{species}:{form}"))
            };
            if !known {
                return Err(PortError::NotPortable(format!(
                    "form '{form}' of '{species}' does not exist in format '{}'",
                    self.format.name
                )));
            }
        }
        Ok(())
    }

    /// Run every first-pass converter. May leave pending choices.
    pub fn first_pass(&mut self) -> PortResult<FirstPassReport> {
        if self.stage != Stage::Created {
            return Err(PortError::PhaseOrder);
        }
        self.can_port()?;
        tracing::debug!(format = self.format.name, "first pass");
        self.format.registry.run_phase(Phase::First, &mut self.ctx)?;
        self.stage = Stage::FirstDone;
        Ok(FirstPassReport {
            warnings: self.ctx.warnings().to_vec(),
            choices: self.ctx.choices().to_vec(),
        })
    }

    /// Apply external selections as (choice index, selected candidate)
    pub fn resolve(&mut self, selections: &[(usize, usize)]) -> PortResult<()> {
        if self.stage != Stage::FirstDone {
            return Err(PortError::PhaseOrder);
        }
        for &(choice, selection) in selections {
            self.ctx.select(choice, selection)?;
        }
        Ok(())
    }

    /// Run every second-pass converter. Every choice must be resolved.
    pub fn second_pass(&mut self) -> PortResult<PortReport> {
        if self.stage != Stage::FirstDone {
            return Err(PortError::PhaseOrder);
        }
        if let Some(unresolved) = self.ctx.unresolved() {
            return Err(PortError::UnresolvedChoice(unresolved));
        }
        tracing::debug!(format = self.format.name, "second pass");
        self.format
            .registry
            .run_phase(Phase::Second, &mut self.ctx)?;
        self.stage = Stage::SecondDone;
        Ok(PortReport {
            notes: self.ctx.notes().to_vec(),
        })
    }

    /// Serialize the finished buffer
    pub fn to_bytes(&self) -> PortResult<Bytes> {
        if self.stage != Stage::SecondDone {
            return Err(PortError::PhaseOrder);
        }
        Ok(self.ctx.sheet.to_bytes())
    }

    /// The underlying context (inspection and tests)
    pub fn context(&self) -> &PortContext<'a> {
        &self.ctx
    }
}

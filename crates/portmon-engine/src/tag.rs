//! The tag converter abstraction
//!
//! One tag converts one logical attribute of the canonical record. A tag
//! declares its phase and the names of the tags that must run before it;
//! the registry turns those declarations into one execution order per port.

use crate::PortContext;
use portmon_core::PortResult;

/// Execution phase of a converter
///
/// All first-pass converters run before any second-pass converter. Between
/// the passes, pending choices are resolved externally; a second-pass
/// converter may therefore assume every resolver it reads is resolved.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    First,
    Second,
}

/// One attribute converter
pub trait Tag {
    /// Machine name other tags reference as a prerequisite
    fn name(&self) -> &'static str;

    fn phase(&self) -> Phase {
        Phase::First
    }

    /// Tags that must have run before this one, within phase ordering
    fn prerequisites(&self) -> &'static [&'static str] {
        &[]
    }

    fn run(&self, ctx: &mut PortContext<'_>) -> PortResult<()>;
}

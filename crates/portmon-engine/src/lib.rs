//! portmon Engine - The porting pipeline
//!
//! One port operation converts one canonical record into one target buffer:
//! - [`PortContext`]: the mutable state shared by converters (record, typed
//!   views, alert sinks, working variables, injected lookup capability)
//! - [`Tag`]/[`TagRegistry`]: declarative converters with phases and
//!   prerequisites, validated and topologically ordered at build time
//! - [`PidConstraints`]: the constraint-satisfying identity-seed sampler
//! - [`Porter`]: the can_port / first_pass / resolve / second_pass facade

pub mod context;
pub mod pidgen;
pub mod porter;
pub mod registry;
pub mod tag;
pub mod tags;

pub use context::*;
pub use pidgen::*;
pub use porter::*;
pub use registry::*;
pub use tag::*;

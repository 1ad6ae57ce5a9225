//! The tag converter library
//!
//! Most attributes fit one of the shared families and register a
//! declaratively configured generic tag; the bespoke tags cover the
//! cross-attribute cases (species working variables, experience/level,
//! moves and their metadata, and the identity seed's two-phase pair).

pub mod cosmetic;
pub mod generic;
pub mod identity;
pub mod moves;
pub mod seed;
pub mod stats;

pub use cosmetic::*;
pub use generic::*;
pub use identity::*;
pub use moves::*;
pub use seed::*;
pub use stats::*;

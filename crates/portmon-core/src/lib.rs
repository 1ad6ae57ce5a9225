//! portmon Core - Fundamental types for the record-porting engine
//!
//! This crate defines the types shared by every layer of the porter:
//! - The canonical record (the format-agnostic description of one creature)
//! - Identity-seed derivations (shininess, gender, nature, letter form)
//! - The alert/diagnostic model and the deferred-choice resolver
//! - The read-only lookup ("dex") capability
//! - Protocol-wide error types

pub mod alert;
pub mod error;
pub mod lookup;
pub mod pid;
pub mod record;
pub mod resolve;
pub mod types;

pub use alert::*;
pub use error::*;
pub use lookup::*;
pub use pid::*;
pub use record::*;
pub use resolve::*;
pub use types::*;

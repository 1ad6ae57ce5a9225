//! portmon Formats - Concrete target formats
//!
//! Each format module owns its static layout table, its charset(s), and its
//! tag registrations, and exposes a [`TargetFormat`] for exporting plus an
//! `import` for the reverse direction. The `bootstrap` module loads a
//! [`MemoryDex`](portmon_core::MemoryDex) from JSON so examples and tests
//! have a real lookup capability behind the trait.

pub mod advance;
pub mod bootstrap;
pub mod classic;

mod import_util;

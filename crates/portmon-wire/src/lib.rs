//! portmon Wire - Binary target buffers and codecs
//!
//! The physical layer of a port operation:
//! - [`BitBuffer`]: a byte array with bit-precise access and declared
//!   endianness
//! - [`Codec`]/[`Charset`]: language-pluggable text encoding with trash-byte
//!   preservation
//! - [`FieldSheet`]/[`FieldLayout`]: named, typed, range-aware views over a
//!   buffer, built from static per-format layout tables

pub mod buffer;
pub mod charset;
pub mod layout;

pub use buffer::*;
pub use charset::*;
pub use layout::*;

//! Static field layouts and the typed views built from them
//!
//! Per target format, every field's placement (byte offset, bit offset, bit
//! width, element count) and legal range is data: a `&'static [FieldLayout]`
//! table. A [`FieldSheet`] validates the whole table against the buffer size
//! once, at construction; after that, converters address fields by name and
//! can no longer cause a bounds failure.

use std::collections::HashMap;

use bytes::Bytes;
use portmon_core::{PortError, PortResult};

use crate::{BitBuffer, ByteOrder};

/// Placement and legal range of one named field
#[derive(Clone, Copy, Debug)]
pub struct FieldLayout {
    pub name: &'static str,
    /// Byte offset into the buffer
    pub offset: usize,
    /// Bit offset within the first byte (0 for byte-aligned fields)
    pub bit: usize,
    /// Bit width of one element
    pub width: usize,
    /// Element count (1 for scalars; codepoint count for strings)
    pub count: usize,
    /// Legal minimum (fields like level have min 1)
    pub min: u64,
    /// Legal maximum override; defaults to the width's full range
    pub max: Option<u64>,
}

impl FieldLayout {
    /// Byte-aligned unsigned integer of `size` bytes
    pub const fn uint(name: &'static str, offset: usize, size: usize) -> Self {
        FieldLayout {
            name,
            offset,
            bit: 0,
            width: size * 8,
            count: 1,
            min: 0,
            max: None,
        }
    }

    /// Sub-byte bitfield
    pub const fn bits(name: &'static str, offset: usize, bit: usize, width: usize) -> Self {
        FieldLayout {
            name,
            offset,
            bit,
            width,
            count: 1,
            min: 0,
            max: None,
        }
    }

    /// Single-bit flag
    pub const fn flag(name: &'static str, offset: usize, bit: usize) -> Self {
        Self::bits(name, offset, bit, 1)
    }

    /// Array of byte-aligned `elem_size`-byte integers
    pub const fn array(name: &'static str, offset: usize, elem_size: usize, count: usize) -> Self {
        FieldLayout {
            name,
            offset,
            bit: 0,
            width: elem_size * 8,
            count,
            min: 0,
            max: None,
        }
    }

    /// Array of packed sub-byte elements (e.g. six 5-bit stats in one word)
    pub const fn packed(name: &'static str, offset: usize, elem_bits: usize, count: usize) -> Self {
        FieldLayout {
            name,
            offset,
            bit: 0,
            width: elem_bits,
            count,
            min: 0,
            max: None,
        }
    }

    /// Encoded string of `max_len` codepoints, each `code_size` bytes
    pub const fn string(name: &'static str, offset: usize, code_size: usize, max_len: usize) -> Self {
        Self::array(name, offset, code_size, max_len)
    }

    /// Narrow the legal maximum below the width's full range
    pub const fn with_max(mut self, max: u64) -> Self {
        self.max = Some(max);
        self
    }

    /// Raise the legal minimum above zero
    pub const fn with_min(mut self, min: u64) -> Self {
        self.min = min;
        self
    }

    /// Legal (min, max) for one element
    pub fn bounds(&self) -> (u64, u64) {
        let full = if self.width >= 64 {
            u64::MAX
        } else {
            (1u64 << self.width) - 1
        };
        (self.min, self.max.unwrap_or(full))
    }

    /// Total bits occupied by all elements
    fn total_bits(&self) -> usize {
        self.bit + self.width * self.count
    }

    /// Whether the whole field is byte-aligned with whole-byte elements
    fn is_byte_aligned(&self) -> bool {
        self.bit == 0 && self.width % 8 == 0
    }
}

/// A target buffer with its named, typed views
#[derive(Clone, Debug)]
pub struct FieldSheet {
    buffer: BitBuffer,
    fields: HashMap<&'static str, FieldLayout>,
}

impl FieldSheet {
    /// Validate `layouts` against a fresh zeroed buffer of `size` bytes.
    /// Overlapping fields are legal (packed words are often addressable both
    /// ways); out-of-bounds or duplicate fields are not.
    pub fn new(size: usize, order: ByteOrder, layouts: &[FieldLayout]) -> PortResult<Self> {
        Self::over(BitBuffer::new(size, order), layouts)
    }

    /// Same validation over an existing buffer (import path)
    pub fn over(buffer: BitBuffer, layouts: &[FieldLayout]) -> PortResult<Self> {
        let mut fields = HashMap::with_capacity(layouts.len());
        for layout in layouts {
            if layout.width == 0 || layout.width > 64 {
                return Err(PortError::InvalidLayout {
                    field: layout.name,
                    reason: format!("element width {} out of range", layout.width),
                });
            }
            if layout.bit >= 8 {
                return Err(PortError::InvalidLayout {
                    field: layout.name,
                    reason: format!("bit offset {} out of range", layout.bit),
                });
            }
            let end_bit = layout.offset * 8 + layout.total_bits();
            if end_bit > buffer.len() * 8 {
                return Err(PortError::InvalidLayout {
                    field: layout.name,
                    reason: format!(
                        "extends to bit {end_bit} beyond buffer of {} bytes",
                        buffer.len()
                    ),
                });
            }
            let (min, max) = layout.bounds();
            if min > max {
                return Err(PortError::InvalidLayout {
                    field: layout.name,
                    reason: format!("min {min} exceeds max {max}"),
                });
            }
            if fields.insert(layout.name, *layout).is_some() {
                return Err(PortError::InvalidLayout {
                    field: layout.name,
                    reason: "duplicate field name".into(),
                });
            }
        }
        Ok(FieldSheet { buffer, fields })
    }

    /// The layout of a named field
    pub fn layout(&self, name: &str) -> PortResult<&FieldLayout> {
        self.fields
            .get(name)
            .ok_or_else(|| PortError::UnknownField(name.to_string()))
    }

    /// Legal (min, max) of a named field
    pub fn bounds(&self, name: &str) -> PortResult<(u64, u64)> {
        Ok(self.layout(name)?.bounds())
    }

    /// Read a scalar field
    pub fn get_uint(&self, name: &str) -> PortResult<u64> {
        let layout = *self.layout(name)?;
        Ok(self.read_element(&layout, 0))
    }

    /// Write a scalar field (silently masked to the field width)
    pub fn set_uint(&mut self, name: &str, value: u64) -> PortResult<()> {
        let layout = *self.layout(name)?;
        self.write_element(&layout, 0, value);
        Ok(())
    }

    /// Read a single-bit field as a bool
    pub fn get_flag(&self, name: &str) -> PortResult<bool> {
        Ok(self.get_uint(name)? != 0)
    }

    /// Write a single-bit field
    pub fn set_flag(&mut self, name: &str, value: bool) -> PortResult<()> {
        self.set_uint(name, value as u64)
    }

    /// Read every element of an array field
    pub fn get_array(&self, name: &str) -> PortResult<Vec<u64>> {
        let layout = *self.layout(name)?;
        Ok((0..layout.count)
            .map(|i| self.read_element(&layout, i))
            .collect())
    }

    /// Write an array field; `values` must match the declared element count
    pub fn set_array(&mut self, name: &str, values: &[u64]) -> PortResult<()> {
        let layout = *self.layout(name)?;
        if values.len() != layout.count {
            return Err(PortError::FieldType {
                field: name.to_string(),
                expected: "an array of the declared element count",
            });
        }
        for (i, &v) in values.iter().enumerate() {
            self.write_element(&layout, i, v);
        }
        Ok(())
    }

    /// Read a string field's raw codepoints
    pub fn get_codes(&self, name: &str) -> PortResult<Vec<u16>> {
        Ok(self.get_array(name)?.into_iter().map(|v| v as u16).collect())
    }

    /// Write a string field's codepoints
    pub fn set_codes(&mut self, name: &str, codes: &[u16]) -> PortResult<()> {
        let values: Vec<u64> = codes.iter().map(|&c| c as u64).collect();
        self.set_array(name, &values)
    }

    fn read_element(&self, layout: &FieldLayout, index: usize) -> u64 {
        if layout.is_byte_aligned() {
            let size = layout.width / 8;
            self.buffer.get_uint(layout.offset + index * size, size)
        } else {
            let bit = layout.bit + index * layout.width;
            self.buffer
                .get_bits(layout.offset + bit / 8, bit % 8, layout.width)
        }
    }

    fn write_element(&mut self, layout: &FieldLayout, index: usize, value: u64) {
        if layout.is_byte_aligned() {
            let size = layout.width / 8;
            self.buffer.set_uint(value, layout.offset + index * size, size);
        } else {
            let bit = layout.bit + index * layout.width;
            self.buffer
                .set_bits(value, layout.offset + bit / 8, bit % 8, layout.width);
        }
    }

    #[inline]
    pub fn buffer(&self) -> &BitBuffer {
        &self.buffer
    }

    /// Serialize the finished buffer
    pub fn to_bytes(&self) -> Bytes {
        self.buffer.to_bytes()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LAYOUT: [FieldLayout; 5] = [
        FieldLayout::uint("species", 0, 2),
        FieldLayout::uint("friendship", 2, 1),
        FieldLayout::bits("pokerus_days", 3, 0, 4),
        FieldLayout::packed("ivs", 4, 5, 6),
        FieldLayout::flag("egg", 7, 6),
    ];

    #[test]
    fn test_sheet_construction_validates_bounds() {
        assert!(FieldSheet::new(8, ByteOrder::Little, &LAYOUT).is_ok());
        // 8 bytes needed for the packed IVs + flag; 4 is too small
        let err = FieldSheet::new(4, ByteOrder::Little, &LAYOUT);
        assert!(matches!(err, Err(PortError::InvalidLayout { .. })));
    }

    #[test]
    fn test_sheet_rejects_duplicates() {
        let dup = [
            FieldLayout::uint("species", 0, 2),
            FieldLayout::uint("species", 2, 2),
        ];
        assert!(matches!(
            FieldSheet::new(8, ByteOrder::Little, &dup),
            Err(PortError::InvalidLayout { .. })
        ));
    }

    #[test]
    fn test_scalar_and_flag_access() {
        let mut sheet = FieldSheet::new(8, ByteOrder::Little, &LAYOUT).unwrap();
        sheet.set_uint("species", 201).unwrap();
        sheet.set_flag("egg", true).unwrap();

        assert_eq!(sheet.get_uint("species").unwrap(), 201);
        assert!(sheet.get_flag("egg").unwrap());
        assert!(sheet.get_uint("missing").is_err());
    }

    #[test]
    fn test_packed_array_access() {
        let mut sheet = FieldSheet::new(8, ByteOrder::Little, &LAYOUT).unwrap();
        let ivs = [31u64, 0, 15, 7, 31, 1];
        sheet.set_array("ivs", &ivs).unwrap();
        assert_eq!(sheet.get_array("ivs").unwrap(), ivs);

        // wrong element count is a converter bug, reported not panicked
        assert!(sheet.set_array("ivs", &[1, 2]).is_err());
    }

    #[test]
    fn test_bounds_exposed_to_converters() {
        let layouts = [FieldLayout::uint("level", 0, 1).with_min(1).with_max(100)];
        let sheet = FieldSheet::new(1, ByteOrder::Little, &layouts).unwrap();
        assert_eq!(sheet.bounds("level").unwrap(), (1, 100));
    }

    #[test]
    fn test_oversized_write_masks() {
        let mut sheet = FieldSheet::new(8, ByteOrder::Little, &LAYOUT).unwrap();
        sheet.set_uint("pokerus_days", 0xFF).unwrap();
        assert_eq!(sheet.get_uint("pokerus_days").unwrap(), 0xF);
    }
}

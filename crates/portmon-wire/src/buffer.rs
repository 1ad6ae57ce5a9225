//! Bit-addressable binary buffer
//!
//! Byte-aligned multi-byte integers honor the buffer's declared endianness.
//! Bit-level access is always least-significant-bit-first within a byte,
//! regardless of endianness. Writes silently mask values wider than the
//! target width; range validation belongs to the converter layer, not here.

use bytes::Bytes;

/// Multi-byte integer order, fixed at construction
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ByteOrder {
    Little,
    Big,
}

/// A fixed-size byte buffer with bit-precise get/set
#[derive(Clone, Debug)]
pub struct BitBuffer {
    bytes: Vec<u8>,
    order: ByteOrder,
}

impl BitBuffer {
    /// A zeroed buffer of `len` bytes
    pub fn new(len: usize, order: ByteOrder) -> Self {
        BitBuffer {
            bytes: vec![0; len],
            order,
        }
    }

    /// Wrap an existing byte array (import path)
    pub fn from_bytes(bytes: Vec<u8>, order: ByteOrder) -> Self {
        BitBuffer { bytes, order }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    #[inline]
    pub fn order(&self) -> ByteOrder {
        self.order
    }

    #[inline]
    pub fn as_slice(&self) -> &[u8] {
        &self.bytes
    }

    /// Hand the finished buffer out
    pub fn to_bytes(&self) -> Bytes {
        Bytes::copy_from_slice(&self.bytes)
    }

    /// Read `width` bits starting at (`byte`, `bit`), LSB-first
    pub fn get_bits(&self, byte: usize, bit: usize, width: usize) -> u64 {
        debug_assert!(width <= 64);
        let mut value = 0u64;
        for i in 0..width {
            let pos = byte * 8 + bit + i;
            let b = (self.bytes[pos / 8] >> (pos % 8)) & 1;
            value |= (b as u64) << i;
        }
        value
    }

    /// Write the low `width` bits of `value` at (`byte`, `bit`), LSB-first.
    /// Higher bits of `value` are silently discarded.
    pub fn set_bits(&mut self, value: u64, byte: usize, bit: usize, width: usize) {
        debug_assert!(width <= 64);
        for i in 0..width {
            let pos = byte * 8 + bit + i;
            let mask = 1u8 << (pos % 8);
            if (value >> i) & 1 != 0 {
                self.bytes[pos / 8] |= mask;
            } else {
                self.bytes[pos / 8] &= !mask;
            }
        }
    }

    /// Read a byte-aligned unsigned integer of `size` bytes
    pub fn get_uint(&self, offset: usize, size: usize) -> u64 {
        debug_assert!(size >= 1 && size <= 8);
        let mut value = 0u64;
        match self.order {
            ByteOrder::Little => {
                for i in (0..size).rev() {
                    value = (value << 8) | self.bytes[offset + i] as u64;
                }
            }
            ByteOrder::Big => {
                for i in 0..size {
                    value = (value << 8) | self.bytes[offset + i] as u64;
                }
            }
        }
        value
    }

    /// Write a byte-aligned unsigned integer of `size` bytes. Values wider
    /// than `size` bytes are silently masked down.
    pub fn set_uint(&mut self, value: u64, offset: usize, size: usize) {
        debug_assert!(size >= 1 && size <= 8);
        match self.order {
            ByteOrder::Little => {
                for i in 0..size {
                    self.bytes[offset + i] = (value >> (8 * i)) as u8;
                }
            }
            ByteOrder::Big => {
                for i in 0..size {
                    self.bytes[offset + i] = (value >> (8 * (size - 1 - i))) as u8;
                }
            }
        }
    }

    /// Read `count` consecutive `elem_size`-byte integers
    pub fn get_array(&self, offset: usize, elem_size: usize, count: usize) -> Vec<u64> {
        (0..count)
            .map(|i| self.get_uint(offset + i * elem_size, elem_size))
            .collect()
    }

    /// Write consecutive `elem_size`-byte integers
    pub fn set_array(&mut self, values: &[u64], offset: usize, elem_size: usize) {
        for (i, &v) in values.iter().enumerate() {
            self.set_uint(v, offset + i * elem_size, elem_size);
        }
    }

    /// Copy raw bytes into the buffer
    pub fn copy_from(&mut self, offset: usize, src: &[u8]) {
        self.bytes[offset..offset + src.len()].copy_from_slice(src);
    }

    /// Borrow raw bytes out of the buffer
    pub fn slice(&self, offset: usize, len: usize) -> &[u8] {
        &self.bytes[offset..offset + len]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_bit_access_lsb_first() {
        let mut buf = BitBuffer::new(4, ByteOrder::Little);
        buf.set_bits(0b101, 0, 0, 3);
        assert_eq!(buf.as_slice()[0], 0b0000_0101);
        assert_eq!(buf.get_bits(0, 0, 3), 0b101);

        // bit offset within a byte
        buf.set_bits(0b11, 1, 4, 2);
        assert_eq!(buf.as_slice()[1], 0b0011_0000);
        assert_eq!(buf.get_bits(1, 4, 2), 0b11);
    }

    #[test]
    fn test_bit_access_spans_bytes() {
        let mut buf = BitBuffer::new(4, ByteOrder::Big);
        // 5-bit value straddling the byte 0 / byte 1 boundary
        buf.set_bits(0b10110, 0, 6, 5);
        assert_eq!(buf.get_bits(0, 6, 5), 0b10110);
        // bit order is unaffected by the buffer's endianness
        let le = {
            let mut b = BitBuffer::new(4, ByteOrder::Little);
            b.set_bits(0b10110, 0, 6, 5);
            b.as_slice().to_vec()
        };
        assert_eq!(le, buf.as_slice());
    }

    #[test]
    fn test_set_bits_masks_wide_values() {
        let mut buf = BitBuffer::new(2, ByteOrder::Little);
        buf.set_bits(0xFFFF, 0, 0, 4);
        assert_eq!(buf.get_bits(0, 0, 4), 0xF);
        assert_eq!(buf.as_slice()[0], 0x0F);
        assert_eq!(buf.as_slice()[1], 0x00);
    }

    #[test]
    fn test_uint_endianness() {
        let mut le = BitBuffer::new(4, ByteOrder::Little);
        le.set_uint(0x1234_5678, 0, 4);
        assert_eq!(le.as_slice(), &[0x78, 0x56, 0x34, 0x12]);
        assert_eq!(le.get_uint(0, 4), 0x1234_5678);

        let mut be = BitBuffer::new(4, ByteOrder::Big);
        be.set_uint(0x1234_5678, 0, 4);
        assert_eq!(be.as_slice(), &[0x12, 0x34, 0x56, 0x78]);
        assert_eq!(be.get_uint(0, 4), 0x1234_5678);
    }

    #[test]
    fn test_uint_masks_oversized_write() {
        let mut buf = BitBuffer::new(4, ByteOrder::Big);
        buf.set_uint(0x1_FFFF, 0, 2);
        assert_eq!(buf.get_uint(0, 2), 0xFFFF);
    }

    #[test]
    fn test_array_roundtrip() {
        let mut buf = BitBuffer::new(12, ByteOrder::Big);
        let values = [1u64, 500, 65535];
        buf.set_array(&values, 2, 2);
        assert_eq!(buf.get_array(2, 2, 3), values);
    }

    proptest! {
        #[test]
        fn prop_bits_roundtrip(value in 0u64..(1 << 13), byte in 0usize..4, bit in 0usize..8) {
            let mut buf = BitBuffer::new(8, ByteOrder::Little);
            buf.set_bits(value, byte, bit, 13);
            prop_assert_eq!(buf.get_bits(byte, bit, 13), value);
        }

        #[test]
        fn prop_uint_roundtrip(value: u32, big in proptest::bool::ANY) {
            let order = if big { ByteOrder::Big } else { ByteOrder::Little };
            let mut buf = BitBuffer::new(4, order);
            buf.set_uint(value as u64, 0, 4);
            prop_assert_eq!(buf.get_uint(0, 4), value as u64);
        }
    }
}

//! Shared helpers for the importers

use portmon_core::{Dex, DexValue, Marking};

/// Reverse a per-format index to its canonical name under a key prefix
pub(crate) fn reverse(dex: &dyn Dex, format: &str, prefix: &str, index: u64) -> Option<String> {
    dex.name_for(format, prefix, &DexValue::Int(index as i64), "index")
}

/// The whole field's codepoints, position-aligned, when any slot strictly
/// after the first terminator is not itself terminator fill. The alignment
/// matches what the codec's overlay expects on re-export.
pub(crate) fn trash_codes(codes: &[u16], terminator: u16) -> Option<Vec<u16>> {
    let pos = codes.iter().position(|&c| c == terminator)?;
    if codes[pos + 1..].iter().any(|&c| c != terminator) {
        Some(codes.to_vec())
    } else {
        None
    }
}

/// Unpack a markings bitmask into the markings it sets
pub(crate) fn markings_from_mask(mask: u64) -> Vec<Marking> {
    [
        Marking::Circle,
        Marking::Square,
        Marking::Triangle,
        Marking::Heart,
    ]
    .into_iter()
    .filter(|m| mask & (1 << m.bit()) != 0)
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trash_codes() {
        // terminator at 2, residue after it: the full field is kept
        assert_eq!(
            trash_codes(&[1, 2, 0xFF, 9, 0xFF], 0xFF),
            Some(vec![1, 2, 0xFF, 9, 0xFF])
        );
        // clean fill after the terminator
        assert_eq!(trash_codes(&[1, 2, 0xFF, 0xFF], 0xFF), None);
        // full-length string, no terminator
        assert_eq!(trash_codes(&[1, 2, 3], 0xFF), None);
    }

    #[test]
    fn test_markings_from_mask() {
        assert_eq!(
            markings_from_mask(0b1001),
            vec![Marking::Circle, Marking::Heart]
        );
        assert!(markings_from_mask(0).is_empty());
    }
}

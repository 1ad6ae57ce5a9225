//! Identity-seed (PID) derivations
//!
//! Older formats derive shininess, gender, nature, and one species' letter
//! form deterministically from a 32-bit seed. These are the pure read-side
//! formulas; the constraint-satisfying generator lives in the engine crate.

use crate::{Gender, GenderRatio, Nature};

/// Shiny window for formats before the widened threshold
pub const SHINY_THRESHOLD_CLASSIC: u16 = 8;

/// Widened shiny window used by later formats
pub const SHINY_THRESHOLD_WIDE: u16 = 16;

/// Number of letter forms derived from the seed (A-Z plus two punctuation)
pub const LETTER_FORM_COUNT: u32 = 28;

/// Shininess: XOR-fold the trainer identity and both seed halves, compare
/// against the format's threshold (8 or 16).
#[inline]
pub fn is_shiny(pid: u32, public_id: u16, secret_id: u16, threshold: u16) -> bool {
    let fold = public_id ^ secret_id ^ (pid >> 16) as u16 ^ (pid & 0xFFFF) as u16;
    fold < threshold
}

/// Gender from the seed's low byte against the species ratio threshold.
/// Fixed-gender species ignore the seed entirely.
#[inline]
pub fn gender_of(pid: u32, ratio: GenderRatio) -> Gender {
    match ratio.fixed() {
        Some(gender) => gender,
        None => {
            // female_threshold is Some for every non-fixed ratio
            let threshold = ratio.female_threshold().unwrap();
            if ((pid & 0xFF) as u8) < threshold {
                Gender::Female
            } else {
                Gender::Male
            }
        }
    }
}

/// Nature from the seed: `pid % 25`
#[inline]
pub fn nature_of(pid: u32) -> Nature {
    Nature::from_index((pid % Nature::COUNT) as u8).unwrap()
}

/// Letter form: the low two bits of each of the four seed bytes, packed
/// high-to-low, modulo 28.
#[inline]
pub fn letter_form(pid: u32) -> u8 {
    let packed = ((pid >> 24) & 0x3) << 6
        | ((pid >> 16) & 0x3) << 4
        | ((pid >> 8) & 0x3) << 2
        | (pid & 0x3);
    (packed % LETTER_FORM_COUNT) as u8
}

/// Canonical names for the 28 letter forms
const LETTER_NAMES: [&str; 28] = [
    "A", "B", "C", "D", "E", "F", "G", "H", "I", "J", "K", "L", "M", "N", "O", "P", "Q", "R", "S",
    "T", "U", "V", "W", "X", "Y", "Z", "!", "?",
];

/// Letter-form index for a canonical form name
pub fn letter_index(form: &str) -> Option<u8> {
    LETTER_NAMES.iter().position(|&n| n == form).map(|i| i as u8)
}

/// Canonical form name for a letter index
pub fn letter_name(index: u8) -> Option<&'static str> {
    LETTER_NAMES.get(index as usize).copied()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shiny_fold() {
        // fold == 0: maximally shiny under either threshold
        let pid = 0x1234_1234;
        assert!(is_shiny(pid, 0x1234 ^ 0x1234, 0x1234, SHINY_THRESHOLD_CLASSIC));

        // fold == 9: shiny only under the widened window
        let pid = 0x0000_0009;
        assert!(!is_shiny(pid, 0, 0, SHINY_THRESHOLD_CLASSIC));
        assert!(is_shiny(pid, 0, 0, SHINY_THRESHOLD_WIDE));
    }

    #[test]
    fn test_gender_threshold() {
        // low byte 126 < 127 -> Female for a 50/50 species
        assert_eq!(gender_of(0x0000_007E, GenderRatio::Male1Female1), Gender::Female);
        assert_eq!(gender_of(0x0000_007F, GenderRatio::Male1Female1), Gender::Male);
        // fixed-gender species ignore the seed
        assert_eq!(gender_of(0x0000_0000, GenderRatio::MaleOnly), Gender::Male);
        assert_eq!(gender_of(0xFFFF_FFFF, GenderRatio::Genderless), Gender::Genderless);
    }

    #[test]
    fn test_nature_mod() {
        assert_eq!(nature_of(0), Nature::Hardy);
        assert_eq!(nature_of(3), Nature::Adamant);
        assert_eq!(nature_of(13), Nature::Jolly);
        assert_eq!(nature_of(25), Nature::Hardy);
        assert_eq!(nature_of(28), Nature::Adamant);
    }

    #[test]
    fn test_letter_names() {
        assert_eq!(letter_index("A"), Some(0));
        assert_eq!(letter_index("?"), Some(27));
        assert_eq!(letter_index("AA"), None);
        assert_eq!(letter_name(25), Some("Z"));
        assert_eq!(letter_name(28), None);
    }

    #[test]
    fn test_letter_form_packing() {
        // All four byte pairs zero -> letter 0
        assert_eq!(letter_form(0x0000_0000), 0);
        // 0b11_11_11_11 packed = 255, 255 % 28 = 3
        assert_eq!(letter_form(0x0303_0303), 3);
        // Only the low two bits of each byte participate
        assert_eq!(letter_form(0xFCFC_FCFC), 0);
    }
}

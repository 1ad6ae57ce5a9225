//! Shared enumerations: gender, gender ratio, nature, language

use serde::{Deserialize, Serialize};

/// Creature or trainer gender
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Gender {
    Male,
    Female,
    Genderless,
}

/// Species-level gender distribution
///
/// The numeric ratios carry the modulo-256 female threshold used by the
/// identity-seed derivation: a seed's low byte below the threshold means
/// Female.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GenderRatio {
    MaleOnly,
    FemaleOnly,
    Genderless,
    /// 87.5% male (starter-style)
    Male7Female1,
    /// 75% male
    Male3Female1,
    /// 50/50
    Male1Female1,
    /// 25% male
    Male1Female3,
    /// 12.5% male
    Male1Female7,
}

impl GenderRatio {
    /// The fixed gender for single-gender and genderless species
    pub fn fixed(self) -> Option<Gender> {
        match self {
            GenderRatio::MaleOnly => Some(Gender::Male),
            GenderRatio::FemaleOnly => Some(Gender::Female),
            GenderRatio::Genderless => Some(Gender::Genderless),
            _ => None,
        }
    }

    /// Female threshold against `seed & 0xFF`, for mixed-gender species
    pub fn female_threshold(self) -> Option<u8> {
        match self {
            GenderRatio::Male7Female1 => Some(31),
            GenderRatio::Male3Female1 => Some(63),
            GenderRatio::Male1Female1 => Some(127),
            GenderRatio::Male1Female3 => Some(191),
            GenderRatio::Male1Female7 => Some(225),
            _ => None,
        }
    }

    /// Whether the ratio admits the given gender at all
    pub fn admits(self, gender: Gender) -> bool {
        match self.fixed() {
            Some(g) => g == gender,
            None => gender != Gender::Genderless,
        }
    }

    /// Dex table code for the ratio
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(GenderRatio::MaleOnly),
            1 => Some(GenderRatio::FemaleOnly),
            2 => Some(GenderRatio::Genderless),
            3 => Some(GenderRatio::Male7Female1),
            4 => Some(GenderRatio::Male3Female1),
            5 => Some(GenderRatio::Male1Female1),
            6 => Some(GenderRatio::Male1Female3),
            7 => Some(GenderRatio::Male1Female7),
            _ => None,
        }
    }

    #[inline]
    pub fn to_code(self) -> u8 {
        match self {
            GenderRatio::MaleOnly => 0,
            GenderRatio::FemaleOnly => 1,
            GenderRatio::Genderless => 2,
            GenderRatio::Male7Female1 => 3,
            GenderRatio::Male3Female1 => 4,
            GenderRatio::Male1Female1 => 5,
            GenderRatio::Male1Female3 => 6,
            GenderRatio::Male1Female7 => 7,
        }
    }
}

/// The 25 natures, in seed order (`seed % 25`)
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Nature {
    Hardy,
    Lonely,
    Brave,
    Adamant,
    Naughty,
    Bold,
    Docile,
    Relaxed,
    Impish,
    Lax,
    Timid,
    Hasty,
    Serious,
    Jolly,
    Naive,
    Modest,
    Mild,
    Quiet,
    Bashful,
    Rash,
    Calm,
    Gentle,
    Sassy,
    Careful,
    Quirky,
}

impl Nature {
    pub const COUNT: u32 = 25;

    const ALL: [Nature; 25] = [
        Nature::Hardy,
        Nature::Lonely,
        Nature::Brave,
        Nature::Adamant,
        Nature::Naughty,
        Nature::Bold,
        Nature::Docile,
        Nature::Relaxed,
        Nature::Impish,
        Nature::Lax,
        Nature::Timid,
        Nature::Hasty,
        Nature::Serious,
        Nature::Jolly,
        Nature::Naive,
        Nature::Modest,
        Nature::Mild,
        Nature::Quiet,
        Nature::Bashful,
        Nature::Rash,
        Nature::Calm,
        Nature::Gentle,
        Nature::Sassy,
        Nature::Careful,
        Nature::Quirky,
    ];

    pub fn from_index(index: u8) -> Option<Self> {
        Self::ALL.get(index as usize).copied()
    }

    #[inline]
    pub fn index(self) -> u8 {
        Self::ALL.iter().position(|&n| n == self).unwrap() as u8
    }
}

/// Game language, with the historical on-cartridge byte codes
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LanguageId {
    Japanese,
    English,
    French,
    Italian,
    German,
    Korean,
    Spanish,
}

impl LanguageId {
    pub fn from_byte(b: u8) -> Option<Self> {
        match b {
            1 => Some(LanguageId::Japanese),
            2 => Some(LanguageId::English),
            3 => Some(LanguageId::French),
            4 => Some(LanguageId::Italian),
            5 => Some(LanguageId::German),
            6 => Some(LanguageId::Korean),
            7 => Some(LanguageId::Spanish),
            _ => None,
        }
    }

    #[inline]
    pub fn to_byte(self) -> u8 {
        match self {
            LanguageId::Japanese => 1,
            LanguageId::English => 2,
            LanguageId::French => 3,
            LanguageId::Italian => 4,
            LanguageId::German => 5,
            LanguageId::Korean => 6,
            LanguageId::Spanish => 7,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nature_index_roundtrip() {
        for i in 0..25u8 {
            let nature = Nature::from_index(i).unwrap();
            assert_eq!(nature.index(), i);
        }
        assert!(Nature::from_index(25).is_none());
    }

    #[test]
    fn test_gender_ratio_thresholds() {
        assert_eq!(GenderRatio::Male1Female1.female_threshold(), Some(127));
        assert_eq!(GenderRatio::MaleOnly.female_threshold(), None);
        assert_eq!(GenderRatio::MaleOnly.fixed(), Some(Gender::Male));
        assert!(GenderRatio::Male1Female1.admits(Gender::Female));
        assert!(!GenderRatio::MaleOnly.admits(Gender::Female));
        assert!(!GenderRatio::Male1Female1.admits(Gender::Genderless));
    }

    #[test]
    fn test_language_byte_roundtrip() {
        for b in 1..=7u8 {
            let lang = LanguageId::from_byte(b).unwrap();
            assert_eq!(lang.to_byte(), b);
        }
        assert!(LanguageId::from_byte(0).is_none());
        assert!(LanguageId::from_byte(8).is_none());
    }
}

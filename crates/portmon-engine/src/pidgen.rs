//! Constraint-satisfying identity-seed generator
//!
//! Draws uniform 32-bit candidates and rejects until every active
//! constraint holds. Constraints are loosely correlated, so the expected
//! draw count stays small, but the loop is best-effort by design: there is
//! no termination bound, and callers must only request feasible
//! combinations (e.g. never a gender a fixed-gender species cannot have).

use rand::Rng;

use portmon_core::{
    gender_of, is_shiny, letter_form, nature_of, Gender, GenderRatio, Nature,
};

/// Shininess constraint relative to a trainer identity
#[derive(Clone, Copy, Debug)]
pub struct ShinyTarget {
    pub shiny: bool,
    pub public_id: u16,
    pub secret_id: u16,
    /// 8 or 16, per the target format
    pub threshold: u16,
}

/// A conjunction of independently optional seed constraints
#[derive(Clone, Copy, Debug, Default)]
pub struct PidConstraints {
    pub shiny: Option<ShinyTarget>,
    /// Target gender under the species' ratio. Skipped for fixed-gender
    /// species, whose seeds carry no gender information.
    pub gender: Option<(Gender, GenderRatio)>,
    pub nature: Option<Nature>,
    /// Letter-form index for the one species that packs its form into the
    /// seed
    pub letter: Option<u8>,
}

impl PidConstraints {
    /// Whether every active constraint holds for `pid`
    pub fn satisfied_by(&self, pid: u32) -> bool {
        if let Some(target) = self.shiny {
            if is_shiny(pid, target.public_id, target.secret_id, target.threshold) != target.shiny {
                return false;
            }
        }
        if let Some((gender, ratio)) = self.gender {
            if ratio.fixed().is_none() && gender_of(pid, ratio) != gender {
                return false;
            }
        }
        if let Some(nature) = self.nature {
            if nature_of(pid) != nature {
                return false;
            }
        }
        if let Some(letter) = self.letter {
            if letter_form(pid) != letter {
                return false;
            }
        }
        true
    }

    /// Rejection-sample a satisfying seed
    pub fn generate(&self, rng: &mut impl Rng) -> u32 {
        loop {
            let candidate: u32 = rng.gen();
            if self.satisfied_by(candidate) {
                return candidate;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_unconstrained_accepts_first_draw() {
        let mut rng = StdRng::seed_from_u64(7);
        let constraints = PidConstraints::default();
        assert!(constraints.satisfied_by(constraints.generate(&mut rng)));
    }

    #[test]
    fn test_shiny_female_conjunction_over_many_seeds() {
        let target = ShinyTarget {
            shiny: true,
            public_id: 40122,
            secret_id: 11909,
            threshold: 8,
        };
        let constraints = PidConstraints {
            shiny: Some(target),
            gender: Some((Gender::Female, GenderRatio::Male1Female1)),
            ..Default::default()
        };

        for seed in 0..1_000u64 {
            let mut rng = StdRng::seed_from_u64(seed);
            let pid = constraints.generate(&mut rng);
            assert!(is_shiny(pid, target.public_id, target.secret_id, 8));
            assert_eq!(gender_of(pid, GenderRatio::Male1Female1), Gender::Female);
        }
    }

    #[test]
    fn test_nature_and_letter_conjunction() {
        let constraints = PidConstraints {
            nature: Some(Nature::Jolly),
            letter: Some(25),
            ..Default::default()
        };
        let mut rng = StdRng::seed_from_u64(99);
        for _ in 0..50 {
            let pid = constraints.generate(&mut rng);
            assert_eq!(nature_of(pid), Nature::Jolly);
            assert_eq!(letter_form(pid), 25);
        }
    }

    #[test]
    fn test_fixed_gender_species_skips_gender_constraint() {
        let constraints = PidConstraints {
            gender: Some((Gender::Male, GenderRatio::MaleOnly)),
            nature: Some(Nature::Adamant),
            ..Default::default()
        };
        let mut rng = StdRng::seed_from_u64(5);
        let pid = constraints.generate(&mut rng);
        assert_eq!(nature_of(pid), Nature::Adamant);
    }

    #[test]
    fn test_wide_threshold_shiny() {
        let target = ShinyTarget {
            shiny: true,
            public_id: 1,
            secret_id: 2,
            threshold: 16,
        };
        let constraints = PidConstraints {
            shiny: Some(target),
            ..Default::default()
        };
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..100 {
            let pid = constraints.generate(&mut rng);
            assert!(is_shiny(pid, 1, 2, 16));
        }
    }
}

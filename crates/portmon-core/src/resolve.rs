//! Deferred-value resolver for ambiguous conversions

use crate::{Choice, ChoiceId, PortError, PortResult};

/// Couples a pending choice with its precomputed candidate values.
///
/// A resolver is created by a first-pass converter and consumed by a
/// second-pass converter once the external selection (if any) is known.
/// When no choice was needed it holds exactly one value and resolves
/// immediately.
#[derive(Clone, Debug)]
pub struct ErrorResolver<T> {
    choice: Option<ChoiceId>,
    values: Vec<T>,
}

impl<T> ErrorResolver<T> {
    /// An unambiguous conversion: one value, no choice
    pub fn immediate(value: T) -> Self {
        ErrorResolver {
            choice: None,
            values: vec![value],
        }
    }

    /// An ambiguous conversion: one precomputed value per candidate of the
    /// referenced choice. Candidate/value count mismatch is a programmer
    /// error and is checked by the context helper that allocates the choice.
    pub fn deferred(choice: ChoiceId, values: Vec<T>) -> Self {
        assert!(
            values.len() >= 2,
            "a deferred resolver requires at least two candidate values"
        );
        ErrorResolver {
            choice: Some(choice),
            values,
        }
    }

    /// The pending choice, if the conversion was ambiguous
    #[inline]
    pub fn choice(&self) -> Option<ChoiceId> {
        self.choice
    }

    /// Resolve against the port's choice list.
    ///
    /// Errors if the referenced choice has no selection yet; a second-pass
    /// converter must never observe that state.
    pub fn resolve(&self, choices: &[Choice]) -> PortResult<&T> {
        match self.choice {
            None => Ok(&self.values[0]),
            Some(ChoiceId(id)) => {
                let selection = choices
                    .get(id)
                    .and_then(Choice::selection)
                    .ok_or(PortError::UnresolvedChoice(id))?;
                Ok(&self.values[selection])
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_immediate_resolves_without_choices() {
        let resolver = ErrorResolver::immediate(42u32);
        assert_eq!(*resolver.resolve(&[]).unwrap(), 42);
    }

    #[test]
    fn test_deferred_resolves_selected_candidate() {
        let mut choice = Choice::new("t", "m", vec!["a".into(), "b".into(), "c".into()]);
        let resolver = ErrorResolver::deferred(ChoiceId(0), vec![10u32, 20, 30]);

        for i in 0..3 {
            choice.select(i).unwrap();
            let choices = vec![choice.clone()];
            assert_eq!(*resolver.resolve(&choices).unwrap(), [10, 20, 30][i]);
        }
    }

    #[test]
    fn test_deferred_unresolved_is_an_error() {
        let choice = Choice::new("t", "m", vec!["a".into(), "b".into()]);
        let resolver = ErrorResolver::deferred(ChoiceId(0), vec![1u32, 2]);
        assert!(matches!(
            resolver.resolve(&[choice]),
            Err(PortError::UnresolvedChoice(0))
        ));
    }
}

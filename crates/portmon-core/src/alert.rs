//! Alert model - structured conversion diagnostics
//!
//! Every irreversible decision a converter makes surfaces as an alert.
//! Warnings describe locally-recovered value problems (clamped, defaulted,
//! truncated); a `Choice` describes a mismatch between two independently
//! valid values that only an external caller can settle.

/// Closed taxonomy of conversion outcomes
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AlertKind {
    /// No problem; converters never emit this, it exists so per-tag
    /// suppression masks can name "nothing"
    None,
    /// The canonical record did not carry the attribute at all
    Unspecified,
    /// Value above the target field's maximum, clamped down
    Overflow,
    /// Value below the target field's minimum, clamped up
    Underflow,
    /// Value present but not representable in the target, defaulted
    Invalid,
    /// String longer than the target field, truncated
    TooLong,
    /// Two independently valid attributes contradict each other
    Mismatch,
    /// Value was derived from a related attribute rather than taken verbatim
    Casted,
    /// Attribute reflects a transient in-battle state that cannot persist
    InBattle,
}

/// A single non-fatal diagnostic
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Alert {
    pub kind: AlertKind,
    pub title: String,
    pub message: String,
}

impl Alert {
    /// Build an alert. `None` is not a reportable outcome; constructing one
    /// is a programmer error. A mismatch built this way is the
    /// silently-resolved kind; a mismatch needing an external decision is a
    /// [`Choice`] instead.
    pub fn new(kind: AlertKind, title: impl Into<String>, message: impl Into<String>) -> Self {
        assert!(
            kind != AlertKind::None,
            "AlertKind::None cannot be reported"
        );
        Alert {
            kind,
            title: title.into(),
            message: message.into(),
        }
    }

    pub fn unspecified(tag: &str, default_desc: &str) -> Self {
        Alert::new(
            AlertKind::Unspecified,
            tag,
            format!("{tag} was not specified; using {default_desc}."),
        )
    }

    pub fn overflow(tag: &str, max: u64) -> Self {
        Alert::new(
            AlertKind::Overflow,
            tag,
            format!("{tag} was above the maximum; clamped to {max}."),
        )
    }

    pub fn underflow(tag: &str, min: u64) -> Self {
        Alert::new(
            AlertKind::Underflow,
            tag,
            format!("{tag} was below the minimum; raised to {min}."),
        )
    }

    pub fn invalid(tag: &str, default_desc: &str) -> Self {
        Alert::new(
            AlertKind::Invalid,
            tag,
            format!("{tag} was invalid for this format; using {default_desc}."),
        )
    }

    pub fn too_long(tag: &str, max_len: usize) -> Self {
        Alert::new(
            AlertKind::TooLong,
            tag,
            format!("{tag} was too long and was truncated to {max_len} characters."),
        )
    }

    pub fn casted(tag: &str, detail: impl Into<String>) -> Self {
        Alert::new(AlertKind::Casted, tag, detail)
    }

    /// A silently-resolved mismatch (the resolution is in `detail`)
    pub fn mismatch(tag: &str, detail: impl Into<String>) -> Self {
        Alert::new(AlertKind::Mismatch, tag, detail)
    }

    /// Replace the message (multi-slot converters aggregate sub-slot names)
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    pub fn in_battle(tag: &str) -> Self {
        Alert::new(
            AlertKind::InBattle,
            tag,
            format!("{tag} reflected an in-battle state that was not carried over."),
        )
    }
}

/// Identifier of a pending choice within one port operation
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ChoiceId(pub usize);

/// A mismatch requiring an external decision
///
/// Carries one named candidate per mutually exclusive resolution. The
/// selection is supplied from outside the engine between the two passes.
#[derive(Clone, Debug)]
pub struct Choice {
    pub title: String,
    pub message: String,
    pub options: Vec<String>,
    selection: Option<usize>,
}

impl Choice {
    /// A mismatch with fewer than two resolutions is not a mismatch.
    pub fn new(title: impl Into<String>, message: impl Into<String>, options: Vec<String>) -> Self {
        assert!(
            options.len() >= 2,
            "a choice alert requires at least two candidates"
        );
        Choice {
            title: title.into(),
            message: message.into(),
            options,
            selection: None,
        }
    }

    /// Record the external selection
    pub fn select(&mut self, index: usize) -> Result<(), crate::PortError> {
        if index >= self.options.len() {
            return Err(crate::PortError::SelectionOutOfRange {
                selection: index,
                options: self.options.len(),
            });
        }
        self.selection = Some(index);
        Ok(())
    }

    #[inline]
    pub fn selection(&self) -> Option<usize> {
        self.selection
    }
}

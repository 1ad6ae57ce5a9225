//! Port context - the shared state of one port operation
//!
//! A single mutable context flows through every converter: the (read-only)
//! canonical record, the target's typed field views, the alert sinks, the
//! pending choices, and the scratch space where converters leave working
//! variables for their dependents. The shared converter families (numeric,
//! multi-numeric, enum, index, string) live here as context methods so each
//! tag only supplies its declarative configuration.

use rand::rngs::StdRng;
use rand::SeedableRng;

use portmon_core::{
    Alert, CanonicalRecord, Choice, ChoiceId, Dex, ErrorResolver, GenderRatio, LanguageId,
    PortError, PortResult,
};
use portmon_wire::{Codec, FieldSheet};

/// Per-port behavior switches
#[derive(Clone, Copy, Debug, Default)]
pub struct PortFlags {
    /// Use the widened shiny window (threshold 16 instead of 8). Kept as a
    /// plain boolean because downstream formats depend on the historical
    /// per-format behavior, not on a generation number.
    pub wide_shiny_window: bool,
    /// Swap the record's override IVs in before converting; also makes the
    /// seed converter regenerate silently instead of escalating a mismatch
    pub apply_stat_override: bool,
}

/// Working variables converters publish for their dependents
#[derive(Debug, Default)]
pub struct Scratch {
    /// Target-format species index, published by the species converter
    pub species_index: Option<u32>,
    /// Species gender distribution, published by the species converter
    pub gender_ratio: Option<GenderRatio>,
    /// Language actually written to the target, published by the language
    /// converter
    pub language: Option<LanguageId>,
    /// Whether a real nickname (not the species default) was written
    pub has_nickname: bool,
    /// Indices into `record.moves` that made it into the target's slots
    pub used_moves: Vec<usize>,
    /// Level after clamping, published by the experience converter
    pub level: Option<u32>,
    /// The identity-seed resolver created in the first pass and consumed by
    /// the second-pass committer
    pub pid: Option<ErrorResolver<u32>>,
}

/// The state of one port operation
pub struct PortContext<'a> {
    pub record: CanonicalRecord,
    pub sheet: FieldSheet,
    pub codec: &'a Codec,
    pub dex: &'a dyn Dex,
    /// Dex key of the target format
    pub format: &'a str,
    pub flags: PortFlags,
    pub scratch: Scratch,
    warnings: Vec<Alert>,
    notes: Vec<Alert>,
    choices: Vec<Choice>,
    rng: StdRng,
}

impl<'a> PortContext<'a> {
    pub fn new(
        record: CanonicalRecord,
        sheet: FieldSheet,
        codec: &'a Codec,
        dex: &'a dyn Dex,
        format: &'a str,
        flags: PortFlags,
    ) -> Self {
        PortContext {
            record,
            sheet,
            codec,
            dex,
            format,
            flags,
            scratch: Scratch::default(),
            warnings: Vec::new(),
            notes: Vec::new(),
            choices: Vec::new(),
            rng: StdRng::from_entropy(),
        }
    }

    /// Fix the sampler seed (tests)
    pub fn seed_rng(&mut self, seed: u64) {
        self.rng = StdRng::seed_from_u64(seed);
    }

    #[inline]
    pub fn rng_mut(&mut self) -> &mut StdRng {
        &mut self.rng
    }

    /// Record a non-fatal warning
    pub fn warn(&mut self, alert: Alert) {
        tracing::warn!(tag = %alert.title, kind = ?alert.kind, "{}", alert.message);
        self.warnings.push(alert);
    }

    /// Record an informational note (second-pass outcomes)
    pub fn note(&mut self, alert: Alert) {
        tracing::debug!(tag = %alert.title, kind = ?alert.kind, "{}", alert.message);
        self.notes.push(alert);
    }

    #[inline]
    pub fn warnings(&self) -> &[Alert] {
        &self.warnings
    }

    #[inline]
    pub fn notes(&self) -> &[Alert] {
        &self.notes
    }

    #[inline]
    pub fn choices(&self) -> &[Choice] {
        &self.choices
    }

    /// Register a choice and couple it to its precomputed candidate values
    pub fn defer<T>(&mut self, choice: Choice, values: Vec<T>) -> ErrorResolver<T> {
        assert_eq!(
            choice.options.len(),
            values.len(),
            "candidate descriptions and values must pair up"
        );
        let id = ChoiceId(self.choices.len());
        tracing::debug!(title = %choice.title, candidates = choice.options.len(), "deferring choice");
        self.choices.push(choice);
        ErrorResolver::deferred(id, values)
    }

    /// Apply an external selection to a pending choice
    pub fn select(&mut self, choice: usize, selection: usize) -> PortResult<()> {
        let c = self
            .choices
            .get_mut(choice)
            .ok_or(PortError::UnresolvedChoice(choice))?;
        c.select(selection)
    }

    /// The first choice still lacking a selection, if any
    pub fn unresolved(&self) -> Option<usize> {
        self.choices.iter().position(|c| c.selection().is_none())
    }

    /// The language governing string encoding for this port
    pub fn language(&self) -> LanguageId {
        self.scratch
            .language
            .or(self.record.trainer.language)
            .unwrap_or(LanguageId::English)
    }
}

/// Configuration of one numeric conversion
#[derive(Clone, Copy, Debug)]
pub struct NumericSpec {
    /// Display title used in alert text
    pub title: &'static str,
    pub field: &'static str,
    pub default: u64,
    /// Suppress the UNSPECIFIED warning when the attribute is legitimately
    /// absent for most records
    pub silent_default: bool,
}

/// Configuration of one index (dex lookup) conversion
#[derive(Clone, Copy, Debug)]
pub struct IndexSpec {
    pub title: &'static str,
    pub field: &'static str,
    /// Dex key prefix, e.g. `"item:"`
    pub prefix: &'static str,
    pub column: &'static str,
    pub default: u64,
    /// How the default reads in alert text, e.g. `"no held item"`
    pub default_desc: &'static str,
    pub silent_default: bool,
}

/// Configuration of one encoded-string conversion
#[derive(Clone, Copy, Debug)]
pub struct StringSpec {
    pub title: &'static str,
    pub field: &'static str,
    /// Fold to uppercase before encoding (older formats store caps only)
    pub uppercase: bool,
}

impl PortContext<'_> {
    /// Numeric family: clamp to the field's legal range, default on absence,
    /// alert OVERFLOW/UNDERFLOW/UNSPECIFIED.
    pub fn put_numeric(&mut self, spec: &NumericSpec, value: Option<u32>) -> PortResult<u64> {
        let (min, max) = self.sheet.bounds(spec.field)?;
        let out = match value {
            None => {
                if !spec.silent_default {
                    self.warn(Alert::unspecified(spec.title, &spec.default.to_string()));
                }
                spec.default
            }
            Some(v) if (v as u64) > max => {
                self.warn(Alert::overflow(spec.title, max));
                max
            }
            Some(v) if (v as u64) < min => {
                self.warn(Alert::underflow(spec.title, min));
                min
            }
            Some(v) => v as u64,
        };
        self.sheet.set_uint(spec.field, out)?;
        Ok(out)
    }

    /// Multi-numeric family: the numeric conversion vectorized over named
    /// sub-slots, with one aggregated alert per alert kind.
    pub fn put_multi_numeric(
        &mut self,
        title: &'static str,
        slots: &[(&'static str, &'static str, Option<u32>)],
        default: u64,
    ) -> PortResult<()> {
        let mut over: Vec<&str> = Vec::new();
        let mut under: Vec<&str> = Vec::new();
        let mut unspecified: Vec<&str> = Vec::new();

        for &(slot_name, field, value) in slots {
            let (min, max) = self.sheet.bounds(field)?;
            let out = match value {
                None => {
                    unspecified.push(slot_name);
                    default
                }
                Some(v) if (v as u64) > max => {
                    over.push(slot_name);
                    max
                }
                Some(v) if (v as u64) < min => {
                    under.push(slot_name);
                    min
                }
                Some(v) => v as u64,
            };
            self.sheet.set_uint(field, out)?;
        }

        if !over.is_empty() {
            self.warn(Alert::overflow(title, 0).with_message(format!(
                "{title}: {} above the maximum; clamped down.",
                over.join(", ")
            )));
        }
        if !under.is_empty() {
            self.warn(Alert::underflow(title, 0).with_message(format!(
                "{title}: {} below the minimum; raised.",
                under.join(", ")
            )));
        }
        if unspecified.len() == slots.len() {
            self.warn(Alert::unspecified(title, &default.to_string()));
        } else if !unspecified.is_empty() {
            self.warn(Alert::unspecified(title, &default.to_string()).with_message(format!(
                "{title}: {} not specified; using {default}.",
                unspecified.join(", ")
            )));
        }
        Ok(())
    }

    /// Enum family: validate against a predicate, default with an
    /// INVALID/UNSPECIFIED alert, encode into the target representation
    /// (raw integer, true enum, or nullable enum) via `encode`.
    pub fn put_enum<T: Copy + std::fmt::Debug>(
        &mut self,
        title: &'static str,
        field: &'static str,
        value: Option<T>,
        default: T,
        valid: impl Fn(T) -> bool,
        encode: impl Fn(T) -> u64,
    ) -> PortResult<T> {
        let chosen = match value {
            None => {
                self.warn(Alert::unspecified(title, &format!("{default:?}")));
                default
            }
            Some(v) if !valid(v) => {
                self.warn(Alert::invalid(title, &format!("{default:?}")));
                default
            }
            Some(v) => v,
        };
        self.sheet.set_uint(field, encode(chosen))?;
        Ok(chosen)
    }

    /// Index family: canonical name to target index through the dex,
    /// declared default + INVALID/UNSPECIFIED alert on failure.
    pub fn put_index(&mut self, spec: &IndexSpec, name: Option<&str>) -> PortResult<u64> {
        let out = match name {
            None => {
                if !spec.silent_default {
                    self.warn(Alert::unspecified(spec.title, spec.default_desc));
                }
                spec.default
            }
            Some(n) => {
                let key = format!("{}{}", spec.prefix, n);
                match self.dex.index_of(self.format, &key, spec.column) {
                    Some(index) => index as u64,
                    None => {
                        self.warn(Alert::invalid(spec.title, spec.default_desc));
                        spec.default
                    }
                }
            }
        };
        self.sheet.set_uint(spec.field, out)?;
        Ok(out)
    }

    /// Encoded-string family: encode through the format codec, alert
    /// TOO_LONG/INVALID, overlay trash, write the codepoints.
    ///
    /// `default` is written silently when the value is absent (species-name
    /// fallback is a format convention, not a data problem); absence of
    /// both warns UNSPECIFIED. Returns whether a real value was written.
    pub fn put_string(
        &mut self,
        spec: &StringSpec,
        value: Option<&str>,
        trash: Option<&[u16]>,
        default: Option<&str>,
    ) -> PortResult<bool> {
        let language = self.language();
        let (text, from_default) = match (value, default) {
            (Some(v), _) => (v.to_string(), false),
            (None, Some(d)) => (d.to_string(), true),
            (None, None) => {
                self.warn(Alert::unspecified(spec.title, "an empty string"));
                (String::new(), true)
            }
        };
        let text = if spec.uppercase {
            text.to_uppercase()
        } else {
            text
        };

        let max_len = self.sheet.layout(spec.field)?.count;
        let mut encoded = self.codec.encode(&text, max_len, language)?;
        if encoded.truncated {
            self.warn(Alert::too_long(spec.title, max_len));
        }
        if encoded.had_invalid {
            self.warn(Alert::new(
                portmon_core::AlertKind::Invalid,
                spec.title,
                format!("{} contained characters this format cannot encode; they were skipped.", spec.title),
            ));
        }
        if let Some(trash) = trash {
            self.codec.overlay(&mut encoded.codepoints, trash, language)?;
        }
        self.sheet.set_codes(spec.field, &encoded.codepoints)?;
        Ok(!from_default)
    }
}

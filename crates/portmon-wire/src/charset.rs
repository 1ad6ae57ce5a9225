//! Character codec with language-keyed charsets and trash preservation
//!
//! Each target format owns one codec. A codec is format-pinned (one
//! terminator codepoint, one codepoint width) but language-pluggable: a
//! format is either language-independent (a single universal charset) or
//! carries one charset per supported language.

use std::collections::HashMap;

use portmon_core::{LanguageId, PortError, PortResult};

/// One codepoint-to-character map
#[derive(Clone, Debug)]
pub struct Charset {
    to_code: HashMap<char, u16>,
    to_char: HashMap<u16, char>,
    terminator: u16,
}

impl Charset {
    /// Build from (codepoint, character) pairs. Mapping the terminator is a
    /// table-authoring error.
    pub fn new(terminator: u16, pairs: &[(u16, char)]) -> Self {
        let mut to_code = HashMap::with_capacity(pairs.len());
        let mut to_char = HashMap::with_capacity(pairs.len());
        for &(code, ch) in pairs {
            assert!(code != terminator, "charset maps the terminator codepoint");
            to_code.insert(ch, code);
            to_char.insert(code, ch);
        }
        Charset {
            to_code,
            to_char,
            terminator,
        }
    }

    #[inline]
    pub fn terminator(&self) -> u16 {
        self.terminator
    }

    #[inline]
    pub fn encode_char(&self, ch: char) -> Option<u16> {
        self.to_code.get(&ch).copied()
    }

    #[inline]
    pub fn decode_code(&self, code: u16) -> Option<char> {
        self.to_char.get(&code).copied()
    }
}

/// Result of encoding one string
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Encoded {
    /// Exactly `max_len` codepoints: content, then terminator, then
    /// terminator fill
    pub codepoints: Vec<u16>,
    /// Input had more encodable characters than fit
    pub truncated: bool,
    /// Input contained characters absent from the active charset
    pub had_invalid: bool,
}

/// Language-pluggable codec for one target format
#[derive(Clone, Debug)]
pub struct Codec {
    universal: Option<Charset>,
    by_language: HashMap<LanguageId, Charset>,
}

impl Codec {
    /// A language-independent format: one charset for everything
    pub fn universal(charset: Charset) -> Self {
        Codec {
            universal: Some(charset),
            by_language: HashMap::new(),
        }
    }

    /// A language-dependent format
    pub fn by_language(sets: Vec<(LanguageId, Charset)>) -> Self {
        Codec {
            universal: None,
            by_language: sets.into_iter().collect(),
        }
    }

    fn charset_for(&self, language: LanguageId) -> PortResult<&Charset> {
        if let Some(cs) = &self.universal {
            return Ok(cs);
        }
        self.by_language
            .get(&language)
            .ok_or_else(|| PortError::MissingCharset(format!("{language:?}")))
    }

    /// The format's terminator codepoint (identical across languages)
    pub fn terminator(&self, language: LanguageId) -> PortResult<u16> {
        Ok(self.charset_for(language)?.terminator())
    }

    /// Encode left-to-right: unmapped characters are skipped and flagged,
    /// encoding stops at `max_len` mapped characters, and the terminator is
    /// written at the first unused slot if any slot remains.
    pub fn encode(&self, s: &str, max_len: usize, language: LanguageId) -> PortResult<Encoded> {
        let charset = self.charset_for(language)?;
        let mut codepoints = Vec::with_capacity(max_len);
        let mut truncated = false;
        let mut had_invalid = false;

        for ch in s.chars() {
            let Some(code) = charset.encode_char(ch) else {
                had_invalid = true;
                continue;
            };
            if codepoints.len() == max_len {
                truncated = true;
                break;
            }
            codepoints.push(code);
        }

        // Terminator fill; a string that exactly fills the buffer gets none
        while codepoints.len() < max_len {
            codepoints.push(charset.terminator());
        }

        Ok(Encoded {
            codepoints,
            truncated,
            had_invalid,
        })
    }

    /// Decode up to the first terminator
    pub fn decode(&self, codepoints: &[u16], language: LanguageId) -> PortResult<String> {
        let charset = self.charset_for(language)?;
        let mut out = String::new();
        for &code in codepoints {
            if code == charset.terminator() {
                break;
            }
            if let Some(ch) = charset.decode_code(code) {
                out.push(ch);
            }
        }
        Ok(out)
    }

    /// Copy trash codepoints into the slots strictly after the terminator,
    /// position-aligned. Slots at or before the terminator are never
    /// touched; trash beyond the buffer length is dropped.
    pub fn overlay(
        &self,
        encoded: &mut [u16],
        trash: &[u16],
        language: LanguageId,
    ) -> PortResult<()> {
        let terminator = self.charset_for(language)?.terminator();
        let Some(term_at) = encoded.iter().position(|&c| c == terminator) else {
            // full-length string, nothing after the terminator to preserve
            return Ok(());
        };
        for i in (term_at + 1)..encoded.len() {
            if let Some(&t) = trash.get(i) {
                encoded[i] = t;
            }
        }
        Ok(())
    }
}

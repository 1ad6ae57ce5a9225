//! Error types for the porting engine

use thiserror::Error;

/// Engine-wide errors
#[derive(Error, Debug)]
pub enum PortError {
    // Layout errors (construction time)
    #[error("Invalid layout for field '{field}': {reason}")]
    InvalidLayout { field: &'static str, reason: String },

    #[error("Unknown field: {0}")]
    UnknownField(String),

    #[error("Field '{field}' is not {expected}")]
    FieldType {
        field: String,
        expected: &'static str,
    },

    // Registration errors (build time)
    #[error("Duplicate tag name '{0}'")]
    DuplicateTag(String),

    #[error("Tag '{tag}' declares unknown prerequisite '{prerequisite}'")]
    UnknownPrerequisite { tag: String, prerequisite: String },

    #[error("Tag '{tag}' declares prerequisite '{prerequisite}' in a later phase")]
    PhaseInversion { tag: String, prerequisite: String },

    #[error("Prerequisite cycle involving tag '{0}'")]
    PrerequisiteCycle(String),

    // Port-level errors
    #[error("Record cannot be ported: {0}")]
    NotPortable(String),

    #[error("Choice {0} has not been resolved")]
    UnresolvedChoice(usize),

    #[error("Selection {selection} out of range for choice with {options} options")]
    SelectionOutOfRange { selection: usize, options: usize },

    #[error("Port phases invoked out of order")]
    PhaseOrder,

    #[error("Working value '{0}' missing; a prerequisite converter did not run")]
    MissingWorkingValue(&'static str),

    // Codec errors
    #[error("No charset registered for language {0:?}")]
    MissingCharset(String),
}

/// Result type for porting operations
pub type PortResult<T> = Result<T, PortError>;

use crate::config::ValueKind;

/// Why a single patch field was not applied.
///
/// None of these abort an update: the offending field is dropped and the
/// rest of the patch goes through.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PatchError {
    #[error("`{field}` expects {expected}, found {found}")]
    InvalidPatchField {
        field: &'static str,
        expected: ValueKind,
        found: &'static str,
    },

    #[error("unsupported multi-select key `{0}` (use meta, shift or alt; ctrl triggers the context menu)")]
    UnsupportedModifier(String),

    #[error("config patch must be an object, found {0}")]
    NotAnObject(&'static str),

    #[error("`{field}` cannot hold {found}")]
    ValueKindMismatch {
        field: &'static str,
        found: ValueKind,
    },
}

/// A patch field that was dropped, with the reason.
#[derive(Debug, Clone, PartialEq)]
pub struct RejectedField {
    pub field: String,
    pub error: PatchError,
}

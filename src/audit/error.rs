use thiserror::Error;

/// Failures raised while turning tracked changes into audit entries.
///
/// Any of these aborts the enclosing unit of work before anything is written.
#[derive(Debug, Error)]
pub enum AuditError {
    #[error("{entity_type}.{property}: {old_kind} value cannot be compared with {new_kind} value")]
    AmbiguousProperty {
        entity_type: String,
        property: String,
        old_kind: &'static str,
        new_kind: &'static str,
    },

    #[error("{entity_type}.{property} is missing from the {side} snapshot")]
    PropertyMismatch {
        entity_type: String,
        property: String,
        side: &'static str,
    },

    #[error("{property}: non-finite float has no stable representation")]
    NonFiniteFloat { property: String },

    #[error("{property}: {kind} properties are not scalar")]
    NotScalar { property: String, kind: &'static str },

    #[error("{entity_type} {entity_id} is marked modified but has no original snapshot")]
    MissingOriginal {
        entity_type: String,
        entity_id: uuid::Uuid,
    },
}

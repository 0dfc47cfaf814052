use crate::tag::Tag;

/// Malformed-encoding errors raised by the BER/DER codec.
///
/// Every variant is fatal to the decode or encode call that raised it; the
/// codec never returns a partially built tree alongside one of these.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Asn1Error {
    #[error("empty input")]
    EmptyInput,
    #[error("truncated encoding at offset {offset}: need {needed} more byte(s)")]
    Truncated { offset: usize, needed: usize },
    #[error("indefinite length is not allowed")]
    IndefiniteLength,
    #[error("reserved length octet 0xff")]
    ReservedLength,
    #[error("length field of {0} octets does not fit in usize")]
    LengthOverflow(usize),
    #[error("content of {length} bytes at offset {offset} exceeds the {available} bytes available")]
    ContentOverflow {
        offset: usize,
        length: usize,
        available: usize,
    },
    #[error("tag number does not fit in 32 bits")]
    TagNumberOverflow,
    #[error("trailing data at offset {offset}")]
    TrailingData { offset: usize },
    #[error("nesting depth exceeds limit of {limit}")]
    MaxDepthExceeded { limit: usize },
    #[error("invalid {tag} content: {reason}")]
    InvalidContent { tag: Tag, reason: String },
    #[error("{tag} cannot encode value: {reason}")]
    Unencodable { tag: Tag, reason: String },
    #[error("non-canonical DER: {0}")]
    NonCanonical(&'static str),
    #[error("invalid object identifier: {0}")]
    InvalidOid(String),
    #[error("invalid integer: {0}")]
    InvalidInteger(String),
    #[error("pem: {0}")]
    Pem(String),
}

impl Asn1Error {
    pub fn invalid(tag: Tag, reason: impl Into<String>) -> Self {
        Asn1Error::InvalidContent {
            tag,
            reason: reason.into(),
        }
    }

    pub fn unencodable(tag: Tag, reason: impl Into<String>) -> Self {
        Asn1Error::Unencodable {
            tag,
            reason: reason.into(),
        }
    }
}

/// Schema-mismatch errors raised when a well-formed tree does not have the
/// shape a structure expects.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SchemaError {
    #[error("{context}: expected {expected}, got {actual}")]
    UnexpectedTag {
        context: &'static str,
        expected: Tag,
        actual: Tag,
    },
    #[error("{context}: missing field {field}")]
    MissingField {
        context: &'static str,
        field: &'static str,
    },
    #[error("{context}: {count} unexpected trailing element(s)")]
    UnexpectedElements { context: &'static str, count: usize },
    #[error("{choice}: no alternative registered for {tag}")]
    UnknownChoice { choice: &'static str, tag: Tag },
    #[error("{choice}: tag {tag} registered more than once")]
    DuplicateChoiceTag { choice: &'static str, tag: Tag },
    #[error("{context}: {reason}")]
    InvalidValue {
        context: &'static str,
        reason: String,
    },
    #[error(transparent)]
    Asn1(#[from] Asn1Error),
}

/// Errors surfaced by the DER/PEM entry points of PKI objects.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PkiError {
    #[error("asn1 parse error: {0}")]
    Asn1Error(#[from] Asn1Error),
    #[error("schema error: {0}")]
    Schema(#[from] SchemaError),
    #[error("pem label mismatch: expected {expected}, got {actual}")]
    PemLabel { expected: String, actual: String },
    #[error("no PEM block found")]
    PemMissing,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tag::Tag;

    #[test]
    fn test_schema_error_names_expected_construct() {
        let err = SchemaError::UnexpectedTag {
            context: "AlgorithmIdentifier",
            expected: Tag::universal(16, true),
            actual: Tag::universal(2, false),
        };
        assert_eq!(
            err.to_string(),
            "AlgorithmIdentifier: expected SEQUENCE (constructed), got INTEGER"
        );
    }

    #[test]
    fn test_layering() {
        let err: PkiError = SchemaError::from(Asn1Error::EmptyInput).into();
        assert_eq!(err.to_string(), "schema error: empty input");
    }
}

//! Codec configuration.

/// How SET members are ordered when a tree is encoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SetOrdering {
    /// Emit members in the order they are stored (BER, and what most
    /// producers of already-sorted input expect).
    #[default]
    Preserve,
    /// Sort members by their complete encodings as X.690 §11.6 requires
    /// for DER.
    DerSorted,
}

/// Options shared by the parser and the encoder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodecConfig {
    /// Maximum nesting depth of constructed content. The outermost element
    /// is at depth 1.
    pub max_depth: usize,
    /// SET member ordering on encode.
    pub set_ordering: SetOrdering,
    /// Reject BER-only forms on decode instead of accepting and normalizing
    /// them.
    pub strict_der: bool,
}

pub const DEFAULT_MAX_DEPTH: usize = 64;

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            set_ordering: SetOrdering::Preserve,
            strict_der: false,
        }
    }
}

impl CodecConfig {
    pub fn builder() -> CodecConfigBuilder {
        CodecConfigBuilder::default()
    }

    /// Strict DER decoding and sorted SET encoding.
    pub fn der() -> Self {
        Self {
            set_ordering: SetOrdering::DerSorted,
            strict_der: true,
            ..Self::default()
        }
    }
}

/// Builder for [`CodecConfig`].
#[derive(Debug, Default)]
pub struct CodecConfigBuilder {
    config: CodecConfig,
}

impl CodecConfigBuilder {
    pub fn max_depth(mut self, depth: usize) -> Self {
        self.config.max_depth = depth;
        self
    }

    pub fn set_ordering(mut self, ordering: SetOrdering) -> Self {
        self.config.set_ordering = ordering;
        self
    }

    pub fn strict_der(mut self, strict: bool) -> Self {
        self.config.strict_der = strict;
        self
    }

    pub fn build(self) -> CodecConfig {
        self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = CodecConfig::default();
        assert_eq!(config.max_depth, 64);
        assert_eq!(config.set_ordering, SetOrdering::Preserve);
        assert!(!config.strict_der);
    }

    #[test]
    fn test_builder() {
        let config = CodecConfig::builder()
            .max_depth(8)
            .set_ordering(SetOrdering::DerSorted)
            .strict_der(true)
            .build();
        assert_eq!(config.max_depth, 8);
        assert_eq!(config, CodecConfig { max_depth: 8, ..CodecConfig::der() });
    }
}

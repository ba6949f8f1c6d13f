//! Parser configuration.
//!
//! The parser is permissive in a few places. Each of those behaviours is a
//! field here so callers choose it explicitly instead of inheriting it.

/// What to do with a string lexeme whose escapes cannot be decoded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum EscapePolicy {
    /// Fail the parse with `ParseError::MalformedString`.
    #[default]
    Strict,
    /// Keep the raw lexeme, quotes included, and log a warning.
    Lenient,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseOptions {
    /// Maximum number of arrays/objects open at once.
    pub max_depth: usize,
    /// Accept a comma directly before `]` or `}`.
    pub trailing_commas: bool,
    /// Handling of string lexemes whose escapes cannot be decoded.
    pub escapes: EscapePolicy,
}

impl ParseOptions {
    pub const DEFAULT_MAX_DEPTH: usize = 128;

    /// Rejects trailing commas and malformed escapes.
    pub const fn strict() -> Self {
        Self {
            max_depth: Self::DEFAULT_MAX_DEPTH,
            trailing_commas: false,
            escapes: EscapePolicy::Strict,
        }
    }

    /// Accepts trailing commas and passes malformed strings through raw.
    pub const fn lenient() -> Self {
        Self {
            max_depth: Self::DEFAULT_MAX_DEPTH,
            trailing_commas: true,
            escapes: EscapePolicy::Lenient,
        }
    }

    pub const fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub const fn with_trailing_commas(mut self, allow: bool) -> Self {
        self.trailing_commas = allow;
        self
    }

    pub const fn with_escapes(mut self, escapes: EscapePolicy) -> Self {
        self.escapes = escapes;
        self
    }
}

impl Default for ParseOptions {
    /// Trailing commas are tolerated; escapes are checked strictly.
    fn default() -> Self {
        Self {
            max_depth: Self::DEFAULT_MAX_DEPTH,
            trailing_commas: true,
            escapes: EscapePolicy::Strict,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_options() {
        let options = ParseOptions::default();
        assert_eq!(options.max_depth, 128);
        assert!(options.trailing_commas);
        assert_eq!(options.escapes, EscapePolicy::Strict);
    }

    #[test]
    fn test_presets_differ() {
        assert!(!ParseOptions::strict().trailing_commas);
        assert_eq!(ParseOptions::lenient().escapes, EscapePolicy::Lenient);
        assert_ne!(ParseOptions::strict(), ParseOptions::lenient());
    }

    #[test]
    fn test_builder() {
        let options = ParseOptions::strict()
            .with_max_depth(4)
            .with_trailing_commas(true)
            .with_escapes(EscapePolicy::Lenient);
        assert_eq!(options.max_depth, 4);
        assert_eq!(options, ParseOptions::lenient().with_max_depth(4));
    }
}

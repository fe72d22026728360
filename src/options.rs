//! Configuration options for TOON encoding and decoding.
//!
//! - [`EncodeOptions`]: indentation unit and maximum nesting depth
//! - [`DecodeOptions`]: indentation mode, maximum nesting depth, input size guard
//!
//! ## Examples
//!
//! ```rust
//! use toon_codec::{toon, encode_with_options, decode_with_options, DecodeOptions, EncodeOptions, IndentMode};
//!
//! let value = toon!({"user": {"name": "Alice"}});
//!
//! let options = EncodeOptions::new().with_indent(4);
//! let text = encode_with_options(&value, &options).unwrap();
//! assert_eq!(text, "user:\n    name:Alice");
//!
//! let options = DecodeOptions::new().with_indent(IndentMode::Fixed(4));
//! assert_eq!(decode_with_options(&text, &options).unwrap(), value);
//! ```

/// Indentation unit used when no option overrides it.
pub const DEFAULT_INDENT: usize = 2;

/// Maximum nesting depth used when no option overrides it.
pub const DEFAULT_MAX_DEPTH: usize = 128;

/// How the decoder determines the indentation unit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum IndentMode {
    /// The first indented line fixes the unit for the rest of the input.
    #[default]
    Auto,
    /// Every indent must be a multiple of this many spaces.
    Fixed(usize),
}

/// What the decoder does when an object repeats a key.
///
/// Rejecting is the only policy: keeping either occurrence would silently drop
/// data from a format whose whole point is lossless round trips.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[non_exhaustive]
pub enum DuplicateKeyPolicy {
    #[default]
    Reject,
}

/// Configuration options for the encoder.
///
/// # Examples
///
/// ```rust
/// use toon_codec::EncodeOptions;
///
/// let options = EncodeOptions::new();
/// assert_eq!(options.indent, 2);
/// assert_eq!(options.max_depth, 128);
///
/// let options = EncodeOptions::new().with_indent(4).with_max_depth(16);
/// assert_eq!(options.indent, 4);
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EncodeOptions {
    /// Spaces per nesting level. The encoder treats zero as one.
    pub indent: usize,
    pub max_depth: usize,
}

impl Default for EncodeOptions {
    fn default() -> Self {
        EncodeOptions {
            indent: DEFAULT_INDENT,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl EncodeOptions {
    /// Creates default options (2-space indent, depth limit 128).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the number of spaces per nesting level. Zero is treated as one.
    #[must_use]
    pub fn with_indent(mut self, indent: usize) -> Self {
        self.indent = indent.max(1);
        self
    }

    /// Sets the maximum container nesting depth. Zero is treated as one.
    ///
    /// The root container sits at depth 1, so a limit of 1 accepts
    /// `{"a":1}` but rejects `{"a":[1]}`.
    #[must_use]
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth.max(1);
        self
    }
}

/// Configuration options for the decoder.
///
/// # Examples
///
/// ```rust
/// use toon_codec::{DecodeOptions, IndentMode};
///
/// let options = DecodeOptions::new()
///     .with_indent(IndentMode::Fixed(2))
///     .with_max_depth(32)
///     .with_max_input_len(64 * 1024);
/// assert_eq!(options.max_input_len, Some(65536));
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DecodeOptions {
    pub indent: IndentMode,
    pub max_depth: usize,
    pub max_input_len: Option<usize>,
    pub duplicate_keys: DuplicateKeyPolicy,
}

impl Default for DecodeOptions {
    fn default() -> Self {
        DecodeOptions {
            indent: IndentMode::Auto,
            max_depth: DEFAULT_MAX_DEPTH,
            max_input_len: None,
            duplicate_keys: DuplicateKeyPolicy::Reject,
        }
    }
}

impl DecodeOptions {
    /// Creates default options (auto-detected indent, depth limit 128, no size limit).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets how the indentation unit is determined. `Fixed(0)` is treated as `Fixed(1)`.
    #[must_use]
    pub fn with_indent(mut self, indent: IndentMode) -> Self {
        self.indent = match indent {
            IndentMode::Fixed(n) => IndentMode::Fixed(n.max(1)),
            IndentMode::Auto => IndentMode::Auto,
        };
        self
    }

    /// Sets the maximum container nesting depth. Zero is treated as one.
    #[must_use]
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth.max(1);
        self
    }

    /// Rejects inputs longer than `max_len` bytes before any parsing happens.
    #[must_use]
    pub fn with_max_input_len(mut self, max_len: usize) -> Self {
        self.max_input_len = Some(max_len);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_values_are_clamped() {
        let options = EncodeOptions::new().with_indent(0).with_max_depth(0);
        assert_eq!(options.indent, 1);
        assert_eq!(options.max_depth, 1);

        let options = DecodeOptions::new()
            .with_indent(IndentMode::Fixed(0))
            .with_max_depth(0);
        assert_eq!(options.indent, IndentMode::Fixed(1));
        assert_eq!(options.max_depth, 1);
    }

    #[test]
    fn test_decode_defaults() {
        let options = DecodeOptions::default();
        assert_eq!(options.indent, IndentMode::Auto);
        assert_eq!(options.max_input_len, None);
        assert_eq!(options.duplicate_keys, DuplicateKeyPolicy::Reject);
    }
}

//! Error types for figstore.

/// Result type alias for figstore operations.
pub type Result<T> = std::result::Result<T, ConfigError>;

/// Errors that can occur when loading or reading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The requested key has never been loaded (or was deleted).
    #[error("Key not found: {0}")]
    KeyNotFound(String),

    /// Structured text could not be parsed.
    #[error("Failed to parse {format} at byte {position}: {kind}")]
    ParseError {
        /// Format being parsed (`json`, `xml`, `toml`)
        format: &'static str,
        /// Byte offset where the problem was detected
        position: usize,
        /// What went wrong
        kind: ParseErrorKind,
    },

    /// A dotted path step addressed a missing key or a non-container value.
    #[error("Cannot navigate to '{path}': {reason}")]
    NavigationError {
        /// The path prefix that failed to resolve
        path: String,
        /// Why it failed
        reason: String,
    },

    /// A command-line token was malformed or lacked a required value.
    #[error("Invalid argument '{arg}': {reason}")]
    ArgumentError {
        /// The offending token
        arg: String,
        /// Why it was rejected
        reason: String,
    },

    /// Failed to set up a source (e.g. unsupported file type).
    #[error("Failed to load configuration: {0}")]
    LoadError(String),

    /// IO error occurred.
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

/// The specific defect found by a structured-text reader.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseErrorKind {
    /// Input ended while more was expected.
    #[error("unexpected end of input")]
    UnexpectedEnd,

    /// A byte did not match what the grammar allows here.
    #[error("expected {expected}, found '{found}'")]
    UnexpectedByte {
        /// Human-readable description of what was expected
        expected: &'static str,
        /// The byte actually found
        found: char,
    },

    /// A string literal was never closed.
    #[error("unterminated string")]
    UnterminatedString,

    /// Backslash escapes are not supported inside strings.
    #[error("escape sequences are not supported")]
    EscapeSequence,

    /// JSON arrays are not supported.
    #[error("arrays are not supported")]
    UnsupportedArray,

    /// An XML closing tag did not match its opening tag.
    #[error("closing tag </{close}> does not match <{open}>")]
    MismatchedTag {
        /// Name of the opening tag
        open: String,
        /// Name found in the closing tag
        close: String,
    },

    /// Self-closing XML tags (`<a/>`) are not supported.
    #[error("self-closing tag <{0}/> is not supported")]
    SelfClosingTag(String),

    /// Comments, processing instructions and declarations are not supported.
    #[error("comments, declarations and processing instructions are not supported")]
    UnsupportedMarkup,

    /// An XML tag with no name (`<>`).
    #[error("empty tag name")]
    EmptyTag,

    /// Containers were nested deeper than the reader allows.
    #[error("nesting deeper than {limit} levels")]
    TooDeep {
        /// Deepest nesting accepted
        limit: usize,
    },

    /// Text was not valid UTF-8.
    #[error("invalid UTF-8")]
    InvalidUtf8,

    /// Error reported by a delegated parser.
    #[error("{0}")]
    Foreign(String),
}

impl ConfigError {
    /// Build a navigation error.
    pub fn navigation(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::NavigationError {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Build an argument error.
    pub fn argument(arg: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::ArgumentError {
            arg: arg.into(),
            reason: reason.into(),
        }
    }

    /// The parse defect, if this is a parse error.
    pub fn parse_kind(&self) -> Option<&ParseErrorKind> {
        match self {
            Self::ParseError { kind, .. } => Some(kind),
            _ => None,
        }
    }
}

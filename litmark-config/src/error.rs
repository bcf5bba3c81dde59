//! Hand-rolled error enums for parsing, resolving, and decoding
//! configuration, matching the error shape this component follows: small
//! per-concern enums with manual `Display` bodies, composed into a single
//! `ConfigError` only where a caller needs one.

use std::fmt;

use litmark_combinators::Position;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigParseError {
    UnclosedQuote { at: Position },
    UnterminatedTripleQuote { at: Position },
    IllegalCharacter { at: Position, found: char },
    UnterminatedObject { at: Position },
    UnterminatedArray { at: Position },
    InvalidSubstitution { at: Position },
    ExpectedValue { at: Position },
    ExpectedKey { at: Position },
}

impl fmt::Display for ConfigParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigParseError::UnclosedQuote { at } => write!(f, "{at}: unclosed quoted string"),
            ConfigParseError::UnterminatedTripleQuote { at } => {
                write!(f, "{at}: unterminated triple-quoted string")
            }
            ConfigParseError::IllegalCharacter { at, found } => {
                write!(f, "{at}: illegal character {found:?} in unquoted string")
            }
            ConfigParseError::UnterminatedObject { at } => write!(f, "{at}: unterminated object, expected `}}`"),
            ConfigParseError::UnterminatedArray { at } => write!(f, "{at}: unterminated array, expected `]`"),
            ConfigParseError::InvalidSubstitution { at } => write!(f, "{at}: invalid substitution syntax, expected `${{path}}`"),
            ConfigParseError::ExpectedValue { at } => write!(f, "{at}: expected a value"),
            ConfigParseError::ExpectedKey { at } => write!(f, "{at}: expected a key"),
        }
    }
}

impl std::error::Error for ConfigParseError {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigResolveError {
    UnresolvedSubstitution { path: String },
    CircularSubstitution { cycle: Vec<String> },
    TypeMismatch { path: String, expected: &'static str, found: &'static str },
}

impl fmt::Display for ConfigResolveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigResolveError::UnresolvedSubstitution { path } => {
                write!(f, "unresolved substitution ${{{path}}}")
            }
            ConfigResolveError::CircularSubstitution { cycle } => {
                write!(f, "circular substitution: {}", cycle.join(" -> "))
            }
            ConfigResolveError::TypeMismatch { path, expected, found } => write!(
                f,
                "type mismatch resolving {path}: expected {expected}, found {found}"
            ),
        }
    }
}

impl std::error::Error for ConfigResolveError {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    Missing { key: String },
    TypeMismatch { key: String, expected: &'static str, found: &'static str },
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DecodeError::Missing { key } => write!(f, "missing required key {key:?}"),
            DecodeError::TypeMismatch { key, expected, found } => write!(
                f,
                "key {key:?}: expected {expected}, found {found}"
            ),
        }
    }
}

impl std::error::Error for DecodeError {}

/// Top-level union used by callers that want one error type across the
/// whole parse/resolve/decode pipeline (e.g. a strict-mode caller bubbling a
/// single error out to the user).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    Parse(ConfigParseError),
    Resolve(ConfigResolveError),
    Decode(DecodeError),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Parse(e) => write!(f, "{e}"),
            ConfigError::Resolve(e) => write!(f, "{e}"),
            ConfigError::Decode(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<ConfigParseError> for ConfigError {
    fn from(e: ConfigParseError) -> Self {
        ConfigError::Parse(e)
    }
}

impl From<ConfigResolveError> for ConfigError {
    fn from(e: ConfigResolveError) -> Self {
        ConfigError::Resolve(e)
    }
}

impl From<DecodeError> for ConfigError {
    fn from(e: DecodeError) -> Self {
        ConfigError::Decode(e)
    }
}

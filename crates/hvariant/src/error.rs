// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Error types for type parsing, value construction and file access.
//!
//! Corrupt serialised data is not an error here: the accessor substitutes
//! defaults and [`crate::serialiser::is_normal`] reports the verdict as a
//! boolean.

use std::fmt;

/// Why a type string failed to parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GrammarReason {
    /// The string ended where a type was expected.
    UnexpectedEnd,
    /// A character that is not a type tag.
    UnknownTag(char),
    /// A dictionary entry key that is not a basic type.
    NonBasicKey,
    /// `{` without the matching `}` after key and value.
    UnterminatedDictEntry,
    /// A complete type followed by extra characters.
    TrailingCharacters,
    /// More nested containers than the configured type depth.
    TooDeep,
}

impl fmt::Display for GrammarReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnexpectedEnd => write!(f, "unexpected end of type string"),
            Self::UnknownTag(c) => write!(f, "unknown type tag {:?}", c),
            Self::NonBasicKey => write!(f, "dictionary entry key must be a basic type"),
            Self::UnterminatedDictEntry => {
                write!(f, "dictionary entry must have exactly two members")
            }
            Self::TrailingCharacters => write!(f, "trailing characters after type"),
            Self::TooDeep => write!(f, "type nested too deeply"),
        }
    }
}

/// Grammar and construction errors for type descriptors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeError {
    /// Malformed type string; `position` is the byte offset of the problem.
    Grammar {
        position: usize,
        reason: GrammarReason,
    },
    /// Composition of a dictionary entry with a non-basic key.
    NonBasicKey(String),
    /// An indefinite type where a definite one is required.
    Indefinite(String),
}

impl fmt::Display for TypeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Grammar { position, reason } => {
                write!(f, "invalid type string at position {}: {}", position, reason)
            }
            Self::NonBasicKey(key) => {
                write!(f, "dictionary entry key '{}' is not a basic type", key)
            }
            Self::Indefinite(ty) => write!(f, "type '{}' is not definite", ty),
        }
    }
}

impl std::error::Error for TypeError {}

/// Errors raised while building a [`crate::Value`] tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValueError {
    /// A child whose type differs from the container's element type.
    TypeMismatch { expected: String, found: String },
    /// Not a valid object path.
    InvalidObjectPath(String),
    /// Not a valid type signature.
    InvalidSignature(String),
    /// Underlying type construction failure.
    Type(TypeError),
}

impl fmt::Display for ValueError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TypeMismatch { expected, found } => {
                write!(f, "type mismatch: expected {}, found {}", expected, found)
            }
            Self::InvalidObjectPath(path) => write!(f, "invalid object path: {:?}", path),
            Self::InvalidSignature(sig) => write!(f, "invalid signature: {:?}", sig),
            Self::Type(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for ValueError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Type(e) => Some(e),
            _ => None,
        }
    }
}

impl From<TypeError> for ValueError {
    fn from(e: TypeError) -> Self {
        Self::Type(e)
    }
}

/// Crate-level error.
#[derive(Debug)]
pub enum Error {
    /// Type string or type composition failure.
    Type(TypeError),
    /// Value construction failure.
    Value(ValueError),
    /// I/O error with underlying cause.
    Io(std::io::Error),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Type(e) => write!(f, "Type error: {}", e),
            Error::Value(e) => write!(f, "Value error: {}", e),
            Error::Io(e) => write!(f, "I/O error: {}", e),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Type(e) => Some(e),
            Error::Value(e) => Some(e),
            Error::Io(e) => Some(e),
        }
    }
}

impl From<TypeError> for Error {
    fn from(e: TypeError) -> Self {
        Error::Type(e)
    }
}

impl From<ValueError> for Error {
    fn from(e: ValueError) -> Self {
        Error::Value(e)
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Error::Io(e)
    }
}

/// Result alias for crate-level operations.
pub type Result<T> = std::result::Result<T, Error>;

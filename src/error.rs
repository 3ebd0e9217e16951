//! Error types for the Wirelab simulation engine.
//!
//! This module provides a unified error type [`WirelabError`] that covers
//! snapshot parsing, snapshot validation, and the per-tick failure kinds of
//! the analog solve. Tick failures never escape [`crate::Engine::tick`]; they
//! are folded into the returned [`crate::ResultSet`] as its status.

use thiserror::Error;

/// Result type alias using [`WirelabError`].
pub type Result<T> = std::result::Result<T, WirelabError>;

/// Unified error type for all Wirelab operations.
#[derive(Error, Debug)]
pub enum WirelabError {
    // ============ Snapshot DSL Errors ============
    /// Error during lexical analysis
    #[error("Lexer error at line {line}, column {column}: {message}")]
    LexerError {
        line: usize,
        column: usize,
        message: String,
    },

    /// Error during parsing
    #[error("Parse error at line {line}: {message}")]
    ParseError { line: usize, message: String },

    /// Invalid element definition
    #[error("Invalid element '{name}' at line {line}: {message}")]
    InvalidElement {
        name: String,
        line: usize,
        message: String,
    },

    /// Unknown element kind
    #[error("Unknown element kind '{kind}' at line {line}")]
    UnknownElementKind { kind: String, line: usize },

    // ============ Snapshot Validation Errors ============
    /// Invalid parameter value on a placed component
    #[error("Invalid parameter '{param}' for component '{component}': {message}")]
    InvalidParameter {
        component: String,
        param: String,
        message: String,
    },

    /// Duplicate component name
    #[error("Duplicate component name '{name}'")]
    DuplicateComponent { name: String },

    // ============ Tick Failures ============
    /// No battery or synthetic source is present
    #[error("No power source in circuit")]
    NoPowerSource,

    /// Ground reference could not be determined
    #[error("Ground reference could not be resolved")]
    UnresolvedGround,

    /// Pruning left no edges, even after the ground fallback
    #[error("Circuit graph is disconnected from its power source")]
    DisconnectedGraph,

    /// Matrix is singular and cannot be solved
    #[error("Singular matrix at pivot {pivot} - circuit cannot be solved")]
    SingularMatrix { pivot: usize },

    /// Near-zero resistance path between the positive terminal and ground
    #[error("Short circuit detected (path resistance {resistance:.2e} ohm)")]
    ShortCircuit { resistance: f64 },

    // ============ I/O Errors ============
    /// Error reading a schematic file
    #[error("Failed to read schematic file '{path}': {source}")]
    FileReadError {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

impl WirelabError {
    /// Create a lexer error
    pub fn lexer(line: usize, column: usize, message: impl Into<String>) -> Self {
        Self::LexerError {
            line,
            column,
            message: message.into(),
        }
    }

    /// Create a parse error
    pub fn parse(line: usize, message: impl Into<String>) -> Self {
        Self::ParseError {
            line,
            message: message.into(),
        }
    }

    /// Create an invalid element error
    pub fn invalid_element(name: impl Into<String>, line: usize, message: impl Into<String>) -> Self {
        Self::InvalidElement {
            name: name.into(),
            line,
            message: message.into(),
        }
    }

    /// Create an invalid parameter error
    pub fn invalid_parameter(
        component: impl Into<String>,
        param: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::InvalidParameter {
            component: component.into(),
            param: param.into(),
            message: message.into(),
        }
    }

    /// Whether this error is one of the silently recoverable tick failures.
    pub fn is_tick_failure(&self) -> bool {
        matches!(
            self,
            Self::NoPowerSource
                | Self::UnresolvedGround
                | Self::DisconnectedGraph
                | Self::SingularMatrix { .. }
                | Self::ShortCircuit { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tick_failures_are_classified() {
        assert!(WirelabError::NoPowerSource.is_tick_failure());
        assert!(WirelabError::SingularMatrix { pivot: 3 }.is_tick_failure());
        assert!(!WirelabError::parse(1, "bad").is_tick_failure());
    }

    #[test]
    fn test_messages_carry_location() {
        let err = WirelabError::lexer(4, 7, "unexpected character '@'");
        assert_eq!(
            err.to_string(),
            "Lexer error at line 4, column 7: unexpected character '@'"
        );
    }
}

//! Diagnostics and failure normalization.
//!
//! Every compilation attempt produces a fresh list: empty on success, the
//! parser's own diagnostics on a structured failure, or exactly one
//! synthesized entry at 1:1 for anything else.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt;

use crate::parser::ParseError;
use crate::span::Position;

/// Stable numeric diagnostic codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    /// Failure that carried no structured diagnostics.
    Unstructured,
    UnexpectedCharacter,
    UnterminatedString,
    UnterminatedComment,
    UnexpectedToken,
    UnexpectedEof,
}

impl ErrorCode {
    pub fn as_u32(self) -> u32 {
        match self {
            Self::Unstructured => 1001,
            Self::UnexpectedCharacter => 1002,
            Self::UnterminatedString => 1003,
            Self::UnterminatedComment => 1004,
            Self::UnexpectedToken => 3001,
            Self::UnexpectedEof => 3002,
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_u32())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Error => f.write_str("error"),
            Self::Warning => f.write_str("warning"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub message: String,
    pub location: Position,
    pub severity: Severity,
    pub code: u32,
}

impl Diagnostic {
    pub fn error(code: ErrorCode, message: impl Into<String>, location: Position) -> Self {
        Self {
            message: message.into(),
            location,
            severity: Severity::Error,
            code: code.as_u32(),
        }
    }

    /// The single diagnostic used when a failure has no position information.
    pub fn unstructured(message: impl Into<String>) -> Self {
        let message = message.into();
        let message = if message.trim().is_empty() {
            "Unknown error".to_string()
        } else {
            message
        };
        Self::error(ErrorCode::Unstructured, message, Position::START)
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {}[{}]: {}",
            self.location, self.severity, self.code, self.message
        )
    }
}

/// A compilation failure carrying structured diagnostics.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("{}", summary(.diags))]
pub struct CompilerError {
    pub diags: Vec<Diagnostic>,
}

fn summary(diags: &[Diagnostic]) -> String {
    match diags {
        [] => "compilation failed".to_string(),
        [only] => only.message.clone(),
        [first, rest @ ..] => format!("{} (and {} more)", first.message, rest.len()),
    }
}

impl CompilerError {
    pub fn new(diags: Vec<Diagnostic>) -> Self {
        Self { diags }
    }
}

impl From<ParseError> for CompilerError {
    fn from(err: ParseError) -> Self {
        let diag = Diagnostic::error(err.code(), err.to_string(), err.position());
        Self { diags: vec![diag] }
    }
}

/// Turn any failure into the ordered diagnostic list shown to the user.
pub fn normalize(err: &(dyn Error + 'static)) -> Vec<Diagnostic> {
    if let Some(compiler) = err.downcast_ref::<CompilerError>() {
        if !compiler.diags.is_empty() {
            return compiler.diags.clone();
        }
    }
    if let Some(parse) = err.downcast_ref::<ParseError>() {
        return CompilerError::from(parse.clone()).diags;
    }
    vec![Diagnostic::unstructured(err.to_string())]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::LexError;

    #[derive(Debug, thiserror::Error)]
    #[error("{0}")]
    struct Opaque(String);

    #[test]
    fn test_structured_diagnostics_pass_through() {
        let diags = vec![
            Diagnostic {
                message: "first".into(),
                location: Position::new(3, 7),
                severity: Severity::Warning,
                code: 4242,
            },
            Diagnostic::error(ErrorCode::UnexpectedToken, "second", Position::new(9, 1)),
        ];
        let err = CompilerError::new(diags.clone());
        assert_eq!(normalize(&err), diags);
    }

    #[test]
    fn test_unstructured_error_defaults_to_start() {
        let out = normalize(&Opaque("boom".into()));
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].message, "boom");
        assert_eq!(out[0].location, Position::new(1, 1));
        assert_eq!(out[0].severity, Severity::Error);
        assert_eq!(out[0].code, 1001);
    }

    #[test]
    fn test_empty_message_becomes_unknown_error() {
        let out = normalize(&Opaque(String::new()));
        assert_eq!(out[0].message, "Unknown error");
    }

    #[test]
    fn test_empty_structured_list_is_synthesized() {
        let out = normalize(&CompilerError::new(Vec::new()));
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].message, "compilation failed");
        assert_eq!(out[0].code, ErrorCode::Unstructured.as_u32());
    }

    #[test]
    fn test_parse_error_keeps_its_position() {
        let err = ParseError::from(LexError::UnexpectedChar {
            ch: ';',
            pos: Position::new(4, 12),
        });
        let out = normalize(&err);
        assert_eq!(out[0].location, Position::new(4, 12));
        assert_eq!(out[0].code, 1002);
    }

    #[test]
    fn test_diagnostic_serialization() {
        let diag = Diagnostic::error(ErrorCode::UnexpectedEof, "eof", Position::new(2, 1));
        let json = serde_json::to_string(&diag).unwrap();
        assert!(json.contains(r#""severity":"error""#));
        assert!(json.contains(r#""code":3002"#));
        assert!(json.contains(r#""location":{"line":2,"column":1}"#));
    }
}

//! Common error infrastructure for rules-core.
//!
//! Domain-specific errors (`FormulaError`, `WealthError`) are defined in their
//! respective modules alongside the operations that raise them. This module
//! holds the shared classification trait and the [`Diagnostic`] record used
//! for soft failures that must never abort a recomputation.
//!
//! # Design Principles
//!
//! - **Type Safety**: Each operation family has its own error enum
//! - **Severity Classification**: Errors are categorized for recovery strategies
//! - **Soft Failures**: Bad records degrade to diagnostics, not panics

use std::fmt;

/// Severity level of an error, used for categorization and recovery strategies.
///
/// - **Recoverable**: The host may retry with different input (e.g. more currency)
/// - **Validation**: Malformed record or request, dropped or substituted
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum ErrorSeverity {
    /// Recoverable error - can retry with same or alternative request.
    ///
    /// Examples: insufficient currency for a purchase
    Recoverable,

    /// Validation error - invalid input, should not retry without changes.
    ///
    /// Examples: unknown activity kind, formula that does not parse
    Validation,
}

impl ErrorSeverity {
    /// Returns a human-readable description of this severity level.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Recoverable => "recoverable",
            Self::Validation => "validation",
        }
    }
}

impl fmt::Display for ErrorSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Common trait for all rules-core errors.
///
/// # Implementation Guidelines
///
/// - All error enums should implement this trait
/// - Use `#[derive(thiserror::Error)]` for Display/Error impl
/// - Classify severity based on recoverability, not impact
pub trait RulesError: fmt::Display + fmt::Debug {
    /// Returns the severity level of this error.
    fn severity(&self) -> ErrorSeverity;

    /// Returns a static string identifier for this error variant.
    ///
    /// Default implementation uses the error type name.
    fn error_code(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}

/// A soft failure surfaced to the host layer alongside a computed result.
///
/// Recomputation never aborts on a bad record: the offending entry is dropped
/// or replaced by a default, and one of these is attached to the output so the
/// host can notify the user.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Diagnostic {
    pub severity: ErrorSeverity,
    /// Label of the source (or formula) that produced the problem.
    pub origin: String,
    pub message: String,
}

impl Diagnostic {
    pub fn new(
        severity: ErrorSeverity,
        origin: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            severity,
            origin: origin.into(),
            message: message.into(),
        }
    }

    /// Build a diagnostic from any classified error.
    pub fn from_error(origin: impl Into<String>, error: &impl RulesError) -> Self {
        Self::new(error.severity(), origin, error.to_string())
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.severity, self.origin, self.message)
    }
}

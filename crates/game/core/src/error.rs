//! Common error infrastructure for game-core.
//!
//! Domain-specific errors (e.g. `AuthorityError`) are defined in their
//! respective modules alongside the operations they guard.
//!
//! # Design Principles
//!
//! - **Type Safety**: Each subsystem has its own error type with specific variants
//! - **No silent no-ops**: Calls that used to be ignored return an error instead
//! - **Severity Classification**: Errors are categorized for logging and recovery

/// Severity level of an error, used for categorization and recovery strategies.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ErrorSeverity {
    /// Setup-time misconfiguration (empty roster, invalid start index).
    ///
    /// The system stays in a safe but inert state until reconfigured.
    Configuration,

    /// A caller broke the turn protocol (ending a turn it does not own,
    /// removing an unknown entity). State is unchanged.
    Protocol,

    /// Unexpected state inconsistency. These indicate bugs.
    Internal,
}

impl ErrorSeverity {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Configuration => "configuration",
            Self::Protocol => "protocol",
            Self::Internal => "internal",
        }
    }

    /// Returns true if normal play can continue after this error.
    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::Protocol)
    }

    pub const fn is_internal(&self) -> bool {
        matches!(self, Self::Internal)
    }
}

/// Common trait for all game-core errors.
///
/// # Implementation Guidelines
///
/// - All error enums should implement this trait
/// - Use `#[derive(thiserror::Error)]` for Display/Error impl
/// - Classify severity based on recoverability, not impact
pub trait GameError: core::fmt::Display + core::fmt::Debug {
    fn severity(&self) -> ErrorSeverity;

    /// Returns a static string identifier for this error variant.
    ///
    /// Default implementation uses the error type name.
    fn error_code(&self) -> &'static str {
        core::any::type_name::<Self>()
    }
}

//! Shared error classification for idle-core.
//!
//! Each subsystem defines its own error enum next to the state it guards
//! (`ResourceError` in stats, `InventoryError` in inventory). They all share
//! [`GameError`] so a caller can decide how to surface a rejected command
//! without matching on every variant.
//!
//! # Contract
//!
//! - A command that returns an error has not mutated anything
//! - Errors are rule violations, never panics
//! - Every variant carries a stable `error_code` string

/// How a rejected command should be handled.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ErrorSeverity {
    /// May succeed later without the player changing anything.
    ///
    /// Examples: not enough stamina, inventory full, bag still has items
    Recoverable,

    /// Will never succeed as issued.
    ///
    /// Examples: ring dropped on the head slot, bag dropped into itself
    Validation,

    /// State that should be impossible.
    ///
    /// Examples: a slot address naming a bag instance with no slot array
    Internal,

    /// State is unusable.
    Fatal,
}

impl ErrorSeverity {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Recoverable => "recoverable",
            Self::Validation => "validation",
            Self::Internal => "internal",
            Self::Fatal => "fatal",
        }
    }

    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::Recoverable)
    }

    /// True for severities that point at a bug rather than a player mistake.
    pub const fn is_internal(&self) -> bool {
        matches!(self, Self::Internal | Self::Fatal)
    }
}

/// Implemented by every idle-core error enum.
///
/// Derive `Display` and `Error` with `thiserror`; classify severity by
/// whether a retry could succeed, not by how bad the failure looks.
pub trait GameError: core::fmt::Display + core::fmt::Debug {
    fn severity(&self) -> ErrorSeverity;

    /// Stable identifier such as `INVENTORY_NO_SPACE`.
    ///
    /// The UI maps these to notices; tests match on them.
    fn error_code(&self) -> &'static str {
        core::any::type_name::<Self>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn severity_classes() {
        assert!(ErrorSeverity::Recoverable.is_recoverable());
        assert!(!ErrorSeverity::Validation.is_internal());
        assert!(ErrorSeverity::Fatal.is_internal());
        assert_eq!(ErrorSeverity::Internal.as_str(), "internal");
    }
}

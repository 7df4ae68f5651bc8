//! Unified error type surfaced by session commands.
//!
//! Core rule violations pass through unchanged so callers can still inspect
//! their severity and code.
use idle_core::{AbilityKind, ErrorSeverity, GameError, InventoryError, ResourceError};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, RuntimeError>;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error(transparent)]
    Inventory(#[from] InventoryError),

    #[error(transparent)]
    Resource(#[from] ResourceError),

    #[error("failed to encode or decode save state")]
    Save(#[from] serde_json::Error),

    #[error("unknown ability {ability}")]
    UnknownAbility { ability: String },

    #[error("ability {ability} has not been learned")]
    AbilityNotLearned { ability: String },

    #[error("ability {ability} is not a {expected} ability")]
    WrongAbilityKind {
        ability: String,
        expected: AbilityKind,
    },

    #[error("item {item} has no use effects")]
    NotUsable { item: String },

    #[error("work {ability} is already in progress")]
    WorkInProgress { ability: String },

    #[error("no work in progress")]
    NoWorkInProgress,

    #[error("work {ability} is not finished ({remaining_ms}ms remaining)")]
    WorkNotDue { ability: String, remaining_ms: u64 },
}

impl GameError for RuntimeError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            RuntimeError::Inventory(e) => e.severity(),
            RuntimeError::Resource(e) => e.severity(),
            RuntimeError::Save(_) => ErrorSeverity::Internal,
            RuntimeError::WorkInProgress { .. } | RuntimeError::WorkNotDue { .. } => {
                ErrorSeverity::Recoverable
            }
            _ => ErrorSeverity::Validation,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            RuntimeError::Inventory(e) => e.error_code(),
            RuntimeError::Resource(e) => e.error_code(),
            RuntimeError::Save(_) => "RUNTIME_SAVE",
            RuntimeError::UnknownAbility { .. } => "RUNTIME_UNKNOWN_ABILITY",
            RuntimeError::AbilityNotLearned { .. } => "RUNTIME_ABILITY_NOT_LEARNED",
            RuntimeError::WrongAbilityKind { .. } => "RUNTIME_WRONG_ABILITY_KIND",
            RuntimeError::NotUsable { .. } => "RUNTIME_NOT_USABLE",
            RuntimeError::WorkInProgress { .. } => "RUNTIME_WORK_IN_PROGRESS",
            RuntimeError::NoWorkInProgress => "RUNTIME_NO_WORK_IN_PROGRESS",
            RuntimeError::WorkNotDue { .. } => "RUNTIME_WORK_NOT_DUE",
        }
    }
}

//! The module contains the errors the engine can throw.

use sea_orm::DbErr;
use thiserror::Error;

use crate::money::MoneyCents;

/// The first existing expense that matched a duplicate probe.
///
/// Carried inside [`EngineError::PossibleDuplicate`] so callers can show the
/// user what the submission collided with.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DuplicateCandidate {
    pub id: i64,
    pub amount: MoneyCents,
    pub description: String,
    pub expense_date: chrono::NaiveDate,
}

/// Engine custom errors.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Invalid input: {0}")]
    Validation(String),
    #[error("\"{0}\" not found!")]
    KeyNotFound(String),
    #[error("Forbidden: {0}")]
    Forbidden(String),
    #[error("Invalid category: {0}")]
    InvalidCategory(String),
    #[error("Duplicate category: {0}")]
    DuplicateCategory(String),
    #[error("Category in use: {0}")]
    CategoryInUse(String),
    #[error("System category: {0}")]
    SystemCategory(String),
    #[error("Similar expense found (id {})", .0.id)]
    PossibleDuplicate(DuplicateCandidate),
    #[error("Expenses older than one year cannot be bulk deleted: {0:?}")]
    TooOld(Vec<i64>),
    #[error(transparent)]
    Database(#[from] DbErr),
}

impl PartialEq for EngineError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Validation(a), Self::Validation(b)) => a == b,
            (Self::KeyNotFound(a), Self::KeyNotFound(b)) => a == b,
            (Self::Forbidden(a), Self::Forbidden(b)) => a == b,
            (Self::InvalidCategory(a), Self::InvalidCategory(b)) => a == b,
            (Self::DuplicateCategory(a), Self::DuplicateCategory(b)) => a == b,
            (Self::CategoryInUse(a), Self::CategoryInUse(b)) => a == b,
            (Self::SystemCategory(a), Self::SystemCategory(b)) => a == b,
            (Self::PossibleDuplicate(a), Self::PossibleDuplicate(b)) => a == b,
            (Self::TooOld(a), Self::TooOld(b)) => a == b,
            (Self::Database(a), Self::Database(b)) => a.to_string() == b.to_string(),
            _ => false,
        }
    }
}

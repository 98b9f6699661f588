//! The module contains the errors the engine can return.
//!
//! Every engine operation returns a typed `Result`; storage failures are
//! wrapped so that callers never see a raw database error kind leak through
//! the public API.
use sea_orm::DbErr;
use thiserror::Error;

/// Engine custom errors.
#[derive(Error, Debug)]
pub enum EngineError {
    /// The account, transaction or goal does not exist *for this caller*.
    ///
    /// An ownership mismatch is reported exactly like absence, so callers
    /// cannot probe for rows belonging to other users.
    #[error("\"{0}\" not found!")]
    NotFound(String),
    #[error("\"{0}\" already present!")]
    ExistingKey(String),
    #[error("Insufficient funds: {0}")]
    InsufficientFunds(String),
    #[error("Insufficient savings: {0}")]
    InsufficientSavings(String),
    #[error("Account inactive: {0}")]
    AccountInactive(String),
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),
    #[error(transparent)]
    Database(#[from] DbErr),
}

impl PartialEq for EngineError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::NotFound(a), Self::NotFound(b)) => a == b,
            (Self::ExistingKey(a), Self::ExistingKey(b)) => a == b,
            (Self::InsufficientFunds(a), Self::InsufficientFunds(b)) => a == b,
            (Self::InsufficientSavings(a), Self::InsufficientSavings(b)) => a == b,
            (Self::AccountInactive(a), Self::AccountInactive(b)) => a == b,
            (Self::InvalidAmount(a), Self::InvalidAmount(b)) => a == b,
            (Self::Database(a), Self::Database(b)) => a.to_string() == b.to_string(),
            _ => false,
        }
    }
}

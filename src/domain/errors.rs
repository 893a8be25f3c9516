//! Domain error types
//!
//! Every circulation operation returns a structured outcome; these
//! variants carry enough context (ids, counts) for the caller to decide
//! remediation without re-querying.

use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum LibraryError {
    /// No borrower with this card id
    BorrowerNotFound(String),
    /// No book with this ISBN
    BookNotFound(String),
    /// The single copy of this book is out on an active loan
    AlreadyCheckedOut(String),
    /// Borrower is at the active-loan ceiling
    LoanLimitReached { card_id: String, limit: u64 },
    /// Borrower has unpaid fines blocking checkout
    FinesOwed(String),
    /// Settlement rejected: some unpaid fines belong to loans still out
    UnreturnedBooks { loan_ids: Vec<i32> },
    /// Operation had nothing to act on (e.g. no unpaid fines to settle)
    NothingToDo(String),
    /// Check-in batch finished with per-id failures; successes committed
    BatchPartialFailure {
        succeeded: usize,
        errors: Vec<(i32, String)>,
    },
    /// Batch rejected before any mutation (empty, oversized)
    InvalidBatch(String),
    /// Underlying persistence failure
    Storage(String),
}

impl fmt::Display for LibraryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LibraryError::BorrowerNotFound(card_id) => {
                write!(f, "Borrower with card ID '{}' not found", card_id)
            }
            LibraryError::BookNotFound(isbn) => {
                write!(f, "Book with ISBN '{}' not found", isbn)
            }
            LibraryError::AlreadyCheckedOut(isbn) => {
                write!(
                    f,
                    "Book with ISBN '{}' is already checked out and not available",
                    isbn
                )
            }
            LibraryError::LoanLimitReached { card_id, limit } => {
                write!(
                    f,
                    "Borrower '{}' already has {} active loans. Maximum limit reached",
                    card_id, limit
                )
            }
            LibraryError::FinesOwed(card_id) => {
                write!(
                    f,
                    "Borrower '{}' has unpaid fines. Cannot check out books until fines are paid",
                    card_id
                )
            }
            LibraryError::UnreturnedBooks { loan_ids } => {
                let ids: Vec<String> = loan_ids.iter().map(|id| id.to_string()).collect();
                write!(
                    f,
                    "Cannot pay fines for books that are not yet returned. Loan IDs: {}",
                    ids.join(", ")
                )
            }
            LibraryError::NothingToDo(msg) => write!(f, "{}", msg),
            LibraryError::BatchPartialFailure { succeeded, errors } => {
                let details: Vec<String> = errors
                    .iter()
                    .map(|(id, reason)| format!("loan {}: {}", id, reason))
                    .collect();
                write!(
                    f,
                    "Checked in {} book(s); {} failed ({})",
                    succeeded,
                    errors.len(),
                    details.join("; ")
                )
            }
            LibraryError::InvalidBatch(msg) => write!(f, "{}", msg),
            LibraryError::Storage(msg) => write!(f, "Database error: {}", msg),
        }
    }
}

impl std::error::Error for LibraryError {}

// Conversion from SeaORM errors (used in infrastructure layer)
impl From<sea_orm::DbErr> for LibraryError {
    fn from(e: sea_orm::DbErr) -> Self {
        LibraryError::Storage(e.to_string())
    }
}

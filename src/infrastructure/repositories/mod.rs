//! Repository implementations using SeaORM
//!
//! Dates live in the store as `YYYY-MM-DD` text and amounts as SQLite
//! numerics (the legacy writer relied on NUMERIC affinity); the helpers
//! here convert to `NaiveDate`/`Decimal` at the boundary.

pub mod book_repository;
pub mod borrower_repository;
pub mod fine_repository;
pub mod loan_repository;

pub use book_repository::SeaOrmBookRepository;
pub use borrower_repository::SeaOrmBorrowerRepository;
pub use fine_repository::SeaOrmFineRepository;
pub use loan_repository::SeaOrmLoanRepository;

use chrono::NaiveDate;
use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::Decimal;

use crate::domain::LibraryError;

pub(crate) const DATE_FORMAT: &str = "%Y-%m-%d";

pub(crate) fn parse_date(value: &str) -> Result<NaiveDate, LibraryError> {
    NaiveDate::parse_from_str(value, DATE_FORMAT)
        .map_err(|e| LibraryError::Storage(format!("invalid date '{}': {}", value, e)))
}

pub(crate) fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

pub(crate) fn amount_from_stored(value: f64) -> Decimal {
    Decimal::from_f64(value).unwrap_or_default().round_dp(2)
}

pub(crate) fn amount_to_stored(amount: Decimal) -> f64 {
    amount.to_f64().unwrap_or_default()
}

//! Repository trait definitions
//!
//! These traits define the contract for data access.
//! Implementations live in the infrastructure layer. Methods that touch
//! several rows (`mark_returned`, `apply_adjustments`, `settle`) commit
//! all of their changes in one transaction or none of them.

use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;

use super::LibraryError;

#[derive(Debug, Clone)]
pub struct Borrower {
    pub card_id: String,
    pub name: String,
    pub address: String,
    pub phone: String,
    pub ssn: String,
}

#[derive(Debug, Clone)]
pub struct Book {
    pub isbn: String,
    pub title: String,
}

#[derive(Debug, Clone)]
pub struct Loan {
    pub loan_id: i32,
    pub isbn: String,
    pub card_id: String,
    pub date_out: NaiveDate,
    pub due_date: NaiveDate,
    pub date_in: Option<NaiveDate>,
}

impl Loan {
    pub fn is_active(&self) -> bool {
        self.date_in.is_none()
    }
}

/// Checkout input; the loan id is assigned by the store.
#[derive(Debug, Clone)]
pub struct NewLoan {
    pub isbn: String,
    pub card_id: String,
    pub date_out: NaiveDate,
    pub due_date: NaiveDate,
}

/// Active loan joined with book and borrower context.
#[derive(Debug, Clone, serde::Serialize)]
pub struct ActiveLoanRow {
    pub loan_id: i32,
    pub isbn: String,
    pub title: String,
    pub card_id: String,
    pub borrower_name: String,
    pub date_out: NaiveDate,
    pub due_date: NaiveDate,
}

/// Catalog row with its authors resolved through the join table.
#[derive(Debug, Clone)]
pub struct BookWithAuthors {
    pub isbn: String,
    pub title: String,
    pub authors: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct Fine {
    pub loan_id: i32,
    pub amount: Decimal,
    pub paid: bool,
}

/// Unpaid fine with the return state of its loan, as needed by settlement.
#[derive(Debug, Clone)]
pub struct UnpaidFine {
    pub loan_id: i32,
    pub amount: Decimal,
    pub date_in: Option<NaiveDate>,
}

/// Fine joined with loan, borrower and book context for listings.
#[derive(Debug, Clone)]
pub struct FineContextRow {
    pub card_id: String,
    pub borrower_name: String,
    pub loan_id: i32,
    pub isbn: String,
    pub title: String,
    pub due_date: NaiveDate,
    pub date_in: Option<NaiveDate>,
    pub amount: Decimal,
    pub paid: bool,
}

/// A single change the fine refresh wants persisted.
#[derive(Debug, Clone, PartialEq)]
pub enum FineAdjustment {
    Create { loan_id: i32, amount: Decimal },
    Update { loan_id: i32, amount: Decimal },
}

#[async_trait]
pub trait BorrowerRepository: Send + Sync {
    async fn find_by_card(&self, card_id: &str) -> Result<Option<Borrower>, LibraryError>;
}

#[async_trait]
pub trait BookRepository: Send + Sync {
    async fn find_by_isbn(&self, isbn: &str) -> Result<Option<Book>, LibraryError>;

    /// Case-insensitive substring match on ISBN, title or author name.
    async fn search_with_authors(&self, term: &str)
        -> Result<Vec<BookWithAuthors>, LibraryError>;
}

#[async_trait]
pub trait LoanRepository: Send + Sync {
    async fn find_by_id(&self, loan_id: i32) -> Result<Option<Loan>, LibraryError>;

    /// The active loan holding this book, if any.
    async fn active_loan_for_isbn(&self, isbn: &str) -> Result<Option<Loan>, LibraryError>;

    /// Active loans for a set of books, for availability lookups.
    async fn active_loans_for_isbns(&self, isbns: &[String]) -> Result<Vec<Loan>, LibraryError>;

    async fn count_active_for_borrower(&self, card_id: &str) -> Result<u64, LibraryError>;

    async fn create(&self, new_loan: NewLoan) -> Result<Loan, LibraryError>;

    /// Set the return date on each loan; one transaction for the batch.
    async fn mark_returned(
        &self,
        loan_ids: &[i32],
        date_in: NaiveDate,
    ) -> Result<(), LibraryError>;

    /// Loans whose due date is strictly before `today`, returned or not.
    async fn overdue_as_of(&self, today: NaiveDate) -> Result<Vec<Loan>, LibraryError>;

    /// Case-insensitive substring match on ISBN, card id or borrower
    /// name, active loans only, ordered by due date ascending.
    async fn search_active(&self, term: &str) -> Result<Vec<ActiveLoanRow>, LibraryError>;
}

#[async_trait]
pub trait FineRepository: Send + Sync {
    async fn find_by_loan(&self, loan_id: i32) -> Result<Option<Fine>, LibraryError>;

    /// Persist a refresh change set atomically.
    async fn apply_adjustments(&self, adjustments: &[FineAdjustment])
        -> Result<(), LibraryError>;

    async fn has_unpaid(&self, card_id: &str) -> Result<bool, LibraryError>;

    /// Unpaid fines for one borrower with loan return state, ordered by
    /// due date.
    async fn unpaid_for_borrower(&self, card_id: &str) -> Result<Vec<UnpaidFine>, LibraryError>;

    /// Flip the given fines to paid in one transaction; returns the
    /// number of rows updated.
    async fn settle(&self, loan_ids: &[i32]) -> Result<u64, LibraryError>;

    /// Fines joined with loan/borrower/book context, ordered by card id,
    /// paid flag, then due date. `card_id` narrows to one borrower.
    async fn list_with_context(
        &self,
        card_id: Option<&str>,
        include_paid: bool,
    ) -> Result<Vec<FineContextRow>, LibraryError>;
}

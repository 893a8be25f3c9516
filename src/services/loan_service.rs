//! Loan Lifecycle Manager - checkout and checkin transitions
//!
//! A loan is created by checkout and closed exactly once by checkin;
//! a returned loan is never reactivated. Borrowing the same book again
//! creates a brand-new loan.

use std::sync::Arc;

use chrono::{Duration, NaiveDate};
use serde::Serialize;

use crate::domain::{
    ActiveLoanRow, BookRepository, BorrowerRepository, CirculationPolicy, Clock, LibraryError,
    LoanRepository, NewLoan,
};
use crate::services::fine_service::FineEngine;

#[derive(Debug, Clone, Serialize)]
pub struct CheckoutReceipt {
    pub loan_id: i32,
    pub isbn: String,
    pub title: String,
    pub card_id: String,
    pub borrower_name: String,
    pub date_out: NaiveDate,
    pub due_date: NaiveDate,
}

#[derive(Debug, Clone, Serialize)]
pub struct CheckinReceipt {
    pub checked_in: Vec<i32>,
    pub date_in: NaiveDate,
}

pub struct LoanService {
    borrowers: Arc<dyn BorrowerRepository>,
    books: Arc<dyn BookRepository>,
    loans: Arc<dyn LoanRepository>,
    fine_engine: Arc<FineEngine>,
    policy: CirculationPolicy,
    clock: Arc<dyn Clock>,
}

impl LoanService {
    pub fn new(
        borrowers: Arc<dyn BorrowerRepository>,
        books: Arc<dyn BookRepository>,
        loans: Arc<dyn LoanRepository>,
        fine_engine: Arc<FineEngine>,
        policy: CirculationPolicy,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            borrowers,
            books,
            loans,
            fine_engine,
            policy,
            clock,
        }
    }

    /// Check a book out to a borrower.
    ///
    /// `override_restrictions` (librarian only, enforced by the caller)
    /// lifts the unpaid-fines and loan-limit gates. It never lifts the
    /// availability check: one physical copy cannot be lent twice.
    pub async fn checkout(
        &self,
        isbn: &str,
        card_id: &str,
        override_restrictions: bool,
    ) -> Result<CheckoutReceipt, LibraryError> {
        let today = self.clock.today();

        let borrower = self
            .borrowers
            .find_by_card(card_id)
            .await?
            .ok_or_else(|| LibraryError::BorrowerNotFound(card_id.to_string()))?;

        let book = self
            .books
            .find_by_isbn(isbn)
            .await?
            .ok_or_else(|| LibraryError::BookNotFound(isbn.to_string()))?;

        if !override_restrictions {
            if self.fine_engine.has_unpaid_fines(card_id).await? {
                return Err(LibraryError::FinesOwed(card_id.to_string()));
            }

            let active = self.loans.count_active_for_borrower(card_id).await?;
            if active >= self.policy.max_active_loans {
                return Err(LibraryError::LoanLimitReached {
                    card_id: card_id.to_string(),
                    limit: self.policy.max_active_loans,
                });
            }
        }

        // Physical availability is checked unconditionally.
        if self.loans.active_loan_for_isbn(isbn).await?.is_some() {
            return Err(LibraryError::AlreadyCheckedOut(isbn.to_string()));
        }

        let due_date = today + Duration::days(self.policy.loan_period_days);
        let loan = self
            .loans
            .create(NewLoan {
                isbn: isbn.to_string(),
                card_id: card_id.to_string(),
                date_out: today,
                due_date,
            })
            .await?;

        tracing::info!(
            loan_id = loan.loan_id,
            isbn,
            card_id,
            %due_date,
            "book checked out"
        );

        Ok(CheckoutReceipt {
            loan_id: loan.loan_id,
            isbn: loan.isbn,
            title: book.title,
            card_id: loan.card_id,
            borrower_name: borrower.name,
            date_out: loan.date_out,
            due_date: loan.due_date,
        })
    }

    /// Check in up to `max_checkin_batch` loans at once.
    ///
    /// Each id is validated independently; valid loans are returned even
    /// when others in the batch fail, and the failures come back per id.
    /// An empty or oversized batch is rejected before touching anything.
    pub async fn checkin(&self, loan_ids: &[i32]) -> Result<CheckinReceipt, LibraryError> {
        if loan_ids.is_empty() {
            return Err(LibraryError::InvalidBatch("No loan IDs provided".to_string()));
        }
        if loan_ids.len() > self.policy.max_checkin_batch {
            return Err(LibraryError::InvalidBatch(format!(
                "Cannot check in more than {} books at once",
                self.policy.max_checkin_batch
            )));
        }

        let today = self.clock.today();

        let mut valid = Vec::new();
        let mut errors: Vec<(i32, String)> = Vec::new();
        for &loan_id in loan_ids {
            match self.loans.find_by_id(loan_id).await? {
                Some(loan) if loan.is_active() => valid.push(loan_id),
                _ => errors.push((
                    loan_id,
                    "not found or already checked in".to_string(),
                )),
            }
        }

        if !valid.is_empty() {
            self.loans.mark_returned(&valid, today).await?;
            tracing::info!(count = valid.len(), "books checked in");
        }

        if errors.is_empty() {
            Ok(CheckinReceipt {
                checked_in: valid,
                date_in: today,
            })
        } else {
            Err(LibraryError::BatchPartialFailure {
                succeeded: valid.len(),
                errors,
            })
        }
    }

    /// Active loans matching a search term on ISBN, card id or borrower
    /// name, soonest due first.
    pub async fn find_active_loans(
        &self,
        term: &str,
    ) -> Result<Vec<ActiveLoanRow>, LibraryError> {
        self.loans.search_active(term.trim()).await
    }
}

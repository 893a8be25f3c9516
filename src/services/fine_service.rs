//! Fine Engine - overdue fine accrual, reconciliation and settlement
//!
//! Fines are computed from a loan's due date and the earlier of its
//! return date or "today". A fine row exists only once a loan is
//! actually overdue; the amount is recomputed while unpaid and frozen
//! forever once paid.

use std::sync::Arc;

use chrono::NaiveDate;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;

use crate::domain::{
    BorrowerRepository, CirculationPolicy, Clock, FineAdjustment, FineRepository, LibraryError,
    LoanRepository,
};

/// Fine for a single loan, pure function of its inputs.
///
/// The end of the accrual window is the return date when the book came
/// back, otherwise `today`. On or before the due date the fine is zero;
/// past it, whole days times the daily rate, rounded half-up at the
/// cent.
pub fn fine_amount(
    due_date: NaiveDate,
    returned: Option<NaiveDate>,
    today: NaiveDate,
    daily_rate: Decimal,
) -> Decimal {
    let end_date = returned.unwrap_or(today);

    if end_date <= due_date {
        return Decimal::ZERO;
    }

    let days_overdue = (end_date - due_date).num_days();
    (Decimal::from(days_overdue) * daily_rate)
        .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// One fine with its loan/book context.
#[derive(Debug, Clone, Serialize)]
pub struct FineLine {
    pub loan_id: i32,
    pub isbn: String,
    pub title: String,
    pub due_date: NaiveDate,
    pub date_in: Option<NaiveDate>,
    pub amount: Decimal,
    pub paid: bool,
}

/// All fines for one borrower. `total_unpaid` covers unpaid fines only,
/// whatever the listing filter was.
#[derive(Debug, Clone, Serialize)]
pub struct BorrowerFines {
    pub card_id: String,
    pub borrower_name: String,
    pub fines: Vec<FineLine>,
    pub total_unpaid: Decimal,
}

#[derive(Debug, Clone, Serialize)]
pub struct PaymentReceipt {
    pub card_id: String,
    pub total_paid: Decimal,
    pub loan_ids: Vec<i32>,
}

#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct RefreshSummary {
    pub created: u64,
    pub updated: u64,
}

pub struct FineEngine {
    borrowers: Arc<dyn BorrowerRepository>,
    loans: Arc<dyn LoanRepository>,
    fines: Arc<dyn FineRepository>,
    policy: CirculationPolicy,
    clock: Arc<dyn Clock>,
}

impl FineEngine {
    pub fn new(
        borrowers: Arc<dyn BorrowerRepository>,
        loans: Arc<dyn LoanRepository>,
        fines: Arc<dyn FineRepository>,
        policy: CirculationPolicy,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            borrowers,
            loans,
            fines,
            policy,
            clock,
        }
    }

    /// Fine for a loan under this engine's policy rate.
    pub fn fine_for(
        &self,
        due_date: NaiveDate,
        returned: Option<NaiveDate>,
        today: NaiveDate,
    ) -> Decimal {
        fine_amount(due_date, returned, today, self.policy.daily_fine_rate)
    }

    /// Reconcile the FINES table against the current loan state.
    ///
    /// Scans every loan past due as of today, creates missing unpaid
    /// rows, updates unpaid rows whose amount drifted, and leaves paid
    /// rows untouched. Re-running with unchanged state is a no-op.
    pub async fn refresh_fines(&self) -> Result<RefreshSummary, LibraryError> {
        let today = self.clock.today();
        let overdue = self.loans.overdue_as_of(today).await?;

        let mut adjustments = Vec::new();
        let mut summary = RefreshSummary::default();

        for loan in overdue {
            let amount = self.fine_for(loan.due_date, loan.date_in, today);
            if amount.is_zero() {
                continue;
            }

            match self.fines.find_by_loan(loan.loan_id).await? {
                None => {
                    adjustments.push(FineAdjustment::Create {
                        loan_id: loan.loan_id,
                        amount,
                    });
                    summary.created += 1;
                }
                Some(existing) if !existing.paid && existing.amount != amount => {
                    adjustments.push(FineAdjustment::Update {
                        loan_id: loan.loan_id,
                        amount,
                    });
                    summary.updated += 1;
                }
                // Paid rows are final; unchanged unpaid rows need nothing.
                Some(_) => {}
            }
        }

        self.fines.apply_adjustments(&adjustments).await?;

        tracing::debug!(
            created = summary.created,
            updated = summary.updated,
            "fine refresh complete"
        );

        Ok(summary)
    }

    /// Checkout gate: does this borrower owe anything?
    pub async fn has_unpaid_fines(&self, card_id: &str) -> Result<bool, LibraryError> {
        self.fines.has_unpaid(card_id).await
    }

    /// Fines grouped per borrower, ordered by card id, paid flag, then
    /// due date. An explicit list rather than a map so the order is part
    /// of the contract.
    pub async fn list_fines(
        &self,
        include_paid: bool,
    ) -> Result<Vec<BorrowerFines>, LibraryError> {
        let rows = self.fines.list_with_context(None, include_paid).await?;

        let mut groups: Vec<BorrowerFines> = Vec::new();
        for row in rows {
            if groups.last().map(|g| g.card_id.as_str()) != Some(row.card_id.as_str()) {
                groups.push(BorrowerFines {
                    card_id: row.card_id.clone(),
                    borrower_name: row.borrower_name.clone(),
                    fines: Vec::new(),
                    total_unpaid: Decimal::ZERO,
                });
            }

            if let Some(group) = groups.last_mut() {
                if !row.paid {
                    group.total_unpaid += row.amount;
                }
                group.fines.push(FineLine {
                    loan_id: row.loan_id,
                    isbn: row.isbn,
                    title: row.title,
                    due_date: row.due_date,
                    date_in: row.date_in,
                    amount: row.amount,
                    paid: row.paid,
                });
            }
        }

        Ok(groups)
    }

    /// One borrower's fines ordered by due date, with the unpaid total.
    /// The total ignores `include_paid`: settled fines are listed on
    /// request but never owed.
    pub async fn fines_for_borrower(
        &self,
        card_id: &str,
        include_paid: bool,
    ) -> Result<BorrowerFines, LibraryError> {
        let borrower = self
            .borrowers
            .find_by_card(card_id)
            .await?
            .ok_or_else(|| LibraryError::BorrowerNotFound(card_id.to_string()))?;

        let rows = self
            .fines
            .list_with_context(Some(card_id), include_paid)
            .await?;

        let mut summary = BorrowerFines {
            card_id: borrower.card_id,
            borrower_name: borrower.name,
            fines: Vec::new(),
            total_unpaid: Decimal::ZERO,
        };
        for row in rows {
            if !row.paid {
                summary.total_unpaid += row.amount;
            }
            summary.fines.push(FineLine {
                loan_id: row.loan_id,
                isbn: row.isbn,
                title: row.title,
                due_date: row.due_date,
                date_in: row.date_in,
                amount: row.amount,
                paid: row.paid,
            });
        }

        Ok(summary)
    }

    /// Settle every unpaid fine for a borrower in one step.
    ///
    /// All-or-nothing: if any unpaid fine belongs to a loan still out,
    /// the whole payment is rejected and nothing changes. Partial
    /// settlement is not supported at the counter.
    pub async fn pay_all_fines(&self, card_id: &str) -> Result<PaymentReceipt, LibraryError> {
        self.borrowers
            .find_by_card(card_id)
            .await?
            .ok_or_else(|| LibraryError::BorrowerNotFound(card_id.to_string()))?;

        let unpaid = self.fines.unpaid_for_borrower(card_id).await?;
        if unpaid.is_empty() {
            return Err(LibraryError::NothingToDo(format!(
                "No unpaid fines found for borrower {}",
                card_id
            )));
        }

        let unreturned: Vec<i32> = unpaid
            .iter()
            .filter(|f| f.date_in.is_none())
            .map(|f| f.loan_id)
            .collect();
        if !unreturned.is_empty() {
            return Err(LibraryError::UnreturnedBooks {
                loan_ids: unreturned,
            });
        }

        let total: Decimal = unpaid.iter().map(|f| f.amount).sum();
        let loan_ids: Vec<i32> = unpaid.iter().map(|f| f.loan_id).collect();

        self.fines.settle(&loan_ids).await?;

        tracing::info!(card_id, %total, "fines settled");

        Ok(PaymentReceipt {
            card_id: card_id.to_string(),
            total_paid: total,
            loan_ids,
        })
    }
}

//! Circulation policy values
//!
//! Owned here rather than hard-coded in the services so tests (and
//! deployments) can vary them.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

#[derive(Debug, Clone, PartialEq)]
pub struct CirculationPolicy {
    /// Days from checkout to due date
    pub loan_period_days: i64,
    /// Fine accrued per whole overdue day
    pub daily_fine_rate: Decimal,
    /// Simultaneous active loans allowed per borrower
    pub max_active_loans: u64,
    /// Upper bound on a single check-in batch
    pub max_checkin_batch: usize,
}

impl Default for CirculationPolicy {
    fn default() -> Self {
        Self {
            loan_period_days: 14,
            daily_fine_rate: dec!(0.25),
            max_active_loans: 3,
            max_checkin_batch: 3,
        }
    }
}

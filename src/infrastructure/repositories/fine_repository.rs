//! SeaORM implementation of FineRepository

use std::collections::HashMap;

use async_trait::async_trait;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, JoinType, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, RelationTrait, Set, TransactionTrait,
};

use super::{amount_from_stored, amount_to_stored, parse_date};
use crate::domain::{
    Fine, FineAdjustment, FineContextRow, FineRepository, LibraryError, UnpaidFine,
};
use crate::models::book::{self, Entity as BookEntity};
use crate::models::borrower::{self, Entity as BorrowerEntity};
use crate::models::fine::{self, Entity as FineEntity};
use crate::models::loan::{self, Entity as LoanEntity};

pub struct SeaOrmFineRepository {
    db: DatabaseConnection,
}

impl SeaOrmFineRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl FineRepository for SeaOrmFineRepository {
    async fn find_by_loan(&self, loan_id: i32) -> Result<Option<Fine>, LibraryError> {
        let model = FineEntity::find_by_id(loan_id).one(&self.db).await?;

        Ok(model.map(|f| Fine {
            loan_id: f.loan_id,
            amount: amount_from_stored(f.fine_amt),
            paid: f.paid,
        }))
    }

    async fn apply_adjustments(
        &self,
        adjustments: &[FineAdjustment],
    ) -> Result<(), LibraryError> {
        if adjustments.is_empty() {
            return Ok(());
        }

        let txn = self.db.begin().await?;

        for adjustment in adjustments {
            match adjustment {
                FineAdjustment::Create { loan_id, amount } => {
                    let model = fine::ActiveModel {
                        loan_id: Set(*loan_id),
                        fine_amt: Set(amount_to_stored(*amount)),
                        paid: Set(false),
                    };
                    model.insert(&txn).await?;
                }
                FineAdjustment::Update { loan_id, amount } => {
                    // Paid rows are frozen; the filter enforces it even if
                    // the caller recomputed from stale state.
                    FineEntity::update_many()
                        .col_expr(
                            fine::Column::FineAmt,
                            Expr::value(amount_to_stored(*amount)),
                        )
                        .filter(fine::Column::LoanId.eq(*loan_id))
                        .filter(fine::Column::Paid.eq(false))
                        .exec(&txn)
                        .await?;
                }
            }
        }

        txn.commit().await?;
        Ok(())
    }

    async fn has_unpaid(&self, card_id: &str) -> Result<bool, LibraryError> {
        let count = FineEntity::find()
            .join(JoinType::InnerJoin, fine::Relation::Loan.def())
            .filter(fine::Column::Paid.eq(false))
            .filter(loan::Column::CardId.eq(card_id))
            .count(&self.db)
            .await?;

        Ok(count > 0)
    }

    async fn unpaid_for_borrower(
        &self,
        card_id: &str,
    ) -> Result<Vec<UnpaidFine>, LibraryError> {
        let fines_with_loans = FineEntity::find()
            .filter(fine::Column::Paid.eq(false))
            .filter(loan::Column::CardId.eq(card_id))
            .order_by_asc(loan::Column::DueDate)
            .find_also_related(LoanEntity)
            .all(&self.db)
            .await?;

        let mut result = Vec::with_capacity(fines_with_loans.len());
        for (fine_model, loan_model) in fines_with_loans {
            let date_in = match loan_model.as_ref().and_then(|l| l.date_in.as_ref()) {
                Some(value) => Some(parse_date(value)?),
                None => None,
            };

            result.push(UnpaidFine {
                loan_id: fine_model.loan_id,
                amount: amount_from_stored(fine_model.fine_amt),
                date_in,
            });
        }

        Ok(result)
    }

    async fn settle(&self, loan_ids: &[i32]) -> Result<u64, LibraryError> {
        if loan_ids.is_empty() {
            return Ok(0);
        }

        let txn = self.db.begin().await?;

        let result = FineEntity::update_many()
            .col_expr(fine::Column::Paid, Expr::value(true))
            .filter(fine::Column::LoanId.is_in(loan_ids.to_vec()))
            .filter(fine::Column::Paid.eq(false))
            .exec(&txn)
            .await?;

        txn.commit().await?;
        Ok(result.rows_affected)
    }

    async fn list_with_context(
        &self,
        card_id: Option<&str>,
        include_paid: bool,
    ) -> Result<Vec<FineContextRow>, LibraryError> {
        let mut query = FineEntity::find();

        if !include_paid {
            query = query.filter(fine::Column::Paid.eq(false));
        }
        if let Some(card_id) = card_id {
            query = query.filter(loan::Column::CardId.eq(card_id));
        }

        let fines_with_loans = query
            .order_by_asc(loan::Column::CardId)
            .order_by_asc(fine::Column::Paid)
            .order_by_asc(loan::Column::DueDate)
            .find_also_related(LoanEntity)
            .all(&self.db)
            .await?;

        // Second pass for borrower names and book titles, keyed lookups.
        let mut card_ids = Vec::new();
        let mut isbns = Vec::new();
        for (_, loan_model) in &fines_with_loans {
            if let Some(l) = loan_model {
                card_ids.push(l.card_id.clone());
                isbns.push(l.isbn.clone());
            }
        }

        let mut name_map: HashMap<String, String> = HashMap::new();
        if !card_ids.is_empty() {
            let borrowers = BorrowerEntity::find()
                .filter(borrower::Column::CardId.is_in(card_ids))
                .all(&self.db)
                .await?;
            for b in borrowers {
                name_map.insert(b.card_id, b.bname);
            }
        }

        let mut title_map: HashMap<String, String> = HashMap::new();
        if !isbns.is_empty() {
            let books = BookEntity::find()
                .filter(book::Column::Isbn.is_in(isbns))
                .all(&self.db)
                .await?;
            for b in books {
                title_map.insert(b.isbn, b.title);
            }
        }

        let mut rows = Vec::with_capacity(fines_with_loans.len());
        for (fine_model, loan_model) in fines_with_loans {
            let Some(loan_model) = loan_model else {
                // A fine without its loan is a broken foreign key; skip it
                // rather than fail the whole listing.
                tracing::warn!("fine {} has no loan row", fine_model.loan_id);
                continue;
            };

            let date_in = match &loan_model.date_in {
                Some(value) => Some(parse_date(value)?),
                None => None,
            };

            rows.push(FineContextRow {
                card_id: loan_model.card_id.clone(),
                borrower_name: name_map
                    .get(&loan_model.card_id)
                    .cloned()
                    .unwrap_or_else(|| "Unknown".to_string()),
                loan_id: fine_model.loan_id,
                isbn: loan_model.isbn.clone(),
                title: title_map
                    .get(&loan_model.isbn)
                    .cloned()
                    .unwrap_or_else(|| "Unknown".to_string()),
                due_date: parse_date(&loan_model.due_date)?,
                date_in,
                amount: amount_from_stored(fine_model.fine_amt),
                paid: fine_model.paid,
            });
        }

        Ok(rows)
    }
}

//! SeaORM implementation of LoanRepository

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::NaiveDate;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, Set, TransactionTrait,
};

use super::{format_date, parse_date};
use crate::domain::{ActiveLoanRow, Loan, LoanRepository, LibraryError, NewLoan};
use crate::models::book::{self, Entity as BookEntity};
use crate::models::borrower::{self, Entity as BorrowerEntity};
use crate::models::loan::{self, Entity as LoanEntity};

pub struct SeaOrmLoanRepository {
    db: DatabaseConnection,
}

impl SeaOrmLoanRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

fn to_domain(model: loan::Model) -> Result<Loan, LibraryError> {
    let date_in = match &model.date_in {
        Some(value) => Some(parse_date(value)?),
        None => None,
    };

    Ok(Loan {
        loan_id: model.loan_id,
        isbn: model.isbn,
        card_id: model.card_id,
        date_out: parse_date(&model.date_out)?,
        due_date: parse_date(&model.due_date)?,
        date_in,
    })
}

#[async_trait]
impl LoanRepository for SeaOrmLoanRepository {
    async fn find_by_id(&self, loan_id: i32) -> Result<Option<Loan>, LibraryError> {
        let model = LoanEntity::find_by_id(loan_id).one(&self.db).await?;
        model.map(to_domain).transpose()
    }

    async fn active_loan_for_isbn(&self, isbn: &str) -> Result<Option<Loan>, LibraryError> {
        let model = LoanEntity::find()
            .filter(loan::Column::Isbn.eq(isbn))
            .filter(loan::Column::DateIn.is_null())
            .one(&self.db)
            .await?;
        model.map(to_domain).transpose()
    }

    async fn active_loans_for_isbns(&self, isbns: &[String]) -> Result<Vec<Loan>, LibraryError> {
        if isbns.is_empty() {
            return Ok(Vec::new());
        }

        let models = LoanEntity::find()
            .filter(loan::Column::Isbn.is_in(isbns.to_vec()))
            .filter(loan::Column::DateIn.is_null())
            .all(&self.db)
            .await?;

        models.into_iter().map(to_domain).collect()
    }

    async fn count_active_for_borrower(&self, card_id: &str) -> Result<u64, LibraryError> {
        let count = LoanEntity::find()
            .filter(loan::Column::CardId.eq(card_id))
            .filter(loan::Column::DateIn.is_null())
            .count(&self.db)
            .await?;
        Ok(count)
    }

    async fn create(&self, new_loan: NewLoan) -> Result<Loan, LibraryError> {
        let model = loan::ActiveModel {
            isbn: Set(new_loan.isbn),
            card_id: Set(new_loan.card_id),
            date_out: Set(format_date(new_loan.date_out)),
            due_date: Set(format_date(new_loan.due_date)),
            date_in: Set(None),
            ..Default::default()
        };

        let saved = model.insert(&self.db).await?;
        to_domain(saved)
    }

    async fn mark_returned(
        &self,
        loan_ids: &[i32],
        date_in: NaiveDate,
    ) -> Result<(), LibraryError> {
        let txn = self.db.begin().await?;

        LoanEntity::update_many()
            .col_expr(loan::Column::DateIn, Expr::value(format_date(date_in)))
            .filter(loan::Column::LoanId.is_in(loan_ids.to_vec()))
            .filter(loan::Column::DateIn.is_null())
            .exec(&txn)
            .await?;

        txn.commit().await?;
        Ok(())
    }

    async fn overdue_as_of(&self, today: NaiveDate) -> Result<Vec<Loan>, LibraryError> {
        // ISO dates compare correctly as text.
        let models = LoanEntity::find()
            .filter(loan::Column::DueDate.lt(format_date(today)))
            .all(&self.db)
            .await?;

        models.into_iter().map(to_domain).collect()
    }

    async fn search_active(&self, term: &str) -> Result<Vec<ActiveLoanRow>, LibraryError> {
        let loans_with_borrowers = LoanEntity::find()
            .filter(loan::Column::DateIn.is_null())
            .filter(
                Condition::any()
                    .add(loan::Column::Isbn.contains(term))
                    .add(loan::Column::CardId.contains(term))
                    .add(borrower::Column::Bname.contains(term)),
            )
            .order_by_asc(loan::Column::DueDate)
            .find_also_related(BorrowerEntity)
            .all(&self.db)
            .await?;

        // Resolve titles in one pass rather than per row.
        let isbns: Vec<String> = loans_with_borrowers
            .iter()
            .map(|(l, _)| l.isbn.clone())
            .collect();

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

        let mut rows = Vec::with_capacity(loans_with_borrowers.len());
        for (loan_model, borrower_model) in loans_with_borrowers {
            let borrower_name = borrower_model
                .map(|b| b.bname)
                .unwrap_or_else(|| "Unknown".to_string());
            let title = title_map
                .get(&loan_model.isbn)
                .cloned()
                .unwrap_or_else(|| "Unknown".to_string());

            rows.push(ActiveLoanRow {
                loan_id: loan_model.loan_id,
                isbn: loan_model.isbn.clone(),
                title,
                card_id: loan_model.card_id.clone(),
                borrower_name,
                date_out: parse_date(&loan_model.date_out)?,
                due_date: parse_date(&loan_model.due_date)?,
            });
        }

        Ok(rows)
    }
}

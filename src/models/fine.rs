use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// One row per overdue loan. The legacy writer stored amounts through
/// SQLite's NUMERIC affinity, so the column holds a REAL; conversion to
/// `Decimal` happens at the repository boundary.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "FINES")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false, column_name = "Loan_id")]
    pub loan_id: i32,
    #[sea_orm(column_name = "Fine_amt")]
    pub fine_amt: f64,
    #[sea_orm(column_name = "Paid")]
    pub paid: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::loan::Entity",
        from = "Column::LoanId",
        to = "super::loan::Column::LoanId",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Loan,
}

impl Related<super::loan::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Loan.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

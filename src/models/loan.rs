use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "BOOK_LOANS")]
pub struct Model {
    #[sea_orm(primary_key, column_name = "Loan_id")]
    pub loan_id: i32,
    #[sea_orm(column_name = "Isbn")]
    pub isbn: String,
    #[sea_orm(column_name = "Card_id")]
    pub card_id: String,
    #[sea_orm(column_name = "Date_out")]
    pub date_out: String,
    #[sea_orm(column_name = "Due_date")]
    pub due_date: String,
    #[sea_orm(column_name = "Date_in")]
    pub date_in: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::book::Entity",
        from = "Column::Isbn",
        to = "super::book::Column::Isbn",
        on_update = "NoAction",
        on_delete = "NoAction"
    )]
    Book,
    #[sea_orm(
        belongs_to = "super::borrower::Entity",
        from = "Column::CardId",
        to = "super::borrower::Column::CardId",
        on_update = "NoAction",
        on_delete = "NoAction"
    )]
    Borrower,
    #[sea_orm(has_one = "super::fine::Entity")]
    Fine,
}

impl Related<super::book::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Book.def()
    }
}

impl Related<super::borrower::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Borrower.def()
    }
}

impl Related<super::fine::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Fine.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

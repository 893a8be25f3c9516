use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "BORROWER")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false, column_name = "Card_id")]
    pub card_id: String,
    #[sea_orm(column_name = "Bname")]
    pub bname: String,
    #[sea_orm(column_name = "Address")]
    pub address: String,
    #[sea_orm(column_name = "Phone")]
    pub phone: String,
    #[sea_orm(unique, column_name = "Ssn")]
    pub ssn: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::loan::Entity")]
    Loan,
}

impl Related<super::loan::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Loan.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

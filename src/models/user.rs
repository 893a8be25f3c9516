use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Staff account. The `password` column keeps its legacy name but holds
/// an argon2 hash, never a plaintext password.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "USERS")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub username: String,
    #[sea_orm(column_name = "password")]
    pub password_hash: String,
    pub role: String, // 'librarian' or 'assistant'
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

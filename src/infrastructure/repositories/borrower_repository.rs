//! SeaORM implementation of BorrowerRepository

use async_trait::async_trait;
use sea_orm::{DatabaseConnection, EntityTrait};

use crate::domain::{Borrower, BorrowerRepository, LibraryError};
use crate::models::borrower::Entity as BorrowerEntity;

pub struct SeaOrmBorrowerRepository {
    db: DatabaseConnection,
}

impl SeaOrmBorrowerRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl BorrowerRepository for SeaOrmBorrowerRepository {
    async fn find_by_card(&self, card_id: &str) -> Result<Option<Borrower>, LibraryError> {
        let borrower = BorrowerEntity::find_by_id(card_id.to_owned())
            .one(&self.db)
            .await?;

        Ok(borrower.map(|b| Borrower {
            card_id: b.card_id,
            name: b.bname,
            address: b.address,
            phone: b.phone,
            ssn: b.ssn,
        }))
    }
}

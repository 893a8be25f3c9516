//! Application state containing services and shared resources

use sea_orm::DatabaseConnection;
use std::sync::Arc;

use crate::domain::{CirculationPolicy, Clock};
use crate::infrastructure::{
    SeaOrmBookRepository, SeaOrmBorrowerRepository, SeaOrmFineRepository, SeaOrmLoanRepository,
};
use crate::services::{CatalogService, FineEngine, LoanService};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    db: DatabaseConnection,
    pub fine_engine: Arc<FineEngine>,
    pub loan_service: Arc<LoanService>,
    pub catalog: Arc<CatalogService>,
}

impl AppState {
    /// Wire the repositories into the services.
    pub fn new(db: DatabaseConnection, policy: CirculationPolicy, clock: Arc<dyn Clock>) -> Self {
        let borrower_repo = Arc::new(SeaOrmBorrowerRepository::new(db.clone()));
        let book_repo = Arc::new(SeaOrmBookRepository::new(db.clone()));
        let loan_repo = Arc::new(SeaOrmLoanRepository::new(db.clone()));
        let fine_repo = Arc::new(SeaOrmFineRepository::new(db.clone()));

        let fine_engine = Arc::new(FineEngine::new(
            borrower_repo.clone(),
            loan_repo.clone(),
            fine_repo,
            policy.clone(),
            clock.clone(),
        ));

        let loan_service = Arc::new(LoanService::new(
            borrower_repo,
            book_repo.clone(),
            loan_repo.clone(),
            fine_engine.clone(),
            policy,
            clock,
        ));

        let catalog = Arc::new(CatalogService::new(book_repo, loan_repo));

        Self {
            db,
            fine_engine,
            loan_service,
            catalog,
        }
    }

    pub fn db(&self) -> &DatabaseConnection {
        &self.db
    }
}

// Allow extracting DatabaseConnection from AppState in handlers that
// only need the connection.
impl axum::extract::FromRef<AppState> for DatabaseConnection {
    fn from_ref(state: &AppState) -> Self {
        state.db.clone()
    }
}

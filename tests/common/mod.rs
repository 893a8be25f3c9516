//! Shared helpers for the integration tests

#![allow(dead_code)]

use std::sync::Arc;

use chrono::NaiveDate;
use librarium::db;
use librarium::domain::clock::FixedClock;
use librarium::domain::CirculationPolicy;
use librarium::infrastructure::AppState;
use librarium::models::{book, book_authors, borrower, fine, loan};
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, Set};

pub async fn setup_test_db() -> DatabaseConnection {
    // In-memory SQLite for testing
    db::init_db("sqlite::memory:")
        .await
        .expect("Failed to init DB")
}

/// Application state with the calendar pinned to `today`.
pub fn state_at(db: &DatabaseConnection, today: NaiveDate) -> AppState {
    AppState::new(
        db.clone(),
        CirculationPolicy::default(),
        Arc::new(FixedClock(today)),
    )
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn fmt(d: NaiveDate) -> String {
    d.format("%Y-%m-%d").to_string()
}

pub async fn insert_book(db: &DatabaseConnection, isbn: &str, title: &str) {
    let model = book::ActiveModel {
        isbn: Set(isbn.to_string()),
        title: Set(title.to_string()),
    };
    model.insert(db).await.expect("Failed to create book");
}

pub async fn insert_author(db: &DatabaseConnection, author_id: i32, name: &str) {
    let model = librarium::models::author::ActiveModel {
        author_id: Set(author_id),
        name: Set(name.to_string()),
    };
    model.insert(db).await.expect("Failed to create author");
}

pub async fn link_book_author(db: &DatabaseConnection, isbn: &str, author_id: i32) {
    let model = book_authors::ActiveModel {
        isbn: Set(isbn.to_string()),
        author_id: Set(author_id),
    };
    model.insert(db).await.expect("Failed to link author");
}

pub async fn insert_borrower(db: &DatabaseConnection, card_id: &str, name: &str) {
    let model = borrower::ActiveModel {
        card_id: Set(card_id.to_string()),
        bname: Set(name.to_string()),
        address: Set("12 Main St".to_string()),
        phone: Set("555-0100".to_string()),
        // Unique per card id to satisfy the SSN constraint
        ssn: Set(format!("ssn-{}", card_id)),
    };
    model.insert(db).await.expect("Failed to create borrower");
}

pub async fn insert_loan(
    db: &DatabaseConnection,
    isbn: &str,
    card_id: &str,
    date_out: NaiveDate,
    due_date: NaiveDate,
    date_in: Option<NaiveDate>,
) -> i32 {
    let model = loan::ActiveModel {
        isbn: Set(isbn.to_string()),
        card_id: Set(card_id.to_string()),
        date_out: Set(fmt(date_out)),
        due_date: Set(fmt(due_date)),
        date_in: Set(date_in.map(fmt)),
        ..Default::default()
    };
    let saved = model.insert(db).await.expect("Failed to create loan");
    saved.loan_id
}

pub async fn insert_fine(db: &DatabaseConnection, loan_id: i32, amount: f64, paid: bool) {
    let model = fine::ActiveModel {
        loan_id: Set(loan_id),
        fine_amt: Set(amount),
        paid: Set(paid),
    };
    model.insert(db).await.expect("Failed to create fine");
}

pub async fn fine_row(db: &DatabaseConnection, loan_id: i32) -> Option<fine::Model> {
    fine::Entity::find_by_id(loan_id)
        .one(db)
        .await
        .expect("Failed to query fine")
}

pub async fn all_fine_rows(db: &DatabaseConnection) -> Vec<fine::Model> {
    fine::Entity::find()
        .all(db)
        .await
        .expect("Failed to query fines")
}

pub async fn loan_row(db: &DatabaseConnection, loan_id: i32) -> Option<loan::Model> {
    loan::Entity::find_by_id(loan_id)
        .one(db)
        .await
        .expect("Failed to query loan")
}

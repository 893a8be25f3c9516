mod common;

use common::*;
use librarium::services::catalog_service::Availability;

async fn seed_catalog(db: &sea_orm::DatabaseConnection) {
    insert_book(db, "9780195153445", "Classical Mythology").await;
    insert_book(db, "9780002005883", "Gilead").await;
    insert_book(db, "9780006178736", "Rage of Angels").await;

    insert_author(db, 1, "Mark P. O. Morford").await;
    insert_author(db, 2, "Robert J. Lenardon").await;
    insert_author(db, 3, "Marilynne Robinson").await;
    link_book_author(db, "9780195153445", 1).await;
    link_book_author(db, "9780195153445", 2).await;
    link_book_author(db, "9780002005883", 3).await;

    insert_borrower(db, "ID000001", "Alice Smith").await;
}

#[tokio::test]
async fn searches_by_title_case_insensitively() {
    let db = setup_test_db().await;
    seed_catalog(&db).await;

    let state = state_at(&db, date(2024, 3, 1));
    let rows = state.catalog.search_books("gilead").await.unwrap();

    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].isbn, "9780002005883");
    assert_eq!(rows[0].authors, "Marilynne Robinson");
    assert_eq!(rows[0].status, Availability::In);
    assert_eq!(rows[0].borrower_card, None);
}

#[tokio::test]
async fn searches_by_author_name_and_joins_all_authors() {
    let db = setup_test_db().await;
    seed_catalog(&db).await;

    let state = state_at(&db, date(2024, 3, 1));
    let rows = state.catalog.search_books("morford").await.unwrap();

    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].title, "Classical Mythology");
    assert_eq!(rows[0].authors, "Mark P. O. Morford, Robert J. Lenardon");
}

#[tokio::test]
async fn searches_by_isbn_substring() {
    let db = setup_test_db().await;
    seed_catalog(&db).await;

    let state = state_at(&db, date(2024, 3, 1));
    let rows = state.catalog.search_books("617873").await.unwrap();

    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].title, "Rage of Angels");
    // No author rows for this book.
    assert_eq!(rows[0].authors, "Unknown");
}

#[tokio::test]
async fn reports_checked_out_books_with_their_holder() {
    let db = setup_test_db().await;
    seed_catalog(&db).await;
    insert_loan(
        &db,
        "9780002005883",
        "ID000001",
        date(2024, 3, 1),
        date(2024, 3, 15),
        None,
    )
    .await;

    let state = state_at(&db, date(2024, 3, 5));
    let rows = state.catalog.search_books("gilead").await.unwrap();

    assert_eq!(rows[0].status, Availability::Out);
    assert_eq!(rows[0].borrower_card, Some("ID000001".to_string()));
}

#[tokio::test]
async fn a_returned_book_shows_as_in_again() {
    let db = setup_test_db().await;
    seed_catalog(&db).await;
    insert_loan(
        &db,
        "9780002005883",
        "ID000001",
        date(2024, 2, 1),
        date(2024, 2, 15),
        Some(date(2024, 2, 10)),
    )
    .await;

    let state = state_at(&db, date(2024, 3, 5));
    let rows = state.catalog.search_books("gilead").await.unwrap();

    assert_eq!(rows[0].status, Availability::In);
    assert_eq!(rows[0].borrower_card, None);
}

#[tokio::test]
async fn blank_terms_match_nothing() {
    let db = setup_test_db().await;
    seed_catalog(&db).await;

    let state = state_at(&db, date(2024, 3, 1));
    assert!(state.catalog.search_books("").await.unwrap().is_empty());
    assert!(state.catalog.search_books("   ").await.unwrap().is_empty());
}

#[tokio::test]
async fn results_come_back_in_isbn_order() {
    let db = setup_test_db().await;
    seed_catalog(&db).await;

    let state = state_at(&db, date(2024, 3, 1));
    // "9780" hits all three books.
    let rows = state.catalog.search_books("9780").await.unwrap();

    assert_eq!(rows.len(), 3);
    let isbns: Vec<&str> = rows.iter().map(|r| r.isbn.as_str()).collect();
    assert_eq!(
        isbns,
        vec!["9780002005883", "9780006178736", "9780195153445"]
    );
}

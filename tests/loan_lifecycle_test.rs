mod common;

use common::*;
use librarium::domain::LibraryError;

#[tokio::test]
async fn checkout_requires_known_borrower_and_book() {
    let db = setup_test_db().await;
    insert_borrower(&db, "ID000001", "Alice Smith").await;
    insert_book(&db, "9780195153445", "Classical Mythology").await;

    let state = state_at(&db, date(2024, 3, 1));

    let err = state
        .loan_service
        .checkout("9780195153445", "ID999999", false)
        .await
        .unwrap_err();
    assert_eq!(err, LibraryError::BorrowerNotFound("ID999999".to_string()));

    let err = state
        .loan_service
        .checkout("0000000000000", "ID000001", false)
        .await
        .unwrap_err();
    assert_eq!(err, LibraryError::BookNotFound("0000000000000".to_string()));
}

#[tokio::test]
async fn checkout_opens_a_fourteen_day_loan() {
    let db = setup_test_db().await;
    insert_borrower(&db, "ID000001", "Alice Smith").await;
    insert_book(&db, "9780195153445", "Classical Mythology").await;

    let state = state_at(&db, date(2024, 3, 1));
    let receipt = state
        .loan_service
        .checkout("9780195153445", "ID000001", false)
        .await
        .unwrap();

    assert_eq!(receipt.date_out, date(2024, 3, 1));
    assert_eq!(receipt.due_date, date(2024, 3, 15));
    assert_eq!(receipt.title, "Classical Mythology");

    let row = loan_row(&db, receipt.loan_id).await.unwrap();
    assert_eq!(row.date_in, None);
    assert_eq!(row.due_date, "2024-03-15");
}

#[tokio::test]
async fn checkout_blocked_by_unpaid_fines_unless_overridden() {
    let db = setup_test_db().await;
    insert_borrower(&db, "ID000001", "Alice Smith").await;
    insert_book(&db, "9780195153445", "Classical Mythology").await;
    insert_book(&db, "9780002005883", "Gilead").await;

    // A late return leaves an unpaid fine on the account.
    insert_loan(
        &db,
        "9780195153445",
        "ID000001",
        date(2024, 1, 1),
        date(2024, 1, 15),
        Some(date(2024, 1, 20)),
    )
    .await;
    let state = state_at(&db, date(2024, 3, 1));
    state.fine_engine.refresh_fines().await.unwrap();

    let err = state
        .loan_service
        .checkout("9780002005883", "ID000001", false)
        .await
        .unwrap_err();
    assert_eq!(err, LibraryError::FinesOwed("ID000001".to_string()));

    // A librarian override lets the checkout through.
    let receipt = state
        .loan_service
        .checkout("9780002005883", "ID000001", true)
        .await
        .unwrap();
    assert_eq!(receipt.isbn, "9780002005883");
}

#[tokio::test]
async fn checkout_blocked_at_three_active_loans_unless_overridden() {
    let db = setup_test_db().await;
    insert_borrower(&db, "ID000001", "Alice Smith").await;
    for (isbn, title) in [
        ("9780195153445", "Classical Mythology"),
        ("9780002005883", "Gilead"),
        ("9780006178736", "Rage of Angels"),
        ("9780374157067", "Prague"),
    ] {
        insert_book(&db, isbn, title).await;
    }

    let state = state_at(&db, date(2024, 3, 1));
    for isbn in ["9780195153445", "9780002005883", "9780006178736"] {
        state
            .loan_service
            .checkout(isbn, "ID000001", false)
            .await
            .unwrap();
    }

    let err = state
        .loan_service
        .checkout("9780374157067", "ID000001", false)
        .await
        .unwrap_err();
    assert_eq!(
        err,
        LibraryError::LoanLimitReached {
            card_id: "ID000001".to_string(),
            limit: 3
        }
    );

    let receipt = state
        .loan_service
        .checkout("9780374157067", "ID000001", true)
        .await
        .unwrap();
    assert_eq!(receipt.isbn, "9780374157067");
}

#[tokio::test]
async fn availability_check_ignores_the_override() {
    let db = setup_test_db().await;
    insert_borrower(&db, "ID000001", "Alice Smith").await;
    insert_borrower(&db, "ID000002", "Bob Jones").await;
    insert_book(&db, "9780195153445", "Classical Mythology").await;

    let state = state_at(&db, date(2024, 3, 1));
    state
        .loan_service
        .checkout("9780195153445", "ID000001", false)
        .await
        .unwrap();

    // The single copy is out; no flag gets a second borrower past that.
    for with_override in [false, true] {
        let err = state
            .loan_service
            .checkout("9780195153445", "ID000002", with_override)
            .await
            .unwrap_err();
        assert_eq!(
            err,
            LibraryError::AlreadyCheckedOut("9780195153445".to_string())
        );
    }
}

#[tokio::test]
async fn returned_loans_stay_returned_and_reborrowing_opens_a_new_loan() {
    let db = setup_test_db().await;
    insert_borrower(&db, "ID000001", "Alice Smith").await;
    insert_book(&db, "9780195153445", "Classical Mythology").await;

    let state = state_at(&db, date(2024, 3, 1));
    let first = state
        .loan_service
        .checkout("9780195153445", "ID000001", false)
        .await
        .unwrap();

    state.loan_service.checkin(&[first.loan_id]).await.unwrap();
    let returned = loan_row(&db, first.loan_id).await.unwrap();
    assert_eq!(returned.date_in, Some("2024-03-01".to_string()));

    let second = state
        .loan_service
        .checkout("9780195153445", "ID000001", false)
        .await
        .unwrap();
    assert_ne!(second.loan_id, first.loan_id);

    // The original loan is untouched by the new checkout.
    let still_returned = loan_row(&db, first.loan_id).await.unwrap();
    assert_eq!(still_returned.date_in, Some("2024-03-01".to_string()));
}

#[tokio::test]
async fn checkin_rejects_empty_and_oversized_batches() {
    let db = setup_test_db().await;
    insert_borrower(&db, "ID000001", "Alice Smith").await;
    insert_book(&db, "9780195153445", "Classical Mythology").await;
    let loan_id = insert_loan(
        &db,
        "9780195153445",
        "ID000001",
        date(2024, 3, 1),
        date(2024, 3, 15),
        None,
    )
    .await;

    let state = state_at(&db, date(2024, 3, 10));

    let err = state.loan_service.checkin(&[]).await.unwrap_err();
    assert!(matches!(err, LibraryError::InvalidBatch(_)));

    let err = state
        .loan_service
        .checkin(&[loan_id, 101, 102, 103])
        .await
        .unwrap_err();
    assert!(matches!(err, LibraryError::InvalidBatch(_)));

    // The oversized batch never touched the valid loan.
    assert_eq!(loan_row(&db, loan_id).await.unwrap().date_in, None);
}

#[tokio::test]
async fn checkin_reports_partial_failures_but_keeps_successes() {
    let db = setup_test_db().await;
    insert_borrower(&db, "ID000001", "Alice Smith").await;
    insert_book(&db, "9780195153445", "Classical Mythology").await;
    let loan_id = insert_loan(
        &db,
        "9780195153445",
        "ID000001",
        date(2024, 3, 1),
        date(2024, 3, 15),
        None,
    )
    .await;

    let state = state_at(&db, date(2024, 3, 10));
    let err = state
        .loan_service
        .checkin(&[loan_id, 99999])
        .await
        .unwrap_err();

    match err {
        LibraryError::BatchPartialFailure { succeeded, errors } => {
            assert_eq!(succeeded, 1);
            assert_eq!(errors.len(), 1);
            assert_eq!(errors[0].0, 99999);
        }
        other => panic!("expected BatchPartialFailure, got {:?}", other),
    }

    // The valid id was still checked in.
    let row = loan_row(&db, loan_id).await.unwrap();
    assert_eq!(row.date_in, Some("2024-03-10".to_string()));
}

#[tokio::test]
async fn checkin_rejects_an_already_returned_loan() {
    let db = setup_test_db().await;
    insert_borrower(&db, "ID000001", "Alice Smith").await;
    insert_book(&db, "9780195153445", "Classical Mythology").await;
    let loan_id = insert_loan(
        &db,
        "9780195153445",
        "ID000001",
        date(2024, 3, 1),
        date(2024, 3, 15),
        Some(date(2024, 3, 5)),
    )
    .await;

    let state = state_at(&db, date(2024, 3, 10));
    let err = state.loan_service.checkin(&[loan_id]).await.unwrap_err();

    match err {
        LibraryError::BatchPartialFailure { succeeded, errors } => {
            assert_eq!(succeeded, 0);
            assert_eq!(errors.len(), 1);
        }
        other => panic!("expected BatchPartialFailure, got {:?}", other),
    }

    // The recorded return date did not move.
    let row = loan_row(&db, loan_id).await.unwrap();
    assert_eq!(row.date_in, Some("2024-03-05".to_string()));
}

#[tokio::test]
async fn active_loan_search_matches_isbn_card_and_name() {
    let db = setup_test_db().await;
    insert_borrower(&db, "ID000001", "Alice Smith").await;
    insert_borrower(&db, "ID000002", "Bob Jones").await;
    insert_book(&db, "9780195153445", "Classical Mythology").await;
    insert_book(&db, "9780002005883", "Gilead").await;
    insert_book(&db, "9780006178736", "Rage of Angels").await;

    // Two active loans due on different days, one returned loan.
    insert_loan(
        &db,
        "9780195153445",
        "ID000001",
        date(2024, 3, 1),
        date(2024, 3, 15),
        None,
    )
    .await;
    insert_loan(
        &db,
        "9780002005883",
        "ID000001",
        date(2024, 2, 25),
        date(2024, 3, 10),
        None,
    )
    .await;
    insert_loan(
        &db,
        "9780006178736",
        "ID000001",
        date(2024, 1, 1),
        date(2024, 1, 15),
        Some(date(2024, 1, 10)),
    )
    .await;

    let state = state_at(&db, date(2024, 3, 5));

    // Case-insensitive name match, soonest due date first, active only.
    let rows = state.loan_service.find_active_loans("smith").await.unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].due_date, date(2024, 3, 10));
    assert_eq!(rows[1].due_date, date(2024, 3, 15));
    assert_eq!(rows[0].borrower_name, "Alice Smith");

    // Card id and ISBN substrings work too.
    let rows = state
        .loan_service
        .find_active_loans("ID000001")
        .await
        .unwrap();
    assert_eq!(rows.len(), 2);

    let rows = state.loan_service.find_active_loans("5153445").await.unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].title, "Classical Mythology");

    // Nobody named Jones has anything out.
    let rows = state.loan_service.find_active_loans("jones").await.unwrap();
    assert!(rows.is_empty());
}

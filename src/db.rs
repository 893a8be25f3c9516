use sea_orm::{ConnectionTrait, Database, DatabaseConnection, DbErr, Statement};

pub async fn init_db(database_url: &str) -> Result<DatabaseConnection, DbErr> {
    let db = Database::connect(database_url).await?;

    // Run migrations manually (simple SQL)
    run_migrations(&db).await?;

    Ok(db)
}

/// Schema kept byte-compatible with the legacy library database so an
/// existing file keeps working. SQLite identifier matching is
/// case-insensitive, which is what lets the entities use snake_case
/// column names against these tables.
async fn run_migrations(db: &DatabaseConnection) -> Result<(), DbErr> {
    db.execute(Statement::from_string(
        db.get_database_backend(),
        "PRAGMA foreign_keys = ON".to_owned(),
    ))
    .await?;

    db.execute(Statement::from_string(
        db.get_database_backend(),
        r#"
        CREATE TABLE IF NOT EXISTS BOOK (
            Isbn TEXT PRIMARY KEY,
            Title TEXT NOT NULL
        )
        "#
        .to_owned(),
    ))
    .await?;

    db.execute(Statement::from_string(
        db.get_database_backend(),
        r#"
        CREATE TABLE IF NOT EXISTS AUTHORS (
            Author_id INTEGER PRIMARY KEY,
            Name TEXT NOT NULL
        )
        "#
        .to_owned(),
    ))
    .await?;

    db.execute(Statement::from_string(
        db.get_database_backend(),
        r#"
        CREATE TABLE IF NOT EXISTS BOOK_AUTHORS (
            Isbn TEXT NOT NULL,
            Author_id INTEGER NOT NULL,
            PRIMARY KEY (Isbn, Author_id),
            FOREIGN KEY (Isbn) REFERENCES BOOK(Isbn),
            FOREIGN KEY (Author_id) REFERENCES AUTHORS(Author_id)
        )
        "#
        .to_owned(),
    ))
    .await?;

    db.execute(Statement::from_string(
        db.get_database_backend(),
        r#"
        CREATE TABLE IF NOT EXISTS BORROWER (
            Card_id TEXT PRIMARY KEY,
            Bname TEXT NOT NULL,
            Address TEXT NOT NULL,
            Phone TEXT NOT NULL,
            Ssn TEXT NOT NULL UNIQUE
        )
        "#
        .to_owned(),
    ))
    .await?;

    db.execute(Statement::from_string(
        db.get_database_backend(),
        r#"
        CREATE TABLE IF NOT EXISTS BOOK_LOANS (
            Loan_id INTEGER PRIMARY KEY AUTOINCREMENT,
            Isbn TEXT NOT NULL,
            Card_id TEXT NOT NULL,
            Date_out DATE NOT NULL,
            Due_date DATE NOT NULL,
            Date_in DATE,
            FOREIGN KEY (Isbn) REFERENCES BOOK(Isbn),
            FOREIGN KEY (Card_id) REFERENCES BORROWER(Card_id)
        );
        CREATE INDEX IF NOT EXISTS idx_book_loans_isbn ON BOOK_LOANS(Isbn);
        CREATE INDEX IF NOT EXISTS idx_book_loans_card_id ON BOOK_LOANS(Card_id);
        CREATE INDEX IF NOT EXISTS idx_book_loans_due_date ON BOOK_LOANS(Due_date);
        "#
        .to_owned(),
    ))
    .await?;

    db.execute(Statement::from_string(
        db.get_database_backend(),
        r#"
        CREATE TABLE IF NOT EXISTS FINES (
            Loan_id INTEGER PRIMARY KEY,
            Fine_amt DECIMAL(10,2) NOT NULL,
            Paid INTEGER NOT NULL CHECK (Paid IN (0,1)),
            FOREIGN KEY (Loan_id) REFERENCES BOOK_LOANS(Loan_id)
        )
        "#
        .to_owned(),
    ))
    .await?;

    // The password column keeps its legacy name but stores argon2
    // hashes; see seed::ensure_default_users.
    db.execute(Statement::from_string(
        db.get_database_backend(),
        r#"
        CREATE TABLE IF NOT EXISTS USERS (
            username TEXT PRIMARY KEY,
            password TEXT NOT NULL,
            role TEXT NOT NULL
        )
        "#
        .to_owned(),
    ))
    .await?;

    Ok(())
}

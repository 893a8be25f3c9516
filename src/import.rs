//! Bulk catalog import from the legacy delimited files
//!
//! Loads book.csv, authors.csv, book_authors.csv and borrower.csv into
//! the store at startup. Rows that already exist are left alone, so the
//! import can be re-run against a populated database.

use std::path::Path;

use sea_orm::sea_query::OnConflict;
use sea_orm::*;
use serde::Deserialize;

use crate::models::{author, book, book_authors, borrower};

#[derive(Debug, Deserialize)]
struct BookRow {
    #[serde(rename = "ISBN13")]
    isbn: String,
    #[serde(rename = "Title")]
    title: String,
}

#[derive(Debug, Deserialize)]
struct AuthorRow {
    #[serde(rename = "Author_id")]
    author_id: i32,
    #[serde(rename = "Author")]
    name: String,
}

#[derive(Debug, Deserialize)]
struct BookAuthorRow {
    #[serde(rename = "ISBN13")]
    isbn: String,
    #[serde(rename = "Author_id")]
    author_id: i32,
}

#[derive(Debug, Deserialize)]
struct BorrowerRow {
    #[serde(rename = "Card_id")]
    card_id: String,
    #[serde(rename = "Bname")]
    name: String,
    #[serde(rename = "Address")]
    address: String,
    #[serde(rename = "Phone")]
    phone: String,
    #[serde(rename = "Ssn")]
    ssn: String,
}

fn parse_csv<T: for<'de> Deserialize<'de>>(content: &[u8]) -> Result<Vec<T>, String> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(content);

    let mut rows = Vec::new();
    for result in rdr.deserialize() {
        let record: T = result.map_err(|e| format!("CSV parse error: {}", e))?;
        rows.push(record);
    }

    Ok(rows)
}

/// Import whichever of the four legacy files are present in `dir`.
pub async fn import_catalog(db: &DatabaseConnection, dir: &Path) -> Result<(), String> {
    if let Ok(content) = std::fs::read(dir.join("book.csv")) {
        let rows: Vec<BookRow> = parse_csv(&content)?;
        let count = rows.len();
        for row in rows {
            let model = book::ActiveModel {
                isbn: Set(row.isbn),
                title: Set(row.title),
            };
            book::Entity::insert(model)
                .on_conflict(
                    OnConflict::column(book::Column::Isbn)
                        .do_nothing()
                        .to_owned(),
                )
                .exec_without_returning(db)
                .await
                .map_err(|e| e.to_string())?;
        }
        tracing::info!(count, "imported books");
    }

    if let Ok(content) = std::fs::read(dir.join("authors.csv")) {
        let rows: Vec<AuthorRow> = parse_csv(&content)?;
        let count = rows.len();
        for row in rows {
            let model = author::ActiveModel {
                author_id: Set(row.author_id),
                name: Set(row.name),
            };
            author::Entity::insert(model)
                .on_conflict(
                    OnConflict::column(author::Column::AuthorId)
                        .do_nothing()
                        .to_owned(),
                )
                .exec_without_returning(db)
                .await
                .map_err(|e| e.to_string())?;
        }
        tracing::info!(count, "imported authors");
    }

    if let Ok(content) = std::fs::read(dir.join("book_authors.csv")) {
        let rows: Vec<BookAuthorRow> = parse_csv(&content)?;
        let count = rows.len();
        for row in rows {
            let model = book_authors::ActiveModel {
                isbn: Set(row.isbn),
                author_id: Set(row.author_id),
            };
            book_authors::Entity::insert(model)
                .on_conflict(
                    OnConflict::columns([
                        book_authors::Column::Isbn,
                        book_authors::Column::AuthorId,
                    ])
                    .do_nothing()
                    .to_owned(),
                )
                .exec_without_returning(db)
                .await
                .map_err(|e| e.to_string())?;
        }
        tracing::info!(count, "imported book-author links");
    }

    if let Ok(content) = std::fs::read(dir.join("borrower.csv")) {
        let rows: Vec<BorrowerRow> = parse_csv(&content)?;
        let count = rows.len();
        for row in rows {
            let model = borrower::ActiveModel {
                card_id: Set(row.card_id),
                bname: Set(row.name),
                address: Set(row.address),
                phone: Set(row.phone),
                ssn: Set(row.ssn),
            };
            borrower::Entity::insert(model)
                .on_conflict(
                    OnConflict::column(borrower::Column::CardId)
                        .do_nothing()
                        .to_owned(),
                )
                .exec_without_returning(db)
                .await
                .map_err(|e| e.to_string())?;
        }
        tracing::info!(count, "imported borrowers");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_book_rows() {
        let csv = b"ISBN13,Title\n9780195153445,Classical Mythology\n";
        let rows: Vec<BookRow> = parse_csv(csv).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].isbn, "9780195153445");
        assert_eq!(rows[0].title, "Classical Mythology");
    }

    #[test]
    fn parses_borrower_rows() {
        let csv = b"Card_id,Bname,Address,Phone,Ssn\n\
                    ID000001,Jane Doe,12 Main St,555-0100,123-45-6789\n";
        let rows: Vec<BorrowerRow> = parse_csv(csv).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].card_id, "ID000001");
        assert_eq!(rows[0].ssn, "123-45-6789");
    }

    #[test]
    fn rejects_malformed_rows() {
        let csv = b"Author_id,Author\nnot_a_number,Asimov\n";
        let result: Result<Vec<AuthorRow>, String> = parse_csv(csv);
        assert!(result.is_err());
    }
}

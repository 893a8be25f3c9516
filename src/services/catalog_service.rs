//! Catalog search - read-only book lookup with availability

use std::collections::HashMap;
use std::sync::Arc;

use serde::Serialize;

use crate::domain::{BookRepository, LibraryError, LoanRepository};

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum Availability {
    #[serde(rename = "IN")]
    In,
    #[serde(rename = "OUT")]
    Out,
}

/// One catalog search hit: a book, its authors and where it is.
#[derive(Debug, Clone, Serialize)]
pub struct BookSearchRow {
    pub isbn: String,
    pub title: String,
    /// Comma-separated author names, "Unknown" when none are recorded.
    pub authors: String,
    pub status: Availability,
    /// Card id of the holder when the book is out.
    pub borrower_card: Option<String>,
}

pub struct CatalogService {
    books: Arc<dyn BookRepository>,
    loans: Arc<dyn LoanRepository>,
}

impl CatalogService {
    pub fn new(books: Arc<dyn BookRepository>, loans: Arc<dyn LoanRepository>) -> Self {
        Self { books, loans }
    }

    /// Case-insensitive substring search over ISBN, title and author
    /// names. A blank term matches nothing rather than everything.
    pub async fn search_books(&self, term: &str) -> Result<Vec<BookSearchRow>, LibraryError> {
        let term = term.trim();
        if term.is_empty() {
            return Ok(Vec::new());
        }

        let matches = self.books.search_with_authors(term).await?;

        let isbns: Vec<String> = matches.iter().map(|b| b.isbn.clone()).collect();
        let active = self.loans.active_loans_for_isbns(&isbns).await?;
        let holders: HashMap<String, String> = active
            .into_iter()
            .map(|loan| (loan.isbn, loan.card_id))
            .collect();

        Ok(matches
            .into_iter()
            .map(|book| {
                let authors = if book.authors.is_empty() {
                    "Unknown".to_string()
                } else {
                    book.authors.join(", ")
                };

                let borrower_card = holders.get(&book.isbn).cloned();
                BookSearchRow {
                    isbn: book.isbn,
                    title: book.title,
                    authors,
                    status: if borrower_card.is_some() {
                        Availability::Out
                    } else {
                        Availability::In
                    },
                    borrower_card,
                }
            })
            .collect())
    }
}

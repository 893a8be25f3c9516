//! SeaORM implementation of BookRepository

use std::collections::BTreeMap;

use async_trait::async_trait;
use sea_orm::{
    ColumnTrait, Condition, DatabaseConnection, EntityTrait, ModelTrait, QueryFilter, QueryOrder,
};

use crate::domain::{Book, BookRepository, BookWithAuthors, LibraryError};
use crate::models::author::{self, Entity as AuthorEntity};
use crate::models::book::{self, Entity as BookEntity};
use crate::models::book_authors::{self, Entity as BookAuthorsEntity};

pub struct SeaOrmBookRepository {
    db: DatabaseConnection,
}

impl SeaOrmBookRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl BookRepository for SeaOrmBookRepository {
    async fn find_by_isbn(&self, isbn: &str) -> Result<Option<Book>, LibraryError> {
        let book = BookEntity::find_by_id(isbn.to_owned()).one(&self.db).await?;

        Ok(book.map(|b| Book {
            isbn: b.isbn,
            title: b.title,
        }))
    }

    async fn search_with_authors(
        &self,
        term: &str,
    ) -> Result<Vec<BookWithAuthors>, LibraryError> {
        // Books matching on their own columns. SQLite LIKE is
        // case-insensitive for ASCII, matching the legacy behavior.
        let direct_matches = BookEntity::find()
            .filter(
                Condition::any()
                    .add(book::Column::Isbn.contains(term))
                    .add(book::Column::Title.contains(term)),
            )
            .all(&self.db)
            .await?;

        // Books reached through a matching author name.
        let matching_authors = AuthorEntity::find()
            .filter(author::Column::Name.contains(term))
            .all(&self.db)
            .await?;

        // BTreeMap keyed by ISBN gives the result its ordering.
        let mut by_isbn: BTreeMap<String, String> = direct_matches
            .into_iter()
            .map(|b| (b.isbn, b.title))
            .collect();

        if !matching_authors.is_empty() {
            let author_ids: Vec<i32> = matching_authors.iter().map(|a| a.author_id).collect();
            let linked_isbns: Vec<String> = BookAuthorsEntity::find()
                .filter(book_authors::Column::AuthorId.is_in(author_ids))
                .all(&self.db)
                .await?
                .into_iter()
                .map(|link| link.isbn)
                .collect();

            if !linked_isbns.is_empty() {
                let linked_books = BookEntity::find()
                    .filter(book::Column::Isbn.is_in(linked_isbns))
                    .all(&self.db)
                    .await?;
                for b in linked_books {
                    by_isbn.entry(b.isbn).or_insert(b.title);
                }
            }
        }

        let mut results = Vec::with_capacity(by_isbn.len());
        for (isbn, title) in by_isbn {
            let model = book::Model {
                isbn: isbn.clone(),
                title: title.clone(),
            };
            let authors: Vec<String> = model
                .find_related(AuthorEntity)
                .order_by_asc(author::Column::AuthorId)
                .all(&self.db)
                .await?
                .into_iter()
                .map(|a| a.name)
                .collect();

            results.push(BookWithAuthors {
                isbn,
                title,
                authors,
            });
        }

        Ok(results)
    }
}

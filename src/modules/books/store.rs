//! Book persistence. Reads join the author row so every `Book` carries its
//! full `Author`.

use std::sync::Arc;

use async_trait::async_trait;
use bookstore_db::{Database, DbResult};
use rusqlite::{params, OptionalExtension, Row};

use super::models::{Book, BookRecord};
use crate::modules::authors::models::AuthorId;
use crate::modules::authors::store::author_from_columns;

const BOOK_SELECT_SQL: &str = "SELECT
    b.isbn,
    b.title,
    b.description,
    b.image,
    a.id,
    a.name,
    a.age,
    a.description,
    a.image
FROM book b
JOIN author a ON a.id = b.author_id";

/// Persistence contract for book records.
#[async_trait]
pub trait BookStore: Send + Sync {
    async fn find(&self, isbn: &str) -> DbResult<Option<Book>>;

    async fn exists(&self, isbn: &str) -> DbResult<bool>;

    /// All books ordered by ISBN, restricted to one author when `author_id` is set.
    async fn list(&self, author_id: Option<AuthorId>) -> DbResult<Vec<Book>>;

    /// Insert or overwrite the row keyed by `record.isbn`.
    async fn upsert(&self, record: BookRecord) -> DbResult<()>;

    /// Remove the row; a missing row is not an error.
    async fn delete(&self, isbn: &str) -> DbResult<()>;
}

pub type BookStoreArc = Arc<dyn BookStore>;

/// SQLite-backed book store.
#[derive(Debug, Clone)]
pub struct SqliteBookStore {
    db: Database,
}

impl SqliteBookStore {
    pub fn new(db: Database) -> Self {
        Self { db }
    }
}

#[async_trait]
impl BookStore for SqliteBookStore {
    async fn find(&self, isbn: &str) -> DbResult<Option<Book>> {
        let isbn = isbn.to_string();
        self.db
            .call(move |conn| {
                conn.query_row(
                    &format!("{BOOK_SELECT_SQL} WHERE b.isbn = ?1;"),
                    [isbn],
                    parse_book_row,
                )
                .optional()
            })
            .await
    }

    async fn exists(&self, isbn: &str) -> DbResult<bool> {
        let isbn = isbn.to_string();
        self.db
            .call(move |conn| {
                conn.query_row(
                    "SELECT EXISTS(SELECT 1 FROM book WHERE isbn = ?1);",
                    [isbn],
                    |row| row.get(0),
                )
            })
            .await
    }

    async fn list(&self, author_id: Option<AuthorId>) -> DbResult<Vec<Book>> {
        self.db
            .call(move |conn| {
                let mut stmt = conn.prepare(&format!(
                    "{BOOK_SELECT_SQL}
                     WHERE (?1 IS NULL OR b.author_id = ?1)
                     ORDER BY b.isbn;"
                ))?;
                let books = stmt
                    .query_map([author_id], parse_book_row)?
                    .collect::<rusqlite::Result<Vec<_>>>()?;
                Ok(books)
            })
            .await
    }

    async fn upsert(&self, record: BookRecord) -> DbResult<()> {
        self.db
            .call(move |conn| {
                conn.execute(
                    "INSERT INTO book (isbn, title, description, image, author_id)
                     VALUES (?1, ?2, ?3, ?4, ?5)
                     ON CONFLICT(isbn) DO UPDATE SET
                        title = excluded.title,
                        description = excluded.description,
                        image = excluded.image,
                        author_id = excluded.author_id;",
                    params![
                        record.isbn,
                        record.title,
                        record.description,
                        record.image,
                        record.author_id
                    ],
                )?;
                Ok(())
            })
            .await
    }

    async fn delete(&self, isbn: &str) -> DbResult<()> {
        let isbn = isbn.to_string();
        self.db
            .call(move |conn| {
                conn.execute("DELETE FROM book WHERE isbn = ?1;", [isbn])?;
                Ok(())
            })
            .await
    }
}

fn parse_book_row(row: &Row<'_>) -> rusqlite::Result<Book> {
    Ok(Book {
        isbn: row.get(0)?,
        title: row.get(1)?,
        description: row.get(2)?,
        image: row.get(3)?,
        author: author_from_columns(row, 4)?,
    })
}

//! Author persistence.

use std::sync::Arc;

use async_trait::async_trait;
use bookstore_db::{Database, DbResult};
use rusqlite::{params, OptionalExtension, Row};

use super::models::{Author, AuthorId};

const AUTHOR_SELECT_SQL: &str = "SELECT id, name, age, description, image FROM author";

/// Persistence contract for author records.
#[async_trait]
pub trait AuthorStore: Send + Sync {
    /// Insert a new row and return it with the store-assigned id.
    /// Any `id` on the input is ignored.
    async fn insert(&self, author: &Author) -> DbResult<Author>;

    async fn find(&self, id: AuthorId) -> DbResult<Option<Author>>;

    async fn exists(&self, id: AuthorId) -> DbResult<bool>;

    /// All authors ordered by id.
    async fn list(&self) -> DbResult<Vec<Author>>;

    /// Overwrite every mutable column of row `id`; `None` when no such row exists.
    async fn update(&self, id: AuthorId, author: &Author) -> DbResult<Option<Author>>;

    /// Remove row `id`; a missing row is not an error.
    async fn delete(&self, id: AuthorId) -> DbResult<()>;
}

pub type AuthorStoreArc = Arc<dyn AuthorStore>;

/// SQLite-backed author store.
#[derive(Debug, Clone)]
pub struct SqliteAuthorStore {
    db: Database,
}

impl SqliteAuthorStore {
    pub fn new(db: Database) -> Self {
        Self { db }
    }
}

#[async_trait]
impl AuthorStore for SqliteAuthorStore {
    async fn insert(&self, author: &Author) -> DbResult<Author> {
        let author = author.clone();
        self.db
            .call(move |conn| {
                conn.execute(
                    "INSERT INTO author (name, age, description, image) VALUES (?1, ?2, ?3, ?4);",
                    params![author.name, author.age, author.description, author.image],
                )?;
                Ok(Author {
                    id: Some(conn.last_insert_rowid()),
                    ..author
                })
            })
            .await
    }

    async fn find(&self, id: AuthorId) -> DbResult<Option<Author>> {
        self.db
            .call(move |conn| {
                conn.query_row(
                    &format!("{AUTHOR_SELECT_SQL} WHERE id = ?1;"),
                    [id],
                    |row| author_from_columns(row, 0),
                )
                .optional()
            })
            .await
    }

    async fn exists(&self, id: AuthorId) -> DbResult<bool> {
        self.db
            .call(move |conn| {
                conn.query_row(
                    "SELECT EXISTS(SELECT 1 FROM author WHERE id = ?1);",
                    [id],
                    |row| row.get(0),
                )
            })
            .await
    }

    async fn list(&self) -> DbResult<Vec<Author>> {
        self.db
            .call(|conn| {
                let mut stmt = conn.prepare(&format!("{AUTHOR_SELECT_SQL} ORDER BY id;"))?;
                let authors = stmt
                    .query_map([], |row| author_from_columns(row, 0))?
                    .collect::<rusqlite::Result<Vec<_>>>()?;
                Ok(authors)
            })
            .await
    }

    async fn update(&self, id: AuthorId, author: &Author) -> DbResult<Option<Author>> {
        let author = author.clone();
        self.db
            .call(move |conn| {
                let changed = conn.execute(
                    "UPDATE author
                     SET name = ?1, age = ?2, description = ?3, image = ?4
                     WHERE id = ?5;",
                    params![author.name, author.age, author.description, author.image, id],
                )?;
                Ok((changed > 0).then(|| Author {
                    id: Some(id),
                    ..author
                }))
            })
            .await
    }

    async fn delete(&self, id: AuthorId) -> DbResult<()> {
        self.db
            .call(move |conn| {
                conn.execute("DELETE FROM author WHERE id = ?1;", [id])?;
                Ok(())
            })
            .await
    }
}

/// Read `id, name, age, description, image` starting at column `offset`.
pub(crate) fn author_from_columns(row: &Row<'_>, offset: usize) -> rusqlite::Result<Author> {
    Ok(Author {
        id: Some(row.get(offset)?),
        name: row.get(offset + 1)?,
        age: row.get(offset + 2)?,
        description: row.get(offset + 3)?,
        image: row.get(offset + 4)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::books::models::BookRecord;
    use crate::modules::books::store::{BookStore, SqliteBookStore};
    use crate::modules::test_support::{test_author_a, test_author_b, test_db, BOOK_A_ISBN};
    use bookstore_db::DbError;

    #[tokio::test]
    async fn insert_ignores_supplied_id() {
        let store = SqliteAuthorStore::new(test_db().await);

        let saved = store.insert(&test_author_a(Some(42))).await.unwrap();
        assert_ne!(saved.id, Some(42));
        assert_eq!(store.find(saved.id.unwrap()).await.unwrap(), Some(saved));
    }

    #[tokio::test]
    async fn update_of_missing_row_reports_none() {
        let store = SqliteAuthorStore::new(test_db().await);

        assert_eq!(store.update(4242, &test_author_a(None)).await.unwrap(), None);
        assert_eq!(store.find(4242).await.unwrap(), None);
    }

    #[tokio::test]
    async fn update_overwrites_existing_row() {
        let store = SqliteAuthorStore::new(test_db().await);
        let id = store.insert(&test_author_a(None)).await.unwrap().id.unwrap();

        let updated = store.update(id, &test_author_b(None)).await.unwrap();
        assert_eq!(updated, Some(test_author_b(Some(id))));
        assert_eq!(store.find(id).await.unwrap(), Some(test_author_b(Some(id))));
    }

    #[tokio::test]
    async fn ids_are_not_reused_after_delete() {
        let store = SqliteAuthorStore::new(test_db().await);

        let first = store.insert(&test_author_a(None)).await.unwrap().id.unwrap();
        store.delete(first).await.unwrap();
        let second = store.insert(&test_author_b(None)).await.unwrap().id.unwrap();
        assert!(second > first);
    }

    #[tokio::test]
    async fn list_is_ordered_by_id() {
        let store = SqliteAuthorStore::new(test_db().await);

        let a = store.insert(&test_author_a(None)).await.unwrap();
        let b = store.insert(&test_author_b(None)).await.unwrap();
        assert_eq!(store.list().await.unwrap(), vec![a, b]);
    }

    #[tokio::test]
    async fn deleting_author_with_books_is_rejected() {
        let db = test_db().await;
        let store = SqliteAuthorStore::new(db.clone());
        let id = store.insert(&test_author_a(None)).await.unwrap().id.unwrap();
        SqliteBookStore::new(db)
            .upsert(BookRecord {
                isbn: BOOK_A_ISBN.to_string(),
                title: "Test Book A".to_string(),
                description: "d".to_string(),
                image: "book-image.jpeg".to_string(),
                author_id: id,
            })
            .await
            .unwrap();

        assert!(matches!(store.delete(id).await, Err(DbError::Sqlite(_))));
        assert!(store.exists(id).await.unwrap());
    }
}

//! Book use cases: upsert by ISBN with author resolution, filtered listing,
//! partial update and delete.

use crate::error::{ServiceError, ServiceResult};
use crate::modules::authors::models::AuthorId;
use crate::modules::authors::store::AuthorStoreArc;

use super::models::{Book, BookRecord, BookSummary, BookUpdateRequest, UpsertResult};
use super::store::BookStoreArc;

pub struct BookService {
    books: BookStoreArc,
    authors: AuthorStoreArc,
}

impl BookService {
    pub fn new(books: BookStoreArc, authors: AuthorStoreArc) -> Self {
        Self { books, authors }
    }

    /// Create the book `isbn` or overwrite it if present.
    ///
    /// The referenced author must exist (`InvalidState` otherwise, with no
    /// write). A resolved author without an id is an `IntegrityFault`.
    pub async fn create_update(
        &self,
        isbn: &str,
        summary: BookSummary,
    ) -> ServiceResult<UpsertResult> {
        let author_id = summary.author.id;
        let Some(author) = self.authors.find(author_id).await? else {
            return Err(ServiceError::InvalidState(format!(
                "author {author_id} does not exist"
            )));
        };

        let book = Book {
            isbn: isbn.to_string(),
            title: summary.title,
            description: summary.description,
            image: summary.image,
            author,
        };
        let record = BookRecord::try_from(&book)?;

        let is_created = !self.books.exists(isbn).await?;
        self.books.upsert(record).await?;

        tracing::info!(
            module = "books",
            isbn,
            author_id = ?book.author.id,
            created = is_created,
            "book saved"
        );
        Ok(UpsertResult { book, is_created })
    }

    /// All books, or only those written by `author_id`.
    pub async fn list(&self, author_id: Option<AuthorId>) -> ServiceResult<Vec<Book>> {
        Ok(self.books.list(author_id).await?)
    }

    /// `Ok(None)` when no book has `isbn`.
    pub async fn get(&self, isbn: &str) -> ServiceResult<Option<Book>> {
        Ok(self.books.find(isbn).await?)
    }

    /// Merge the provided fields of `request` onto book `isbn`.
    pub async fn partial_update(
        &self,
        isbn: &str,
        request: BookUpdateRequest,
    ) -> ServiceResult<Book> {
        let Some(mut existing) = self.books.find(isbn).await? else {
            return Err(ServiceError::InvalidState(format!(
                "book {isbn} does not exist"
            )));
        };

        if request.is_empty() {
            return Ok(existing);
        }

        request.apply_to(&mut existing);
        self.books.upsert(BookRecord::try_from(&existing)?).await?;

        tracing::info!(module = "books", isbn, "book patched");
        Ok(existing)
    }

    /// Idempotent; deleting an unknown ISBN succeeds.
    pub async fn delete(&self, isbn: &str) -> ServiceResult<()> {
        self.books.delete(isbn).await?;
        tracing::info!(module = "books", isbn, "book deleted");
        Ok(())
    }
}

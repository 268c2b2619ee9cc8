use serde::{Deserialize, Serialize};

use crate::error::ServiceError;
use crate::modules::authors::models::{Author, AuthorId, AuthorSummary, AuthorSummaryDto};
use crate::utils::merge;

/// Book record keyed by its ISBN, carrying the full referenced author.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Book {
    pub isbn: String,
    pub title: String,
    pub description: String,
    pub image: String,
    pub author: Author,
}

/// Upsert input: every book field except the ISBN, plus an author reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookSummary {
    pub title: String,
    pub description: String,
    pub image: String,
    pub author: AuthorSummary,
}

/// Partial update; `None` means "not provided" and keeps the stored value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookUpdateRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub image: Option<String>,
}

impl BookUpdateRequest {
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.description.is_none() && self.image.is_none()
    }

    /// Overwrite exactly the provided fields of `book`.
    pub fn apply_to(self, book: &mut Book) {
        merge(&mut book.title, self.title);
        merge(&mut book.description, self.description);
        merge(&mut book.image, self.image);
    }
}

/// Outcome of an upsert: the stored book and which transition was taken.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpsertResult {
    pub book: Book,
    /// `true` for absent → created, `false` for present → updated.
    pub is_created: bool,
}

/// Flat row written to the `book` table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookRecord {
    pub isbn: String,
    pub title: String,
    pub description: String,
    pub image: String,
    pub author_id: AuthorId,
}

impl TryFrom<&Book> for BookRecord {
    type Error = ServiceError;

    /// Fails with `IntegrityFault` when the book's author was never persisted.
    fn try_from(book: &Book) -> Result<Self, Self::Error> {
        let author_id = book.author.id.ok_or_else(|| missing_author_id(&book.isbn))?;
        Ok(Self {
            isbn: book.isbn.clone(),
            title: book.title.clone(),
            description: book.description.clone(),
            image: book.image.clone(),
            author_id,
        })
    }
}

pub(crate) fn missing_author_id(isbn: &str) -> ServiceError {
    ServiceError::IntegrityFault(format!("author of book {isbn} has no id"))
}

/// PUT body. A body `isbn` is ignored; the path ISBN wins.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookSummaryDto {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub isbn: Option<String>,
    pub title: String,
    pub description: String,
    pub image: String,
    pub author: AuthorSummaryDto,
}

impl From<BookSummaryDto> for BookSummary {
    fn from(dto: BookSummaryDto) -> Self {
        Self {
            title: dto.title,
            description: dto.description,
            image: dto.image,
            author: dto.author.into(),
        }
    }
}

/// Book as returned over HTTP.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookDto {
    pub isbn: String,
    pub title: String,
    pub description: String,
    pub image: String,
    pub author: AuthorSummaryDto,
}

impl TryFrom<Book> for BookDto {
    type Error = ServiceError;

    fn try_from(book: Book) -> Result<Self, Self::Error> {
        let Some(author_id) = book.author.id else {
            return Err(missing_author_id(&book.isbn));
        };
        Ok(Self {
            isbn: book.isbn,
            title: book.title,
            description: book.description,
            image: book.image,
            author: AuthorSummaryDto {
                id: author_id,
                name: Some(book.author.name),
                image: Some(book.author.image),
            },
        })
    }
}

/// PATCH body. Absent and `null` fields both mean "not provided".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookUpdateRequestDto {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

impl From<BookUpdateRequestDto> for BookUpdateRequest {
    fn from(dto: BookUpdateRequestDto) -> Self {
        Self {
            title: dto.title,
            description: dto.description,
            image: dto.image,
        }
    }
}

/// `GET /v1/books?author={id}`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BookListQuery {
    pub author: Option<AuthorId>,
}

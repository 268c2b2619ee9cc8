//! Author and book catalog service.
//!
//! The `authors` and `books` modules each own their store, service, routes,
//! OpenAPI fragment and schema migration. [`app`] wires them into the
//! kernel registry and the HTTP server.

pub mod app;
pub mod error;
pub mod modules;
pub mod utils;

pub use error::{ServiceError, ServiceResult};
pub use modules::authors::{Author, AuthorId, AuthorService, AuthorUpdateRequest};
pub use modules::books::{Book, BookService, BookSummary, BookUpdateRequest, UpsertResult};

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, put},
    Json, Router,
};
use bookstore_http::error::AppError;

use super::models::{BookDto, BookListQuery, BookSummaryDto, BookUpdateRequestDto};
use super::service::BookService;

type BookState = State<Arc<BookService>>;

/// HTTP routes for `/v1/books`.
pub fn router(service: Arc<BookService>) -> Router {
    Router::new()
        .route("/", get(read_many_books))
        .route(
            "/{isbn}",
            put(create_update_book)
                .get(read_one_book)
                .patch(partial_update_book)
                .delete(delete_book),
        )
        .with_state(service)
}

async fn create_update_book(
    State(service): BookState,
    Path(isbn): Path<String>,
    Json(book): Json<BookSummaryDto>,
) -> Result<(StatusCode, Json<BookDto>), AppError> {
    let result = service.create_update(&isbn, book.into()).await?;
    let status = if result.is_created {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };
    Ok((status, Json(BookDto::try_from(result.book)?)))
}

async fn read_many_books(
    State(service): BookState,
    Query(query): Query<BookListQuery>,
) -> Result<Json<Vec<BookDto>>, AppError> {
    let books = service
        .list(query.author)
        .await?
        .into_iter()
        .map(BookDto::try_from)
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Json(books))
}

async fn read_one_book(
    State(service): BookState,
    Path(isbn): Path<String>,
) -> Result<Json<BookDto>, AppError> {
    match service.get(&isbn).await? {
        Some(book) => Ok(Json(BookDto::try_from(book)?)),
        None => Err(AppError::not_found(format!("book {isbn} not found"))),
    }
}

async fn partial_update_book(
    State(service): BookState,
    Path(isbn): Path<String>,
    Json(request): Json<BookUpdateRequestDto>,
) -> Result<Json<BookDto>, AppError> {
    let updated = service.partial_update(&isbn, request.into()).await?;
    Ok(Json(BookDto::try_from(updated)?))
}

async fn delete_book(
    State(service): BookState,
    Path(isbn): Path<String>,
) -> Result<StatusCode, AppError> {
    service.delete(&isbn).await?;
    Ok(StatusCode::NO_CONTENT)
}

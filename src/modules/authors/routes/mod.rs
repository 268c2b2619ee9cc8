use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use bookstore_http::error::AppError;

use super::models::{AuthorDto, AuthorId, AuthorUpdateRequestDto};
use super::service::AuthorService;

type AuthorState = State<Arc<AuthorService>>;

/// HTTP routes for `/v1/authors`.
pub fn router(service: Arc<AuthorService>) -> Router {
    Router::new()
        .route("/", get(read_many_authors).post(create_author))
        .route(
            "/{id}",
            get(read_one_author)
                .put(full_update_author)
                .patch(partial_update_author)
                .delete(delete_author),
        )
        .with_state(service)
}

async fn create_author(
    State(service): AuthorState,
    Json(author): Json<AuthorDto>,
) -> Result<(StatusCode, Json<AuthorDto>), AppError> {
    let created = service.create(author.into()).await?;
    Ok((StatusCode::CREATED, Json(created.into())))
}

async fn read_many_authors(State(service): AuthorState) -> Result<Json<Vec<AuthorDto>>, AppError> {
    let authors = service.list().await?;
    Ok(Json(authors.into_iter().map(AuthorDto::from).collect()))
}

async fn read_one_author(
    State(service): AuthorState,
    Path(id): Path<AuthorId>,
) -> Result<Json<AuthorDto>, AppError> {
    match service.get(id).await? {
        Some(author) => Ok(Json(author.into())),
        None => Err(AppError::not_found(format!("author {id} not found"))),
    }
}

async fn full_update_author(
    State(service): AuthorState,
    Path(id): Path<AuthorId>,
    Json(author): Json<AuthorDto>,
) -> Result<Json<AuthorDto>, AppError> {
    let updated = service.full_update(id, author.into()).await?;
    Ok(Json(updated.into()))
}

async fn partial_update_author(
    State(service): AuthorState,
    Path(id): Path<AuthorId>,
    Json(request): Json<AuthorUpdateRequestDto>,
) -> Result<Json<AuthorDto>, AppError> {
    let updated = service.partial_update(id, request.into()).await?;
    Ok(Json(updated.into()))
}

async fn delete_author(
    State(service): AuthorState,
    Path(id): Path<AuthorId>,
) -> Result<StatusCode, AppError> {
    service.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

//! Author use cases.

use crate::error::{ServiceError, ServiceResult};

use super::models::{Author, AuthorId, AuthorUpdateRequest};
use super::store::AuthorStoreArc;

/// Author CRUD with full and partial update semantics.
pub struct AuthorService {
    store: AuthorStoreArc,
}

impl AuthorService {
    pub fn new(store: AuthorStoreArc) -> Self {
        Self { store }
    }

    /// Persist a new author. The store assigns the id; a caller-supplied id is
    /// rejected with `InvalidArgument`.
    pub async fn create(&self, author: Author) -> ServiceResult<Author> {
        if let Some(id) = author.id {
            return Err(ServiceError::InvalidArgument(format!(
                "author id must not be set on create (got {id})"
            )));
        }

        let created = self.store.insert(&author).await?;
        tracing::info!(module = "authors", author_id = ?created.id, "author created");
        Ok(created)
    }

    pub async fn list(&self) -> ServiceResult<Vec<Author>> {
        Ok(self.store.list().await?)
    }

    /// `Ok(None)` when no author has `id`.
    pub async fn get(&self, id: AuthorId) -> ServiceResult<Option<Author>> {
        Ok(self.store.find(id).await?)
    }

    /// Replace every field of author `id` with `author`, forcing the id to `id`.
    pub async fn full_update(&self, id: AuthorId, author: Author) -> ServiceResult<Author> {
        if !self.store.exists(id).await? {
            return Err(not_found(id));
        }

        let normalised = Author {
            id: Some(id),
            ..author
        };
        let Some(updated) = self.store.update(id, &normalised).await? else {
            return Err(not_found(id));
        };
        tracing::info!(module = "authors", author_id = id, "author replaced");
        Ok(updated)
    }

    /// Merge the provided fields of `request` onto author `id`.
    pub async fn partial_update(
        &self,
        id: AuthorId,
        request: AuthorUpdateRequest,
    ) -> ServiceResult<Author> {
        let Some(mut existing) = self.store.find(id).await? else {
            return Err(not_found(id));
        };

        if request.is_empty() {
            return Ok(existing);
        }

        request.apply_to(&mut existing);
        let Some(updated) = self.store.update(id, &existing).await? else {
            return Err(not_found(id));
        };
        tracing::info!(module = "authors", author_id = id, "author patched");
        Ok(updated)
    }

    /// Idempotent; deleting an unknown id succeeds.
    pub async fn delete(&self, id: AuthorId) -> ServiceResult<()> {
        self.store.delete(id).await?;
        tracing::info!(module = "authors", author_id = id, "author deleted");
        Ok(())
    }
}

fn not_found(id: AuthorId) -> ServiceError {
    ServiceError::InvalidState(format!("author {id} does not exist"))
}

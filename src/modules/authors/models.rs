use serde::{Deserialize, Serialize};

use crate::utils::merge;

/// Store-assigned author identifier.
pub type AuthorId = i64;

/// Author record. `id` is `None` until the store assigns one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Author {
    pub id: Option<AuthorId>,
    pub name: String,
    pub age: i32,
    pub description: String,
    pub image: String,
}

/// Partial update; `None` means "not provided" and keeps the stored value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthorUpdateRequest {
    pub name: Option<String>,
    pub age: Option<i32>,
    pub description: Option<String>,
    pub image: Option<String>,
}

impl AuthorUpdateRequest {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.age.is_none()
            && self.description.is_none()
            && self.image.is_none()
    }

    /// Overwrite exactly the provided fields of `author`.
    pub fn apply_to(self, author: &mut Author) {
        merge(&mut author.name, self.name);
        merge(&mut author.age, self.age);
        merge(&mut author.description, self.description);
        merge(&mut author.image, self.image);
    }
}

/// Reference to an author from another aggregate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthorSummary {
    pub id: AuthorId,
}

/// Author as exchanged over HTTP.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorDto {
    #[serde(default)]
    pub id: Option<AuthorId>,
    pub name: String,
    pub age: i32,
    pub description: String,
    pub image: String,
}

impl From<Author> for AuthorDto {
    fn from(author: Author) -> Self {
        Self {
            id: author.id,
            name: author.name,
            age: author.age,
            description: author.description,
            image: author.image,
        }
    }
}

impl From<AuthorDto> for Author {
    fn from(dto: AuthorDto) -> Self {
        Self {
            id: dto.id,
            name: dto.name,
            age: dto.age,
            description: dto.description,
            image: dto.image,
        }
    }
}

/// PATCH body. Absent and `null` fields both mean "not provided"; `id` is ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorUpdateRequestDto {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<AuthorId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub age: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

impl From<AuthorUpdateRequestDto> for AuthorUpdateRequest {
    fn from(dto: AuthorUpdateRequestDto) -> Self {
        Self {
            name: dto.name,
            age: dto.age,
            description: dto.description,
            image: dto.image,
        }
    }
}

/// Author reference embedded in book payloads. Input only needs `id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorSummaryDto {
    pub id: AuthorId,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
}

impl From<AuthorSummaryDto> for AuthorSummary {
    fn from(dto: AuthorSummaryDto) -> Self {
        Self { id: dto.id }
    }
}

//! Domain models and input types

pub mod author;
pub mod book;
pub mod normalize;
pub mod user;

pub use author::{Author, AuthorPublic, CreateAuthorInput, UpdateAuthorInput};
pub use book::{Book, BookPublic, CreateBookInput, UpdateBookInput};
pub use normalize::normalize;
pub use user::{CreateUserInput, User, UserPublic};

use serde::{Deserialize, Deserializer};

/// Deserialize a field that distinguishes "absent" from "present but null".
///
/// With `#[serde(default, deserialize_with = "double_option")]`, an absent
/// field yields `None` and an explicit `null` yields `Some(None)`.
pub(crate) fn double_option<'de, T, D>(
    deserializer: D,
) -> std::result::Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Deserialize::deserialize(deserializer).map(Some)
}

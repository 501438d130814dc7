//! Book catalog logic: normalization, de-duplication, author linkage and
//! manager-only edits

use crate::domain::{normalize, Book, CreateBookInput, UpdateBookInput, User};
use crate::error::{AppError, Result};
use crate::repository::book::DUPLICATE_TITLE;
use crate::repository::{AuthorRepository, BookQuery, BookRepository};
use std::sync::Arc;
use validator::Validate;

pub struct BookService<B: BookRepository, A: AuthorRepository> {
    books: Arc<B>,
    authors: Arc<A>,
}

impl<B: BookRepository, A: AuthorRepository> BookService<B, A> {
    pub fn new(books: Arc<B>, authors: Arc<A>) -> Self {
        Self { books, authors }
    }

    pub async fn create(&self, user: &User, input: CreateBookInput) -> Result<Book> {
        input.validate()?;

        if let Some(author_id) = input.author_id {
            self.ensure_author_exists(author_id).await?;
        }

        let title = normalized_title(&input.title)?;

        // Advisory pre-check; the unique constraint on books.title is the
        // authoritative guard against racing creates.
        if self.books.find_by_title(&title).await?.is_some() {
            return Err(AppError::Conflict(DUPLICATE_TITLE.to_string()));
        }

        self.books
            .create(&title, input.year, input.author_id, user.id)
            .await
    }

    pub async fn get(&self, id: i64) -> Result<Book> {
        self.books
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Book not found".to_string()))
    }

    /// List the caller's books, optionally filtered by a substring of the
    /// normalized title and by publication year.
    pub async fn list(
        &self,
        user: &User,
        title: Option<String>,
        year: Option<i32>,
        offset: Option<i64>,
        limit: Option<i64>,
    ) -> Result<Vec<Book>> {
        self.books
            .list(&BookQuery {
                managed_by: user.id,
                title: title.map(|t| normalize(&t)),
                year,
                offset,
                limit,
            })
            .await
    }

    pub async fn update(&self, user: &User, id: i64, mut patch: UpdateBookInput) -> Result<Book> {
        patch.validate()?;
        let book = self.get(id).await?;
        let book = self.authorize_manage(user, book).await?;

        if patch.title.is_none() && patch.year.is_none() && patch.author_id.is_none() {
            return Ok(book);
        }

        if let Some(title) = patch.title.take() {
            let title = normalized_title(&title)?;
            if let Some(other) = self.books.find_by_title(&title).await? {
                if other.id != id {
                    return Err(AppError::Conflict(DUPLICATE_TITLE.to_string()));
                }
            }
            patch.title = Some(title);
        }

        if let Some(Some(author_id)) = patch.author_id {
            self.ensure_author_exists(author_id).await?;
        }

        self.books.update(id, &patch).await
    }

    pub async fn delete(&self, user: &User, id: i64) -> Result<()> {
        let book = self.get(id).await?;
        self.authorize_manage(user, book).await?;
        self.books.delete(id).await
    }

    async fn ensure_author_exists(&self, author_id: i64) -> Result<()> {
        if self.authors.find_by_id(author_id).await?.is_none() {
            return Err(AppError::BadRequest("Author does not exist".to_string()));
        }
        Ok(())
    }

    /// Only the managing user may edit or delete a book. An orphaned book
    /// (manager reference cleared after account removal) transitions to the
    /// caller via an atomic conditional update before the ownership check;
    /// losing that race falls through to the check against the winner.
    async fn authorize_manage(&self, user: &User, book: Book) -> Result<Book> {
        match book.managed_by_user {
            Some(manager) if manager == user.id => Ok(book),
            Some(_) => Err(AppError::Forbidden("Not enough permissions".to_string())),
            None => {
                self.books.claim(book.id, user.id).await?;
                let refreshed = self
                    .books
                    .find_by_id(book.id)
                    .await?
                    .ok_or_else(|| AppError::NotFound("Book not found".to_string()))?;
                if refreshed.managed_by_user == Some(user.id) {
                    Ok(refreshed)
                } else {
                    Err(AppError::Forbidden("Not enough permissions".to_string()))
                }
            }
        }
    }
}

fn normalized_title(raw: &str) -> Result<String> {
    let title = normalize(raw);
    if title.is_empty() {
        return Err(AppError::Validation(
            "Book title must contain at least one word character".to_string(),
        ));
    }
    Ok(title)
}

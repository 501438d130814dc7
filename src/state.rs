//! Application state trait for dependency injection
//!
//! Handlers are generic over any state that provides the services, so the
//! same handler code runs against the production `AppState` and against
//! test states built on mock repositories.

use crate::config::Config;
use crate::jwt::JwtManager;
use crate::repository::{AuthorRepository, BookRepository, UserRepository};
use crate::service::{AuthService, AuthorService, BookService, UserService};

/// Trait for application state that provides access to all services.
pub trait HasServices: Clone + Send + Sync + 'static {
    /// The user repository type
    type UserRepo: UserRepository;
    /// The author repository type
    type AuthorRepo: AuthorRepository;
    /// The book repository type
    type BookRepo: BookRepository;

    /// Get the application configuration
    fn config(&self) -> &Config;

    /// Get the JWT manager
    fn jwt_manager(&self) -> &JwtManager;

    /// Get the authentication service
    fn auth_service(&self) -> &AuthService<Self::UserRepo>;

    /// Get the user service
    fn user_service(&self) -> &UserService<Self::UserRepo>;

    /// Get the author service
    fn author_service(&self) -> &AuthorService<Self::AuthorRepo>;

    /// Get the book service
    fn book_service(&self) -> &BookService<Self::BookRepo, Self::AuthorRepo>;
}

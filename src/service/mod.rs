//! Business logic services

pub mod auth;
pub mod author;
pub mod book;
pub mod user;

pub use auth::AuthService;
pub use author::AuthorService;
pub use book::BookService;
pub use user::UserService;

//! Repository integration tests
//!
//! Require TEST_DATABASE_URL pointing at a MySQL instance; each test skips
//! itself when the database is unreachable.

use madr_core::domain::{CreateUserInput, UpdateBookInput};
use madr_core::error::AppError;
use madr_core::repository::author::AuthorRepositoryImpl;
use madr_core::repository::book::BookRepositoryImpl;
use madr_core::repository::user::UserRepositoryImpl;
use madr_core::repository::{AuthorQuery, AuthorRepository, BookQuery, BookRepository, UserRepository};

mod common;

async fn test_pool() -> Option<sqlx::MySqlPool> {
    let pool = match common::get_test_pool().await {
        Ok(pool) => pool,
        Err(e) => {
            eprintln!("Skipping test: could not connect to database: {}", e);
            return None;
        }
    };
    common::setup_database(&pool).await.unwrap();
    common::cleanup_database(&pool).await.unwrap();
    Some(pool)
}

async fn seed_user(pool: &sqlx::MySqlPool, username: &str) -> i64 {
    let repo = UserRepositoryImpl::new(pool.clone());
    let user = repo
        .create(
            &CreateUserInput {
                username: username.to_string(),
                email: format!("{username}@example.com"),
                password: "senha".to_string(),
            },
            "$argon2id$fake-hash",
        )
        .await
        .unwrap();
    user.id
}

#[tokio::test]
async fn test_author_create_and_find() {
    let Some(pool) = test_pool().await else { return };
    let user_id = seed_user(&pool, "alice").await;
    let repo = AuthorRepositoryImpl::new(pool.clone());

    let author = repo.create("machado de assis", user_id).await.unwrap();
    assert_eq!(author.name, "machado de assis");
    assert_eq!(author.created_by_user, Some(user_id));

    let found = repo.find_by_name("machado de assis").await.unwrap();
    assert_eq!(found.unwrap().id, author.id);

    common::cleanup_database(&pool).await.unwrap();
}

#[tokio::test]
async fn test_author_unique_name_enforced_by_store() {
    let Some(pool) = test_pool().await else { return };
    let user_id = seed_user(&pool, "alice").await;
    let repo = AuthorRepositoryImpl::new(pool.clone());

    repo.create("clarice lispector", user_id).await.unwrap();
    let err = repo.create("clarice lispector", user_id).await.unwrap_err();
    assert!(matches!(err, AppError::Conflict(_)));

    common::cleanup_database(&pool).await.unwrap();
}

#[tokio::test]
async fn test_author_list_scoped_and_filtered() {
    let Some(pool) = test_pool().await else { return };
    let alice = seed_user(&pool, "alice").await;
    let bob = seed_user(&pool, "bob").await;
    let repo = AuthorRepositoryImpl::new(pool.clone());

    repo.create("machado de assis", alice).await.unwrap();
    repo.create("clarice lispector", alice).await.unwrap();
    repo.create("graciliano ramos", bob).await.unwrap();

    // Scoped to the creating user
    let authors = repo
        .list(&AuthorQuery {
            created_by: alice,
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(authors.len(), 2);

    // Substring filter on the normalized name
    let authors = repo
        .list(&AuthorQuery {
            created_by: alice,
            name: Some("lispector".to_string()),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(authors.len(), 1);
    assert_eq!(authors[0].name, "clarice lispector");

    // Pagination
    let authors = repo
        .list(&AuthorQuery {
            created_by: alice,
            offset: Some(1),
            limit: Some(1),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(authors.len(), 1);

    common::cleanup_database(&pool).await.unwrap();
}

#[tokio::test]
async fn test_author_claim_only_succeeds_once() {
    let Some(pool) = test_pool().await else { return };
    let alice = seed_user(&pool, "alice").await;
    let bob = seed_user(&pool, "bob").await;
    let repo = AuthorRepositoryImpl::new(pool.clone());

    let author = repo.create("anonimo", alice).await.unwrap();

    // A claimed author cannot be re-claimed.
    assert!(!repo.claim(author.id, bob).await.unwrap());

    // Orphan it, then the first claim wins and the second loses.
    sqlx::query("UPDATE authors SET created_by_user = NULL WHERE id = ?")
        .bind(author.id)
        .execute(&pool)
        .await
        .unwrap();

    assert!(repo.claim(author.id, bob).await.unwrap());
    assert!(!repo.claim(author.id, alice).await.unwrap());

    let refreshed = repo.find_by_id(author.id).await.unwrap().unwrap();
    assert_eq!(refreshed.created_by_user, Some(bob));

    common::cleanup_database(&pool).await.unwrap();
}

#[tokio::test]
async fn test_deleting_user_orphans_catalog_records() {
    let Some(pool) = test_pool().await else { return };
    let alice = seed_user(&pool, "alice").await;

    let authors = AuthorRepositoryImpl::new(pool.clone());
    let books = BookRepositoryImpl::new(pool.clone());
    let users = UserRepositoryImpl::new(pool.clone());

    let author = authors.create("machado de assis", alice).await.unwrap();
    let book = books
        .create("dom casmurro", 1899, Some(author.id), alice)
        .await
        .unwrap();

    users.delete(alice).await.unwrap();

    // Catalog records survive with their owner references cleared.
    let author = authors.find_by_id(author.id).await.unwrap().unwrap();
    assert_eq!(author.created_by_user, None);

    let book = books.find_by_id(book.id).await.unwrap().unwrap();
    assert_eq!(book.managed_by_user, None);
    assert_eq!(book.author_id, Some(author.id));

    common::cleanup_database(&pool).await.unwrap();
}

#[tokio::test]
async fn test_deleting_author_detaches_books() {
    let Some(pool) = test_pool().await else { return };
    let alice = seed_user(&pool, "alice").await;

    let authors = AuthorRepositoryImpl::new(pool.clone());
    let books = BookRepositoryImpl::new(pool.clone());

    let author = authors.create("machado de assis", alice).await.unwrap();
    let book = books
        .create("dom casmurro", 1899, Some(author.id), alice)
        .await
        .unwrap();

    authors.delete(author.id).await.unwrap();

    let book = books.find_by_id(book.id).await.unwrap().unwrap();
    assert_eq!(book.author_id, None);

    common::cleanup_database(&pool).await.unwrap();
}

#[tokio::test]
async fn test_book_partial_update() {
    let Some(pool) = test_pool().await else { return };
    let alice = seed_user(&pool, "alice").await;

    let authors = AuthorRepositoryImpl::new(pool.clone());
    let books = BookRepositoryImpl::new(pool.clone());

    let author = authors.create("machado de assis", alice).await.unwrap();
    let book = books
        .create("dom casmurro", 1899, Some(author.id), alice)
        .await
        .unwrap();

    // Change only the year.
    let updated = books
        .update(
            book.id,
            &UpdateBookInput {
                year: Some(1900),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.year, 1900);
    assert_eq!(updated.title, "dom casmurro");
    assert_eq!(updated.author_id, Some(author.id));

    // Detach the author with an explicit null.
    let updated = books
        .update(
            book.id,
            &UpdateBookInput {
                author_id: Some(None),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.author_id, None);

    common::cleanup_database(&pool).await.unwrap();
}

#[tokio::test]
async fn test_book_list_filters() {
    let Some(pool) = test_pool().await else { return };
    let alice = seed_user(&pool, "alice").await;
    let books = BookRepositoryImpl::new(pool.clone());

    books.create("dom casmurro", 1899, None, alice).await.unwrap();
    books.create("quincas borba", 1891, None, alice).await.unwrap();
    books.create("memorial de aires", 1908, None, alice).await.unwrap();

    let found = books
        .list(&BookQuery {
            managed_by: alice,
            title: Some("casmurro".to_string()),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].title, "dom casmurro");

    let found = books
        .list(&BookQuery {
            managed_by: alice,
            year: Some(1891),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].title, "quincas borba");

    common::cleanup_database(&pool).await.unwrap();
}

#[tokio::test]
async fn test_list_filter_underscore_matches_literally() {
    let Some(pool) = test_pool().await else { return };
    let alice = seed_user(&pool, "alice").await;
    let books = BookRepositoryImpl::new(pool.clone());

    // Underscores survive normalization; the filter must not treat them as
    // single-character wildcards.
    books.create("obra_rara", 1950, None, alice).await.unwrap();
    books.create("obraxrara", 1951, None, alice).await.unwrap();

    let found = books
        .list(&BookQuery {
            managed_by: alice,
            title: Some("obra_rara".to_string()),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].title, "obra_rara");

    common::cleanup_database(&pool).await.unwrap();
}

#[tokio::test]
async fn test_user_unique_constraints() {
    let Some(pool) = test_pool().await else { return };
    let repo = UserRepositoryImpl::new(pool.clone());

    repo.create(
        &CreateUserInput {
            username: "alice".to_string(),
            email: "alice@example.com".to_string(),
            password: "senha".to_string(),
        },
        "$argon2id$fake-hash",
    )
    .await
    .unwrap();

    let err = repo
        .create(
            &CreateUserInput {
                username: "alice".to_string(),
                email: "other@example.com".to_string(),
                password: "senha".to_string(),
            },
            "$argon2id$fake-hash",
        )
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Conflict(_)));

    common::cleanup_database(&pool).await.unwrap();
}

//! Server initialization and routing

use crate::api;
use crate::config::Config;
use crate::jwt::JwtManager;
use crate::repository::{
    author::AuthorRepositoryImpl, book::BookRepositoryImpl, user::UserRepositoryImpl,
};
use crate::service::{AuthService, AuthorService, BookService, UserService};
use crate::state::HasServices;
use anyhow::Result;
use axum::{
    routing::{get, post},
    Router,
};
use sqlx::mysql::MySqlPoolOptions;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::info;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub jwt_manager: JwtManager,
    pub auth_service: Arc<AuthService<UserRepositoryImpl>>,
    pub user_service: Arc<UserService<UserRepositoryImpl>>,
    pub author_service: Arc<AuthorService<AuthorRepositoryImpl>>,
    pub book_service: Arc<BookService<BookRepositoryImpl, AuthorRepositoryImpl>>,
}

impl AppState {
    /// Wire repositories and services onto a connection pool
    pub fn new(config: Config, db_pool: sqlx::MySqlPool) -> Self {
        let user_repo = Arc::new(UserRepositoryImpl::new(db_pool.clone()));
        let author_repo = Arc::new(AuthorRepositoryImpl::new(db_pool.clone()));
        let book_repo = Arc::new(BookRepositoryImpl::new(db_pool));

        let jwt_manager = JwtManager::new(config.jwt.clone());

        let auth_service = Arc::new(AuthService::new(user_repo.clone(), jwt_manager.clone()));
        let user_service = Arc::new(UserService::new(user_repo));
        let author_service = Arc::new(AuthorService::new(
            author_repo.clone(),
            config.author_edit_policy,
        ));
        let book_service = Arc::new(BookService::new(book_repo, author_repo));

        Self {
            config: Arc::new(config),
            jwt_manager,
            auth_service,
            user_service,
            author_service,
            book_service,
        }
    }
}

impl HasServices for AppState {
    type UserRepo = UserRepositoryImpl;
    type AuthorRepo = AuthorRepositoryImpl;
    type BookRepo = BookRepositoryImpl;

    fn config(&self) -> &Config {
        &self.config
    }

    fn jwt_manager(&self) -> &JwtManager {
        &self.jwt_manager
    }

    fn auth_service(&self) -> &AuthService<Self::UserRepo> {
        &self.auth_service
    }

    fn user_service(&self) -> &UserService<Self::UserRepo> {
        &self.user_service
    }

    fn author_service(&self) -> &AuthorService<Self::AuthorRepo> {
        &self.author_service
    }

    fn book_service(&self) -> &BookService<Self::BookRepo, Self::AuthorRepo> {
        &self.book_service
    }
}

/// Run the server
pub async fn run(config: Config) -> Result<()> {
    let db_pool = MySqlPoolOptions::new()
        .max_connections(config.database.max_connections)
        .min_connections(config.database.min_connections)
        .connect(&config.database.url)
        .await?;

    info!("Connected to database");

    sqlx::migrate!("./migrations").run(&db_pool).await?;
    info!("Migrations applied");

    let http_addr = config.http_addr();
    let state = AppState::new(config, db_pool);
    let app = build_router(state);

    let listener = TcpListener::bind(&http_addr).await?;
    info!("HTTP server started on {}", http_addr);
    axum::serve(listener, app).await?;

    Ok(())
}

/// Build the HTTP router with generic state type
///
/// This function is generic over the state type, allowing it to work with
/// both production `AppState` and test implementations that implement `HasServices`.
pub fn build_router<S: HasServices>(state: S) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(api::root))
        // Auth endpoints
        .route("/auth/token", post(api::auth::token::<S>))
        .route("/auth/refresh_token", post(api::auth::refresh_token::<S>))
        // User endpoints
        .route(
            "/users/",
            get(api::users::list::<S>).post(api::users::create::<S>),
        )
        .route(
            "/users/{id}",
            get(api::users::get::<S>)
                .put(api::users::update::<S>)
                .delete(api::users::delete::<S>),
        )
        // Author endpoints
        .route(
            "/authors/",
            get(api::authors::list::<S>).post(api::authors::create::<S>),
        )
        .route(
            "/authors/{id}",
            get(api::authors::get::<S>)
                .patch(api::authors::update::<S>)
                .delete(api::authors::delete::<S>),
        )
        // Book endpoints
        .route(
            "/books/",
            get(api::books::list::<S>).post(api::books::create::<S>),
        )
        .route(
            "/books/{id}",
            get(api::books::get::<S>)
                .patch(api::books::update::<S>)
                .delete(api::books::delete::<S>),
        )
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

pub mod api;
pub mod config;
pub mod domain;
pub mod error;
pub mod jwt;
pub mod middleware;
pub mod repository;
pub mod server;
pub mod service;
pub mod state;

// Pokedex Gateway Library

pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod security;
pub mod session;
pub mod upstream;

pub use error::{ApiError, Result};
pub use models::User;

use std::sync::Arc;

use db::CredentialStore;
use security::jwt::TokenCodec;
use session::SessionTransport;
use upstream::PokeApiClient;

/// Shared application state, constructed once at startup and handed to every
/// handler by reference. There is no ambient global configuration.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn CredentialStore>,
    pub codec: TokenCodec,
    pub transport: SessionTransport,
    pub upstream: PokeApiClient,
}

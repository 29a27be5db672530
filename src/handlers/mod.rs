pub mod auth;
pub mod resource;

pub use auth::{login, logout, verify};
pub use resource::{get_pokemon, list_pokemon};

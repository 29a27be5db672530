mod auth;

pub use auth::{authenticate, AuthMiddleware, CurrentUser};

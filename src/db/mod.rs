//! Credential store adapters.

pub mod memory;
pub mod postgres;
pub mod seed;

use async_trait::async_trait;

use crate::error::Result;
use crate::models::User;

pub use memory::InMemoryCredentialStore;
pub use postgres::PgCredentialStore;

/// Lookup-by-username contract over the external user store. Usernames are
/// matched exactly, case-sensitively. The gateway never writes through this
/// interface.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>>;
}

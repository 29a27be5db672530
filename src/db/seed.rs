//! One-time user seeding, run via the `seed` CLI subcommand instead of an
//! unauthenticated HTTP route.

use sqlx::PgPool;
use uuid::Uuid;

use crate::error::Result;
use crate::security::password;

/// Fixed demo user set: (username, password, can_view_pokemon).
pub const SEED_USERS: &[(&str, &str, bool)] = &[
    ("ash", "pikachu123", true),
    ("misty", "starmie123", true),
    ("brock", "onix123", true),
    ("team_rocket", "meowth123", false),
    ("gary", "rival123", false),
];

/// Insert the demo users, skipping any username that already exists.
pub async fn seed_users(pool: &PgPool, cost: u32) -> Result<()> {
    for &(username, plaintext, can_view) in SEED_USERS {
        let hash = password::hash_password(plaintext, cost)?;

        let result = sqlx::query(
            r#"
            INSERT INTO users (id, username, password_hash, can_view_pokemon)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (username) DO NOTHING
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(username)
        .bind(&hash)
        .bind(can_view)
        .execute(pool)
        .await?;

        if result.rows_affected() == 0 {
            tracing::info!(username, "user already seeded, skipping");
        } else {
            tracing::info!(username, can_view, "seeded user");
        }
    }

    Ok(())
}

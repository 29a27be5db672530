use std::io;
use std::sync::Arc;

use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpServer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use pokedex_gateway::config::Config;
use pokedex_gateway::db::{self, CredentialStore, InMemoryCredentialStore, PgCredentialStore};
use pokedex_gateway::security::jwt::TokenCodec;
use pokedex_gateway::session::SessionTransport;
use pokedex_gateway::upstream::PokeApiClient;
use pokedex_gateway::{routes, AppState};

#[actix_web::main]
async fn main() -> io::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,actix_web=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env().map_err(invalid_input)?;

    tracing::info!("Starting pokedex-gateway v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!("Environment: {}", config.app.env);

    // `pokedex-gateway seed` hashes and inserts the demo users, then exits.
    let seed_requested = std::env::args().nth(1).as_deref() == Some("seed");

    let store: Arc<dyn CredentialStore> = match &config.database.url {
        Some(url) => {
            let store = PgCredentialStore::connect(url, config.database.max_connections)
                .await
                .map_err(other)?;
            tracing::info!("Credential store: postgres");

            if seed_requested {
                db::seed::seed_users(store.pool(), config.auth.bcrypt_cost)
                    .await
                    .map_err(other)?;
                tracing::info!("Seeding complete");
                return Ok(());
            }

            Arc::new(store)
        }
        None => {
            if seed_requested {
                return Err(invalid_input("seed requires DATABASE_URL"));
            }

            tracing::warn!(
                "DATABASE_URL not set, using the in-memory credential store with demo users"
            );
            let store = InMemoryCredentialStore::seeded(config.auth.bcrypt_cost).map_err(other)?;
            Arc::new(store)
        }
    };

    let state = AppState {
        store,
        codec: TokenCodec::new(&config.auth.jwt_secret, config.auth.token_ttl_secs),
        transport: SessionTransport::from_config(&config),
        upstream: PokeApiClient::new(&config.upstream).map_err(other)?,
    };

    let cors_origin = config.app.cors_origin.clone();
    let bind_addr = (config.app.host.clone(), config.app.port);

    tracing::info!("Listening on {}:{}", bind_addr.0, bind_addr.1);

    HttpServer::new(move || {
        // Credentialed CORS for the single configured origin; the session
        // cookie does not travel cross-origin otherwise.
        let cors = Cors::default()
            .allowed_origin(&cors_origin)
            .allowed_methods(vec!["GET", "POST"])
            .allow_any_header()
            .supports_credentials()
            .max_age(3600);

        App::new()
            .wrap(Logger::default())
            .wrap(cors)
            .app_data(web::Data::new(state.clone()))
            .configure(routes::configure)
    })
    .bind(bind_addr)?
    .run()
    .await
}

fn invalid_input(err: impl ToString) -> io::Error {
    io::Error::new(io::ErrorKind::InvalidInput, err.to_string())
}

fn other(err: impl ToString) -> io::Error {
    io::Error::new(io::ErrorKind::Other, err.to_string())
}

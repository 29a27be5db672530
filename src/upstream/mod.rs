//! Read-only client for the downstream Pokemon API.
//!
//! Upstream payloads are parsed into typed shapes with required fields;
//! anything missing or mistyped fails the request instead of leaking
//! undefined values through to clients. Upstream error bodies are dropped,
//! never forwarded.

use std::time::Duration;

use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};

use crate::config::UpstreamConfig;
use crate::error::{ApiError, Result};

/// Reduced single-Pokemon shape returned to clients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PokemonSummary {
    pub id: i64,
    pub name: String,
    pub types: Vec<String>,
    pub sprite: Option<String>,
    pub height: i64,
    pub weight: i64,
}

/// One entry of the bounded list endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PokemonRef {
    pub name: String,
    pub url: String,
}

#[derive(Debug, Deserialize)]
struct UpstreamPokemon {
    id: i64,
    name: String,
    height: i64,
    weight: i64,
    types: Vec<UpstreamTypeSlot>,
    sprites: UpstreamSprites,
}

#[derive(Debug, Deserialize)]
struct UpstreamTypeSlot {
    #[serde(rename = "type")]
    kind: UpstreamNamed,
}

#[derive(Debug, Deserialize)]
struct UpstreamNamed {
    name: String,
}

#[derive(Debug, Deserialize)]
struct UpstreamSprites {
    front_default: Option<String>,
}

#[derive(Debug, Deserialize)]
struct UpstreamPage {
    results: Vec<PokemonRef>,
}

impl From<UpstreamPokemon> for PokemonSummary {
    fn from(raw: UpstreamPokemon) -> Self {
        PokemonSummary {
            id: raw.id,
            name: raw.name,
            types: raw.types.into_iter().map(|t| t.kind.name).collect(),
            sprite: raw.sprites.front_default,
            height: raw.height,
            weight: raw.weight,
        }
    }
}

#[derive(Clone)]
pub struct PokeApiClient {
    http: Client,
    base_url: String,
    default_limit: u32,
    max_limit: u32,
}

impl PokeApiClient {
    pub fn new(config: &UpstreamConfig) -> Result<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| ApiError::Internal(format!("http client init failed: {e}")))?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_owned(),
            default_limit: config.page_limit_default,
            max_limit: config.page_limit_max,
        })
    }

    /// Fetch one Pokemon by numeric id or name (case-insensitive).
    ///
    /// Identifiers are restricted to plain `[a-z0-9-]` segments before the
    /// URL is formatted; the router percent-decodes path parameters, so a
    /// crafted id could otherwise steer the request to another path under
    /// the upstream base.
    pub async fn fetch_pokemon(&self, id_or_name: &str) -> Result<PokemonSummary> {
        let id = id_or_name.to_lowercase();
        if !is_plain_segment(&id) {
            return Err(ApiError::NotFound);
        }

        let url = format!("{}/pokemon/{id}", self.base_url);
        let response = self.http.get(&url).send().await?;

        match response.status() {
            status if status.is_success() => {}
            StatusCode::NOT_FOUND => return Err(ApiError::NotFound),
            status => {
                return Err(ApiError::Upstream(format!(
                    "unexpected upstream status {status} for {url}"
                )))
            }
        }

        let raw = response
            .json::<UpstreamPokemon>()
            .await
            .map_err(|e| ApiError::Upstream(format!("malformed upstream payload: {e}")))?;

        Ok(raw.into())
    }

    /// Fetch a bounded page of the Pokemon index.
    pub async fn list_pokemon(&self, limit: Option<u32>) -> Result<Vec<PokemonRef>> {
        let limit = self.clamp_limit(limit);
        let url = format!("{}/pokemon", self.base_url);

        let response = self.http.get(&url).query(&[("limit", limit)]).send().await?;

        if !response.status().is_success() {
            return Err(ApiError::Upstream(format!(
                "unexpected upstream status {} for {url}",
                response.status()
            )));
        }

        let page = response
            .json::<UpstreamPage>()
            .await
            .map_err(|e| ApiError::Upstream(format!("malformed upstream payload: {e}")))?;

        Ok(page.results)
    }

    fn clamp_limit(&self, requested: Option<u32>) -> u32 {
        requested
            .unwrap_or(self.default_limit)
            .clamp(1, self.max_limit)
    }
}

fn is_plain_segment(id: &str) -> bool {
    !id.is_empty() && id.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> PokeApiClient {
        PokeApiClient::new(&UpstreamConfig {
            base_url: "http://127.0.0.1:1/api/v2/".into(),
            timeout_secs: 1,
            page_limit_default: 20,
            page_limit_max: 100,
        })
        .unwrap()
    }

    #[test]
    fn base_url_trailing_slash_is_trimmed() {
        assert_eq!(client().base_url, "http://127.0.0.1:1/api/v2");
    }

    #[test]
    fn plain_segments_allow_ids_and_hyphenated_names() {
        assert!(is_plain_segment("25"));
        assert!(is_plain_segment("mr-mime"));
        assert!(!is_plain_segment(""));
        assert!(!is_plain_segment("red/blue"));
        assert!(!is_plain_segment("a%2fb"));
    }

    // The client is pointed at an unreachable address, so anything that got
    // past the identifier guard would surface as an upstream error instead.
    #[tokio::test]
    async fn path_escaping_identifiers_are_rejected_without_a_request() {
        let client = client();
        for id in ["red/blue", "../type", "a%2Fb", "pikachu?limit=1", ""] {
            let err = client.fetch_pokemon(id).await.unwrap_err();
            assert!(matches!(err, ApiError::NotFound), "id {id:?}");
        }
    }

    #[test]
    fn limit_is_clamped_to_configured_bounds() {
        let client = client();
        assert_eq!(client.clamp_limit(None), 20);
        assert_eq!(client.clamp_limit(Some(5)), 5);
        assert_eq!(client.clamp_limit(Some(0)), 1);
        assert_eq!(client.clamp_limit(Some(10_000)), 100);
    }

    #[test]
    fn reshape_keeps_the_reduced_field_set() {
        let raw: UpstreamPokemon = serde_json::from_value(serde_json::json!({
            "id": 25,
            "name": "pikachu",
            "height": 4,
            "weight": 60,
            "base_experience": 112,
            "types": [
                {"slot": 1, "type": {"name": "electric", "url": "https://pokeapi.co/api/v2/type/13/"}}
            ],
            "sprites": {"front_default": "https://img.example/25.png", "back_default": null}
        }))
        .unwrap();

        let summary = PokemonSummary::from(raw);
        assert_eq!(
            summary,
            PokemonSummary {
                id: 25,
                name: "pikachu".into(),
                types: vec!["electric".into()],
                sprite: Some("https://img.example/25.png".into()),
                height: 4,
                weight: 60,
            }
        );
    }

    #[test]
    fn missing_required_field_fails_to_parse() {
        // No `types` array: must be a hard parse error, not a default.
        let result = serde_json::from_value::<UpstreamPokemon>(serde_json::json!({
            "id": 25,
            "name": "pikachu",
            "height": 4,
            "weight": 60,
            "sprites": {"front_default": null}
        }));
        assert!(result.is_err());
    }

    #[test]
    fn mistyped_field_fails_to_parse() {
        let result = serde_json::from_value::<UpstreamPokemon>(serde_json::json!({
            "id": "twenty-five",
            "name": "pikachu",
            "height": 4,
            "weight": 60,
            "types": [],
            "sprites": {"front_default": null}
        }));
        assert!(result.is_err());
    }
}

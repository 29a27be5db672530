//! Proxied read endpoints, gated by the capability flag.

use actix_web::{web, HttpResponse};
use serde::Deserialize;

use crate::error::ApiError;
use crate::middleware::CurrentUser;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub limit: Option<u32>,
}

/// Fetch one Pokemon by id or name. The capability check runs before any
/// downstream call is made.
pub async fn get_pokemon(
    state: web::Data<AppState>,
    user: CurrentUser,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    if !user.can_view_pokemon {
        return Err(ApiError::Forbidden);
    }

    let pokemon = state.upstream.fetch_pokemon(&path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(pokemon))
}

/// List a bounded page of the Pokemon index.
pub async fn list_pokemon(
    state: web::Data<AppState>,
    user: CurrentUser,
    query: web::Query<ListQuery>,
) -> Result<HttpResponse, ApiError> {
    if !user.can_view_pokemon {
        return Err(ApiError::Forbidden);
    }

    let page = state.upstream.list_pokemon(query.limit).await?;
    Ok(HttpResponse::Ok().json(page))
}

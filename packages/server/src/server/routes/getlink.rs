//! Link resolution endpoint.
//!
//! GET /getlink?url=<share page URL>
//!
//! Always answers 200 with a structured payload; logical failure is
//! `{"success":false,"error":...}`, never a raw fault.

use axum::extract::{Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::server::app::AppState;

#[derive(Deserialize)]
pub struct LinkQuery {
    /// Share page URL to resolve
    pub url: Option<String>,
}

/// Resolution payload, shared with the standalone CLI.
#[derive(Debug, Serialize)]
pub struct LinkResponse {
    pub success: bool,

    #[serde(rename = "directLink", skip_serializing_if = "Option::is_none")]
    pub direct_link: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl LinkResponse {
    /// A successful resolution.
    pub fn ok(link: resolver::ResolvedLink) -> Self {
        Self {
            success: true,
            direct_link: Some(link.into_string()),
            error: None,
        }
    }

    /// A logical failure.
    pub fn err(message: impl Into<String>) -> Self {
        Self {
            success: false,
            direct_link: None,
            error: Some(message.into()),
        }
    }
}

/// Resolve a share URL and return the direct link.
pub async fn getlink_handler(
    State(state): State<AppState>,
    Query(query): Query<LinkQuery>,
) -> Json<LinkResponse> {
    let Some(url) = query.url else {
        return Json(LinkResponse::err("No URL provided"));
    };

    info!(url = %url, "resolving share URL");

    match state.resolver.resolve(&url).await {
        Ok(link) => Json(LinkResponse::ok(link)),
        Err(e) => Json(LinkResponse::err(e.to_string())),
    }
}

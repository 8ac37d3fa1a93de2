//! OAuth2 flow handlers.

use axum::extract::{Query, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use serde::Deserialize;

use shutterdrop_common::{Error, Result};

use crate::state::AppState;

/// Query parameters of the OAuth2 callback.
#[derive(Debug, Deserialize)]
pub struct CallbackParams {
    code: Option<String>,
}

/// Send the user to the provider's consent screen.
pub async fn begin_auth(State(state): State<AppState>) -> Response {
    redirect(state.identity.authorization_url())
}

/// Complete the OAuth2 flow: exchange the code, install the credential
/// set, and hand the profile to the front-end.
///
/// Any failure collapses into a plain 500; the flow is restarted by
/// visiting the begin-auth route again.
pub async fn complete_auth(
    State(state): State<AppState>,
    Query(params): Query<CallbackParams>,
) -> Response {
    match authenticate(&state, params).await {
        Ok(frontend) => redirect(frontend),
        Err(err) => {
            tracing::error!(error = %err, "Authentication failed");
            (StatusCode::INTERNAL_SERVER_ERROR, "Authentication failed").into_response()
        }
    }
}

async fn authenticate(state: &AppState, params: CallbackParams) -> Result<String> {
    let code = params
        .code
        .ok_or_else(|| Error::InvalidInput("Missing authorization code".to_string()))?;

    let creds = state.identity.exchange_code(&code).await?;
    state.credentials.install(creds.clone()).await;

    let profile = state.identity.fetch_profile(&creds).await?;

    tracing::info!(account = %profile.id, "Authenticated Google account");

    let profile_json = serde_json::to_string(&profile)
        .map_err(|e| Error::Serialization(format!("Failed to serialize profile: {}", e)))?;

    let frontend = url::Url::parse_with_params(
        &state.config.frontend_url,
        [("user", profile_json.as_str())],
    )
    .map_err(|e| Error::Configuration(format!("Invalid front-end URL: {}", e)))?;

    Ok(frontend.to_string())
}

// Redirect::to responds 303; the provider handoff uses a plain 302.
fn redirect(location: String) -> Response {
    (StatusCode::FOUND, [(header::LOCATION, location)]).into_response()
}

//! OAuth2 authentication for the Google identity provider.

use async_trait::async_trait;
use chrono::{Duration, Utc};
use oauth2::{
    basic::BasicClient, AuthUrl, ClientId, ClientSecret, RedirectUrl, Scope, TokenResponse,
    TokenUrl,
};
use reqwest::header;

use shutterdrop_common::{Error, Result};

use crate::credentials::Credentials;
use crate::provider::{IdentityProvider, UserProfile};

/// OAuth2 authorization endpoint.
const GOOGLE_AUTH_URL: &str = "https://accounts.google.com/o/oauth2/v2/auth";
/// OAuth2 token endpoint.
const GOOGLE_TOKEN_URL: &str = "https://oauth2.googleapis.com/token";
/// Userinfo endpoint for the authenticated account's profile.
const GOOGLE_USERINFO_URL: &str = "https://www.googleapis.com/oauth2/v2/userinfo";

/// Requested scopes: profile, email, and per-file Drive access.
const PROFILE_SCOPE: &str = "https://www.googleapis.com/auth/userinfo.profile";
const EMAIL_SCOPE: &str = "https://www.googleapis.com/auth/userinfo.email";
const DRIVE_FILE_SCOPE: &str = "https://www.googleapis.com/auth/drive.file";

/// Configuration for OAuth2 authentication.
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// OAuth2 client ID.
    pub client_id: String,
    /// OAuth2 client secret.
    pub client_secret: String,
    /// Redirect URL for the OAuth2 callback.
    pub redirect_url: String,
}

/// Google OAuth2 identity provider.
pub struct GoogleIdentity {
    client: BasicClient,
    http: reqwest::Client,
}

impl GoogleIdentity {
    /// Create a new identity provider from client registration values.
    pub fn new(config: AuthConfig) -> Result<Self> {
        let client = BasicClient::new(
            ClientId::new(config.client_id.clone()),
            Some(ClientSecret::new(config.client_secret.clone())),
            AuthUrl::new(GOOGLE_AUTH_URL.to_string())
                .map_err(|e| Error::Configuration(format!("Invalid auth URL: {}", e)))?,
            Some(
                TokenUrl::new(GOOGLE_TOKEN_URL.to_string())
                    .map_err(|e| Error::Configuration(format!("Invalid token URL: {}", e)))?,
            ),
        )
        .set_redirect_uri(
            RedirectUrl::new(config.redirect_url.clone())
                .map_err(|e| Error::Configuration(format!("Invalid redirect URL: {}", e)))?,
        );

        let http = reqwest::Client::builder()
            .user_agent("ShutterDrop/0.1")
            .build()
            .map_err(|e| Error::Network(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { client, http })
    }
}

#[async_trait]
impl IdentityProvider for GoogleIdentity {
    /// Generate the authorization URL for the user to visit.
    ///
    /// Offline access is requested so a refresh token is issued on the
    /// first grant. The CSRF state embedded in the URL is not verified
    /// by the callback route.
    fn authorization_url(&self) -> String {
        let (auth_url, _csrf_token) = self
            .client
            .authorize_url(oauth2::CsrfToken::new_random)
            .add_scope(Scope::new(PROFILE_SCOPE.to_string()))
            .add_scope(Scope::new(EMAIL_SCOPE.to_string()))
            .add_scope(Scope::new(DRIVE_FILE_SCOPE.to_string()))
            .add_extra_param("access_type", "offline")
            .add_extra_param("include_granted_scopes", "true")
            .url();

        auth_url.to_string()
    }

    /// Exchange an authorization code for a credential set.
    ///
    /// # Preconditions
    /// - `code` is a valid authorization code from the OAuth2 callback
    ///
    /// # Errors
    /// - Invalid authorization code
    /// - Network errors
    async fn exchange_code(&self, code: &str) -> Result<Credentials> {
        use oauth2::reqwest::async_http_client;
        use oauth2::AuthorizationCode;

        let token_result = self
            .client
            .exchange_code(AuthorizationCode::new(code.to_string()))
            .request_async(async_http_client)
            .await
            .map_err(|e| Error::Authentication(format!("Token exchange failed: {}", e)))?;

        let access_token = token_result.access_token().secret().clone();

        // Repeat grants may omit the refresh token; the first grant with
        // offline access carries one.
        let refresh_token = token_result.refresh_token().map(|t| t.secret().clone());
        if refresh_token.is_none() {
            tracing::warn!("Token response carried no refresh token");
        }

        let expires_in = token_result
            .expires_in()
            .unwrap_or_else(|| std::time::Duration::from_secs(3600));

        let expires_at =
            Utc::now() + Duration::from_std(expires_in).unwrap_or_else(|_| Duration::hours(1));

        Ok(Credentials {
            access_token,
            refresh_token,
            expires_at,
        })
    }

    /// Fetch the authenticated account's profile from the userinfo endpoint.
    async fn fetch_profile(&self, creds: &Credentials) -> Result<UserProfile> {
        let response = self
            .http
            .get(GOOGLE_USERINFO_URL)
            .header(
                header::AUTHORIZATION,
                format!("Bearer {}", creds.access_token),
            )
            .send()
            .await
            .map_err(|e| Error::Network(format!("Failed to fetch profile: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Authentication(format!(
                "Profile fetch failed: {} - {}",
                status, body
            )));
        }

        response
            .json()
            .await
            .map_err(|e| Error::Serialization(format!("Failed to parse profile: {}", e)))
    }
}

use crate::domain::model::BearerToken;
use crate::domain::ports::TokenProvider;
use crate::utils::error::{FacadeError, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

/// OAuth2 client-credentials grant against `{authority}/oauth2/token`.
///
/// Nothing is cached: each call performs a full token request.
#[derive(Clone)]
pub struct ClientCredentialsTokenProvider {
    client: Client,
    authority: String,
    resource: String,
    client_id: String,
    client_secret: String,
}

impl ClientCredentialsTokenProvider {
    pub fn new(
        client: Client,
        authority: &str,
        resource: &str,
        client_id: &str,
        client_secret: &str,
    ) -> Self {
        Self {
            client,
            authority: authority.trim_end_matches('/').to_string(),
            resource: resource.to_string(),
            client_id: client_id.to_string(),
            client_secret: client_secret.to_string(),
        }
    }

    fn token_endpoint(&self) -> String {
        format!("{}/oauth2/token", self.authority)
    }
}

#[async_trait]
impl TokenProvider for ClientCredentialsTokenProvider {
    async fn access_token(&self) -> Result<BearerToken> {
        let endpoint = self.token_endpoint();
        tracing::debug!("🔑 Requesting access token from {}", endpoint);

        let response = self
            .client
            .post(&endpoint)
            .form(&[
                ("grant_type", "client_credentials"),
                ("client_id", self.client_id.as_str()),
                ("client_secret", self.client_secret.as_str()),
                ("resource", self.resource.as_str()),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(FacadeError::TokenError {
                message: format!("token endpoint responded with status {}: {}", status, body),
            });
        }

        let token: TokenResponse = response.json().await?;
        if token.access_token.is_empty() {
            return Err(FacadeError::TokenError {
                message: "token endpoint returned an empty access_token".to_string(),
            });
        }

        Ok(BearerToken::new(token.access_token))
    }
}

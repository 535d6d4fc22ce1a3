use super::constants::{self, CLIENT_CREDENTIALS_GRANT};
use crate::config::{Config, keys};
use crate::error::{Error, Result};
use log::{debug, info};
use reqwest::Url;
use reqwest::blocking::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

/// Anything that can hand out a bearer token for the directory API
pub trait TokenSource {
    fn acquire_token(&self) -> Result<AccessToken>;
}

/// Opaque bearer token. Expiry is not tracked; one token is acquired per run.
#[derive(Debug)]
pub struct AccessToken(SecretString);

impl AccessToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(SecretString::from(token.into()))
    }
}

impl ExposeSecret<str> for AccessToken {
    fn expose_secret(&self) -> &str {
        self.0.expose_secret()
    }
}

/// Confidential client identity used for the client-credentials grant
#[derive(Debug)]
pub struct Credential {
    pub authority: String,
    pub client_id: String,
    client_secret: SecretString,
    pub scope: String,
}

impl Credential {
    pub fn new(
        authority: impl Into<String>,
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
        scope: impl Into<String>,
    ) -> Self {
        Self {
            authority: authority.into(),
            client_id: client_id.into(),
            client_secret: SecretString::from(client_secret.into()),
            scope: scope.into(),
        }
    }

    /// Resolve the credential settings.
    ///
    /// An explicit `authority` wins; otherwise it is built from
    /// `authority-host` and the mandatory `tenant-id`.
    pub fn from_config(config: &Config) -> Result<Self> {
        let authority = match config.lookup(keys::AUTHORITY) {
            Some(authority) => authority.to_string(),
            None => {
                let host = config.resolve(keys::AUTHORITY_HOST)?;
                let tenant_id = config.resolve(keys::TENANT_ID)?;
                format!("{}/{}", host.trim_end_matches('/'), tenant_id)
            }
        };

        Ok(Self::new(
            authority,
            config.resolve(keys::CLIENT_ID)?,
            config.resolve(keys::SECRET)?,
            config.resolve(keys::SCOPE)?,
        ))
    }

    /// Validate the authority and derive its token endpoint.
    pub fn token_endpoint(&self) -> Result<Url> {
        let authority = Url::parse(self.authority.trim()).map_err(|e| {
            Error::authentication_caused_by(
                format!("Malformed authority URL '{}'", self.authority),
                e,
            )
        })?;

        let usable = matches!(authority.scheme(), "http" | "https")
            && authority.host_str().is_some_and(|h| !h.is_empty())
            && authority.query().is_none()
            && authority.fragment().is_none();
        if !usable {
            return Err(Error::authentication(format!(
                "Malformed authority URL '{}': expected http(s)://<host>/<tenant>",
                self.authority
            )));
        }

        let endpoint = constants::token_endpoint(authority.as_str());
        Url::parse(&endpoint).map_err(|e| {
            Error::authentication_caused_by(format!("Malformed token endpoint '{}'", endpoint), e)
        })
    }
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: Option<String>,
    expires_in: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct TokenErrorResponse {
    error: String,
    error_description: Option<String>,
}

/// Client-credentials grant against a v2.0 token endpoint
#[derive(Debug)]
pub struct ClientCredentials {
    credential: Credential,
    http_client: Client,
}

impl ClientCredentials {
    pub fn new(credential: Credential) -> Result<Self> {
        let http_client = super::client::build_http_client(None)
            .map_err(|e| Error::authentication_caused_by("Failed to build HTTP client", e))?;
        Ok(Self::with_custom_client(credential, http_client))
    }

    /// Use a preconfigured HTTP client (proxy settings, test servers)
    pub fn with_custom_client(credential: Credential, http_client: Client) -> Self {
        Self {
            credential,
            http_client,
        }
    }
}

impl TokenSource for ClientCredentials {
    fn acquire_token(&self) -> Result<AccessToken> {
        let endpoint = self.credential.token_endpoint()?;

        info!("Requesting access token from {}", endpoint);
        debug!(
            "Client ID: {}, scope: {}",
            self.credential.client_id, self.credential.scope
        );

        let response = self
            .http_client
            .post(endpoint.clone())
            .form(&[
                ("grant_type", CLIENT_CREDENTIALS_GRANT),
                ("client_id", self.credential.client_id.as_str()),
                ("client_secret", self.credential.client_secret.expose_secret()),
                ("scope", self.credential.scope.as_str()),
            ])
            .send()
            .map_err(|e| {
                Error::authentication_caused_by(format!("Token request to {} failed", endpoint), e)
            })?;

        let status = response.status();
        debug!("Token request status: {}", status);

        let body = response.text().map_err(|e| {
            Error::authentication_caused_by("Failed to read token response", e)
        })?;

        if !status.is_success() {
            let detail = match serde_json::from_str::<TokenErrorResponse>(&body) {
                Ok(TokenErrorResponse {
                    error,
                    error_description: Some(description),
                }) => format!("{}: {}", error, description),
                Ok(TokenErrorResponse { error, .. }) => error,
                Err(_) => body,
            };
            return Err(Error::authentication(format!(
                "Token request rejected with status {}: {}",
                status, detail
            )));
        }

        let token: TokenResponse = serde_json::from_str(&body)
            .map_err(|e| Error::authentication_caused_by("Malformed token response", e))?;

        match token.access_token {
            Some(access_token) => {
                debug!(
                    "Access token obtained successfully (expires in {}s)",
                    token.expires_in.unwrap_or_default()
                );
                Ok(AccessToken::new(access_token))
            }
            None => Err(Error::authentication("No access token in response")),
        }
    }
}

/// One-shot client-credentials exchange with a default HTTP client.
pub fn acquire_token(
    authority: &str,
    client_id: &str,
    scope: &str,
    secret: &str,
) -> Result<AccessToken> {
    let credential = Credential::new(authority, client_id, secret, scope);
    // Reject a bad authority before anything else is set up.
    credential.token_endpoint()?;
    ClientCredentials::new(credential)?.acquire_token()
}

//! Google Analytics Data API client (service-account auth).

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use pagepulse_core::report::{ReportQuery, ReportRunner, RunReportResponse};

const DATA_API_BASE: &str = "https://analyticsdata.googleapis.com/v1beta";
const ANALYTICS_READONLY_SCOPE: &str = "https://www.googleapis.com/auth/analytics.readonly";
const JWT_BEARER_GRANT: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";

/// Parsed service-account key file (`GOOGLE_APPLICATION_CREDENTIALS`).
#[derive(Debug, Clone, Deserialize)]
struct ServiceAccountKey {
    client_email: String,
    private_key: String,
    token_uri: String,
}

#[derive(Debug, Serialize)]
struct Claims<'a> {
    iss: &'a str,
    scope: &'a str,
    aud: &'a str,
    iat: i64,
    exp: i64,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: i64,
}

#[derive(Debug, Clone)]
struct CachedToken {
    access_token: String,
    expires_at: DateTime<Utc>,
}

/// HTTP client for the GA Data API `runReport` operation.
///
/// Built once at startup and shared process-wide. Access tokens are minted
/// through the JWT-bearer grant and cached until shortly before expiry.
/// One outbound report call per inbound request; no retry, no circuit
/// breaking, the reqwest default timeout behavior.
pub struct GaDataClient {
    http: reqwest::Client,
    key: ServiceAccountKey,
    signing_key: EncodingKey,
    token: Mutex<Option<CachedToken>>,
    base_url: String,
}

impl GaDataClient {
    /// Load the service-account key file and parse its RSA private key.
    ///
    /// Fails fast so a bad credential path stops the process at startup
    /// rather than on the first request.
    pub fn from_key_file(path: &str) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("reading service-account key file {path}"))?;
        let key: ServiceAccountKey = serde_json::from_str(&raw)
            .with_context(|| format!("parsing service-account key file {path}"))?;
        let signing_key = EncodingKey::from_rsa_pem(key.private_key.as_bytes())
            .context("service-account private_key is not a valid RSA PEM")?;
        Ok(Self {
            http: reqwest::Client::new(),
            key,
            signing_key,
            token: Mutex::new(None),
            base_url: DATA_API_BASE.to_string(),
        })
    }

    /// Return a valid bearer token, minting a new one when the cached token
    /// is absent or within 30 seconds of expiry.
    ///
    /// The lock is held across the token exchange so concurrent handlers
    /// refresh once, not once each.
    async fn access_token(&self) -> Result<String> {
        let mut cached = self.token.lock().await;
        if let Some(token) = cached.as_ref() {
            if token.expires_at > Utc::now() + Duration::seconds(30) {
                return Ok(token.access_token.clone());
            }
        }

        let now = Utc::now();
        let claims = Claims {
            iss: &self.key.client_email,
            scope: ANALYTICS_READONLY_SCOPE,
            aud: &self.key.token_uri,
            iat: now.timestamp(),
            exp: (now + Duration::hours(1)).timestamp(),
        };
        let assertion = encode(&Header::new(Algorithm::RS256), &claims, &self.signing_key)
            .context("signing service-account JWT")?;

        let response = self
            .http
            .post(&self.key.token_uri)
            .form(&[
                ("grant_type", JWT_BEARER_GRANT),
                ("assertion", assertion.as_str()),
            ])
            .send()
            .await
            .context("requesting access token")?;
        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(anyhow!(
                "token exchange returned {status}: {}",
                provider_message(&body)
            ));
        }
        let token: TokenResponse = response
            .json()
            .await
            .context("parsing access token response")?;

        let minted = CachedToken {
            access_token: token.access_token,
            expires_at: now + Duration::seconds(token.expires_in),
        };
        *cached = Some(minted.clone());
        Ok(minted.access_token)
    }
}

#[async_trait]
impl ReportRunner for GaDataClient {
    async fn run_report(&self, property: &str, query: &ReportQuery) -> Result<RunReportResponse> {
        let token = self.access_token().await?;
        let url = format!("{}/{}:runReport", self.base_url, property);

        let response = self
            .http
            .post(&url)
            .bearer_auth(token)
            .json(query)
            .send()
            .await
            .context("calling runReport")?;
        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(anyhow!(
                "runReport returned {status}: {}",
                provider_message(&body)
            ));
        }
        response.json().await.context("parsing runReport response")
    }
}

/// Extract the human-readable message from Google's error envelope,
/// falling back to the raw body text.
fn provider_message(body: &str) -> String {
    #[derive(Deserialize)]
    struct Envelope {
        error: Inner,
    }
    #[derive(Deserialize)]
    struct Inner {
        message: String,
    }
    match serde_json::from_str::<Envelope>(body) {
        Ok(envelope) => envelope.error.message,
        Err(_) => body.trim().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::provider_message;

    #[test]
    fn extracts_message_from_google_error_envelope() {
        let body = r#"{"error":{"code":400,"message":"Request contains an invalid argument.","status":"INVALID_ARGUMENT"}}"#;
        assert_eq!(
            provider_message(body),
            "Request contains an invalid argument."
        );
    }

    #[test]
    fn falls_back_to_raw_body() {
        assert_eq!(provider_message("upstream exploded\n"), "upstream exploded");
    }
}
